use std::sync::Arc;

use tracing::{debug, error};

use crate::infrastructure::CompletionService;
use crate::models::{QuestionType, ScoreResult};

use super::composite::CompositeScorer;
use super::strategy::{ExactAnswer, Fallback, LocalEnsemble, MarkScorer, RemoteJudge, ScoringRequest};

/// 题型分发器
///
/// - 客观题：精确比对
/// - 论述题 / 观点题：外部评判优先，失败时本地加权
/// - 空答案不调用外部评判，直接走本地加权（得到各指标空输入默认值对应的分数）
///
/// 分发器本身无状态，可以在任意多个任务间共享。
pub struct QuestionDispatcher {
    exact: ExactAnswer,
    local: Arc<LocalEnsemble>,
    open_ended: Arc<dyn MarkScorer>,
}

impl QuestionDispatcher {
    /// `judge` 为 `None` 时只使用本地加权
    pub fn new(composite: CompositeScorer, judge: Option<Arc<dyn CompletionService>>) -> Self {
        let local = Arc::new(LocalEnsemble::new(composite));
        let open_ended: Arc<dyn MarkScorer> = match judge {
            Some(service) => Arc::new(Fallback::new(
                Arc::new(RemoteJudge::new(service)),
                local.clone(),
            )),
            None => local.clone(),
        };

        Self {
            exact: ExactAnswer,
            local,
            open_ended,
        }
    }

    /// 为一道题评分，永不失败
    pub async fn score(&self, request: ScoringRequest<'_>) -> ScoreResult {
        match request.question.question_type {
            QuestionType::Objective => self.exact.evaluate(request),
            _ if request.candidate.trim().is_empty() => {
                debug!("第 {} 题作答为空，跳过外部评判", request.question.number);
                self.local.evaluate(request)
            }
            _ => match self.open_ended.score(request).await {
                Ok(result) => result,
                Err(e) => {
                    error!("第 {} 题评分失败，使用本地加权: {}", request.question.number, e);
                    self.local.evaluate(request)
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::testing::ScriptedCompletion;
    use crate::models::{Question, ScoreSource};

    #[tokio::test]
    async fn test_objective_never_calls_judge() {
        let service = Arc::new(ScriptedCompletion::replying(&["0"]));
        let dispatcher = QuestionDispatcher::new(CompositeScorer::default(), Some(service.clone()));
        let q = Question::new(1, "Capital of France?", QuestionType::Objective, 1.0);

        let result = dispatcher.score(ScoringRequest::new(&q, "Paris", "paris")).await;
        assert_eq!(result.awarded, 1.0);
        assert_eq!(result.source, ScoreSource::Exact);
        assert_eq!(service.calls(), 0);
    }

    #[tokio::test]
    async fn test_empty_candidate_skips_judge() {
        let service = Arc::new(ScriptedCompletion::replying(&["5"]));
        let dispatcher = QuestionDispatcher::new(CompositeScorer::default(), Some(service.clone()));
        let q = Question::new(2, "Explain photosynthesis.", QuestionType::Descriptive, 5.0);

        let result = dispatcher
            .score(ScoringRequest::new(&q, "Photosynthesis converts light to energy.", "  "))
            .await;
        assert_eq!(result.source, ScoreSource::LocalEnsemble);
        assert_eq!(result.awarded, 1.7);
        assert_eq!(service.calls(), 0);
    }

    #[tokio::test]
    async fn test_remote_judge_used_when_available() {
        let service = Arc::new(ScriptedCompletion::replying(&["3.5"]));
        let dispatcher = QuestionDispatcher::new(CompositeScorer::default(), Some(service));
        let q = Question::new(3, "Is homework useful?", QuestionType::OpinionBased, 5.0);

        let result = dispatcher
            .score(ScoringRequest::new(&q, "Yes, it helps.", "It helps practice."))
            .await;
        assert_eq!(result.awarded, 3.5);
        assert_eq!(result.source, ScoreSource::RemoteJudge);
    }

    #[tokio::test]
    async fn test_local_only_dispatcher() {
        let dispatcher = QuestionDispatcher::new(CompositeScorer::default(), None);
        let q = Question::new(4, "Explain osmosis.", QuestionType::Descriptive, 5.0);

        let result = dispatcher
            .score(ScoringRequest::new(&q, "Water moves across a membrane.", "Water moves."))
            .await;
        assert_eq!(result.source, ScoreSource::LocalEnsemble);
        assert!((0.0..=5.0).contains(&result.awarded));
    }
}
