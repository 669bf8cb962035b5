//! 单题评分流程 - 流程层
//!
//! 核心职责：定义"一道题 × 一个学生"的完整批改流程
//!
//! 流程顺序：
//! 1. 按题型分发评分（客观题精确比对 / 外部评判 → 本地加权）
//! 2. 得分低于阈值时诊断薄弱知识点
//! 3. 组装成可落盘的评分记录

use std::sync::Arc;

use tracing::{debug, info};

use crate::models::{AnswerKeyEntry, GradedAnswer, ScoreResult};
use crate::scoring::{QuestionDispatcher, ScoringRequest, WeakTopicDiagnoser};
use crate::utils::logging::truncate_text;
use crate::workflow::grade_ctx::GradeCtx;

/// 单题评分流程
///
/// - 编排评分与诊断的先后顺序
/// - 不持有任何外部资源，只依赖评分能力
/// - 永不失败：所有外部故障都在评分层内部兜底
pub struct GradingFlow {
    dispatcher: Arc<QuestionDispatcher>,
    diagnoser: Arc<WeakTopicDiagnoser>,
    verbose_logging: bool,
}

impl GradingFlow {
    pub fn new(
        dispatcher: Arc<QuestionDispatcher>,
        diagnoser: Arc<WeakTopicDiagnoser>,
        verbose_logging: bool,
    ) -> Self {
        Self {
            dispatcher,
            diagnoser,
            verbose_logging,
        }
    }

    /// 批改一道题
    pub async fn run(&self, entry: &AnswerKeyEntry, candidate: &str, ctx: &GradeCtx) -> GradedAnswer {
        let question = entry.question();
        let reference = entry.reference_answer.as_str();

        if self.verbose_logging {
            debug!("{} 作答: {}", ctx, truncate_text(candidate, 80));
        }

        let mut result = self
            .dispatcher
            .score(ScoringRequest::new(&question, reference, candidate))
            .await;

        if self.diagnoser.should_diagnose(result.awarded, result.max_marks) {
            let diagnosis = self.diagnoser.diagnose(&question, reference, candidate).await;
            debug!("{} 薄弱知识点: {}", ctx, diagnosis.weak_topic);
            result = result.with_diagnosis(diagnosis);
        }

        info!(
            "{} 得分 {}/{} ({:?})",
            ctx, result.awarded, result.max_marks, result.source
        );

        Self::assemble(entry, candidate, ctx, result)
    }

    fn assemble(
        entry: &AnswerKeyEntry,
        candidate: &str,
        ctx: &GradeCtx,
        result: ScoreResult,
    ) -> GradedAnswer {
        GradedAnswer {
            roll_number: ctx.roll_number.clone(),
            file_name: ctx.file_name.clone(),
            question_number: entry.number,
            question: entry.text.clone(),
            reference_answer: entry.reference_answer.clone(),
            student_answer: candidate.to_string(),
            marks_awarded: result.awarded,
            total_marks: result.max_marks,
            source: result.source,
            breakdown: result.breakdown,
            weak_topics: result.weak_topic,
            improvement_tips: result.tips,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::testing::ScriptedCompletion;
    use crate::models::{Question, QuestionType, ScoreSource};
    use crate::scoring::CompositeScorer;

    fn flow(responses: &[&str]) -> (Arc<ScriptedCompletion>, GradingFlow) {
        let service = Arc::new(ScriptedCompletion::replying(responses));
        let dispatcher = Arc::new(QuestionDispatcher::new(
            CompositeScorer::default(),
            Some(service.clone()),
        ));
        let diagnoser = Arc::new(WeakTopicDiagnoser::new(Some(service.clone()), 0.8));
        (service, GradingFlow::new(dispatcher, diagnoser, true))
    }

    #[tokio::test]
    async fn test_full_marks_skip_diagnosis() {
        let (service, flow) = flow(&[]);
        let entry = AnswerKeyEntry::new(
            Question::new(1, "Capital of France?", QuestionType::Objective, 1.0),
            "Paris",
        );
        let ctx = GradeCtx::new("s1.txt", "7", 0, 1);

        let graded = flow.run(&entry, "Paris", &ctx).await;
        assert_eq!(graded.marks_awarded, 1.0);
        assert_eq!(graded.source, ScoreSource::Exact);
        assert!(graded.weak_topics.is_none());
        assert_eq!(service.calls(), 0);
    }

    #[tokio::test]
    async fn test_low_score_is_diagnosed() {
        let (service, flow) = flow(&[
            "2",
            r#"{"weak_topic": "Photosynthesis", "tips": ["Review the light reactions"]}"#,
        ]);
        let entry = AnswerKeyEntry::new(
            Question::new(2, "Explain photosynthesis.", QuestionType::Descriptive, 5.0),
            "Plants convert light energy into chemical energy.",
        );
        let ctx = GradeCtx::new("s1.txt", "7", 0, 2);

        let graded = flow.run(&entry, "Plants eat sunlight.", &ctx).await;
        assert_eq!(graded.marks_awarded, 2.0);
        assert_eq!(graded.source, ScoreSource::RemoteJudge);
        assert_eq!(graded.weak_topics.as_deref(), Some("Photosynthesis"));
        assert_eq!(
            graded.improvement_tips,
            Some(vec!["Review the light reactions".to_string()])
        );
        assert_eq!(graded.roll_number, "7");
        assert_eq!(service.calls(), 2);
    }
}
