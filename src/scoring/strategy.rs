//! 评分策略
//!
//! 「先外部评判、失败再本地加权」被建模为两个策略对象加一个兜底组合器：
//!
//! ```text
//! Fallback(RemoteJudge, LocalEnsemble)
//!     ├─ RemoteJudge   失败 / 超时 / 无法解析 → Err
//!     └─ LocalEnsemble 永不失败
//! ```

use std::sync::Arc;

use futures::future::BoxFuture;
use tracing::{debug, warn};

use crate::error::{AppResult, JudgeError};
use crate::infrastructure::CompletionService;
use crate::models::{Question, QuestionType, ScoreResult, ScoreSource};
use crate::text::canonical_text;

use super::composite::CompositeScorer;

/// 一次评分请求（题目、参考答案、学生答案）
#[derive(Debug, Clone, Copy)]
pub struct ScoringRequest<'a> {
    pub question: &'a Question,
    pub reference: &'a str,
    pub candidate: &'a str,
}

impl<'a> ScoringRequest<'a> {
    pub fn new(question: &'a Question, reference: &'a str, candidate: &'a str) -> Self {
        Self {
            question,
            reference,
            candidate,
        }
    }

    pub fn max_marks(&self) -> f64 {
        self.question.max_marks
    }
}

/// 评分策略
pub trait MarkScorer: Send + Sync {
    fn score<'a>(&'a self, request: ScoringRequest<'a>) -> BoxFuture<'a, AppResult<ScoreResult>>;

    fn name(&self) -> &'static str;
}

// ========== 客观题 ==========

/// 客观题精确比对：规范化后一致得满分，否则 0 分，没有部分分
#[derive(Debug, Default, Clone)]
pub struct ExactAnswer;

impl ExactAnswer {
    pub fn evaluate(&self, request: ScoringRequest<'_>) -> ScoreResult {
        let candidate = canonical_text(request.candidate);
        let matched = !candidate.is_empty() && candidate == canonical_text(request.reference);
        let awarded = if matched { request.max_marks() } else { 0.0 };
        ScoreResult::new(awarded, request.max_marks(), ScoreSource::Exact, None)
    }
}

impl MarkScorer for ExactAnswer {
    fn score<'a>(&'a self, request: ScoringRequest<'a>) -> BoxFuture<'a, AppResult<ScoreResult>> {
        let result = self.evaluate(request);
        Box::pin(async move { Ok(result) })
    }

    fn name(&self) -> &'static str {
        "exact"
    }
}

// ========== 外部评判 ==========

const JUDGE_SYSTEM_PROMPT: &str =
    "You are a strict but fair examiner. You always reply with a single number and nothing else.";

/// 外部评判：把评分细则写进提示词，要求对方只返回一个数字
pub struct RemoteJudge {
    service: Arc<dyn CompletionService>,
}

impl RemoteJudge {
    pub fn new(service: Arc<dyn CompletionService>) -> Self {
        Self { service }
    }

    /// 构建评分提示词
    pub fn build_prompt(request: &ScoringRequest<'_>) -> String {
        let question = request.question;
        let criteria = match question.question_type {
            QuestionType::OpinionBased => {
                "1. Sentiment match: does the student's sentiment align with the reference answer?\n\
                 2. Coherence: is the answer logically structured and easy to understand?\n\
                 3. Logical flow: are ideas presented in a logical sequence?\n\
                 4. Grammatical accuracy: is the answer free of grammatical errors?\n\
                 5. Relevance: does the answer stay relevant to the question?"
            }
            QuestionType::Descriptive => {
                "1. Accuracy: are the stated facts correct compared with the reference answer?\n\
                 2. Coverage: does the answer include the key concepts and technical terms?\n\
                 3. Structure: is the answer coherent, well ordered and grammatically sound?\n\
                 4. Relevance: does the answer stay on the question?"
            }
            QuestionType::Objective => {
                "Award full marks only if the student's choice matches the reference answer, otherwise 0."
            }
        };

        format!(
            "Evaluate the student's {kind} answer against the reference answer using these criteria:\n\
             {criteria}\n\n\
             Question: {question_text}\n\
             Reference Answer: {reference}\n\
             Student Answer: {candidate}\n\n\
             Provide a score between 0 and {max} based on the criteria above. \
             Return only the score as a number.",
            kind = question.question_type,
            criteria = criteria,
            question_text = question.text,
            reference = request.reference,
            candidate = request.candidate,
            max = question.max_marks,
        )
    }

    /// 解析评判返回：整个响应（去掉首尾空白）必须是一个有限数字
    pub fn parse_score(response: &str) -> Result<f64, JudgeError> {
        let trimmed = response.trim();
        match trimmed.parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(value),
            _ => Err(JudgeError::UnparsableScore {
                response: trimmed.to_string(),
            }),
        }
    }
}

impl MarkScorer for RemoteJudge {
    fn score<'a>(&'a self, request: ScoringRequest<'a>) -> BoxFuture<'a, AppResult<ScoreResult>> {
        Box::pin(async move {
            let prompt = Self::build_prompt(&request);
            let response = self
                .service
                .complete(&prompt, Some(JUDGE_SYSTEM_PROMPT))
                .await?;

            let value = Self::parse_score(&response)?;
            let max_marks = request.max_marks();
            if value < 0.0 || value > max_marks {
                warn!(
                    "第 {} 题评判分数 {} 超出范围 [0, {}]，已截断",
                    request.question.number, value, max_marks
                );
            }
            debug!("第 {} 题外部评判得分: {}", request.question.number, value);

            Ok(ScoreResult::new(value, max_marks, ScoreSource::RemoteJudge, None))
        })
    }

    fn name(&self) -> &'static str {
        "remote_judge"
    }
}

// ========== 本地加权 ==========

/// 本地多指标加权：观点题用观点题权重表，其余用论述题权重表
#[derive(Debug, Clone, Default)]
pub struct LocalEnsemble {
    composite: CompositeScorer,
}

impl LocalEnsemble {
    pub fn new(composite: CompositeScorer) -> Self {
        Self { composite }
    }

    /// 本地评分不会失败
    pub fn evaluate(&self, request: ScoringRequest<'_>) -> ScoreResult {
        let tables = self.composite.tables();
        let table = match request.question.question_type {
            QuestionType::OpinionBased => &tables.opinion,
            _ => &tables.descriptive,
        };

        let outcome = self.composite.score(
            table,
            request.reference,
            request.candidate,
            request.max_marks(),
        );
        debug!(
            "第 {} 题本地加权: {:.4} -> {} 分",
            request.question.number, outcome.weighted_score, outcome.awarded
        );

        ScoreResult::new(
            outcome.awarded,
            request.max_marks(),
            ScoreSource::LocalEnsemble,
            Some(outcome.named_breakdown()),
        )
    }
}

impl MarkScorer for LocalEnsemble {
    fn score<'a>(&'a self, request: ScoringRequest<'a>) -> BoxFuture<'a, AppResult<ScoreResult>> {
        let result = self.evaluate(request);
        Box::pin(async move { Ok(result) })
    }

    fn name(&self) -> &'static str {
        "local_ensemble"
    }
}

// ========== 兜底组合器 ==========

/// 先用主策略，主策略出错时改用备用策略
pub struct Fallback {
    primary: Arc<dyn MarkScorer>,
    secondary: Arc<dyn MarkScorer>,
}

impl Fallback {
    pub fn new(primary: Arc<dyn MarkScorer>, secondary: Arc<dyn MarkScorer>) -> Self {
        Self { primary, secondary }
    }
}

impl MarkScorer for Fallback {
    fn score<'a>(&'a self, request: ScoringRequest<'a>) -> BoxFuture<'a, AppResult<ScoreResult>> {
        Box::pin(async move {
            match self.primary.score(request).await {
                Ok(result) => Ok(result),
                Err(e) => {
                    warn!(
                        "第 {} 题 {} 失败，改用 {}: {}",
                        request.question.number,
                        self.primary.name(),
                        self.secondary.name(),
                        e
                    );
                    self.secondary.score(request).await
                }
            }
        })
    }

    fn name(&self) -> &'static str {
        "fallback"
    }
}
