//! 题型分类服务 - 业务能力层
//!
//! 只负责「判断一道题是什么题型」能力：先问外部模型，失败时用关键词规则

use std::sync::Arc;

use tracing::{debug, warn};

use crate::infrastructure::CompletionService;
use crate::models::QuestionType;

const OBJECTIVE_CUES: &[&str] = &[
    "which of the following",
    "choose",
    "select the",
    "true or false",
    "fill in the blank",
    "(a)",
    "mcq",
];

const OPINION_CUES: &[&str] = &[
    "do you think",
    "your opinion",
    "in your view",
    "do you agree",
    "agree or disagree",
    "do you believe",
    "would you",
    "justify your view",
    "what is your stance",
];

/// 题型分类服务
///
/// 职责：
/// - 请外部模型给出 `MCQ | Descriptive | Opinion-based` 之一
/// - 模型不可用、调用失败或标签无法识别时退回本地关键词规则
/// - 只处理单道题
pub struct QuestionClassifier {
    service: Option<Arc<dyn CompletionService>>,
}

impl QuestionClassifier {
    pub fn new(service: Option<Arc<dyn CompletionService>>) -> Self {
        Self { service }
    }

    fn build_prompt(text: &str) -> String {
        let labels = QuestionType::all_labels().join(", ");
        format!(
            "Classify the following exam question as exactly one of: {labels}.\n\
             Reply with the label only.\n\n\
             Question: {text}"
        )
    }

    /// 分类一道题
    pub async fn classify(&self, text: &str) -> QuestionType {
        let Some(service) = &self.service else {
            return classify_locally(text);
        };

        match service.complete(&Self::build_prompt(text), None).await {
            Ok(response) => match QuestionType::find(&response) {
                Some(question_type) => {
                    debug!("模型分类结果: {} <- '{}'", question_type, response);
                    question_type
                }
                None => {
                    warn!("无法识别的题型标签 '{}'，使用本地规则", response);
                    classify_locally(text)
                }
            },
            Err(e) => {
                warn!("题型分类调用失败，使用本地规则: {}", e);
                classify_locally(text)
            }
        }
    }
}

/// 本地关键词规则：选项/选择类 → 客观题；征询观点类 → 观点题；其余为论述题
pub fn classify_locally(text: &str) -> QuestionType {
    let lower = text.to_lowercase();
    if OPINION_CUES.iter().any(|cue| lower.contains(cue)) {
        QuestionType::OpinionBased
    } else if OBJECTIVE_CUES.iter().any(|cue| lower.contains(cue)) {
        QuestionType::Objective
    } else {
        QuestionType::Descriptive
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::testing::ScriptedCompletion;

    #[test]
    fn test_local_rules() {
        assert_eq!(
            classify_locally("Which of the following is a mammal? (a) shark (b) whale"),
            QuestionType::Objective
        );
        assert_eq!(
            classify_locally("Do you think homework should be banned?"),
            QuestionType::OpinionBased
        );
        assert_eq!(
            classify_locally("Explain the process of photosynthesis."),
            QuestionType::Descriptive
        );
    }

    #[test]
    fn test_offline_classifier_blocking() {
        let classifier = QuestionClassifier::new(None);
        assert_eq!(
            tokio_test::block_on(classifier.classify("Do you agree that exams should be optional?")),
            QuestionType::OpinionBased
        );
    }

    #[tokio::test]
    async fn test_model_label_wins() {
        let classifier = QuestionClassifier::new(Some(Arc::new(ScriptedCompletion::replying(&[
            "Opinion-based",
        ]))));
        assert_eq!(
            classifier.classify("Explain the water cycle.").await,
            QuestionType::OpinionBased
        );
    }

    #[tokio::test]
    async fn test_unrecognized_label_falls_back() {
        let classifier = QuestionClassifier::new(Some(Arc::new(ScriptedCompletion::replying(&[
            "essay",
        ]))));
        assert_eq!(
            classifier.classify("Choose the correct option: 2 + 2 = ?").await,
            QuestionType::Objective
        );

        let offline = QuestionClassifier::new(None);
        assert_eq!(
            offline.classify("Explain the water cycle.").await,
            QuestionType::Descriptive
        );
    }
}
