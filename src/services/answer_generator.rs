//! 参考答案生成服务 - 业务能力层

use std::sync::Arc;

use tracing::{debug, warn};

use crate::infrastructure::CompletionService;

pub const NO_ANSWER: &str = "No answer found.";

/// 参考答案生成服务
///
/// 职责：
/// - 按分值决定答案篇幅，请外部模型生成参考答案
/// - 模型不可用、失败或返回空内容时给出 [`NO_ANSWER`]
pub struct AnswerGenerator {
    service: Option<Arc<dyn CompletionService>>,
}

impl AnswerGenerator {
    pub fn new(service: Option<Arc<dyn CompletionService>>) -> Self {
        Self { service }
    }

    /// 分值越高要求的篇幅越长
    pub fn build_prompt(question: &str, marks: f64) -> String {
        let instruction = if marks == 1.0 {
            "Answer this in one precise sentence:"
        } else if marks == 2.0 {
            "Provide an answer in 2-3 sentences:"
        } else if marks == 3.0 {
            "Provide a short answer in 3-4 sentences:"
        } else if marks == 4.0 {
            "Provide a detailed answer in about 5-6 sentences:"
        } else if marks >= 5.0 {
            "Write a comprehensive answer in multiple paragraphs about 500 words:"
        } else {
            "Provide a precise and clear answer:"
        };
        format!("{instruction}\nQ: {question}")
    }

    pub async fn generate(&self, question: &str, marks: f64) -> String {
        let Some(service) = &self.service else {
            return NO_ANSWER.to_string();
        };

        match service.complete(&Self::build_prompt(question, marks), None).await {
            Ok(answer) if !answer.trim().is_empty() => {
                debug!("参考答案长度: {} 字符", answer.len());
                answer.trim().to_string()
            }
            Ok(_) => NO_ANSWER.to_string(),
            Err(e) => {
                warn!("参考答案生成失败: {}", e);
                NO_ANSWER.to_string()
            }
        }
    }
}
