//! 题目抽取服务 - 业务能力层
//!
//! 只负责「从试卷文本中找出题目」能力

use regex::Regex;
use tracing::{debug, info};

use crate::error::{AppError, AppResult, ExtractionError};
use crate::models::ExtractedQuestion;

/// 匹配 `Question <n> <题干> [<m> marks]`
const QUESTION_PATTERN: &str =
    r"(?i)^question\s*\d+\s*[.:)\-]?\s*(.*?)\s*\[\s*(\d+(?:\.\d+)?)\s*marks?\s*\]";

/// 题目抽取服务
///
/// 职责：
/// - 逐行扫描试卷文本，识别带分值标注的题目行
/// - 按出现顺序编号（从 1 开始），保证题号唯一
/// - 一道题都没找到时返回抽取错误
#[derive(Debug, Default, Clone)]
pub struct QuestionExtractor;

impl QuestionExtractor {
    pub fn new() -> Self {
        Self
    }

    /// 抽取题目
    ///
    /// # 参数
    /// - `document`: 文档名（仅用于错误信息）
    /// - `text`: 试卷全文
    pub fn extract(&self, document: &str, text: &str) -> AppResult<Vec<ExtractedQuestion>> {
        let pattern = Regex::new(QUESTION_PATTERN)
            .map_err(|e| AppError::Other(format!("题目正则无效: {}", e)))?;

        let mut questions = Vec::new();
        for line in text.lines() {
            let line = line.trim();
            let Some(caps) = pattern.captures(line) else {
                continue;
            };

            let number = questions.len() as u32 + 1;
            let body = caps.get(1).map(|m| m.as_str().trim()).unwrap_or("");
            let raw_marks = caps.get(2).map(|m| m.as_str()).unwrap_or("");

            let marks = match raw_marks.parse::<f64>() {
                Ok(m) if m > 0.0 => m,
                _ => {
                    return Err(ExtractionError::InvalidMarks {
                        number,
                        raw: raw_marks.to_string(),
                    }
                    .into())
                }
            };

            debug!("抽取到第 {} 题 ({} 分): {}", number, marks, body);
            questions.push(ExtractedQuestion {
                number,
                text: body.to_string(),
                marks,
            });
        }

        if questions.is_empty() {
            return Err(ExtractionError::NoQuestionsFound {
                document: document.to_string(),
            }
            .into());
        }

        info!("从 {} 中抽取到 {} 道题", document, questions.len());
        Ok(questions)
    }
}
