//! 作答抽取服务 - 业务能力层
//!
//! 只负责「从答题卡 OCR 文本中切分出每道题的作答」能力。
//! 切分规则是脆弱的模式匹配，所以放在 [`AnswerExtractor`] 接口后面，可以整体替换。

use regex::Regex;
use tracing::debug;

use crate::error::{AppError, AppResult, ExtractionError};
use crate::models::{AnswerSheet, CandidateAnswer, SheetDocument};

pub const UNKNOWN_ROLL_NUMBER: &str = "Unknown";

const ROLL_NUMBER_MARKER: &str = "Roll Number";
/// 作答标签：Ans / Ans. / Ans 3) / Answer 2: ...
const ANSWER_LABEL_PATTERN: &str = r"(?i)^ans(?:wer)?\s*\.?\s*(?:\d+)?\s*[:.)\-]?\s*";

/// 从答题卡中抽取学号与有序作答
pub trait AnswerExtractor: Send + Sync {
    fn extract(&self, document: &SheetDocument) -> AppResult<AnswerSheet>;
}

/// 默认实现：以 "Ans" 开头的行作为新作答的起点
///
/// - 学号取第一页 `Roll Number` 所在行的最后一个词，缺失时为 `Unknown`
/// - 第一个作答标签之前的行视为卷头，忽略
/// - 跨页的续行归入上一条作答
/// - 作答标签本身会被去掉
#[derive(Debug, Default, Clone)]
pub struct AnsPrefixExtractor;

impl AnsPrefixExtractor {
    pub fn new() -> Self {
        Self
    }

    /// 读取学号
    pub fn roll_number(first_page: &str) -> String {
        first_page
            .split_once(ROLL_NUMBER_MARKER)
            .and_then(|(_, rest)| rest.lines().next())
            .and_then(|line| line.split_whitespace().last())
            .map(|token| token.trim_matches(|c: char| matches!(c, ':' | '-' | '#' | '.')))
            .filter(|token| !token.is_empty())
            .unwrap_or(UNKNOWN_ROLL_NUMBER)
            .to_string()
    }
}

impl AnswerExtractor for AnsPrefixExtractor {
    fn extract(&self, document: &SheetDocument) -> AppResult<AnswerSheet> {
        let Some(first_page) = document.pages.first() else {
            return Err(ExtractionError::EmptySheet {
                document: document.file_name.clone(),
            }
            .into());
        };

        let label = Regex::new(ANSWER_LABEL_PATTERN)
            .map_err(|e| AppError::Other(format!("作答标签正则无效: {}", e)))?;

        let roll_number = Self::roll_number(first_page);

        let mut answers: Vec<Vec<String>> = Vec::new();
        for page in &document.pages {
            for line in page.lines().map(str::trim).filter(|l| !l.is_empty()) {
                if line.to_lowercase().starts_with("ans") {
                    let body = label.replace(line, "").trim().to_string();
                    answers.push(if body.is_empty() { Vec::new() } else { vec![body] });
                } else if let Some(current) = answers.last_mut() {
                    current.push(line.to_string());
                }
            }
        }

        let answers: Vec<CandidateAnswer> = answers
            .into_iter()
            .enumerate()
            .map(|(index, lines)| CandidateAnswer {
                index,
                text: lines.join(" ").trim().to_string(),
            })
            .collect();

        debug!(
            "答题卡 {} (学号 {}) 切分出 {} 条作答",
            document.file_name,
            roll_number,
            answers.len()
        );

        Ok(AnswerSheet {
            roll_number,
            file_name: document.file_name.clone(),
            answers,
        })
    }
}
