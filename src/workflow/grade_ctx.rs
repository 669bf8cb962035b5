//! 评分上下文
//!
//! 封装"我正在批改哪份答题卡的第几题"这一信息

use std::fmt::Display;

/// 评分上下文
#[derive(Debug, Clone)]
pub struct GradeCtx {
    /// 答题卡文件名
    pub file_name: String,

    /// 学号
    pub roll_number: String,

    /// 答题卡序号（仅用于日志显示）
    pub sheet_index: usize,

    /// 题号
    pub question_number: u32,
}

impl GradeCtx {
    pub fn new(
        file_name: impl Into<String>,
        roll_number: impl Into<String>,
        sheet_index: usize,
        question_number: u32,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            roll_number: roll_number.into(),
            sheet_index,
            question_number,
        }
    }
}

impl Display for GradeCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[答题卡 {} 学号#{} 题目#{}]",
            self.file_name, self.roll_number, self.question_number
        )
    }
}
