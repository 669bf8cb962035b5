use serde::{Deserialize, Serialize};

/// 学生对某道题的作答（可能为空：漏答或无法识别）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateAnswer {
    /// 作答顺序（从 0 开始，与题目顺序一一对应）
    pub index: usize,
    pub text: String,
}

/// 一份答题卡的 OCR 文本（每页一段）
#[derive(Debug, Clone, PartialEq)]
pub struct SheetDocument {
    pub file_name: String,
    pub pages: Vec<String>,
    pub file_path: Option<String>,
}

impl SheetDocument {
    pub fn new(file_name: impl Into<String>, pages: Vec<String>) -> Self {
        Self {
            file_name: file_name.into(),
            pages,
            file_path: None,
        }
    }

    /// 不带扩展名的文件名，用于命名结果文件
    pub fn stem(&self) -> &str {
        self.file_name
            .rsplit_once('.')
            .map(|(stem, _)| stem)
            .unwrap_or(&self.file_name)
    }
}

/// 从答题卡中抽取出的全部作答
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerSheet {
    pub roll_number: String,
    pub file_name: String,
    pub answers: Vec<CandidateAnswer>,
}

impl AnswerSheet {
    /// 获取第 `index` 道题的作答，缺失时返回空字符串
    pub fn answer_for(&self, index: usize) -> &str {
        self.answers
            .get(index)
            .map(|a| a.text.as_str())
            .unwrap_or("")
    }
}
