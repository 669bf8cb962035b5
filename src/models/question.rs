use serde::{Deserialize, Serialize};

use super::question_type::QuestionType;

/// 试卷中的一道题（抽取后不可变）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    /// 题号（同一试卷内唯一，从 1 开始）
    pub number: u32,
    pub text: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    #[serde(rename = "marks")]
    pub max_marks: f64,
}

impl Question {
    pub fn new(number: u32, text: impl Into<String>, question_type: QuestionType, max_marks: f64) -> Self {
        Self {
            number,
            text: text.into(),
            question_type,
            max_marks,
        }
    }
}

/// 题目抽取服务的原始输出：尚未分类的题目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedQuestion {
    pub number: u32,
    pub text: String,
    pub marks: f64,
}

/// 答案库中的一条记录：题目 + 参考答案（一一对应）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerKeyEntry {
    pub number: u32,
    pub text: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    pub marks: f64,
    pub reference_answer: String,
}

impl AnswerKeyEntry {
    pub fn new(question: Question, reference_answer: impl Into<String>) -> Self {
        Self {
            number: question.number,
            text: question.text,
            question_type: question.question_type,
            marks: question.max_marks,
            reference_answer: reference_answer.into(),
        }
    }

    pub fn question(&self) -> Question {
        Question::new(self.number, self.text.clone(), self.question_type, self.marks)
    }
}

/// 答案库（TOML 文件的顶层结构）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnswerKey {
    #[serde(default)]
    pub questions: Vec<AnswerKeyEntry>,
    #[serde(skip_serializing, skip_deserializing)]
    pub file_path: Option<String>,
}

impl AnswerKey {
    pub fn new(questions: Vec<AnswerKeyEntry>) -> Self {
        Self {
            questions,
            file_path: None,
        }
    }

    /// 全卷总分
    pub fn total_marks(&self) -> f64 {
        self.questions.iter().map(|q| q.marks).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_answer_key_toml_roundtrip_accepts_integer_marks() {
        let raw = r#"
[[questions]]
number = 1
text = "Capital of France?"
type = "MCQ"
marks = 1
reference_answer = "Paris"

[[questions]]
number = 2
text = "Explain photosynthesis."
type = "Descriptive"
marks = 5
reference_answer = "Photosynthesis converts light to energy."
"#;
        let key: AnswerKey = toml::from_str(raw).unwrap();
        assert_eq!(key.len(), 2);
        assert_eq!(key.questions[0].question_type, QuestionType::Objective);
        assert_eq!(key.total_marks(), 6.0);
        assert_eq!(key.questions[1].question().max_marks, 5.0);
    }
}
