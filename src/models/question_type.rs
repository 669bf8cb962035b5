/// 题型枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum QuestionType {
    /// 客观题（选择题等），只判对错
    #[serde(rename = "MCQ", alias = "Objective", alias = "mcq")]
    Objective,
    /// 论述题
    #[serde(rename = "Descriptive", alias = "descriptive")]
    Descriptive,
    /// 观点题
    #[serde(rename = "Opinion-based", alias = "OpinionBased", alias = "opinion-based")]
    OpinionBased,
}

impl QuestionType {
    /// 获取标准标签（与答案库文件中的写法一致）
    pub fn label(self) -> &'static str {
        match self {
            QuestionType::Objective => "MCQ",
            QuestionType::Descriptive => "Descriptive",
            QuestionType::OpinionBased => "Opinion-based",
        }
    }

    /// 所有题型标签，用于分类提示词
    pub fn all_labels() -> [&'static str; 3] {
        [
            QuestionType::Objective.label(),
            QuestionType::Descriptive.label(),
            QuestionType::OpinionBased.label(),
        ]
    }

    /// 尝试从字符串解析题型（精确匹配，忽略大小写）
    pub fn from_label(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "mcq" | "objective" => Some(QuestionType::Objective),
            "descriptive" => Some(QuestionType::Descriptive),
            "opinion-based" | "opinion based" | "opinionbased" | "opinion" => {
                Some(QuestionType::OpinionBased)
            }
            _ => None,
        }
    }

    /// 智能查找题型（支持模糊匹配，例如 LLM 返回 "Type: Opinion-based."）
    pub fn find(s: &str) -> Option<Self> {
        // 先尝试精确匹配
        if let Some(question_type) = Self::from_label(s) {
            return Some(question_type);
        }

        // 模糊匹配
        let s_lower = s.to_lowercase();
        if s_lower.contains("opinion") {
            return Some(QuestionType::OpinionBased);
        }
        if s_lower.contains("mcq") || s_lower.contains("objective") || s_lower.contains("multiple choice") {
            return Some(QuestionType::Objective);
        }
        if s_lower.contains("descriptive") {
            return Some(QuestionType::Descriptive);
        }

        None
    }
}

impl std::fmt::Display for QuestionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}
