use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 得分来源
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreSource {
    /// 客观题精确匹配
    Exact,
    /// 外部评判服务
    RemoteJudge,
    /// 本地多指标加权
    LocalEnsemble,
}

/// 薄弱知识点诊断结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnosis {
    pub weak_topic: String,
    pub tips: Vec<String>,
}

impl Diagnosis {
    pub const UNKNOWN_TOPIC: &'static str = "Unknown";
    pub const DEFAULT_TIP: &'static str = "No specific tips available.";

    /// 所有解析手段都失败时的兜底诊断
    pub fn unknown() -> Self {
        Self {
            weak_topic: Self::UNKNOWN_TOPIC.to_string(),
            tips: vec![Self::DEFAULT_TIP.to_string()],
        }
    }
}

/// 一道题的评分结果（生成后不再修改，重新批改会生成新的结果）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    /// 得分，始终在 [0, max_marks] 内
    pub awarded: f64,
    pub max_marks: f64,
    /// 各指标原始值（仅本地加权时存在）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breakdown: Option<BTreeMap<String, f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weak_topic: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tips: Option<Vec<String>>,
    pub source: ScoreSource,
}

impl ScoreResult {
    /// 创建评分结果，得分会被限制在 [0, max_marks] 内
    pub fn new(
        awarded: f64,
        max_marks: f64,
        source: ScoreSource,
        breakdown: Option<BTreeMap<String, f64>>,
    ) -> Self {
        Self {
            awarded: clamp_marks(awarded, max_marks),
            max_marks,
            breakdown,
            weak_topic: None,
            tips: None,
            source,
        }
    }

    /// 附加诊断，返回新的结果
    pub fn with_diagnosis(self, diagnosis: Diagnosis) -> Self {
        Self {
            weak_topic: Some(diagnosis.weak_topic),
            tips: Some(diagnosis.tips),
            ..self
        }
    }
}

/// 把任意分数限制到 [0, max_marks]，NaN 视为 0
pub fn clamp_marks(value: f64, max_marks: f64) -> f64 {
    let upper = if max_marks.is_finite() && max_marks > 0.0 {
        max_marks
    } else {
        0.0
    };
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, upper)
}

/// 四舍五入到一位小数
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// 学生结果文件中的一条记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradedAnswer {
    pub roll_number: String,
    pub file_name: String,
    pub question_number: u32,
    pub question: String,
    pub reference_answer: String,
    pub student_answer: String,
    pub marks_awarded: f64,
    pub total_marks: f64,
    pub source: ScoreSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breakdown: Option<BTreeMap<String, f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weak_topics: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub improvement_tips: Option<Vec<String>>,
}
