use serde::{Deserialize, Serialize};

use super::score::GradedAnswer;

/// 单个学生的成绩汇总
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentSummary {
    pub roll_number: String,
    pub total_marks: f64,
    pub marks_awarded: f64,
    /// 百分比（保留两位小数），总分为 0 时为 0
    pub percentage: f64,
    /// 出现次数最多的薄弱知识点（最多 3 个）
    pub common_weak_topics: Vec<String>,
}

/// 全班成绩汇总
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassSummary {
    pub individual_results: Vec<GradedAnswer>,
    pub student_summaries: Vec<StudentSummary>,
    /// 参与汇总的学生的平均百分比
    pub class_average: f64,
    /// 因结果文件缺失或损坏而跳过的文件
    #[serde(default)]
    pub skipped: Vec<String>,
}
