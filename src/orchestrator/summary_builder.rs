//! 全班汇总 - 编排层
//!
//! 从结果文件重新读取每个学生的评分记录并汇总；缺失或损坏的结果文件跳过，
//! 不影响其他学生。

use std::collections::HashMap;

use tracing::{info, warn};

use crate::models::{ClassSummary, Diagnosis, GradedAnswer, StudentSummary};
use crate::services::ReportWriter;

const TOP_WEAK_TOPICS: usize = 3;

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// 百分比，总分为 0 时为 0
pub fn percentage(awarded: f64, total: f64) -> f64 {
    if total > 0.0 {
        round2(awarded / total * 100.0)
    } else {
        0.0
    }
}

/// 出现次数最多的薄弱知识点，次数相同时按首次出现的顺序
pub fn common_weak_topics(results: &[GradedAnswer], limit: usize) -> Vec<String> {
    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();

    for topic in results
        .iter()
        .filter_map(|r| r.weak_topics.as_deref())
        .map(str::trim)
        .filter(|t| !t.is_empty() && *t != Diagnosis::UNKNOWN_TOPIC)
    {
        let count = counts.entry(topic).or_insert(0);
        if *count == 0 {
            order.push(topic);
        }
        *count += 1;
    }

    // 稳定排序保留首次出现顺序
    order.sort_by(|a, b| counts[b].cmp(&counts[a]));
    order.into_iter().take(limit).map(str::to_string).collect()
}

pub fn summarize_student(results: &[GradedAnswer]) -> StudentSummary {
    let total_marks: f64 = results.iter().map(|r| r.total_marks).sum();
    let marks_awarded: f64 = results.iter().map(|r| r.marks_awarded).sum();
    let roll_number = results
        .first()
        .map(|r| r.roll_number.clone())
        .unwrap_or_default();

    StudentSummary {
        roll_number,
        total_marks,
        marks_awarded,
        percentage: percentage(marks_awarded, total_marks),
        common_weak_topics: common_weak_topics(results, TOP_WEAK_TOPICS),
    }
}

/// 汇总给定答题卡（按文件名 stem）的结果文件
pub async fn build_class_summary(writer: &ReportWriter, stems: &[String]) -> ClassSummary {
    let mut summary = ClassSummary::default();

    for stem in stems {
        match writer.read_student_results(stem).await {
            Ok(results) => {
                summary.student_summaries.push(summarize_student(&results));
                summary.individual_results.extend(results);
            }
            Err(e) => {
                warn!("⚠️ 跳过 {}: {}", stem, e);
                summary.skipped.push(stem.clone());
            }
        }
    }

    if !summary.student_summaries.is_empty() {
        let sum: f64 = summary.student_summaries.iter().map(|s| s.percentage).sum();
        summary.class_average = round2(sum / summary.student_summaries.len() as f64);
    }

    info!(
        "全班汇总: {} 名学生，跳过 {} 份，平均 {:.2}%",
        summary.student_summaries.len(),
        summary.skipped.len(),
        summary.class_average
    );

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ScoreSource;

    fn graded(roll: &str, awarded: f64, total: f64, topic: Option<&str>) -> GradedAnswer {
        GradedAnswer {
            roll_number: roll.to_string(),
            file_name: format!("{roll}.txt"),
            question_number: 1,
            question: "Q".to_string(),
            reference_answer: "R".to_string(),
            student_answer: "A".to_string(),
            marks_awarded: awarded,
            total_marks: total,
            source: ScoreSource::LocalEnsemble,
            breakdown: None,
            weak_topics: topic.map(str::to_string),
            improvement_tips: None,
        }
    }

    #[test]
    fn test_percentage_handles_zero_total() {
        assert_eq!(percentage(3.0, 0.0), 0.0);
        assert_eq!(percentage(2.0, 3.0), 66.67);
    }

    #[test]
    fn test_common_weak_topics_order() {
        let results = vec![
            graded("1", 0.0, 1.0, Some("Cells")),
            graded("1", 0.0, 1.0, Some("Osmosis")),
            graded("1", 0.0, 1.0, Some("Osmosis")),
            graded("1", 0.0, 1.0, Some("Unknown")),
            graded("1", 0.0, 1.0, Some("Energy")),
            graded("1", 0.0, 1.0, Some("Genetics")),
        ];
        assert_eq!(
            common_weak_topics(&results, 3),
            vec!["Osmosis", "Cells", "Energy"]
        );
    }

    #[tokio::test]
    async fn test_missing_file_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let writer = ReportWriter::new(dir.path());
        writer
            .write_student_results("a", &[graded("1", 4.0, 5.0, None), graded("1", 1.0, 5.0, Some("Cells"))])
            .await
            .unwrap();
        writer
            .write_student_results("b", &[graded("2", 3.0, 10.0, None)])
            .await
            .unwrap();

        let summary = build_class_summary(
            &writer,
            &["a".to_string(), "missing".to_string(), "b".to_string()],
        )
        .await;

        assert_eq!(summary.student_summaries.len(), 2);
        assert_eq!(summary.skipped, vec!["missing".to_string()]);
        assert_eq!(summary.individual_results.len(), 3);
        assert_eq!(summary.student_summaries[0].percentage, 50.0);
        assert_eq!(summary.student_summaries[0].common_weak_topics, vec!["Cells"]);
        assert_eq!(summary.student_summaries[1].percentage, 30.0);
        assert_eq!(summary.class_average, 40.0);
    }
}
