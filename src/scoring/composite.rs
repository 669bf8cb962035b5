use std::collections::BTreeMap;
use std::sync::Arc;

use crate::metrics::{MetricLibrary, MetricName};
use crate::models::{clamp_marks, round1};

use super::weights::{WeightTable, WeightTables};

/// 加权平均：`Σ(指标值 × 权重) / Σ(权重)`
///
/// 指标值先截断到 [0, 1]；表中缺失的指标按 0 计。权重总和为 0 时结果为 0。
pub fn weighted_average(values: &BTreeMap<MetricName, f64>, table: &WeightTable) -> f64 {
    let total_weight = table.total_weight();
    if total_weight <= 0.0 {
        return 0.0;
    }

    let weighted_sum: f64 = table
        .iter()
        .map(|(metric, weight)| {
            let value = values.get(&metric).copied().unwrap_or(0.0);
            let value = if value.is_finite() { value.clamp(0.0, 1.0) } else { 0.0 };
            value * weight
        })
        .sum();

    (weighted_sum / total_weight).clamp(0.0, 1.0)
}

/// 加权得分换算为分数：`round(加权得分 × 满分, 1)`，再截断到 [0, 满分]
pub fn marks_from_weighted(weighted_score: f64, max_marks: f64) -> f64 {
    clamp_marks(round1(weighted_score * max_marks), max_marks)
}

/// 一次本地加权计算的结果
#[derive(Debug, Clone, PartialEq)]
pub struct CompositeOutcome {
    pub weighted_score: f64,
    pub awarded: f64,
    pub breakdown: BTreeMap<MetricName, f64>,
}

impl CompositeOutcome {
    /// 以指标名字符串为键的明细，用于输出
    pub fn named_breakdown(&self) -> BTreeMap<String, f64> {
        self.breakdown
            .iter()
            .map(|(m, v)| (m.as_str().to_string(), *v))
            .collect()
    }
}

/// 组合评分器：在构造时拿到指标库和不可变的权重表
#[derive(Debug, Clone)]
pub struct CompositeScorer {
    library: MetricLibrary,
    tables: Arc<WeightTables>,
}

impl CompositeScorer {
    pub fn new(library: MetricLibrary, tables: Arc<WeightTables>) -> Self {
        Self { library, tables }
    }

    pub fn tables(&self) -> &WeightTables {
        &self.tables
    }

    /// 按给定权重表计算参考答案与学生答案的加权得分
    pub fn score(
        &self,
        table: &WeightTable,
        reference: &str,
        candidate: &str,
        max_marks: f64,
    ) -> CompositeOutcome {
        let breakdown = self
            .library
            .evaluate_all(table.metrics(), reference, candidate);
        let weighted_score = weighted_average(&breakdown, table);

        CompositeOutcome {
            weighted_score,
            awarded: marks_from_weighted(weighted_score, max_marks),
            breakdown,
        }
    }
}

impl Default for CompositeScorer {
    fn default() -> Self {
        Self::new(MetricLibrary::shared(), Arc::new(WeightTables::default()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn values(pairs: &[(MetricName, f64)]) -> BTreeMap<MetricName, f64> {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_weighted_average_basic() {
        let table = WeightTable::new(
            "t",
            [(MetricName::Coherence, 0.75), (MetricName::Relevance, 0.25)],
        )
        .unwrap();
        let v = values(&[(MetricName::Coherence, 1.0), (MetricName::Relevance, 0.0)]);
        assert!((weighted_average(&v, &table) - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_marks_rounding_and_clamp() {
        assert_eq!(marks_from_weighted(0.3375, 5.0), 1.7);
        assert_eq!(marks_from_weighted(1.0, 5.0), 5.0);
        assert_eq!(marks_from_weighted(0.0, 5.0), 0.0);
        assert_eq!(marks_from_weighted(1.0, 0.0), 0.0);
    }

    #[test]
    fn test_empty_candidate_descriptive_floor() {
        let scorer = CompositeScorer::default();
        let outcome = scorer.score(
            &scorer.tables().descriptive,
            "Photosynthesis converts light to energy.",
            "",
            5.0,
        );
        // 空答案只剩下各指标的空输入默认值：
        // 情感 0.5、朴素贝叶斯 0.5、连贯性 1、语法 1、事实一致性 1、可读性 0.75、逻辑流畅度 0.5
        assert!((outcome.weighted_score - 0.3375).abs() < 1e-9);
        assert_eq!(outcome.awarded, 1.7);
        assert_eq!(outcome.breakdown.len(), 16);
    }

    #[test]
    fn test_identical_answer_scores_high() {
        let scorer = CompositeScorer::default();
        let text = "Photosynthesis converts light energy into chemical energy stored in glucose.";
        let outcome = scorer.score(&scorer.tables().descriptive, text, text, 10.0);
        assert!(outcome.awarded >= 7.0, "awarded = {}", outcome.awarded);
    }

    proptest! {
        #[test]
        fn prop_rescaling_weights_does_not_change_score(
            raw in prop::collection::vec((0.0f64..=1.0, 0.01f64..=5.0), 5),
            factor in 0.001f64..1000.0,
        ) {
            let metrics = [
                MetricName::SentimentAlignment,
                MetricName::Coherence,
                MetricName::LogicalFlow,
                MetricName::GrammaticalAccuracy,
                MetricName::Relevance,
            ];
            let v: BTreeMap<MetricName, f64> =
                metrics.iter().zip(&raw).map(|(m, (value, _))| (*m, *value)).collect();
            let base = WeightTable::new(
                "base",
                metrics.iter().zip(&raw).map(|(m, (_, w))| (*m, *w)),
            ).unwrap();
            let scaled = WeightTable::new(
                "scaled",
                metrics.iter().zip(&raw).map(|(m, (_, w))| (*m, *w * factor)),
            ).unwrap();

            let a = weighted_average(&v, &base);
            let b = weighted_average(&v, &scaled);
            prop_assert!((a - b).abs() < 1e-9);
        }

        #[test]
        fn prop_awarded_within_bounds(score in -10.0f64..10.0, max_marks in 0.0f64..100.0) {
            let awarded = marks_from_weighted(score, max_marks);
            prop_assert!(awarded >= 0.0 && awarded <= max_marks);
        }
    }
}
