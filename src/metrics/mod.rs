//! 指标库
//!
//! 每个指标都是 (参考答案, 学生答案) -> [0, 1] 的纯函数，单文本指标只看学生答案。
//! 指标内部出现非有限值或外部组件（向量化器、语法检查器）失败时，
//! 返回该指标的默认值而不是报错，保证评分流程不会因为单个指标中断。

pub mod entities;
pub mod grammar;
pub mod lexical;
pub mod semantic;
pub mod style;
pub mod vector;

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::warn;

pub use grammar::{GrammarChecker, RuleBasedGrammarChecker};
pub use semantic::{shared_embedder, Embedder, HashingEmbedder};

/// 指标名称
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricName {
    ExactMatch,
    PartialMatch,
    LexicalSimilarity,
    SemanticSimilarity,
    Sentiment,
    SentimentAlignment,
    NaiveBayesConfidence,
    Coherence,
    Relevance,
    GrammaticalAccuracy,
    KeywordCoverage,
    FactualConsistency,
    StructuralSimilarity,
    Readability,
    ConceptOrdering,
    TechnicalAccuracy,
    LogicalFlow,
}

impl MetricName {
    pub const ALL: [MetricName; 17] = [
        MetricName::ExactMatch,
        MetricName::PartialMatch,
        MetricName::LexicalSimilarity,
        MetricName::SemanticSimilarity,
        MetricName::Sentiment,
        MetricName::SentimentAlignment,
        MetricName::NaiveBayesConfidence,
        MetricName::Coherence,
        MetricName::Relevance,
        MetricName::GrammaticalAccuracy,
        MetricName::KeywordCoverage,
        MetricName::FactualConsistency,
        MetricName::StructuralSimilarity,
        MetricName::Readability,
        MetricName::ConceptOrdering,
        MetricName::TechnicalAccuracy,
        MetricName::LogicalFlow,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MetricName::ExactMatch => "exact_match",
            MetricName::PartialMatch => "partial_match",
            MetricName::LexicalSimilarity => "lexical_similarity",
            MetricName::SemanticSimilarity => "semantic_similarity",
            MetricName::Sentiment => "sentiment",
            MetricName::SentimentAlignment => "sentiment_alignment",
            MetricName::NaiveBayesConfidence => "naive_bayes_confidence",
            MetricName::Coherence => "coherence",
            MetricName::Relevance => "relevance",
            MetricName::GrammaticalAccuracy => "grammatical_accuracy",
            MetricName::KeywordCoverage => "keyword_coverage",
            MetricName::FactualConsistency => "factual_consistency",
            MetricName::StructuralSimilarity => "structural_similarity",
            MetricName::Readability => "readability",
            MetricName::ConceptOrdering => "concept_ordering",
            MetricName::TechnicalAccuracy => "technical_accuracy",
            MetricName::LogicalFlow => "logical_flow",
        }
    }

    /// 计算失败时的默认值
    pub fn fallback(&self) -> f64 {
        match self {
            MetricName::GrammaticalAccuracy => grammar::GRAMMAR_FALLBACK_SCORE,
            MetricName::Sentiment
            | MetricName::SentimentAlignment
            | MetricName::NaiveBayesConfidence
            | MetricName::LogicalFlow => 0.5,
            MetricName::Readability => 0.75,
            MetricName::Coherence => 1.0,
            _ => 0.0,
        }
    }
}

impl fmt::Display for MetricName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MetricName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        MetricName::ALL
            .into_iter()
            .find(|m| m.as_str() == name)
            .ok_or_else(|| format!("未知指标: {name}"))
    }
}

/// 指标库：持有需要预先加载的组件，可跨任务克隆共享
#[derive(Clone)]
pub struct MetricLibrary {
    embedder: Arc<dyn Embedder>,
    grammar: Arc<dyn GrammarChecker>,
}

impl MetricLibrary {
    pub fn new(embedder: Arc<dyn Embedder>, grammar: Arc<dyn GrammarChecker>) -> Self {
        Self { embedder, grammar }
    }

    /// 使用进程共享的向量化器和规则语法检查器
    pub fn shared() -> Self {
        Self::new(shared_embedder(), Arc::new(RuleBasedGrammarChecker))
    }

    pub fn evaluate(&self, metric: MetricName, reference: &str, candidate: &str) -> f64 {
        let raw = match metric {
            MetricName::ExactMatch => lexical::exact_match(reference, candidate),
            MetricName::PartialMatch => lexical::partial_match(reference, candidate),
            MetricName::LexicalSimilarity => vector::lexical_similarity(reference, candidate),
            MetricName::SemanticSimilarity => {
                match semantic::semantic_similarity(self.embedder.as_ref(), reference, candidate)
                {
                    Ok(v) => v,
                    Err(e) => {
                        warn!("向量化器 {} 失败: {}", self.embedder.name(), e);
                        metric.fallback()
                    }
                }
            }
            MetricName::Sentiment => style::sentiment(candidate),
            MetricName::SentimentAlignment => style::sentiment_alignment(reference, candidate),
            MetricName::NaiveBayesConfidence => {
                vector::naive_bayes_confidence(reference, candidate)
            }
            MetricName::Coherence => style::coherence(candidate),
            MetricName::Relevance => lexical::relevance(reference, candidate),
            MetricName::GrammaticalAccuracy => {
                grammar::grammatical_accuracy(self.grammar.as_ref(), candidate)
            }
            MetricName::KeywordCoverage => lexical::keyword_coverage(reference, candidate),
            MetricName::FactualConsistency => entities::factual_consistency(reference, candidate),
            MetricName::StructuralSimilarity => {
                lexical::structural_similarity(reference, candidate)
            }
            MetricName::Readability => style::readability(candidate),
            MetricName::ConceptOrdering => lexical::concept_ordering(reference, candidate),
            MetricName::TechnicalAccuracy => entities::technical_accuracy(reference, candidate),
            MetricName::LogicalFlow => style::logical_flow(candidate),
        };

        sanitize(metric, raw)
    }

    /// 计算一组指标
    pub fn evaluate_all<I>(&self, metrics: I, reference: &str, candidate: &str) -> BTreeMap<MetricName, f64>
    where
        I: IntoIterator<Item = MetricName>,
    {
        metrics
            .into_iter()
            .map(|m| (m, self.evaluate(m, reference, candidate)))
            .collect()
    }
}

impl Default for MetricLibrary {
    fn default() -> Self {
        Self::shared()
    }
}

impl fmt::Debug for MetricLibrary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetricLibrary")
            .field("embedder", &self.embedder.name())
            .finish()
    }
}

fn sanitize(metric: MetricName, value: f64) -> f64 {
    if !value.is_finite() {
        warn!("指标 {} 得到非有限值 {}，使用默认值", metric, value);
        return metric.fallback();
    }
    value.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{AppError, AppResult};

    struct FailingEmbedder;

    impl Embedder for FailingEmbedder {
        fn embed(&self, _text: &str) -> AppResult<Vec<f32>> {
            Err(AppError::Other("model not loaded".to_string()))
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    #[test]
    fn test_metric_name_round_trip() {
        for metric in MetricName::ALL {
            assert_eq!(metric.as_str().parse::<MetricName>().unwrap(), metric);
        }
        assert!("enhanced_sentence_match".parse::<MetricName>().is_err());
    }

    #[test]
    fn test_all_metrics_stay_in_unit_range() {
        let library = MetricLibrary::shared();
        let reference = "Photosynthesis converts light energy into chemical energy in 1 step.";
        let samples = [
            "",
            "   ",
            "Plants use sunlight. They make sugar and oxygen!",
            "photosynthesis photosynthesis photosynthesis",
            "It is not a terrible idea, i think the the answer is 42 .",
        ];
        for candidate in samples {
            for (metric, value) in library.evaluate_all(MetricName::ALL, reference, candidate) {
                assert!((0.0..=1.0).contains(&value), "{metric} = {value} for {candidate:?}");
            }
        }
    }

    #[test]
    fn test_embedder_failure_falls_back() {
        let library = MetricLibrary::new(Arc::new(FailingEmbedder), Arc::new(RuleBasedGrammarChecker));
        assert_eq!(
            library.evaluate(MetricName::SemanticSimilarity, "light", "light"),
            0.0
        );
    }

    #[test]
    fn test_sanitize_non_finite() {
        assert_eq!(sanitize(MetricName::Coherence, f64::NAN), 1.0);
        assert_eq!(sanitize(MetricName::ExactMatch, 1.5), 1.0);
        assert_eq!(sanitize(MetricName::ExactMatch, -0.5), 0.0);
    }
}
