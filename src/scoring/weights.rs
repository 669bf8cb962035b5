//! 权重表
//!
//! 权重表是不可变的配置数据：构造时校验，之后只读。
//! 默认表内置；也可以从 TOML 文件加载：
//!
//! ```toml
//! [descriptive]
//! exact_match = 0.08
//! semantic_similarity = 0.06
//!
//! [opinion]
//! sentiment_alignment = 0.1
//! coherence = 0.3
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use tracing::info;

use crate::error::{AppError, AppResult, ConfigError};
use crate::metrics::MetricName;

/// 单个题型的权重表（有序）
#[derive(Debug, Clone, PartialEq)]
pub struct WeightTable {
    name: String,
    entries: Vec<(MetricName, f64)>,
}

impl WeightTable {
    /// 创建并校验权重表：权重非负、总和大于零、指标不重复
    pub fn new(
        name: impl Into<String>,
        entries: impl IntoIterator<Item = (MetricName, f64)>,
    ) -> Result<Self, ConfigError> {
        let name = name.into();
        let mut seen: BTreeMap<MetricName, f64> = BTreeMap::new();
        let mut ordered = Vec::new();

        for (metric, weight) in entries {
            if !weight.is_finite() || weight < 0.0 {
                return Err(ConfigError::NegativeWeight {
                    table: name,
                    metric: metric.to_string(),
                    weight,
                });
            }
            if seen.insert(metric, weight).is_none() {
                ordered.push((metric, weight));
            } else if let Some(entry) = ordered.iter_mut().find(|(m, _)| *m == metric) {
                // 重复出现时以后者为准
                entry.1 = weight;
            }
        }

        let total: f64 = ordered.iter().map(|(_, w)| w).sum();
        if total <= 0.0 {
            return Err(ConfigError::ZeroWeightSum { table: name });
        }

        Ok(Self {
            name,
            entries: ordered,
        })
    }

    /// 从「指标名 -> 权重」的映射构造，指标名必须都是已知指标
    pub fn from_named(
        name: impl Into<String>,
        raw: &BTreeMap<String, f64>,
    ) -> Result<Self, ConfigError> {
        let name = name.into();
        let mut entries = Vec::with_capacity(raw.len());
        for (metric_name, &weight) in raw {
            let metric = metric_name
                .parse::<MetricName>()
                .map_err(|_| ConfigError::UnknownMetric {
                    table: name.clone(),
                    metric: metric_name.clone(),
                })?;
            entries.push((metric, weight));
        }
        Self::new(name, entries)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn metrics(&self) -> impl Iterator<Item = MetricName> + '_ {
        self.entries.iter().map(|(m, _)| *m)
    }

    pub fn iter(&self) -> impl Iterator<Item = (MetricName, f64)> + '_ {
        self.entries.iter().copied()
    }

    pub fn weight(&self, metric: MetricName) -> Option<f64> {
        self.entries
            .iter()
            .find(|(m, _)| *m == metric)
            .map(|(_, w)| *w)
    }

    pub fn total_weight(&self) -> f64 {
        self.entries.iter().map(|(_, w)| w).sum()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 论述题默认权重（覆盖全部 16 个双文本/单文本指标，总和为 1）
    pub fn default_descriptive() -> Self {
        Self {
            name: "descriptive".to_string(),
            entries: vec![
                (MetricName::ExactMatch, 0.08),
                (MetricName::PartialMatch, 0.06),
                (MetricName::LexicalSimilarity, 0.06),
                (MetricName::Sentiment, 0.04),
                (MetricName::SemanticSimilarity, 0.06),
                (MetricName::NaiveBayesConfidence, 0.06),
                (MetricName::Coherence, 0.06),
                (MetricName::Relevance, 0.06),
                (MetricName::GrammaticalAccuracy, 0.07),
                (MetricName::KeywordCoverage, 0.07),
                (MetricName::FactualConsistency, 0.08),
                (MetricName::StructuralSimilarity, 0.05),
                (MetricName::Readability, 0.05),
                (MetricName::ConceptOrdering, 0.05),
                (MetricName::TechnicalAccuracy, 0.07),
                (MetricName::LogicalFlow, 0.08),
            ],
        }
    }

    /// 观点题默认权重
    pub fn default_opinion() -> Self {
        Self {
            name: "opinion".to_string(),
            entries: vec![
                (MetricName::SentimentAlignment, 0.1),
                (MetricName::Coherence, 0.3),
                (MetricName::LogicalFlow, 0.2),
                (MetricName::GrammaticalAccuracy, 0.2),
                (MetricName::Relevance, 0.2),
            ],
        }
    }
}

/// 两张题型权重表
#[derive(Debug, Clone, PartialEq)]
pub struct WeightTables {
    pub descriptive: WeightTable,
    pub opinion: WeightTable,
}

impl Default for WeightTables {
    fn default() -> Self {
        Self {
            descriptive: WeightTable::default_descriptive(),
            opinion: WeightTable::default_opinion(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct WeightsFile {
    descriptive: Option<BTreeMap<String, f64>>,
    opinion: Option<BTreeMap<String, f64>>,
}

impl WeightTables {
    /// 从 TOML 文本解析；缺少的表使用默认值
    pub fn from_toml_str(content: &str) -> AppResult<Self> {
        Self::from_weights_file(toml::from_str(content)?)
    }

    fn from_weights_file(file: WeightsFile) -> AppResult<Self> {
        let defaults = Self::default();

        let descriptive = match file.descriptive {
            Some(raw) => WeightTable::from_named("descriptive", &raw)?,
            None => defaults.descriptive,
        };
        let opinion = match file.opinion {
            Some(raw) => WeightTable::from_named("opinion", &raw)?,
            None => defaults.opinion,
        };

        Ok(Self {
            descriptive,
            opinion,
        })
    }

    /// 从 TOML 文件加载
    pub fn load(path: &Path) -> AppResult<Self> {
        let path_display = path.display().to_string();
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::file_read_failed(&path_display, e))?;
        let file: WeightsFile =
            toml::from_str(&content).map_err(|e| AppError::toml_parse_failed(&path_display, e))?;
        let tables = Self::from_weights_file(file)?;
        info!(
            "已加载权重表: {} (论述题 {} 项, 观点题 {} 项)",
            path_display,
            tables.descriptive.len(),
            tables.opinion.len()
        );
        Ok(tables)
    }

    /// 有路径时从文件加载，否则使用默认值
    pub fn load_or_default(path: Option<&str>) -> AppResult<Self> {
        match path {
            Some(p) if !p.trim().is_empty() => Self::load(Path::new(p)),
            _ => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FileError;

    #[test]
    fn test_default_tables_sum_to_one() {
        let tables = WeightTables::default();
        assert!((tables.descriptive.total_weight() - 1.0).abs() < 1e-9);
        assert!((tables.opinion.total_weight() - 1.0).abs() < 1e-9);
        assert_eq!(tables.descriptive.len(), 16);
        assert_eq!(tables.opinion.len(), 5);
    }

    #[test]
    fn test_negative_weight_rejected() {
        let err = WeightTable::new("t", [(MetricName::Coherence, -0.1)]).unwrap_err();
        assert!(matches!(err, ConfigError::NegativeWeight { .. }));
    }

    #[test]
    fn test_zero_sum_rejected() {
        let err = WeightTable::new("t", [(MetricName::Coherence, 0.0)]).unwrap_err();
        assert!(matches!(err, ConfigError::ZeroWeightSum { .. }));
        let err = WeightTable::new("t", Vec::new()).unwrap_err();
        assert!(matches!(err, ConfigError::ZeroWeightSum { .. }));
    }

    #[test]
    fn test_from_toml_with_unknown_metric() {
        let content = r#"
[opinion]
coherence = 0.5
vibes = 0.5
"#;
        let err = WeightTables::from_toml_str(content).unwrap_err();
        assert!(matches!(
            err,
            AppError::Config(ConfigError::UnknownMetric { ref metric, .. }) if metric == "vibes"
        ));
    }

    #[test]
    fn test_from_toml_partial_override() {
        let content = r#"
[opinion]
coherence = 2.0
relevance = 1.0
"#;
        let tables = WeightTables::from_toml_str(content).unwrap();
        assert_eq!(tables.descriptive, WeightTable::default_descriptive());
        assert_eq!(tables.opinion.weight(MetricName::Coherence), Some(2.0));
        assert_eq!(tables.opinion.total_weight(), 3.0);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("weights.toml");
        std::fs::write(&path, "[descriptive]\nexact_match = 1.0\n").unwrap();
        let tables = WeightTables::load(&path).unwrap();
        assert_eq!(tables.descriptive.len(), 1);

        assert!(WeightTables::load(&dir.path().join("missing.toml")).is_err());
        assert_eq!(WeightTables::load_or_default(None).unwrap(), WeightTables::default());
    }

    #[test]
    fn test_load_broken_toml_names_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("weights.toml");
        std::fs::write(&path, "[descriptive
exact_match = ").unwrap();

        let err = WeightTables::load(&path).unwrap_err();
        assert!(matches!(
            err,
            AppError::File(FileError::TomlParseFailed { ref path, .. }) if path.ends_with("weights.toml")
        ));
    }
}
