//! 词袋向量类指标：TF-IDF 余弦相似度、朴素贝叶斯置信度
//!
//! 两者都只在「参考答案 + 学生答案」这两篇文档上建模。

use std::collections::{BTreeSet, HashMap};

use crate::text::normalize;

/// 两篇文档上联合构建的 TF-IDF 向量的余弦相似度
///
/// idf 使用平滑公式 `ln((1 + n) / (1 + df)) + 1`，向量做 L2 归一化。
/// 任一向量为零向量时为 0。
pub fn lexical_similarity(reference: &str, candidate: &str) -> f64 {
    let documents = [normalize(reference), normalize(candidate)];
    let counts: Vec<HashMap<&str, f64>> = documents.iter().map(|d| term_counts(d)).collect();

    let vocabulary: BTreeSet<&str> = counts.iter().flat_map(|c| c.keys().copied()).collect();
    if vocabulary.is_empty() {
        return 0.0;
    }

    let n = documents.len() as f64;
    let vectors: Vec<Vec<f64>> = counts
        .iter()
        .map(|doc| {
            let raw: Vec<f64> = vocabulary
                .iter()
                .map(|term| {
                    let df = counts.iter().filter(|c| c.contains_key(term)).count() as f64;
                    let idf = ((1.0 + n) / (1.0 + df)).ln() + 1.0;
                    doc.get(term).copied().unwrap_or(0.0) * idf
                })
                .collect();
            l2_normalize(raw)
        })
        .collect();

    let dot: f64 = vectors[0]
        .iter()
        .zip(&vectors[1])
        .map(|(a, b)| a * b)
        .sum();
    dot.clamp(0.0, 1.0)
}

/// 朴素贝叶斯「置信度」
///
/// 以参考答案为类别 0、学生答案为类别 1，在这两个样本上拟合多项式朴素贝叶斯
/// （拉普拉斯平滑 alpha = 1，先验各 0.5），返回学生答案属于类别 1 的后验概率。
///
/// 这是一个退化的两样本拟合，只能当作粗糙的词汇差异启发式：
/// 两篇文本完全相同时恰好为 0.5，差异越大越接近 1；词表为空时为 0.5。
pub fn naive_bayes_confidence(reference: &str, candidate: &str) -> f64 {
    let reference_tokens = normalize(reference);
    let candidate_tokens = normalize(candidate);

    let reference_counts = term_counts(&reference_tokens);
    let candidate_counts = term_counts(&candidate_tokens);

    let vocabulary: BTreeSet<&str> = reference_counts
        .keys()
        .chain(candidate_counts.keys())
        .copied()
        .collect();
    if vocabulary.is_empty() {
        return 0.5;
    }

    let v = vocabulary.len() as f64;
    let log_likelihood = |class_counts: &HashMap<&str, f64>, class_total: f64| -> f64 {
        let prior = 0.5f64.ln();
        candidate_counts
            .iter()
            .map(|(term, &x)| {
                let count = class_counts.get(term).copied().unwrap_or(0.0);
                x * ((count + 1.0) / (class_total + v)).ln()
            })
            .sum::<f64>()
            + prior
    };

    let jll_reference = log_likelihood(&reference_counts, reference_tokens.len() as f64);
    let jll_candidate = log_likelihood(&candidate_counts, candidate_tokens.len() as f64);

    // softmax，写成 logistic 形式避免溢出
    1.0 / (1.0 + (jll_reference - jll_candidate).exp())
}

fn term_counts(tokens: &[String]) -> HashMap<&str, f64> {
    let mut counts = HashMap::new();
    for token in tokens {
        *counts.entry(token.as_str()).or_insert(0.0) += 1.0;
    }
    counts
}

fn l2_normalize(vector: Vec<f64>) -> Vec<f64> {
    let norm = vector.iter().map(|x| x * x).sum::<f64>().sqrt();
    if norm == 0.0 {
        return vector;
    }
    vector.into_iter().map(|x| x / norm).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lexical_similarity_identical_is_one() {
        let score = lexical_similarity("Plants convert light energy.", "plants convert light energy");
        assert!((score - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_lexical_similarity_disjoint_and_empty() {
        assert_eq!(lexical_similarity("light energy", "cheese bread"), 0.0);
        assert_eq!(lexical_similarity("light energy", ""), 0.0);
        assert_eq!(lexical_similarity("", ""), 0.0);
    }

    #[test]
    fn test_lexical_similarity_partial_overlap() {
        let score = lexical_similarity("light energy sugar", "light energy water");
        assert!(score > 0.0 && score < 1.0);
    }

    #[test]
    fn test_naive_bayes_degenerate_cases() {
        assert!((naive_bayes_confidence("light energy", "light energy") - 0.5).abs() < 1e-9);
        assert!((naive_bayes_confidence("light energy", "") - 0.5).abs() < 1e-9);
        assert!((naive_bayes_confidence("", "") - 0.5).abs() < 1e-9);
        assert!(naive_bayes_confidence("light energy", "cheese bread") > 0.5);
    }
}
