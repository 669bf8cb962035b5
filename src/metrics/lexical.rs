//! 词汇层面的比对指标

use std::collections::{HashMap, HashSet};

use crate::text::{keywords, normalize};

/// 规范化后完全一致记 1，否则记 0
pub fn exact_match(reference: &str, candidate: &str) -> f64 {
    if normalize(reference) == normalize(candidate) {
        1.0
    } else {
        0.0
    }
}

/// 共有词元数 / 较长一方的词元数；双方都为空时为 0
pub fn partial_match(reference: &str, candidate: &str) -> f64 {
    let reference_tokens = normalize(reference);
    let candidate_tokens = normalize(candidate);

    let denominator = reference_tokens.len().max(candidate_tokens.len());
    if denominator == 0 {
        return 0.0;
    }

    let reference_set: HashSet<&str> = reference_tokens.iter().map(String::as_str).collect();
    let candidate_set: HashSet<&str> = candidate_tokens.iter().map(String::as_str).collect();
    let common = reference_set.intersection(&candidate_set).count();

    common as f64 / denominator as f64
}

/// 参考答案词元被学生答案覆盖的比例；参考答案为空时为 0
pub fn keyword_coverage(reference: &str, candidate: &str) -> f64 {
    let reference_set: HashSet<String> = normalize(reference).into_iter().collect();
    if reference_set.is_empty() {
        return 0.0;
    }
    let candidate_set: HashSet<String> = normalize(candidate).into_iter().collect();

    let covered = reference_set.intersection(&candidate_set).count();
    covered as f64 / reference_set.len() as f64
}

/// 相关度，与关键词覆盖率同一公式
pub fn relevance(reference: &str, candidate: &str) -> f64 {
    keyword_coverage(reference, candidate)
}

/// 概念顺序一致性
///
/// `1 - Σ|位置差| / (参考关键词数 × 学生关键词数)`，下限为 0。
/// 同一关键词出现多次时取最后一次出现的位置；没有共同关键词时为 0。
pub fn concept_ordering(reference: &str, candidate: &str) -> f64 {
    let reference_keywords = keywords(reference);
    let candidate_keywords = keywords(candidate);

    let reference_positions = last_positions(&reference_keywords);
    let candidate_positions = last_positions(&candidate_keywords);

    let mut total_difference = 0usize;
    let mut shared = 0usize;
    for (word, &ref_pos) in &reference_positions {
        if let Some(&cand_pos) = candidate_positions.get(word) {
            total_difference += ref_pos.abs_diff(cand_pos);
            shared += 1;
        }
    }

    if shared == 0 {
        return 0.0;
    }

    let max_difference = (reference_keywords.len() * candidate_keywords.len()) as f64;
    (1.0 - total_difference as f64 / max_difference).max(0.0)
}

/// 字符级序列相似度（2 × 匹配字符数 / 总字符数），双方都为空时为 1
pub fn structural_similarity(reference: &str, candidate: &str) -> f64 {
    similar::TextDiff::from_chars(reference, candidate).ratio() as f64
}

fn last_positions(words: &[String]) -> HashMap<&str, usize> {
    words
        .iter()
        .enumerate()
        .map(|(i, w)| (w.as_str(), i))
        .collect()
}
