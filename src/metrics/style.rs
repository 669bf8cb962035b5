//! 风格类指标：情感、可读性、连贯性、逻辑流畅度
//!
//! 这些指标只看学生答案本身（情感对齐除外）。

use crate::text::lexicon::{BOOSTERS, NEGATIONS, SENTIMENT_LEXICON};
use crate::text::{sentence_count, tokenize};

/// 复合分数归一化常数
const NORMALIZATION_ALPHA: f64 = 15.0;
/// 否定词对后续情感词的缩放
const NEGATION_SCALAR: f64 = -0.74;
/// 否定词向后影响的窗口
const NEGATION_WINDOW: usize = 3;

/// 复合情感分数，范围 [-1, 1]；没有情感词时为 0
pub fn compound_sentiment(text: &str) -> f64 {
    let words = sentiment_tokens(text);

    let mut total = 0.0;
    for (i, word) in words.iter().enumerate() {
        let Some(&(valence, _)) = SENTIMENT_LEXICON.get(word.as_str()) else {
            continue;
        };
        if valence == 0.0 {
            continue;
        }

        let mut score = valence;
        if i > 0 {
            if let Some(&boost) = BOOSTERS.get(words[i - 1].as_str()) {
                score += if score > 0.0 { boost } else { -boost };
            }
        }
        if is_negated(&words, i) {
            score *= NEGATION_SCALAR;
        }
        total += score;
    }

    if total == 0.0 {
        return 0.0;
    }
    (total / (total * total + NORMALIZATION_ALPHA).sqrt()).clamp(-1.0, 1.0)
}

/// 情感分数：复合分数映射到 [0, 1]，中性文本（含空文本）为 0.5
pub fn sentiment(text: &str) -> f64 {
    (compound_sentiment(text) + 1.0) / 2.0
}

/// 情感对齐度：`1 - |情感(参考) - 情感(学生)|`
pub fn sentiment_alignment(reference: &str, candidate: &str) -> f64 {
    1.0 - (sentiment(reference) - sentiment(candidate)).abs()
}

/// 极性 [-1, 1] 与主观性 [0, 1]，按命中的词典词取平均；无命中时均为 0
pub fn polarity_subjectivity(text: &str) -> (f64, f64) {
    let words = sentiment_tokens(text);

    let mut polarity_sum = 0.0;
    let mut subjectivity_sum = 0.0;
    let mut hits = 0usize;
    for (i, word) in words.iter().enumerate() {
        let Some(&(valence, subjectivity)) = SENTIMENT_LEXICON.get(word.as_str()) else {
            continue;
        };
        let mut polarity = valence / 4.0;
        if is_negated(&words, i) {
            polarity *= -0.5;
        }
        polarity_sum += polarity;
        subjectivity_sum += subjectivity;
        hits += 1;
    }

    if hits == 0 {
        return (0.0, 0.0);
    }
    let n = hits as f64;
    (
        (polarity_sum / n).clamp(-1.0, 1.0),
        (subjectivity_sum / n).clamp(0.0, 1.0),
    )
}

/// 可读性：`((极性 + 1) / 2 + (1 - 主观性)) / 2`，空文本为 0.75
pub fn readability(text: &str) -> f64 {
    let (polarity, subjectivity) = polarity_subjectivity(text);
    ((polarity + 1.0) / 2.0 + (1.0 - subjectivity)) / 2.0
}

/// 连贯性：一句以内为 1；否则为不重复词数 / 总词数（按空白切分）
pub fn coherence(text: &str) -> f64 {
    if sentence_count(text) <= 1 {
        return 1.0;
    }

    let words: Vec<&str> = text.split_whitespace().collect();
    if words.is_empty() {
        return 1.0;
    }
    let unique: std::collections::HashSet<&str> = words.iter().copied().collect();
    (unique.len() as f64 / words.len() as f64).min(1.0)
}

/// 逻辑流畅度：一句以内为 0.5；否则为 `min(1, 句数 / 词数 × 10)`
pub fn logical_flow(text: &str) -> f64 {
    let sentences = sentence_count(text);
    if sentences <= 1 {
        return 0.5;
    }
    let words = text.split_whitespace().count().max(1);
    (sentences as f64 / words as f64 * 10.0).min(1.0)
}

// 先去掉撇号，让 "don't" 变成 "dont" 以便命中否定词表
fn sentiment_tokens(text: &str) -> Vec<String> {
    tokenize(&text.replace(['\'', '\u{2019}'], ""))
}

fn is_negated(words: &[String], index: usize) -> bool {
    let start = index.saturating_sub(NEGATION_WINDOW);
    words[start..index]
        .iter()
        .any(|w| NEGATIONS.contains(w.as_str()))
}
