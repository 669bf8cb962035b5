//! 实体与术语类指标：事实一致性、技术准确度
//!
//! 命名实体和名词术语都用轻量启发式识别，不依赖外部模型。

use std::collections::BTreeSet;

use crate::text::lexicon::NON_NOUN_WORDS;
use crate::text::{is_stop_word, split_sentences, tokenize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EntityLabel {
    /// 专有名词（连续的首字母大写词）
    Proper,
    /// 含数字的量（年份、数值）
    Quantity,
}

/// 识别出的实体集合，实体文本统一小写
///
/// 句首的单个大写词不计为实体，全大写缩写（DNA、NASA）除外。
pub fn named_entities(text: &str) -> BTreeSet<(String, EntityLabel)> {
    let mut entities = BTreeSet::new();

    for sentence in split_sentences(text) {
        let words: Vec<&str> = sentence
            .split_whitespace()
            .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()))
            .filter(|w| !w.is_empty())
            .collect();

        let mut i = 0;
        while i < words.len() {
            let word = words[i];

            if word.chars().any(|c| c.is_ascii_digit()) {
                entities.insert((word.to_lowercase(), EntityLabel::Quantity));
                i += 1;
                continue;
            }

            if !is_capitalized(word) || word == "I" {
                i += 1;
                continue;
            }

            let start = i;
            while i < words.len() && is_capitalized(words[i]) && words[i] != "I" {
                i += 1;
            }
            let run = &words[start..i];

            if start == 0 && run.len() == 1 && !is_acronym(run[0]) {
                continue;
            }
            let phrase = run.join(" ").to_lowercase();
            entities.insert((phrase, EntityLabel::Proper));
        }
    }

    entities
}

/// 名词术语集合（小写，不做词形还原）
///
/// 取去停用词后长度不小于 3 的字母词，排除常见动词/形容词/副词，
/// 以及 -ly / -ing / -ed 结尾的词。
pub fn noun_terms(text: &str) -> BTreeSet<String> {
    tokenize(text)
        .into_iter()
        .filter(|t| looks_like_noun(t))
        .collect()
}

/// 参考答案实体中被学生答案覆盖的比例；参考答案没有实体时为 1
pub fn factual_consistency(reference: &str, candidate: &str) -> f64 {
    coverage_or_one(&named_entities(reference), &named_entities(candidate))
}

/// 参考答案名词术语中被学生答案覆盖的比例；参考答案没有术语时为 1
pub fn technical_accuracy(reference: &str, candidate: &str) -> f64 {
    coverage_or_one(&noun_terms(reference), &noun_terms(candidate))
}

fn coverage_or_one<T: Ord>(reference: &BTreeSet<T>, candidate: &BTreeSet<T>) -> f64 {
    if reference.is_empty() {
        return 1.0;
    }
    reference.intersection(candidate).count() as f64 / reference.len() as f64
}

fn is_capitalized(word: &str) -> bool {
    word.chars().next().is_some_and(char::is_uppercase)
}

fn is_acronym(word: &str) -> bool {
    word.chars().count() >= 2 && word.chars().all(|c| c.is_uppercase())
}

fn looks_like_noun(token: &str) -> bool {
    if token.chars().count() < 3 || !token.chars().all(char::is_alphabetic) {
        return false;
    }
    if is_stop_word(token) || NON_NOUN_WORDS.contains(token) {
        return false;
    }
    !(token.ends_with("ly")
        || (token.ends_with("ing") && token.len() > 5)
        || (token.ends_with("ed") && token.len() > 4))
}
