//! 文本规范化
//!
//! 所有词汇类指标共用同一套规范化：分词 → 小写 → 去停用词 → 词形还原。
//! 空串或纯空白输入得到空序列，这是合法输入而不是错误。

use super::lexicon::{INVARIANT_WORDS, IRREGULAR_PLURALS, STOP_WORDS};

/// 把文本切分为小写词元（字母数字串），标点和空白都作为分隔符
pub fn tokenize(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();

    for c in text.chars() {
        if c.is_alphanumeric() {
            current.extend(c.to_lowercase());
        } else if !current.is_empty() {
            tokens.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }

    tokens
}

/// 名词词形还原（复数 -> 单数），未知形式原样返回
pub fn lemmatize(token: &str) -> String {
    if let Some(singular) = IRREGULAR_PLURALS.get(token) {
        return (*singular).to_string();
    }
    if token.chars().count() <= 3 || INVARIANT_WORDS.contains(token) {
        return token.to_string();
    }
    if !token.chars().all(char::is_alphabetic) {
        return token.to_string();
    }

    if let Some(stem) = token.strip_suffix("ies") {
        if stem.len() > 1 {
            return format!("{stem}y");
        }
    }
    for suffix in ["sses", "ches", "shes", "xes"] {
        if token.ends_with(suffix) {
            return token[..token.len() - 2].to_string();
        }
    }
    if token.ends_with('s')
        && !token.ends_with("ss")
        && !token.ends_with("us")
        && !token.ends_with("is")
    {
        return token[..token.len() - 1].to_string();
    }

    token.to_string()
}

/// 是否为停用词
pub fn is_stop_word(token: &str) -> bool {
    STOP_WORDS.contains(token)
}

/// 规范化：分词、去停用词、词形还原
pub fn normalize(text: &str) -> Vec<String> {
    tokenize(text)
        .into_iter()
        .filter(|t| !is_stop_word(t))
        .map(|t| lemmatize(&t))
        .collect()
}

/// 关键词序列：去停用词但不做词形还原，保留原始顺序
pub fn keywords(text: &str) -> Vec<String> {
    tokenize(text)
        .into_iter()
        .filter(|t| !is_stop_word(t))
        .collect()
}

/// 客观题比对用的规范形式：小写、合并空白、去掉首尾标点
pub fn canonical_text(text: &str) -> String {
    let collapsed = text
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();
    collapsed
        .trim_matches(|c: char| c.is_ascii_punctuation() || c.is_whitespace())
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_splits_punctuation_and_contractions() {
        assert_eq!(
            tokenize("Plants don't  eat; they photosynthesise!"),
            vec!["plants", "don", "t", "eat", "they", "photosynthesise"]
        );
        assert!(tokenize("   \n\t").is_empty());
    }

    #[test]
    fn test_lemmatize_plurals() {
        assert_eq!(lemmatize("plants"), "plant");
        assert_eq!(lemmatize("batteries"), "battery");
        assert_eq!(lemmatize("boxes"), "box");
        assert_eq!(lemmatize("children"), "child");
        assert_eq!(lemmatize("photosynthesis"), "photosynthesis");
        assert_eq!(lemmatize("glass"), "glass");
        assert_eq!(lemmatize("gas"), "gas");
        assert_eq!(lemmatize("1990s"), "1990s");
    }

    #[test]
    fn test_normalize_removes_stop_words() {
        assert_eq!(
            normalize("The leaves of the plants are green."),
            vec!["leaf", "plant", "green"]
        );
        assert!(normalize("").is_empty());
        assert!(normalize("the and of").is_empty());
    }

    #[test]
    fn test_keywords_keep_surface_form() {
        assert_eq!(keywords("The plants grow"), vec!["plants", "grow"]);
    }

    #[test]
    fn test_canonical_text() {
        assert_eq!(canonical_text("  Paris. "), "paris");
        assert_eq!(canonical_text("New   York"), "new york");
        assert_eq!(canonical_text(""), "");
    }
}
