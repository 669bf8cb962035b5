use super::lexicon::ABBREVIATIONS;

/// 按句末标点（. ! ?）切分句子
///
/// 句末标点后必须紧跟空白或文本结束才断句，所以 "3.14" 不会被切开；
/// 常见缩写（Mr. / e.g. 等）后也不断句。空文本返回空列表。
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        current.push(c);
        if !matches!(c, '.' | '!' | '?') {
            continue;
        }

        // 连续的句末标点（"?!"、"..."）归入同一句
        while let Some(&next) = chars.peek() {
            if matches!(next, '.' | '!' | '?') {
                current.push(next);
                chars.next();
            } else {
                break;
            }
        }

        let at_boundary = chars.peek().map_or(true, |next| next.is_whitespace());
        if at_boundary && !(c == '.' && ends_with_abbreviation(&current)) {
            push_sentence(&mut sentences, &current);
            current.clear();
        }
    }
    push_sentence(&mut sentences, &current);

    sentences
}

/// 句子数量
pub fn sentence_count(text: &str) -> usize {
    split_sentences(text).len()
}

fn push_sentence(sentences: &mut Vec<String>, raw: &str) {
    let trimmed = raw.trim();
    if trimmed.chars().any(char::is_alphanumeric) {
        sentences.push(trimmed.to_string());
    }
}

fn ends_with_abbreviation(current: &str) -> bool {
    let last_word = current
        .trim_end_matches('.')
        .rsplit(|c: char| c.is_whitespace())
        .next()
        .unwrap_or("")
        .to_lowercase();
    ABBREVIATIONS.contains(last_word.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_basic() {
        let s = split_sentences("Plants need light. They make sugar! Do animals?");
        assert_eq!(s, vec!["Plants need light.", "They make sugar!", "Do animals?"]);
    }

    #[test]
    fn test_decimal_and_abbreviation_do_not_split() {
        assert_eq!(sentence_count("Pi is 3.14 roughly."), 1);
        assert_eq!(sentence_count("Ask Dr. Smith about it. Then go."), 2);
    }

    #[test]
    fn test_empty_and_unterminated() {
        assert!(split_sentences("").is_empty());
        assert!(split_sentences("   ").is_empty());
        assert_eq!(split_sentences("no terminator here"), vec!["no terminator here"]);
    }
}
