//! 语法准确度
//!
//! 语法检查器通过 [`GrammarChecker`] 接入，默认是基于规则的
//! [`RuleBasedGrammarChecker`]。检查器报错时指标取 0.8。

use tracing::warn;

use crate::error::AppResult;
use crate::text::split_sentences;

/// 检查器失败时的默认分数
pub const GRAMMAR_FALLBACK_SCORE: f64 = 0.8;

pub trait GrammarChecker: Send + Sync {
    /// 返回文本中发现的问题数量
    fn count_issues(&self, text: &str) -> AppResult<usize>;
}

/// 规则检查器
///
/// 识别的问题：
/// - 句首小写
/// - 相邻重复词（"the the"）
/// - 单独的小写 "i"
/// - 冠词 a / an 与后续词首音不匹配
/// - 标点前多余的空格
/// - 文本末尾缺少句末标点
#[derive(Debug, Default, Clone)]
pub struct RuleBasedGrammarChecker;

/// 元音字母开头但读辅音的词
const CONSONANT_SOUND_EXCEPTIONS: &[&str] = &[
    "one", "once", "university", "unit", "united", "unique", "uniform", "union", "universal",
    "universe", "use", "used", "useful", "user", "usual", "usually", "european", "eulogy",
];
/// 辅音字母开头但读元音的词
const VOWEL_SOUND_EXCEPTIONS: &[&str] = &["hour", "hours", "honest", "honour", "honor", "heir"];

impl GrammarChecker for RuleBasedGrammarChecker {
    fn count_issues(&self, text: &str) -> AppResult<usize> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Ok(0);
        }

        let mut issues = 0;

        for sentence in split_sentences(trimmed) {
            if sentence
                .chars()
                .find(|c| c.is_alphabetic())
                .is_some_and(char::is_lowercase)
            {
                issues += 1;
            }
        }

        let words: Vec<String> = trimmed
            .split_whitespace()
            .map(|w| {
                w.trim_matches(|c: char| !c.is_alphanumeric() && c != '\'')
                    .to_string()
            })
            .filter(|w| !w.is_empty())
            .collect();

        for pair in words.windows(2) {
            let (first, second) = (&pair[0], &pair[1]);
            if first.chars().all(char::is_alphabetic) && first.eq_ignore_ascii_case(second) {
                issues += 1;
            }
            if article_mismatch(first, second) {
                issues += 1;
            }
        }

        issues += words.iter().filter(|w| w.as_str() == "i").count();

        issues += [" ,", " .", " ;", " :", " !", " ?"]
            .iter()
            .map(|pattern| trimmed.matches(pattern).count())
            .sum::<usize>();

        if !trimmed.ends_with(['.', '!', '?', '"', '\'', ')']) {
            issues += 1;
        }

        Ok(issues)
    }
}

fn article_mismatch(article: &str, next: &str) -> bool {
    let next = next.to_lowercase();
    let Some(first) = next.chars().next() else {
        return false;
    };
    if !first.is_alphabetic() {
        return false;
    }

    let vowel_sound = if CONSONANT_SOUND_EXCEPTIONS.contains(&next.as_str()) {
        false
    } else if VOWEL_SOUND_EXCEPTIONS.contains(&next.as_str()) {
        true
    } else {
        matches!(first, 'a' | 'e' | 'i' | 'o' | 'u')
    };

    match article.to_lowercase().as_str() {
        "a" => vowel_sound,
        "an" => !vowel_sound,
        _ => false,
    }
}

/// `1 - min(问题数 / 词数, 1)`；检查器失败时为 [`GRAMMAR_FALLBACK_SCORE`]
pub fn grammatical_accuracy(checker: &dyn GrammarChecker, text: &str) -> f64 {
    match checker.count_issues(text) {
        Ok(issues) => {
            let words = text.split_whitespace().count().max(1);
            1.0 - (issues as f64 / words as f64).min(1.0)
        }
        Err(e) => {
            warn!("语法检查失败，使用默认分数: {}", e);
            GRAMMAR_FALLBACK_SCORE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    struct BrokenChecker;

    impl GrammarChecker for BrokenChecker {
        fn count_issues(&self, _text: &str) -> AppResult<usize> {
            Err(AppError::Other("checker unavailable".to_string()))
        }
    }

    fn issues(text: &str) -> usize {
        RuleBasedGrammarChecker.count_issues(text).unwrap()
    }

    #[test]
    fn test_clean_text_has_no_issues() {
        assert_eq!(issues("Plants make food from light."), 0);
        assert_eq!(issues("It took an hour. A user logged in."), 0);
        assert_eq!(issues(""), 0);
    }

    #[test]
    fn test_detects_common_mistakes() {
        assert_eq!(issues("plants make food."), 1);
        assert_eq!(issues("Plants make the the food."), 1);
        assert_eq!(issues("Then i went home."), 1);
        assert_eq!(issues("It is a apple."), 1);
        assert_eq!(issues("It is an banana."), 1);
        assert_eq!(issues("Plants make food"), 1);
        assert_eq!(issues("Plants make food ."), 1);
    }

    #[test]
    fn test_grammatical_accuracy_score() {
        let checker = RuleBasedGrammarChecker;
        assert_eq!(grammatical_accuracy(&checker, ""), 1.0);
        assert_eq!(grammatical_accuracy(&checker, "Plants make food."), 1.0);
        // 4 个词 1 个问题
        assert_eq!(grammatical_accuracy(&checker, "plants make some food."), 0.75);
    }

    #[test]
    fn test_checker_failure_uses_fallback() {
        assert_eq!(grammatical_accuracy(&BrokenChecker, "Anything."), GRAMMAR_FALLBACK_SCORE);
    }
}
