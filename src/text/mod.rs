//! 文本规范化层
//!
//! 为所有指标提供统一的分词、停用词、词形还原和分句能力。

pub mod lexicon;
pub mod normalizer;
pub mod sentences;

pub use normalizer::{canonical_text, is_stop_word, keywords, lemmatize, normalize, tokenize};
pub use sentences::{sentence_count, split_sentences};
