//! 静态词表
//!
//! 全部在编译期生成（`phf`），进程内只读共享，无需初始化。

use phf::{phf_map, phf_set};

/// 英文停用词（与 NLTK 英文停用词表一致）
pub static STOP_WORDS: phf::Set<&'static str> = phf_set! {
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "you're",
    "you've", "you'll", "you'd", "your", "yours", "yourself", "yourselves", "he",
    "him", "his", "himself", "she", "she's", "her", "hers", "herself", "it", "it's",
    "its", "itself", "they", "them", "their", "theirs", "themselves", "what", "which",
    "who", "whom", "this", "that", "that'll", "these", "those", "am", "is", "are",
    "was", "were", "be", "been", "being", "have", "has", "had", "having", "do",
    "does", "did", "doing", "a", "an", "the", "and", "but", "if", "or", "because",
    "as", "until", "while", "of", "at", "by", "for", "with", "about", "against",
    "between", "into", "through", "during", "before", "after", "above", "below", "to",
    "from", "up", "down", "in", "out", "on", "off", "over", "under", "again",
    "further", "then", "once", "here", "there", "when", "where", "why", "how", "all",
    "any", "both", "each", "few", "more", "most", "other", "some", "such", "no",
    "nor", "not", "only", "own", "same", "so", "than", "too", "very", "s", "t", "can",
    "will", "just", "don", "don't", "should", "should've", "now", "d", "ll", "m", "o",
    "re", "ve", "y", "ain", "aren", "aren't", "couldn", "couldn't", "didn", "didn't",
    "doesn", "doesn't", "hadn", "hadn't", "hasn", "hasn't", "haven", "haven't", "isn",
    "isn't", "ma", "mightn", "mightn't", "mustn", "mustn't", "needn", "needn't",
    "shan", "shan't", "shouldn", "shouldn't", "wasn", "wasn't", "weren", "weren't",
    "won", "won't", "wouldn", "wouldn't",
};

/// 不规则复数 -> 单数
pub static IRREGULAR_PLURALS: phf::Map<&'static str, &'static str> = phf_map! {
    "children" => "child",
    "men" => "man",
    "women" => "woman",
    "people" => "person",
    "mice" => "mouse",
    "geese" => "goose",
    "feet" => "foot",
    "teeth" => "tooth",
    "oxen" => "ox",
    "data" => "datum",
    "criteria" => "criterion",
    "phenomena" => "phenomenon",
    "bacteria" => "bacterium",
    "media" => "medium",
    "indices" => "index",
    "matrices" => "matrix",
    "vertices" => "vertex",
    "analyses" => "analysis",
    "hypotheses" => "hypothesis",
    "theses" => "thesis",
    "crises" => "crisis",
    "leaves" => "leaf",
    "lives" => "life",
    "knives" => "knife",
    "wives" => "wife",
    "halves" => "half",
    "selves" => "self",
    "wolves" => "wolf",
    "shelves" => "shelf",
};

/// 以 s 结尾但本身就是原形的词
pub static INVARIANT_WORDS: phf::Set<&'static str> = phf_set! {
    "analysis", "basis", "thesis", "crisis", "hypothesis", "synthesis", "photosynthesis",
    "osmosis", "mitosis", "meiosis", "diagnosis", "emphasis", "axis", "oasis",
    "bus", "gas", "lens", "series", "species", "physics", "mathematics", "economics",
    "politics", "ethics", "news", "means", "process", "success", "access", "class",
    "mass", "glass", "grass", "loss", "address", "progress", "stress", "less", "across",
    "always", "perhaps", "thus", "plus", "status", "virus", "campus", "focus",
    "census", "bonus", "chaos", "canvas", "atlas", "alias", "yes", "various", "famous",
    "previous", "serious", "dangerous", "nervous", "obvious", "us", "his", "its",
};

/// 情感词典：词 -> (效价 [-4, 4], 主观性 [0, 1])
///
/// 效价用于复合情感分数，效价/4 作为极性参与可读性计算。
pub static SENTIMENT_LEXICON: phf::Map<&'static str, (f64, f64)> = phf_map! {
    "good" => (1.9, 0.6),
    "great" => (3.1, 0.75),
    "excellent" => (3.2, 1.0),
    "amazing" => (2.8, 0.9),
    "wonderful" => (2.7, 1.0),
    "best" => (3.2, 0.3),
    "better" => (1.9, 0.5),
    "positive" => (2.6, 0.55),
    "benefit" => (2.0, 0.4),
    "beneficial" => (1.9, 0.5),
    "helpful" => (1.8, 0.5),
    "useful" => (1.9, 0.3),
    "important" => (0.8, 1.0),
    "effective" => (2.0, 0.6),
    "efficient" => (1.8, 0.5),
    "successful" => (2.8, 0.95),
    "success" => (2.7, 0.4),
    "happy" => (2.7, 1.0),
    "love" => (3.2, 0.6),
    "like" => (1.5, 0.4),
    "enjoy" => (2.2, 0.5),
    "agree" => (1.5, 0.3),
    "support" => (1.7, 0.3),
    "improve" => (1.9, 0.4),
    "improvement" => (2.0, 0.4),
    "advantage" => (1.0, 0.3),
    "easy" => (1.9, 0.83),
    "clear" => (1.6, 0.38),
    "correct" => (1.6, 0.0),
    "right" => (1.0, 0.54),
    "safe" => (1.9, 0.5),
    "healthy" => (1.7, 0.5),
    "fair" => (1.3, 0.9),
    "free" => (2.3, 0.8),
    "hope" => (1.9, 0.5),
    "nice" => (1.8, 1.0),
    "strong" => (2.3, 0.73),
    "powerful" => (1.8, 1.0),
    "valuable" => (2.1, 0.5),
    "essential" => (1.2, 0.6),
    "interesting" => (1.7, 0.5),
    "bad" => (-2.5, 0.67),
    "worse" => (-2.1, 0.6),
    "worst" => (-3.1, 1.0),
    "poor" => (-2.1, 0.6),
    "terrible" => (-2.1, 1.0),
    "awful" => (-2.0, 1.0),
    "horrible" => (-2.5, 1.0),
    "negative" => (-2.7, 0.4),
    "harm" => (-2.5, 0.5),
    "harmful" => (-2.6, 0.6),
    "danger" => (-2.4, 0.5),
    "dangerous" => (-2.1, 0.9),
    "risk" => (-1.1, 0.4),
    "problem" => (-1.7, 0.4),
    "difficult" => (-1.5, 1.0),
    "hard" => (-0.4, 0.54),
    "wrong" => (-2.1, 0.9),
    "fail" => (-2.5, 0.5),
    "failure" => (-2.3, 0.5),
    "hate" => (-2.7, 0.9),
    "dislike" => (-1.6, 0.6),
    "disagree" => (-1.6, 0.4),
    "sad" => (-2.1, 1.0),
    "angry" => (-2.3, 1.0),
    "fear" => (-2.2, 0.6),
    "pollution" => (-1.6, 0.2),
    "waste" => (-1.8, 0.3),
    "damage" => (-2.2, 0.4),
    "loss" => (-1.3, 0.3),
    "disadvantage" => (-1.8, 0.3),
    "unfair" => (-2.1, 0.9),
    "weak" => (-1.9, 0.5),
    "useless" => (-1.8, 0.2),
    "boring" => (-1.3, 1.0),
    "stupid" => (-2.4, 1.0),
    "crisis" => (-3.1, 0.4),
    "disease" => (-1.6, 0.3),
    "death" => (-2.9, 0.4),
    "war" => (-2.9, 0.4),
    "violence" => (-3.1, 0.5),
    "abuse" => (-3.2, 0.6),
    "poverty" => (-2.3, 0.3),
    "unemployment" => (-1.9, 0.2),
    "corruption" => (-2.6, 0.5),
    "believe" => (0.0, 0.7),
    "think" => (0.0, 0.6),
    "feel" => (0.0, 0.8),
    "opinion" => (0.0, 0.9),
    "probably" => (0.0, 0.8),
    "maybe" => (0.0, 0.8),
    "should" => (0.0, 0.5),
    "must" => (0.0, 0.4),
};

/// 否定词
pub static NEGATIONS: phf::Set<&'static str> = phf_set! {
    "not", "no", "never", "nor", "none", "nobody", "nothing", "neither", "nowhere",
    "cannot", "without", "dont", "doesnt", "didnt", "isnt", "arent", "wasnt",
    "werent", "wont", "wouldnt", "shouldnt", "cant", "couldnt", "hardly", "rarely",
};

/// 程度副词及其增量
pub static BOOSTERS: phf::Map<&'static str, f64> = phf_map! {
    "very" => 0.293,
    "extremely" => 0.293,
    "really" => 0.293,
    "highly" => 0.293,
    "absolutely" => 0.293,
    "completely" => 0.293,
    "totally" => 0.293,
    "especially" => 0.293,
    "incredibly" => 0.293,
    "so" => 0.293,
    "most" => 0.293,
    "more" => 0.293,
    "slightly" => -0.293,
    "somewhat" => -0.293,
    "barely" => -0.293,
    "kind" => -0.293,
    "little" => -0.293,
    "partly" => -0.293,
};

/// 常见的非名词实词（动词、形容词、副词），名词短语启发式会排除它们
pub static NON_NOUN_WORDS: phf::Set<&'static str> = phf_set! {
    "convert", "converts", "converted", "use", "uses", "used", "make", "makes", "made",
    "produce", "produces", "produced", "take", "takes", "took", "give", "gives", "gave",
    "get", "gets", "got", "go", "goes", "went", "come", "comes", "came", "become",
    "becomes", "became", "help", "helps", "helped", "show", "shows", "showed", "cause",
    "causes", "caused", "allow", "allows", "allowed", "provide", "provides", "provided",
    "include", "includes", "included", "contain", "contains", "contained", "occur",
    "occurs", "occurred", "increase", "increases", "increased", "decrease", "decreases",
    "decreased", "reduce", "reduces", "reduced", "release", "releases", "released",
    "absorb", "absorbs", "absorbed", "store", "stores", "stored", "move", "moves",
    "moved", "need", "needs", "needed", "called", "known", "found", "based", "think",
    "believe", "feel", "say", "says", "said", "also", "many", "much", "several",
    "important", "different", "large", "small", "high", "low", "new", "old", "good",
    "bad", "great", "main", "major", "general", "common", "simple", "better", "best",
    "however", "therefore", "thus", "hence", "often", "usually", "always", "never",
    "first", "second", "third", "finally", "mainly", "like", "may", "might", "must",
    "would", "could", "shall", "every", "another", "within", "without", "among",
};

/// 句末不断句的缩写
pub static ABBREVIATIONS: phf::Set<&'static str> = phf_set! {
    "mr", "mrs", "ms", "dr", "prof", "sr", "jr", "st", "vs", "etc", "e.g", "i.e",
    "eg", "ie", "fig", "approx", "dept", "inc", "ltd",
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stop_word_list_size() {
        assert_eq!(STOP_WORDS.len(), 179);
        assert!(STOP_WORDS.contains("the"));
        assert!(!STOP_WORDS.contains("photosynthesis"));
    }

    #[test]
    fn test_sentiment_lexicon_ranges() {
        for (word, (valence, subjectivity)) in SENTIMENT_LEXICON.entries() {
            assert!((-4.0..=4.0).contains(valence), "{word}");
            assert!((0.0..=1.0).contains(subjectivity), "{word}");
        }
    }
}
