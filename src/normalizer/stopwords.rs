// WHY: fixed English stopword set consulted before lemmatization
// The list is the 179-word NLTK English corpus; contractions are listed even though
// punctuation stripping means they never reach the lookup

use std::collections::HashSet;

/// English stopwords dropped from cleaned documents
pub const ENGLISH_STOPWORDS: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "you're",
    "you've", "you'll", "you'd", "your", "yours", "yourself", "yourselves", "he", "him", "his",
    "himself", "she", "she's", "her", "hers", "herself", "it", "it's", "its", "itself",
    "they", "them", "their", "theirs", "themselves", "what", "which", "who", "whom", "this",
    "that", "that'll", "these", "those", "am", "is", "are", "was", "were", "be",
    "been", "being", "have", "has", "had", "having", "do", "does", "did", "doing",
    "a", "an", "the", "and", "but", "if", "or", "because", "as", "until",
    "while", "of", "at", "by", "for", "with", "about", "against", "between", "into",
    "through", "during", "before", "after", "above", "below", "to", "from", "up", "down",
    "in", "out", "on", "off", "over", "under", "again", "further", "then", "once",
    "here", "there", "when", "where", "why", "how", "all", "any", "both", "each",
    "few", "more", "most", "other", "some", "such", "no", "nor", "not", "only",
    "own", "same", "so", "than", "too", "very", "s", "t", "can", "will",
    "just", "don", "don't", "should", "should've", "now", "d", "ll", "m", "o",
    "re", "ve", "y", "ain", "aren", "aren't", "couldn", "couldn't", "didn", "didn't",
    "doesn", "doesn't", "hadn", "hadn't", "hasn", "hasn't", "haven", "haven't", "isn", "isn't",
    "ma", "mightn", "mightn't", "mustn", "mustn't", "needn", "needn't", "shan", "shan't", "shouldn",
    "shouldn't", "wasn", "wasn't", "weren", "weren't", "won", "won't", "wouldn", "wouldn't",
];

/// O(1) stopword lookup over [`ENGLISH_STOPWORDS`]
#[derive(Debug, Clone)]
pub struct StopwordChecker {
    stopwords: HashSet<&'static str>,
}

impl StopwordChecker {
    /// Create checker with the default English set
    pub fn new() -> Self {
        Self {
            stopwords: ENGLISH_STOPWORDS.iter().copied().collect(),
        }
    }

    /// Check if a lowercase token is a stopword
    pub fn is_stopword(&self, token: &str) -> bool {
        self.stopwords.contains(token)
    }

    pub fn len(&self) -> usize {
        self.stopwords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stopwords.is_empty()
    }
}

impl Default for StopwordChecker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::OnceLock;

    static SHARED_CHECKER: OnceLock<StopwordChecker> = OnceLock::new();

    fn get_checker() -> &'static StopwordChecker {
        SHARED_CHECKER.get_or_init(StopwordChecker::new)
    }

    #[test]
    fn test_stopword_set_size() {
        assert_eq!(ENGLISH_STOPWORDS.len(), 179);
        assert_eq!(get_checker().len(), 179, "List should not contain duplicates");
    }

    #[test]
    fn test_stopword_detection() {
        let checker = get_checker();
        for word in ["the", "a", "an", "and", "not", "wouldn", "ourselves"] {
            assert!(checker.is_stopword(word), "Should detect {} as stopword", word);
        }
        for word in ["trump", "reuters", "election", "news", "said"] {
            assert!(!checker.is_stopword(word), "{} is not a stopword", word);
        }
    }

    #[test]
    fn test_stopword_lookup_is_case_sensitive() {
        // Callers lowercase before lookup
        assert!(!get_checker().is_stopword("The"));
    }
}
