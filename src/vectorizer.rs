// WHY: bag-of-words and TF-IDF features over cleaned documents
// Vocabularies run to tens of thousands of terms, so rows are stored sparse

use ndarray::Array1;
use regex_automata::meta::Regex;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use thiserror::Error;
use tracing::debug;

/// Tokens of two or more word characters
const TOKEN_PATTERN: &str = r"\b\w\w+\b";

/// English stop words applied by the vectorizers (the scikit-learn list)
pub const VECTORIZER_STOP_WORDS: &[&str] = &[
    "a", "about", "above", "across", "after", "afterwards", "again", "against", "all", "almost",
    "alone", "along", "already", "also", "although", "always", "am", "among", "amongst", "amoungst",
    "amount", "an", "and", "another", "any", "anyhow", "anyone", "anything", "anyway", "anywhere",
    "are", "around", "as", "at", "back", "be", "became", "because", "become", "becomes",
    "becoming", "been", "before", "beforehand", "behind", "being", "below", "beside", "besides", "between",
    "beyond", "bill", "both", "bottom", "but", "by", "call", "can", "cannot", "cant",
    "co", "con", "could", "couldnt", "cry", "de", "describe", "detail", "do", "done",
    "down", "due", "during", "each", "eg", "eight", "either", "eleven", "else", "elsewhere",
    "empty", "enough", "etc", "even", "ever", "every", "everyone", "everything", "everywhere", "except",
    "few", "fifteen", "fifty", "fill", "find", "fire", "first", "five", "for", "former",
    "formerly", "forty", "found", "four", "from", "front", "full", "further", "get", "give",
    "go", "had", "has", "hasnt", "have", "he", "hence", "her", "here", "hereafter",
    "hereby", "herein", "hereupon", "hers", "herself", "him", "himself", "his", "how", "however",
    "hundred", "i", "ie", "if", "in", "inc", "indeed", "interest", "into", "is",
    "it", "its", "itself", "keep", "last", "latter", "latterly", "least", "less", "ltd",
    "made", "many", "may", "me", "meanwhile", "might", "mill", "mine", "more", "moreover",
    "most", "mostly", "move", "much", "must", "my", "myself", "name", "namely", "neither",
    "never", "nevertheless", "next", "nine", "no", "nobody", "none", "noone", "nor", "not",
    "nothing", "now", "nowhere", "of", "off", "often", "on", "once", "one", "only",
    "onto", "or", "other", "others", "otherwise", "our", "ours", "ourselves", "out", "over",
    "own", "part", "per", "perhaps", "please", "put", "rather", "re", "same", "see",
    "seem", "seemed", "seeming", "seems", "serious", "several", "she", "should", "show", "side",
    "since", "sincere", "six", "sixty", "so", "some", "somehow", "someone", "something", "sometime",
    "sometimes", "somewhere", "still", "such", "system", "take", "ten", "than", "that", "the",
    "their", "them", "themselves", "then", "thence", "there", "thereafter", "thereby", "therefore", "therein",
    "thereupon", "these", "they", "thick", "thin", "third", "this", "those", "though", "three",
    "through", "throughout", "thru", "thus", "to", "together", "too", "top", "toward", "towards",
    "twelve", "twenty", "two", "un", "under", "until", "up", "upon", "us", "very",
    "via", "was", "we", "well", "were", "what", "whatever", "when", "whence", "whenever",
    "where", "whereafter", "whereas", "whereby", "wherein", "whereupon", "wherever", "whether", "which", "while",
    "whither", "who", "whoever", "whole", "whom", "whose", "why", "will", "with", "within",
    "without", "would", "yet", "you", "your", "yours", "yourself", "yourselves",
];

/// Errors raised by vectorizers
#[derive(Error, Debug, Clone, PartialEq)]
pub enum VectorizerError {
    #[error("Vectorizer has not been fitted yet")]
    NotFitted,

    #[error("Empty vocabulary; the documents may contain only stop words")]
    EmptyVocabulary,

    #[error("Invalid n-gram range ({0}, {1})")]
    InvalidNgramRange(usize, usize),

    #[error("Invalid token pattern: {0}")]
    InvalidPattern(String),
}

/// Row-major sparse matrix; each row holds `(column, value)` pairs sorted by column
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SparseMatrix {
    n_cols: usize,
    rows: Vec<Vec<(usize, f64)>>,
}

impl SparseMatrix {
    pub fn new(n_cols: usize) -> Self {
        Self {
            n_cols,
            rows: Vec::new(),
        }
    }

    /// Build from dense rows, dropping zeros
    pub fn from_dense(rows: &[Vec<f64>]) -> Self {
        let n_cols = rows.first().map(|r| r.len()).unwrap_or(0);
        let mut matrix = Self::new(n_cols);
        for row in rows {
            matrix.push_row(
                row.iter()
                    .enumerate()
                    .filter(|(_, &v)| v != 0.0)
                    .map(|(j, &v)| (j, v))
                    .collect(),
            );
        }
        matrix
    }

    /// Append a row; entries are sorted by column
    pub fn push_row(&mut self, mut entries: Vec<(usize, f64)>) {
        entries.sort_by_key(|&(col, _)| col);
        self.rows.push(entries);
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn n_cols(&self) -> usize {
        self.n_cols
    }

    pub fn nnz(&self) -> usize {
        self.rows.iter().map(Vec::len).sum()
    }

    pub fn row(&self, i: usize) -> &[(usize, f64)] {
        &self.rows[i]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[(usize, f64)]> {
        self.rows.iter().map(Vec::as_slice)
    }

    /// Value at (row, col); zero when absent
    pub fn get(&self, row: usize, col: usize) -> f64 {
        let entries = &self.rows[row];
        match entries.binary_search_by_key(&col, |&(c, _)| c) {
            Ok(pos) => entries[pos].1,
            Err(_) => 0.0,
        }
    }

    /// Dot product of one row with a dense vector
    pub fn row_dot(&self, row: usize, weights: &Array1<f64>) -> f64 {
        self.rows[row].iter().map(|&(col, v)| v * weights[col]).sum()
    }

    /// Subset of rows in the given order
    pub fn select_rows(&self, indices: &[usize]) -> SparseMatrix {
        SparseMatrix {
            n_cols: self.n_cols,
            rows: indices.iter().map(|&i| self.rows[i].clone()).collect(),
        }
    }

    /// Per-column sum
    pub fn column_sums(&self) -> Array1<f64> {
        let mut sums = Array1::<f64>::zeros(self.n_cols);
        for row in &self.rows {
            for &(col, v) in row {
                sums[col] += v;
            }
        }
        sums
    }

    /// Per-column mean over all rows, implicit zeros included
    pub fn column_means(&self) -> Array1<f64> {
        let sums = self.column_sums();
        if self.rows.is_empty() {
            return sums;
        }
        sums / self.rows.len() as f64
    }
}

/// Term-count vectorizer with English stop words and configurable n-grams
#[derive(Debug, Clone)]
pub struct CountVectorizer {
    ngram_range: (usize, usize),
    token_pattern: Regex,
    stop_words: HashSet<&'static str>,
    vocabulary: Option<HashMap<String, usize>>,
    feature_names: Vec<String>,
}

impl CountVectorizer {
    pub fn new() -> Result<Self, VectorizerError> {
        Self::with_ngram_range(1, 1)
    }

    pub fn with_ngram_range(min_n: usize, max_n: usize) -> Result<Self, VectorizerError> {
        if min_n == 0 || min_n > max_n {
            return Err(VectorizerError::InvalidNgramRange(min_n, max_n));
        }
        let token_pattern =
            Regex::new(TOKEN_PATTERN).map_err(|e| VectorizerError::InvalidPattern(e.to_string()))?;
        Ok(Self {
            ngram_range: (min_n, max_n),
            token_pattern,
            stop_words: VECTORIZER_STOP_WORDS.iter().copied().collect(),
            vocabulary: None,
            feature_names: Vec::new(),
        })
    }

    /// Lowercase, tokenize, drop stop words and expand to the configured n-grams
    pub fn analyze(&self, document: &str) -> Vec<String> {
        let lowered = document.to_lowercase();
        let tokens: Vec<&str> = self
            .token_pattern
            .find_iter(&lowered)
            .map(|m| &lowered[m.start()..m.end()])
            .filter(|token| !self.stop_words.contains(token))
            .collect();

        let (min_n, max_n) = self.ngram_range;
        let mut terms = Vec::new();
        for n in min_n..=max_n {
            if n > tokens.len() {
                break;
            }
            for window in tokens.windows(n) {
                terms.push(window.join(" "));
            }
        }
        terms
    }

    /// Learn the vocabulary; feature indices follow lexicographic term order
    pub fn fit<S: AsRef<str>>(&mut self, documents: &[S]) -> Result<(), VectorizerError> {
        let mut terms = BTreeSet::new();
        for document in documents {
            terms.extend(self.analyze(document.as_ref()));
        }
        if terms.is_empty() {
            return Err(VectorizerError::EmptyVocabulary);
        }

        self.feature_names = terms.into_iter().collect();
        self.vocabulary = Some(
            self.feature_names
                .iter()
                .enumerate()
                .map(|(i, term)| (term.clone(), i))
                .collect(),
        );
        debug!("Fitted vocabulary of {} terms", self.feature_names.len());
        Ok(())
    }

    /// Count known terms per document; unknown terms are ignored
    pub fn transform<S: AsRef<str>>(&self, documents: &[S]) -> Result<SparseMatrix, VectorizerError> {
        let vocabulary = self.vocabulary.as_ref().ok_or(VectorizerError::NotFitted)?;
        let mut matrix = SparseMatrix::new(self.feature_names.len());
        for document in documents {
            let mut counts: BTreeMap<usize, f64> = BTreeMap::new();
            for term in self.analyze(document.as_ref()) {
                if let Some(&idx) = vocabulary.get(&term) {
                    *counts.entry(idx).or_insert(0.0) += 1.0;
                }
            }
            matrix.push_row(counts.into_iter().collect());
        }
        Ok(matrix)
    }

    pub fn fit_transform<S: AsRef<str>>(&mut self, documents: &[S]) -> Result<SparseMatrix, VectorizerError> {
        self.fit(documents)?;
        self.transform(documents)
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    pub fn is_fitted(&self) -> bool {
        self.vocabulary.is_some()
    }
}

/// TF-IDF vectorizer: raw counts times smoothed idf, rows L2-normalized
#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    counts: CountVectorizer,
    idf: Option<Array1<f64>>,
}

impl TfidfVectorizer {
    pub fn new() -> Result<Self, VectorizerError> {
        Ok(Self {
            counts: CountVectorizer::new()?,
            idf: None,
        })
    }

    /// Learn vocabulary and `idf = ln((1 + n) / (1 + df)) + 1`
    pub fn fit<S: AsRef<str>>(&mut self, documents: &[S]) -> Result<(), VectorizerError> {
        let counts = self.counts.fit_transform(documents)?;
        let n_docs = counts.n_rows() as f64;

        let mut doc_freq = Array1::<f64>::zeros(counts.n_cols());
        for row in counts.rows() {
            for &(col, _) in row {
                doc_freq[col] += 1.0;
            }
        }

        self.idf = Some(doc_freq.mapv(|df| ((1.0 + n_docs) / (1.0 + df)).ln() + 1.0));
        Ok(())
    }

    pub fn transform<S: AsRef<str>>(&self, documents: &[S]) -> Result<SparseMatrix, VectorizerError> {
        let idf = self.idf.as_ref().ok_or(VectorizerError::NotFitted)?;
        let counts = self.counts.transform(documents)?;

        let mut matrix = SparseMatrix::new(counts.n_cols());
        for row in counts.rows() {
            let mut weighted: Vec<(usize, f64)> = row.iter().map(|&(col, tf)| (col, tf * idf[col])).collect();
            let norm = weighted.iter().map(|&(_, v)| v * v).sum::<f64>().sqrt();
            if norm > 0.0 {
                for entry in &mut weighted {
                    entry.1 /= norm;
                }
            }
            matrix.push_row(weighted);
        }
        Ok(matrix)
    }

    pub fn fit_transform<S: AsRef<str>>(&mut self, documents: &[S]) -> Result<SparseMatrix, VectorizerError> {
        self.fit(documents)?;
        self.transform(documents)
    }

    pub fn feature_names(&self) -> &[String] {
        self.counts.feature_names()
    }

    pub fn idf(&self) -> Option<&Array1<f64>> {
        self.idf.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOCS: [&str; 3] = [
        "senate vote budget",
        "senate passes budget budget",
        "celebrity scandal shocks fans",
    ];

    #[test]
    fn test_stop_word_list_size() {
        let unique: HashSet<_> = VECTORIZER_STOP_WORDS.iter().collect();
        assert_eq!(VECTORIZER_STOP_WORDS.len(), 318);
        assert_eq!(unique.len(), 318);
    }

    #[test]
    fn test_analyze_filters_short_tokens_and_stop_words() {
        let vectorizer = CountVectorizer::new().unwrap();
        assert_eq!(vectorizer.analyze("The Senate, a body of x y"), vec!["senate", "body"]);
    }

    #[test]
    fn test_bigrams_skip_stop_words() {
        let vectorizer = CountVectorizer::with_ngram_range(2, 2).unwrap();
        assert_eq!(
            vectorizer.analyze("white house and the press office"),
            vec!["white house", "house press", "press office"]
        );
    }

    #[test]
    fn test_invalid_ngram_range() {
        assert_eq!(
            CountVectorizer::with_ngram_range(3, 2).unwrap_err(),
            VectorizerError::InvalidNgramRange(3, 2)
        );
    }

    #[test]
    fn test_count_vectorizer_vocabulary_sorted() {
        let mut vectorizer = CountVectorizer::new().unwrap();
        let matrix = vectorizer.fit_transform(&DOCS).unwrap();

        assert_eq!(
            vectorizer.feature_names(),
            &["budget", "celebrity", "fans", "passes", "scandal", "senate", "shocks", "vote"]
        );
        assert_eq!(matrix.n_rows(), 3);
        assert_eq!(matrix.get(1, 0), 2.0); // "budget" twice
        assert_eq!(matrix.get(2, 0), 0.0);
        assert_eq!(matrix.column_sums()[5], 2.0); // "senate"
    }

    #[test]
    fn test_transform_ignores_unknown_terms() {
        let mut vectorizer = CountVectorizer::new().unwrap();
        vectorizer.fit(&DOCS).unwrap();
        let matrix = vectorizer.transform(&["budget unicorn"]).unwrap();
        assert_eq!(matrix.row(0), &[(0usize, 1.0)]);
    }

    #[test]
    fn test_empty_vocabulary() {
        let mut vectorizer = CountVectorizer::new().unwrap();
        assert_eq!(
            vectorizer.fit(&["the and of", ""]).unwrap_err(),
            VectorizerError::EmptyVocabulary
        );
    }

    #[test]
    fn test_transform_before_fit() {
        let vectorizer = TfidfVectorizer::new().unwrap();
        assert_eq!(vectorizer.transform(&["text"]).unwrap_err(), VectorizerError::NotFitted);
    }

    #[test]
    fn test_tfidf_smooth_idf() {
        let mut vectorizer = TfidfVectorizer::new().unwrap();
        vectorizer.fit(&DOCS).unwrap();
        let idf = vectorizer.idf().unwrap();

        // "budget" appears in 2 of 3 documents, "celebrity" in 1
        assert!((idf[0] - ((4.0f64 / 3.0).ln() + 1.0)).abs() < 1e-12);
        assert!((idf[1] - (2.0f64.ln() + 1.0)).abs() < 1e-12);
    }

    #[test]
    fn test_tfidf_rows_unit_norm() {
        let mut vectorizer = TfidfVectorizer::new().unwrap();
        let matrix = vectorizer.fit_transform(&DOCS).unwrap();
        for row in matrix.rows() {
            let norm: f64 = row.iter().map(|&(_, v)| v * v).sum::<f64>().sqrt();
            assert!((norm - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_tfidf_empty_document_row_is_empty() {
        let mut vectorizer = TfidfVectorizer::new().unwrap();
        vectorizer.fit(&DOCS).unwrap();
        let matrix = vectorizer.transform(&[""]).unwrap();
        assert!(matrix.row(0).is_empty());
    }

    #[test]
    fn test_sparse_helpers() {
        let matrix = SparseMatrix::from_dense(&[vec![1.0, 0.0, 2.0], vec![0.0, 3.0, 0.0]]);
        assert_eq!(matrix.nnz(), 3);
        assert_eq!(matrix.row_dot(0, &Array1::from(vec![1.0, 1.0, 1.0])), 3.0);
        let means = matrix.column_means();
        assert_eq!(means.to_vec(), vec![0.5, 1.5, 1.0]);
        let subset = matrix.select_rows(&[1]);
        assert_eq!(subset.n_rows(), 1);
        assert_eq!(subset.get(0, 1), 3.0);
    }
}
