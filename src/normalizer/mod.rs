// WHY: raw news text -> cleaned, lemmatized token string consumed by vectorizers
// Regexes, stopwords and lemmas are compiled once and shared read-only across threads

use anyhow::Result;
use regex_automata::meta::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use tracing::debug;

pub mod lemmatizer;
pub mod stopwords;

pub use lemmatizer::Lemmatizer;
pub use stopwords::{StopwordChecker, ENGLISH_STOPWORDS};

const URL_PATTERN: &str = r"https?://\S+|www\.\S+";
const DIGIT_PATTERN: &str = r"\d+";
const PUNCTUATION_PATTERN: &str = r"[^\w\s]";
const SOURCE_MARKER_PATTERN: &str = r#"(?i)\(?reuters\)?|"reuters"|reuters"#;

/// Normalizer switches
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizerConfig {
    /// Strip the "Reuters" source signature that leaks the label in the ISOT corpus
    pub strip_source_marker: bool,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            strip_source_marker: true,
        }
    }
}

/// Text normalizer: lowercase, strip URLs/digits/punctuation/source marker,
/// drop stopwords and lemmatize the remaining tokens
#[derive(Debug, Clone)]
pub struct TextNormalizer {
    config: NormalizerConfig,
    url: Regex,
    digits: Regex,
    punctuation: Regex,
    source_marker: Regex,
    stopwords: StopwordChecker,
    lemmatizer: Lemmatizer,
}

static SHARED_NORMALIZER: OnceLock<TextNormalizer> = OnceLock::new();

impl TextNormalizer {
    /// Build a normalizer, compiling every pattern up front
    pub fn new(config: NormalizerConfig) -> Result<Self> {
        debug!(?config, "Compiling normalizer patterns");
        Ok(Self {
            config,
            url: Regex::new(URL_PATTERN)?,
            digits: Regex::new(DIGIT_PATTERN)?,
            punctuation: Regex::new(PUNCTUATION_PATTERN)?,
            source_marker: Regex::new(SOURCE_MARKER_PATTERN)?,
            stopwords: StopwordChecker::new(),
            lemmatizer: Lemmatizer::new(),
        })
    }

    /// Process-wide normalizer with default configuration
    ///
    /// Initialized on first call and never mutated afterwards.
    pub fn shared() -> Result<&'static TextNormalizer> {
        if let Some(normalizer) = SHARED_NORMALIZER.get() {
            return Ok(normalizer);
        }
        let normalizer = TextNormalizer::new(NormalizerConfig::default())?;
        Ok(SHARED_NORMALIZER.get_or_init(|| normalizer))
    }

    pub fn config(&self) -> &NormalizerConfig {
        &self.config
    }

    /// Normalize a possibly-missing document; missing input yields an empty string
    pub fn normalize(&self, text: Option<&str>) -> String {
        let mut result = String::new();
        self.normalize_into(text, &mut result);
        result
    }

    /// Normalize into a caller-supplied buffer, clearing it first
    pub fn normalize_into(&self, text: Option<&str>, buffer: &mut String) {
        buffer.clear();
        let Some(text) = text else {
            return;
        };

        // Order matters: lowercase first, strip symbols before splitting into tokens
        let lowered = text.to_lowercase();
        let without_urls = strip_matches(&self.url, &lowered);
        let without_digits = strip_matches(&self.digits, &without_urls);
        let mut stripped = strip_matches(&self.punctuation, &without_digits);
        if self.config.strip_source_marker {
            stripped = strip_matches(&self.source_marker, &stripped);
        }

        // split_whitespace collapses runs and trims both ends
        for token in stripped.split_whitespace() {
            if self.stopwords.is_stopword(token) {
                continue;
            }
            if !buffer.is_empty() {
                buffer.push(' ');
            }
            buffer.push_str(&self.lemmatizer.lemmatize(token));
        }
    }
}

/// Normalize with the shared default normalizer
///
/// Total over all inputs: if the built-in patterns ever failed to compile the
/// error is logged and the empty string returned.
pub fn normalize(text: Option<&str>) -> String {
    match TextNormalizer::shared() {
        Ok(normalizer) => normalizer.normalize(text),
        Err(e) => {
            tracing::error!("Normalizer initialization failed: {}", e);
            String::new()
        }
    }
}

/// Remove every match of `pattern` from `haystack`
fn strip_matches(pattern: &Regex, haystack: &str) -> String {
    let mut result = String::with_capacity(haystack.len());
    let mut last_end = 0;
    for mat in pattern.find_iter(haystack) {
        result.push_str(&haystack[last_end..mat.start()]);
        last_end = mat.end();
    }
    result.push_str(&haystack[last_end..]);
    result
}
