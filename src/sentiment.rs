//! Lexicon-based polarity and subjectivity scoring
//!
//! Each lexicon word carries a polarity in [-1, 1] and a subjectivity in [0, 1].
//! A document scores the mean over the lexicon words it contains. An intensifier
//! scales the next scored word and a negation flips it with damping.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Damping applied when a negation flips the next scored word
const NEGATION_FACTOR: f64 = -0.5;

/// (word, polarity, subjectivity)
const LEXICON: &[(&str, f64, f64)] = &[
    // positive
    ("good", 0.7, 0.6),
    ("great", 0.8, 0.75),
    ("best", 1.0, 0.3),
    ("better", 0.5, 0.5),
    ("excellent", 1.0, 1.0),
    ("amazing", 0.6, 0.9),
    ("wonderful", 1.0, 1.0),
    ("fantastic", 0.4, 0.9),
    ("beautiful", 0.85, 1.0),
    ("happy", 0.8, 1.0),
    ("love", 0.5, 0.6),
    ("nice", 0.6, 1.0),
    ("positive", 0.23, 0.55),
    ("success", 0.3, 0.4),
    ("successful", 0.75, 0.95),
    ("win", 0.8, 0.4),
    ("strong", 0.43, 0.73),
    ("safe", 0.5, 0.5),
    ("important", 0.4, 1.0),
    ("true", 0.35, 0.65),
    ("real", 0.2, 0.3),
    ("free", 0.4, 0.8),
    ("fair", 0.7, 0.9),
    ("popular", 0.6, 0.9),
    ("peaceful", 0.25, 0.5),
    ("honest", 0.6, 0.9),
    ("proud", 0.8, 1.0),
    ("hope", 0.3, 0.5),
    ("support", 0.2, 0.3),
    ("agreement", 0.2, 0.2),
    ("stable", 0.3, 0.4),
    ("growth", 0.2, 0.3),
    ("incredible", 0.9, 0.9),
    ("brilliant", 0.9, 1.0),
    ("perfect", 1.0, 1.0),
    ("easy", 0.43, 0.83),
    ("clear", 0.1, 0.38),
    ("new", 0.14, 0.45),
    ("high", 0.16, 0.54),
    // negative
    ("bad", -0.7, 0.67),
    ("worse", -0.4, 0.6),
    ("worst", -1.0, 1.0),
    ("terrible", -1.0, 1.0),
    ("horrible", -1.0, 1.0),
    ("awful", -1.0, 1.0),
    ("disgusting", -1.0, 1.0),
    ("stupid", -0.8, 1.0),
    ("crazy", -0.6, 0.9),
    ("sick", -0.71, 0.86),
    ("sad", -0.5, 1.0),
    ("angry", -0.5, 1.0),
    ("evil", -1.0, 1.0),
    ("dangerous", -0.6, 0.9),
    ("corrupt", -0.5, 0.5),
    ("false", -0.4, 0.6),
    ("fake", -0.5, 1.0),
    ("wrong", -0.5, 0.9),
    ("illegal", -0.5, 0.5),
    ("poor", -0.4, 0.6),
    ("weak", -0.38, 0.56),
    ("failure", -0.32, 0.3),
    ("failed", -0.5, 0.3),
    ("crisis", -0.4, 0.5),
    ("violent", -0.8, 0.9),
    ("violence", -0.6, 0.7),
    ("attack", -0.4, 0.4),
    ("war", -0.4, 0.4),
    ("dead", -0.2, 0.4),
    ("death", -0.4, 0.4),
    ("kill", -0.5, 0.5),
    ("killed", -0.2, 0.4),
    ("hate", -0.8, 0.9),
    ("fear", -0.4, 0.6),
    ("scandal", -0.5, 0.6),
    ("disaster", -0.8, 0.8),
    ("ridiculous", -0.33, 0.67),
    ("pathetic", -1.0, 1.0),
    ("shocking", -1.0, 1.0),
    ("lie", -0.5, 0.6),
    ("liar", -0.7, 0.8),
    ("low", -0.3, 0.4),
    ("hard", -0.29, 0.54),
    ("difficult", -0.5, 1.0),
    ("threat", -0.4, 0.5),
];

/// Multipliers applied to the next scored word
const INTENSIFIERS: &[(&str, f64)] = &[
    ("very", 1.3),
    ("really", 1.2),
    ("extremely", 1.5),
    ("incredibly", 1.4),
    ("totally", 1.3),
    ("absolutely", 1.4),
    ("completely", 1.3),
    ("highly", 1.3),
    ("truly", 1.2),
    ("so", 1.2),
    ("quite", 1.1),
    ("somewhat", 0.8),
    ("slightly", 0.6),
    ("barely", 0.5),
];

const NEGATIONS: &[&str] = &[
    "not", "no", "never", "neither", "nor", "none", "cannot", "dont", "didnt", "doesnt", "isnt",
    "wasnt", "werent", "wont", "cant", "couldnt", "shouldnt", "wouldnt",
];

/// Polarity and subjectivity of one document
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Sentiment {
    pub polarity: f64,
    pub subjectivity: f64,
}

#[derive(Debug, Clone)]
pub struct SentimentAnalyzer {
    lexicon: HashMap<&'static str, (f64, f64)>,
    intensifiers: HashMap<&'static str, f64>,
    negations: HashSet<&'static str>,
}

impl Default for SentimentAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl SentimentAnalyzer {
    pub fn new() -> Self {
        Self {
            lexicon: LEXICON.iter().map(|&(w, p, s)| (w, (p, s))).collect(),
            intensifiers: INTENSIFIERS.iter().copied().collect(),
            negations: NEGATIONS.iter().copied().collect(),
        }
    }

    /// Lexicon entry for a lowercase word
    pub fn word_score(&self, word: &str) -> Option<Sentiment> {
        self.lexicon.get(word).map(|&(polarity, subjectivity)| Sentiment {
            polarity,
            subjectivity,
        })
    }

    pub fn analyze(&self, text: &str) -> Sentiment {
        let lowered = text.to_lowercase();
        let mut polarity_sum = 0.0;
        let mut subjectivity_sum = 0.0;
        let mut scored = 0usize;
        let mut multiplier = 1.0;
        let mut negated = false;

        for token in lowered
            .split(|c: char| !(c.is_alphanumeric() || c == '\''))
            .map(|t| t.trim_matches('\''))
            .filter(|t| !t.is_empty())
        {
            let token = token.replace('\'', "");
            if self.negations.contains(token.as_str()) {
                negated = true;
                continue;
            }
            if let Some(&factor) = self.intensifiers.get(token.as_str()) {
                multiplier *= factor;
                continue;
            }
            let Some(&(polarity, subjectivity)) = self.lexicon.get(token.as_str()) else {
                continue;
            };

            let mut polarity = (polarity * multiplier).clamp(-1.0, 1.0);
            let subjectivity = (subjectivity * multiplier).clamp(0.0, 1.0);
            if negated {
                polarity *= NEGATION_FACTOR;
            }

            polarity_sum += polarity;
            subjectivity_sum += subjectivity;
            scored += 1;
            multiplier = 1.0;
            negated = false;
        }

        if scored == 0 {
            return Sentiment::default();
        }
        Sentiment {
            polarity: polarity_sum / scored as f64,
            subjectivity: subjectivity_sum / scored as f64,
        }
    }

    pub fn analyze_batch<S: AsRef<str>>(&self, texts: &[S]) -> Vec<Sentiment> {
        texts.iter().map(|t| self.analyze(t.as_ref())).collect()
    }
}
