// WHY: the per-class exploratory views (frequent words, bigrams, mean TF-IDF,
// sentiment spread) reported as ranked tables and box-plot statistics

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::dataset::{Article, Label};
use crate::sentiment::SentimentAnalyzer;
use crate::vectorizer::{CountVectorizer, SparseMatrix, TfidfVectorizer, VectorizerError};

/// A term with its count or weight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermScore {
    pub term: String,
    pub score: f64,
}

/// Min, quartiles and max with linear interpolation between order statistics
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FiveNumberSummary {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

impl FiveNumberSummary {
    /// None for an empty slice
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let quantile = |q: f64| {
            let pos = q * (sorted.len() - 1) as f64;
            let lower = pos.floor() as usize;
            let upper = pos.ceil() as usize;
            sorted[lower] + (sorted[upper] - sorted[lower]) * (pos - lower as f64)
        };

        Some(Self {
            min: sorted[0],
            q1: quantile(0.25),
            median: quantile(0.5),
            q3: quantile(0.75),
            max: sorted[sorted.len() - 1],
        })
    }
}

/// Sentiment distribution for one class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassSentiment {
    pub label: Label,
    pub documents: usize,
    pub polarity: Option<FiveNumberSummary>,
    pub subjectivity: Option<FiveNumberSummary>,
}

/// Every exploratory view for one class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassExploration {
    pub label: Label,
    pub top_words: Vec<TermScore>,
    pub top_bigrams: Vec<TermScore>,
    pub top_tfidf_terms: Vec<TermScore>,
    pub sentiment: ClassSentiment,
}

fn class_documents(articles: &[Article], label: Label) -> Vec<&str> {
    articles
        .iter()
        .filter(|a| a.label == label)
        .map(|a| a.full_text_clean.as_str())
        .collect()
}

/// Highest scores first, ties broken by term, cut to `top_n`
fn rank(feature_names: &[String], scores: &[f64], top_n: usize) -> Vec<TermScore> {
    let mut ranked: Vec<TermScore> = feature_names
        .iter()
        .zip(scores)
        .map(|(term, &score)| TermScore {
            term: term.clone(),
            score,
        })
        .collect();
    ranked.sort_by(|a, b| b.score.total_cmp(&a.score).then_with(|| a.term.cmp(&b.term)));
    ranked.truncate(top_n);
    ranked
}

/// A class with no usable terms ranks nothing rather than failing
fn ranked_or_empty(
    fitted: Result<(Vec<String>, SparseMatrix), VectorizerError>,
    top_n: usize,
    mean: bool,
) -> Result<Vec<TermScore>, VectorizerError> {
    match fitted {
        Ok((names, matrix)) => {
            let scores = if mean { matrix.column_means() } else { matrix.column_sums() };
            Ok(rank(&names, &scores.to_vec(), top_n))
        }
        Err(VectorizerError::EmptyVocabulary) => Ok(Vec::new()),
        Err(e) => Err(e),
    }
}

/// Most frequent n-grams in one class over `full_text_clean`
pub fn top_ngrams_by_class(
    articles: &[Article],
    label: Label,
    ngram_range: (usize, usize),
    top_n: usize,
) -> Result<Vec<TermScore>, VectorizerError> {
    let documents = class_documents(articles, label);
    let mut vectorizer = CountVectorizer::with_ngram_range(ngram_range.0, ngram_range.1)?;
    let fitted = vectorizer
        .fit_transform(&documents)
        .map(|matrix| (vectorizer.feature_names().to_vec(), matrix));
    ranked_or_empty(fitted, top_n, false)
}

/// Most frequent words in one class
pub fn top_words_by_class(articles: &[Article], label: Label, top_n: usize) -> Result<Vec<TermScore>, VectorizerError> {
    top_ngrams_by_class(articles, label, (1, 1), top_n)
}

/// Most frequent bigrams in one class
pub fn top_bigrams_by_class(articles: &[Article], label: Label, top_n: usize) -> Result<Vec<TermScore>, VectorizerError> {
    top_ngrams_by_class(articles, label, (2, 2), top_n)
}

/// Terms with the highest mean TF-IDF weight within one class
///
/// The vectorizer is fitted on that class alone, so idf reflects the class's own documents.
pub fn top_tfidf_terms_by_class(
    articles: &[Article],
    label: Label,
    top_n: usize,
) -> Result<Vec<TermScore>, VectorizerError> {
    let documents = class_documents(articles, label);
    let mut vectorizer = TfidfVectorizer::new()?;
    let fitted = vectorizer
        .fit_transform(&documents)
        .map(|matrix| (vectorizer.feature_names().to_vec(), matrix));
    ranked_or_empty(fitted, top_n, true)
}

/// Polarity and subjectivity spread per class, fake first
pub fn sentiment_by_class(articles: &[Article], analyzer: &SentimentAnalyzer) -> Vec<ClassSentiment> {
    let scores: Vec<(Label, f64, f64)> = articles
        .par_iter()
        .map(|a| {
            let s = analyzer.analyze(&a.full_text_clean);
            (a.label, s.polarity, s.subjectivity)
        })
        .collect();

    Label::ALL
        .iter()
        .map(|&label| {
            let (polarity, subjectivity): (Vec<f64>, Vec<f64>) = scores
                .iter()
                .filter(|(l, _, _)| *l == label)
                .map(|&(_, p, s)| (p, s))
                .unzip();
            ClassSentiment {
                label,
                documents: polarity.len(),
                polarity: FiveNumberSummary::from_values(&polarity),
                subjectivity: FiveNumberSummary::from_values(&subjectivity),
            }
        })
        .collect()
}

/// Run every view for both classes
pub fn explore(articles: &[Article], top_n: usize) -> Result<Vec<ClassExploration>, VectorizerError> {
    let analyzer = SentimentAnalyzer::new();
    let sentiments = sentiment_by_class(articles, &analyzer);

    let mut classes = Vec::with_capacity(Label::ALL.len());
    for (label, sentiment) in Label::ALL.into_iter().zip(sentiments) {
        classes.push(ClassExploration {
            label,
            top_words: top_words_by_class(articles, label, top_n)?,
            top_bigrams: top_bigrams_by_class(articles, label, top_n)?,
            top_tfidf_terms: top_tfidf_terms_by_class(articles, label, top_n)?,
            sentiment,
        });
        info!("Explored class {} ({})", label, label.target_name());
    }
    Ok(classes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(clean: &str, label: Label) -> Article {
        Article {
            title: String::new(),
            text: clean.to_string(),
            subject: "News".to_string(),
            full_text: clean.to_string(),
            full_text_clean: clean.to_string(),
            label,
        }
    }

    fn corpus() -> Vec<Article> {
        vec![
            article("hillary clinton email scandal", Label::Fake),
            article("clinton email shocking truth", Label::Fake),
            article("great video clinton", Label::Fake),
            article("white house said statement", Label::Real),
            article("white house senate vote", Label::Real),
        ]
    }

    #[test]
    fn test_top_words_ranked_with_ties_by_term() {
        let top = top_words_by_class(&corpus(), Label::Fake, 3).unwrap();
        let terms: Vec<&str> = top.iter().map(|t| t.term.as_str()).collect();
        assert_eq!(terms, vec!["clinton", "email", "great"]);
        assert_eq!(top[0].score, 3.0);
        assert_eq!(top[1].score, 2.0);
    }

    #[test]
    fn test_top_words_only_from_requested_class() {
        let top = top_words_by_class(&corpus(), Label::Real, 10).unwrap();
        assert!(top.iter().all(|t| t.term != "clinton"));
        assert_eq!(top[0].term, "house");
    }

    #[test]
    fn test_top_bigrams() {
        let top = top_bigrams_by_class(&corpus(), Label::Real, 1).unwrap();
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].term, "white house");
        assert_eq!(top[0].score, 2.0);
    }

    #[test]
    fn test_top_tfidf_terms_are_means() {
        let top = top_tfidf_terms_by_class(&corpus(), Label::Fake, 5).unwrap();
        assert_eq!(top.len(), 5);
        assert_eq!(top[0].term, "clinton");
        assert!(top.windows(2).all(|w| w[0].score >= w[1].score));
        assert!(top.iter().all(|t| t.score > 0.0 && t.score <= 1.0));
    }

    #[test]
    fn test_empty_class_ranks_nothing() {
        let only_fake: Vec<Article> = corpus().into_iter().filter(|a| a.label == Label::Fake).collect();
        assert!(top_words_by_class(&only_fake, Label::Real, 5).unwrap().is_empty());
        assert!(top_tfidf_terms_by_class(&only_fake, Label::Real, 5).unwrap().is_empty());
    }

    #[test]
    fn test_five_number_summary() {
        let summary = FiveNumberSummary::from_values(&[5.0, 1.0, 3.0, 2.0, 4.0]).unwrap();
        assert_eq!(summary.min, 1.0);
        assert_eq!(summary.q1, 2.0);
        assert_eq!(summary.median, 3.0);
        assert_eq!(summary.q3, 4.0);
        assert_eq!(summary.max, 5.0);

        let even = FiveNumberSummary::from_values(&[1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(even.median, 2.5);
        assert_eq!(even.q1, 1.75);
        assert!(FiveNumberSummary::from_values(&[]).is_none());
    }

    #[test]
    fn test_sentiment_by_class() {
        let analyzer = SentimentAnalyzer::new();
        let classes = sentiment_by_class(&corpus(), &analyzer);
        assert_eq!(classes.len(), 2);
        assert_eq!(classes[0].label, Label::Fake);
        assert_eq!(classes[0].documents, 3);
        assert_eq!(classes[1].documents, 2);

        let fake_polarity = classes[0].polarity.unwrap();
        // "great" scores highest, "shocking" lowest
        assert_eq!(fake_polarity.max, 0.8);
        assert_eq!(fake_polarity.min, -1.0);
    }

    #[test]
    fn test_explore_covers_both_classes() {
        let report = explore(&corpus(), 2).unwrap();
        assert_eq!(report.len(), 2);
        assert_eq!(report[0].label, Label::Fake);
        assert_eq!(report[0].top_words.len(), 2);
        assert_eq!(report[1].top_bigrams[0].term, "white house");
    }
}
