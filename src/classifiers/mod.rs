//! Binary fake/real classifiers over sparse TF-IDF features
//!
//! - Logistic regression (L2, gradient descent)
//! - Multinomial naive Bayes
//! - Random forest of Gini trees

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::dataset::Label;
use crate::vectorizer::SparseMatrix;

pub mod decision_tree;
pub mod logistic_regression;
pub mod naive_bayes;
pub mod random_forest;

pub use decision_tree::{DecisionTree, TreeConfig};
pub use logistic_regression::LogisticRegression;
pub use naive_bayes::MultinomialNb;
pub use random_forest::{ForestConfig, RandomForest};

/// Errors raised while fitting or applying a model
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("Model has not been fitted yet")]
    NotFitted,

    #[error("Dimension mismatch: expected {expected} features, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("Got {samples} samples but {labels} labels")]
    LengthMismatch { samples: usize, labels: usize },

    #[error("Training set is empty")]
    EmptyTrainingSet,

    #[error("Training set contains a single class; need both fake and real samples")]
    SingleClass,

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Common surface of the three classifiers
pub trait Classifier: Send + Sync {
    /// Display name used in reports
    fn name(&self) -> &'static str;

    fn fit(&mut self, x: &SparseMatrix, y: &[Label]) -> Result<(), ModelError>;

    fn predict(&self, x: &SparseMatrix) -> Result<Vec<Label>, ModelError>;
}

/// Which classifier to train
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModelKind {
    LogisticRegression,
    NaiveBayes,
    RandomForest,
}

impl ModelKind {
    pub const ALL: [ModelKind; 3] = [
        ModelKind::LogisticRegression,
        ModelKind::NaiveBayes,
        ModelKind::RandomForest,
    ];
}

impl FromStr for ModelKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "logistic" | "logistic-regression" | "lr" => Ok(ModelKind::LogisticRegression),
            "naive-bayes" | "nb" | "bayes" => Ok(ModelKind::NaiveBayes),
            "random-forest" | "rf" | "forest" => Ok(ModelKind::RandomForest),
            other => Err(format!(
                "unknown model '{other}' (expected logistic, naive-bayes or random-forest)"
            )),
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ModelKind::LogisticRegression => "logistic-regression",
            ModelKind::NaiveBayes => "naive-bayes",
            ModelKind::RandomForest => "random-forest",
        };
        write!(f, "{name}")
    }
}

/// Check shapes and class coverage; returns per-class sample counts
pub(crate) fn validate_training(x: &SparseMatrix, y: &[Label]) -> Result<[usize; 2], ModelError> {
    if x.n_rows() != y.len() {
        return Err(ModelError::LengthMismatch {
            samples: x.n_rows(),
            labels: y.len(),
        });
    }
    if y.is_empty() {
        return Err(ModelError::EmptyTrainingSet);
    }
    let mut counts = [0usize; 2];
    for label in y {
        counts[label.index()] += 1;
    }
    if counts.contains(&0) {
        return Err(ModelError::SingleClass);
    }
    Ok(counts)
}

pub(crate) fn check_features(expected: usize, x: &SparseMatrix) -> Result<(), ModelError> {
    if x.n_cols() != expected {
        return Err(ModelError::DimensionMismatch {
            expected,
            got: x.n_cols(),
        });
    }
    Ok(())
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_kind_parsing() {
        assert_eq!("logistic".parse::<ModelKind>(), Ok(ModelKind::LogisticRegression));
        assert_eq!("NB".parse::<ModelKind>(), Ok(ModelKind::NaiveBayes));
        assert_eq!("random-forest".parse::<ModelKind>(), Ok(ModelKind::RandomForest));
        assert!("svm".parse::<ModelKind>().is_err());
        assert_eq!(ModelKind::NaiveBayes.to_string(), "naive-bayes");
    }

    #[test]
    fn test_validate_training() {
        let x = SparseMatrix::from_dense(&[vec![1.0], vec![2.0]]);
        assert_eq!(validate_training(&x, &[Label::Fake, Label::Real]), Ok([1, 1]));
        assert_eq!(
            validate_training(&x, &[Label::Fake]),
            Err(ModelError::LengthMismatch { samples: 2, labels: 1 })
        );
        assert_eq!(
            validate_training(&x, &[Label::Real, Label::Real]),
            Err(ModelError::SingleClass)
        );
        assert_eq!(
            validate_training(&SparseMatrix::new(1), &[]),
            Err(ModelError::EmptyTrainingSet)
        );
    }
}
