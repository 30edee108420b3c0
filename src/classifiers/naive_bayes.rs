use ndarray::{Array1, Array2, Axis};

use super::{check_features, validate_training, Classifier, ModelError};
use crate::dataset::Label;
use crate::vectorizer::SparseMatrix;

/// Multinomial naive Bayes with additive (Laplace/Lidstone) smoothing
///
/// Works on any non-negative feature values; TF-IDF weights are treated as fractional counts.
#[derive(Debug, Clone)]
pub struct MultinomialNb {
    pub alpha: f64,
    /// Shape `(2, n_features)`, row per class in label order
    feature_log_prob: Option<Array2<f64>>,
    class_log_prior: [f64; 2],
}

impl Default for MultinomialNb {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl MultinomialNb {
    pub fn new(alpha: f64) -> Self {
        Self {
            alpha,
            feature_log_prob: None,
            class_log_prior: [0.0; 2],
        }
    }

    pub fn feature_log_prob(&self) -> Option<&Array2<f64>> {
        self.feature_log_prob.as_ref()
    }

    pub fn class_log_prior(&self) -> [f64; 2] {
        self.class_log_prior
    }

    /// Unnormalized joint log likelihood per row, one column per class
    pub fn joint_log_likelihood(&self, x: &SparseMatrix) -> Result<Vec<[f64; 2]>, ModelError> {
        let flp = self.feature_log_prob.as_ref().ok_or(ModelError::NotFitted)?;
        check_features(flp.ncols(), x)?;

        Ok(x
            .rows()
            .map(|row| {
                let mut scores = self.class_log_prior;
                for &(col, v) in row {
                    scores[0] += v * flp[[0, col]];
                    scores[1] += v * flp[[1, col]];
                }
                scores
            })
            .collect())
    }
}

impl Classifier for MultinomialNb {
    fn name(&self) -> &'static str {
        "Naive Bayes"
    }

    fn fit(&mut self, x: &SparseMatrix, y: &[Label]) -> Result<(), ModelError> {
        if self.alpha < 0.0 {
            return Err(ModelError::InvalidParameter("alpha must be non-negative".to_string()));
        }
        let class_counts = validate_training(x, y)?;

        let mut feature_counts = Array2::<f64>::zeros((2, x.n_cols()));
        for (row, label) in x.rows().zip(y) {
            for &(col, v) in row {
                if v < 0.0 {
                    return Err(ModelError::InvalidParameter(
                        "naive Bayes needs non-negative features".to_string(),
                    ));
                }
                feature_counts[[label.index(), col]] += v;
            }
        }

        let smoothed = feature_counts + self.alpha;
        let totals: Array1<f64> = smoothed.sum_axis(Axis(1));
        let mut flp = smoothed.mapv(f64::ln);
        for (class, mut class_row) in flp.axis_iter_mut(Axis(0)).enumerate() {
            class_row -= totals[class].ln();
        }

        let n = y.len() as f64;
        self.class_log_prior = [
            (class_counts[0] as f64 / n).ln(),
            (class_counts[1] as f64 / n).ln(),
        ];
        self.feature_log_prob = Some(flp);
        Ok(())
    }

    fn predict(&self, x: &SparseMatrix) -> Result<Vec<Label>, ModelError> {
        Ok(self
            .joint_log_likelihood(x)?
            .into_iter()
            .map(|[fake, real]| if real > fake { Label::Real } else { Label::Fake })
            .collect())
    }
}
