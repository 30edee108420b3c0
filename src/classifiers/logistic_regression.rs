//! L2-regularized logistic regression for fake/real classification

use ndarray::Array1;
use tracing::debug;

use super::{check_features, validate_training, Classifier, ModelError};
use crate::dataset::Label;
use crate::vectorizer::SparseMatrix;

/// Logistic regression fitted by full-batch gradient descent
///
/// Minimizes `mean log-loss + ||w||^2 / (2 * C * n)`, the per-sample form of the
/// usual `C * sum(log-loss) + ||w||^2 / 2` objective. The intercept is not penalized.
#[derive(Debug, Clone)]
pub struct LogisticRegression {
    /// Inverse regularization strength
    pub c: f64,
    pub max_iter: usize,
    pub learning_rate: f64,
    /// Stop when the loss changes by less than this between iterations
    pub tolerance: f64,
    coefficients: Option<Array1<f64>>,
    intercept: f64,
    /// Loss per iteration of the last fit
    pub loss_history: Vec<f64>,
}

impl Default for LogisticRegression {
    fn default() -> Self {
        Self::new(1.0, 1000)
    }
}

impl LogisticRegression {
    pub fn new(c: f64, max_iter: usize) -> Self {
        Self {
            c,
            max_iter,
            learning_rate: 1.0,
            tolerance: 1e-6,
            coefficients: None,
            intercept: 0.0,
            loss_history: Vec::new(),
        }
    }

    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    fn sigmoid(z: f64) -> f64 {
        if z >= 0.0 {
            1.0 / (1.0 + (-z).exp())
        } else {
            let exp_z = z.exp();
            exp_z / (1.0 + exp_z)
        }
    }

    pub fn coefficients(&self) -> Option<&Array1<f64>> {
        self.coefficients.as_ref()
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// Probability of the real class for each row
    pub fn predict_proba(&self, x: &SparseMatrix) -> Result<Vec<f64>, ModelError> {
        let weights = self.coefficients.as_ref().ok_or(ModelError::NotFitted)?;
        check_features(weights.len(), x)?;
        Ok((0..x.n_rows())
            .map(|i| Self::sigmoid(x.row_dot(i, weights) + self.intercept))
            .collect())
    }
}

impl Classifier for LogisticRegression {
    fn name(&self) -> &'static str {
        "Logistic Regression"
    }

    fn fit(&mut self, x: &SparseMatrix, y: &[Label]) -> Result<(), ModelError> {
        if self.c <= 0.0 || self.learning_rate <= 0.0 {
            return Err(ModelError::InvalidParameter(
                "C and learning rate must be positive".to_string(),
            ));
        }
        validate_training(x, y)?;

        let n = x.n_rows() as f64;
        let penalty = 1.0 / (self.c * n);
        let targets: Vec<f64> = y.iter().map(|label| label.index() as f64).collect();

        let mut weights = Array1::<f64>::zeros(x.n_cols());
        let mut bias = 0.0;
        self.loss_history.clear();

        for iter in 0..self.max_iter {
            let mut gradient = &weights * penalty;
            let mut bias_gradient = 0.0;
            let mut loss = 0.5 * penalty * weights.dot(&weights);

            for (i, &target) in targets.iter().enumerate() {
                let p = Self::sigmoid(x.row_dot(i, &weights) + bias);
                let p_clipped = p.clamp(1e-15, 1.0 - 1e-15);
                loss -= (target * p_clipped.ln() + (1.0 - target) * (1.0 - p_clipped).ln()) / n;

                let error = (p - target) / n;
                for &(col, v) in x.row(i) {
                    gradient[col] += v * error;
                }
                bias_gradient += error;
            }

            weights.scaled_add(-self.learning_rate, &gradient);
            bias -= self.learning_rate * bias_gradient;
            self.loss_history.push(loss);

            if iter > 0 && (self.loss_history[iter - 1] - loss).abs() < self.tolerance {
                debug!("Logistic regression converged at iteration {}", iter);
                break;
            }
        }

        self.coefficients = Some(weights);
        self.intercept = bias;
        Ok(())
    }

    fn predict(&self, x: &SparseMatrix) -> Result<Vec<Label>, ModelError> {
        Ok(self
            .predict_proba(x)?
            .into_iter()
            .map(|p| if p > 0.5 { Label::Real } else { Label::Fake })
            .collect())
    }
}
