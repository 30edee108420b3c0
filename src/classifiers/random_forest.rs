use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::decision_tree::{DecisionTree, TreeConfig};
use super::{check_features, validate_training, Classifier, ModelError};
use crate::dataset::Label;
use crate::vectorizer::SparseMatrix;

/// Forest hyperparameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForestConfig {
    pub n_estimators: usize,
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    /// Features sampled per node; None means `sqrt(n_features)`
    pub max_features: Option<usize>,
    pub bootstrap: bool,
    pub seed: u64,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: None,
            bootstrap: true,
            seed: 42,
        }
    }
}

impl ForestConfig {
    /// Per-node feature budget for a matrix with `n_features` columns
    pub fn resolved_max_features(&self, n_features: usize) -> usize {
        self.max_features
            .unwrap_or_else(|| (n_features as f64).sqrt() as usize)
            .max(1)
    }
}

/// Bagged ensemble of Gini trees; prediction averages leaf probabilities
#[derive(Debug, Clone, Default)]
pub struct RandomForest {
    pub config: ForestConfig,
    trees: Vec<DecisionTree>,
    n_features: Option<usize>,
}

impl RandomForest {
    pub fn new(config: ForestConfig) -> Self {
        Self {
            config,
            trees: Vec::new(),
            n_features: None,
        }
    }

    pub fn trees(&self) -> &[DecisionTree] {
        &self.trees
    }

    /// Mean class probabilities `[fake, real]` across trees
    pub fn predict_proba(&self, x: &SparseMatrix) -> Result<Vec<[f64; 2]>, ModelError> {
        let n_features = self.n_features.ok_or(ModelError::NotFitted)?;
        check_features(n_features, x)?;

        let n_trees = self.trees.len() as f64;
        Ok((0..x.n_rows())
            .into_par_iter()
            .map(|row| {
                let mut sum = [0.0; 2];
                for tree in &self.trees {
                    let proba = tree.row_proba(x, row);
                    sum[0] += proba[0];
                    sum[1] += proba[1];
                }
                [sum[0] / n_trees, sum[1] / n_trees]
            })
            .collect())
    }
}

impl Classifier for RandomForest {
    fn name(&self) -> &'static str {
        "Random Forest"
    }

    fn fit(&mut self, x: &SparseMatrix, y: &[Label]) -> Result<(), ModelError> {
        if self.config.n_estimators == 0 {
            return Err(ModelError::InvalidParameter(
                "n_estimators must be at least 1".to_string(),
            ));
        }
        validate_training(x, y)?;

        let n = x.n_rows();
        let tree_config = TreeConfig {
            max_depth: self.config.max_depth,
            min_samples_split: self.config.min_samples_split,
            min_samples_leaf: self.config.min_samples_leaf,
            max_features: Some(self.config.resolved_max_features(x.n_cols())),
            seed: self.config.seed,
        };
        info!(
            "Growing {} trees on {} samples ({} features, {} per split)",
            self.config.n_estimators,
            n,
            x.n_cols(),
            self.config.resolved_max_features(x.n_cols())
        );

        // Each tree owns an RNG derived from the forest seed, so results do not
        // depend on how rayon schedules the work
        let trees = (0..self.config.n_estimators)
            .into_par_iter()
            .map(|i| {
                let mut rng = ChaCha8Rng::seed_from_u64(self.config.seed.wrapping_add(i as u64));
                let samples: Vec<usize> = if self.config.bootstrap {
                    (0..n).map(|_| rng.gen_range(0..n)).collect()
                } else {
                    (0..n).collect()
                };

                let mut tree = DecisionTree::new(tree_config.clone());
                tree.fit_samples(x, y, &samples, &mut rng)?;
                debug!("Tree {} grown with {} nodes", i, tree.node_count());
                Ok(tree)
            })
            .collect::<Result<Vec<_>, ModelError>>()?;

        self.trees = trees;
        self.n_features = Some(x.n_cols());
        Ok(())
    }

    fn predict(&self, x: &SparseMatrix) -> Result<Vec<Label>, ModelError> {
        Ok(self
            .predict_proba(x)?
            .into_iter()
            .map(|[fake, real]| if real > fake { Label::Real } else { Label::Fake })
            .collect())
    }
}
