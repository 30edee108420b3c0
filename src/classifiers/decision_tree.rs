// WHY: CART-style Gini tree that splits directly on sparse rows
// Implicit zeros form one group per feature, so a node only scans the features
// that are nonzero in at least one of its samples

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::{check_features, validate_training, Classifier, ModelError};
use crate::dataset::Label;
use crate::vectorizer::SparseMatrix;

/// Growth limits for a single tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeConfig {
    /// None grows until leaves are pure or too small to split
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    /// Features sampled per node; None considers every candidate
    pub max_features: Option<usize>,
    pub seed: u64,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: None,
            seed: 42,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Leaf {
        proba: [f64; 2],
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

struct SplitCandidate {
    feature: usize,
    threshold: f64,
    impurity: f64,
}

/// Binary decision tree; nodes live in a flat arena, root at index 0
#[derive(Debug, Clone)]
pub struct DecisionTree {
    pub config: TreeConfig,
    nodes: Vec<Node>,
    n_features: Option<usize>,
}

impl Default for DecisionTree {
    fn default() -> Self {
        Self::new(TreeConfig::default())
    }
}

fn gini(counts: [usize; 2]) -> f64 {
    let n = (counts[0] + counts[1]) as f64;
    if n == 0.0 {
        return 0.0;
    }
    let p0 = counts[0] as f64 / n;
    let p1 = counts[1] as f64 / n;
    1.0 - p0 * p0 - p1 * p1
}

fn class_counts(y: &[Label], samples: &[usize]) -> [usize; 2] {
    let mut counts = [0usize; 2];
    for &s in samples {
        counts[y[s].index()] += 1;
    }
    counts
}

fn leaf(counts: [usize; 2]) -> Node {
    let n = (counts[0] + counts[1]).max(1) as f64;
    Node::Leaf {
        proba: [counts[0] as f64 / n, counts[1] as f64 / n],
    }
}

impl DecisionTree {
    pub fn new(config: TreeConfig) -> Self {
        Self {
            config,
            nodes: Vec::new(),
            n_features: None,
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Longest root-to-leaf path; 0 for a single leaf
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(0usize, 0usize)];
        while let Some((id, depth)) = stack.pop() {
            match self.nodes.get(id) {
                Some(Node::Split { left, right, .. }) => {
                    stack.push((*left, depth + 1));
                    stack.push((*right, depth + 1));
                }
                Some(Node::Leaf { .. }) => deepest = deepest.max(depth),
                None => {}
            }
        }
        deepest
    }

    /// Grow the tree on a (possibly repeated) subset of rows
    ///
    /// Used directly by the forest with bootstrap samples; no class-coverage check here.
    pub fn fit_samples<R: Rng + ?Sized>(
        &mut self,
        x: &SparseMatrix,
        y: &[Label],
        samples: &[usize],
        rng: &mut R,
    ) -> Result<(), ModelError> {
        if x.n_rows() != y.len() {
            return Err(ModelError::LengthMismatch {
                samples: x.n_rows(),
                labels: y.len(),
            });
        }
        if samples.is_empty() {
            return Err(ModelError::EmptyTrainingSet);
        }
        if self.config.min_samples_split < 2 || self.config.min_samples_leaf == 0 {
            return Err(ModelError::InvalidParameter(
                "min_samples_split must be >= 2 and min_samples_leaf >= 1".to_string(),
            ));
        }

        self.nodes.clear();
        self.nodes.push(leaf([0, 0]));
        let mut stack = vec![(0usize, samples.to_vec(), 0usize)];

        while let Some((node_id, node_samples, depth)) = stack.pop() {
            let counts = class_counts(y, &node_samples);
            let pure = counts[0] == 0 || counts[1] == 0;
            let depth_reached = self.config.max_depth.is_some_and(|max| depth >= max);

            if pure || depth_reached || node_samples.len() < self.config.min_samples_split {
                self.nodes[node_id] = leaf(counts);
                continue;
            }

            let Some(split) = self.best_split(x, y, &node_samples, counts, rng) else {
                self.nodes[node_id] = leaf(counts);
                continue;
            };

            let (left_samples, right_samples): (Vec<usize>, Vec<usize>) = node_samples
                .iter()
                .partition(|&&s| x.get(s, split.feature) <= split.threshold);

            let left = self.nodes.len();
            let right = left + 1;
            self.nodes.push(leaf([0, 0]));
            self.nodes.push(leaf([0, 0]));
            self.nodes[node_id] = Node::Split {
                feature: split.feature,
                threshold: split.threshold,
                left,
                right,
            };
            stack.push((right, right_samples, depth + 1));
            stack.push((left, left_samples, depth + 1));
        }

        self.n_features = Some(x.n_cols());
        Ok(())
    }

    fn best_split<R: Rng + ?Sized>(
        &self,
        x: &SparseMatrix,
        y: &[Label],
        samples: &[usize],
        counts: [usize; 2],
        rng: &mut R,
    ) -> Option<SplitCandidate> {
        let mut nonzero: HashMap<usize, Vec<(f64, usize)>> = HashMap::new();
        for &s in samples {
            let class = y[s].index();
            for &(col, v) in x.row(s) {
                nonzero.entry(col).or_default().push((v, class));
            }
        }

        let mut features: Vec<usize> = nonzero.keys().copied().collect();
        features.sort_unstable();
        if let Some(k) = self.config.max_features {
            if k < features.len() {
                features = features.choose_multiple(rng, k).copied().collect();
            }
        }

        let n = samples.len();
        let min_leaf = self.config.min_samples_leaf;
        let mut best: Option<SplitCandidate> = None;

        for feature in features {
            let Some(entries) = nonzero.remove(&feature) else {
                continue;
            };

            // (value, class counts) groups; all implicit zeros share one group
            let mut zero_counts = counts;
            let mut groups: Vec<(f64, [usize; 2])> = Vec::with_capacity(entries.len() + 1);
            for (v, class) in entries {
                zero_counts[class] -= 1;
                let mut one = [0usize; 2];
                one[class] = 1;
                groups.push((v, one));
            }
            if zero_counts[0] + zero_counts[1] > 0 {
                groups.push((0.0, zero_counts));
            }
            groups.sort_by(|a, b| a.0.total_cmp(&b.0));

            let mut left = [0usize; 2];
            for i in 0..groups.len().saturating_sub(1) {
                left[0] += groups[i].1[0];
                left[1] += groups[i].1[1];
                if groups[i].0 >= groups[i + 1].0 {
                    continue;
                }

                let n_left = left[0] + left[1];
                let n_right = n - n_left;
                if n_left < min_leaf || n_right < min_leaf {
                    continue;
                }

                let right = [counts[0] - left[0], counts[1] - left[1]];
                let impurity = (n_left as f64 * gini(left) + n_right as f64 * gini(right)) / n as f64;
                if best.as_ref().map_or(true, |b| impurity < b.impurity) {
                    best = Some(SplitCandidate {
                        feature,
                        threshold: (groups[i].0 + groups[i + 1].0) / 2.0,
                        impurity,
                    });
                }
            }
        }

        best
    }

    /// Leaf class distribution reached by one row
    pub(crate) fn row_proba(&self, x: &SparseMatrix, row: usize) -> [f64; 2] {
        let mut id = 0;
        loop {
            match &self.nodes[id] {
                Node::Leaf { proba } => return *proba,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    id = if x.get(row, *feature) <= *threshold { *left } else { *right };
                }
            }
        }
    }

    /// Class probabilities `[fake, real]` per row
    pub fn predict_proba(&self, x: &SparseMatrix) -> Result<Vec<[f64; 2]>, ModelError> {
        let n_features = self.n_features.ok_or(ModelError::NotFitted)?;
        check_features(n_features, x)?;
        Ok((0..x.n_rows()).map(|row| self.row_proba(x, row)).collect())
    }
}

impl Classifier for DecisionTree {
    fn name(&self) -> &'static str {
        "Decision Tree"
    }

    fn fit(&mut self, x: &SparseMatrix, y: &[Label]) -> Result<(), ModelError> {
        validate_training(x, y)?;
        let samples: Vec<usize> = (0..x.n_rows()).collect();
        let mut rng = ChaCha8Rng::seed_from_u64(self.config.seed);
        self.fit_samples(x, y, &samples, &mut rng)
    }

    fn predict(&self, x: &SparseMatrix) -> Result<Vec<Label>, ModelError> {
        Ok(self
            .predict_proba(x)?
            .into_iter()
            .map(|[fake, real]| if real > fake { Label::Real } else { Label::Fake })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifiers::test_support::{query_rows, separable_corpus};

    #[test]
    fn test_gini() {
        assert_eq!(gini([5, 0]), 0.0);
        assert_eq!(gini([2, 2]), 0.5);
        assert_eq!(gini([0, 0]), 0.0);
    }

    #[test]
    fn test_learns_separable_corpus_with_one_split() {
        let (x, y) = separable_corpus();
        let mut tree = DecisionTree::default();
        tree.fit(&x, &y).unwrap();

        assert_eq!(tree.predict(&x).unwrap(), y);
        assert_eq!(tree.predict(&query_rows()).unwrap(), vec![Label::Fake, Label::Real]);
        assert_eq!(tree.node_count(), 3);
        assert_eq!(tree.depth(), 1);
    }

    #[test]
    fn test_zero_depth_is_majority_leaf() {
        let x = SparseMatrix::from_dense(&[vec![1.0], vec![2.0], vec![3.0]]);
        let y = [Label::Real, Label::Real, Label::Fake];
        let mut tree = DecisionTree::new(TreeConfig {
            max_depth: Some(0),
            ..TreeConfig::default()
        });
        tree.fit(&x, &y).unwrap();

        assert_eq!(tree.node_count(), 1);
        let proba = tree.predict_proba(&x).unwrap();
        assert!((proba[0][1] - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(tree.predict(&x).unwrap(), vec![Label::Real; 3]);
    }

    #[test]
    fn test_threshold_between_values() {
        // Only feature 0 separates; zeros sit on the left
        let x = SparseMatrix::from_dense(&[vec![0.0, 1.0], vec![0.0, 1.0], vec![4.0, 1.0], vec![6.0, 1.0]]);
        let y = [Label::Fake, Label::Fake, Label::Real, Label::Real];
        let mut tree = DecisionTree::default();
        tree.fit(&x, &y).unwrap();

        let queries = SparseMatrix::from_dense(&[vec![1.9, 0.0], vec![2.1, 0.0]]);
        assert_eq!(tree.predict(&queries).unwrap(), vec![Label::Fake, Label::Real]);
    }

    #[test]
    fn test_min_samples_leaf_blocks_small_leaves() {
        let x = SparseMatrix::from_dense(&[vec![1.0], vec![2.0], vec![3.0], vec![4.0]]);
        let y = [Label::Fake, Label::Real, Label::Real, Label::Real];
        let mut tree = DecisionTree::new(TreeConfig {
            min_samples_leaf: 2,
            ..TreeConfig::default()
        });
        tree.fit(&x, &y).unwrap();

        // The only pure split would leave one sample on the left
        let proba = tree.predict_proba(&SparseMatrix::from_dense(&[vec![1.0]])).unwrap();
        assert_eq!(proba[0], [0.5, 0.5]);
    }

    #[test]
    fn test_duplicate_rows_with_conflicting_labels_stop() {
        let x = SparseMatrix::from_dense(&[vec![1.0], vec![1.0]]);
        let y = [Label::Fake, Label::Real];
        let mut tree = DecisionTree::default();
        tree.fit(&x, &y).unwrap();
        assert_eq!(tree.node_count(), 1);
        // Ties go to fake
        assert_eq!(tree.predict(&x).unwrap(), vec![Label::Fake, Label::Fake]);
    }

    #[test]
    fn test_predict_before_fit() {
        let tree = DecisionTree::default();
        assert_eq!(tree.predict(&query_rows()).unwrap_err(), ModelError::NotFitted);
    }

    #[test]
    fn test_invalid_config() {
        let (x, y) = separable_corpus();
        let mut tree = DecisionTree::new(TreeConfig {
            min_samples_leaf: 0,
            ..TreeConfig::default()
        });
        assert!(matches!(tree.fit(&x, &y), Err(ModelError::InvalidParameter(_))));
    }
}
