//! Random-forest classification over the PCA-reduced expression vector.
//!
//! Trees are stored in flat array-of-nodes form: node `i` is a leaf when
//! `children_left[i] == TREE_LEAF`, otherwise it splits on
//! `feature[i] <= threshold[i]`. Split comparisons are made in single
//! precision, the precision the forest was fitted in.

use serde::{Deserialize, Serialize};

use crate::ModelError;

/// Child index marking a leaf node.
pub const TREE_LEAF: i64 = -1;

/// One fitted decision tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTree {
    pub children_left: Vec<i64>,
    pub children_right: Vec<i64>,
    pub feature: Vec<i64>,
    pub threshold: Vec<f64>,
    /// Per-node class weights (sample counts or fractions).
    pub value: Vec<Vec<f64>>,
}

impl DecisionTree {
    pub fn node_count(&self) -> usize {
        self.children_left.len()
    }

    /// Check the node arrays describe a tree whose traversal always terminates.
    ///
    /// Children must sit after their parent, which rules out cycles.
    pub(crate) fn validate(&self, n_features: usize, n_classes: usize) -> Result<(), String> {
        let n = self.node_count();
        if n == 0 {
            return Err("tree has no nodes".into());
        }
        if self.children_right.len() != n
            || self.feature.len() != n
            || self.threshold.len() != n
            || self.value.len() != n
        {
            return Err(format!("tree node arrays disagree in length (expected {n})"));
        }

        for node in 0..n {
            let (left, right) = (self.children_left[node], self.children_right[node]);
            if left == TREE_LEAF {
                if right != TREE_LEAF {
                    return Err(format!("node {node} has a right child but no left child"));
                }
            } else {
                for child in [left, right] {
                    if child <= node as i64 || child >= n as i64 {
                        return Err(format!("node {node} has out-of-order child {child}"));
                    }
                }
                let f = self.feature[node];
                if f < 0 || f >= n_features as i64 {
                    return Err(format!("node {node} splits on unknown feature {f}"));
                }
            }

            let weights = &self.value[node];
            if weights.len() != n_classes {
                return Err(format!(
                    "node {node} has {} class weights, expected {n_classes}",
                    weights.len()
                ));
            }
            if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
                return Err(format!("node {node} has an invalid class weight"));
            }
        }
        Ok(())
    }

    /// Index of the leaf reached by `x`.
    fn leaf(&self, x: &[f64]) -> usize {
        let mut node = 0usize;
        loop {
            let left = self.children_left[node];
            if left == TREE_LEAF {
                return node;
            }
            let value = x[self.feature[node] as usize] as f32;
            node = if f64::from(value) <= self.threshold[node] {
                left as usize
            } else {
                self.children_right[node] as usize
            };
        }
    }

    /// Class distribution at the leaf reached by `x`, normalised to sum 1.
    pub fn predict_proba(&self, x: &[f64]) -> Vec<f64> {
        let weights = &self.value[self.leaf(x)];
        let total: f64 = weights.iter().sum();
        let norm = if total > 0.0 { total } else { 1.0 };
        weights.iter().map(|w| w / norm).collect()
    }
}

/// Fitted random forest: averages per-tree leaf distributions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomForest {
    pub n_features_in: usize,
    /// Encoded class index for each probability column.
    pub classes: Vec<i64>,
    pub estimators: Vec<DecisionTree>,
}

impl RandomForest {
    pub fn n_features(&self) -> usize {
        self.n_features_in
    }

    pub fn n_classes(&self) -> usize {
        self.classes.len()
    }

    pub(crate) fn validate(&self) -> Result<(), ModelError> {
        if self.classes.is_empty() {
            return Err(ModelError::Inconsistent("classifier has no classes".into()));
        }
        if self.estimators.is_empty() {
            return Err(ModelError::Inconsistent("classifier has no trees".into()));
        }
        for (i, tree) in self.estimators.iter().enumerate() {
            tree.validate(self.n_features_in, self.n_classes())
                .map_err(|e| ModelError::Inconsistent(format!("tree {i}: {e}")))?;
        }
        Ok(())
    }

    /// Mean class distribution over all trees, one entry per [`classes`](Self::classes) item.
    pub fn predict_proba(&self, x: &[f64]) -> Result<Vec<f64>, ModelError> {
        if x.len() != self.n_features_in {
            return Err(ModelError::ShapeMismatch {
                stage: "classifier",
                expected: self.n_features_in,
                got: x.len(),
            });
        }

        let mut proba = vec![0.0; self.n_classes()];
        for tree in &self.estimators {
            for (acc, p) in proba.iter_mut().zip(tree.predict_proba(x)) {
                *acc += p;
            }
        }
        let n_trees = self.estimators.len() as f64;
        for p in &mut proba {
            *p /= n_trees;
        }
        Ok(proba)
    }

    /// Encoded class with the highest mean probability.
    pub fn predict(&self, x: &[f64]) -> Result<i64, ModelError> {
        let proba = self.predict_proba(x)?;
        Ok(self.classes[argmax(&proba)])
    }
}

/// Position of the largest value; the first one wins on ties.
pub(crate) fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, v) in values.iter().enumerate() {
        if *v > values[best] {
            best = i;
        }
    }
    best
}
