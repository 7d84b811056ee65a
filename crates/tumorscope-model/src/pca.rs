//! Principal-component projection of standardised expression vectors.

use serde::{Deserialize, Serialize};

use crate::ModelError;

/// Fitted PCA: projects an `n_features_in` vector onto `components.len()` axes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pca {
    pub n_features_in: usize,
    pub mean: Vec<f64>,
    /// Row-major `[n_components][n_features_in]`.
    pub components: Vec<Vec<f64>>,
    #[serde(default)]
    pub explained_variance: Option<Vec<f64>>,
    #[serde(default)]
    pub whiten: bool,
}

impl Pca {
    pub fn n_features(&self) -> usize {
        self.n_features_in
    }

    pub fn n_components(&self) -> usize {
        self.components.len()
    }

    pub(crate) fn validate(&self) -> Result<(), ModelError> {
        if self.components.is_empty() {
            return Err(ModelError::Inconsistent("pca has no components".into()));
        }
        if self.mean.len() != self.n_features_in {
            return Err(ModelError::Inconsistent(format!(
                "pca mean has {} entries, expected {}",
                self.mean.len(),
                self.n_features_in
            )));
        }
        if let Some((j, c)) = self
            .components
            .iter()
            .enumerate()
            .find(|(_, c)| c.len() != self.n_features_in)
        {
            return Err(ModelError::Inconsistent(format!(
                "pca component {j} has {} entries, expected {}",
                c.len(),
                self.n_features_in
            )));
        }
        if self.whiten {
            let Some(var) = &self.explained_variance else {
                return Err(ModelError::Inconsistent(
                    "whitening pca is missing explained_variance".into(),
                ));
            };
            if var.len() != self.n_components() || var.iter().any(|v| v.is_nan() || *v <= 0.0) {
                return Err(ModelError::Inconsistent(
                    "pca explained_variance must hold one positive value per component".into(),
                ));
            }
        }
        Ok(())
    }

    /// Project one sample onto the principal axes.
    pub fn transform(&self, x: &[f64]) -> Result<Vec<f64>, ModelError> {
        if x.len() != self.n_features_in {
            return Err(ModelError::ShapeMismatch {
                stage: "pca",
                expected: self.n_features_in,
                got: x.len(),
            });
        }

        let centred: Vec<f64> = x.iter().zip(&self.mean).map(|(v, m)| v - m).collect();
        let mut out: Vec<f64> = self
            .components
            .iter()
            .map(|axis| axis.iter().zip(&centred).map(|(a, v)| a * v).sum::<f64>())
            .collect();

        if self.whiten
            && let Some(var) = &self.explained_variance
        {
            for (v, ev) in out.iter_mut().zip(var) {
                *v /= ev.sqrt();
            }
        }
        Ok(out)
    }
}
