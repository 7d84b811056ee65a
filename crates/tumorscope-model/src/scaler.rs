//! Per-feature standardisation fitted on the training expression matrix.

use serde::{Deserialize, Serialize};

use crate::ModelError;

/// Standard scaler: `(x - mean) / scale` per feature.
///
/// Either statistic may be absent when the scaler was fitted without
/// centring or without scaling; that step is then skipped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardScaler {
    pub n_features_in: usize,
    #[serde(default)]
    pub mean: Option<Vec<f64>>,
    #[serde(default)]
    pub scale: Option<Vec<f64>>,
}

impl StandardScaler {
    pub fn n_features(&self) -> usize {
        self.n_features_in
    }

    pub(crate) fn validate(&self) -> Result<(), ModelError> {
        if self.n_features_in == 0 {
            return Err(ModelError::Inconsistent("scaler has no input features".into()));
        }
        if let Some(mean) = &self.mean
            && mean.len() != self.n_features_in
        {
            return Err(ModelError::Inconsistent(format!(
                "scaler mean has {} entries, expected {}",
                mean.len(),
                self.n_features_in
            )));
        }
        if let Some(scale) = &self.scale {
            if scale.len() != self.n_features_in {
                return Err(ModelError::Inconsistent(format!(
                    "scaler scale has {} entries, expected {}",
                    scale.len(),
                    self.n_features_in
                )));
            }
            if let Some(i) = scale.iter().position(|s| *s == 0.0 || !s.is_finite()) {
                return Err(ModelError::Inconsistent(format!(
                    "scaler scale[{i}] is not a usable divisor"
                )));
            }
        }
        Ok(())
    }

    /// Standardise one sample.
    pub fn transform(&self, x: &[f64]) -> Result<Vec<f64>, ModelError> {
        if x.len() != self.n_features_in {
            return Err(ModelError::ShapeMismatch {
                stage: "scaler",
                expected: self.n_features_in,
                got: x.len(),
            });
        }

        let mut out = x.to_vec();
        if let Some(mean) = &self.mean {
            for (v, m) in out.iter_mut().zip(mean) {
                *v -= m;
            }
        }
        if let Some(scale) = &self.scale {
            for (v, s) in out.iter_mut().zip(scale) {
                *v /= s;
            }
        }
        Ok(out)
    }
}
