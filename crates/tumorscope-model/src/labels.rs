//! Decoding of encoded class indices back to cancer-type names.

use serde::{Deserialize, Serialize};

use crate::ModelError;

/// Fitted label encoder: encoded index `i` decodes to `classes[i]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelEncoder {
    pub classes: Vec<String>,
}

impl LabelEncoder {
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub(crate) fn validate(&self) -> Result<(), ModelError> {
        if self.classes.is_empty() {
            return Err(ModelError::Inconsistent("label encoder has no classes".into()));
        }
        Ok(())
    }

    /// Class name for an encoded index.
    pub fn inverse_transform(&self, encoded: i64) -> Result<&str, ModelError> {
        usize::try_from(encoded)
            .ok()
            .and_then(|i| self.classes.get(i))
            .map(String::as_str)
            .ok_or(ModelError::UnknownClass(encoded))
    }
}
