//! JSON bodies exchanged between the prediction server and its clients.

use serde::{Deserialize, Serialize};

/// Successful `/predict` response.
///
/// `confidence` is only present when the server is configured to expose it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictResponse {
    pub sample_id: Option<String>,
    pub prediction: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

/// Body of every non-2xx response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// `/health` response describing the loaded model bundle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub n_features: usize,
    pub n_components: usize,
    pub classes: Vec<String>,
}
