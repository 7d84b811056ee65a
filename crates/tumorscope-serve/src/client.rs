//! HTTP client for a running prediction server.

use std::path::{Path, PathBuf};

use reqwest::multipart::{Form, Part};
use thiserror::Error;
use tracing::info;
use tumorscope_core::{ErrorBody, HealthResponse, PredictResponse};

use crate::FILE_FIELD;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned {status}: {message}")]
    Server { status: u16, message: String },
    #[error("reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Client for the `/predict` and `/health` endpoints.
pub struct PredictClient {
    client: reqwest::Client,
    base_url: String,
}

impl PredictClient {
    /// Create a client for the server at `base_url`, e.g. `http://localhost:5000`.
    pub fn new(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Upload a CSV file from disk and return the server's prediction.
    pub async fn predict_file(&self, path: &Path) -> Result<PredictResponse, ClientError> {
        let bytes = tokio::fs::read(path).await.map_err(|source| ClientError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.predict_bytes(file_name, bytes).await
    }

    /// Upload in-memory CSV content under `file_name`.
    pub async fn predict_bytes(
        &self,
        file_name: String,
        bytes: Vec<u8>,
    ) -> Result<PredictResponse, ClientError> {
        let url = format!("{}/predict", self.base_url);
        let part = Part::bytes(bytes)
            .file_name(file_name)
            .mime_str("text/csv")?;
        let form = Form::new().part(FILE_FIELD, part);

        info!(url = %url, "uploading sample");
        let resp = self.client.post(&url).multipart(form).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&body)
                .map(|b| b.error)
                .unwrap_or(body);
            return Err(ClientError::Server {
                status: status.as_u16(),
                message,
            });
        }

        let prediction: PredictResponse = resp.json().await?;
        info!(prediction = %prediction.prediction, "prediction received");
        Ok(prediction)
    }

    /// Fetch the server's bundle description.
    pub async fn health(&self) -> Result<HealthResponse, ClientError> {
        let url = format!("{}/health", self.base_url);
        let resp = self.client.get(&url).send().await?.error_for_status()?;
        Ok(resp.json().await?)
    }
}
