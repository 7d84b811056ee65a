//! One-shot prediction of a CSV on disk, locally or against a running server.

use std::path::Path;

use anyhow::Context;
use tumorscope_core::{PredictResponse, UploadedSample};
use tumorscope_model::{ModelBundle, Prediction};
use tumorscope_serve::PredictClient;

/// Run a file through a local bundle, with the same checks as `/predict`.
pub fn predict_local(bundle: &ModelBundle, file: &Path) -> anyhow::Result<(Option<String>, Prediction)> {
    anyhow::ensure!(
        file.to_string_lossy().ends_with(".csv"),
        "File must be a CSV."
    );
    let bytes = std::fs::read(file).with_context(|| format!("reading {}", file.display()))?;
    let sample = UploadedSample::from_csv(&bytes, bundle.n_features())?;
    let prediction = bundle
        .predict(&sample.features)
        .context("running model pipeline")?;
    Ok((sample.sample_id, prediction))
}

/// Shape a local prediction the way the server would.
pub fn to_response(
    sample_id: Option<String>,
    prediction: &Prediction,
    include_confidence: bool,
) -> PredictResponse {
    PredictResponse {
        sample_id,
        prediction: prediction.label.clone(),
        confidence: include_confidence.then_some(prediction.confidence),
    }
}

/// Upload a file to a running server.
pub async fn predict_remote(server: &str, file: &Path) -> anyhow::Result<PredictResponse> {
    PredictClient::new(server.to_string())
        .predict_file(file)
        .await
        .with_context(|| format!("predicting {} via {server}", file.display()))
}
