//! HTTP routes: `POST /predict` and `GET /health`.

use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::body::Bytes;
use axum::extract::multipart::MultipartRejection;
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::routing::{get, post};
use tracing::{info, warn};
use tumorscope_core::{HealthResponse, PredictResponse, UploadedSample};
use tumorscope_model::ModelBundle;

use crate::{ApiError, FILE_FIELD, ServeConfig};

/// Read-only context handed to every request.
#[derive(Clone)]
pub struct AppState {
    pub bundle: Arc<ModelBundle>,
    pub include_confidence: bool,
}

/// Build the application router around a loaded bundle.
pub fn router(bundle: Arc<ModelBundle>, config: &ServeConfig) -> Router {
    let state = AppState {
        bundle,
        include_confidence: config.include_confidence,
    };
    Router::new()
        .route("/predict", post(predict))
        .route("/health", get(health))
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .with_state(state)
}

/// Bind `config.bind` and serve until Ctrl-C.
pub async fn serve(bundle: Arc<ModelBundle>, config: ServeConfig) -> std::io::Result<()> {
    let app = router(bundle, &config);
    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    info!(addr = %listener.local_addr()?, "prediction server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "cannot listen for Ctrl-C; serving until killed");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}

async fn predict(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<PredictResponse>, ApiError> {
    // A request that is not multipart at all carries no file either.
    let mut multipart = multipart.map_err(|_| ApiError::NoFile)?;
    let (file_name, bytes) = read_upload(&mut multipart).await?.ok_or(ApiError::NoFile)?;
    if !file_name.ends_with(".csv") {
        return Err(ApiError::NotCsv);
    }
    info!(file = %file_name, bytes = bytes.len(), "received upload");

    let bundle = Arc::clone(&state.bundle);
    let (sample_id, prediction) = tokio::task::spawn_blocking(move || {
        let sample = UploadedSample::from_csv(&bytes, bundle.n_features())?;
        let prediction = bundle.predict(&sample.features)?;
        Ok::<_, ApiError>((sample.sample_id, prediction))
    })
    .await
    .map_err(|e| ApiError::Worker(e.to_string()))??;

    info!(
        sample_id = ?sample_id,
        prediction = %prediction.label,
        confidence = prediction.confidence,
        "prediction served"
    );
    Ok(Json(PredictResponse {
        sample_id,
        prediction: prediction.label,
        confidence: state.include_confidence.then_some(prediction.confidence),
    }))
}

/// First multipart part named [`FILE_FIELD`] that carries a filename.
async fn read_upload(multipart: &mut Multipart) -> Result<Option<(String, Bytes)>, ApiError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let Some(file_name) = field.file_name().map(str::to_string) else {
            continue;
        };
        let bytes = field.bytes().await?;
        return Ok(Some((file_name, bytes)));
    }
    Ok(None)
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let summary = state.bundle.summary();
    Json(HealthResponse {
        status: "ok".into(),
        n_features: summary.n_features,
        n_components: summary.n_components,
        classes: summary.classes,
    })
}
