//! Core types shared across tumorscope crates: uploaded-sample parsing and wire formats.

mod error;
pub mod sample;
pub mod schema;
pub mod wire;

pub use error::SampleError;
pub use sample::UploadedSample;
pub use wire::{ErrorBody, HealthResponse, PredictResponse};

/// Name given to the first CSV column, whatever its header says.
pub const SAMPLE_ID_FIELD: &str = "sample_id";

/// Gene-feature count of the shipped model bundle.
///
/// Servers derive the real width from the loaded artifacts; this is only the
/// documented default used when an operator pins the width explicitly.
pub const DEFAULT_FEATURE_COUNT: usize = 20_531;
