use std::net::SocketAddr;

/// Settings for the prediction server.
#[derive(Debug, Clone)]
pub struct ServeConfig {
    pub bind: SocketAddr,
    /// Request body limit, applied to the multipart upload.
    pub max_upload_bytes: usize,
    /// Add the predicted class probability to successful responses.
    pub include_confidence: bool,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 5000)),
            max_upload_bytes: 64 * 1024 * 1024,
            include_confidence: false,
        }
    }
}
