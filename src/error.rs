//! Error types for REST and browser-storage access.

use thiserror::Error;
use wasm_bindgen::JsValue;

/// Errors from talking to the FindJob.nu REST API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Base URL or endpoint path could not be combined.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// No `window` (not running in a browser).
    #[error("Browser window unavailable")]
    NoWindow,

    /// The request never produced a response.
    #[error("Request failed: {0}")]
    Network(String),

    /// API answered with a non-success status.
    #[error("API error ({status})")]
    Status {
        /// HTTP status code.
        status: u16,
    },

    /// Response body did not match the expected shape.
    #[error("Failed to decode response: {0}")]
    Decode(String),
}

/// Errors from client-local persistent storage.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Storage is disabled or missing (private mode, non-browser target).
    #[error("Local storage unavailable")]
    Unavailable,

    /// The storage call itself threw.
    #[error("Storage access failed: {0}")]
    Access(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Best-effort readable text for a thrown JS value
pub(crate) fn js_message(value: &JsValue) -> String {
    value
        .as_string()
        .unwrap_or_else(|| format!("{value:?}"))
}
