//! Model layer error types

use thiserror::Error;

/// Model backend errors
#[derive(Error, Debug)]
pub enum ModelError {
  /// Backend API error
  #[error("Model API error: {0}")]
  ApiError(String),

  /// Network error
  #[error("Network error: {0}")]
  NetworkError(#[from] reqwest::Error),

  /// JSON parse error
  #[error("JSON parse error: {0}")]
  JsonError(#[from] serde_json::Error),

  /// Streaming error
  #[error("Streaming error: {0}")]
  StreamError(String),
}

/// Alias for Result<T, ModelError>
pub type Result<T> = std::result::Result<T, ModelError>;
