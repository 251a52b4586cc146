//! # Error Handling
//!
//! Provides the unified `AppError` enum used across the workspace.
//!
//! Only loading a document can fail. Resolution and response selection report
//! "nothing to return" through `Option`, never through this type.

use derive_more::{Display, From};

/// The Global Error Enum.
///
/// Note: String errors default to `General`.
#[derive(Debug, Display, From)]
pub enum AppError {
    /// Wrapper for standard IO errors (reading the document file).
    #[display("IO Error: {_0}")]
    Io(std::io::Error),

    /// The document is not valid JSON for the OpenAPI v2 model.
    #[display("JSON Error: {_0}")]
    Json(serde_json::Error),

    /// The document is not valid YAML for the OpenAPI v2 model.
    #[display("YAML Error: {_0}")]
    Yaml(serde_yaml::Error),

    /// Generic errors.
    #[display("General Error: {_0}")]
    General(String),
}

/// Manual implementation of the standard Error trait.
impl std::error::Error for AppError {}

/// Helper type alias for Result using AppError.
pub type AppResult<T> = Result<T, AppError>;
