#![deny(missing_docs)]

//! # CLI Errors
//!
//! Error types for the CLI crate.

use derive_more::{Display, From};
use mockery_core::AppError;

/// Main error enum for CLI operations.
#[derive(Debug, Display, From)]
pub enum CliError {
    /// IO Error wrapper (binding or running the server).
    #[display("IO Error: {}", _0)]
    Io(std::io::Error),

    /// The OpenAPI document could not be loaded.
    #[display("Failed to load OpenAPI document: {}", _0)]
    Document(AppError),

    /// The TLS certificate or key was rejected.
    #[display("TLS Error: {}", _0)]
    Tls(rustls::Error),

    /// The key file holds no private key.
    #[display("No private key found in {:?}", _0)]
    #[from(ignore)]
    MissingKey(std::path::PathBuf),
}

/// Manual implementation of the standard Error trait.
impl std::error::Error for CliError {}

/// Result type alias.
pub type CliResult<T> = Result<T, CliError>;
