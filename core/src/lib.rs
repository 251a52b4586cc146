#![deny(missing_docs)]

//! # Mockery Core
//!
//! Pure logic behind the OpenAPI v2 mock server: document loading, response
//! selection and example resolution. The loaded document is read-only and can
//! be shared across threads; no function here mutates it.

/// Shared error types.
pub mod error;

/// OpenAPI v2 model, loading, resolution and selection.
pub mod oas;

/// Status and body for a mocked request.
pub mod mock;

pub use error::{AppError, AppResult};
pub use mock::{mock_reply, parse_status_header, MockReply, RESPONSE_CODE_HEADER};
pub use oas::{
    parse_document, parse_document_str, resolve, resolve_response, select_response,
    DefinitionRegistry, Document, DocumentFormat, Method, Operation, Response, Route, Schema,
    SelectedResponse,
};
