#![deny(missing_docs)]

//! # Mock Replies
//!
//! Combines response selection and example resolution into the status and
//! body an HTTP layer should write. Nothing here touches the network.

use crate::oas::models::Operation;
use crate::oas::registry::DefinitionRegistry;
use crate::oas::resolver::resolve_response;
use crate::oas::selector::{parse_status_code, select_response, DEFAULT_STATUS};
use log::{debug, warn};
use serde_json::Value;

/// Header a client sets to ask for a specific declared response.
pub const RESPONSE_CODE_HEADER: &str = "x-mock-response-code";

/// What to send back for one request.
#[derive(Debug, Clone, PartialEq)]
pub struct MockReply {
    /// HTTP status code.
    pub status: u16,
    /// JSON body, or `None` for an empty body.
    pub body: Option<Value>,
}

/// Builds the reply for a request to `operation`.
///
/// # Arguments
///
/// * `operation` - The operation the request was routed to.
/// * `requested` - Status asked for by the client, if any (defaults to 200).
/// * `media_type` - Media type used to pick literal response examples.
/// * `registry` - Shared definitions for `$ref` resolution.
pub fn mock_reply(
    operation: &Operation,
    requested: Option<u16>,
    media_type: &str,
    registry: &DefinitionRegistry<'_>,
) -> MockReply {
    let Some(selected) = select_response(operation, requested) else {
        warn!("Operation declares no responses, replying with an empty body");
        return MockReply {
            status: requested.unwrap_or(DEFAULT_STATUS),
            body: None,
        };
    };

    let status = selected.status_or(DEFAULT_STATUS);
    debug!(
        "Building payload for status {} ({})",
        status, selected.response.description
    );

    let body = resolve_response(selected.response, media_type, registry);
    if body.is_none() {
        warn!(
            "No example found for response '{}', body will be empty",
            selected.key
        );
    }

    MockReply { status, body }
}

/// Parses the value of [`RESPONSE_CODE_HEADER`].
///
/// Anything but ASCII digits (after trimming whitespace) is treated as absent,
/// so `+404` does not select the 404 response.
pub fn parse_status_header(raw: &str) -> Option<u16> {
    parse_status_code(raw.trim())
}
