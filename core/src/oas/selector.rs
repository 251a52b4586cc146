#![deny(missing_docs)]

//! # Response Selection
//!
//! Picks which declared response of an operation to mock for a request.
//!
//! An exact match on the requested status wins. Otherwise the fallback is the
//! lowest numeric status code, with non-numeric keys (e.g. `default`) ordered
//! after every numeric key and compared lexicographically among themselves.
//! The choice never depends on map storage order.

use crate::oas::models::{Operation, Response};
use log::warn;

/// Status used when the caller does not request one.
pub const DEFAULT_STATUS: u16 = 200;

/// Status reported for a selected response whose key is not a number.
pub const NON_NUMERIC_STATUS: u16 = 0;

/// The response chosen for a request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectedResponse<'a> {
    /// Declared status of the response, or [`NON_NUMERIC_STATUS`].
    pub status: u16,
    /// The key the response is declared under.
    pub key: &'a str,
    /// The response itself.
    pub response: &'a Response,
    /// True when no declared response matched the requested status.
    pub fallback: bool,
}

impl SelectedResponse<'_> {
    /// The status to write on the wire; non-numeric keys map to `default_status`.
    pub fn status_or(&self, default_status: u16) -> u16 {
        if self.status == NON_NUMERIC_STATUS {
            default_status
        } else {
            self.status
        }
    }
}

/// Fallback ordering: numbers ascending, then names lexicographically.
///
/// Numeric keys carry their spelling so that `"0200"` and `"200"` still
/// order the same way whatever the map order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum StatusKey<'a> {
    Numeric(u16, &'a str),
    Named(&'a str),
}

impl<'a> StatusKey<'a> {
    fn parse(key: &'a str) -> Self {
        match parse_status_code(key) {
            Some(code) => StatusKey::Numeric(code, key),
            None => StatusKey::Named(key),
        }
    }

    fn status(&self) -> u16 {
        match self {
            StatusKey::Numeric(code, _) => *code,
            StatusKey::Named(_) => NON_NUMERIC_STATUS,
        }
    }
}

/// Parses a status code written only with ASCII digits. Zero is not a status.
pub fn parse_status_code(raw: &str) -> Option<u16> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse::<u16>()
        .ok()
        .filter(|code| *code != NON_NUMERIC_STATUS)
}

/// Selects the response to mock for `requested` (defaults to 200).
///
/// Returns `None` only when the operation declares no responses at all.
pub fn select_response(
    operation: &Operation,
    requested: Option<u16>,
) -> Option<SelectedResponse<'_>> {
    let requested = requested.unwrap_or(DEFAULT_STATUS);

    if let Some((key, response)) = operation
        .responses
        .get_key_value(requested.to_string().as_str())
    {
        return Some(SelectedResponse {
            status: requested,
            key,
            response,
            fallback: false,
        });
    }

    let (order, key, response) = operation
        .responses
        .iter()
        .map(|(key, response)| (StatusKey::parse(key), key.as_str(), response))
        .min_by_key(|(order, _, _)| *order)?;

    warn!(
        "No response matching status {}, falling back to response '{}'",
        requested, key
    );

    Some(SelectedResponse {
        status: order.status(),
        key,
        response,
        fallback: true,
    })
}
