#![deny(missing_docs)]

//! # Definition Registry
//!
//! Read-only lookup from a `$ref` string to the shared definition it names.
//! Only local references are supported: the trailing segment of the pointer is
//! used as the definition name. No network or file access is performed.

use crate::oas::models::Schema;
use indexmap::IndexMap;
use percent_encoding::percent_decode_str;

/// A definition found through the registry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Definition<'a> {
    /// The definition key as stored in the document.
    pub name: &'a str,
    /// The definition's schema.
    pub schema: &'a Schema,
}

/// Registry over a document's `definitions` table.
#[derive(Debug, Clone, Copy)]
pub struct DefinitionRegistry<'a> {
    definitions: &'a IndexMap<String, Schema>,
}

impl<'a> DefinitionRegistry<'a> {
    /// Creates a registry borrowing the given definitions table.
    pub fn new(definitions: &'a IndexMap<String, Schema>) -> Self {
        Self { definitions }
    }

    /// Looks up the definition named by `reference`.
    ///
    /// The segment after the last `/` is matched exactly against the definition
    /// keys. If that fails, the segment is decoded as a JSON Pointer token
    /// (`~1`, `~0`, percent-encoding) and tried again.
    ///
    /// Returns `None` when nothing matches; callers treat that as "no example".
    pub fn lookup(&self, reference: &str) -> Option<Definition<'a>> {
        let segment = reference_name(reference);
        if segment.is_empty() {
            return None;
        }

        if let Some((name, schema)) = self.definitions.get_key_value(segment) {
            return Some(Definition { name, schema });
        }

        let decoded = decode_pointer_segment(segment);
        if decoded == segment {
            return None;
        }
        self.definitions
            .get_key_value(decoded.as_str())
            .map(|(name, schema)| Definition { name, schema })
    }
}

/// Returns the trailing path segment of a `$ref`, e.g. `Pet` for `#/definitions/Pet`.
pub fn reference_name(reference: &str) -> &str {
    reference.rsplit('/').next().unwrap_or(reference)
}

/// Decodes a JSON Pointer segment (handles `~1` and `~0`).
fn decode_pointer_segment(segment: &str) -> String {
    let decoded = segment.replace("~1", "/").replace("~0", "~");
    percent_decode_str(&decoded).decode_utf8_lossy().into_owned()
}
