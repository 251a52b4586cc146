#![deny(missing_docs)]

//! # OpenAPI Document Loading
//!
//! Reads an OpenAPI v2 document from disk (JSON or YAML) and exposes the
//! routes the mock server should register.

use crate::error::AppResult;
use crate::oas::models::{Document, Method, Operation};
use crate::oas::registry::DefinitionRegistry;
use log::{debug, warn};
use std::fs;
use std::path::Path;

/// Title reported when the document has none.
pub const UNTITLED: &str = "Untitled API";

/// Version reported when the document has none.
pub const UNVERSIONED: &str = "0.0.0";

/// Serialization format of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    /// JSON document.
    Json,
    /// YAML document.
    Yaml,
}

impl DocumentFormat {
    /// Picks the format from the file extension; `.yaml` / `.yml` is YAML, anything else JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                DocumentFormat::Yaml
            }
            _ => DocumentFormat::Json,
        }
    }
}

/// A routable operation: method, document path and operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Route<'a> {
    /// HTTP method.
    pub method: Method,
    /// The document path template (e.g. `/pets/{id}`).
    pub path: &'a str,
    /// The operation served on this route.
    pub operation: &'a Operation,
}

impl Route<'_> {
    /// Path with the document's normalized base path prepended.
    pub fn full_path(&self, base_path: &str) -> String {
        format!("{}{}", base_path, self.path)
    }
}

/// Parses an OpenAPI v2 document file.
///
/// # Arguments
///
/// * `path` - Location of the document. `.yaml` / `.yml` files are read as YAML,
///   everything else as JSON.
pub fn parse_document(path: impl AsRef<Path>) -> AppResult<Document> {
    let path = path.as_ref();
    debug!("Loading document from {:?}", path);
    let content = fs::read_to_string(path)?;
    parse_document_str(&content, DocumentFormat::from_path(path))
}

/// Parses an OpenAPI v2 document from an in-memory string.
pub fn parse_document_str(content: &str, format: DocumentFormat) -> AppResult<Document> {
    let document: Document = match format {
        DocumentFormat::Json => serde_json::from_str(content)?,
        DocumentFormat::Yaml => serde_yaml::from_str(content)?,
    };
    Ok(document)
}

impl Document {
    /// The definition registry backed by this document's `definitions`.
    pub fn registry(&self) -> DefinitionRegistry<'_> {
        DefinitionRegistry::new(&self.definitions)
    }

    /// API title, or [`UNTITLED`].
    pub fn title(&self) -> &str {
        if self.info.title.is_empty() {
            UNTITLED
        } else {
            &self.info.title
        }
    }

    /// API version, or [`UNVERSIONED`].
    pub fn version(&self) -> &str {
        if self.info.version.is_empty() {
            UNVERSIONED
        } else {
            &self.info.version
        }
    }

    /// The base path ready to prefix routes: `""` or `/segment` with no trailing slash.
    ///
    /// A missing base path, or one that does not start with `/`, is treated as `/`.
    pub fn normalized_base_path(&self) -> String {
        let raw = self.base_path.as_deref().unwrap_or_default();
        if !raw.starts_with('/') {
            warn!("Base path '{}' is invalid or empty, using '/'", raw);
            return String::new();
        }
        raw.trim_end_matches('/').to_string()
    }

    /// All present operations, in document path order then GET, POST, PUT, DELETE, PATCH.
    ///
    /// Paths that do not start with `/` are skipped.
    pub fn routes(&self) -> Vec<Route<'_>> {
        let mut routes = Vec::new();

        for (path, item) in &self.paths.items {
            if !path.starts_with('/') {
                debug!("Skipping path '{}' without leading slash", path);
                continue;
            }

            for method in Method::ALL {
                if let Some(operation) = item.operation(method) {
                    routes.push(Route {
                        method,
                        path,
                        operation,
                    });
                }
            }
        }

        routes
    }
}
