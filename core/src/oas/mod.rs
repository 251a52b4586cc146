#![deny(missing_docs)]

//! # OpenAPI v2 Module
//!
//! - **models**: Document, operation, response and schema structures.
//! - **document**: Loading documents and enumerating routes.
//! - **registry**: `$ref` lookup into shared definitions.
//! - **resolver**: Example synthesis from responses and schemas.
//! - **selector**: Choosing which declared response to mock.

pub mod document;
pub mod models;
pub mod registry;
pub mod resolver;
pub mod selector;

pub use document::{parse_document, parse_document_str, DocumentFormat, Route};
pub use models::{
    AdditionalProperties, Document, Info, Method, Operation, PathItem, Paths, Property, Response,
    Schema,
};
pub use registry::{Definition, DefinitionRegistry};
pub use resolver::{materialize_properties, resolve, resolve_response};
pub use selector::{select_response, SelectedResponse, DEFAULT_STATUS};
