#![deny(missing_docs)]

//! # OpenAPI v2 Models
//!
//! Read-only representation of a Swagger 2.0 document as far as the mock server
//! needs it. These structs map directly to the JSON/YAML objects; unknown fields
//! are ignored.
//!
//! Every map keeps document order (`IndexMap`), so iteration over paths and
//! properties is reproducible.

use indexmap::IndexMap;
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::fmt;

/// Root of an OpenAPI v2 document.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Swagger version string (e.g. "2.0").
    pub swagger: Option<String>,
    /// Metadata about the API.
    #[serde(default)]
    pub info: Info,
    /// Host serving the API, informational only.
    pub host: Option<String>,
    /// Raw base path prepended to every path. See [`Document::normalized_base_path`].
    pub base_path: Option<String>,
    /// Path items keyed by path template.
    #[serde(default)]
    pub paths: Paths,
    /// Shared type definitions, keyed by plain name (no `#/definitions/` prefix).
    #[serde(default)]
    pub definitions: IndexMap<String, Schema>,
}

/// The `info` object.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Info {
    /// API title.
    #[serde(default)]
    pub title: String,
    /// API version.
    #[serde(default)]
    pub version: String,
}

/// The Paths Object with support for specification extensions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Paths {
    /// Parsed path items keyed by path template, in document order.
    pub items: IndexMap<String, PathItem>,
    /// Spec extensions attached to the Paths Object (x-...).
    pub extensions: IndexMap<String, Value>,
}

impl Paths {
    /// Returns true when no concrete path items are present.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<'de> Deserialize<'de> for Paths {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = IndexMap::<String, Value>::deserialize(deserializer)?;
        let mut items = IndexMap::new();
        let mut extensions = IndexMap::new();

        for (key, value) in raw {
            if key.starts_with("x-") {
                extensions.insert(key, value);
                continue;
            }
            let path_item = serde_json::from_value::<PathItem>(value).map_err(|e| {
                DeError::custom(format!("Failed to parse path item '{}': {}", key, e))
            })?;
            items.insert(key, path_item);
        }

        Ok(Self { items, extensions })
    }
}

/// HTTP methods a path item can declare an operation for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// `get`
    Get,
    /// `post`
    Post,
    /// `put`
    Put,
    /// `delete`
    Delete,
    /// `patch`
    Patch,
}

impl Method {
    /// All supported methods, in registration order.
    pub const ALL: [Method; 5] = [
        Method::Get,
        Method::Post,
        Method::Put,
        Method::Delete,
        Method::Patch,
    ];

    /// Upper-case method name as it appears on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
            Method::Patch => "PATCH",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One path template and the operations declared on it.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PathItem {
    /// GET operation.
    pub get: Option<Operation>,
    /// POST operation.
    pub post: Option<Operation>,
    /// PUT operation.
    pub put: Option<Operation>,
    /// DELETE operation.
    pub delete: Option<Operation>,
    /// PATCH operation.
    pub patch: Option<Operation>,
}

impl PathItem {
    /// Returns the operation for `method` if it is present.
    ///
    /// An operation with neither a description nor any responses counts as absent.
    pub fn operation(&self, method: Method) -> Option<&Operation> {
        let op = match method {
            Method::Get => self.get.as_ref(),
            Method::Post => self.post.as_ref(),
            Method::Put => self.put.as_ref(),
            Method::Delete => self.delete.as_ref(),
            Method::Patch => self.patch.as_ref(),
        };
        op.filter(|op| op.is_present())
    }
}

/// A single API operation.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    /// Unique operation identifier.
    pub operation_id: Option<String>,
    /// Short summary.
    pub summary: Option<String>,
    /// Long description.
    #[serde(default)]
    pub description: String,
    /// Tags used for grouping.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Media types the operation consumes.
    #[serde(default)]
    pub consumes: Vec<String>,
    /// Media types the operation produces.
    #[serde(default)]
    pub produces: Vec<String>,
    /// Declared responses keyed by status code string ("200", "404", "default").
    #[serde(default)]
    pub responses: IndexMap<String, Response>,
}

impl Operation {
    /// True when the operation has a description or at least one response.
    pub fn is_present(&self) -> bool {
        !self.description.is_empty() || !self.responses.is_empty()
    }
}

/// A declared response.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Response {
    /// Response description.
    #[serde(default)]
    pub description: String,
    /// Body schema; an absent schema is an empty node.
    #[serde(default)]
    pub schema: Schema,
    /// Literal examples keyed by media type. These take precedence over `schema`.
    #[serde(default)]
    pub examples: IndexMap<String, Value>,
}

/// A Schema Object, flattened the way OpenAPI v2 declares it.
///
/// Several shapes share this struct: references, arrays, objects with
/// properties and maps via `additionalProperties`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    /// Literal example, returned verbatim when present.
    pub example: Option<Value>,
    /// Declared type ("string", "integer", "boolean", "array", "object", ...).
    #[serde(rename = "type")]
    pub schema_type: Option<String>,
    /// Item schema for arrays.
    pub items: Option<Box<Schema>>,
    /// Inline properties.
    pub properties: Option<IndexMap<String, Property>>,
    /// Reference to a shared definition, e.g. `#/definitions/Pet`.
    #[serde(rename = "$ref")]
    pub reference: Option<String>,
    /// Free-form map values.
    pub additional_properties: Option<AdditionalProperties>,
}

impl Schema {
    /// True when the node carries nothing the resolver could use.
    ///
    /// An `items` node that is itself empty does not count.
    pub fn is_empty(&self) -> bool {
        self.schema_type.is_none()
            && self.reference.is_none()
            && self.properties.is_none()
            && self.items().is_none()
            && self.additional_properties.is_none()
            && self.example.is_none()
    }

    /// Item schema, ignoring an empty `items: {}` declaration.
    pub fn items(&self) -> Option<&Schema> {
        self.items.as_deref().filter(|items| !items.is_empty())
    }

    /// True when the declared type equals `ty`.
    pub fn is_type(&self, ty: &str) -> bool {
        self.schema_type.as_deref() == Some(ty)
    }
}

/// The `additionalProperties` keyword: either a flag or a value schema.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum AdditionalProperties {
    /// `additionalProperties: true|false`
    Bool(bool),
    /// `additionalProperties: { type: ... }`
    Schema(Box<Schema>),
    /// Anything else the document author wrote; never produces an example.
    Other(Value),
}

/// An inline property of an object schema.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Property {
    /// Declared type.
    #[serde(rename = "type")]
    pub property_type: Option<String>,
    /// Literal example.
    pub example: Option<Value>,
    /// Nested properties for inline objects.
    pub properties: Option<IndexMap<String, Property>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_schema_empty_detection() {
        assert!(Schema::default().is_empty());

        let empty_items: Schema = serde_json::from_value(json!({ "items": {} })).unwrap();
        assert!(empty_items.is_empty());

        let typed: Schema = serde_json::from_value(json!({ "type": "string" })).unwrap();
        assert!(!typed.is_empty());

        let empty_props: Schema = serde_json::from_value(json!({ "properties": {} })).unwrap();
        assert!(!empty_props.is_empty());
    }

    #[test]
    fn test_null_example_is_absent() {
        let schema: Schema = serde_json::from_value(json!({ "example": null })).unwrap();
        assert!(schema.example.is_none());
        assert!(schema.is_empty());
    }

    #[test]
    fn test_additional_properties_shapes() {
        let flag: Schema =
            serde_json::from_value(json!({ "additionalProperties": true })).unwrap();
        assert_eq!(
            flag.additional_properties,
            Some(AdditionalProperties::Bool(true))
        );

        let typed: Schema =
            serde_json::from_value(json!({ "additionalProperties": { "type": "integer" } }))
                .unwrap();
        match typed.additional_properties {
            Some(AdditionalProperties::Schema(s)) => assert!(s.is_type("integer")),
            other => panic!("Expected schema variant, got {:?}", other),
        }

        let odd: Schema = serde_json::from_value(json!({ "additionalProperties": 3 })).unwrap();
        assert!(matches!(
            odd.additional_properties,
            Some(AdditionalProperties::Other(_))
        ));
    }

    #[test]
    fn test_operation_presence() {
        let mut path_item = PathItem {
            get: Some(Operation::default()),
            post: Some(Operation {
                description: "Create".into(),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert!(path_item.operation(Method::Get).is_none());
        assert!(path_item.operation(Method::Post).is_some());
        assert!(path_item.operation(Method::Put).is_none());

        path_item
            .get
            .as_mut()
            .unwrap()
            .responses
            .insert("200".into(), Response::default());
        assert!(path_item.operation(Method::Get).is_some());
    }

    #[test]
    fn test_paths_extensions_are_split() {
        let paths: Paths = serde_json::from_value(json!({
            "/pets": { "get": { "description": "List" } },
            "x-internal": "ignored"
        }))
        .unwrap();
        assert_eq!(paths.items.len(), 1);
        assert_eq!(paths.extensions.get("x-internal"), Some(&json!("ignored")));
    }
}
