#![deny(missing_docs)]

//! # Example Resolver
//!
//! Turns a response or schema node into a concrete JSON value for the mock body.
//!
//! Rules are tried in a fixed order and the first one that applies wins:
//!
//! 1. Empty node: no example.
//! 2. Literal `example`: returned verbatim.
//! 3. `$ref` (or `items.$ref` on an array): the definition is resolved, and
//!    wrapped in a one-element array when the node is an array.
//! 4. `items.properties` on an array (or with `items.type: object`):
//!    the properties are materialized, wrapped in a one-element array for arrays.
//! 5. `additionalProperties`: a small synthetic map.
//! 6. `properties`: materialized into an object.
//!
//! Real documents often combine several of these, so the order matters.
//!
//! Resolution never writes into the document. A reference that is already being
//! resolved further up the current path resolves to `None`, which keeps
//! self-referencing definitions from recursing forever.

use crate::oas::models::{AdditionalProperties, Property, Response, Schema};
use crate::oas::registry::DefinitionRegistry;
use indexmap::IndexMap;
use log::{debug, warn};
use serde_json::{json, Map, Value};

/// Resolves a schema node into an example value.
///
/// Returns `None` when no example can be produced.
pub fn resolve(schema: &Schema, registry: &DefinitionRegistry<'_>) -> Option<Value> {
    Resolver::new(*registry).resolve_node(schema)
}

/// Resolves a response into an example value for the given media type.
///
/// A literal example under `media_type` always wins, even when the schema
/// would also resolve.
pub fn resolve_response(
    response: &Response,
    media_type: &str,
    registry: &DefinitionRegistry<'_>,
) -> Option<Value> {
    if let Some(example) = response.examples.get(media_type).filter(|v| !v.is_null()) {
        return Some(example.clone());
    }

    if !response.examples.is_empty() {
        warn!(
            "No response example found for content type '{}', falling back to schema",
            media_type
        );
    }

    resolve(&response.schema, registry)
}

/// Builds an object from inline property declarations.
///
/// Each property uses its literal example, or a default for its declared type.
/// Properties with an unknown or missing type are left out.
pub fn materialize_properties(properties: &IndexMap<String, Property>) -> Value {
    let mut payload = Map::new();

    for (key, prop) in properties {
        let value = match &prop.example {
            Some(example) => Some(example.clone()),
            None => default_for_property(prop),
        };

        if let Some(value) = value {
            payload.insert(key.clone(), value);
        }
    }

    Value::Object(payload)
}

fn default_for_property(prop: &Property) -> Option<Value> {
    match prop.property_type.as_deref()? {
        "string" => Some(Value::String("string".into())),
        "integer" => Some(json!(0)),
        "boolean" => Some(Value::Bool(false)),
        "array" => Some(Value::Array(Vec::new())),
        "object" => Some(match &prop.properties {
            Some(nested) => materialize_properties(nested),
            None => Value::Object(Map::new()),
        }),
        _ => None,
    }
}

/// Walks one resolution, tracking which definitions are on the current path.
struct Resolver<'a> {
    registry: DefinitionRegistry<'a>,
    visiting: Vec<&'a str>,
}

impl<'a> Resolver<'a> {
    fn new(registry: DefinitionRegistry<'a>) -> Self {
        Self {
            registry,
            visiting: Vec::new(),
        }
    }

    fn resolve_node(&mut self, schema: &Schema) -> Option<Value> {
        if schema.is_empty() {
            return None;
        }

        if let Some(example) = &schema.example {
            return Some(example.clone());
        }

        if let Some(reference) = reference_of(schema) {
            return self.resolve_reference(schema, reference);
        }

        if let Some(items) = schema.items() {
            if let Some(properties) = &items.properties {
                if schema.is_type("array") || items.is_type("object") {
                    let object = materialize_properties(properties);
                    return Some(wrap_if_array(schema, object));
                }
            }
        }

        if let Some(value) = schema
            .additional_properties
            .as_ref()
            .and_then(synthesize_map)
        {
            return Some(value);
        }

        schema.properties.as_ref().map(materialize_properties)
    }

    fn resolve_reference(&mut self, schema: &Schema, reference: &str) -> Option<Value> {
        let Some(definition) = self.registry.lookup(reference) else {
            debug!("Reference '{}' not found in definitions", reference);
            return None;
        };

        if self.visiting.contains(&definition.name) {
            warn!(
                "Reference cycle through '{}', leaving this branch empty",
                definition.name
            );
            return None;
        }

        debug!("Resolving model '{}'", definition.name);
        self.visiting.push(definition.name);
        let inner = self.resolve_node(definition.schema);
        self.visiting.pop();

        // An array of a known definition always has one element, even when
        // the definition itself yields nothing.
        if schema.is_type("array") {
            return Some(Value::Array(vec![inner.unwrap_or(Value::Null)]));
        }
        inner
    }
}

/// The reference a node points at, if any. A non-empty `items.$ref` wins on arrays.
fn reference_of(schema: &Schema) -> Option<&str> {
    let item_ref = schema
        .items()
        .filter(|_| schema.is_type("array"))
        .and_then(|items| items.reference.as_deref())
        .filter(|r| !r.is_empty());

    item_ref.or(schema.reference.as_deref().filter(|r| !r.is_empty()))
}

fn wrap_if_array(schema: &Schema, value: Value) -> Value {
    if schema.is_type("array") {
        Value::Array(vec![value])
    } else {
        value
    }
}

fn synthesize_map(additional: &AdditionalProperties) -> Option<Value> {
    match additional {
        AdditionalProperties::Bool(true) => Some(json!({ "key": "value" })),
        AdditionalProperties::Schema(values) if values.is_type("string") => Some(json!({
            "key 1": "value 1",
            "key 2": "value 2",
        })),
        AdditionalProperties::Schema(values) if values.is_type("integer") => Some(json!({
            "key 1": 0,
            "key 2": 1,
        })),
        _ => None,
    }
}
