//! Reference-aware validation
//!
//! A resolved fragment is validated as if it lived inside its root
//! document. The root is registered with the engine under a fixed base URI
//! and every local `$ref` in the fragment (`#`, `#/definitions/...`) is
//! rewritten to point into it, so references resolve against the root
//! however deep the fragment was found. Fragments without any `$ref` are
//! compiled on their own.
//!
//! Only the first error is reported.

use jsonschema::error::ValidationErrorKind;
use jsonschema::{Draft, JSONSchema};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Outcome, SchemaViolation, ValidationError};
use crate::format::FormatChecker;
use crate::resolve::ResolvedNode;

/// Base URI the root document is registered under
const ROOT_URI: &str = "json-schema:///schema-gate/root.json";

/// JSON Schema draft used to interpret every schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SchemaDraft {
    #[default]
    Draft4,
    Draft6,
    Draft7,
}

impl SchemaDraft {
    fn engine_draft(self) -> Draft {
        match self {
            SchemaDraft::Draft4 => Draft::Draft4,
            SchemaDraft::Draft6 => Draft::Draft6,
            SchemaDraft::Draft7 => Draft::Draft7,
        }
    }
}

/// Validates payloads against resolved schema nodes
#[derive(Debug, Clone, Default)]
pub struct ReferenceValidator {
    draft: SchemaDraft,
    formats: FormatChecker,
}

impl ReferenceValidator {
    pub fn new(draft: SchemaDraft, formats: FormatChecker) -> Self {
        Self { draft, formats }
    }

    pub fn draft(&self) -> SchemaDraft {
        self.draft
    }

    pub fn formats(&self) -> &FormatChecker {
        &self.formats
    }

    /// Validate against a node produced by a resolution strategy
    pub fn validate_node(&self, node: &ResolvedNode<'_>, value: &Value) -> Outcome {
        self.validate(node.root, node.schema.as_ref(), value)
    }

    /// Validate `value` against `schema`, resolving `$ref`s against `root`
    pub fn validate(&self, root: &Value, schema: &Value, value: &Value) -> Outcome {
        let compiled = if std::ptr::eq(root, schema) || !contains_ref(schema) {
            self.compile(schema, None)?
        } else {
            self.compile(&rebase(schema), Some(root))?
        };

        if let Err(mut errors) = compiled.validate(value) {
            if let Some(error) = errors.next() {
                let mut pointer = error.instance_path.to_string();
                // point at the missing property, not its parent
                if let ValidationErrorKind::Required { property } = &error.kind {
                    if let Some(name) = property.as_str() {
                        pointer.push('/');
                        pointer.push_str(&escape_pointer(name));
                    }
                }
                return Err(SchemaViolation {
                    pointer,
                    message: error.to_string(),
                }
                .into());
            }
        }
        Ok(())
    }

    fn compile(
        &self,
        schema: &Value,
        root: Option<&Value>,
    ) -> Result<JSONSchema, ValidationError> {
        let mut options = JSONSchema::options();
        options.with_draft(self.draft.engine_draft());
        if let Some(root) = root {
            options.with_document(ROOT_URI.to_string(), root.clone());
        }
        for (name, check) in self.formats.iter() {
            let check = check.clone();
            options.with_format(name.clone(), move |s: &str| check(s));
        }
        options
            .compile(schema)
            .map_err(|e| ValidationError::InvalidSchema {
                message: e.to_string(),
            })
    }
}

/// Copy of `schema` with local `$ref`s pointing into the registered root
fn rebase(schema: &Value) -> Value {
    match schema {
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, value)| (key.clone(), rebase_keyword(key, value)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(rebase).collect()),
        other => other.clone(),
    }
}

fn rebase_keyword(key: &str, value: &Value) -> Value {
    match (key, value) {
        ("$ref", Value::String(reference)) if reference.starts_with('#') => {
            Value::String(format!("{}{}", ROOT_URI, reference))
        }
        // instance data, not schemas
        ("enum" | "const" | "default" | "examples", _) => value.clone(),
        // maps of named subschemas: names are never keywords
        ("properties" | "patternProperties" | "definitions" | "dependencies", Value::Object(schemas)) => {
            Value::Object(
                schemas
                    .iter()
                    .map(|(name, schema)| (name.clone(), rebase(schema)))
                    .collect(),
            )
        }
        _ => rebase(value),
    }
}

fn contains_ref(schema: &Value) -> bool {
    match schema {
        Value::Object(map) => map.contains_key("$ref") || map.values().any(contains_ref),
        Value::Array(items) => items.iter().any(contains_ref),
        _ => false,
    }
}

fn escape_pointer(token: &str) -> String {
    token.replace('~', "~0").replace('/', "~1")
}
