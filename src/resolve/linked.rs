//! Linked addressing over one API-description document
//!
//! ```text
//! { "definitions": { "<resource>": { ..., "links": [ { "rel", "schema"?, "targetSchema"? } ] } } }
//! ```
//!
//! The first link whose `rel` matches wins. Response fallback when a link
//! has no `targetSchema`:
//! 1. `rel == "instances"`: `{"objects": [<resource>, ...]}`
//! 2. otherwise: the resource definition itself

use serde_json::{json, Value};
use tracing::debug;

use super::{suggest, Link, ResolutionStrategy, ResolvedNode};
use crate::error::ValidationError;
use crate::path::SchemaPath;
use crate::store::SchemaStore;

/// Relation whose responses are wrapped collections
pub const INSTANCES_REL: &str = "instances";

/// Placeholder segment reported when a linked path has no relation
const MISSING_REL: &str = "<rel>";

/// Resolves `resource/rel` paths through `definitions` and `links`
pub struct LinkedResolver {
    store: SchemaStore,
}

/// A matched link together with the documents it came from
struct Matched<'a> {
    root: &'a Value,
    definition: &'a Value,
    link: Link<'a>,
}

impl LinkedResolver {
    pub fn new(store: SchemaStore) -> Self {
        Self { store }
    }

    /// Root document and the definition of `resource`
    pub fn definition(&self, resource: &str) -> Result<(&Value, &Value), ValidationError> {
        let root = self.store.document_for(resource)?;
        let definition = root
            .get("definitions")
            .and_then(|defs| defs.get(resource))
            .ok_or_else(|| ValidationError::UnknownResource {
                resource: resource.to_string(),
                suggestion: suggest(resource, self.store.resource_keys()),
            })?;
        Ok((root, definition))
    }

    /// Every link declared by `resource`
    pub fn links(&self, resource: &str) -> Result<Vec<Link<'_>>, ValidationError> {
        let (_, definition) = self.definition(resource)?;
        Ok(Link::all(definition).collect())
    }

    fn find(&self, path: &SchemaPath) -> Result<Option<Matched<'_>>, ValidationError> {
        let (root, definition) = self.definition(path.resource())?;
        let rel = path.rel().ok_or_else(|| ValidationError::PathNotFound {
            path: path.to_string(),
            segment: MISSING_REL.to_string(),
        })?;

        let found = Link::all(definition).find(|link| link.rel == rel);
        if found.is_none() {
            debug!(path = %path, "no link for relation, skipping");
        }
        Ok(found.map(|link| Matched {
            root,
            definition,
            link,
        }))
    }
}

impl ResolutionStrategy for LinkedResolver {
    fn name(&self) -> &'static str {
        "linked"
    }

    fn store(&self) -> &SchemaStore {
        &self.store
    }

    fn resolve_request(&self, path: &SchemaPath) -> Result<Option<ResolvedNode<'_>>, ValidationError> {
        let Some(matched) = self.find(path)? else {
            return Ok(None);
        };
        Ok(Some(match matched.link.schema {
            Some(schema) => ResolvedNode::borrowed(matched.root, schema),
            // e.g. reads: no input schema, accept anything
            None => ResolvedNode::owned(matched.root, json!({})),
        }))
    }

    fn resolve_response(&self, path: &SchemaPath) -> Result<Option<ResolvedNode<'_>>, ValidationError> {
        let Some(matched) = self.find(path)? else {
            return Ok(None);
        };
        if let Some(target) = matched.link.target_schema {
            return Ok(Some(ResolvedNode::borrowed(matched.root, target)));
        }

        if matched.link.rel == INSTANCES_REL {
            debug!(path = %path, "no targetSchema, using wrapped collection of resource");
            return Ok(Some(ResolvedNode::owned(
                matched.root,
                collection_of(matched.definition),
            )));
        }

        debug!(path = %path, "no targetSchema, using resource definition");
        Ok(Some(ResolvedNode::borrowed(matched.root, matched.definition)))
    }
}

/// `{"objects": [item, ...]}` with `objects` required
fn collection_of(item: &Value) -> Value {
    json!({
        "type": "object",
        "required": ["objects"],
        "properties": {
            "objects": {
                "type": "array",
                "items": item
            }
        }
    })
}
