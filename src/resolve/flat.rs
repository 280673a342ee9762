//! Flat addressing: `resource/key/key/...`

use serde_json::Value;
use tracing::debug;

use super::{ResolutionStrategy, ResolvedNode};
use crate::error::ValidationError;
use crate::path::SchemaPath;
use crate::store::SchemaStore;

/// Operator-supplied response schema lookup for flat stores
pub trait ResponseSchemaHook: Send + Sync {
    fn resolve<'a>(
        &self,
        store: &'a SchemaStore,
        path: &SchemaPath,
    ) -> Result<Option<ResolvedNode<'a>>, ValidationError>;
}

/// Response schema stored under a fixed sub-key of the request path,
/// e.g. `users/create/response`. Absent key means no schema.
#[derive(Debug, Clone)]
pub struct ResponseKeyHook {
    key: String,
}

impl ResponseKeyHook {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

impl ResponseSchemaHook for ResponseKeyHook {
    fn resolve<'a>(
        &self,
        store: &'a SchemaStore,
        path: &SchemaPath,
    ) -> Result<Option<ResolvedNode<'a>>, ValidationError> {
        match descend(store, &path.child(self.key.as_str())) {
            Ok(node) => Ok(Some(node)),
            Err(ValidationError::PathNotFound { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

/// Resolves paths by descending into per-resource documents
pub struct FlatResolver {
    store: SchemaStore,
    response_hook: Option<Box<dyn ResponseSchemaHook>>,
}

impl FlatResolver {
    pub fn new(store: SchemaStore) -> Self {
        Self {
            store,
            response_hook: None,
        }
    }

    /// Enable response resolution through `hook`; without one every
    /// response resolves to "no schema"
    pub fn with_response_hook(mut self, hook: impl ResponseSchemaHook + 'static) -> Self {
        self.response_hook = Some(Box::new(hook));
        self
    }

    /// The node at `path`, starting from the resource document
    pub fn resolve(&self, path: &SchemaPath) -> Result<ResolvedNode<'_>, ValidationError> {
        descend(&self.store, path)
    }
}

impl ResolutionStrategy for FlatResolver {
    fn name(&self) -> &'static str {
        "flat"
    }

    fn store(&self) -> &SchemaStore {
        &self.store
    }

    fn resolve_request(&self, path: &SchemaPath) -> Result<Option<ResolvedNode<'_>>, ValidationError> {
        self.resolve(path).map(Some)
    }

    fn resolve_response(&self, path: &SchemaPath) -> Result<Option<ResolvedNode<'_>>, ValidationError> {
        match &self.response_hook {
            Some(hook) => hook.resolve(&self.store, path),
            None => {
                debug!(path = %path, "no response hook configured, skipping");
                Ok(None)
            }
        }
    }
}

pub(crate) fn descend<'a>(
    store: &'a SchemaStore,
    path: &SchemaPath,
) -> Result<ResolvedNode<'a>, ValidationError> {
    let root = store.document_for(path.resource())?;
    let mut node = root;
    for segment in path.rest() {
        let next = match node {
            Value::Object(map) => map.get(segment.as_str()),
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        };
        node = next.ok_or_else(|| ValidationError::PathNotFound {
            path: path.to_string(),
            segment: segment.clone(),
        })?;
    }
    debug!(path = %path, "resolved flat schema node");
    Ok(ResolvedNode::borrowed(root, node))
}
