//! Path Resolution
//!
//! Maps a [`SchemaPath`] to the schema node that governs a request or a
//! response. Two strategies share one trait:
//!
//! - [`FlatResolver`]: key-chain descent into per-resource documents
//! - [`LinkedResolver`]: `definitions[resource].links[rel]` lookup with
//!   target-schema fallback
//!
//! `Ok(None)` from either resolve method means "no schema": the caller
//! skips validation for that call.

pub mod flat;
pub mod link;
pub mod linked;

pub use flat::{FlatResolver, ResponseKeyHook, ResponseSchemaHook};
pub use link::Link;
pub use linked::LinkedResolver;

use std::borrow::Cow;

use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use serde_json::Value;

use crate::error::ValidationError;
use crate::path::SchemaPath;
use crate::store::SchemaStore;

/// A selected schema fragment plus the document its `$ref`s resolve against
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedNode<'a> {
    /// Root document used as the `$ref` resolution base
    pub root: &'a Value,
    /// The fragment to validate against; owned when synthesised
    pub schema: Cow<'a, Value>,
}

impl<'a> ResolvedNode<'a> {
    pub fn borrowed(root: &'a Value, schema: &'a Value) -> Self {
        Self {
            root,
            schema: Cow::Borrowed(schema),
        }
    }

    pub fn owned(root: &'a Value, schema: Value) -> Self {
        Self {
            root,
            schema: Cow::Owned(schema),
        }
    }

    /// Whether the fragment is the root document itself
    pub fn is_root(&self) -> bool {
        std::ptr::eq(self.schema.as_ref(), self.root)
    }
}

/// A schema addressing strategy
pub trait ResolutionStrategy: Send + Sync {
    /// Short name for logs ("flat", "linked", ...)
    fn name(&self) -> &'static str;

    /// The store this strategy resolves against
    fn store(&self) -> &SchemaStore;

    /// Schema for the request payload of `path`
    fn resolve_request(&self, path: &SchemaPath) -> Result<Option<ResolvedNode<'_>>, ValidationError>;

    /// Schema for the response payload of `path`
    fn resolve_response(&self, path: &SchemaPath) -> Result<Option<ResolvedNode<'_>>, ValidationError>;
}

/// Closest known resource name for an unknown one
pub(crate) fn suggest<'a>(query: &str, candidates: impl IntoIterator<Item = &'a str>) -> Option<String> {
    let matcher = SkimMatcherV2::default();
    candidates
        .into_iter()
        .filter_map(|c| {
            matcher
                .fuzzy_match(c, query)
                .or_else(|| matcher.fuzzy_match(query, c))
                .map(|score| (score, c))
        })
        .max_by_key(|(score, _)| *score)
        .map(|(_, c)| c.to_string())
}
