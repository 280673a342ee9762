//! Logical operation paths
//!
//! Segment 0 is always the resource key. In flat mode the remaining segments
//! are a key chain into the resource document; in linked mode segment 1 is
//! the link relation.

use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// A non-empty sequence of path segments, e.g. `users/create`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SchemaPath {
    segments: Vec<String>,
}

impl SchemaPath {
    /// Build a path from segments; rejects empty paths and empty segments
    pub fn new<I, S>(segments: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        if segments.is_empty() || segments.iter().any(|s| s.is_empty()) {
            return Err(ValidationError::EmptyPath);
        }
        Ok(Self { segments })
    }

    /// Parse a `/`-separated path such as `users/instances`
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        Self::new(s.trim_matches('/').split('/'))
    }

    /// The resource key (segment 0)
    pub fn resource(&self) -> &str {
        &self.segments[0]
    }

    /// The link relation (segment 1), if present
    pub fn rel(&self) -> Option<&str> {
        self.segments.get(1).map(String::as_str)
    }

    /// Every segment after the resource key
    pub fn rest(&self) -> &[String] {
        &self.segments[1..]
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// A new path with one more trailing segment
    pub fn child(&self, segment: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment.into());
        Self { segments }
    }
}

impl fmt::Display for SchemaPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("/"))
    }
}

impl FromStr for SchemaPath {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
