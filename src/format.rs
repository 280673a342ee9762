//! Custom string formats
//!
//! The JSON Schema engine already knows the standard vocabulary (`email`,
//! `date-time`, `ipv4`, `uri`, ...). A [`FormatChecker`] adds named checks on
//! top; it is fixed once the engine is built.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

use regex::Regex;

/// A single format predicate
pub type FormatFn = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// Named format predicates applied to strings declared with `format`
#[derive(Clone, Default)]
pub struct FormatChecker {
    formats: BTreeMap<String, FormatFn>,
}

fn uuid_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$")
            .expect("uuid pattern is a valid regex literal")
    })
}

fn slug_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").expect("slug pattern is a valid regex literal")
    })
}

impl FormatChecker {
    /// Only the engine's standard formats
    pub fn new() -> Self {
        Self::default()
    }

    /// Standard formats plus `uuid` and `slug`
    pub fn extended() -> Self {
        Self::new()
            .with_format("uuid", |s| uuid_pattern().is_match(s))
            .with_format("slug", |s| slug_pattern().is_match(s))
    }

    /// Register (or replace) a format
    pub fn with_format<F>(mut self, name: impl Into<String>, check: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.formats.insert(name.into(), Arc::new(check));
        self
    }

    /// Run the named check; `None` when the format is not registered here
    pub fn check(&self, name: &str, value: &str) -> Option<bool> {
        self.formats.get(name).map(|check| check(value))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.formats.keys().map(String::as_str)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (&String, &FormatFn)> {
        self.formats.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.formats.is_empty()
    }
}

impl fmt::Debug for FormatChecker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.formats.keys()).finish()
    }
}
