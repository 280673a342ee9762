//! Schema Store
//!
//! Loads schema documents once at startup and serves them read-only.
//!
//! ## Layouts
//!
//! ```text
//! flat:   jsonschema/
//!         ├── users.json        -> resource "users"
//!         ├── widgets.json      -> resource "widgets"
//!         ├── notes.txt         (ignored)
//!         └── drafts/           (ignored)
//!
//! linked: api.json              -> { "definitions": { "users": { "links": [...] } } }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;
use walkdir::WalkDir;

use crate::checksum::Checksum;
use crate::error::{LoadError, Result, ValidationError};

/// How schema documents are organised and addressed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AddressingStrategy {
    /// One standalone document per resource in a directory
    #[default]
    Flat,
    /// One API-description document with `definitions` and `links`
    Linked,
}

impl AddressingStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            AddressingStrategy::Flat => "flat",
            AddressingStrategy::Linked => "linked",
        }
    }
}

#[derive(Debug)]
enum Contents {
    Flat(BTreeMap<String, Value>),
    Linked(Value),
}

/// Immutable, indexed schema documents
#[derive(Debug)]
pub struct SchemaStore {
    source: Option<PathBuf>,
    contents: Contents,
    checksum: Checksum,
}

impl SchemaStore {
    /// Load from a directory (flat) or a single document (linked)
    pub fn load(location: impl AsRef<Path>, strategy: AddressingStrategy) -> Result<Self> {
        match strategy {
            AddressingStrategy::Flat => Self::load_directory(location),
            AddressingStrategy::Linked => Self::load_document(location),
        }
    }

    /// Index every immediate `*.json` file of a directory by its resource key
    pub fn load_directory(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let metadata = fs::metadata(dir).map_err(|source| LoadError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        if !metadata.is_dir() {
            return Err(LoadError::NotADirectory(dir.to_path_buf()));
        }

        let mut documents = BTreeMap::new();
        let mut raw: BTreeMap<String, Vec<u8>> = BTreeMap::new();

        for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
            let entry = entry.map_err(|source| LoadError::Walk {
                path: dir.to_path_buf(),
                source,
            })?;
            let path = entry.path();
            // follows symlinks, so a linked directory is skipped too
            if path.is_dir() {
                continue;
            }
            let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if !file_name.ends_with(".json") {
                continue;
            }
            let key = resource_key(file_name);
            if key.is_empty() {
                continue;
            }
            if documents.contains_key(key) {
                return Err(LoadError::DuplicateResource {
                    key: key.to_string(),
                    path: path.to_path_buf(),
                });
            }

            let bytes = fs::read(path).map_err(|source| LoadError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            let document: Value = serde_json::from_slice(&bytes).map_err(|source| LoadError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

            documents.insert(key.to_string(), document);
            raw.insert(key.to_string(), bytes);
        }

        let checksum = Checksum::from_parts(raw.values().map(Vec::as_slice));
        info!(
            location = %dir.display(),
            resources = documents.len(),
            checksum = checksum.short(),
            "loaded flat schema directory"
        );

        Ok(Self {
            source: Some(dir.to_path_buf()),
            contents: Contents::Flat(documents),
            checksum,
        })
    }

    /// Load the single API-description document used by the linked strategy
    pub fn load_document(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let document: Value = serde_json::from_slice(&bytes).map_err(|source| LoadError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        if !document.get("definitions").map_or(false, Value::is_object) {
            return Err(LoadError::MissingDefinitions(path.to_path_buf()));
        }

        let store = Self {
            source: Some(path.to_path_buf()),
            contents: Contents::Linked(document),
            checksum: Checksum::from_bytes(&bytes),
        };
        info!(
            location = %path.display(),
            resources = store.resource_keys().len(),
            checksum = store.checksum.short(),
            "loaded linked schema document"
        );
        Ok(store)
    }

    /// Build a flat store from in-memory documents
    pub fn from_documents<I, K>(documents: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        let documents: BTreeMap<String, Value> =
            documents.into_iter().map(|(k, v)| (k.into(), v)).collect();
        let serialized: Vec<String> = documents.values().map(Value::to_string).collect();
        let checksum = Checksum::from_parts(serialized.iter().map(|s| s.as_bytes()));
        Self {
            source: None,
            contents: Contents::Flat(documents),
            checksum,
        }
    }

    /// Build a linked store from an in-memory API-description document
    pub fn from_document(document: Value) -> Result<Self> {
        if !document.get("definitions").map_or(false, Value::is_object) {
            return Err(LoadError::MissingDefinitions(PathBuf::from("<memory>")));
        }
        let checksum = Checksum::from_bytes(document.to_string().as_bytes());
        Ok(Self {
            source: None,
            contents: Contents::Linked(document),
            checksum,
        })
    }

    /// The addressing strategy this store was loaded for
    pub fn strategy(&self) -> AddressingStrategy {
        match self.contents {
            Contents::Flat(_) => AddressingStrategy::Flat,
            Contents::Linked(_) => AddressingStrategy::Linked,
        }
    }

    /// Flat: the document for `key`. Linked: the root document, whatever the key.
    pub fn document_for(&self, key: &str) -> std::result::Result<&Value, ValidationError> {
        match &self.contents {
            Contents::Flat(documents) => {
                documents
                    .get(key)
                    .ok_or_else(|| ValidationError::UnknownSchema {
                        key: key.to_string(),
                    })
            }
            Contents::Linked(document) => Ok(document),
        }
    }

    /// Resource keys: file keys in flat mode, `definitions` keys in linked mode
    pub fn resource_keys(&self) -> Vec<&str> {
        match &self.contents {
            Contents::Flat(documents) => documents.keys().map(String::as_str).collect(),
            Contents::Linked(document) => document
                .get("definitions")
                .and_then(Value::as_object)
                .map(|defs| defs.keys().map(String::as_str).collect())
                .unwrap_or_default(),
        }
    }

    /// Where the documents were read from, if they came from disk
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn checksum(&self) -> &Checksum {
        &self.checksum
    }
}

/// Resource key for a schema file name: everything before the first `.`
fn resource_key(file_name: &str) -> &str {
    file_name.split('.').next().unwrap_or_default()
}
