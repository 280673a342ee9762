//! Schema Gate
//!
//! Validates request and response payloads against JSON Schemas before and
//! after they cross a service boundary.
//!
//! ## Features
//!
//! - **Two schema layouts**: one file per resource (flat) or a single
//!   hyper-schema API description with `definitions` and `links` (linked)
//! - **Target schema fallback**: wrapped `{"objects": [...]}` collections
//!   for `instances`, the resource itself for every other relation
//! - **Root-relative `$ref`s**: fragments resolve references against the
//!   full document they came from
//! - **Pluggable formats**: custom `format` checks on top of the standard set
//! - **Deferred response checks**: observability only, never blocking
//!
//! ## Usage
//!
//! ```text
//! let engine = schema_gate::initialize(&EngineConfig::load()?)?;
//! let pending = engine.guard(&SchemaPath::parse("users/create")?, Some(body))?;
//! // ... run the handler ...
//! let check = pending.complete(status, content_type, &response_body);
//! ```

pub mod checksum;
pub mod config;
pub mod engine;
pub mod error;
pub mod format;
pub mod path;
pub mod resolve;
pub mod store;
pub mod validator;

pub use checksum::Checksum;
pub use config::EngineConfig;
pub use engine::{initialize, Engine, PendingResponseCheck, ResponseCheck, SkipReason};
pub use error::{LoadError, Outcome, Result, SchemaViolation, ValidationError};
pub use format::FormatChecker;
pub use path::SchemaPath;
pub use resolve::{
    FlatResolver, Link, LinkedResolver, ResolutionStrategy, ResolvedNode, ResponseKeyHook,
    ResponseSchemaHook,
};
pub use store::{AddressingStrategy, SchemaStore};
pub use validator::{ReferenceValidator, SchemaDraft};
