//! Validation Orchestration
//!
//! The handle a host framework keeps for its whole lifetime. Per call:
//!
//! ```text
//! guard(path, body) ──fail──> reject request, handler never runs
//!        │ ok
//!        ▼
//! handler runs, produces a response
//!        │
//!        ▼
//! PendingResponseCheck::complete(status, content_type, body)
//!        └─> ResponseCheck (observability only, never blocks delivery)
//! ```
//!
//! Dropping a [`PendingResponseCheck`] without completing it is always safe.

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::error::{Outcome, Result, ValidationError};
use crate::path::SchemaPath;
use crate::resolve::{FlatResolver, LinkedResolver, ResolutionStrategy, ResponseKeyHook};
use crate::store::{AddressingStrategy, SchemaStore};
use crate::validator::ReferenceValidator;

/// Why a response was not validated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// `validate_responses` is off
    Disabled,
    /// Status other than 200
    NotSuccess(u16),
    /// Content type is not `application/json`
    NotJson,
    /// The path has no response schema
    NoSchema,
}

/// Result of a post-handler response check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseCheck {
    Skipped(SkipReason),
    Passed,
    Failed(ValidationError),
}

impl ResponseCheck {
    pub fn is_failure(&self) -> bool {
        matches!(self, ResponseCheck::Failed(_))
    }
}

/// Request/response validation over one loaded schema store
pub struct Engine {
    strategy: Box<dyn ResolutionStrategy>,
    validator: ReferenceValidator,
    validate_responses: bool,
}

/// Build an engine from configuration; any error here is startup-fatal
pub fn initialize(config: &EngineConfig) -> Result<Engine> {
    Engine::initialize(config)
}

impl Engine {
    pub fn initialize(config: &EngineConfig) -> Result<Self> {
        let location = config.source_location()?;
        let store = SchemaStore::load(&location, config.addressing_strategy)?;
        let validator = ReferenceValidator::new(config.draft, config.format_checker.clone());

        let engine = match config.addressing_strategy {
            AddressingStrategy::Flat => {
                let mut resolver = FlatResolver::new(store);
                if let Some(key) = &config.response_key {
                    resolver = resolver.with_response_hook(ResponseKeyHook::new(key.as_str()));
                }
                Self::new(resolver, validator)
            }
            AddressingStrategy::Linked => Self::new(LinkedResolver::new(store), validator),
        }
        .with_response_validation(config.validate_responses);

        info!(
            strategy = engine.strategy.name(),
            resources = engine.store().resource_keys().len(),
            validate_responses = engine.validate_responses,
            "schema engine ready"
        );
        Ok(engine)
    }

    /// An engine over any strategy; response validation starts disabled
    pub fn new(strategy: impl ResolutionStrategy + 'static, validator: ReferenceValidator) -> Self {
        Self {
            strategy: Box::new(strategy),
            validator,
            validate_responses: false,
        }
    }

    pub fn with_response_validation(mut self, enabled: bool) -> Self {
        self.validate_responses = enabled;
        self
    }

    pub fn validates_responses(&self) -> bool {
        self.validate_responses
    }

    pub fn strategy(&self) -> &dyn ResolutionStrategy {
        self.strategy.as_ref()
    }

    pub fn store(&self) -> &SchemaStore {
        self.strategy.store()
    }

    pub fn validator(&self) -> &ReferenceValidator {
        &self.validator
    }

    /// Validate a parsed request body; no schema for `path` means success
    pub fn validate_request(&self, path: &SchemaPath, body: &Value) -> Outcome {
        let Some(node) = self.strategy.resolve_request(path)? else {
            debug!(path = %path, "no request schema, skipping");
            return Ok(());
        };
        self.validator.validate_node(&node, body)
    }

    /// Validate a raw request body. A missing or unparsable body is
    /// validated as `null`.
    pub fn validate_request_raw(&self, path: &SchemaPath, raw: Option<&str>) -> Outcome {
        let body = raw
            .and_then(|raw| serde_json::from_str(raw).ok())
            .unwrap_or(Value::Null);
        self.validate_request(path, &body)
    }

    /// Validate the request and hand back the deferred response check
    pub fn guard(
        &self,
        path: &SchemaPath,
        raw: Option<&str>,
    ) -> std::result::Result<PendingResponseCheck<'_>, ValidationError> {
        self.validate_request_raw(path, raw)?;
        Ok(PendingResponseCheck {
            engine: self,
            path: path.clone(),
        })
    }

    /// Check a finished response. Only enabled, 200, JSON responses are
    /// validated; failures are logged and returned, never raised.
    pub fn validate_response(
        &self,
        path: &SchemaPath,
        status: u16,
        content_type: &str,
        raw: &str,
    ) -> ResponseCheck {
        if !self.validate_responses {
            return ResponseCheck::Skipped(SkipReason::Disabled);
        }
        if !is_success(status) {
            return ResponseCheck::Skipped(SkipReason::NotSuccess(status));
        }
        if !is_json(content_type) {
            return ResponseCheck::Skipped(SkipReason::NotJson);
        }

        let check = match serde_json::from_str::<Value>(raw) {
            Ok(body) => self.check_response_body(path, &body),
            Err(e) => ResponseCheck::Failed(ValidationError::MalformedPayload {
                message: e.to_string(),
            }),
        };
        if let ResponseCheck::Failed(error) = &check {
            warn!(path = %path, status, error = %error, "response failed schema validation");
        }
        check
    }

    fn check_response_body(&self, path: &SchemaPath, body: &Value) -> ResponseCheck {
        match self.strategy.resolve_response(path) {
            Ok(Some(node)) => match self.validator.validate_node(&node, body) {
                Ok(()) => ResponseCheck::Passed,
                Err(e) => ResponseCheck::Failed(e),
            },
            Ok(None) => ResponseCheck::Skipped(SkipReason::NoSchema),
            Err(e) => ResponseCheck::Failed(e),
        }
    }
}

/// Deferred response validation for one accepted request
#[derive(Clone)]
pub struct PendingResponseCheck<'a> {
    engine: &'a Engine,
    path: SchemaPath,
}

impl PendingResponseCheck<'_> {
    pub fn path(&self) -> &SchemaPath {
        &self.path
    }

    /// Run the response check once the handler has produced its response
    pub fn complete(self, status: u16, content_type: &str, body: &str) -> ResponseCheck {
        self.engine.validate_response(&self.path, status, content_type, body)
    }
}

/// Only a plain 200 carries a response body worth checking
fn is_success(status: u16) -> bool {
    status == 200
}

fn is_json(content_type: &str) -> bool {
    content_type
        .split(';')
        .next()
        .map(|media| media.trim().eq_ignore_ascii_case("application/json"))
        .unwrap_or(false)
}
