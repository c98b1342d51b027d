//! Unified error type for hook registration and invocation.
//!
//! Registration mistakes, invoker lookups and the failures hooks report
//! all map into [`HookError`], so callers propagate everything with `?`.

use std::fmt;
use thiserror::Error;

/// Error kind categorization used across the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// A batched registration value was neither a hook nor a sequence of hooks.
    InvalidHookShape,
    /// An annotated hook is missing its identity code or executable body.
    InvalidHook,
    /// An extender was built from something other than a list or a map.
    InvalidTypeSpec,
    /// The requested invoker name is not registered.
    UnknownInvoker,
    /// A hook name could not be resolved through the catalog.
    UnknownHook,
    /// An alias extender was called with an alias it does not know.
    UnknownAlias,
    /// The hook's shape cannot run under the selected invoker.
    IncompatibleHook,
    /// Cloning was turned off for this hookable.
    CloneDisabled,
    /// A hook reported its own failure.
    HookFailed,
    /// A configuration error occurred.
    Configuration,
    /// A serialization/deserialization error occurred.
    Serialization,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidHookShape => write!(f, "INVALID_HOOK_SHAPE"),
            Self::InvalidHook => write!(f, "INVALID_HOOK"),
            Self::InvalidTypeSpec => write!(f, "INVALID_TYPE_SPEC"),
            Self::UnknownInvoker => write!(f, "UNKNOWN_INVOKER"),
            Self::UnknownHook => write!(f, "UNKNOWN_HOOK"),
            Self::UnknownAlias => write!(f, "UNKNOWN_ALIAS"),
            Self::IncompatibleHook => write!(f, "INCOMPATIBLE_HOOK"),
            Self::CloneDisabled => write!(f, "CLONE_DISABLED"),
            Self::HookFailed => write!(f, "HOOK_FAILED"),
            Self::Configuration => write!(f, "CONFIGURATION"),
            Self::Serialization => write!(f, "SERIALIZATION"),
        }
    }
}

/// The unified error used throughout the engine.
///
/// Hook authors build failures with [`HookError::hook_failed`] or
/// [`HookError::with_source`]; the engine hands them back to the caller
/// unchanged.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct HookError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl HookError {
    /// Create a new error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Create a new error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an invalid-hook-shape error.
    pub fn invalid_hook_shape(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidHookShape, message)
    }

    /// Create an invalid-hook error.
    pub fn invalid_hook(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidHook, message)
    }

    /// Create an invalid-type-spec error.
    pub fn invalid_type_spec(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidTypeSpec, message)
    }

    /// Create an unknown-invoker error.
    pub fn unknown_invoker(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnknownInvoker, message)
    }

    /// Create an unknown-hook error.
    pub fn unknown_hook(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnknownHook, message)
    }

    /// Create an unknown-alias error.
    pub fn unknown_alias(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnknownAlias, message)
    }

    /// Create an incompatible-hook error.
    pub fn incompatible_hook(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::IncompatibleHook, message)
    }

    /// Create a clone-disabled error.
    pub fn clone_disabled(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::CloneDisabled, message)
    }

    /// Create a hook failure.
    pub fn hook_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::HookFailed, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Returns `true` if this error has the given kind.
    pub fn is(&self, kind: ErrorKind) -> bool {
        self.kind == kind
    }
}

impl Clone for HookError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for HookError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(
            ErrorKind::Serialization,
            format!("JSON serialization error: {err}"),
            err,
        )
    }
}

impl From<config::ConfigError> for HookError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}
