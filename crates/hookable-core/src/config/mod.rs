//! Configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section.

pub mod invocation;
pub mod logging;

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use self::invocation::InvocationConfig;
pub use self::logging::LoggingConfig;

use crate::error::HookError;

/// Root configuration.
///
/// `extender` and `hooks` are kept as raw values: the engine validates
/// their shape when it builds an alias extender or binds hooks, so a bad
/// document fails with the same error kinds as a bad programmatic call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HookableConfig {
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Invocation and cloning settings.
    #[serde(default)]
    pub invocation: InvocationConfig,
    /// Alias list or `alias -> hook type` map for an alias extender.
    #[serde(default)]
    pub extender: Option<Value>,
    /// `hook type -> hook name(s)` bindings resolved through a catalog.
    #[serde(default)]
    pub hooks: Option<Value>,
}

impl HookableConfig {
    /// Load configuration from a TOML file.
    ///
    /// The file is optional; environment variables prefixed with
    /// `HOOKABLE__` are layered on top.
    pub fn load(path: &str) -> Result<Self, HookError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(
                config::Environment::with_prefix("HOOKABLE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| HookError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| HookError::configuration(format!("Failed to deserialize config: {e}")))
    }

    /// Parse configuration from an inline TOML document.
    pub fn from_toml(document: &str) -> Result<Self, HookError> {
        let config = config::Config::builder()
            .add_source(config::File::from_str(document, config::FileFormat::Toml))
            .build()?;

        Ok(config.try_deserialize()?)
    }
}
