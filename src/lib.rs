//! # hookable
//!
//! Hook points for plain functions. A factory receives an [`Invoke`] handle
//! and builds the function; callers register hooks on the resulting
//! [`Hookable`] and the function runs them at the points it chose, through a
//! synchronous, parallel, sequence or middleware invoker.
//!
//! This crate re-exports the engine and the shared error and configuration
//! types.

pub use hookable_core::config::{HookableConfig, InvocationConfig, LoggingConfig};
pub use hookable_core::{ErrorKind, HookError, HookResult};
pub use hookable_engine::{extender, hookable, hooks, invokers, stores};
pub use hookable_engine::{
    AliasExtender, DefaultExtender, Done, Extender, FunctionHookStore, Hook, HookCatalog, HookMap,
    HookOutcome, HookQuery, HookStore, Hookable, HookableOptions, Invoke, InvokeOptions,
    InvokeOutcome, Invoker, InvokerRegistry, InvokerSpec, Next, ObjectHook, ObjectHookStore,
    Registrar, TypeSpec, create_extender, hook_map,
};

/// Everything needed to build and drive hookables.
pub mod prelude {
    pub use hookable_core::config::HookableConfig;
    pub use hookable_engine::prelude::*;
}
