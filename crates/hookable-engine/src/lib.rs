//! # hookable-engine
//!
//! Hook points for plain functions. Provides:
//!
//! - Hook stores with ordered, deduplicated buckets per hook type
//! - Synchronous, parallel, sequence and middleware invokers
//! - Extenders that attach registration methods to a wrapped function
//! - The [`Hookable`] wrapper tying store, invokers and extender together
//! - A named-hook catalog for configuration-driven registration

pub mod extender;
pub mod hookable;
pub mod hooks;
pub mod invokers;
pub mod macros;
pub mod prelude;
pub mod stores;

pub use extender::{AliasExtender, DefaultExtender, Extender, Registrar, TypeSpec, create_extender};
pub use hookable::{Hookable, HookableOptions, Invoke};
pub use hooks::{Done, Hook, HookCatalog, HookOutcome, Next};
pub use invokers::{InvokeOptions, InvokeOutcome, Invoker, InvokerRegistry, InvokerSpec};
pub use stores::{FunctionHookStore, HookMap, HookQuery, HookStore, ObjectHook, ObjectHookStore};
