//! Hook callables, middleware continuations, and the named-hook catalog.

pub mod catalog;
pub mod continuation;
pub mod definitions;

pub use catalog::HookCatalog;
pub use continuation::{Done, Next};
pub use definitions::{Hook, HookArgs, HookId, HookKind, HookOutcome, IntoHookResult};
