//! Prelude for convenient imports.

pub use async_trait::async_trait;

pub use hookable_core::{ErrorKind, HookError, HookResult};

pub use crate::extender::{
    AliasExtender, AliasMethods, DefaultExtender, Extender, HookMethods, Registrar, TypeSpec,
    create_extender, extender_fn,
};
pub use crate::hookable::{Hookable, HookableOptions, Invoke};
pub use crate::hooks::{Done, Hook, HookArgs, HookCatalog, HookOutcome, Next};
pub use crate::invokers::{
    InvokeOptions, InvokeOutcome, Invoker, InvokerSpec, Middleware, Parallel, Sequence,
    Synchronous, invoker_fn,
};
pub use crate::stores::{
    FunctionHookStore, HookMap, HookQuery, HookStore, ObjectHook, ObjectHookStore, Selection,
};

pub use crate::hook_map;
