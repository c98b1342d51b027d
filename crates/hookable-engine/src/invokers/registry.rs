//! Named invoker lookup.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use hookable_core::{HookError, HookResult};

use super::{Invoker, InvokerSpec, Middleware, Parallel, Sequence, Synchronous};
use crate::hooks::HookArgs;

/// Invokers addressable by name.
///
/// Preloaded with `synchronous`, `parallel`, `sequence` and `middleware`.
/// Registering under an existing name replaces that invoker.
pub struct InvokerRegistry<A> {
    invokers: HashMap<String, Arc<dyn Invoker<A>>>,
}

impl<A: HookArgs> InvokerRegistry<A> {
    /// Creates a registry holding the four builtins.
    pub fn new() -> Self {
        Self::empty()
            .with(Synchronous)
            .with(Parallel::new())
            .with(Sequence)
            .with(Middleware)
    }

    /// Creates a registry with no invokers.
    pub fn empty() -> Self {
        Self {
            invokers: HashMap::new(),
        }
    }

    /// Adds `invoker` under its own name.
    pub fn register(&mut self, invoker: Arc<dyn Invoker<A>>) -> &mut Self {
        let name = invoker.name().to_string();
        debug!(invoker = %name, "Invoker registered");
        self.invokers.insert(name, invoker);
        self
    }

    /// Builder form of [`register`](Self::register).
    pub fn with(mut self, invoker: impl Invoker<A>) -> Self {
        self.register(Arc::new(invoker));
        self
    }

    /// Returns the invoker registered under `name`.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Invoker<A>>> {
        self.invokers.get(name).cloned()
    }

    /// Resolves a spec to an invoker.
    pub fn resolve(&self, spec: &InvokerSpec<A>) -> HookResult<Arc<dyn Invoker<A>>> {
        match spec {
            InvokerSpec::Direct(invoker) => Ok(Arc::clone(invoker)),
            InvokerSpec::Named(name) => self
                .get(name)
                .ok_or_else(|| HookError::unknown_invoker(format!("Invalid invoker [{name}]"))),
        }
    }

    /// Returns every registered name, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.invokers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl<A: HookArgs> Default for InvokerRegistry<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> Clone for InvokerRegistry<A> {
    fn clone(&self) -> Self {
        Self {
            invokers: self.invokers.clone(),
        }
    }
}

impl<A> fmt::Debug for InvokerRegistry<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.invokers.keys().collect();
        names.sort_unstable();
        f.debug_struct("InvokerRegistry")
            .field("names", &names)
            .finish()
    }
}
