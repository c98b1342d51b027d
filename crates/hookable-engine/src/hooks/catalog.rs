//! Named hooks that configuration bindings refer to.

use std::collections::HashMap;
use std::fmt;

use hookable_core::{HookError, HookResult};

use super::definitions::{Hook, HookArgs};

/// Registry of hooks by name.
///
/// Resolving the same name twice yields clones of one hook, so binding a
/// name twice under one hook type still registers a single entry.
pub struct HookCatalog<A> {
    hooks: HashMap<String, Hook<A>>,
}

impl<A: HookArgs> HookCatalog<A> {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self {
            hooks: HashMap::new(),
        }
    }

    /// Adds or replaces a named hook.
    pub fn register(&mut self, name: impl Into<String>, hook: Hook<A>) -> &mut Self {
        self.hooks.insert(name.into(), hook);
        self
    }

    /// Builder form of [`register`](Self::register).
    pub fn with(mut self, name: impl Into<String>, hook: Hook<A>) -> Self {
        self.register(name, hook);
        self
    }

    /// Returns the hook registered under `name`.
    pub fn get(&self, name: &str) -> Option<&Hook<A>> {
        self.hooks.get(name)
    }

    /// Returns the hook registered under `name`, or an `UnknownHook` error.
    pub fn resolve(&self, name: &str) -> HookResult<Hook<A>> {
        self.hooks
            .get(name)
            .cloned()
            .ok_or_else(|| HookError::unknown_hook(format!("No hook named [{name}] in catalog")))
    }

    /// Returns all names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.hooks.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Returns the number of named hooks.
    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    /// Returns `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }
}

impl<A: HookArgs> Default for HookCatalog<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> Clone for HookCatalog<A> {
    fn clone(&self) -> Self {
        Self {
            hooks: self.hooks.clone(),
        }
    }
}

impl<A> fmt::Debug for HookCatalog<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookCatalog")
            .field("names", &self.hooks.keys().collect::<Vec<_>>())
            .finish()
    }
}
