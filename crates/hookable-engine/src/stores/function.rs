//! Store for plain hooks, deduplicated by identity.

use std::collections::HashMap;
use std::fmt;

use serde_json::Value;
use tracing::debug;

use hookable_core::{HookError, HookResult};

use super::{HookMap, HookStore, HookType, bindings_map};
use crate::hooks::{Hook, HookArgs, HookCatalog};

/// Hook type → ordered hooks.
pub struct FunctionHookStore<A> {
    hooks: HashMap<HookType, Vec<Hook<A>>>,
}

impl<A: HookArgs> FunctionHookStore<A> {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            hooks: HashMap::new(),
        }
    }

    /// Creates a store pre-populated from `map`, deduplicating as it goes.
    pub fn from_map(map: HookMap<Hook<A>>) -> Self {
        let mut store = Self::new();
        for (hook_type, hooks) in map {
            for hook in hooks {
                store.insert(&hook_type, hook);
            }
        }
        store
    }

    fn insert(&mut self, hook_type: &str, hook: Hook<A>) {
        let bucket = self.hooks.entry(hook_type.to_string()).or_default();

        if bucket.iter().any(|existing| existing.same_as(&hook)) {
            debug!(hook_type = %hook_type, "Hook already registered, skipping");
            return;
        }

        debug!(
            hook_type = %hook_type,
            kind = %hook.kind(),
            position = bucket.len(),
            "Hook registered"
        );
        bucket.push(hook);
    }
}

impl<A: HookArgs> HookStore<A> for FunctionHookStore<A> {
    type Entry = Hook<A>;
    type Query = HookType;

    fn add(&mut self, hook_type: &str, entry: Hook<A>) -> HookResult<&mut Self> {
        self.insert(hook_type, entry);
        Ok(self)
    }

    fn add_bindings(
        &mut self,
        bindings: &Value,
        catalog: &HookCatalog<A>,
    ) -> HookResult<&mut Self> {
        for (hook_type, value) in bindings_map(bindings)? {
            let names: Vec<&str> = match value {
                Value::String(name) => vec![name.as_str()],
                Value::Array(items) => items
                    .iter()
                    .map(|item| item.as_str().ok_or_else(|| shape_error(hook_type, value)))
                    .collect::<HookResult<_>>()?,
                other => return Err(shape_error(hook_type, other)),
            };

            for name in names {
                let hook = catalog.resolve(name)?;
                self.insert(hook_type, hook);
            }
        }
        Ok(self)
    }

    fn get(&self, query: &HookType) -> Option<Vec<Hook<A>>> {
        self.hooks.get(query).cloned()
    }

    fn hook_types(&self) -> Vec<HookType> {
        self.hooks.keys().cloned().collect()
    }

    fn count(&self, hook_type: &str) -> usize {
        self.hooks.get(hook_type).map(Vec::len).unwrap_or(0)
    }
}

fn shape_error(hook_type: &str, value: &Value) -> HookError {
    HookError::invalid_hook_shape(format!(
        "Hook of type [{hook_type}] expected a hook name or array of names, but received [{value}]"
    ))
}

impl<A: HookArgs> Default for FunctionHookStore<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> Clone for FunctionHookStore<A> {
    fn clone(&self) -> Self {
        Self {
            hooks: self
                .hooks
                .iter()
                .map(|(hook_type, bucket)| (hook_type.clone(), bucket.clone()))
                .collect(),
        }
    }
}

impl<A> fmt::Debug for FunctionHookStore<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let counts: HashMap<&str, usize> = self
            .hooks
            .iter()
            .map(|(hook_type, bucket)| (hook_type.as_str(), bucket.len()))
            .collect();
        f.debug_struct("FunctionHookStore")
            .field("hooks", &counts)
            .finish()
    }
}
