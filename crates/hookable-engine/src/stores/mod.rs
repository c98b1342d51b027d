//! Hook stores: ordered, deduplicated buckets of hooks per hook type.
//!
//! Two variants implement [`HookStore`]:
//!
//! - [`FunctionHookStore`]: plain hooks, deduplicated by identity.
//! - [`ObjectHookStore`]: hooks annotated with a code, deduplicated by code
//!   and retrievable selectively with a [`HookQuery`].
//!
//! Insertion order is execution order. `Clone` yields a store whose bucket
//! vectors are independent while the hooks themselves are shared.

pub mod function;
pub mod object;

use serde_json::{Map, Value};

use hookable_core::{HookError, HookResult};

use crate::hooks::{Hook, HookArgs, HookCatalog};

pub use function::FunctionHookStore;
pub use object::{HookQuery, ObjectHook, ObjectHookStore, Selection};

/// Name of a bucket, e.g. `"before"`.
pub type HookType = String;

/// Storage contract shared by both store variants.
///
/// Concurrent registration must be serialized by the owner; the hookable
/// wrapper does this with a lock around the store.
pub trait HookStore<A: HookArgs>: Clone + Send + Sync + 'static {
    /// What one registration adds.
    type Entry: Send + Sync + 'static;
    /// What one lookup asks for.
    type Query: std::fmt::Debug + Send + Sync + 'static;

    /// Appends `entry` unless an entry with the same identity is already in
    /// the bucket. Duplicates are a no-op.
    fn add(&mut self, hook_type: &str, entry: Self::Entry) -> HookResult<&mut Self>;

    /// Adds every entry of `map` through [`add`](Self::add).
    fn add_map(&mut self, map: HookMap<Self::Entry>) -> HookResult<&mut Self> {
        for (hook_type, entries) in map {
            for entry in entries {
                self.add(&hook_type, entry)?;
            }
        }
        Ok(self)
    }

    /// Adds hooks described by an untyped `hook type -> binding` map,
    /// resolving hook names through `catalog`.
    fn add_bindings(&mut self, bindings: &Value, catalog: &HookCatalog<A>)
    -> HookResult<&mut Self>;

    /// Returns the hooks matching `query` in registration order, or `None`
    /// when nothing matches.
    fn get(&self, query: &Self::Query) -> Option<Vec<Hook<A>>>;

    /// Returns every hook type that has a bucket.
    fn hook_types(&self) -> Vec<HookType>;

    /// Returns the number of entries registered under `hook_type`.
    fn count(&self, hook_type: &str) -> usize;
}

/// Typed batch of registrations, in insertion order.
///
/// Built with [`hook_map!`](crate::hook_map) or the builder methods.
#[derive(Debug)]
pub struct HookMap<E> {
    entries: Vec<(HookType, Vec<E>)>,
}

impl<E> HookMap<E> {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Adds a single entry under `hook_type`.
    pub fn insert_one(&mut self, hook_type: impl Into<String>, entry: E) -> &mut Self {
        self.insert_many(hook_type, vec![entry])
    }

    /// Adds a sequence of entries under `hook_type`.
    pub fn insert_many(&mut self, hook_type: impl Into<String>, entries: Vec<E>) -> &mut Self {
        let hook_type = hook_type.into();
        match self.entries.iter_mut().find(|(t, _)| *t == hook_type) {
            Some((_, bucket)) => bucket.extend(entries),
            None => self.entries.push((hook_type, entries)),
        }
        self
    }

    /// Builder form of [`insert_one`](Self::insert_one).
    pub fn one(mut self, hook_type: impl Into<String>, entry: E) -> Self {
        self.insert_one(hook_type, entry);
        self
    }

    /// Builder form of [`insert_many`](Self::insert_many).
    pub fn many(mut self, hook_type: impl Into<String>, entries: Vec<E>) -> Self {
        self.insert_many(hook_type, entries);
        self
    }

    /// Returns the number of hook types in the map.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the map holds no hook type.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<E> Default for HookMap<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> IntoIterator for HookMap<E> {
    type Item = (HookType, Vec<E>);
    type IntoIter = std::vec::IntoIter<(HookType, Vec<E>)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Checks that bindings are a map of hook types.
pub(crate) fn bindings_map(bindings: &Value) -> HookResult<&Map<String, Value>> {
    bindings.as_object().ok_or_else(|| {
        HookError::invalid_hook_shape(format!(
            "Hook bindings expected a map of hook types, but received [{bindings}]"
        ))
    })
}
