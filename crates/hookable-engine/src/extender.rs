//! Extenders attach registration methods to a [`Hookable`](crate::Hookable).
//!
//! An extender receives a [`Registrar`] onto the hookable's store and returns
//! an extension value; the hookable derefs to that value, so whatever
//! methods it has become the hookable's registration API.
//!
//! - [`DefaultExtender`] → [`HookMethods`]: `hook`, `hooks` and `bind`.
//! - [`AliasExtender`] → [`AliasMethods`]: `on(alias, entry)` per configured alias.
//! - [`extender_fn`]: any closure over the registrar.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::Value;
use tracing::debug;

use hookable_core::{HookError, HookResult};

use crate::hooks::{HookArgs, HookCatalog};
use crate::stores::{HookMap, HookStore, HookType};

/// Shared handle onto a hookable's store.
pub struct Registrar<A, S> {
    store: Arc<RwLock<S>>,
    _args: PhantomData<fn(A)>,
}

impl<A: HookArgs, S: HookStore<A>> Registrar<A, S> {
    pub(crate) fn new(store: Arc<RwLock<S>>) -> Self {
        Self {
            store,
            _args: PhantomData,
        }
    }

    /// Adds one entry under `hook_type`.
    pub fn add(&self, hook_type: &str, entry: S::Entry) -> HookResult<()> {
        self.store.write().add(hook_type, entry)?;
        Ok(())
    }

    /// Adds a batch of entries.
    pub fn add_map(&self, map: HookMap<S::Entry>) -> HookResult<()> {
        self.store.write().add_map(map)?;
        Ok(())
    }

    /// Adds entries described by configuration bindings.
    pub fn add_bindings(&self, bindings: &Value, catalog: &HookCatalog<A>) -> HookResult<()> {
        self.store.write().add_bindings(bindings, catalog)?;
        Ok(())
    }

    /// Returns the number of entries under `hook_type`.
    pub fn count(&self, hook_type: &str) -> usize {
        self.store.read().count(hook_type)
    }

    /// Returns every hook type that has a bucket.
    pub fn hook_types(&self) -> Vec<HookType> {
        self.store.read().hook_types()
    }
}

impl<A, S> Clone for Registrar<A, S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            _args: PhantomData,
        }
    }
}

impl<A, S> fmt::Debug for Registrar<A, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registrar").finish_non_exhaustive()
    }
}

/// Builds the extension a hookable derefs to.
///
/// Extenders are cloned into every clone of a hookable and applied again to
/// the clone's own store.
pub trait Extender<A: HookArgs, S: HookStore<A>>: Clone + Send + Sync + 'static {
    /// The attached capability set.
    type Extension: Send + Sync + 'static;

    /// Builds the extension over `registrar`.
    fn extend(&self, registrar: Registrar<A, S>) -> Self::Extension;
}

/// Attaches [`HookMethods`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultExtender;

impl<A: HookArgs, S: HookStore<A>> Extender<A, S> for DefaultExtender {
    type Extension = HookMethods<A, S>;

    fn extend(&self, registrar: Registrar<A, S>) -> HookMethods<A, S> {
        HookMethods { registrar }
    }
}

/// Registration methods attached by [`DefaultExtender`].
pub struct HookMethods<A, S> {
    registrar: Registrar<A, S>,
}

impl<A: HookArgs, S: HookStore<A>> HookMethods<A, S> {
    /// Registers `entry` under `hook_type`.
    ///
    /// Chains stay on the extension; use
    /// [`Hookable::register`](crate::Hookable::register) to chain through to
    /// the function.
    pub fn hook(&self, hook_type: &str, entry: S::Entry) -> HookResult<&Self> {
        self.registrar.add(hook_type, entry)?;
        Ok(self)
    }

    /// Registers a batch of entries.
    pub fn hooks(&self, map: HookMap<S::Entry>) -> HookResult<&Self> {
        self.registrar.add_map(map)?;
        Ok(self)
    }

    /// Registers hooks named in `bindings`, resolved through `catalog`.
    pub fn bind(&self, bindings: &Value, catalog: &HookCatalog<A>) -> HookResult<&Self> {
        self.registrar.add_bindings(bindings, catalog)?;
        Ok(self)
    }
}

impl<A, S> fmt::Debug for HookMethods<A, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookMethods").finish_non_exhaustive()
    }
}

/// Which aliases an [`AliasExtender`] exposes and the hook types they target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeSpec {
    /// Each hook type is its own alias.
    List(Vec<HookType>),
    /// `alias -> hook type`, in declaration order.
    Aliases(Vec<(String, HookType)>),
}

impl TypeSpec {
    /// Builds a list spec.
    pub fn list<I, T>(hook_types: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self::List(hook_types.into_iter().map(Into::into).collect())
    }

    /// Builds an alias spec from `(alias, hook type)` pairs.
    pub fn aliases<I, K, T>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, T)>,
        K: Into<String>,
        T: Into<String>,
    {
        Self::Aliases(
            pairs
                .into_iter()
                .map(|(alias, hook_type)| (alias.into(), hook_type.into()))
                .collect(),
        )
    }

    /// Parses an array of hook types or a map of alias to hook type.
    pub fn from_value(value: &Value) -> HookResult<Self> {
        let invalid = || {
            HookError::invalid_type_spec(format!(
                "Extender expected an array or map of hook types, but received [{value}]"
            ))
        };

        match value {
            Value::Array(items) => items
                .iter()
                .map(|item| item.as_str().map(str::to_string).ok_or_else(invalid))
                .collect::<HookResult<Vec<_>>>()
                .map(Self::List),
            Value::Object(map) => map
                .iter()
                .map(|(alias, hook_type)| {
                    hook_type
                        .as_str()
                        .map(|hook_type| (alias.clone(), hook_type.to_string()))
                        .ok_or_else(invalid)
                })
                .collect::<HookResult<Vec<_>>>()
                .map(Self::Aliases),
            _ => Err(invalid()),
        }
    }

    /// Returns the hook type behind `alias`.
    pub fn resolve(&self, alias: &str) -> Option<&str> {
        match self {
            Self::List(hook_types) => hook_types
                .iter()
                .find(|hook_type| *hook_type == alias)
                .map(String::as_str),
            Self::Aliases(pairs) => pairs
                .iter()
                .find(|(name, _)| name == alias)
                .map(|(_, hook_type)| hook_type.as_str()),
        }
    }

    /// Returns every alias, in declaration order.
    pub fn alias_names(&self) -> Vec<&str> {
        match self {
            Self::List(hook_types) => hook_types.iter().map(String::as_str).collect(),
            Self::Aliases(pairs) => pairs.iter().map(|(alias, _)| alias.as_str()).collect(),
        }
    }
}

/// Attaches [`AliasMethods`] for a fixed set of aliases.
#[derive(Debug, Clone)]
pub struct AliasExtender {
    spec: Arc<TypeSpec>,
}

impl AliasExtender {
    /// Parses the alias set from a configuration value.
    pub fn from_value(value: &Value) -> HookResult<Self> {
        TypeSpec::from_value(value).map(create_extender)
    }

    /// Returns the alias set.
    pub fn type_spec(&self) -> &TypeSpec {
        &self.spec
    }
}

/// Builds an extender exposing one registration entry point per alias.
pub fn create_extender(spec: TypeSpec) -> AliasExtender {
    debug!(aliases = ?spec.alias_names(), "Alias extender created");
    AliasExtender {
        spec: Arc::new(spec),
    }
}

impl<A: HookArgs, S: HookStore<A>> Extender<A, S> for AliasExtender {
    type Extension = AliasMethods<A, S>;

    fn extend(&self, registrar: Registrar<A, S>) -> AliasMethods<A, S> {
        AliasMethods {
            registrar,
            spec: Arc::clone(&self.spec),
        }
    }
}

/// Registration methods attached by [`AliasExtender`].
pub struct AliasMethods<A, S> {
    registrar: Registrar<A, S>,
    spec: Arc<TypeSpec>,
}

impl<A: HookArgs, S: HookStore<A>> AliasMethods<A, S> {
    /// Registers `entry` under the hook type `alias` stands for.
    pub fn on(&self, alias: &str, entry: S::Entry) -> HookResult<&Self> {
        let hook_type = self.spec.resolve(alias).ok_or_else(|| {
            HookError::unknown_alias(format!(
                "Unknown hook alias [{alias}], expected one of [{}]",
                self.spec.alias_names().join(", ")
            ))
        })?;
        self.registrar.add(hook_type, entry)?;
        Ok(self)
    }

    /// Returns every alias, in declaration order.
    pub fn aliases(&self) -> Vec<&str> {
        self.spec.alias_names()
    }
}

impl<A, S> fmt::Debug for AliasMethods<A, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AliasMethods")
            .field("spec", &self.spec)
            .finish_non_exhaustive()
    }
}

/// Extender built from a closure.
pub struct FnExtender<F> {
    f: Arc<F>,
}

/// Turns `f` into an extender; its return value becomes the extension.
pub fn extender_fn<F>(f: F) -> FnExtender<F> {
    FnExtender { f: Arc::new(f) }
}

impl<A, S, F, X> Extender<A, S> for FnExtender<F>
where
    A: HookArgs,
    S: HookStore<A>,
    F: Fn(Registrar<A, S>) -> X + Send + Sync + 'static,
    X: Send + Sync + 'static,
{
    type Extension = X;

    fn extend(&self, registrar: Registrar<A, S>) -> X {
        (self.f)(registrar)
    }
}

impl<F> Clone for FnExtender<F> {
    fn clone(&self) -> Self {
        Self {
            f: Arc::clone(&self.f),
        }
    }
}

impl<F> fmt::Debug for FnExtender<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnExtender").finish_non_exhaustive()
    }
}
