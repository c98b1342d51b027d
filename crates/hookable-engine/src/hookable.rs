//! The hookable wrapper: a function built by a factory that receives an
//! [`Invoke`] handle, plus the registration methods an extender attached.
//!
//! ```rust,ignore
//! let generate = Hookable::new(|invoke: Invoke<Row>| {
//!     move |row: Row| {
//!         invoke.invoke_blocking("before", &row)?;
//!         Ok::<_, HookError>(row)
//!     }
//! });
//!
//! generate.hook("before", Hook::blocking(|row: &Row| tag(row)))?;
//! (generate.func())(row)?;
//! ```

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard};
use tracing::debug;

use hookable_core::config::InvocationConfig;
use hookable_core::{HookError, HookResult};

use crate::extender::{DefaultExtender, Extender, Registrar};
use crate::hooks::{Hook, HookArgs};
use crate::invokers::{
    InvokeOptions, InvokeOutcome, Invoker, InvokerRegistry, InvokerSpec, Parallel, Synchronous,
};
use crate::stores::{FunctionHookStore, HookStore};

/// Invocation callback handed to the factory.
///
/// Looks hooks up in the hookable's store and runs them through the selected
/// invoker. Returns `Ok(None)` when nothing is registered for the query, in
/// which case no invoker runs.
pub struct Invoke<A, S = FunctionHookStore<A>> {
    store: Arc<RwLock<S>>,
    invokers: Arc<InvokerRegistry<A>>,
}

impl<A: HookArgs, S: HookStore<A>> Invoke<A, S> {
    /// Runs the hooks matching `query` with default options.
    pub async fn invoke(
        &self,
        query: impl Into<S::Query>,
        args: A,
        invoker: impl Into<InvokerSpec<A>>,
    ) -> HookResult<Option<InvokeOutcome>> {
        self.invoke_with(query, args, invoker, InvokeOptions::new())
            .await
    }

    /// Runs the hooks matching `query` with explicit invoker options.
    pub async fn invoke_with(
        &self,
        query: impl Into<S::Query>,
        args: A,
        invoker: impl Into<InvokerSpec<A>>,
        options: InvokeOptions,
    ) -> HookResult<Option<InvokeOutcome>> {
        let invoker = self.invokers.resolve(&invoker.into())?;
        let query = query.into();

        let Some(hooks) = self.snapshot(&query) else {
            debug!(query = ?query, invoker = invoker.name(), "No hooks registered");
            return Ok(None);
        };

        debug!(
            query = ?query,
            invoker = invoker.name(),
            handler_count = hooks.len(),
            "Dispatching hooks"
        );
        invoker.invoke(hooks, args, options).await.map(Some)
    }

    /// Runs the hooks matching `query` synchronously, without suspending.
    ///
    /// Only blocking hooks are accepted.
    pub fn invoke_blocking(
        &self,
        query: impl Into<S::Query>,
        args: &A,
    ) -> HookResult<Option<InvokeOutcome>> {
        let query = query.into();
        let Some(hooks) = self.snapshot(&query) else {
            debug!(query = ?query, "No hooks registered");
            return Ok(None);
        };

        debug!(
            query = ?query,
            invoker = crate::invokers::SYNCHRONOUS,
            handler_count = hooks.len(),
            "Dispatching hooks"
        );
        Synchronous::run(&hooks, args).map(Some)
    }

    fn snapshot(&self, query: &S::Query) -> Option<Vec<Hook<A>>> {
        let store = self.store.read();
        store.get(query)
    }
}

impl<A, S> Clone for Invoke<A, S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            invokers: Arc::clone(&self.invokers),
        }
    }
}

impl<A, S> fmt::Debug for Invoke<A, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Invoke")
            .field("invokers", &self.invokers)
            .finish_non_exhaustive()
    }
}

/// Construction settings for a [`Hookable`].
pub struct HookableOptions<A, S = FunctionHookStore<A>, E = DefaultExtender> {
    store: S,
    extender: E,
    cloneable: bool,
    expose_invoke: bool,
    invokers: InvokerRegistry<A>,
}

impl<A: HookArgs> HookableOptions<A> {
    /// Plain store, default extender, cloning on, invoke handle hidden.
    pub fn new() -> Self {
        Self {
            store: FunctionHookStore::new(),
            extender: DefaultExtender,
            cloneable: true,
            expose_invoke: false,
            invokers: InvokerRegistry::new(),
        }
    }
}

impl<A: HookArgs> Default for HookableOptions<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: HookArgs, S: HookStore<A>, E> HookableOptions<A, S, E> {
    /// Adopts `store`, which also selects the store variant.
    pub fn hook_store<T: HookStore<A>>(self, store: T) -> HookableOptions<A, T, E> {
        HookableOptions {
            store,
            extender: self.extender,
            cloneable: self.cloneable,
            expose_invoke: self.expose_invoke,
            invokers: self.invokers,
        }
    }

    /// Applies `extender` instead of the default one.
    pub fn extender<X: Extender<A, S>>(self, extender: X) -> HookableOptions<A, S, X> {
        HookableOptions {
            store: self.store,
            extender,
            cloneable: self.cloneable,
            expose_invoke: self.expose_invoke,
            invokers: self.invokers,
        }
    }

    /// Enables or disables [`Hookable::try_clone`].
    pub fn cloneable(mut self, enabled: bool) -> Self {
        self.cloneable = enabled;
        self
    }

    /// Exposes the invoke handle through [`Hookable::invoke_handle`].
    pub fn expose_invoke(mut self, enabled: bool) -> Self {
        self.expose_invoke = enabled;
        self
    }

    /// Makes `invoker` resolvable by its name.
    pub fn invoker(mut self, invoker: impl Invoker<A>) -> Self {
        self.invokers.register(Arc::new(invoker));
        self
    }

    /// Default concurrency cap for the `parallel` invoker.
    pub fn parallel_limit(self, limit: usize) -> Self {
        self.invoker(Parallel::with_limit(limit))
    }

    /// Reads the invocation settings from configuration.
    pub fn apply_config(self, config: &InvocationConfig) -> Self {
        let options = self
            .cloneable(config.clone)
            .expose_invoke(config.expose_invoke);
        match config.parallel_limit {
            Some(limit) => options.parallel_limit(limit),
            None => options,
        }
    }
}

impl<A, S, E: fmt::Debug> fmt::Debug for HookableOptions<A, S, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookableOptions")
            .field("extender", &self.extender)
            .field("cloneable", &self.cloneable)
            .field("expose_invoke", &self.expose_invoke)
            .field("invokers", &self.invokers)
            .finish_non_exhaustive()
    }
}

type Factory<A, S, F> = dyn Fn(Invoke<A, S>) -> F + Send + Sync;

/// A function with hook points.
///
/// Derefs to the extension its extender attached, so registration reads
/// `hookable.hook("before", entry)?` with the default extender.
pub struct Hookable<F, A, S = FunctionHookStore<A>, E = DefaultExtender>
where
    A: HookArgs,
    S: HookStore<A>,
    E: Extender<A, S>,
{
    func: F,
    extension: E::Extension,
    invoke: Invoke<A, S>,
    factory: Arc<Factory<A, S, F>>,
    extender: E,
    cloneable: bool,
    expose_invoke: bool,
}

impl<F, A: HookArgs> Hookable<F, A> {
    /// Wraps the function `factory` builds, with default options.
    pub fn new<G>(factory: G) -> Self
    where
        G: Fn(Invoke<A>) -> F + Send + Sync + 'static,
    {
        Self::with_options(factory, HookableOptions::new())
    }
}

impl<F, A, S, E> Hookable<F, A, S, E>
where
    A: HookArgs,
    S: HookStore<A>,
    E: Extender<A, S>,
{
    /// Wraps the function `factory` builds, with explicit options.
    pub fn with_options<G>(factory: G, options: HookableOptions<A, S, E>) -> Self
    where
        G: Fn(Invoke<A, S>) -> F + Send + Sync + 'static,
    {
        let HookableOptions {
            store,
            extender,
            cloneable,
            expose_invoke,
            invokers,
        } = options;

        Self::build(
            Arc::new(factory),
            store,
            extender,
            cloneable,
            expose_invoke,
            Arc::new(invokers),
        )
    }

    fn build(
        factory: Arc<Factory<A, S, F>>,
        store: S,
        extender: E,
        cloneable: bool,
        expose_invoke: bool,
        invokers: Arc<InvokerRegistry<A>>,
    ) -> Self {
        let store = Arc::new(RwLock::new(store));
        let invoke = Invoke {
            store: Arc::clone(&store),
            invokers,
        };

        let func = factory(invoke.clone());
        let extension = extender.extend(Registrar::new(store));
        debug!(cloneable, expose_invoke, "Hookable created");

        Self {
            func,
            extension,
            invoke,
            factory,
            extender,
            cloneable,
            expose_invoke,
        }
    }

    /// Returns the wrapped function.
    pub fn func(&self) -> &F {
        &self.func
    }

    /// Returns the invoke handle, when the hookable was built to expose it.
    pub fn invoke_handle(&self) -> Option<&Invoke<A, S>> {
        self.expose_invoke.then_some(&self.invoke)
    }

    /// Returns the extension the extender attached.
    pub fn extension(&self) -> &E::Extension {
        &self.extension
    }

    /// Read access to the hook store.
    pub fn hook_store(&self) -> RwLockReadGuard<'_, S> {
        self.invoke.store.read()
    }

    /// Registers `entry` under `hook_type` and returns the hookable, so a
    /// chain can end in [`func`](Self::func). Works with any extender.
    pub fn register(&self, hook_type: &str, entry: S::Entry) -> HookResult<&Self> {
        self.invoke.store.write().add(hook_type, entry)?;
        Ok(self)
    }

    /// Builds an independent hookable: same factory and options, a copy of
    /// the store. The factory runs again for the copy.
    pub fn try_clone(&self) -> HookResult<Self> {
        if !self.cloneable {
            return Err(HookError::clone_disabled(
                "Cloning was disabled when this hookable was created",
            ));
        }

        let store = self.invoke.store.read().clone();
        debug!(hook_types = ?store.hook_types(), "Cloning hookable");
        Ok(Self::build(
            Arc::clone(&self.factory),
            store,
            self.extender.clone(),
            self.cloneable,
            self.expose_invoke,
            Arc::clone(&self.invoke.invokers),
        ))
    }
}

impl<F, A, S, E> Deref for Hookable<F, A, S, E>
where
    A: HookArgs,
    S: HookStore<A>,
    E: Extender<A, S>,
{
    type Target = E::Extension;

    fn deref(&self) -> &Self::Target {
        &self.extension
    }
}

impl<F, A, S, E> fmt::Debug for Hookable<F, A, S, E>
where
    A: HookArgs,
    S: HookStore<A> + fmt::Debug,
    E: Extender<A, S> + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hookable")
            .field("store", &*self.invoke.store.read())
            .field("extender", &self.extender)
            .field("cloneable", &self.cloneable)
            .field("expose_invoke", &self.expose_invoke)
            .finish_non_exhaustive()
    }
}
