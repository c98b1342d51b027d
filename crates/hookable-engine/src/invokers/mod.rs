//! Invokers: strategies that run a list of hooks against call arguments.
//!
//! Four builtins are provided:
//!
//! - [`Synchronous`]: one after another, never suspends.
//! - [`Parallel`]: all at once, joined; the first failure surfaces.
//! - [`Sequence`]: one after another, awaiting each.
//! - [`Middleware`]: continuation-driven chain.
//!
//! `Synchronous` and `Sequence` stop silently on [`HookOutcome::Break`] and
//! abort on the first failure.

pub mod middleware;
pub mod parallel;
pub mod registry;
pub mod sequence;
pub mod synchronous;

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::{BoxFuture, FutureExt};
use serde_json::Value;
use tracing::debug;

use hookable_core::{HookError, HookResult};

use crate::hooks::{Hook, HookArgs, HookKind, HookOutcome};

pub use middleware::Middleware;
pub use parallel::Parallel;
pub use registry::InvokerRegistry;
pub use sequence::Sequence;
pub use synchronous::Synchronous;

/// Registered name of [`Synchronous`].
pub const SYNCHRONOUS: &str = "synchronous";
/// Registered name of [`Parallel`].
pub const PARALLEL: &str = "parallel";
/// Registered name of [`Sequence`].
pub const SEQUENCE: &str = "sequence";
/// Registered name of [`Middleware`].
pub const MIDDLEWARE: &str = "middleware";

/// Receives the terminal result of a middleware chain.
pub type Completion = Box<dyn FnOnce(HookResult<Option<Value>>) + Send + 'static>;

/// A strategy for running hooks.
#[async_trait]
pub trait Invoker<A>: Send + Sync + 'static {
    /// Name used in logs and for registry lookup.
    fn name(&self) -> &str;

    /// Runs `hooks` in registration order against `args`.
    async fn invoke(
        &self,
        hooks: Vec<Hook<A>>,
        args: A,
        options: InvokeOptions,
    ) -> HookResult<InvokeOutcome>;
}

/// Per-call invoker settings.
#[derive(Default)]
pub struct InvokeOptions {
    /// Caps how many hooks the parallel invoker runs at once.
    pub limit: Option<usize>,
    /// Receives the middleware chain's terminal result.
    pub completion: Option<Completion>,
}

impl InvokeOptions {
    /// Creates empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the parallel concurrency limit.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Sets the middleware completion callback.
    pub fn on_complete<F>(mut self, completion: F) -> Self
    where
        F: FnOnce(HookResult<Option<Value>>) + Send + 'static,
    {
        self.completion = Some(Box::new(completion));
        self
    }
}

impl fmt::Debug for InvokeOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InvokeOptions")
            .field("limit", &self.limit)
            .field("completion", &self.completion.is_some())
            .finish()
    }
}

/// What an invoker reports once it returns.
#[derive(Debug, Clone)]
pub enum InvokeOutcome {
    /// A synchronous or sequence chain ran.
    Finished {
        /// Hooks that ran, including the one that broke the chain.
        executed: usize,
        /// Whether a hook returned `Break`.
        broken: bool,
        /// Values reported through `ContinueWith`, in order.
        values: Vec<Value>,
    },
    /// Every parallel hook finished; outcomes in input order.
    Joined(Vec<HookOutcome>),
    /// A middleware chain ended without a completion callback.
    Completed(HookResult<Option<Value>>),
    /// A middleware chain ended and its completion callback was called.
    Delivered,
}

impl InvokeOutcome {
    /// Returns `true` if a sequential chain stopped on `Break`.
    pub fn is_broken(&self) -> bool {
        matches!(self, Self::Finished { broken: true, .. })
    }

    /// Returns the values hooks reported, in order.
    pub fn values(&self) -> Vec<&Value> {
        match self {
            Self::Finished { values, .. } => values.iter().collect(),
            Self::Joined(outcomes) => outcomes.iter().filter_map(HookOutcome::value).collect(),
            Self::Completed(Ok(Some(value))) => vec![value],
            Self::Completed(_) | Self::Delivered => Vec::new(),
        }
    }
}

/// Selects the invoker for one call.
pub enum InvokerSpec<A> {
    /// Looked up by name in the [`InvokerRegistry`].
    Named(String),
    /// Used as given.
    Direct(Arc<dyn Invoker<A>>),
}

impl<A: HookArgs> InvokerSpec<A> {
    /// Refers to a registered invoker.
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    /// Wraps an invoker instance.
    pub fn direct(invoker: impl Invoker<A>) -> Self {
        Self::Direct(Arc::new(invoker))
    }
}

impl<A> From<&str> for InvokerSpec<A> {
    fn from(name: &str) -> Self {
        Self::Named(name.to_string())
    }
}

impl<A> From<String> for InvokerSpec<A> {
    fn from(name: String) -> Self {
        Self::Named(name)
    }
}

impl<A> From<Arc<dyn Invoker<A>>> for InvokerSpec<A> {
    fn from(invoker: Arc<dyn Invoker<A>>) -> Self {
        Self::Direct(invoker)
    }
}

impl<A> Default for InvokerSpec<A> {
    fn default() -> Self {
        Self::Named(SYNCHRONOUS.to_string())
    }
}

impl<A> Clone for InvokerSpec<A> {
    fn clone(&self) -> Self {
        match self {
            Self::Named(name) => Self::Named(name.clone()),
            Self::Direct(invoker) => Self::Direct(Arc::clone(invoker)),
        }
    }
}

impl<A> fmt::Debug for InvokerSpec<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) => f.debug_tuple("Named").field(name).finish(),
            Self::Direct(_) => f.debug_tuple("Direct").finish_non_exhaustive(),
        }
    }
}

type InvokeFn<A> = dyn Fn(Vec<Hook<A>>, A, InvokeOptions) -> BoxFuture<'static, HookResult<InvokeOutcome>>
    + Send
    + Sync;

/// Invoker built from a closure.
pub struct FnInvoker<A> {
    name: String,
    f: Arc<InvokeFn<A>>,
}

impl<A> Clone for FnInvoker<A> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            f: Arc::clone(&self.f),
        }
    }
}

impl<A> fmt::Debug for FnInvoker<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnInvoker").field("name", &self.name).finish()
    }
}

#[async_trait]
impl<A: HookArgs> Invoker<A> for FnInvoker<A> {
    fn name(&self) -> &str {
        &self.name
    }

    async fn invoke(
        &self,
        hooks: Vec<Hook<A>>,
        args: A,
        options: InvokeOptions,
    ) -> HookResult<InvokeOutcome> {
        (self.f)(hooks, args, options).await
    }
}

/// Builds a custom invoker from a closure.
pub fn invoker_fn<A, F, Fut>(name: impl Into<String>, f: F) -> FnInvoker<A>
where
    A: HookArgs,
    F: Fn(Vec<Hook<A>>, A, InvokeOptions) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HookResult<InvokeOutcome>> + Send + 'static,
{
    let callable: Arc<InvokeFn<A>> =
        Arc::new(move |hooks: Vec<Hook<A>>, args: A, options: InvokeOptions| {
            f(hooks, args, options).boxed()
        });
    FnInvoker {
        name: name.into(),
        f: callable,
    }
}

/// Fails up front if any hook has a shape the invoker cannot run.
pub(crate) fn ensure_kinds<A>(
    invoker: &str,
    hooks: &[Hook<A>],
    accepted: &[HookKind],
) -> HookResult<()> {
    for (position, hook) in hooks.iter().enumerate() {
        let kind = hook.kind();
        if !accepted.contains(&kind) {
            return Err(HookError::incompatible_hook(format!(
                "Invoker [{invoker}] cannot run the {kind} hook at position {position}"
            )));
        }
    }
    Ok(())
}

/// Running totals of a sequential chain.
#[derive(Debug, Default)]
pub(crate) struct Tally {
    executed: usize,
    values: Vec<Value>,
}

impl Tally {
    /// Records one hook's outcome. Returns `false` once the chain must stop.
    pub(crate) fn record(&mut self, invoker: &str, outcome: HookOutcome) -> bool {
        self.executed += 1;
        match outcome {
            HookOutcome::Continue => true,
            HookOutcome::ContinueWith(value) => {
                self.values.push(value);
                true
            }
            HookOutcome::Break => {
                debug!(invoker = %invoker, position = self.executed - 1, "Hook chain broken");
                false
            }
        }
    }

    pub(crate) fn finish(self, broken: bool) -> InvokeOutcome {
        InvokeOutcome::Finished {
            executed: self.executed,
            broken,
            values: self.values,
        }
    }
}
