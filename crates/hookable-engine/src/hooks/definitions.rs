//! Hook callables and the outcomes they report.
//!
//! A hook comes in one of three shapes:
//!
//! - `Blocking`: runs to completion without suspending.
//! - `Future`: returns a future the invoker awaits.
//! - `Middleware`: receives [`Next`] and [`Done`] continuations and decides
//!   how the chain proceeds.
//!
//! Cloning a [`Hook`] shares the callable, and the shared allocation is the
//! hook's identity: registering a clone of an already registered hook is a
//! no-op.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use hookable_core::{HookError, HookResult};

use super::continuation::{Done, Next};

/// Bound satisfied by every call-argument type.
///
/// Arguments are cloned once per hook, so shared state is usually wrapped
/// in an `Arc`.
pub trait HookArgs: Clone + Send + Sync + 'static {}

impl<T> HookArgs for T where T: Clone + Send + Sync + 'static {}

/// What a hook tells the invoker after it ran.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", content = "value", rename_all = "snake_case")]
pub enum HookOutcome {
    /// Proceed with the next hook.
    Continue,
    /// Proceed, reporting a value to the invoker.
    ContinueWith(Value),
    /// Stop the chain silently. Not a failure.
    Break,
}

impl HookOutcome {
    /// Serializes `value` into a `ContinueWith` outcome.
    pub fn continue_with(value: impl Serialize) -> HookResult<Self> {
        Ok(Self::ContinueWith(serde_json::to_value(value)?))
    }

    /// Returns `true` for `Break`.
    pub fn is_break(&self) -> bool {
        matches!(self, Self::Break)
    }

    /// Returns the reported value, if any.
    pub fn value(&self) -> Option<&Value> {
        match self {
            Self::ContinueWith(value) => Some(value),
            _ => None,
        }
    }
}

/// Conversion from whatever a hook closure returns into a hook result.
///
/// Lets plain closures return `()` and still read as `Continue`.
pub trait IntoHookResult {
    /// Performs the conversion.
    fn into_hook_result(self) -> HookResult<HookOutcome>;
}

impl IntoHookResult for () {
    fn into_hook_result(self) -> HookResult<HookOutcome> {
        Ok(HookOutcome::Continue)
    }
}

impl IntoHookResult for HookOutcome {
    fn into_hook_result(self) -> HookResult<HookOutcome> {
        Ok(self)
    }
}

impl IntoHookResult for HookResult<()> {
    fn into_hook_result(self) -> HookResult<HookOutcome> {
        self.map(|()| HookOutcome::Continue)
    }
}

impl IntoHookResult for HookResult<HookOutcome> {
    fn into_hook_result(self) -> HookResult<HookOutcome> {
        self
    }
}

/// Callable behind a blocking hook.
pub type BlockingFn<A> = dyn Fn(&A) -> HookResult<HookOutcome> + Send + Sync;

/// Callable behind a future-returning hook.
pub type FutureFn<A> = dyn Fn(A) -> BoxFuture<'static, HookResult<HookOutcome>> + Send + Sync;

/// Callable behind a middleware hook.
pub type MiddlewareFn<A> = dyn Fn(A, Next, Done) -> BoxFuture<'static, ()> + Send + Sync;

/// A registered callable.
pub enum Hook<A> {
    /// Runs without suspending.
    Blocking(Arc<BlockingFn<A>>),
    /// Returns a future that is awaited.
    Future(Arc<FutureFn<A>>),
    /// Drives a middleware chain through continuations.
    Middleware(Arc<MiddlewareFn<A>>),
}

/// Shape of a hook, used in diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookKind {
    /// See [`Hook::Blocking`].
    Blocking,
    /// See [`Hook::Future`].
    Future,
    /// See [`Hook::Middleware`].
    Middleware,
}

impl fmt::Display for HookKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Blocking => write!(f, "blocking"),
            Self::Future => write!(f, "future"),
            Self::Middleware => write!(f, "middleware"),
        }
    }
}

/// Identity of a registered callable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HookId(usize);

impl<A: HookArgs> Hook<A> {
    /// Wraps a closure that runs without suspending.
    pub fn blocking<F, R>(f: F) -> Self
    where
        F: Fn(&A) -> R + Send + Sync + 'static,
        R: IntoHookResult,
    {
        let callable: Arc<BlockingFn<A>> = Arc::new(move |args: &A| f(args).into_hook_result());
        Self::Blocking(callable)
    }

    /// Wraps a closure returning a future.
    pub fn future<F, Fut, R>(f: F) -> Self
    where
        F: Fn(A) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = R> + Send + 'static,
        R: IntoHookResult,
    {
        let callable: Arc<FutureFn<A>> = Arc::new(move |args: A| {
            let fut = f(args);
            async move { fut.await.into_hook_result() }.boxed()
        });
        Self::Future(callable)
    }

    /// Wraps a middleware handler that settles its continuations before
    /// returning, or hands them to work it spawned.
    pub fn middleware<F>(f: F) -> Self
    where
        F: Fn(A, Next, Done) + Send + Sync + 'static,
    {
        let callable: Arc<MiddlewareFn<A>> = Arc::new(move |args: A, next: Next, done: Done| {
            f(args, next, done);
            futures::future::ready(()).boxed()
        });
        Self::Middleware(callable)
    }

    /// Wraps an async middleware handler.
    pub fn middleware_async<F, Fut>(f: F) -> Self
    where
        F: Fn(A, Next, Done) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let callable: Arc<MiddlewareFn<A>> =
            Arc::new(move |args: A, next: Next, done: Done| f(args, next, done).boxed());
        Self::Middleware(callable)
    }

    /// Runs the hook without suspending. Only blocking hooks can.
    pub fn call_blocking(&self, args: &A) -> HookResult<HookOutcome> {
        match self {
            Self::Blocking(f) => f(args),
            other => Err(HookError::incompatible_hook(format!(
                "A {} hook cannot run without suspending",
                other.kind()
            ))),
        }
    }

    /// Runs a blocking or future hook to completion.
    pub async fn call(&self, args: A) -> HookResult<HookOutcome> {
        match self {
            Self::Blocking(f) => f(&args),
            Self::Future(f) => f(args).await,
            Self::Middleware(_) => Err(HookError::incompatible_hook(
                "A middleware hook needs next/done continuations to run",
            )),
        }
    }
}

impl<A> Hook<A> {
    /// Returns the shape of this hook.
    pub fn kind(&self) -> HookKind {
        match self {
            Self::Blocking(_) => HookKind::Blocking,
            Self::Future(_) => HookKind::Future,
            Self::Middleware(_) => HookKind::Middleware,
        }
    }

    /// Returns the identity shared by every clone of this hook.
    pub fn id(&self) -> HookId {
        let ptr = match self {
            Self::Blocking(f) => Arc::as_ptr(f) as *const (),
            Self::Future(f) => Arc::as_ptr(f) as *const (),
            Self::Middleware(f) => Arc::as_ptr(f) as *const (),
        };
        HookId(ptr as usize)
    }

    /// Returns `true` if both hooks share the same callable.
    pub fn same_as(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl<A> Clone for Hook<A> {
    fn clone(&self) -> Self {
        match self {
            Self::Blocking(f) => Self::Blocking(Arc::clone(f)),
            Self::Future(f) => Self::Future(Arc::clone(f)),
            Self::Middleware(f) => Self::Middleware(Arc::clone(f)),
        }
    }
}

impl<A> fmt::Debug for Hook<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hook")
            .field("kind", &self.kind())
            .field("id", &self.id())
            .finish()
    }
}
