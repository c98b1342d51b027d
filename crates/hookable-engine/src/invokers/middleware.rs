//! Continuation-driven chain in the style of HTTP middleware.
//!
//! Each handler receives the arguments plus a [`Next`] and a [`Done`]:
//!
//! - `next.proceed()` runs the following handler.
//! - `next.fail(err)` ends the chain with `err`.
//! - `done.finish(result)` ends the chain successfully, skipping the rest.
//!
//! Running off the end of the list, or dropping both continuations without
//! settling them, ends the chain successfully with no result.

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use hookable_core::HookResult;

use super::{InvokeOptions, InvokeOutcome, Invoker, MIDDLEWARE};
use crate::hooks::continuation::{self, Signal};
use crate::hooks::{Hook, HookArgs, HookOutcome};

/// Middleware chain invoker.
///
/// Blocking and future hooks are adapted: `Continue` and `ContinueWith`
/// advance, `Break` finishes, a failure fails. The terminal result goes to
/// the completion callback when one is set, and is returned as
/// [`InvokeOutcome::Completed`] otherwise; it is never returned as `Err`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Middleware;

impl Middleware {
    async fn drive<A: HookArgs>(hooks: &[Hook<A>], args: &A) -> HookResult<Option<Value>> {
        for (position, hook) in hooks.iter().enumerate() {
            let signal = match hook {
                Hook::Middleware(handler) => {
                    let (next, done, settled) = continuation::channel();
                    let ((), signal) = futures::join!(handler(args.clone(), next, done), settled);
                    match signal {
                        Ok(signal) => signal,
                        Err(_) => {
                            debug!(
                                invoker = MIDDLEWARE,
                                position, "Handler released its continuations, chain handled"
                            );
                            return Ok(None);
                        }
                    }
                }
                other => match other.call(args.clone()).await {
                    Ok(HookOutcome::Break) => Signal::Done(None),
                    Ok(_) => Signal::Next(None),
                    Err(err) => Signal::Next(Some(err)),
                },
            };

            match signal {
                Signal::Next(None) => {}
                Signal::Next(Some(err)) => {
                    debug!(invoker = MIDDLEWARE, position, error = %err, "Chain failed");
                    return Err(err);
                }
                Signal::Done(result) => {
                    debug!(invoker = MIDDLEWARE, position, "Chain finished early");
                    return Ok(result);
                }
            }
        }
        Ok(None)
    }
}

#[async_trait]
impl<A: HookArgs> Invoker<A> for Middleware {
    fn name(&self) -> &str {
        MIDDLEWARE
    }

    async fn invoke(
        &self,
        hooks: Vec<Hook<A>>,
        args: A,
        options: InvokeOptions,
    ) -> HookResult<InvokeOutcome> {
        let result = Self::drive(&hooks, &args).await;

        match options.completion {
            Some(complete) => {
                complete(result);
                Ok(InvokeOutcome::Delivered)
            }
            None => Ok(InvokeOutcome::Completed(result)),
        }
    }
}
