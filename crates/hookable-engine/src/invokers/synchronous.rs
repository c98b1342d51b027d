//! Runs blocking hooks one after another without suspending.

use async_trait::async_trait;

use hookable_core::HookResult;

use super::{InvokeOptions, InvokeOutcome, Invoker, SYNCHRONOUS, Tally, ensure_kinds};
use crate::hooks::{Hook, HookArgs, HookKind};

/// Registration-order chain of blocking hooks.
///
/// Each hook's effects are visible before the next starts. `Break` stops the
/// chain silently; a failure aborts it and propagates unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct Synchronous;

impl Synchronous {
    /// Runs the chain on the calling thread.
    pub fn run<A: HookArgs>(hooks: &[Hook<A>], args: &A) -> HookResult<InvokeOutcome> {
        ensure_kinds(SYNCHRONOUS, hooks, &[HookKind::Blocking])?;

        let mut tally = Tally::default();
        for hook in hooks {
            let outcome = hook.call_blocking(args)?;
            if !tally.record(SYNCHRONOUS, outcome) {
                return Ok(tally.finish(true));
            }
        }
        Ok(tally.finish(false))
    }
}

#[async_trait]
impl<A: HookArgs> Invoker<A> for Synchronous {
    fn name(&self) -> &str {
        SYNCHRONOUS
    }

    async fn invoke(
        &self,
        hooks: Vec<Hook<A>>,
        args: A,
        _options: InvokeOptions,
    ) -> HookResult<InvokeOutcome> {
        Self::run(&hooks, &args)
    }
}
