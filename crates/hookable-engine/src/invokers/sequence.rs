//! Runs hooks one after another, awaiting each before starting the next.

use async_trait::async_trait;

use hookable_core::HookResult;

use super::{InvokeOptions, InvokeOutcome, Invoker, SEQUENCE, Tally, ensure_kinds};
use crate::hooks::{Hook, HookArgs, HookKind};

/// Awaited registration-order chain.
///
/// Same short-circuit rules as [`Synchronous`](super::Synchronous), but
/// future hooks are accepted and each completion is awaited.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sequence;

#[async_trait]
impl<A: HookArgs> Invoker<A> for Sequence {
    fn name(&self) -> &str {
        SEQUENCE
    }

    async fn invoke(
        &self,
        hooks: Vec<Hook<A>>,
        args: A,
        _options: InvokeOptions,
    ) -> HookResult<InvokeOutcome> {
        ensure_kinds(SEQUENCE, &hooks, &[HookKind::Blocking, HookKind::Future])?;

        let mut tally = Tally::default();
        for hook in &hooks {
            let outcome = hook.call(args.clone()).await?;
            if !tally.record(SEQUENCE, outcome) {
                return Ok(tally.finish(true));
            }
        }
        Ok(tally.finish(false))
    }
}
