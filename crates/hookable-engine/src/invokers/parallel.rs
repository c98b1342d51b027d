//! Starts every hook at once and joins them.

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use tracing::{debug, warn};

use hookable_core::{HookError, HookResult};

use super::{InvokeOptions, InvokeOutcome, Invoker, PARALLEL, ensure_kinds};
use crate::hooks::{Hook, HookArgs, HookKind, HookOutcome};

/// Concurrent fan-out joined before returning.
///
/// Resolves only once every hook finished. The first failure by completion
/// time is returned; later failures are logged. Outcomes keep input order and
/// `Break` is reported as a value.
#[derive(Debug, Clone, Copy, Default)]
pub struct Parallel {
    limit: Option<usize>,
}

impl Parallel {
    /// Creates an unbounded parallel invoker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Caps concurrency at `limit` unless the call sets its own.
    pub fn with_limit(limit: usize) -> Self {
        Self { limit: Some(limit) }
    }
}

#[async_trait]
impl<A: HookArgs> Invoker<A> for Parallel {
    fn name(&self) -> &str {
        PARALLEL
    }

    async fn invoke(
        &self,
        hooks: Vec<Hook<A>>,
        args: A,
        options: InvokeOptions,
    ) -> HookResult<InvokeOutcome> {
        ensure_kinds(PARALLEL, &hooks, &[HookKind::Blocking, HookKind::Future])?;

        let total = hooks.len();
        let limit = options.limit.or(self.limit).unwrap_or(total).max(1);
        debug!(invoker = PARALLEL, handler_count = total, limit, "Joining hooks");

        let mut pending = stream::iter(hooks.into_iter().enumerate().map(|(position, hook)| {
            let args = args.clone();
            async move { (position, hook.call(args).await) }
        }))
        .buffer_unordered(limit);

        let mut outcomes: Vec<Option<HookOutcome>> = vec![None; total];
        let mut first_error: Option<HookError> = None;

        while let Some((position, result)) = pending.next().await {
            match result {
                Ok(outcome) => outcomes[position] = Some(outcome),
                Err(err) if first_error.is_none() => first_error = Some(err),
                Err(err) => {
                    warn!(invoker = PARALLEL, position, error = %err, "Hook failed after an earlier failure");
                }
            }
        }

        match first_error {
            Some(err) => Err(err),
            None => Ok(InvokeOutcome::Joined(outcomes.into_iter().flatten().collect())),
        }
    }
}
