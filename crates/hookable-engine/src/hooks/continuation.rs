//! Continuations handed to middleware hooks.
//!
//! `Next` and `Done` share one slot: whichever settles first wins and
//! later calls are logged and ignored. Dropping both without settling
//! closes the channel, which the middleware invoker reads as "handled".

use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::Value;
use tokio::sync::oneshot;
use tracing::warn;

use hookable_core::HookError;

/// Terminal or advancing signal sent by a middleware handler.
#[derive(Debug)]
pub(crate) enum Signal {
    /// Advance, or fail the chain when an error is given.
    Next(Option<HookError>),
    /// Finish the chain successfully.
    Done(Option<Value>),
}

type Slot = Arc<Mutex<Option<oneshot::Sender<Signal>>>>;

/// Creates a linked `Next`/`Done` pair and the receiving end.
pub(crate) fn channel() -> (Next, Done, oneshot::Receiver<Signal>) {
    let (tx, rx) = oneshot::channel();
    let slot: Slot = Arc::new(Mutex::new(Some(tx)));
    (Next { slot: slot.clone() }, Done { slot }, rx)
}

fn settle(slot: &Slot, signal: Signal) {
    let sender = slot.lock().take();
    match sender {
        // The receiver is gone only once the invocation itself was dropped.
        Some(tx) => {
            let _ = tx.send(signal);
        }
        None => {
            warn!(signal = ?signal, "Middleware continuation already settled, ignoring");
        }
    }
}

/// Advances a middleware chain, or fails it.
#[derive(Debug)]
pub struct Next {
    slot: Slot,
}

impl Next {
    /// Runs the next handler.
    pub fn proceed(self) {
        settle(&self.slot, Signal::Next(None));
    }

    /// Terminates the chain with `err`.
    pub fn fail(self, err: HookError) {
        settle(&self.slot, Signal::Next(Some(err)));
    }

    /// Proceeds on `None`, fails on `Some(err)`.
    pub fn call(self, err: Option<HookError>) {
        settle(&self.slot, Signal::Next(err));
    }
}

/// Finishes a middleware chain successfully.
#[derive(Debug)]
pub struct Done {
    slot: Slot,
}

impl Done {
    /// Terminates the chain, skipping remaining handlers.
    pub fn finish(self, result: Option<Value>) {
        settle(&self.slot, Signal::Done(result));
    }
}
