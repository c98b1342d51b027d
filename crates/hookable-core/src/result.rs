//! Convenience result type alias for hook operations.

use crate::error::HookError;

/// A specialized `Result` type for registration and invocation.
///
/// Hooks themselves return `HookResult<HookOutcome>`, so a failing hook and
/// a failing registration travel through the same channel.
pub type HookResult<T> = Result<T, HookError>;
