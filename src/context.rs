//! Evaluation context and cancellation.
//!
//! A single evaluation frame is single-threaded and cooperative. Row streams
//! are pull-based; producers observe the cancellation token at each yield
//! point and terminate the stream promptly when it fires. Timeouts are the
//! caller's responsibility, expressed by cancelling the token.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// A cancellation token for terminating row streams early.
///
/// This is a simple atomic boolean that can be shared across evaluation
/// frames.
#[derive(Clone, Debug, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Create a new cancellation token.
    pub fn new() -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Signal cancellation.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Check if cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Context threaded through every row-producing and function-call operation.
#[derive(Clone, Debug, Default)]
pub struct Context {
    cancel: CancellationToken,
}

impl Context {
    pub fn new() -> Self {
        Self {
            cancel: CancellationToken::new(),
        }
    }

    /// Builds a context driven by an existing token.
    pub fn with_token(cancel: CancellationToken) -> Self {
        Self { cancel }
    }

    /// The token backing this context.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_is_shared_between_clones() {
        let ctx = Context::new();
        let token = ctx.cancellation_token();
        assert!(!ctx.is_cancelled());

        token.cancel();
        assert!(ctx.is_cancelled());
    }
}
