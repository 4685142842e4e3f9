//! Provides a token-based mechanism for cancelling remote calls, and the
//! per-call context that pairs it with an optional deadline.

use crate::errors::{Error, Result};
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;
use tokio::time::Instant;

#[derive(Debug, Default)]
struct Inner {
    cancelled: AtomicBool,
    notify: Notify,
}

/// A token that can be used to signal cancellation to in-flight operations.
///
/// This struct is a cloneable, thread-safe handle. Cancelling any clone
/// cancels them all, and wakes every task awaiting [`CancellationToken::cancelled`].
///
/// # Examples
///
/// ```
/// use repofetch::CancellationToken;
///
/// let token = CancellationToken::new();
/// let token_clone = token.clone();
/// assert!(!token_clone.is_cancelled());
///
/// token.cancel();
/// assert!(token_clone.is_cancelled());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    inner: Arc<Inner>,
}

impl CancellationToken {
    /// Creates a new `CancellationToken` in a non-cancelled state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Signals cancellation.
    ///
    /// All subsequent calls to `is_cancelled()` on this token or any of its
    /// clones return `true`, and pending `cancelled()` futures resolve.
    pub fn cancel(&self) {
        self.inner.cancelled.store(true, Ordering::SeqCst);
        self.inner.notify.notify_waiters();
    }

    /// Checks if the token has been cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::SeqCst)
    }

    /// Resolves once the token is cancelled.
    pub async fn cancelled(&self) {
        loop {
            let notified = self.inner.notify.notified();
            tokio::pin!(notified);
            // Register interest before checking the flag so a concurrent
            // `cancel()` cannot slip between the check and the await.
            notified.as_mut().enable();
            if self.is_cancelled() {
                return;
            }
            notified.await;
        }
    }
}

/// The execution context threaded through every remote call.
///
/// Carries the caller's cancellation token and an optional deadline. Every
/// network operation is raced against both; whichever fires first aborts the
/// in-flight request.
#[derive(Debug, Clone, Default)]
pub struct CallContext {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl CallContext {
    /// A context that never cancels and has no deadline.
    pub fn background() -> Self {
        Self::default()
    }

    /// A context bound to the given cancellation token.
    pub fn with_token(token: CancellationToken) -> Self {
        Self {
            token,
            deadline: None,
        }
    }

    /// Returns a copy of this context whose deadline is at most `timeout` from now.
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        let candidate = Instant::now() + timeout;
        let deadline = match self.deadline {
            Some(existing) if existing < candidate => existing,
            _ => candidate,
        };
        Self {
            token: self.token.clone(),
            deadline: Some(deadline),
        }
    }

    /// The cancellation token of this context.
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// The deadline of this context, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Fails fast if the context is already cancelled or past its deadline.
    pub fn check(&self, step: &'static str) -> Result<()> {
        if self.token.is_cancelled() {
            return Err(Error::Cancelled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Err(Error::Timeout { step }),
            _ => Ok(()),
        }
    }

    /// Drives `fut` to completion unless the context is cancelled or its
    /// deadline passes first; the future is dropped in that case.
    pub async fn run<F, T>(&self, step: &'static str, fut: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        self.check(step)?;
        let deadline = async {
            match self.deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => std::future::pending::<()>().await,
            }
        };
        tokio::select! {
            result = fut => result,
            _ = self.token.cancelled() => Err(Error::Cancelled),
            _ = deadline => Err(Error::Timeout { step }),
        }
    }
}
