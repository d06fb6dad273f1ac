//! Cancellation and deadline context threaded through operator calls.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::error::OperatorError;

/// Why an operation stopped before its backend call completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Interruption {
    Cancelled,
    DeadlineExceeded,
}

impl Interruption {
    pub(crate) const fn into_error<E>(self) -> OperatorError<E>
    where
        E: std::error::Error + 'static,
    {
        match self {
            Self::Cancelled => OperatorError::Cancelled,
            Self::DeadlineExceeded => OperatorError::DeadlineExceeded,
        }
    }
}

/// Cancellation token plus optional deadline for one or more operations.
///
/// Clones share the same token, so cancelling any clone cancels them all.
/// Use [`OperationContext::child`] to derive a context that can be cancelled
/// on its own without affecting the parent.
#[derive(Debug, Clone, Default)]
pub struct OperationContext {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl OperationContext {
    /// Create a context with no deadline that is cancelled only explicitly.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a context whose deadline is `timeout` from now.
    ///
    /// A timeout too large to represent as an instant leaves the context
    /// without a deadline.
    #[must_use]
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::new().with_deadline_after(timeout)
    }

    /// Set the deadline to `timeout` from now, or clear it when that instant
    /// cannot be represented.
    #[must_use]
    pub fn with_deadline_after(mut self, timeout: Duration) -> Self {
        self.deadline = Instant::now().checked_add(timeout);
        self
    }

    /// Replace the deadline.
    #[must_use]
    pub const fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Derive a context cancelled with this one, keeping the same deadline.
    #[must_use]
    pub fn child(&self) -> Self {
        Self {
            token: self.token.child_token(),
            deadline: self.deadline,
        }
    }

    /// Cancel this context and every child derived from it.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Returns whether the context has been cancelled.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Return the deadline, if one is set.
    #[must_use]
    pub const fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Return the underlying cancellation token.
    #[must_use]
    pub const fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// Fail fast when the context is already cancelled or past its deadline.
    pub(crate) fn check(&self) -> Result<(), Interruption> {
        if self.token.is_cancelled() {
            return Err(Interruption::Cancelled);
        }
        if self.deadline.is_some_and(|deadline| deadline <= Instant::now()) {
            return Err(Interruption::DeadlineExceeded);
        }
        Ok(())
    }

    /// Drive `future` until it completes, the context is cancelled, or the
    /// deadline elapses. On interruption the future is dropped unfinished.
    pub(crate) async fn run<F: Future>(&self, future: F) -> Result<F::Output, Interruption> {
        self.check()?;

        let deadline = async {
            match self.deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => std::future::pending().await,
            }
        };

        tokio::select! {
            biased;
            () = self.token.cancelled() => Err(Interruption::Cancelled),
            () = deadline => Err(Interruption::DeadlineExceeded),
            output = future => Ok(output),
        }
    }
}
