//! Cancellation and deadline context for cloud calls
//!
//! A [`CallContext`] is handed to every external call. When its token is
//! cancelled or its deadline passes, the in-flight call is dropped and the
//! caller receives [`CloudError::Cancelled`] or [`CloudError::DeadlineExceeded`].

use crate::error::CloudError;
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Cancellation token plus optional deadline shared by one reconcile cycle.
#[derive(Debug, Clone, Default)]
pub struct CallContext {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl CallContext {
    /// Context that is never cancelled and has no deadline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Context driven by an existing cancellation token.
    pub fn with_token(token: CancellationToken) -> Self {
        Self { token, deadline: None }
    }

    /// Sets a deadline relative to now.
    #[must_use]
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Sets an absolute deadline. An earlier existing deadline wins.
    #[must_use]
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(match self.deadline {
            Some(existing) if existing < deadline => existing,
            _ => deadline,
        });
        self
    }

    /// Underlying cancellation token.
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// Deadline, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Cancels every call running under this context (and its clones).
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Returns true once the token has been cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Fails fast if the context is already cancelled or past its deadline.
    pub fn check(&self, operation: &str) -> Result<(), CloudError> {
        if self.token.is_cancelled() {
            return Err(CloudError::Cancelled { operation: operation.to_string() });
        }
        if let Some(deadline) = self.deadline {
            if Instant::now() >= deadline {
                return Err(CloudError::DeadlineExceeded { operation: operation.to_string() });
            }
        }
        Ok(())
    }

    /// Runs `call`, aborting it if the context is cancelled or the deadline passes first.
    ///
    /// Cancellation is checked before the call is polled, so a call started
    /// under an already-cancelled context never reaches the service.
    pub async fn run<T, F>(&self, operation: &str, call: F) -> Result<T, CloudError>
    where
        F: Future<Output = Result<T, CloudError>>,
    {
        let deadline = async {
            match self.deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            biased;
            () = self.token.cancelled() => {
                debug!("{} aborted: context cancelled", operation);
                Err(CloudError::Cancelled { operation: operation.to_string() })
            }
            () = deadline => {
                debug!("{} aborted: deadline exceeded", operation);
                Err(CloudError::DeadlineExceeded { operation: operation.to_string() })
            }
            result = call => result,
        }
    }
}
