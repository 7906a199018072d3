//! Cancellation utilities
//!
//! One cancellation signal threads through HTTP calls, poll waits and
//! stream reads. Cancellation takes effect at the next suspension point;
//! dropping a cancelled stream closes the underlying HTTP connection so
//! vendors stop generating.

use tokio_util::sync::CancellationToken;

use crate::stream::ModelStream;

/// A handle that can be used to request cancellation.
#[derive(Clone, Debug, Default)]
pub struct CancelHandle {
    token: CancellationToken,
}

impl CancelHandle {
    /// Create a new cancel handle.
    pub fn new() -> Self {
        Self {
            token: CancellationToken::new(),
        }
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Check if cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// A future that resolves when cancellation is requested.
    pub fn cancelled(&self) -> tokio_util::sync::WaitForCancellationFuture<'_> {
        self.token.cancelled()
    }
}

/// Wrap a stream so the returned handle aborts consumption. An in-flight
/// read is abandoned rather than drained.
pub fn make_cancellable_stream(stream: ModelStream) -> (ModelStream, CancelHandle) {
    let handle = CancelHandle::new();
    let token = handle.token.clone();
    let mut inner = stream;
    let s = async_stream::stream! {
        use futures::StreamExt;
        loop {
            tokio::select! {
                _ = token.cancelled() => break,
                item = inner.next() => {
                    let Some(item) = item else { break };
                    yield item;
                }
            }
        }
    };
    (Box::pin(s), handle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::StreamExt;

    #[tokio::test]
    async fn cancel_wakes_pending_next_immediately() {
        // A stream that never yields and never ends.
        let pending: ModelStream = Box::pin(futures_util::stream::pending());
        let (mut s, cancel) = make_cancellable_stream(pending);

        let waiter = tokio::spawn(async move { s.next().await });

        // Give the task a chance to poll and block on `next()`.
        tokio::task::yield_now().await;

        cancel.cancel();

        let out = tokio::time::timeout(std::time::Duration::from_millis(200), waiter)
            .await
            .expect("cancel should wake the waiting task")
            .expect("task ok");

        assert!(out.is_none());
    }
}
