//! Handle to a spawned background request.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::task::JoinHandle;

/// A request running on the tokio runtime.
///
/// Awaiting yields `Some(output)`, or `None` if the task panicked or was
/// aborted. Dropping the handle detaches the task; it still runs to
/// completion.
#[derive(Debug)]
#[must_use = "drop the handle explicitly with `detach` to fire and forget"]
pub struct Pending<T> {
    handle: JoinHandle<T>,
}

impl<T: Send + 'static> Pending<T> {
    /// Spawn `future` on the current runtime.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn spawn<F>(future: F) -> Self
    where
        F: Future<Output = T> + Send + 'static,
    {
        Self {
            handle: tokio::spawn(future),
        }
    }

    /// Let the request finish in the background without waiting for it.
    pub fn detach(self) {}

    /// Whether the request has completed.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl<T> Future for Pending<T> {
    type Output = Option<T>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.handle).poll(cx).map(|joined| match joined {
            Ok(output) => Some(output),
            Err(e) => {
                tracing::error!("Background cart request did not complete: {e}");
                None
            }
        })
    }
}
