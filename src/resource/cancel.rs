use futures::future::{AbortHandle, Abortable, Aborted};
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct Inner {
    cancelled: AtomicBool,
    handles: Mutex<Vec<AbortHandle>>,
}

/// Cooperative cancellation for one logical request.
///
/// A token can guard several futures (a contract read followed by its
/// assignee read). Cancelling aborts every guarded future that is still
/// pending, and any future guarded afterwards resolves to `Aborted`
/// immediately without being polled.
#[derive(Clone, Default)]
pub(crate) struct CancelToken(Arc<Inner>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        if self.0.cancelled.swap(true, Ordering::SeqCst) {
            return;
        }
        if let Ok(mut handles) = self.0.handles.lock() {
            for h in handles.drain(..) {
                h.abort();
            }
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.cancelled.load(Ordering::SeqCst)
    }

    pub fn same_as(&self, other: &CancelToken) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Drives `fut` until it completes or the token is cancelled.
    pub async fn run<F: Future>(&self, fut: F) -> Result<F::Output, Aborted> {
        let (handle, registration) = AbortHandle::new_pair();
        if self.is_cancelled() {
            handle.abort();
        } else if let Ok(mut handles) = self.0.handles.lock() {
            handles.push(handle);
        }
        Abortable::new(fut, registration).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::channel::oneshot;
    use futures::executor::block_on;
    use futures::future::{join, ready};

    #[test]
    fn test_run_completes_when_live() {
        let token = CancelToken::new();
        assert_eq!(block_on(token.run(ready(3))), Ok(3));
        assert!(!token.is_cancelled());
    }

    #[test]
    fn test_run_after_cancel_is_aborted_without_polling() {
        let token = CancelToken::new();
        token.cancel();

        let mut polled = false;
        let res = block_on(token.run(async {
            polled = true;
        }));
        assert!(res.is_err());
        assert!(!polled);
    }

    #[test]
    fn test_cancel_aborts_pending_future() {
        let token = CancelToken::new();
        let (_tx, rx) = oneshot::channel::<i32>();

        let canceller = token.clone();
        let (res, _) = block_on(join(token.run(rx), async move {
            canceller.cancel();
        }));
        assert!(res.is_err());
    }

    #[test]
    fn test_cancel_is_idempotent_and_shared_by_clones() {
        let a = CancelToken::new();
        let b = a.clone();
        assert!(a.same_as(&b));
        assert!(!a.same_as(&CancelToken::new()));

        b.cancel();
        b.cancel();
        assert!(a.is_cancelled());
    }
}
