mod cancel;

pub(crate) use cancel::CancelToken;

use crate::api::ApiResult;
use leptos::prelude::*;
use leptos::task::spawn_local;
use std::future::Future;

/// Lifecycle of one page-owned read or write.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) enum AsyncState<T> {
    #[default]
    Idle,
    Loading,
    Ready(T),
    Failed(String),
}

impl<T> AsyncState<T> {
    /// State to commit for a finished request.
    ///
    /// Cancellation is not an outcome: it yields `None` so whatever state the
    /// newer request put in place is left alone.
    pub fn from_result(result: ApiResult<T>) -> Option<Self> {
        match result {
            Ok(v) => Some(Self::Ready(v)),
            Err(e) if e.is_cancelled() => None,
            Err(e) => Some(Self::Failed(e.to_string())),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Ready(v) => Some(v),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(e) => Some(e.as_str()),
            _ => None,
        }
    }
}

/// Reactive holder of an [`AsyncState`] plus the cancel token of its
/// outstanding request.
///
/// Starting a request cancels the previous one, and a result is only
/// committed while its token is live, so a late response for an old input
/// can never overwrite state for the current one. Outstanding requests are
/// cancelled when the owning component is cleaned up.
pub(crate) struct Resource<T: Send + Sync + 'static> {
    state: RwSignal<AsyncState<T>>,
    token: StoredValue<Option<CancelToken>>,
}

impl<T: Send + Sync + 'static> Clone for Resource<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: Send + Sync + 'static> Copy for Resource<T> {}

impl<T: Send + Sync + 'static> Resource<T> {
    pub fn new() -> Self {
        let resource = Self {
            state: RwSignal::new(AsyncState::Idle),
            token: StoredValue::new(None),
        };
        on_cleanup(move || resource.cancel());
        resource
    }

    /// Same as [`Resource::new`] but starting in `Loading`, for reads that
    /// are issued on mount (avoids a one-frame "empty" flash).
    pub fn loading() -> Self {
        let resource = Self::new();
        resource.state.set(AsyncState::Loading);
        resource
    }

    /// Cancels any outstanding request and marks the resource as loading.
    pub fn begin(&self) -> CancelToken {
        let token = self.begin_background();
        self.state.set(AsyncState::Loading);
        token
    }

    /// Like [`Resource::begin`] but keeps the current state on screen until
    /// the new result arrives. Used for re-reads after a write.
    pub fn begin_background(&self) -> CancelToken {
        let token = CancelToken::new();
        if let Some(Some(prev)) = self.token.try_update_value(|t| t.replace(token.clone())) {
            prev.cancel();
        }
        token
    }

    /// Stores the outcome of the request started with `token`.
    ///
    /// Returns `true` only if a successful value was committed.
    pub fn commit(&self, token: &CancelToken, result: ApiResult<T>) -> bool {
        if token.is_cancelled() {
            log::debug!("dropping result of a cancelled request");
            return false;
        }

        let Some(next) = AsyncState::from_result(result) else {
            return false;
        };
        let ok = matches!(next, AsyncState::Ready(_));
        self.state.try_set(next);
        self.token.try_update_value(|t| {
            if t.as_ref().is_some_and(|cur| cur.same_as(token)) {
                *t = None;
            }
        });
        ok
    }

    /// Runs `request` under a fresh token and commits its result.
    pub fn load<F, Fut>(&self, request: F)
    where
        F: FnOnce(CancelToken) -> Fut,
        Fut: Future<Output = ApiResult<T>> + 'static,
    {
        let token = self.begin();
        let fut = request(token.clone());
        let this = *self;
        spawn_local(async move {
            let result = fut.await;
            this.commit(&token, result);
        });
    }

    pub fn cancel(&self) {
        if let Some(Some(token)) = self.token.try_update_value(|t| t.take()) {
            token.cancel();
        }
    }

    /// Cancels any outstanding request and records a failure that did not
    /// come from the network (e.g. an unusable route parameter).
    pub fn fail(&self, message: impl Into<String>) {
        self.cancel();
        self.state.try_set(AsyncState::Failed(message.into()));
    }

    /// Cancels and forgets everything, back to `Idle`.
    pub fn reset(&self) {
        self.cancel();
        self.state.try_set(AsyncState::Idle);
    }

    pub fn is_loading(&self) -> bool {
        self.state.with(|s| s.is_loading())
    }

    pub fn error(&self) -> Option<String> {
        self.state.with(|s| s.error().map(str::to_string))
    }

    pub fn with<R>(&self, f: impl FnOnce(&AsyncState<T>) -> R) -> R {
        self.state.with(f)
    }

    pub fn with_untracked<R>(&self, f: impl FnOnce(&AsyncState<T>) -> R) -> R {
        self.state.with_untracked(f)
    }
}

impl<T: Clone + Send + Sync + 'static> Resource<T> {
    pub fn value(&self) -> Option<T> {
        self.state.with(|s| s.value().cloned())
    }

    pub fn value_untracked(&self) -> Option<T> {
        self.state.with_untracked(|s| s.value().cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;

    #[test]
    fn test_from_result_ready() {
        let s = AsyncState::from_result(Ok(5)).unwrap();
        assert_eq!(s.value(), Some(&5));
        assert!(!s.is_loading());
        assert!(s.error().is_none());
    }

    #[test]
    fn test_from_result_failed_keeps_message() {
        let s: AsyncState<i32> =
            AsyncState::from_result(Err(ApiError::http(404, "Contract not found".to_string())))
                .unwrap();
        assert_eq!(s.error(), Some("Contract not found"));
        assert!(s.value().is_none());
    }

    #[test]
    fn test_from_result_cancelled_is_not_committed() {
        let s: Option<AsyncState<i32>> = AsyncState::from_result(Err(ApiError::cancelled()));
        assert!(s.is_none());
    }

    #[test]
    fn test_default_is_idle() {
        let s: AsyncState<()> = AsyncState::default();
        assert_eq!(s, AsyncState::Idle);
    }

    #[test]
    fn test_begin_cancels_previous_request() {
        Owner::new().with(|| {
            let r: Resource<i32> = Resource::new();
            let first = r.begin();
            let second = r.begin();
            assert!(first.is_cancelled());
            assert!(!second.is_cancelled());
            assert!(r.with_untracked(|s| s.is_loading()));
        });
    }

    #[test]
    fn test_stale_commit_is_dropped() {
        Owner::new().with(|| {
            let r: Resource<i32> = Resource::new();
            let old = r.begin();
            let current = r.begin();

            // The newer request lands first, the older one late.
            assert!(r.commit(&current, Ok(2)));
            assert!(!r.commit(&old, Ok(1)));
            assert_eq!(r.value_untracked(), Some(2));

            assert!(!r.commit(&old, Err(ApiError::http(500, "boom".to_string()))));
            assert_eq!(r.value_untracked(), Some(2));
        });
    }

    #[test]
    fn test_begin_background_keeps_value_on_screen() {
        Owner::new().with(|| {
            let r: Resource<i32> = Resource::new();
            let t = r.begin();
            r.commit(&t, Ok(1));

            let refresh = r.begin_background();
            assert_eq!(r.value_untracked(), Some(1));
            assert!(!r.with_untracked(|s| s.is_loading()));

            assert!(r.commit(&refresh, Ok(5)));
            assert_eq!(r.value_untracked(), Some(5));
        });
    }

    #[test]
    fn test_failure_and_cancellation_outcomes() {
        Owner::new().with(|| {
            let r: Resource<i32> = Resource::new();
            let t = r.begin();
            assert!(!r.commit(&t, Err(ApiError::http(404, "Contract not found".to_string()))));
            assert_eq!(
                r.with_untracked(|s| s.error().map(str::to_string)),
                Some("Contract not found".to_string())
            );

            // A cancelled outcome leaves the current state untouched.
            let t = r.begin_background();
            assert!(!r.commit(&t, Err(ApiError::cancelled())));
            assert!(r.with_untracked(|s| s.error().is_some()));
        });
    }

    #[test]
    fn test_fail_and_reset_cancel_outstanding_request() {
        Owner::new().with(|| {
            let r: Resource<i32> = Resource::new();
            let t = r.begin();
            r.fail("Invalid contract id");
            assert!(t.is_cancelled());
            assert!(!r.commit(&t, Ok(1)));
            assert_eq!(
                r.with_untracked(|s| s.error().map(str::to_string)),
                Some("Invalid contract id".to_string())
            );

            let t = r.begin();
            r.reset();
            assert!(t.is_cancelled());
            assert_eq!(r.with_untracked(|s| s.clone()), AsyncState::Idle);
        });
    }

    #[test]
    fn test_cleanup_cancels_outstanding_request() {
        let owner = Owner::new();
        let (r, token) = owner.with(|| {
            let r: Resource<i32> = Resource::new();
            let token = r.begin();
            (r, token)
        });

        owner.cleanup();
        assert!(token.is_cancelled());
        assert!(!r.commit(&token, Ok(1)));
    }
}
