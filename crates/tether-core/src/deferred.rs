//! Config values resolved asynchronously
//!
//! Some configuration values (tool locations, directories that only exist
//! after the native project was generated) require probing the filesystem or
//! spawning processes. They are stored as [`Deferred`] values so building a
//! [`Config`](crate::config::Config) never blocks on them.

use std::fmt;
use std::future::Future;

use futures::future::{BoxFuture, FutureExt, Shared};

use crate::error::ResolveError;

/// Observable state of a [`Deferred`] value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution<'a, T> {
    /// Not resolved yet
    Pending,
    /// Resolved successfully
    Resolved(&'a T),
    /// Resolution failed
    Failed(&'a ResolveError),
}

impl<T> Resolution<'_, T> {
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

type SharedResolution<T> = Shared<BoxFuture<'static, Result<T, ResolveError>>>;

enum Inner<T: Clone> {
    Ready(Result<T, ResolveError>),
    Pending(SharedResolution<T>),
}

/// A value that is resolved lazily and may fail.
///
/// Cloning is cheap: clones share one underlying resolution, which runs at
/// most once no matter how many clones are awaited.
pub struct Deferred<T: Clone> {
    inner: Inner<T>,
}

impl<T> Deferred<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Defer resolution to `future`. Nothing runs until the value is awaited.
    pub fn new<F>(future: F) -> Self
    where
        F: Future<Output = Result<T, ResolveError>> + Send + 'static,
    {
        Self {
            inner: Inner::Pending(future.boxed().shared()),
        }
    }

    /// An already resolved value
    pub fn resolved(value: T) -> Self {
        Self {
            inner: Inner::Ready(Ok(value)),
        }
    }

    /// An already failed resolution
    pub fn failed(error: ResolveError) -> Self {
        Self {
            inner: Inner::Ready(Err(error)),
        }
    }

    /// Current state without driving the resolution
    pub fn state(&self) -> Resolution<'_, T> {
        let outcome = match &self.inner {
            Inner::Ready(outcome) => Some(outcome),
            Inner::Pending(shared) => shared.peek(),
        };

        match outcome {
            None => Resolution::Pending,
            Some(Ok(value)) => Resolution::Resolved(value),
            Some(Err(e)) => Resolution::Failed(e),
        }
    }

    /// Wait for the value
    pub async fn get(&self) -> Result<T, ResolveError> {
        match &self.inner {
            Inner::Ready(outcome) => outcome.clone(),
            Inner::Pending(shared) => shared.clone().await,
        }
    }

    /// Derive another deferred value from this one
    pub fn map<U, F>(&self, f: F) -> Deferred<U>
    where
        U: Clone + Send + Sync + 'static,
        F: FnOnce(T) -> U + Send + 'static,
    {
        match &self.inner {
            Inner::Ready(Ok(value)) => Deferred::resolved(f(value.clone())),
            Inner::Ready(Err(e)) => Deferred::failed(e.clone()),
            Inner::Pending(shared) => {
                let shared = shared.clone();
                Deferred::new(async move { shared.await.map(f) })
            }
        }
    }
}

impl<T: Clone> Clone for Deferred<T> {
    fn clone(&self) -> Self {
        let inner = match &self.inner {
            Inner::Ready(outcome) => Inner::Ready(outcome.clone()),
            Inner::Pending(shared) => Inner::Pending(shared.clone()),
        };
        Self { inner }
    }
}

impl<T> fmt::Debug for Deferred<T>
where
    T: Clone + Send + Sync + fmt::Debug + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.state() {
            Resolution::Pending => f.write_str("Deferred(<pending>)"),
            Resolution::Resolved(value) => f.debug_tuple("Deferred").field(value).finish(),
            Resolution::Failed(e) => write!(f, "Deferred(<failed: {}>)", e),
        }
    }
}

impl<T> From<Result<T, ResolveError>> for Deferred<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn from(outcome: Result<T, ResolveError>) -> Self {
        Self {
            inner: Inner::Ready(outcome),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_ready_states() {
        let ok = Deferred::resolved(42u32);
        assert_eq!(ok.state(), Resolution::Resolved(&42));

        let err: Deferred<u32> = Deferred::failed(ResolveError::Failed("boom".to_string()));
        assert!(err.state().is_failed());
    }

    #[tokio::test]
    async fn test_pending_until_awaited() {
        let deferred = Deferred::new(async { Ok::<_, ResolveError>("pod".to_string()) });
        assert!(deferred.state().is_pending());

        let value = deferred.get().await.unwrap();
        assert_eq!(value, "pod");
        assert_eq!(deferred.state(), Resolution::Resolved(&"pod".to_string()));
    }

    #[tokio::test]
    async fn test_failure_is_distinct_from_empty_value() {
        let empty = Deferred::new(async { Ok::<_, ResolveError>(String::new()) });
        let missing: Deferred<String> = Deferred::new(async {
            Err(ResolveError::tool_not_found("pod", "gem install cocoapods"))
        });

        assert_eq!(empty.get().await, Ok(String::new()));
        assert!(matches!(
            missing.get().await,
            Err(ResolveError::ToolNotFound { .. })
        ));
        assert!(missing.state().is_failed());
    }

    #[tokio::test]
    async fn test_clones_share_one_resolution() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let deferred = Deferred::new(async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok::<_, ResolveError>(7u8)
        });

        let a = deferred.clone();
        let b = deferred.clone();
        let (x, y) = tokio::join!(a.get(), b.get());

        assert_eq!(x, Ok(7));
        assert_eq!(y, Ok(7));
        assert_eq!(deferred.get().await, Ok(7));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_map() {
        let base = Deferred::new(async { Ok::<_, ResolveError>(2u32) });
        let doubled = base.map(|v| v * 2);
        assert_eq!(doubled.get().await, Ok(4));

        let failed: Deferred<u32> = Deferred::failed(ResolveError::Failed("x".to_string()));
        assert!(failed.map(|v| v + 1).state().is_failed());
    }
}
