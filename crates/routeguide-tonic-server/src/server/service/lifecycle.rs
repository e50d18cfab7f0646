//! In-flight call accounting and graceful shutdown.
//!
//! Every RPC registers with the shared [`Lifecycle`] before doing any work and
//! holds the returned [`CallGuard`] until its last response has been queued.
//! Shutdown proceeds in three phases:
//!
//! 1. Refuse new calls with `UNAVAILABLE`.
//! 2. Wait up to `shutdown_timeout` for in-flight calls to drain.
//! 3. Cancel the shared [`CancellationToken`].
//!
//! A streaming call still running after phase 3 stops at its next receive or
//! send and reports `UNAVAILABLE`.

use crate::server::telemetry::{
    decrement_calls_inflight, increment_call_errors, increment_calls_inflight,
    increment_requests, record_call_duration,
};
use core::time::Duration;
use portable_atomic::{AtomicBool, AtomicUsize, Ordering};
use routeguide_tonic_core::{Error, Result, types::CallKind};
use std::sync::Arc;
use tokio::time::{Instant, sleep, timeout};
use tokio_util::sync::CancellationToken;

const DRAIN_POLL_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug)]
pub struct Lifecycle {
    inflight: AtomicUsize,
    shutting_down: AtomicBool,
    shutdown_token: CancellationToken,
    shutdown_timeout: Duration,
}

impl Lifecycle {
    pub fn new(shutdown_timeout: Duration) -> Self {
        Self {
            inflight: AtomicUsize::new(0),
            shutting_down: AtomicBool::new(false),
            shutdown_token: CancellationToken::new(),
            shutdown_timeout,
        }
    }

    /// Registers a new call.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ServiceShutdown`] once shutdown has begun.
    pub fn begin(self: &Arc<Self>, kind: CallKind) -> Result<CallGuard> {
        // Count first so a concurrent shutdown either sees this call in the
        // drain or we see its flag here.
        self.inflight.fetch_add(1, Ordering::SeqCst);
        if self.shutting_down.load(Ordering::SeqCst) {
            self.inflight.fetch_sub(1, Ordering::SeqCst);
            increment_call_errors(kind);
            return Err(Error::ServiceShutdown);
        }

        increment_requests(kind);
        increment_calls_inflight();

        Ok(CallGuard {
            lifecycle: Arc::clone(self),
            kind,
            start: Instant::now(),
        })
    }

    /// Number of calls currently registered.
    pub fn inflight(&self) -> usize {
        self.inflight.load(Ordering::SeqCst)
    }

    /// Token cancelled in the last phase of shutdown.
    pub fn token(&self) -> &CancellationToken {
        &self.shutdown_token
    }

    /// Runs the three shutdown phases. Calling it again is harmless.
    pub async fn shutdown(&self) {
        // === Phase 0: Stop accepting new calls ===
        #[cfg(feature = "tracing")]
        tracing::info!("Refusing new calls");
        self.shutting_down.store(true, Ordering::SeqCst);

        // === Phase 1: Wait for in-flight calls to drain ===
        #[cfg(feature = "tracing")]
        tracing::info!("Draining in-flight calls ({} active)", self.inflight());
        let drain_result = timeout(self.shutdown_timeout, async {
            while self.inflight() > 0 {
                sleep(DRAIN_POLL_INTERVAL).await;
            }
        })
        .await;

        match drain_result {
            Ok(()) => {
                #[cfg(feature = "tracing")]
                tracing::debug!("All in-flight calls drained");
            }
            Err(_) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(
                    "Graceful drain timed out ({} calls still active)",
                    self.inflight()
                );
            }
        }

        // === Phase 2: Cancel whatever is left ===
        #[cfg(feature = "tracing")]
        tracing::debug!("Cancelling remaining calls via shutdown token");
        self.shutdown_token.cancel();
    }
}

/// Keeps one call registered with its [`Lifecycle`] until dropped.
#[derive(Debug)]
pub struct CallGuard {
    lifecycle: Arc<Lifecycle>,
    kind: CallKind,
    start: Instant,
}

impl CallGuard {
    pub fn kind(&self) -> CallKind {
        self.kind
    }

    /// Passes `result` through, recording it against this call if it failed.
    pub fn check<T>(&self, result: Result<T>) -> Result<T> {
        if let Err(_e) = &result {
            increment_call_errors(self.kind);

            #[cfg(feature = "tracing")]
            if _e.is_cancellation() {
                tracing::debug!(rpc.method = %self.kind, "Call cancelled");
            } else {
                tracing::warn!(rpc.method = %self.kind, "Call failed: {}", _e);
            }
        }
        result
    }
}

impl Drop for CallGuard {
    fn drop(&mut self) {
        self.lifecycle.inflight.fetch_sub(1, Ordering::SeqCst);
        decrement_calls_inflight();
        record_call_duration(self.kind, self.start.elapsed().as_secs_f64() * 1000.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn guards_track_inflight_calls() {
        let lifecycle = Arc::new(Lifecycle::new(Duration::from_secs(1)));

        let a = lifecycle.begin(CallKind::GetFeature).unwrap();
        let b = lifecycle.begin(CallKind::Recommend).unwrap();
        assert_eq!(lifecycle.inflight(), 2);
        assert_eq!(b.kind(), CallKind::Recommend);

        drop(a);
        assert_eq!(lifecycle.inflight(), 1);
        drop(b);
        assert_eq!(lifecycle.inflight(), 0);
    }

    #[tokio::test]
    async fn check_passes_results_through() {
        let lifecycle = Arc::new(Lifecycle::new(Duration::from_secs(1)));
        let guard = lifecycle.begin(CallKind::GetFeature).unwrap();

        assert_eq!(guard.check(Ok(5)), Ok(5));
        assert_eq!(
            guard.check::<()>(Err(Error::EmptyFeatureSet)),
            Err(Error::EmptyFeatureSet)
        );
    }

    #[tokio::test]
    async fn shutdown_refuses_new_calls() {
        let lifecycle = Arc::new(Lifecycle::new(Duration::from_secs(1)));
        lifecycle.shutdown().await;

        assert!(lifecycle.token().is_cancelled());
        assert_eq!(
            lifecycle.begin(CallKind::ListFeatures).unwrap_err(),
            Error::ServiceShutdown
        );
        assert_eq!(lifecycle.inflight(), 0);
    }

    #[tokio::test]
    async fn shutdown_waits_for_inflight_calls() {
        let lifecycle = Arc::new(Lifecycle::new(Duration::from_secs(5)));
        let guard = lifecycle.begin(CallKind::RecordRoute).unwrap();

        let shutdown = tokio::spawn({
            let lifecycle = Arc::clone(&lifecycle);
            async move { lifecycle.shutdown().await }
        });

        sleep(Duration::from_millis(250)).await;
        // Still draining: new calls are refused but the token stays live
        // while the call runs.
        assert!(lifecycle.begin(CallKind::GetFeature).is_err());
        assert!(!lifecycle.token().is_cancelled());

        drop(guard);
        shutdown.await.unwrap();
        assert!(lifecycle.token().is_cancelled());
    }

    #[tokio::test]
    async fn drain_timeout_cancels_remaining_calls() {
        let lifecycle = Arc::new(Lifecycle::new(Duration::from_millis(200)));
        let _stuck = lifecycle.begin(CallKind::Recommend).unwrap();

        lifecycle.shutdown().await;

        assert!(lifecycle.token().is_cancelled());
        assert_eq!(lifecycle.inflight(), 1);
    }
}
