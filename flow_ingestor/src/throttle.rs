//! Fixed spacing between upstream calls.
//!
//! The flow API has no documented concurrency or rate guarantees, so calls
//! are issued one at a time with a fixed pause after each response.
//! [`CallSpacer`] measures the pause from the moment the previous call
//! finished, not from when it started: a slow response is still followed by
//! the full gap before the next request goes out.

use std::{
    future::Future,
    sync::{Mutex, PoisonError},
    time::Duration,
};

use tokio::time::{Instant, sleep_until};

pub struct CallSpacer {
    spacing: Duration,
    last_finished: Mutex<Option<Instant>>,
}

impl CallSpacer {
    /// Spacer enforcing `spacing` after each call; zero disables it.
    pub fn new(spacing: Duration) -> Self {
        Self {
            spacing,
            last_finished: Mutex::new(None),
        }
    }

    /// Spacer that never waits.
    pub fn unthrottled() -> Self {
        Self::new(Duration::ZERO)
    }

    pub fn spacing(&self) -> Duration {
        self.spacing
    }

    /// Wait until `spacing` has passed since the previous call finished.
    ///
    /// The first call never waits.
    pub async fn wait(&self) {
        if self.spacing.is_zero() {
            return;
        }
        let last = *self
            .last_finished
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(finished) = last {
            sleep_until(finished + self.spacing).await;
        }
    }

    /// Record that a call has just finished.
    pub fn finish(&self) {
        *self
            .last_finished
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(Instant::now());
    }

    /// Wait for the gap, run `call` to completion and start the next gap,
    /// whether the call succeeded or not.
    pub async fn space<F: Future>(&self, call: F) -> F::Output {
        self.wait().await;
        let out = call.await;
        self.finish();
        out
    }
}

impl std::fmt::Debug for CallSpacer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallSpacer")
            .field("spacing", &self.spacing)
            .finish_non_exhaustive()
    }
}
