//! Cancellation handle for blocking calls.

use crate::blocking::CallError;
use parking_lot::{Condvar, Mutex};
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Debug, Default)]
struct CancelState {
    canceled: Mutex<bool>,
    signal: Condvar,
}

/// Shared handle to one in-flight blocking call.
///
/// Clones refer to the same call, so another thread can cancel it while the
/// calling thread is blocked.
#[derive(Debug, Clone, Default)]
pub struct CallHandle {
    state: Arc<CancelState>,
}

impl CallHandle {
    /// Handle for a call that has not been canceled
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel the call and wake any thread sleeping on it.
    pub fn cancel(&self) {
        let mut canceled = self.state.canceled.lock();
        *canceled = true;
        self.state.signal.notify_all();
    }

    /// `true` once [`cancel`](Self::cancel) has been called
    pub fn is_canceled(&self) -> bool {
        *self.state.canceled.lock()
    }

    /// Fail with [`CallError::Canceled`] if the call was canceled.
    pub fn check(&self) -> Result<(), CallError> {
        if self.is_canceled() {
            Err(CallError::Canceled)
        } else {
            Ok(())
        }
    }

    /// Block the current thread for `duration` or until the call is canceled.
    ///
    /// A zero duration does not wait.
    pub fn sleep(&self, duration: Duration) -> Result<(), CallError> {
        let deadline = Instant::now() + duration;
        let mut canceled = self.state.canceled.lock();

        while !*canceled {
            let now = Instant::now();
            if now >= deadline {
                return Ok(());
            }
            self.state
                .signal
                .wait_for(&mut canceled, deadline.saturating_duration_since(now));
        }
        Err(CallError::Canceled)
    }
}
