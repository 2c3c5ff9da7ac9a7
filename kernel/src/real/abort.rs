//! Cooperative cancellation for in-flight real-number computations.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::RealError;

/// A shared abort flag checked by every approximation step.
///
/// Clones share the same flag, so a handle kept by another thread can stop a
/// computation running elsewhere. [`AbortSignal::never`] carries no flag and
/// costs nothing to check.
#[derive(Debug, Clone)]
pub struct AbortSignal {
    flag: Option<Arc<AtomicBool>>,
}

impl AbortSignal {
    /// An armed signal that starts out clear.
    #[must_use]
    pub fn new() -> Self {
        Self {
            flag: Some(Arc::new(AtomicBool::new(false))),
        }
    }

    /// A signal that can never fire.
    #[must_use]
    pub const fn never() -> Self {
        Self { flag: None }
    }

    /// Request that every computation observing this signal stops.
    pub fn abort(&self) {
        if let Some(flag) = &self.flag {
            flag.store(true, Ordering::SeqCst);
        }
    }

    /// Clear a previous abort request.
    pub fn reset(&self) {
        if let Some(flag) = &self.flag {
            flag.store(false, Ordering::SeqCst);
        }
    }

    #[must_use]
    pub fn is_aborted(&self) -> bool {
        self.flag
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::SeqCst))
    }

    /// Fail with [`RealError::Aborted`] if an abort was requested.
    ///
    /// # Errors
    ///
    /// Returns [`RealError::Aborted`] once [`AbortSignal::abort`] has been called.
    pub fn check(&self) -> Result<(), RealError> {
        if self.is_aborted() {
            Err(RealError::Aborted)
        } else {
            Ok(())
        }
    }
}

impl Default for AbortSignal {
    fn default() -> Self {
        Self::new()
    }
}
