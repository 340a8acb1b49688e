//! Ctrl+C handling for the headless `run` command.
//!
//! The handler only raises a flag. The run loop polls it between timer
//! steps and cancels the ticker itself, so cancellation goes through the
//! same `Dismiss` path the dashboard uses.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::{QaRunError, Result};

/// Shared cancellation flag set on SIGINT.
///
/// Cloning shares the same underlying flag.
#[derive(Clone)]
pub struct SignalHandler {
    cancel_flag: Arc<AtomicBool>,
}

impl SignalHandler {
    /// Register the process-wide SIGINT handler.
    ///
    /// # Errors
    ///
    /// Returns [`QaRunError::SignalHandler`] if a handler is already
    /// registered or the OS refuses the registration.
    pub fn new() -> Result<Self> {
        let cancel_flag = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&cancel_flag);

        ctrlc::set_handler(move || {
            flag.store(true, Ordering::SeqCst);
        })
        .map_err(|e| QaRunError::SignalHandler(e.to_string()))?;

        Ok(Self { cancel_flag })
    }

    /// Whether Ctrl+C was pressed since the handler was created.
    pub fn is_cancel_requested(&self) -> bool {
        self.cancel_flag.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detached() -> SignalHandler {
        // ctrlc allows one registration per process, so tests build the
        // struct directly.
        SignalHandler {
            cancel_flag: Arc::new(AtomicBool::new(false)),
        }
    }

    #[test]
    fn test_cancel_not_requested_initially() {
        assert!(!detached().is_cancel_requested());
    }

    #[test]
    fn test_raised_flag_is_seen_by_clones() {
        let handler = detached();
        let clone = handler.clone();
        handler.cancel_flag.store(true, Ordering::SeqCst);
        assert!(clone.is_cancel_requested());
    }

    #[test]
    fn test_flag_visible_across_threads() {
        let handler = detached();
        let flag = Arc::clone(&handler.cancel_flag);
        std::thread::spawn(move || flag.store(true, Ordering::SeqCst))
            .join()
            .unwrap();
        assert!(handler.is_cancel_requested());
    }
}
