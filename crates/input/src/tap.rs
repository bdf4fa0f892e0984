use std::time::Duration;

/// Outcome of a tap sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapResolution {
    /// The window elapsed after one tap.
    Single,
    /// A second tap arrived before the window elapsed.
    Double,
}

/// Tells a lone tap from a quick double tap.
///
/// Time is whatever monotonic frame clock the caller passes in, so frames can
/// be replayed deterministically.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DoubleTapDetector {
    window: Duration,
    pending_since: Option<Duration>,
}

impl DoubleTapDetector {
    /// Create a detector with the given dual-tap window.
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending_since: None,
        }
    }

    /// Register a tap. A tap while one is pending completes a double tap.
    pub fn tap(&mut self, now: Duration) -> Option<TapResolution> {
        if self.pending_since.take().is_some() {
            return Some(TapResolution::Double);
        }
        self.pending_since = Some(now);
        None
    }

    /// Resolve a pending tap whose window has elapsed.
    pub fn poll(&mut self, now: Duration) -> Option<TapResolution> {
        let started = self.pending_since?;
        if now.saturating_sub(started) >= self.window {
            self.pending_since = None;
            return Some(TapResolution::Single);
        }
        None
    }

    /// Whether a first tap is waiting to resolve.
    pub fn is_pending(&self) -> bool {
        self.pending_since.is_some()
    }

    /// Forget any pending tap.
    pub fn reset(&mut self) {
        self.pending_since = None;
    }
}
