//! Gesture recognition
//!
//! Turns a stream of timestamped presses into single and double clicks on the
//! same control surface. A double click never also yields single clicks: the
//! first press is held back until either a second press arrives inside the
//! window (double click) or the window lapses (single click).

/// Default double-click window in milliseconds
pub const DEFAULT_DOUBLE_CLICK_MS: u64 = 300;

/// A recognized gesture
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Gesture {
    Click,
    DoubleClick,
}

/// Resolves presses into [`Gesture`]s
///
/// Hosts with native double-click events can skip this and feed
/// [`Gesture`] values straight to the widget.
#[derive(Clone, Debug)]
pub struct GestureRecognizer {
    window_ms: u64,
    /// Timestamp of a press still waiting for a possible second press
    pending: Option<u64>,
}

impl GestureRecognizer {
    pub fn new(window_ms: u64) -> Self {
        Self {
            window_ms,
            pending: None,
        }
    }

    /// The double-click window in milliseconds
    pub fn window_ms(&self) -> u64 {
        self.window_ms
    }

    /// Whether a press is waiting to be resolved
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Feed a press at `now_ms`
    ///
    /// Returns a gesture when this press completes a double click, or when it
    /// arrives after an earlier press had already timed out (the earlier
    /// press resolves as a click and this one becomes pending).
    pub fn press(&mut self, now_ms: u64) -> Option<Gesture> {
        match self.pending.take() {
            Some(first) if now_ms.saturating_sub(first) <= self.window_ms => {
                tracing::trace!("gesture: double click ({}ms)", now_ms.saturating_sub(first));
                Some(Gesture::DoubleClick)
            }
            Some(_) => {
                self.pending = Some(now_ms);
                Some(Gesture::Click)
            }
            None => {
                self.pending = Some(now_ms);
                None
            }
        }
    }

    /// Resolve a pending press once its window has lapsed
    ///
    /// Call this from the frame loop (or a timer) so single clicks fire with
    /// at most one window of latency.
    pub fn poll(&mut self, now_ms: u64) -> Option<Gesture> {
        match self.pending {
            Some(first) if now_ms.saturating_sub(first) > self.window_ms => {
                self.pending = None;
                Some(Gesture::Click)
            }
            _ => None,
        }
    }

    /// Drop any pending press (e.g. on unmount)
    pub fn reset(&mut self) {
        self.pending = None;
    }
}

impl Default for GestureRecognizer {
    fn default() -> Self {
        Self::new(DEFAULT_DOUBLE_CLICK_MS)
    }
}
