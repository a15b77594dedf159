//! Animation scheduler
//!
//! Holds per-frame callbacks and runs them once per host frame. Each callback
//! reports whether it is still animating, so the host can stop requesting
//! frames once everything has settled. A settled callback whose target
//! changes is woken through its [`AnimationWaker`], which the owner can hold
//! without access to the scheduler. Cancelling a callback (on unmount)
//! removes it for good; nothing keeps firing afterwards.

use slotmap::{new_key_type, SlotMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

new_key_type! {
    /// Handle to a registered frame callback
    pub struct AnimationId;
}

/// A per-frame callback; receives `dt` in seconds, returns `true` while animating
pub type FrameCallback = Box<dyn FnMut(f32) -> bool + Send>;

struct Entry {
    callback: FrameCallback,
    active: bool,
    woken: Arc<AtomicBool>,
}

/// Marks one callback as having work again, from outside the frame loop
#[derive(Clone, Debug)]
pub struct AnimationWaker {
    woken: Arc<AtomicBool>,
}

impl AnimationWaker {
    pub fn wake(&self) {
        self.woken.store(true, Ordering::Release);
    }
}

/// Runs registered frame callbacks
pub struct AnimationScheduler {
    entries: SlotMap<AnimationId, Entry>,
}

impl AnimationScheduler {
    pub fn new() -> Self {
        Self {
            entries: SlotMap::with_key(),
        }
    }

    /// Register a callback to run on every tick until cancelled
    ///
    /// New callbacks are considered active until their first tick.
    pub fn request<F>(&mut self, callback: F) -> AnimationId
    where
        F: FnMut(f32) -> bool + Send + 'static,
    {
        self.entries.insert(Entry {
            callback: Box::new(callback),
            active: true,
            woken: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Remove a callback; returns `false` if it was already gone
    pub fn cancel(&mut self, id: AnimationId) -> bool {
        self.entries.remove(id).is_some()
    }

    /// Handle that marks `id` active again (e.g. after its target changed)
    pub fn waker(&self, id: AnimationId) -> Option<AnimationWaker> {
        self.entries.get(id).map(|entry| AnimationWaker {
            woken: entry.woken.clone(),
        })
    }

    /// Run every callback with `dt` seconds; returns whether any is still animating
    pub fn tick(&mut self, dt: f32) -> bool {
        let mut any_active = false;
        for (_, entry) in self.entries.iter_mut() {
            entry.woken.store(false, Ordering::Release);
            entry.active = (entry.callback)(dt);
            any_active |= entry.active;
        }
        tracing::trace!(
            "scheduler tick dt={:.4} callbacks={} active={}",
            dt,
            self.entries.len(),
            any_active
        );
        any_active
    }

    /// Check if any callback reported activity on its last tick, or was woken since
    pub fn has_active_animations(&self) -> bool {
        self.entries
            .values()
            .any(|e| e.active || e.woken.load(Ordering::Acquire))
    }

    pub fn contains(&self, id: AnimationId) -> bool {
        self.entries.contains_key(id)
    }

    /// Number of registered callbacks
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for AnimationScheduler {
    fn default() -> Self {
        Self::new()
    }
}

/// Converts wall-clock instants into frame deltas
///
/// Deltas are clamped so a stalled host (backgrounded tab, debugger pause)
/// does not produce one huge simulation step.
#[derive(Clone, Debug)]
pub struct FrameClock {
    last_frame: Option<Instant>,
    max_dt: Duration,
}

impl FrameClock {
    pub fn new(max_dt: Duration) -> Self {
        Self {
            last_frame: None,
            max_dt,
        }
    }

    /// Delta in seconds since the previous call; `0.0` on the first call
    pub fn tick(&mut self, now: Instant) -> f32 {
        let dt = match self.last_frame {
            Some(last) => now.saturating_duration_since(last).min(self.max_dt),
            None => Duration::ZERO,
        };
        self.last_frame = Some(now);
        dt.as_secs_f32()
    }

    /// Forget the previous frame (e.g. after the loop went idle)
    pub fn reset(&mut self) {
        self.last_frame = None;
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(Duration::from_millis(100))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spring::{Spring, SpringConfig};
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_tick_drives_callbacks_until_idle() {
        let spring = Arc::new(Mutex::new(Spring::new(SpringConfig::new(210.0, 20.0, 1.0), 0.0)));
        spring.lock().unwrap().set_target(1.0);

        let mut scheduler = AnimationScheduler::new();
        let driven = spring.clone();
        scheduler.request(move |dt| driven.lock().unwrap().step(dt));

        let mut frames = 0;
        while scheduler.tick(1.0 / 60.0) {
            frames += 1;
            assert!(frames < 1_000);
        }

        assert!(!scheduler.has_active_animations());
        assert_eq!(spring.lock().unwrap().value(), 1.0);
    }

    #[test]
    fn test_cancel_stops_callback() {
        let calls = Arc::new(Mutex::new(0));
        let calls_clone = calls.clone();

        let mut scheduler = AnimationScheduler::new();
        let id = scheduler.request(move |_| {
            *calls_clone.lock().unwrap() += 1;
            true
        });

        scheduler.tick(0.016);
        assert!(scheduler.cancel(id));
        assert!(!scheduler.cancel(id));
        scheduler.tick(0.016);

        assert_eq!(*calls.lock().unwrap(), 1);
        assert!(scheduler.is_empty());
    }

    #[test]
    fn test_waker_marks_active_until_next_tick() {
        let mut scheduler = AnimationScheduler::new();
        let id = scheduler.request(|_| false);
        assert!(scheduler.has_active_animations());

        scheduler.tick(0.016);
        assert!(!scheduler.has_active_animations());

        let waker = scheduler.waker(id).unwrap();
        waker.wake();
        assert!(scheduler.has_active_animations());

        scheduler.tick(0.016);
        assert!(!scheduler.has_active_animations());

        scheduler.cancel(id);
        assert!(scheduler.waker(id).is_none());
        // Waking a cancelled callback is harmless
        waker.wake();
        assert!(!scheduler.has_active_animations());
    }

    #[test]
    fn test_frame_clock_clamps() {
        let start = Instant::now();
        let mut clock = FrameClock::new(Duration::from_millis(50));

        assert_eq!(clock.tick(start), 0.0);
        let dt = clock.tick(start + Duration::from_millis(16));
        assert!((dt - 0.016).abs() < 1e-6);
        let dt = clock.tick(start + Duration::from_secs(5));
        assert!((dt - 0.05).abs() < 1e-6);
    }
}
