//! Theme toggle control
//!
//! A light/dark/auto switch with three modes:
//!
//! - `Auto`: no stored override, the icon follows the ambient scheme
//! - `ManualLight` / `ManualDark`: an explicit override is stored
//!
//! Gestures:
//! - Click in `Auto` flips away from whatever ambient currently shows, so the
//!   first click always produces a visible change
//! - Click in a manual mode flips to the other manual mode
//! - Double click from any mode returns to `Auto`
//!
//! The control does not re-derive its state from its own gestures. Every
//! gesture goes through the shared store, and every store notification
//! (from this instance, another instance, or an external storage change)
//! resyncs the mode and retargets the icon animation.

use crate::ambient::{read_ambient, AmbientSource};
use crate::context::{InstanceId, ThemeContext};
use crate::markup::ToggleMarkup;
use crate::scheme::{ColorScheme, ThemePreference};
use crate::store::SubscriptionId;
use crate::visual::{Channel, ChannelState, ToggleAnimation, VisualParameterSet};
use lumen_animation::{AnimationId, AnimationScheduler, AnimationWaker};
use lumen_core::fsm::StateMachine;
use lumen_core::gesture::{Gesture, GestureRecognizer};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

/// Interaction mode of a toggle
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ToggleMode {
    Auto,
    ManualLight,
    ManualDark,
}

impl ToggleMode {
    pub fn from_preference(preference: ThemePreference) -> Self {
        match preference {
            ThemePreference::Auto => ToggleMode::Auto,
            ThemePreference::Light => ToggleMode::ManualLight,
            ThemePreference::Dark => ToggleMode::ManualDark,
        }
    }

    pub fn preference(self) -> ThemePreference {
        match self {
            ToggleMode::Auto => ThemePreference::Auto,
            ToggleMode::ManualLight => ThemePreference::Light,
            ToggleMode::ManualDark => ThemePreference::Dark,
        }
    }
}

/// Gesture state machine; guards see the ambient scheme sampled at gesture time
type ModeMachine = StateMachine<ToggleMode, Gesture, ColorScheme>;

fn mode_machine(initial: ToggleMode) -> ModeMachine {
    use ToggleMode::*;

    StateMachine::builder(initial)
        .on_if(Auto, Gesture::Click, ManualLight, |ambient: &ColorScheme| {
            ambient.is_dark()
        })
        .on_if(Auto, Gesture::Click, ManualDark, |ambient: &ColorScheme| {
            !ambient.is_dark()
        })
        .on(ManualLight, Gesture::Click, ManualDark)
        .on(ManualDark, Gesture::Click, ManualLight)
        .on(Auto, Gesture::DoubleClick, Auto)
        .on(ManualLight, Gesture::DoubleClick, Auto)
        .on(ManualDark, Gesture::DoubleClick, Auto)
        .build()
}

struct ToggleState {
    machine: ModeMachine,
    effective: ColorScheme,
    animation: ToggleAnimation,
    recognizer: GestureRecognizer,
    /// Wakes the frame callback once attached to a scheduler
    waker: Option<AnimationWaker>,
}

impl ToggleState {
    /// Resync with a preference and retarget the icon
    fn sync(&mut self, preference: ThemePreference, ambient: ColorScheme) {
        self.machine.force(ToggleMode::from_preference(preference));
        self.effective = preference.resolve(ambient);
        if self
            .animation
            .retarget(VisualParameterSet::for_scheme(self.effective))
        {
            tracing::debug!("theme toggle retargeted to {}", self.effective);
            if let Some(waker) = &self.waker {
                waker.wake();
            }
        }
    }
}

fn lock(state: &Mutex<ToggleState>) -> MutexGuard<'_, ToggleState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// One mounted theme toggle
///
/// Each instance owns its animation state and mask id; all instances on a
/// page share the [`ThemeContext`]. Dropping the toggle unsubscribes it and
/// frees its instance id; [`ThemeToggle::unmount`] additionally removes its
/// frame callback from a scheduler.
pub struct ThemeToggle {
    ctx: ThemeContext,
    instance: InstanceId,
    state: Arc<Mutex<ToggleState>>,
    subscription: Option<SubscriptionId>,
    frame_callback: Option<AnimationId>,
}

impl ThemeToggle {
    /// Mount a toggle; `label` distinguishes instances (e.g. "desktop")
    ///
    /// The icon starts at rest on the current effective scheme.
    pub fn mount(ctx: &ThemeContext, label: Option<&str>) -> Self {
        let instance = ctx.register_instance(label);
        let preference = ctx.preference();
        let effective = preference.resolve(ctx.ambient());
        let config = ctx.config();

        let state = Arc::new(Mutex::new(ToggleState {
            machine: mode_machine(ToggleMode::from_preference(preference)),
            effective,
            animation: ToggleAnimation::new(
                config.spring,
                VisualParameterSet::for_scheme(effective),
            ),
            recognizer: GestureRecognizer::new(config.double_click_ms),
            waker: None,
        }));

        let weak: Weak<Mutex<ToggleState>> = Arc::downgrade(&state);
        let ambient: Arc<dyn AmbientSource> = ctx.ambient_source();
        let subscription = ctx.store().subscribe(move |preference| {
            if let Some(state) = weak.upgrade() {
                lock(&state).sync(preference, read_ambient(ambient.as_ref()));
            }
        });

        tracing::debug!(
            "mounted theme toggle {} ({}, {})",
            instance.key(),
            preference,
            effective
        );

        Self {
            ctx: ctx.clone(),
            instance,
            state,
            subscription: Some(subscription),
            frame_callback: None,
        }
    }

    /// Register this toggle's per-frame update with a scheduler
    pub fn attach(&mut self, scheduler: &mut AnimationScheduler) -> AnimationId {
        if let Some(id) = self.frame_callback {
            if scheduler.contains(id) {
                return id;
            }
        }
        let weak = Arc::downgrade(&self.state);
        let id = scheduler.request(move |dt| match weak.upgrade() {
            Some(state) => lock(&state).animation.advance(dt),
            None => false,
        });
        lock(&self.state).waker = scheduler.waker(id);
        self.frame_callback = Some(id);
        id
    }

    /// Tear down: stop the frame callback, drop the subscription, free the id
    pub fn unmount(mut self, scheduler: &mut AnimationScheduler) {
        if let Some(id) = self.frame_callback.take() {
            scheduler.cancel(id);
        }
        lock(&self.state).waker = None;
        // Drop does the rest
    }

    /// Handle a recognized gesture
    ///
    /// Returns the mode after the gesture.
    pub fn handle_gesture(&self, gesture: Gesture) -> ToggleMode {
        let ambient = self.ctx.ambient();
        let mode = lock(&self.state).machine.send(gesture, &ambient);
        tracing::debug!(
            "theme toggle {}: {:?} -> {:?}",
            self.instance.key(),
            gesture,
            mode
        );
        // The store notifies every instance, this one included
        self.ctx.set_preference(mode.preference());
        mode
    }

    /// Feed a raw press; single clicks resolve later through [`Self::poll`]
    pub fn press(&self, now_ms: u64) -> Option<ToggleMode> {
        let gesture = lock(&self.state).recognizer.press(now_ms)?;
        Some(self.handle_gesture(gesture))
    }

    /// Resolve a pending single click whose double-click window has passed
    pub fn poll(&self, now_ms: u64) -> Option<ToggleMode> {
        let gesture = lock(&self.state).recognizer.poll(now_ms)?;
        Some(self.handle_gesture(gesture))
    }

    /// Advance the icon animation by `dt` seconds; `true` while it moves
    pub fn advance(&self, dt: f32) -> bool {
        lock(&self.state).animation.advance(dt)
    }

    pub fn mode(&self) -> ToggleMode {
        lock(&self.state).machine.current_state()
    }

    pub fn effective_theme(&self) -> ColorScheme {
        lock(&self.state).effective
    }

    pub fn is_animating(&self) -> bool {
        !lock(&self.state).animation.is_settled()
    }

    /// Current animated values
    pub fn frame(&self) -> VisualParameterSet {
        lock(&self.state).animation.frame()
    }

    /// Values the animation is heading toward
    pub fn target(&self) -> VisualParameterSet {
        lock(&self.state).animation.target()
    }

    pub fn channel(&self, channel: Channel) -> ChannelState {
        lock(&self.state).animation.channel(channel)
    }

    pub fn instance(&self) -> &InstanceId {
        &self.instance
    }

    pub fn mask_id(&self) -> &str {
        self.instance.mask_id()
    }

    /// Render the current frame as HTML
    pub fn render(&self) -> String {
        let (frame, mode) = {
            let state = lock(&self.state);
            (state.animation.frame(), state.machine.current_state())
        };
        let mode = match mode {
            ToggleMode::Auto => "auto",
            ToggleMode::ManualLight => "light",
            ToggleMode::ManualDark => "dark",
        };
        ToggleMarkup {
            frame,
            mask_id: self.instance.mask_id(),
            label: &self.ctx.config().label,
            mode,
        }
        .render()
    }
}

impl Drop for ThemeToggle {
    fn drop(&mut self) {
        if let Some(id) = self.subscription.take() {
            self.ctx.store().unsubscribe(id);
        }
        self.ctx.release_instance(&self.instance);
        tracing::debug!("unmounted theme toggle {}", self.instance.key());
    }
}
