//! Visual parameters of the theme toggle icon
//!
//! The icon is a sun whose orb grows and gets eclipsed by a mask circle to
//! become a moon. Each scheme has one fixed [`VisualParameterSet`]; the
//! [`ToggleAnimation`] springs every channel toward the current preset.

use crate::scheme::ColorScheme;
use lumen_animation::{Spring, SpringConfig};

/// Spring used by the toggle: mass 1, tension 200, friction 30
pub const TOGGLE_SPRING: SpringConfig = SpringConfig::new(200.0, 30.0, 1.0);

/// Rest threshold for channels measured in px, percent or degrees
const GEOMETRY_PRECISION: f32 = 0.01;

/// Rest threshold for the 0..1 opacity channel
const OPACITY_PRECISION: f32 = 0.001;

/// Animatable parameters of the icon
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VisualParameterSet {
    /// Radius of the central orb
    pub orb_radius: f32,
    /// Center of the eclipsing mask circle, in percent of the icon box
    pub mask_center: (f32, f32),
    /// Rotation of the whole icon, in degrees
    pub rotation: f32,
    /// Opacity of the sun rays, 0 or 1 at rest
    pub ray_opacity: f32,
}

impl VisualParameterSet {
    /// Sun: small orb, mask parked in the corner, rays visible
    pub const LIGHT: Self = Self {
        orb_radius: 5.0,
        mask_center: (100.0, 0.0),
        rotation: 90.0,
        ray_opacity: 1.0,
    };

    /// Moon: large orb bitten by the mask, rays hidden
    pub const DARK: Self = Self {
        orb_radius: 9.0,
        mask_center: (50.0, 23.0),
        rotation: 40.0,
        ray_opacity: 0.0,
    };

    /// The preset for a scheme
    pub fn for_scheme(scheme: ColorScheme) -> Self {
        match scheme {
            ColorScheme::Light => Self::LIGHT,
            ColorScheme::Dark => Self::DARK,
        }
    }
}

/// Identifies one animated channel
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Channel {
    OrbRadius,
    MaskX,
    MaskY,
    Rotation,
    RayOpacity,
}

impl Channel {
    pub const ALL: [Channel; 5] = [
        Channel::OrbRadius,
        Channel::MaskX,
        Channel::MaskY,
        Channel::Rotation,
        Channel::RayOpacity,
    ];
}

/// Simulation state of one channel
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChannelState {
    pub value: f32,
    pub velocity: f32,
    pub target: f32,
}

/// Per-instance animation state: one spring per channel, shared config
#[derive(Clone, Debug)]
pub struct ToggleAnimation {
    orb_radius: Spring,
    mask_x: Spring,
    mask_y: Spring,
    rotation: Spring,
    ray_opacity: Spring,
}

impl ToggleAnimation {
    /// Create the animation at rest on `initial`
    pub fn new(config: SpringConfig, initial: VisualParameterSet) -> Self {
        let geometry = |value| Spring::new(config, value).with_precision(GEOMETRY_PRECISION);
        Self {
            orb_radius: geometry(initial.orb_radius),
            mask_x: geometry(initial.mask_center.0),
            mask_y: geometry(initial.mask_center.1),
            rotation: geometry(initial.rotation),
            ray_opacity: Spring::new(config, initial.ray_opacity)
                .with_precision(OPACITY_PRECISION),
        }
    }

    fn springs(&self) -> [&Spring; 5] {
        [
            &self.orb_radius,
            &self.mask_x,
            &self.mask_y,
            &self.rotation,
            &self.ray_opacity,
        ]
    }

    fn springs_mut(&mut self) -> [&mut Spring; 5] {
        [
            &mut self.orb_radius,
            &mut self.mask_x,
            &mut self.mask_y,
            &mut self.rotation,
            &mut self.ray_opacity,
        ]
    }

    /// Retarget all channels together
    ///
    /// Returns `true` if any channel's target changed. Unchanged targets leave
    /// their channels untouched; changed ones continue from their current
    /// value and velocity.
    pub fn retarget(&mut self, target: VisualParameterSet) -> bool {
        let targets = [
            target.orb_radius,
            target.mask_center.0,
            target.mask_center.1,
            target.rotation,
            target.ray_opacity,
        ];
        let mut changed = false;
        for (spring, value) in self.springs_mut().into_iter().zip(targets) {
            changed |= spring.set_target(value);
        }
        changed
    }

    /// Advance every channel by `dt` seconds; returns `true` while any moves
    pub fn advance(&mut self, dt: f32) -> bool {
        let mut moving = false;
        for spring in self.springs_mut() {
            moving |= spring.step(dt);
        }
        moving
    }

    /// Whether every channel rests on its target
    pub fn is_settled(&self) -> bool {
        self.springs().iter().all(|s| s.is_settled())
    }

    /// Current (possibly mid-flight) values
    pub fn frame(&self) -> VisualParameterSet {
        VisualParameterSet {
            orb_radius: self.orb_radius.value(),
            mask_center: (self.mask_x.value(), self.mask_y.value()),
            rotation: self.rotation.value(),
            ray_opacity: self.ray_opacity.value(),
        }
    }

    /// Values the channels are heading toward
    pub fn target(&self) -> VisualParameterSet {
        VisualParameterSet {
            orb_radius: self.orb_radius.target(),
            mask_center: (self.mask_x.target(), self.mask_y.target()),
            rotation: self.rotation.target(),
            ray_opacity: self.ray_opacity.target(),
        }
    }

    /// Simulation state of one channel
    pub fn channel(&self, channel: Channel) -> ChannelState {
        let spring = match channel {
            Channel::OrbRadius => &self.orb_radius,
            Channel::MaskX => &self.mask_x,
            Channel::MaskY => &self.mask_y,
            Channel::Rotation => &self.rotation,
            Channel::RayOpacity => &self.ray_opacity,
        };
        ChannelState {
            value: spring.value(),
            velocity: spring.velocity(),
            target: spring.target(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn test_presets_differ_on_every_channel() {
        let (light, dark) = (VisualParameterSet::LIGHT, VisualParameterSet::DARK);
        assert_ne!(light.orb_radius, dark.orb_radius);
        assert_ne!(light.mask_center.0, dark.mask_center.0);
        assert_ne!(light.mask_center.1, dark.mask_center.1);
        assert_ne!(light.rotation, dark.rotation);
        assert_ne!(light.ray_opacity, dark.ray_opacity);
    }

    #[test]
    fn test_new_animation_rests_on_initial() {
        let anim = ToggleAnimation::new(TOGGLE_SPRING, VisualParameterSet::DARK);
        assert!(anim.is_settled());
        assert_eq!(anim.frame(), VisualParameterSet::DARK);
    }

    #[test]
    fn test_all_channels_converge() {
        let mut anim = ToggleAnimation::new(TOGGLE_SPRING, VisualParameterSet::LIGHT);
        assert!(anim.retarget(VisualParameterSet::DARK));

        for _ in 0..600 {
            anim.advance(DT);
        }

        for channel in Channel::ALL {
            let state = anim.channel(channel);
            assert!(
                (state.value - state.target).abs() < 1e-3,
                "{channel:?} did not converge: {state:?}"
            );
            assert!(state.velocity.abs() < 1e-3);
        }
        assert!(anim.is_settled());
        assert_eq!(anim.frame(), VisualParameterSet::DARK);
    }

    #[test]
    fn test_retarget_same_preset_is_noop() {
        let mut anim = ToggleAnimation::new(TOGGLE_SPRING, VisualParameterSet::LIGHT);
        assert!(!anim.retarget(VisualParameterSet::LIGHT));
        assert!(!anim.advance(DT));
        assert_eq!(anim.frame(), VisualParameterSet::LIGHT);
    }

    #[test]
    fn test_interrupt_continues_from_current_state() {
        let mut anim = ToggleAnimation::new(TOGGLE_SPRING, VisualParameterSet::LIGHT);
        anim.retarget(VisualParameterSet::DARK);
        for _ in 0..6 {
            anim.advance(DT);
        }

        let before: Vec<ChannelState> = Channel::ALL.iter().map(|c| anim.channel(*c)).collect();
        anim.retarget(VisualParameterSet::LIGHT);
        let after: Vec<ChannelState> = Channel::ALL.iter().map(|c| anim.channel(*c)).collect();

        for (b, a) in before.iter().zip(&after) {
            assert_eq!(a.value, b.value);
            assert_eq!(a.velocity, b.velocity);
        }
        assert_eq!(anim.target(), VisualParameterSet::LIGHT);
    }
}
