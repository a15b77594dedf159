//! Lumen Animation System
//!
//! Spring physics and frame scheduling.
//!
//! # Features
//!
//! - **Spring Physics**: RK4-integrated springs with stiffness, damping, mass
//! - **Interruptible**: Retargeting keeps the current value and velocity
//! - **Scheduling**: Per-frame callbacks driven by whatever loop the host has

pub mod scheduler;
pub mod spring;

pub use scheduler::{AnimationId, AnimationScheduler, AnimationWaker, FrameClock};
pub use spring::{Spring, SpringConfig};
