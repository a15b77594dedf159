//! Lumen Core Runtime
//!
//! Foundational primitives shared by the Lumen widgets:
//!
//! - **State Machines**: typed flat state machines with guarded transitions
//! - **Gestures**: press streams resolved into single and double clicks
//!
//! # Example
//!
//! ```rust
//! use lumen_core::fsm::StateMachine;
//!
//! #[derive(Clone, Copy, Debug, PartialEq, Eq)]
//! enum Light { Off, On }
//!
//! #[derive(Clone, Copy, Debug, PartialEq, Eq)]
//! enum Flip { Press }
//!
//! let mut fsm = StateMachine::<Light, Flip, ()>::builder(Light::Off)
//!     .on(Light::Off, Flip::Press, Light::On)
//!     .on(Light::On, Flip::Press, Light::Off)
//!     .build();
//!
//! assert_eq!(fsm.send(Flip::Press, &()), Light::On);
//! ```

pub mod fsm;
pub mod gesture;

pub use fsm::{StateMachine, StateMachineBuilder, Transition};
pub use gesture::{Gesture, GestureRecognizer};
