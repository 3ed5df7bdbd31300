//! Glide tween: retargetable value transitions.
//!
//! The core is [`Transition`], a small state machine that animates one value
//! from `from` to `to` over a duration along an easing curve, driven frame by
//! frame by a [`Ticker`]. Its target can be changed while it runs and the
//! animation continues from the value currently shown, so interrupted motion
//! never jumps.
//!
//! On top of that sit:
//! - [`Tween`] implementations for `f64`, [`AttrValue`] and [`Attributes`]
//!   (numbers, color strings, discrete values and whole attribute sets)
//! - [`AttributeCoordinator`], which animates each key of a target's
//!   attributes with its own engine
//! - [`FrameScheduler`], a cooperative frame queue usable with a manual or a
//!   real-time clock

pub mod attributes;
pub mod color;
pub mod coordinator;
pub mod easing;
pub mod error;
pub mod scalar;
pub mod ticker;
pub mod transition;
pub mod types;

pub use attributes::{AttrValue, Attributes, AttributesTransition};
pub use coordinator::{AttributeCoordinator, AttributeTarget, CoordinatorOptions};
pub use easing::{Easing, EasingFunction};
pub use error::{Result, TweenError};
pub use ticker::{FrameScheduler, TickHandle, Ticker};
pub use transition::{Transition, Tween};
pub use types::TransitionId;
