//! # Particle Field
//! A fixed-size field of softly glowing particles that drift around a 2D viewport, connect to
//! their neighbours with faint lines and get pushed away by the pointer.
//!
//! The simulation itself lives in [`ParticleField`]. It knows nothing about where it is being
//! drawn or what drives its frames: drawing goes through a [`RenderSurface`], frames come from a
//! [`TickSource`] and viewport changes from a [`ViewportSource`]. [`Animation`] ties them all
//! together with an explicit `start()`/`stop()` lifecycle.
//!
//! [`Canvas`] is a small software rasteriser implementing [`RenderSurface`], so that hosts
//! without a native 2D drawing API can still show the field.

#![expect(clippy::pub_use, reason = "How else are you supposed re-export??")]

pub mod animation;
pub mod canvas;
pub mod config;
pub mod errors;
pub mod particle;
pub mod simulator;
pub mod surface;
pub mod ticker;
pub mod viewport;

/// Helpers for driving the field deterministically, without a display or a real clock.
pub mod tests {
    pub mod helpers;
}

pub use animation::{Animation, FieldEvent, State, ViewportSource};
pub use canvas::Canvas;
pub use config::Config;
pub use errors::FieldError;
pub use particle::Particle;
pub use simulator::ParticleField;
pub use surface::{Colour, RadialGradient, RenderSurface};
pub use ticker::{FrameTicker, TickSource};
pub use viewport::{Pointer, Viewport};
