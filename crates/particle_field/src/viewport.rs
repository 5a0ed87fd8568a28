//! The area that particles live in and the pointer that disturbs them.

use glam::Vec2;

/// The size of the drawing area in pixels.
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq)]
#[expect(
    clippy::exhaustive_structs,
    reason = "It's very unlikely that this is going to have any more fields added to it"
)]
pub struct Viewport {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Viewport {
    /// Instantiate
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// The bottom-right corner, as a float vector.
    #[expect(
        clippy::as_conversions,
        clippy::cast_precision_loss,
        reason = "Viewports are never anywhere near 2^24 pixels wide"
    )]
    #[must_use]
    pub fn max(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }

    /// Is there any area to draw on?
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// The last known position of the pointer.
#[derive(Debug, Copy, Clone, PartialEq)]
#[non_exhaustive]
pub struct Pointer {
    /// `None` until the pointer has moved at least once. It is never reset afterwards, even when
    /// the pointer leaves the viewport.
    pub position: Option<Vec2>,
    /// The distance within which the pointer pushes particles away.
    pub radius: f32,
}

impl Pointer {
    /// Instantiate a pointer that hasn't been seen yet.
    #[must_use]
    pub const fn new(radius: f32) -> Self {
        Self {
            position: None,
            radius,
        }
    }

    /// Record a pointer movement.
    pub fn move_to(&mut self, x: f32, y: f32) {
        self.position = Some(Vec2::new(x, y));
    }
}
