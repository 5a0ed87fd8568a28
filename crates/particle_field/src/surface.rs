//! The drawing primitives that the particle field needs from whatever is displaying it.

use glam::Vec2;
use palette::WithAlpha as _;

use crate::errors::FieldError;
use crate::viewport::Viewport;

/// An sRGB colour with alpha, all components between 0.0 and 1.0.
pub type Colour = palette::Srgba<f32>;

/// Make a colour from 8-bit RGB components and a float opacity.
#[must_use]
pub fn rgba(rgb: (u8, u8, u8), opacity: f32) -> Colour {
    palette::Srgb::new(rgb.0, rgb.1, rgb.2)
        .into_format::<f32>()
        .with_alpha(opacity)
}

/// A gradient that fades from one colour at its centre to another at its radius.
#[derive(Debug, Copy, Clone, PartialEq)]
#[expect(
    clippy::exhaustive_structs,
    reason = "A radial gradient is fully described by these"
)]
pub struct RadialGradient {
    /// The distance from the centre at which the gradient reaches its outer colour.
    pub radius: f32,
    /// Colour at the centre
    pub inner: Colour,
    /// Colour at, and beyond, the radius
    pub outer: Colour,
}

impl RadialGradient {
    /// The colour of the gradient at the given distance from its centre.
    #[must_use]
    pub fn colour_at(&self, distance: f32) -> Colour {
        if self.radius <= 0.0 {
            return self.outer;
        }
        let amount = (distance / self.radius).clamp(0.0, 1.0);
        let lerp = |from: f32, to: f32| (to - from).mul_add(amount, from);
        Colour::new(
            lerp(self.inner.red, self.outer.red),
            lerp(self.inner.green, self.outer.green),
            lerp(self.inner.blue, self.outer.blue),
            lerp(self.inner.alpha, self.outer.alpha),
        )
    }
}

/// Anything that the particle field can be drawn on.
///
/// Coordinates are always in viewport pixels. It's up to the surface to map them to its own
/// resolution.
pub trait RenderSurface {
    /// Wipe the whole surface to transparent.
    fn clear(&mut self);

    /// Fill a circle with a solid colour.
    fn draw_circle(&mut self, centre: Vec2, radius: f32, colour: Colour);

    /// Fill a circle with a radial gradient centred on the circle's centre. Note that the
    /// gradient's radius can be bigger than the circle, in which case the circle only shows the
    /// inner part of the gradient.
    fn draw_gradient_circle(&mut self, centre: Vec2, radius: f32, gradient: RadialGradient);

    /// Stroke a straight line.
    fn draw_line(&mut self, from: Vec2, to: Vec2, width: f32, colour: Colour);

    /// Change the size of the underlying buffer to match the viewport.
    fn resize(&mut self, viewport: Viewport);

    /// Called once all the drawing and physics for a frame is done. This is where a surface
    /// would show the frame to the user.
    ///
    /// # Errors
    /// When the frame can't be shown. Errors here end the animation.
    fn present(&mut self) -> Result<(), FieldError> {
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn particle_blue_from_bytes() {
        let colour = rgba((0, 102, 255), 0.5);
        assert!(colour.red.abs() < f32::EPSILON);
        assert!((colour.green - 0.4).abs() < 0.001);
        assert!((colour.blue - 1.0).abs() < f32::EPSILON);
        assert!((colour.alpha - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn gradient_fades_to_outer_colour() {
        let gradient = RadialGradient {
            radius: 6.0,
            inner: rgba((0, 102, 255), 0.3),
            outer: rgba((0, 102, 255), 0.0),
        };
        assert!((gradient.colour_at(0.0).alpha - 0.3).abs() < 0.0001);
        assert!((gradient.colour_at(3.0).alpha - 0.15).abs() < 0.0001);
        assert!(gradient.colour_at(6.0).alpha.abs() < 0.0001);
        assert!(gradient.colour_at(100.0).alpha.abs() < 0.0001);
    }
}
