//! A small software rasteriser for hosts that don't have a 2D drawing API of their own.
//!
//! The canvas can be lower resolution than the viewport: every canvas pixel covers a square of
//! `scale × scale` viewport pixels. Anything smaller than a canvas pixel is still drawn, as the
//! single pixel that its centre falls in, so that thin lines and tiny particles don't vanish.

use glam::Vec2;

use crate::surface::{Colour, RadialGradient, RenderSurface};
use crate::viewport::Viewport;

/// A completely transparent pixel.
#[must_use]
pub fn transparent() -> Colour {
    Colour::new(0.0, 0.0, 0.0, 0.0)
}

/// An RGBA pixel buffer.
#[derive(Debug, Clone)]
pub struct Canvas {
    /// The number of viewport pixels along each side of a canvas pixel.
    scale: f32,
    /// Width in canvas pixels
    width: usize,
    /// Height in canvas pixels
    height: usize,
    /// Row-major pixels
    pixels: Vec<Colour>,
}

impl Canvas {
    /// Instantiate an empty canvas. Call `resize()` to give it some pixels.
    #[must_use]
    pub fn new(scale: f32) -> Self {
        Self {
            scale: if scale > 0.0 { scale } else { 1.0 },
            width: 0,
            height: 0,
            pixels: Vec::new(),
        }
    }

    /// The size of the canvas in its own pixels.
    #[must_use]
    pub const fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// The number of viewport pixels along each side of a canvas pixel.
    #[must_use]
    pub const fn scale(&self) -> f32 {
        self.scale
    }

    /// The colour of the pixel at the given canvas coordinates.
    #[must_use]
    pub fn pixel(&self, x: usize, y: usize) -> Option<Colour> {
        if x >= self.width {
            return None;
        }
        self.pixels.get(y * self.width + x).copied()
    }

    /// Convert viewport coordinates to canvas coordinates.
    fn to_canvas(&self, point: Vec2) -> Vec2 {
        point / self.scale
    }

    /// Alpha-composite a colour over the pixel at the given canvas coordinates. Anything off the
    /// canvas is silently clipped.
    #[expect(
        clippy::as_conversions,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "Negative and out of range coordinates are checked for first"
    )]
    fn blend(&mut self, x: f32, y: f32, colour: Colour) {
        if x < 0.0 || y < 0.0 || colour.alpha <= 0.0 {
            return;
        }
        let (col, row) = (x as usize, y as usize);
        if col >= self.width || row >= self.height {
            return;
        }
        if let Some(pixel) = self.pixels.get_mut(row * self.width + col) {
            *pixel = source_over(colour, *pixel);
        }
    }

    /// Fill every pixel whose centre is within `radius` of `centre`, using a colour picked by
    /// distance. All units are canvas pixels.
    #[expect(
        clippy::as_conversions,
        clippy::cast_possible_truncation,
        clippy::cast_precision_loss,
        reason = "Bounding boxes are clamped to the canvas before converting"
    )]
    fn fill_circle<F: Fn(f32) -> Colour>(&mut self, centre: Vec2, radius: f32, colour_at: F) {
        if radius <= 0.0 {
            return;
        }
        let max_x = self.width as f32;
        let max_y = self.height as f32;
        let left = (centre.x - radius).floor().max(0.0) as i64;
        let right = (centre.x + radius).ceil().min(max_x) as i64;
        let top = (centre.y - radius).floor().max(0.0) as i64;
        let bottom = (centre.y + radius).ceil().min(max_y) as i64;

        let mut is_anything_drawn = false;
        for row in top..bottom {
            for col in left..right {
                let pixel_centre = Vec2::new(col as f32 + 0.5, row as f32 + 0.5);
                let distance = pixel_centre.distance(centre);
                if distance <= radius {
                    self.blend(pixel_centre.x, pixel_centre.y, colour_at(distance));
                    is_anything_drawn = true;
                }
            }
        }

        if !is_anything_drawn {
            self.blend(centre.x, centre.y, colour_at(0.0));
        }
    }
}

/// Porter-Duff "source over" compositing, in non-linear sRGB like a browser canvas.
#[must_use]
pub fn source_over(source: Colour, destination: Colour) -> Colour {
    let alpha = destination.alpha.mul_add(1.0 - source.alpha, source.alpha);
    if alpha <= 0.0 {
        return transparent();
    }
    let mix = |source_component: f32, destination_component: f32| {
        let destination_weight = destination.alpha * (1.0 - source.alpha);
        source_component.mul_add(source.alpha, destination_component * destination_weight) / alpha
    };
    Colour::new(
        mix(source.red, destination.red),
        mix(source.green, destination.green),
        mix(source.blue, destination.blue),
        alpha,
    )
}

impl RenderSurface for Canvas {
    fn clear(&mut self) {
        self.pixels.fill(transparent());
    }

    fn draw_circle(&mut self, centre: Vec2, radius: f32, colour: Colour) {
        let centre = self.to_canvas(centre);
        self.fill_circle(centre, radius / self.scale, |_| colour);
    }

    fn draw_gradient_circle(&mut self, centre: Vec2, radius: f32, gradient: RadialGradient) {
        let centre = self.to_canvas(centre);
        let scale = self.scale;
        self.fill_circle(centre, radius / scale, |distance| {
            gradient.colour_at(distance * scale)
        });
    }

    #[expect(
        clippy::as_conversions,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss,
        reason = "The number of steps is always a small positive number"
    )]
    fn draw_line(&mut self, from: Vec2, to: Vec2, width: f32, colour: Colour) {
        let start = self.to_canvas(from);
        let end = self.to_canvas(to);
        let delta = end - start;
        let steps = delta.x.abs().max(delta.y.abs()).ceil().max(1.0) as usize;
        let thickness = (width / self.scale).max(1.0);

        let mut previous: Option<(i64, i64)> = None;
        for step in 0..=steps {
            let point = start + delta * (step as f32 / steps as f32);
            let cell = (point.x.floor() as i64, point.y.floor() as i64);
            // Don't blend the same pixel twice in a row, it would look darker than the rest of
            // the line.
            if previous == Some(cell) {
                continue;
            }
            previous = Some(cell);
            if thickness > 1.0 {
                self.fill_circle(point, thickness / 2.0, |_| colour);
            } else {
                self.blend(point.x, point.y, colour);
            }
        }
    }

    #[expect(
        clippy::as_conversions,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss,
        reason = "Viewport dimensions are small positive numbers"
    )]
    fn resize(&mut self, viewport: Viewport) {
        self.width = (viewport.width as f32 / self.scale).ceil() as usize;
        self.height = (viewport.height as f32 / self.scale).ceil() as usize;
        self.pixels = vec![transparent(); self.width * self.height];
        tracing::trace!("Canvas resized to {}x{}", self.width, self.height);
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn blue() -> Colour {
        Colour::new(0.0, 0.4, 1.0, 1.0)
    }

    fn canvas(scale: f32, width: u32, height: u32) -> Canvas {
        let mut canvas = Canvas::new(scale);
        canvas.resize(Viewport::new(width, height));
        canvas
    }

    #[test]
    fn resize_rounds_up_to_whole_pixels() {
        let canvas = canvas(8.0, 801, 600);
        assert_eq!(canvas.dimensions(), (101, 75));
    }

    #[test]
    fn tiny_circle_still_shows_up() {
        let mut canvas = canvas(8.0, 80, 80);
        canvas.draw_circle(Vec2::new(20.0, 20.0), 1.0, blue());
        assert_eq!(canvas.pixel(2, 2), Some(blue()));
        assert_eq!(canvas.pixel(3, 3), Some(transparent()));
    }

    #[test]
    fn circle_covers_pixels_within_radius() {
        let mut canvas = canvas(1.0, 10, 10);
        canvas.draw_circle(Vec2::new(5.0, 5.0), 2.0, blue());
        assert_eq!(canvas.pixel(4, 4), Some(blue()));
        assert_eq!(canvas.pixel(5, 5), Some(blue()));
        assert_eq!(canvas.pixel(3, 4), Some(blue()));
        assert_eq!(canvas.pixel(2, 2), Some(transparent()));
        assert_eq!(canvas.pixel(8, 8), Some(transparent()));
    }

    #[test]
    fn drawing_off_canvas_is_clipped() {
        let mut canvas = canvas(1.0, 4, 4);
        canvas.draw_circle(Vec2::new(-10.0, -10.0), 2.0, blue());
        canvas.draw_line(Vec2::new(-5.0, 1.5), Vec2::new(10.0, 1.5), 0.5, blue());
        assert_eq!(canvas.pixel(0, 1), Some(blue()));
        assert_eq!(canvas.pixel(3, 1), Some(blue()));
        assert_eq!(canvas.pixel(0, 0), Some(transparent()));
        assert_eq!(canvas.pixel(4, 1), None);
    }

    #[test]
    fn translucent_colours_are_composited() {
        let mut canvas = canvas(1.0, 1, 1);
        let half_blue = Colour::new(0.0, 0.4, 1.0, 0.5);
        canvas.draw_circle(Vec2::new(0.5, 0.5), 0.1, half_blue);
        canvas.draw_circle(Vec2::new(0.5, 0.5), 0.1, half_blue);
        let pixel = canvas.pixel(0, 0).unwrap();
        assert!((pixel.alpha - 0.75).abs() < 0.0001);
        assert!((pixel.blue - 1.0).abs() < 0.0001);
    }

    #[test]
    fn line_pixels_are_only_blended_once() {
        let mut canvas = canvas(8.0, 80, 8);
        let faint = Colour::new(0.0, 0.4, 1.0, 0.1);
        canvas.draw_line(Vec2::new(0.0, 4.0), Vec2::new(79.0, 4.0), 0.5, faint);
        for x in 0..10 {
            let pixel = canvas.pixel(x, 0).unwrap();
            assert!((pixel.alpha - 0.1).abs() < 0.0001, "pixel {x}: {pixel:?}");
        }
    }

    #[test]
    fn clear_makes_everything_transparent() {
        let mut canvas = canvas(1.0, 2, 2);
        canvas.draw_circle(Vec2::new(1.0, 1.0), 5.0, blue());
        canvas.clear();
        assert_eq!(canvas.pixel(1, 1), Some(transparent()));
    }

    #[test]
    fn gradient_circle_is_strongest_in_the_middle() {
        let mut canvas = canvas(1.0, 20, 20);
        let gradient = RadialGradient {
            radius: 9.0,
            inner: Colour::new(0.0, 0.4, 1.0, 0.9),
            outer: Colour::new(0.0, 0.4, 1.0, 0.0),
        };
        canvas.draw_gradient_circle(Vec2::new(10.0, 10.0), 6.0, gradient);
        let middle = canvas.pixel(10, 10).unwrap().alpha;
        let edge = canvas.pixel(14, 10).unwrap().alpha;
        assert!(middle > edge);
        assert!(edge > 0.0);
        assert_eq!(canvas.pixel(18, 10), Some(transparent()));
    }
}
