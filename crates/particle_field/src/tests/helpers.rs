//! Test helpers

use glam::Vec2;

use crate::animation::{FieldEvent, ViewportSource};
use crate::errors::FieldError;
use crate::surface::{Colour, RadialGradient, RenderSurface};
use crate::viewport::Viewport;

/// A single call made to a [`RecordingSurface`].
#[derive(Debug, Copy, Clone, PartialEq)]
#[non_exhaustive]
pub enum DrawCommand {
    /// `clear()`
    Clear,
    /// `draw_circle()`
    Circle {
        /// Centre
        centre: Vec2,
        /// Radius
        radius: f32,
        /// Colour
        colour: Colour,
    },
    /// `draw_gradient_circle()`
    GradientCircle {
        /// Centre
        centre: Vec2,
        /// Radius
        radius: f32,
        /// Gradient
        gradient: RadialGradient,
    },
    /// `draw_line()`
    Line {
        /// Start of the line
        from: Vec2,
        /// End of the line
        to: Vec2,
        /// Line width
        width: f32,
        /// Colour
        colour: Colour,
    },
    /// `resize()`
    Resize(Viewport),
    /// `present()`
    Present,
}

impl DrawCommand {
    /// A short name for the kind of command, useful for asserting on ordering.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Clear => "clear",
            Self::Circle { .. } => "circle",
            Self::GradientCircle { .. } => "gradient",
            Self::Line { .. } => "line",
            Self::Resize(_) => "resize",
            Self::Present => "present",
        }
    }
}

/// A surface that doesn't draw anything, it just remembers what it was asked to do.
#[derive(Default, Debug, Clone)]
#[non_exhaustive]
pub struct RecordingSurface {
    /// Every call, in order.
    pub commands: Vec<DrawCommand>,
    /// The number of times `present()` has been called.
    pub frames_presented: u64,
    /// Make `present()` fail on this frame.
    pub fail_on_frame: Option<u64>,
}

impl RecordingSurface {
    /// Only the commands since the most recent `clear()`.
    #[must_use]
    pub fn last_frame(&self) -> &[DrawCommand] {
        let start = self
            .commands
            .iter()
            .rposition(|command| matches!(command, DrawCommand::Clear))
            .unwrap_or(0);
        self.commands.get(start..).unwrap_or_default()
    }

    /// The number of commands of the given kind.
    #[must_use]
    pub fn count(&self, kind: &str) -> usize {
        self.commands
            .iter()
            .filter(|command| command.kind() == kind)
            .count()
    }
}

impl RenderSurface for RecordingSurface {
    fn clear(&mut self) {
        self.commands.push(DrawCommand::Clear);
    }

    fn draw_circle(&mut self, centre: Vec2, radius: f32, colour: Colour) {
        self.commands.push(DrawCommand::Circle {
            centre,
            radius,
            colour,
        });
    }

    fn draw_gradient_circle(&mut self, centre: Vec2, radius: f32, gradient: RadialGradient) {
        self.commands.push(DrawCommand::GradientCircle {
            centre,
            radius,
            gradient,
        });
    }

    fn draw_line(&mut self, from: Vec2, to: Vec2, width: f32, colour: Colour) {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            width,
            colour,
        });
    }

    fn resize(&mut self, viewport: Viewport) {
        self.commands.push(DrawCommand::Resize(viewport));
    }

    fn present(&mut self) -> Result<(), FieldError> {
        self.frames_presented += 1;
        self.commands.push(DrawCommand::Present);
        if self.fail_on_frame == Some(self.frames_presented) {
            snafu::whatever!("Presenting frame {} failed", self.frames_presented);
        }
        Ok(())
    }
}

/// A tick source that produces a fixed number of frames as fast as it's asked to.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct ManualTicker {
    /// Frames left to produce
    pub remaining: u64,
    /// Frames produced so far
    pub produced: u64,
}

impl ManualTicker {
    /// Instantiate
    #[must_use]
    pub const fn new(frames: u64) -> Self {
        Self {
            remaining: frames,
            produced: 0,
        }
    }
}

impl crate::ticker::TickSource for ManualTicker {
    async fn next_frame(&mut self) -> Option<u64> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        self.produced += 1;

        // Give any pending events a chance to be delivered, like a real display refresh would.
        tokio::task::yield_now().await;
        Some(self.produced)
    }
}

/// A viewport source whose size and events are controlled by the test.
#[non_exhaustive]
pub struct ScriptedViewport {
    /// The size reported by `size()`
    pub viewport: Viewport,
    /// Send events to all subscribers.
    pub events: tokio::sync::broadcast::Sender<FieldEvent>,
}

impl ScriptedViewport {
    /// Instantiate
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        let (events, _) = tokio::sync::broadcast::channel(64);
        Self {
            viewport: Viewport::new(width, height),
            events,
        }
    }

    /// Send an event to the animation.
    ///
    /// # Panics
    /// When nothing is subscribed.
    #[expect(clippy::expect_used, reason = "It's for use in tests only")]
    pub fn send(&self, event: FieldEvent) {
        self.events
            .send(event)
            .expect("No animation is subscribed to the viewport");
    }
}

impl ViewportSource for ScriptedViewport {
    fn size(&self) -> Result<Viewport, FieldError> {
        Ok(self.viewport)
    }

    fn subscribe(&self) -> tokio::sync::broadcast::Receiver<FieldEvent> {
        self.events.subscribe()
    }
}
