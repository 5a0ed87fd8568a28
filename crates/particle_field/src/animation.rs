//! The frame loop: ties the particle field to a surface, a tick source and a viewport.

use snafu::ensure;

use crate::errors::{AlreadyRunningSnafu, FieldError, NotRunningSnafu};
use crate::simulator::ParticleField;
use crate::surface::RenderSurface;
use crate::ticker::TickSource;
use crate::viewport::Viewport;

/// Notifications from the environment hosting the field.
#[derive(Debug, Copy, Clone, PartialEq)]
#[non_exhaustive]
pub enum FieldEvent {
    /// The viewport changed size
    Resize {
        /// New width in pixels
        width: u32,
        /// New height in pixels
        height: u32,
    },
    /// The pointer moved
    PointerMove {
        /// Pointer x in viewport pixels
        x: f32,
        /// Pointer y in viewport pixels
        y: f32,
    },
    /// Stop the animation after the current frame.
    Stop,
}

/// Whatever knows the size of the viewport and can tell us when it, or the pointer, changes.
pub trait ViewportSource {
    /// The current size of the viewport.
    ///
    /// # Errors
    /// When the size can't be queried.
    fn size(&self) -> Result<Viewport, FieldError>;

    /// Listen for resizes and pointer movements.
    fn subscribe(&self) -> tokio::sync::broadcast::Receiver<FieldEvent>;
}

/// The lifecycle of an animation.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum State {
    /// Constructed but never started.
    Uninitialised,
    /// Drawing frames.
    Running,
    /// Stopped, either explicitly or because the ticks ran out. Can be started again.
    Stopped,
}

/// An animated particle field.
pub struct Animation {
    /// The simulation being animated.
    pub field: ParticleField,
    /// Where we are in the lifecycle.
    state: State,
    /// Events from the viewport source, available once started.
    events: Option<tokio::sync::broadcast::Receiver<FieldEvent>>,
    /// The number of frames drawn since the last start.
    frames: u64,
}

impl Animation {
    /// Instantiate
    #[must_use]
    pub const fn new(field: ParticleField) -> Self {
        Self {
            field,
            state: State::Uninitialised,
            events: None,
            frames: 0,
        }
    }

    /// Where we are in the lifecycle.
    #[must_use]
    pub const fn state(&self) -> State {
        self.state
    }

    /// The number of frames drawn since the last start.
    #[must_use]
    pub const fn frames(&self) -> u64 {
        self.frames
    }

    /// Size everything to the viewport, fill the field with particles and start listening for
    /// viewport events. Starting a stopped animation re-initialises all the particles.
    ///
    /// # Errors
    /// When already running, or when the viewport's size can't be queried.
    pub fn start<V: ViewportSource, S: RenderSurface>(
        &mut self,
        source: &V,
        surface: &mut S,
    ) -> Result<(), FieldError> {
        ensure!(self.state != State::Running, AlreadyRunningSnafu);

        let viewport = source.size()?;
        self.events = Some(source.subscribe());
        self.resize(viewport, surface);
        self.field.init();
        self.frames = 0;
        self.state = State::Running;
        tracing::debug!("Particle field animation started");
        Ok(())
    }

    /// Stop drawing frames. A running `run()` returns before drawing its next frame.
    pub fn stop(&mut self) {
        if self.state == State::Running {
            tracing::debug!("Particle field animation stopped after {} frames", self.frames);
            self.state = State::Stopped;
        }
    }

    /// Draw frames for as long as the tick source produces them, or until stopped.
    ///
    /// Viewport events that arrive between frames are always handled before the next frame.
    ///
    /// # Errors
    /// When not started, or when the surface fails to present a frame.
    pub async fn run<S: RenderSurface, T: TickSource>(
        &mut self,
        surface: &mut S,
        ticker: &mut T,
    ) -> Result<u64, FieldError> {
        ensure!(self.state == State::Running, NotRunningSnafu);
        let mut events = self.events.take().ok_or(FieldError::NotRunning)?;

        let result = self.run_loop(surface, ticker, &mut events).await;
        self.events = Some(events);
        if result.is_err() {
            self.stop();
        }
        result.map(|()| self.frames)
    }

    /// The actual loop. Kept separate so that the event receiver can always be put back.
    async fn run_loop<S: RenderSurface, T: TickSource>(
        &mut self,
        surface: &mut S,
        ticker: &mut T,
        events: &mut tokio::sync::broadcast::Receiver<FieldEvent>,
    ) -> Result<(), FieldError> {
        #[expect(
            clippy::integer_division_remainder_used,
            reason = "This is caused by the `tokio::select!`"
        )]
        while self.state == State::Running {
            tokio::select! {
                biased;
                event = events.recv() => match event {
                    Ok(event) => self.handle_event(event, surface),
                    Err(tokio::sync::broadcast::error::RecvError::Lagged(missed)) => {
                        tracing::warn!("Missed {missed} viewport events");
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Closed) => {
                        tracing::debug!("Viewport source closed");
                        self.stop();
                    }
                },
                tick = ticker.next_frame() => match tick {
                    Some(_) => self.animate(surface)?,
                    None => self.stop(),
                },
            }
        }

        Ok(())
    }

    /// Draw and present a single frame.
    ///
    /// # Errors
    /// When the surface fails to present the frame.
    pub fn animate<S: RenderSurface>(&mut self, surface: &mut S) -> Result<(), FieldError> {
        self.field.frame(surface);
        surface.present()?;
        self.frames += 1;
        Ok(())
    }

    /// React to a notification from the viewport.
    pub fn handle_event<S: RenderSurface>(&mut self, event: FieldEvent, surface: &mut S) {
        tracing::trace!("Particle field received event: {event:?}");
        match event {
            FieldEvent::Resize { width, height } => {
                self.resize(Viewport::new(width, height), surface);
            }
            FieldEvent::PointerMove { x, y } => self.field.set_pointer(x, y),
            FieldEvent::Stop => self.stop(),
        }
    }

    /// Keep the field and the surface the same size.
    fn resize<S: RenderSurface>(&mut self, viewport: Viewport, surface: &mut S) {
        self.field.resize(viewport);
        surface.resize(viewport);
    }
}
