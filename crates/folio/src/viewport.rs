//! The user's terminal as seen by the particle field: a viewport measured in page pixels.

use particle_field::{FieldError, FieldEvent, Viewport, ViewportSource};

/// How many events can be queued for the animation before the oldest are dropped.
const EVENT_CAPACITY: usize = 256;

/// The terminal's size and the events that change it, or that move the pointer.
///
/// Every terminal cell is `pixel_scale` page pixels wide and holds two vertically stacked pixels,
/// so a row is `2 × pixel_scale` page pixels tall.
#[derive(Debug, Clone)]
pub struct TerminalViewport {
    /// Where resizes, pointer moves and stops are sent.
    events: tokio::sync::broadcast::Sender<FieldEvent>,
    /// The most recently known size
    size: std::sync::Arc<std::sync::RwLock<Viewport>>,
    /// Page pixels per cell column
    pixel_scale: u32,
}

impl TerminalViewport {
    /// Instantiate with the terminal's current size in cells.
    #[must_use]
    pub fn new(columns: usize, rows: usize, pixel_scale: u32) -> Self {
        let (events, _) = tokio::sync::broadcast::channel(EVENT_CAPACITY);
        let pixel_scale = pixel_scale.max(1);
        Self {
            events,
            size: std::sync::Arc::new(std::sync::RwLock::new(Self::to_page_pixels(
                columns,
                rows,
                pixel_scale,
            ))),
            pixel_scale,
        }
    }

    /// Page pixels per cell column.
    #[must_use]
    pub const fn pixel_scale(&self) -> u32 {
        self.pixel_scale
    }

    /// The page-pixel size of a terminal of the given number of cells.
    #[must_use]
    pub fn to_page_pixels(columns: usize, rows: usize, pixel_scale: u32) -> Viewport {
        let cells = |count: usize| u32::try_from(count).unwrap_or(u32::MAX);
        Viewport::new(
            cells(columns).saturating_mul(pixel_scale),
            cells(rows).saturating_mul(pixel_scale).saturating_mul(2),
        )
    }

    /// The centre of a terminal cell in page pixels.
    #[must_use]
    pub fn cell_centre(&self, column: u16, row: u16) -> (f32, f32) {
        let scale = f32::from(u16::try_from(self.pixel_scale).unwrap_or(u16::MAX));
        (
            (f32::from(column) + 0.5) * scale,
            (f32::from(row) * 2.0 + 1.0) * scale,
        )
    }

    /// Send an event to whatever is animating. It's fine if nothing is listening.
    pub fn send(&self, event: FieldEvent) {
        if self.events.send(event).is_err() {
            tracing::trace!("Nothing listening for viewport event: {event:?}");
        }
    }

    /// The terminal changed size.
    pub fn resized(&self, columns: usize, rows: usize) {
        let viewport = Self::to_page_pixels(columns, rows, self.pixel_scale);
        match self.size.write() {
            Ok(mut size) => *size = viewport,
            Err(error) => tracing::error!("Couldn't record viewport size: {error:?}"),
        }

        tracing::debug!("Terminal resized to {columns}x{rows} ({viewport:?})");
        self.send(FieldEvent::Resize {
            width: viewport.width,
            height: viewport.height,
        });
    }
}

impl ViewportSource for TerminalViewport {
    fn size(&self) -> Result<Viewport, FieldError> {
        match self.size.read() {
            Ok(size) => Ok(*size),
            Err(error) => snafu::whatever!("Couldn't read viewport size: {error:?}"),
        }
    }

    fn subscribe(&self) -> tokio::sync::broadcast::Receiver<FieldEvent> {
        self.events.subscribe()
    }
}
