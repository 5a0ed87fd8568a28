//! What decides when the next frame is drawn.

/// The number of microseconds in a second.
pub const ONE_MICROSECOND: u64 = 1_000_000;

/// A source of frame ticks, like a display's refresh.
pub trait TickSource {
    /// Wait until the next frame is due. Returns the number of the frame, starting at 1, or
    /// `None` when there are no more frames to draw.
    fn next_frame(&mut self) -> impl std::future::Future<Output = Option<u64>> + Send;
}

/// Ticks in real time at a target frame rate.
#[derive(Debug)]
#[non_exhaustive]
pub struct FrameTicker {
    /// The target frame rate.
    pub frame_rate: u32,
    /// Stop after this many frames. Runs forever when `None`.
    pub limit: Option<u64>,
    /// The number of frames ticked so far.
    pub frame: u64,
    /// The time at which the previous frame was ticked.
    last_frame_tick: tokio::time::Instant,
}

impl FrameTicker {
    /// Instantiate
    #[must_use]
    pub fn new(frame_rate: u32, limit: Option<u64>) -> Self {
        Self {
            frame_rate: frame_rate.max(1),
            limit,
            frame: 0,
            last_frame_tick: tokio::time::Instant::now(),
        }
    }

    /// The time between frames.
    #[must_use]
    pub fn frame_duration(&self) -> std::time::Duration {
        let target = ONE_MICROSECOND.wrapping_div(self.frame_rate.into());
        std::time::Duration::from_micros(target)
    }
}

impl TickSource for FrameTicker {
    async fn next_frame(&mut self) -> Option<u64> {
        if self.limit.is_some_and(|limit| self.frame >= limit) {
            return None;
        }

        if let Some(wait) = self
            .frame_duration()
            .checked_sub(self.last_frame_tick.elapsed())
        {
            tokio::time::sleep(wait).await;
        }
        self.last_frame_tick = tokio::time::Instant::now();
        self.frame += 1;
        Some(self.frame)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn frame_duration_from_rate() {
        let ticker = FrameTicker::new(50, None);
        assert_eq!(ticker.frame_duration(), std::time::Duration::from_millis(20));
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_are_paced_and_limited() {
        let mut ticker = FrameTicker::new(10, Some(3));
        let start = tokio::time::Instant::now();

        assert_eq!(ticker.next_frame().await, Some(1));
        assert_eq!(ticker.next_frame().await, Some(2));
        assert_eq!(ticker.next_frame().await, Some(3));
        assert_eq!(ticker.next_frame().await, None);

        assert!(start.elapsed() >= std::time::Duration::from_millis(300));
    }
}
