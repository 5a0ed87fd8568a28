//! Everything that reacts to the page scrolling: the header, revealing sections, smooth
//! scrolling to anchors and the staggered entrance of the skill cards.

use crate::page::classes::ClassList;

/// Once scrolled further than this, in page pixels, the header changes style.
pub const SCROLLED_THRESHOLD: f32 = 100.0;

/// The class added to the header once the page is scrolled.
pub const SCROLLED_CLASS: &str = "scrolled";

/// The class added to a section once it has been revealed.
pub const VISIBLE_CLASS: &str = "visible";

/// The fraction of the remaining distance covered by each frame of a smooth scroll.
pub const SMOOTH_SCROLL_EASING: f32 = 0.2;

/// A smooth scroll snaps to its target when it gets this close, in page pixels.
const SMOOTH_SCROLL_SNAP: f32 = 0.5;

/// The delay between each skill card starting its entrance.
pub const CARD_STAGGER: std::time::Duration = std::time::Duration::from_millis(30);

/// How long a skill card's entrance takes.
pub const CARD_TRANSITION: std::time::Duration = std::time::Duration::from_millis(500);

/// How far below its resting place a skill card starts, in page pixels.
pub const CARD_START_OFFSET: f32 = 20.0;

/// The page's header.
#[derive(Debug, Default, Clone)]
#[non_exhaustive]
pub struct Header {
    /// The header's classes
    pub classes: ClassList,
    /// The scroll offset seen by the last scroll event.
    last_scroll: f32,
}

impl Header {
    /// React to the page being scrolled.
    pub fn on_scroll(&mut self, offset: f32) {
        if offset > SCROLLED_THRESHOLD {
            self.classes.add(SCROLLED_CLASS);
        } else {
            self.classes.remove(SCROLLED_CLASS);
        }
        self.last_scroll = offset;
    }

    /// Has the page been scrolled past the threshold?
    #[must_use]
    pub fn is_scrolled(&self) -> bool {
        self.classes.contains(SCROLLED_CLASS)
    }

    /// The offset of the most recent scroll.
    #[must_use]
    pub const fn last_scroll(&self) -> f32 {
        self.last_scroll
    }
}

/// Where a section is on the page, in page pixels.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
#[non_exhaustive]
pub struct Bounds {
    /// Distance from the top of the page
    pub top: f32,
    /// Height of the section
    pub height: f32,
}

impl Bounds {
    /// Instantiate
    #[must_use]
    pub const fn new(top: f32, height: f32) -> Self {
        Self { top, height }
    }
}

/// Reveals sections as they're scrolled into view. Like an intersection observer whose
/// callback reveals any section that's intersecting at all.
#[derive(Debug, Copy, Clone, PartialEq)]
#[non_exhaustive]
pub struct RevealObserver {
    /// Grows (or when negative, shrinks) the bottom of the viewport, in page pixels.
    pub bottom_margin: f32,
}

impl Default for RevealObserver {
    fn default() -> Self {
        Self {
            bottom_margin: -100.0,
        }
    }
}

impl RevealObserver {
    /// The fraction of a section that's within the (margin-adjusted) viewport.
    #[must_use]
    pub fn intersection_ratio(&self, bounds: Bounds, scroll: f32, viewport_height: f32) -> f32 {
        let root_top = scroll;
        let root_bottom = scroll + viewport_height + self.bottom_margin;
        let bottom = bounds.top + bounds.height;

        if bounds.height <= 0.0 {
            let is_inside = bounds.top >= root_top && bounds.top <= root_bottom;
            return if is_inside { 1.0 } else { 0.0 };
        }

        let visible = bottom.min(root_bottom) - bounds.top.max(root_top);
        (visible / bounds.height).clamp(0.0, 1.0)
    }

    /// Reveal the section if any of it is in view. Sections are never un-revealed. Returns
    /// whether the section is revealed.
    pub fn observe(
        &self,
        classes: &mut ClassList,
        bounds: Bounds,
        scroll: f32,
        viewport_height: f32,
    ) -> bool {
        let ratio = self.intersection_ratio(bounds, scroll, viewport_height);
        if ratio > 0.0 && !classes.contains(VISIBLE_CLASS) {
            tracing::trace!("Revealing section at {bounds:?}");
            classes.add(VISIBLE_CLASS);
        }
        classes.contains(VISIBLE_CLASS)
    }
}

/// The page's scroll position, with optional smooth scrolling towards a target.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
#[non_exhaustive]
pub struct SmoothScroll {
    /// The current offset from the top of the page
    offset: f32,
    /// The furthest that the page can be scrolled
    max_offset: f32,
    /// Where a smooth scroll is headed
    target: Option<f32>,
}

impl SmoothScroll {
    /// The current offset from the top of the page
    #[must_use]
    pub const fn offset(&self) -> f32 {
        self.offset
    }

    /// Where a smooth scroll is headed, if one is in progress.
    #[must_use]
    pub const fn target(&self) -> Option<f32> {
        self.target
    }

    /// Set how far the page can be scrolled, usually after the page or viewport changes size.
    pub fn set_max_offset(&mut self, max_offset: f32) {
        self.max_offset = max_offset.max(0.0);
        self.offset = self.clamp(self.offset);
        self.target = self.target.map(|target| self.clamp(target));
    }

    /// Jump by some distance. Cancels any smooth scroll.
    pub fn scroll_by(&mut self, distance: f32) {
        self.offset = self.clamp(self.offset + distance);
        self.target = None;
    }

    /// Jump straight to an offset. Cancels any smooth scroll.
    pub fn jump_to(&mut self, offset: f32) {
        self.offset = self.clamp(offset);
        self.target = None;
    }

    /// Start smoothly scrolling to an offset.
    pub fn scroll_to(&mut self, offset: f32) {
        self.target = Some(self.clamp(offset));
    }

    /// Advance a smooth scroll by one frame. Returns the new offset.
    pub fn step(&mut self) -> f32 {
        if let Some(target) = self.target {
            let remaining = target - self.offset;
            if remaining.abs() < SMOOTH_SCROLL_SNAP {
                self.offset = target;
                self.target = None;
            } else {
                self.offset += remaining * SMOOTH_SCROLL_EASING;
            }
        }
        self.offset
    }

    /// Keep an offset within the scrollable range.
    fn clamp(&self, offset: f32) -> f32 {
        offset.clamp(0.0, self.max_offset)
    }
}

/// The position of the section linked to by an in-page anchor like `#contact`.
#[must_use]
pub fn resolve_anchor<'section, I>(href: &str, sections: I) -> Option<Bounds>
where
    I: IntoIterator<Item = (&'section str, Bounds)>,
{
    let id = href.strip_prefix('#')?;
    if id.is_empty() {
        return None;
    }
    sections
        .into_iter()
        .find(|(section_id, _)| *section_id == id)
        .map(|(_, bounds)| bounds)
}

/// How a skill card looks at a moment during its entrance.
#[derive(Debug, Copy, Clone, PartialEq)]
#[non_exhaustive]
pub struct CardStyle {
    /// From 0.0 (invisible) to 1.0
    pub opacity: f32,
    /// How far below its resting place it is, in page pixels
    pub offset: f32,
}

impl CardStyle {
    /// The style of the card at `index`, `elapsed` after the page became ready.
    #[must_use]
    pub fn at(index: usize, elapsed: std::time::Duration) -> Self {
        let delay = CARD_STAGGER.saturating_mul(u32::try_from(index).unwrap_or(u32::MAX));
        let Some(running) = elapsed.checked_sub(delay) else {
            return Self::hidden();
        };
        let progress = (running.as_secs_f32() / CARD_TRANSITION.as_secs_f32()).min(1.0);
        let eased = ease(progress);
        Self {
            opacity: eased,
            offset: CARD_START_OFFSET * (1.0 - eased),
        }
    }

    /// Before the entrance has started.
    #[must_use]
    pub const fn hidden() -> Self {
        Self {
            opacity: 0.0,
            offset: CARD_START_OFFSET,
        }
    }
}

/// The standard "ease" timing curve: `cubic-bezier(0.25, 0.1, 0.25, 1.0)`.
fn ease(progress: f32) -> f32 {
    if progress <= 0.0 {
        return 0.0;
    }
    if progress >= 1.0 {
        return 1.0;
    }

    let bezier = |first: f32, second: f32, time: f32| {
        let inverse = 1.0 - time;
        3.0 * inverse * inverse * time * first + 3.0 * inverse * time * time * second
            + time * time * time
    };

    // The x curve is monotonic, so a bisection finds the time for this progress.
    let (mut low, mut high) = (0.0_f32, 1.0_f32);
    for _ in 0..24 {
        let middle = (low + high) / 2.0;
        if bezier(0.25, 0.25, middle) < progress {
            low = middle;
        } else {
            high = middle;
        }
    }
    bezier(0.1, 1.0, (low + high) / 2.0).clamp(0.0, 1.0)
}

#[cfg(test)]
mod test {
    use super::*;

    fn close(left: f32, right: f32) -> bool {
        (left - right).abs() < 0.001
    }

    #[test]
    fn header_changes_strictly_after_the_threshold() {
        let mut header = Header::default();
        header.on_scroll(100.0);
        assert!(!header.is_scrolled());
        header.on_scroll(100.5);
        assert!(header.is_scrolled());
        header.on_scroll(50.0);
        assert!(!header.is_scrolled());
        assert!(close(header.last_scroll(), 50.0));
    }

    #[test]
    fn sections_are_revealed_as_soon_as_they_intersect() {
        let observer = RevealObserver::default();
        let mut classes = ClassList::default();
        // Viewport is 0-600, less the margin is 0-500. The section is 500-1500.
        let bounds = Bounds::new(500.0, 1000.0);

        assert!(!observer.observe(&mut classes, bounds, 0.0, 600.0));
        assert!(!classes.contains(VISIBLE_CLASS));
        // 50px of 1000 visible
        assert!(close(observer.intersection_ratio(bounds, 50.0, 600.0), 0.05));
        assert!(observer.observe(&mut classes, bounds, 50.0, 600.0));
        assert!(classes.contains(VISIBLE_CLASS));
    }

    #[test]
    fn a_single_pixel_of_overlap_is_enough() {
        let observer = RevealObserver::default();
        let mut classes = ClassList::default();
        assert!(observer.observe(&mut classes, Bounds::new(500.0, 1000.0), 1.0, 600.0));
    }

    #[test]
    fn revealed_sections_stay_revealed() {
        let observer = RevealObserver::default();
        let mut classes = ClassList::default();
        let bounds = Bounds::new(0.0, 200.0);
        assert!(observer.observe(&mut classes, bounds, 0.0, 600.0));
        assert!(observer.observe(&mut classes, bounds, 5000.0, 600.0));
    }

    #[test]
    fn sections_above_the_viewport_are_not_revealed() {
        let observer = RevealObserver::default();
        let mut classes = ClassList::default();
        assert!(!observer.observe(&mut classes, Bounds::new(0.0, 100.0), 200.0, 600.0));
    }

    #[test]
    fn small_sections_are_revealed_when_fully_visible() {
        let observer = RevealObserver::default();
        assert!(close(
            observer.intersection_ratio(Bounds::new(100.0, 50.0), 0.0, 600.0),
            1.0
        ));
        assert!(close(
            observer.intersection_ratio(Bounds::new(480.0, 40.0), 0.0, 600.0),
            0.5
        ));
    }

    #[test]
    fn smooth_scroll_eases_and_snaps() {
        let mut scroll = SmoothScroll::default();
        scroll.set_max_offset(1000.0);
        scroll.scroll_to(100.0);

        assert!(close(scroll.step(), 20.0));
        assert!(close(scroll.step(), 36.0));
        for _ in 0..100 {
            scroll.step();
        }
        assert!(close(scroll.offset(), 100.0));
        assert_eq!(scroll.target(), None);
    }

    #[test]
    fn scrolling_is_clamped() {
        let mut scroll = SmoothScroll::default();
        scroll.set_max_offset(300.0);
        scroll.scroll_to(5000.0);
        assert_eq!(scroll.target(), Some(300.0));
        scroll.scroll_by(-50.0);
        assert!(close(scroll.offset(), 0.0));
        assert_eq!(scroll.target(), None);
        scroll.jump_to(400.0);
        assert!(close(scroll.offset(), 300.0));
        scroll.set_max_offset(-10.0);
        assert!(close(scroll.offset(), 0.0));
    }

    #[test]
    fn anchors_resolve_to_sections() {
        let sections = [
            ("about", Bounds::new(0.0, 100.0)),
            ("contact", Bounds::new(100.0, 50.0)),
        ];
        assert_eq!(
            resolve_anchor("#contact", sections),
            Some(Bounds::new(100.0, 50.0))
        );
        assert_eq!(resolve_anchor("#missing", sections), None);
        assert_eq!(resolve_anchor("#", sections), None);
        assert_eq!(resolve_anchor("contact", sections), None);
    }

    #[test]
    fn cards_enter_one_after_the_other() {
        let millis = std::time::Duration::from_millis;
        assert_eq!(CardStyle::at(0, millis(0)), CardStyle::hidden());
        assert_eq!(CardStyle::at(2, millis(59)), CardStyle::hidden());

        let started = CardStyle::at(2, millis(160));
        assert!(started.opacity > 0.0 && started.opacity < 1.0);
        assert!(started.offset > 0.0 && started.offset < CARD_START_OFFSET);

        let finished = CardStyle::at(2, millis(560));
        assert!(close(finished.opacity, 1.0));
        assert!(close(finished.offset, 0.0));
    }

    #[test]
    fn ease_curve_endpoints() {
        assert!(close(ease(0.0), 0.0));
        assert!(close(ease(1.0), 1.0));
        // "ease" gets most of the way there by half way.
        assert!(ease(0.5) > 0.75);
    }
}
