//! The whole page: its content, its theme and its scroll-driven behaviours.

use crate::page::classes::ClassList;
use crate::page::resume::{Layout, Resume};
use crate::page::scroll::{resolve_anchor, CardStyle, Header, RevealObserver, SmoothScroll};
use crate::page::theme::{Mode, Theme};

/// Things the user can do to the page.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PageEvent {
    /// Switch between the light and dark themes
    ToggleTheme,
    /// Scroll by a number of rows, negative is up
    ScrollRows(i32),
    /// Scroll by a number of screens, negative is up
    ScrollPages(i32),
    /// Smoothly scroll to the top
    ScrollToTop,
    /// Smoothly scroll to the bottom
    ScrollToBottom,
    /// Follow the link to the nth section
    Section(usize),
    /// Follow an in-page link, eg `#contact`
    Anchor(String),
}

/// The résumé page.
#[derive(Debug)]
#[non_exhaustive]
pub struct Page {
    /// The classes on the page's body
    pub body: ClassList,
    /// The page's header
    pub header: Header,
    /// Switches themes
    theme: Theme,
    /// Reveals sections as they scroll into view
    reveal: RevealObserver,
    /// The classes of each section
    sections: Vec<ClassList>,
    /// The content, laid out into rows
    layout: Layout,
    /// Where the page is scrolled to
    scroll: SmoothScroll,
    /// The height of the viewport in page pixels
    viewport_height: f32,
    /// When the page became ready
    ready_at: std::time::Instant,
    /// The time of the most recent step
    now: std::time::Instant,
}

impl Page {
    /// Lay out the page and apply the remembered theme.
    #[must_use]
    pub fn new(resume: &Resume, theme: Theme, row_height: f32) -> Self {
        let layout = Layout::new(resume, row_height);
        let mut body = ClassList::default();
        theme.load(&mut body);
        let now = std::time::Instant::now();
        tracing::debug!(
            "Page ready with {} sections and {} skill cards",
            layout.sections.len(),
            layout.card_count
        );

        Self {
            body,
            header: Header::default(),
            theme,
            reveal: RevealObserver::default(),
            sections: vec![ClassList::default(); layout.sections.len()],
            layout,
            scroll: SmoothScroll::default(),
            viewport_height: 0.0,
            ready_at: now,
            now,
        }
    }

    /// The content, laid out into rows.
    #[must_use]
    pub const fn layout(&self) -> &Layout {
        &self.layout
    }

    /// The active theme.
    #[must_use]
    pub fn mode(&self) -> Mode {
        Mode::of(&self.body)
    }

    /// How far down the page is scrolled, in page pixels.
    #[must_use]
    pub const fn scroll_offset(&self) -> f32 {
        self.scroll.offset()
    }

    /// When the page became ready.
    #[must_use]
    pub const fn ready_at(&self) -> std::time::Instant {
        self.ready_at
    }

    /// Has the section been scrolled into view yet?
    #[must_use]
    pub fn is_section_visible(&self, index: usize) -> bool {
        self.sections
            .get(index)
            .is_some_and(|classes| classes.contains(crate::page::scroll::VISIBLE_CLASS))
    }

    /// How the nth skill card currently looks.
    #[must_use]
    pub fn card_style(&self, index: usize) -> CardStyle {
        CardStyle::at(index, self.now.saturating_duration_since(self.ready_at))
    }

    /// The viewport changed height. The page can be scrolled past its end by the reveal
    /// margin, otherwise the last section could never be revealed.
    pub fn resize(&mut self, viewport_height: f32) {
        self.viewport_height = viewport_height;
        let overscroll = (-self.reveal.bottom_margin).max(0.0);
        self.scroll
            .set_max_offset(self.layout.height() - viewport_height + overscroll);
    }

    /// React to the user.
    pub fn handle(&mut self, event: PageEvent) {
        tracing::trace!("Page event: {event:?}");
        let row_height = self.layout.row_height;
        match event {
            PageEvent::ToggleTheme => {
                if let Err(error) = self.theme.toggle(&mut self.body) {
                    tracing::error!("Couldn't save theme: {error:?}");
                }
            }
            PageEvent::ScrollRows(rows) => self.scroll.scroll_by(signed_pixels(rows, row_height)),
            PageEvent::ScrollPages(pages) => {
                let page_height = (self.viewport_height - row_height).max(row_height);
                self.scroll.scroll_by(signed_pixels(pages, page_height));
            }
            PageEvent::ScrollToTop => self.scroll.scroll_to(0.0),
            PageEvent::ScrollToBottom => self.scroll.scroll_to(self.layout.height()),
            PageEvent::Section(index) => {
                if let Some(anchor) = self.layout.anchor(index) {
                    self.navigate(&anchor);
                }
            }
            PageEvent::Anchor(href) => {
                self.navigate(&href);
            }
        }
    }

    /// Smoothly scroll to the section that an in-page link points to. Returns whether the link
    /// led anywhere.
    pub fn navigate(&mut self, href: &str) -> bool {
        match resolve_anchor(href, self.layout.section_bounds()) {
            Some(bounds) => {
                tracing::debug!("Navigating to {href}");
                self.scroll.scroll_to(bounds.top);
                true
            }
            None => {
                tracing::debug!("No section for link {href}");
                false
            }
        }
    }

    /// Advance any animations to `now`: the smooth scroll, the header and the reveals.
    pub fn step(&mut self, now: std::time::Instant) {
        self.now = now;
        let offset = self.scroll.step();
        #[expect(
            clippy::float_cmp,
            reason = "Only interested in whether the offset changed at all"
        )]
        let has_scrolled = offset != self.header.last_scroll();
        if has_scrolled {
            self.header.on_scroll(offset);
        }

        for (classes, (_, bounds)) in self.sections.iter_mut().zip(self.layout.section_bounds()) {
            self.reveal
                .observe(classes, bounds, offset, self.viewport_height);
        }
    }
}

/// Multiply a signed count of something by its size in pixels.
fn signed_pixels(count: i32, size: f32) -> f32 {
    f32::from(i16::try_from(count).unwrap_or(if count < 0 { i16::MIN } else { i16::MAX })) * size
}
