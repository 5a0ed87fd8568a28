//! Handle all the raw input directly from the end user.

use color_eyre::eyre::Result;
use particle_field::FieldEvent;
use termwiz::input::{InputEvent, KeyCode, KeyEvent, Modifiers, MouseButtons};

use crate::page::view::PageEvent;
use crate::viewport::TerminalViewport;

/// Bytes from STDIN
pub type BytesFromSTDIN = [u8; 128];

/// How many rows a single notch of the mouse wheel scrolls.
const WHEEL_ROWS: i32 = 3;

/// What an input event means to Folio.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum Action {
    /// Something for the particle field
    Field(FieldEvent),
    /// Something for the page
    Page(PageEvent),
}

/// Handle input from the user
pub struct Input {
    /// Pointer moves and quitting go to the particle field.
    viewport: TerminalViewport,
    /// Everything else goes to the page.
    page_tx: tokio::sync::mpsc::UnboundedSender<PageEvent>,
}

impl Input {
    /// Start a thread to listen and parse the end user's STDIN and forward it to the rest of the
    /// application.
    pub fn start(
        viewport: TerminalViewport,
        page_tx: tokio::sync::mpsc::UnboundedSender<PageEvent>,
    ) -> std::thread::JoinHandle<std::result::Result<(), color_eyre::eyre::Error>> {
        // The Tokio docs actually suggest using `std::thread` to listen on STDIN for interactive
        // applications.
        std::thread::spawn(move || -> Result<()> {
            let viewport_for_shutdown = viewport.clone();
            let input = Self { viewport, page_tx };
            let result = input.consume_stdin();
            if let Err(error) = result {
                viewport_for_shutdown.send(FieldEvent::Stop);
                return Err(error);
            }
            Ok(())
        })
    }

    /// Listen to the end user's STDIN and parse it into known mouse and keyboard events. Returns
    /// once the page stops listening.
    fn consume_stdin(&self) -> Result<()> {
        tracing::debug!("Starting to listen on STDIN");

        let stdin = std::io::stdin();
        self.consume(std::io::BufReader::new(stdin))
    }

    /// Parse input until the page stops listening or the input ends. The end of input stops
    /// the animation.
    fn consume<R: std::io::Read>(&self, mut reader: R) -> Result<()> {
        let mut parser = termwiz::input::InputParser::new();

        while !self.page_tx.is_closed() {
            let mut buffer: BytesFromSTDIN = [0; 128];
            match reader.read(&mut buffer[..]) {
                Ok(0) => {
                    tracing::debug!("STDIN closed");
                    self.viewport.send(FieldEvent::Stop);
                    break;
                }
                Ok(n) => {
                    if let Some(bytes) = buffer.get(0..n) {
                        tracing::trace!("Received STDIN input: {bytes:x?}");
                        parser.parse(bytes, |event| self.parsed_event_callback(&event), false);
                    } else {
                        tracing::warn!("Couldn't get bytes from STDIN input buffer");
                    }
                }
                Err(err) => {
                    return Err(color_eyre::eyre::Error::new(err));
                }
            }
        }

        tracing::debug!("Leaving STDIN loop");
        Ok(())
    }

    /// The callback for when the input parser detects known keyboard/mouse events.
    fn parsed_event_callback(&self, event: &InputEvent) {
        tracing::trace!("Parsed input event: {event:?}");
        match translate(event, &self.viewport) {
            Some(Action::Field(field_event)) => self.viewport.send(field_event),
            Some(Action::Page(page_event)) => {
                if let Err(error) = self.page_tx.send(page_event) {
                    tracing::debug!("Page isn't listening for input: {error:?}");
                }
            }
            None => (),
        }
    }
}

/// Work out what, if anything, an input event means.
#[must_use]
pub fn translate(event: &InputEvent, viewport: &TerminalViewport) -> Option<Action> {
    #[expect(
        clippy::wildcard_enum_match_arm,
        reason = "Only a handful of events are interesting"
    )]
    match event {
        InputEvent::Key(key) => translate_key(key),
        InputEvent::Mouse(mouse) => {
            let scroll_up = MouseButtons::VERT_WHEEL | MouseButtons::WHEEL_POSITIVE;
            if mouse.mouse_buttons == scroll_up {
                return Some(Action::Page(PageEvent::ScrollRows(-WHEEL_ROWS)));
            }
            if mouse.mouse_buttons == MouseButtons::VERT_WHEEL {
                return Some(Action::Page(PageEvent::ScrollRows(WHEEL_ROWS)));
            }

            // Mouse coordinates from the parser are 1-based.
            let (x, y) =
                viewport.cell_centre(mouse.x.saturating_sub(1), mouse.y.saturating_sub(1));
            Some(Action::Field(FieldEvent::PointerMove { x, y }))
        }
        _ => None,
    }
}

/// Work out what, if anything, a key press means.
fn translate_key(key: &KeyEvent) -> Option<Action> {
    let page = |event| Some(Action::Page(event));

    #[expect(
        clippy::wildcard_enum_match_arm,
        reason = "Most keys don't do anything"
    )]
    match key.key {
        KeyCode::Char('c') if key.modifiers.contains(Modifiers::CTRL) => {
            Some(Action::Field(FieldEvent::Stop))
        }
        KeyCode::Char('q') | KeyCode::Escape => Some(Action::Field(FieldEvent::Stop)),
        KeyCode::Char('t') => page(PageEvent::ToggleTheme),
        KeyCode::UpArrow | KeyCode::Char('k') => page(PageEvent::ScrollRows(-1)),
        KeyCode::DownArrow | KeyCode::Char('j') => page(PageEvent::ScrollRows(1)),
        KeyCode::PageUp => page(PageEvent::ScrollPages(-1)),
        KeyCode::PageDown | KeyCode::Char(' ') => page(PageEvent::ScrollPages(1)),
        KeyCode::Home => page(PageEvent::ScrollToTop),
        KeyCode::End => page(PageEvent::ScrollToBottom),
        KeyCode::Char(digit @ '1'..='9') => {
            let index = digit.to_digit(10)?.checked_sub(1)?;
            page(PageEvent::Section(usize::try_from(index).ok()?))
        }
        _ => None,
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn key(code: KeyCode, modifiers: Modifiers) -> InputEvent {
        InputEvent::Key(KeyEvent {
            key: code,
            modifiers,
        })
    }

    fn plain(code: KeyCode) -> Option<Action> {
        translate(&key(code, Modifiers::NONE), &TerminalViewport::new(80, 24, 8))
    }

    fn mouse(x: u16, y: u16, mouse_buttons: MouseButtons) -> Option<Action> {
        let event = InputEvent::Mouse(termwiz::input::MouseEvent {
            x,
            y,
            mouse_buttons,
            modifiers: Modifiers::NONE,
        });
        translate(&event, &TerminalViewport::new(80, 24, 8))
    }

    #[test]
    fn quitting() {
        let stop = Some(Action::Field(FieldEvent::Stop));
        assert_eq!(plain(KeyCode::Char('q')), stop);
        assert_eq!(plain(KeyCode::Escape), stop);
        assert_eq!(
            translate(
                &key(KeyCode::Char('c'), Modifiers::CTRL),
                &TerminalViewport::new(80, 24, 8)
            ),
            stop
        );
        assert_eq!(plain(KeyCode::Char('c')), None);
    }

    #[test]
    fn page_keys() {
        assert_eq!(
            plain(KeyCode::Char('t')),
            Some(Action::Page(PageEvent::ToggleTheme))
        );
        assert_eq!(
            plain(KeyCode::DownArrow),
            Some(Action::Page(PageEvent::ScrollRows(1)))
        );
        assert_eq!(
            plain(KeyCode::PageUp),
            Some(Action::Page(PageEvent::ScrollPages(-1)))
        );
        assert_eq!(
            plain(KeyCode::End),
            Some(Action::Page(PageEvent::ScrollToBottom))
        );
    }

    #[test]
    fn digits_link_to_sections() {
        assert_eq!(
            plain(KeyCode::Char('1')),
            Some(Action::Page(PageEvent::Section(0)))
        );
        assert_eq!(
            plain(KeyCode::Char('9')),
            Some(Action::Page(PageEvent::Section(8)))
        );
        assert_eq!(plain(KeyCode::Char('0')), None);
    }

    #[test]
    fn mouse_moves_the_pointer() {
        assert_eq!(
            mouse(11, 4, MouseButtons::NONE),
            Some(Action::Field(FieldEvent::PointerMove { x: 84.0, y: 56.0 }))
        );
    }

    #[test]
    fn end_of_input_stops_the_animation() {
        let viewport = TerminalViewport::new(80, 24, 8);
        let mut field_events = particle_field::ViewportSource::subscribe(&viewport);
        let (page_tx, mut page_rx) = tokio::sync::mpsc::unbounded_channel();
        let input = Input { viewport, page_tx };

        input.consume(&b"t"[..]).unwrap();

        assert_eq!(page_rx.try_recv().unwrap(), PageEvent::ToggleTheme);
        assert_eq!(field_events.try_recv().unwrap(), FieldEvent::Stop);
    }

    #[test]
    fn mouse_wheel_scrolls() {
        assert_eq!(
            mouse(1, 1, MouseButtons::VERT_WHEEL | MouseButtons::WHEEL_POSITIVE),
            Some(Action::Page(PageEvent::ScrollRows(-3)))
        );
        assert_eq!(
            mouse(1, 1, MouseButtons::VERT_WHEEL),
            Some(Action::Page(PageEvent::ScrollRows(3)))
        );
    }
}
