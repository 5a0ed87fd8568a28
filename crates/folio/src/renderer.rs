//! Render the particle field and the page to the user's terminal

use color_eyre::eyre::Result;
use glam::Vec2;
use palette::WithAlpha as _;
use particle_field::canvas::source_over;
use particle_field::{Canvas, Colour, FieldError, RadialGradient, RenderSurface, Viewport};
use termwiz::surface::Surface as TermwizSurface;
use termwiz::surface::{Change as TermwizChange, Position as TermwizPosition};
use termwiz::terminal::buffered::BufferedTerminal;
use termwiz::terminal::{ScreenSize, Terminal as TermwizTerminal};

use crate::page::resume::RowKind;
use crate::page::theme::Scheme;
use crate::page::view::{Page, PageEvent};
use crate::viewport::TerminalViewport;

/// The number of columns between the edge of the terminal and the page's text.
const TEXT_INDENT: usize = 2;

/// How strongly the header is tinted with the accent colour once the page is scrolled.
const SCROLLED_HEADER_TINT: f32 = 0.25;

/// The particle field's drawing surface: a canvas that is shown in the terminal, with the page
/// on top, every time a frame is presented.
pub struct TerminalSurface<T: TermwizTerminal> {
    /// The particles are drawn here first
    canvas: Canvas,
    /// The user's actual terminal
    terminal: BufferedTerminal<T>,
    /// The résumé
    pub page: Page,
    /// Input meant for the page
    page_rx: tokio::sync::mpsc::UnboundedReceiver<PageEvent>,
    /// Told whenever the terminal changes size
    viewport: TerminalViewport,
}

impl<T: TermwizTerminal> TerminalSurface<T> {
    /// Take over the user's terminal: raw mode, alternate screen and no cursor.
    pub fn new(
        mut terminal: T,
        page: Page,
        page_rx: tokio::sync::mpsc::UnboundedReceiver<PageEvent>,
        viewport: TerminalViewport,
    ) -> Result<Self> {
        tracing::debug!("Putting user's terminal into raw mode");
        terminal.set_raw_mode()?;
        terminal.enter_alternate_screen()?;
        let mut composited_terminal = BufferedTerminal::new(terminal)?;
        composited_terminal.add_change(TermwizChange::CursorVisibility(
            termwiz::surface::CursorVisibility::Hidden,
        ));

        let scale = f32::from(u16::try_from(viewport.pixel_scale()).unwrap_or(u16::MAX));
        Ok(Self {
            canvas: Canvas::new(scale),
            terminal: composited_terminal,
            page,
            page_rx,
            viewport,
        })
    }

    /// Give the user their terminal back.
    pub fn restore(&mut self) -> Result<()> {
        tracing::debug!("Setting user's terminal to cooked mode");
        self.terminal
            .add_change(TermwizChange::CursorVisibility(
                termwiz::surface::CursorVisibility::Visible,
            ));
        self.terminal.flush()?;
        self.terminal.terminal().exit_alternate_screen()?;
        self.terminal.terminal().set_cooked_mode()?;
        Ok(())
    }

    /// Get the user's current terminal size and propogate it
    fn handle_resize(&mut self) -> Result<()> {
        let is_resized = self.terminal.check_for_resize()?;
        if !is_resized {
            return Ok(());
        }

        self.terminal.repaint()?;
        let (width, height) = self.terminal.dimensions();
        self.viewport.resized(width, height);
        Ok(())
    }

    /// Apply any input for the page that has arrived since the last frame.
    fn handle_page_events(&mut self) {
        while let Ok(event) = self.page_rx.try_recv() {
            self.page.handle(event);
        }
    }

    /// Do a single render to the user's actual terminal. It uses a diffing algorithm to make
    /// the minimum number of changes.
    fn render(&mut self) -> Result<()> {
        self.handle_resize()?;
        self.handle_page_events();
        self.page.step(std::time::Instant::now());

        let (width, height) = self.terminal.dimensions();
        let frame = compose(&self.canvas, &self.page, width, height);
        self.terminal.draw_from_screen(&frame, 0, 0);

        // This is where we actually render to the user's real terminal.
        self.terminal.flush()?;
        Ok(())
    }
}

impl<T: TermwizTerminal> RenderSurface for TerminalSurface<T> {
    fn clear(&mut self) {
        self.canvas.clear();
    }

    fn draw_circle(&mut self, centre: Vec2, radius: f32, colour: Colour) {
        self.canvas.draw_circle(centre, radius, colour);
    }

    fn draw_gradient_circle(&mut self, centre: Vec2, radius: f32, gradient: RadialGradient) {
        self.canvas.draw_gradient_circle(centre, radius, gradient);
    }

    fn draw_line(&mut self, from: Vec2, to: Vec2, width: f32, colour: Colour) {
        self.canvas.draw_line(from, to, width, colour);
    }

    fn resize(&mut self, viewport: Viewport) {
        self.canvas.resize(viewport);
        self.page.resize(viewport.max().y);
    }

    fn present(&mut self) -> Result<(), FieldError> {
        match self.render() {
            Ok(()) => Ok(()),
            Err(error) => snafu::whatever!("Couldn't render to the terminal: {error:?}"),
        }
    }
}

/// We need this just because I can't figure out how to pass `Box<dyn Terminal>` to
/// `BufferedTerminal::new()`
pub fn get_termwiz_terminal() -> Result<impl TermwizTerminal> {
    let capabilities = termwiz::caps::Capabilities::new_from_env()?;
    Ok(termwiz::terminal::new_terminal(capabilities)?)
}

/// Just for initialisation
pub fn get_users_tty_size() -> Result<ScreenSize> {
    let mut terminal = get_termwiz_terminal()?;
    Ok(terminal.get_screen_size()?)
}

/// Build a whole frame: the canvas as half-block "pixels" over the theme's background, with the
/// page's text on top.
#[must_use]
pub fn compose(canvas: &Canvas, page: &Page, width: usize, height: usize) -> TermwizSurface {
    let scheme = page.mode().scheme();
    let mut frame = TermwizSurface::new(width, height);

    for y in 0..height {
        for x in 0..width {
            let upper = pixel_over(canvas, x, y * 2, scheme.background);
            let lower = pixel_over(canvas, x, y * 2 + 1, scheme.background);
            add_cell(&mut frame, x, y, "▀", upper, lower, false);
        }
    }

    draw_page(&mut frame, canvas, page, &scheme, width, height);
    draw_header(&mut frame, canvas, page, &scheme, width);
    frame
}

/// A canvas pixel composited over the background. Missing pixels are just the background.
fn pixel_over(canvas: &Canvas, x: usize, y: usize, background: Colour) -> Colour {
    canvas
        .pixel(x, y)
        .map_or(background, |pixel| source_over(pixel, background))
}

/// The colour behind a cell of text: an even mix of the cell's two pixels.
fn cell_background(canvas: &Canvas, x: usize, y: usize, background: Colour) -> Colour {
    let upper = pixel_over(canvas, x, y * 2, background);
    let lower = pixel_over(canvas, x, y * 2 + 1, background);
    source_over(lower.with_alpha(0.5), upper)
}

/// Draw the visible rows of the page.
fn draw_page(
    frame: &mut TermwizSurface,
    canvas: &Canvas,
    page: &Page,
    scheme: &Scheme,
    width: usize,
    height: usize,
) {
    let layout = page.layout();
    let row_height = layout.row_height.max(1.0);
    let first_row = page_rows(page.scroll_offset() / row_height);

    for (index, row) in layout.rows.iter().enumerate().skip(first_row) {
        let Some(mut y) = index.checked_sub(first_row) else {
            continue;
        };
        if y >= height {
            break;
        }
        let is_hidden = row
            .section
            .is_some_and(|section| !page.is_section_visible(section));
        if is_hidden || row.text.is_empty() {
            continue;
        }

        let (colour, is_bold) = match row.kind {
            RowKind::Name | RowKind::Heading => (scheme.accent, true),
            RowKind::Summary => (scheme.muted, false),
            RowKind::Card(card) => {
                let style = page.card_style(card);
                if style.opacity <= 0.0 {
                    continue;
                }
                y += page_rows(style.offset / row_height);
                (scheme.text.with_alpha(style.opacity), false)
            }
            RowKind::Blank | RowKind::Title | RowKind::Text => (scheme.text, false),
        };
        if y >= height {
            continue;
        }

        let text = match row.kind {
            RowKind::Card(_) => format!("▪ {}", row.text),
            RowKind::Blank
            | RowKind::Name
            | RowKind::Title
            | RowKind::Summary
            | RowKind::Heading
            | RowKind::Text => row.text.clone(),
        };
        let line = Line {
            x: TEXT_INDENT,
            y,
            colour,
            is_bold,
            background: None,
        };
        draw_text(frame, canvas, scheme, &line, &text, width);
    }
}

/// Draw the fixed header along the top: the name and the numbered section links.
fn draw_header(
    frame: &mut TermwizSurface,
    canvas: &Canvas,
    page: &Page,
    scheme: &Scheme,
    width: usize,
) {
    let layout = page.layout();
    let links: Vec<String> = layout
        .rows
        .iter()
        .filter(|row| row.kind == RowKind::Heading)
        .take(9)
        .enumerate()
        .map(|(index, row)| format!("{} {}", index + 1, row.text))
        .collect();
    let text = format!("{}   t thème   q quitter", links.join("   "));

    let tint = page
        .header
        .is_scrolled()
        .then(|| source_over(scheme.accent.with_alpha(SCROLLED_HEADER_TINT), scheme.background));
    if let Some(tint) = tint {
        for x in 0..width {
            add_cell(frame, x, 0, " ", scheme.text, tint, false);
        }
    }
    let line = Line {
        x: TEXT_INDENT,
        y: 0,
        colour: scheme.muted,
        is_bold: false,
        background: tint,
    };
    draw_text(frame, canvas, scheme, &line, &text, width);
}

/// Where and how to write some text.
struct Line {
    /// The column of the first character
    x: usize,
    /// The row
    y: usize,
    /// Text colour, composited over whatever is behind it
    colour: Colour,
    /// Bold text
    is_bold: bool,
    /// A solid background, otherwise the particles show through
    background: Option<Colour>,
}

/// Write some text over whatever's already in the row.
fn draw_text(
    frame: &mut TermwizSurface,
    canvas: &Canvas,
    scheme: &Scheme,
    line: &Line,
    text: &str,
    width: usize,
) {
    for (offset, character) in text.chars().enumerate() {
        let x = line.x + offset;
        if x >= width {
            break;
        }
        let behind = line
            .background
            .unwrap_or_else(|| cell_background(canvas, x, line.y, scheme.background));
        let foreground = source_over(line.colour, behind);
        add_cell(
            frame,
            x,
            line.y,
            &character.to_string(),
            foreground,
            behind,
            line.is_bold,
        );
    }
}

/// Add a single cell to the frame
fn add_cell(
    frame: &mut TermwizSurface,
    x: usize,
    y: usize,
    character: &str,
    foreground: Colour,
    background: Colour,
    is_bold: bool,
) {
    let intensity = if is_bold {
        termwiz::cell::Intensity::Bold
    } else {
        termwiz::cell::Intensity::Normal
    };
    frame.add_changes(vec![
        TermwizChange::CursorPosition {
            x: TermwizPosition::Absolute(x),
            y: TermwizPosition::Absolute(y),
        },
        TermwizChange::Attribute(termwiz::cell::AttributeChange::Foreground(
            to_termwiz(foreground),
        )),
        TermwizChange::Attribute(termwiz::cell::AttributeChange::Background(
            to_termwiz(background),
        )),
        TermwizChange::Attribute(termwiz::cell::AttributeChange::Intensity(intensity)),
    ]);
    frame.add_change(character);
}

/// Convert our colour to a true colour terminal colour.
fn to_termwiz(colour: Colour) -> termwiz::color::ColorAttribute {
    termwiz::color::ColorAttribute::TrueColorWithDefaultFallback(termwiz::color::SrgbaTuple(
        colour.red,
        colour.green,
        colour.blue,
        colour.alpha,
    ))
}

/// Round a fractional number of rows to a whole, non-negative, number of rows.
#[expect(
    clippy::as_conversions,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "Negative and NaN values saturate to 0, which is what we want"
)]
fn page_rows(rows: f32) -> usize {
    rows.round() as usize
}
