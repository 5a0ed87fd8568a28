//! The light/dark theme, remembered between visits.

use color_eyre::eyre::Result;
use particle_field::surface::rgba;
use particle_field::Colour;

use crate::page::classes::ClassList;
use crate::store::KeyValueStore;

/// The key under which the theme is stored.
pub const THEME_KEY: &str = "theme";

/// The class on the page's body that switches it to the light theme.
pub const LIGHT_MODE_CLASS: &str = "light-mode";

/// The two themes.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Mode {
    /// Light text on a dark background. The default.
    Dark,
    /// Dark text on a light background.
    Light,
}

impl Mode {
    /// The value that's stored for this mode.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
        }
    }

    /// The theme that the body's classes say is active.
    #[must_use]
    pub fn of(body: &ClassList) -> Self {
        if body.contains(LIGHT_MODE_CLASS) {
            Self::Light
        } else {
            Self::Dark
        }
    }

    /// The colours used to draw the page in this mode.
    #[must_use]
    pub fn scheme(self) -> Scheme {
        match self {
            Self::Dark => Scheme {
                background: rgba((10, 10, 15), 1.0),
                text: rgba((232, 232, 237), 1.0),
                muted: rgba((150, 150, 160), 1.0),
                accent: rgba((0, 102, 255), 1.0),
            },
            Self::Light => Scheme {
                background: rgba((245, 245, 247), 1.0),
                text: rgba((26, 26, 31), 1.0),
                muted: rgba((100, 100, 110), 1.0),
                accent: rgba((0, 82, 204), 1.0),
            },
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.as_str())
    }
}

/// The colours of a theme.
#[derive(Debug, Copy, Clone, PartialEq)]
#[non_exhaustive]
pub struct Scheme {
    /// Behind everything
    pub background: Colour,
    /// Normal text
    pub text: Colour,
    /// Less important text
    pub muted: Colour,
    /// Titles and highlights
    pub accent: Colour,
}

/// Switches between the themes and remembers the choice.
pub struct Theme {
    /// Where the choice is remembered.
    store: Box<dyn KeyValueStore + Send>,
    /// Whether there's a control for switching themes. The remembered theme is still applied
    /// without one.
    has_toggle: bool,
}

impl Theme {
    /// Instantiate with a control for switching themes.
    #[must_use]
    pub fn new(store: Box<dyn KeyValueStore + Send>) -> Self {
        Self {
            store,
            has_toggle: true,
        }
    }

    /// Instantiate without a control for switching themes: the remembered theme is applied but
    /// can't be changed.
    #[must_use]
    pub fn without_toggle(store: Box<dyn KeyValueStore + Send>) -> Self {
        Self {
            store,
            has_toggle: false,
        }
    }

    /// Apply the remembered theme to the page's body.
    pub fn load(&self, body: &mut ClassList) {
        if self.store.get(THEME_KEY).as_deref() == Some(Mode::Light.as_str()) {
            body.add(LIGHT_MODE_CLASS);
        }
        tracing::debug!("Loaded {} theme", Mode::of(body));
    }

    /// Switch to the other theme and remember it. Does nothing when there's no toggle control.
    ///
    /// # Errors
    /// When the choice can't be saved.
    pub fn toggle(&mut self, body: &mut ClassList) -> Result<Mode> {
        if !self.has_toggle {
            tracing::debug!("No theme toggle, not toggling the theme");
            return Ok(Mode::of(body));
        }

        let is_light = body.toggle(LIGHT_MODE_CLASS);
        let mode = if is_light { Mode::Light } else { Mode::Dark };
        self.store.set(THEME_KEY, mode.as_str())?;
        tracing::debug!("Toggled theme to {mode}");
        Ok(mode)
    }
}

impl std::fmt::Debug for Theme {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("Theme")
            .field("has_toggle", &self.has_toggle)
            .finish()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::store::MemoryStore;

    fn theme(store: &MemoryStore) -> Theme {
        Theme::new(Box::new(store.clone()))
    }

    fn stored(store: &MemoryStore) -> Option<String> {
        store.get(THEME_KEY)
    }

    #[test]
    fn dark_by_default() {
        let store = MemoryStore::default();
        let mut body = ClassList::default();
        theme(&store).load(&mut body);
        assert_eq!(Mode::of(&body), Mode::Dark);
        assert_eq!(stored(&store), None);
    }

    #[test]
    fn stored_light_is_applied_on_load() {
        let mut store = MemoryStore::default();
        store.set(THEME_KEY, "light").unwrap();
        let mut body = ClassList::default();
        theme(&store).load(&mut body);
        assert!(body.contains(LIGHT_MODE_CLASS));
    }

    #[test]
    fn unknown_stored_values_are_dark() {
        let mut store = MemoryStore::default();
        store.set(THEME_KEY, "sepia").unwrap();
        let mut body = ClassList::default();
        theme(&store).load(&mut body);
        assert_eq!(Mode::of(&body), Mode::Dark);
    }

    #[test]
    fn toggle_stores_the_new_mode() {
        let store = MemoryStore::default();
        let mut body = ClassList::default();
        let mut theme = theme(&store);

        assert_eq!(theme.toggle(&mut body).unwrap(), Mode::Light);
        assert_eq!(stored(&store).as_deref(), Some("light"));
        assert!(body.contains(LIGHT_MODE_CLASS));

        assert_eq!(theme.toggle(&mut body).unwrap(), Mode::Dark);
        assert_eq!(stored(&store).as_deref(), Some("dark"));
        assert!(!body.contains(LIGHT_MODE_CLASS));
    }

    #[test]
    fn toggling_twice_restores_the_stored_value() {
        let mut store = MemoryStore::default();
        store.set(THEME_KEY, "light").unwrap();
        let mut body = ClassList::default();
        let mut theme = theme(&store);
        theme.load(&mut body);

        theme.toggle(&mut body).unwrap();
        theme.toggle(&mut body).unwrap();

        assert_eq!(stored(&store).as_deref(), Some("light"));
        let mut reloaded = ClassList::default();
        Theme::new(Box::new(store.clone())).load(&mut reloaded);
        assert_eq!(reloaded, body);
    }

    #[test]
    fn without_a_toggle_the_stored_theme_still_applies() {
        let mut store = MemoryStore::default();
        store.set(THEME_KEY, "light").unwrap();
        let mut body = ClassList::default();
        let mut theme = Theme::without_toggle(Box::new(store.clone()));

        theme.load(&mut body);
        assert_eq!(Mode::of(&body), Mode::Light);

        assert_eq!(theme.toggle(&mut body).unwrap(), Mode::Light);
        assert!(body.contains(LIGHT_MODE_CLASS));
        assert_eq!(stored(&store).as_deref(), Some("light"));
    }

    #[test]
    fn schemes_differ() {
        assert_ne!(Mode::Dark.scheme(), Mode::Light.scheme());
    }
}
