use std::{fmt, str::FromStr, sync::Arc};

use serde::{Deserialize, Serialize};

use super::store::KeyValueStore;

pub const THEME_STORAGE_KEY: &str = "theme";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => anyhow::bail!("unknown theme {other:?}"),
        }
    }
}

/// A valid stored theme wins; otherwise the system colour-scheme preference decides.
pub fn initial_theme(store: &dyn KeyValueStore, prefers_dark: bool) -> Theme {
    match store.get(THEME_STORAGE_KEY).and_then(|v| v.parse().ok()) {
        Some(theme) => theme,
        None if prefers_dark => Theme::Dark,
        None => Theme::Light,
    }
}

pub struct ThemeToggle {
    theme: Theme,
    store: Arc<dyn KeyValueStore>,
}

impl ThemeToggle {
    pub fn new(store: Arc<dyn KeyValueStore>, prefers_dark: bool) -> Self {
        let theme = initial_theme(store.as_ref(), prefers_dark);
        Self { theme, store }
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn is_dark(&self) -> bool {
        self.theme == Theme::Dark
    }

    /// Flips the theme and persists the new value.
    pub fn toggle(&mut self) -> anyhow::Result<Theme> {
        let next = self.theme.flipped();
        self.store.set(THEME_STORAGE_KEY, next.as_str())?;
        self.theme = next;
        Ok(next)
    }

    pub fn aria_label(&self) -> &'static str {
        if self.is_dark() {
            "Switch to light mode"
        } else {
            "Switch to dark mode"
        }
    }

    pub fn label(&self) -> &'static str {
        if self.is_dark() {
            "Dark mode"
        } else {
            "Light mode"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::web::store::MemoryStore;

    #[test]
    fn stored_theme_beats_system_preference() {
        let store = MemoryStore::new();
        store.set(THEME_STORAGE_KEY, "light").unwrap();
        assert_eq!(initial_theme(&store, true), Theme::Light);
    }

    #[test]
    fn invalid_stored_value_falls_back_to_preference() {
        let store = MemoryStore::new();
        store.set(THEME_STORAGE_KEY, "sepia").unwrap();
        assert_eq!(initial_theme(&store, true), Theme::Dark);
        assert_eq!(initial_theme(&MemoryStore::new(), false), Theme::Light);
    }

    #[test]
    fn toggle_flips_and_persists() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let mut toggle = ThemeToggle::new(store.clone(), false);
        assert_eq!(toggle.label(), "Light mode");
        assert_eq!(toggle.aria_label(), "Switch to dark mode");

        assert_eq!(toggle.toggle().unwrap(), Theme::Dark);
        assert!(toggle.is_dark());
        assert_eq!(toggle.aria_label(), "Switch to light mode");
        assert_eq!(store.get(THEME_STORAGE_KEY).as_deref(), Some("dark"));

        assert_eq!(ThemeToggle::new(store, false).theme(), Theme::Dark);
    }
}
