//! Persisted light/dark preference.

use std::fmt;
use std::str::FromStr;

use tracing::{debug, warn};

use crate::config;
use crate::error::{Result, StoreError};
use crate::storage::Storage;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
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

    pub fn from_system(prefers_dark: bool) -> Self {
        if prefers_dark {
            Theme::Dark
        } else {
            Theme::Light
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn is_dark(self) -> bool {
        self == Theme::Dark
    }
}

impl FromStr for Theme {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(StoreError::InvalidArgument(format!(
                "Unknown theme: {}",
                other
            ))),
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sole writer of the `kwebstore-theme` key.
pub struct ThemeStore<S: Storage> {
    storage: S,
    theme: Theme,
}

impl<S: Storage> ThemeStore<S> {
    /// Load the saved theme, falling back to the system preference when
    /// nothing usable is stored. Loading never writes.
    pub fn open(storage: S, prefers_dark: bool) -> Self {
        let saved = match storage.get(config::THEME_STORAGE_KEY) {
            Ok(raw) => raw.and_then(|raw| raw.parse::<Theme>().ok()),
            Err(e) => {
                warn!(error = %e, "Failed to read saved theme, using system preference");
                None
            }
        };
        let theme = saved.unwrap_or_else(|| Theme::from_system(prefers_dark));
        debug!(%theme, from_storage = saved.is_some(), "Theme loaded");
        Self { storage, theme }
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Flip between light and dark and persist the new value.
    pub fn toggle(&mut self) -> Result<Theme> {
        self.set(self.theme.toggled())?;
        Ok(self.theme)
    }

    pub fn set(&mut self, theme: Theme) -> Result<()> {
        self.storage.set(config::THEME_STORAGE_KEY, theme.as_str())?;
        self.theme = theme;
        Ok(())
    }
}
