//! Editor color themes.
//!
//! The set is closed: the editing surface ships exactly these themes, so
//! an enum rather than a free-form string keeps the session invariant
//! ("always one of the known themes") in the type system.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::CoreError;

/// A visual theme for the editing surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Theme {
    #[default]
    VsDark,
    VsLight,
    GithubDark,
    Monokai,
    SolarizedDark,
}

impl Theme {
    /// Every theme, in menu order.
    pub const ALL: [Theme; 5] = [
        Theme::VsDark,
        Theme::VsLight,
        Theme::GithubDark,
        Theme::Monokai,
        Theme::SolarizedDark,
    ];

    /// Identifier used in the store and by the editing surface.
    pub fn id(self) -> &'static str {
        match self {
            Theme::VsDark => "vs-dark",
            Theme::VsLight => "vs-light",
            Theme::GithubDark => "github-dark",
            Theme::Monokai => "monokai",
            Theme::SolarizedDark => "solarized-dark",
        }
    }

    /// Human-readable name.
    pub fn label(self) -> &'static str {
        match self {
            Theme::VsDark => "VS Dark",
            Theme::VsLight => "VS Light",
            Theme::GithubDark => "GitHub Dark",
            Theme::Monokai => "Monokai",
            Theme::SolarizedDark => "Solarized Dark",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.id())
    }
}

impl FromStr for Theme {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Theme::ALL
            .into_iter()
            .find(|theme| theme.id() == s)
            .ok_or_else(|| CoreError::UnknownTheme(s.to_string()))
    }
}
