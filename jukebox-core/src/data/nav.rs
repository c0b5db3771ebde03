use std::{fmt, str::FromStr, sync::Arc};

use serde::{Deserialize, Serialize};

use crate::error::Error;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum View {
    Dashboard,
    SongManager,
    Leaderboard,
    Auction,
}

impl View {
    pub const ALL: [View; 4] = [
        View::Dashboard,
        View::SongManager,
        View::Leaderboard,
        View::Auction,
    ];

    pub fn name(self) -> &'static str {
        match self {
            View::Dashboard => "dashboard",
            View::SongManager => "song-manager",
            View::Leaderboard => "leaderboard",
            View::Auction => "auction",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            View::Dashboard => "Dashboard",
            View::SongManager => "🎵 SONG MANAGER",
            View::Leaderboard => "Leaderboard",
            View::Auction => "Auction",
        }
    }

    pub fn element_id(self) -> &'static str {
        match self {
            View::Dashboard => "dashboard-view",
            View::SongManager => "song-manager-view",
            View::Leaderboard => "leaderboard-view",
            View::Auction => "auction-view",
        }
    }

    /// Theme a view forces when it is activated.
    pub fn theme(self) -> Option<Theme> {
        match self {
            View::SongManager => Some(Theme::pink()),
            _ => None,
        }
    }
}

impl Default for View {
    fn default() -> Self {
        Self::Dashboard
    }
}

impl FromStr for View {
    type Err = Error;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let wanted = name.trim();
        View::ALL
            .into_iter()
            .find(|view| view.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| Error::UnknownView(name.to_string()))
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A theme class token applied to the background layer, e.g. `theme-pink`.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Theme(Arc<str>);

impl Theme {
    const PREFIX: &'static str = "theme-";

    pub fn parse(name: &str) -> Result<Self, Error> {
        let token = name.trim();
        let suffix = token
            .strip_prefix(Self::PREFIX)
            .ok_or_else(|| Error::InvalidTheme(name.to_string()))?;
        let well_formed = !suffix.is_empty()
            && suffix
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
        if well_formed {
            Ok(Self(token.into()))
        } else {
            Err(Error::InvalidTheme(name.to_string()))
        }
    }

    pub fn default_theme() -> Self {
        Self("theme-default".into())
    }

    pub fn pink() -> Self {
        Self("theme-pink".into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_theme_class(class: &str) -> bool {
        class.starts_with(Self::PREFIX)
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::default_theme()
    }
}

impl TryFrom<String> for Theme {
    type Error = Error;

    fn try_from(name: String) -> Result<Self, Self::Error> {
        Self::parse(&name)
    }
}

impl From<Theme> for String {
    fn from(theme: Theme) -> Self {
        theme.0.to_string()
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Which top-level view is visible and which theme is applied. View and theme
/// change independently, except that some views force a theme on activation.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Navigator {
    active: View,
    theme: Theme,
}

impl Navigator {
    pub fn new(view: View, theme: Theme) -> Self {
        let mut nav = Self {
            active: View::default(),
            theme,
        };
        nav.activate_view(view);
        nav
    }

    pub fn active(&self) -> View {
        self.active
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn is_visible(&self, view: View) -> bool {
        self.active == view
    }

    /// Activates the view named `name`. On an unknown name nothing changes.
    pub fn activate(&mut self, name: &str) -> Result<View, Error> {
        let view = name.parse()?;
        self.activate_view(view);
        Ok(view)
    }

    pub fn activate_view(&mut self, view: View) {
        self.active = view;
        if let Some(theme) = view.theme() {
            self.theme = theme;
        }
    }

    pub fn apply_theme(&mut self, name: &str) -> Result<&Theme, Error> {
        self.theme = Theme::parse(name)?;
        Ok(&self.theme)
    }
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new(View::default(), Theme::default())
    }
}
