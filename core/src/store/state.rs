//! Typed Application State
//!
//! The fixed shape of the UI state. The store is seeded from
//! [`AppState::default`] and `reset()` returns to it; dynamic dot-path
//! access over the mirrored [`Value`] tree is reserved for generic tooling
//! (observers, the dev overlay).

use serde::{Deserialize, Serialize};

use super::value::Value;

/// Well-known state paths.
pub mod keys {
    /// Current view (`"home"`, `"portfolio"`, `"project"`).
    pub const VIEW: &str = "view";
    /// 1-based index of the open project; 0 when no project is open.
    pub const PROJECT_INDEX: &str = "project_index";
    /// Whether audio cues play.
    pub const SOUND_ENABLED: &str = "sound_enabled";
    /// Color theme (`"dark"`, `"light"`).
    pub const THEME: &str = "theme";
    /// Whether startup is still in progress.
    pub const LOADING: &str = "loading";
    /// Hero intro animation flag.
    pub const ANIM_HERO_INTRO: &str = "animations.hero_intro";
    /// Grid stagger animation flag.
    pub const ANIM_GRID_STAGGER: &str = "animations.grid_stagger";
    /// Reduced-motion flag; collapses transition delays to zero.
    pub const ANIM_REDUCED_MOTION: &str = "animations.reduced_motion";
}

/// The navigable views.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    /// Landing view.
    #[default]
    Home,
    /// Portfolio grid.
    Portfolio,
    /// Per-project detail panel.
    Project,
}

impl View {
    /// Stable name used in the state tree.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Portfolio => "portfolio",
            Self::Project => "project",
        }
    }

    /// Parse a stable name back into a view.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "home" => Some(Self::Home),
            "portfolio" => Some(Self::Portfolio),
            "project" => Some(Self::Project),
            _ => None,
        }
    }
}

/// Color theme.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Default dark palette.
    #[default]
    Dark,
    /// Light palette.
    Light,
}

impl Theme {
    /// Stable name used in the state tree.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
        }
    }

    /// Parse a stable name back into a theme.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "dark" => Some(Self::Dark),
            "light" => Some(Self::Light),
            _ => None,
        }
    }

    /// The other theme.
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }
}

/// Boolean animation flags.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimationFlags {
    /// Play the hero intro on the home view.
    pub hero_intro: bool,
    /// Stagger grid items as they appear.
    pub grid_stagger: bool,
    /// Collapse all transition delays to zero.
    pub reduced_motion: bool,
}

impl Default for AnimationFlags {
    fn default() -> Self {
        Self {
            hero_intro: true,
            grid_stagger: true,
            reduced_motion: false,
        }
    }
}

/// The full application state with its fixed defaults.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppState {
    /// Current view.
    pub view: View,
    /// 1-based open project index; 0 when no project is open.
    ///
    /// Meaningful only while `view == View::Project`.
    pub project_index: usize,
    /// Whether audio cues play.
    pub sound_enabled: bool,
    /// Color theme.
    pub theme: Theme,
    /// Whether startup is still in progress.
    pub loading: bool,
    /// Animation flags.
    pub animations: AnimationFlags,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            view: View::Home,
            project_index: 0,
            sound_enabled: true,
            theme: Theme::Dark,
            loading: false,
            animations: AnimationFlags::default(),
        }
    }
}

impl AppState {
    /// Mirror the typed state into a value tree for path access.
    #[must_use]
    pub fn to_value(&self) -> Value {
        let mut root = Value::map();
        root.set_path(keys::VIEW, Value::from(self.view.as_str()));
        root.set_path(keys::PROJECT_INDEX, Value::from(self.project_index));
        root.set_path(keys::SOUND_ENABLED, Value::from(self.sound_enabled));
        root.set_path(keys::THEME, Value::from(self.theme.as_str()));
        root.set_path(keys::LOADING, Value::from(self.loading));
        root.set_path(
            keys::ANIM_HERO_INTRO,
            Value::from(self.animations.hero_intro),
        );
        root.set_path(
            keys::ANIM_GRID_STAGGER,
            Value::from(self.animations.grid_stagger),
        );
        root.set_path(
            keys::ANIM_REDUCED_MOTION,
            Value::from(self.animations.reduced_motion),
        );
        root
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_contract() {
        let state = AppState::default();
        assert_eq!(state.view, View::Home);
        assert_eq!(state.project_index, 0);
        assert!(state.sound_enabled);
        assert_eq!(state.theme, Theme::Dark);
        assert!(!state.loading);
    }

    #[test]
    fn test_view_round_trip() {
        for view in [View::Home, View::Portfolio, View::Project] {
            assert_eq!(View::parse(view.as_str()), Some(view));
        }
        assert_eq!(View::parse("garage"), None);
    }

    #[test]
    fn test_to_value_mirrors_fields() {
        let value = AppState::default().to_value();
        assert_eq!(
            value.get_path(keys::VIEW).and_then(Value::as_str),
            Some("home")
        );
        assert_eq!(
            value.get_path(keys::ANIM_HERO_INTRO).and_then(Value::as_bool),
            Some(true)
        );
    }
}
