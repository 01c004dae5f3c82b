//! Controller-to-Surface Messages
//!
//! Secondary-effect notifications the controller pushes to the surface over
//! a tokio mpsc channel. The surface redraws from the store and stage; these
//! messages exist so it knows when to, and to carry the one user-facing
//! error path (the startup banner).

use serde::{Deserialize, Serialize};

use crate::store::{Theme, View};

/// A notification for the UI surface.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum UiMessage {
    /// The current view changed.
    ViewChanged {
        /// View now in effect.
        view: View,
        /// View before the change.
        previous: View,
    },
    /// The theme changed.
    ThemeChanged(Theme),
    /// Audio cues were toggled.
    SoundToggled(bool),
    /// A scheduled transition finished all of its actions.
    TransitionSettled,
    /// Unrecoverable startup failure; display and instruct a restart.
    ErrorBanner(String),
    /// Shut down the surface.
    Quit,
}
