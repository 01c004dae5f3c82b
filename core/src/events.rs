//! Surface Input Events
//!
//! Everything a UI surface can ask of the controller. The surface maps its
//! raw input (key presses, pointer gestures) into these and sends them over
//! a channel; the core never sees raw terminal events.

use serde::{Deserialize, Serialize};

/// A user intention, as translated by the surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputEvent {
    /// Open the portfolio grid from home.
    OpenPortfolio,
    /// Open the detail panel for the 1-based project index.
    OpenProject(usize),
    /// Move from the open project to the next one.
    NextProject,
    /// Move from the open project to the previous one.
    PreviousProject,
    /// Close the detail panel back to the grid.
    BackToGrid,
    /// Close the grid back to home.
    BackToHome,
    /// Grid selection moved onto the 1-based project index.
    HoverProject(usize),
    /// Toggle audio cues on or off.
    ToggleSound,
    /// Toggle between the dark and light themes.
    ToggleTheme,
    /// Shut down.
    Quit,
}
