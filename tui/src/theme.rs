//! Theme and Colors
//!
//! Palettes for the dark and light themes. The core tracks which theme is
//! active (and mirrors it as a class on the root stage region); the surface
//! only picks the matching palette here.

use folio_core::Theme;
use ratatui::style::Color;

/// A full set of UI colors.
#[derive(Clone, Copy, Debug)]
pub struct Palette {
    /// Default background.
    pub background: Color,
    /// Default foreground text.
    pub text: Color,
    /// De-emphasized text (hints, metadata, mid-transition content).
    pub dim: Color,
    /// Accent for titles and the selected grid item.
    pub accent: Color,
    /// Secondary accent (stack tags, year).
    pub accent_soft: Color,
    /// Error banner foreground.
    pub error: Color,
    /// Status bar background.
    pub status_bg: Color,
}

// ============================================================================
// Dark Palette (default)
// ============================================================================

/// Dark theme palette.
pub const DARK: Palette = Palette {
    background: Color::Rgb(16, 18, 24),
    text: Color::Rgb(220, 222, 228),
    dim: Color::Rgb(110, 115, 128),
    accent: Color::Rgb(255, 179, 102),
    accent_soft: Color::Rgb(140, 190, 178),
    error: Color::Rgb(255, 95, 95),
    status_bg: Color::Rgb(28, 31, 40),
};

// ============================================================================
// Light Palette
// ============================================================================

/// Light theme palette.
pub const LIGHT: Palette = Palette {
    background: Color::Rgb(246, 244, 238),
    text: Color::Rgb(40, 42, 48),
    dim: Color::Rgb(150, 148, 140),
    accent: Color::Rgb(186, 92, 18),
    accent_soft: Color::Rgb(42, 199, 118),
    error: Color::Rgb(190, 30, 30),
    status_bg: Color::Rgb(230, 227, 218),
};

impl Palette {
    /// Palette matching a core theme.
    #[must_use]
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => DARK,
            Theme::Light => LIGHT,
        }
    }
}
