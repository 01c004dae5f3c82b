//! Terminal Bell Cue Player
//!
//! The terminal has no sample playback, so audio cues degrade to the BEL
//! control character; the asset path the cue resolves to on the configured
//! device class is debug-logged so a sample-backed player can be checked
//! against the same trace. Hover ticks stay silent; a bell per selection
//! move would be obnoxious. Write failures are swallowed: losing a cue is
//! never worth surfacing.

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};

use folio_core::{Cue, CuePlayer, DeviceClass};

/// Cue player ringing the terminal bell for the page-level cues.
pub struct BellCuePlayer {
    enabled: AtomicBool,
    device: DeviceClass,
}

impl BellCuePlayer {
    /// Create a bell player resolving assets for `device`.
    #[must_use]
    pub fn new(enabled: bool, device: DeviceClass) -> Self {
        Self {
            enabled: AtomicBool::new(enabled),
            device,
        }
    }

    /// The device class assets resolve against.
    #[must_use]
    pub fn device(&self) -> DeviceClass {
        self.device
    }

    fn ring() {
        let mut out = std::io::stdout();
        if out.write_all(b"\x07").and_then(|()| out.flush()).is_err() {
            tracing::debug!("terminal bell write failed");
        }
    }
}

impl CuePlayer for BellCuePlayer {
    fn play(&self, cue: Cue) {
        if !self.enabled.load(Ordering::Relaxed) {
            return;
        }
        tracing::debug!(asset = cue.asset(self.device), "cue");
        match cue {
            Cue::Click | Cue::PageForward | Cue::PageBack | Cue::ThemeChange => Self::ring(),
            Cue::HoverSoft | Cue::HoverSharp => {}
        }
    }

    fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Relaxed);
    }

    fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }
}
