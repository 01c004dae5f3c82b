//! Audio Cues
//!
//! Fire-and-forget sound feedback keyed by named cues. The core only models
//! the cue set and the player seam; a surface supplies the actual playback
//! (or none). Playback problems are expected; an implementation suppresses
//! them or records them at debug level, never louder.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::logsink::LogSink;

/// Named audio cues.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cue {
    /// Generic interaction click.
    Click,
    /// Soft hover tick (grid selection movement).
    HoverSoft,
    /// Sharper hover tick (selection hits an edge).
    HoverSharp,
    /// Page-flip forward (opening, next).
    PageForward,
    /// Page-flip backward (closing, previous).
    PageBack,
    /// Theme switch swoosh.
    ThemeChange,
}

impl Cue {
    /// Asset path for this cue on the given device class.
    #[must_use]
    pub fn asset(self, device: DeviceClass) -> &'static str {
        match (self, device) {
            (Self::Click, DeviceClass::Desktop) => "assets/audio/click.ogg",
            (Self::Click, DeviceClass::Mobile) => "assets/audio/mobile/click.ogg",
            (Self::HoverSoft, DeviceClass::Desktop) => "assets/audio/hover-soft.ogg",
            (Self::HoverSoft, DeviceClass::Mobile) => "assets/audio/mobile/hover-soft.ogg",
            (Self::HoverSharp, DeviceClass::Desktop) => "assets/audio/hover-sharp.ogg",
            (Self::HoverSharp, DeviceClass::Mobile) => "assets/audio/mobile/hover-sharp.ogg",
            (Self::PageForward, DeviceClass::Desktop) => "assets/audio/page-forward.ogg",
            (Self::PageForward, DeviceClass::Mobile) => "assets/audio/mobile/page-forward.ogg",
            (Self::PageBack, DeviceClass::Desktop) => "assets/audio/page-back.ogg",
            (Self::PageBack, DeviceClass::Mobile) => "assets/audio/mobile/page-back.ogg",
            (Self::ThemeChange, DeviceClass::Desktop) => "assets/audio/theme-change.ogg",
            (Self::ThemeChange, DeviceClass::Mobile) => "assets/audio/mobile/theme-change.ogg",
        }
    }
}

/// Coarse device class used to pick alternate cue assets.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceClass {
    /// Anything that does not look like a handheld.
    #[default]
    Desktop,
    /// Handheld device; uses the smaller alternate assets.
    Mobile,
}

impl DeviceClass {
    /// Classify by user-agent substring matching.
    #[must_use]
    pub fn from_user_agent(user_agent: &str) -> Self {
        const MOBILE_MARKERS: &[&str] = &["Android", "iPhone", "iPad", "Mobile"];
        if MOBILE_MARKERS
            .iter()
            .any(|marker| user_agent.contains(marker))
        {
            Self::Mobile
        } else {
            Self::Desktop
        }
    }
}

/// Playback seam supplied by the surface.
pub trait CuePlayer: Send + Sync {
    /// Play a cue, fire-and-forget. No-op while disabled.
    fn play(&self, cue: Cue);

    /// Enable or disable playback.
    fn set_enabled(&self, enabled: bool);

    /// Whether playback is enabled.
    fn is_enabled(&self) -> bool;
}

/// Player that discards every cue (headless operation).
pub struct NullCuePlayer {
    enabled: AtomicBool,
}

impl NullCuePlayer {
    /// Create a discarding player.
    #[must_use]
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled: AtomicBool::new(enabled),
        }
    }
}

impl CuePlayer for NullCuePlayer {
    fn play(&self, cue: Cue) {
        if self.enabled.load(Ordering::Relaxed) {
            tracing::debug!(?cue, "cue discarded (null player)");
        }
    }

    fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Relaxed);
    }

    fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }
}

/// Player that records played cues; used by tests and the dev overlay.
pub struct RecordingCuePlayer {
    enabled: AtomicBool,
    played: Mutex<Vec<Cue>>,
    log: Option<Arc<LogSink>>,
}

impl RecordingCuePlayer {
    /// Create a recording player.
    #[must_use]
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled: AtomicBool::new(enabled),
            played: Mutex::new(Vec::new()),
            log: None,
        }
    }

    /// Create a recording player that also debug-logs each cue.
    #[must_use]
    pub fn with_log(enabled: bool, log: Arc<LogSink>) -> Self {
        Self {
            enabled: AtomicBool::new(enabled),
            played: Mutex::new(Vec::new()),
            log: Some(log),
        }
    }

    /// Cues played so far, in order.
    #[must_use]
    pub fn played(&self) -> Vec<Cue> {
        self.played.lock().clone()
    }
}

impl CuePlayer for RecordingCuePlayer {
    fn play(&self, cue: Cue) {
        if !self.enabled.load(Ordering::Relaxed) {
            return;
        }
        if let Some(log) = &self.log {
            log.debug(&format!("cue: {cue:?}"));
        }
        self.played.lock().push(cue);
    }

    fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Relaxed);
    }

    fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }
}
