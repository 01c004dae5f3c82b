//! # Folio Core
//!
//! Headless application core for the folio portfolio app: state store with
//! observers, presentation stage, timed transition sequencer, bounded log
//! sink, performance metrics, audio cue model, and the controller facade
//! that wires them together.
//!
//! This crate contains no UI code. A surface crate (such as `folio-tui`)
//! constructs the [`Controller`], feeds it [`InputEvent`]s, receives
//! [`UiMessage`]s, and renders whatever the store and stage say.
//!
//! # Architecture
//!
//! ```text
//! surface input ──> Controller ──> Sequencer ──> Stage (timed classes)
//!                       │               │
//!                       │               └──> StateStore (view/index)
//!                       │                        │ observers
//!                       └──< UiMessage <─────────┘
//! ```
//!
//! The store is the only shared mutable state the surface should read for
//! logic; the stage describes presentation. Both sit behind
//! `Arc<parking_lot::Mutex>` and are safe to snapshot from the render loop.

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod audio;
pub mod catalog;
pub mod config;
pub mod controller;
pub mod events;
pub mod logsink;
pub mod messages;
pub mod metrics;
pub mod sequencer;
pub mod stage;
pub mod store;

pub use audio::{Cue, CuePlayer, DeviceClass, NullCuePlayer, RecordingCuePlayer};
pub use catalog::{Catalog, Project};
pub use config::{load_config, ConfigError, FolioConfig, TransitionTiming};
pub use controller::{Controller, Inspector};
pub use events::InputEvent;
pub use logsink::{LogEntry, LogLevel, LogSink};
pub use messages::UiMessage;
pub use metrics::{MeasureSummary, PerfMetrics};
pub use sequencer::{NavRequest, Sequencer, TransitionPlan};
pub use stage::{LayerSlot, Stage, StageTarget};
pub use store::{AppState, ObserverId, StateStore, Theme, Value, View};
