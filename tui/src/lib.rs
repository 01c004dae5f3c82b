//! Folio TUI - Terminal surface for the folio portfolio app
//!
//! This crate is the composition root and display client: it constructs the
//! headless controller from `folio-core`, translates key presses into input
//! events, and renders the store/stage state with ratatui.
//!
//! # Architecture
//!
//! - **App**: event loop and input mapping
//! - **Views**: snapshot-based rendering of home/grid/detail
//! - **Theme**: dark/light palettes keyed by the core's theme state
//! - **Bell**: terminal-bell rendition of the audio cues

pub mod app;
pub mod bell;
pub mod theme;
pub mod views;

pub use app::App;
