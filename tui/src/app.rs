//! Main Application
//!
//! The App struct manages the TUI lifecycle as a thin display client:
//! - Event loop (keyboard, resize)
//! - Controller from `folio-core` for all application logic
//! - Snapshot-based rendering from the core's store and stage
//!
//! The surface converts terminal events to `InputEvent`s, hands them to the
//! controller, and redraws when a `UiMessage` arrives or on the frame tick.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{Event, EventStream, KeyCode, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tokio::sync::mpsc;

use folio_core::{
    Catalog, Controller, CuePlayer, FolioConfig, InputEvent, Inspector, UiMessage, View,
};

use crate::bell::BellCuePlayer;
use crate::theme::Palette;
use crate::views::{self, Snapshot};

const FRAME_INTERVAL: Duration = Duration::from_millis(50);

/// What a key press should do, resolved against the current view.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum KeyAction {
    /// Forward an input event to the controller.
    Input(InputEvent),
    /// Move the grid selection by the given delta.
    MoveSelection(i64),
    /// Toggle the diagnostics overlay.
    ToggleOverlay,
    /// Nothing bound.
    None,
}

fn map_key(view: View, code: KeyCode, modifiers: KeyModifiers) -> KeyAction {
    if code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
        return KeyAction::Input(InputEvent::Quit);
    }
    match (view, code) {
        (_, KeyCode::Char('q')) => KeyAction::Input(InputEvent::Quit),
        (_, KeyCode::Char('t')) => KeyAction::Input(InputEvent::ToggleTheme),
        (_, KeyCode::Char('s')) => KeyAction::Input(InputEvent::ToggleSound),
        (_, KeyCode::F(12)) => KeyAction::ToggleOverlay,

        (View::Home, KeyCode::Enter) => KeyAction::Input(InputEvent::OpenPortfolio),

        (View::Portfolio, KeyCode::Up | KeyCode::Char('k')) => KeyAction::MoveSelection(-1),
        (View::Portfolio, KeyCode::Down | KeyCode::Char('j')) => KeyAction::MoveSelection(1),
        (View::Portfolio, KeyCode::Esc) => KeyAction::Input(InputEvent::BackToHome),

        (View::Project, KeyCode::Left) => KeyAction::Input(InputEvent::PreviousProject),
        (View::Project, KeyCode::Right) => KeyAction::Input(InputEvent::NextProject),
        (View::Project, KeyCode::Esc) => KeyAction::Input(InputEvent::BackToGrid),

        // Enter on the grid resolves against the selection, handled by App.
        _ => KeyAction::None,
    }
}

/// Main application state
pub struct App {
    controller: Controller,
    inspector: Inspector,
    ui_rx: mpsc::Receiver<UiMessage>,
    /// 1-based grid selection.
    selected: usize,
    running: bool,
    show_overlay: bool,
    banner: Option<String>,
}

impl App {
    /// Build the wired application from configuration.
    ///
    /// # Errors
    ///
    /// Fails when configuration is malformed or the controller cannot be
    /// constructed; the caller surfaces this once as the startup banner.
    pub fn new(config: FolioConfig) -> anyhow::Result<Self> {
        let player: Arc<dyn CuePlayer> =
            Arc::new(BellCuePlayer::new(config.sound_enabled, config.device));
        let (ui_tx, ui_rx) = mpsc::channel(64);
        let catalog = config
            .projects
            .clone()
            .map_or_else(Catalog::builtin, Catalog::new);
        let controller = Controller::new(config, catalog, player, ui_tx)?;
        let inspector = controller.inspector();
        Ok(Self {
            controller,
            inspector,
            ui_rx,
            selected: 1,
            running: true,
            show_overlay: false,
            banner: None,
        })
    }

    /// Main event loop
    pub async fn run(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> anyhow::Result<()> {
        let mut event_stream = EventStream::new();

        self.render(terminal)?;

        while self.running {
            tokio::select! {
                biased;

                maybe_event = event_stream.next() => {
                    if let Some(Ok(Event::Key(key))) = maybe_event {
                        if key.kind == KeyEventKind::Press {
                            self.handle_key(key.code, key.modifiers);
                        }
                    }
                }

                maybe_message = self.ui_rx.recv() => {
                    if let Some(message) = maybe_message {
                        self.handle_message(message);
                    }
                }

                () = tokio::time::sleep(FRAME_INTERVAL) => {}
            }

            self.render(terminal)?;
        }

        Ok(())
    }

    fn current_view(&self) -> View {
        self.controller.store().lock().view()
    }

    fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) {
        let view = self.current_view();

        // Enter on the grid needs the local selection.
        if view == View::Portfolio && code == KeyCode::Enter {
            self.controller
                .handle_event(InputEvent::OpenProject(self.selected));
            return;
        }

        match map_key(view, code, modifiers) {
            KeyAction::Input(event) => self.controller.handle_event(event),
            KeyAction::MoveSelection(delta) => self.move_selection(delta),
            KeyAction::ToggleOverlay => self.show_overlay = !self.show_overlay,
            KeyAction::None => {}
        }
    }

    // Selection stays clamped to the catalog; bumping the edge still plays
    // the sharp hover cue via the controller.
    fn move_selection(&mut self, delta: i64) {
        let len = self.controller.catalog().len();
        let target = i64::try_from(self.selected).unwrap_or(i64::MAX) + delta;
        if target >= 1 && target <= i64::try_from(len).unwrap_or(i64::MAX) {
            self.selected = usize::try_from(target).unwrap_or(self.selected);
        }
        let hover = usize::try_from(target.max(0)).unwrap_or(0);
        self.controller.handle_event(InputEvent::HoverProject(hover));
    }

    fn handle_message(&mut self, message: UiMessage) {
        match message {
            UiMessage::Quit => self.running = false,
            UiMessage::ErrorBanner(text) => self.banner = Some(text),
            UiMessage::ViewChanged { view, previous } => {
                tracing::debug!(?view, ?previous, "view changed");
            }
            UiMessage::ThemeChanged(_)
            | UiMessage::SoundToggled(_)
            | UiMessage::TransitionSettled => {}
        }
    }

    fn overlay_lines(&self) -> Vec<String> {
        let mut lines: Vec<String> = self
            .inspector
            .measured_names()
            .iter()
            .filter_map(|name| {
                self.inspector.measure(name).map(|summary| {
                    format!(
                        "{name}: n={} avg={:?} max={:?}",
                        summary.count, summary.average, summary.max
                    )
                })
            })
            .collect();
        lines.push(String::new());
        for entry in self.inspector.recent_logs(8) {
            lines.push(format!(
                "{} [{:?}] {}",
                entry.timestamp.format("%H:%M:%S"),
                entry.level,
                entry.message
            ));
        }
        lines
    }

    fn render(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> anyhow::Result<()> {
        let snapshot = {
            let store = self.controller.store();
            let stage = self.controller.stage();
            let store = store.lock();
            let stage = stage.lock();
            Snapshot::capture(&store, &stage)
        };
        let palette = Palette::for_theme(snapshot.theme);
        let overlay = self.show_overlay.then(|| self.overlay_lines());

        terminal.draw(|frame| {
            views::render(
                frame,
                &snapshot,
                self.controller.catalog(),
                &palette,
                self.selected,
                self.banner.as_deref(),
                overlay.as_deref(),
            );
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_global_keys_bind_in_every_view() {
        for view in [View::Home, View::Portfolio, View::Project] {
            assert_eq!(
                map_key(view, KeyCode::Char('q'), KeyModifiers::NONE),
                KeyAction::Input(InputEvent::Quit)
            );
            assert_eq!(
                map_key(view, KeyCode::Char('t'), KeyModifiers::NONE),
                KeyAction::Input(InputEvent::ToggleTheme)
            );
            assert_eq!(
                map_key(view, KeyCode::Char('c'), KeyModifiers::CONTROL),
                KeyAction::Input(InputEvent::Quit)
            );
        }
    }

    #[test]
    fn test_view_specific_bindings() {
        assert_eq!(
            map_key(View::Home, KeyCode::Enter, KeyModifiers::NONE),
            KeyAction::Input(InputEvent::OpenPortfolio)
        );
        assert_eq!(
            map_key(View::Portfolio, KeyCode::Down, KeyModifiers::NONE),
            KeyAction::MoveSelection(1)
        );
        assert_eq!(
            map_key(View::Project, KeyCode::Right, KeyModifiers::NONE),
            KeyAction::Input(InputEvent::NextProject)
        );
        assert_eq!(
            map_key(View::Project, KeyCode::Esc, KeyModifiers::NONE),
            KeyAction::Input(InputEvent::BackToGrid)
        );
    }

    #[test]
    fn test_unbound_keys_do_nothing() {
        assert_eq!(
            map_key(View::Home, KeyCode::Left, KeyModifiers::NONE),
            KeyAction::None
        );
        assert_eq!(
            map_key(View::Project, KeyCode::Enter, KeyModifiers::NONE),
            KeyAction::None
        );
    }
}
