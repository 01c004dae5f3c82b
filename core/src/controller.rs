//! Controller Facade
//!
//! Composition point of the core: owns the store, stage, sequencer, log
//! sink, and metrics, wires the cross-cutting observers, and routes surface
//! input. Every collaborator is injected or constructed here; nothing in
//! the crate is a singleton.
//!
//! Construction is the only fallible step the end user ever sees: the
//! application root catches a constructor error once, logs it, and shows a
//! restart banner. Everything after that degrades locally.

use std::sync::Arc;

use anyhow::Context;
use parking_lot::Mutex;
use tokio::sync::mpsc;

use crate::audio::{Cue, CuePlayer};
use crate::catalog::Catalog;
use crate::config::{classes, regions, FolioConfig};
use crate::events::InputEvent;
use crate::logsink::{LogEntry, LogSink};
use crate::messages::UiMessage;
use crate::metrics::{MeasureSummary, PerfMetrics};
use crate::sequencer::{NavRequest, Sequencer};
use crate::stage::{Stage, StageTarget};
use crate::store::{keys, AppState, StateStore, Theme, Value, View};

/// Name of the startup timing measure.
pub const STARTUP_MEASURE: &str = "startup";

/// The application controller.
pub struct Controller {
    store: Arc<Mutex<StateStore>>,
    stage: Arc<Mutex<Stage>>,
    sequencer: Sequencer,
    player: Arc<dyn CuePlayer>,
    log: Arc<LogSink>,
    metrics: Arc<PerfMetrics>,
    catalog: Catalog,
    config: FolioConfig,
    ui_tx: mpsc::Sender<UiMessage>,
}

impl Controller {
    /// Build and wire the core.
    ///
    /// # Errors
    ///
    /// Fails when the catalog is empty; the grid has nothing to show and
    /// the application cannot meaningfully start.
    pub fn new(
        config: FolioConfig,
        catalog: Catalog,
        player: Arc<dyn CuePlayer>,
        ui_tx: mpsc::Sender<UiMessage>,
    ) -> anyhow::Result<Self> {
        let log = Arc::new(LogSink::new(config.log_capacity, config.dev_mode));
        let metrics = Arc::new(PerfMetrics::new(Arc::clone(&log)));
        metrics.start_measure(STARTUP_MEASURE);

        anyhow::ensure!(!catalog.is_empty(), "project catalog is empty");

        let initial = AppState {
            theme: config.theme,
            sound_enabled: config.sound_enabled,
            ..AppState::default()
        };
        let store = Arc::new(Mutex::new(StateStore::new(initial, Arc::clone(&log))));

        let stage = Arc::new(Mutex::new(Stage::new(catalog.len(), Arc::clone(&log))));
        {
            let mut stage = stage.lock();
            stage.add_class(&StageTarget::region(regions::HOME), classes::ACTIVE);
            stage.add_class(&StageTarget::region(regions::GRID), classes::HIDDEN);
            stage.add_class(&StageTarget::region(regions::DETAIL), classes::HIDDEN);
            if config.theme == Theme::Light {
                stage.add_class(&StageTarget::region(regions::ROOT), classes::THEME_LIGHT);
            }
        }

        player.set_enabled(config.sound_enabled);

        let sequencer = Sequencer::new(
            Arc::clone(&store),
            Arc::clone(&stage),
            Arc::clone(&player),
            Arc::clone(&log),
            config.clone(),
            ui_tx.clone(),
        );

        let controller = Self {
            store,
            stage,
            sequencer,
            player,
            log,
            metrics,
            catalog,
            config,
            ui_tx,
        };
        controller.wire_observers();

        controller.metrics.end_measure(STARTUP_MEASURE);
        controller.log.info("controller initialized");
        Ok(controller)
    }

    /// Build a controller, loading configuration from the default sources.
    ///
    /// # Errors
    ///
    /// Fails on a malformed config file or an empty catalog.
    pub fn from_env(
        player: Arc<dyn CuePlayer>,
        ui_tx: mpsc::Sender<UiMessage>,
    ) -> anyhow::Result<Self> {
        let config = crate::config::load_config().context("loading configuration")?;
        let catalog = config
            .projects
            .clone()
            .map_or_else(Catalog::builtin, Catalog::new);
        Self::new(config, catalog, player, ui_tx)
    }

    // Observers run synchronously inside `StateStore::set` while the store
    // lock is held, so none of them may touch the store. Stage locking is
    // fine (store before stage, always).
    fn wire_observers(&self) {
        let mut store = self.store.lock();

        let stage = Arc::clone(&self.stage);
        let player = Arc::clone(&self.player);
        let ui_tx = self.ui_tx.clone();
        store.subscribe(keys::THEME, move |new, _old| {
            let theme = new
                .as_str()
                .and_then(Theme::parse)
                .ok_or_else(|| anyhow::anyhow!("theme path holds a non-theme value"))?;
            let root = StageTarget::region(regions::ROOT);
            match theme {
                Theme::Light => stage.lock().add_class(&root, classes::THEME_LIGHT),
                Theme::Dark => stage.lock().remove_class(&root, classes::THEME_LIGHT),
            }
            player.play(Cue::ThemeChange);
            let _ = ui_tx.try_send(UiMessage::ThemeChanged(theme));
            Ok(())
        });

        let player = Arc::clone(&self.player);
        let ui_tx = self.ui_tx.clone();
        store.subscribe(keys::SOUND_ENABLED, move |new, _old| {
            let enabled = new
                .as_bool()
                .ok_or_else(|| anyhow::anyhow!("sound path holds a non-boolean"))?;
            player.set_enabled(enabled);
            let _ = ui_tx.try_send(UiMessage::SoundToggled(enabled));
            Ok(())
        });

        let log = Arc::clone(&self.log);
        let ui_tx = self.ui_tx.clone();
        store.subscribe(keys::VIEW, move |new, old| {
            let view = new.as_str().and_then(View::parse).unwrap_or_default();
            let previous = old.as_str().and_then(View::parse).unwrap_or_default();
            log.info(&format!("view: {} -> {}", previous.as_str(), view.as_str()));
            let _ = ui_tx.try_send(UiMessage::ViewChanged { view, previous });
            Ok(())
        });
    }

    /// Route one surface event.
    pub fn handle_event(&self, event: InputEvent) {
        match event {
            InputEvent::OpenPortfolio => {
                self.sequencer.navigate(NavRequest::OpenPortfolio);
            }
            InputEvent::OpenProject(index) => {
                self.sequencer.navigate(NavRequest::OpenProject(index));
            }
            InputEvent::NextProject => {
                self.sequencer.navigate(NavRequest::NextProject);
            }
            InputEvent::PreviousProject => {
                self.sequencer.navigate(NavRequest::PreviousProject);
            }
            InputEvent::BackToGrid => {
                self.sequencer.navigate(NavRequest::BackToGrid);
            }
            InputEvent::BackToHome => {
                self.sequencer.navigate(NavRequest::BackToHome);
            }
            InputEvent::HoverProject(index) => self.hover(index),
            InputEvent::ToggleSound => {
                let mut store = self.store.lock();
                let enabled = store.sound_enabled();
                store.set(keys::SOUND_ENABLED, !enabled);
            }
            InputEvent::ToggleTheme => {
                self.player.play(Cue::Click);
                let mut store = self.store.lock();
                let theme = store.theme();
                store.set(keys::THEME, theme.toggled().as_str());
            }
            InputEvent::Quit => {
                self.log.info("quit requested");
                let _ = self.ui_tx.try_send(UiMessage::Quit);
            }
        }
    }

    // Soft tick while the selection moves inside the grid; the sharp
    // variant marks the edge (a neighbor that does not exist).
    fn hover(&self, index: usize) {
        if self.stage.lock().article_exists(index) {
            self.player.play(Cue::HoverSoft);
        } else {
            self.player.play(Cue::HoverSharp);
        }
    }

    /// Restore the store to its fixed initial defaults.
    pub fn reset(&self) {
        self.store.lock().reset();
        self.log.debug("state reset to defaults");
    }

    /// Shared state store.
    #[must_use]
    pub fn store(&self) -> Arc<Mutex<StateStore>> {
        Arc::clone(&self.store)
    }

    /// Shared presentation stage.
    #[must_use]
    pub fn stage(&self) -> Arc<Mutex<Stage>> {
        Arc::clone(&self.stage)
    }

    /// The project catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &FolioConfig {
        &self.config
    }

    /// Read-only diagnostics accessor for the dev overlay and tests.
    #[must_use]
    pub fn inspector(&self) -> Inspector {
        Inspector {
            store: Arc::clone(&self.store),
            stage: Arc::clone(&self.stage),
            log: Arc::clone(&self.log),
            metrics: Arc::clone(&self.metrics),
        }
    }
}

/// Read-only window into the wired core, handed out by the composition
/// root instead of any global debug handle.
#[derive(Clone)]
pub struct Inspector {
    store: Arc<Mutex<StateStore>>,
    stage: Arc<Mutex<Stage>>,
    log: Arc<LogSink>,
    metrics: Arc<PerfMetrics>,
}

impl Inspector {
    /// The `count` most recent log entries, oldest first.
    #[must_use]
    pub fn recent_logs(&self, count: usize) -> Vec<LogEntry> {
        let history = self.log.history();
        let skip = history.len().saturating_sub(count);
        history.into_iter().skip(skip).collect()
    }

    /// Summary of one named measure.
    #[must_use]
    pub fn measure(&self, name: &str) -> Option<MeasureSummary> {
        self.metrics.summary(name)
    }

    /// All measure names with recorded data.
    #[must_use]
    pub fn measured_names(&self) -> Vec<String> {
        self.metrics.measured_names()
    }

    /// Snapshot of a state value.
    #[must_use]
    pub fn state(&self, path: &str) -> Option<Value> {
        self.store.lock().get(path).cloned()
    }

    /// Whether a stage target currently bears a class.
    #[must_use]
    pub fn stage_has_class(&self, target: &StageTarget, class: &str) -> bool {
        self.stage.lock().has_class(target, class)
    }
}
