//! Transition Sequencer
//!
//! Navigation state machine over the three views, realized as timed
//! schedules of stage mutations. Planning is separated from dispatch:
//! [`Sequencer::plan`] turns a request into a [`TransitionPlan`] (or `None`
//! for a request that is invalid in the current view or targets a missing
//! article), and [`Sequencer::navigate`] commits the plan.
//!
//! Committing updates `view` / `project_index` in the store synchronously
//! at initiation time, so rapid sequential requests compute their targets
//! against the already-updated index. The visual side runs on a spawned
//! executor that sleeps between actions; each transition captures an epoch
//! token, and a newer transition bumps the epoch so the stale executor
//! drops its remaining actions instead of racing on shared stage state.
//!
//! Lock discipline: the store lock is taken before the stage lock, and no
//! lock is ever held across an await.

mod schedule;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

pub use schedule::{
    detail_to_grid, grid_to_detail, region_transition, sibling_transition, ScheduledAction,
    StageAction, TransitionSchedule,
};

use crate::audio::{Cue, CuePlayer};
use crate::config::{regions, FolioConfig};
use crate::logsink::LogSink;
use crate::messages::UiMessage;
use crate::stage::Stage;
use crate::store::{keys, StateStore, View};

/// A navigation request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavRequest {
    /// Home to the portfolio grid.
    OpenPortfolio,
    /// Grid to the detail panel of the 1-based project index.
    OpenProject(usize),
    /// Detail panel to the next project.
    NextProject,
    /// Detail panel to the previous project.
    PreviousProject,
    /// Detail panel back to the grid.
    BackToGrid,
    /// Grid back to home.
    BackToHome,
}

/// A committed-to-be navigation: the state to write and the schedule to run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransitionPlan {
    /// View after the transition.
    pub view: View,
    /// 1-based project index after the transition (0 when none is open).
    pub project_index: usize,
    /// The timed actions realizing the transition.
    pub schedule: TransitionSchedule,
}

/// The sequencer.
pub struct Sequencer {
    store: Arc<Mutex<StateStore>>,
    stage: Arc<Mutex<Stage>>,
    player: Arc<dyn CuePlayer>,
    log: Arc<LogSink>,
    config: FolioConfig,
    epoch: Arc<AtomicU64>,
    ui_tx: mpsc::Sender<UiMessage>,
}

impl Sequencer {
    /// Wire a sequencer to its shared collaborators.
    #[must_use]
    pub fn new(
        store: Arc<Mutex<StateStore>>,
        stage: Arc<Mutex<Stage>>,
        player: Arc<dyn CuePlayer>,
        log: Arc<LogSink>,
        config: FolioConfig,
        ui_tx: mpsc::Sender<UiMessage>,
    ) -> Self {
        Self {
            store,
            stage,
            player,
            log,
            config,
            epoch: Arc::new(AtomicU64::new(0)),
            ui_tx,
        }
    }

    /// Epoch of the most recently committed transition.
    #[must_use]
    pub fn current_epoch(&self) -> u64 {
        self.epoch.load(Ordering::SeqCst)
    }

    /// Build the plan for a request against the current state, without
    /// committing anything.
    ///
    /// Returns `None` when the request is invalid in the current view or
    /// targets an article that does not exist; such a request is a complete
    /// no-op for the caller.
    #[must_use]
    pub fn plan(&self, request: NavRequest) -> Option<TransitionPlan> {
        let (view, index, reduced_motion) = {
            let store = self.store.lock();
            (store.view(), store.project_index(), store.reduced_motion())
        };
        let timing = self.config.effective_timing(reduced_motion);

        match (request, view) {
            (NavRequest::OpenPortfolio, View::Home) => Some(TransitionPlan {
                view: View::Portfolio,
                project_index: index,
                schedule: region_transition(
                    &timing,
                    regions::HOME,
                    regions::GRID,
                    Cue::PageForward,
                ),
            }),
            (NavRequest::OpenProject(target), View::Portfolio) => {
                self.article_exists(target).then(|| TransitionPlan {
                    view: View::Project,
                    project_index: target,
                    schedule: grid_to_detail(&timing, target),
                })
            }
            (NavRequest::NextProject, View::Project) => {
                let target = index + 1;
                self.article_exists(target).then(|| TransitionPlan {
                    view: View::Project,
                    project_index: target,
                    schedule: sibling_transition(&timing, index, target),
                })
            }
            (NavRequest::PreviousProject, View::Project) => {
                let target = index.checked_sub(1)?;
                self.article_exists(target).then(|| TransitionPlan {
                    view: View::Project,
                    project_index: target,
                    schedule: sibling_transition(&timing, index, target),
                })
            }
            (NavRequest::BackToGrid, View::Project) => Some(TransitionPlan {
                view: View::Portfolio,
                project_index: 0,
                schedule: detail_to_grid(&timing, index),
            }),
            (NavRequest::BackToHome, View::Portfolio) => Some(TransitionPlan {
                view: View::Home,
                project_index: index,
                schedule: region_transition(
                    &timing,
                    regions::GRID,
                    regions::HOME,
                    Cue::PageBack,
                ),
            }),
            _ => None,
        }
    }

    /// Commit a navigation request.
    ///
    /// Invalid requests are a no-op (logged at debug level) and return
    /// `None`. Otherwise the store is updated synchronously, the epoch
    /// advances, and the schedule executor is spawned; the handle is
    /// returned so tests can await completion.
    pub fn navigate(&self, request: NavRequest) -> Option<JoinHandle<()>> {
        let Some(plan) = self.plan(request) else {
            self.log
                .debug(&format!("navigation ignored: {request:?}"));
            return None;
        };

        {
            let mut store = self.store.lock();
            store.set(keys::VIEW, plan.view.as_str());
            store.set(keys::PROJECT_INDEX, plan.project_index);
        }

        // Supersede any in-flight transition before the first action runs,
        // then sweep the transient classes its dropped cleanup actions
        // would have removed.
        let token = self.epoch.fetch_add(1, Ordering::SeqCst) + 1;
        self.stage.lock().clear_transients();
        self.log.debug(&format!(
            "transition committed: {request:?} (epoch {token})"
        ));

        Some(tokio::spawn(run_schedule(
            plan.schedule,
            token,
            Arc::clone(&self.epoch),
            Arc::clone(&self.stage),
            Arc::clone(&self.player),
            Arc::clone(&self.log),
            self.ui_tx.clone(),
        )))
    }

    fn article_exists(&self, index: usize) -> bool {
        self.stage.lock().article_exists(index)
    }
}

/// Apply a schedule's actions at their delays, dropping the remainder as
/// soon as a newer transition has bumped the epoch past `token`.
async fn run_schedule(
    schedule: TransitionSchedule,
    token: u64,
    epoch: Arc<AtomicU64>,
    stage: Arc<Mutex<Stage>>,
    player: Arc<dyn CuePlayer>,
    log: Arc<LogSink>,
    ui_tx: mpsc::Sender<UiMessage>,
) {
    let mut elapsed = Duration::ZERO;
    for scheduled in schedule.actions() {
        if scheduled.delay > elapsed {
            tokio::time::sleep(scheduled.delay - elapsed).await;
            elapsed = scheduled.delay;
        }
        if epoch.load(Ordering::SeqCst) != token {
            log.debug(&format!("transition superseded (epoch {token})"));
            return;
        }
        apply_action(&scheduled.action, &stage, &player);
    }

    if epoch.load(Ordering::SeqCst) == token {
        // The surface may already be gone during shutdown.
        let _ = ui_tx.send(UiMessage::TransitionSettled).await;
    }
}

fn apply_action(action: &StageAction, stage: &Mutex<Stage>, player: &Arc<dyn CuePlayer>) {
    match action {
        StageAction::AddClass { target, class } => stage.lock().add_class(target, class),
        StageAction::RemoveClass { target, class } => {
            stage.lock().remove_class(target, class);
        }
        StageAction::SwapLayers => stage.lock().swap_layers(),
        StageAction::ScrollReset => stage.lock().scroll_reset(),
        StageAction::PlayCue(cue) => player.play(*cue),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::audio::RecordingCuePlayer;
    use crate::config::classes;
    use crate::stage::StageTarget;
    use crate::store::AppState;

    struct Fixture {
        sequencer: Sequencer,
        store: Arc<Mutex<StateStore>>,
        stage: Arc<Mutex<Stage>>,
        _ui_rx: mpsc::Receiver<UiMessage>,
    }

    fn fixture(article_count: usize) -> Fixture {
        let log = Arc::new(LogSink::new(100, false));
        let store = Arc::new(Mutex::new(StateStore::new(
            AppState::default(),
            Arc::clone(&log),
        )));
        let stage = Arc::new(Mutex::new(Stage::new(article_count, Arc::clone(&log))));
        stage
            .lock()
            .add_class(&StageTarget::region(regions::HOME), classes::ACTIVE);
        let player: Arc<dyn CuePlayer> = Arc::new(RecordingCuePlayer::new(true));
        let (ui_tx, ui_rx) = mpsc::channel(16);
        let sequencer = Sequencer::new(
            Arc::clone(&store),
            Arc::clone(&stage),
            player,
            log,
            FolioConfig::default(),
            ui_tx,
        );
        Fixture {
            sequencer,
            store,
            stage,
            _ui_rx: ui_rx,
        }
    }

    fn enter_detail(f: &Fixture, index: usize) {
        let mut store = f.store.lock();
        store.set(keys::VIEW, View::Project.as_str());
        store.set(keys::PROJECT_INDEX, index);
    }

    #[test]
    fn test_plan_open_portfolio_from_home() {
        let f = fixture(3);
        let plan = f.sequencer.plan(NavRequest::OpenPortfolio).unwrap();

        assert_eq!(plan.view, View::Portfolio);
        assert!(!plan.schedule.is_empty());
    }

    #[test]
    fn test_request_invalid_in_current_view_has_no_plan() {
        let f = fixture(3);
        // Still at home; detail-only requests must not plan anything.
        assert_eq!(f.sequencer.plan(NavRequest::NextProject), None);
        assert_eq!(f.sequencer.plan(NavRequest::BackToGrid), None);
        assert_eq!(f.sequencer.plan(NavRequest::BackToHome), None);
    }

    #[test]
    fn test_missing_sibling_has_no_plan() {
        let f = fixture(2);
        enter_detail(&f, 2);

        assert_eq!(f.sequencer.plan(NavRequest::NextProject), None);

        enter_detail(&f, 1);
        assert_eq!(f.sequencer.plan(NavRequest::PreviousProject), None);
    }

    #[test]
    fn test_open_project_checks_article_existence() {
        let f = fixture(2);
        f.store.lock().set(keys::VIEW, View::Portfolio.as_str());

        assert!(f.sequencer.plan(NavRequest::OpenProject(2)).is_some());
        assert_eq!(f.sequencer.plan(NavRequest::OpenProject(3)), None);
        assert_eq!(f.sequencer.plan(NavRequest::OpenProject(0)), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_navigate_updates_index_synchronously() {
        let f = fixture(4);
        enter_detail(&f, 1);

        // Two rapid requests; the second computes its target against the
        // already-incremented index.
        let first = f.sequencer.navigate(NavRequest::NextProject).unwrap();
        assert_eq!(f.store.lock().project_index(), 2);
        let second = f.sequencer.navigate(NavRequest::NextProject).unwrap();
        assert_eq!(f.store.lock().project_index(), 3);

        first.await.unwrap();
        second.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_navigate_is_complete_noop() {
        let f = fixture(1);
        enter_detail(&f, 1);
        let classes_before = f.stage.lock().classes(&StageTarget::Article(1));

        assert!(f.sequencer.navigate(NavRequest::NextProject).is_none());

        assert_eq!(f.store.lock().project_index(), 1);
        assert_eq!(
            f.stage.lock().classes(&StageTarget::Article(1)),
            classes_before
        );
        assert_eq!(f.sequencer.current_epoch(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_schedule_completes_after_all_delays() {
        let f = fixture(3);
        let handle = f.sequencer.navigate(NavRequest::OpenPortfolio).unwrap();
        handle.await.unwrap();

        let stage = f.stage.lock();
        let grid = StageTarget::region(regions::GRID);
        let home = StageTarget::region(regions::HOME);
        assert!(stage.has_class(&grid, classes::ACTIVE));
        assert!(!stage.has_class(&grid, classes::ENTERING));
        assert!(!stage.has_class(&home, classes::ACTIVE));
        assert!(stage.has_class(&home, classes::HIDDEN));
    }

    #[tokio::test(start_paused = true)]
    async fn test_superseded_transition_drops_remaining_actions() {
        let f = fixture(4);
        enter_detail(&f, 1);

        let first = f.sequencer.navigate(NavRequest::NextProject).unwrap();
        // Supersede immediately; the first executor has not slept yet.
        let second = f.sequencer.navigate(NavRequest::NextProject).unwrap();
        first.await.unwrap();
        second.await.unwrap();

        let stage = f.stage.lock();
        // Only the second transition's terminal state applies: article 3
        // active, article 2 never activated by the stale schedule.
        assert!(stage.has_class(&StageTarget::Article(3), classes::ACTIVE));
        assert!(!stage.has_class(&StageTarget::Article(2), classes::ACTIVE));
    }

    #[tokio::test(start_paused = true)]
    async fn test_commit_sweeps_stale_classes_from_superseded_hop() {
        let f = fixture(4);
        enter_detail(&f, 1);
        f.stage
            .lock()
            .add_class(&StageTarget::Article(1), classes::ACTIVE);

        let first = f.sequencer.navigate(NavRequest::NextProject).unwrap();
        // Let the first hop apply its leading actions, then supersede it
        // before its fade-out cleanup runs.
        tokio::time::sleep(Duration::from_millis(50)).await;
        let second = f.sequencer.navigate(NavRequest::NextProject).unwrap();
        first.await.unwrap();
        second.await.unwrap();

        let stage = f.stage.lock();
        assert!(stage.has_class(&StageTarget::Article(3), classes::ACTIVE));
        // The superseded hop's source article keeps neither its stale
        // active marker nor its leaving marker.
        assert!(!stage.has_class(&StageTarget::Article(1), classes::ACTIVE));
        assert!(!stage.has_class(&StageTarget::Article(1), classes::LEAVING));
        assert!(!stage.has_class(&StageTarget::Article(2), classes::ENTERING));
    }
}
