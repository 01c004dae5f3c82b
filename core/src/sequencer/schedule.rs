//! Transition Schedules
//!
//! A schedule is the fixed, ordered list of `(delay, action)` pairs making
//! up one logical navigation. Delays come from [`TransitionTiming`]
//! constants, so every transition of a given kind has the same shape and
//! total duration regardless of input. Building a schedule performs no side
//! effects; the sequencer's executor applies it.

use std::time::Duration;

use crate::audio::Cue;
use crate::config::{classes, regions, TransitionTiming};
use crate::stage::StageTarget;

/// One visual side effect.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StageAction {
    /// Add a class to a stage target.
    AddClass {
        /// Target to mutate.
        target: StageTarget,
        /// Class to add.
        class: String,
    },
    /// Remove a class from a stage target.
    RemoveClass {
        /// Target to mutate.
        target: StageTarget,
        /// Class to remove.
        class: String,
    },
    /// Swap the crossfade layers.
    SwapLayers,
    /// Reset the scroll position to the top.
    ScrollReset,
    /// Play an audio cue.
    PlayCue(Cue),
}

impl StageAction {
    fn add(target: StageTarget, class: &str) -> Self {
        Self::AddClass {
            target,
            class: class.to_string(),
        }
    }

    fn remove(target: StageTarget, class: &str) -> Self {
        Self::RemoveClass {
            target,
            class: class.to_string(),
        }
    }
}

/// An action with its delay from transition start.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScheduledAction {
    /// Delay from the start of the transition.
    pub delay: Duration,
    /// The action to apply once the delay elapses.
    pub action: StageAction,
}

/// Ordered list of delayed actions for one navigation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TransitionSchedule {
    actions: Vec<ScheduledAction>,
}

impl TransitionSchedule {
    /// Empty schedule.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an action at `delay`. Actions keep ascending delay order;
    /// equal delays preserve insertion order.
    pub fn at(&mut self, delay: Duration, action: StageAction) {
        self.actions.push(ScheduledAction { delay, action });
        self.actions.sort_by_key(|scheduled| scheduled.delay);
    }

    /// The actions in execution order.
    #[must_use]
    pub fn actions(&self) -> &[ScheduledAction] {
        &self.actions
    }

    /// Number of scheduled actions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Whether the schedule has no actions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Delay of the last action; the schedule's total duration.
    #[must_use]
    pub fn total_duration(&self) -> Duration {
        self.actions
            .last()
            .map_or(Duration::ZERO, |scheduled| scheduled.delay)
    }
}

/// Crossfade from one view region to another.
///
/// Shape: at 0 the cue fires and both regions get their transient classes;
/// at `fade_out` the outgoing region deactivates and hides; at `swap` the
/// layers flip; at `fade_in` the incoming region activates; at `settle` the
/// transient classes clear and the scroll resets.
#[must_use]
pub fn region_transition(
    timing: &TransitionTiming,
    from: &str,
    to: &str,
    cue: Cue,
) -> TransitionSchedule {
    let mut schedule = TransitionSchedule::new();
    let from = StageTarget::region(from);
    let to = StageTarget::region(to);

    schedule.at(Duration::ZERO, StageAction::PlayCue(cue));
    schedule.at(Duration::ZERO, StageAction::add(from.clone(), classes::LEAVING));
    schedule.at(Duration::ZERO, StageAction::add(to.clone(), classes::ENTERING));

    schedule.at(
        timing.fade_out(),
        StageAction::remove(from.clone(), classes::ACTIVE),
    );
    schedule.at(
        timing.fade_out(),
        StageAction::remove(from.clone(), classes::LEAVING),
    );
    schedule.at(timing.fade_out(), StageAction::add(from, classes::HIDDEN));

    schedule.at(timing.swap(), StageAction::SwapLayers);

    schedule.at(
        timing.fade_in(),
        StageAction::remove(to.clone(), classes::HIDDEN),
    );
    schedule.at(timing.fade_in(), StageAction::add(to.clone(), classes::ACTIVE));

    schedule.at(
        timing.settle(),
        StageAction::remove(to, classes::ENTERING),
    );
    schedule.at(timing.settle(), StageAction::ScrollReset);

    schedule
}

/// Portfolio grid to a project's detail panel.
#[must_use]
pub fn grid_to_detail(timing: &TransitionTiming, article: usize) -> TransitionSchedule {
    let mut schedule =
        region_transition(timing, regions::GRID, regions::DETAIL, Cue::PageForward);
    schedule.at(
        timing.fade_in(),
        StageAction::add(StageTarget::Article(article), classes::ACTIVE),
    );
    schedule
}

/// Detail panel back to the grid.
#[must_use]
pub fn detail_to_grid(timing: &TransitionTiming, article: usize) -> TransitionSchedule {
    let mut schedule =
        region_transition(timing, regions::DETAIL, regions::GRID, Cue::PageBack);
    schedule.at(
        timing.fade_out(),
        StageAction::remove(StageTarget::Article(article), classes::ACTIVE),
    );
    schedule
}

/// Sibling-to-sibling project navigation inside the detail view. No region
/// or layer change; only the articles crossfade.
#[must_use]
pub fn sibling_transition(
    timing: &TransitionTiming,
    from_article: usize,
    to_article: usize,
) -> TransitionSchedule {
    let cue = if to_article > from_article {
        Cue::PageForward
    } else {
        Cue::PageBack
    };
    let from = StageTarget::Article(from_article);
    let to = StageTarget::Article(to_article);

    let mut schedule = TransitionSchedule::new();
    schedule.at(Duration::ZERO, StageAction::PlayCue(cue));
    schedule.at(Duration::ZERO, StageAction::add(from.clone(), classes::LEAVING));

    schedule.at(
        timing.fade_out(),
        StageAction::remove(from.clone(), classes::ACTIVE),
    );
    schedule.at(timing.fade_out(), StageAction::remove(from, classes::LEAVING));
    schedule.at(
        timing.fade_out(),
        StageAction::add(to.clone(), classes::ENTERING),
    );

    schedule.at(timing.fade_in(), StageAction::add(to.clone(), classes::ACTIVE));

    schedule.at(
        timing.settle(),
        StageAction::remove(to, classes::ENTERING),
    );
    schedule.at(timing.settle(), StageAction::ScrollReset);

    schedule
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_actions_stay_in_ascending_delay_order() {
        let mut schedule = TransitionSchedule::new();
        schedule.at(Duration::from_millis(300), StageAction::ScrollReset);
        schedule.at(Duration::ZERO, StageAction::SwapLayers);
        schedule.at(Duration::from_millis(100), StageAction::PlayCue(Cue::Click));

        let delays: Vec<_> = schedule
            .actions()
            .iter()
            .map(|scheduled| scheduled.delay)
            .collect();
        assert_eq!(
            delays,
            vec![
                Duration::ZERO,
                Duration::from_millis(100),
                Duration::from_millis(300)
            ]
        );
    }

    #[test]
    fn test_region_transition_total_duration_is_settle() {
        let timing = TransitionTiming::default();
        let schedule =
            region_transition(&timing, regions::HOME, regions::GRID, Cue::PageForward);

        assert_eq!(schedule.total_duration(), timing.settle());
    }

    #[test]
    fn test_same_shape_regardless_of_direction() {
        let timing = TransitionTiming::default();
        let forward = sibling_transition(&timing, 1, 2);
        let backward = sibling_transition(&timing, 2, 1);

        assert_eq!(forward.len(), backward.len());
        assert_eq!(forward.total_duration(), backward.total_duration());
    }

    #[test]
    fn test_sibling_cue_tracks_direction() {
        let timing = TransitionTiming::default();
        let forward = sibling_transition(&timing, 1, 2);
        let backward = sibling_transition(&timing, 2, 1);

        assert!(forward
            .actions()
            .iter()
            .any(|s| s.action == StageAction::PlayCue(Cue::PageForward)));
        assert!(backward
            .actions()
            .iter()
            .any(|s| s.action == StageAction::PlayCue(Cue::PageBack)));
    }
}
