//! Presentation Stage
//!
//! In-memory model of the visual surface the sequencer mutates: named
//! regions carrying class sets, ordered 1-based project articles, two
//! alternating crossfade layers with a front marker, and a scroll position.
//! The UI surface reads classes and renders them as styling; the core never
//! draws anything itself.
//!
//! Lookup of a missing region or out-of-range article degrades to a no-op
//! logged as a warning, never a panic. Read accessors on missing targets
//! return empty/false.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use crate::config::{classes, regions};
use crate::logsink::LogSink;

/// One of the two alternating crossfade layers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LayerSlot {
    /// First layer; front at startup.
    #[default]
    A,
    /// Second layer.
    B,
}

impl LayerSlot {
    /// The other slot.
    #[must_use]
    pub fn other(self) -> Self {
        match self {
            Self::A => Self::B,
            Self::B => Self::A,
        }
    }

    fn index(self) -> usize {
        match self {
            Self::A => 0,
            Self::B => 1,
        }
    }
}

/// Addressable class-set holder on the stage.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StageTarget {
    /// A named region (`root`, `home`, `grid`, `detail`).
    Region(String),
    /// A project article by 1-based position.
    Article(usize),
    /// One of the crossfade layers.
    Layer(LayerSlot),
    /// Whichever layer is currently in front.
    FrontLayer,
    /// Whichever layer is currently in back.
    BackLayer,
}

impl StageTarget {
    /// Convenience constructor for a region target.
    #[must_use]
    pub fn region(name: &str) -> Self {
        Self::Region(name.to_string())
    }
}

/// The stage.
pub struct Stage {
    regions: BTreeMap<String, BTreeSet<String>>,
    articles: Vec<BTreeSet<String>>,
    layers: [BTreeSet<String>; 2],
    front: LayerSlot,
    scroll: u16,
    log: Arc<LogSink>,
}

impl Stage {
    /// Create a stage with the standard regions and `article_count`
    /// project articles, all with empty class sets.
    #[must_use]
    pub fn new(article_count: usize, log: Arc<LogSink>) -> Self {
        let regions = [regions::ROOT, regions::HOME, regions::GRID, regions::DETAIL]
            .into_iter()
            .map(|name| (name.to_string(), BTreeSet::new()))
            .collect();
        Self {
            regions,
            articles: vec![BTreeSet::new(); article_count],
            layers: [BTreeSet::new(), BTreeSet::new()],
            front: LayerSlot::A,
            scroll: 0,
            log,
        }
    }

    /// Whether a 1-based article position exists.
    #[must_use]
    pub fn article_exists(&self, index: usize) -> bool {
        index >= 1 && index <= self.articles.len()
    }

    /// Number of project articles.
    #[must_use]
    pub fn article_count(&self) -> usize {
        self.articles.len()
    }

    /// The layer currently in front.
    #[must_use]
    pub fn front_layer(&self) -> LayerSlot {
        self.front
    }

    /// Current scroll position.
    #[must_use]
    pub fn scroll(&self) -> u16 {
        self.scroll
    }

    /// Add `class` to the target's class set.
    pub fn add_class(&mut self, target: &StageTarget, class: &str) {
        if let Some(classes) = self.classes_mut(target) {
            classes.insert(class.to_string());
        }
    }

    /// Remove `class` from the target's class set.
    pub fn remove_class(&mut self, target: &StageTarget, class: &str) {
        if let Some(classes) = self.classes_mut(target) {
            classes.remove(class);
        }
    }

    /// Whether the target currently bears `class`. Missing targets read
    /// as `false` without a warning.
    #[must_use]
    pub fn has_class(&self, target: &StageTarget, class: &str) -> bool {
        self.classes_ref(target)
            .is_some_and(|classes| classes.contains(class))
    }

    /// Snapshot of the target's class set, empty when the target is
    /// missing.
    #[must_use]
    pub fn classes(&self, target: &StageTarget) -> BTreeSet<String> {
        self.classes_ref(target).cloned().unwrap_or_default()
    }

    /// Swap which layer is in front. Class sets stay with their slots.
    pub fn swap_layers(&mut self) {
        self.front = self.front.other();
    }

    /// Set the scroll position.
    pub fn scroll_to(&mut self, position: u16) {
        self.scroll = position;
    }

    /// Reset the scroll position to the top.
    pub fn scroll_reset(&mut self) {
        self.scroll = 0;
    }

    /// Remove transition-transient classes everywhere: `entering` and
    /// `leaving` from all targets, `active` from articles. A superseded
    /// executor never reaches its cleanup actions, so the next commit
    /// sweeps whatever it left behind. Region visibility classes
    /// (`active`, `hidden`, the theme class) stay put.
    pub fn clear_transients(&mut self) {
        for set in self.regions.values_mut() {
            set.remove(classes::ENTERING);
            set.remove(classes::LEAVING);
        }
        for set in &mut self.articles {
            set.remove(classes::ACTIVE);
            set.remove(classes::ENTERING);
            set.remove(classes::LEAVING);
        }
        for set in &mut self.layers {
            set.remove(classes::ENTERING);
            set.remove(classes::LEAVING);
        }
    }

    fn classes_ref(&self, target: &StageTarget) -> Option<&BTreeSet<String>> {
        match target {
            StageTarget::Region(name) => self.regions.get(name),
            StageTarget::Article(index) => index
                .checked_sub(1)
                .and_then(|i| self.articles.get(i)),
            StageTarget::Layer(slot) => Some(&self.layers[slot.index()]),
            StageTarget::FrontLayer => Some(&self.layers[self.front.index()]),
            StageTarget::BackLayer => Some(&self.layers[self.front.other().index()]),
        }
    }

    fn classes_mut(&mut self, target: &StageTarget) -> Option<&mut BTreeSet<String>> {
        let found = match target {
            StageTarget::Region(name) => self.regions.get_mut(name),
            StageTarget::Article(index) => index
                .checked_sub(1)
                .and_then(|i| self.articles.get_mut(i)),
            StageTarget::Layer(slot) => Some(&mut self.layers[slot.index()]),
            StageTarget::FrontLayer => Some(&mut self.layers[self.front.index()]),
            StageTarget::BackLayer => {
                Some(&mut self.layers[self.front.other().index()])
            }
        };
        if found.is_none() {
            self.log.warn(&format!("stage target not found: {target:?}"));
        }
        found
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::config::classes;
    use crate::logsink::LogLevel;

    fn stage() -> (Stage, Arc<LogSink>) {
        let log = Arc::new(LogSink::new(50, false));
        (Stage::new(3, Arc::clone(&log)), log)
    }

    #[test]
    fn test_add_and_remove_class_on_region() {
        let (mut stage, _log) = stage();
        let grid = StageTarget::region(regions::GRID);

        stage.add_class(&grid, classes::ACTIVE);
        assert!(stage.has_class(&grid, classes::ACTIVE));

        stage.remove_class(&grid, classes::ACTIVE);
        assert!(!stage.has_class(&grid, classes::ACTIVE));
    }

    #[test]
    fn test_missing_region_warns_and_noops() {
        let (mut stage, log) = stage();
        let bogus = StageTarget::region("sidebar");

        stage.add_class(&bogus, classes::ACTIVE);

        assert!(!stage.has_class(&bogus, classes::ACTIVE));
        assert_eq!(log.by_level(LogLevel::Warn).len(), 1);
    }

    #[test]
    fn test_article_addressing_is_one_based() {
        let (mut stage, log) = stage();
        assert!(stage.article_exists(1));
        assert!(stage.article_exists(3));
        assert!(!stage.article_exists(0));
        assert!(!stage.article_exists(4));

        stage.add_class(&StageTarget::Article(0), classes::ACTIVE);
        stage.add_class(&StageTarget::Article(4), classes::ACTIVE);
        assert_eq!(log.by_level(LogLevel::Warn).len(), 2);

        stage.add_class(&StageTarget::Article(2), classes::ACTIVE);
        assert!(stage.has_class(&StageTarget::Article(2), classes::ACTIVE));
    }

    #[test]
    fn test_swap_layers_moves_front_marker_not_classes() {
        let (mut stage, _log) = stage();
        stage.add_class(&StageTarget::FrontLayer, classes::ACTIVE);
        assert_eq!(stage.front_layer(), LayerSlot::A);

        stage.swap_layers();

        assert_eq!(stage.front_layer(), LayerSlot::B);
        assert!(stage.has_class(&StageTarget::BackLayer, classes::ACTIVE));
        assert!(!stage.has_class(&StageTarget::FrontLayer, classes::ACTIVE));
        assert!(stage.has_class(&StageTarget::Layer(LayerSlot::A), classes::ACTIVE));
    }

    #[test]
    fn test_clear_transients_keeps_region_visibility() {
        let (mut stage, _log) = stage();
        let home = StageTarget::region(regions::HOME);
        let grid = StageTarget::region(regions::GRID);
        stage.add_class(&home, classes::ACTIVE);
        stage.add_class(&home, classes::LEAVING);
        stage.add_class(&grid, classes::HIDDEN);
        stage.add_class(&grid, classes::ENTERING);
        stage.add_class(&StageTarget::Article(1), classes::ACTIVE);
        stage.add_class(&StageTarget::Article(2), classes::ENTERING);

        stage.clear_transients();

        assert!(stage.has_class(&home, classes::ACTIVE));
        assert!(stage.has_class(&grid, classes::HIDDEN));
        assert!(!stage.has_class(&home, classes::LEAVING));
        assert!(!stage.has_class(&grid, classes::ENTERING));
        assert!(!stage.has_class(&StageTarget::Article(1), classes::ACTIVE));
        assert!(!stage.has_class(&StageTarget::Article(2), classes::ENTERING));
    }

    #[test]
    fn test_scroll_reset() {
        let (mut stage, _log) = stage();
        stage.scroll_to(42);
        assert_eq!(stage.scroll(), 42);
        stage.scroll_reset();
        assert_eq!(stage.scroll(), 0);
    }
}
