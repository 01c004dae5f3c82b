//! Project Catalog
//!
//! The ordered list of portfolio projects backing the grid articles.
//! Article N on the stage corresponds to `catalog.get(N)` (1-based, like
//! the stage addressing). Content ships built in and can be replaced
//! wholesale from the config file's `[[projects]]` entries.

use serde::{Deserialize, Serialize};

/// One portfolio project.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// Stable identifier (URL-ish, lowercase).
    pub slug: String,
    /// Display title.
    pub title: String,
    /// Year of completion.
    pub year: u16,
    /// One-paragraph summary for the detail panel.
    pub summary: String,
    /// Technology stack tags.
    #[serde(default)]
    pub stack: Vec<String>,
}

/// Ordered project collection.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    projects: Vec<Project>,
}

impl Catalog {
    /// Build a catalog from an ordered list.
    #[must_use]
    pub fn new(projects: Vec<Project>) -> Self {
        Self { projects }
    }

    /// The built-in sample content.
    #[must_use]
    pub fn builtin() -> Self {
        Self::new(vec![
            Project {
                slug: "aurora-synth".to_string(),
                title: "Aurora Synth".to_string(),
                year: 2023,
                summary: "A browser-based polyphonic synthesizer with a \
                          patchable modulation matrix and preset morphing."
                    .to_string(),
                stack: vec!["typescript".to_string(), "webaudio".to_string()],
            },
            Project {
                slug: "driftwood".to_string(),
                title: "Driftwood".to_string(),
                year: 2024,
                summary: "Procedural coastline generator rendering \
                          tide-driven terrain as printable vector art."
                    .to_string(),
                stack: vec!["rust".to_string(), "wasm".to_string()],
            },
            Project {
                slug: "ledgerline".to_string(),
                title: "Ledgerline".to_string(),
                year: 2024,
                summary: "Minimal double-entry bookkeeping tool with a \
                          plain-text ledger format and live balance views."
                    .to_string(),
                stack: vec!["rust".to_string(), "sqlite".to_string()],
            },
            Project {
                slug: "night-garden".to_string(),
                title: "Night Garden".to_string(),
                year: 2025,
                summary: "Generative plant growth simulation rendered as an \
                          ambient always-on display piece."
                    .to_string(),
                stack: vec!["glsl".to_string(), "typescript".to_string()],
            },
        ])
    }

    /// Number of projects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.projects.len()
    }

    /// Whether the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    /// Project at 1-based position `index`; `None` when out of range.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Project> {
        index.checked_sub(1).and_then(|i| self.projects.get(i))
    }

    /// All projects in grid order.
    #[must_use]
    pub fn projects(&self) -> &[Project] {
        &self.projects
    }
}
