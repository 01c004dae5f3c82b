//! Performance Metrics Collector
//!
//! Passive recorder for coarse timing of named operations. `start_measure`
//! and `end_measure` bracket an operation; repeated cycles under the same
//! name accumulate, and [`PerfMetrics::summary`] aggregates on demand.
//! There is no alerting or thresholding here.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use crate::logsink::LogSink;

/// Aggregate over all recorded durations of one name.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MeasureSummary {
    /// Number of recorded durations.
    pub count: usize,
    /// Mean duration.
    pub average: Duration,
    /// Shortest duration.
    pub min: Duration,
    /// Longest duration.
    pub max: Duration,
    /// Sum of all durations.
    pub total: Duration,
}

#[derive(Default)]
struct Inner {
    open: HashMap<String, Instant>,
    recorded: HashMap<String, Vec<Duration>>,
}

/// Shareable metrics collector.
pub struct PerfMetrics {
    inner: Mutex<Inner>,
    log: Arc<LogSink>,
}

impl PerfMetrics {
    /// Create a collector reporting anomalies to `log`.
    #[must_use]
    pub fn new(log: Arc<LogSink>) -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
            log,
        }
    }

    /// Open a measurement under `name`.
    ///
    /// A second start before the matching end overwrites the open mark
    /// (last start wins).
    pub fn start_measure(&self, name: &str) {
        self.inner
            .lock()
            .open
            .insert(name.to_string(), Instant::now());
    }

    /// Close the measurement under `name` and record its duration.
    ///
    /// Without a prior [`PerfMetrics::start_measure`] this logs a warning
    /// and returns `None`.
    pub fn end_measure(&self, name: &str) -> Option<Duration> {
        let started = self.inner.lock().open.remove(name);
        match started {
            Some(start) => {
                let elapsed = start.elapsed();
                self.record(name, elapsed);
                Some(elapsed)
            }
            None => {
                self.log
                    .warn(&format!("end_measure without start: '{name}'"));
                None
            }
        }
    }

    /// Record a duration under `name` directly.
    pub fn record(&self, name: &str, duration: Duration) {
        self.inner
            .lock()
            .recorded
            .entry(name.to_string())
            .or_default()
            .push(duration);
    }

    /// Aggregate everything recorded under `name`; `None` if nothing is.
    #[must_use]
    pub fn summary(&self, name: &str) -> Option<MeasureSummary> {
        let inner = self.inner.lock();
        let durations = inner.recorded.get(name)?;
        if durations.is_empty() {
            return None;
        }

        let total: Duration = durations.iter().sum();
        let min = *durations.iter().min()?;
        let max = *durations.iter().max()?;
        let count = durations.len();
        let average = total / u32::try_from(count).unwrap_or(u32::MAX);

        Some(MeasureSummary {
            count,
            average,
            min,
            max,
            total,
        })
    }

    /// Names with at least one recorded duration, sorted.
    #[must_use]
    pub fn measured_names(&self) -> Vec<String> {
        let inner = self.inner.lock();
        let mut names: Vec<String> = inner
            .recorded
            .iter()
            .filter(|(_, durations)| !durations.is_empty())
            .map(|(name, _)| name.clone())
            .collect();
        names.sort();
        names
    }
}
