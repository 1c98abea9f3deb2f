//! Timed activity history and the analytics derived from it.
//!
//! Records are appended in the order they happen and never edited. Speed is
//! not stored; it is always recomputed from distance and elapsed time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::chart::{self, Chart, ChartLayout};
use crate::error::{Error, Result};
use crate::storage::{CollectionKey, Record, Repository, Store};

/// How a timed activity was captured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    /// Timed with the live stopwatch.
    Run,
    /// Entered by hand in the speed calculator.
    RunManual,
}

impl std::fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Run => write!(f, "run"),
            Self::RunManual => write!(f, "run_manual"),
        }
    }
}

/// One timed run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimedActivityRecord {
    kind: ActivityKind,
    /// Meters.
    distance: f64,
    /// Seconds.
    elapsed_time: f64,
    timestamp: DateTime<Utc>,
}

impl Record for TimedActivityRecord {
    const COLLECTION: CollectionKey = CollectionKey::History;
}

impl TimedActivityRecord {
    /// Create a record timestamped now.
    ///
    /// # Errors
    ///
    /// Returns a validation error unless both distance and elapsed time are
    /// finite and positive.
    pub fn new(kind: ActivityKind, distance: f64, elapsed_time: f64) -> Result<Self> {
        Self::with_timestamp(kind, distance, elapsed_time, Utc::now())
    }

    /// Create a record with an explicit timestamp.
    ///
    /// # Errors
    ///
    /// Same as [`TimedActivityRecord::new`].
    pub fn with_timestamp(
        kind: ActivityKind,
        distance: f64,
        elapsed_time: f64,
        timestamp: DateTime<Utc>,
    ) -> Result<Self> {
        if !is_positive(distance) {
            return Err(Error::validation(format!(
                "distance must be a positive number of meters, got {distance}"
            )));
        }
        if !is_positive(elapsed_time) {
            return Err(Error::validation(format!(
                "elapsed time must be a positive number of seconds, got {elapsed_time}"
            )));
        }
        Ok(Self {
            kind,
            distance,
            elapsed_time,
            timestamp,
        })
    }

    /// How the run was captured.
    #[must_use]
    pub fn kind(&self) -> ActivityKind {
        self.kind
    }

    /// Distance in meters.
    #[must_use]
    pub fn distance(&self) -> f64 {
        self.distance
    }

    /// Elapsed time in seconds.
    #[must_use]
    pub fn elapsed_time(&self) -> f64 {
        self.elapsed_time
    }

    /// When the run was recorded.
    #[must_use]
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Speed in meters per second.
    ///
    /// `None` when the stored inputs don't produce a finite positive speed,
    /// which only happens for data that was edited or corrupted on disk.
    #[must_use]
    pub fn speed(&self) -> Option<f64> {
        let speed = self.distance / self.elapsed_time;
        is_positive(speed).then_some(speed)
    }
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

/// Pick the "top ~10%" speed out of a set of speeds.
///
/// Speeds are sorted fastest first and the value at rank
/// `max(0, floor(n * 0.1) - 1)` is returned. With fewer than 20 entries the
/// rank is 0, so the result is simply the fastest speed.
#[must_use]
pub fn top_decile(speeds: impl IntoIterator<Item = f64>) -> Option<f64> {
    let mut speeds: Vec<f64> = speeds.into_iter().collect();
    if speeds.is_empty() {
        return None;
    }
    speeds.sort_by(|a, b| b.total_cmp(a));
    let rank = (speeds.len() / 10).saturating_sub(1);
    Some(speeds[rank])
}

/// What the insight panel has to say about the history.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Insight {
    /// Nothing has been recorded.
    NoHistory,
    /// Records exist but none has a defined speed.
    NoSpeedData,
    /// The top-decile speed in m/s.
    TopSpeed(f64),
}

/// Counts and badges for the history panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistorySummary {
    /// Number of records ever stored.
    pub total: usize,
    /// Labels for the most recent records, oldest first.
    pub badges: Vec<String>,
}

/// Badge text for a record.
#[must_use]
pub fn badge_label(record: &TimedActivityRecord) -> String {
    match record.speed() {
        Some(speed) => format!("🏃 {speed:.2} m/s"),
        None => "🏃 -- m/s".to_string(),
    }
}

/// The activity history collection.
#[derive(Debug)]
pub struct History<'a> {
    repo: Repository<'a, TimedActivityRecord>,
}

impl<'a> History<'a> {
    /// Open the history collection in `store`.
    #[must_use]
    pub fn new(store: &'a Store) -> Self {
        Self {
            repo: Repository::new(store),
        }
    }

    /// Append a record. Listeners on the store are told the history changed.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn record(&self, entry: TimedActivityRecord) -> Result<TimedActivityRecord> {
        let entry = self.repo.append(entry)?;
        info!(
            kind = %entry.kind(),
            distance = entry.distance(),
            elapsed = entry.elapsed_time(),
            "activity recorded"
        );
        Ok(entry)
    }

    /// All records in the order they were recorded.
    #[must_use]
    pub fn entries(&self) -> Vec<TimedActivityRecord> {
        self.repo.list()
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.repo.len()
    }

    /// Whether no records exist.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.repo.is_empty()
    }

    /// The top-decile speed over every record with a defined speed.
    ///
    /// `None` means there is no speed data yet.
    #[must_use]
    pub fn top_decile_speed(&self) -> Option<f64> {
        top_decile(self.entries().iter().filter_map(TimedActivityRecord::speed))
    }

    /// The insight for the current history.
    #[must_use]
    pub fn insight(&self) -> Insight {
        let entries = self.entries();
        if entries.is_empty() {
            return Insight::NoHistory;
        }
        top_decile(entries.iter().filter_map(TimedActivityRecord::speed))
            .map_or(Insight::NoSpeedData, Insight::TopSpeed)
    }

    /// Speeds of the last `n` runs, oldest first.
    ///
    /// Every stored kind is a run, so no kind filter is needed. Records with
    /// an undefined speed chart as 0.
    #[must_use]
    pub fn recent_series(&self, n: usize) -> Vec<f64> {
        let entries = self.entries();
        let start = entries.len().saturating_sub(n);
        entries[start..]
            .iter()
            .map(|e| e.speed().unwrap_or(0.0))
            .collect()
    }

    /// Chart of the last `n` runs, scaled to the fastest run in that window.
    #[must_use]
    pub fn chart(&self, n: usize, layout: ChartLayout) -> Chart {
        chart::plot(&self.recent_series(n), layout)
    }

    /// Record count plus badges for the last `badge_count` records.
    #[must_use]
    pub fn summary(&self, badge_count: usize) -> HistorySummary {
        let entries = self.entries();
        let start = entries.len().saturating_sub(badge_count);
        HistorySummary {
            total: entries.len(),
            badges: entries[start..].iter().map(badge_label).collect(),
        }
    }

    /// Delete every record.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn clear(&self) -> Result<bool> {
        self.repo.clear()
    }
}
