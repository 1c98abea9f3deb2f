//! The dream board: one goal and how far along it is.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Error, Result};
use crate::storage::{CollectionKey, Store};

/// Progress shown for a goal that was never saved.
pub const DEFAULT_PROGRESS: u8 = 20;

/// Progress value that counts as reaching the goal.
pub const COMPLETE: u8 = 100;

/// The single dream goal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DreamGoal {
    /// What the athlete is working toward. May be empty.
    #[serde(default)]
    pub goal_text: String,
    /// Percent complete, `0..=100`.
    #[serde(default = "default_progress")]
    pub progress_percent: u8,
}

fn default_progress() -> u8 {
    DEFAULT_PROGRESS
}

impl Default for DreamGoal {
    fn default() -> Self {
        Self {
            goal_text: String::new(),
            progress_percent: DEFAULT_PROGRESS,
        }
    }
}

impl DreamGoal {
    /// The banner line, or `None` when no goal is set.
    #[must_use]
    pub fn headline(&self) -> Option<String> {
        (!self.goal_text.is_empty()).then(|| format!("Dream: {}", self.goal_text))
    }

    /// Whether the goal is complete.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.progress_percent >= COMPLETE
    }
}

/// Side effect fired when a goal reaches 100%.
pub trait Celebrate: Send + Sync {
    /// Called once per write that sets progress to 100.
    fn celebrate(&self, goal: &DreamGoal);
}

impl<F> Celebrate for F
where
    F: Fn(&DreamGoal) + Send + Sync,
{
    fn celebrate(&self, goal: &DreamGoal) {
        self(goal);
    }
}

/// Default celebration: a log line.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogCelebration;

impl Celebrate for LogCelebration {
    fn celebrate(&self, goal: &DreamGoal) {
        info!(goal = %goal.goal_text, "dream goal reached");
    }
}

fn check_progress(progress: u8) -> Result<()> {
    if progress > COMPLETE {
        return Err(Error::validation(format!(
            "Progress must be between 0 and 100, got {progress}."
        )));
    }
    Ok(())
}

/// Reads and writes the dream goal singleton.
pub struct DreamBoard<'a> {
    store: &'a Store,
    celebration: &'a dyn Celebrate,
}

impl std::fmt::Debug for DreamBoard<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DreamBoard")
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}

impl<'a> DreamBoard<'a> {
    /// Open the dream board in `store`.
    #[must_use]
    pub fn new(store: &'a Store, celebration: &'a dyn Celebrate) -> Self {
        Self { store, celebration }
    }

    fn key() -> &'static str {
        CollectionKey::Dream.as_str()
    }

    /// The saved goal, or the default.
    #[must_use]
    pub fn load(&self) -> DreamGoal {
        self.store.get(Self::key(), DreamGoal::default())
    }

    /// Overwrite the goal and progress.
    ///
    /// # Errors
    ///
    /// Returns a validation error if progress exceeds 100, or a storage error.
    pub fn save(&self, goal_text: &str, progress_percent: u8) -> Result<DreamGoal> {
        check_progress(progress_percent)?;
        let dream = DreamGoal {
            goal_text: goal_text.trim().to_string(),
            progress_percent,
        };
        self.store.set(Self::key(), &dream)?;
        self.celebrate_if_complete(&dream);
        Ok(dream)
    }

    /// Change only the progress, keeping the goal text.
    ///
    /// # Errors
    ///
    /// Returns a validation error if progress exceeds 100, or a storage error.
    pub fn set_progress(&self, progress_percent: u8) -> Result<DreamGoal> {
        check_progress(progress_percent)?;
        let dream = self
            .store
            .update(Self::key(), DreamGoal::default, |dream: &mut DreamGoal| {
                dream.progress_percent = progress_percent;
                Ok(dream.clone())
            })?;
        self.celebrate_if_complete(&dream);
        Ok(dream)
    }

    /// Change only the goal text, keeping the saved progress.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the write fails.
    pub fn set_goal(&self, goal_text: &str) -> Result<DreamGoal> {
        let goal_text = goal_text.trim().to_string();
        let dream = self
            .store
            .update(Self::key(), DreamGoal::default, |dream: &mut DreamGoal| {
                dream.goal_text = goal_text;
                Ok(dream.clone())
            })?;
        self.celebrate_if_complete(&dream);
        Ok(dream)
    }

    fn celebrate_if_complete(&self, dream: &DreamGoal) {
        if dream.is_complete() {
            self.celebration.celebrate(dream);
        }
    }
}
