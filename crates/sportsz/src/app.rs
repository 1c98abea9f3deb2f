//! The application facade.
//!
//! [`Sportsz`] owns the store and hands out the per-collection views with the
//! configured rules applied.

use tracing::{debug, info};

use crate::athletes::Athletes;
use crate::community::Community;
use crate::config::{BackendKind, Config};
use crate::dream::{Celebrate, DreamBoard, LogCelebration};
use crate::error::Result;
use crate::export;
use crate::history::History;
use crate::quotes::Quotes;
use crate::storage::{
    ChangeListener, CollectionKey, MemoryBackend, SqliteBackend, StorageStats, Store,
};
use crate::videos::VideoLibrary;

/// Record count for one collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionStatus {
    /// Which collection.
    pub key: CollectionKey,
    /// Number of records (1 for a saved dream goal).
    pub records: usize,
}

/// Everything `status` reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppStatus {
    /// Backend-level numbers.
    pub storage: StorageStats,
    /// Per-collection counts, in [`CollectionKey::ALL`] order.
    pub collections: Vec<CollectionStatus>,
}

/// The application: a store plus configuration.
pub struct Sportsz {
    store: Store,
    config: Config,
    celebration: Box<dyn Celebrate>,
}

impl std::fmt::Debug for Sportsz {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sportsz")
            .field("store", &self.store)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Sportsz {
    /// Open the backend named by `config` and seed the default quotes.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or seeded.
    pub fn open(config: &Config) -> Result<Self> {
        let store = match config.storage.backend {
            BackendKind::Sqlite => Store::new(SqliteBackend::open(config.database_path())?),
            BackendKind::Memory => Store::new(MemoryBackend::new()),
        };
        info!(backend = ?config.storage.backend, "store opened");
        Self::with_store(store, config.clone())
    }

    /// An in-memory application with default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if seeding fails.
    pub fn in_memory() -> Result<Self> {
        Self::with_store(Store::in_memory(), Config::default())
    }

    /// Wrap an existing store.
    ///
    /// # Errors
    ///
    /// Returns an error if seeding fails.
    pub fn with_store(store: Store, config: Config) -> Result<Self> {
        let app = Self {
            store,
            config,
            celebration: Box::new(LogCelebration),
        };
        if app.quotes().seed()? {
            debug!("default quotes seeded");
        }
        Ok(app)
    }

    /// Replace what happens when the dream goal reaches 100%.
    #[must_use]
    pub fn with_celebration(mut self, celebration: impl Celebrate + 'static) -> Self {
        self.celebration = Box::new(celebration);
        self
    }

    /// Register a listener for collection writes.
    pub fn subscribe(&mut self, listener: impl ChangeListener + 'static) {
        self.store.subscribe(listener);
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The underlying store.
    #[must_use]
    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Registered athletes.
    #[must_use]
    pub fn athletes(&self) -> Athletes<'_> {
        Athletes::new(&self.store)
    }

    /// Timed activity history.
    #[must_use]
    pub fn history(&self) -> History<'_> {
        History::new(&self.store)
    }

    /// Uploaded videos, with the configured minimum duration.
    #[must_use]
    pub fn videos(&self) -> VideoLibrary<'_> {
        VideoLibrary::new(&self.store, self.config.video.min_duration_seconds)
    }

    /// The community feed.
    #[must_use]
    pub fn community(&self) -> Community<'_> {
        Community::new(&self.store)
    }

    /// The dream board.
    #[must_use]
    pub fn dream(&self) -> DreamBoard<'_> {
        DreamBoard::new(&self.store, self.celebration.as_ref())
    }

    /// Motivational quotes.
    #[must_use]
    pub fn quotes(&self) -> Quotes<'_> {
        Quotes::new(&self.store)
    }

    /// History as CSV, or `None` when there is no history.
    #[must_use]
    pub fn export_history(&self) -> Option<String> {
        export::history_csv(&self.history().entries())
    }

    /// The athlete report as CSV.
    #[must_use]
    pub fn export_report(&self) -> String {
        export::report_csv(&self.athletes().list(), &self.history().entries())
    }

    /// Record counts for every collection.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    pub fn status(&self) -> Result<AppStatus> {
        let collections = CollectionKey::ALL
            .iter()
            .map(|&key| {
                let records = match key {
                    CollectionKey::Users => self.athletes().len(),
                    CollectionKey::History => self.history().len(),
                    CollectionKey::Videos => self.videos().len(),
                    CollectionKey::Community => self.community().len(),
                    CollectionKey::Dream => usize::from(self.store.contains(key.as_str())?),
                    CollectionKey::Quotes => self.quotes().all().len(),
                };
                Ok(CollectionStatus { key, records })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(AppStatus {
            storage: self.store.stats()?,
            collections,
        })
    }

    /// Delete one collection. Quotes are re-seeded with the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn reset(&self, key: CollectionKey) -> Result<bool> {
        let removed = self.store.remove(key.as_str())?;
        if key == CollectionKey::Quotes {
            self.quotes().seed()?;
        }
        info!(collection = %key, removed, "collection reset");
        Ok(removed)
    }
}
