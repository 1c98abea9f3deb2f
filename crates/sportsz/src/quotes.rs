//! Motivational quotes for the dream board.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::Result;
use crate::storage::{CollectionKey, Store};

/// Quotes written to the store on first use.
pub const DEFAULT_QUOTES: [&str; 4] = [
    "Champions keep playing until they get it right.",
    "Hard work beats talent when talent doesn't work hard.",
    "Practice like you've never won. Perform like you've never lost.",
    "Small progress each day adds up to big results.",
];

fn defaults() -> Vec<String> {
    DEFAULT_QUOTES.iter().map(ToString::to_string).collect()
}

/// The quotes collection.
#[derive(Debug)]
pub struct Quotes<'a> {
    store: &'a Store,
}

impl<'a> Quotes<'a> {
    /// Open the quotes collection in `store`.
    #[must_use]
    pub fn new(store: &'a Store) -> Self {
        Self { store }
    }

    fn key() -> &'static str {
        CollectionKey::Quotes.as_str()
    }

    /// Write the default quotes if the collection has never been written.
    ///
    /// Returns `true` if defaults were written.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or written.
    pub fn seed(&self) -> Result<bool> {
        if self.store.contains(Self::key())? {
            return Ok(false);
        }
        self.store.set(Self::key(), &defaults())?;
        Ok(true)
    }

    /// All quotes. Falls back to the defaults if the stored list is unreadable.
    #[must_use]
    pub fn all(&self) -> Vec<String> {
        self.store.get(Self::key(), defaults())
    }

    /// Add a quote to the rotation.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn add(&self, quote: &str) -> Result<()> {
        let quote = quote.trim().to_string();
        self.store.update(Self::key(), defaults, |quotes: &mut Vec<String>| {
            quotes.push(quote);
            Ok(())
        })
    }

    /// A random quote, or `None` if the stored list is empty.
    #[must_use]
    pub fn random(&self) -> Option<String> {
        self.random_with(&mut rand::thread_rng())
    }

    /// A random quote drawn with a caller-supplied RNG.
    #[must_use]
    pub fn random_with<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<String> {
        self.all().choose(rng).cloned()
    }
}
