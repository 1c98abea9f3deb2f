//! Typed access to list-shaped collections.

use std::fmt;
use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{CollectionKey, Store};
use crate::error::Result;

/// A record persisted as an element of a list collection.
pub trait Record: Serialize + DeserializeOwned + Clone + fmt::Debug {
    /// The collection this record lives in.
    const COLLECTION: CollectionKey;
}

/// A record that can be looked up and deleted by id.
pub trait Identified: Record {
    /// The record's id.
    fn id(&self) -> &str;
}

/// Repository over one list collection.
///
/// Every mutation goes through [`Store::update`], so the load-mutate-save
/// cycle happens under the store lock.
pub struct Repository<'a, T> {
    store: &'a Store,
    _record: PhantomData<fn() -> T>,
}

impl<T> fmt::Debug for Repository<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Repository")
            .field("collection", &std::any::type_name::<T>())
            .finish_non_exhaustive()
    }
}

impl<'a, T: Record> Repository<'a, T> {
    /// Create a repository backed by `store`.
    #[must_use]
    pub fn new(store: &'a Store) -> Self {
        Self {
            store,
            _record: PhantomData,
        }
    }

    fn key() -> &'static str {
        T::COLLECTION.as_str()
    }

    /// All records, in insertion order.
    #[must_use]
    pub fn list(&self) -> Vec<T> {
        self.store.get(Self::key(), Vec::new())
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.list().len()
    }

    /// Whether the collection has no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Append a record.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn append(&self, record: T) -> Result<T> {
        self.try_append(|_| Ok(record))
    }

    /// Build a record from the current contents and append it.
    ///
    /// `build` sees the existing records and may reject the append; in that
    /// case nothing is written.
    ///
    /// # Errors
    ///
    /// Returns the error from `build`, or an error if the write fails.
    pub fn try_append<F>(&self, build: F) -> Result<T>
    where
        F: FnOnce(&[T]) -> Result<T>,
    {
        self.store.update(Self::key(), Vec::new, |records: &mut Vec<T>| {
            let record = build(records)?;
            records.push(record.clone());
            Ok(record)
        })
    }

    /// Delete the whole collection.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn clear(&self) -> Result<bool> {
        self.store.remove(Self::key())
    }
}

impl<T: Identified> Repository<'_, T> {
    /// Find a record by id.
    #[must_use]
    pub fn find(&self, id: &str) -> Option<T> {
        self.list().into_iter().find(|r| r.id() == id)
    }

    /// Remove a record by id. Returns `true` if it existed.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn remove(&self, id: &str) -> Result<bool> {
        self.store
            .update(Self::key(), Vec::new, |records: &mut Vec<T>| {
                let before = records.len();
                records.retain(|r| r.id() != id);
                Ok(records.len() != before)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Note {
        id: String,
        text: String,
    }

    impl Record for Note {
        const COLLECTION: CollectionKey = CollectionKey::Community;
    }

    impl Identified for Note {
        fn id(&self) -> &str {
            &self.id
        }
    }

    fn note(id: &str, text: &str) -> Note {
        Note {
            id: id.to_string(),
            text: text.to_string(),
        }
    }

    #[test]
    fn test_append_and_list_preserve_order() {
        let store = Store::in_memory();
        let repo = Repository::<Note>::new(&store);

        repo.append(note("a", "first")).unwrap();
        repo.append(note("b", "second")).unwrap();

        let ids: Vec<String> = repo.list().into_iter().map(|n| n.id).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(repo.len(), 2);
        assert!(!repo.is_empty());
    }

    #[test]
    fn test_try_append_rejection_leaves_collection_unchanged() {
        let store = Store::in_memory();
        let repo = Repository::<Note>::new(&store);
        repo.append(note("a", "first")).unwrap();

        let result = repo.try_append(|existing| {
            if existing.iter().any(|n| n.text == "first") {
                return Err(Error::validation("duplicate"));
            }
            Ok(note("b", "first"))
        });

        assert!(result.unwrap_err().is_validation());
        assert_eq!(repo.len(), 1);
    }

    #[test]
    fn test_find_and_remove() {
        let store = Store::in_memory();
        let repo = Repository::<Note>::new(&store);
        repo.append(note("a", "first")).unwrap();
        repo.append(note("b", "second")).unwrap();

        assert_eq!(repo.find("b").unwrap().text, "second");
        assert!(repo.remove("a").unwrap());
        assert!(!repo.remove("a").unwrap());
        assert!(repo.find("a").is_none());
        assert_eq!(repo.len(), 1);
    }

    #[test]
    fn test_clear() {
        let store = Store::in_memory();
        let repo = Repository::<Note>::new(&store);
        repo.append(note("a", "first")).unwrap();

        assert!(repo.clear().unwrap());
        assert!(repo.is_empty());
    }

    #[test]
    fn test_repository_debug() {
        let store = Store::in_memory();
        let repo = Repository::<Note>::new(&store);
        assert!(format!("{repo:?}").contains("Repository"));
    }
}
