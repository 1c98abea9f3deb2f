//! The community talent feed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Error, Result};
use crate::id::new_id;
use crate::storage::{CollectionKey, Identified, Record, Repository, Store};

/// Shown when author or title is missing.
pub const MISSING_POST_FIELDS: &str = "Enter name and title";

/// A talent post. Posts are not linked to athlete profiles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommunityPost {
    /// `c_`-prefixed id.
    pub id: String,
    /// Who posted.
    pub author_name: String,
    /// What they are showing off.
    pub title: String,
    /// When it was posted.
    pub created_at: DateTime<Utc>,
}

impl CommunityPost {
    /// First letter of the author's name, for the avatar.
    #[must_use]
    pub fn initial(&self) -> char {
        self.author_name.chars().next().unwrap_or('A')
    }
}

impl Record for CommunityPost {
    const COLLECTION: CollectionKey = CollectionKey::Community;
}

impl Identified for CommunityPost {
    fn id(&self) -> &str {
        &self.id
    }
}

/// The append-only community feed.
#[derive(Debug)]
pub struct Community<'a> {
    repo: Repository<'a, CommunityPost>,
}

impl<'a> Community<'a> {
    /// Open the community collection in `store`.
    #[must_use]
    pub fn new(store: &'a Store) -> Self {
        Self {
            repo: Repository::new(store),
        }
    }

    /// Publish a post.
    ///
    /// # Errors
    ///
    /// Returns a validation error if either field is blank, or a storage error.
    pub fn post(&self, author_name: &str, title: &str) -> Result<CommunityPost> {
        let author_name = author_name.trim();
        let title = title.trim();
        if author_name.is_empty() || title.is_empty() {
            return Err(Error::validation(MISSING_POST_FIELDS));
        }

        let post = self.repo.append(CommunityPost {
            id: new_id("c_"),
            author_name: author_name.to_string(),
            title: title.to_string(),
            created_at: Utc::now(),
        })?;
        info!(id = %post.id, "community post published");
        Ok(post)
    }

    /// Posts, newest first.
    #[must_use]
    pub fn feed(&self) -> Vec<CommunityPost> {
        let mut posts = self.repo.list();
        posts.reverse();
        posts
    }

    /// Number of posts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.repo.len()
    }

    /// Whether there are no posts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.repo.is_empty()
    }

    /// Delete every post.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn clear(&self) -> Result<bool> {
        self.repo.clear()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_and_feed() {
        let store = Store::in_memory();
        let community = Community::new(&store);

        let first = community.post(" Meera ", " 10 push-ups in 8s ").unwrap();
        let second = community.post("Kabir", "Bicycle kick").unwrap();

        assert!(first.id.starts_with("c_"));
        assert_eq!(first.author_name, "Meera");
        assert_eq!(first.title, "10 push-ups in 8s");
        assert_eq!(community.feed(), vec![second, first]);
    }

    #[test]
    fn test_blank_fields_rejected() {
        let store = Store::in_memory();
        let community = Community::new(&store);

        for (name, title) in [("", "title"), ("name", "  "), ("", "")] {
            let err = community.post(name, title).unwrap_err();
            assert_eq!(err.to_string(), MISSING_POST_FIELDS);
        }
        assert!(community.is_empty());
    }

    #[test]
    fn test_initial() {
        let store = Store::in_memory();
        let community = Community::new(&store);
        let post = community.post("zoya", "Juggling").unwrap();
        assert_eq!(post.initial(), 'z');
    }
}
