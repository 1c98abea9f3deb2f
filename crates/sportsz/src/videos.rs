//! Uploaded talent videos.

use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Error, Result};
use crate::id::new_id;
use crate::storage::{CollectionKey, Identified, Record, Repository, Store};

/// Shown when an identical upload already exists.
pub const DUPLICATE_VIDEO: &str = "Duplicate video blocked.";

/// Shown when a clip is shorter than the minimum duration.
pub const VIDEO_TOO_SHORT: &str = "Video too short.";

/// A stored video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoAsset {
    /// `v_`-prefixed id.
    pub id: String,
    /// Original file name.
    pub filename: String,
    /// Size of the original file in bytes.
    pub byte_size: u64,
    /// Clip length in seconds.
    pub duration_seconds: f64,
    /// The clip as a `data:` URL.
    pub encoded_payload: String,
    /// When the clip was uploaded.
    pub created_at: DateTime<Utc>,
}

impl Record for VideoAsset {
    const COLLECTION: CollectionKey = CollectionKey::Videos;
}

impl Identified for VideoAsset {
    fn id(&self) -> &str {
        &self.id
    }
}

/// An upload request.
#[derive(Debug, Clone, PartialEq)]
pub struct NewVideo {
    /// Original file name.
    pub filename: String,
    /// Size of the original file in bytes.
    pub byte_size: u64,
    /// Clip length in seconds, as reported by the media probe.
    pub duration_seconds: f64,
    /// The clip as a `data:` URL.
    pub encoded_payload: String,
}

impl NewVideo {
    /// Build an upload from raw file contents.
    #[must_use]
    pub fn from_bytes(filename: impl Into<String>, bytes: &[u8], duration_seconds: f64) -> Self {
        let filename = filename.into();
        let encoded_payload = encode_payload(&filename, bytes);
        Self {
            byte_size: bytes.len() as u64,
            filename,
            duration_seconds,
            encoded_payload,
        }
    }

    fn is_duplicate_of(&self, asset: &VideoAsset) -> bool {
        asset.filename == self.filename && asset.byte_size == self.byte_size
    }
}

/// Encode file contents as a base64 `data:` URL.
#[must_use]
pub fn encode_payload(filename: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime_for(filename), STANDARD.encode(bytes))
}

fn mime_for(filename: &str) -> &'static str {
    let ext = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("mp4" | "m4v") => "video/mp4",
        Some("webm") => "video/webm",
        Some("mov") => "video/quicktime",
        Some("ogv" | "ogg") => "video/ogg",
        Some("mkv") => "video/x-matroska",
        _ => "application/octet-stream",
    }
}

/// The video collection.
#[derive(Debug)]
pub struct VideoLibrary<'a> {
    repo: Repository<'a, VideoAsset>,
    min_duration_seconds: f64,
}

impl<'a> VideoLibrary<'a> {
    /// Open the video collection, rejecting clips shorter than `min_duration_seconds`.
    #[must_use]
    pub fn new(store: &'a Store, min_duration_seconds: f64) -> Self {
        Self {
            repo: Repository::new(store),
            min_duration_seconds,
        }
    }

    /// Store a new clip.
    ///
    /// Rejects clips with the same file name and size as an existing one,
    /// then clips that are too short. Both checks run inside the same locked
    /// read-modify-write as the append.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a duplicate or short clip, or a storage error.
    pub fn upload(&self, video: NewVideo) -> Result<VideoAsset> {
        let min = self.min_duration_seconds;
        let asset = self.repo.try_append(|existing| {
            if existing.iter().any(|v| video.is_duplicate_of(v)) {
                return Err(Error::validation(DUPLICATE_VIDEO));
            }
            if video.duration_seconds.is_nan() || video.duration_seconds < min {
                return Err(Error::validation(VIDEO_TOO_SHORT));
            }
            Ok(VideoAsset {
                id: new_id("v_"),
                filename: video.filename,
                byte_size: video.byte_size,
                duration_seconds: video.duration_seconds,
                encoded_payload: video.encoded_payload,
                created_at: Utc::now(),
            })
        })?;
        info!(id = %asset.id, filename = %asset.filename, bytes = asset.byte_size, "video uploaded");
        Ok(asset)
    }

    /// Delete a clip. Returns `true` if it existed.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn remove(&self, id: &str) -> Result<bool> {
        let removed = self.repo.remove(id)?;
        if removed {
            info!(id, "video deleted");
        }
        Ok(removed)
    }

    /// Look up a clip.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<VideoAsset> {
        self.repo.find(id)
    }

    /// Every clip in upload order.
    #[must_use]
    pub fn list(&self) -> Vec<VideoAsset> {
        self.repo.list()
    }

    /// Every clip, newest first.
    #[must_use]
    pub fn feed(&self) -> Vec<VideoAsset> {
        let mut videos = self.list();
        videos.reverse();
        videos
    }

    /// Number of clips.
    #[must_use]
    pub fn len(&self) -> usize {
        self.repo.len()
    }

    /// Whether there are no clips.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.repo.is_empty()
    }

    /// Delete every clip.
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

    fn clip(name: &str, size: usize, duration: f64) -> NewVideo {
        NewVideo::from_bytes(name, &vec![7u8; size], duration)
    }

    #[test]
    fn test_upload_stores_asset() {
        let store = Store::in_memory();
        let videos = VideoLibrary::new(&store, 1.0);

        let asset = videos.upload(clip("dunk.mp4", 16, 4.5)).unwrap();

        assert!(asset.id.starts_with("v_"));
        assert_eq!(asset.byte_size, 16);
        assert!(asset.encoded_payload.starts_with("data:video/mp4;base64,"));
        assert_eq!(videos.len(), 1);
        assert_eq!(videos.get(&asset.id).unwrap(), asset);
    }

    #[test]
    fn test_duplicate_name_and_size_rejected() {
        let store = Store::in_memory();
        let videos = VideoLibrary::new(&store, 1.0);
        videos.upload(clip("dunk.mp4", 16, 4.5)).unwrap();

        let err = videos.upload(clip("dunk.mp4", 16, 9.0)).unwrap_err();
        assert!(err.is_validation());
        assert_eq!(err.to_string(), DUPLICATE_VIDEO);
        assert_eq!(videos.len(), 1);
    }

    #[test]
    fn test_same_name_different_size_accepted() {
        let store = Store::in_memory();
        let videos = VideoLibrary::new(&store, 1.0);
        videos.upload(clip("dunk.mp4", 16, 4.5)).unwrap();
        videos.upload(clip("dunk.mp4", 17, 4.5)).unwrap();
        videos.upload(clip("jump.mp4", 16, 4.5)).unwrap();
        assert_eq!(videos.len(), 3);
    }

    #[test]
    fn test_short_clip_rejected() {
        let store = Store::in_memory();
        let videos = VideoLibrary::new(&store, 1.0);

        let err = videos.upload(clip("blink.mp4", 8, 0.5)).unwrap_err();
        assert_eq!(err.to_string(), VIDEO_TOO_SHORT);
        assert!(videos.is_empty());

        let err = videos.upload(clip("nan.mp4", 8, f64::NAN)).unwrap_err();
        assert_eq!(err.to_string(), VIDEO_TOO_SHORT);

        videos.upload(clip("exact.mp4", 8, 1.0)).unwrap();
        assert_eq!(videos.len(), 1);
    }

    #[test]
    fn test_remove_and_feed_order() {
        let store = Store::in_memory();
        let videos = VideoLibrary::new(&store, 1.0);
        let first = videos.upload(clip("a.webm", 1, 2.0)).unwrap();
        let second = videos.upload(clip("b.webm", 2, 2.0)).unwrap();

        let feed: Vec<String> = videos.feed().into_iter().map(|v| v.id).collect();
        assert_eq!(feed, vec![second.id.clone(), first.id.clone()]);

        assert!(videos.remove(&first.id).unwrap());
        assert!(!videos.remove(&first.id).unwrap());
        assert_eq!(videos.list(), vec![second]);
    }

    #[test]
    fn test_encode_payload() {
        assert_eq!(encode_payload("clip.MOV", b"hi"), "data:video/quicktime;base64,aGk=");
        assert_eq!(
            encode_payload("clip", b""),
            "data:application/octet-stream;base64,"
        );
    }
}
