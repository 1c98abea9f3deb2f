//! `sportsz` - A local-first youth sports engagement tool
//!
//! This library provides athlete registration, run timing with speed
//! analytics, video uploads, a community feed and a dream-goal board, all
//! persisted to a local key-value store.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod app;
pub mod athletes;
pub mod chart;
pub mod cli;
pub mod coach;
pub mod community;
pub mod config;
pub mod dream;
pub mod eligibility;
pub mod error;
pub mod export;
pub mod history;
pub mod id;
pub mod logging;
pub mod notify;
pub mod quotes;
pub mod storage;
pub mod timer;
pub mod videos;

pub use app::Sportsz;
pub use config::Config;
pub use error::{Error, Result};
pub use history::{ActivityKind, TimedActivityRecord};
pub use logging::init_logging;
pub use storage::{CollectionKey, StorageStats, Store};
