//! # Streaming Stats
//!
//! Explore an exported streaming history.
//!
//! This crate provides:
//! - Loading of exported JSON history batches, tolerating corrupt files
//! - A normalized, immutable in-memory event log with a reload cache
//! - Year filtering with hour-of-day and day-of-week derivation
//! - Top artists, top tracks and a weekday by hour listening heatmap
//! - CSV export of the ranked tracks

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod analytics;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod filter;
pub mod history;
pub mod types;

pub use config::Config;
pub use error::{Error, Result};
pub use history::{EventLog, History, HistoryCache};

/// Application name
pub const APP_NAME: &str = "streaming-stats";
