//! Shared data model for the D1 wrestling scraper.

pub mod types;

pub use types::*;
