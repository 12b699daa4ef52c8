//! Team and roster listings
//!
//! Walks the D1 rankings index for the teams of a season, then each
//! team's season profile for its wrestlers.

pub mod parser;
mod fetcher;

pub use fetcher::{TEAM_INDEX_PATH, fetch_roster, fetch_teams, roster_path};
pub use parser::{parse_roster, parse_team_index};
