use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use wrestle_common::{ColumnSet, Season, Team};

use crate::error::{ScrapeError, ScrapeResult};

pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

const SEASON_YEARS: std::ops::RangeInclusive<u16> = 1900..=9999;

/// Which browsing context the scraper logs in with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionBackend {
    /// Cookie-carrying HTTP client
    #[default]
    Http,
    /// Headless Chromium tab
    Browser,
}

/// A team that is no longer in the current rankings but should still be scraped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtraTeam {
    pub id: u32,
    pub slug: String,
}

/// Inclusive range of seasons a program competed in D1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveSeasons {
    pub first: u16,
    pub last: u16,
}

impl ActiveSeasons {
    pub fn contains(&self, season: Season) -> bool {
        (self.first..=self.last).contains(&season.year())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScraperConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default)]
    pub backend: SessionBackend,

    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    #[serde(default = "default_first_season")]
    pub first_season: u16,

    #[serde(default = "default_last_season")]
    pub last_season: u16,

    #[serde(default = "default_page_timeout_secs")]
    pub page_timeout_secs: u64,

    /// Pause after each wrestler page
    #[serde(default = "default_wrestler_delay_ms")]
    pub wrestler_delay_ms: u64,

    /// Pause after each team
    #[serde(default = "default_team_delay_ms")]
    pub team_delay_ms: u64,

    #[serde(default = "default_show_progress")]
    pub show_progress: bool,

    #[serde(default)]
    pub columns: ColumnSet,

    #[serde(default = "default_extra_teams")]
    pub extra_teams: Vec<ExtraTeam>,

    /// Programs that joined or left D1 inside the scraped range, keyed by slug
    #[serde(default = "default_activity")]
    pub activity: HashMap<String, ActiveSeasons>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_dir() -> PathBuf {
    PathBuf::from("logs")
}

fn default_base_url() -> String {
    "https://www.wrestlestat.com".to_string()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_first_season() -> u16 {
    2014
}

fn default_last_season() -> u16 {
    2026
}

fn default_page_timeout_secs() -> u64 {
    60
}

fn default_wrestler_delay_ms() -> u64 {
    1000
}

fn default_team_delay_ms() -> u64 {
    2000
}

fn default_show_progress() -> bool {
    true
}

fn default_extra_teams() -> Vec<ExtraTeam> {
    [
        (9, "boston-u"),
        (8, "boise-state"),
        (25, "eastern-michigan"),
        (58, "old-dominion"),
        (829, "fresno-state"),
    ]
    .into_iter()
    .map(|(id, slug)| ExtraTeam { id, slug: slug.to_string() })
    .collect()
}

fn default_activity() -> HashMap<String, ActiveSeasons> {
    [
        // moved up to D1
        ("little-rock", 2020, 2026),
        ("liu", 2020, 2026),
        ("presbyterian", 2020, 2026),
        ("cal-baptist", 2023, 2026),
        ("morgan-state", 2024, 2026),
        ("bellarmine", 2025, 2026),
        // moved down
        ("boston-u", 2014, 2014),
        ("boise-state", 2014, 2017),
        ("eastern-michigan", 2014, 2018),
        ("old-dominion", 2014, 2020),
        // up, then down again
        ("fresno-state", 2018, 2021),
    ]
    .into_iter()
    .map(|(slug, first, last)| (slug.to_string(), ActiveSeasons { first, last }))
    .collect()
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_dir: default_log_dir(),
            base_url: default_base_url(),
            backend: SessionBackend::default(),
            output_dir: default_output_dir(),
            first_season: default_first_season(),
            last_season: default_last_season(),
            page_timeout_secs: default_page_timeout_secs(),
            wrestler_delay_ms: default_wrestler_delay_ms(),
            team_delay_ms: default_team_delay_ms(),
            show_progress: default_show_progress(),
            columns: ColumnSet::default(),
            extra_teams: default_extra_teams(),
            activity: default_activity(),
        }
    }
}

impl ScraperConfig {
    pub fn from_file(path: impl AsRef<Path>) -> ScrapeResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ScrapeError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> ScrapeResult<Self> {
        let config: ScraperConfig =
            toml::from_str(content).map_err(|e| ScrapeError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read `path` if it exists, otherwise fall back to built-in defaults.
    pub fn load(path: impl AsRef<Path>) -> ScrapeResult<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    fn validate(&self) -> ScrapeResult<()> {
        for year in [self.first_season, self.last_season] {
            if !SEASON_YEARS.contains(&year) {
                return Err(ScrapeError::Config(format!("season {} is out of range", year)));
            }
        }
        if self.first_season > self.last_season {
            return Err(ScrapeError::Config(format!(
                "first_season {} is after last_season {}",
                self.first_season, self.last_season
            )));
        }
        if reqwest::Url::parse(&self.base_url).is_err() {
            return Err(ScrapeError::Config(format!("invalid base_url '{}'", self.base_url)));
        }
        Ok(())
    }

    pub fn seasons(&self) -> Vec<Season> {
        (self.first_season..=self.last_season).map(Season).collect()
    }

    pub fn page_timeout(&self) -> Duration {
        Duration::from_secs(self.page_timeout_secs)
    }

    pub fn wrestler_delay(&self) -> Duration {
        Duration::from_millis(self.wrestler_delay_ms)
    }

    pub fn team_delay(&self) -> Duration {
        Duration::from_millis(self.team_delay_ms)
    }

    pub fn extra_teams(&self) -> Vec<Team> {
        self.extra_teams
            .iter()
            .map(|t| Team::from_slug(t.id, t.slug.clone()))
            .collect()
    }

    /// Teams without an activity entry are treated as active every season.
    pub fn is_active(&self, team: &Team, season: Season) -> bool {
        self.activity
            .get(&team.slug)
            .map_or(true, |range| range.contains(season))
    }

    /// Absolute URL for a site path such as "/account/login".
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_toml() {
        let config = ScraperConfig::from_toml("").unwrap();
        assert_eq!(config.base_url, "https://www.wrestlestat.com");
        assert_eq!(config.backend, SessionBackend::Http);
        assert_eq!(config.seasons().len(), 13);
        assert_eq!(config.seasons()[0], Season(2014));
        assert_eq!(config.extra_teams().len(), 5);
        assert_eq!(config.columns, ColumnSet::Standard);
    }

    #[test]
    fn test_overrides() {
        let config = ScraperConfig::from_toml(
            r#"
            base_url = "http://127.0.0.1:8080/"
            backend = "browser"
            first_season = 2024
            last_season = 2024
            wrestler_delay_ms = 0
            columns = "extended"
            extra_teams = []

            [activity]
            iowa = { first = 2030, last = 2031 }
            "#,
        )
        .unwrap();
        assert_eq!(config.backend, SessionBackend::Browser);
        assert_eq!(config.seasons(), vec![Season(2024)]);
        assert_eq!(config.wrestler_delay(), Duration::ZERO);
        assert_eq!(config.url("/d1/rankings/dual"), "http://127.0.0.1:8080/d1/rankings/dual");
        assert!(config.extra_teams().is_empty());
        assert_eq!(config.columns, ColumnSet::Extended);
        assert!(!config.is_active(&Team::from_slug(34, "iowa"), Season(2024)));
    }

    #[test]
    fn test_activity_map() {
        let config = ScraperConfig::default();
        let boise = Team::from_slug(8, "boise-state");
        assert!(config.is_active(&boise, Season(2017)));
        assert!(!config.is_active(&boise, Season(2018)));
        assert!(config.is_active(&Team::from_slug(60, "penn-state"), Season(2014)));
    }

    #[test]
    fn test_invalid_range_rejected() {
        let err = ScraperConfig::from_toml("first_season = 2026\nlast_season = 2014").unwrap_err();
        assert!(matches!(err, ScrapeError::Config(_)));
        assert!(ScraperConfig::from_toml("base_url = \"not a url\"").is_err());
        let err = ScraperConfig::from_toml("first_season = 2024\nlast_season = 65535").unwrap_err();
        assert!(matches!(err, ScrapeError::Config(_)));
    }

    #[test]
    fn test_sample_config_matches_defaults() {
        let config = ScraperConfig::from_toml(include_str!("../../config.toml")).unwrap();
        let defaults = ScraperConfig::default();
        assert_eq!(config.extra_teams, defaults.extra_teams);
        assert_eq!(config.activity, defaults.activity);
        assert_eq!(config.seasons(), defaults.seasons());
    }
}
