use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;
use wrestle_common::Season;

use crate::error::{ScrapeError, ScrapeResult};

pub const REPORT_FILE: &str = "run_report.json";

/// What a failure was attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    /// The season's team index
    Season,
    Team,
    Wrestler,
    Export,
}

#[derive(Debug, Clone, Serialize)]
pub struct Failure {
    pub season: Option<Season>,
    pub kind: EntityKind,
    pub entity: String,
    pub reason: String,
}

/// Outcome of one scraping run: counts, skipped entities and written files.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub seasons: Vec<Season>,

    pub teams_scraped: usize,
    pub teams_inactive: usize,
    pub teams_failed: usize,
    pub wrestlers_scraped: usize,
    /// Scraped, but no matches for the season
    pub wrestlers_empty: usize,
    pub wrestlers_failed: usize,
    pub rows_dropped: usize,
    pub matches: usize,

    pub files_written: Vec<PathBuf>,
    pub failures: Vec<Failure>,
    /// Set when a fatal error stopped the run early
    pub aborted: Option<String>,
}

impl RunReport {
    pub fn new(seasons: Vec<Season>) -> Self {
        Self {
            run_id: Uuid::now_v7(),
            started_at: Utc::now(),
            finished_at: None,
            seasons,
            teams_scraped: 0,
            teams_inactive: 0,
            teams_failed: 0,
            wrestlers_scraped: 0,
            wrestlers_empty: 0,
            wrestlers_failed: 0,
            rows_dropped: 0,
            matches: 0,
            files_written: Vec::new(),
            failures: Vec::new(),
            aborted: None,
        }
    }

    pub fn record_failure(
        &mut self,
        season: Option<Season>,
        kind: EntityKind,
        entity: impl Into<String>,
        error: &ScrapeError,
    ) {
        let entity = entity.into();
        tracing::warn!("Skipping {:?} {}: {}", kind, entity, error);
        self.failures.push(Failure {
            season,
            kind,
            entity,
            reason: error.to_string(),
        });
    }

    pub fn abort(&mut self, error: &ScrapeError) {
        tracing::error!("Stopping run: {}", error);
        self.aborted = Some(error.to_string());
    }

    /// Teams and wrestlers skipped because of an error (inactive teams excluded).
    pub fn skipped_entities(&self) -> usize {
        self.teams_failed + self.wrestlers_failed
    }

    /// No entity failed and the run was not aborted.
    pub fn is_clean(&self) -> bool {
        self.aborted.is_none() && self.failures.is_empty()
    }

    pub fn finish(&mut self, matches: usize) {
        self.matches = matches;
        self.finished_at = Some(Utc::now());
    }

    pub fn log_summary(&self) {
        let elapsed = self
            .finished_at
            .map(|end| (end - self.started_at).num_seconds())
            .unwrap_or_default();
        tracing::info!(
            "Run {} finished in {}s: {} matches, teams {} scraped / {} inactive / {} failed, \
             wrestlers {} scraped ({} empty) / {} failed, {} rows dropped, {} files written",
            self.run_id,
            elapsed,
            self.matches,
            self.teams_scraped,
            self.teams_inactive,
            self.teams_failed,
            self.wrestlers_scraped,
            self.wrestlers_empty,
            self.wrestlers_failed,
            self.rows_dropped,
            self.files_written.len()
        );
        if let Some(reason) = &self.aborted {
            tracing::error!("Run aborted: {}", reason);
        }
    }

    pub fn write_json(&self, path: &Path) -> ScrapeResult<()> {
        let io_error = |source: std::io::Error| ScrapeError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_error)?;
        }
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| io_error(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))?;
        std::fs::write(path, json).map_err(io_error)
    }
}
