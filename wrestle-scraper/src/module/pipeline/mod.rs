mod progress;
mod report;

pub use report::{EntityKind, Failure, REPORT_FILE, RunReport};

///! Scrape run driver
///!
///! Sequential: for each season, for each team, for each wrestler. Each
///! team and wrestler is an isolated step; a failure is recorded in the
///! [`RunReport`] and the run moves on. Only an authentication failure
///! stops it early, and whatever was collected is still written out.
///!
///! Team files are written as soon as the team finishes, season files when
///! the season finishes and the unified file at the end.
use std::path::Path;
use std::time::Duration;

use tracing::{debug, info, warn};
use wrestle_common::{Match, Season, Team};

use crate::config::ScraperConfig;
use crate::error::ScrapeResult;
use crate::module::aggregate::Dataset;
use crate::module::export::{season_file_path, team_file_path, unified_file_path, write_matches};
use crate::module::listing::{TEAM_INDEX_PATH, fetch_roster, fetch_teams};
use crate::module::matches::fetch_wrestler_matches;
use crate::module::session::Session;

/// Everything a finished run produced.
#[derive(Debug)]
pub struct ScrapeRun {
    pub dataset: Dataset,
    pub report: RunReport,
}

pub struct Pipeline<'a> {
    session: &'a dyn Session,
    config: &'a ScraperConfig,
}

impl<'a> Pipeline<'a> {
    pub fn new(session: &'a dyn Session, config: &'a ScraperConfig) -> Self {
        Self { session, config }
    }

    pub async fn run(&self) -> ScrapeRun {
        let mut dataset = Dataset::new();
        let mut report = RunReport::new(self.config.seasons());
        info!("Starting run {}", report.run_id);

        for season in self.config.seasons() {
            info!("==== Scraping {} season ====", season.label());
            self.scrape_season(season, &mut dataset, &mut report).await;

            let season_path = season_file_path(&self.config.output_dir, season);
            self.export(&season_path, dataset.season_matches(season), Some(season), &mut report);

            if report.aborted.is_some() {
                break;
            }
        }

        self.export(&unified_file_path(&self.config.output_dir), dataset.unified(), None, &mut report);
        report.finish(dataset.len());

        let report_path = self.config.output_dir.join(REPORT_FILE);
        if let Err(e) = report.write_json(&report_path) {
            warn!("Failed to write run report: {}", e);
        }
        report.log_summary();

        ScrapeRun { dataset, report }
    }

    async fn scrape_season(&self, season: Season, dataset: &mut Dataset, report: &mut RunReport) {
        let teams = match fetch_teams(self.session, self.config, season).await {
            Ok(teams) => teams,
            Err(e) if e.is_fatal() => {
                report.abort(&e);
                return;
            }
            Err(e) => {
                report.record_failure(Some(season), EntityKind::Season, TEAM_INDEX_PATH, &e);
                return;
            }
        };

        let bar = progress::season_bar(season, teams.len(), self.config.show_progress);
        for team in &teams {
            bar.set_message(team.name.clone());

            if !self.config.is_active(team, season) {
                debug!("Skipping {} for {} (inactive)", team.name, season.label());
                report.teams_inactive += 1;
                bar.inc(1);
                continue;
            }

            let outcome = self.scrape_team(season, team, dataset, report).await;

            let team_path = team_file_path(&self.config.output_dir, season, team);
            self.export(&team_path, dataset.team_matches(season, &team.slug), Some(season), report);

            if let Err(e) = outcome {
                report.abort(&e);
                break;
            }
            bar.inc(1);
            pause(self.config.team_delay()).await;
        }
        bar.finish_and_clear();
    }

    /// Only fatal errors are returned; everything else is recorded and skipped.
    async fn scrape_team(
        &self,
        season: Season,
        team: &Team,
        dataset: &mut Dataset,
        report: &mut RunReport,
    ) -> ScrapeResult<()> {
        let roster = match fetch_roster(self.session, season, team).await {
            Ok(roster) => roster,
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => {
                report.teams_failed += 1;
                report.record_failure(Some(season), EntityKind::Team, team.name.clone(), &e);
                return Ok(());
            }
        };

        for wrestler in &roster {
            match fetch_wrestler_matches(self.session, season, wrestler, &team.name).await {
                Ok(extraction) => {
                    report.wrestlers_scraped += 1;
                    report.rows_dropped += extraction.dropped_rows;
                    if extraction.matches.is_empty() {
                        report.wrestlers_empty += 1;
                    }
                    debug!("{}: {} matches", wrestler.name, extraction.matches.len());
                    dataset.extend(team, extraction.matches);
                }
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    report.wrestlers_failed += 1;
                    let entity = format!("{} ({})", wrestler.name, team.name);
                    report.record_failure(Some(season), EntityKind::Wrestler, entity, &e);
                }
            }
            pause(self.config.wrestler_delay()).await;
        }

        report.teams_scraped += 1;
        Ok(())
    }

    /// Write one artifact. Empty collections are skipped; failures are recorded.
    fn export(&self, path: &Path, matches: &[Match], season: Option<Season>, report: &mut RunReport) {
        if matches.is_empty() {
            debug!("No match data for {:?}, nothing written", path);
            return;
        }
        match write_matches(path, matches, self.config.columns) {
            Ok(()) => {
                info!("Saved {} matches to {:?}", matches.len(), path);
                report.files_written.push(path.to_path_buf());
            }
            Err(e) => {
                report.record_failure(season, EntityKind::Export, path.display().to_string(), &e);
            }
        }
    }
}

async fn pause(duration: Duration) {
    if !duration.is_zero() {
        tokio::time::sleep(duration).await;
    }
}
