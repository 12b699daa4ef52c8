use std::collections::HashSet;

use wrestle_common::{Season, Team, Wrestler};

use super::parser::{parse_roster, parse_team_index};
use crate::config::ScraperConfig;
use crate::error::ScrapeResult;
use crate::module::session::Session;

pub const TEAM_INDEX_PATH: &str = "/d1/rankings/dual";

pub fn roster_path(season: Season, team: &Team) -> String {
    format!("/season/{}/team/{}/{}/profile", season, team.id, team.slug)
}

/// Teams for `season`: the current rankings plus the configured extra
/// programs, unique by slug. Activity filtering is left to the caller.
pub async fn fetch_teams(session: &dyn Session, config: &ScraperConfig, season: Season) -> ScrapeResult<Vec<Team>> {
    let html = session.fetch_page(TEAM_INDEX_PATH).await?;
    let mut teams = parse_team_index(&html, TEAM_INDEX_PATH)?;

    let mut seen: HashSet<String> = teams.iter().map(|t| t.slug.clone()).collect();
    for extra in config.extra_teams() {
        if seen.insert(extra.slug.clone()) {
            teams.push(extra);
        }
    }

    tracing::info!("Found {} teams for the {} season", teams.len(), season.label());
    Ok(teams)
}

pub async fn fetch_roster(session: &dyn Session, season: Season, team: &Team) -> ScrapeResult<Vec<Wrestler>> {
    let path = roster_path(season, team);
    let html = session.fetch_page(&path).await?;
    let roster = parse_roster(&html, team, &path)?;
    tracing::info!("Found {} wrestlers for {} ({})", roster.len(), team.name, season.label());
    Ok(roster)
}
