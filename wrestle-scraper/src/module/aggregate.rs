///! In-memory match collections
///!
///! Every match is appended to three independent views: its team's season,
///! its season, and the unified list. Insertion order is kept and duplicates
///! are not removed.

use std::collections::{BTreeMap, HashMap};

use wrestle_common::{Match, Season, Team};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct TeamKey {
    season: Season,
    slug: String,
}

#[derive(Debug, Default)]
pub struct Dataset {
    teams: HashMap<TeamKey, Vec<Match>>,
    seasons: BTreeMap<Season, Vec<Match>>,
    unified: Vec<Match>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, team: &Team, record: Match) {
        let key = TeamKey {
            season: record.season,
            slug: team.slug.clone(),
        };
        self.teams.entry(key).or_default().push(record.clone());
        self.seasons.entry(record.season).or_default().push(record.clone());
        self.unified.push(record);
    }

    pub fn extend(&mut self, team: &Team, records: impl IntoIterator<Item = Match>) {
        for record in records {
            self.push(team, record);
        }
    }

    pub fn team_matches(&self, season: Season, slug: &str) -> &[Match] {
        let key = TeamKey {
            season,
            slug: slug.to_string(),
        };
        self.teams.get(&key).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn season_matches(&self, season: Season) -> &[Match] {
        self.seasons.get(&season).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn unified(&self) -> &[Match] {
        &self.unified
    }

    /// Sum of rows across all per-team collections.
    pub fn team_row_total(&self) -> usize {
        self.teams.values().map(Vec::len).sum()
    }

    pub fn season_row_total(&self) -> usize {
        self.seasons.values().map(Vec::len).sum()
    }

    pub fn len(&self) -> usize {
        self.unified.len()
    }

    pub fn is_empty(&self) -> bool {
        self.unified.is_empty()
    }
}
