use serde::{Deserialize, Serialize};

/// Column headers of the standard match export, in write order.
pub const MATCH_COLUMNS: [&str; 9] = [
    "Season",
    "Date",
    "Event",
    "Weight Class",
    "Result",
    "Score",
    "Opponent",
    "Wrestler",
    "School",
];

/// Extra headers appended when the extended column set is selected.
pub const EXTENDED_COLUMNS: [&str; 5] = [
    "Result Type",
    "Opponent School",
    "Opponent Record",
    "Opponent ID",
    "Wrestler ID",
];

/// Placeholder used when the opponent's record is not shown on the page.
pub const UNLISTED_RECORD: &str = "Unlisted";

/// Competition year identifier. `Season(2024)` is the 2024-25 cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Season(pub u16);

impl Season {
    pub fn year(&self) -> u16 {
        self.0
    }

    /// Human label, e.g. "2024-25".
    pub fn label(&self) -> String {
        format!("{}-{:02}", self.0, (self.0 % 100 + 1) % 100)
    }
}

impl std::fmt::Display for Season {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A D1 program as listed on the site.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Team {
    pub id: u32,
    /// URL-friendly name, e.g. "penn-state"
    pub slug: String,
    /// Display name, e.g. "Penn State"
    pub name: String,
}

impl Team {
    /// Build a team whose display name is derived from the slug.
    pub fn from_slug(id: u32, slug: impl Into<String>) -> Self {
        let slug = slug.into();
        let name = title_from_slug(&slug);
        Self { id, slug, name }
    }
}

/// "penn-state" -> "Penn State"
pub fn title_from_slug(slug: &str) -> String {
    slug.split('-')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(|c| c.to_lowercase())).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// A roster entry for one team in one season.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wrestler {
    pub id: u32,
    pub slug: String,
    /// "First Last"
    pub name: String,
    pub weight_class: Option<String>,
    /// Slug of the owning team (lookup only)
    pub team_slug: String,
}

/// Which columns an export writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnSet {
    #[default]
    Standard,
    Extended,
}

impl ColumnSet {
    pub fn headers(&self) -> Vec<&'static str> {
        match self {
            ColumnSet::Standard => MATCH_COLUMNS.to_vec(),
            ColumnSet::Extended => MATCH_COLUMNS.iter().chain(EXTENDED_COLUMNS.iter()).copied().collect(),
        }
    }
}

/// One bout as seen from a wrestler's profile page.
///
/// The first nine fields are required and never empty in extracted output.
/// The rest are carried for the extended export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    pub season: Season,
    pub date: String,
    pub event: String,
    pub weight_class: String,
    /// Outcome code, e.g. "W" / "L"
    pub result: String,
    pub score: String,
    pub opponent: String,
    pub wrestler: String,
    /// The wrestler's school
    pub school: String,

    /// Win type, e.g. "Dec", "MD", "Fall"
    pub result_type: String,
    pub opponent_school: String,
    pub opponent_record: String,
    pub opponent_id: Option<u32>,
    pub wrestler_id: Option<u32>,
}

impl Match {
    /// Name of the first required field that is blank, if any.
    pub fn missing_field(&self) -> Option<&'static str> {
        let required = [
            ("Date", &self.date),
            ("Event", &self.event),
            ("Weight Class", &self.weight_class),
            ("Result", &self.result),
            ("Score", &self.score),
            ("Opponent", &self.opponent),
            ("Wrestler", &self.wrestler),
            ("School", &self.school),
        ];
        required
            .into_iter()
            .find(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| name)
    }

    pub fn is_complete(&self) -> bool {
        self.missing_field().is_none()
    }

    /// Cells in [`MATCH_COLUMNS`] order.
    pub fn record(&self) -> Vec<String> {
        vec![
            self.season.to_string(),
            self.date.clone(),
            self.event.clone(),
            self.weight_class.clone(),
            self.result.clone(),
            self.score.clone(),
            self.opponent.clone(),
            self.wrestler.clone(),
            self.school.clone(),
        ]
    }

    pub fn record_for(&self, columns: ColumnSet) -> Vec<String> {
        let mut cells = self.record();
        if columns == ColumnSet::Extended {
            cells.push(self.result_type.clone());
            cells.push(self.opponent_school.clone());
            cells.push(self.opponent_record.clone());
            cells.push(self.opponent_id.map(|id| id.to_string()).unwrap_or_default());
            cells.push(self.wrestler_id.map(|id| id.to_string()).unwrap_or_default());
        }
        cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Match {
        Match {
            season: Season(2024),
            date: "02/16/2025".to_string(),
            event: "Penn State vs Illinois".to_string(),
            weight_class: "174".to_string(),
            result: "W".to_string(),
            score: "6-1".to_string(),
            opponent: "Edmond Ruth".to_string(),
            wrestler: "Carter Starocci".to_string(),
            school: "Penn State".to_string(),
            result_type: "Dec".to_string(),
            opponent_school: "Illinois".to_string(),
            opponent_record: UNLISTED_RECORD.to_string(),
            opponent_id: Some(131000),
            wrestler_id: Some(131567),
        }
    }

    #[test]
    fn test_season_label() {
        assert_eq!(Season(2024).label(), "2024-25");
        assert_eq!(Season(1999).label(), "1999-00");
        assert_eq!(Season(u16::MAX).label(), "65535-36");
    }

    #[test]
    fn test_title_from_slug() {
        assert_eq!(title_from_slug("penn-state"), "Penn State");
        assert_eq!(title_from_slug("iowa"), "Iowa");
        assert_eq!(title_from_slug("nc-state"), "Nc State");
        assert_eq!(Team::from_slug(60, "penn-state").name, "Penn State");
    }

    #[test]
    fn test_record_order_matches_headers() {
        let m = sample();
        let cells = m.record();
        assert_eq!(cells.len(), MATCH_COLUMNS.len());
        assert_eq!(cells[0], "2024");
        assert_eq!(cells[6], "Edmond Ruth");
        assert_eq!(cells[8], "Penn State");

        let extended = m.record_for(ColumnSet::Extended);
        assert_eq!(extended.len(), ColumnSet::Extended.headers().len());
        assert_eq!(extended[9], "Dec");
        assert_eq!(extended[13], "131567");
    }

    #[test]
    fn test_missing_field_detection() {
        let mut m = sample();
        assert!(m.is_complete());
        m.score = "  ".to_string();
        assert_eq!(m.missing_field(), Some("Score"));
        m.opponent.clear();
        assert_eq!(m.missing_field(), Some("Score"));
    }
}
