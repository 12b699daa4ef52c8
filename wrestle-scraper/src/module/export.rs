///! CSV export
///!
///! Writes match collections with a fixed header row. Files are always
///! rewritten in full, so exporting the same rows twice gives identical bytes.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use wrestle_common::{ColumnSet, Match, Season, Team};

use crate::error::{ScrapeError, ScrapeResult};

pub const TEAM_RESULTS_DIR: &str = "Team Results";
pub const SEASON_RESULTS_DIR: &str = "Year Results";
pub const UNIFIED_FILE: &str = "d1_all_match_results.csv";

/// Characters that cannot appear in a directory name on common filesystems.
fn sanitize_dir_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let cleaned = cleaned.trim().trim_matches('.').to_string();
    if cleaned.is_empty() { "_".to_string() } else { cleaned }
}

/// `Team Results/{Team Name}/{season}_{slug}.csv`
pub fn team_file_path(output_dir: &Path, season: Season, team: &Team) -> PathBuf {
    output_dir
        .join(TEAM_RESULTS_DIR)
        .join(sanitize_dir_name(&team.name))
        .join(format!("{}_{}.csv", season, team.slug))
}

/// `Year Results/{season}_matches.csv`
pub fn season_file_path(output_dir: &Path, season: Season) -> PathBuf {
    output_dir
        .join(SEASON_RESULTS_DIR)
        .join(format!("{}_matches.csv", season))
}

pub fn unified_file_path(output_dir: &Path) -> PathBuf {
    output_dir.join(UNIFIED_FILE)
}

/// Write `matches` to `path`, creating parent directories and replacing any existing file.
pub fn write_matches(path: &Path, matches: &[Match], columns: ColumnSet) -> ScrapeResult<()> {
    let io_error = |source: std::io::Error| ScrapeError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_error)?;
    }

    let file = File::create(path).map_err(io_error)?;
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(BufWriter::new(file));

    writer.write_record(columns.headers())?;
    for record in matches {
        writer.write_record(record.record_for(columns))?;
    }
    writer.flush().map_err(io_error)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use wrestle_common::{MATCH_COLUMNS, UNLISTED_RECORD};

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("wrestle-export-{}-{}", name, uuid::Uuid::now_v7()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn bout(event: &str, score: &str) -> Match {
        Match {
            season: Season(2024),
            date: "02/16/2025".to_string(),
            event: event.to_string(),
            weight_class: "174".to_string(),
            result: "W".to_string(),
            score: score.to_string(),
            opponent: "Edmond Ruth".to_string(),
            wrestler: "Carter Starocci".to_string(),
            school: "Penn State".to_string(),
            result_type: "Dec".to_string(),
            opponent_school: "Illinois".to_string(),
            opponent_record: UNLISTED_RECORD.to_string(),
            opponent_id: Some(140001),
            wrestler_id: Some(131567),
        }
    }

    #[test]
    fn test_round_trip_through_csv_reader() {
        let dir = scratch_dir("roundtrip");
        let path = dir.join("nested").join("out.csv");
        let rows = vec![
            bout("Penn State vs Illinois", "6-1"),
            bout("Southern Scuffle, Day 2", "TF 18-2"),
            bout("\"Beat the Streets\"", "3-2"),
        ];

        write_matches(&path, &rows, ColumnSet::Standard).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers: Vec<String> = reader.headers().unwrap().iter().map(str::to_string).collect();
        assert_eq!(headers, MATCH_COLUMNS.to_vec());

        let parsed: Vec<Vec<String>> = reader
            .records()
            .map(|r| r.unwrap().iter().map(str::to_string).collect())
            .collect();
        assert_eq!(parsed.len(), rows.len());
        for (cells, original) in parsed.iter().zip(&rows) {
            assert_eq!(cells, &original.record());
        }

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_rewrite_is_byte_identical() {
        let dir = scratch_dir("idempotent");
        let path = dir.join("out.csv");
        let rows = vec![bout("Dual", "6-1"), bout("Dual", "6-1")];

        write_matches(&path, &rows, ColumnSet::Extended).unwrap();
        let first = fs::read(&path).unwrap();
        write_matches(&path, &rows, ColumnSet::Extended).unwrap();
        let second = fs::read(&path).unwrap();
        assert_eq!(first, second);

        // a shorter export replaces the old contents entirely
        write_matches(&path, &rows[..1], ColumnSet::Extended).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 2);
        assert!(text.starts_with("Season,Date,Event,Weight Class,Result,Score,Opponent,Wrestler,School,Result Type"));

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_unwritable_path() {
        let dir = scratch_dir("blocked");
        let blocker = dir.join("blocker");
        fs::write(&blocker, "a file, not a directory").unwrap();

        let err = write_matches(&blocker.join("out.csv"), &[bout("Dual", "6-1")], ColumnSet::Standard).unwrap_err();
        assert!(matches!(err, ScrapeError::Io { .. }));

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_output_layout() {
        let out = Path::new("out");
        let team = Team::from_slug(60, "penn-state");
        assert_eq!(
            team_file_path(out, Season(2024), &team),
            Path::new("out/Team Results/Penn State/2024_penn-state.csv")
        );
        assert_eq!(season_file_path(out, Season(2024)), Path::new("out/Year Results/2024_matches.csv"));
        assert_eq!(unified_file_path(out), Path::new("out/d1_all_match_results.csv"));
        assert_eq!(sanitize_dir_name("A/B: C"), "A_B_ C");
        assert_eq!(sanitize_dir_name(".."), "_");
    }
}
