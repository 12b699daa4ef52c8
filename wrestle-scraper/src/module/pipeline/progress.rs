use indicatif::{ProgressBar, ProgressStyle};
use wrestle_common::Season;

const TEMPLATE: &str = "{prefix} {msg:<20} [{elapsed_precise}] {bar:40.cyan/blue} {pos:>3}/{len:3} ({eta})";

/// Bar over the teams of one season; hidden when progress display is off.
pub fn season_bar(season: Season, teams: usize, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }
    let style = ProgressStyle::default_bar()
        .template(TEMPLATE)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("##-");
    ProgressBar::new(teams as u64)
        .with_style(style)
        .with_prefix(season.label())
}
