pub mod parser;

pub use parser::{Extraction, parse_wrestler_matches};

///! Match history extraction from wrestler profile pages
use wrestle_common::{Season, Wrestler};

use crate::error::ScrapeResult;
use crate::module::session::Session;

pub fn wrestler_path(wrestler: &Wrestler) -> String {
    format!("/wrestler/{}/{}/profile", wrestler.id, wrestler.slug)
}

/// Fetch a wrestler's profile and extract the matches for `season`.
pub async fn fetch_wrestler_matches(
    session: &dyn Session,
    season: Season,
    wrestler: &Wrestler,
    school: &str,
) -> ScrapeResult<Extraction> {
    let path = wrestler_path(wrestler);
    let html = session.fetch_page(&path).await?;
    parse_wrestler_matches(&html, &path, season, wrestler, school)
}
