///! Cell text cleanup shared by the listing and match parsers

use std::sync::LazyLock;

use regex::Regex;

static RANK_PREFIX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^#\d+\s*").expect("valid regex"));
static SCHOOL_NOISE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(.*?\)|#\d+\s*").expect("valid regex"));

/// Collapse runs of whitespace and trim.
pub fn clean_cell(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// "#13 Penn State" -> "Penn State"
pub fn strip_rank(s: &str) -> String {
    RANK_PREFIX.replace(&clean_cell(s), "").trim().to_string()
}

/// "#13 Camacho, Jakob" -> "Jakob Camacho". Names without a comma are kept as-is.
pub fn person_name(raw: &str) -> String {
    let name = strip_rank(raw);
    match name.split_once(',') {
        Some((last, first)) if !first.trim().is_empty() => {
            format!("{} {}", first.trim(), last.trim())
        }
        _ => name,
    }
}

/// "#4 Illinois (12-3)" -> "Illinois"
pub fn clean_school(raw: &str) -> String {
    clean_cell(&SCHOOL_NOISE.replace_all(raw, ""))
}

/// Pull `(id, slug)` out of `/wrestler/{id}/{slug}/...` or
/// `/season/{year}/wrestler/{id}/{slug}/...`.
pub fn parse_wrestler_href(href: &str) -> Option<(u32, String)> {
    let parts: Vec<&str> = href.trim().trim_matches('/').split('/').collect();
    let at = parts.iter().position(|p| p.eq_ignore_ascii_case("wrestler"))?;
    let id = parts.get(at + 1)?.parse().ok()?;
    let slug = parts.get(at + 2).filter(|s| !s.is_empty())?;
    Some((id, slug.to_string()))
}

/// Pull `(id, slug)` out of `/team/{id}/{slug}/profile`.
pub fn parse_team_href(href: &str) -> Option<(u32, String)> {
    let parts: Vec<&str> = href.trim().trim_matches('/').split('/').collect();
    let at = parts.iter().position(|p| p.eq_ignore_ascii_case("team"))?;
    let id = parts.get(at + 1)?.parse().ok()?;
    let slug = parts.get(at + 2).filter(|s| !s.is_empty())?;
    Some((id, slug.to_string()))
}
