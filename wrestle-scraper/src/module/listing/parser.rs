///! Team index and roster HTML parsers

use std::collections::HashSet;

use scraper::{ElementRef, Html, Selector};
use tracing::warn;
use wrestle_common::{Team, Wrestler, title_from_slug};

use crate::error::{ScrapeError, ScrapeResult};
use crate::module::text::{clean_cell, parse_team_href, parse_wrestler_href, person_name, strip_rank};

const TEAM_LINK_SELECTOR: &str = r#"td a[href^="/team/"]"#;
const ROSTER_TABLE_SELECTOR: &str = "div#roster table.table.table-sm.table-hover.table-striped";

pub(crate) fn selector(css: &str) -> ScrapeResult<Selector> {
    Selector::parse(css).map_err(|e| ScrapeError::Config(format!("invalid selector '{}': {:?}", css, e)))
}

fn element_text(element: &ElementRef) -> String {
    clean_cell(&element.text().collect::<String>())
}

/// Parse the D1 rankings table into unique teams, in page order.
pub fn parse_team_index(html: &str, url: &str) -> ScrapeResult<Vec<Team>> {
    let document = Html::parse_document(html);
    let link_sel = selector(TEAM_LINK_SELECTOR)?;

    let links: Vec<ElementRef> = document.select(&link_sel).collect();
    if links.is_empty() {
        return Err(ScrapeError::extraction(url, "no team links in rankings table"));
    }

    let mut seen = HashSet::new();
    let mut teams = Vec::new();

    for link in links {
        let Some(href) = link.value().attr("href") else {
            continue;
        };
        if !href.contains("/profile") {
            continue;
        }
        let Some((id, slug)) = parse_team_href(href) else {
            warn!("Skipping unparseable team link {}", href);
            continue;
        };
        if !seen.insert(id) {
            continue;
        }

        let name = strip_rank(&element_text(&link));
        let name = if name.is_empty() { title_from_slug(&slug) } else { name };
        teams.push(Team { id, slug, name });
    }

    Ok(teams)
}

/// Parse a team's season profile page into its roster.
pub fn parse_roster(html: &str, team: &Team, url: &str) -> ScrapeResult<Vec<Wrestler>> {
    let document = Html::parse_document(html);
    let table_sel = selector(ROSTER_TABLE_SELECTOR)?;
    let row_sel = selector("tbody tr")?;
    let td_sel = selector("td")?;
    let link_sel = selector("a[href]")?;

    let table = document
        .select(&table_sel)
        .next()
        .ok_or_else(|| ScrapeError::extraction(url, "roster table not found"))?;

    let mut roster = Vec::new();

    for row in table.select(&row_sel) {
        // header rows use <th>
        let cells: Vec<ElementRef> = row.select(&td_sel).collect();
        if cells.len() < 2 {
            continue;
        }
        let Some(link) = cells[1].select(&link_sel).next() else {
            continue;
        };
        let href = link.value().attr("href").unwrap_or_default();
        let Some((id, slug)) = parse_wrestler_href(href) else {
            warn!("{}: skipping roster row with link {:?}", team.name, href);
            continue;
        };

        let weight = element_text(&cells[0]);
        roster.push(Wrestler {
            id,
            slug,
            name: person_name(&element_text(&link)),
            weight_class: (!weight.is_empty()).then_some(weight),
            team_slug: team.slug.clone(),
        });
    }

    Ok(roster)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RANKINGS: &str = r#"
        <table class="table table-tight">
          <tr><th>Rank</th><th>Team</th></tr>
          <tr><td>1</td><td><a href="/team/60/penn-state/profile">#1 Penn State</a></td>
              <td><a href="/team/60/penn-state/schedule">schedule</a></td></tr>
          <tr><td>2</td><td><a href="/team/34/iowa/profile"></a></td></tr>
          <tr><td>3</td><td><a href="/team/60/penn-state/profile">Penn State</a></td></tr>
          <tr><td>4</td><td><a href="/team/xx/broken/profile">Broken</a></td></tr>
        </table>"#;

    #[test]
    fn test_parse_team_index() {
        let teams = parse_team_index(RANKINGS, "/d1/rankings/dual").unwrap();
        assert_eq!(
            teams,
            vec![
                Team { id: 60, slug: "penn-state".to_string(), name: "Penn State".to_string() },
                Team { id: 34, slug: "iowa".to_string(), name: "Iowa".to_string() },
            ]
        );
    }

    #[test]
    fn test_parse_team_index_missing_markup() {
        let err = parse_team_index("<html><body>Maintenance</body></html>", "/d1/rankings/dual").unwrap_err();
        assert!(matches!(err, ScrapeError::Extraction { .. }));
    }

    #[test]
    fn test_parse_roster() {
        let html = r#"
          <div id="roster">
            <table class="table table-sm table-hover table-striped">
              <tbody>
                <tr><th>Wt</th><th>Name</th></tr>
                <tr><td>174</td><td><a href="/wrestler/131567/starocci-carter/profile">#1 Starocci, Carter</a></td></tr>
                <tr><td></td><td><a href="/season/2024/wrestler/131570/brooks-aaron/profile">Brooks, Aaron</a></td></tr>
                <tr><td>125</td><td>No link</td></tr>
                <tr><td>133</td><td><a href="/team/60/penn-state/profile">Not a wrestler</a></td></tr>
              </tbody>
            </table>
          </div>"#;
        let team = Team::from_slug(60, "penn-state");
        let roster = parse_roster(html, &team, "/season/2024/team/60/penn-state/profile").unwrap();

        assert_eq!(roster.len(), 2);
        assert_eq!(roster[0].id, 131567);
        assert_eq!(roster[0].name, "Carter Starocci");
        assert_eq!(roster[0].weight_class.as_deref(), Some("174"));
        assert_eq!(roster[0].team_slug, "penn-state");
        assert_eq!(roster[1].slug, "brooks-aaron");
        assert_eq!(roster[1].name, "Aaron Brooks");
        assert_eq!(roster[1].weight_class, None);
    }

    #[test]
    fn test_parse_roster_missing_table() {
        let team = Team::from_slug(34, "iowa");
        let err = parse_roster("<div id='roster'></div>", &team, "/x").unwrap_err();
        assert!(matches!(err, ScrapeError::Extraction { .. }));
    }
}
