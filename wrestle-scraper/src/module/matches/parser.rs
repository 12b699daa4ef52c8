///! Wrestler profile parser
///!
///! A profile page has one block per season: a `div.row.mt-1` holding an
///! `<h2>` whose first word is the season, followed by a sibling `div.row`
///! with the match table.

use scraper::{ElementRef, Html};
use tracing::debug;
use wrestle_common::{Match, Season, UNLISTED_RECORD, Wrestler};

use crate::error::{ScrapeError, ScrapeResult};
use crate::module::listing::parser::selector;
use crate::module::text::{clean_cell, clean_school, parse_wrestler_href, person_name};

/// Cells in a complete match row
const MATCH_ROW_CELLS: usize = 9;

/// Matches pulled from one profile page, plus how many rows were unusable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    pub matches: Vec<Match>,
    pub dropped_rows: usize,
}

fn cell_text(cell: &ElementRef) -> String {
    clean_cell(&cell.text().collect::<String>())
}

fn is_div_row(element: &ElementRef) -> bool {
    element.value().name() == "div" && element.value().classes().any(|c| c == "row")
}

/// Extract `season`'s matches for `wrestler`, tagging each with `school`.
///
/// Fails only when the page has no season blocks at all. Individual rows
/// that are malformed or missing a required field are counted and skipped.
pub fn parse_wrestler_matches(
    html: &str,
    url: &str,
    season: Season,
    wrestler: &Wrestler,
    school: &str,
) -> ScrapeResult<Extraction> {
    let document = Html::parse_document(html);
    let block_sel = selector("div.row.mt-1")?;
    let h2_sel = selector("h2")?;
    let table_sel = selector("table.table")?;
    let tr_sel = selector("tr")?;
    let td_sel = selector("td")?;
    let a_sel = selector("a")?;
    let small_sel = selector("small")?;

    let blocks: Vec<ElementRef> = document.select(&block_sel).collect();
    if blocks.is_empty() {
        return Err(ScrapeError::extraction(url, "no season blocks on wrestler page"));
    }

    let wanted = season.to_string();
    let mut extraction = Extraction::default();

    for block in blocks {
        let Some(h2) = block.select(&h2_sel).next() else {
            continue;
        };
        let heading = cell_text(&h2);
        if heading.split_whitespace().next() != Some(wanted.as_str()) {
            continue;
        }

        let Some(table_div) = block.next_siblings().filter_map(ElementRef::wrap).find(is_div_row) else {
            continue;
        };
        let Some(table) = table_div.select(&table_sel).next() else {
            continue;
        };

        for tr in table.select(&tr_sel) {
            let cells: Vec<ElementRef> = tr.select(&td_sel).collect();
            if cells.is_empty() {
                continue;
            }
            if cells.len() != MATCH_ROW_CELLS {
                extraction.dropped_rows += 1;
                continue;
            }

            let Some(opponent_link) = cells[1].select(&a_sel).next() else {
                extraction.dropped_rows += 1;
                continue;
            };

            let opponent_record = cells[1]
                .select(&small_sel)
                .next()
                .map(|small| cell_text(&small).trim_matches(|c| c == ' ' || c == '(' || c == ')').to_string())
                .filter(|record| !record.is_empty())
                .unwrap_or_else(|| UNLISTED_RECORD.to_string());

            let record = Match {
                season,
                date: cell_text(&cells[3]),
                event: cell_text(&cells[4]),
                weight_class: cell_text(&cells[5]),
                result: cell_text(&cells[6]),
                score: cell_text(&cells[8]),
                opponent: person_name(&cell_text(&opponent_link)),
                wrestler: wrestler.name.clone(),
                school: school.to_string(),
                result_type: cell_text(&cells[7]),
                opponent_school: clean_school(&cells[2].text().collect::<String>()),
                opponent_record,
                opponent_id: opponent_link
                    .value()
                    .attr("href")
                    .and_then(parse_wrestler_href)
                    .map(|(id, _)| id),
                wrestler_id: Some(wrestler.id),
            };

            if let Some(field) = record.missing_field() {
                debug!("{}: dropping row with empty {}", wrestler.name, field);
                extraction.dropped_rows += 1;
                continue;
            }
            extraction.matches.push(record);
        }
    }

    Ok(extraction)
}
