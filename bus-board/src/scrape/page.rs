//! Timetable page parsing.
//!
//! Page layout: each day type lives under `#time_table_tab_{n}` (1 weekday,
//! 2 saturday, 3 holiday). Inside a tab every hour is a `dl.sp_tblTime` row
//! with the hour in `dt` and one `dd span` per departure minute. Minutes may
//! carry annotation marks next to the digits.

use std::collections::BTreeMap;

use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};

use crate::domain::{DayType, Departure};

use super::error::ScrapeError;

const HOUR_ROW: &str = "dl.sp_tblTime";
const HOUR: &str = "dt";
const MINUTES: &str = "dd span";

fn selector(s: &'static str) -> Result<Selector, ScrapeError> {
    Selector::parse(s).map_err(|e| ScrapeError::Selector {
        selector: s,
        message: format!("{:?}", e),
    })
}

fn tab_index(day_type: DayType) -> usize {
    match day_type {
        DayType::Weekday => 1,
        DayType::Saturday => 2,
        DayType::Holiday => 3,
    }
}

/// Split a minute cell into its digits and its annotation.
///
/// Returns `None` when the cell has no digits at all.
///
/// ```
/// use bus_board::scrape::parse_minute;
///
/// assert_eq!(parse_minute("05"), Some(("05".to_string(), None)));
/// assert_eq!(parse_minute("12茅"), Some(("12".to_string(), Some("茅".to_string()))));
/// assert_eq!(parse_minute("※"), None);
/// ```
pub fn parse_minute(cell: &str) -> Option<(String, Option<String>)> {
    let cell = cell.trim();
    let (digits, note): (String, String) = cell.chars().partition(char::is_ascii_digit);
    if digits.is_empty() {
        return None;
    }
    Some((digits, (!note.is_empty()).then_some(note)))
}

/// Parse one station's timetable page into departures per day type.
///
/// Every day type is present in the result. A missing tab yields an empty
/// list. Cells that do not form a valid time are skipped with a warning.
pub fn parse_timetable_page(html: &str) -> Result<BTreeMap<DayType, Vec<Departure>>, ScrapeError> {
    let document = Html::parse_document(html);
    let hour_row = selector(HOUR_ROW)?;
    let hour_cell = selector(HOUR)?;
    let minute_cells = selector(MINUTES)?;

    let mut result = BTreeMap::new();
    for day_type in DayType::ALL {
        let tab_selector = format!("#time_table_tab_{}", tab_index(day_type));
        let tab = Selector::parse(&tab_selector)
            .ok()
            .and_then(|s| document.select(&s).next());

        let departures = match tab {
            Some(tab) => parse_tab(tab, &hour_row, &hour_cell, &minute_cells),
            None => {
                debug!(%day_type, "no timetable tab on page");
                Vec::new()
            }
        };
        result.insert(day_type, departures);
    }

    Ok(result)
}

fn parse_tab(
    tab: ElementRef<'_>,
    hour_row: &Selector,
    hour_cell: &Selector,
    minute_cells: &Selector,
) -> Vec<Departure> {
    let mut departures = Vec::new();

    for row in tab.select(hour_row) {
        let Some(hour_text) = row.select(hour_cell).next().map(text) else {
            continue;
        };
        let Ok(hour) = hour_text.parse::<u32>() else {
            warn!(hour = %hour_text, "skipping row with unreadable hour");
            continue;
        };

        for cell in row.select(minute_cells).map(text) {
            let Some((digits, note)) = parse_minute(&cell) else {
                continue;
            };
            let departure = digits
                .parse::<u32>()
                .ok()
                .and_then(|minute| Departure::new(hour, minute).ok());
            match departure {
                Some(d) => departures.push(match note {
                    Some(note) => d.with_note(note),
                    None => d,
                }),
                None => warn!(hour, minute = %cell, "skipping invalid departure time"),
            }
        }
    }

    departures.sort_by_key(Departure::minutes_of_day);
    departures
}

fn text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><body>
        <div id="time_table_tab_1">
            <dl class="sp_tblTime"><dt>6</dt><dd><span>05</span><span>35茅</span></dd></dl>
            <dl class="sp_tblTime"><dt> 7 </dt><dd><span>00</span><span>※</span><span>20</span></dd></dl>
        </div>
        <div id="time_table_tab_2">
            <dl class="sp_tblTime"><dt>8</dt><dd><span>15</span></dd></dl>
        </div>
        </body></html>
    "#;

    fn times(list: &[Departure]) -> Vec<String> {
        list.iter().map(|d| d.to_string()).collect()
    }

    #[test]
    fn parses_each_tab() {
        let parsed = parse_timetable_page(PAGE).unwrap();

        assert_eq!(times(&parsed[&DayType::Weekday]), ["6:05", "6:35", "7:00", "7:20"]);
        assert_eq!(times(&parsed[&DayType::Saturday]), ["8:15"]);
    }

    #[test]
    fn missing_tab_is_empty() {
        let parsed = parse_timetable_page(PAGE).unwrap();
        assert!(parsed[&DayType::Holiday].is_empty());

        let empty = parse_timetable_page("<html><body></body></html>").unwrap();
        assert_eq!(empty.len(), 3);
        assert!(empty.values().all(Vec::is_empty));
    }

    #[test]
    fn minute_annotations_become_notes() {
        let parsed = parse_timetable_page(PAGE).unwrap();
        let weekday = &parsed[&DayType::Weekday];

        assert_eq!(weekday[0].note(), None);
        assert_eq!(weekday[1].note(), Some("茅"));
    }

    #[test]
    fn invalid_cells_skipped() {
        let page = r#"
            <div id="time_table_tab_3">
                <dl class="sp_tblTime"><dt>始発</dt><dd><span>10</span></dd></dl>
                <dl class="sp_tblTime"><dt>9</dt><dd><span>75</span><span>30</span></dd></dl>
            </div>
        "#;
        let parsed = parse_timetable_page(page).unwrap();
        assert_eq!(times(&parsed[&DayType::Holiday]), ["9:30"]);
    }

    #[test]
    fn split_minute_cells() {
        assert_eq!(parse_minute(" 07 "), Some(("07".into(), None)));
        assert_eq!(parse_minute("4a5"), Some(("45".into(), Some("a".into()))));
        assert_eq!(parse_minute(""), None);
        assert_eq!(parse_minute("◯"), None);
    }
}
