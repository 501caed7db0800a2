//! Shared date extraction for education, experience, project and achievement text.
//!
//! Three pattern families are recognised: month name + year ("Sep 2019",
//! "January 2020"), `MM/YYYY`, and a bare four-digit year. Spans already
//! claimed by the first two families are masked before bare years are
//! scanned, so "05/2019" yields one date rather than two.

use std::ops::Range;
use std::sync::LazyLock;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use regex::Regex;

static MONTH_YEAR_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)\.?,?\s+((?:19|20)\d{2})\b",
    )
    .expect("valid month-year regex")
});

static NUMERIC_MONTH_YEAR_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(0?[1-9]|1[0-2])/((?:19|20)\d{2})\b").expect("valid MM/YYYY regex")
});

static YEAR_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b((?:19|20)\d{2})\b").expect("valid year regex"));

/// Start/end pair inferred from free text. `end == None` means ongoing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateSpan {
    pub start: NaiveDate,
    pub end: Option<NaiveDate>,
}

/// Placeholder used when a required start date cannot be found in the text.
///
/// `CurrentYear` resolves to January 1st of the year at the time of each
/// lookup, so a long-running process follows the calendar. `Fixed` pins the
/// placeholder through config. Either way it is a compatibility value, not a
/// "missing" marker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DateDefaults {
    #[default]
    CurrentYear,
    Fixed(NaiveDate),
}

impl DateDefaults {
    pub fn fallback_start(&self) -> NaiveDate {
        self.fallback_start_at(Utc::now())
    }

    fn fallback_start_at(&self, now: DateTime<Utc>) -> NaiveDate {
        match self {
            DateDefaults::CurrentYear => {
                NaiveDate::from_ymd_opt(now.year(), 1, 1).unwrap_or(NaiveDate::MIN)
            }
            DateDefaults::Fixed(date) => *date,
        }
    }
}

/// Every date found in `text`, sorted chronologically.
pub fn find_dates(text: &str) -> Vec<NaiveDate> {
    let mut dates = Vec::new();
    let mut claimed: Vec<Range<usize>> = Vec::new();

    for caps in MONTH_YEAR_REGEX.captures_iter(text) {
        let (Some(whole), Some(month), Some(year)) = (caps.get(0), caps.get(1), caps.get(2))
        else {
            continue;
        };
        if let Some(date) = month_from_name(month.as_str())
            .and_then(|m| ymd(year.as_str(), m))
        {
            dates.push(date);
            claimed.push(whole.range());
        }
    }

    for caps in NUMERIC_MONTH_YEAR_REGEX.captures_iter(text) {
        let (Some(whole), Some(month), Some(year)) = (caps.get(0), caps.get(1), caps.get(2))
        else {
            continue;
        };
        if overlaps(&claimed, &whole.range()) {
            continue;
        }
        if let Some(date) = month.as_str().parse::<u32>().ok().and_then(|m| ymd(year.as_str(), m))
        {
            dates.push(date);
            claimed.push(whole.range());
        }
    }

    for m in YEAR_REGEX.find_iter(text) {
        if overlaps(&claimed, &m.range()) {
            continue;
        }
        if let Some(date) = ymd(m.as_str(), 1) {
            dates.push(date);
        }
    }

    dates.sort();
    dates
}

/// Earliest date is the start and the latest is the end, whatever order
/// they appear in. No dates → the configured placeholder start, no end.
pub fn extract_span(text: &str, defaults: &DateDefaults) -> DateSpan {
    extract_optional_span(text).unwrap_or_else(|| DateSpan {
        start: defaults.fallback_start(),
        end: None,
    })
}

/// Like [`extract_span`] but without the placeholder: `None` when the text
/// carries no date at all.
pub fn extract_optional_span(text: &str) -> Option<DateSpan> {
    let dates = find_dates(text);
    let start = *dates.first()?;
    let end = if dates.len() >= 2 { dates.last().copied() } else { None };
    Some(DateSpan { start, end })
}

fn month_from_name(name: &str) -> Option<u32> {
    let prefix: String = name.chars().take(3).collect::<String>().to_lowercase();
    let month = match prefix.as_str() {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    Some(month)
}

fn ymd(year: &str, month: u32) -> Option<NaiveDate> {
    let year = year.parse::<i32>().ok()?;
    NaiveDate::from_ymd_opt(year, month, 1)
}

fn overlaps(claimed: &[Range<usize>], range: &Range<usize>) -> bool {
    claimed
        .iter()
        .any(|c| c.start < range.end && range.start < c.end)
}
