//! Date recognition for order headers and shipment markers.
//!
//! All recognized dates normalize to ISO-8601 calendar form through
//! [`chrono::NaiveDate`].

use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Month-name dates: "January 5, 2026", "Jan 5 2026".
    static ref DATE_MONTH_NAME: Regex = Regex::new(
        r"(?i)\b(January|February|March|April|May|June|July|August|September|October|November|December|Jan|Feb|Mar|Apr|Jun|Jul|Aug|Sept|Sep|Oct|Nov|Dec)\.?\s+(\d{1,2}),?\s+(\d{4})"
    )
    .unwrap();

    /// ISO calendar dates: YYYY-MM-DD.
    static ref DATE_YMD: Regex = Regex::new(r"\b(\d{4})-(\d{1,2})-(\d{1,2})\b").unwrap();

    /// US numeric dates: MM/DD/YYYY or MM/DD/YY (also - and . separators).
    static ref DATE_MDY: Regex =
        Regex::new(r"\b(\d{1,2})[/\-.](\d{1,2})[/\-.](\d{4}|\d{2})\b").unwrap();
}

/// Parse the first recognizable date in `text`.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    if let Some(caps) = DATE_MONTH_NAME.captures(text) {
        let month = month_number(&caps[1]);
        let day: u32 = caps[2].parse().unwrap_or(0);
        let year: i32 = caps[3].parse().unwrap_or(0);
        if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
            return Some(date);
        }
    }

    if let Some(caps) = DATE_YMD.captures(text) {
        let year: i32 = caps[1].parse().unwrap_or(0);
        let month: u32 = caps[2].parse().unwrap_or(0);
        let day: u32 = caps[3].parse().unwrap_or(0);
        if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
            return Some(date);
        }
    }

    if let Some(caps) = DATE_MDY.captures(text) {
        let month: u32 = caps[1].parse().unwrap_or(0);
        let day: u32 = caps[2].parse().unwrap_or(0);
        let year = parse_year(&caps[3]);
        if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
            return Some(date);
        }
    }

    None
}

fn parse_year(s: &str) -> i32 {
    let year: i32 = s.parse().unwrap_or(0);
    if year < 100 {
        // Two-digit year: assume 2000s for 00-50, 1900s for 51-99
        if year <= 50 { 2000 + year } else { 1900 + year }
    } else {
        year
    }
}

fn month_number(month: &str) -> u32 {
    match month.to_lowercase().as_str() {
        "january" | "jan" => 1,
        "february" | "feb" => 2,
        "march" | "mar" => 3,
        "april" | "apr" => 4,
        "may" => 5,
        "june" | "jun" => 6,
        "july" | "jul" => 7,
        "august" | "aug" => 8,
        "september" | "sept" | "sep" => 9,
        "october" | "oct" => 10,
        "november" | "nov" => 11,
        "december" | "dec" => 12,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_month_name() {
        assert_eq!(parse_date("January 5, 2026"), Some(ymd(2026, 1, 5)));
        assert_eq!(parse_date("Shipped on Jul 20 2024"), Some(ymd(2024, 7, 20)));
    }

    #[test]
    fn test_parse_numeric_mdy() {
        assert_eq!(parse_date("01/05/2026"), Some(ymd(2026, 1, 5)));
        assert_eq!(parse_date("12-31-2025"), Some(ymd(2025, 12, 31)));
    }

    #[test]
    fn test_parse_two_digit_year() {
        assert_eq!(parse_date("01/05/26"), Some(ymd(2026, 1, 5)));
        assert_eq!(parse_date("01/05/99"), Some(ymd(1999, 1, 5)));
    }

    #[test]
    fn test_parse_iso() {
        assert_eq!(parse_date("2026-01-05"), Some(ymd(2026, 1, 5)));
    }

    #[test]
    fn test_rejects_non_dates() {
        assert_eq!(parse_date("order 112-0000000"), None);
        assert_eq!(parse_date("no date"), None);
    }
}
