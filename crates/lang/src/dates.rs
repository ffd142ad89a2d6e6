use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;

use recibo_core::lang::DateParser;

macro_rules! re {
    ($name:ident, $pat:expr) => {
        fn $name() -> &'static Regex {
            static R: OnceLock<Regex> = OnceLock::new();
            R.get_or_init(|| Regex::new($pat).expect("invalid regex"))
        }
    };
}

re!(re_month_name,
    r"(?i)\b(january|february|march|april|may|june|july|august|september|october|november|december)\s+(\d{1,2}),?\s+(\d{4})\b");
re!(re_abbr_month,
    r"(?i)\b(\d{1,2})\s+(jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)\.?\s+(\d{4})\b");
re!(re_iso,
    r"\b(\d{4})-(\d{2})-(\d{2})\b");
re!(re_slash,
    r"\b(\d{1,2})/(\d{1,2})/(\d{2,4})\b");
re!(re_dash,
    r"\b(\d{1,2})-(\d{1,2})-(\d{2,4})\b");

/// Regex-cascade date recognizer, tried from most to least specific form.
/// Two-part numeric dates are read as US month/day order.
#[derive(Debug, Default, Clone, Copy)]
pub struct RegexDateParser;

impl RegexDateParser {
    pub fn new() -> Self {
        Self
    }
}

impl DateParser for RegexDateParser {
    fn parse(&self, text: &str) -> Option<NaiveDate> {
        try_month_name(text)
            .or_else(|| try_abbr_month(text))
            .or_else(|| try_iso(text))
            .or_else(|| try_slash(text))
            .or_else(|| try_dash(text))
    }
}

fn try_month_name(text: &str) -> Option<NaiveDate> {
    let c = re_month_name().captures(text)?;
    let month = month_name_to_num(c.get(1)?.as_str())?;
    let day: u32 = c.get(2)?.as_str().parse().ok()?;
    let year: i32 = c.get(3)?.as_str().parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

fn try_abbr_month(text: &str) -> Option<NaiveDate> {
    let c = re_abbr_month().captures(text)?;
    let day: u32 = c.get(1)?.as_str().parse().ok()?;
    let month = abbr_month_to_num(c.get(2)?.as_str())?;
    let year: i32 = c.get(3)?.as_str().parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

fn try_iso(text: &str) -> Option<NaiveDate> {
    let c = re_iso().captures(text)?;
    let y: i32 = c.get(1)?.as_str().parse().ok()?;
    let m: u32 = c.get(2)?.as_str().parse().ok()?;
    let d: u32 = c.get(3)?.as_str().parse().ok()?;
    NaiveDate::from_ymd_opt(y, m, d)
}

fn try_slash(text: &str) -> Option<NaiveDate> {
    let c = re_slash().captures(text)?;
    let month: u32 = c.get(1)?.as_str().parse().ok()?;
    let day: u32 = c.get(2)?.as_str().parse().ok()?;
    let year = expand_year(c.get(3)?.as_str().parse().ok()?);
    NaiveDate::from_ymd_opt(year, month, day)
}

fn try_dash(text: &str) -> Option<NaiveDate> {
    let c = re_dash().captures(text)?;
    let month: u32 = c.get(1)?.as_str().parse().ok()?;
    let day: u32 = c.get(2)?.as_str().parse().ok()?;
    let year = expand_year(c.get(3)?.as_str().parse().ok()?);
    NaiveDate::from_ymd_opt(year, month, day)
}

fn expand_year(y: i32) -> i32 {
    if y < 100 { 2000 + y } else { y }
}

fn month_name_to_num(name: &str) -> Option<u32> {
    match name.to_lowercase().as_str() {
        "january" => Some(1), "february" => Some(2), "march" => Some(3),
        "april" => Some(4), "may" => Some(5), "june" => Some(6),
        "july" => Some(7), "august" => Some(8), "september" => Some(9),
        "october" => Some(10), "november" => Some(11), "december" => Some(12),
        _ => None,
    }
}

fn abbr_month_to_num(name: &str) -> Option<u32> {
    match name.to_lowercase().as_str() {
        "jan" => Some(1), "feb" => Some(2), "mar" => Some(3), "apr" => Some(4),
        "may" => Some(5), "jun" => Some(6), "jul" => Some(7), "aug" => Some(8),
        "sep" => Some(9), "oct" => Some(10), "nov" => Some(11), "dec" => Some(12),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Option<NaiveDate> {
        RegexDateParser::new().parse(text)
    }

    #[test]
    fn iso_format() {
        assert_eq!(parse("2024-03-15"), NaiveDate::from_ymd_opt(2024, 3, 15));
    }

    #[test]
    fn slash_format_is_month_first() {
        assert_eq!(parse("01/02/2023"), NaiveDate::from_ymd_opt(2023, 1, 2));
        assert_eq!(parse("12/31/23"), NaiveDate::from_ymd_opt(2023, 12, 31));
    }

    #[test]
    fn dash_format_with_short_year() {
        assert_eq!(parse("1-15-24"), NaiveDate::from_ymd_opt(2024, 1, 15));
    }

    #[test]
    fn full_month_name() {
        assert_eq!(parse("March 15, 2024"), NaiveDate::from_ymd_opt(2024, 3, 15));
    }

    #[test]
    fn abbreviated_month() {
        assert_eq!(parse("15 Jan 2024"), NaiveDate::from_ymd_opt(2024, 1, 15));
    }

    #[test]
    fn non_dates_fail() {
        assert_eq!(parse("3.50"), None);
        assert_eq!(parse("MILK"), None);
        assert_eq!(parse(""), None);
    }

    #[test]
    fn invalid_calendar_dates_fail() {
        assert_eq!(parse("13/45/2023"), None);
    }
}
