use chrono::{DateTime, NaiveDate, NaiveDateTime};

const SECONDS_PER_DAY: i64 = 86_400;
pub(crate) const DAYS_PER_MONTH: f64 = 30.4375;
pub(crate) const DAYS_PER_YEAR: f64 = 365.25;

// Fractional seconds come from database/pandas exports (`2025-06-01 00:00:00.000`).
const DATETIME_FORMATS: &[&str] = &[
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M:%S%.f",
    "%d/%m/%Y %H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
];

// Day-first formats come before ISO so "03/04/2024" reads as 3 April.
const DATE_FORMATS: &[&str] = &["%d/%m/%Y", "%d-%m-%Y", "%d.%m.%Y", "%Y-%m-%d", "%Y/%m/%d"];

const TRUTHY: &[&str] = &["1", "true", "t", "s", "sim", "y", "yes", "x", "verdadeiro"];

pub(crate) fn parse_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|cell| !cell.is_empty())
        .map(str::to_string)
}

pub(crate) fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_utc());
    }

    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(dt);
        }
    }

    DATE_FORMATS.iter().find_map(|format| {
        NaiveDate::parse_from_str(trimmed, format)
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
    })
}

/// Parses plain (`1234.5`) or Brazilian (`1.234,50`) numbers.
///
/// A comma is only read as the decimal separator when it is the last one and
/// any dots before it group thousands; `1,234.56` is unknown, not 1.23456.
pub(crate) fn parse_number(value: &str) -> Option<f64> {
    let trimmed = value
        .trim()
        .trim_start_matches("R$")
        .trim_end_matches('%')
        .trim();
    if trimmed.is_empty() {
        return None;
    }

    let normalized = match trimmed.split_once(',') {
        Some((integer, fraction)) => {
            if !is_grouped_integer(integer) || !is_digits(fraction) {
                return None;
            }
            format!("{}.{}", integer.replace('.', ""), fraction)
        }
        None => trimmed.to_string(),
    };

    normalized.parse::<f64>().ok().filter(|parsed| parsed.is_finite())
}

fn is_digits(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|byte| byte.is_ascii_digit())
}

/// `1234`, `1.234` or `12.345.678`, optionally signed.
fn is_grouped_integer(value: &str) -> bool {
    let unsigned = value.strip_prefix('-').unwrap_or(value);
    let mut groups = unsigned.split('.');
    let Some(head) = groups.next() else {
        return false;
    };
    if !value.contains('.') {
        return is_digits(unsigned);
    }

    is_digits(head)
        && head.len() <= 3
        && groups.all(|group| group.len() == 3 && is_digits(group))
}

pub(crate) fn parse_flag(value: Option<&str>) -> bool {
    value
        .map(|cell| cell.trim().to_lowercase())
        .map(|cell| TRUTHY.contains(&cell.as_str()))
        .unwrap_or(false)
}

/// Numeric suffix of a score band: `"N03"` -> 3.
pub(crate) fn score_band_level(band: Option<&str>) -> Option<i64> {
    let normalized = band?.trim().to_uppercase();
    normalized.strip_prefix('N')?.parse::<i64>().ok()
}

/// Whole days elapsed, floored like a calendar difference.
pub(crate) fn elapsed_days(then: NaiveDateTime, now: NaiveDateTime) -> i64 {
    (now - then).num_seconds().div_euclid(SECONDS_PER_DAY)
}

pub(crate) fn months_since(then: NaiveDateTime, now: NaiveDateTime) -> f64 {
    elapsed_days(then, now) as f64 / DAYS_PER_MONTH
}

pub(crate) fn years_since(then: NaiveDateTime, now: NaiveDateTime) -> f64 {
    elapsed_days(then, now) as f64 / DAYS_PER_YEAR
}
