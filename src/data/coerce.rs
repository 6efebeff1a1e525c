//! Coercion stage: raw string cells to typed record fields.
//!
//! Every parser here is total. Unparseable amounts become `0`, unparseable
//! scores and dates become `None`, and missing columns behave like columns
//! full of blank cells.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use super::columns::{Field, ResolvedColumns};
use super::record::MovieRecord;

/// Date formats tried when none are configured.
pub const DEFAULT_DATE_FORMATS: &[&str] = &["%m/%d/%Y", "%Y-%m-%d", "%Y/%m/%d", "%d.%m.%Y"];

/// Datetime layouts accepted after the plain date formats fail.
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Options that control how cells are interpreted.
#[derive(Debug, Clone, PartialEq)]
pub struct CoerceOptions {
    /// chrono format strings, tried in order.
    pub date_formats: Vec<String>,
    /// Top of the source rating scale; scores are rescaled onto `0..=10`.
    pub score_scale: f64,
}

impl Default for CoerceOptions {
    fn default() -> Self {
        Self {
            date_formats: DEFAULT_DATE_FORMATS.iter().map(|s| s.to_string()).collect(),
            score_scale: 10.0,
        }
    }
}

/// Which fields held a value that could not be parsed.
///
/// Blank cells do not count; only present-but-invalid ones do.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Substitutions {
    pub revenue: bool,
    pub budget: bool,
    pub score: bool,
    pub release_date: bool,
}

/// Coerce one raw row into a [`MovieRecord`].
pub fn coerce(
    row: &[Option<String>],
    columns: &ResolvedColumns,
    options: &CoerceOptions,
) -> (MovieRecord, Substitutions) {
    let cell = |field| columns.cell(row, field);
    let mut substituted = Substitutions::default();

    let revenue_raw = cell(Field::Revenue);
    let revenue = parse_amount(revenue_raw);
    substituted.revenue = revenue_raw.is_some() && revenue.is_none();

    let budget_raw = cell(Field::Budget);
    let budget = parse_amount(budget_raw);
    substituted.budget = budget_raw.is_some() && budget.is_none();

    let score_raw = cell(Field::Score);
    let score = parse_score(score_raw, options.score_scale);
    substituted.score = score_raw.is_some() && score.is_none();

    let date_raw = cell(Field::ReleaseDate);
    let release_date = parse_date(date_raw, &options.date_formats);
    substituted.release_date = date_raw.is_some() && release_date.is_none();

    let record = MovieRecord {
        name: cell(Field::Name).map(|s| s.trim().to_string()).unwrap_or_default(),
        genres: parse_genres(cell(Field::Genre)),
        original_language: non_blank(cell(Field::OriginalLanguage)),
        country: non_blank(cell(Field::Country)),
        release_date,
        revenue: revenue.unwrap_or(0.0),
        budget: budget.unwrap_or(0.0),
        score,
    };

    (record, substituted)
}

fn non_blank(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim).filter(|s| !s.is_empty()).map(str::to_string)
}

/// Parse a monetary amount such as `"271616668.0"`, `"$1,200"` or `"3.5e6"`.
///
/// Returns `None` for blanks, garbage, negative and non-finite values.
pub fn parse_amount(raw: Option<&str>) -> Option<f64> {
    let s = raw?.trim();
    let s = s.strip_prefix('$').unwrap_or(s).trim();
    let cleaned: String = s.chars().filter(|c| *c != ',' && *c != '_').collect();
    let value: f64 = cleaned.parse().ok()?;
    (value.is_finite() && value >= 0.0).then_some(value)
}

/// Parse a rating and rescale it from `0..=scale` onto `0..=10`.
///
/// Out-of-range and unparseable values are `None`, never `0`. A scale that
/// is not a positive finite number rejects every value.
pub fn parse_score(raw: Option<&str>, scale: f64) -> Option<f64> {
    if !scale.is_finite() || scale <= 0.0 {
        return None;
    }
    let value: f64 = raw?.trim().parse().ok()?;
    if !value.is_finite() || !(0.0..=scale).contains(&value) {
        return None;
    }
    let score = if scale == 10.0 { value } else { value * 10.0 / scale };
    (score.is_finite() && (0.0..=10.0).contains(&score)).then_some(score)
}

/// Parse a release date using `formats` in order, then a few datetime layouts.
///
/// A bare four-digit year is read as January 1st of that year.
pub fn parse_date<S: AsRef<str>>(raw: Option<&str>, formats: &[S]) -> Option<NaiveDate> {
    let s = raw?.trim();
    if s.is_empty() {
        return None;
    }

    for format in formats {
        if let Ok(date) = NaiveDate::parse_from_str(s, format.as_ref()) {
            return Some(date);
        }
    }

    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt.date());
        }
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }

    if s.len() == 4 && s.chars().all(|c| c.is_ascii_digit()) {
        return s.parse().ok().and_then(|year| NaiveDate::from_ymd_opt(year, 1, 1));
    }

    None
}

/// Split a comma-separated genre list.
///
/// Tokens are trimmed (including non-breaking spaces), empty tokens dropped,
/// duplicates removed keeping the first occurrence. Case is preserved.
pub fn parse_genres(raw: Option<&str>) -> Vec<String> {
    let mut genres: Vec<String> = Vec::new();
    let Some(raw) = raw else {
        return genres;
    };

    for token in raw.split(',') {
        let token = token.trim();
        if !token.is_empty() && !genres.iter().any(|g| g == token) {
            genres.push(token.to_string());
        }
    }
    genres
}
