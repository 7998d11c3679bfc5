//! Date Shape Detection
//! Loose numeric date shapes and coercive date parsing.

use chrono::NaiveDate;
use regex::Regex;
use std::sync::LazyLock;

/// `YYYY-M-D` at the start of the value.
static ISO_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{1,2}-\d{1,2}").expect("valid ISO date pattern"));

/// `M/D/YY` or `M/D/YYYY` at the start of the value.
static SLASH_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{1,2}/\d{1,2}/\d{2,4}").expect("valid slash date pattern"));

/// Full-value date with an optional trailing time part.
static DATE_VALUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:(?P<y1>\d{4})[-/](?P<m1>\d{1,2})[-/](?P<d1>\d{1,2})|(?P<m2>\d{1,2})/(?P<d2>\d{1,2})/(?P<y2>\d{2,4}))(?:[T ]\d{1,2}:\d{2}(?::\d{2}(?:\.\d+)?)?(?:Z|[+-]\d{2}:?\d{2})?)?$",
    )
    .expect("valid date value pattern")
});

/// True if the value starts with one of the recognised date shapes.
pub fn looks_like_date(value: &str) -> bool {
    let value = value.trim();
    ISO_SHAPE.is_match(value) || SLASH_SHAPE.is_match(value)
}

/// Parse a date, returning `None` for anything unparsable or calendar-invalid.
///
/// Two-digit years pivot at 70: `24` is 2024, `85` is 1985.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let caps = DATE_VALUE.captures(value.trim())?;
    let (year, month, day) = match (caps.name("y1"), caps.name("y2")) {
        (Some(y), _) => (y.as_str(), caps.name("m1")?.as_str(), caps.name("d1")?.as_str()),
        (None, Some(y)) => (y.as_str(), caps.name("m2")?.as_str(), caps.name("d2")?.as_str()),
        (None, None) => return None,
    };

    let mut year: i32 = year.parse().ok()?;
    if caps.name("y2").map(|y| y.as_str().len()) == Some(2) {
        year += if year < 70 { 2000 } else { 1900 };
    }
    NaiveDate::from_ymd_opt(year, month.parse().ok()?, day.parse().ok()?)
}
