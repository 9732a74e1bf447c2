use chrono::{Datelike, NaiveDate};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Whether `s` is a real calendar date written exactly as `YYYY-MM-DD`.
///
/// chrono's `%Y` takes signed years of any width and unpadded fields, so the
/// layout is checked byte by byte before parsing. Year 0 is not a valid
/// calendar year.
pub fn is_valid_date(s: &str) -> bool {
    if !has_date_layout(s) {
        return false;
    }
    NaiveDate::parse_from_str(s, DATE_FORMAT)
        .map(|date| date.year() > 0)
        .unwrap_or(false)
}

fn has_date_layout(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}
