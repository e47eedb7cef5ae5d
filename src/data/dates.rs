use chrono::{NaiveDate, NaiveDateTime};

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%m/%d/%Y"];
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Parse an order date written as `YYYY-MM-DD`, `MM/DD/YYYY`, or an ISO
/// date-time (`YYYY-MM-DD HH:MM:SS` / `YYYY-MM-DDTHH:MM:SS`, time dropped).
///
/// Surrounding whitespace is ignored. Returns `None` when nothing matches;
/// callers treat that as a data error rather than substituting a default.
pub fn parse_order_date(raw: &str) -> Option<NaiveDate> {
    let value = raw.trim();
    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, fmt) {
            return Some(date);
        }
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, fmt) {
            return Some(dt.date());
        }
    }
    None
}
