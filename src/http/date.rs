//! HTTP-date formatting and parsing
//!
//! Dates go out as IMF-fixdate (`Mon, 08 Jun 2009 08:50:17 GMT`). Incoming
//! dates are also accepted in the two obsolete forms recipients must still
//! understand: RFC 850 and ANSI C `asctime()`.

use chrono::{DateTime, NaiveDateTime, Utc};

const IMF_FIXDATE: &str = "%a, %d %b %Y %H:%M:%S GMT";
const RFC_850: &str = "%A, %d-%b-%y %H:%M:%S GMT";
const ASCTIME: &str = "%a %b %e %H:%M:%S %Y";

/// Render a timestamp as an HTTP-date
pub fn format_http_date(time: &DateTime<Utc>) -> String {
    time.format(IMF_FIXDATE).to_string()
}

/// Parse an HTTP-date in any of the three accepted forms
///
/// Returns `None` for anything unparsable; callers treat that as "header absent".
///
/// # Examples
/// ```
/// use freshd::http::date::{format_http_date, parse_http_date};
///
/// let t = parse_http_date("Mon, 08 Jun 2009 08:50:17 GMT").unwrap();
/// assert_eq!(format_http_date(&t), "Mon, 08 Jun 2009 08:50:17 GMT");
/// assert!(parse_http_date("yesterday").is_none());
/// ```
pub fn parse_http_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    [IMF_FIXDATE, RFC_850, ASCTIME]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .map(|naive| naive.and_utc())
}
