//! HTTP date parsing and formatting
//!
//! RFC 7231 IMF-fixdate only (`Sun, 06 Nov 1994 08:49:37 GMT`). Obsolete
//! RFC 850 and asctime forms are rejected; a date this parser cannot read
//! is treated as absent by the freshness arithmetic.

use chrono::{DateTime, NaiveDateTime, Utc};

const IMF_FIXDATE: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Parse an IMF-fixdate header value into epoch seconds.
///
/// All dates are interpreted in GMT. Returns `None` for any other format,
/// including the obsolete RFC 850 and asctime forms, and for dates before
/// the Unix epoch.
#[must_use]
pub fn parse_http_date(value: &str) -> Option<i64> {
    let dt = NaiveDateTime::parse_from_str(value.trim(), IMF_FIXDATE).ok()?;
    let timestamp = dt.and_utc().timestamp();
    (timestamp >= 0).then_some(timestamp)
}

/// Format epoch seconds as an IMF-fixdate string.
#[must_use]
pub fn format_http_date(epoch: i64) -> String {
    let dt = DateTime::<Utc>::from_timestamp(epoch, 0).unwrap_or_default();
    dt.format(IMF_FIXDATE).to_string()
}

/// Current time as epoch seconds.
#[must_use]
pub fn epoch_now() -> i64 {
    Utc::now().timestamp()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_imf_fixdate() {
        assert_eq!(
            parse_http_date("Sun, 06 Nov 1994 08:49:37 GMT"),
            Some(784_111_777)
        );
    }

    #[test]
    fn rejects_obsolete_formats() {
        // RFC 850
        assert_eq!(parse_http_date("Sunday, 06-Nov-94 08:49:37 GMT"), None);
        // asctime
        assert_eq!(parse_http_date("Sun Nov  6 08:49:37 1994"), None);
        // numeric offset instead of the GMT literal
        assert_eq!(parse_http_date("Sun, 06 Nov 1994 08:49:37 +0000"), None);
        assert_eq!(parse_http_date("not a date"), None);
    }

    #[test]
    fn rejects_inconsistent_weekday() {
        // 06 Nov 1994 was a Sunday
        assert_eq!(parse_http_date("Mon, 06 Nov 1994 08:49:37 GMT"), None);
    }

    #[test]
    fn format_round_trips() {
        let epoch = 784_111_777;
        assert_eq!(format_http_date(epoch), "Sun, 06 Nov 1994 08:49:37 GMT");
        assert_eq!(parse_http_date(&format_http_date(epoch)), Some(epoch));
    }
}
