//! Flat response envelope
//!
//! Stored responses are a status line, one header line per (name, value)
//! pair, a blank line, then the body bytes verbatim. Line terminator is
//! `\r\n`; the head ends at the first `\r\n\r\n`. Any structural anomaly
//! on decode makes the entry a miss rather than an error.

use bytes::Bytes;
use http::{HeaderName, HeaderValue, StatusCode, Version};

use crate::http::{Body, HttpResponse};

const HEAD_SEPARATOR: &[u8] = b"\r\n\r\n";

/// Serialize a response whose body has already been drained into `body`.
#[must_use]
pub fn serialize(response: &HttpResponse, body: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(body.len() + 256);

    out.extend_from_slice(
        format!(
            "HTTP/{} {} {}\r\n",
            version_text(response.version()),
            response.status().as_u16(),
            response.reason()
        )
        .as_bytes(),
    );

    for (name, value) in response.headers() {
        out.extend_from_slice(name.as_str().as_bytes());
        out.extend_from_slice(b": ");
        out.extend_from_slice(value.as_bytes());
        out.extend_from_slice(b"\r\n");
    }

    out.extend_from_slice(b"\r\n");
    out.extend_from_slice(body);
    out
}

/// Decode a stored envelope. Returns `None` for anything structurally
/// malformed: missing head separator, bad status line, unknown protocol,
/// or an out-of-range status code.
#[must_use]
pub fn deserialize(blob: &[u8]) -> Option<HttpResponse> {
    let split = blob
        .windows(HEAD_SEPARATOR.len())
        .position(|w| w == HEAD_SEPARATOR)?;
    let head = std::str::from_utf8(&blob[..split]).ok()?;
    let body = &blob[split + HEAD_SEPARATOR.len()..];

    let mut lines = head.split("\r\n");
    let status_line = lines.next()?;

    let mut fields = status_line.splitn(3, ' ');
    let protocol = fields.next()?;
    let status = fields.next()?;
    let reason = fields.next()?;

    let version = version_from_text(protocol.strip_prefix("HTTP/")?)?;
    let status = StatusCode::from_u16(status.parse().ok()?).ok()?;

    let mut response = HttpResponse::new(status)
        .with_version(version)
        .with_reason(reason);

    for line in lines {
        let Some((name, value)) = line.split_once(':') else {
            continue;
        };
        let (name, value) = (name.trim(), value.trim());
        if name.is_empty() || value.is_empty() {
            continue;
        }
        let (Ok(name), Ok(value)) = (
            HeaderName::try_from(name),
            HeaderValue::try_from(value),
        ) else {
            continue;
        };
        response = response.header(name, value);
    }

    if !body.is_empty() {
        response = response.with_body(Body::from_bytes(Bytes::copy_from_slice(body)));
    }

    Some(response)
}

fn version_text(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        Version::HTTP_3 => "3",
        _ => "1.1",
    }
}

fn version_from_text(text: &str) -> Option<Version> {
    match text {
        "0.9" => Some(Version::HTTP_09),
        "1.0" => Some(Version::HTTP_10),
        "1.1" => Some(Version::HTTP_11),
        "2" => Some(Version::HTTP_2),
        "3" => Some(Version::HTTP_3),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_status_reason_headers_and_body() {
        let response = HttpResponse::new(StatusCode::OK)
            .header("content-type", "text/plain")
            .header("set-cookie", "a=1")
            .header("set-cookie", "b=2");
        let body = b"Page\n\nHello, world!";

        let blob = serialize(&response, body);
        let decoded = deserialize(&blob).expect("decode");

        assert_eq!(decoded.status(), StatusCode::OK);
        assert_eq!(decoded.reason(), "OK");
        assert_eq!(decoded.version(), Version::HTTP_11);
        assert_eq!(decoded.headers(), response.headers());
        assert_eq!(
            decoded.into_body().into_bytes().expect("body"),
            Bytes::copy_from_slice(body)
        );
    }

    #[test]
    fn body_may_contain_the_separator() {
        let response = HttpResponse::new(StatusCode::OK);
        let body = b"first\r\n\r\nsecond";

        let decoded = deserialize(&serialize(&response, body)).expect("decode");
        assert_eq!(
            decoded.into_body().into_bytes().expect("body"),
            Bytes::copy_from_slice(&body[..])
        );
    }

    #[test]
    fn empty_body_decodes_as_empty() {
        let response = HttpResponse::new(StatusCode::MOVED_PERMANENTLY)
            .header("location", "http://example.com/");
        let decoded = deserialize(&serialize(&response, b"")).expect("decode");
        assert_eq!(decoded.status(), StatusCode::MOVED_PERMANENTLY);
        assert_eq!(decoded.into_body().into_bytes().expect("body"), Bytes::new());
    }

    #[test]
    fn reason_with_spaces_survives() {
        let response = HttpResponse::new(StatusCode::NOT_FOUND);
        let decoded = deserialize(&serialize(&response, b"")).expect("decode");
        assert_eq!(decoded.reason(), "Not Found");
    }

    #[test]
    fn malformed_header_lines_are_skipped() {
        let blob = b"HTTP/1.1 200 OK\r\ngood: value\r\nno-colon-line\r\n: empty-name\r\nempty-value:\r\n\r\n";
        let decoded = deserialize(blob).expect("decode");
        assert_eq!(decoded.headers().len(), 1);
        assert_eq!(decoded.header_value("good"), Some("value"));
    }

    #[test]
    fn structural_anomalies_are_a_miss() {
        assert!(deserialize(b"").is_none());
        assert!(deserialize(b"HTTP/1.1 200 OK").is_none()); // no separator
        assert!(deserialize(b"HTTP/1.1 200\r\n\r\n").is_none()); // two fields
        assert!(deserialize(b"HTCPCP/1.0 200 OK\r\n\r\n").is_none());
        assert!(deserialize(b"HTTP/9.9 200 OK\r\n\r\n").is_none());
        assert!(deserialize(b"HTTP/1.1 9999 OK\r\n\r\n").is_none());
    }

    #[test]
    fn version_text_round_trips() {
        for version in [
            Version::HTTP_09,
            Version::HTTP_10,
            Version::HTTP_11,
            Version::HTTP_2,
            Version::HTTP_3,
        ] {
            assert_eq!(version_from_text(version_text(version)), Some(version));
        }
    }
}
