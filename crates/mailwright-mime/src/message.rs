//! MIME message structure and wire rendering.

use crate::content_type::ContentType;
use crate::encoding::{encode_base64_mime, encode_quoted_printable};
use crate::error::{Error, Result};
use crate::header::Headers;
use chrono::Utc;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Transfer encoding types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferEncoding {
    /// 7-bit ASCII.
    SevenBit,
    /// 8-bit binary.
    EightBit,
    /// Base64 encoding.
    Base64,
    /// Quoted-Printable encoding.
    QuotedPrintable,
}

impl TransferEncoding {
    /// Parses transfer encoding from string.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "8bit" => Self::EightBit,
            "base64" => Self::Base64,
            "quoted-printable" => Self::QuotedPrintable,
            _ => Self::SevenBit, // Default (includes "7bit")
        }
    }
}

impl fmt::Display for TransferEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SevenBit => write!(f, "7bit"),
            Self::EightBit => write!(f, "8bit"),
            Self::Base64 => write!(f, "base64"),
            Self::QuotedPrintable => write!(f, "quoted-printable"),
        }
    }
}

/// Counter for unique multipart boundaries.
static PART_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Generates a unique multipart boundary.
///
/// Combines a process-wide counter with a timestamp so boundaries never
/// repeat within or across builder instances.
#[must_use]
pub fn generate_boundary() -> String {
    let n = PART_COUNTER.fetch_add(1, Ordering::Relaxed);
    let stamp = Utc::now().timestamp_micros();
    format!("----=_Part_{n}_{stamp:x}")
}

/// MIME message part.
#[derive(Debug, Clone)]
pub struct Part {
    /// Part headers.
    pub headers: Headers,
    /// Part body (raw bytes, encoded at render time).
    pub body: Vec<u8>,
}

impl Part {
    /// Creates a new part from prepared headers and a raw body.
    #[must_use]
    pub const fn new(headers: Headers, body: Vec<u8>) -> Self {
        Self { headers, body }
    }

    /// Creates a text/plain part with utf-8 charset.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::text_with_charset(text, "utf-8")
    }

    /// Creates a text/plain part with the given charset.
    #[must_use]
    pub fn text_with_charset(text: impl Into<String>, charset: impl Into<String>) -> Self {
        Self::body_part(text.into(), ContentType::text_plain_charset(charset))
    }

    /// Creates a text/html part with utf-8 charset.
    #[must_use]
    pub fn html(html: impl Into<String>) -> Self {
        Self::html_with_charset(html, "utf-8")
    }

    /// Creates a text/html part with the given charset.
    #[must_use]
    pub fn html_with_charset(html: impl Into<String>, charset: impl Into<String>) -> Self {
        Self::body_part(html.into(), ContentType::text_html_charset(charset))
    }

    /// Creates an attachment part, Base64-encoded at render time.
    #[must_use]
    pub fn attachment(
        content_type: ContentType,
        file_name: impl Into<String>,
        data: Vec<u8>,
    ) -> Self {
        let file_name = file_name.into();
        let mut headers = Headers::new();
        headers.set(
            "Content-Type",
            content_type.with_parameter("name", file_name.clone()).to_string(),
        );
        headers.set("Content-Transfer-Encoding", TransferEncoding::Base64.to_string());
        headers.set(
            "Content-Disposition",
            format!("attachment; filename=\"{file_name}\""),
        );
        Self::new(headers, data)
    }

    /// Builds a text-like part, choosing 7bit for pure ASCII bodies and
    /// quoted-printable otherwise.
    fn body_part(text: String, content_type: ContentType) -> Self {
        let encoding = if text.is_ascii() {
            TransferEncoding::SevenBit
        } else {
            TransferEncoding::QuotedPrintable
        };

        let mut headers = Headers::new();
        headers.set("Content-Type", content_type.to_string());
        headers.set("Content-Transfer-Encoding", encoding.to_string());
        Self::new(headers, text.into_bytes())
    }

    /// Gets the content type.
    ///
    /// # Errors
    ///
    /// Returns an error if the content type header is invalid.
    pub fn content_type(&self) -> Result<ContentType> {
        self.headers
            .get("content-type")
            .map_or_else(|| Ok(ContentType::text_plain()), ContentType::parse)
    }

    /// Gets the transfer encoding.
    #[must_use]
    pub fn transfer_encoding(&self) -> TransferEncoding {
        self.headers
            .get("content-transfer-encoding")
            .map_or(TransferEncoding::SevenBit, TransferEncoding::parse)
    }

    /// Renders the part (headers, blank line, encoded body).
    fn render_into(&self, out: &mut String) {
        use std::fmt::Write as _;

        let _ = write!(out, "{}", self.headers);
        out.push_str("\r\n");
        render_body(self.transfer_encoding(), &self.body, out);
    }
}

/// Appends a body to `out`, encoded per the transfer encoding.
fn render_body(encoding: TransferEncoding, body: &[u8], out: &mut String) {
    match encoding {
        TransferEncoding::Base64 => out.push_str(&encode_base64_mime(body)),
        TransferEncoding::QuotedPrintable => {
            out.push_str(&encode_quoted_printable(&String::from_utf8_lossy(body)));
        }
        TransferEncoding::SevenBit | TransferEncoding::EightBit => {
            out.push_str(&String::from_utf8_lossy(body));
        }
    }
}

/// Immutable MIME message artifact.
#[derive(Debug, Clone)]
pub struct MimeMessage {
    /// Message headers.
    pub headers: Headers,
    /// Message parts (empty for single-part messages).
    pub parts: Vec<Part>,
    /// Body for single-part messages.
    pub body: Option<Vec<u8>>,
}

impl MimeMessage {
    /// Creates a single-part message.
    #[must_use]
    pub const fn single_part(headers: Headers, body: Vec<u8>) -> Self {
        Self {
            headers,
            parts: Vec::new(),
            body: Some(body),
        }
    }

    /// Creates a multipart message.
    ///
    /// The top-level Content-Type header must carry the boundary.
    #[must_use]
    pub const fn multipart(headers: Headers, parts: Vec<Part>) -> Self {
        Self {
            headers,
            parts,
            body: None,
        }
    }

    /// Gets the content type.
    ///
    /// # Errors
    ///
    /// Returns an error if the content type header is invalid.
    pub fn content_type(&self) -> Result<ContentType> {
        self.headers
            .get("content-type")
            .map_or_else(|| Ok(ContentType::text_plain()), ContentType::parse)
    }

    /// Checks if this is a multipart message.
    #[must_use]
    pub fn is_multipart(&self) -> bool {
        !self.parts.is_empty()
    }

    /// Gets the From header.
    #[must_use]
    pub fn from(&self) -> Option<&str> {
        self.headers.get("from")
    }

    /// Gets the To header.
    #[must_use]
    pub fn to(&self) -> Option<&str> {
        self.headers.get("to")
    }

    /// Gets the Subject header.
    #[must_use]
    pub fn subject(&self) -> Option<&str> {
        self.headers.get("subject")
    }

    /// Gets the Date header.
    #[must_use]
    pub fn date(&self) -> Option<&str> {
        self.headers.get("date")
    }

    /// Renders the message to its wire form (CRLF line endings).
    ///
    /// # Errors
    ///
    /// Returns an error if a multipart message has no boundary in its
    /// Content-Type header.
    pub fn to_wire(&self) -> Result<String> {
        use std::fmt::Write as _;

        let mut out = String::new();
        let _ = write!(out, "{}", self.headers);
        out.push_str("\r\n");

        if self.parts.is_empty() {
            let encoding = self
                .headers
                .get("content-transfer-encoding")
                .map_or(TransferEncoding::SevenBit, TransferEncoding::parse);
            render_body(encoding, self.body.as_deref().unwrap_or_default(), &mut out);
            out.push_str("\r\n");
            return Ok(out);
        }

        let content_type = self.content_type()?;
        let boundary = content_type.boundary().ok_or(Error::MissingBoundary)?;

        for part in &self.parts {
            let _ = write!(out, "--{boundary}\r\n");
            part.render_into(&mut out);
            out.push_str("\r\n");
        }
        let _ = write!(out, "--{boundary}--\r\n");

        Ok(out)
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::redundant_clone,
    clippy::manual_string_new,
    clippy::needless_collect,
    clippy::unreadable_literal,
    clippy::used_underscore_items,
    clippy::similar_names
)]
mod tests {
    use super::*;

    #[test]
    fn test_transfer_encoding_parse() {
        assert_eq!(TransferEncoding::parse("7bit"), TransferEncoding::SevenBit);
        assert_eq!(TransferEncoding::parse("base64"), TransferEncoding::Base64);
        assert_eq!(
            TransferEncoding::parse("Quoted-Printable"),
            TransferEncoding::QuotedPrintable
        );
        assert_eq!(TransferEncoding::parse("bogus"), TransferEncoding::SevenBit);
    }

    #[test]
    fn test_generate_boundary_unique() {
        let mut seen = std::collections::HashSet::new();
        for _ in 0..100 {
            assert!(seen.insert(generate_boundary()), "duplicate boundary");
        }
    }

    #[test]
    fn test_part_text_ascii() {
        let part = Part::text("Hello, World!");
        assert_eq!(part.transfer_encoding(), TransferEncoding::SevenBit);
        assert_eq!(part.body, b"Hello, World!");
    }

    #[test]
    fn test_part_text_non_ascii() {
        let part = Part::text("Héllo");
        assert_eq!(part.transfer_encoding(), TransferEncoding::QuotedPrintable);
    }

    #[test]
    fn test_part_html() {
        let part = Part::html("<p>Hi</p>");
        let ct = part.content_type().unwrap();
        assert_eq!(ct.sub_type, "html");
    }

    #[test]
    fn test_part_attachment() {
        let part = Part::attachment(
            ContentType::new("application", "pdf"),
            "report.pdf",
            vec![1, 2, 3],
        );
        assert_eq!(part.transfer_encoding(), TransferEncoding::Base64);
        assert_eq!(
            part.headers.get("Content-Disposition"),
            Some("attachment; filename=\"report.pdf\"")
        );
    }

    #[test]
    fn test_single_part_wire() {
        let mut headers = Headers::new();
        headers.add("From", "sender@example.com");
        headers.add("Content-Type", "text/plain; charset=utf-8");

        let message = MimeMessage::single_part(headers, b"Hello, World!".to_vec());
        let wire = message.to_wire().unwrap();

        assert!(wire.starts_with("From: sender@example.com\r\n"));
        assert!(wire.contains("\r\n\r\nHello, World!"));
        assert!(!message.is_multipart());
    }

    #[test]
    fn test_multipart_wire() {
        let mut headers = Headers::new();
        headers.add("Content-Type", "multipart/mixed; boundary=abc123");

        let message = MimeMessage::multipart(
            headers,
            vec![Part::text("Part 1"), Part::text("Part 2")],
        );
        let wire = message.to_wire().unwrap();

        assert_eq!(wire.matches("--abc123\r\n").count(), 2);
        assert!(wire.ends_with("--abc123--\r\n"));
        assert!(message.is_multipart());
    }

    #[test]
    fn test_multipart_missing_boundary() {
        let mut headers = Headers::new();
        headers.add("Content-Type", "multipart/mixed");

        let message = MimeMessage::multipart(headers, vec![Part::text("Part 1")]);
        assert!(matches!(
            message.to_wire(),
            Err(Error::MissingBoundary)
        ));
    }

    #[test]
    fn test_message_accessors() {
        let mut headers = Headers::new();
        headers.add("From", "sender@example.com");
        headers.add("To", "recipient@example.com");
        headers.add("Subject", "Test");

        let message = MimeMessage::single_part(headers, Vec::new());
        assert_eq!(message.from(), Some("sender@example.com"));
        assert_eq!(message.to(), Some("recipient@example.com"));
        assert_eq!(message.subject(), Some("Test"));
        assert!(message.date().is_none());
    }
}
