//! The email builder.
//!
//! [`Email`] collects recipients, headers, and body content through
//! validated mutators, then assembles an immutable [`MimeMessage`]
//! exactly once.

use chrono::{DateTime, Utc};
use mailwright_mime::encoding::encode_rfc2047;
use mailwright_mime::{
    Address, ContentType, Headers, Mailbox, MimeMessage, Part, TransferEncoding,
    generate_boundary,
};
use std::time::Duration;
use tracing::debug;

use crate::error::{Error, Result};
use crate::session::SessionConfig;

/// Email under construction.
///
/// Starts empty, is populated through mutators, and is finished with
/// [`Email::build_mime_message`], which may be called at most once.
#[derive(Debug, Default)]
pub struct Email {
    headers: Headers,
    reply_to: Vec<Mailbox>,
    to: Vec<Mailbox>,
    cc: Vec<Mailbox>,
    bcc: Vec<Mailbox>,
    host_name: Option<String>,
    from: Option<Mailbox>,
    subject: Option<String>,
    charset: Option<String>,
    text_body: Option<String>,
    html_body: Option<String>,
    extra_parts: Vec<Part>,
    content: Option<(Vec<u8>, ContentType)>,
    sent_date: Option<DateTime<Utc>>,
    socket_connection_timeout: Option<Duration>,
    socket_timeout: Option<Duration>,
    bounce_address: Option<Address>,
    session: Option<SessionConfig>,
    message: Option<MimeMessage>,
}

impl Email {
    /// Creates an empty email.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a To recipient.
    ///
    /// Accepts `addr` or `Name <addr>` form.
    ///
    /// # Errors
    ///
    /// Returns an error if the address is invalid.
    pub fn add_to(&mut self, address: &str) -> Result<&mut Self> {
        self.to.push(Mailbox::parse(address)?);
        Ok(self)
    }

    /// Adds a collection of To recipients.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyAddressList`] if the collection is empty, or
    /// an address error if any entry is invalid.
    pub fn add_to_list<I, S>(&mut self, addresses: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let parsed = parse_list("to", addresses)?;
        self.to.extend(parsed);
        Ok(self)
    }

    /// Adds a Cc recipient.
    ///
    /// # Errors
    ///
    /// Returns an error if the address is invalid.
    pub fn add_cc(&mut self, address: &str) -> Result<&mut Self> {
        self.cc.push(Mailbox::parse(address)?);
        Ok(self)
    }

    /// Adds a collection of Cc recipients.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyAddressList`] if the collection is empty, or
    /// an address error if any entry is invalid.
    pub fn add_cc_list<I, S>(&mut self, addresses: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let parsed = parse_list("cc", addresses)?;
        self.cc.extend(parsed);
        Ok(self)
    }

    /// Adds a Bcc recipient.
    ///
    /// # Errors
    ///
    /// Returns an error if the address is invalid.
    pub fn add_bcc(&mut self, address: &str) -> Result<&mut Self> {
        self.bcc.push(Mailbox::parse(address)?);
        Ok(self)
    }

    /// Adds a collection of Bcc recipients.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyAddressList`] if the collection is empty, or
    /// an address error if any entry is invalid.
    pub fn add_bcc_list<I, S>(&mut self, addresses: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let parsed = parse_list("bcc", addresses)?;
        self.bcc.extend(parsed);
        Ok(self)
    }

    /// Adds a custom header, replacing any existing header with the same
    /// name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidHeader`] if the name or value is empty.
    pub fn add_header(
        &mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<&mut Self> {
        let name = name.into();
        let value = value.into();

        if name.trim().is_empty() {
            return Err(Error::InvalidHeader("header name cannot be empty".into()));
        }
        if value.trim().is_empty() {
            return Err(Error::InvalidHeader(format!(
                "empty value for header {name}"
            )));
        }

        self.headers.set(name, value);
        Ok(self)
    }

    /// Appends a reply-to address.
    ///
    /// # Errors
    ///
    /// Returns an error if the address is invalid.
    pub fn add_reply_to(&mut self, address: &str) -> Result<&mut Self> {
        self.reply_to.push(Mailbox::parse(address)?);
        Ok(self)
    }

    /// Appends a reply-to address with a display name.
    ///
    /// An empty name is treated as absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the address is invalid.
    pub fn add_reply_to_named(&mut self, address: &str, name: &str) -> Result<&mut Self> {
        self.reply_to.push(Mailbox::with_name(name, address)?);
        Ok(self)
    }

    /// Sets the from address.
    ///
    /// # Errors
    ///
    /// Returns an error if the address is invalid.
    pub fn set_from(&mut self, address: &str) -> Result<&mut Self> {
        self.from = Some(Mailbox::parse(address)?);
        Ok(self)
    }

    /// Sets the from address with a display name.
    ///
    /// # Errors
    ///
    /// Returns an error if the address is invalid.
    pub fn set_from_named(&mut self, address: &str, name: &str) -> Result<&mut Self> {
        self.from = Some(Mailbox::with_name(name, address)?);
        Ok(self)
    }

    /// Sets the mail server host name.
    pub fn set_host_name(&mut self, host_name: impl Into<String>) -> &mut Self {
        self.host_name = Some(host_name.into());
        self
    }

    /// Sets the subject line.
    pub fn set_subject(&mut self, subject: impl Into<String>) -> &mut Self {
        self.subject = Some(subject.into());
        self
    }

    /// Sets the charset used for text bodies and encoded headers.
    pub fn set_charset(&mut self, charset: impl Into<String>) -> &mut Self {
        self.charset = Some(charset.into());
        self
    }

    /// Sets the plain-text body.
    pub fn set_msg(&mut self, msg: impl Into<String>) -> &mut Self {
        self.text_body = Some(msg.into());
        self
    }

    /// Sets the HTML body.
    ///
    /// When both a text and an HTML body are present the built message is
    /// multipart/alternative.
    pub fn set_html_msg(&mut self, html: impl Into<String>) -> &mut Self {
        self.html_body = Some(html.into());
        self
    }

    /// Sets an explicit body with its content type, overriding any text or
    /// HTML body.
    pub fn set_content(
        &mut self,
        body: impl Into<Vec<u8>>,
        content_type: ContentType,
    ) -> &mut Self {
        self.content = Some((body.into(), content_type));
        self
    }

    /// Attaches an additional MIME part.
    ///
    /// Any attachment turns the built message into multipart/mixed.
    pub fn attach(&mut self, part: Part) -> &mut Self {
        self.extra_parts.push(part);
        self
    }

    /// Sets the sent date stamped into the Date header.
    ///
    /// When unset, the build stamps the current time.
    pub fn set_sent_date(&mut self, date: DateTime<Utc>) -> &mut Self {
        self.sent_date = Some(date);
        self
    }

    /// Sets the socket connection timeout.
    pub fn set_socket_connection_timeout(&mut self, timeout: Duration) -> &mut Self {
        self.socket_connection_timeout = Some(timeout);
        self
    }

    /// Sets the socket read/write timeout.
    pub fn set_socket_timeout(&mut self, timeout: Duration) -> &mut Self {
        self.socket_timeout = Some(timeout);
        self
    }

    /// Sets the bounce address.
    ///
    /// # Errors
    ///
    /// Returns an error if the address is invalid.
    pub fn set_bounce_address(&mut self, address: &str) -> Result<&mut Self> {
        self.bounce_address = Some(Address::new(address)?);
        Ok(self)
    }

    /// Injects a pre-built session configuration.
    pub fn set_session(&mut self, session: SessionConfig) -> &mut Self {
        self.session = Some(session);
        self
    }

    /// Returns the To recipients.
    #[must_use]
    pub fn to(&self) -> &[Mailbox] {
        &self.to
    }

    /// Returns the Cc recipients.
    #[must_use]
    pub fn cc(&self) -> &[Mailbox] {
        &self.cc
    }

    /// Returns the Bcc recipients.
    #[must_use]
    pub fn bcc(&self) -> &[Mailbox] {
        &self.bcc
    }

    /// Returns the reply-to list.
    #[must_use]
    pub fn reply_to(&self) -> &[Mailbox] {
        &self.reply_to
    }

    /// Returns the custom headers.
    #[must_use]
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Returns the from address, if set.
    #[must_use]
    pub fn from_address(&self) -> Option<&Mailbox> {
        self.from.as_ref()
    }

    /// Returns the host name, if set.
    #[must_use]
    pub fn host_name(&self) -> Option<&str> {
        self.host_name.as_deref()
    }

    /// Returns the subject, if set.
    #[must_use]
    pub fn subject(&self) -> Option<&str> {
        self.subject.as_deref()
    }

    /// Returns the charset, if set.
    #[must_use]
    pub fn charset(&self) -> Option<&str> {
        self.charset.as_deref()
    }

    /// Returns the sent date, if set.
    #[must_use]
    pub fn sent_date(&self) -> Option<DateTime<Utc>> {
        self.sent_date
    }

    /// Returns the socket connection timeout, if set.
    #[must_use]
    pub fn socket_connection_timeout(&self) -> Option<Duration> {
        self.socket_connection_timeout
    }

    /// Returns the socket read/write timeout, if set.
    #[must_use]
    pub fn socket_timeout(&self) -> Option<Duration> {
        self.socket_timeout
    }

    /// Returns the bounce address, if set.
    #[must_use]
    pub fn bounce_address(&self) -> Option<&Address> {
        self.bounce_address.as_ref()
    }

    /// Returns the built MIME message, if one was built.
    #[must_use]
    pub fn mime_message(&self) -> Option<&MimeMessage> {
        self.message.as_ref()
    }

    /// Resolves the session configuration from the host name, timeouts,
    /// and bounce address, caching the result.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingConfiguration`] if no host name is set.
    pub fn session(&mut self) -> Result<&SessionConfig> {
        if self.session.is_none() {
            let host = self
                .host_name
                .as_deref()
                .map(str::trim)
                .filter(|h| !h.is_empty())
                .ok_or(Error::MissingConfiguration("host name"))?;

            let mut config = SessionConfig::new(host);
            if let Some(timeout) = self.socket_connection_timeout {
                config = config.connect_timeout(timeout);
            }
            if let Some(timeout) = self.socket_timeout {
                config = config.io_timeout(timeout);
            }
            if let Some(bounce) = &self.bounce_address {
                config = config.bounce_address(bounce.clone());
            }

            debug!(host = config.host.as_str(), port = config.port, "resolved mail session");
            self.session = Some(config);
        }

        match &self.session {
            Some(config) => Ok(config),
            None => Err(Error::MissingConfiguration("host name")),
        }
    }

    /// Builds the MIME message artifact.
    ///
    /// Resolves the session, validates that a from address and at least
    /// one recipient are present, assembles headers and body, and stores
    /// the result. The message may be built at most once per email.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AlreadyBuilt`] on a second call,
    /// [`Error::MissingConfiguration`] when the host name, from address,
    /// or recipients are missing, and a MIME error if rendering state is
    /// inconsistent.
    pub fn build_mime_message(&mut self) -> Result<&MimeMessage> {
        if self.message.is_some() {
            return Err(Error::AlreadyBuilt);
        }

        self.session()?;

        let from = self
            .from
            .as_ref()
            .ok_or(Error::MissingConfiguration("from address"))?;
        if self.to.is_empty() && self.cc.is_empty() && self.bcc.is_empty() {
            return Err(Error::MissingConfiguration("at least one recipient"));
        }

        debug!(
            to = self.to.len(),
            cc = self.cc.len(),
            bcc = self.bcc.len(),
            "building MIME message"
        );

        let mut headers = Headers::new();
        headers.add("Date", self.sent_date.unwrap_or_else(Utc::now).to_rfc2822());
        headers.add("From", from.to_string());
        if !self.reply_to.is_empty() {
            headers.add("Reply-To", join_mailboxes(&self.reply_to));
        }
        if !self.to.is_empty() {
            headers.add("To", join_mailboxes(&self.to));
        }
        if !self.cc.is_empty() {
            headers.add("Cc", join_mailboxes(&self.cc));
        }
        if !self.bcc.is_empty() {
            headers.add("Bcc", join_mailboxes(&self.bcc));
        }
        if let Some(subject) = &self.subject {
            headers.add(
                "Subject",
                encode_rfc2047(subject, self.charset.as_deref().unwrap_or("utf-8")),
            );
        }
        headers.add("MIME-Version", "1.0");
        for (name, value) in self.headers.iter() {
            headers.add(name, value);
        }

        let message = self.assemble_body(headers);
        Ok(self.message.insert(message))
    }

    /// Assembles the message body around the prepared headers.
    fn assemble_body(&self, mut headers: Headers) -> MimeMessage {
        let charset = self.charset.as_deref().unwrap_or("utf-8");

        // Attachments force a multipart/mixed envelope with the body
        // content as sibling parts.
        if !self.extra_parts.is_empty() {
            let boundary = generate_boundary();
            headers.set(
                "Content-Type",
                ContentType::multipart_mixed(&boundary).to_string(),
            );

            let mut parts = Vec::new();
            if let Some((body, content_type)) = &self.content {
                parts.push(content_part(body.clone(), content_type.clone()));
            } else {
                if let Some(text) = &self.text_body {
                    parts.push(Part::text_with_charset(text.as_str(), charset));
                }
                if let Some(html) = &self.html_body {
                    parts.push(Part::html_with_charset(html.as_str(), charset));
                }
                if self.text_body.is_none() && self.html_body.is_none() {
                    parts.push(Part::text_with_charset("", charset));
                }
            }
            parts.extend(self.extra_parts.iter().cloned());

            return MimeMessage::multipart(headers, parts);
        }

        let body_part = match (&self.content, &self.text_body, &self.html_body) {
            (Some((body, content_type)), _, _) => {
                content_part(body.clone(), content_type.clone())
            }
            (None, Some(text), Some(html)) => {
                let boundary = generate_boundary();
                headers.set(
                    "Content-Type",
                    ContentType::multipart_alternative(&boundary).to_string(),
                );
                return MimeMessage::multipart(
                    headers,
                    vec![
                        Part::text_with_charset(text.as_str(), charset),
                        Part::html_with_charset(html.as_str(), charset),
                    ],
                );
            }
            (None, Some(text), None) => Part::text_with_charset(text.as_str(), charset),
            (None, None, Some(html)) => Part::html_with_charset(html.as_str(), charset),
            (None, None, None) => Part::text_with_charset("", charset),
        };

        for (name, value) in body_part.headers.iter() {
            headers.set(name, value);
        }
        MimeMessage::single_part(headers, body_part.body)
    }
}

/// Parses a collection of addresses, rejecting empty collections.
fn parse_list<I, S>(field: &'static str, addresses: I) -> Result<Vec<Mailbox>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut parsed = Vec::new();
    for address in addresses {
        parsed.push(Mailbox::parse(address.as_ref())?);
    }
    if parsed.is_empty() {
        return Err(Error::EmptyAddressList { field });
    }
    Ok(parsed)
}

/// Renders a mailbox list as a comma-separated header value.
fn join_mailboxes(mailboxes: &[Mailbox]) -> String {
    mailboxes
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Builds a part for an explicit content override, choosing the transfer
/// encoding from the content type and body bytes.
fn content_part(body: Vec<u8>, content_type: ContentType) -> Part {
    let encoding = if content_type.is_text() && body.is_ascii() {
        TransferEncoding::SevenBit
    } else if content_type.is_text() {
        TransferEncoding::QuotedPrintable
    } else {
        TransferEncoding::Base64
    };

    let mut headers = Headers::new();
    headers.set("Content-Type", content_type.to_string());
    headers.set("Content-Transfer-Encoding", encoding.to_string());
    Part::new(headers, body)
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

    fn configured_email() -> Email {
        let mut email = Email::new();
        email.set_host_name("localhost");
        email
            .add_to("to@example.com")
            .unwrap()
            .set_from("from@example.com")
            .unwrap()
            .set_subject("Subject line");
        email
    }

    #[test]
    fn test_add_to_named_form() {
        let mut email = Email::new();
        email.add_to("John Doe <john@example.com>").unwrap();
        assert_eq!(email.to().len(), 1);
        assert_eq!(email.to()[0].name.as_deref(), Some("John Doe"));
    }

    #[test]
    fn test_add_list_preserves_order() {
        let mut email = Email::new();
        email
            .add_to_list(["a@example.com", "b@example.com"])
            .unwrap();
        assert_eq!(email.to()[0].address.as_str(), "a@example.com");
        assert_eq!(email.to()[1].address.as_str(), "b@example.com");
    }

    #[test]
    fn test_add_list_invalid_entry() {
        let mut email = Email::new();
        let result = email.add_to_list(["a@example.com", "not-an-address"]);
        assert!(matches!(result, Err(Error::Mime(_))));
        // Nothing from the failed call is kept
        assert!(email.to().is_empty());
    }

    #[test]
    fn test_add_header_replaces_same_name() {
        let mut email = Email::new();
        email.add_header("X-Priority", "1").unwrap();
        email.add_header("X-Priority", "2").unwrap();
        assert_eq!(email.headers().len(), 1);
        assert_eq!(email.headers().get("X-Priority"), Some("2"));
    }

    #[test]
    fn test_build_text_and_html_is_alternative() {
        let mut email = configured_email();
        email.set_msg("plain").set_html_msg("<p>html</p>");

        let message = email.build_mime_message().unwrap();
        let content_type = message.content_type().unwrap();
        assert_eq!(content_type.sub_type, "alternative");
        assert_eq!(message.parts.len(), 2);
    }

    #[test]
    fn test_build_attachment_is_mixed() {
        let mut email = configured_email();
        email.set_msg("see attachment").attach(Part::attachment(
            ContentType::new("application", "octet-stream"),
            "data.bin",
            vec![0, 1, 2],
        ));

        let message = email.build_mime_message().unwrap();
        let content_type = message.content_type().unwrap();
        assert_eq!(content_type.sub_type, "mixed");
        assert_eq!(message.parts.len(), 2);
    }

    #[test]
    fn test_build_explicit_content() {
        let mut email = configured_email();
        email.set_content(b"Hello".to_vec(), ContentType::text_plain());

        let message = email.build_mime_message().unwrap();
        assert_eq!(message.body.as_deref(), Some(b"Hello".as_slice()));
    }

    #[test]
    fn test_build_empty_body_is_text_plain() {
        let mut email = configured_email();
        let message = email.build_mime_message().unwrap();
        assert_eq!(message.body.as_deref(), Some(b"".as_slice()));
        assert!(message.content_type().unwrap().is_text());
    }

    #[test]
    fn test_build_respects_charset() {
        let mut email = configured_email();
        email.set_charset("iso-8859-1").set_msg("hi");

        let message = email.build_mime_message().unwrap();
        let content_type = message.content_type().unwrap();
        assert_eq!(content_type.charset(), Some("iso-8859-1"));
    }

    #[test]
    fn test_build_encodes_non_ascii_subject() {
        let mut email = configured_email();
        email.set_subject("Héllo");

        let message = email.build_mime_message().unwrap();
        assert!(message.subject().unwrap().starts_with("=?utf-8?B?"));
    }

    #[test]
    fn test_build_uses_sent_date() {
        use chrono::TimeZone;

        let mut email = configured_email();
        let date = Utc.with_ymd_and_hms(2024, 5, 4, 12, 30, 0).unwrap();
        email.set_sent_date(date);

        let message = email.build_mime_message().unwrap();
        assert_eq!(message.date(), Some(date.to_rfc2822().as_str()));
    }

    #[test]
    fn test_build_renders_custom_headers() {
        let mut email = configured_email();
        email.add_header("X-Mailer", "mailwright").unwrap();

        let message = email.build_mime_message().unwrap();
        assert_eq!(message.headers.get("X-Mailer"), Some("mailwright"));
        let wire = message.to_wire().unwrap();
        assert!(wire.contains("X-Mailer: mailwright\r\n"));
    }

    #[test]
    fn test_session_carries_timeouts_and_bounce() {
        let mut email = Email::new();
        email.set_host_name("smtp.example.com");
        email
            .set_socket_connection_timeout(Duration::from_millis(1500))
            .set_socket_timeout(Duration::from_millis(2500))
            .set_bounce_address("bounces@example.com")
            .unwrap();

        let session = email.session().unwrap();
        assert_eq!(session.connect_timeout, Duration::from_millis(1500));
        assert_eq!(session.io_timeout, Duration::from_millis(2500));
        assert_eq!(
            session.bounce_address.as_ref().map(Address::as_str),
            Some("bounces@example.com")
        );
    }

    #[test]
    fn test_session_blank_host_rejected() {
        let mut email = Email::new();
        email.set_host_name("   ");
        assert!(matches!(
            email.session(),
            Err(Error::MissingConfiguration(_))
        ));
    }

    #[test]
    fn test_set_session_overrides_resolution() {
        let mut email = Email::new();
        email.set_session(SessionConfig::new("relay.example.com").port(587));

        let session = email.session().unwrap();
        assert_eq!(session.host, "relay.example.com");
        assert_eq!(session.port, 587);
    }
}
