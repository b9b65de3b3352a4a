//! Integration tests for the email builder.
//!
//! Exercises the validated mutators, session resolution, and the
//! build-once MIME message assembly end to end.

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use chrono::Utc;
use mailwright::{ContentType, Email, Error};

const TEST_EMAILS: [&str; 3] = [
    "ab@bc.org",
    "abawdasdwas@dfaxcasdweda.com",
    "asdwasd@asdawid.net",
];

const EMPTY_LIST: [&str; 0] = [];

/// An email with everything a successful build needs.
fn fully_configured() -> Email {
    let mut email = Email::new();
    email.set_host_name("localhost");
    email.add_to("hello@hello.com").unwrap();
    email.add_cc("hello@hello.com").unwrap();
    email.add_bcc("hello@hello.com").unwrap();
    email.add_header("X-Key", "Value").unwrap();
    email.add_reply_to_named("abc@acb.org", "Hello world").unwrap();
    email.set_from_named("dasdaw@asdwasd.net", "Mmhmm").unwrap();
    email.set_subject("Subject line");
    email.set_content(b"Hello".to_vec(), ContentType::text_plain());
    email.set_bounce_address("hello@hello.com").unwrap();
    email
}

#[test]
fn test_add_to_list() {
    let mut email = Email::new();
    email.add_to_list(TEST_EMAILS).unwrap();

    assert_eq!(email.to().len(), 3);
}

#[test]
fn test_add_cc_list() {
    let mut email = Email::new();
    email.add_cc_list(TEST_EMAILS).unwrap();

    assert_eq!(email.cc().len(), 3);
}

#[test]
fn test_add_bcc_list() {
    let mut email = Email::new();
    email.add_bcc_list(TEST_EMAILS).unwrap();

    assert_eq!(email.bcc().len(), 3);
}

#[test]
fn test_add_to_list_empty() {
    let mut email = Email::new();
    let result = email.add_to_list(EMPTY_LIST);

    assert!(matches!(result, Err(Error::EmptyAddressList { .. })));
}

#[test]
fn test_add_cc_list_empty() {
    let mut email = Email::new();
    let result = email.add_cc_list(EMPTY_LIST);

    assert!(matches!(result, Err(Error::EmptyAddressList { .. })));
}

#[test]
fn test_add_bcc_list_empty() {
    let mut email = Email::new();
    let result = email.add_bcc_list(EMPTY_LIST);

    assert!(matches!(result, Err(Error::EmptyAddressList { .. })));
}

#[test]
fn test_add_header() {
    let mut email = Email::new();
    email.add_header("X-Key", "Value").unwrap();

    assert_eq!(email.headers().len(), 1);
}

#[test]
fn test_add_header_empty_name() {
    let mut email = Email::new();
    let result = email.add_header("", "Value");

    assert!(matches!(result, Err(Error::InvalidHeader(_))));
    assert!(email.headers().is_empty());
}

#[test]
fn test_add_header_empty_value() {
    let mut email = Email::new();
    let result = email.add_header("X-Key", "");

    assert!(matches!(result, Err(Error::InvalidHeader(_))));
    assert!(email.headers().is_empty());
}

#[test]
fn test_add_reply_to() {
    let mut email = Email::new();
    email.add_reply_to_named("abc@acb.org", "Hello world").unwrap();

    assert_eq!(email.reply_to().len(), 1);
}

#[test]
fn test_build_mime_message() {
    let mut email = fully_configured();

    email.build_mime_message().unwrap();

    let message = email.mime_message().unwrap();
    assert!(message.from().is_some());
    assert!(message.to().is_some());
    assert_eq!(message.subject(), Some("Subject line"));
}

#[test]
fn test_build_mime_message_twice() {
    let mut email = fully_configured();

    email.build_mime_message().unwrap();
    let second = email.build_mime_message();

    assert!(matches!(second, Err(Error::AlreadyBuilt)));
    // The first artifact is untouched
    assert!(email.mime_message().is_some());
}

#[test]
fn test_build_mime_message_insufficient_config() {
    let mut email = Email::new();
    email.set_host_name("localhost");

    let result = email.build_mime_message();

    assert!(matches!(result, Err(Error::MissingConfiguration(_))));
    assert!(email.mime_message().is_none());
}

#[test]
fn test_build_mime_message_no_host() {
    let mut email = Email::new();
    email.add_to("hello@hello.com").unwrap();
    email.set_from("dasdaw@asdwasd.net").unwrap();

    let result = email.build_mime_message();

    assert!(matches!(result, Err(Error::MissingConfiguration(_))));
}

#[test]
fn test_get_host_name() {
    let mut email = Email::new();
    email.set_host_name("localhost");

    assert_eq!(email.host_name(), Some("localhost"));
}

#[test]
fn test_get_host_name_unset() {
    let email = Email::new();

    assert!(email.host_name().is_none());
}

#[test]
fn test_session_requires_host_name() {
    let mut email = Email::new();

    assert!(matches!(
        email.session(),
        Err(Error::MissingConfiguration(_))
    ));
}

#[test]
fn test_session_resolves_from_host_name() {
    let mut email = Email::new();
    email.set_host_name("smtp.example.com");

    let session = email.session().unwrap();
    assert_eq!(session.host, "smtp.example.com");
    assert_eq!(session.port, mailwright::DEFAULT_SMTP_PORT);
}

#[test]
fn test_socket_connection_timeout() {
    let mut email = Email::new();
    email.set_socket_connection_timeout(Duration::from_millis(1000));

    assert_eq!(
        email.socket_connection_timeout(),
        Some(Duration::from_millis(1000))
    );
}

#[test]
fn test_sent_date() {
    let mut email = Email::new();
    email.set_sent_date(Utc::now());

    assert!(email.sent_date().is_some());
}

#[test]
fn test_set_from() {
    let mut email = Email::new();
    email.set_from("test@test.com").unwrap();

    assert!(email.from_address().is_some());
}

#[test]
fn test_build_wire_output() {
    let mut email = Email::new();
    email.set_host_name("localhost");
    email.add_to("recipient@example.com").unwrap();
    email.set_from("sender@example.com").unwrap();
    email.set_subject("Greetings");
    email.set_msg("Hello, World!");

    let wire = email.build_mime_message().unwrap().to_wire().unwrap();

    assert!(wire.contains("From: sender@example.com\r\n"));
    assert!(wire.contains("To: recipient@example.com\r\n"));
    assert!(wire.contains("Subject: Greetings\r\n"));
    assert!(wire.contains("MIME-Version: 1.0\r\n"));
    assert!(wire.contains("\r\n\r\nHello, World!"));
}
