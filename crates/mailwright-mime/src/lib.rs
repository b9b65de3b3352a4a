//! # mailwright-mime
//!
//! MIME message types and generation library for email.
//!
//! ## Features
//!
//! - **Address types**: Validated email addresses and mailboxes with
//!   display names
//! - **Message generation**: Build single-part and multipart MIME
//!   messages and render them to wire form
//! - **Encoding**: Base64, Quoted-Printable, RFC 2047 header encoding
//! - **Content types**: MIME content type construction and parsing
//!
//! ## Quick Start
//!
//! ### Addresses
//!
//! ```ignore
//! use mailwright_mime::Mailbox;
//!
//! let mailbox = Mailbox::with_name("John Doe", "john@example.com")?;
//! assert_eq!(mailbox.to_string(), "John Doe <john@example.com>");
//!
//! let parsed = Mailbox::parse("Jane <jane@example.com>")?;
//! assert_eq!(parsed.address.as_str(), "jane@example.com");
//! ```
//!
//! ### Building a Message
//!
//! ```ignore
//! use mailwright_mime::{Headers, MimeMessage};
//!
//! let mut headers = Headers::new();
//! headers.add("From", "sender@example.com");
//! headers.add("To", "recipient@example.com");
//! headers.add("Subject", "Test");
//! headers.add("Content-Type", "text/plain; charset=utf-8");
//!
//! let message = MimeMessage::single_part(headers, b"Hello, World!".to_vec());
//! println!("{}", message.to_wire()?);
//! ```
//!
//! ### Multipart Messages
//!
//! ```ignore
//! use mailwright_mime::{ContentType, Headers, MimeMessage, Part, generate_boundary};
//!
//! let boundary = generate_boundary();
//! let mut headers = Headers::new();
//! headers.add(
//!     "Content-Type",
//!     ContentType::multipart_alternative(&boundary).to_string(),
//! );
//!
//! let message = MimeMessage::multipart(
//!     headers,
//!     vec![Part::text("Plain version"), Part::html("<h1>HTML version</h1>")],
//! );
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod address;
mod content_type;
mod error;
mod header;
mod message;

pub mod encoding;

pub use address::{Address, Mailbox};
pub use content_type::ContentType;
pub use error::{Error, Result};
pub use header::Headers;
pub use message::{MimeMessage, Part, TransferEncoding, generate_boundary};
