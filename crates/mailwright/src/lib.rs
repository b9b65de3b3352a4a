//! # mailwright
//!
//! An email construction library: collect recipients, headers, and body
//! content through validated mutators, then assemble an immutable MIME
//! message artifact.
//!
//! ## Features
//!
//! - **Validated mutators**: address lists reject empty collections,
//!   headers reject empty names and values, addresses are checked on entry
//! - **Build-once semantics**: the MIME message is assembled at most once
//!   per email; a second build attempt is rejected
//! - **Session configuration**: host name, port, socket timeouts, and
//!   bounce address resolve into a transport-ready [`SessionConfig`]
//! - **Body assembly**: plain text, HTML, multipart/alternative, explicit
//!   content overrides, and attachments via [`mailwright_mime`]
//!
//! Transport is out of scope: the built [`MimeMessage`] and the resolved
//! [`SessionConfig`] are handed to whatever mail transport the caller
//! uses.
//!
//! ## Quick Start
//!
//! ```ignore
//! use mailwright::Email;
//!
//! let mut email = Email::new();
//! email.set_host_name("smtp.example.com");
//! email
//!     .add_to("recipient@example.com")?
//!     .set_from("sender@example.com")?
//!     .set_subject("Greetings")
//!     .set_msg("Hello, World!");
//!
//! let message = email.build_mime_message()?;
//! println!("{}", message.to_wire()?);
//! ```
//!
//! ## Modules
//!
//! - [`email`]: the [`Email`] builder
//! - [`session`]: transport session configuration
//! - [`error`]: error types

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod email;
pub mod error;
pub mod session;

pub use email::Email;
pub use error::{Error, Result};
pub use session::{DEFAULT_SMTP_PORT, SessionConfig};

// Mail-API types the builder consumes and produces.
pub use mailwright_mime::{Address, ContentType, Mailbox, MimeMessage, Part};
