//! Email address types.

use crate::encoding::encode_rfc2047;
use crate::error::{Error, Result};
use std::fmt;

/// Validated email address.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Address(String);

impl Address {
    /// Creates a new address from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the address is invalid.
    pub fn new(addr: impl Into<String>) -> Result<Self> {
        let addr = addr.into();
        Self::validate(&addr)?;
        Ok(Self(addr))
    }

    /// Returns the address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Validates an email address (basic validation).
    fn validate(addr: &str) -> Result<()> {
        if addr.is_empty() {
            return Err(Error::InvalidAddress("Address cannot be empty".into()));
        }

        if addr.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(Error::InvalidAddress(
                "Address cannot contain whitespace".into(),
            ));
        }

        if !addr.contains('@') {
            return Err(Error::InvalidAddress("Address must contain @".into()));
        }

        let parts: Vec<&str> = addr.split('@').collect();
        if parts.len() != 2 {
            return Err(Error::InvalidAddress(
                "Address must have exactly one @".into(),
            ));
        }

        if parts[0].is_empty() || parts[1].is_empty() {
            return Err(Error::InvalidAddress(
                "Local and domain parts cannot be empty".into(),
            ));
        }

        Ok(())
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Mailbox (optional display name + address).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Mailbox {
    /// Display name (optional).
    pub name: Option<String>,
    /// Email address.
    pub address: Address,
}

impl Mailbox {
    /// Creates a new mailbox with just an address.
    ///
    /// # Errors
    ///
    /// Returns an error if the address is invalid.
    pub fn new(address: impl Into<String>) -> Result<Self> {
        Ok(Self {
            name: None,
            address: Address::new(address)?,
        })
    }

    /// Creates a new mailbox with a display name and address.
    ///
    /// An empty display name is treated as absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the address is invalid.
    pub fn with_name(name: impl Into<String>, address: impl Into<String>) -> Result<Self> {
        let name = name.into();
        Ok(Self {
            name: if name.trim().is_empty() {
                None
            } else {
                Some(name)
            },
            address: Address::new(address)?,
        })
    }

    /// Parses a mailbox from `addr` or `Name <addr>` form.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, the angle brackets are
    /// unbalanced, or the address is invalid.
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(Error::InvalidMailbox("Mailbox cannot be empty".into()));
        }

        let Some(open) = s.rfind('<') else {
            return Self::new(s);
        };

        if !s.ends_with('>') {
            return Err(Error::InvalidMailbox(format!(
                "Unterminated angle bracket: {s}"
            )));
        }

        let address = Address::new(&s[open + 1..s.len() - 1])?;
        let name = s[..open].trim().trim_matches('"').trim();

        Ok(Self {
            name: if name.is_empty() {
                None
            } else {
                Some(name.to_string())
            },
            address,
        })
    }
}

impl fmt::Display for Mailbox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => {
                let encoded = encode_rfc2047(name, "utf-8");
                // Quote plain names containing header specials
                if encoded == *name && name.contains(|c| "()<>@,;:\\\"[]".contains(c)) {
                    write!(f, "\"{}\" <{}>", name.replace('"', "\\\""), self.address)
                } else {
                    write!(f, "{} <{}>", encoded, self.address)
                }
            }
            None => write!(f, "{}", self.address),
        }
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
    fn test_valid_address() {
        let addr = Address::new("user@example.com").unwrap();
        assert_eq!(addr.as_str(), "user@example.com");
    }

    #[test]
    fn test_invalid_address_no_at() {
        assert!(Address::new("userexample.com").is_err());
    }

    #[test]
    fn test_invalid_address_empty() {
        assert!(Address::new("").is_err());
    }

    #[test]
    fn test_invalid_address_empty_local() {
        assert!(Address::new("@example.com").is_err());
    }

    #[test]
    fn test_invalid_address_empty_domain() {
        assert!(Address::new("user@").is_err());
    }

    #[test]
    fn test_invalid_address_whitespace() {
        assert!(Address::new("user name@example.com").is_err());
    }

    #[test]
    fn test_mailbox_new() {
        let mailbox = Mailbox::new("user@example.com").unwrap();
        assert_eq!(mailbox.address.as_str(), "user@example.com");
        assert!(mailbox.name.is_none());
    }

    #[test]
    fn test_mailbox_with_name() {
        let mailbox = Mailbox::with_name("John Doe", "john@example.com").unwrap();
        assert_eq!(mailbox.name.as_deref(), Some("John Doe"));
        assert_eq!(mailbox.address.as_str(), "john@example.com");
    }

    #[test]
    fn test_mailbox_with_empty_name() {
        let mailbox = Mailbox::with_name("", "john@example.com").unwrap();
        assert!(mailbox.name.is_none());
    }

    #[test]
    fn test_mailbox_parse_bare() {
        let mailbox = Mailbox::parse("user@example.com").unwrap();
        assert!(mailbox.name.is_none());
        assert_eq!(mailbox.address.as_str(), "user@example.com");
    }

    #[test]
    fn test_mailbox_parse_named() {
        let mailbox = Mailbox::parse("John Doe <john@example.com>").unwrap();
        assert_eq!(mailbox.name.as_deref(), Some("John Doe"));
        assert_eq!(mailbox.address.as_str(), "john@example.com");
    }

    #[test]
    fn test_mailbox_parse_quoted_name() {
        let mailbox = Mailbox::parse("\"Doe, John\" <john@example.com>").unwrap();
        assert_eq!(mailbox.name.as_deref(), Some("Doe, John"));
    }

    #[test]
    fn test_mailbox_parse_unterminated() {
        assert!(Mailbox::parse("John <john@example.com").is_err());
    }

    #[test]
    fn test_mailbox_display_bare() {
        let mailbox = Mailbox::new("user@example.com").unwrap();
        assert_eq!(mailbox.to_string(), "user@example.com");
    }

    #[test]
    fn test_mailbox_display_named() {
        let mailbox = Mailbox::with_name("John Doe", "john@example.com").unwrap();
        assert_eq!(mailbox.to_string(), "John Doe <john@example.com>");
    }

    #[test]
    fn test_mailbox_display_non_ascii_name() {
        let mailbox = Mailbox::with_name("Jöhn", "john@example.com").unwrap();
        let s = mailbox.to_string();
        assert!(s.starts_with("=?utf-8?B?"));
        assert!(s.ends_with("<john@example.com>"));
    }

    #[test]
    fn test_mailbox_display_quoted_specials() {
        let mailbox = Mailbox::with_name("Doe, John", "john@example.com").unwrap();
        assert_eq!(mailbox.to_string(), "\"Doe, John\" <john@example.com>");

        let mailbox = Mailbox::with_name("John (QA)", "john@example.com").unwrap();
        assert_eq!(mailbox.to_string(), "\"John (QA)\" <john@example.com>");
    }
}
