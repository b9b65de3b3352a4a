//! Error types for the email builder.

/// Result type alias for builder operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while configuring or building an email.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An address-list mutator received an empty collection.
    #[error("Empty address list given for {field}")]
    EmptyAddressList {
        /// Recipient field the empty list was given for.
        field: &'static str,
    },

    /// A header name or value was empty.
    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    /// The MIME message was already built for this email.
    #[error("The MIME message was already built")]
    AlreadyBuilt,

    /// Required configuration was missing at build or session time.
    #[error("Missing configuration: {0}")]
    MissingConfiguration(&'static str),

    /// Error from the MIME layer (invalid address, rendering failure).
    #[error("MIME error: {0}")]
    Mime(#[from] mailwright_mime::Error),
}
