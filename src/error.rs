//! Error types for the emission engine.
//!
//! Document building is infallible; these errors come from persisting a
//! document, loading configuration, or conducting a mail dialogue.

/// Result type alias for emission operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while emitting documents or mail.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error (connect, read, write, file save)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TLS configuration or handshake failure
    #[error("TLS error: {0}")]
    Tls(String),

    /// Host cannot be used as a TLS server name
    #[error("Invalid server name: {0}")]
    InvalidServerName(String),

    /// Server answered a step with a fatal (>= 400) status code
    #[error("SMTP error: {0}")]
    Smtp(String),

    /// A complete reply line without a leading 3-digit status code
    #[error("Malformed SMTP reply: {0}")]
    MalformedReply(String),

    /// Server closed the stream before the dialogue completed
    #[error("Connection closed by server before step {step} completed")]
    ConnectionClosed {
        /// Number of commands written before the stream ended
        step: usize,
    },

    /// Configuration value could not be interpreted
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<rustls::Error> for Error {
    fn from(err: rustls::Error) -> Self {
        Error::Tls(err.to_string())
    }
}
