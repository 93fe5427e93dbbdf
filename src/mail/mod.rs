//! Minimal SMTP client.
//!
//! Speaks a fixed `EHLO` / `AUTH LOGIN` / `MAIL` / `RCPT` / `DATA` / `QUIT`
//! sequence over a plain or implicit-TLS socket, one message per connection.
//!
//! ```no_run
//! use dignipay_emit::config::{EmissionConfig, TransportCredentials};
//! use dignipay_emit::mail::{MailClient, MailMessage};
//!
//! # fn main() -> dignipay_emit::Result<()> {
//! let config = EmissionConfig::from_env();
//! let credentials = TransportCredentials::from_env()?;
//! let client = MailClient::new(&config);
//! let message = MailMessage::new("donor@example.org", "Thank you", "<p>Thanks!</p>");
//! let delivered = client.send_or_warn(&message, credentials.as_ref());
//! # let _ = delivered;
//! # Ok(())
//! # }
//! ```

mod client;
mod dialogue;
mod message;
mod transport;

pub use client::MailClient;
pub use dialogue::{reply_code, Advance, DialogueState, DialogueStatus, Envelope, Step};
pub use message::MailMessage;
pub use transport::{Connector, SmtpStream, TcpConnector, Transport};
pub use crate::config::TransportCredentials;
