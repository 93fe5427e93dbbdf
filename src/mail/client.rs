//! Mail delivery over a single connection.

use super::dialogue::{Advance, DialogueState, Envelope, Step};
use super::message::MailMessage;
use super::transport::{Connector, TcpConnector, Transport};
use crate::config::{EmissionConfig, TransportCredentials};
use crate::error::{Error, Result};
use std::io::{ErrorKind, Read, Write};

const READ_CHUNK: usize = 1024;

/// Delivers one HTML message per call.
///
/// Holds no per-delivery state, so one client can serve concurrent sends;
/// each send opens and closes its own connection.
#[derive(Debug, Clone)]
pub struct MailClient<C = TcpConnector> {
    connector: C,
    identity: String,
    from: String,
}

impl MailClient<TcpConnector> {
    /// Client using TCP (plain or implicit TLS) with the default timeout.
    pub fn new(config: &EmissionConfig) -> Self {
        Self::with_connector(config, TcpConnector::new())
    }
}

impl<C: Connector> MailClient<C> {
    /// Client using a custom connector.
    pub fn with_connector(config: &EmissionConfig, connector: C) -> Self {
        Self {
            connector,
            identity: config.client_identity.clone(),
            from: config.mail_from.clone(),
        }
    }

    /// Deliver `message`.
    ///
    /// Returns `Ok(false)` without connecting when `credentials` is absent or
    /// the recipient is empty. Returns `Ok(true)` once the server has
    /// acknowledged `QUIT`. A reply code >= 400 ends the dialogue with
    /// [`Error::Smtp`] carrying the raw reply line. The connection is closed
    /// on every path.
    pub fn send(
        &self,
        message: &MailMessage,
        credentials: Option<&TransportCredentials>,
    ) -> Result<bool> {
        let Some(credentials) = credentials else {
            log::debug!("Mail not configured; skipping delivery");
            return Ok(false);
        };
        if !message.has_recipient() {
            log::debug!("No recipient; skipping delivery");
            return Ok(false);
        }

        let mut stream = self.connector.connect(credentials)?;
        let envelope = Envelope {
            identity: &self.identity,
            username: &credentials.username,
            password: &credentials.password,
            from: &self.from,
            message,
        };
        let outcome = converse(&mut stream, &envelope);
        if let Err(e) = stream.close() {
            log::debug!("Closing mail connection failed: {}", e);
        }
        outcome?;

        log::info!("Delivered mail to {} via {}", message.to, credentials.host);
        Ok(true)
    }

    /// Deliver `message`, logging a warning instead of failing.
    ///
    /// Mail is a courtesy channel; callers should not block on it.
    pub fn send_or_warn(
        &self,
        message: &MailMessage,
        credentials: Option<&TransportCredentials>,
    ) -> bool {
        match self.send(message, credentials) {
            Ok(sent) => sent,
            Err(e) => {
                log::warn!("Mail delivery to {} failed: {}", message.to, e);
                false
            },
        }
    }
}

/// Run the dialogue until completion or failure. Does not close `stream`.
fn converse<T: Transport>(stream: &mut T, envelope: &Envelope<'_>) -> Result<()> {
    let mut state = DialogueState::new();
    let mut chunk = [0u8; READ_CHUNK];

    loop {
        let n = match stream.read(&mut chunk) {
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };
        if n == 0 {
            return Err(Error::ConnectionClosed {
                step: state.steps_sent(),
            });
        }

        match state.feed(&chunk[..n]) {
            Advance::Wait => {},
            Advance::Send(step) => write_step(stream, step, envelope)?,
            Advance::Complete => return Ok(()),
            Advance::Rejected(line) => {
                log::debug!("Server rejected step {}: {}", state.steps_sent(), line);
                return Err(Error::Smtp(line));
            },
            Advance::Malformed(line) => return Err(Error::MalformedReply(line)),
        }
    }
}

fn write_step<T: Transport>(stream: &mut T, step: Step, envelope: &Envelope<'_>) -> Result<()> {
    log::debug!("SMTP > {}", step.label());
    stream.write_all(&step.command(envelope))?;
    stream.flush()?;
    Ok(())
}
