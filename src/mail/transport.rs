//! Byte transport for the mail dialogue.
//!
//! [`Connector`] opens a [`Transport`] for a set of credentials. The TCP
//! implementation chooses plain or implicit-TLS once, before any byte is
//! sent; there is no STARTTLS upgrade.

use crate::config::{TransportCredentials, DEFAULT_TIMEOUT};
use crate::error::{Error, Result};
use rustls::pki_types::ServerName;
use rustls::{ClientConfig, ClientConnection, RootCertStore, StreamOwned};
use std::io::{self, Read, Write};
use std::net::{Shutdown, TcpStream, ToSocketAddrs};
use std::sync::Arc;
use std::time::Duration;

/// A connected, bidirectional byte stream.
pub trait Transport: Read + Write {
    /// Close the connection. Called exactly once per dialogue.
    fn close(&mut self) -> io::Result<()>;
}

/// Opens transports for the mail client.
pub trait Connector {
    /// Stream type produced.
    type Stream: Transport;

    /// Connect to the server described by `credentials`.
    fn connect(&self, credentials: &TransportCredentials) -> Result<Self::Stream>;
}

/// Plain-text or TLS socket.
pub enum SmtpStream {
    /// Unencrypted TCP
    Plain(TcpStream),
    /// TLS established at connect time
    Tls(Box<StreamOwned<ClientConnection, TcpStream>>),
}

impl Read for SmtpStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Self::Plain(s) => s.read(buf),
            Self::Tls(s) => s.read(buf),
        }
    }
}

impl Write for SmtpStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Self::Plain(s) => s.write(buf),
            Self::Tls(s) => s.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Self::Plain(s) => s.flush(),
            Self::Tls(s) => s.flush(),
        }
    }
}

impl Transport for SmtpStream {
    fn close(&mut self) -> io::Result<()> {
        match self {
            Self::Plain(s) => s.shutdown(Shutdown::Both),
            Self::Tls(s) => {
                let stream = &mut **s;
                stream.conn.send_close_notify();
                // Best effort: the peer may already be gone.
                let _ = stream.conn.complete_io(&mut stream.sock);
                stream.sock.shutdown(Shutdown::Both)
            },
        }
    }
}

/// TCP connector with optional implicit TLS.
#[derive(Debug, Clone)]
pub struct TcpConnector {
    timeout: Option<Duration>,
}

impl TcpConnector {
    /// Connector with the default socket timeout.
    pub fn new() -> Self {
        Self {
            timeout: Some(DEFAULT_TIMEOUT),
        }
    }

    /// Set the connect/read/write timeout; `None` blocks indefinitely.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    fn open_tcp(&self, host: &str, port: u16) -> Result<TcpStream> {
        let mut last_err = None;
        for addr in (host, port).to_socket_addrs()? {
            let attempt = match self.timeout {
                Some(timeout) => TcpStream::connect_timeout(&addr, timeout),
                None => TcpStream::connect(addr),
            };
            match attempt {
                Ok(stream) => {
                    stream.set_read_timeout(self.timeout)?;
                    stream.set_write_timeout(self.timeout)?;
                    return Ok(stream);
                },
                Err(e) => {
                    log::debug!("Connect to {} failed: {}", addr, e);
                    last_err = Some(e);
                },
            }
        }
        Err(last_err
            .unwrap_or_else(|| {
                io::Error::new(
                    io::ErrorKind::AddrNotAvailable,
                    format!("{}:{} did not resolve", host, port),
                )
            })
            .into())
    }
}

impl Default for TcpConnector {
    fn default() -> Self {
        Self::new()
    }
}

impl Connector for TcpConnector {
    type Stream = SmtpStream;

    fn connect(&self, credentials: &TransportCredentials) -> Result<SmtpStream> {
        let tcp = self.open_tcp(&credentials.host, credentials.port)?;
        if !credentials.secure {
            log::debug!("Connected to {}:{} (plain)", credentials.host, credentials.port);
            return Ok(SmtpStream::Plain(tcp));
        }

        let conn = ClientConnection::new(tls_config(), server_name(&credentials.host)?)?;
        log::debug!("Connected to {}:{} (TLS)", credentials.host, credentials.port);
        Ok(SmtpStream::Tls(Box::new(StreamOwned::new(conn, tcp))))
    }
}

fn tls_config() -> Arc<ClientConfig> {
    let mut root_store = RootCertStore::empty();
    root_store.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
    Arc::new(
        ClientConfig::builder()
            .with_root_certificates(root_store)
            .with_no_client_auth(),
    )
}

fn server_name(host: &str) -> Result<ServerName<'static>> {
    ServerName::try_from(host.to_string())
        .map_err(|e| Error::InvalidServerName(format!("{}: {}", host, e)))
}
