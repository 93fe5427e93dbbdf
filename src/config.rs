//! Configuration for document and mail emission.
//!
//! Defaults live in explicit structs handed to each call rather than in
//! process-wide state. The `from_lookup` constructors take a variable lookup
//! function so tests can supply values without touching the environment.

use crate::error::{Error, Result};
use std::fmt;
use std::time::Duration;

/// Default envelope sender when `RECEIPT_EMAIL_FROM` is unset.
pub const DEFAULT_MAIL_FROM: &str = "receipts@dignipay.local";
/// Default identity announced in the greeting line.
pub const DEFAULT_CLIENT_IDENTITY: &str = "dignipay.local";
/// Default acknowledgement printed on receipts.
pub const DEFAULT_SPONSOR_ACKNOWLEDGEMENT: &str =
    "Supported by Montreal civic partners and community sponsors.";
/// Default public base URL used in receipt links.
pub const DEFAULT_APP_URL: &str = "http://localhost:3000";
/// Port conventionally used for implicit-TLS submission.
pub const IMPLICIT_TLS_PORT: u16 = 465;
/// Default socket timeout for mail transport.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Call-time defaults shared by the document and mail components.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmissionConfig {
    /// Envelope sender address
    pub mail_from: String,
    /// Identity sent in the greeting command
    pub client_identity: String,
    /// Acknowledgement line printed on receipts
    pub sponsor_acknowledgement: String,
    /// Public base URL for receipt links
    pub app_url: String,
}

impl Default for EmissionConfig {
    fn default() -> Self {
        Self {
            mail_from: DEFAULT_MAIL_FROM.to_string(),
            client_identity: DEFAULT_CLIENT_IDENTITY.to_string(),
            sponsor_acknowledgement: DEFAULT_SPONSOR_ACKNOWLEDGEMENT.to_string(),
            app_url: DEFAULT_APP_URL.to_string(),
        }
    }
}

impl EmissionConfig {
    /// Create configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load overrides from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load overrides through `lookup`; missing or empty values keep defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());
        let defaults = Self::default();
        Self {
            mail_from: get("RECEIPT_EMAIL_FROM").unwrap_or(defaults.mail_from),
            client_identity: get("SMTP_CLIENT_IDENTITY").unwrap_or(defaults.client_identity),
            sponsor_acknowledgement: get("SPONSOR_ACKNOWLEDGEMENT")
                .unwrap_or(defaults.sponsor_acknowledgement),
            app_url: get("APP_URL").unwrap_or(defaults.app_url),
        }
    }

    /// Set the envelope sender.
    pub fn with_mail_from(mut self, from: impl Into<String>) -> Self {
        self.mail_from = from.into();
        self
    }

    /// Set the greeting identity.
    pub fn with_client_identity(mut self, identity: impl Into<String>) -> Self {
        self.client_identity = identity.into();
        self
    }

    /// Set the receipt acknowledgement text.
    pub fn with_sponsor_acknowledgement(mut self, text: impl Into<String>) -> Self {
        self.sponsor_acknowledgement = text.into();
        self
    }

    /// Set the public base URL.
    pub fn with_app_url(mut self, url: impl Into<String>) -> Self {
        self.app_url = url.into();
        self
    }
}

/// Connection parameters for the mail server.
#[derive(Clone, PartialEq, Eq)]
pub struct TransportCredentials {
    /// Server host name
    pub host: String,
    /// Server port
    pub port: u16,
    /// AUTH LOGIN user name
    pub username: String,
    /// AUTH LOGIN password
    pub password: String,
    /// Establish TLS before the first byte (no STARTTLS upgrade)
    pub secure: bool,
}

impl TransportCredentials {
    /// Create credentials; `secure` defaults to true on port 465.
    pub fn new(
        host: impl Into<String>,
        port: u16,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            port,
            username: username.into(),
            password: password.into(),
            secure: port == IMPLICIT_TLS_PORT,
        }
    }

    /// Force or disable implicit TLS.
    pub fn with_secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    /// Load credentials from the process environment.
    pub fn from_env() -> Result<Option<Self>> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load credentials through `lookup`.
    ///
    /// Returns `Ok(None)` when any of `SMTP_HOST`, `SMTP_PORT`, `SMTP_USER`
    /// or `SMTP_PASS` is missing or empty: mail is simply not configured.
    pub fn from_lookup<F>(lookup: F) -> Result<Option<Self>>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());
        let (Some(host), Some(port), Some(user), Some(pass)) = (
            get("SMTP_HOST"),
            get("SMTP_PORT"),
            get("SMTP_USER"),
            get("SMTP_PASS"),
        ) else {
            return Ok(None);
        };

        let port: u16 = port
            .trim()
            .parse()
            .map_err(|_| Error::InvalidConfig(format!("SMTP_PORT is not a port: {}", port)))?;
        let secure = get("SMTP_SECURE").as_deref() == Some("true") || port == IMPLICIT_TLS_PORT;

        Ok(Some(Self::new(host, port, user, pass).with_secure(secure)))
    }
}

impl fmt::Debug for TransportCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransportCredentials")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("secure", &self.secure)
            .finish()
    }
}

/// Socket timeout from `SMTP_TIMEOUT_SECS`, or [`DEFAULT_TIMEOUT`].
///
/// `0` disables the timeout.
pub fn timeout_from_lookup<F>(lookup: F) -> Result<Option<Duration>>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup("SMTP_TIMEOUT_SECS").filter(|v| !v.is_empty()) {
        None => Ok(Some(DEFAULT_TIMEOUT)),
        Some(raw) => {
            let secs: u64 = raw.trim().parse().map_err(|_| {
                Error::InvalidConfig(format!("SMTP_TIMEOUT_SECS is not a number: {}", raw))
            })?;
            Ok((secs > 0).then(|| Duration::from_secs(secs)))
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_default_config() {
        let config = EmissionConfig::default();
        assert_eq!(config.mail_from, "receipts@dignipay.local");
        assert_eq!(config.client_identity, "dignipay.local");
        assert_eq!(config.app_url, "http://localhost:3000");
    }

    #[test]
    fn test_config_overrides() {
        let env = vars(&[("RECEIPT_EMAIL_FROM", "noreply@shelter.org"), ("APP_URL", "")]);
        let config = EmissionConfig::from_lookup(|k| env.get(k).cloned());
        assert_eq!(config.mail_from, "noreply@shelter.org");
        assert_eq!(config.app_url, DEFAULT_APP_URL);
    }

    #[test]
    fn test_missing_credentials_is_none() {
        let env = vars(&[("SMTP_HOST", "mail.example.org"), ("SMTP_PORT", "587")]);
        let creds = TransportCredentials::from_lookup(|k| env.get(k).cloned()).unwrap();
        assert!(creds.is_none());
    }

    #[test]
    fn test_secure_flag_rules() {
        let mut env = vars(&[
            ("SMTP_HOST", "mail.example.org"),
            ("SMTP_PORT", "587"),
            ("SMTP_USER", "user"),
            ("SMTP_PASS", "secret"),
        ]);
        let creds = TransportCredentials::from_lookup(|k| env.get(k).cloned())
            .unwrap()
            .unwrap();
        assert!(!creds.secure);

        env.insert("SMTP_SECURE".into(), "true".into());
        let creds = TransportCredentials::from_lookup(|k| env.get(k).cloned())
            .unwrap()
            .unwrap();
        assert!(creds.secure);

        env.remove("SMTP_SECURE");
        env.insert("SMTP_PORT".into(), "465".into());
        let creds = TransportCredentials::from_lookup(|k| env.get(k).cloned())
            .unwrap()
            .unwrap();
        assert!(creds.secure);
    }

    #[test]
    fn test_bad_port_is_rejected() {
        let env = vars(&[
            ("SMTP_HOST", "mail.example.org"),
            ("SMTP_PORT", "smtp"),
            ("SMTP_USER", "user"),
            ("SMTP_PASS", "secret"),
        ]);
        let result = TransportCredentials::from_lookup(|k| env.get(k).cloned());
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_debug_redacts_password() {
        let creds = TransportCredentials::new("h", 25, "u", "hunter2");
        let dbg = format!("{:?}", creds);
        assert!(!dbg.contains("hunter2"));
        assert!(dbg.contains("<redacted>"));
    }

    #[test]
    fn test_timeout_lookup() {
        assert_eq!(timeout_from_lookup(|_| None).unwrap(), Some(DEFAULT_TIMEOUT));
        assert_eq!(timeout_from_lookup(|_| Some("0".into())).unwrap(), None);
        assert_eq!(
            timeout_from_lookup(|_| Some("5".into())).unwrap(),
            Some(Duration::from_secs(5))
        );
        assert!(timeout_from_lookup(|_| Some("soon".into())).is_err());
    }
}
