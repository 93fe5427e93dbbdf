//! Outbound HTML message and its DATA payload.

use serde::{Deserialize, Serialize};

/// A single HTML email.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailMessage {
    /// Recipient address; empty means "nothing to send"
    pub to: String,
    /// Subject header
    pub subject: String,
    /// HTML body
    pub html_body: String,
}

impl MailMessage {
    /// Create a message.
    pub fn new(
        to: impl Into<String>,
        subject: impl Into<String>,
        html_body: impl Into<String>,
    ) -> Self {
        Self {
            to: to.into(),
            subject: subject.into(),
            html_body: html_body.into(),
        }
    }

    /// Whether there is a recipient to deliver to.
    pub fn has_recipient(&self) -> bool {
        !self.to.is_empty()
    }

    /// Build the payload written after the server accepts `DATA`.
    ///
    /// Headers, a blank line, the body with CRLF line endings and
    /// dot-stuffing, then the lone `.` terminator.
    pub fn data_payload(&self) -> String {
        let mut out = String::with_capacity(self.html_body.len() + 128);
        out.push_str(&format!("Subject: {}\r\n", self.subject));
        out.push_str(&format!("To: {}\r\n", self.to));
        out.push_str("MIME-Version: 1.0\r\n");
        out.push_str("Content-Type: text/html; charset=UTF-8\r\n");
        out.push_str("\r\n");
        out.push_str(&normalize_body(&self.html_body));
        out.push_str(".\r\n");
        out
    }
}

/// Normalise line endings to CRLF and dot-stuff lines starting with `.`.
///
/// CRLF, LF and a bare CR each end a line. The result always ends with CRLF.
fn normalize_body(body: &str) -> String {
    let mut out = String::with_capacity(body.len() + 64);
    let unified = body.replace("\r\n", "\n").replace('\r', "\n");
    for line in unified.split('\n') {
        if line.starts_with('.') {
            out.push('.');
        }
        out.push_str(line);
        out.push_str("\r\n");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_headers() {
        let msg = MailMessage::new("donor@example.org", "DigniPay Receipt R-1", "<p>Hi</p>");
        let payload = msg.data_payload();
        assert_eq!(
            payload,
            "Subject: DigniPay Receipt R-1\r\n\
             To: donor@example.org\r\n\
             MIME-Version: 1.0\r\n\
             Content-Type: text/html; charset=UTF-8\r\n\
             \r\n\
             <p>Hi</p>\r\n\
             .\r\n"
        );
    }

    #[test]
    fn test_body_line_endings_normalized() {
        assert_eq!(normalize_body("a\nb\r\nc"), "a\r\nb\r\nc\r\n");
    }

    #[test]
    fn test_bare_carriage_return_ends_line() {
        assert_eq!(normalize_body("a\rb"), "a\r\nb\r\n");
        assert_eq!(normalize_body("x\r\r\n.y"), "x\r\n\r\n..y\r\n");
    }

    #[test]
    fn test_leading_dot_is_stuffed() {
        assert_eq!(normalize_body(".\n..x"), "..\r\n...x\r\n");
    }

    #[test]
    fn test_has_recipient() {
        assert!(MailMessage::new("a@b.c", "", "").has_recipient());
        assert!(!MailMessage::new("", "", "").has_recipient());
        assert!(MailMessage::new("  ", "", "").has_recipient());
    }
}
