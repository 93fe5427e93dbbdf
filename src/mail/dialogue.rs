//! SMTP command sequence and reply tracking.
//!
//! The dialogue is a fixed array of [`Step`]s addressed by an index. Every
//! complete reply burst from the server either advances the index by one,
//! finishes the dialogue, or freezes it in a failed state.

use super::message::MailMessage;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};

/// One command of the delivery dialogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// `EHLO <identity>`
    Greet,
    /// `AUTH LOGIN`
    AuthLogin,
    /// Base64 user name
    Username,
    /// Base64 password
    Password,
    /// `MAIL FROM:<sender>`
    MailFrom,
    /// `RCPT TO:<recipient>`
    RcptTo,
    /// `DATA`
    Data,
    /// Headers, body and `.` terminator
    Message,
    /// `QUIT`
    Quit,
}

impl Step {
    /// All steps in protocol order.
    pub const ALL: [Step; 9] = [
        Step::Greet,
        Step::AuthLogin,
        Step::Username,
        Step::Password,
        Step::MailFrom,
        Step::RcptTo,
        Step::Data,
        Step::Message,
        Step::Quit,
    ];

    /// Short label safe for logging (never contains credentials).
    pub fn label(&self) -> &'static str {
        match self {
            Step::Greet => "EHLO",
            Step::AuthLogin => "AUTH LOGIN",
            Step::Username => "AUTH username",
            Step::Password => "AUTH password",
            Step::MailFrom => "MAIL FROM",
            Step::RcptTo => "RCPT TO",
            Step::Data => "DATA",
            Step::Message => "message body",
            Step::Quit => "QUIT",
        }
    }

    /// Bytes written for this step, CRLF-terminated.
    pub fn command(&self, envelope: &Envelope<'_>) -> Vec<u8> {
        let line = match self {
            Step::Greet => format!("EHLO {}", envelope.identity),
            Step::AuthLogin => "AUTH LOGIN".to_string(),
            Step::Username => BASE64.encode(envelope.username),
            Step::Password => BASE64.encode(envelope.password),
            Step::MailFrom => format!("MAIL FROM:<{}>", envelope.from),
            Step::RcptTo => format!("RCPT TO:<{}>", envelope.message.to),
            Step::Data => "DATA".to_string(),
            Step::Message => return envelope.message.data_payload().into_bytes(),
            Step::Quit => "QUIT".to_string(),
        };
        format!("{}\r\n", line).into_bytes()
    }
}

/// Everything the steps need to render their commands.
#[derive(Debug, Clone, Copy)]
pub struct Envelope<'a> {
    /// Greeting identity
    pub identity: &'a str,
    /// AUTH LOGIN user name
    pub username: &'a str,
    /// AUTH LOGIN password
    pub password: &'a str,
    /// Envelope sender
    pub from: &'a str,
    /// Message being delivered
    pub message: &'a MailMessage,
}

/// Terminal status of a dialogue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogueStatus {
    /// Waiting on the server
    Pending,
    /// Final reply accepted
    Succeeded,
    /// Fatal reply; holds the raw line
    Failed(String),
}

/// What the client should do after feeding bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advance {
    /// No complete line yet
    Wait,
    /// Write this step's command
    Send(Step),
    /// Every step acknowledged; close the connection
    Complete,
    /// Fatal reply code (>= 400); close the connection
    Rejected(String),
    /// Complete line without a numeric status; close the connection
    Malformed(String),
}

/// Per-attempt dialogue state.
#[derive(Debug, Clone)]
pub struct DialogueState {
    step: usize,
    buffer: Vec<u8>,
    status: DialogueStatus,
}

impl DialogueState {
    /// Fresh dialogue, waiting for the server greeting.
    pub fn new() -> Self {
        Self {
            step: 0,
            buffer: Vec::new(),
            status: DialogueStatus::Pending,
        }
    }

    /// Number of steps already sent.
    pub fn steps_sent(&self) -> usize {
        self.step
    }

    /// Current status.
    pub fn status(&self) -> &DialogueStatus {
        &self.status
    }

    /// Whether the dialogue has ended.
    pub fn is_finished(&self) -> bool {
        self.status != DialogueStatus::Pending
    }

    /// Feed bytes read from the server.
    ///
    /// Only the last complete, non-empty line of the burst is inspected.
    /// Bytes after the last newline stay buffered for the next call.
    pub fn feed(&mut self, chunk: &[u8]) -> Advance {
        match &self.status {
            DialogueStatus::Succeeded => return Advance::Complete,
            DialogueStatus::Failed(line) => return Advance::Rejected(line.clone()),
            DialogueStatus::Pending => {},
        }

        self.buffer.extend_from_slice(chunk);
        let Some(last_newline) = self.buffer.iter().rposition(|&b| b == b'\n') else {
            return Advance::Wait;
        };
        let complete: Vec<u8> = self.buffer.drain(..=last_newline).collect();
        let text = String::from_utf8_lossy(&complete);
        let Some(line) = text
            .split('\n')
            .map(|l| l.strip_suffix('\r').unwrap_or(l))
            .rev()
            .find(|l| !l.is_empty())
        else {
            return Advance::Wait;
        };

        match reply_code(line) {
            None => {
                self.status = DialogueStatus::Failed(line.to_string());
                Advance::Malformed(line.to_string())
            },
            Some(code) if code >= 400 => {
                self.status = DialogueStatus::Failed(line.to_string());
                Advance::Rejected(line.to_string())
            },
            Some(_) => match Step::ALL.get(self.step) {
                Some(step) => {
                    self.step += 1;
                    Advance::Send(*step)
                },
                None => {
                    self.status = DialogueStatus::Succeeded;
                    Advance::Complete
                },
            },
        }
    }
}

impl Default for DialogueState {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse the leading 3-digit status code of a reply line.
pub fn reply_code(line: &str) -> Option<u16> {
    let digits = line.get(..3)?;
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn envelope(message: &MailMessage) -> Envelope<'_> {
        Envelope {
            identity: "dignipay.local",
            username: "user",
            password: "pass",
            from: "receipts@dignipay.local",
            message,
        }
    }

    #[test]
    fn test_reply_code() {
        assert_eq!(reply_code("250 OK"), Some(250));
        assert_eq!(reply_code("550-5.1.1 no"), Some(550));
        assert_eq!(reply_code("25"), None);
        assert_eq!(reply_code("OK 250"), None);
        assert_eq!(reply_code("+25 hi"), None);
    }

    #[test]
    fn test_commands() {
        let message = MailMessage::new("donor@example.org", "Hi", "<p>x</p>");
        let env = envelope(&message);
        assert_eq!(Step::Greet.command(&env), b"EHLO dignipay.local\r\n");
        assert_eq!(Step::Username.command(&env), b"dXNlcg==\r\n");
        assert_eq!(Step::Password.command(&env), b"cGFzcw==\r\n");
        assert_eq!(
            Step::MailFrom.command(&env),
            b"MAIL FROM:<receipts@dignipay.local>\r\n"
        );
        assert_eq!(Step::RcptTo.command(&env), b"RCPT TO:<donor@example.org>\r\n");
        assert!(Step::Message.command(&env).ends_with(b"\r\n.\r\n"));
    }

    #[test]
    fn test_greeting_triggers_first_step() {
        let mut state = DialogueState::new();
        assert_eq!(state.feed(b"220 mail ready\r\n"), Advance::Send(Step::Greet));
        assert_eq!(state.steps_sent(), 1);
    }

    #[test]
    fn test_partial_line_is_buffered() {
        let mut state = DialogueState::new();
        assert_eq!(state.feed(b"22"), Advance::Wait);
        assert_eq!(state.feed(b"0 ready"), Advance::Wait);
        assert_eq!(state.feed(b"\r\n"), Advance::Send(Step::Greet));
    }

    #[test]
    fn test_last_line_of_burst_wins() {
        let mut state = DialogueState::new();
        state.feed(b"220 ready\r\n");
        let advance = state.feed(b"250-mail.example.org\r\n250-SIZE 1000\r\n250 AUTH LOGIN\r\n");
        assert_eq!(advance, Advance::Send(Step::AuthLogin));
    }

    #[test]
    fn test_trailing_bytes_are_kept() {
        let mut state = DialogueState::new();
        assert_eq!(state.feed(b"220 ready\r\n25"), Advance::Send(Step::Greet));
        assert_eq!(state.feed(b"0 ok\r\n"), Advance::Send(Step::AuthLogin));
    }

    #[test]
    fn test_failure_freezes_state() {
        let mut state = DialogueState::new();
        state.feed(b"220 ready\r\n");
        let advance = state.feed(b"535 5.7.8 bad credentials\r\n");
        assert_eq!(advance, Advance::Rejected("535 5.7.8 bad credentials".into()));
        assert!(state.is_finished());
        assert_eq!(state.feed(b"250 ok\r\n"), advance);
        assert_eq!(state.steps_sent(), 1);
    }

    #[test]
    fn test_full_sequence_completes() {
        let mut state = DialogueState::new();
        for expected in Step::ALL {
            assert_eq!(state.feed(b"250 ok\r\n"), Advance::Send(expected));
        }
        assert_eq!(state.feed(b"221 bye\r\n"), Advance::Complete);
        assert_eq!(state.status(), &DialogueStatus::Succeeded);
    }

    #[test]
    fn test_non_numeric_reply_is_malformed() {
        let mut state = DialogueState::new();
        assert_eq!(
            state.feed(b"hello there\r\n"),
            Advance::Malformed("hello there".into())
        );
        assert!(state.is_finished());
    }
}
