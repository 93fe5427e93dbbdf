//! Emit a donation receipt
//!
//! Renders a receipt PDF from JSON and optionally emails the donor.
//! Mail settings come from `SMTP_HOST`, `SMTP_PORT`, `SMTP_USER`,
//! `SMTP_PASS`, `SMTP_SECURE`, `SMTP_TIMEOUT_SECS` and `RECEIPT_EMAIL_FROM`.
//!
//! Usage:
//!   cargo run --bin emit_receipt -- receipt.json
//!   cargo run --bin emit_receipt -- receipt.json --output r.pdf --mail-to donor@example.org

use dignipay_emit::config::{timeout_from_lookup, EmissionConfig, TransportCredentials};
use dignipay_emit::mail::{MailClient, TcpConnector};
use dignipay_emit::receipt::{receipt_document, receipt_email, Receipt};
use dignipay_emit::writer::build;
use std::fs;
use std::path::PathBuf;

struct EmitArgs {
    receipt_path: PathBuf,
    output: Option<PathBuf>,
    mail_to: Option<String>,
}

impl EmitArgs {
    fn from_args() -> Option<Self> {
        let args: Vec<String> = std::env::args().collect();
        let mut receipt_path = None;
        let mut output = None;
        let mut mail_to = None;

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--output" | "-o" => {
                    i += 1;
                    output = args.get(i).map(PathBuf::from);
                },
                "--mail-to" => {
                    i += 1;
                    mail_to = args.get(i).cloned();
                },
                other if receipt_path.is_none() => {
                    receipt_path = Some(PathBuf::from(other));
                },
                other => {
                    eprintln!("Unexpected argument: {}", other);
                    return None;
                },
            }
            i += 1;
        }

        Some(Self {
            receipt_path: receipt_path?,
            output,
            mail_to,
        })
    }
}

fn main() {
    env_logger::init();

    let Some(args) = EmitArgs::from_args() else {
        eprintln!("Usage: emit_receipt <receipt.json> [--output <file.pdf>] [--mail-to <address>]");
        std::process::exit(1);
    };
    let config = EmissionConfig::from_env();

    let receipt: Receipt = match fs::read_to_string(&args.receipt_path)
        .map_err(|e| e.to_string())
        .and_then(|json| serde_json::from_str(&json).map_err(|e| e.to_string()))
    {
        Ok(receipt) => receipt,
        Err(e) => {
            eprintln!("Failed to load {}: {}", args.receipt_path.display(), e);
            std::process::exit(1);
        },
    };

    let output = args
        .output
        .unwrap_or_else(|| PathBuf::from(format!("receipt-{}.pdf", receipt.receipt_number)));
    let pdf = build(&receipt_document(&receipt, &config));
    if let Err(e) = pdf.save(&output) {
        eprintln!("Failed to write {}: {}", output.display(), e);
        std::process::exit(1);
    }
    println!("Wrote {} ({} bytes)", output.display(), pdf.len());

    let Some(to) = args.mail_to else {
        return;
    };
    let lookup = |key: &str| std::env::var(key).ok();
    let (credentials, timeout) = match (
        TransportCredentials::from_lookup(lookup),
        timeout_from_lookup(lookup),
    ) {
        (Ok(credentials), Ok(timeout)) => (credentials, timeout),
        (Err(e), _) | (_, Err(e)) => {
            eprintln!("Mail configuration error: {}", e);
            std::process::exit(1);
        },
    };

    let client = MailClient::with_connector(&config, TcpConnector::new().with_timeout(timeout));
    let message = receipt_email(&receipt, &to, &config);
    if client.send_or_warn(&message, credentials.as_ref()) {
        println!("Receipt emailed to {}", to);
    } else {
        println!("Receipt email not sent");
    }
}
