//! Donation receipts as documents and emails.

use crate::config::EmissionConfig;
use crate::mail::MailMessage;
use crate::writer::DocumentRequest;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Receipt data handed over by the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    /// Stable identifier used in links
    pub id: String,
    /// Human-facing receipt number
    pub receipt_number: String,
    /// Donation amount in cents
    pub donation_amount_cents: i64,
    /// Tip amount in cents
    pub tip_cents: i64,
    /// Spending category
    pub category: String,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Acknowledgement line; the configured default is used when empty
    #[serde(default)]
    pub sponsor_text: String,
}

impl Receipt {
    fn sponsor_line<'a>(&'a self, config: &'a EmissionConfig) -> &'a str {
        if self.sponsor_text.is_empty() {
            &config.sponsor_acknowledgement
        } else {
            &self.sponsor_text
        }
    }

    fn date_line(&self) -> String {
        self.created_at.format("%Y-%m-%d %H:%M UTC").to_string()
    }
}

/// Format cents as Canadian dollars, e.g. `$1,234.56`.
pub fn format_cad(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    let dollars = (abs / 100).to_string();

    let mut grouped = String::with_capacity(dollars.len() + dollars.len() / 3);
    for (i, ch) in dollars.chars().enumerate() {
        if i > 0 && (dollars.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{}${}.{:02}", sign, grouped, abs % 100)
}

/// Single-page receipt document.
pub fn receipt_document(receipt: &Receipt, config: &EmissionConfig) -> DocumentRequest {
    DocumentRequest::new("DigniPay Receipt")
        .with_subtitle("Thank you for your support")
        .lines([
            format!("Receipt #: {}", receipt.receipt_number),
            format!("Donation: {}", format_cad(receipt.donation_amount_cents)),
            format!("Tip: {}", format_cad(receipt.tip_cents)),
            format!("Category: {}", receipt.category),
            format!("Date: {}", receipt.date_line()),
            receipt.sponsor_line(config).to_string(),
        ])
        .with_footer("This receipt is provided for your records.")
}

/// Receipt notification email for `to`.
pub fn receipt_email(receipt: &Receipt, to: &str, config: &EmissionConfig) -> MailMessage {
    let base = config.app_url.trim_end_matches('/');
    let view_url = format!("{}/receipt/{}/view", base, receipt.id);
    let pdf_url = format!("{}/receipt/{}/pdf", base, receipt.id);

    let html = format!(
        "<h2>Thank you for supporting DigniPay</h2>\n\
         <p>Receipt number: <strong>{number}</strong></p>\n\
         <p>Donation amount: {donation}</p>\n\
         <p>Tip amount: {tip}</p>\n\
         <p>Category: {category}</p>\n\
         <p>Date: {date}</p>\n\
         <p>{sponsor}</p>\n\
         <p>View receipt: <a href=\"{view}\">{view}</a></p>\n\
         <p>Download PDF: <a href=\"{pdf}\">{pdf}</a></p>",
        number = escape_html(&receipt.receipt_number),
        donation = format_cad(receipt.donation_amount_cents),
        tip = format_cad(receipt.tip_cents),
        category = escape_html(&receipt.category),
        date = receipt.date_line(),
        sponsor = escape_html(receipt.sponsor_line(config)),
        view = escape_html(&view_url),
        pdf = escape_html(&pdf_url),
    );

    MailMessage::new(
        to,
        format!("DigniPay Receipt {}", receipt.receipt_number),
        html,
    )
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_cad() {
        assert_eq!(format_cad(0), "$0.00");
        assert_eq!(format_cad(5), "$0.05");
        assert_eq!(format_cad(2500), "$25.00");
        assert_eq!(format_cad(123456), "$1,234.56");
        assert_eq!(format_cad(100000000), "$1,000,000.00");
        assert_eq!(format_cad(-1999), "-$19.99");
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("Food & <Hygiene>"), "Food &amp; &lt;Hygiene&gt;");
    }
}
