//! # DigniPay Emit
//!
//! Document and mail emission for the DigniPay shelter-donation portal.
//!
//! ## Core Features
//!
//! - **PDF Generation**: byte-exact single-page PDF 1.4 documents from a
//!   title, optional subtitle, body lines and a pinned footer
//!   (ISO 32000-1:2008 sections 7.5 and 9.4)
//! - **SMTP Delivery**: one HTML message per connection over plain TCP or
//!   implicit TLS, with `AUTH LOGIN`
//! - **Receipts**: receipt documents and notification emails built from
//!   ledger data
//! - **Impact Reports**: the city impact report page from aggregated figures
//!
//! ## Quick Start
//!
//! ```
//! use dignipay_emit::writer::{build, DocumentRequest};
//!
//! let pdf = build(
//!     &DocumentRequest::new("DigniPay — City Impact Report")
//!         .lines(["Total donations: $1,250.00", "Active participants: 42"])
//!         .with_footer("All data is anonymized and aggregated for public accountability."),
//! );
//! assert!(pdf.as_bytes().ends_with(b"%%EOF\n"));
//! ```
//!
//! ## License
//!
//! Licensed under either of:
//!
//! * Apache License, Version 2.0 ([LICENSE-APACHE](LICENSE-APACHE) or <http://www.apache.org/licenses/LICENSE-2.0>)
//! * MIT license ([LICENSE-MIT](LICENSE-MIT) or <http://opensource.org/licenses/MIT>)
//!
//! at your option.

#![warn(missing_docs)]

// Error handling
pub mod error;

/// Call-time configuration and credential loading
pub mod config;

// PDF generation
pub mod writer;

// Mail delivery
pub mod mail;

// Receipt composition
pub mod receipt;

// Impact report composition
pub mod report;

pub use config::{EmissionConfig, TransportCredentials};
pub use error::{Error, Result};
pub use mail::{MailClient, MailMessage};
pub use writer::{build, DocumentBuffer, DocumentRequest};
