//! PDF writing module for generating single-page documents.
//!
//! ## Architecture
//!
//! ```text
//! DocumentRequest
//!     ↓
//! [PageLayout] (lines → positioned text ops → content stream)
//!     ↓
//! [ObjectTable] (objects + running offsets → xref + trailer)
//!     ↓
//! DocumentBuffer
//! ```
//!
//! ## Example
//!
//! ```
//! use dignipay_emit::writer::{build, DocumentRequest};
//!
//! let request = DocumentRequest::new("DigniPay Receipt")
//!     .with_subtitle("Thank you for your support")
//!     .line("Donation: $25.00")
//!     .with_footer("This receipt is provided for your records.");
//! let pdf = build(&request);
//! assert!(pdf.as_bytes().starts_with(b"%PDF-1.4"));
//! ```

mod content_stream;
mod object_serializer;
mod pdf_writer;

pub use content_stream::{
    escape_text, LineStyle, PageLayout, RenderedTextOp, FOOTER_BASELINE, MARGIN_LEFT,
    PAGE_HEIGHT, PAGE_WIDTH, TOP_OFFSET,
};
pub use object_serializer::{serialize_indirect, serialize_stream, xref_entry, ObjectTable};
pub use pdf_writer::{build, DocumentBuffer, DocumentRequest, BASE_FONT};
