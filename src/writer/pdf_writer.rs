//! PDF document writer.
//!
//! Assembles a complete single-page PDF: header, catalog, page tree, page,
//! font, content stream, xref table and trailer.

use super::content_stream::{LineStyle, PageLayout, FONT_RESOURCE, PAGE_HEIGHT, PAGE_WIDTH};
use super::object_serializer::{serialize_indirect, serialize_stream, ObjectTable, PDF_HEADER};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Standard 14 font used for all text.
pub const BASE_FONT: &str = "Helvetica";

const CATALOG_ID: u32 = 1;
const PAGES_ID: u32 = 2;
const PAGE_ID: u32 = 3;
const FONT_ID: u32 = 4;
const CONTENT_ID: u32 = 5;

/// Text content for one page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRequest {
    /// Title line (18pt)
    pub title: String,
    /// Optional subtitle (12pt)
    #[serde(default)]
    pub subtitle: Option<String>,
    /// Body lines, rendered top-to-bottom
    #[serde(default, alias = "lines")]
    pub body_lines: Vec<String>,
    /// Optional footer, pinned to the bottom band
    #[serde(default)]
    pub footer: Option<String>,
}

impl DocumentRequest {
    /// Create a request with only a title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    /// Set the subtitle.
    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    /// Append a body line.
    pub fn line(mut self, line: impl Into<String>) -> Self {
        self.body_lines.push(line.into());
        self
    }

    /// Append several body lines.
    pub fn lines<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.body_lines.extend(lines.into_iter().map(Into::into));
        self
    }

    /// Set the footer.
    pub fn with_footer(mut self, footer: impl Into<String>) -> Self {
        self.footer = Some(footer.into());
        self
    }

    /// Lay out the page. Empty subtitle/footer strings are treated as absent.
    pub fn layout(&self) -> PageLayout {
        let mut layout = PageLayout::new();
        layout.add_line(&self.title, LineStyle::TITLE);
        if let Some(subtitle) = self.subtitle.as_deref().filter(|s| !s.is_empty()) {
            layout.add_line(subtitle, LineStyle::SUBTITLE);
        }
        for line in &self.body_lines {
            layout.add_line(line, LineStyle::BODY);
        }
        if let Some(footer) = self.footer.as_deref().filter(|s| !s.is_empty()) {
            layout.add_footer(footer);
        }
        layout
    }
}

/// A complete, self-contained PDF document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentBuffer(Vec<u8>);

impl DocumentBuffer {
    /// Document bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Take ownership of the bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    /// Size in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the buffer is empty (never true for a built document).
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Save the PDF to a file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, &self.0)?;
        Ok(())
    }
}

impl AsRef<[u8]> for DocumentBuffer {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Build a single-page PDF from `request`.
///
/// Pure function: every call owns its own object table and buffer.
pub fn build(request: &DocumentRequest) -> DocumentBuffer {
    let content = request.layout().build();

    let mut table = ObjectTable::new();
    table.push_raw(PDF_HEADER);
    table.push_object(serialize_indirect(
        CATALOG_ID,
        &format!("<< /Type /Catalog /Pages {} 0 R >>", PAGES_ID),
    ));
    table.push_object(serialize_indirect(
        PAGES_ID,
        &format!("<< /Type /Pages /Kids [{} 0 R] /Count 1 >>", PAGE_ID),
    ));
    table.push_object(serialize_indirect(
        PAGE_ID,
        &format!(
            "<< /Type /Page /Parent {} 0 R /MediaBox [0 0 {} {}] \
             /Resources << /Font << /{} {} 0 R >> >> /Contents {} 0 R >>",
            PAGES_ID, PAGE_WIDTH, PAGE_HEIGHT, FONT_RESOURCE, FONT_ID, CONTENT_ID
        ),
    ));
    table.push_object(serialize_indirect(
        FONT_ID,
        &format!("<< /Type /Font /Subtype /Type1 /BaseFont /{} >>", BASE_FONT),
    ));
    table.push_object(serialize_stream(CONTENT_ID, &content));

    let xref_start = table.finish_with_trailer(CATALOG_ID);
    log::debug!(
        "Built PDF: {} objects, {} content bytes, xref at {}",
        table.offsets().len(),
        content.len(),
        xref_start
    );

    DocumentBuffer(table.into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(buffer: &DocumentBuffer) -> String {
        String::from_utf8(buffer.as_bytes().to_vec()).unwrap()
    }

    #[test]
    fn test_create_minimal_pdf() {
        let pdf = build(&DocumentRequest::new("Receipt"));
        let content = text(&pdf);

        assert!(content.starts_with("%PDF-1.4\n"));
        assert!(content.contains("/Type /Catalog"));
        assert!(content.contains("/Type /Pages /Kids [3 0 R] /Count 1"));
        assert!(content.contains("/MediaBox [0 0 612 792]"));
        assert!(content.contains("/BaseFont /Helvetica"));
        assert!(content.contains("(Receipt) Tj"));
        assert!(content.ends_with("%%EOF\n"));
    }

    #[test]
    fn test_xref_lists_five_objects() {
        let pdf = build(&DocumentRequest::new("Receipt"));
        let content = text(&pdf);
        assert!(content.contains("xref\n0 6\n0000000000 65535 f \n"));
        assert!(content.contains("<< /Size 6 /Root 1 0 R >>"));
    }

    #[test]
    fn test_first_object_follows_header() {
        let pdf = build(&DocumentRequest::new("Receipt"));
        let content = text(&pdf);
        assert!(content.contains("0000000009 00000 n \n"));
        assert_eq!(&content[9..16], "1 0 obj");
    }

    #[test]
    fn test_empty_optional_fields_are_skipped() {
        let request = DocumentRequest::new("Title")
            .with_subtitle("")
            .with_footer("");
        let ops = request.layout();
        assert_eq!(ops.ops().len(), 1);
    }

    #[test]
    fn test_request_from_json() {
        let json = r#"{"title":"Report","lines":["a","b"],"footer":"f"}"#;
        let request: DocumentRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.body_lines, vec!["a", "b"]);
        assert_eq!(request.subtitle, None);
        assert_eq!(request.footer.as_deref(), Some("f"));
    }
}
