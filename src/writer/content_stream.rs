//! PDF content stream builder.
//!
//! Lays out the lines of a single page top-to-bottom and turns each one into
//! a `BT ... Tj ET` text object, following ISO 32000-1:2008 Section 9.4.

/// Page width in default user space units (US Letter).
pub const PAGE_WIDTH: i32 = 612;
/// Page height in default user space units (US Letter).
pub const PAGE_HEIGHT: i32 = 792;
/// Left margin shared by every line.
pub const MARGIN_LEFT: i32 = 48;
/// Distance from the top edge to the first baseline.
pub const TOP_OFFSET: i32 = 72;
/// Fixed baseline of the footer band.
pub const FOOTER_BASELINE: i32 = 60;

/// Resource name of the single font used by the page.
pub(crate) const FONT_RESOURCE: &str = "F1";

/// Font size and vertical advance for one kind of line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineStyle {
    /// Font size in points
    pub size: i32,
    /// Amount the cursor moves down after the line
    pub gap: i32,
}

impl LineStyle {
    /// Title line: 18pt, 26 units.
    pub const TITLE: LineStyle = LineStyle { size: 18, gap: 26 };
    /// Subtitle line: 12pt, 22 units.
    pub const SUBTITLE: LineStyle = LineStyle { size: 12, gap: 22 };
    /// Body line: 12pt, 18 units.
    pub const BODY: LineStyle = LineStyle { size: 12, gap: 18 };
    /// Footer line: 9pt, 12 units.
    pub const FOOTER: LineStyle = LineStyle { size: 9, gap: 12 };
}

/// Escape text for a PDF literal string.
///
/// Backslash and both parentheses are the only characters transcribed;
/// everything else is copied through unchanged. Each input character is
/// visited once, so an inserted escape is never escaped again.
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 8);
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '(' => out.push_str("\\("),
            ')' => out.push_str("\\)"),
            _ => out.push(ch),
        }
    }
    out
}

/// One positioned text-drawing instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedTextOp {
    /// Escaped text content
    pub text: String,
    /// Font size in points
    pub size: i32,
    /// Baseline Y coordinate
    pub y: i32,
}

impl RenderedTextOp {
    /// Render the op as a content stream operator string.
    pub fn to_operator(&self) -> String {
        format!(
            "BT /{} {} Tf {} {} Td ({}) Tj ET",
            FONT_RESOURCE, self.size, MARGIN_LEFT, self.y, self.text
        )
    }
}

/// Vertical layout of one page.
///
/// The cursor starts [`TOP_OFFSET`] below the top edge and moves down by the
/// style's gap after every line. There is no overflow handling.
#[derive(Debug, Clone)]
pub struct PageLayout {
    cursor_y: i32,
    ops: Vec<RenderedTextOp>,
}

impl PageLayout {
    /// Start a layout with the cursor at the first baseline.
    pub fn new() -> Self {
        Self {
            cursor_y: PAGE_HEIGHT - TOP_OFFSET,
            ops: Vec::new(),
        }
    }

    /// Current baseline for the next line.
    pub fn cursor_y(&self) -> i32 {
        self.cursor_y
    }

    /// Add a line at the cursor and advance.
    pub fn add_line(&mut self, text: &str, style: LineStyle) -> &mut Self {
        self.ops.push(RenderedTextOp {
            text: escape_text(text),
            size: style.size,
            y: self.cursor_y,
        });
        self.cursor_y -= style.gap;
        self
    }

    /// Add the footer line, pinned to [`FOOTER_BASELINE`].
    ///
    /// Anything already drawn in that band is overlapped.
    pub fn add_footer(&mut self, text: &str) -> &mut Self {
        self.cursor_y = FOOTER_BASELINE;
        self.add_line(text, LineStyle::FOOTER)
    }

    /// Positioned ops in drawing order.
    pub fn ops(&self) -> &[RenderedTextOp] {
        &self.ops
    }

    /// Build the content stream payload: operators joined by newlines.
    pub fn build(&self) -> String {
        self.ops
            .iter()
            .map(RenderedTextOp::to_operator)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Default for PageLayout {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_reserved_characters() {
        assert_eq!(escape_text("a(b)c"), "a\\(b\\)c");
        assert_eq!(escape_text("C:\\path"), "C:\\\\path");
        assert_eq!(escape_text("\\("), "\\\\\\(");
    }

    #[test]
    fn test_escape_leaves_other_text_alone() {
        assert_eq!(escape_text("Donation: $25.00"), "Donation: $25.00");
        assert_eq!(escape_text("Café — merci"), "Café — merci");
        assert_eq!(escape_text(""), "");
    }

    #[test]
    fn test_operator_format() {
        let op = RenderedTextOp {
            text: "Hello".to_string(),
            size: 12,
            y: 700,
        };
        assert_eq!(op.to_operator(), "BT /F1 12 Tf 48 700 Td (Hello) Tj ET");
    }

    #[test]
    fn test_cursor_advances_by_style_gap() {
        let mut layout = PageLayout::new();
        assert_eq!(layout.cursor_y(), 720);
        layout.add_line("Title", LineStyle::TITLE);
        assert_eq!(layout.cursor_y(), 694);
        layout.add_line("Subtitle", LineStyle::SUBTITLE);
        assert_eq!(layout.cursor_y(), 672);
        layout.add_line("Body", LineStyle::BODY);
        assert_eq!(layout.cursor_y(), 654);

        let ys: Vec<i32> = layout.ops().iter().map(|op| op.y).collect();
        assert_eq!(ys, vec![720, 694, 672]);
    }

    #[test]
    fn test_footer_is_pinned() {
        let mut layout = PageLayout::new();
        layout.add_line("Title", LineStyle::TITLE);
        layout.add_footer("Footer");
        let footer = layout.ops().last().unwrap();
        assert_eq!(footer.y, FOOTER_BASELINE);
        assert_eq!(footer.size, 9);
    }

    #[test]
    fn test_build_joins_with_newlines() {
        let mut layout = PageLayout::new();
        layout.add_line("A", LineStyle::TITLE).add_line("B", LineStyle::BODY);
        assert_eq!(
            layout.build(),
            "BT /F1 18 Tf 48 720 Td (A) Tj ET\nBT /F1 12 Tf 48 694 Td (B) Tj ET"
        );
    }
}
