//! PDF object serialization and cross-reference bookkeeping.
//!
//! Objects are appended as byte chunks to an [`ObjectTable`]. The offset of
//! every object is the running length of everything appended before it, so
//! the xref table always agrees with the bytes that were actually emitted.

/// PDF header with version (Section 7.5.2).
pub(crate) const PDF_HEADER: &str = "%PDF-1.4\n";
/// End-of-file marker (Section 7.5.5).
pub(crate) const EOF_MARKER: &str = "%%EOF\n";

/// Frame a dictionary body as an indirect object.
///
/// Format: `{id} 0 obj\n{body}\nendobj\n`
pub fn serialize_indirect(id: u32, body: &str) -> String {
    format!("{} 0 obj\n{}\nendobj\n", id, body)
}

/// Frame a content stream as an indirect object.
///
/// `/Length` is the encoded byte length of `content`, not its character count.
pub fn serialize_stream(id: u32, content: &str) -> String {
    serialize_indirect(
        id,
        &format!("<< /Length {} >>\nstream\n{}\nendstream", content.len(), content),
    )
}

/// Format one in-use xref entry (20 bytes including the newline).
pub fn xref_entry(offset: usize) -> String {
    format!("{:010} 00000 n ", offset)
}

/// Ordered byte chunks with their starting offsets.
#[derive(Debug, Default)]
pub struct ObjectTable {
    chunks: Vec<Vec<u8>>,
    /// Start offset of each object chunk, in object-number order
    offsets: Vec<usize>,
    len: usize,
}

impl ObjectTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append bytes that are not an object (header, xref, trailer).
    pub fn push_raw(&mut self, bytes: impl Into<Vec<u8>>) -> usize {
        let start = self.len;
        let bytes = bytes.into();
        self.len += bytes.len();
        self.chunks.push(bytes);
        start
    }

    /// Append an object and record where it begins.
    pub fn push_object(&mut self, bytes: impl Into<Vec<u8>>) -> usize {
        let start = self.push_raw(bytes);
        self.offsets.push(start);
        start
    }

    /// Total bytes appended so far.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether nothing has been appended.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Recorded object offsets.
    pub fn offsets(&self) -> &[usize] {
        &self.offsets
    }

    /// Append the xref section and trailer.
    ///
    /// `root_id` is the catalog's object number. Returns the offset at which
    /// the `xref` keyword begins.
    pub fn finish_with_trailer(&mut self, root_id: u32) -> usize {
        let xref_start = self.len;
        let size = self.offsets.len() + 1;

        let mut xref = format!("xref\n0 {}\n0000000000 65535 f \n", size);
        for offset in &self.offsets {
            xref.push_str(&xref_entry(*offset));
            xref.push('\n');
        }
        self.push_raw(xref);

        self.push_raw(format!(
            "trailer\n<< /Size {} /Root {} 0 R >>\nstartxref\n{}\n{}",
            size, root_id, xref_start, EOF_MARKER
        ));
        xref_start
    }

    /// Concatenate all chunks into one buffer.
    pub fn into_bytes(self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.len);
        for chunk in self.chunks {
            out.extend_from_slice(&chunk);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialize_indirect() {
        let bytes = serialize_indirect(1, "<< /Type /Catalog /Pages 2 0 R >>");
        assert_eq!(bytes, "1 0 obj\n<< /Type /Catalog /Pages 2 0 R >>\nendobj\n");
    }

    #[test]
    fn test_stream_length_counts_bytes() {
        // "é" is two bytes in UTF-8
        let obj = serialize_stream(5, "é");
        assert!(obj.contains("/Length 2 >>"));
        assert!(obj.contains("stream\né\nendstream"));
    }

    #[test]
    fn test_xref_entry_width() {
        let entry = xref_entry(9);
        assert_eq!(entry, "0000000009 00000 n ");
        assert_eq!(entry.len() + 1, 20);
    }

    #[test]
    fn test_offsets_follow_actual_lengths() {
        let mut table = ObjectTable::new();
        assert!(table.is_empty());
        table.push_raw(PDF_HEADER);
        let first = table.push_object("1 0 obj\n(a\\)b)\nendobj\n");
        let second = table.push_object("2 0 obj\nnull\nendobj\n");
        assert_eq!(first, PDF_HEADER.len());
        assert_eq!(second, first + "1 0 obj\n(a\\)b)\nendobj\n".len());
        assert_eq!(table.offsets(), &[first, second]);
    }

    #[test]
    fn test_trailer_points_at_xref() {
        let mut table = ObjectTable::new();
        table.push_raw(PDF_HEADER);
        table.push_object(serialize_indirect(1, "null"));
        let xref_start = table.finish_with_trailer(1);
        let bytes = table.into_bytes();

        assert!(bytes[xref_start..].starts_with(b"xref\n0 2\n"));
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.contains("<< /Size 2 /Root 1 0 R >>"));
        assert!(text.ends_with(&format!("startxref\n{}\n%%EOF\n", xref_start)));
    }
}
