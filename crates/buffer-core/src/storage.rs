//! Piece storage layer.
//!
//! Two character buffers back the document: a read-only original buffer fixed
//! at construction, and an append-only add buffer that grows with every
//! insertion. Neither buffer is ever mutated in place, so any piece descriptor
//! handed out stays valid for the lifetime of the store. That guarantee is
//! what makes snapshots cheap: they capture piece descriptors, not text.

use memchr::memchr_iter;

/// Buffer type identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferKind {
    /// Read-only original buffer
    Original,
    /// Append-only add buffer
    Add,
}

/// Piece descriptor: references a fragment in one of the two buffers.
///
/// Offsets in the public API are character offsets; a piece carries the byte
/// span into its UTF-8 buffer plus the character count of that span, so the
/// two coordinate systems can be converted piece-locally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Piece {
    /// Buffer the fragment lives in
    pub kind: BufferKind,
    /// Start position in the corresponding buffer (byte offset)
    pub start: usize,
    /// Byte length of the fragment
    pub byte_len: usize,
    /// Character count of the fragment (handles UTF-8 multi-byte characters)
    pub char_count: usize,
    /// Exact number of `'\n'` characters in the fragment
    pub line_breaks: usize,
}

impl Piece {
    /// Create a new piece descriptor.
    pub fn new(
        kind: BufferKind,
        start: usize,
        byte_len: usize,
        char_count: usize,
        line_breaks: usize,
    ) -> Self {
        Self {
            kind,
            start,
            byte_len,
            char_count,
            line_breaks,
        }
    }

    /// Exclusive byte end of the fragment in its buffer.
    pub fn byte_end(&self) -> usize {
        self.start + self.byte_len
    }
}

/// Count `'\n'` characters in a UTF-8 byte range.
///
/// `'\n'` is a single byte that cannot occur inside a multi-byte sequence,
/// so counting bytes is exact.
pub(crate) fn count_line_breaks(bytes: &[u8]) -> usize {
    memchr_iter(b'\n', bytes).count()
}

/// Convert a character index within `text` to a byte index.
pub(crate) fn byte_of_char(text: &str, char_idx: usize) -> usize {
    text.char_indices()
        .nth(char_idx)
        .map(|(byte, _)| byte)
        .unwrap_or(text.len())
}

/// Dual-buffer piece storage.
///
/// Owns the original and add buffers and the primitives that create and read
/// piece descriptors. The ordered piece sequence itself is owned by the rope
/// index ([`crate::rope::Rope`]); this type is pure storage.
#[derive(Debug)]
pub struct PieceStore {
    /// Read-only original buffer
    original: String,
    /// Append-only add buffer
    add: String,
}

impl PieceStore {
    /// Create a store from the document's initial content.
    ///
    /// The caller is expected to hand over already-normalized text (LF
    /// newlines only); the façade takes care of that.
    pub fn new(original: String) -> Self {
        Self {
            original,
            add: String::new(),
        }
    }

    /// Piece covering the entire original buffer, or `None` for an empty
    /// document.
    pub fn original_piece(&self) -> Option<Piece> {
        if self.original.is_empty() {
            return None;
        }
        Some(Piece::new(
            BufferKind::Original,
            0,
            self.original.len(),
            self.original.chars().count(),
            count_line_breaks(self.original.as_bytes()),
        ))
    }

    /// Append `text` to the add buffer and return a piece describing it.
    ///
    /// The returned descriptor stays valid forever: the add buffer only ever
    /// grows, and existing content is never relocated.
    pub fn append_to_add(&mut self, text: &str) -> Piece {
        let start = self.add.len();
        self.add.push_str(text);
        Piece::new(
            BufferKind::Add,
            start,
            text.len(),
            text.chars().count(),
            count_line_breaks(text.as_bytes()),
        )
    }

    /// Current length of the add buffer in bytes.
    pub fn add_len(&self) -> usize {
        self.add.len()
    }

    /// Text of the buffer a piece refers to.
    pub fn buffer(&self, kind: BufferKind) -> &str {
        match kind {
            BufferKind::Original => &self.original,
            BufferKind::Add => &self.add,
        }
    }

    /// Read the text a piece refers to.
    ///
    /// A malformed descriptor (out-of-range span, non-boundary offset) is a
    /// programmer error and panics via the slice index.
    pub fn piece_text(&self, piece: &Piece) -> &str {
        &self.buffer(piece.kind)[piece.start..piece.byte_end()]
    }

    /// Split a piece at the given character offset within the piece.
    ///
    /// Returns `(left, right)` with freshly computed character and line-break
    /// counts. `char_offset` must be strictly inside the piece.
    pub fn split_piece(&self, piece: &Piece, char_offset: usize) -> (Piece, Piece) {
        debug_assert!(char_offset > 0 && char_offset < piece.char_count);
        let text = self.piece_text(piece);
        let byte_offset = byte_of_char(text, char_offset);
        let left_breaks = count_line_breaks(&text.as_bytes()[..byte_offset]);

        let left = Piece::new(piece.kind, piece.start, byte_offset, char_offset, left_breaks);
        let right = Piece::new(
            piece.kind,
            piece.start + byte_offset,
            piece.byte_len - byte_offset,
            piece.char_count - char_offset,
            piece.line_breaks - left_breaks,
        );
        (left, right)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_original_piece() {
        let store = PieceStore::new("Hello, World!".to_string());
        let piece = store.original_piece().unwrap();
        assert_eq!(piece.kind, BufferKind::Original);
        assert_eq!(piece.char_count, 13);
        assert_eq!(piece.line_breaks, 0);
        assert_eq!(store.piece_text(&piece), "Hello, World!");
    }

    #[test]
    fn test_empty_store_has_no_piece() {
        let store = PieceStore::new(String::new());
        assert!(store.original_piece().is_none());
        assert_eq!(store.add_len(), 0);
    }

    #[test]
    fn test_append_to_add() {
        let mut store = PieceStore::new("abc".to_string());
        let first = store.append_to_add("def\n");
        let second = store.append_to_add("ghi");

        assert_eq!(first.kind, BufferKind::Add);
        assert_eq!(first.start, 0);
        assert_eq!(first.line_breaks, 1);
        assert_eq!(second.start, 4);

        // Earlier descriptors stay readable after later appends.
        assert_eq!(store.piece_text(&first), "def\n");
        assert_eq!(store.piece_text(&second), "ghi");
    }

    #[test]
    fn test_split_piece() {
        let store = PieceStore::new("one\ntwo\nthree".to_string());
        let piece = store.original_piece().unwrap();
        let (left, right) = store.split_piece(&piece, 4);

        assert_eq!(store.piece_text(&left), "one\n");
        assert_eq!(left.char_count, 4);
        assert_eq!(left.line_breaks, 1);

        assert_eq!(store.piece_text(&right), "two\nthree");
        assert_eq!(right.char_count, 9);
        assert_eq!(right.line_breaks, 1);
    }

    #[test]
    fn test_split_piece_utf8() {
        let store = PieceStore::new("你好世界".to_string());
        let piece = store.original_piece().unwrap();
        assert_eq!(piece.char_count, 4);
        assert_eq!(piece.byte_len, 12);

        let (left, right) = store.split_piece(&piece, 2);
        assert_eq!(store.piece_text(&left), "你好");
        assert_eq!(store.piece_text(&right), "世界");
        assert_eq!(left.byte_len, 6);
        assert_eq!(right.start, 6);
    }

    #[test]
    fn test_count_line_breaks() {
        assert_eq!(count_line_breaks(b""), 0);
        assert_eq!(count_line_breaks(b"abc"), 0);
        assert_eq!(count_line_breaks(b"a\nb\nc\n"), 3);
    }
}
