//! Text buffer façade.
//!
//! Composes the piece store, the rope index, and the line index into one
//! mutable-document API. Every mutation updates the rope and the line index
//! together — never one without the other — and bumps the buffer version.
//! Inbound text is normalized to LF newlines on the way in, so all
//! line-break accounting below this layer recognizes a single newline form.
//!
//! Error policy: read queries clamp out-of-range arguments to the nearest
//! valid value; mutations at invalid offsets reject before any state is
//! observable; degenerate inputs (empty insert, zero-length delete) are
//! no-ops.

use crate::delta::TextEdit;
use crate::line_ending::LineEnding;
use crate::line_index::LineIndex;
use crate::rope::Rope;
use crate::snapshot::BufferSnapshot;
use crate::storage::PieceStore;

/// Errors reported by [`TextBuffer`] operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BufferError {
    /// A character offset beyond the document length.
    OffsetOutOfRange {
        /// The offending offset.
        offset: usize,
        /// Document length in characters at the time of the call.
        len: usize,
    },
    /// An edit range extending beyond the document length.
    RangeOutOfRange {
        /// Inclusive start character offset.
        start: usize,
        /// Exclusive end character offset.
        end: usize,
        /// Document length in characters at the time of the call.
        len: usize,
    },
    /// Two edits in one [`TextBuffer::apply_edits`] batch overlap.
    OverlappingEdits {
        /// Exclusive end of the earlier edit.
        first_end: usize,
        /// Start of the later edit.
        second_start: usize,
    },
}

impl std::fmt::Display for BufferError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BufferError::OffsetOutOfRange { offset, len } => {
                write!(f, "offset {} out of range (document length {})", offset, len)
            }
            BufferError::RangeOutOfRange { start, end, len } => {
                write!(
                    f,
                    "range {}..{} out of range (document length {})",
                    start, end, len
                )
            }
            BufferError::OverlappingEdits {
                first_end,
                second_start,
            } => {
                write!(
                    f,
                    "overlapping edits in batch: one ends at {}, the next starts at {}",
                    first_end, second_start
                )
            }
        }
    }
}

impl std::error::Error for BufferError {}

/// Mutable document model backed by a piece table with a rope index.
///
/// Single-writer, synchronous: every operation runs to completion before
/// another may begin, and the buffer exclusively owns its store and indexes.
/// Consumers that want stable reads across mutations take a
/// [`BufferSnapshot`] instead of reading the live buffer.
#[derive(Debug)]
pub struct TextBuffer {
    store: PieceStore,
    rope: Rope,
    line_index: LineIndex,
    line_ending: LineEnding,
    byte_count: usize,
    version: u64,
    next_snapshot_id: u64,
}

impl TextBuffer {
    /// Create a buffer from initial content.
    ///
    /// Line endings are detected for later saving and the content is
    /// normalized to LF.
    pub fn new(text: &str) -> Self {
        let line_ending = LineEnding::detect_in_text(text);
        let normalized = LineEnding::normalize(text).into_owned();
        let line_index = LineIndex::from_text(&normalized);
        let byte_count = normalized.len();
        let store = PieceStore::new(normalized);
        let rope = match store.original_piece() {
            Some(piece) => Rope::from_pieces(vec![piece]),
            None => Rope::new(),
        };
        Self {
            store,
            rope,
            line_index,
            line_ending,
            byte_count,
            version: 0,
            next_snapshot_id: 1,
        }
    }

    /// Create an empty buffer.
    pub fn empty() -> Self {
        Self::new("")
    }

    /// Document length in characters.
    pub fn len(&self) -> usize {
        self.rope.char_count()
    }

    /// Returns `true` if the document is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Document length in bytes (UTF-8).
    pub fn byte_len(&self) -> usize {
        self.byte_count
    }

    /// Total number of lines; an empty document has one empty line.
    pub fn line_count(&self) -> usize {
        self.line_index.line_count()
    }

    /// Version counter, bumped on every accepted mutation.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// The line ending detected in the initial content, for saving
    /// collaborators.
    pub fn line_ending(&self) -> LineEnding {
        self.line_ending
    }

    /// The entire document text.
    pub fn text(&self) -> String {
        self.rope.text(0, self.len(), &self.store)
    }

    /// Text of the character range `[start, end)`, clamped to the document.
    pub fn text_range(&self, start: usize, end: usize) -> String {
        self.rope.text(start, end, &self.store)
    }

    /// Content of line `line` without its trailing newline; out-of-range
    /// line numbers clamp to the last line.
    pub fn line(&self, line: usize) -> String {
        let line = line.min(self.line_count() - 1);
        let start = self.line_index.line_start(line);
        let end = if line + 1 < self.line_count() {
            self.line_index.line_start(line + 1) - 1
        } else {
            self.len()
        };
        self.rope.text(start, end, &self.store)
    }

    /// Character offset of the first character of line `line` (clamping).
    pub fn line_offset(&self, line: usize) -> usize {
        self.line_index.line_start(line)
    }

    /// Line containing the given character offset (clamping).
    pub fn offset_line(&self, offset: usize) -> usize {
        self.line_index.line_of_offset(offset.min(self.len()))
    }

    /// Insert `text` at the given character offset.
    ///
    /// The text is normalized to LF newlines first. Empty text is a no-op;
    /// an offset beyond the document length is rejected.
    pub fn insert(&mut self, offset: usize, text: &str) -> Result<(), BufferError> {
        if offset > self.len() {
            return Err(BufferError::OffsetOutOfRange {
                offset,
                len: self.len(),
            });
        }
        if text.is_empty() {
            return Ok(());
        }
        let normalized = LineEnding::normalize(text);
        let piece = self.store.append_to_add(&normalized);
        self.byte_count += piece.byte_len;
        self.rope.insert(offset, piece, &self.store)?;
        self.line_index.update(offset, "", &normalized);
        self.version += 1;
        Ok(())
    }

    /// Delete `len` characters starting at `offset`, returning the deleted
    /// text.
    ///
    /// A zero length is a no-op; an offset beyond the document length is
    /// rejected; a length overrunning the end is clamped to it.
    pub fn delete(&mut self, offset: usize, len: usize) -> Result<String, BufferError> {
        if offset > self.len() {
            return Err(BufferError::OffsetOutOfRange {
                offset,
                len: self.len(),
            });
        }
        let len = len.min(self.len() - offset);
        if len == 0 {
            return Ok(String::new());
        }
        let deleted = self.rope.text(offset, offset + len, &self.store);
        self.rope.delete(offset, len, &self.store)?;
        self.line_index.update(offset, &deleted, "");
        self.byte_count -= deleted.len();
        self.version += 1;
        Ok(deleted)
    }

    /// Apply a batch of edits expressed against the current (pre-batch)
    /// document state.
    ///
    /// The batch is validated up front — all ranges in bounds and pairwise
    /// non-overlapping — and rejected atomically otherwise; no mutation is
    /// observable on error. Accepted edits are applied highest-offset-first
    /// so earlier offsets are never invalidated by a later-applied edit,
    /// which makes the result independent of the order the caller listed
    /// the edits in.
    pub fn apply_edits(&mut self, edits: &[TextEdit]) -> Result<(), BufferError> {
        if edits.is_empty() {
            return Ok(());
        }
        let len = self.len();
        let mut ordered: Vec<&TextEdit> = edits.iter().collect();
        ordered.sort_by_key(|edit| edit.offset);

        for edit in &ordered {
            if edit.end() > len {
                return Err(BufferError::RangeOutOfRange {
                    start: edit.offset,
                    end: edit.end(),
                    len,
                });
            }
        }
        for pair in ordered.windows(2) {
            if pair[0].end() > pair[1].offset {
                return Err(BufferError::OverlappingEdits {
                    first_end: pair[0].end(),
                    second_start: pair[1].offset,
                });
            }
        }

        for edit in ordered.iter().rev() {
            self.delete(edit.offset, edit.delete_count)?;
            self.insert(edit.offset, &edit.insert_text)?;
        }
        Ok(())
    }

    /// Capture a point-in-time snapshot of the piece sequence.
    ///
    /// O(piece count), not O(document size); valid forever thanks to the
    /// immutable/append-only buffers. Each snapshot receives a strictly
    /// increasing identifier.
    pub fn snapshot(&mut self) -> BufferSnapshot {
        let id = self.next_snapshot_id;
        self.next_snapshot_id += 1;
        BufferSnapshot {
            id,
            pieces: self.rope.snapshot_pieces(),
            add_len: self.store.add_len(),
            char_count: self.len(),
            line_count: self.line_count(),
        }
    }

    /// Replace the live document with a snapshot's content.
    ///
    /// The rope is rebuilt from the snapshot's pieces and the line index
    /// from the reconstituted text; the backing buffers are never rolled
    /// back or truncated.
    pub fn restore_snapshot(&mut self, snapshot: &BufferSnapshot) {
        self.rope = Rope::from_pieces(snapshot.pieces.clone());
        let text = self.rope.text(0, snapshot.char_count, &self.store);
        self.line_index.rebuild(&text);
        self.byte_count = text.len();
        self.version += 1;
    }

    /// The full text a snapshot captured, unaffected by edits made after the
    /// capture.
    pub fn snapshot_text(&self, snapshot: &BufferSnapshot) -> String {
        let mut out = String::new();
        for piece in &snapshot.pieces {
            out.push_str(self.store.piece_text(piece));
        }
        out
    }
}
