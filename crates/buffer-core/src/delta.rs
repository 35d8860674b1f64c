//! Structured edit exchange type.
//!
//! Collaborators that record or replay edits (undo/redo stacks, incremental
//! consumers) exchange them as [`TextEdit`] values expressed in **character
//! offsets** (Unicode scalar values) against the document state the batch is
//! applied to. [`crate::TextBuffer::apply_edits`] consumes batches of these.

/// A single text edit expressed in character offsets.
///
/// Semantics:
/// - `offset` is a character offset in the document **before the batch this
///   edit belongs to is applied**.
/// - `delete_count` characters starting at `offset` are removed, then
///   `insert_text` is inserted there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEdit {
    /// Start character offset of the edit.
    pub offset: usize,
    /// Number of characters to delete (may be zero).
    pub delete_count: usize,
    /// Text to insert at `offset` (may be empty).
    pub insert_text: String,
}

impl TextEdit {
    /// Create an edit that replaces `delete_count` characters at `offset`
    /// with `insert_text`.
    pub fn new(offset: usize, delete_count: usize, insert_text: impl Into<String>) -> Self {
        Self {
            offset,
            delete_count,
            insert_text: insert_text.into(),
        }
    }

    /// Pure insertion at `offset`.
    pub fn insert(offset: usize, insert_text: impl Into<String>) -> Self {
        Self::new(offset, 0, insert_text)
    }

    /// Pure deletion of `delete_count` characters at `offset`.
    pub fn delete(offset: usize, delete_count: usize) -> Self {
        Self::new(offset, delete_count, "")
    }

    /// Exclusive end character offset of the deleted range.
    pub fn end(&self) -> usize {
        self.offset + self.delete_count
    }

    /// Length of `insert_text` in characters.
    pub fn inserted_len(&self) -> usize {
        self.insert_text.chars().count()
    }

    /// Returns `true` if the edit neither deletes nor inserts anything.
    pub fn is_noop(&self) -> bool {
        self.delete_count == 0 && self.insert_text.is_empty()
    }
}
