//! Point-in-time buffer snapshots.
//!
//! A snapshot captures the ordered piece sequence plus the document's
//! counts — not the buffer contents. Because the original buffer is
//! immutable and the add buffer is append-only, the captured pieces remain
//! readable forever, no matter how the buffer is edited afterwards. That
//! makes snapshots O(piece count) to create and suitable for undo/redo
//! checkpoints and multi-view consumers.
//!
//! The handle is opaque: content reads resolve through the owning
//! [`crate::TextBuffer`] (`snapshot_text`, `restore_snapshot`).

use crate::storage::Piece;

/// Immutable capture of the buffer's piece sequence at a point in time.
#[derive(Debug, Clone)]
pub struct BufferSnapshot {
    pub(crate) id: u64,
    pub(crate) pieces: Vec<Piece>,
    pub(crate) add_len: usize,
    pub(crate) char_count: usize,
    pub(crate) line_count: usize,
}

impl BufferSnapshot {
    /// Strictly increasing identifier; "dirty" comparisons between snapshots
    /// of the same buffer are by identifier, not content.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// The captured piece sequence.
    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    /// Add buffer length (in bytes) at capture time.
    pub fn add_buffer_len(&self) -> usize {
        self.add_len
    }

    /// Document character count at capture time.
    pub fn char_count(&self) -> usize {
        self.char_count
    }

    /// Document line count at capture time.
    pub fn line_count(&self) -> usize {
        self.line_count
    }
}
