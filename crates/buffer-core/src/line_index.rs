//! Flat line-start offset index.
//!
//! A sorted sequence of character offsets, one per line start, serving the
//! façade's public line queries. Offset-to-line is a binary search; line to
//! offset is a direct index. The index is maintained incrementally from the
//! same edit description the rope receives, so the two stay in lockstep.
//!
//! `line_starts[0]` is always 0, and the index always describes at least one
//! line: an empty document has one empty line.

use crate::storage::count_line_breaks;

/// Flat, sorted line-start index in character offsets.
#[derive(Debug, Clone)]
pub struct LineIndex {
    line_starts: Vec<usize>,
}

impl LineIndex {
    /// Index for an empty document (one empty line).
    pub fn new() -> Self {
        Self {
            line_starts: vec![0],
        }
    }

    /// Build the index from document text with a full linear scan.
    pub fn from_text(text: &str) -> Self {
        let mut index = Self::new();
        index.rebuild(text);
        index
    }

    /// Rebuild from scratch, O(document length). Used at construction and
    /// after snapshot restore.
    pub fn rebuild(&mut self, text: &str) {
        self.line_starts.clear();
        self.line_starts.push(0);
        let mut offset = 0usize;
        for ch in text.chars() {
            offset += 1;
            if ch == '\n' {
                self.line_starts.push(offset);
            }
        }
    }

    /// Total number of lines.
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Character offset of the first character of line `line`; out-of-range
    /// line numbers clamp to the last line.
    pub fn line_start(&self, line: usize) -> usize {
        self.line_starts[line.min(self.line_starts.len() - 1)]
    }

    /// Line containing `offset`: the greatest line whose start is `<= offset`.
    pub fn line_of_offset(&self, offset: usize) -> usize {
        self.line_starts.partition_point(|&start| start <= offset) - 1
    }

    /// Apply an edit at `edit_offset` that replaced `deleted` with `inserted`
    /// (either may be empty).
    ///
    /// When neither side contains a newline this is a pure shift of the
    /// entries after the edit point; otherwise the deleted breaks' entries
    /// are replaced with the inserted breaks' absolute offsets and the tail
    /// is shifted by the net length delta. Cost is proportional to the
    /// number of lines whose start offset changed.
    pub fn update(&mut self, edit_offset: usize, deleted: &str, inserted: &str) {
        let deleted_breaks = count_line_breaks(deleted.as_bytes());
        let inserted_breaks = count_line_breaks(inserted.as_bytes());
        let delta = inserted.chars().count() as isize - deleted.chars().count() as isize;
        let edit_line = self.line_of_offset(edit_offset);

        if deleted_breaks == 0 && inserted_breaks == 0 {
            if delta != 0 {
                for start in &mut self.line_starts[edit_line + 1..] {
                    *start = (*start as isize + delta) as usize;
                }
            }
            return;
        }

        // Entries past the deleted break run shift by the net delta; the
        // deleted run itself is replaced by the inserted breaks' offsets.
        let tail_start = edit_line + 1 + deleted_breaks;
        for start in &mut self.line_starts[tail_start..] {
            *start = (*start as isize + delta) as usize;
        }

        let mut new_starts = Vec::with_capacity(inserted_breaks);
        let mut offset = 0usize;
        for ch in inserted.chars() {
            offset += 1;
            if ch == '\n' {
                new_starts.push(edit_offset + offset);
            }
        }
        self.line_starts
            .splice(edit_line + 1..tail_start, new_starts);
    }
}

impl Default for LineIndex {
    fn default() -> Self {
        Self::new()
    }
}
