//! Rope index over the piece sequence.
//!
//! A balanced multi-way tree whose leaves hold ordered runs of piece
//! descriptors and whose nodes cache the exact character and line-break
//! counts of their subtree. The aggregates make offset and line lookups
//! `O(depth × fan-out)` descents instead of linear scans over the whole
//! piece sequence.
//!
//! Structural simplifications, kept deliberately (correctness first):
//! - a leaf that overflows the maximum fan-out triggers a full rebuild from
//!   the flattened piece sequence rather than a local B-tree split;
//! - `delete` always flattens, partitions, and rebuilds, O(piece count)
//!   regardless of delete size.
//!
//! Both paths are isolated so a later local split/merge optimization can
//! replace them without changing the public contract.

use crate::buffer::BufferError;
use crate::storage::{Piece, PieceStore, byte_of_char};
use memchr::memchr_iter;

/// Minimum fan-out of internal nodes and leaves (relaxed for the root).
pub(crate) const MIN_FANOUT: usize = 16;
/// Maximum fan-out; exceeding it triggers a rebuild.
pub(crate) const MAX_FANOUT: usize = 32;
/// Bulk construction fills nodes below `MAX_FANOUT` so a freshly built tree
/// absorbs a few splices before its first overflow rebuild.
const BUILD_FANOUT: usize = 24;

#[derive(Debug, Clone)]
enum NodeKind {
    Leaf(Vec<Piece>),
    Internal(Vec<Node>),
}

#[derive(Debug, Clone)]
struct Node {
    char_count: usize,
    line_breaks: usize,
    kind: NodeKind,
}

impl Node {
    fn leaf(pieces: Vec<Piece>) -> Self {
        let mut node = Self {
            char_count: 0,
            line_breaks: 0,
            kind: NodeKind::Leaf(pieces),
        };
        node.recompute();
        node
    }

    fn internal(children: Vec<Node>) -> Self {
        let mut node = Self {
            char_count: 0,
            line_breaks: 0,
            kind: NodeKind::Internal(children),
        };
        node.recompute();
        node
    }

    /// Recompute this node's aggregates from its direct children/pieces.
    ///
    /// Mutation paths call this bottom-up along the edited path, so a node's
    /// aggregates are never stale when visible to a reader.
    fn recompute(&mut self) {
        let (chars, breaks) = match &self.kind {
            NodeKind::Leaf(pieces) => pieces
                .iter()
                .fold((0, 0), |(c, b), p| (c + p.char_count, b + p.line_breaks)),
            NodeKind::Internal(children) => children
                .iter()
                .fold((0, 0), |(c, b), n| (c + n.char_count, b + n.line_breaks)),
        };
        self.char_count = chars;
        self.line_breaks = breaks;
    }
}

/// Result of resolving a character offset to a position in the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    /// Child index taken at each internal node, root first.
    pub path: Vec<usize>,
    /// Index of the target piece within the leaf's run.
    pub piece_index: usize,
    /// Character offset within that piece; equal to the piece's character
    /// count when the offset falls on the piece's end boundary.
    pub offset_in_piece: usize,
}

/// Balanced tree index over the ordered piece sequence.
#[derive(Debug, Clone)]
pub struct Rope {
    root: Node,
}

impl Rope {
    /// Create an empty rope.
    pub fn new() -> Self {
        Self {
            root: Node::leaf(Vec::new()),
        }
    }

    /// Bottom-up bulk construction from an ordered piece sequence, O(n).
    ///
    /// Pieces are grouped into leaves, leaves into parents, until one root
    /// remains.
    pub fn from_pieces(pieces: Vec<Piece>) -> Self {
        Self {
            root: Self::build(pieces),
        }
    }

    /// Total character count of the document.
    pub fn char_count(&self) -> usize {
        self.root.char_count
    }

    /// Total line-break count of the document.
    pub fn line_breaks(&self) -> usize {
        self.root.line_breaks
    }

    /// Document line count: line breaks plus one.
    pub fn line_count(&self) -> usize {
        self.root.line_breaks + 1
    }

    /// Resolve a character offset to a leaf piece position.
    ///
    /// `offset == char_count()` is a defined edge case resolving to the end
    /// boundary of the last piece; anything beyond is an error. An offset on
    /// a boundary between two pieces resolves into the earlier piece's end.
    pub fn locate(&self, offset: usize) -> Result<Location, BufferError> {
        if offset > self.root.char_count {
            return Err(BufferError::OffsetOutOfRange {
                offset,
                len: self.root.char_count,
            });
        }

        let mut path = Vec::new();
        let mut node = &self.root;
        let mut rem = offset;
        'descend: loop {
            match &node.kind {
                NodeKind::Internal(children) => {
                    for (idx, child) in children.iter().enumerate() {
                        if rem <= child.char_count {
                            path.push(idx);
                            node = child;
                            continue 'descend;
                        }
                        rem -= child.char_count;
                    }
                    unreachable!("offset within bounds but no child claimed it");
                }
                NodeKind::Leaf(pieces) => {
                    for (idx, piece) in pieces.iter().enumerate() {
                        if rem <= piece.char_count {
                            return Ok(Location {
                                path,
                                piece_index: idx,
                                offset_in_piece: rem,
                            });
                        }
                        rem -= piece.char_count;
                    }
                    // Empty document: the root is an empty leaf.
                    return Ok(Location {
                        path,
                        piece_index: 0,
                        offset_in_piece: 0,
                    });
                }
            }
        }
    }

    /// Insert a piece at the given character offset.
    ///
    /// Insertion on a piece boundary splices the new piece adjacent to it;
    /// insertion strictly inside a piece splits it, with counts recomputed
    /// for both halves. Aggregates along the edited path are recomputed
    /// before returning. A leaf overflowing [`MAX_FANOUT`] triggers a full
    /// rebuild.
    pub fn insert(
        &mut self,
        offset: usize,
        piece: Piece,
        store: &PieceStore,
    ) -> Result<(), BufferError> {
        if offset > self.root.char_count {
            return Err(BufferError::OffsetOutOfRange {
                offset,
                len: self.root.char_count,
            });
        }

        // Only a leaf's piece run can overflow here; internal child counts
        // change solely through rebuilds.
        if Self::insert_rec(&mut self.root, offset, piece, store) {
            let pieces = self.snapshot_pieces();
            self.root = Self::build(pieces);
        }
        Ok(())
    }

    fn insert_rec(node: &mut Node, mut rem: usize, piece: Piece, store: &PieceStore) -> bool {
        let overflowed = match &mut node.kind {
            NodeKind::Internal(children) => {
                let mut target = children.len() - 1;
                for (idx, child) in children.iter().enumerate() {
                    if rem <= child.char_count {
                        target = idx;
                        break;
                    }
                    rem -= child.char_count;
                }
                Self::insert_rec(&mut children[target], rem, piece, store)
            }
            NodeKind::Leaf(pieces) => {
                if pieces.is_empty() {
                    pieces.push(piece);
                } else {
                    let mut target = pieces.len() - 1;
                    for (idx, existing) in pieces.iter().enumerate() {
                        if rem <= existing.char_count {
                            target = idx;
                            break;
                        }
                        rem -= existing.char_count;
                    }
                    if rem == 0 {
                        pieces.insert(target, piece);
                    } else if rem == pieces[target].char_count {
                        pieces.insert(target + 1, piece);
                    } else {
                        let (left, right) = store.split_piece(&pieces[target], rem);
                        pieces.splice(target..=target, [left, piece, right]);
                    }
                }
                pieces.len() > MAX_FANOUT
            }
        };
        node.recompute();
        overflowed
    }

    /// Delete a character range.
    ///
    /// Implemented as flatten, three-way partition (keep / drop / truncate
    /// with recomputed counts), full rebuild. Deliberately O(piece count);
    /// see the module docs.
    pub fn delete(
        &mut self,
        offset: usize,
        len: usize,
        store: &PieceStore,
    ) -> Result<(), BufferError> {
        let doc_len = self.root.char_count;
        if offset > doc_len {
            return Err(BufferError::OffsetOutOfRange {
                offset,
                len: doc_len,
            });
        }
        let len = len.min(doc_len - offset);
        if len == 0 {
            return Ok(());
        }
        let end = offset + len;

        let mut kept = Vec::new();
        let mut acc = 0usize;
        for piece in self.snapshot_pieces() {
            let piece_start = acc;
            let piece_end = acc + piece.char_count;
            acc = piece_end;

            if piece_end <= offset || piece_start >= end {
                kept.push(piece);
            } else if piece_start < offset {
                let (left, rest) = store.split_piece(&piece, offset - piece_start);
                kept.push(left);
                if piece_end > end {
                    // Deletion wholly inside this piece.
                    let (_, right) = store.split_piece(&rest, end - offset);
                    kept.push(right);
                }
            } else if piece_end > end {
                let (_, right) = store.split_piece(&piece, end - piece_start);
                kept.push(right);
            }
            // Pieces fully inside the range are dropped.
        }

        self.root = Self::build(kept);
        Ok(())
    }

    /// Append a piece after the last one. Flatten + rebuild, same cost
    /// caveat as `delete`.
    pub fn append_piece(&mut self, piece: Piece) {
        let mut pieces = self.snapshot_pieces();
        pieces.push(piece);
        self.root = Self::build(pieces);
    }

    /// Prepend a piece before the first one. Flatten + rebuild.
    pub fn prepend_piece(&mut self, piece: Piece) {
        let mut pieces = self.snapshot_pieces();
        pieces.insert(0, piece);
        self.root = Self::build(pieces);
    }

    /// Character offset of the first character of line `line`.
    ///
    /// An aggregate-guided descent by per-node line-break counts; the only
    /// linear scan is inside the one leaf (and one piece) that contains the
    /// target break. Out-of-range line numbers clamp to the last line.
    pub fn line_start(&self, line: usize, store: &PieceStore) -> usize {
        self.line_start_inner(line, store).0
    }

    /// Descent for `line_start`, also reporting how many pieces were
    /// examined at the leaf level (used by tests to pin the complexity
    /// contract).
    fn line_start_inner(&self, line: usize, store: &PieceStore) -> (usize, usize) {
        // Line n starts just past the n-th line break (1-based).
        let k = line.min(self.root.line_breaks);
        if k == 0 {
            return (0, 0);
        }

        let mut k = k;
        let mut offset = 0usize;
        let mut probes = 0usize;
        let mut node = &self.root;
        'descend: loop {
            match &node.kind {
                NodeKind::Internal(children) => {
                    for child in children {
                        if k <= child.line_breaks {
                            node = child;
                            continue 'descend;
                        }
                        k -= child.line_breaks;
                        offset += child.char_count;
                    }
                    unreachable!("line break within bounds but no child claimed it");
                }
                NodeKind::Leaf(pieces) => {
                    for piece in pieces {
                        probes += 1;
                        if k <= piece.line_breaks {
                            let text = store.piece_text(piece);
                            let byte_pos = memchr_iter(b'\n', text.as_bytes())
                                .nth(k - 1)
                                .expect("piece line-break count out of sync with its text");
                            // '\n' is one byte, so ..=byte_pos ends on a
                            // char boundary.
                            return (offset + text[..=byte_pos].chars().count(), probes);
                        }
                        k -= piece.line_breaks;
                        offset += piece.char_count;
                    }
                    unreachable!("line break within bounds but no piece claimed it");
                }
            }
        }
    }

    /// Line number containing the given character offset: the number of line
    /// breaks strictly before it. Offsets past the end clamp to the last
    /// line.
    pub fn line_of_offset(&self, offset: usize, store: &PieceStore) -> usize {
        let mut rem = offset.min(self.root.char_count);
        let mut breaks = 0usize;
        let mut node = &self.root;
        'descend: loop {
            match &node.kind {
                NodeKind::Internal(children) => {
                    for child in children {
                        if rem <= child.char_count {
                            node = child;
                            continue 'descend;
                        }
                        rem -= child.char_count;
                        breaks += child.line_breaks;
                    }
                    return breaks;
                }
                NodeKind::Leaf(pieces) => {
                    for piece in pieces {
                        if rem == piece.char_count {
                            return breaks + piece.line_breaks;
                        }
                        if rem < piece.char_count {
                            let text = store.piece_text(piece);
                            let scanned = text
                                .chars()
                                .take(rem)
                                .filter(|&ch| ch == '\n')
                                .count();
                            return breaks + scanned;
                        }
                        rem -= piece.char_count;
                        breaks += piece.line_breaks;
                    }
                    return breaks;
                }
            }
        }
    }

    /// Text of the character range `[start, end)`.
    ///
    /// In-order traversal that skips subtrees wholly outside the range using
    /// the character aggregates, reading only the intersecting sub-range of
    /// boundary pieces. Bounds clamp to the document.
    pub fn text(&self, start: usize, end: usize, store: &PieceStore) -> String {
        let len = self.root.char_count;
        let start = start.min(len);
        let end = end.min(len);
        if start >= end {
            return String::new();
        }
        let mut out = String::with_capacity(end - start);
        Self::text_rec(&self.root, start, end, 0, store, &mut out);
        out
    }

    fn text_rec(
        node: &Node,
        start: usize,
        end: usize,
        node_start: usize,
        store: &PieceStore,
        out: &mut String,
    ) {
        match &node.kind {
            NodeKind::Internal(children) => {
                let mut acc = node_start;
                for child in children {
                    let child_start = acc;
                    let child_end = acc + child.char_count;
                    acc = child_end;
                    if child_end <= start {
                        continue;
                    }
                    if child_start >= end {
                        break;
                    }
                    Self::text_rec(child, start, end, child_start, store, out);
                }
            }
            NodeKind::Leaf(pieces) => {
                let mut acc = node_start;
                for piece in pieces {
                    let piece_start = acc;
                    let piece_end = acc + piece.char_count;
                    acc = piece_end;
                    if piece_end <= start {
                        continue;
                    }
                    if piece_start >= end {
                        break;
                    }

                    let text = store.piece_text(piece);
                    let local_start = start.saturating_sub(piece_start);
                    let local_end = (end - piece_start).min(piece.char_count);
                    if local_start == 0 && local_end == piece.char_count {
                        out.push_str(text);
                    } else {
                        let from = byte_of_char(text, local_start);
                        let to = byte_of_char(text, local_end);
                        out.push_str(&text[from..to]);
                    }
                }
            }
        }
    }

    /// Copy of the ordered piece sequence, O(piece count).
    pub fn snapshot_pieces(&self) -> Vec<Piece> {
        let mut out = Vec::new();
        Self::collect(&self.root, &mut out);
        out
    }

    fn collect(node: &Node, out: &mut Vec<Piece>) {
        match &node.kind {
            NodeKind::Leaf(pieces) => out.extend(pieces.iter().cloned()),
            NodeKind::Internal(children) => {
                for child in children {
                    Self::collect(child, out);
                }
            }
        }
    }

    fn build(pieces: Vec<Piece>) -> Node {
        if pieces.len() <= MAX_FANOUT {
            return Node::leaf(pieces);
        }

        let mut level: Vec<Node> = Vec::new();
        let mut pieces = pieces.into_iter();
        let sizes = chunk_sizes(pieces.len());
        for size in sizes {
            level.push(Node::leaf(pieces.by_ref().take(size).collect()));
        }

        while level.len() > 1 {
            let sizes = chunk_sizes(level.len());
            let mut nodes = level.into_iter();
            let mut parents = Vec::with_capacity(sizes.len());
            for size in sizes {
                parents.push(Node::internal(nodes.by_ref().take(size).collect()));
            }
            level = parents;
        }
        level.pop().unwrap_or_else(|| Node::leaf(Vec::new()))
    }

    #[cfg(test)]
    fn depth(&self) -> usize {
        let mut depth = 1;
        let mut node = &self.root;
        while let NodeKind::Internal(children) = &node.kind {
            depth += 1;
            node = &children[0];
        }
        depth
    }

    #[cfg(test)]
    fn check_invariants(&self) {
        fn check(node: &Node, is_root: bool) {
            let (chars, breaks) = match &node.kind {
                NodeKind::Leaf(pieces) => {
                    assert!(pieces.len() <= MAX_FANOUT);
                    pieces
                        .iter()
                        .fold((0, 0), |(c, b), p| (c + p.char_count, b + p.line_breaks))
                }
                NodeKind::Internal(children) => {
                    assert!(!children.is_empty());
                    assert!(children.len() <= MAX_FANOUT);
                    if !is_root {
                        assert!(children.len() >= MIN_FANOUT / 2);
                    }
                    for child in children {
                        check(child, false);
                    }
                    children
                        .iter()
                        .fold((0, 0), |(c, b), n| (c + n.char_count, b + n.line_breaks))
                }
            };
            assert_eq!(node.char_count, chars, "stale char aggregate");
            assert_eq!(node.line_breaks, breaks, "stale line-break aggregate");
        }
        check(&self.root, true);
    }
}

impl Default for Rope {
    fn default() -> Self {
        Self::new()
    }
}

/// Near-even chunk sizes for grouping `n` items into tree nodes.
///
/// Targets [`BUILD_FANOUT`] items per node, falling back to fuller nodes when
/// an even split would drop below the minimum fan-out.
fn chunk_sizes(n: usize) -> Vec<usize> {
    let mut count = n.div_ceil(BUILD_FANOUT).max(1);
    if count > 1 && n / count < MIN_FANOUT {
        count = n.div_ceil(MAX_FANOUT).max(1);
    }
    let base = n / count;
    let extra = n % count;
    (0..count)
        .map(|i| if i < extra { base + 1 } else { base })
        .collect()
}
