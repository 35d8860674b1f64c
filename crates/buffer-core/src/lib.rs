#![warn(missing_docs)]
//! Buffer Core - Piece-Table Text Buffer Engine
//!
//! # Overview
//!
//! `buffer-core` is the text-storage engine beneath a code-editor surface: a
//! mutable document model supporting insertion, deletion, range reads, and
//! line-oriented queries on documents of arbitrary size, with O(log n)-class
//! access and cheap point-in-time snapshots for undo/redo and multi-view
//! consumption. It performs no I/O, no syntax interpretation, and no
//! rendering; those are collaborators consuming this engine's API.
//!
//! # Core Features
//!
//! - **Piece-table storage**: an immutable original buffer plus an
//!   append-only add buffer; edits never relocate existing text, so piece
//!   descriptors stay valid forever
//! - **Rope index**: a balanced multi-way tree over the piece sequence with
//!   cached character and line-break aggregates for O(log n) lookups
//! - **Line index**: a flat sorted line-start table, maintained
//!   incrementally in lockstep with every edit
//! - **Cheap snapshots**: O(piece count) captures that stay readable no
//!   matter how the buffer is edited afterwards
//! - **Batched edits**: atomically validated multi-edit transactions in
//!   pre-batch coordinates
//!
//! # Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  TextBuffer (façade, normalization, edits)  │  ← Public API
//! ├──────────────────────┬──────────────────────┤
//! │  Rope Index          │  Line Index          │  ← Lookup structures
//! │  (piece tree)        │  (flat line starts)  │
//! ├──────────────────────┴──────────────────────┤
//! │  Piece Storage (original + add buffers)     │  ← Text Storage
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use buffer_core::TextBuffer;
//!
//! let mut buffer = TextBuffer::new("hello");
//! buffer.insert(5, " world").unwrap();
//! assert_eq!(buffer.text(), "hello world");
//! assert_eq!(buffer.line_count(), 1);
//!
//! // Snapshots stay valid across later edits.
//! let snapshot = buffer.snapshot();
//! buffer.delete(0, 6).unwrap();
//! assert_eq!(buffer.text(), "world");
//! assert_eq!(buffer.snapshot_text(&snapshot), "hello world");
//!
//! // And can be restored wholesale.
//! buffer.restore_snapshot(&snapshot);
//! assert_eq!(buffer.text(), "hello world");
//! ```
//!
//! # Module Description
//!
//! - [`storage`] - dual-buffer piece storage
//! - [`rope`] - balanced tree index over the piece sequence
//! - [`line_index`] - flat line-start offset index
//! - [`buffer`] - the [`TextBuffer`] façade
//! - [`snapshot`] - point-in-time snapshot handles
//! - [`delta`] - the [`TextEdit`] exchange type for batched edits
//! - [`line_ending`] - newline detection and normalization
//!
//! # Concurrency Model
//!
//! Single logical writer, synchronous operations, no internal locking.
//! Callers wanting stable reads while edits happen hand consumers a
//! [`BufferSnapshot`] rather than reading the live buffer concurrently.

pub mod buffer;
pub mod delta;
pub mod line_ending;
pub mod line_index;
pub mod rope;
pub mod snapshot;
pub mod storage;

pub use buffer::{BufferError, TextBuffer};
pub use delta::TextEdit;
pub use line_ending::LineEnding;
pub use line_index::LineIndex;
pub use rope::{Location, Rope};
pub use snapshot::BufferSnapshot;
pub use storage::{BufferKind, Piece, PieceStore};
