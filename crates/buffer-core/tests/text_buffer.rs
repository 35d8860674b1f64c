use buffer_core::{BufferError, LineEnding, TextBuffer};

#[test]
fn test_insert_at_end() {
    let mut buffer = TextBuffer::new("hello");
    buffer.insert(5, " world").unwrap();
    assert_eq!(buffer.text(), "hello world");
    assert_eq!(buffer.line_count(), 1);
}

#[test]
fn test_delete_newline_joins_lines() {
    let mut buffer = TextBuffer::new("abc\ndef");
    let deleted = buffer.delete(3, 1).unwrap();
    assert_eq!(deleted, "\n");
    assert_eq!(buffer.text(), "abcdef");
    assert_eq!(buffer.line_count(), 1);
}

#[test]
fn test_insert_multiline_into_empty() {
    let mut buffer = TextBuffer::empty();
    buffer.insert(0, "a\nb\nc").unwrap();
    assert_eq!(buffer.line_count(), 3);
    assert_eq!(buffer.line(1), "b");
}

#[test]
fn test_line_queries() {
    let buffer = TextBuffer::new("line1\nline2\nline3");
    assert_eq!(buffer.line_count(), 3);
    assert_eq!(buffer.line(0), "line1");
    assert_eq!(buffer.line(2), "line3");
    assert_eq!(buffer.line_offset(1), 6);
    assert_eq!(buffer.offset_line(6), 1);
    assert_eq!(buffer.offset_line(5), 0); // the newline belongs to line 0

    // Out-of-range queries clamp.
    assert_eq!(buffer.line(99), "line3");
    assert_eq!(buffer.line_offset(99), 12);
    assert_eq!(buffer.offset_line(999), 2);
}

#[test]
fn test_offset_line_round_trip() {
    let buffer = TextBuffer::new("a\n\nbb\nccc\n");
    for line in 0..buffer.line_count() {
        assert_eq!(buffer.offset_line(buffer.line_offset(line)), line);
    }
}

#[test]
fn test_trailing_newline_yields_empty_last_line() {
    let buffer = TextBuffer::new("abc\n");
    assert_eq!(buffer.line_count(), 2);
    assert_eq!(buffer.line(1), "");
}

#[test]
fn test_text_range() {
    let buffer = TextBuffer::new("Hello, World!");
    assert_eq!(buffer.text_range(0, 5), "Hello");
    assert_eq!(buffer.text_range(7, 12), "World");
    assert_eq!(buffer.text_range(7, 999), "World!");
    assert_eq!(buffer.text_range(5, 5), "");
}

#[test]
fn test_no_op_edits_change_nothing() {
    let mut buffer = TextBuffer::new("stable\ntext");
    let before_version = buffer.version();

    buffer.insert(3, "").unwrap();
    assert_eq!(buffer.delete(3, 0).unwrap(), "");

    assert_eq!(buffer.text(), "stable\ntext");
    assert_eq!(buffer.line_count(), 2);
    assert_eq!(buffer.version(), before_version);
}

#[test]
fn test_out_of_range_mutations_reject() {
    let mut buffer = TextBuffer::new("abc");
    assert_eq!(
        buffer.insert(4, "x"),
        Err(BufferError::OffsetOutOfRange { offset: 4, len: 3 })
    );
    assert!(buffer.delete(4, 1).is_err());
    assert_eq!(buffer.text(), "abc");
}

#[test]
fn test_delete_length_clamps_to_end() {
    let mut buffer = TextBuffer::new("abcdef");
    assert_eq!(buffer.delete(4, 100).unwrap(), "ef");
    assert_eq!(buffer.text(), "abcd");
}

#[test]
fn test_crlf_input_is_normalized() {
    let buffer = TextBuffer::new("one\r\ntwo\rthree");
    assert_eq!(buffer.text(), "one\ntwo\nthree");
    assert_eq!(buffer.line_count(), 3);
    assert_eq!(buffer.line_ending(), LineEnding::Crlf);
    assert_eq!(
        buffer.line_ending().apply_to_text(&buffer.text()),
        "one\r\ntwo\r\nthree"
    );
}

#[test]
fn test_length_and_line_invariants_via_snapshot() {
    let mut buffer = TextBuffer::new("seed\ntext");
    buffer.insert(4, "!\n?").unwrap();
    buffer.delete(0, 2).unwrap();
    buffer.insert(buffer.len(), "\ntail").unwrap();

    let snapshot = buffer.snapshot();
    let char_sum: usize = snapshot.pieces().iter().map(|p| p.char_count).sum();
    let break_sum: usize = snapshot.pieces().iter().map(|p| p.line_breaks).sum();
    assert_eq!(buffer.len(), char_sum);
    assert_eq!(buffer.line_count(), break_sum + 1);
}

#[test]
fn test_many_interleaved_edits() {
    let mut buffer = TextBuffer::new("Hello");
    buffer.insert(5, " World").unwrap();
    buffer.insert(5, ",").unwrap();
    buffer.delete(0, 7).unwrap();
    buffer.insert(0, "Hi, ").unwrap();
    assert_eq!(buffer.text(), "Hi, World");
}

#[test]
fn test_utf8_offsets_are_characters() {
    let mut buffer = TextBuffer::new("你好");
    buffer.insert(1, "们").unwrap();
    assert_eq!(buffer.text(), "你们好");
    assert_eq!(buffer.len(), 3);
    assert_eq!(buffer.delete(1, 1).unwrap(), "们");
    assert_eq!(buffer.text(), "你好");
}
