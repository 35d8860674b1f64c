use buffer_core::TextBuffer;

#[test]
fn test_snapshot_isolated_from_later_edits() {
    let mut buffer = TextBuffer::new("line1\nline2\nline3");
    let snapshot = buffer.snapshot();

    buffer.delete(0, 6).unwrap();
    assert_eq!(buffer.text(), "line2\nline3");

    assert_eq!(buffer.snapshot_text(&snapshot), "line1\nline2\nline3");
    assert_eq!(snapshot.char_count(), 17);
    assert_eq!(snapshot.line_count(), 3);
}

#[test]
fn test_snapshot_survives_inserts_appending_to_add_buffer() {
    let mut buffer = TextBuffer::new("base");
    buffer.insert(4, "-one").unwrap();
    let snapshot = buffer.snapshot();
    assert_eq!(snapshot.add_buffer_len(), 4);

    // Later appends grow the add buffer but never relocate captured spans.
    for i in 0..50 {
        buffer.insert(buffer.len(), &format!("-{i}")).unwrap();
    }
    assert_eq!(buffer.snapshot_text(&snapshot), "base-one");
}

#[test]
fn test_restore_snapshot() {
    let mut buffer = TextBuffer::new("alpha\nbeta");
    let snapshot = buffer.snapshot();

    buffer.delete(0, 6).unwrap();
    buffer.insert(0, "gamma\n").unwrap();
    assert_eq!(buffer.text(), "gamma\nbeta");

    buffer.restore_snapshot(&snapshot);
    assert_eq!(buffer.text(), "alpha\nbeta");
    assert_eq!(buffer.line_count(), 2);
    assert_eq!(buffer.line(0), "alpha");
    assert_eq!(buffer.offset_line(6), 1);

    // The restored buffer stays fully editable.
    buffer.insert(5, "!").unwrap();
    assert_eq!(buffer.text(), "alpha!\nbeta");
}

#[test]
fn test_snapshot_ids_strictly_increase() {
    let mut buffer = TextBuffer::new("x");
    let first = buffer.snapshot();
    buffer.insert(0, "y").unwrap();
    let second = buffer.snapshot();
    let third = buffer.snapshot();
    assert!(first.id() < second.id());
    assert!(second.id() < third.id());
}

#[test]
fn test_snapshot_capture_is_piece_count_sized() {
    let mut buffer = TextBuffer::new("0123456789");
    for i in 0..20 {
        buffer.insert(i, "x").unwrap();
    }
    let snapshot = buffer.snapshot();
    // Far fewer pieces than characters: the capture copies descriptors,
    // not text.
    assert!(snapshot.pieces().len() <= buffer.len());
    assert_eq!(
        snapshot.pieces().iter().map(|p| p.char_count).sum::<usize>(),
        buffer.len()
    );
}

#[test]
fn test_restore_then_mutate_then_restore_again() {
    let mut buffer = TextBuffer::new("one\ntwo");
    let checkpoint = buffer.snapshot();

    buffer.insert(3, "-and-a-half").unwrap();
    let modified = buffer.snapshot();

    buffer.restore_snapshot(&checkpoint);
    assert_eq!(buffer.text(), "one\ntwo");

    buffer.restore_snapshot(&modified);
    assert_eq!(buffer.text(), "one-and-a-half\ntwo");
}
