use u8text::{length_in_codepoints, U8TextError, Utf8Buf};

fn assert_invariants(buf: &Utf8Buf) {
    let with_nul = buf.as_bytes_with_nul();
    assert_eq!(with_nul.len(), buf.byte_len() + 1);
    assert_eq!(with_nul[buf.byte_len()], 0);
    assert_eq!(
        length_in_codepoints(buf.as_bytes()).unwrap(),
        buf.codepoint_len()
    );
    assert!(core::str::from_utf8(buf.as_bytes()).is_ok());
}

#[test]
fn test_new_counts_bytes_and_codepoints() {
    let buf = Utf8Buf::new("naïve ☕").unwrap();
    assert_eq!(buf.byte_len(), 10);
    assert_eq!(buf.codepoint_len(), 7);
    assert_eq!(buf.capacity(), Utf8Buf::MIN_CAPACITY);
    assert_eq!(buf.as_str(), "naïve ☕");
    assert_invariants(&buf);
}

#[test]
fn test_new_stops_at_nul() {
    let buf = Utf8Buf::new(b"abc\0\xFF").unwrap();
    assert_eq!(buf.as_bytes(), b"abc");
    assert_eq!(buf.codepoint_len(), 3);
}

#[test]
fn test_new_rejects_invalid_bytes() {
    assert_eq!(
        Utf8Buf::new(b"ab\xE2\x82").unwrap_err(),
        U8TextError::InvalidSequence { position: 4 }
    );
    assert_eq!(
        Utf8Buf::new(b"\xED\xA0\x80").unwrap_err(),
        U8TextError::InvalidSequence { position: 1 }
    );
}

#[test]
fn test_new_large_input_sizes_capacity_to_fit() {
    let text = "x".repeat(100);
    let buf = Utf8Buf::new(&text).unwrap();
    assert_eq!(buf.capacity(), 101);
    assert_eq!(buf.byte_len(), 100);
}

#[test]
fn test_with_capacity_minimum() {
    assert_eq!(Utf8Buf::with_capacity(0).unwrap().capacity(), 16);
    assert_eq!(Utf8Buf::with_capacity(40).unwrap().capacity(), 40);
    let buf = Utf8Buf::with_capacity(40).unwrap();
    assert!(buf.is_empty());
    assert_eq!(buf.as_bytes_with_nul(), b"\0");
}

#[test]
fn test_default_is_released() {
    let buf = Utf8Buf::default();
    assert_eq!(buf.capacity(), 0);
    assert_eq!(buf.byte_len(), 0);
    assert_eq!(buf.codepoint_len(), 0);
    assert_eq!(buf.as_str(), "");
    assert_invariants(&buf);
}

#[test]
fn test_append_grows_by_doubling() {
    let mut buf = Utf8Buf::new("0123456789").unwrap();
    assert_eq!(buf.capacity(), 16);
    buf.append_bytes("abcdef").unwrap();
    assert_eq!(buf.byte_len(), 16);
    assert_eq!(buf.capacity(), 32);
    buf.append_bytes("ghijklmnopqrstuv").unwrap();
    assert_eq!(buf.capacity(), 64);
    assert_invariants(&buf);
}

#[test]
fn test_append_counts_only_new_codepoints() {
    let mut buf = Utf8Buf::new("ab").unwrap();
    buf.append_bytes("çd€").unwrap();
    assert_eq!(buf.codepoint_len(), 5);
    buf.append_codepoint(0x1F980).unwrap();
    assert_eq!(buf.codepoint_len(), 6);
    assert_eq!(buf.as_str(), "abçd€🦀");
    assert_invariants(&buf);
}

#[test]
fn test_append_buffer() {
    let mut a = Utf8Buf::new("foo").unwrap();
    let b = Utf8Buf::new("bär").unwrap();
    a.append(&b).unwrap();
    assert_eq!(a.as_str(), "foobär");
    assert_eq!(a.codepoint_len(), 6);
    assert_eq!(b.as_str(), "bär");
}

#[test]
fn test_failed_append_leaves_buffer_unchanged() {
    let mut buf = Utf8Buf::new("keep").unwrap();
    assert_eq!(
        buf.append_bytes(b"ok\xC0\xAF"),
        Err(U8TextError::InvalidSequence { position: 2 })
    );
    assert_eq!(buf.as_str(), "keep");
    assert_eq!(buf.codepoint_len(), 4);
    assert_invariants(&buf);
}

#[test]
fn test_append_codepoint_rejects_nul_and_non_scalars() {
    let mut buf = Utf8Buf::new("x").unwrap();
    assert!(matches!(
        buf.append_codepoint(0),
        Err(U8TextError::InvalidArgument { .. })
    ));
    assert!(matches!(
        buf.append_codepoint(0xDFFF),
        Err(U8TextError::InvalidSequence { .. })
    ));
    assert!(matches!(
        buf.append_codepoint(0x110000),
        Err(U8TextError::InvalidSequence { .. })
    ));
    assert_eq!(buf.as_str(), "x");
}

#[test]
fn test_append_to_released_buffer() {
    let mut buf = Utf8Buf::default();
    buf.append_codepoint(u32::from('é')).unwrap();
    assert_eq!(buf.capacity(), 16);
    assert_eq!(buf.as_str(), "é");
    assert_invariants(&buf);
}

#[test]
fn test_concat() {
    let a = Utf8Buf::new("Hello, ").unwrap();
    let b = Utf8Buf::new("世界").unwrap();
    let joined = Utf8Buf::concat(&a, &b).unwrap();
    assert_eq!(joined.as_str(), "Hello, 世界");
    assert_eq!(joined.codepoint_len(), 9);
    assert_invariants(&joined);

    let empty = Utf8Buf::concat(&Utf8Buf::default(), &Utf8Buf::default()).unwrap();
    assert!(empty.is_empty());
}

#[test]
fn test_insert_codepoint_by_codepoint_offset() {
    let mut buf = Utf8Buf::new("añb").unwrap();
    buf.insert_codepoint(2, u32::from('€'), false).unwrap();
    assert_eq!(buf.as_str(), "añ€b");
    buf.insert_codepoint(0, u32::from('<'), false).unwrap();
    buf.insert_codepoint(5, u32::from('>'), false).unwrap();
    assert_eq!(buf.as_str(), "<añ€b>");
    assert_eq!(buf.codepoint_len(), 6);
    assert_invariants(&buf);
}

#[test]
fn test_insert_by_byte_offset_must_be_sequence_start() {
    let mut buf = Utf8Buf::new("añb").unwrap();
    assert_eq!(
        buf.insert_codepoint(2, u32::from('x'), true),
        Err(U8TextError::InvalidSequence { position: 2 })
    );
    buf.insert_codepoint(3, u32::from('x'), true).unwrap();
    assert_eq!(buf.as_str(), "añxb");
}

#[test]
fn test_insert_out_of_bounds() {
    let mut buf = Utf8Buf::new("añb").unwrap();
    assert_eq!(
        buf.insert_bytes(4, "z", false),
        Err(U8TextError::OutOfBounds {
            offset: 4,
            length: 3
        })
    );
    assert_eq!(
        buf.insert_bytes(5, "z", true),
        Err(U8TextError::OutOfBounds {
            offset: 5,
            length: 4
        })
    );
    assert_eq!(buf.as_str(), "añb");
}

#[test]
fn test_insert_bytes_and_buffer() {
    let mut buf = Utf8Buf::new("1234").unwrap();
    buf.insert_bytes(2, "ab", false).unwrap();
    assert_eq!(buf.as_str(), "12ab34");

    let other = Utf8Buf::new("ΩΩ").unwrap();
    buf.insert_buf(6, &other, true).unwrap();
    assert_eq!(buf.as_str(), "12ab34ΩΩ");
    assert_eq!(buf.codepoint_len(), 8);

    buf.insert_bytes(0, "", false).unwrap();
    buf.insert_buf(1, &Utf8Buf::default(), false).unwrap();
    assert_eq!(buf.as_str(), "12ab34ΩΩ");
    assert_invariants(&buf);
}

#[test]
fn test_insert_invalid_bytes_rejected() {
    let mut buf = Utf8Buf::new("abc").unwrap();
    assert!(buf.insert_bytes(1, b"\xFF", false).is_err());
    assert_eq!(buf.as_str(), "abc");
}

#[test]
fn test_insert_triggers_growth() {
    let mut buf = Utf8Buf::new("0123456789abcd").unwrap();
    buf.insert_bytes(7, "XYZ", false).unwrap();
    assert_eq!(buf.as_str(), "0123456XYZ789abcd");
    assert_eq!(buf.capacity(), 32);
    assert_invariants(&buf);
}

#[test]
fn test_substring_by_codepoint() {
    let buf = Utf8Buf::new("héllo wörld").unwrap();
    assert_eq!(buf.substring(0, 5).unwrap().as_str(), "héllo");
    assert_eq!(buf.substring(6, 5).unwrap().as_str(), "wörld");
    assert_eq!(buf.substring(6, 500).unwrap().as_str(), "wörld");
    assert_eq!(buf.substring(10, usize::MAX).unwrap().as_str(), "d");

    let empty = buf.substring(3, 0).unwrap();
    assert!(empty.is_empty());
    assert_invariants(&empty);
}

#[test]
fn test_substring_start_out_of_bounds() {
    let buf = Utf8Buf::new("abc").unwrap();
    assert_eq!(
        buf.substring(3, 1).unwrap_err(),
        U8TextError::OutOfBounds {
            offset: 3,
            length: 3
        }
    );
    assert!(Utf8Buf::default().substring(0, 1).is_err());
}

#[test]
fn test_substring_by_byte() {
    let buf = Utf8Buf::new("añb").unwrap();
    assert_eq!(buf.substring_bytes(1, 2).unwrap().as_str(), "ñ");
    assert_eq!(buf.substring_bytes(3, 9).unwrap().as_str(), "b");
    assert_eq!(
        buf.substring_bytes(2, 2).unwrap_err(),
        U8TextError::InvalidSequence { position: 2 }
    );
    assert!(matches!(
        buf.substring_bytes(4, 1),
        Err(U8TextError::OutOfBounds { .. })
    ));
}

#[test]
fn test_at_by_codepoint_and_byte() {
    let buf = Utf8Buf::new("a€b").unwrap();
    assert_eq!(buf.at(1, false).unwrap(), 0x20AC);
    assert_eq!(buf.at(2, false).unwrap(), 0x62);
    assert_eq!(buf.at(1, true).unwrap(), 0x20AC);
    assert_eq!(buf.at(4, true).unwrap(), 0x62);
    assert_eq!(
        buf.at(2, true),
        Err(U8TextError::InvalidSequence { position: 2 })
    );
    assert!(matches!(
        buf.at(3, false),
        Err(U8TextError::OutOfBounds { .. })
    ));
    assert!(matches!(
        buf.at(5, true),
        Err(U8TextError::OutOfBounds { .. })
    ));
}

#[test]
fn test_copy_is_deep_with_same_capacity() {
    let mut original = Utf8Buf::with_capacity(48).unwrap();
    original.append_bytes("copy me").unwrap();
    let mut copy = original.copy().unwrap();
    assert_eq!(copy, original);
    assert_eq!(copy.capacity(), 48);

    copy.append_bytes("!").unwrap();
    assert_eq!(original.as_str(), "copy me");
    assert_eq!(copy.as_str(), "copy me!");
}

#[test]
fn test_copy_capacity_is_at_least_min_capacity() {
    let copy = Utf8Buf::default().copy().unwrap();
    assert_eq!(copy.capacity(), Utf8Buf::MIN_CAPACITY);
    assert!(copy.is_empty());

    let mut shrunk = Utf8Buf::new("abc").unwrap();
    shrunk.shrink_to_fit();
    assert_eq!(shrunk.capacity(), 4);
    let copy = shrunk.copy().unwrap();
    assert_eq!(copy.capacity(), Utf8Buf::MIN_CAPACITY);
    assert_eq!(copy.as_str(), "abc");
}

#[test]
fn test_move_from_leaves_source_released() {
    let mut src = Utf8Buf::new("moved").unwrap();
    let mut dest = Utf8Buf::new("old contents").unwrap();
    dest.move_from(&mut src);

    assert_eq!(dest.as_str(), "moved");
    assert_eq!(dest.codepoint_len(), 5);
    assert_eq!(src.capacity(), 0);
    assert!(src.is_empty());
    assert_invariants(&src);

    src.append_bytes("reused").unwrap();
    assert_eq!(src.as_str(), "reused");
}

#[test]
fn test_take() {
    let mut buf = Utf8Buf::new("taken").unwrap();
    let taken = buf.take();
    assert_eq!(taken.as_str(), "taken");
    assert_eq!(buf.capacity(), 0);
}

#[test]
fn test_reserve_and_shrink() {
    let mut buf = Utf8Buf::new("abc").unwrap();
    buf.reserve(10).unwrap();
    assert_eq!(buf.capacity(), 16);
    buf.reserve(100).unwrap();
    assert_eq!(buf.capacity(), 128);

    buf.shrink_to_fit();
    assert_eq!(buf.capacity(), 4);
    assert_eq!(buf.as_str(), "abc");
    assert_invariants(&buf);

    buf.append_bytes("d").unwrap();
    assert_eq!(buf.capacity(), 8);

    let mut released = Utf8Buf::default();
    released.shrink_to_fit();
    assert_eq!(released.capacity(), 0);
}

#[test]
fn test_clear_keeps_capacity() {
    let mut buf = Utf8Buf::new("some text that is long enough").unwrap();
    let capacity = buf.capacity();
    buf.clear();
    assert!(buf.is_empty());
    assert_eq!(buf.codepoint_len(), 0);
    assert_eq!(buf.capacity(), capacity);
    assert_invariants(&buf);
}

#[test]
fn test_cursor_and_codepoints_over_contents() {
    let buf = Utf8Buf::new("x€").unwrap();
    let mut cursor = buf.cursor();
    assert!(cursor.next().unwrap());
    assert!(cursor.next().unwrap());
    assert_eq!(cursor.current_codepoint(), 0x20AC);
    assert!(!cursor.next().unwrap());

    let back: Vec<u32> = buf.codepoints().rev().map(Result::unwrap).collect();
    assert_eq!(back, [0x20AC, 0x78]);
}

#[test]
fn test_traits() {
    let buf = Utf8Buf::try_from("shown").unwrap();
    assert_eq!(buf.to_string(), "shown");
    let bytes: &[u8] = buf.as_ref();
    assert_eq!(bytes, b"shown");
    assert_eq!(buf, Utf8Buf::new(b"shown\0ignored").unwrap());
}
