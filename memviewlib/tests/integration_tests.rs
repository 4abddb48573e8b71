use memviewlib::range::{self, SearchStrategy};
use memviewlib::{
    ByteRange, Color, Converter, EditorOptions, Endianness, FnSource, MemViewError,
    MemViewErrorKind, MemoryEditor, NoteRange, NumericFormat, NumericType, RangePosition, codec,
};
use rand::Rng;

fn random_ranges(count: usize) -> Vec<ByteRange> {
    let mut rng = rand::rng();
    let mut ranges = Vec::with_capacity(count);
    let mut addr = 0;

    for _ in 0..count {
        addr += rng.random_range(0..3);
        let len = rng.random_range(1..6);
        let color = Color::new(rng.random(), rng.random(), rng.random(), 255);
        let mut range = ByteRange::new(addr, addr + len, color);
        range.active = !rng.random_ratio(1, 5);
        ranges.push(range);
        addr += len;
    }
    ranges
}

#[test]
fn test_linear_and_binary_search_agree() {
    for count in [99, 100, 101, 500] {
        // Arrange
        let ranges = random_ranges(count);
        let first = ranges[0].start;
        let last = ranges[count - 1].end;

        for addr in first..last {
            // Act
            let linear = range::classify_with(&ranges, addr, SearchStrategy::Linear);
            let binary = range::classify_with(&ranges, addr, SearchStrategy::Binary);

            // Assert
            assert_eq!(linear, binary, "{count} ranges, address {addr}");
        }
    }
}

#[test]
fn test_classify_single_active_range() {
    // Arrange
    let color = Color::new(10, 20, 30, 255);
    let ranges = [ByteRange::new(0x40, 0x48, color)];

    // Act & Assert
    assert_eq!(range::classify(&ranges, 0x40).position, RangePosition::Start);
    assert_eq!(range::classify(&ranges, 0x47).position, RangePosition::End);
    for addr in 0x41..0x47 {
        let res = range::classify(&ranges, addr);
        assert_eq!(res.position, RangePosition::Middle);
        assert_eq!(res.color, Some(color));
    }
    assert!(!range::classify(&ranges, 0x3F).is_match());
    assert!(!range::classify(&ranges, 0x48).is_match());
}

#[test]
fn test_inactive_coverage_is_not_in_range() {
    // Arrange
    let mut notes: Vec<NoteRange> = (0..120)
        .map(|i| NoteRange::new(i * 4, i * 4 + 4, Color::default(), "field"))
        .collect();
    for note in &mut notes {
        note.active = false;
    }

    // Act & Assert
    for addr in 0..480 {
        assert!(!range::classify(&notes, addr).is_match());
        assert!(!range::classify(&notes[..10], addr).is_match());
    }
}

#[test]
fn test_decode_encode_round_trip_all_types() {
    let mut rng = rand::rng();

    for ntype in NumericType::ALL {
        for endianness in [Endianness::Little, Endianness::Big] {
            for _ in 0..50 {
                // Arrange
                let mut bytes = vec![0u8; ntype.width()];
                rng.fill(bytes.as_mut_slice());

                let mut ordered = [0u8; 8];
                codec::endian_copy(&mut ordered, &bytes, endianness, Endianness::Little);
                let expected = u64::from_le_bytes(ordered);
                if codec::bits_to_float(expected, ntype).is_some_and(f64::is_nan) {
                    continue;
                }

                for format in [NumericFormat::Decimal, NumericFormat::Hexadecimal] {
                    // Act
                    let text = codec::decode_bytes(&bytes, ntype, format, endianness);
                    let bits = text
                        .as_deref()
                        .map_err(Clone::clone)
                        .and_then(|t| codec::encode(t, ntype, format));

                    // Assert
                    assert_eq!(bits, Ok(expected), "{ntype} {format} {endianness:?} {text:?}");
                }
            }
        }
    }
}

#[test]
fn test_binary_rendering_of_single_byte() {
    let data = vec![0xFFu8];
    let res = codec::decode(&data, 0, NumericType::U8, NumericFormat::Binary, Endianness::Little);
    assert_eq!(res.as_deref(), Ok("11111111 "));
}

#[test]
fn test_endianness_of_u16() {
    // Arrange
    let data = vec![0x12u8, 0x34];

    // Act
    let big = codec::decode(&data, 0, NumericType::U16, NumericFormat::Decimal, Endianness::Big);
    let little = codec::decode(&data, 0, NumericType::U16, NumericFormat::Decimal, Endianness::Little);

    // Assert
    assert_eq!(big.as_deref(), Ok("4660"));
    assert_eq!(little.as_deref(), Ok("13330"));
}

#[test]
fn test_single_byte_types_ignore_endianness() {
    let data: Vec<u8> = (0..=255).collect();

    for offset in 0..data.len() {
        for ntype in [NumericType::S8, NumericType::U8] {
            for format in NumericFormat::ALL {
                let le = codec::decode(&data, offset, ntype, format, Endianness::Little);
                let be = codec::decode(&data, offset, ntype, format, Endianness::Big);
                assert_eq!(le, be);
            }
        }
    }
}

#[test]
fn test_converter_hex_type_change_preserves_bits() {
    // Arrange
    let mut conv = Converter::new();
    conv.set_format(NumericFormat::Decimal);
    conv.set_type(NumericType::U8);
    assert!(conv.set_text("200"));

    // Act
    conv.set_format(NumericFormat::Hexadecimal);
    conv.set_type(NumericType::U64);
    let widened = conv.text().to_string();
    conv.set_type(NumericType::U8);
    conv.set_format(NumericFormat::Decimal);

    // Assert
    assert_eq!(widened, "0x00000000000000c8");
    assert_eq!(conv.text(), "200");
}

#[test]
fn test_decode_through_read_fn_with_short_read() {
    // Arrange
    let src = FnSource::new(3, |off| [0xAA, 0xBB, 0xCC][off]);

    // Act
    let short = codec::decode(&src, 1, NumericType::U32, NumericFormat::Hexadecimal, Endianness::Little);
    let past = codec::decode(&src, 3, NumericType::U8, NumericFormat::Decimal, Endianness::Little);

    // Assert
    assert_eq!(short.as_deref(), Ok("0x0000ccbb"));
    assert_eq!(
        past,
        Err(MemViewError::DecodeError(MemViewErrorKind::OffsetOutOfBounds(3, 3)))
    );
}

#[test]
fn test_editor_session() {
    // Arrange
    let data: Vec<u8> = (0..64).collect();
    let mut editor = MemoryEditor::new(EditorOptions {
        cols: 8,
        mid_cols: 4,
        ..EditorOptions::default()
    });
    let red = Color::new(255, 0, 0, 255);

    // Act
    let range_idx = editor.add_range(0x10, 0x20, red);
    let note_idx = editor.add_note(0x12, 0x1A, "header");
    let jump = editor.parse_goto("14", data.len());
    let target = editor.take_goto(data.len());
    let preview = editor.preview(&data);
    let hl = editor.highlighter(&data);
    let cell = hl.cell(0x14, 2, 7);

    // Assert
    assert_eq!(range_idx, Ok(0));
    assert_eq!(note_idx, Ok(0));
    assert_eq!(jump, Some(0x14));
    assert_eq!(target.map(|p| (p.row, p.column)), Some((2, 4)));
    assert_eq!(preview.map(|r| r.decimal), Some("387323156".to_string()));
    // preview span highlight blended with the range color
    assert_eq!(cell.fill, Some(editor.options.highlight_color.blend_half(red)));
    assert!(cell.fill_continues);
    assert_eq!(cell.note.map(|b| b.position), Some(RangePosition::Middle));
}
