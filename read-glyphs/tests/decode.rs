//! End-to-end decoding of a small synthetic font.

use pretty_assertions::assert_eq;
use read_glyphs::types::test_helpers::BeBuffer;
use read_glyphs::types::{
    Fixed, GlyphId, LongDateTime, Offset32, Point, Tag, Version16Dot16, TT_SFNT_VERSION,
};
use read_glyphs::{
    checksum, outline::COORDINATE_SCALE, Diagnostic, FontData, ParseOptions, ParsedFont,
    CHECKSUM_ADJUSTMENT_BASE,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn head_table() -> Vec<u8> {
    BeBuffer::new()
        .extend([1u16, 0])
        .push(Fixed::from_f64(1.0))
        .extend([0u32, 0x5F0F3CF5])
        .extend([0u16, 2048]) // flags, units per em
        .extend([LongDateTime::new(0), LongDateTime::new(0)])
        .extend([0i16, 0, 100, 100]) // bbox
        .extend([0u16, 8]) // mac_style, lowest ppem
        .extend([2i16, 0, 0]) // direction hint, short loca, glyph format
        .to_vec()
}

fn maxp_table() -> Vec<u8> {
    BeBuffer::new()
        .push(Version16Dot16::VERSION_1_0)
        .push(2u16) // glyph count
        .extend([4u16, 1, 0, 0, 2, 0, 0, 0, 0, 0, 0, 0, 0])
        .to_vec()
}

/// One Unicode record pointing at a format 4 subtable that maps
/// [65, 90] down to glyph ids starting at 1.
fn cmap_table() -> Vec<u8> {
    BeBuffer::new()
        .extend([0u16, 1]) // version, one record
        .extend([0u16, 3]) // unicode platform, BMP encoding
        .push(Offset32::new(12))
        .extend([4u16, 32, 0, 4, 0, 0, 0]) // format 4 header, segCountX2 = 4
        .extend([90u16, 0xFFFF]) // end codes
        .push(0u16) // reserved pad
        .extend([65u16, 0xFFFF]) // start codes
        .extend([-64i16, 1]) // id deltas
        .extend([0u16, 0]) // id range offsets
        .to_vec()
}

fn loca_table() -> Vec<u8> {
    // glyph 0 has no outline; glyph 1 spans the whole glyf table
    BeBuffer::new().extend([0u16, 0, 12]).to_vec()
}

/// A single simple glyph: one contour, four points, on-curve flags
/// true/true/false/true.
fn glyf_table() -> Vec<u8> {
    BeBuffer::new()
        .extend([1i16, 0, 0, 100, 100]) // contours, bbox
        .push(3u16) // contour end
        .push(0u16) // no instructions
        .extend([0x31u8, 0x33, 0x34, 0x23]) // point flags
        .extend([100u8, 100]) // x deltas
        .extend([100u8]) // y deltas
        .to_vec()
}

fn write_u32(out: &mut [u8], pos: usize, value: u32) {
    out[pos..pos + 4].copy_from_slice(&value.to_be_bytes());
}

/// Assemble a font whose table checksums and checksum adjustment are
/// all internally consistent.
fn build_font(tables: &[(Tag, Vec<u8>)]) -> Vec<u8> {
    let mut buf = BeBuffer::new()
        .push(TT_SFNT_VERSION)
        .extend([tables.len() as u16, 0, 0, 0]);
    let mut offset = 12 + tables.len() * 16;
    let mut head_offset = None;
    for (tag, data) in tables {
        if *tag == Tag::new(b"head") {
            head_offset = Some(offset);
        }
        buf = buf
            .push(*tag)
            .extend([0u32, offset as u32, data.len() as u32]);
        offset += data.len().next_multiple_of(4);
    }
    let mut out = buf.to_vec();
    for (_, data) in tables {
        out.extend_from_slice(data);
        while out.len() % 4 != 0 {
            out.push(0);
        }
    }
    // fill in the per-table checksums, then make the whole file sum to
    // the expected constant via head's adjustment field
    for (index, (_, data)) in tables.iter().enumerate() {
        let record_pos = 12 + index * 16;
        let table_offset = u32::from_be_bytes(out[record_pos + 8..record_pos + 12].try_into().unwrap());
        let table_checksum = checksum(FontData::new(&out), data.len() as u32, table_offset);
        write_u32(&mut out, record_pos + 4, table_checksum);
    }
    let file_sum = checksum(FontData::new(&out), out.len() as u32, 0);
    let adjustment = CHECKSUM_ADJUSTMENT_BASE.wrapping_sub(file_sum);
    write_u32(&mut out, head_offset.expect("no head table") + 8, adjustment);
    out
}

fn sample_font() -> Vec<u8> {
    build_font(&[
        (Tag::new(b"head"), head_table()),
        (Tag::new(b"maxp"), maxp_table()),
        (Tag::new(b"cmap"), cmap_table()),
        (Tag::new(b"loca"), loca_table()),
        (Tag::new(b"glyf"), glyf_table()),
    ])
}

#[test]
fn verified_parse_has_no_findings() {
    init_logging();
    let data = sample_font();
    let font = ParsedFont::new(&data, ParseOptions::default()).unwrap();
    assert_eq!(font.diagnostics(), &[] as &[Diagnostic]);
    assert_eq!(font.head().units_per_em, 2048);
    assert_eq!(font.maxp().num_glyphs, 2);
    assert_eq!(font.maxp().bounds.unwrap().max_points, 4);
}

#[test]
fn codepoint_to_outline() {
    init_logging();
    let data = sample_font();
    let font = ParsedFont::new(&data, ParseOptions::default()).unwrap();

    let gid = font.map_codepoint('A');
    assert_eq!(gid, GlyphId::new(1));

    let outlines = font.outline(gid).unwrap();
    assert_eq!(outlines.len(), 1);
    let outline = &outlines[0];
    assert_eq!(outline.contour_ends, [3]);
    assert_eq!(outline.num_points(), 4);
    assert_eq!(outline.on_curve, [true, true, false, true]);
    let expected: Vec<_> = [(0, 0), (100, 0), (100, 100), (0, 100)]
        .iter()
        .map(|&(x, y)| Point::new(x as f32 * COORDINATE_SCALE, y as f32 * COORDINATE_SCALE))
        .collect();
    assert_eq!(outline.points, expected);
}

#[test]
fn unmapped_codepoints_resolve_to_the_missing_glyph() {
    init_logging();
    let data = sample_font();
    let font = ParsedFont::new(&data, ParseOptions::default()).unwrap();
    // below, between and beyond the mapped segments
    assert_eq!(font.map_codepoint('!'), GlyphId::NOTDEF);
    assert_eq!(font.map_codepoint('a'), GlyphId::NOTDEF);
    assert_eq!(font.map_codepoint(0x10400u32), GlyphId::NOTDEF);
    // the missing glyph has no outline in this font, and that is fine
    assert_eq!(font.outline(GlyphId::NOTDEF), Ok(Vec::new()));
}

#[test]
fn corrupt_table_is_reported_but_still_parses() {
    init_logging();
    let mut data = sample_font();
    let len = data.len();
    data[len - 1] ^= 0xFF; // flip bits inside the glyf table
    let font = ParsedFont::new(&data, ParseOptions::default()).unwrap();
    assert!(font.diagnostics().iter().any(|finding| matches!(
        finding,
        Diagnostic::TableChecksumMismatch { tag, .. } if *tag == Tag::new(b"glyf")
    )));
    assert!(font
        .diagnostics()
        .iter()
        .any(|finding| matches!(finding, Diagnostic::FileChecksumMismatch { .. })));
    // the glyph data is still decoded on a best-effort basis
    assert_eq!(font.map_codepoint('A'), GlyphId::new(1));
    assert_eq!(font.outline(GlyphId::new(1)).unwrap().len(), 1);
}

#[test]
fn verification_can_be_disabled() {
    init_logging();
    let mut data = sample_font();
    let len = data.len();
    data[len - 1] ^= 0xFF;
    let options = ParseOptions {
        verify_table_checksums: false,
        verify_full_checksum: false,
    };
    let font = ParsedFont::new(&data, options).unwrap();
    assert!(font.diagnostics().is_empty());
}
