//! One-shot parsing of the tables needed for outline queries.

use types::{GlyphId, Tag};

use crate::checksum::{checksum, CHECKSUM_ADJUSTMENT_BASE};
use crate::outline::{Outline, OutlineDecoder, OutlineError};
use crate::read::{FontRead, ReadError};
use crate::table_provider::TableProvider;
use crate::tables::cmap::{Cmap4, CmapSubtable, PlatformId};
use crate::tables::glyf::Glyf;
use crate::tables::head::{Head, MAGIC_NUMBER};
use crate::tables::loca::Loca;
use crate::tables::maxp::Maxp;
use crate::tables::{glyf, head, loca};
use crate::FontRef;

/// Options controlling validation during parsing.
#[derive(Clone, Copy, Debug)]
pub struct ParseOptions {
    /// Verify the stored checksum of every table in the directory.
    pub verify_table_checksums: bool,
    /// Verify the whole-file checksum against `head.checksum_adjustment`.
    pub verify_full_checksum: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            verify_table_checksums: true,
            verify_full_checksum: true,
        }
    }
}

/// A non-fatal finding recorded while parsing.
///
/// A font with one of these defects may still be perfectly renderable,
/// so they accompany the parsed result instead of failing it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Diagnostic {
    /// A table's stored checksum does not match its contents.
    TableChecksumMismatch {
        tag: Tag,
        stored: u32,
        computed: u32,
    },
    /// The whole-file checksum identity does not hold.
    FileChecksumMismatch {
        /// The adjustment implied by the file contents.
        expected: u32,
        /// The adjustment the font header stores.
        stored: u32,
    },
    /// The font header's magic number field holds the wrong value.
    HeadMagicMismatch(u32),
    /// An encoding subtable has a format this crate does not interpret.
    UnsupportedCmapSubtable {
        platform_id: u16,
        encoding_id: u16,
        format: u16,
    },
    /// An encoding subtable could not be read at all.
    MalformedCmapSubtable { platform_id: u16, encoding_id: u16 },
    /// No Unicode-platform format 4 subtable was found; codepoint
    /// queries will always produce the missing glyph.
    MissingUnicodeSubtable,
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::TableChecksumMismatch {
                tag,
                stored,
                computed,
            } => write!(
                f,
                "checksum mismatch for '{tag}': stored {stored:#010x}, computed {computed:#010x}"
            ),
            Self::FileChecksumMismatch { expected, stored } => write!(
                f,
                "whole-file checksum mismatch: expected adjustment {expected:#010x}, stored {stored:#010x}"
            ),
            Self::HeadMagicMismatch(value) => write!(
                f,
                "font header magic number is {value:#010x}, expected {MAGIC_NUMBER:#010x}"
            ),
            Self::UnsupportedCmapSubtable {
                platform_id,
                encoding_id,
                format,
            } => write!(
                f,
                "cmap subtable (platform {platform_id}, encoding {encoding_id}) has unsupported format {format}"
            ),
            Self::MalformedCmapSubtable {
                platform_id,
                encoding_id,
            } => write!(
                f,
                "cmap subtable (platform {platform_id}, encoding {encoding_id}) could not be read"
            ),
            Self::MissingUnicodeSubtable => {
                write!(f, "no Unicode format 4 cmap subtable is present")
            }
        }
    }
}

/// A parsed font, ready for codepoint and outline queries.
///
/// Produced once per buffer by [`ParsedFont::new`]; the value is
/// immutable and queries borrow it, so it can be shared freely.
#[derive(Clone)]
pub struct ParsedFont<'a> {
    font: FontRef<'a>,
    head: Head,
    maxp: Maxp,
    cmap4: Option<Cmap4<'a>>,
    loca: Option<Loca<'a>>,
    glyf: Option<Glyf<'a>>,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> ParsedFont<'a> {
    /// Parse `data`, performing the validation selected by `options`.
    ///
    /// Failures that make further decoding meaningless (an unrecognized
    /// signature, a truncated directory, a missing required table) are
    /// errors. Everything else — checksum mismatches, a bad header
    /// magic number, unusable cmap subtables — is recorded as a
    /// [`Diagnostic`] on the returned value and also logged.
    pub fn new(data: &'a [u8], options: ParseOptions) -> Result<Self, ReadError> {
        let font = FontRef::new(data)?;
        let head = font.head()?;
        let maxp = font.maxp()?;
        let cmap = font.cmap()?;
        let mut diagnostics = Vec::new();

        if head.magic_number != MAGIC_NUMBER {
            report(&mut diagnostics, Diagnostic::HeadMagicMismatch(head.magic_number));
        }
        if options.verify_table_checksums {
            verify_table_checksums(&font, &head, &mut diagnostics);
        }
        if options.verify_full_checksum {
            verify_full_checksum(&font, &head, &mut diagnostics);
        }

        // among the subtables we can use, the last one on the Unicode
        // platform is selected
        let mut cmap4 = None;
        for record in cmap.encoding_records() {
            match cmap.subtable(record) {
                Ok(CmapSubtable::Format4(subtable)) => {
                    if record.platform() == Some(PlatformId::Unicode) {
                        cmap4 = Some(subtable);
                    }
                }
                Ok(CmapSubtable::Other(format)) => report(
                    &mut diagnostics,
                    Diagnostic::UnsupportedCmapSubtable {
                        platform_id: record.platform_id,
                        encoding_id: record.encoding_id,
                        format,
                    },
                ),
                Err(_) => report(
                    &mut diagnostics,
                    Diagnostic::MalformedCmapSubtable {
                        platform_id: record.platform_id,
                        encoding_id: record.encoding_id,
                    },
                ),
            }
        }
        if cmap4.is_none() {
            report(&mut diagnostics, Diagnostic::MissingUnicodeSubtable);
        }

        // outline tables are optional; without them only header and
        // codepoint queries are available
        let loca = font
            .table_data(loca::TAG)
            .map(|table| Loca::read(table, head.long_loca_offsets()))
            .transpose()?;
        let glyf = font
            .table_data(glyf::TAG)
            .map(Glyf::read)
            .transpose()?;

        Ok(ParsedFont {
            font,
            head,
            maxp,
            cmap4,
            loca,
            glyf,
            diagnostics,
        })
    }

    /// The underlying font reference.
    pub fn font(&self) -> &FontRef<'a> {
        &self.font
    }

    /// The parsed font header.
    pub fn head(&self) -> &Head {
        &self.head
    }

    /// The parsed maximum profile.
    pub fn maxp(&self) -> &Maxp {
        &self.maxp
    }

    /// The selected character map subtable, if one was found.
    pub fn cmap4(&self) -> Option<&Cmap4<'a>> {
        self.cmap4.as_ref()
    }

    /// Non-fatal findings recorded while parsing.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Map a codepoint to a glyph identifier.
    ///
    /// Produces [`GlyphId::NOTDEF`] when no usable character map was
    /// found or the codepoint is unmapped.
    pub fn map_codepoint(&self, codepoint: impl Into<u32>) -> GlyphId {
        match &self.cmap4 {
            Some(subtable) => subtable.map_codepoint(codepoint),
            None => GlyphId::NOTDEF,
        }
    }

    /// A decoder for outline queries, if the font carries outline data.
    pub fn outline_decoder(&self) -> Option<OutlineDecoder<'a>> {
        Some(OutlineDecoder::new(
            self.loca.clone()?,
            self.glyf?,
            self.maxp.num_glyphs,
        ))
    }

    /// Decode the outlines for `gid`.
    ///
    /// Produces nothing when the font has no outline tables, when `gid`
    /// is out of range, or when the glyph has no outline.
    pub fn outline(&self, gid: GlyphId) -> Result<Vec<Outline>, OutlineError> {
        match self.outline_decoder() {
            Some(decoder) => decoder.decode(gid),
            None => Ok(Vec::new()),
        }
    }
}

fn report(diagnostics: &mut Vec<Diagnostic>, diagnostic: Diagnostic) {
    log::warn!("{diagnostic}");
    diagnostics.push(diagnostic);
}

fn verify_table_checksums(font: &FontRef, head: &Head, diagnostics: &mut Vec<Diagnostic>) {
    for record in font.table_directory.table_records() {
        let mut computed = checksum(font.data(), record.length, record.offset);
        if record.tag == head::TAG {
            // head's stored checksum was computed with the adjustment
            // field zeroed out
            computed = computed.wrapping_sub(head.checksum_adjustment);
        }
        if computed != record.checksum {
            report(
                diagnostics,
                Diagnostic::TableChecksumMismatch {
                    tag: record.tag,
                    stored: record.checksum,
                    computed,
                },
            );
        }
    }
}

fn verify_full_checksum(font: &FontRef, head: &Head, diagnostics: &mut Vec<Diagnostic>) {
    let data = font.data();
    let computed =
        checksum(data, data.len() as u32, 0).wrapping_sub(head.checksum_adjustment);
    let expected = CHECKSUM_ADJUSTMENT_BASE.wrapping_sub(computed);
    if expected != head.checksum_adjustment {
        report(
            diagnostics,
            Diagnostic::FileChecksumMismatch {
                expected,
                stored: head.checksum_adjustment,
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::test_helpers::BeBuffer;
    use types::{Fixed, LongDateTime, Offset32, Version16Dot16, TT_SFNT_VERSION};

    const NO_VERIFY: ParseOptions = ParseOptions {
        verify_table_checksums: false,
        verify_full_checksum: false,
    };

    fn head_table(magic: u32) -> Vec<u8> {
        BeBuffer::new()
            .extend([1u16, 0])
            .push(Fixed::from_f64(1.0))
            .extend([0u32, magic])
            .extend([0u16, 1000]) // flags, upm
            .extend([LongDateTime::new(0), LongDateTime::new(0)])
            .extend([0i16, 0, 1000, 1000]) // bbox
            .extend([0u16, 8]) // mac_style, ppem
            .extend([2i16, 0, 0]) // direction, loca format, glyph format
            .to_vec()
    }

    fn maxp_table(num_glyphs: u16) -> Vec<u8> {
        BeBuffer::new()
            .push(Version16Dot16::VERSION_0_5)
            .push(num_glyphs)
            .to_vec()
    }

    /// A format 4 subtable mapping [65, 90] through the given delta,
    /// followed by the required final segment.
    fn format4_delta(delta: i16) -> Vec<u8> {
        BeBuffer::new()
            .extend([4u16, 32, 0, 4, 0, 0, 0]) // header, segCountX2 = 4
            .extend([90u16, 0xFFFF]) // end codes
            .push(0u16) // reserved pad
            .extend([65u16, 0xFFFF]) // start codes
            .extend([delta, 1]) // id deltas
            .extend([0u16, 0]) // id range offsets
            .to_vec()
    }

    /// Assemble a cmap from (platform_id, subtable bytes) pairs.
    fn cmap_with_subtables(subtables: &[(u16, Vec<u8>)]) -> Vec<u8> {
        let mut buf = BeBuffer::new().extend([0u16, subtables.len() as u16]);
        let mut offset = 4 + subtables.len() * 8;
        for (platform, data) in subtables {
            buf = buf
                .extend([*platform, 3u16])
                .push(Offset32::new(offset as u32));
            offset += data.len();
        }
        let mut out = buf.to_vec();
        for (_, data) in subtables {
            out.extend_from_slice(data);
        }
        out
    }

    /// Assemble a font with zeroed table checksums.
    fn build_font(tables: &[(Tag, Vec<u8>)]) -> Vec<u8> {
        let mut buf = BeBuffer::new()
            .push(TT_SFNT_VERSION)
            .extend([tables.len() as u16, 0, 0, 0]);
        let mut offset = 12 + tables.len() * 16;
        for (tag, data) in tables {
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
        out
    }

    fn basic_font() -> Vec<u8> {
        build_font(&[
            (head::TAG, head_table(MAGIC_NUMBER)),
            (crate::tables::maxp::TAG, maxp_table(2)),
            (
                crate::tables::cmap::TAG,
                cmap_with_subtables(&[(0, format4_delta(-64))]),
            ),
        ])
    }

    #[test]
    fn parse_without_verification_is_clean() {
        let data = basic_font();
        let font = ParsedFont::new(&data, NO_VERIFY).unwrap();
        assert!(font.diagnostics().is_empty());
        assert_eq!(font.maxp().num_glyphs, 2);
        assert_eq!(font.map_codepoint('A'), GlyphId::new(1));
        // no outline tables: queries are no-ops rather than errors
        assert_eq!(font.outline(GlyphId::new(1)), Ok(Vec::new()));
    }

    #[test]
    fn checksum_mismatches_are_diagnostics_not_errors() {
        let data = basic_font();
        let font = ParsedFont::new(&data, ParseOptions::default()).unwrap();
        assert!(font
            .diagnostics()
            .iter()
            .any(|d| matches!(d, Diagnostic::TableChecksumMismatch { .. })));
        assert!(font
            .diagnostics()
            .iter()
            .any(|d| matches!(d, Diagnostic::FileChecksumMismatch { .. })));
        // parsing still produced a usable font
        assert_eq!(font.map_codepoint('A'), GlyphId::new(1));
    }

    #[test]
    fn missing_cmap_is_fatal() {
        let data = build_font(&[
            (head::TAG, head_table(MAGIC_NUMBER)),
            (crate::tables::maxp::TAG, maxp_table(2)),
        ]);
        assert_eq!(
            ParsedFont::new(&data, NO_VERIFY).err(),
            Some(ReadError::MissingRequiredTable(crate::tables::cmap::TAG))
        );
    }

    #[test]
    fn bad_magic_is_reported() {
        let data = build_font(&[
            (head::TAG, head_table(0)),
            (crate::tables::maxp::TAG, maxp_table(2)),
            (
                crate::tables::cmap::TAG,
                cmap_with_subtables(&[(0, format4_delta(-64))]),
            ),
        ]);
        let font = ParsedFont::new(&data, NO_VERIFY).unwrap();
        assert_eq!(font.diagnostics(), &[Diagnostic::HeadMagicMismatch(0)]);
    }

    #[test]
    fn last_unicode_subtable_wins() {
        let data = build_font(&[
            (head::TAG, head_table(MAGIC_NUMBER)),
            (crate::tables::maxp::TAG, maxp_table(100)),
            (
                crate::tables::cmap::TAG,
                cmap_with_subtables(&[
                    (0, format4_delta(-64)),
                    (3, format4_delta(-60)), // not unicode; ignored
                    (0, format4_delta(-63)),
                ]),
            ),
        ]);
        let font = ParsedFont::new(&data, NO_VERIFY).unwrap();
        assert_eq!(font.map_codepoint('A'), GlyphId::new(2));
    }

    #[test]
    fn unsupported_subtable_is_reported_and_skipped() {
        let format6 = BeBuffer::new().extend([6u16, 12, 0, 0, 0, 0]).to_vec();
        let data = build_font(&[
            (head::TAG, head_table(MAGIC_NUMBER)),
            (crate::tables::maxp::TAG, maxp_table(2)),
            (
                crate::tables::cmap::TAG,
                cmap_with_subtables(&[(0, format6), (0, format4_delta(-64))]),
            ),
        ]);
        let font = ParsedFont::new(&data, NO_VERIFY).unwrap();
        assert_eq!(
            font.diagnostics(),
            &[Diagnostic::UnsupportedCmapSubtable {
                platform_id: 0,
                encoding_id: 3,
                format: 6
            }]
        );
        assert_eq!(font.map_codepoint('A'), GlyphId::new(1));
    }

    #[test]
    fn no_unicode_subtable_is_reported() {
        let data = build_font(&[
            (head::TAG, head_table(MAGIC_NUMBER)),
            (crate::tables::maxp::TAG, maxp_table(2)),
            (
                crate::tables::cmap::TAG,
                cmap_with_subtables(&[(3, format4_delta(-64))]),
            ),
        ]);
        let font = ParsedFont::new(&data, NO_VERIFY).unwrap();
        assert_eq!(font.diagnostics(), &[Diagnostic::MissingUnicodeSubtable]);
        assert_eq!(font.map_codepoint('A'), GlyphId::NOTDEF);
    }
}
