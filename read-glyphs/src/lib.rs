//! Reading OpenType glyph data.
//!
//! This crate parses the slice of an OpenType/TrueType font that a
//! glyph renderer needs: the table directory, the `head`, `maxp`,
//! `cmap` (format 4), `loca` and `glyf` tables, and a decoder that
//! turns glyph descriptions into contours of control points.
//!
//! It performs no I/O: callers load the file however they like and hand
//! in a byte slice. Parsing borrows from that slice and allocates only
//! where a table is genuinely list-shaped (the table directory, cmap
//! encoding records, decoded outlines).
//!
//! # Example
//!
//! ```no_run
//! use read_glyphs::{ParseOptions, ParsedFont};
//! # let font_bytes: Vec<u8> = Vec::new();
//! let font = ParsedFont::new(&font_bytes, ParseOptions::default()).expect("failed to parse");
//! let gid = font.map_codepoint('A');
//! for outline in font.outline(gid).expect("bad glyph data") {
//!     println!("contour ends: {:?}", outline.contour_ends);
//! }
//! ```

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

mod checksum;
mod font;
mod font_data;
pub mod outline;
mod read;
mod table_directory;
mod table_provider;
pub mod tables;

pub use checksum::{checksum, CHECKSUM_ADJUSTMENT_BASE};
pub use font::{Diagnostic, ParseOptions, ParsedFont};
pub use font_data::FontData;
pub use outline::{Outline, OutlineDecoder, OutlineError};
pub use read::{FontRead, FontReadWithArgs, FromBytes, ReadArgs, ReadError};
pub use table_directory::{TableDirectory, TableRecord};
pub use table_provider::TableProvider;

/// Public re-export of the scalar types crate.
pub extern crate glyph_types as types;

use types::Tag;

/// Reference to an in-memory font.
///
/// This is a simple implementation of the [`TableProvider`] trait
/// backed by a borrowed slice containing font data.
#[derive(Clone)]
pub struct FontRef<'a> {
    data: FontData<'a>,
    pub table_directory: TableDirectory,
}

impl<'a> FontRef<'a> {
    /// Creates a new reference to an in-memory font backed by the given
    /// data.
    ///
    /// The data must begin with a table directory carrying a recognized
    /// signature to be considered valid.
    pub fn new(data: &'a [u8]) -> Result<Self, ReadError> {
        let data = FontData::new(data);
        let table_directory = TableDirectory::read(data)?;
        Ok(FontRef {
            data,
            table_directory,
        })
    }

    /// Returns the underlying font data.
    pub fn data(&self) -> FontData<'a> {
        self.data
    }

    /// Returns the data for the table with the specified tag, if present.
    ///
    /// Returns `None` for tables whose recorded range falls outside the
    /// font data.
    pub fn table_data(&self, tag: Tag) -> Option<FontData<'a>> {
        self.table_directory.find_record(tag).and_then(|record| {
            let start = record.offset as usize;
            let end = start.checked_add(record.length as usize)?;
            self.data.slice(start..end)
        })
    }
}

impl<'a> TableProvider<'a> for FontRef<'a> {
    fn data_for_tag(&self, tag: Tag) -> Option<FontData<'a>> {
        self.table_data(tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::test_helpers::BeBuffer;
    use types::TT_SFNT_VERSION;

    #[test]
    fn table_data_respects_bounds() {
        let buf = BeBuffer::new()
            .push(TT_SFNT_VERSION)
            .extend([2u16, 0, 0, 0]) // two tables
            .push(Tag::new(b"aaaa"))
            .extend([0u32, 44, 4])
            .push(Tag::new(b"bbbb"))
            .extend([0u32, 50, 4]) // extends one byte past the end
            .extend([1u32, 0xDEAD_BEEF_u32])
            .push(0u8);
        let font = FontRef::new(&buf).unwrap();
        assert_eq!(
            font.table_data(Tag::new(b"aaaa")).unwrap().as_bytes(),
            &[0, 0, 0, 1]
        );
        assert!(font.table_data(Tag::new(b"bbbb")).is_none());
        assert!(font.table_data(Tag::new(b"cccc")).is_none());
    }

    #[test]
    fn rejects_non_font_data() {
        assert!(matches!(
            FontRef::new(b"NOT_A_FONT"),
            Err(ReadError::InvalidSignature(_))
        ));
    }
}
