//! The head (font header) table

use types::{Fixed, LongDateTime, Tag};

use crate::font_data::FontData;
use crate::read::{FontRead, ReadError};

/// 'head'
pub const TAG: Tag = Tag::new(b"head");

/// The value every font header is required to store in
/// [`magic_number`](Head::magic_number).
pub const MAGIC_NUMBER: u32 = 0x5F0F3CF5;

/// The font header table.
///
/// Fields appear in file order; the whole table is a fixed 54 bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Head {
    /// Major version number of the font header table, set to 1.
    pub major_version: u16,
    /// Minor version number of the font header table, set to 0.
    pub minor_version: u16,
    /// Set by the font manufacturer.
    pub font_revision: Fixed,
    /// Makes the checksum of the entire file come out to a fixed
    /// constant; ignored for fonts embedded in collection files.
    pub checksum_adjustment: u32,
    /// Must be [`MAGIC_NUMBER`].
    pub magic_number: u32,
    pub flags: u16,
    /// Design units per em, 16..=16384.
    pub units_per_em: u16,
    pub created: LongDateTime,
    pub modified: LongDateTime,
    /// Minimum x coordinate across all glyph bounding boxes.
    pub x_min: i16,
    /// Minimum y coordinate across all glyph bounding boxes.
    pub y_min: i16,
    /// Maximum x coordinate across all glyph bounding boxes.
    pub x_max: i16,
    /// Maximum y coordinate across all glyph bounding boxes.
    pub y_max: i16,
    pub mac_style: u16,
    /// Smallest readable size, in pixels.
    pub lowest_rec_ppem: u16,
    /// Deprecated; set to 2.
    pub font_direction_hint: i16,
    /// 0 for short loca offsets, 1 for long.
    pub index_to_loc_format: i16,
    /// 0 for the current glyph data format.
    pub glyph_data_format: i16,
}

impl Head {
    /// `true` if the loca table stores 32-bit offsets.
    pub fn long_loca_offsets(&self) -> bool {
        self.index_to_loc_format == 1
    }
}

impl<'a> FontRead<'a> for Head {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        Ok(Head {
            major_version: cursor.read()?,
            minor_version: cursor.read()?,
            font_revision: cursor.read()?,
            checksum_adjustment: cursor.read()?,
            magic_number: cursor.read()?,
            flags: cursor.read()?,
            units_per_em: cursor.read()?,
            created: cursor.read()?,
            modified: cursor.read()?,
            x_min: cursor.read()?,
            y_min: cursor.read()?,
            x_max: cursor.read()?,
            y_max: cursor.read()?,
            mac_style: cursor.read()?,
            lowest_rec_ppem: cursor.read()?,
            font_direction_hint: cursor.read()?,
            index_to_loc_format: cursor.read()?,
            glyph_data_format: cursor.read()?,
        })
    }
}
