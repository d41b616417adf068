//! The loca (index to location) table

use types::{BigEndian, GlyphId, Tag};

use crate::font_data::FontData;
use crate::read::{FontRead, FontReadWithArgs, ReadArgs, ReadError};
use crate::tables::glyf::{Glyf, Glyph};

/// 'loca'
pub const TAG: Tag = Tag::new(b"loca");

/// The index-to-location table.
///
/// Entry `i` holds the byte offset of glyph `i` within the glyf table;
/// the entry after it marks where that glyph's data ends. A glyph whose
/// two offsets are equal has no outline (a space, for instance).
#[derive(Clone)]
pub enum Loca<'a> {
    /// Offsets stored as u16s holding half the real value (format 0).
    Short(&'a [BigEndian<u16>]),
    /// Offsets stored directly as u32s (format 1).
    Long(&'a [BigEndian<u32>]),
}

impl<'a> Loca<'a> {
    /// Read a loca table; the offset width comes from
    /// `head.index_to_loc_format`.
    pub fn read(data: FontData<'a>, is_long: bool) -> Result<Self, ReadError> {
        Self::read_with_args(data, &is_long)
    }

    /// The number of glyphs this table covers.
    pub fn len(&self) -> usize {
        match self {
            Loca::Short(data) => data.len().saturating_sub(1),
            Loca::Long(data) => data.len().saturating_sub(1),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The byte offset of glyph `idx` within the glyf table.
    pub fn get_raw(&self, idx: usize) -> Option<u32> {
        match self {
            Loca::Short(data) => data.get(idx).map(|off| off.get() as u32 * 2),
            Loca::Long(data) => data.get(idx).map(|off| off.get()),
        }
    }

    /// Resolve and read the glyph for `gid`.
    ///
    /// Returns `Ok(None)` for glyphs with no outline data.
    pub fn get_glyf(&self, gid: GlyphId, glyf: &Glyf<'a>) -> Result<Option<Glyph<'a>>, ReadError> {
        let idx = gid.to_u32() as usize;
        let start = self.get_raw(idx).ok_or(ReadError::OutOfBounds)?;
        let end = self.get_raw(idx + 1).ok_or(ReadError::OutOfBounds)?;
        if start == end {
            return Ok(None);
        }
        let data = glyf
            .offset_data()
            .slice(start as usize..end as usize)
            .ok_or(ReadError::OutOfBounds)?;
        Glyph::read(data).map(Some)
    }
}

impl ReadArgs for Loca<'_> {
    type Args = bool;
}

impl<'a> FontReadWithArgs<'a> for Loca<'a> {
    fn read_with_args(data: FontData<'a>, args: &Self::Args) -> Result<Self, ReadError> {
        let is_long = *args;
        if is_long {
            data.read_array(0..data.len()).map(Loca::Long)
        } else {
            data.read_array(0..data.len()).map(Loca::Short)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::test_helpers::BeBuffer;

    #[test]
    fn short_offsets_are_doubled() {
        let buf = BeBuffer::new().extend([0u16, 13, 26]);
        let loca = Loca::read(FontData::new(&buf), false).unwrap();
        assert_eq!(loca.len(), 2);
        assert_eq!(loca.get_raw(0), Some(0));
        assert_eq!(loca.get_raw(1), Some(26));
        assert_eq!(loca.get_raw(2), Some(52));
        assert_eq!(loca.get_raw(3), None);
    }

    #[test]
    fn long_offsets() {
        let buf = BeBuffer::new().extend([0u32, 21, 21]);
        let loca = Loca::read(FontData::new(&buf), true).unwrap();
        assert_eq!(loca.get_raw(1), Some(21));
        // adjacent equal offsets mean glyph 1 has no outline
        assert_eq!(loca.get_raw(1), loca.get_raw(2));
    }

    #[test]
    fn empty_glyph_is_not_an_error() {
        let loca_data = BeBuffer::new().extend([0u16, 0, 0]);
        let loca = Loca::read(FontData::new(&loca_data), false).unwrap();
        let glyf = Glyf::read(FontData::new(&[])).unwrap();
        assert!(loca
            .get_glyf(GlyphId::new(0), &glyf)
            .unwrap()
            .is_none());
    }

    #[test]
    fn out_of_range_gid_errors() {
        let loca_data = BeBuffer::new().extend([0u16, 0]);
        let loca = Loca::read(FontData::new(&loca_data), false).unwrap();
        let glyf = Glyf::read(FontData::new(&[])).unwrap();
        assert!(matches!(
            loca.get_glyf(GlyphId::new(1), &glyf),
            Err(ReadError::OutOfBounds)
        ));
    }
}
