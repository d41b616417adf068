//! The cmap (character to glyph index mapping) table

use types::{BigEndian, GlyphId, Offset32, Tag};

use crate::font_data::FontData;
use crate::read::{FontRead, ReadError};

/// 'cmap'
pub const TAG: Tag = Tag::new(b"cmap");

/// The platform of an encoding record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u16)]
pub enum PlatformId {
    Unicode = 0,
    Macintosh = 1,
    Iso = 2,
    Windows = 3,
    Custom = 4,
}

impl PlatformId {
    /// The platform for a raw id, or `None` if the id is unrecognized.
    pub fn new(raw: u16) -> Option<PlatformId> {
        match raw {
            0 => Some(Self::Unicode),
            1 => Some(Self::Macintosh),
            2 => Some(Self::Iso),
            3 => Some(Self::Windows),
            4 => Some(Self::Custom),
            _ => None,
        }
    }
}

/// Identifies one character-map subtable within the cmap table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EncodingRecord {
    pub platform_id: u16,
    pub encoding_id: u16,
    /// Offset of the subtable from the start of the cmap table.
    pub subtable_offset: Offset32,
}

impl EncodingRecord {
    /// The record's platform, if recognized.
    pub fn platform(&self) -> Option<PlatformId> {
        PlatformId::new(self.platform_id)
    }
}

/// The character to glyph index mapping table.
#[derive(Clone)]
pub struct Cmap<'a> {
    data: FontData<'a>,
    pub version: u16,
    encoding_records: Vec<EncodingRecord>,
}

impl<'a> FontRead<'a> for Cmap<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let version = cursor.read()?;
        let num_tables: u16 = cursor.read()?;
        let mut encoding_records = Vec::with_capacity(num_tables as usize);
        for _ in 0..num_tables {
            encoding_records.push(EncodingRecord {
                platform_id: cursor.read()?,
                encoding_id: cursor.read()?,
                subtable_offset: cursor.read()?,
            });
        }
        Ok(Cmap {
            data,
            version,
            encoding_records,
        })
    }
}

impl<'a> Cmap<'a> {
    /// The encoding records, in file order.
    pub fn encoding_records(&self) -> &[EncodingRecord] {
        &self.encoding_records
    }

    /// Parse the subtable identified by `record`.
    pub fn subtable(&self, record: &EncodingRecord) -> Result<CmapSubtable<'a>, ReadError> {
        let data = self
            .data
            .split_off(record.subtable_offset.to_usize())
            .ok_or(ReadError::OutOfBounds)?;
        CmapSubtable::read(data)
    }
}

/// A cmap subtable, discriminated by its leading format word.
#[derive(Clone)]
pub enum CmapSubtable<'a> {
    Format4(Cmap4<'a>),
    /// A format this crate does not interpret; the value is the format.
    Other(u16),
}

impl<'a> FontRead<'a> for CmapSubtable<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let format: u16 = data.read_at(0)?;
        match format {
            4 => Cmap4::read(data).map(CmapSubtable::Format4),
            other => Ok(CmapSubtable::Other(other)),
        }
    }
}

/// A format 4 subtable: a segmented mapping of the basic multilingual
/// plane.
///
/// Codepoints are covered by segments sorted by ascending end code; a
/// segment either maps a contiguous range through a delta or indexes
/// into the trailing glyph id array.
#[derive(Clone)]
pub struct Cmap4<'a> {
    pub length: u16,
    pub language: u16,
    end_code: &'a [BigEndian<u16>],
    start_code: &'a [BigEndian<u16>],
    id_delta: &'a [BigEndian<i16>],
    id_range_offsets: &'a [BigEndian<u16>],
    glyph_id_array: &'a [BigEndian<u16>],
}

impl<'a> FontRead<'a> for Cmap4<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let format: u16 = cursor.read()?;
        if format != 4 {
            return Err(ReadError::InvalidFormat(format as i64));
        }
        let length: u16 = cursor.read()?;
        let language = cursor.read()?;
        let seg_count_x2: u16 = cursor.read()?;
        let _search_range: u16 = cursor.read()?;
        let _entry_selector: u16 = cursor.read()?;
        let _range_shift: u16 = cursor.read()?;
        let seg_count = (seg_count_x2 / 2) as usize;
        let end_code = cursor.read_array(seg_count)?;
        let _reserved_pad: u16 = cursor.read()?;
        let start_code = cursor.read_array(seg_count)?;
        let id_delta = cursor.read_array(seg_count)?;
        let id_range_offsets = cursor.read_array(seg_count)?;
        // whatever remains inside the declared length is the glyph id array
        let pos = cursor.position()?;
        let end = (length as usize).min(data.len()).max(pos);
        let array_len = (end - pos) / 2;
        let glyph_id_array = data.read_array(pos..pos + array_len * 2)?;
        Ok(Cmap4 {
            length,
            language,
            end_code,
            start_code,
            id_delta,
            id_range_offsets,
            glyph_id_array,
        })
    }
}

impl<'a> Cmap4<'a> {
    /// The number of segments in the mapping.
    pub fn seg_count(&self) -> usize {
        self.end_code.len()
    }

    pub fn end_code(&self) -> &'a [BigEndian<u16>] {
        self.end_code
    }

    pub fn start_code(&self) -> &'a [BigEndian<u16>] {
        self.start_code
    }

    pub fn id_delta(&self) -> &'a [BigEndian<i16>] {
        self.id_delta
    }

    pub fn id_range_offsets(&self) -> &'a [BigEndian<u16>] {
        self.id_range_offsets
    }

    /// Map a codepoint to a glyph identifier.
    ///
    /// This is a pure function of the codepoint: unmapped codepoints,
    /// gaps between segments and codepoints outside the basic
    /// multilingual plane all produce [`GlyphId::NOTDEF`].
    pub fn map_codepoint(&self, codepoint: impl Into<u32>) -> GlyphId {
        let codepoint = codepoint.into();
        if codepoint > 0xFFFF {
            log::warn!("codepoint {codepoint:#x} is not representable in a format 4 subtable");
            return GlyphId::NOTDEF;
        }
        let codepoint = codepoint as u16;
        // scan in file order; end codes ascend, so the first segment
        // whose end code is large enough is the only candidate
        for (index, end_code) in self.end_code.iter().enumerate() {
            if end_code.get() >= codepoint {
                return self.lookup_glyph_id(codepoint, index);
            }
        }
        GlyphId::NOTDEF
    }

    /// The final phase of glyph id lookup, for the segment at `index`.
    fn lookup_glyph_id(&self, codepoint: u16, index: usize) -> GlyphId {
        let Some(start_code) = self.start_code.get(index).map(|code| code.get()) else {
            return GlyphId::NOTDEF;
        };
        if start_code > codepoint {
            // the codepoint falls in a gap before this segment
            return GlyphId::NOTDEF;
        }
        let delta = self.id_delta.get(index).map(|delta| delta.get() as i32).unwrap_or(0);
        let range_offset = self
            .id_range_offsets
            .get(index)
            .map(|off| off.get() as usize)
            .unwrap_or(0);
        if range_offset == 0 {
            return GlyphId::new((codepoint as i32 + delta).rem_euclid(65536) as u16);
        }
        // the range offset is relative to its own position in the
        // offsets array, which sits directly before the glyph id array
        let mut offset = range_offset / 2 + (codepoint - start_code) as usize;
        offset = offset.saturating_sub(self.id_range_offsets.len() - index);
        match self.glyph_id_array.get(offset).map(|gid| gid.get()) {
            Some(gid) if gid != 0 => GlyphId::new((gid as i32 + delta).rem_euclid(65536) as u16),
            _ => GlyphId::NOTDEF,
        }
    }
}
