//! The table directory at the start of a font file.

use types::{Tag, CFF_SFNT_VERSION, TT_SFNT_VERSION};

use crate::font_data::FontData;
use crate::read::{FontRead, ReadError};

/// The number of bytes occupied by one [`TableRecord`].
const TABLE_RECORD_LEN: usize = 16;

/// The first bytes of a font file: the offset table followed by one
/// record per table, in file order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDirectory {
    pub sfnt_version: u32,
    pub num_tables: u16,
    pub search_range: u16,
    pub entry_selector: u16,
    pub range_shift: u16,
    table_records: Vec<TableRecord>,
}

/// One record in the table directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableRecord {
    /// Table identifier.
    pub tag: Tag,
    /// Checksum of the table data.
    pub checksum: u32,
    /// Offset of the table from the beginning of the font data, in bytes.
    pub offset: u32,
    /// Length of the table, in bytes.
    pub length: u32,
}

impl TableDirectory {
    /// The table records, in file order.
    pub fn table_records(&self) -> &[TableRecord] {
        &self.table_records
    }

    /// The first record with the given tag, scanning in file order.
    ///
    /// Tags are not guaranteed unique; duplicates after the first are
    /// never consulted.
    pub fn find_record(&self, tag: Tag) -> Option<&TableRecord> {
        self.table_records.iter().find(|record| record.tag == tag)
    }
}

impl<'a> FontRead<'a> for TableDirectory {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let sfnt_version: u32 = cursor.read()?;
        if sfnt_version != TT_SFNT_VERSION && sfnt_version != CFF_SFNT_VERSION {
            return Err(ReadError::InvalidSignature(sfnt_version));
        }
        let num_tables: u16 = cursor.read()?;
        let search_range = cursor.read()?;
        let entry_selector = cursor.read()?;
        let range_shift = cursor.read()?;
        let mut table_records = Vec::with_capacity(num_tables as usize);
        for _ in 0..num_tables {
            if cursor.remaining_bytes() < TABLE_RECORD_LEN {
                return Err(ReadError::TruncatedDirectory);
            }
            table_records.push(TableRecord {
                tag: cursor.read()?,
                checksum: cursor.read()?,
                offset: cursor.read()?,
                length: cursor.read()?,
            });
        }
        Ok(TableDirectory {
            sfnt_version,
            num_tables,
            search_range,
            entry_selector,
            range_shift,
            table_records,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::test_helpers::BeBuffer;

    fn directory_header(sfnt_version: u32, num_tables: u16) -> BeBuffer {
        BeBuffer::new()
            .push(sfnt_version)
            .push(num_tables)
            .extend([16u16, 0, 0]) // search_range etc, unused when reading
    }

    #[test]
    fn one_record() {
        let buf = directory_header(TT_SFNT_VERSION, 1)
            .push(Tag::new(b"head"))
            .extend([0u32, 12 + 16, 54]);
        let directory = TableDirectory::read(FontData::new(&buf)).unwrap();
        assert_eq!(directory.num_tables, 1);
        let record = directory.find_record(Tag::new(b"head")).unwrap();
        assert_eq!(record.offset, 28);
        assert_eq!(record.length, 54);
        assert!(directory.find_record(Tag::new(b"maxp")).is_none());
    }

    #[test]
    fn first_match_wins_for_duplicate_tags() {
        let buf = directory_header(TT_SFNT_VERSION, 2)
            .push(Tag::new(b"glyf"))
            .extend([0u32, 100, 8])
            .push(Tag::new(b"glyf"))
            .extend([0u32, 200, 8]);
        let directory = TableDirectory::read(FontData::new(&buf)).unwrap();
        assert_eq!(directory.find_record(Tag::new(b"glyf")).unwrap().offset, 100);
    }

    #[test]
    fn rejects_unknown_signature() {
        let buf = directory_header(0xDEADBEEF, 0);
        assert_eq!(
            TableDirectory::read(FontData::new(&buf)),
            Err(ReadError::InvalidSignature(0xDEADBEEF))
        );
    }

    #[test]
    fn rejects_truncated_record_list() {
        // claims two tables but only has bytes for one record
        let buf = directory_header(TT_SFNT_VERSION, 2)
            .push(Tag::new(b"head"))
            .extend([0u32, 28, 54]);
        assert_eq!(
            TableDirectory::read(FontData::new(&buf)),
            Err(ReadError::TruncatedDirectory)
        );
    }
}
