//! a trait for things that can serve font tables

use types::Tag;

use crate::font_data::FontData;
use crate::read::{FontRead, FontReadWithArgs, ReadError};
use crate::tables;
use crate::tables::{cmap::Cmap, glyf::Glyf, head::Head, loca::Loca, maxp::Maxp};

/// An interface for accessing tables from a font (or font-like object).
pub trait TableProvider<'a> {
    fn data_for_tag(&self, tag: Tag) -> Option<FontData<'a>>;

    fn expect_data_for_tag(&self, tag: Tag) -> Result<FontData<'a>, ReadError> {
        self.data_for_tag(tag)
            .ok_or(ReadError::MissingRequiredTable(tag))
    }

    fn head(&self) -> Result<Head, ReadError> {
        self.expect_data_for_tag(tables::head::TAG)
            .and_then(FontRead::read)
    }

    fn maxp(&self) -> Result<Maxp, ReadError> {
        self.expect_data_for_tag(tables::maxp::TAG)
            .and_then(FontRead::read)
    }

    fn cmap(&self) -> Result<Cmap<'a>, ReadError> {
        self.expect_data_for_tag(tables::cmap::TAG)
            .and_then(FontRead::read)
    }

    /// `is_long` can be provided, if known; otherwise it is looked up
    /// in the font header.
    fn loca(&self, is_long: impl Into<Option<bool>>) -> Result<Loca<'a>, ReadError> {
        let is_long = match is_long.into() {
            Some(val) => val,
            None => self.head()?.long_loca_offsets(),
        };
        self.expect_data_for_tag(tables::loca::TAG)
            .and_then(|data| FontReadWithArgs::read_with_args(data, &is_long))
    }

    fn glyf(&self) -> Result<Glyf<'a>, ReadError> {
        self.expect_data_for_tag(tables::glyf::TAG)
            .and_then(FontRead::read)
    }
}
