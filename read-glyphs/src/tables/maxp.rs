//! The maxp (maximum profile) table

use types::{Tag, Version16Dot16};

use crate::font_data::FontData;
use crate::read::{FontRead, ReadError};

/// 'maxp'
pub const TAG: Tag = Tag::new(b"maxp");

/// The maximum profile table.
///
/// [`num_glyphs`](Maxp::num_glyphs) is the authoritative upper bound
/// for glyph indices in the rest of the font.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Maxp {
    pub version: Version16Dot16,
    /// The number of glyphs in the font.
    pub num_glyphs: u16,
    /// Outline complexity bounds, present only in version 1.0.
    pub bounds: Option<ProfileBounds>,
}

/// The outline complexity bounds of a version 1.0 maximum profile.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ProfileBounds {
    pub max_points: u16,
    pub max_contours: u16,
    pub max_composite_points: u16,
    pub max_composite_contours: u16,
    pub max_zones: u16,
    pub max_twilight_points: u16,
    pub max_storage: u16,
    pub max_function_defs: u16,
    pub max_instruction_defs: u16,
    pub max_stack_elements: u16,
    pub max_size_of_instructions: u16,
    pub max_component_elements: u16,
    /// Maximum nesting depth of composite glyphs.
    pub max_component_depth: u16,
}

impl<'a> FontRead<'a> for Maxp {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let version: Version16Dot16 = cursor.read()?;
        let num_glyphs = cursor.read()?;
        // only version 1.0 defines the bound fields; version 0.5 (and
        // anything unrecognized) carries the glyph count alone
        let bounds = if version == Version16Dot16::VERSION_1_0 {
            Some(ProfileBounds {
                max_points: cursor.read()?,
                max_contours: cursor.read()?,
                max_composite_points: cursor.read()?,
                max_composite_contours: cursor.read()?,
                max_zones: cursor.read()?,
                max_twilight_points: cursor.read()?,
                max_storage: cursor.read()?,
                max_function_defs: cursor.read()?,
                max_instruction_defs: cursor.read()?,
                max_stack_elements: cursor.read()?,
                max_size_of_instructions: cursor.read()?,
                max_component_elements: cursor.read()?,
                max_component_depth: cursor.read()?,
            })
        } else {
            None
        };
        Ok(Maxp {
            version,
            num_glyphs,
            bounds,
        })
    }
}
