//! The glyf (glyph data) table

use types::{BigEndian, F2Dot14, GlyphId, Point, Tag};

use crate::font_data::{Cursor, FontData};
use crate::read::{FontRead, ReadError};

/// 'glyf'
pub const TAG: Tag = Tag::new(b"glyf");

/// The glyph data table.
///
/// The table is an undifferentiated run of glyph descriptions; byte
/// ranges for individual glyphs come from the loca table.
#[derive(Clone, Copy)]
pub struct Glyf<'a>(FontData<'a>);

impl<'a> FontRead<'a> for Glyf<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        Ok(Glyf(data))
    }
}

impl<'a> Glyf<'a> {
    /// The raw table data.
    pub fn offset_data(&self) -> FontData<'a> {
        self.0
    }
}

macro_rules! flags_impl {
    ($name:ident, $ty:ty) => {
        impl $name {
            /// Returns an empty set of flags.
            pub const fn empty() -> Self {
                Self { bits: 0 }
            }

            /// The raw value of the flags currently stored.
            pub const fn bits(self) -> $ty {
                self.bits
            }

            /// Convert from the underlying representation, dropping any
            /// bits that do not correspond to a flag.
            pub const fn from_bits_truncate(bits: $ty) -> Self {
                Self {
                    bits: bits & Self::ALL.bits,
                }
            }

            /// `true` if all of the flags in `other` are contained within `self`.
            pub const fn contains(self, other: Self) -> bool {
                (self.bits & other.bits) == other.bits
            }

            /// `true` if there are flags common to both `self` and `other`.
            pub const fn intersects(self, other: Self) -> bool {
                (self.bits & other.bits) != 0
            }
        }

        impl std::ops::BitOr for $name {
            type Output = Self;

            fn bitor(self, other: Self) -> Self {
                Self {
                    bits: self.bits | other.bits,
                }
            }
        }

        impl std::ops::BitAnd for $name {
            type Output = Self;

            fn bitand(self, other: Self) -> Self {
                Self {
                    bits: self.bits & other.bits,
                }
            }
        }

        impl types::Scalar for $name {
            type Raw = <$ty as types::Scalar>::Raw;

            fn to_raw(self) -> Self::Raw {
                self.bits.to_raw()
            }

            fn from_raw(raw: Self::Raw) -> Self {
                Self::from_bits_truncate(<$ty as types::Scalar>::from_raw(raw))
            }
        }

        impl types::FixedSize for $name {
            const RAW_BYTE_LEN: usize = std::mem::size_of::<<$name as types::Scalar>::Raw>();
        }

        impl std::fmt::Debug for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                write!(f, concat!(stringify!($name), "({:#06x})"), self.bits)
            }
        }
    };
}

/// Flags describing one point of a simple glyph.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct SimpleGlyphFlags {
    bits: u8,
}

impl SimpleGlyphFlags {
    /// The point is on the curve (off-curve points are quadratic controls).
    pub const ON_CURVE_POINT: Self = Self { bits: 0x01 };
    /// The x delta is a single byte: a magnitude with a separate sign bit.
    pub const X_SHORT_VECTOR: Self = Self { bits: 0x02 };
    /// The y delta is a single byte: a magnitude with a separate sign bit.
    pub const Y_SHORT_VECTOR: Self = Self { bits: 0x04 };
    /// The next byte repeats this flag that many additional times.
    pub const REPEAT_FLAG: Self = Self { bits: 0x08 };
    /// With `X_SHORT_VECTOR`, the delta is positive; alone, the delta
    /// is omitted and x is unchanged.
    pub const X_IS_SAME_OR_POSITIVE_X_SHORT_VECTOR: Self = Self { bits: 0x10 };
    /// With `Y_SHORT_VECTOR`, the delta is positive; alone, the delta
    /// is omitted and y is unchanged.
    pub const Y_IS_SAME_OR_POSITIVE_Y_SHORT_VECTOR: Self = Self { bits: 0x20 };
    /// Contours in this glyph may overlap.
    pub const OVERLAP_SIMPLE: Self = Self { bits: 0x40 };

    const ALL: Self = Self { bits: 0x7F };
}

flags_impl!(SimpleGlyphFlags, u8);

/// Flags describing one component of a composite glyph.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct CompositeGlyphFlags {
    bits: u16,
}

impl CompositeGlyphFlags {
    /// The arguments are 16-bit; otherwise they are bytes.
    pub const ARG_1_AND_2_ARE_WORDS: Self = Self { bits: 0x0001 };
    /// The arguments are x/y offsets; otherwise they are point numbers
    /// to be matched.
    pub const ARGS_ARE_XY_VALUES: Self = Self { bits: 0x0002 };
    /// Round the offset to the pixel grid when rendering hinted.
    pub const ROUND_XY_TO_GRID: Self = Self { bits: 0x0004 };
    /// A single uniform scale follows the arguments.
    pub const WE_HAVE_A_SCALE: Self = Self { bits: 0x0008 };
    /// At least one more component follows this one.
    pub const MORE_COMPONENTS: Self = Self { bits: 0x0020 };
    /// Independent x and y scales follow the arguments.
    pub const WE_HAVE_AN_X_AND_Y_SCALE: Self = Self { bits: 0x0040 };
    /// A full 2x2 matrix follows the arguments.
    pub const WE_HAVE_A_TWO_BY_TWO: Self = Self { bits: 0x0080 };
    /// Instructions follow the last component.
    pub const WE_HAVE_INSTRUCTIONS: Self = Self { bits: 0x0100 };
    /// Use this component's metrics for the composite.
    pub const USE_MY_METRICS: Self = Self { bits: 0x0200 };
    /// Component outlines may overlap.
    pub const OVERLAP_COMPOUND: Self = Self { bits: 0x0400 };
    /// The offset is in the component's transformed coordinate space.
    pub const SCALED_COMPONENT_OFFSET: Self = Self { bits: 0x0800 };
    /// The offset is in the composite's coordinate space.
    pub const UNSCALED_COMPONENT_OFFSET: Self = Self { bits: 0x1000 };

    const ALL: Self = Self { bits: 0x1FEF };
}

flags_impl!(CompositeGlyphFlags, u16);

/// Either a simple or composite glyph.
#[derive(Clone)]
pub enum Glyph<'a> {
    Simple(SimpleGlyph<'a>),
    Composite(CompositeGlyph<'a>),
}

macro_rules! field_getter {
    ($field:ident, $ty:ty) => {
        pub fn $field(&self) -> $ty {
            match self {
                Self::Simple(glyph) => glyph.$field(),
                Self::Composite(glyph) => glyph.$field(),
            }
        }
    };
}

impl<'a> Glyph<'a> {
    field_getter!(number_of_contours, i16);
    field_getter!(x_min, i16);
    field_getter!(y_min, i16);
    field_getter!(x_max, i16);
    field_getter!(y_max, i16);
}

impl<'a> FontRead<'a> for Glyph<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let number_of_contours: i16 = data.read_at(0)?;
        if number_of_contours < 0 {
            CompositeGlyph::read(data).map(Glyph::Composite)
        } else {
            SimpleGlyph::read(data).map(Glyph::Simple)
        }
    }
}

macro_rules! header_getters {
    () => {
        /// The number of contours; negative for composite glyphs.
        pub fn number_of_contours(&self) -> i16 {
            self.number_of_contours
        }

        /// Minimum x of the glyph bounding box, in design units.
        pub fn x_min(&self) -> i16 {
            self.x_min
        }

        /// Minimum y of the glyph bounding box, in design units.
        pub fn y_min(&self) -> i16 {
            self.y_min
        }

        /// Maximum x of the glyph bounding box, in design units.
        pub fn x_max(&self) -> i16 {
            self.x_max
        }

        /// Maximum y of the glyph bounding box, in design units.
        pub fn y_max(&self) -> i16 {
            self.y_max
        }
    };
}

/// A glyph defined directly by contours of points.
#[derive(Clone)]
pub struct SimpleGlyph<'a> {
    number_of_contours: i16,
    x_min: i16,
    y_min: i16,
    x_max: i16,
    y_max: i16,
    end_pts_of_contours: &'a [BigEndian<u16>],
    instructions: &'a [u8],
    glyph_data: FontData<'a>,
}

impl<'a> FontRead<'a> for SimpleGlyph<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let number_of_contours: i16 = cursor.read()?;
        if number_of_contours < 0 {
            return Err(ReadError::MalformedData("expected a simple glyph"));
        }
        let x_min = cursor.read()?;
        let y_min = cursor.read()?;
        let x_max = cursor.read()?;
        let y_max = cursor.read()?;
        let end_pts_of_contours = cursor.read_array(number_of_contours as usize)?;
        let instruction_length: u16 = cursor.read()?;
        let instructions = cursor.read_array(instruction_length as usize)?;
        let glyph_data = data.split_off(cursor.position()?).unwrap_or_default();
        Ok(SimpleGlyph {
            number_of_contours,
            x_min,
            y_min,
            x_max,
            y_max,
            end_pts_of_contours,
            instructions,
            glyph_data,
        })
    }
}

impl<'a> SimpleGlyph<'a> {
    header_getters!();

    /// The point index at which each contour ends; strictly increasing.
    pub fn end_pts_of_contours(&self) -> &'a [BigEndian<u16>] {
        self.end_pts_of_contours
    }

    /// The hinting instructions. Not interpreted by this crate.
    pub fn instructions(&self) -> &'a [u8] {
        self.instructions
    }

    /// The total number of points.
    pub fn num_points(&self) -> usize {
        self.end_pts_of_contours
            .last()
            .map(|last| last.get() as usize + 1)
            .unwrap_or(0)
    }

    /// Read points and flags into the provided buffers.
    ///
    /// Coordinates are absolute design units, accumulated from the
    /// delta streams; the running total spans the whole glyph and
    /// starts at (0, 0). All flag bits except on-curve are dropped.
    /// Both buffer lengths must equal [`num_points`](Self::num_points).
    pub fn read_points_fast(
        &self,
        points: &mut [Point<i32>],
        flags: &mut [u8],
    ) -> Result<(), ReadError> {
        let n_points = self.num_points();
        if points.len() != n_points || flags.len() != n_points {
            return Err(ReadError::InvalidArrayLen);
        }
        let mut cursor = self.glyph_data.cursor();
        let mut i = 0;
        while i < n_points {
            let flag: SimpleGlyphFlags = cursor.read()?;
            if flag.contains(SimpleGlyphFlags::REPEAT_FLAG) {
                let count = (cursor.read::<u8>()? as usize + 1).min(n_points - i);
                for dest in &mut flags[i..i + count] {
                    *dest = flag.bits();
                }
                i += count;
            } else {
                flags[i] = flag.bits();
                i += 1;
            }
        }
        let mut x = 0i32;
        for (&flag_bits, point) in flags.iter().zip(points.iter_mut()) {
            let flag = SimpleGlyphFlags::from_bits_truncate(flag_bits);
            let mut delta = 0i32;
            if flag.contains(SimpleGlyphFlags::X_SHORT_VECTOR) {
                delta = cursor.read::<u8>()? as i32;
                if !flag.contains(SimpleGlyphFlags::X_IS_SAME_OR_POSITIVE_X_SHORT_VECTOR) {
                    delta = -delta;
                }
            } else if !flag.contains(SimpleGlyphFlags::X_IS_SAME_OR_POSITIVE_X_SHORT_VECTOR) {
                delta = cursor.read::<i16>()? as i32;
            }
            x = x.wrapping_add(delta);
            point.x = x;
        }
        let mut y = 0i32;
        for (flag_bits, point) in flags.iter_mut().zip(points.iter_mut()) {
            let flag = SimpleGlyphFlags::from_bits_truncate(*flag_bits);
            let mut delta = 0i32;
            if flag.contains(SimpleGlyphFlags::Y_SHORT_VECTOR) {
                delta = cursor.read::<u8>()? as i32;
                if !flag.contains(SimpleGlyphFlags::Y_IS_SAME_OR_POSITIVE_Y_SHORT_VECTOR) {
                    delta = -delta;
                }
            } else if !flag.contains(SimpleGlyphFlags::Y_IS_SAME_OR_POSITIVE_Y_SHORT_VECTOR) {
                delta = cursor.read::<i16>()? as i32;
            }
            y = y.wrapping_add(delta);
            point.y = y;
            // only the on-curve bit survives
            *flag_bits &= SimpleGlyphFlags::ON_CURVE_POINT.bits();
        }
        Ok(())
    }
}

/// A glyph assembled by referencing other glyphs.
#[derive(Clone)]
pub struct CompositeGlyph<'a> {
    number_of_contours: i16,
    x_min: i16,
    y_min: i16,
    x_max: i16,
    y_max: i16,
    component_data: FontData<'a>,
}

impl<'a> FontRead<'a> for CompositeGlyph<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let number_of_contours: i16 = cursor.read()?;
        if number_of_contours >= 0 {
            return Err(ReadError::MalformedData("expected a composite glyph"));
        }
        let x_min = cursor.read()?;
        let y_min = cursor.read()?;
        let x_max = cursor.read()?;
        let y_max = cursor.read()?;
        let component_data = data.split_off(cursor.position()?).unwrap_or_default();
        Ok(CompositeGlyph {
            number_of_contours,
            x_min,
            y_min,
            x_max,
            y_max,
            component_data,
        })
    }
}

impl<'a> CompositeGlyph<'a> {
    header_getters!();

    /// An iterator over the components of the composite glyph.
    pub fn components(&self) -> ComponentIter<'a> {
        ComponentIter {
            cur_flags: CompositeGlyphFlags::empty(),
            done: false,
            cursor: self.component_data.cursor(),
        }
    }

    /// The hinting instructions, present only when the last component
    /// sets [`CompositeGlyphFlags::WE_HAVE_INSTRUCTIONS`]. Not
    /// interpreted by this crate.
    pub fn instructions(&self) -> Option<&'a [u8]> {
        let mut iter = self.components();
        while iter.next().is_some() {}
        if iter
            .cur_flags
            .contains(CompositeGlyphFlags::WE_HAVE_INSTRUCTIONS)
        {
            let len = iter.cursor.read::<u16>().ok()? as usize;
            iter.cursor.read_array(len).ok()
        } else {
            None
        }
    }
}

/// The scale/rotation portion of a component's transform.
#[derive(Clone, Debug, PartialEq)]
pub struct Transform {
    /// X scale factor.
    pub xx: F2Dot14,
    /// YX skew factor.
    pub yx: F2Dot14,
    /// XY skew factor.
    pub xy: F2Dot14,
    /// Y scale factor.
    pub yy: F2Dot14,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            xx: F2Dot14::from_f32(1.0),
            yx: F2Dot14::from_f32(0.0),
            xy: F2Dot14::from_f32(0.0),
            yy: F2Dot14::from_f32(1.0),
        }
    }
}

/// A reference to another glyph. Part of [`CompositeGlyph`].
#[derive(Clone, Debug, PartialEq)]
pub struct Component {
    /// Component flags.
    pub flags: CompositeGlyphFlags,
    /// The referenced glyph.
    pub glyph: GlyphId,
    /// Anchor for component placement.
    pub anchor: Anchor,
    /// Component transformation matrix.
    pub transform: Transform,
}

/// Anchor position for a composite component.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Anchor {
    /// An offset added directly to the component's points.
    Offset { x: i16, y: i16 },
    /// Match a point of this component to a point already placed.
    Point { base: u16, component: u16 },
}

/// An iterator over the [`Component`]s of a composite glyph.
#[derive(Clone)]
pub struct ComponentIter<'a> {
    cur_flags: CompositeGlyphFlags,
    done: bool,
    cursor: Cursor<'a>,
}

impl Iterator for ComponentIter<'_> {
    type Item = Component;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let flags: CompositeGlyphFlags = self.cursor.read().ok()?;
        self.cur_flags = flags;
        let glyph = self.cursor.read::<GlyphId>().ok()?;
        let args_are_words = flags.contains(CompositeGlyphFlags::ARG_1_AND_2_ARE_WORDS);
        let args_are_xy_values = flags.contains(CompositeGlyphFlags::ARGS_ARE_XY_VALUES);
        let anchor = match (args_are_xy_values, args_are_words) {
            (true, true) => Anchor::Offset {
                x: self.cursor.read().ok()?,
                y: self.cursor.read().ok()?,
            },
            (true, false) => Anchor::Offset {
                x: self.cursor.read::<i8>().ok()? as _,
                y: self.cursor.read::<i8>().ok()? as _,
            },
            (false, true) => Anchor::Point {
                base: self.cursor.read().ok()?,
                component: self.cursor.read().ok()?,
            },
            (false, false) => Anchor::Point {
                base: self.cursor.read::<u8>().ok()? as _,
                component: self.cursor.read::<u8>().ok()? as _,
            },
        };
        let mut transform = Transform::default();
        if flags.contains(CompositeGlyphFlags::WE_HAVE_A_SCALE) {
            transform.xx = self.cursor.read().ok()?;
            transform.yy = transform.xx;
        } else if flags.contains(CompositeGlyphFlags::WE_HAVE_AN_X_AND_Y_SCALE) {
            transform.xx = self.cursor.read().ok()?;
            transform.yy = self.cursor.read().ok()?;
        } else if flags.contains(CompositeGlyphFlags::WE_HAVE_A_TWO_BY_TWO) {
            transform.xx = self.cursor.read().ok()?;
            transform.yx = self.cursor.read().ok()?;
            transform.xy = self.cursor.read().ok()?;
            transform.yy = self.cursor.read().ok()?;
        }
        self.done = !flags.contains(CompositeGlyphFlags::MORE_COMPONENTS);

        Some(Component {
            flags,
            glyph,
            anchor,
            transform,
        })
    }
}
