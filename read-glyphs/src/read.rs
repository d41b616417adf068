//! Traits for interpreting font data

use bytemuck::AnyBitPattern;
use types::{BigEndian, Scalar, Tag};

use crate::font_data::FontData;

/// A type that can be read from raw table data.
///
/// This trait is implemented for tables that are self-describing: that
/// is, tables that do not require any external state in order to
/// interpret their underlying bytes. (Tables that require external
/// state implement [`FontReadWithArgs`] instead.)
pub trait FontRead<'a>: Sized {
    /// Read an instance of `Self` from the provided data, performing
    /// validation.
    ///
    /// This method is responsible for ensuring the input data is
    /// consistent: that any versioned fields are present as required by
    /// the version, and that array lengths are not out of bounds.
    fn read(data: FontData<'a>) -> Result<Self, ReadError>;
}

/// A trait for a type that needs additional arguments to be read.
pub trait ReadArgs {
    type Args: Copy;
}

/// A trait for types that require external data in order to be constructed.
///
/// Any type implementing this also has a custom `read` constructor
/// where the arguments can be passed like normal.
pub trait FontReadWithArgs<'a>: Sized + ReadArgs {
    /// Read an item, using the provided args.
    fn read_with_args(data: FontData<'a>, args: &Self::Args) -> Result<Self, ReadError>;
}

/// A marker trait for types that can be read from big-endian data
/// without copying.
///
/// This is used as a bound on [`FontData::read_array`] to ensure it is
/// only used with types that are unaligned views of raw bytes. The
/// trait is sealed; it is only implemented for `u8` and
/// [`BigEndian<T>`], both of which have an alignment of one and admit
/// any bit pattern.
pub trait FromBytes: AnyBitPattern + sealed::Sealed {}

pub(crate) mod sealed {
    pub trait Sealed {}
}

impl sealed::Sealed for u8 {}
impl FromBytes for u8 {}

impl<T: Scalar + 'static> sealed::Sealed for BigEndian<T> where T::Raw: AnyBitPattern {}
impl<T: Scalar + 'static> FromBytes for BigEndian<T> where T::Raw: AnyBitPattern {}

/// An error that occurs when reading font data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadError {
    /// An offset or length implied by the data exceeds the buffer bounds.
    OutOfBounds,
    /// The buffer does not begin with a recognized sfnt version.
    InvalidSignature(u32),
    /// The table record list extends past the end of the buffer.
    TruncatedDirectory,
    /// A table required by the decoder is not present.
    MissingRequiredTable(Tag),
    /// An unexpected format or version value.
    // i64 is flexible enough to store any value we might encounter
    InvalidFormat(i64),
    /// An array's byte length is not a multiple of its item size.
    InvalidArrayLen,
    MalformedData(&'static str),
}

impl std::fmt::Display for ReadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReadError::OutOfBounds => write!(f, "An offset was out of bounds"),
            ReadError::InvalidSignature(version) => {
                write!(f, "Invalid sfnt version 0x{version:08X}")
            }
            ReadError::TruncatedDirectory => {
                write!(f, "The table directory is truncated")
            }
            ReadError::MissingRequiredTable(tag) => write!(f, "The {tag} table is missing"),
            ReadError::InvalidFormat(x) => write!(f, "Invalid format '{x}'"),
            ReadError::InvalidArrayLen => {
                write!(f, "Specified array length not a multiple of item size")
            }
            ReadError::MalformedData(msg) => write!(f, "Malformed data: '{msg}'"),
        }
    }
}

impl std::error::Error for ReadError {}
