//! Common scalar data types used in font files.
//!
//! Font files store their data big-endian and unaligned; this crate
//! provides the cooked value types ([`Tag`], [`Fixed`], [`F2Dot14`],
//! [`GlyphId`], ...) along with the [`BigEndian`] wrapper and the
//! [`Scalar`] machinery used to decode them from raw bytes.

#![deny(rustdoc::broken_intra_doc_links)]

mod fixed;
mod glyph_id;
mod longdatetime;
mod offset;
mod point;
mod raw;
mod tag;
pub mod test_helpers;
mod version;

pub use fixed::{F2Dot14, Fixed};
pub use glyph_id::GlyphId;
pub use longdatetime::LongDateTime;
pub use offset::Offset32;
pub use point::Point;
pub use raw::{BigEndian, FixedSize, ReadScalar, Scalar};
pub use tag::Tag;
pub use version::Version16Dot16;

/// The sfnt version for fonts containing TrueType outlines.
pub const TT_SFNT_VERSION: u32 = 0x00010000;
/// The sfnt version for fonts containing CFF outlines ('OTTO').
pub const CFF_SFNT_VERSION: u32 = 0x4F54544F;
