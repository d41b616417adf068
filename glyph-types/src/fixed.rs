//! fixed-point numerical types

use std::fmt;

// shared between Fixed and F2Dot14
macro_rules! fixed_impl {
    ($name:ident, $bits:literal, $fract_bits:literal, $ty:ty, $raw:ty) => {
        #[doc = concat!(stringify!($bits), "-bit signed fixed point number with ", stringify!($fract_bits), " bits of fraction.")]
        #[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[repr(transparent)]
        pub struct $name($ty);

        impl $name {
            /// Minimum value.
            pub const MIN: Self = Self(<$ty>::MIN);

            /// Maximum value.
            pub const MAX: Self = Self(<$ty>::MAX);

            /// This type's smallest representable value.
            pub const EPSILON: Self = Self(1);

            const ONE: $ty = 1 << $fract_bits;

            /// Construct a value from its underlying bit representation.
            pub const fn from_bits(bits: $ty) -> Self {
                Self(bits)
            }

            /// The underlying bit representation.
            pub const fn to_bits(self) -> $ty {
                self.0
            }
        }

        impl crate::raw::Scalar for $name {
            type Raw = $raw;

            fn to_raw(self) -> $raw {
                self.0.to_be_bytes()
            }

            fn from_raw(raw: $raw) -> Self {
                Self(<$ty>::from_be_bytes(raw))
            }
        }

        impl crate::raw::FixedSize for $name {
            const RAW_BYTE_LEN: usize = std::mem::size_of::<$raw>();
        }
    };
}

/// impl float conversion methods.
///
/// The float type is chosen per fixed type so that all representable
/// values round-trip without error.
macro_rules! float_conv {
    ($name:ident, $to:ident, $from:ident, $ty:ty) => {
        impl $name {
            #[doc = concat!("Create a fixed point value from an ", stringify!($ty), ".")]
            ///
            /// This operation is lossy; the float is rounded to the
            /// nearest representable value.
            pub fn $from(x: $ty) -> Self {
                Self((x * Self::ONE as $ty).round() as _)
            }

            #[doc = concat!("The value as an ", stringify!($ty), ".")]
            ///
            /// This operation is lossless.
            pub fn $to(self) -> $ty {
                self.0 as $ty / Self::ONE as $ty
            }
        }

        // we can losslessly go to float, so use those fmt impls
        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                self.$to().fmt(f)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                self.$to().fmt(f)
            }
        }
    };
}

fixed_impl!(Fixed, 32, 16, i32, [u8; 4]);
fixed_impl!(F2Dot14, 16, 14, i16, [u8; 2]);
float_conv!(Fixed, to_f64, from_f64, f64);
float_conv!(F2Dot14, to_f32, from_f32, f32);
