//! types for working with raw big-endian bytes

/// A trait for font scalars.
///
/// This is an internal trait for encoding and decoding big-endian bytes.
///
/// You do not need to implement this trait directly; it is an
/// implementation detail of the [`BigEndian`] wrapper.
pub trait Scalar: Copy {
    /// The raw byte representation of this type.
    type Raw: Copy + AsRef<[u8]> + for<'a> TryFrom<&'a [u8]>;

    /// Create an instance of this type from raw big-endian bytes.
    fn from_raw(raw: Self::Raw) -> Self;
    /// Encode this type as raw big-endian bytes.
    fn to_raw(self) -> Self::Raw;
}

/// A trait for types with a known, constant size.
pub trait FixedSize: Sized {
    /// The size of the raw encoding of this type, in bytes.
    const RAW_BYTE_LEN: usize;
}

/// A trait for types that can be decoded from the front of a byte slice.
pub trait ReadScalar: FixedSize {
    /// Attempt to read this type from the start of `bytes`.
    ///
    /// Returns `None` if `bytes` is shorter than [`FixedSize::RAW_BYTE_LEN`].
    fn read(bytes: &[u8]) -> Option<Self>;
}

impl<T: Scalar + FixedSize> ReadScalar for T {
    fn read(bytes: &[u8]) -> Option<Self> {
        bytes
            .get(..Self::RAW_BYTE_LEN)
            .and_then(|bytes| <T::Raw>::try_from(bytes).ok())
            .map(Self::from_raw)
    }
}

/// A wrapper around raw big-endian bytes for some type.
#[repr(transparent)]
pub struct BigEndian<T: Scalar>(T::Raw);

impl<T: Scalar> BigEndian<T> {
    /// Construct a new wrapper from a cooked value.
    pub fn new(value: T) -> Self {
        Self(value.to_raw())
    }

    /// Read a copy of this type from the raw bytes.
    pub fn get(self) -> T {
        T::from_raw(self.0)
    }

    /// Set the value, overwriting the bytes.
    pub fn set(&mut self, value: T) {
        self.0 = value.to_raw();
    }

    /// The raw big-endian bytes.
    pub fn be_bytes(&self) -> &[u8] {
        self.0.as_ref()
    }
}

impl<T: Scalar> Clone for BigEndian<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: Scalar> Copy for BigEndian<T> {}

impl<T: Scalar + FixedSize> FixedSize for BigEndian<T> {
    const RAW_BYTE_LEN: usize = T::RAW_BYTE_LEN;
}

// SAFETY: BigEndian<T> is a transparent wrapper around T::Raw, which is
// always a fixed-size byte array; any bit pattern is a valid value.
unsafe impl<T: Scalar> bytemuck::Zeroable for BigEndian<T> where T::Raw: bytemuck::Zeroable {}

// SAFETY: as above; the bounds ensure the raw representation itself
// admits any bit pattern.
unsafe impl<T: Scalar + 'static> bytemuck::AnyBitPattern for BigEndian<T> where
    T::Raw: bytemuck::AnyBitPattern
{
}

impl<T: std::fmt::Debug + Scalar> std::fmt::Debug for BigEndian<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        self.get().fmt(f)
    }
}

impl<T: std::fmt::Display + Scalar> std::fmt::Display for BigEndian<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        self.get().fmt(f)
    }
}

impl<T: PartialEq + Scalar> PartialEq for BigEndian<T> {
    fn eq(&self, other: &Self) -> bool {
        self.get() == other.get()
    }
}

impl<T: PartialEq + Eq + Scalar> Eq for BigEndian<T> {}

macro_rules! int_scalar {
    ($ty:ty, $raw:ty) => {
        impl crate::raw::Scalar for $ty {
            type Raw = $raw;
            fn to_raw(self) -> $raw {
                self.to_be_bytes()
            }

            fn from_raw(raw: $raw) -> $ty {
                Self::from_be_bytes(raw)
            }
        }

        impl crate::raw::FixedSize for $ty {
            const RAW_BYTE_LEN: usize = std::mem::size_of::<$raw>();
        }
    };
}

int_scalar!(u8, [u8; 1]);
int_scalar!(i8, [u8; 1]);
int_scalar!(u16, [u8; 2]);
int_scalar!(i16, [u8; 2]);
int_scalar!(u32, [u8; 4]);
int_scalar!(i32, [u8; 4]);
int_scalar!(i64, [u8; 8]);

/// An internal macro for implementing [`Scalar`] for simple wrapper types.
macro_rules! newtype_scalar {
    ($name:ident, $raw:ty) => {
        impl crate::raw::Scalar for $name {
            type Raw = $raw;
            fn to_raw(self) -> $raw {
                self.0.to_raw()
            }

            fn from_raw(raw: $raw) -> Self {
                Self(crate::raw::Scalar::from_raw(raw))
            }
        }

        impl crate::raw::FixedSize for $name {
            const RAW_BYTE_LEN: usize = std::mem::size_of::<$raw>();
        }
    };
}

pub(crate) use newtype_scalar;
