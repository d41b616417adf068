use crate::raw::newtype_scalar;

/// A date and time, represented as a number of seconds since midnight
/// on January 1st, 1904 in GMT/UTC.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct LongDateTime(i64);

impl LongDateTime {
    /// Create with a number of seconds relative to the 1904 epoch.
    pub const fn new(secs: i64) -> Self {
        Self(secs)
    }

    /// The number of seconds since the 1904 epoch, possibly negative.
    pub const fn as_secs(self) -> i64 {
        self.0
    }
}

newtype_scalar!(LongDateTime, [u8; 8]);
