//! Wraparound-safe timestamp arithmetic.
//!
//! Free-running hardware clocks are fixed-width unsigned counters that wrap
//! back to zero at their maximum (a 32-bit millisecond counter wraps after
//! about 49.7 days). Elapsed time must therefore be computed with wrapping
//! subtraction in the same width as the clock: `now - then` stays correct
//! across a single wrap as long as the true elapsed time fits in the type.

use crate::error::{DiagError, DiagResult};
use std::fmt;
use std::time::Duration;

/// A fixed-width unsigned clock reading.
///
/// Implemented for `u8`, `u16`, `u32` and `u64`. The narrow widths are mostly
/// useful for exercising wraparound in tests.
pub trait Timestamp: Copy + Eq + Ord + fmt::Debug + fmt::Display {
    /// The zero reading.
    const ZERO: Self;
    /// The largest representable reading; the next tick wraps to [`Self::ZERO`].
    const MAX: Self;

    /// Subtraction modulo 2^N.
    #[must_use]
    fn wrapping_sub(self, rhs: Self) -> Self;

    /// Addition modulo 2^N.
    #[must_use]
    fn wrapping_add(self, rhs: Self) -> Self;

    /// Widen to `u64`.
    fn as_u64(self) -> u64;

    /// Narrow from `u64`, returning `None` if the value does not fit.
    fn from_u64(value: u64) -> Option<Self>;

    /// Narrow from `u64` keeping only the low bits, like a hardware counter.
    #[must_use]
    fn from_u64_truncating(value: u64) -> Self;

    /// Elapsed ticks from `earlier` to `self`, correct across one wrap.
    #[inline]
    #[must_use]
    fn elapsed_since(self, earlier: Self) -> Self {
        self.wrapping_sub(earlier)
    }

    /// Whole seconds in a millisecond reading (wraps with the clock).
    #[inline]
    fn whole_secs(self) -> u64 {
        self.as_u64() / 1000
    }
}

macro_rules! impl_timestamp {
    ($($ty:ty),*) => {
        $(
            impl Timestamp for $ty {
                const ZERO: Self = 0;
                const MAX: Self = <$ty>::MAX;

                #[inline]
                fn wrapping_sub(self, rhs: Self) -> Self {
                    <$ty>::wrapping_sub(self, rhs)
                }

                #[inline]
                fn wrapping_add(self, rhs: Self) -> Self {
                    <$ty>::wrapping_add(self, rhs)
                }

                #[inline]
                fn as_u64(self) -> u64 {
                    u64::from(self)
                }

                #[inline]
                fn from_u64(value: u64) -> Option<Self> {
                    <$ty>::try_from(value).ok()
                }

                #[inline]
                #[allow(clippy::cast_possible_truncation)]
                fn from_u64_truncating(value: u64) -> Self {
                    value as $ty
                }
            }
        )*
    };
}

impl_timestamp!(u8, u16, u32, u64);

/// Convert a duration into whole milliseconds of a millisecond clock.
///
/// # Errors
///
/// Returns [`DiagError::Clock`] if the duration does not fit in `T`.
pub fn millis_of<T: Timestamp>(duration: Duration) -> DiagResult<T> {
    let ms = duration.as_millis();
    u64::try_from(ms)
        .ok()
        .and_then(T::from_u64)
        .ok_or_else(|| {
            DiagError::Clock(format!(
                "{ms}ms does not fit in a clock with maximum {}",
                T::MAX
            ))
        })
}
