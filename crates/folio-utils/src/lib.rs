//! Utilities for Folio.

#[macro_use]
mod macros;
mod scalar;

pub use self::scalar::Scalar;

use std::fmt::Debug;
use std::hash::Hash;
use std::ops::{Add, Div, Mul, Neg, Sub};

use siphasher::sip128::{Hasher128, SipHasher13};

/// Calculate a 128-bit siphash of a value.
pub fn hash128<T: Hash + ?Sized>(value: &T) -> u128 {
    let mut state = SipHasher13::new();
    value.hash(&mut state);
    state.finish128().as_u128()
}

/// A numeric type.
pub trait Numeric:
    Sized
    + Debug
    + Copy
    + PartialEq
    + Neg<Output = Self>
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<f64, Output = Self>
    + Div<f64, Output = Self>
{
    /// The identity element for addition.
    fn zero() -> Self;

    /// Whether `self` is zero.
    fn is_zero(self) -> bool {
        self == Self::zero()
    }

    /// Whether `self` consists only of finite parts.
    fn is_finite(self) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash128_is_stable_for_equal_values() {
        assert_eq!(hash128(&("mpt", 3)), hash128(&("mpt", 3)));
        assert_ne!(hash128(&("mpt", 3)), hash128(&("mpt", 4)));
    }
}
