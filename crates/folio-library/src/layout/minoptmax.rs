use std::fmt::{self, Debug, Formatter};
use std::ops::Add;

use crate::layout::Abs;

/// A length with an optimum and the range it may be adjusted in.
///
/// Used for the space a line or page has available and for conditional
/// spaces between blocks.
#[derive(Default, Copy, Clone, Eq, PartialEq, Hash)]
pub struct MinOptMax {
    /// The smallest acceptable value.
    pub min: Abs,
    /// The preferred value.
    pub opt: Abs,
    /// The largest acceptable value.
    pub max: Abs,
}

impl MinOptMax {
    /// The zero triple.
    pub const fn zero() -> Self {
        Self::fixed(Abs::zero())
    }

    /// A triple whose three components are equal.
    pub const fn fixed(value: Abs) -> Self {
        Self { min: value, opt: value, max: value }
    }

    /// Create a new triple. The bounds are widened if necessary so that
    /// `min <= opt <= max` holds.
    pub fn new(min: Abs, opt: Abs, max: Abs) -> Self {
        Self { min: min.min(opt), opt, max: max.max(opt) }
    }

    /// How far the value may grow beyond its optimum.
    pub fn stretch(self) -> Abs {
        self.max - self.opt
    }

    /// How far the value may shrink below its optimum.
    pub fn shrink(self) -> Abs {
        self.opt - self.min
    }

    /// Whether the three components are equal.
    pub fn is_fixed(self) -> bool {
        self.min == self.opt && self.opt == self.max
    }

    /// Subtract a fixed amount from all three components, never going below
    /// zero.
    pub fn minus(self, amount: Abs) -> Self {
        let sub = |v: Abs| (v - amount).max(Abs::zero());
        Self { min: sub(self.min), opt: sub(self.opt), max: sub(self.max) }
    }
}

impl Add for MinOptMax {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            min: self.min + other.min,
            opt: self.opt + other.opt,
            max: self.max + other.max,
        }
    }
}

folio_utils::assign_impl!(MinOptMax += MinOptMax);

impl Debug for MinOptMax {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        if self.is_fixed() {
            write!(f, "{:?}", self.opt)
        } else {
            write!(f, "{:?}/{:?}/{:?}", self.min, self.opt, self.max)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_min_opt_max_normalizes() {
        let m = MinOptMax::new(Abs::pt(12.0), Abs::pt(10.0), Abs::pt(8.0));
        assert_eq!(m.min, Abs::pt(10.0));
        assert_eq!(m.max, Abs::pt(10.0));
        assert!(m.is_fixed());
    }

    #[test]
    fn test_min_opt_max_stretch_shrink() {
        let m = MinOptMax::new(Abs::pt(4.0), Abs::pt(6.0), Abs::pt(10.0));
        assert_eq!(m.stretch(), Abs::pt(4.0));
        assert_eq!(m.shrink(), Abs::pt(2.0));
        assert_eq!(m.minus(Abs::pt(5.0)), MinOptMax::new(Abs::zero(), Abs::pt(1.0), Abs::pt(5.0)));
    }
}
