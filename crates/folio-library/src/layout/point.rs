use std::fmt::{self, Debug, Formatter};
use std::ops::{Add, Neg};

use crate::layout::Abs;

/// A point in 2D, `x` along the inline and `y` along the block progression
/// direction.
#[derive(Default, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Point {
    /// The x coordinate.
    pub x: Abs,
    /// The y coordinate.
    pub y: Abs,
}

impl Point {
    /// The origin point.
    pub const fn zero() -> Self {
        Self { x: Abs::zero(), y: Abs::zero() }
    }

    /// Create a new point from x and y coordinates.
    pub const fn new(x: Abs, y: Abs) -> Self {
        Self { x, y }
    }

    /// Create a new point with y set to zero.
    pub const fn with_x(x: Abs) -> Self {
        Self { x, y: Abs::zero() }
    }

    /// Create a new point with x set to zero.
    pub const fn with_y(y: Abs) -> Self {
        Self { x: Abs::zero(), y }
    }
}

impl Debug for Point {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "Point({:?}, {:?})", self.x, self.y)
    }
}

impl Neg for Point {
    type Output = Self;

    fn neg(self) -> Self {
        Self { x: -self.x, y: -self.y }
    }
}

impl Add for Point {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self { x: self.x + other.x, y: self.y + other.y }
    }
}

folio_utils::sub_impl!(Point - Point -> Point);
folio_utils::assign_impl!(Point += Point);

/// A size in 2D: `width` is the inline progression dimension (IPD) and
/// `height` the block progression dimension (BPD).
#[derive(Default, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Size {
    /// The inline progression dimension.
    pub width: Abs,
    /// The block progression dimension.
    pub height: Abs,
}

impl Size {
    /// The zero value.
    pub const fn zero() -> Self {
        Self { width: Abs::zero(), height: Abs::zero() }
    }

    /// Create a new size.
    pub const fn new(width: Abs, height: Abs) -> Self {
        Self { width, height }
    }

    /// Convert to a point.
    pub fn to_point(self) -> Point {
        Point::new(self.width, self.height)
    }
}

impl Debug for Size {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "Size({:?}, {:?})", self.width, self.height)
    }
}

/// An axis-aligned rectangle.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Rect {
    /// The before-start corner.
    pub origin: Point,
    /// The extent of the rectangle.
    pub size: Size,
}

impl Rect {
    /// Create a new rectangle.
    pub const fn new(origin: Point, size: Size) -> Self {
        Self { origin, size }
    }
}
