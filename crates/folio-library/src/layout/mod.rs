//! Geometric and length values used throughout layout.

mod abs;
mod length;
mod minoptmax;
mod percent;
mod point;
mod ratio;
mod sides;

pub use self::abs::*;
pub use self::length::*;
pub use self::minoptmax::*;
pub use self::percent::*;
pub use self::point::*;
pub use self::ratio::*;
pub use self::sides::*;
