use std::fmt::{self, Debug, Formatter};
use std::iter::Sum;
use std::ops::{Add, Div, Mul, Neg};
use std::str::FromStr;

use folio_utils::Numeric;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// An absolute length, stored as a whole number of millipoints.
///
/// All layout arithmetic happens on this fixed sub-unit, so two lengths that
/// were computed along different paths compare exactly.
#[derive(Default, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Abs(i64);

impl Abs {
    /// Magnitude at and above which a length counts as infinite. Kept well
    /// below `i64::MAX` so that sums of a few infinite lengths don't wrap.
    const INF: i64 = i64::MAX / 8;

    /// The zero length.
    pub const fn zero() -> Self {
        Self(0)
    }

    /// The infinite length.
    pub const fn inf() -> Self {
        Self(Self::INF)
    }

    /// Create an absolute length from a number of millipoints.
    pub const fn mpt(mpt: i64) -> Self {
        Self(mpt)
    }

    /// Create an absolute length from a value in a unit, rounded to the
    /// nearest millipoint.
    pub fn with_unit(val: f64, unit: AbsUnit) -> Self {
        let raw = (val * unit.mpt_scale()).round();
        if raw.is_nan() {
            Self::zero()
        } else {
            Self((raw as i64).clamp(-Self::INF, Self::INF))
        }
    }

    /// Create an absolute length from a number of points.
    pub fn pt(pt: f64) -> Self {
        Self::with_unit(pt, AbsUnit::Pt)
    }

    /// Create an absolute length from a number of millimeters.
    pub fn mm(mm: f64) -> Self {
        Self::with_unit(mm, AbsUnit::Mm)
    }

    /// Create an absolute length from a number of centimeters.
    pub fn cm(cm: f64) -> Self {
        Self::with_unit(cm, AbsUnit::Cm)
    }

    /// Create an absolute length from a number of inches.
    pub fn inches(inches: f64) -> Self {
        Self::with_unit(inches, AbsUnit::In)
    }

    /// The number of millipoints.
    pub const fn to_mpt(self) -> i64 {
        self.0
    }

    /// Get the value of this absolute length in a unit.
    pub fn to_unit(self, unit: AbsUnit) -> f64 {
        self.0 as f64 / unit.mpt_scale()
    }

    /// Convert this to a number of points.
    pub fn to_pt(self) -> f64 {
        self.to_unit(AbsUnit::Pt)
    }

    /// The absolute value of this length.
    pub fn abs(self) -> Self {
        Self(self.0.abs())
    }

    /// The minimum of this and another absolute length.
    pub fn min(self, other: Self) -> Self {
        Self(self.0.min(other.0))
    }

    /// The maximum of this and another absolute length.
    pub fn max(self, other: Self) -> Self {
        Self(self.0.max(other.0))
    }

    /// Set to the maximum of this and another absolute length.
    pub fn set_max(&mut self, other: Self) {
        *self = (*self).max(other);
    }

    /// Whether the length is zero or negative.
    pub fn is_empty(self) -> bool {
        self.0 <= 0
    }

    /// Ratio of this length to another one, as a float.
    pub fn ratio_to(self, other: Self) -> f64 {
        self.0 as f64 / other.0 as f64
    }
}

impl Numeric for Abs {
    fn zero() -> Self {
        Self::zero()
    }

    fn is_finite(self) -> bool {
        self.0.abs() < Self::INF
    }
}

impl Debug for Abs {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        if !self.is_finite() {
            return f.pad(if self.0 > 0 { "inf" } else { "-inf" });
        }
        write!(f, "{}mpt", self.0)
    }
}

impl Neg for Abs {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl Add for Abs {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0).clamp(-Self::INF, Self::INF))
    }
}

folio_utils::sub_impl!(Abs - Abs -> Abs);

impl Mul<f64> for Abs {
    type Output = Self;

    fn mul(self, other: f64) -> Self {
        Self::with_unit(self.0 as f64 * other, AbsUnit::Mpt)
    }
}

impl Mul<Abs> for f64 {
    type Output = Abs;

    fn mul(self, other: Abs) -> Abs {
        other * self
    }
}

impl Div<f64> for Abs {
    type Output = Self;

    fn div(self, other: f64) -> Self {
        Self::with_unit(self.0 as f64 / other, AbsUnit::Mpt)
    }
}

folio_utils::assign_impl!(Abs += Abs);
folio_utils::assign_impl!(Abs -= Abs);
folio_utils::assign_impl!(Abs *= f64);
folio_utils::assign_impl!(Abs /= f64);

impl Sum for Abs {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Self> for Abs {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

/// Configuration files write lengths as strings like `"12pt"` or `"2.5cm"`.
impl Serialize for Abs {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("{}mpt", self.0))
    }
}

impl<'de> Deserialize<'de> for Abs {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let string = String::deserialize(deserializer)?;
        string.parse().map_err(serde::de::Error::custom)
    }
}

impl FromStr for Abs {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let split = s
            .find(|c: char| c.is_ascii_alphabetic())
            .ok_or_else(|| format!("length `{s}` has no unit"))?;
        let (number, unit) = s.split_at(split);
        let value: f64 = number
            .trim()
            .parse()
            .map_err(|_| format!("invalid number in length `{s}`"))?;
        let unit = AbsUnit::from_name(unit)
            .ok_or_else(|| format!("unknown length unit `{unit}`"))?;
        Ok(Self::with_unit(value, unit))
    }
}

/// Different units of absolute measurement.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum AbsUnit {
    /// Millipoints, the internal sub-unit.
    Mpt,
    /// Points.
    Pt,
    /// Picas (12 points).
    Pc,
    /// Millimeters.
    Mm,
    /// Centimeters.
    Cm,
    /// Inches.
    In,
    /// Pixels, at one point per pixel.
    Px,
}

impl AbsUnit {
    /// All supported units.
    pub const ALL: [Self; 7] =
        [Self::Mpt, Self::Pt, Self::Pc, Self::Mm, Self::Cm, Self::In, Self::Px];

    /// Look a unit up by its abbreviation.
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "mpt" => Self::Mpt,
            "pt" => Self::Pt,
            "pc" => Self::Pc,
            "mm" => Self::Mm,
            "cm" => Self::Cm,
            "in" => Self::In,
            "px" => Self::Px,
            _ => return None,
        })
    }

    /// The unit's abbreviation.
    pub fn name(self) -> &'static str {
        match self {
            Self::Mpt => "mpt",
            Self::Pt => "pt",
            Self::Pc => "pc",
            Self::Mm => "mm",
            Self::Cm => "cm",
            Self::In => "in",
            Self::Px => "px",
        }
    }

    /// How many millipoints correspond to a value of `1.0` in this unit.
    const fn mpt_scale(self) -> f64 {
        match self {
            Self::Mpt => 1.0,
            Self::Pt | Self::Px => 1000.0,
            Self::Pc => 12_000.0,
            Self::Mm => 2834.64567,
            Self::Cm => 28_346.4567,
            Self::In => 72_000.0,
        }
    }
}
