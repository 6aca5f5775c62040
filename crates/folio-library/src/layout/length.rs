use std::fmt::{self, Debug, Formatter};

use crate::diag::{Span, WarningSink, warning};
use crate::layout::{Abs, AbsUnit, LengthBase, PercentBaseContext, PercentBaseKind, Ratio};
use crate::model::NodeId;

/// A length that is either absolute or a percentage of some base.
#[derive(Clone, Eq, PartialEq, Hash)]
pub enum Length {
    /// A length that needs no context to resolve.
    Fixed(Abs),
    /// A length relative to a context-dependent base.
    Percent(PercentLength),
}

/// A factor of a [`LengthBase`].
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct PercentLength {
    /// How much of the base the length amounts to.
    pub factor: Ratio,
    /// What the length is relative to.
    pub base: LengthBase,
}

/// Why a length could not be resolved.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ResolveError {
    /// A percentage was resolved without any percent-base context.
    MissingContext,
    /// The context has no base of this kind for the node.
    UnavailableBase(PercentBaseKind),
}

impl Length {
    /// The zero length.
    pub const fn zero() -> Self {
        Self::Fixed(Abs::zero())
    }

    /// Build an absolute length from a number and a unit abbreviation.
    ///
    /// An unknown unit yields a zero length and a warning.
    pub fn with_unit_name(
        value: f64,
        unit: &str,
        span: Span,
        sink: &mut impl WarningSink,
    ) -> Self {
        match AbsUnit::from_name(unit) {
            Some(unit) => Self::Fixed(Abs::with_unit(value, unit)),
            None => {
                sink.emit(warning!(
                    span,
                    "unknown length unit `{}`, using zero",
                    unit;
                    hint: "supported units are mpt, pt, pc, mm, cm, in and px"
                ));
                Self::zero()
            }
        }
    }

    /// A percentage of a base.
    pub fn percent(factor: Ratio, base: LengthBase) -> Self {
        Self::Percent(PercentLength { factor, base })
    }

    /// A multiple of the font size in effect on `node`.
    pub fn em(amount: f64, node: NodeId, font_size: Length) -> Self {
        Self::percent(
            Ratio::new(amount),
            LengthBase::font_size(PercentBaseKind::FontSize, node, font_size),
        )
    }

    /// Whether the length resolves without a context.
    pub fn is_absolute(&self) -> bool {
        match self {
            Self::Fixed(_) => true,
            Self::Percent(percent) => {
                percent.base.captured_font_size().is_some_and(Length::is_absolute)
            }
        }
    }

    /// Resolve the length to an absolute value.
    ///
    /// A fixed length ignores the context entirely. A percentage needs a
    /// context unless its base is a captured font size that is itself
    /// absolute.
    pub fn try_resolve(
        &self,
        context: Option<&dyn PercentBaseContext>,
    ) -> Result<Abs, ResolveError> {
        match self {
            Self::Fixed(abs) => Ok(*abs),
            Self::Percent(PercentLength { factor, base }) => {
                let whole = match base.captured_font_size() {
                    Some(size) => size.try_resolve(context)?,
                    None => {
                        let context = context.ok_or(ResolveError::MissingContext)?;
                        context
                            .base_length(base.kind(), base.node())
                            .ok_or(ResolveError::UnavailableBase(base.kind()))?
                    }
                };
                Ok(factor.of(whole))
            }
        }
    }

    /// Resolve the length, reporting failures as warnings and falling back
    /// to zero.
    pub fn resolve(
        &self,
        context: Option<&dyn PercentBaseContext>,
        sink: &mut impl WarningSink,
    ) -> Abs {
        self.try_resolve(context).unwrap_or_else(|err| {
            let span = match self {
                Self::Percent(percent) => Span::from(percent.base.node()),
                Self::Fixed(_) => Span::detached(),
            };
            sink.emit(match err {
                ResolveError::MissingContext => warning!(
                    span,
                    "cannot resolve percentage without a percent-base context, using zero"
                ),
                ResolveError::UnavailableBase(kind) => warning!(
                    span,
                    "percent base {:?} is not available here, using zero",
                    kind
                ),
            });
            Abs::zero()
        })
    }
}

impl Default for Length {
    fn default() -> Self {
        Self::zero()
    }
}

impl From<Abs> for Length {
    fn from(abs: Abs) -> Self {
        Self::Fixed(abs)
    }
}

impl Debug for Length {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Self::Fixed(abs) => abs.fmt(f),
            Self::Percent(percent) => write!(f, "{:?} of {:?}", percent.factor, percent.base),
        }
    }
}
