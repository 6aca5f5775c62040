use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;

use crate::layout::{Abs, Length};
use crate::model::NodeId;

/// The closed set of quantities a percentage length can be relative to.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum PercentBaseKind {
    /// A base supplied by the property itself, answered by the context.
    Custom,
    /// The node's own font size.
    FontSize,
    /// The font size inherited from the parent node.
    InheritedFontSize,
    /// The width of the parent area.
    ParentAreaWidth,
    /// The width of the nearest reference area.
    ContainingRefAreaWidth,
    /// The content width of the containing block.
    ContainingBlockWidth,
    /// The content height of the containing block.
    ContainingBlockHeight,
    /// The intrinsic width of an image.
    ImageIntrinsicWidth,
    /// The intrinsic height of an image.
    ImageIntrinsicHeight,
    /// The horizontal space a background image may be moved in.
    BackgroundPositionHorizontal,
    /// The vertical space a background image may be moved in.
    BackgroundPositionVertical,
    /// The width of one proportional table unit (`1*`).
    TableUnits,
}

impl PercentBaseKind {
    /// Whether this base is a font size that is captured when the base is
    /// constructed instead of being asked from the context.
    pub fn is_font_size(self) -> bool {
        matches!(self, Self::FontSize | Self::InheritedFontSize)
    }
}

/// What a percentage is relative to: a base kind plus the node the
/// percentage was specified on.
///
/// A base never changes after construction. For the two font-size kinds,
/// the font-size length in effect at construction time is captured, so that
/// resolving it later does not depend on the state of the context.
#[derive(Clone, Eq, PartialEq, Hash)]
pub struct LengthBase {
    kind: PercentBaseKind,
    node: NodeId,
    font_size: Option<Arc<Length>>,
}

impl LengthBase {
    /// Create a base that is answered by the percent-base context.
    ///
    /// Font-size kinds must be created with [`LengthBase::font_size`]; if one
    /// is passed here, it resolves like a context-provided base.
    pub fn new(kind: PercentBaseKind, node: NodeId) -> Self {
        Self { kind, node, font_size: None }
    }

    /// Create a font-size base, capturing the font size in effect: the
    /// node's own one for [`PercentBaseKind::FontSize`] and the parent's
    /// one for [`PercentBaseKind::InheritedFontSize`].
    pub fn font_size(kind: PercentBaseKind, node: NodeId, font_size: Length) -> Self {
        Self { kind, node, font_size: Some(Arc::new(font_size)) }
    }

    /// The base's kind.
    pub fn kind(&self) -> PercentBaseKind {
        self.kind
    }

    /// The node the percentage was specified on.
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// The captured font size, for font-size bases.
    pub fn captured_font_size(&self) -> Option<&Length> {
        self.font_size.as_deref()
    }
}

impl Debug for LengthBase {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match &self.font_size {
            Some(size) => write!(f, "{:?}({:?} of {:?})", self.kind, size, self.node),
            None => write!(f, "{:?}(of {:?})", self.kind, self.node),
        }
    }
}

/// Answers the base length for a percentage during layout.
///
/// The layout manager that owns the node in question (or one of its
/// ancestors) is the natural implementor: it knows the widths it computed.
pub trait PercentBaseContext {
    /// The base length of the given kind for the given node, or `None` if
    /// the context has no such quantity for that node.
    fn base_length(&self, kind: PercentBaseKind, node: NodeId) -> Option<Abs>;
}

impl<T: PercentBaseContext + ?Sized> PercentBaseContext for &T {
    fn base_length(&self, kind: PercentBaseKind, node: NodeId) -> Option<Abs> {
        (**self).base_length(kind, node)
    }
}

/// A context with a fixed answer for every base kind, useful for resolving
/// lengths outside of a layout pass.
#[derive(Debug, Default, Clone)]
pub struct FixedBases(Vec<(PercentBaseKind, Abs)>);

impl FixedBases {
    /// Create an empty set of bases.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an answer for a base kind.
    pub fn with(mut self, kind: PercentBaseKind, length: Abs) -> Self {
        self.0.retain(|(k, _)| *k != kind);
        self.0.push((kind, length));
        self
    }
}

impl PercentBaseContext for FixedBases {
    fn base_length(&self, kind: PercentBaseKind, _: NodeId) -> Option<Abs> {
        self.0.iter().find(|(k, _)| *k == kind).map(|&(_, length)| length)
    }
}
