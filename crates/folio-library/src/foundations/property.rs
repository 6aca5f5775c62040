use std::fmt::{self, Debug, Formatter};

use ecow::EcoString;
use smallvec::SmallVec;

use crate::foundations::Keep;
use crate::layout::Length;

/// Identifies a formatting property.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum PropertyId {
    FontSize,
    LineHeight,
    TextAlign,
    TextAlignLast,
    Orphans,
    Widows,
    SpaceBefore,
    SpaceAfter,
    StartIndent,
    EndIndent,
    Width,
    Height,
    BreakBefore,
    BreakAfter,
    KeepTogether,
    KeepWithNext,
    KeepWithPrevious,
    BorderBeforeWidth,
    BorderAfterWidth,
    BorderStartWidth,
    BorderEndWidth,
    PaddingBefore,
    PaddingAfter,
    PaddingStart,
    PaddingEnd,
    BackgroundColor,
    TableLayout,
    ColumnWidth,
    NumberColumnsSpanned,
    ForcePageCount,
    InitialPageNumber,
    Precedence,
    Extent,
}

impl PropertyId {
    /// The property's name as written in a document.
    pub fn name(self) -> &'static str {
        match self {
            Self::FontSize => "font-size",
            Self::LineHeight => "line-height",
            Self::TextAlign => "text-align",
            Self::TextAlignLast => "text-align-last",
            Self::Orphans => "orphans",
            Self::Widows => "widows",
            Self::SpaceBefore => "space-before",
            Self::SpaceAfter => "space-after",
            Self::StartIndent => "start-indent",
            Self::EndIndent => "end-indent",
            Self::Width => "width",
            Self::Height => "height",
            Self::BreakBefore => "break-before",
            Self::BreakAfter => "break-after",
            Self::KeepTogether => "keep-together",
            Self::KeepWithNext => "keep-with-next",
            Self::KeepWithPrevious => "keep-with-previous",
            Self::BorderBeforeWidth => "border-before-width",
            Self::BorderAfterWidth => "border-after-width",
            Self::BorderStartWidth => "border-start-width",
            Self::BorderEndWidth => "border-end-width",
            Self::PaddingBefore => "padding-before",
            Self::PaddingAfter => "padding-after",
            Self::PaddingStart => "padding-start",
            Self::PaddingEnd => "padding-end",
            Self::BackgroundColor => "background-color",
            Self::TableLayout => "table-layout",
            Self::ColumnWidth => "column-width",
            Self::NumberColumnsSpanned => "number-columns-spanned",
            Self::ForcePageCount => "force-page-count",
            Self::InitialPageNumber => "initial-page-number",
            Self::Precedence => "precedence",
            Self::Extent => "extent",
        }
    }

    /// Whether a node without its own value takes the parent's.
    pub fn is_inherited(self) -> bool {
        matches!(
            self,
            Self::FontSize
                | Self::LineHeight
                | Self::TextAlign
                | Self::TextAlignLast
                | Self::Orphans
                | Self::Widows
        )
    }
}

/// A resolved property value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A length, possibly a percentage.
    Length(Length),
    /// A plain number, e.g. a line-height factor.
    Number(f64),
    /// An integer.
    Int(i64),
    /// An unparsed keyword, checked when layout reads it.
    Keyword(EcoString),
    /// A keep condition.
    Keep(Keep),
    /// A space with its adjustment range.
    Space(Space),
    /// A color, handed to the renderer as is.
    Color(EcoString),
    /// A table column width.
    ColumnWidth(ColumnWidth),
}

impl From<Length> for Value {
    fn from(length: Length) -> Self {
        Self::Length(length)
    }
}

impl From<Keep> for Value {
    fn from(keep: Keep) -> Self {
        Self::Keep(keep)
    }
}

impl From<Space> for Value {
    fn from(space: Space) -> Self {
        Self::Space(space)
    }
}

impl From<ColumnWidth> for Value {
    fn from(width: ColumnWidth) -> Self {
        Self::ColumnWidth(width)
    }
}

impl From<i64> for Value {
    fn from(int: i64) -> Self {
        Self::Int(int)
    }
}

impl From<&str> for Value {
    fn from(keyword: &str) -> Self {
        Self::Keyword(keyword.into())
    }
}

/// Space before or after a block.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Space {
    /// The least acceptable space.
    pub min: Length,
    /// The preferred space.
    pub opt: Length,
    /// The most acceptable space.
    pub max: Length,
}

impl Space {
    /// A space that cannot be adjusted.
    pub fn fixed(length: impl Into<Length>) -> Self {
        let length = length.into();
        Self { min: length.clone(), opt: length.clone(), max: length }
    }
}

/// The declared width of a table column.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnWidth {
    /// A length, percentages are relative to the table's content width.
    Fixed(Length),
    /// A share of the width left over by the fixed columns.
    Proportional(f64),
}

impl Default for ColumnWidth {
    fn default() -> Self {
        Self::Proportional(1.0)
    }
}

/// The properties specified on a single node.
#[derive(Default, Clone, PartialEq)]
pub struct PropertyList(SmallVec<[(PropertyId, Value); 4]>);

impl PropertyList {
    /// Create an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a property, replacing an earlier value.
    pub fn set(&mut self, id: PropertyId, value: impl Into<Value>) {
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| *k == id) {
            Some(slot) => slot.1 = value,
            None => self.0.push((id, value)),
        }
    }

    /// Builder-style variant of [`set`](Self::set).
    pub fn with(mut self, id: PropertyId, value: impl Into<Value>) -> Self {
        self.set(id, value);
        self
    }

    /// The value specified for a property, if any.
    pub fn get(&self, id: PropertyId) -> Option<&Value> {
        self.0.iter().find(|(k, _)| *k == id).map(|(_, v)| v)
    }

    /// Whether the list is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Debug for PropertyList {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.debug_map().entries(self.0.iter().map(|(k, v)| (k.name(), v))).finish()
    }
}
