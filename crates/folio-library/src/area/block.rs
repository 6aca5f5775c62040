use ecow::EcoString;

use crate::foundations::BreakClass;
use crate::layout::{Abs, Point, Sides, Size};
use crate::model::NodeId;

/// A positioned piece of the area tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Area {
    /// A block with nested areas.
    Block(BlockArea),
    /// A line of inline content.
    Line(LineArea),
}

impl Area {
    /// The extent of the area.
    pub fn size(&self) -> Size {
        match self {
            Self::Block(block) => block.size(),
            Self::Line(line) => line.size,
        }
    }
}

/// Visual traits a block area carries to the renderer.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Traits {
    /// Border widths on the four edges.
    pub borders: Sides<Abs>,
    /// Paddings on the four edges.
    pub padding: Sides<Abs>,
    /// Start and end indents relative to the parent area.
    pub indents: Sides<Abs>,
    /// The background color, if any.
    pub background: Option<EcoString>,
    /// The forced break that preceded the block.
    pub break_before: BreakClass,
    /// The forced break that follows the block.
    pub break_after: BreakClass,
}

/// A block area: a rectangle with children at fixed positions relative to
/// its before-start corner.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct BlockArea {
    size: Size,
    producer: Option<NodeId>,
    traits: Traits,
    children: Vec<(Point, Area)>,
}

impl BlockArea {
    /// Create an empty block of the given inline progression dimension.
    pub fn new(ipd: Abs, producer: Option<NodeId>) -> Self {
        Self {
            size: Size::new(ipd, Abs::zero()),
            producer,
            traits: Traits::default(),
            children: vec![],
        }
    }

    /// The size of the block.
    pub fn size(&self) -> Size {
        self.size
    }

    /// The inline progression dimension.
    pub fn ipd(&self) -> Abs {
        self.size.width
    }

    /// The block progression dimension.
    pub fn bpd(&self) -> Abs {
        self.size.height
    }

    /// Set the inline progression dimension.
    pub fn set_ipd(&mut self, ipd: Abs) {
        self.size.width = ipd;
    }

    /// Set the block progression dimension.
    pub fn set_bpd(&mut self, bpd: Abs) {
        self.size.height = bpd;
    }

    /// The content node the block was generated for.
    pub fn producer(&self) -> Option<NodeId> {
        self.producer
    }

    /// The visual traits.
    pub fn traits(&self) -> &Traits {
        &self.traits
    }

    /// The visual traits, mutably.
    pub fn traits_mut(&mut self) -> &mut Traits {
        &mut self.traits
    }

    /// Whether the block has no children.
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// The children alongside their positions.
    pub fn children(&self) -> &[(Point, Area)] {
        &self.children
    }

    /// Add a child at a position.
    pub fn push(&mut self, pos: Point, area: Area) {
        self.children.push((pos, area));
    }

    /// Stack a child below the current content at the given inline offset
    /// and grow the block accordingly.
    pub fn stack(&mut self, x: Abs, area: Area) {
        let height = area.size().height;
        self.children.push((Point::new(x, self.size.height), area));
        self.size.height += height;
    }

    /// Grow the block by empty space.
    pub fn add_space(&mut self, space: Abs) {
        self.size.height += space;
    }

    /// Visit all descendant blocks depth-first, including this one.
    pub fn visit(&self, f: &mut impl FnMut(&BlockArea)) {
        f(self);
        for (_, child) in &self.children {
            if let Area::Block(block) = child {
                block.visit(f);
            }
        }
    }
}

/// A line of inline areas.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct LineArea {
    /// The line's extent; the width is the available line width.
    pub size: Size,
    /// The adjustment ratio the line was set with.
    pub ratio: f64,
    /// The inline content with positions relative to the line's start.
    pub inlines: Vec<(Abs, InlineArea)>,
}

impl LineArea {
    /// The words of the line joined by single spaces, for debugging and
    /// tests.
    pub fn text(&self) -> String {
        let mut text = String::new();
        for (_, inline) in &self.inlines {
            match inline {
                InlineArea::Word { text: word, .. } => text.push_str(word),
                InlineArea::Space { .. } => text.push(' '),
                InlineArea::Hyphen { .. } => text.push('-'),
            }
        }
        text
    }
}

/// An inline area.
#[derive(Debug, Clone, PartialEq)]
pub enum InlineArea {
    /// A word.
    Word { text: EcoString, width: Abs },
    /// An inter-word space with its adjusted width.
    Space { width: Abs },
    /// A hyphen ending a line broken at a discretionary break.
    Hyphen { width: Abs },
}

impl InlineArea {
    /// The width of the area.
    pub fn width(&self) -> Abs {
        match *self {
            Self::Word { width, .. } | Self::Space { width } | Self::Hyphen { width } => {
                width
            }
        }
    }
}
