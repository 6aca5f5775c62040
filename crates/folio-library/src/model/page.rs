use crate::foundations::Precedence;
use crate::layout::{Abs, Point, Rect, Sides, Size};

/// Names the regions of a page.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum RegionName {
    /// The main region the flow is poured into.
    Body,
    /// The header region.
    Before,
    /// The footer region.
    After,
    /// The region along the start edge.
    Start,
    /// The region along the end edge.
    End,
}

/// A side region of a page master.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Hash)]
pub struct SideRegion {
    /// How far the region reaches into the page from its edge.
    pub extent: Abs,
    /// Whether the region takes the corners it shares with its neighbors.
    /// Only meaningful for the before and after regions.
    pub precedence: Precedence,
}

impl SideRegion {
    /// A region with the given extent and no precedence.
    pub fn new(extent: Abs) -> Self {
        Self { extent, precedence: Precedence::False }
    }
}

/// Page geometry shared by all pages of a sequence.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PageMaster {
    /// The page size.
    pub size: Size,
    /// The margins around all regions.
    pub margin: Sides<Abs>,
    /// The margins of the body region within the page's content rectangle.
    pub body_margin: Sides<Abs>,
    /// The header region.
    pub before: Option<SideRegion>,
    /// The footer region.
    pub after: Option<SideRegion>,
    /// The region along the start edge.
    pub start: Option<SideRegion>,
    /// The region along the end edge.
    pub end: Option<SideRegion>,
}

impl PageMaster {
    /// A master for pages of the given size without margins or side regions.
    pub fn new(size: Size) -> Self {
        Self {
            size,
            margin: Sides::default(),
            body_margin: Sides::default(),
            before: None,
            after: None,
            start: None,
            end: None,
        }
    }

    /// The US letter page with one-inch margins.
    pub fn letter() -> Self {
        Self {
            margin: Sides::splat(Abs::inches(1.0)),
            ..Self::new(Size::new(Abs::inches(8.5), Abs::inches(11.0)))
        }
    }

    /// The rectangle inside the page margins.
    pub fn content_rect(&self) -> Rect {
        Rect::new(
            Point::new(self.margin.start, self.margin.before),
            Size::new(
                self.size.width - self.margin.inline_sum(),
                self.size.height - self.margin.block_sum(),
            ),
        )
    }

    /// The rectangle of a region, `None` if the master doesn't define it.
    ///
    /// A before or after region without precedence leaves the corners to
    /// the start and end regions: its width is reduced by their extents and
    /// it is shifted by the start extent. Start and end regions are
    /// shortened in turn by before and after regions that do have
    /// precedence.
    pub fn region_rect(&self, name: RegionName) -> Option<Rect> {
        let content = self.content_rect();
        let extent = |region: Option<SideRegion>| region.map_or(Abs::zero(), |r| r.extent);
        let wins = |region: Option<SideRegion>| {
            region.is_some_and(|r| r.precedence == Precedence::True)
        };

        let horizontal = |region: SideRegion, y: Abs| {
            let mut rect = Rect::new(
                Point::new(content.origin.x, y),
                Size::new(content.size.width, region.extent),
            );
            if region.precedence == Precedence::False {
                rect.size.width -= extent(self.start) + extent(self.end);
                rect.origin.x += extent(self.start);
            }
            rect
        };

        let vertical = |region: SideRegion, x: Abs| {
            let mut rect = Rect::new(
                Point::new(x, content.origin.y),
                Size::new(region.extent, content.size.height),
            );
            if wins(self.before) {
                rect.origin.y += extent(self.before);
                rect.size.height -= extent(self.before);
            }
            if wins(self.after) {
                rect.size.height -= extent(self.after);
            }
            rect
        };

        Some(match name {
            RegionName::Body => Rect::new(
                Point::new(
                    content.origin.x + self.body_margin.start,
                    content.origin.y + self.body_margin.before,
                ),
                Size::new(
                    content.size.width - self.body_margin.inline_sum(),
                    content.size.height - self.body_margin.block_sum(),
                ),
            ),
            RegionName::Before => horizontal(self.before?, content.origin.y),
            RegionName::After => {
                let region = self.after?;
                horizontal(region, content.origin.y + content.size.height - region.extent)
            }
            RegionName::Start => vertical(self.start?, content.origin.x),
            RegionName::End => {
                let region = self.end?;
                vertical(region, content.origin.x + content.size.width - region.extent)
            }
        })
    }
}

impl Default for PageMaster {
    fn default() -> Self {
        Self::letter()
    }
}
