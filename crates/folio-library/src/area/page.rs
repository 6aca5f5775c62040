use ecow::EcoString;

use crate::area::BlockArea;
use crate::diag::SourceResult;
use crate::layout::{Rect, Size};
use crate::model::RegionName;

/// A finished page.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    /// The page number, starting at the sequence's initial page number.
    pub number: usize,
    /// The index of the page sequence the page belongs to.
    pub sequence: usize,
    /// The page size.
    pub size: Size,
    /// Whether the page was inserted to satisfy a parity constraint and has
    /// no flow content.
    pub blank: bool,
    /// The regions of the page with their content.
    pub regions: Vec<RegionArea>,
    /// Identifiers of the nodes whose first area is on this page.
    pub ids: Vec<EcoString>,
}

impl Page {
    /// The region with the given name.
    pub fn region(&self, name: RegionName) -> Option<&RegionArea> {
        self.regions.iter().find(|region| region.name == name)
    }
}

/// A region of a page and the content laid out into it.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionArea {
    /// Which region this is.
    pub name: RegionName,
    /// Where the region is on the page.
    pub rect: Rect,
    /// The reference area holding the region's blocks.
    pub content: BlockArea,
}

/// Receives pages as soon as they are complete.
///
/// Implemented by renderers. A page is handed over exactly once and in
/// document order.
pub trait AreaTreeHandler {
    /// Serialize a page.
    fn render_page(&mut self, page: Page) -> SourceResult<()>;
}

/// Collects pages in memory.
impl AreaTreeHandler for Vec<Page> {
    fn render_page(&mut self, page: Page) -> SourceResult<()> {
        self.push(page);
        Ok(())
    }
}
