//! Building documents and looking into the pages they produce.

use folio::area::{Area, Page};
use folio::config::Config;
use folio::diag::{SourceResult, Warned};
use folio::foundations::PropertyList;
use folio::layout::{Abs, Size};
use folio::model::{ContentTree, InlineItem, Monospace, NodeId, NodeKind, PageMaster, RegionName};
use folio::{Document, typeset};

/// A 200pt by 100pt page without margins: seven lines of the default text
/// don't fit, six do.
pub fn small_master() -> PageMaster {
    PageMaster::new(Size::new(Abs::pt(200.0), Abs::pt(100.0)))
}

/// Append a page sequence with a flow and return both.
pub fn sequence(
    tree: &mut ContentTree,
    master: PageMaster,
    properties: PropertyList,
) -> (NodeId, NodeId) {
    let sequence = tree.push(tree.root(), NodeKind::PageSequence(master), properties);
    let flow = tree.push(sequence, NodeKind::Flow, PropertyList::new());
    (sequence, flow)
}

/// Append a paragraph of plain text.
pub fn paragraph(
    tree: &mut ContentTree,
    parent: NodeId,
    text: &str,
    properties: PropertyList,
) -> NodeId {
    tree.push(parent, NodeKind::Paragraph(InlineItem::parse(text)), properties)
}

/// The output of a test run.
pub struct Output {
    pub result: Warned<SourceResult<Document>>,
    pub pages: Vec<Page>,
}

impl Output {
    /// The document summary, panicking on errors.
    pub fn document(&self) -> &Document {
        match &self.result.output {
            Ok(document) => document,
            Err(errors) => panic!("layout failed: {errors:?}"),
        }
    }

    /// The messages of all warnings.
    pub fn warnings(&self) -> Vec<String> {
        self.result.warnings.iter().map(|w| w.message.to_string()).collect()
    }
}

/// Typeset a tree with the default configuration and a monospace font.
pub fn run(tree: &ContentTree) -> Output {
    run_with(&Config::default(), tree)
}

/// Typeset a tree with the given configuration and a monospace font.
pub fn run_with(config: &Config, tree: &ContentTree) -> Output {
    let mut pages = vec![];
    let result = typeset(config, tree, &Monospace::default(), &mut pages);
    Output { result, pages }
}

/// The text of the lines in a region of a page, in document order.
pub fn lines(page: &Page, name: RegionName) -> Vec<String> {
    let mut lines = vec![];
    if let Some(region) = page.region(name) {
        region.content.visit(&mut |block| {
            for (_, child) in block.children() {
                if let Area::Line(line) = child {
                    lines.push(line.text());
                }
            }
        });
    }
    lines
}

/// The text of the lines in the body of a page.
pub fn body(page: &Page) -> Vec<String> {
    lines(page, RegionName::Body)
}
