use folio::foundations::{Precedence, PropertyId, PropertyList};
use folio::layout::Abs;
use folio::model::{ContentTree, NodeKind, PageMaster, RegionName, SideRegion};

use crate::world::{body, lines, paragraph, run, sequence};

/// A letter page with a header and a start region.
fn master(precedence: Precedence) -> PageMaster {
    let mut master = PageMaster::letter();
    master.before = Some(SideRegion { extent: Abs::pt(36.0), precedence });
    master.start = Some(SideRegion::new(Abs::pt(20.0)));
    master.body_margin.before = Abs::pt(36.0);
    master.body_margin.start = Abs::pt(20.0);
    master
}

/// Two pages of flow content under a running header.
fn document(precedence: Precedence) -> ContentTree {
    let mut tree = ContentTree::new();
    let (sequence, flow) = sequence(&mut tree, master(precedence), PropertyList::new());
    let header = tree.push(
        sequence,
        NodeKind::StaticContent(RegionName::Before),
        PropertyList::new(),
    );
    paragraph(&mut tree, header, "running header", PropertyList::new());
    paragraph(&mut tree, flow, "first page", PropertyList::new());
    let block = tree.push(
        flow,
        NodeKind::Block,
        PropertyList::new().with(PropertyId::BreakBefore, "page"),
    );
    paragraph(&mut tree, block, "second page", PropertyList::new());
    tree
}

#[test]
fn test_static_content_repeats_on_every_page() {
    let output = run(&document(Precedence::False));
    assert!(output.warnings().is_empty(), "{:?}", output.warnings());
    assert_eq!(output.pages.len(), 2);
    for page in &output.pages {
        assert_eq!(lines(page, RegionName::Before), ["running header"]);
    }
    assert_eq!(body(&output.pages[0]), ["first page"]);
    assert_eq!(body(&output.pages[1]), ["second page"]);
}

#[test]
fn test_header_without_precedence_leaves_corner() {
    let output = run(&document(Precedence::False));
    let header = output.pages[0].region(RegionName::Before).unwrap();
    assert_eq!(header.rect.origin.x, Abs::pt(92.0));
    assert_eq!(header.rect.size.width, Abs::pt(448.0));
    assert_eq!(header.content.ipd(), Abs::pt(448.0));
}

#[test]
fn test_header_with_precedence_takes_corner() {
    let output = run(&document(Precedence::True));
    let header = output.pages[0].region(RegionName::Before).unwrap();
    assert_eq!(header.rect.origin.x, Abs::pt(72.0));
    assert_eq!(header.rect.size.width, Abs::pt(468.0));
}

#[test]
fn test_static_content_for_missing_region_warns() {
    let mut tree = ContentTree::new();
    let (sequence, flow) = sequence(&mut tree, PageMaster::letter(), PropertyList::new());
    let footer = tree.push(
        sequence,
        NodeKind::StaticContent(RegionName::After),
        PropertyList::new(),
    );
    paragraph(&mut tree, footer, "footer", PropertyList::new());
    paragraph(&mut tree, flow, "content", PropertyList::new());

    let output = run(&tree);
    assert_eq!(output.document().pages, 1);
    assert!(output.pages[0].region(RegionName::After).is_none());
    assert_eq!(
        output.warnings(),
        ["static content for the After region is not displayed"]
    );
}

#[test]
fn test_overfull_static_content_warns() {
    let mut tree = ContentTree::new();
    let mut master = PageMaster::letter();
    master.before = Some(SideRegion::new(Abs::pt(20.0)));
    let (sequence, flow) = sequence(&mut tree, master, PropertyList::new());
    let header = tree.push(
        sequence,
        NodeKind::StaticContent(RegionName::Before),
        PropertyList::new(),
    );
    for _ in 0..3 {
        paragraph(&mut tree, header, "tall", PropertyList::new());
    }
    paragraph(&mut tree, flow, "content", PropertyList::new());

    let output = run(&tree);
    assert_eq!(lines(&output.pages[0], RegionName::Before).len(), 3);
    assert_eq!(
        output.warnings(),
        ["static content does not fit into the Before region"]
    );
}
