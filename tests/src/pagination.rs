use folio::config::Config;
use folio::foundations::{Keep, PropertyId, PropertyList};
use folio::layout::{Abs, Length};
use folio::model::{ContentTree, NodeKind};

use crate::world::{body, paragraph, run, run_with, sequence, small_master};

/// Five one-line paragraphs, a heading and the paragraph it introduces.
fn heading_near_page_end(keep: bool) -> ContentTree {
    let mut tree = ContentTree::new();
    let (_, flow) = sequence(&mut tree, small_master(), PropertyList::new());
    for _ in 0..5 {
        paragraph(&mut tree, flow, "filler", PropertyList::new());
    }
    let mut props = PropertyList::new();
    if keep {
        props.set(PropertyId::KeepWithNext, Keep::always());
    }
    paragraph(&mut tree, flow, "heading", props);
    paragraph(&mut tree, flow, "body", PropertyList::new());
    tree
}

#[test]
fn test_heading_stays_on_page_without_keep() {
    let output = run(&heading_near_page_end(false));
    assert_eq!(output.document().pages, 2);
    assert_eq!(body(&output.pages[0]).last().map(String::as_str), Some("heading"));
    assert_eq!(body(&output.pages[1]), ["body"]);
}

#[test]
fn test_keep_with_next_moves_heading() {
    let output = run(&heading_near_page_end(true));
    assert!(output.warnings().is_empty(), "{:?}", output.warnings());
    assert_eq!(output.document().pages, 2);
    assert_eq!(body(&output.pages[0]).len(), 5);
    assert_eq!(body(&output.pages[1]), ["heading", "body"]);
}

#[test]
fn test_bordered_keep_together_block_moves_whole() {
    let mut tree = ContentTree::new();
    let (_, flow) = sequence(&mut tree, small_master(), PropertyList::new());
    for _ in 0..4 {
        paragraph(&mut tree, flow, "filler", PropertyList::new());
    }

    // 1 + 10 + 14.4 + 10 + 14.4 + 1 points do not fit below four lines.
    let border = Length::from(Abs::pt(1.0));
    let block = tree.push(
        flow,
        NodeKind::Block,
        PropertyList::new()
            .with(PropertyId::KeepTogether, Keep::always())
            .with(PropertyId::BorderBeforeWidth, border.clone())
            .with(PropertyId::BorderAfterWidth, border),
    );
    tree.set_xml_id(block, "kept");
    for text in ["inside", "kept"] {
        let spaced =
            PropertyList::new().with(PropertyId::SpaceBefore, Length::from(Abs::pt(10.0)));
        paragraph(&mut tree, block, text, spaced);
    }

    let output = run(&tree);
    assert!(output.warnings().is_empty(), "{:?}", output.warnings());
    assert_eq!(output.document().pages, 2);
    assert_eq!(body(&output.pages[0]), ["filler"; 4]);
    assert_eq!(body(&output.pages[1]), ["inside", "kept"]);
    assert_eq!(output.document().ids.page_of("kept"), Some(2));
    assert!(!output.pages[0].ids.iter().any(|id| id.as_str() == "kept"));
}

/// A paragraph of seven one-word lines on pages that hold six.
fn seven_lines(orphans: i64, widows: i64) -> Vec<usize> {
    let mut tree = ContentTree::new();
    let mut master = small_master();
    master.size.width = Abs::pt(30.0);
    let (_, flow) = sequence(&mut tree, master, PropertyList::new());
    paragraph(
        &mut tree,
        flow,
        "aaaa bbbb cccc dddd eeee ffff gggg",
        PropertyList::new()
            .with(PropertyId::Orphans, orphans)
            .with(PropertyId::Widows, widows),
    );

    let output = run(&tree);
    output.pages.iter().map(|page| body(page).len()).collect()
}

#[test]
fn test_widows_pull_lines_to_next_page() {
    assert_eq!(seven_lines(1, 1), [6, 1]);
    assert_eq!(seven_lines(2, 2), [5, 2]);
    assert_eq!(seven_lines(1, 3), [4, 3]);
}

#[test]
fn test_leading_break_produces_no_empty_page() {
    let mut tree = ContentTree::new();
    let (_, flow) = sequence(&mut tree, small_master(), PropertyList::new());
    let block = tree.push(
        flow,
        NodeKind::Block,
        PropertyList::new().with(PropertyId::BreakBefore, "page"),
    );
    paragraph(&mut tree, block, "first", PropertyList::new());

    let output = run(&tree);
    assert_eq!(output.document().pages, 1);
    assert_eq!(body(&output.pages[0]), ["first"]);
}

#[test]
fn test_odd_page_break_inserts_blank_page() {
    let mut tree = ContentTree::new();
    let (_, flow) = sequence(&mut tree, small_master(), PropertyList::new());
    paragraph(&mut tree, flow, "one", PropertyList::new());
    let block = tree.push(
        flow,
        NodeKind::Block,
        PropertyList::new().with(PropertyId::BreakBefore, "odd-page"),
    );
    paragraph(&mut tree, block, "three", PropertyList::new());

    let output = run(&tree);
    let pages: Vec<(usize, bool)> = output.pages.iter().map(|p| (p.number, p.blank)).collect();
    assert_eq!(pages, [(1, false), (2, true), (3, false)]);
    assert_eq!(body(&output.pages[2]), ["three"]);
}

#[test]
fn test_force_page_count_even() {
    let mut tree = ContentTree::new();
    let (_, flow) = sequence(
        &mut tree,
        small_master(),
        PropertyList::new().with(PropertyId::ForcePageCount, "even"),
    );
    paragraph(&mut tree, flow, "alone", PropertyList::new());

    let output = run(&tree);
    assert_eq!(output.document().pages, 2);
    assert!(!output.pages[0].blank);
    assert!(output.pages[1].blank);
}

#[test]
fn test_auto_page_count_respects_next_initial_number() {
    let mut tree = ContentTree::new();
    let (_, first) = sequence(&mut tree, small_master(), PropertyList::new());
    paragraph(&mut tree, first, "front", PropertyList::new());
    let (_, second) = sequence(
        &mut tree,
        small_master(),
        PropertyList::new().with(PropertyId::InitialPageNumber, 5_i64),
    );
    paragraph(&mut tree, second, "main", PropertyList::new());

    let output = run(&tree);
    let pages: Vec<(usize, usize, bool)> =
        output.pages.iter().map(|p| (p.sequence, p.number, p.blank)).collect();
    assert_eq!(pages, [(0, 1, false), (0, 2, true), (1, 5, false)]);
}

#[test]
fn test_ids_map_to_page_numbers() {
    let mut tree = ContentTree::new();
    let (_, flow) = sequence(&mut tree, small_master(), PropertyList::new());
    let intro = paragraph(&mut tree, flow, "intro", PropertyList::new());
    tree.set_xml_id(intro, "intro");
    let block = tree.push(
        flow,
        NodeKind::Block,
        PropertyList::new().with(PropertyId::BreakBefore, "page"),
    );
    tree.set_xml_id(block, "second");
    paragraph(&mut tree, block, "later", PropertyList::new());

    let output = run(&tree);
    let ids = &output.document().ids;
    assert_eq!(ids.page_of("intro"), Some(1));
    assert_eq!(ids.page_of("second"), Some(2));
    assert_eq!(ids.page_of("missing"), None);
    assert!(output.pages[1].ids.iter().any(|id| id.as_str() == "second"));
}

#[test]
fn test_parallel_layout_matches_sequential() {
    let mut tree = ContentTree::new();
    for name in ["one", "two", "three"] {
        let (_, flow) = sequence(&mut tree, small_master(), PropertyList::new());
        for _ in 0..8 {
            paragraph(&mut tree, flow, name, PropertyList::new());
        }
    }

    let sequential = run(&tree);
    let config = Config::from_toml("parallel = true").unwrap();
    assert!(config.parallel);
    let parallel = run_with(&config, &tree);

    assert_eq!(sequential.document(), parallel.document());
    assert_eq!(sequential.pages, parallel.pages);
    assert_eq!(sequential.pages.len(), 6);
}
