use folio::diag::Severity;
use folio::foundations::{PropertyId, PropertyList};
use folio::layout::{Length, LengthBase, PercentBaseKind, Ratio};
use folio::model::{ContentTree, NodeKind};

use crate::world::{body, paragraph, run, sequence, small_master};

#[test]
fn test_invalid_keyword_fails_after_layout() {
    let mut tree = ContentTree::new();
    let (_, flow) = sequence(&mut tree, small_master(), PropertyList::new());
    paragraph(
        &mut tree,
        flow,
        "odd",
        PropertyList::new().with(PropertyId::TextAlign, "sideways"),
    );

    let output = run(&tree);
    let errors = output.result.output.as_ref().unwrap_err();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].severity, Severity::Error);
    assert!(errors[0].message.contains("unknown enum value `sideways`"));

    // The pages were still laid out with the initial value.
    assert_eq!(output.pages.len(), 1);
    assert_eq!(body(&output.pages[0]), ["odd"]);
}

#[test]
fn test_unavailable_percent_base_resolves_to_zero() {
    let mut tree = ContentTree::new();
    let (_, flow) = sequence(&mut tree, small_master(), PropertyList::new());
    let base = LengthBase::new(PercentBaseKind::ImageIntrinsicWidth, tree.root());
    let block = tree.push(
        flow,
        NodeKind::Block,
        PropertyList::new()
            .with(PropertyId::StartIndent, Length::percent(Ratio::new(0.1), base)),
    );
    paragraph(&mut tree, block, "indented", PropertyList::new());

    let output = run(&tree);
    assert_eq!(output.document().pages, 1);
    assert_eq!(
        output.warnings(),
        ["percent base ImageIntrinsicWidth is not available here, using zero"]
    );
    let flow = &output.pages[0].regions[0].content;
    let (pos, _) = &flow.children()[0];
    assert_eq!(pos.x, folio::layout::Abs::zero());
}

#[test]
fn test_content_outside_sequence_is_ignored() {
    let mut tree = ContentTree::new();
    let stray = tree.push(tree.root(), NodeKind::Flow, PropertyList::new());
    paragraph(&mut tree, stray, "lost", PropertyList::new());

    let output = run(&tree);
    assert_eq!(output.document().pages, 0);
    assert!(output.pages.is_empty());
    assert_eq!(output.warnings(), ["content outside of a page sequence is ignored"]);
    assert_eq!(output.result.warnings[0].hints[0].as_str(), "wrap it in a page sequence");
}

#[test]
fn test_empty_sequence_still_produces_a_page() {
    let mut tree = ContentTree::new();
    sequence(&mut tree, small_master(), PropertyList::new());

    let output = run(&tree);
    assert!(output.warnings().is_empty());
    assert_eq!(output.document().pages, 1);
    assert!(!output.pages[0].blank);
    assert!(body(&output.pages[0]).is_empty());
}
