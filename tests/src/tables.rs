use folio::area::{Area, BlockArea, Page};
use folio::foundations::{ColumnWidth, PropertyId, PropertyList};
use folio::layout::{Abs, Length};
use folio::model::{ContentTree, NodeId, NodeKind, PageMaster};

use crate::world::{body, paragraph, run, sequence, small_master};

/// Append a row with one single-paragraph cell per text.
fn row(tree: &mut ContentTree, table: NodeId, texts: &[&str]) {
    let row = tree.push(table, NodeKind::TableRow, PropertyList::new());
    for text in texts {
        let cell = tree.push(row, NodeKind::TableCell, PropertyList::new());
        paragraph(tree, cell, text, PropertyList::new());
    }
}

/// The area of the first table in the body of a page.
fn table_area(page: &Page) -> &BlockArea {
    let flow = &page.regions[0].content;
    match flow.children().first() {
        Some((_, Area::Block(table))) => table,
        other => panic!("expected a table, found {other:?}"),
    }
}

/// The blocks directly inside a block.
fn blocks(area: &BlockArea) -> Vec<(Abs, &BlockArea)> {
    area.children()
        .iter()
        .filter_map(|(pos, child)| match child {
            Area::Block(block) => Some((pos.x, block)),
            Area::Line(_) => None,
        })
        .collect()
}

#[test]
fn test_proportional_column_takes_remaining_width() {
    let mut tree = ContentTree::new();
    let (_, flow) = sequence(&mut tree, PageMaster::letter(), PropertyList::new());
    let table = tree.push(flow, NodeKind::Table, PropertyList::new());
    for width in [
        ColumnWidth::Fixed(Abs::inches(2.0).into()),
        ColumnWidth::Fixed(Abs::inches(2.0).into()),
        ColumnWidth::Proportional(1.0),
    ] {
        tree.push(
            table,
            NodeKind::TableColumn,
            PropertyList::new().with(PropertyId::ColumnWidth, width),
        );
    }
    row(&mut tree, table, &["a", "b", "c"]);

    let output = run(&tree);
    assert!(output.warnings().is_empty(), "{:?}", output.warnings());

    let rows = blocks(table_area(&output.pages[0]));
    assert_eq!(rows.len(), 1);
    let cells: Vec<(Abs, Abs)> =
        blocks(rows[0].1).iter().map(|(x, cell)| (*x, cell.ipd())).collect();
    assert_eq!(
        cells,
        [
            (Abs::zero(), Abs::inches(2.0)),
            (Abs::inches(2.0), Abs::inches(2.0)),
            (Abs::inches(4.0), Abs::mpt(180000)),
        ]
    );
    assert_eq!(body(&output.pages[0]), ["a", "b", "c"]);
}

#[test]
fn test_rows_break_across_pages_whole() {
    let mut tree = ContentTree::new();
    let (_, flow) = sequence(&mut tree, small_master(), PropertyList::new());
    let table = tree.push(flow, NodeKind::Table, PropertyList::new());
    for i in 0..10 {
        let text = format!("row{i}");
        row(&mut tree, table, &[text.as_str()]);
    }

    let output = run(&tree);
    assert_eq!(output.document().pages, 2);
    let counts: Vec<usize> =
        output.pages.iter().map(|page| blocks(table_area(page)).len()).collect();
    assert_eq!(counts, [6, 4]);
    assert_eq!(body(&output.pages[1]).first().map(String::as_str), Some("row6"));
}

#[test]
fn test_too_wide_table_warns() {
    let mut tree = ContentTree::new();
    let (_, flow) = sequence(&mut tree, small_master(), PropertyList::new());
    let table = tree.push(
        flow,
        NodeKind::Table,
        PropertyList::new().with(PropertyId::Width, Length::from(Abs::pt(300.0))),
    );
    row(&mut tree, table, &["wide"]);

    let output = run(&tree);
    assert_eq!(output.warnings(), ["table is wider than the available space"]);
    assert_eq!(blocks(table_area(&output.pages[0]))[0].1.ipd(), Abs::pt(300.0));
}
