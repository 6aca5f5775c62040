//! Tables: columns distributed over the table width, rows of cells stacked
//! in the block progression direction.
//!
//! Rows are never split. Each row contributes one box of the height of its
//! tallest cell, so page breaks can only fall between rows.

use folio_library::area::{Area, BlockArea};
use folio_library::diag::{At, Span, warning};
use folio_library::engine::Engine;
use folio_library::foundations::{ColumnWidth, PropertyId, TableLayout};
use folio_library::layout::{Abs, Point};
use folio_library::model::NodeId;
use smallvec::SmallVec;

use super::{ManagerId, ManagerKind, Managers};
use crate::atoms::{Atom, INFINITE, Position, natural_extent};
use crate::columns::{ColumnSetup, ColumnSpec};
use crate::context::LayoutContext;

/// The per-table state of a table manager.
#[derive(Debug, Default, Clone)]
pub(super) struct TableState {
    /// The column declarations, in order.
    pub(super) column_nodes: Vec<NodeId>,
    /// The rows with the managers of their cells.
    pub(super) row_specs: Vec<(NodeId, Vec<ManagerId>)>,
    pub(super) setup: ColumnSetup,
    rows: Vec<Row>,
}

impl TableState {
    pub(super) fn reset(&mut self) {
        self.setup.reset();
        self.rows.clear();
    }
}

/// A row whose cells were laid out.
#[derive(Debug, Clone)]
struct Row {
    node: NodeId,
    height: Abs,
    cells: SmallVec<[PlacedCell; 4]>,
    keep_with_next: bool,
    keep_with_previous: bool,
}

/// A cell with its position in the row and the atoms of its content.
#[derive(Debug, Clone)]
struct PlacedCell {
    manager: ManagerId,
    x: Abs,
    width: Abs,
    atoms: Vec<Atom>,
}

impl Managers<'_> {
    /// Lay out all rows of a table and return one box per row.
    pub(super) fn next_table(
        &mut self,
        engine: &mut Engine,
        id: ManagerId,
        ctx: &mut LayoutContext,
    ) -> Vec<Atom> {
        if let Some(atoms) = self.serve_break_before(id) {
            return atoms;
        }

        let node = self[id].node;
        let span = Span::from(node);
        let width = self.table_width(engine, id);
        let content_ipd = (width - self[id].frame.inner_inline()).max(Abs::zero());
        self[id].content_ipd = content_ipd;

        let mut setup = match &mut self[id].kind {
            ManagerKind::Table(table) => std::mem::take(&mut table.setup),
            _ => return vec![],
        };
        if setup.is_empty() {
            setup = ColumnSetup::new(self.column_specs(engine, id));
        }
        let widths = setup.resolve_widths(content_ipd, &*self, span, engine);
        if let ManagerKind::Table(table) = &mut self[id].kind {
            table.setup = setup;
        }

        let rows = self.layout_rows(engine, id, &widths, ctx);

        let mut atoms = vec![];
        self.open_frame(id, &mut atoms, ctx);
        let keep = self.must_keep_together(id);
        for (i, row) in rows.iter().enumerate() {
            if let Some(prev) = i.checked_sub(1).map(|k| &rows[k]) {
                let kept = keep || prev.keep_with_next || row.keep_with_previous;
                let cost = if kept { INFINITE } else { 0 };
                atoms.push(Atom::penalty(cost, Position::frame(id)));
            }
            atoms.push(Atom::boxed(row.height, Position::new(id, i)));
        }
        self.close_frame(id, &mut atoms);
        self.finish_frame(id, &mut atoms, ctx);

        tracing::debug!(table = ?node, columns = widths.len(), rows = rows.len(), "laid out table");
        if let ManagerKind::Table(table) = &mut self[id].kind {
            table.rows = rows;
        }
        atoms
    }

    /// Turn the row boxes in `atoms` into row areas with their cells.
    pub(super) fn materialize_table(
        &mut self,
        engine: &mut Engine,
        id: ManagerId,
        atoms: &[Atom],
        ctx: &LayoutContext,
    ) {
        let mut seen_content = false;
        for atom in atoms.iter().filter(|atom| atom.position.manager == id) {
            if atom.position.is_frame() {
                self.materialize_frame_atom(id, atom, seen_content, ctx);
                seen_content |= atom.is_box();
                continue;
            }

            if !atom.is_box() {
                continue;
            }

            let Some((row_node, height, cells)) = self.take_row(id, atom.position.index)
            else {
                continue;
            };

            let mut area = BlockArea::new(self[id].content_ipd, Some(row_node));
            area.set_bpd(height);
            for cell in cells {
                // Cells are never stretched with the page.
                let cell_ctx = LayoutContext { space_adjust: 0.0, ..ctx.child(cell.width) };
                self.area_mut(cell.manager);
                self.materialize_areas(engine, cell.manager, &cell.atoms, &cell_ctx);
                if let Some(mut cell_area) = self.take_area(cell.manager) {
                    cell_area.set_bpd(height);
                    area.push(Point::new(cell.x, Abs::zero()), Area::Block(cell_area));
                }
            }

            let x = self[id].frame.inner_start();
            self.area_mut(id).stack(x, Area::Block(area));
            seen_content = true;
        }
    }

    /// The width of the table including borders and paddings.
    fn table_width(&mut self, engine: &mut Engine, id: ManagerId) -> Abs {
        let node = self[id].node;
        let styles = self.tree.styles(node);
        let span = Span::from(node);
        let available =
            (self[id].available_ipd - self[id].frame.indents.inline_sum()).max(Abs::zero());

        let layout: TableLayout = engine.delay(styles.keyword(PropertyId::TableLayout).at(span));
        match engine.delay(styles.auto_length(PropertyId::Width).at(span)) {
            Some(length) => {
                let width = self.resolve(&length, engine);
                if width > available {
                    engine.sink.warn(warning!(
                        span,
                        "table is wider than the available space";
                        hint: "the table is {:?} wide, but only {:?} are available",
                        width, available
                    ));
                }
                width
            }
            None => {
                if layout == TableLayout::Fixed {
                    engine.sink.warn(warning!(
                        span,
                        "a fixed table layout needs an explicit width, assuming 100%";
                        hint: "set the table's width"
                    ));
                }
                available
            }
        }
    }

    /// The declared columns of a table. Without declarations, every column
    /// a row occupies gets an equal share.
    fn column_specs(&self, engine: &mut Engine, id: ManagerId) -> Vec<ColumnSpec> {
        let ManagerKind::Table(table) = &self[id].kind else {
            return vec![];
        };

        if !table.column_nodes.is_empty() {
            return table
                .column_nodes
                .iter()
                .map(|&node| ColumnSpec {
                    node,
                    width: engine.delay(self.tree.styles(node).column_width().at(node)),
                })
                .collect();
        }

        let count = table
            .row_specs
            .iter()
            .map(|(_, cells)| {
                cells.iter().map(|&cell| self.column_span(engine, cell)).sum::<usize>()
            })
            .max()
            .unwrap_or(0);

        let node = self[id].node;
        vec![ColumnSpec { node, width: ColumnWidth::Proportional(1.0) }; count]
    }

    /// How many columns a cell spans, at least one.
    fn column_span(&self, engine: &mut Engine, cell: ManagerId) -> usize {
        let node = self[cell].node;
        let spanned =
            engine.delay(self.tree.styles(node).int(PropertyId::NumberColumnsSpanned, 1).at(node));
        spanned.max(1) as usize
    }

    /// Lay out the cells of every row in their columns.
    fn layout_rows(
        &mut self,
        engine: &mut Engine,
        id: ManagerId,
        widths: &[Abs],
        ctx: &LayoutContext,
    ) -> Vec<Row> {
        let specs = match &self[id].kind {
            ManagerKind::Table(table) => table.row_specs.clone(),
            _ => return vec![],
        };

        let mut rows = Vec::with_capacity(specs.len());
        for (row_node, cells) in specs {
            let styles = self.tree.styles(row_node);
            let span = Span::from(row_node);
            let min_height = engine
                .delay(styles.auto_length(PropertyId::Height).at(span))
                .map_or(Abs::zero(), |length| self.resolve(&length, engine));
            let keep_with_next = engine.delay(styles.keep(PropertyId::KeepWithNext).at(span));
            let keep_with_previous =
                engine.delay(styles.keep(PropertyId::KeepWithPrevious).at(span));

            let mut row = Row {
                node: row_node,
                height: min_height,
                cells: SmallVec::new(),
                keep_with_next: keep_with_next.is_active(),
                keep_with_previous: keep_with_previous.is_active(),
            };

            let mut column = 0;
            for cell in cells {
                let end = column + self.column_span(engine, cell);
                if end > widths.len() {
                    engine.sink.warn(warning!(
                        self[cell].node,
                        "table cell does not fit into the table's columns";
                        hint: "the table has {} columns", widths.len()
                    ));
                    break;
                }

                let x = widths[..column].iter().sum();
                let width = widths[column..end].iter().sum();
                let atoms = self.layout_cell(engine, cell, width, ctx);
                row.height.set_max(natural_extent(&atoms));
                row.cells.push(PlacedCell { manager: cell, x, width, atoms });
                column = end;
            }

            rows.push(row);
        }

        rows
    }

    /// Lay out the complete content of a cell. Forced breaks inside a cell
    /// have no effect since rows are never split.
    fn layout_cell(
        &mut self,
        engine: &mut Engine,
        cell: ManagerId,
        width: Abs,
        ctx: &LayoutContext,
    ) -> Vec<Atom> {
        let mut cell_ctx = ctx.child(width);
        let mut atoms = vec![];
        while !self.is_finished(cell) {
            let chunk = self.next_atoms(engine, cell, &mut cell_ctx);
            if chunk.is_empty() {
                break;
            }
            atoms.extend(chunk.into_iter().filter(|atom| !atom.is_forced_break()));
        }
        atoms
    }

    /// Take the cells of a laid out row for materialization.
    fn take_row(
        &mut self,
        id: ManagerId,
        index: usize,
    ) -> Option<(NodeId, Abs, SmallVec<[PlacedCell; 4]>)> {
        let ManagerKind::Table(table) = &mut self[id].kind else {
            return None;
        };
        let row = table.rows.get_mut(index)?;
        Some((row.node, row.height, std::mem::take(&mut row.cells)))
    }
}
