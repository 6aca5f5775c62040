//! The layout manager tree.
//!
//! Every content node that takes part in layout gets a manager. The managers
//! live in an arena and refer to each other by [`ManagerId`]. Layout runs in
//! two phases per breakable unit:
//! - [`Managers::next_atoms`] asks a manager for the boxes, glues and
//!   penalties of its content. A stacking manager asks its children in turn
//!   and joins their atoms with penalties that encode the keep conditions.
//! - After the atoms were broken into pages, [`Managers::materialize_areas`]
//!   turns the atoms of one page back into areas. Each atom's [`Position`]
//!   names the manager that produced it, so atoms are routed down the tree
//!   to their producers.

mod paragraph;
mod stack;
mod table;

use std::fmt::{self, Debug, Formatter};
use std::ops::{Index, IndexMut};

use ecow::EcoString;
use folio_library::area::{Area, BlockArea};
use folio_library::diag::{At, Span};
use folio_library::engine::Engine;
use folio_library::foundations::{BreakClass, PropertyId};
use folio_library::layout::{
    Abs, Length, MinOptMax, PercentBaseContext, PercentBaseKind, Sides,
};
use folio_library::model::{ContentTree, NodeId, NodeKind, TextMeasure};
use rustc_hash::FxHashMap;

use self::paragraph::ParagraphState;
use self::table::TableState;
use crate::atoms::{Atom, AtomKind, INFINITE, Position, has_content, hold_trailing_glue};
use crate::context::{ContextFlags, LayoutContext};

/// Identifies a manager in the arena.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct ManagerId(u32);

impl ManagerId {
    /// Create a manager id from a raw arena index.
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// The arena index.
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl Debug for ManagerId {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "m{}", self.0)
    }
}

/// The arena of layout managers for one page sequence.
pub struct Managers<'a> {
    tree: &'a ContentTree,
    measure: &'a dyn TextMeasure,
    /// The block-progression dimension of the region being filled.
    region_bpd: Abs,
    managers: Vec<Manager>,
    by_node: FxHashMap<NodeId, ManagerId>,
    /// Ids of the nodes materialized since the last page was taken.
    page_ids: Vec<EcoString>,
}

/// A layout manager and its per-attempt state.
pub struct Manager {
    node: NodeId,
    parent: Option<ManagerId>,
    children: Vec<ManagerId>,
    kind: ManagerKind,
    frame: Frame,
    prepared: bool,
    break_before_served: bool,
    /// Whether the opening frame atoms were emitted.
    started: bool,
    /// The child that is asked for atoms next.
    cursor: usize,
    finished: bool,
    /// The last child's content must stay with the next child's.
    keep_next_pending: bool,
    /// Child content was emitted and the next child needs a separator.
    needs_separator: bool,
    /// The inline progression dimension the parent offers.
    available_ipd: Abs,
    /// The inline progression dimension inside borders and paddings.
    content_ipd: Abs,
    /// The area being filled on the current page.
    area: Option<BlockArea>,
    /// Space to add before and after the area when it is placed.
    space_before: Abs,
    space_after: Abs,
    id_reported: bool,
}

/// What a manager lays out.
enum ManagerKind {
    /// The content of a region: the flow or a static content.
    Flow,
    Block,
    Paragraph(ParagraphState),
    Table(TableState),
    TableCell,
}

/// The resolved frame of a block-level node: the spaces, borders and breaks
/// around its content.
#[derive(Debug, Default, Clone)]
struct Frame {
    borders: Sides<Abs>,
    padding: Sides<Abs>,
    indents: Sides<Abs>,
    space_before: MinOptMax,
    space_after: MinOptMax,
    break_before: BreakClass,
    break_after: BreakClass,
    background: Option<EcoString>,
    keep_together: bool,
    keep_with_next: bool,
    keep_with_previous: bool,
}

impl Frame {
    /// The extent of the borders and paddings before the content.
    fn opening(&self) -> Abs {
        self.borders.before + self.padding.before
    }

    /// The extent of the borders and paddings after the content.
    fn closing(&self) -> Abs {
        self.padding.after + self.borders.after
    }

    /// Where the content starts relative to the area's start edge.
    fn inner_start(&self) -> Abs {
        self.borders.start + self.padding.start
    }

    /// The inline extent of borders and paddings.
    fn inner_inline(&self) -> Abs {
        self.borders.inline_sum() + self.padding.inline_sum()
    }
}

impl<'a> Managers<'a> {
    /// Create an empty arena for a region of the given block-progression
    /// dimension.
    pub fn new(tree: &'a ContentTree, measure: &'a dyn TextMeasure, region_bpd: Abs) -> Self {
        Self {
            tree,
            measure,
            region_bpd,
            managers: vec![],
            by_node: FxHashMap::default(),
            page_ids: vec![],
        }
    }

    /// Build the managers for a node and its descendants.
    pub fn build(&mut self, node: NodeId) -> ManagerId {
        self.build_in(node, None, ManagerKind::Flow)
    }

    fn build_in(
        &mut self,
        node: NodeId,
        parent: Option<ManagerId>,
        kind: ManagerKind,
    ) -> ManagerId {
        let id = ManagerId(self.managers.len() as u32);
        self.managers.push(Manager::new(node, parent, kind));
        self.by_node.insert(node, id);
        if let Some(parent) = parent {
            self[parent].children.push(id);
        }

        let tree = self.tree;
        for &child in tree.node(node).children() {
            match tree.node(child).kind() {
                NodeKind::Flow | NodeKind::StaticContent(_) => {
                    self.build_in(child, Some(id), ManagerKind::Flow);
                }
                NodeKind::Block => {
                    self.build_in(child, Some(id), ManagerKind::Block);
                }
                NodeKind::Paragraph(_) => {
                    self.build_in(child, Some(id), ManagerKind::Paragraph(ParagraphState::default()));
                }
                NodeKind::Table => {
                    self.build_in(child, Some(id), ManagerKind::Table(TableState::default()));
                }
                NodeKind::TableColumn => {
                    self.by_node.insert(child, id);
                    if let ManagerKind::Table(table) = &mut self[id].kind {
                        table.column_nodes.push(child);
                    }
                }
                NodeKind::TableRow => {
                    self.by_node.insert(child, id);
                    let mut cells = vec![];
                    for &cell in tree.node(child).children() {
                        if matches!(tree.node(cell).kind(), NodeKind::TableCell) {
                            cells.push(self.build_in(cell, Some(id), ManagerKind::TableCell));
                        }
                    }
                    if let ManagerKind::Table(table) = &mut self[id].kind {
                        table.row_specs.push((child, cells));
                    }
                }
                NodeKind::TableCell => {
                    self.build_in(child, Some(id), ManagerKind::TableCell);
                }
                NodeKind::Root | NodeKind::PageSequence(_) => {}
            }
        }

        id
    }

    /// The manager of a node, if it has one.
    pub fn manager_of(&self, node: NodeId) -> Option<ManagerId> {
        self.by_node.get(&node).copied().filter(|&id| self[id].node == node)
    }

    /// The content node of a manager.
    pub fn node(&self, id: ManagerId) -> NodeId {
        self[id].node
    }

    /// The next atoms of a manager's content.
    ///
    /// A manager returns its content up to and including the first forced
    /// break, or all of it. A sequence of nothing but one forced break asks
    /// for a break before the content. Once the manager is finished, the
    /// result is empty.
    pub fn next_atoms(
        &mut self,
        engine: &mut Engine,
        id: ManagerId,
        ctx: &mut LayoutContext,
    ) -> Vec<Atom> {
        if self[id].finished {
            return vec![];
        }

        self.prepare(engine, id, ctx);
        let atoms = match self[id].kind {
            ManagerKind::Paragraph(_) => self.next_paragraph(engine, id, ctx),
            ManagerKind::Table(_) => self.next_table(engine, id, ctx),
            ManagerKind::Flow | ManagerKind::Block | ManagerKind::TableCell => {
                self.next_stacked(engine, id, ctx)
            }
        };

        tracing::trace!(
            manager = ?id,
            atoms = atoms.len(),
            finished = self[id].finished,
            flags = ?ctx.flags,
            "produced atoms"
        );
        atoms
    }

    /// Turn atoms this manager produced, directly or through descendants,
    /// into areas.
    ///
    /// The result stays with the manager until its parent places it or it is
    /// [taken](Self::take_area).
    pub fn materialize_areas(
        &mut self,
        engine: &mut Engine,
        id: ManagerId,
        atoms: &[Atom],
        ctx: &LayoutContext,
    ) {
        if has_content(atoms) && !self[id].id_reported {
            self[id].id_reported = true;
            if let Some(xml_id) = self.tree.node(self[id].node).xml_id() {
                self.page_ids.push(xml_id.clone());
            }
        }

        match self[id].kind {
            ManagerKind::Paragraph(_) => self.materialize_paragraph(id, atoms, ctx),
            ManagerKind::Table(_) => self.materialize_table(engine, id, atoms, ctx),
            ManagerKind::Flow | ManagerKind::Block | ManagerKind::TableCell => {
                self.materialize_stacked(engine, id, atoms, ctx)
            }
        }
    }

    /// Whether the manager's content must not be broken: its own
    /// keep-together is active or an ancestor's is.
    pub fn must_keep_together(&self, id: ManagerId) -> bool {
        let manager = &self[id];
        manager.frame.keep_together
            || manager.parent.is_some_and(|parent| self.must_keep_together(parent))
    }

    /// Whether the manager's content must stay with what precedes it.
    pub fn must_keep_with_previous(&self, id: ManagerId) -> bool {
        self[id].frame.keep_with_previous
    }

    /// Whether the manager's content must stay with what follows it.
    pub fn must_keep_with_next(&self, id: ManagerId) -> bool {
        self[id].frame.keep_with_next
    }

    /// Whether the manager has returned all of its content.
    pub fn is_finished(&self, id: ManagerId) -> bool {
        self[id].finished
    }

    /// Discard everything the manager and its descendants did so far so that
    /// layout can start over.
    pub fn reset(&mut self, id: ManagerId) {
        let manager = &mut self[id];
        manager.prepared = false;
        manager.break_before_served = false;
        manager.started = false;
        manager.cursor = 0;
        manager.finished = false;
        manager.keep_next_pending = false;
        manager.needs_separator = false;
        manager.area = None;
        manager.space_before = Abs::zero();
        manager.space_after = Abs::zero();
        manager.id_reported = false;
        match &mut manager.kind {
            ManagerKind::Paragraph(paragraph) => paragraph.reset(),
            ManagerKind::Table(table) => table.reset(),
            ManagerKind::Flow | ManagerKind::Block | ManagerKind::TableCell => {}
        }

        for i in 0..self[id].children.len() {
            let child = self[id].children[i];
            self.reset(child);
        }
    }

    /// Take the area the manager filled, leaving it to start a new one.
    pub fn take_area(&mut self, id: ManagerId) -> Option<BlockArea> {
        let manager = &mut self[id];
        manager.space_before = Abs::zero();
        manager.space_after = Abs::zero();
        manager.area.take()
    }

    /// Take the ids of the nodes that were materialized since the last call.
    pub fn take_page_ids(&mut self) -> Vec<EcoString> {
        std::mem::take(&mut self.page_ids)
    }

    /// Resolve the frame and the available widths of a manager on its first
    /// request.
    fn prepare(&mut self, engine: &mut Engine, id: ManagerId, ctx: &LayoutContext) {
        if self[id].prepared {
            return;
        }

        // Percentages in the frame resolve against the available width.
        self[id].available_ipd = ctx.ref_ipd;
        let frame = match self[id].kind {
            ManagerKind::Flow => Frame::default(),
            ManagerKind::TableCell => Frame {
                space_before: MinOptMax::zero(),
                space_after: MinOptMax::zero(),
                break_before: BreakClass::Auto,
                break_after: BreakClass::Auto,
                ..self.resolve_frame(engine, self[id].node)
            },
            _ => self.resolve_frame(engine, self[id].node),
        };

        let manager = &mut self[id];
        manager.content_ipd =
            (ctx.ref_ipd - frame.indents.inline_sum() - frame.inner_inline()).max(Abs::zero());
        manager.frame = frame;
        manager.prepared = true;
    }

    fn resolve_frame(&self, engine: &mut Engine, node: NodeId) -> Frame {
        let styles = self.tree.styles(node);
        let span = Span::from(node);

        let borders = engine.delay(styles.border_widths().at(span));
        let padding = engine.delay(styles.paddings().at(span));
        let start = engine.delay(styles.length(PropertyId::StartIndent).at(span));
        let end = engine.delay(styles.length(PropertyId::EndIndent).at(span));
        let before = engine.delay(styles.space(PropertyId::SpaceBefore).at(span));
        let after = engine.delay(styles.space(PropertyId::SpaceAfter).at(span));
        let keep_together = engine.delay(styles.keep(PropertyId::KeepTogether).at(span));
        let keep_with_next = engine.delay(styles.keep(PropertyId::KeepWithNext).at(span));
        let keep_with_previous =
            engine.delay(styles.keep(PropertyId::KeepWithPrevious).at(span));

        let mut resolve_sides =
            |sides: Sides<Length>| sides.map(|length| self.resolve(&length, engine));
        let borders = resolve_sides(borders);
        let padding = resolve_sides(padding);

        let mut resolve_space = |min: &Length, opt: &Length, max: &Length| {
            MinOptMax::new(
                self.resolve(min, engine),
                self.resolve(opt, engine),
                self.resolve(max, engine),
            )
        };
        let space_before = resolve_space(&before.min, &before.opt, &before.max);
        let space_after = resolve_space(&after.min, &after.opt, &after.max);

        Frame {
            borders,
            padding,
            indents: Sides::new(
                self.resolve(&start, engine),
                Abs::zero(),
                self.resolve(&end, engine),
                Abs::zero(),
            ),
            space_before,
            space_after,
            break_before: engine
                .delay(styles.keyword(PropertyId::BreakBefore).at(span)),
            break_after: engine.delay(styles.keyword(PropertyId::BreakAfter).at(span)),
            background: engine.delay(styles.color(PropertyId::BackgroundColor).at(span)),
            keep_together: keep_together.is_active(),
            keep_with_next: keep_with_next.is_active(),
            keep_with_previous: keep_with_previous.is_active(),
        }
    }

    /// Resolve a length against this arena.
    fn resolve(&self, length: &Length, engine: &mut Engine) -> Abs {
        length.resolve(Some(self), engine)
    }

    /// Returns the break-before of a manager the first time it is asked.
    fn serve_break_before(&mut self, id: ManagerId) -> Option<Vec<Atom>> {
        let manager = &mut self[id];
        if manager.break_before_served {
            return None;
        }
        manager.break_before_served = true;
        let class = manager.frame.break_before;
        class
            .is_forced()
            .then(|| vec![Atom::forced_break(class, Position::frame(id))])
    }

    /// Emit the space before and the opening borders of a manager's frame.
    ///
    /// In a kept frame, the opening borders are never separated from the
    /// content following them.
    fn open_frame(&mut self, id: ManagerId, atoms: &mut Vec<Atom>, ctx: &mut LayoutContext) {
        if self[id].started {
            return;
        }
        let keep = self.must_keep_together(id);
        let manager = &mut self[id];
        manager.started = true;

        let frame = &manager.frame;
        let pos = Position::frame(id);
        if frame.space_before != MinOptMax::zero() {
            let space = frame.space_before;
            atoms.push(Atom::glue(space.opt, space.stretch(), space.shrink(), pos));
        }
        if frame.opening() > Abs::zero() {
            atoms.push(Atom::boxed(frame.opening(), pos));
            if keep || frame.keep_with_previous {
                atoms.push(Atom::penalty(INFINITE, pos));
            }
        }
        if frame.keep_with_previous {
            ctx.flags.insert(ContextFlags::KEEP_WITH_PREVIOUS_PENDING);
        }
    }

    /// Emit the closing borders of a manager's frame.
    fn close_frame(&mut self, id: ManagerId, atoms: &mut Vec<Atom>) {
        let closing = self[id].frame.closing();
        if closing > Abs::zero() {
            let pos = Position::frame(id);
            if self.must_keep_together(id) && atoms.last().is_some_and(Atom::is_glue) {
                hold_trailing_glue(atoms, pos);
            }
            atoms.push(Atom::boxed(closing, pos));
        }
    }

    /// Emit the space after and the break after of a finished manager and
    /// report whether it must stay with what follows.
    fn finish_frame(&mut self, id: ManagerId, atoms: &mut Vec<Atom>, ctx: &mut LayoutContext) {
        let manager = &mut self[id];
        manager.finished = true;

        let frame = &manager.frame;
        let pos = Position::frame(id);
        if frame.space_after != MinOptMax::zero() {
            let space = frame.space_after;
            atoms.push(Atom::glue(space.opt, space.stretch(), space.shrink(), pos));
        }
        if frame.break_after.is_forced() {
            atoms.push(Atom::forced_break(frame.break_after, pos));
        }
        if frame.keep_with_next || manager.keep_next_pending {
            ctx.flags.insert(ContextFlags::KEEP_WITH_NEXT_PENDING);
        }
    }

    /// Account for a frame atom of the manager itself while materializing.
    ///
    /// Glue before any content becomes space before the area, glue after it
    /// space after the area. Boxes are borders and paddings inside the area.
    fn materialize_frame_atom(
        &mut self,
        id: ManagerId,
        atom: &Atom,
        seen_content: bool,
        ctx: &LayoutContext,
    ) {
        match atom.kind {
            AtomKind::Glue { width, stretch, shrink } => {
                let space = ctx.adjust_glue(width, stretch, shrink);
                let manager = &mut self[id];
                if seen_content {
                    manager.space_after += space;
                } else {
                    manager.space_before += space;
                }
            }
            AtomKind::Box { width } => self.area_mut(id).add_space(width),
            AtomKind::Penalty { .. } => {}
        }
    }

    /// The area a manager fills on the current page, created on first use.
    fn area_mut(&mut self, id: ManagerId) -> &mut BlockArea {
        let manager = &mut self[id];
        let area = match manager.area.take() {
            Some(area) => area,
            None => manager.new_area(),
        };
        manager.area.insert(area)
    }

    /// Stack a child's area into the parent's area, with the child's spaces
    /// around it.
    fn place_child(&mut self, parent: ManagerId, child: ManagerId) {
        let x = self[parent].frame.inner_start() + self[child].frame.indents.start;
        let (area, before, after) = {
            let child = &mut self[child];
            (
                child.area.take(),
                std::mem::take(&mut child.space_before),
                std::mem::take(&mut child.space_after),
            )
        };

        let target = self.area_mut(parent);
        target.add_space(before);
        if let Some(area) = area {
            target.stack(x, Area::Block(area));
        }
        target.add_space(after);
    }

    /// The child of `id` on the ancestor chain of `manager`.
    fn child_owning(&self, id: ManagerId, manager: ManagerId) -> Option<ManagerId> {
        let mut current = manager;
        while let Some(parent) = self[current].parent {
            if parent == id {
                return Some(current);
            }
            current = parent;
        }
        None
    }

    /// The nearest ancestor-or-self that establishes a reference area.
    fn reference_area(&self, id: ManagerId) -> ManagerId {
        let mut current = id;
        loop {
            let manager = &self[current];
            match (&manager.kind, manager.parent) {
                (ManagerKind::Flow | ManagerKind::TableCell, _) | (_, None) => {
                    return current;
                }
                (_, Some(parent)) => current = parent,
            }
        }
    }

    /// The computed unit of the table a manager belongs to.
    fn table_unit(&self, id: ManagerId) -> Option<Abs> {
        let mut current = Some(id);
        while let Some(id) = current {
            if let ManagerKind::Table(table) = &self[id].kind {
                return table.setup.unit();
            }
            current = self[id].parent;
        }
        None
    }
}

impl PercentBaseContext for Managers<'_> {
    fn base_length(&self, kind: PercentBaseKind, node: NodeId) -> Option<Abs> {
        let &id = self.by_node.get(&node)?;
        let manager = &self[id];

        // Columns and rows have no managers and speak through their table.
        if manager.node != node {
            return match kind {
                PercentBaseKind::ContainingBlockWidth => Some(manager.content_ipd),
                PercentBaseKind::TableUnits => self.table_unit(id),
                _ => None,
            };
        }

        match kind {
            PercentBaseKind::ContainingBlockWidth | PercentBaseKind::ParentAreaWidth => {
                Some(manager.available_ipd)
            }
            PercentBaseKind::ContainingRefAreaWidth => {
                let area = self.reference_area(id);
                Some(if area == id { manager.available_ipd } else { self[area].content_ipd })
            }
            PercentBaseKind::ContainingBlockHeight => Some(self.region_bpd),
            PercentBaseKind::TableUnits => self.table_unit(id),
            PercentBaseKind::Custom
            | PercentBaseKind::FontSize
            | PercentBaseKind::InheritedFontSize
            | PercentBaseKind::ImageIntrinsicWidth
            | PercentBaseKind::ImageIntrinsicHeight
            | PercentBaseKind::BackgroundPositionHorizontal
            | PercentBaseKind::BackgroundPositionVertical => None,
        }
    }
}

impl Index<ManagerId> for Managers<'_> {
    type Output = Manager;

    fn index(&self, id: ManagerId) -> &Manager {
        &self.managers[id.index()]
    }
}

impl IndexMut<ManagerId> for Managers<'_> {
    fn index_mut(&mut self, id: ManagerId) -> &mut Manager {
        &mut self.managers[id.index()]
    }
}

impl Manager {
    fn new(node: NodeId, parent: Option<ManagerId>, kind: ManagerKind) -> Self {
        Self {
            node,
            parent,
            children: vec![],
            kind,
            frame: Frame::default(),
            prepared: false,
            break_before_served: false,
            started: false,
            cursor: 0,
            finished: false,
            keep_next_pending: false,
            needs_separator: false,
            available_ipd: Abs::zero(),
            content_ipd: Abs::zero(),
            area: None,
            space_before: Abs::zero(),
            space_after: Abs::zero(),
            id_reported: false,
        }
    }

    /// A fresh area for the manager's content on the current page.
    fn new_area(&self) -> BlockArea {
        let frame = &self.frame;
        let mut area =
            BlockArea::new(self.content_ipd + frame.inner_inline(), Some(self.node));
        let traits = area.traits_mut();
        traits.borders = frame.borders;
        traits.padding = frame.padding;
        traits.indents = frame.indents;
        traits.background = frame.background.clone();
        traits.break_before = frame.break_before;
        traits.break_after = frame.break_after;
        area
    }
}

#[cfg(test)]
mod tests {
    use folio_library::config::Config;
    use folio_library::engine::Sink;
    use folio_library::foundations::{Keep, KeepStrength, PropertyList, Value};
    use folio_library::layout::{LengthBase, Ratio};
    use folio_library::model::{InlineItem, Monospace};

    use super::*;
    use crate::atoms::is_break_before;

    fn fixed(pt: f64) -> Value {
        Value::Length(Length::Fixed(Abs::pt(pt)))
    }

    fn paragraph(tree: &mut ContentTree, parent: NodeId, text: &str) -> NodeId {
        tree.push(parent, NodeKind::Paragraph(InlineItem::parse(text)), PropertyList::new())
    }

    #[test]
    fn test_break_before_is_served_once() {
        let mut tree = ContentTree::new();
        let flow = tree.push(tree.root(), NodeKind::Flow, PropertyList::new());
        let block = tree.push(
            flow,
            NodeKind::Block,
            PropertyList::new().with(PropertyId::BreakBefore, "page"),
        );
        paragraph(&mut tree, block, "hello");

        let config = Config::default();
        let mut sink = Sink::new();
        let mut engine = Engine::new(&config, &mut sink);
        let measure = Monospace::default();
        let mut managers = Managers::new(&tree, &measure, Abs::pt(500.0));
        let root = managers.build(flow);
        let id = managers.manager_of(block).unwrap();

        let mut ctx = LayoutContext::new(Abs::pt(300.0), Abs::pt(500.0));
        let first = managers.next_atoms(&mut engine, root, &mut ctx);
        assert!(is_break_before(&first));
        assert_eq!(first[0].break_class(), BreakClass::Page);
        assert!(!managers.is_finished(id));

        let second = managers.next_atoms(&mut engine, root, &mut ctx);
        assert!(has_content(&second));
        assert!(!second.iter().any(Atom::is_forced_break));
        assert!(managers.is_finished(root));

        managers.reset(root);
        let again = managers.next_atoms(&mut engine, root, &mut ctx);
        assert!(is_break_before(&again));
    }

    #[test]
    fn test_keep_with_next_forbids_break_between_blocks() {
        let mut tree = ContentTree::new();
        let flow = tree.push(tree.root(), NodeKind::Flow, PropertyList::new());
        let a = tree.push(
            flow,
            NodeKind::Block,
            PropertyList::new()
                .with(PropertyId::KeepWithNext, Keep::within_page(KeepStrength::Always)),
        );
        paragraph(&mut tree, a, "heading");
        let b = tree.push(flow, NodeKind::Block, PropertyList::new());
        paragraph(&mut tree, b, "body");

        let config = Config::default();
        let mut sink = Sink::new();
        let mut engine = Engine::new(&config, &mut sink);
        let measure = Monospace::default();
        let mut managers = Managers::new(&tree, &measure, Abs::pt(500.0));
        let root = managers.build(flow);

        let mut ctx = LayoutContext::new(Abs::pt(300.0), Abs::pt(500.0));
        let atoms = managers.next_atoms(&mut engine, root, &mut ctx);
        let boxes: Vec<usize> = atoms
            .iter()
            .enumerate()
            .filter(|(_, atom)| atom.is_box())
            .map(|(i, _)| i)
            .collect();
        assert_eq!(boxes.len(), 2);
        let between = &atoms[boxes[0] + 1..boxes[1]];
        assert!(between.iter().any(Atom::is_forbidden_break));
        assert!(!between.iter().any(|atom| {
            matches!(atom.kind, AtomKind::Penalty { cost, .. } if cost < INFINITE)
        }));
    }

    #[test]
    fn test_kept_frame_borders_stay_with_content() {
        let mut tree = ContentTree::new();
        let flow = tree.push(tree.root(), NodeKind::Flow, PropertyList::new());
        let block = tree.push(
            flow,
            NodeKind::Block,
            PropertyList::new()
                .with(PropertyId::KeepTogether, Keep::always())
                .with(PropertyId::BorderBeforeWidth, fixed(1.0))
                .with(PropertyId::BorderAfterWidth, fixed(1.0)),
        );
        for text in ["first", "second"] {
            tree.push(
                block,
                NodeKind::Paragraph(InlineItem::parse(text)),
                PropertyList::new()
                    .with(PropertyId::SpaceBefore, fixed(10.0))
                    .with(PropertyId::SpaceAfter, fixed(10.0)),
            );
        }

        let config = Config::default();
        let mut sink = Sink::new();
        let mut engine = Engine::new(&config, &mut sink);
        let measure = Monospace::default();
        let mut managers = Managers::new(&tree, &measure, Abs::pt(500.0));
        let root = managers.build(flow);
        let id = managers.manager_of(block).unwrap();

        let mut ctx = LayoutContext::new(Abs::pt(300.0), Abs::pt(500.0));
        let atoms = managers.next_atoms(&mut engine, root, &mut ctx);
        let borders: Vec<usize> = atoms
            .iter()
            .enumerate()
            .filter(|(_, atom)| atom.is_box() && atom.position == Position::frame(id))
            .map(|(i, _)| i)
            .collect();
        assert_eq!(borders.len(), 2);

        // Neither a glue right after a box nor a finite penalty may occur
        // between the opening and the closing border.
        for i in borders[0] + 1..borders[1] {
            let atom = &atoms[i];
            assert!(!(atom.is_glue() && atoms[i - 1].is_box()), "break at {i}: {atoms:?}");
            if let AtomKind::Penalty { cost, .. } = atom.kind {
                assert!(cost >= INFINITE, "break at {i}: {atoms:?}");
            }
        }
        assert_eq!(atoms.iter().filter(|atom| atom.is_glue()).count(), 4);
    }

    #[test]
    fn test_area_is_created_on_first_use_and_kept() {
        let mut tree = ContentTree::new();
        let flow = tree.push(tree.root(), NodeKind::Flow, PropertyList::new());
        let block = tree.push(
            flow,
            NodeKind::Block,
            PropertyList::new().with(PropertyId::BorderBeforeWidth, fixed(2.0)),
        );
        paragraph(&mut tree, block, "text");

        let config = Config::default();
        let mut sink = Sink::new();
        let mut engine = Engine::new(&config, &mut sink);
        let measure = Monospace::default();
        let mut managers = Managers::new(&tree, &measure, Abs::pt(500.0));
        let root = managers.build(flow);
        let mut ctx = LayoutContext::new(Abs::pt(300.0), Abs::pt(500.0));
        managers.next_atoms(&mut engine, root, &mut ctx);

        let id = managers.manager_of(block).unwrap();
        assert!(managers.take_area(id).is_none());
        managers.area_mut(id).add_space(Abs::pt(3.0));
        managers.area_mut(id).add_space(Abs::pt(4.0));
        let area = managers.take_area(id).unwrap();
        assert_eq!(area.bpd(), Abs::pt(7.0));
        assert_eq!(area.ipd(), Abs::pt(300.0));
        assert_eq!(area.traits().borders.before, Abs::pt(2.0));
        assert!(managers.take_area(id).is_none());
    }

    #[test]
    fn test_percent_bases_follow_the_tree() {
        let mut tree = ContentTree::new();
        let flow = tree.push(tree.root(), NodeKind::Flow, PropertyList::new());
        let block = tree.push(
            flow,
            NodeKind::Block,
            PropertyList::new()
                .with(PropertyId::StartIndent, fixed(20.0))
                .with(PropertyId::PaddingStart, fixed(5.0)),
        );
        let inner = tree.push(block, NodeKind::Block, PropertyList::new());
        tree.set_property(
            inner,
            PropertyId::EndIndent,
            Length::percent(
                Ratio::percent(10.0),
                LengthBase::new(PercentBaseKind::ContainingBlockWidth, inner),
            ),
        );
        paragraph(&mut tree, inner, "text");

        let config = Config::default();
        let mut sink = Sink::new();
        let mut engine = Engine::new(&config, &mut sink);
        let measure = Monospace::default();
        let mut managers = Managers::new(&tree, &measure, Abs::pt(500.0));
        let root = managers.build(flow);

        let mut ctx = LayoutContext::new(Abs::pt(300.0), Abs::pt(500.0));
        managers.next_atoms(&mut engine, root, &mut ctx);

        // The block offers 300 - 20 - 5 to the inner block.
        assert_eq!(
            managers.base_length(PercentBaseKind::ContainingBlockWidth, inner),
            Some(Abs::pt(275.0))
        );
        assert_eq!(
            managers.base_length(PercentBaseKind::ContainingRefAreaWidth, inner),
            Some(Abs::pt(300.0))
        );
        assert_eq!(
            managers.base_length(PercentBaseKind::ContainingBlockHeight, inner),
            Some(Abs::pt(500.0))
        );
        assert_eq!(managers.base_length(PercentBaseKind::ImageIntrinsicWidth, inner), None);
        let id = managers.manager_of(inner).unwrap();
        assert_eq!(managers[id].frame.indents.end, Abs::pt(27.5));
        assert!(sink.warnings().is_empty());
    }

    #[test]
    fn test_keep_together_is_inherited_from_ancestors() {
        let mut tree = ContentTree::new();
        let flow = tree.push(tree.root(), NodeKind::Flow, PropertyList::new());
        let outer = tree.push(
            flow,
            NodeKind::Block,
            PropertyList::new().with(PropertyId::KeepTogether, Keep::always()),
        );
        let inner = tree.push(outer, NodeKind::Block, PropertyList::new());
        paragraph(&mut tree, inner, "text");

        let config = Config::default();
        let mut sink = Sink::new();
        let mut engine = Engine::new(&config, &mut sink);
        let measure = Monospace::default();
        let mut managers = Managers::new(&tree, &measure, Abs::pt(500.0));
        let root = managers.build(flow);
        let mut ctx = LayoutContext::new(Abs::pt(300.0), Abs::pt(500.0));
        managers.next_atoms(&mut engine, root, &mut ctx);

        let inner = managers.manager_of(inner).unwrap();
        assert!(managers.must_keep_together(inner));
        assert!(!managers.must_keep_together(root));
        assert!(!managers.must_keep_with_next(inner));
    }
}
