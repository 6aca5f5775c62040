//! Managers that stack their children in the block progression direction:
//! flows, blocks and table cells.

use folio_library::engine::Engine;

use super::{ManagerId, Managers};
use crate::atoms::{
    Atom, Position, ends_with_forced_break, has_content, hold_trailing_glue, is_break_before,
};
use crate::context::{ContextFlags, LayoutContext};

impl Managers<'_> {
    pub(super) fn next_stacked(
        &mut self,
        engine: &mut Engine,
        id: ManagerId,
        ctx: &mut LayoutContext,
    ) -> Vec<Atom> {
        if let Some(atoms) = self.serve_break_before(id) {
            return atoms;
        }

        let mut atoms = vec![];
        loop {
            let cursor = self[id].cursor;
            let Some(&child) = self[id].children.get(cursor) else {
                self.open_frame(id, &mut atoms, ctx);
                self.close_frame(id, &mut atoms);
                self.finish_frame(id, &mut atoms, ctx);
                return atoms;
            };

            let mut child_ctx = ctx.child(self[id].content_ipd);
            let chunk = self.next_atoms(engine, child, &mut child_ctx);
            let child_finished = self.is_finished(child);
            if child_finished || chunk.is_empty() {
                self[id].cursor += 1;
            }
            if chunk.is_empty() {
                continue;
            }

            // A descendant wants to break before its content. Without own
            // content yet, the break belongs before this manager as well.
            if is_break_before(&chunk) {
                if !self[id].started {
                    tracing::trace!(manager = ?id, child = ?child, "passing break up");
                    return chunk;
                }
                self[id].needs_separator = false;
                atoms.extend(chunk);
                return atoms;
            }

            let first = !self[id].started;
            self.open_frame(id, &mut atoms, ctx);
            if first && child_ctx.is_keep_with_previous_pending() {
                ctx.flags.insert(ContextFlags::KEEP_WITH_PREVIOUS_PENDING);
            }

            if self[id].needs_separator {
                let keep = self[id].keep_next_pending
                    || child_ctx.is_keep_with_previous_pending()
                    || self.must_keep_together(id);
                separate(&mut atoms, keep, Position::frame(id));
            }

            self[id].keep_next_pending = child_ctx.is_keep_with_next_pending();
            let forced = ends_with_forced_break(&chunk);
            atoms.extend(chunk);
            self[id].needs_separator = !forced;

            if forced {
                let last = self[id].cursor >= self[id].children.len();
                if child_finished && last {
                    self.finish_early(id, &mut atoms, ctx);
                }
                return atoms;
            }
        }
    }

    /// Finish a manager whose last child ended in a forced break.
    ///
    /// The closing borders go before the break and there is no space after.
    /// A forced break after the manager itself replaces the child's.
    fn finish_early(&mut self, id: ManagerId, atoms: &mut Vec<Atom>, ctx: &mut LayoutContext) {
        if let Some(penalty) = atoms.pop() {
            self.close_frame(id, atoms);
            let own = self[id].frame.break_after;
            atoms.push(if own.is_forced() {
                Atom::forced_break(own, Position::frame(id))
            } else {
                penalty
            });
        }

        let manager = &mut self[id];
        manager.finished = true;
        if manager.frame.keep_with_next || manager.keep_next_pending {
            ctx.flags.insert(ContextFlags::KEEP_WITH_NEXT_PENDING);
        }
    }

    pub(super) fn materialize_stacked(
        &mut self,
        engine: &mut Engine,
        id: ManagerId,
        atoms: &[Atom],
        ctx: &LayoutContext,
    ) {
        if has_content(atoms) {
            self.area_mut(id);
        }

        let mut seen_content = false;
        let mut i = 0;
        while i < atoms.len() {
            let producer = atoms[i].position.manager;
            if producer == id {
                self.materialize_frame_atom(id, &atoms[i], seen_content, ctx);
                seen_content |= atoms[i].is_box();
                i += 1;
                continue;
            }

            let Some(child) = self.child_owning(id, producer) else {
                i += 1;
                continue;
            };

            let start = i;
            while i < atoms.len()
                && self.child_owning(id, atoms[i].position.manager) == Some(child)
            {
                i += 1;
            }

            let group = &atoms[start..i];
            if has_content(group) {
                self.materialize_areas(engine, child, group, ctx);
                self.place_child(id, child);
                seen_content = true;
            }
        }
    }
}

/// Join the content so far with the next child's.
///
/// A kept pair gets an infinite penalty before the trailing glues, which
/// takes away their breakpoint. Otherwise a trailing glue already is a
/// breakpoint and anything else gets a free one.
fn separate(atoms: &mut Vec<Atom>, keep: bool, pos: Position) {
    if keep {
        hold_trailing_glue(atoms, pos);
    } else if !atoms.last().is_some_and(Atom::is_glue) {
        atoms.push(Atom::penalty(0, pos));
    }
}
