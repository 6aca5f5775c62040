//! Paragraphs: inline content broken into lines.

use ecow::EcoString;
use folio_library::area::{Area, InlineArea, LineArea};
use folio_library::diag::{At, Span};
use folio_library::engine::Engine;
use folio_library::foundations::{BreakClass, PropertyId, TextAlign, Value};
use folio_library::layout::{Abs, MinOptMax, Size};
use folio_library::model::{InlineItem, NodeId, NodeKind};

use super::{ManagerId, ManagerKind, Managers};
use crate::atoms::{Atom, AtomKind, INFINITE, Position};
use crate::breaking::{Breakpoint, break_atoms, line_ranges};
use crate::context::LayoutContext;

/// The lines of a paragraph, set once its content was requested.
#[derive(Debug, Default, Clone)]
pub(super) struct ParagraphState {
    lines: Vec<LineArea>,
}

impl ParagraphState {
    pub(super) fn reset(&mut self) {
        self.lines.clear();
    }
}

/// How a paragraph's lines are set.
struct LineStyle {
    width: Abs,
    height: Abs,
    align: TextAlign,
    last_align: TextAlign,
}

impl Managers<'_> {
    /// Break the paragraph into lines and return one box per line.
    ///
    /// Between two lines, a break is forbidden if the paragraph must be kept
    /// together or if it would leave fewer lines than `orphans` before it or
    /// fewer than `widows` after it.
    pub(super) fn next_paragraph(
        &mut self,
        engine: &mut Engine,
        id: ManagerId,
        ctx: &mut LayoutContext,
    ) -> Vec<Atom> {
        if let Some(atoms) = self.serve_break_before(id) {
            return atoms;
        }

        let node = self[id].node;
        let tree = self.tree;
        let items: &[InlineItem] = match tree.node(node).kind() {
            NodeKind::Paragraph(items) => items,
            _ => &[],
        };

        let styles = tree.styles(node);
        let span = Span::from(node);
        let font_size =
            self.resolve(&styles.font_size(engine.config.default_font_size), engine);
        let align: TextAlign = engine.delay(styles.keyword(PropertyId::TextAlign).at(span));
        let last_align = match styles.get(PropertyId::TextAlignLast) {
            Some(_) => engine.delay(styles.keyword(PropertyId::TextAlignLast).at(span)),
            None if align == TextAlign::Justify => TextAlign::Start,
            None => align,
        };
        let orphans = engine.delay(styles.int(PropertyId::Orphans, 2).at(span)).max(1) as usize;
        let widows = engine.delay(styles.int(PropertyId::Widows, 2).at(span)).max(1) as usize;

        let style = LineStyle {
            width: self[id].content_ipd,
            height: self.line_height(engine, node, font_size),
            align,
            last_align,
        };

        let inline = self.inline_atoms(engine, id, items, font_size);
        let budget = MinOptMax::new(
            (style.width - font_size * 3.0).max(Abs::zero()),
            style.width,
            style.width,
        );
        let breaks = break_atoms(engine, &inline, budget, align, span);
        let lines: Vec<LineArea> = breaks
            .iter()
            .zip(line_ranges(&inline, &breaks))
            .map(|(bp, range)| {
                let last = bp.forced || bp.index >= inline.len();
                build_line(items, &inline[range], bp, &style, last)
            })
            .collect();

        let mut atoms = vec![];
        self.open_frame(id, &mut atoms, ctx);
        let keep = self.must_keep_together(id);
        let count = lines.len();
        for i in 0..count {
            if i > 0 {
                let forbidden = keep || i < orphans || count - i < widows;
                let cost = if forbidden { INFINITE } else { 0 };
                atoms.push(Atom::penalty(cost, Position::new(id, i)));
            }
            atoms.push(Atom::boxed(style.height, Position::new(id, i)));
        }
        self.close_frame(id, &mut atoms);
        self.finish_frame(id, &mut atoms, ctx);

        tracing::debug!(paragraph = ?node, lines = count, "set paragraph");
        if let ManagerKind::Paragraph(state) = &mut self[id].kind {
            state.lines = lines;
        }
        atoms
    }

    /// Stack the lines whose boxes ended up in `atoms`.
    pub(super) fn materialize_paragraph(
        &mut self,
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

            let line = match &self[id].kind {
                ManagerKind::Paragraph(state) => state.lines.get(atom.position.index).cloned(),
                _ => None,
            };

            if let Some(line) = line {
                let x = self[id].frame.inner_start();
                self.area_mut(id).stack(x, Area::Line(line));
                seen_content = true;
            }
        }
    }

    /// Measure the inline items of a paragraph.
    fn inline_atoms(
        &self,
        engine: &Engine,
        id: ManagerId,
        items: &[InlineItem],
        font_size: Abs,
    ) -> Vec<Atom> {
        let config = engine.config;
        let space = self.measure.space_width(font_size);
        let stretch = config.space_stretch.of(space);
        let shrink = config.space_shrink.of(space);

        items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let pos = Position::new(id, i);
                match item {
                    InlineItem::Word(word) => {
                        Atom::boxed(self.measure.word_width(word, font_size), pos)
                    }
                    InlineItem::Space => Atom::glue(space, stretch, shrink, pos),
                    InlineItem::SoftHyphen => Atom {
                        kind: AtomKind::Penalty {
                            width: self.measure.hyphen_width(font_size),
                            cost: config.breaking.hyphen_penalty,
                            flagged: true,
                            class: BreakClass::Auto,
                        },
                        position: pos,
                    },
                    InlineItem::LineBreak => Atom::forced_break(BreakClass::Auto, pos),
                }
            })
            .collect()
    }

    /// The height of a paragraph's lines.
    ///
    /// A plain number is a multiple of the font size, a length is taken as is
    /// and anything else falls back to the configured factor.
    fn line_height(&self, engine: &mut Engine, node: NodeId, font_size: Abs) -> Abs {
        match self.tree.styles(node).get(PropertyId::LineHeight) {
            Some(Value::Number(factor)) => font_size * *factor,
            Some(Value::Length(length)) => self.resolve(length, engine),
            _ => font_size * engine.config.line_height_factor,
        }
    }
}

/// Position the atoms of one line.
///
/// Spaces shrink whenever the line is overfull but only stretch in justified
/// lines. A line broken at a hyphenation point ends with a hyphen.
fn build_line(
    items: &[InlineItem],
    atoms: &[Atom],
    bp: &Breakpoint,
    style: &LineStyle,
    last: bool,
) -> LineArea {
    let align = if last { style.last_align } else { style.align };
    let mut inlines = vec![];
    let mut x = Abs::zero();

    for (k, atom) in atoms.iter().enumerate() {
        match atom.kind {
            AtomKind::Box { width } => {
                let text = match items.get(atom.position.index) {
                    Some(InlineItem::Word(word)) => word.clone(),
                    _ => EcoString::new(),
                };
                inlines.push((x, InlineArea::Word { text, width }));
                x += width;
            }
            AtomKind::Glue { width, stretch, shrink } => {
                let width = if bp.ratio < 0.0 {
                    width + shrink * bp.ratio
                } else if align == TextAlign::Justify {
                    width + stretch * bp.ratio
                } else {
                    width
                };
                inlines.push((x, InlineArea::Space { width }));
                x += width;
            }
            AtomKind::Penalty { width, flagged, .. } => {
                if flagged && k + 1 == atoms.len() {
                    inlines.push((x, InlineArea::Hyphen { width }));
                    x += width;
                }
            }
        }
    }

    let offset = match align {
        TextAlign::End => style.width - x,
        TextAlign::Center => (style.width - x) / 2.0,
        TextAlign::Start | TextAlign::Justify => Abs::zero(),
    }
    .max(Abs::zero());

    if offset > Abs::zero() {
        for (pos, _) in &mut inlines {
            *pos += offset;
        }
    }

    LineArea {
        size: Size::new(style.width, style.height),
        ratio: bp.ratio,
        inlines,
    }
}
