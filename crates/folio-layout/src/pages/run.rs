use ecow::EcoString;
use folio_library::area::{BlockArea, RegionArea};
use folio_library::diag::{SourceResult, Span, warning};
use folio_library::engine::Engine;
use folio_library::foundations::{BreakClass, TextAlign};
use folio_library::layout::{Rect, Size};
use folio_library::model::{ContentTree, RegionName, TextMeasure};

use super::Sequence;
use crate::atoms::{Atom, ends_with_forced_break, has_content, natural_extent};
use crate::breaking::{break_atoms, line_ranges};
use crate::context::LayoutContext;
use crate::managers::{ManagerId, Managers};

/// A page that only lacks its number.
#[derive(Debug, Clone)]
pub struct LayoutedPage {
    /// The page size.
    pub size: Size,
    /// The body region and the side regions with their content.
    pub regions: Vec<RegionArea>,
    /// Identifiers of the nodes whose first area is on the page.
    pub ids: Vec<EcoString>,
    /// The class of the forced break the page starts after. An even or odd
    /// page class may require a blank page before this one.
    pub break_class: BreakClass,
}

/// The managers of one side region, laid out anew on every page.
struct StaticRegion<'a> {
    name: RegionName,
    rect: Rect,
    managers: Managers<'a>,
    root: ManagerId,
}

/// Lay out the flow of a page sequence and hand each page to `emit`.
///
/// The flow's atoms are requested up to the next forced break and broken
/// into pages of the body region's height. Every sequence produces at least
/// one page.
pub fn layout_sequence(
    engine: &mut Engine,
    tree: &ContentTree,
    measure: &dyn TextMeasure,
    sequence: &Sequence,
    emit: &mut dyn FnMut(LayoutedPage) -> SourceResult<()>,
) -> SourceResult<()> {
    let master = &sequence.master;
    let body = master.region_rect(RegionName::Body).unwrap_or_default();
    let (ipd, bpd) = (body.size.width, body.size.height);
    let mut statics = static_regions(engine, tree, measure, sequence);

    let mut managers = Managers::new(tree, measure, bpd);
    let flow = sequence.flow.map(|node| managers.build(node));
    let mut ctx = LayoutContext::new(ipd, bpd);
    let mut class = BreakClass::Auto;
    let mut count = 0;

    while let Some(flow) = flow {
        let mut pending = vec![];
        let mut next_class = None;
        while !managers.is_finished(flow) {
            let chunk = managers.next_atoms(engine, flow, &mut ctx);
            if chunk.is_empty() {
                break;
            }
            let forced = ends_with_forced_break(&chunk);
            pending.extend(chunk);
            if forced {
                next_class = pending.pop().as_ref().map(Atom::break_class);
                break;
            }
        }

        // Spaces at the top of a page are discarded.
        let start = pending.iter().position(Atom::is_box).unwrap_or(pending.len());
        let pending = &pending[start..];

        if has_content(pending) {
            let budget = ctx.stack_limit;
            let breaks =
                break_atoms(engine, pending, budget, TextAlign::Start, Span::from(sequence.node));
            for (bp, range) in breaks.iter().zip(line_ranges(pending, &breaks)) {
                count += 1;
                ctx.page = count;
                ctx.space_adjust = bp.ratio.min(0.0);
                managers.materialize_areas(engine, flow, &pending[range], &ctx);

                let content = managers
                    .take_area(flow)
                    .unwrap_or_else(|| BlockArea::new(ipd, Some(managers.node(flow))));
                let mut ids = managers.take_page_ids();
                let mut regions = vec![RegionArea { name: RegionName::Body, rect: body, content }];
                layout_statics(engine, &mut statics, count, &mut regions, &mut ids);

                tracing::trace!(page = count, ratio = bp.ratio, "finished page");
                emit(LayoutedPage {
                    size: master.size,
                    regions,
                    ids,
                    break_class: std::mem::take(&mut class),
                })?;
            }
        }

        match next_class {
            Some(next) => class = next,
            None => break,
        }
    }

    if count == 0 {
        count += 1;
        let content = BlockArea::new(ipd, sequence.flow);
        let mut ids = vec![];
        let mut regions = vec![RegionArea { name: RegionName::Body, rect: body, content }];
        layout_statics(engine, &mut statics, count, &mut regions, &mut ids);
        emit(LayoutedPage { size: master.size, regions, ids, break_class: class })?;
    }

    tracing::debug!(sequence = ?sequence.node, pages = count, "laid out page sequence");
    Ok(())
}

/// Build the managers of the side regions the master defines.
fn static_regions<'a>(
    engine: &mut Engine,
    tree: &'a ContentTree,
    measure: &'a dyn TextMeasure,
    sequence: &Sequence,
) -> Vec<StaticRegion<'a>> {
    let mut regions = vec![];
    for &(name, node) in &sequence.statics {
        let rect = match name {
            RegionName::Body => None,
            _ => sequence.master.region_rect(name),
        };
        let Some(rect) = rect else {
            engine.sink.warn(warning!(
                node,
                "static content for the {:?} region is not displayed",
                name;
                hint: "the page master does not define this region"
            ));
            continue;
        };

        let mut managers = Managers::new(tree, measure, rect.size.height);
        let root = managers.build(node);
        regions.push(StaticRegion { name, rect, managers, root });
    }
    regions
}

/// Lay out the static content of every side region for one page.
fn layout_statics(
    engine: &mut Engine,
    statics: &mut [StaticRegion],
    page: usize,
    regions: &mut Vec<RegionArea>,
    ids: &mut Vec<EcoString>,
) {
    for region in statics {
        let StaticRegion { name, rect, managers, root } = region;
        managers.reset(*root);

        let mut ctx = LayoutContext::new(rect.size.width, rect.size.height);
        ctx.page = page;
        let mut atoms = vec![];
        while !managers.is_finished(*root) {
            let chunk = managers.next_atoms(engine, *root, &mut ctx);
            if chunk.is_empty() {
                break;
            }
            atoms.extend(chunk.into_iter().filter(|atom| !atom.is_forced_break()));
        }

        if natural_extent(&atoms) > rect.size.height {
            engine.sink.warn(warning!(
                managers.node(*root),
                "static content does not fit into the {:?} region",
                name;
                hint: "the region is {:?} high", rect.size.height
            ));
        }

        managers.materialize_areas(engine, *root, &atoms, &ctx);
        let content = managers
            .take_area(*root)
            .unwrap_or_else(|| BlockArea::new(rect.size.width, Some(managers.node(*root))));
        ids.extend(managers.take_page_ids());
        regions.push(RegionArea { name: *name, rect: *rect, content });
    }
}
