//! Determines where a sequence of atoms is broken into lines or pages.

use std::ops::Range;

use folio_library::config::{BreakConfig, Linebreaks};
use folio_library::diag::{Span, warning};
use folio_library::engine::Engine;
use folio_library::foundations::TextAlign;
use folio_library::layout::{Abs, MinOptMax};

use crate::atoms::{Atom, AtomKind, INFINITE};

/// A chosen break.
#[derive(Debug, Clone, PartialEq)]
pub struct Breakpoint {
    /// The index of the atom the line ends at. Equal to the length of the
    /// sequence for the implicit break at its end.
    pub index: usize,
    /// How far the line's glue must be stretched (positive) or shrunk
    /// (negative) to fill the budget, relative to the glue's elasticity.
    pub ratio: f64,
    /// The demerits of the line ending here.
    pub demerits: f64,
    /// The number of the line ending here, starting at one.
    pub line: usize,
    /// Whether the break was forced by a penalty.
    pub forced: bool,
    /// Whether no feasible break existed and this one was taken to recover.
    pub overflow: bool,
    /// Whether the break is at a flagged penalty, e.g. a hyphen.
    pub flagged: bool,
}

/// Breaks a sequence of atoms into lines of the given budget.
///
/// Never fails: if the content doesn't fit anywhere, overflowing breaks are
/// taken and a warning is emitted at `span`. An empty sequence has no
/// breaks, any other sequence at least one.
pub fn break_atoms(
    engine: &mut Engine,
    atoms: &[Atom],
    budget: MinOptMax,
    align: TextAlign,
    span: Span,
) -> Vec<Breakpoint> {
    if atoms.is_empty() {
        return vec![];
    }

    let config = &engine.config.breaking;
    let mut breaker = Breaker::new(atoms, budget, align, config);
    let breaks = match config.linebreaks {
        Linebreaks::Simple => breaker.simple(),
        Linebreaks::Optimized => breaker.optimized(),
    };

    if breaker.overflowed {
        engine.sink.warn(warning!(
            span,
            "content does not fit into the available space";
            hint: "the content overflows its {:?} budget", budget.opt
        ));
    }

    tracing::debug!(
        atoms = atoms.len(),
        breaks = breaks.len(),
        overflow = breaker.overflowed,
        "determined breakpoints"
    );
    breaks
}

/// The atom ranges of the lines delimited by the given breaks.
///
/// Discardable atoms at the start of a line and a glue the line is broken
/// at are excluded. A penalty the line is broken at is included.
pub fn line_ranges(atoms: &[Atom], breaks: &[Breakpoint]) -> Vec<Range<usize>> {
    let mut start = 0;
    let mut ranges = Vec::with_capacity(breaks.len());
    for bp in breaks {
        let end = match atoms.get(bp.index) {
            Some(atom) if atom.is_glue() => bp.index,
            Some(_) => bp.index + 1,
            None => atoms.len(),
        };
        ranges.push(start.min(end)..end);
        start = skip_discardables(atoms, bp.index + 1);
    }
    ranges
}

/// The first index at or after `from` that holds a box or a forced break.
fn skip_discardables(atoms: &[Atom], from: usize) -> usize {
    let mut i = from;
    while i < atoms.len() && atoms[i].is_discardable() && !atoms[i].is_forced_break() {
        i += 1;
    }
    i.min(atoms.len())
}

/// A legal breakpoint.
#[derive(Debug, Copy, Clone)]
struct Candidate {
    index: usize,
    cost: i32,
    width: Abs,
    flagged: bool,
    forced: bool,
    /// Whether this is the implicit break at the end of the sequence.
    end: bool,
}

impl Candidate {
    /// Lines ending here are never stretched.
    fn unstretched(&self) -> bool {
        self.forced || self.end
    }
}

/// A break in the dynamic programming table.
#[derive(Debug, Clone)]
struct Node {
    /// The candidate the break is at, `None` for the start of the sequence.
    candidate: Option<usize>,
    /// Where the line after this break starts.
    start: usize,
    line: usize,
    fitness: usize,
    total: f64,
    demerits: f64,
    ratio: f64,
    flagged: bool,
    overflow: bool,
    pred: Option<usize>,
}

/// A line that could end at a candidate.
#[derive(Debug, Copy, Clone)]
struct Attempt {
    pred: usize,
    candidate: usize,
    ratio: f64,
    demerits: f64,
    total: f64,
}

struct Breaker<'a> {
    atoms: &'a [Atom],
    budget: MinOptMax,
    align: TextAlign,
    config: &'a BreakConfig,
    candidates: Vec<Candidate>,
    /// Prefix sums over boxes and glues: natural width, stretch and shrink.
    width: Vec<Abs>,
    stretch: Vec<Abs>,
    shrink: Vec<Abs>,
    /// Prefix count of boxes.
    boxes: Vec<usize>,
    /// For each index, one past the last box before it.
    content_end: Vec<usize>,
    nodes: Vec<Node>,
    overflowed: bool,
}

impl<'a> Breaker<'a> {
    fn new(
        atoms: &'a [Atom],
        budget: MinOptMax,
        align: TextAlign,
        config: &'a BreakConfig,
    ) -> Self {
        let n = atoms.len();
        let mut width = Vec::with_capacity(n + 1);
        let mut stretch = Vec::with_capacity(n + 1);
        let mut shrink = Vec::with_capacity(n + 1);
        let mut boxes = Vec::with_capacity(n + 1);
        let mut content_end = Vec::with_capacity(n + 1);
        let (mut w, mut st, mut sh, mut b, mut end) =
            (Abs::zero(), Abs::zero(), Abs::zero(), 0, 0);

        for (i, atom) in atoms.iter().enumerate() {
            width.push(w);
            stretch.push(st);
            shrink.push(sh);
            boxes.push(b);
            content_end.push(end);
            match atom.kind {
                AtomKind::Box { width } => {
                    w += width;
                    b += 1;
                    end = i + 1;
                }
                AtomKind::Glue { width, stretch, shrink } => {
                    w += width;
                    st += stretch;
                    sh += shrink;
                }
                AtomKind::Penalty { .. } => {}
            }
        }
        width.push(w);
        stretch.push(st);
        shrink.push(sh);
        boxes.push(b);
        content_end.push(end);

        let mut candidates = vec![];
        for (i, atom) in atoms.iter().enumerate() {
            match atom.kind {
                AtomKind::Glue { .. } if i > 0 && atoms[i - 1].is_box() => {
                    candidates.push(Candidate {
                        index: i,
                        cost: 0,
                        width: Abs::zero(),
                        flagged: false,
                        forced: false,
                        end: false,
                    });
                }
                AtomKind::Penalty { width, cost, flagged, .. } if cost < INFINITE => {
                    candidates.push(Candidate {
                        index: i,
                        cost,
                        width,
                        flagged,
                        forced: cost <= -INFINITE,
                        end: false,
                    });
                }
                _ => {}
            }
        }

        if !atoms.last().is_some_and(Atom::is_forced_break) {
            candidates.push(Candidate {
                index: n,
                cost: 0,
                width: Abs::zero(),
                flagged: false,
                forced: false,
                end: true,
            });
        }

        Self {
            atoms,
            budget,
            align,
            config,
            candidates,
            width,
            stretch,
            shrink,
            boxes,
            content_end,
            nodes: vec![Node {
                candidate: None,
                start: 0,
                line: 0,
                fitness: 1,
                total: 0.0,
                demerits: 0.0,
                ratio: 0.0,
                flagged: false,
                overflow: false,
                pred: None,
            }],
            overflowed: false,
        }
    }

    /// Knuth-Plass style optimal breaking.
    ///
    /// For each candidate, all active breaks are tried as the start of a
    /// line ending there. The best line per fitness class becomes a new
    /// active break. Breaks from which even the shortest remaining line is
    /// overfull leave the active set. If the active set runs empty, layout
    /// recovers from the best too-loose line or, failing that, from the
    /// latest overfull one.
    fn optimized(&mut self) -> Vec<Breakpoint> {
        let mut active: Vec<usize> = vec![0];
        let mut too_short: Option<Attempt> = None;
        let mut too_long: Option<Attempt> = None;

        let mut i = 0;
        while i < self.candidates.len() {
            let c = self.candidates[i];
            let mut best: [Option<Attempt>; 4] = [None; 4];
            let mut kept = Vec::with_capacity(active.len());
            let mut attempted = false;

            for &a in &active {
                let Some((ratio, demerits)) = self.try_line(a, i) else {
                    kept.push(a);
                    continue;
                };
                attempted = true;

                let node = &self.nodes[a];
                let attempt =
                    Attempt { pred: a, candidate: i, ratio, demerits, total: node.total + demerits };

                if ratio < -1.0 {
                    // Overfull, and every later line from here will be too.
                    let better = too_long.is_none_or(|prev| {
                        let prev_node = &self.nodes[prev.pred];
                        node.candidate > prev_node.candidate
                            || (node.candidate == prev_node.candidate
                                && attempt.total < prev.total)
                    });
                    if better {
                        too_long = Some(attempt);
                    }
                    continue;
                }

                kept.push(a);
                if ratio > self.config.max_stretch_ratio {
                    if too_short.is_none_or(|prev| attempt.total <= prev.total) {
                        too_short = Some(attempt);
                    }
                    continue;
                }

                let slot = &mut best[fitness(ratio)];
                if slot.is_none_or(|prev| attempt.total < prev.total) {
                    *slot = Some(attempt);
                }
            }

            active = kept;
            let found: Vec<Attempt> = best.into_iter().flatten().collect();
            if c.unstretched() && !found.is_empty() {
                // No line can span across a forced break.
                active.clear();
                too_short = None;
                too_long = None;
            }
            for attempt in &found {
                active.push(self.push_node(*attempt, false));
            }

            let stuck = c.unstretched() && found.is_empty() && attempted;
            if active.is_empty() || stuck {
                let recovery = too_short.take().or(too_long.take());
                if let Some(attempt) = recovery {
                    let ratio =
                        attempt.ratio.clamp(-1.0, self.config.max_stretch_ratio);
                    if attempt.ratio < -1.0 {
                        self.overflowed = true;
                    }
                    let id = self.push_node(Attempt { ratio, ..attempt }, true);
                    active = vec![id];
                    too_short = None;
                    too_long = None;
                    i = attempt.candidate + 1;
                    continue;
                }
            }

            i += 1;
        }

        let Some(&last) = active.iter().max_by(|&&a, &&b| {
            let (a, b) = (&self.nodes[a], &self.nodes[b]);
            a.candidate.cmp(&b.candidate).then(b.total.total_cmp(&a.total))
        }) else {
            return vec![];
        };

        let mut breaks = vec![];
        let mut current = Some(last);
        while let Some(id) = current {
            let node = &self.nodes[id];
            if let Some(k) = node.candidate {
                breaks.push(self.breakpoint(node, k));
            }
            current = node.pred;
        }
        breaks.reverse();
        breaks
    }

    /// First-fit breaking: every line takes as much content as fits.
    fn simple(&mut self) -> Vec<Breakpoint> {
        let mut breaks = vec![];
        let mut current = 0;
        let mut last_fit: Option<Attempt> = None;

        let mut i = 0;
        while i < self.candidates.len() {
            let c = self.candidates[i];
            let Some((ratio, demerits)) = self.try_line(current, i) else {
                i += 1;
                continue;
            };

            let attempt = Attempt {
                pred: current,
                candidate: i,
                ratio,
                demerits,
                total: self.nodes[current].total + demerits,
            };

            if ratio < -1.0 {
                if let Some(fit) = last_fit.take() {
                    current = self.push_node(fit, false);
                    i = fit.candidate + 1;
                } else {
                    self.overflowed = true;
                    current = self.push_node(Attempt { ratio: -1.0, ..attempt }, true);
                    i += 1;
                }
                breaks.push(current);
                continue;
            }

            let ratio = ratio.min(self.config.max_stretch_ratio);
            if c.unstretched() {
                current = self.push_node(Attempt { ratio, ..attempt }, false);
                breaks.push(current);
                last_fit = None;
            } else {
                last_fit = Some(Attempt { ratio, ..attempt });
            }
            i += 1;
        }

        breaks
            .into_iter()
            .map(|id| {
                let node = &self.nodes[id];
                let k = node.candidate.unwrap_or_default();
                self.breakpoint(node, k)
            })
            .collect()
    }

    /// Measures the line from the break `node` to candidate `k` and returns
    /// its adjustment ratio and demerits, or `None` if the line would be
    /// empty and cannot end there.
    fn try_line(&self, node: usize, k: usize) -> Option<(f64, f64)> {
        let pred = &self.nodes[node];
        let c = &self.candidates[k];
        let start = pred.start;
        let mut end = c.index.max(start);
        if c.unstretched() {
            end = self.content_end[c.index].max(start);
        }

        // An empty line is only acceptable at a forced break or the end of
        // the sequence directly at its start, or between two forced breaks.
        let empty = self.boxes[end] == self.boxes[start];
        let after_forced = pred.candidate.is_some_and(|k| self.candidates[k].forced);
        if empty && !(pred.candidate.is_none() && c.unstretched()) && !(after_forced && c.forced)
        {
            return None;
        }

        let natural = self.width[end] - self.width[start] + c.width;
        let stretch = self.stretch[end] - self.stretch[start];
        let shrink = self.shrink[end] - self.shrink[start];
        let ratio = self.adjustment_ratio(natural, stretch, shrink, c.unstretched());
        Some((ratio, self.demerits(pred, c, ratio)))
    }

    fn adjustment_ratio(&self, natural: Abs, stretch: Abs, shrink: Abs, unstretched: bool) -> f64 {
        let target = self.budget.opt;
        if natural < target {
            if unstretched {
                return 0.0;
            }
            let mut stretch = stretch;
            if self.align != TextAlign::Justify {
                stretch += self.budget.shrink();
            }
            if stretch > Abs::zero() {
                (target - natural).ratio_to(stretch)
            } else {
                f64::INFINITY
            }
        } else if natural > self.budget.max {
            if shrink > Abs::zero() {
                (target - natural).ratio_to(shrink)
            } else {
                f64::NEG_INFINITY
            }
        } else {
            0.0
        }
    }

    fn demerits(&self, pred: &Node, c: &Candidate, ratio: f64) -> f64 {
        let badness = (100.0 * ratio.abs().powi(3)).min(10_000.0);
        let cost = f64::from(c.cost);
        let mut demerits = (self.config.line_penalty + badness).powi(2);
        if c.cost >= 0 {
            demerits += cost.powi(2);
        } else if c.cost > -INFINITE {
            demerits -= cost.powi(2);
        }
        if c.flagged && pred.flagged {
            demerits += self.config.flagged_demerits;
        }
        if fitness(ratio).abs_diff(pred.fitness) > 1 {
            demerits += self.config.fitness_demerits;
        }
        demerits
    }

    fn push_node(&mut self, attempt: Attempt, overflow: bool) -> usize {
        let c = self.candidates[attempt.candidate];
        let pred = &self.nodes[attempt.pred];
        let node = Node {
            candidate: Some(attempt.candidate),
            start: skip_discardables(self.atoms, c.index + 1),
            line: pred.line + 1,
            fitness: fitness(attempt.ratio),
            total: attempt.total,
            demerits: attempt.demerits,
            ratio: attempt.ratio,
            flagged: c.flagged,
            overflow,
            pred: Some(attempt.pred),
        };
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    fn breakpoint(&self, node: &Node, k: usize) -> Breakpoint {
        let c = &self.candidates[k];
        Breakpoint {
            index: c.index,
            ratio: node.ratio,
            demerits: node.demerits,
            line: node.line,
            forced: c.forced,
            overflow: node.overflow,
            flagged: c.flagged,
        }
    }
}

/// Classifies a line as tight (0), decent (1), loose (2) or very loose (3).
fn fitness(ratio: f64) -> usize {
    if ratio < -0.5 {
        0
    } else if ratio <= 0.5 {
        1
    } else if ratio <= 1.0 {
        2
    } else {
        3
    }
}

#[cfg(test)]
mod tests {
    use folio_library::config::Config;
    use folio_library::engine::Sink;
    use folio_library::foundations::BreakClass;

    use super::*;
    use crate::atoms::Position;
    use crate::managers::ManagerId;

    fn pos() -> Position {
        Position::new(ManagerId::from_raw(0), 0)
    }

    fn b(width: f64) -> Atom {
        Atom::boxed(Abs::pt(width), pos())
    }

    fn g(width: f64, stretch: f64, shrink: f64) -> Atom {
        Atom::glue(Abs::pt(width), Abs::pt(stretch), Abs::pt(shrink), pos())
    }

    fn p(cost: i32) -> Atom {
        Atom::penalty(cost, pos())
    }

    fn run(config: &Config, atoms: &[Atom], width: f64, align: TextAlign) -> (Vec<Breakpoint>, Sink) {
        let mut sink = Sink::new();
        let mut engine = Engine::new(config, &mut sink);
        let breaks = break_atoms(
            &mut engine,
            atoms,
            MinOptMax::fixed(Abs::pt(width)),
            align,
            Span::detached(),
        );
        (breaks, sink)
    }

    #[test]
    fn test_exact_fit_at_penalty() {
        let atoms = [b(100.0), g(10.0, 5.0, 5.0), b(100.0), p(0), b(100.0)];
        let (breaks, sink) = run(&Config::default(), &atoms, 210.0, TextAlign::Justify);
        assert_eq!(breaks[0].index, 3);
        assert_eq!(breaks[0].ratio, 0.0);
        assert!(!breaks[0].overflow);
        assert_eq!(breaks.len(), 2);
        assert_eq!(breaks[1].index, atoms.len());
        assert!(sink.warnings().is_empty());
    }

    #[test]
    fn test_empty_and_single_forced() {
        let config = Config::default();
        let (breaks, _) = run(&config, &[], 100.0, TextAlign::Start);
        assert!(breaks.is_empty());

        let forced = [Atom::forced_break(BreakClass::Page, pos())];
        let (breaks, _) = run(&config, &forced, 100.0, TextAlign::Start);
        assert_eq!(breaks.len(), 1);
        assert_eq!(breaks[0].index, 0);
        assert!(breaks[0].forced);
    }

    #[test]
    fn test_overflow_recovers_with_warning() {
        let atoms = [b(300.0)];
        let (breaks, sink) = run(&Config::default(), &atoms, 210.0, TextAlign::Justify);
        assert_eq!(breaks.len(), 1);
        assert!(breaks[0].overflow);
        assert_eq!(sink.warnings().len(), 1);
    }

    #[test]
    fn test_too_loose_line_before_overfull_word() {
        // The short first word cannot fill a justified line, the long second
        // one overflows any line. The recovery keeps them apart.
        let atoms = [b(50.0), g(10.0, 0.0, 0.0), b(300.0)];
        let (breaks, _) = run(&Config::default(), &atoms, 210.0, TextAlign::Justify);
        assert_eq!(breaks.iter().map(|bp| bp.index).collect::<Vec<_>>(), [1, 3]);
        assert!(breaks[0].overflow);
    }

    #[test]
    fn test_forced_break_is_always_taken() {
        let atoms = [
            b(20.0),
            g(10.0, 50.0, 5.0),
            b(20.0),
            Atom::forced_break(BreakClass::Auto, pos()),
            b(20.0),
        ];
        let (breaks, _) = run(&Config::default(), &atoms, 200.0, TextAlign::Justify);
        assert_eq!(breaks[0].index, 3);
        assert!(breaks[0].forced);
        assert_eq!(breaks[0].ratio, 0.0);
        assert_eq!(breaks.len(), 2);
    }

    #[test]
    fn test_consecutive_forced_breaks_leave_empty_line() {
        let forced = || Atom::forced_break(BreakClass::Auto, pos());
        let atoms = [b(20.0), forced(), forced(), b(20.0)];
        let mut config = Config::default();
        for linebreaks in [Linebreaks::Optimized, Linebreaks::Simple] {
            config.breaking.linebreaks = linebreaks;
            let (breaks, sink) = run(&config, &atoms, 100.0, TextAlign::Start);
            assert_eq!(breaks.iter().map(|bp| bp.index).collect::<Vec<_>>(), [1, 2, 4]);
            assert!(breaks[1].forced);
            assert_eq!(line_ranges(&atoms, &breaks), [0..2, 2..3, 3..4]);
            assert!(sink.warnings().is_empty());
        }
    }

    #[test]
    fn test_ratios_stay_in_range() {
        let mut atoms = vec![];
        for i in 0..40 {
            if i > 0 {
                atoms.push(g(5.0, 3.0, 2.0));
            }
            atoms.push(b(10.0 + (i % 7) as f64 * 6.0));
        }
        let config = Config::default();
        for align in [TextAlign::Justify, TextAlign::Start] {
            let (breaks, _) = run(&config, &atoms, 120.0, align);
            assert!(!breaks.is_empty());
            for bp in &breaks {
                assert!(
                    bp.forced
                        || bp.overflow
                        || (-1.0..=config.breaking.max_stretch_ratio).contains(&bp.ratio),
                    "{bp:?}"
                );
            }
            assert_eq!(breaks.last().unwrap().index, atoms.len());
        }
    }

    #[test]
    fn test_optimized_balances_lines() {
        // First fit packs "aaa bb" and leaves "cc dd" loose; the optimizer
        // may not do worse in total demerits.
        let atoms = [
            b(30.0),
            g(10.0, 10.0, 3.0),
            b(20.0),
            g(10.0, 10.0, 3.0),
            b(20.0),
            g(10.0, 10.0, 3.0),
            b(20.0),
        ];
        let mut config = Config::default();
        let (optimized, _) = run(&config, &atoms, 65.0, TextAlign::Justify);
        config.breaking.linebreaks = Linebreaks::Simple;
        let (simple, _) = run(&config, &atoms, 65.0, TextAlign::Justify);
        let total = |breaks: &[Breakpoint]| breaks.iter().map(|bp| bp.demerits).sum::<f64>();
        assert!(total(&optimized) <= total(&simple));
        assert_eq!(optimized.last().unwrap().index, atoms.len());
        assert_eq!(simple.last().unwrap().index, atoms.len());
    }

    #[test]
    fn test_line_ranges_skip_discardables() {
        let atoms = [b(100.0), g(10.0, 5.0, 5.0), b(100.0), p(0), g(4.0, 0.0, 0.0), b(100.0)];
        let breaks = vec![
            Breakpoint {
                index: 3,
                ratio: 0.0,
                demerits: 0.0,
                line: 1,
                forced: false,
                overflow: false,
                flagged: false,
            },
            Breakpoint {
                index: 6,
                ratio: 0.0,
                demerits: 0.0,
                line: 2,
                forced: false,
                overflow: false,
                flagged: false,
            },
        ];
        assert_eq!(line_ranges(&atoms, &breaks), [0..4, 5..6]);
    }

    #[test]
    fn test_simple_first_fit() {
        let atoms = [b(40.0), g(10.0, 5.0, 2.0), b(40.0), g(10.0, 5.0, 2.0), b(40.0)];
        let mut config = Config::default();
        config.breaking.linebreaks = Linebreaks::Simple;
        let (breaks, _) = run(&config, &atoms, 95.0, TextAlign::Start);
        assert_eq!(breaks.iter().map(|bp| bp.index).collect::<Vec<_>>(), [3, 5]);
    }
}
