//! The boxes, glues and penalties layout managers hand to the breaker.

use std::fmt::{self, Debug, Formatter};

use folio_library::foundations::BreakClass;
use folio_library::layout::Abs;

use crate::managers::ManagerId;

/// Penalty costs at or beyond this magnitude are infinite: `INFINITE`
/// forbids a break and `-INFINITE` forces one.
pub const INFINITE: i32 = 1000;

/// Identifies where an atom came from: the producing layout manager and an
/// index that only that manager interprets.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct Position {
    /// The producing manager.
    pub manager: ManagerId,
    /// The manager-local index.
    pub index: usize,
}

impl Position {
    /// The index of atoms that belong to a manager's own frame (spaces,
    /// borders and breaks) instead of to a piece of its content.
    pub const FRAME: usize = usize::MAX;

    /// A position of a piece of content.
    pub fn new(manager: ManagerId, index: usize) -> Self {
        Self { manager, index }
    }

    /// A position of a frame atom.
    pub fn frame(manager: ManagerId) -> Self {
        Self { manager, index: Self::FRAME }
    }

    /// Whether this is a frame position.
    pub fn is_frame(self) -> bool {
        self.index == Self::FRAME
    }
}

impl Debug for Position {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        if self.is_frame() {
            write!(f, "{:?}/frame", self.manager)
        } else {
            write!(f, "{:?}/{}", self.manager, self.index)
        }
    }
}

/// What an atom is.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum AtomKind {
    /// Content of a fixed extent.
    Box { width: Abs },
    /// Elastic space; a legal breakpoint when it directly follows a box.
    Glue { width: Abs, stretch: Abs, shrink: Abs },
    /// A breakpoint candidate with a cost. `width` only counts when the
    /// break is taken here.
    Penalty { width: Abs, cost: i32, flagged: bool, class: BreakClass },
}

/// An indivisible unit of breakable content.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Atom {
    /// What the atom is.
    pub kind: AtomKind,
    /// Where the atom came from.
    pub position: Position,
}

impl Atom {
    /// A box.
    pub fn boxed(width: Abs, position: Position) -> Self {
        Self { kind: AtomKind::Box { width }, position }
    }

    /// A glue.
    pub fn glue(width: Abs, stretch: Abs, shrink: Abs, position: Position) -> Self {
        Self { kind: AtomKind::Glue { width, stretch, shrink }, position }
    }

    /// A penalty without width.
    pub fn penalty(cost: i32, position: Position) -> Self {
        Self {
            kind: AtomKind::Penalty {
                width: Abs::zero(),
                cost: cost.clamp(-INFINITE, INFINITE),
                flagged: false,
                class: BreakClass::Auto,
            },
            position,
        }
    }

    /// A forced break of the given class.
    pub fn forced_break(class: BreakClass, position: Position) -> Self {
        Self {
            kind: AtomKind::Penalty {
                width: Abs::zero(),
                cost: -INFINITE,
                flagged: false,
                class,
            },
            position,
        }
    }

    /// Whether this is a box.
    pub fn is_box(&self) -> bool {
        matches!(self.kind, AtomKind::Box { .. })
    }

    /// Whether this is a glue.
    pub fn is_glue(&self) -> bool {
        matches!(self.kind, AtomKind::Glue { .. })
    }

    /// Whether this is a penalty that forces a break.
    pub fn is_forced_break(&self) -> bool {
        matches!(self.kind, AtomKind::Penalty { cost, .. } if cost <= -INFINITE)
    }

    /// Whether this is a penalty that forbids a break.
    pub fn is_forbidden_break(&self) -> bool {
        matches!(self.kind, AtomKind::Penalty { cost, .. } if cost >= INFINITE)
    }

    /// Whether the atom disappears when it ends up at a break.
    pub fn is_discardable(&self) -> bool {
        !self.is_box()
    }

    /// The break class of a forced break, `Auto` otherwise.
    pub fn break_class(&self) -> BreakClass {
        match self.kind {
            AtomKind::Penalty { class, .. } if self.is_forced_break() => class,
            _ => BreakClass::Auto,
        }
    }

    /// The natural extent the atom contributes when no break is taken at
    /// it.
    pub fn width(&self) -> Abs {
        match self.kind {
            AtomKind::Box { width } | AtomKind::Glue { width, .. } => width,
            AtomKind::Penalty { .. } => Abs::zero(),
        }
    }
}

/// Whether a sequence consists of nothing but one forced break: a
/// descendant asking for a break before its content.
pub fn is_break_before(atoms: &[Atom]) -> bool {
    matches!(atoms, [atom] if atom.is_forced_break())
}

/// Whether a sequence ends in a forced break.
pub fn ends_with_forced_break(atoms: &[Atom]) -> bool {
    atoms.last().is_some_and(Atom::is_forced_break)
}

/// Forbid a break at the glues a sequence ends with by putting an infinite
/// penalty before them.
pub fn hold_trailing_glue(atoms: &mut Vec<Atom>, position: Position) {
    let at = atoms.iter().rposition(|atom| !atom.is_glue()).map_or(0, |i| i + 1);
    atoms.insert(at, Atom::penalty(INFINITE, position));
}

/// Whether a sequence contains anything but discardable atoms.
pub fn has_content(atoms: &[Atom]) -> bool {
    atoms.iter().any(Atom::is_box)
}

/// The total natural extent of a sequence laid out without breaks.
pub fn natural_extent(atoms: &[Atom]) -> Abs {
    atoms.iter().map(Atom::width).sum()
}
