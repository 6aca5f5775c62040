use folio_library::layout::{Abs, MinOptMax};

bitflags::bitflags! {
    /// Conditions a child reports to its parent through the layout context.
    #[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Hash)]
    pub struct ContextFlags: u8 {
        /// The content produced last must stay together with whatever
        /// follows it.
        const KEEP_WITH_NEXT_PENDING = 0b0000_0001;
        /// The content produced first must stay together with whatever
        /// precedes it.
        const KEEP_WITH_PREVIOUS_PENDING = 0b0000_0010;
    }
}

/// Passed down the manager tree with every request.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutContext {
    /// The block-progression space the request is made for.
    pub stack_limit: MinOptMax,
    /// The inline-progression dimension available to the manager.
    pub ref_ipd: Abs,
    /// Keep conditions pending between the manager and its parent.
    pub flags: ContextFlags,
    /// How far glue is adjusted when areas are materialized; negative
    /// values shrink.
    pub space_adjust: f64,
    /// The number of the page being laid out, counted from one within the
    /// page sequence.
    pub page: usize,
}

impl LayoutContext {
    /// A context for a region of the given size.
    pub fn new(ref_ipd: Abs, bpd: Abs) -> Self {
        Self {
            stack_limit: MinOptMax::new(Abs::zero(), bpd, bpd),
            ref_ipd,
            flags: ContextFlags::empty(),
            space_adjust: 0.0,
            page: 1,
        }
    }

    /// A context for a child that has `ref_ipd` available. Flags start out
    /// cleared.
    pub fn child(&self, ref_ipd: Abs) -> Self {
        Self { ref_ipd, flags: ContextFlags::empty(), ..self.clone() }
    }

    /// Whether the content before the current one asked to be kept with it.
    pub fn is_keep_with_next_pending(&self) -> bool {
        self.flags.contains(ContextFlags::KEEP_WITH_NEXT_PENDING)
    }

    /// Whether the current content asked to be kept with its predecessor.
    pub fn is_keep_with_previous_pending(&self) -> bool {
        self.flags.contains(ContextFlags::KEEP_WITH_PREVIOUS_PENDING)
    }

    /// Adjust a glue by the context's adjustment ratio.
    pub fn adjust_glue(&self, width: Abs, stretch: Abs, shrink: Abs) -> Abs {
        if self.space_adjust > 0.0 {
            width + stretch * self.space_adjust
        } else if self.space_adjust < 0.0 {
            width + shrink * self.space_adjust
        } else {
            width
        }
    }
}
