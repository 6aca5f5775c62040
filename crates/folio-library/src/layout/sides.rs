use std::fmt::{self, Debug, Formatter};
use std::ops::Add;

use crate::layout::Abs;

/// A container with start, before, end and after components, named after
/// the writing-mode relative edges of an area.
#[derive(Default, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Sides<T> {
    /// The value for the start edge (left in left-to-right text).
    pub start: T,
    /// The value for the before edge (top).
    pub before: T,
    /// The value for the end edge.
    pub end: T,
    /// The value for the after edge (bottom).
    pub after: T,
}

impl<T> Sides<T> {
    /// Create a new instance from the four components.
    pub const fn new(start: T, before: T, end: T, after: T) -> Self {
        Self { start, before, end, after }
    }

    /// Create an instance with four equal components.
    pub fn splat(value: T) -> Self
    where
        T: Clone,
    {
        Self {
            start: value.clone(),
            before: value.clone(),
            end: value.clone(),
            after: value,
        }
    }

    /// Map the individual fields with `f`.
    pub fn map<F, U>(self, mut f: F) -> Sides<U>
    where
        F: FnMut(T) -> U,
    {
        Sides {
            start: f(self.start),
            before: f(self.before),
            end: f(self.end),
            after: f(self.after),
        }
    }

    /// An iterator over the sides, starting with the start side.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        [&self.start, &self.before, &self.end, &self.after].into_iter()
    }
}

impl<T: Add + Copy> Sides<T> {
    /// The sum of the start and end components.
    pub fn inline_sum(&self) -> T::Output {
        self.start + self.end
    }

    /// The sum of the before and after components.
    pub fn block_sum(&self) -> T::Output {
        self.before + self.after
    }
}

impl Sides<Abs> {
    /// Whether all sides are zero.
    pub fn is_zero(&self) -> bool {
        self.iter().all(|side| *side == Abs::zero())
    }
}

impl<T: Debug + PartialEq> Debug for Sides<T> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        if self.start == self.before && self.before == self.end && self.end == self.after
        {
            write!(f, "Sides::splat({:?})", self.start)
        } else {
            f.debug_struct("Sides")
                .field("start", &self.start)
                .field("before", &self.before)
                .field("end", &self.end)
                .field("after", &self.after)
                .finish()
        }
    }
}
