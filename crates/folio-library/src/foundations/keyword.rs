use crate::diag::StrResult;

/// A property value drawn from a fixed set of keywords.
pub trait Keyword: Sized + Copy + Default {
    /// Parse a keyword, failing with an "unknown enum value" error for a
    /// token outside the set.
    fn parse(token: &str) -> StrResult<Self>;

    /// The keyword as written in a document.
    fn as_str(self) -> &'static str;
}

/// Define an enum whose variants map one-to-one to keywords.
macro_rules! keywords {
    (
        $(#[$attr:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$vattr:meta])*
                $variant:ident = $string:literal
            ),* $(,)?
        }
    ) => {
        $(#[$attr])*
        #[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Hash)]
        $vis enum $name {
            $($(#[$vattr])* $variant,)*
        }

        impl $crate::foundations::Keyword for $name {
            fn parse(token: &str) -> $crate::diag::StrResult<Self> {
                match token {
                    $($string => Ok(Self::$variant),)*
                    _ => $crate::diag::bail!(
                        "unknown enum value `{}` for {}",
                        token,
                        stringify!($name)
                    ),
                }
            }

            fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $string,)*
                }
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = $crate::diag::EcoString;

            fn from_str(s: &str) -> $crate::diag::StrResult<Self> {
                <Self as $crate::foundations::Keyword>::parse(s)
            }
        }
    };
}

keywords! {
    /// Where a forced break sends the content that follows it.
    pub enum BreakClass {
        /// No forced break.
        #[default]
        Auto = "auto",
        /// The next column.
        Column = "column",
        /// The next page.
        Page = "page",
        /// The next page with an even number.
        EvenPage = "even-page",
        /// The next page with an odd number.
        OddPage = "odd-page",
    }
}

impl BreakClass {
    /// Whether this class forces a break at all.
    pub fn is_forced(self) -> bool {
        self != Self::Auto
    }

    /// Whether a page with the given number satisfies the class.
    pub fn accepts_page(self, number: usize) -> bool {
        match self {
            Self::EvenPage => number % 2 == 0,
            Self::OddPage => number % 2 == 1,
            _ => true,
        }
    }
}

keywords! {
    /// How lines are aligned in the inline progression direction.
    pub enum TextAlign {
        /// Aligned at the start edge.
        #[default]
        Start = "start",
        /// Aligned at the end edge.
        End = "end",
        /// Centered.
        Center = "center",
        /// Stretched to fill the line.
        Justify = "justify",
    }
}

keywords! {
    /// How the column widths of a table are determined.
    pub enum TableLayout {
        /// From the content of the cells.
        #[default]
        Auto = "auto",
        /// From the column declarations and the table width alone.
        Fixed = "fixed",
    }
}

keywords! {
    /// A constraint on the number of pages in a page sequence.
    pub enum ForcePageCount {
        /// Make the next sequence start on the page parity it asks for.
        #[default]
        Auto = "auto",
        /// An even number of pages.
        Even = "even",
        /// An odd number of pages.
        Odd = "odd",
        /// End on an even page.
        EndOnEven = "end-on-even",
        /// End on an odd page.
        EndOnOdd = "end-on-odd",
        /// No constraint.
        NoForce = "no-force",
    }
}

keywords! {
    /// Whether a before/after region spans the full page width, overlapping
    /// the start/end regions.
    pub enum Precedence {
        /// The start/end regions take the corners.
        #[default]
        False = "false",
        /// The before/after region takes the corners.
        True = "true",
    }
}
