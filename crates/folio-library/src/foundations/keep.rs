use std::fmt::{self, Debug, Formatter};

use crate::diag::{StrResult, bail};

/// The strength of a keep condition in one context.
#[derive(Default, Copy, Clone, Eq, PartialEq, Hash)]
pub enum KeepStrength {
    /// No keep condition.
    #[default]
    Auto,
    /// The strongest possible keep.
    Always,
    /// A keep of an integer strength. Higher is stronger.
    Strength(i32),
}

impl KeepStrength {
    /// Parse `auto`, `always` or an integer.
    pub fn parse(token: &str) -> StrResult<Self> {
        Ok(match token {
            "auto" => Self::Auto,
            "always" => Self::Always,
            _ => match token.parse() {
                Ok(n) => Self::Strength(n),
                Err(_) => bail!("unknown enum value `{}` for KeepStrength", token),
            },
        })
    }

    /// Whether this is `auto`.
    pub fn is_auto(self) -> bool {
        self == Self::Auto
    }
}

impl Debug for KeepStrength {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Self::Auto => f.pad("auto"),
            Self::Always => f.pad("always"),
            Self::Strength(n) => n.fmt(f),
        }
    }
}

/// A keep-together, keep-with-next or keep-with-previous condition.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Keep {
    /// Whether the content must stay within one line.
    pub within_line: KeepStrength,
    /// Whether the content must stay within one column.
    pub within_column: KeepStrength,
    /// Whether the content must stay within one page.
    pub within_page: KeepStrength,
}

impl Keep {
    /// A keep with the same strength in every context.
    pub fn always() -> Self {
        Self {
            within_line: KeepStrength::Always,
            within_column: KeepStrength::Always,
            within_page: KeepStrength::Always,
        }
    }

    /// A keep that only applies within a page.
    pub fn within_page(strength: KeepStrength) -> Self {
        Self { within_page: strength, ..Self::default() }
    }

    /// Whether the keep restricts block-level breaking, i.e. is non-auto
    /// within a page or within a column.
    pub fn is_active(self) -> bool {
        !self.within_page.is_auto() || !self.within_column.is_auto()
    }
}
