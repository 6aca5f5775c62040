//! Diagnostics.

use std::fmt::{self, Debug, Formatter};

use ecow::{EcoVec, eco_vec};

use crate::engine::Engine;
use crate::model::NodeId;

/// Early-return with a [`StrResult`] or [`SourceResult`].
///
/// If called with just a string and format args, returns with a
/// `StrResult`. If called with a span, a string and format args, returns
/// a `SourceResult`.
///
/// ```ignore
/// bail!("bailing with a {}", "string result");
/// bail!(span, "bailing with a {}", "source result");
/// bail!(span, "bailing with a {}", "source result"; hint: "hint 1");
/// ```
///
/// Hints are only supported together with a span.
#[macro_export]
#[doc(hidden)]
macro_rules! __bail {
    // For bail!("just a {}", "string")
    ($fmt:literal $(, $arg:expr)* $(,)?) => {
        return Err($crate::diag::error!($fmt $(, $arg)*))
    };

    // For bail!(error!(..))
    ($error:expr) => {
        return Err(::ecow::eco_vec![$error])
    };

    // For bail(span, ...)
    ($($tts:tt)*) => {
        return Err(::ecow::eco_vec![$crate::diag::error!($($tts)*)])
    };
}

/// Construct an [`EcoString`] or [`SourceDiagnostic`] with severity `Error`.
#[macro_export]
#[doc(hidden)]
macro_rules! __error {
    // For bail!("just a {}", "string").
    ($fmt:literal $(, $arg:expr)* $(,)?) => {
        $crate::diag::eco_format!($fmt, $($arg),*).into()
    };

    // For bail!(span, ...)
    (
        $span:expr, $fmt:literal $(, $arg:expr)*
        $(; hint: $hint:literal $(, $hint_arg:expr)*)*
        $(,)?
    ) => {
        $crate::diag::SourceDiagnostic::error(
            $span,
            $crate::diag::eco_format!($fmt, $($arg),*),
        )  $(.with_hint($crate::diag::eco_format!($hint, $($hint_arg),*)))*
    };
}

/// Construct a [`SourceDiagnostic`] with severity `Warning`.
///
/// ```ignore
/// warning!(span, "warning with a {}", "source result");
/// warning!(span, "warning with a {}", "source result"; hint: "hint 1");
/// ```
#[macro_export]
#[doc(hidden)]
macro_rules! __warning {
    (
        $span:expr,
        $fmt:literal $(, $arg:expr)*
        $(; hint: $hint:literal $(, $hint_arg:expr)*)*
        $(,)?
    ) => {
        $crate::diag::SourceDiagnostic::warning(
            $span,
            $crate::diag::eco_format!($fmt, $($arg),*),
        ) $(.with_hint($crate::diag::eco_format!($hint, $($hint_arg),*)))*
    };
}

#[rustfmt::skip]
#[doc(inline)]
pub use {
    crate::__bail as bail,
    crate::__error as error,
    crate::__warning as warning,
    ecow::{eco_format, EcoString},
};

/// A result that can carry multiple source errors.
pub type SourceResult<T> = Result<T, EcoVec<SourceDiagnostic>>;

/// A result type with a string error message.
pub type StrResult<T> = Result<T, EcoString>;

/// An output alongside warnings generated while producing it.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Warned<T> {
    /// The produced output.
    pub output: T,
    /// Warnings generated while producing the output.
    pub warnings: EcoVec<SourceDiagnostic>,
}

/// Identifies the content node a diagnostic is about.
///
/// Layout has no source text to point into, so the content node that was
/// being laid out plays the role of the location.
#[derive(Default, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Span(Option<NodeId>);

impl Span {
    /// A span that does not point at any node.
    pub const fn detached() -> Self {
        Self(None)
    }

    /// Whether the span points nowhere.
    pub const fn is_detached(self) -> bool {
        self.0.is_none()
    }

    /// The node the span points at.
    pub const fn node(self) -> Option<NodeId> {
        self.0
    }
}

impl From<NodeId> for Span {
    fn from(node: NodeId) -> Self {
        Self(Some(node))
    }
}

impl Debug for Span {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self.0 {
            Some(node) => write!(f, "Span({node:?})"),
            None => f.pad("Span(detached)"),
        }
    }
}

/// An error or warning about a content node.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct SourceDiagnostic {
    /// Whether the diagnostic is an error or a warning.
    pub severity: Severity,
    /// The node the problem is about.
    pub span: Span,
    /// A diagnostic message describing the problem.
    pub message: EcoString,
    /// Additional hints to the user, indicating how this problem could be
    /// avoided or worked around.
    pub hints: EcoVec<EcoString>,
}

/// The severity of a [`SourceDiagnostic`].
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum Severity {
    /// A fatal error.
    Error,
    /// A non-fatal warning.
    Warning,
}

impl SourceDiagnostic {
    /// Create a new, bare error.
    pub fn error(span: impl Into<Span>, message: impl Into<EcoString>) -> Self {
        Self {
            severity: Severity::Error,
            span: span.into(),
            message: message.into(),
            hints: eco_vec![],
        }
    }

    /// Create a new, bare warning.
    pub fn warning(span: impl Into<Span>, message: impl Into<EcoString>) -> Self {
        Self {
            severity: Severity::Warning,
            span: span.into(),
            message: message.into(),
            hints: eco_vec![],
        }
    }

    /// Adds a single hint to the diagnostic.
    pub fn hint(&mut self, hint: impl Into<EcoString>) {
        self.hints.push(hint.into());
    }

    /// Adds a single hint to the diagnostic.
    pub fn with_hint(mut self, hint: impl Into<EcoString>) -> Self {
        self.hint(hint);
        self
    }
}

/// Convert a [`StrResult`] to a [`SourceResult`] by adding span information.
pub trait At<T> {
    /// Add the span information.
    fn at(self, span: impl Into<Span>) -> SourceResult<T>;
}

impl<T, S> At<T> for Result<T, S>
where
    S: Into<EcoString>,
{
    fn at(self, span: impl Into<Span>) -> SourceResult<T> {
        let span = span.into();
        self.map_err(|message| eco_vec![SourceDiagnostic::error(span, message)])
    }
}

/// Destination for non-fatal problems found while resolving values.
///
/// Resolution code runs both inside a full layout (where an [`Engine`] is at
/// hand) and in isolated computations such as previews or tests, where
/// dropping the message is fine.
pub trait WarningSink {
    /// Emits a warning.
    fn emit(&mut self, warning: SourceDiagnostic);
}

impl WarningSink for () {
    fn emit(&mut self, _: SourceDiagnostic) {}
}

impl WarningSink for Engine<'_> {
    fn emit(&mut self, warning: SourceDiagnostic) {
        self.sink.warn(warning);
    }
}

impl WarningSink for crate::engine::Sink {
    fn emit(&mut self, warning: SourceDiagnostic) {
        self.warn(warning);
    }
}

/// Deduplicate errors based on their spans and messages.
pub fn deduplicate(mut diags: EcoVec<SourceDiagnostic>) -> EcoVec<SourceDiagnostic> {
    let mut unique = rustc_hash::FxHashSet::default();
    diags.retain(|diag| {
        let hash = folio_utils::hash128(&(&diag.span, &diag.message));
        unique.insert(hash)
    });
    diags
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_at_attaches_span() {
        let result: StrResult<()> = Err("unknown enum value: \"sideways\"".into());
        let errors = result.at(NodeId::from_raw(4)).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].span.node(), Some(NodeId::from_raw(4)));
        assert_eq!(errors[0].severity, Severity::Error);
    }

    #[test]
    fn test_deduplicate() {
        let diag = SourceDiagnostic::error(Span::detached(), "twice");
        let out = deduplicate(eco_vec![diag.clone(), diag]);
        assert_eq!(out.len(), 1);
    }
}
