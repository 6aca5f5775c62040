//! Distribution of a table's content width over its columns.

use folio_library::diag::{Span, WarningSink, warning};
use folio_library::foundations::ColumnWidth;
use folio_library::layout::{Abs, PercentBaseContext};
use folio_library::model::NodeId;

/// A declared table column.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSpec {
    /// The column node, or the table itself for implicit columns.
    pub node: NodeId,
    /// The declared width.
    pub width: ColumnWidth,
}

/// The columns of one table and the width of one proportional unit.
///
/// The unit is computed once per layout attempt and stays until
/// [`reset`](Self::reset). Zero means that it was not computed yet.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ColumnSetup {
    columns: Vec<ColumnSpec>,
    /// Millipoints per proportional factor, unrounded.
    unit: f64,
}

impl ColumnSetup {
    /// Create a setup for the given columns.
    pub fn new(columns: Vec<ColumnSpec>) -> Self {
        Self { columns, unit: 0.0 }
    }

    /// The number of columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Whether there are no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// The width of one proportional unit, if already computed.
    pub fn unit(&self) -> Option<Abs> {
        (self.unit > 0.0).then(|| self.share(1.0))
    }

    /// Forget the computed unit.
    pub fn reset(&mut self) {
        self.unit = 0.0;
    }

    /// The width of `factors` units, rounded to whole millipoints.
    fn share(&self, factors: f64) -> Abs {
        Abs::mpt((factors * self.unit).round() as i64)
    }

    /// Resolve the widths of all columns for a table of the given content
    /// width.
    ///
    /// Fixed widths resolve against `context`. Proportional columns share
    /// what is left over: a column declared as `n*` gets `n` units. If the
    /// fixed columns leave nothing over or the proportional factors sum to
    /// zero, proportional columns get no width and a warning is emitted at
    /// `span`.
    ///
    /// Proportional columns are rounded at their edges, so together they
    /// take exactly the width the fixed columns leave over.
    pub fn resolve_widths(
        &mut self,
        content_width: Abs,
        context: &dyn PercentBaseContext,
        span: Span,
        sink: &mut impl WarningSink,
    ) -> Vec<Abs> {
        let mut fixed_sum = Abs::zero();
        let mut factor_sum = 0.0;
        let mut proportional = false;
        let mut fixed = Vec::with_capacity(self.columns.len());

        for column in &self.columns {
            match &column.width {
                ColumnWidth::Fixed(length) => {
                    let width = length.resolve(Some(context), sink);
                    fixed_sum += width;
                    fixed.push(Some(width));
                }
                ColumnWidth::Proportional(factor) => {
                    factor_sum += factor.max(0.0);
                    proportional = true;
                    fixed.push(None);
                }
            }
        }

        if proportional && self.unit().is_none() {
            let remaining = content_width - fixed_sum;
            if remaining <= Abs::zero() {
                sink.emit(warning!(
                    span,
                    "fixed column widths leave no room for proportional columns";
                    hint: "the fixed columns take {:?} of {:?}", fixed_sum, content_width
                ));
            } else if factor_sum <= 0.0 {
                sink.emit(warning!(
                    span,
                    "proportional column widths sum to zero";
                    hint: "use a positive factor like `1*` for proportional columns"
                ));
            } else {
                self.unit = remaining.to_mpt() as f64 / factor_sum;
                tracing::trace!(unit = ?self.unit, "computed table unit");
            }
        }

        let mut factors = 0.0;
        self.columns
            .iter()
            .zip(fixed)
            .map(|(column, fixed)| match (fixed, &column.width) {
                (Some(width), _) => width,
                (None, ColumnWidth::Proportional(factor)) => {
                    let start = self.share(factors);
                    factors += factor.max(0.0);
                    self.share(factors) - start
                }
                (None, ColumnWidth::Fixed(_)) => Abs::zero(),
            })
            .collect()
    }
}
