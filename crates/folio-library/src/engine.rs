//! Definition of the central layout context.

use ecow::EcoVec;
use rayon::iter::{IndexedParallelIterator, IntoParallelIterator, ParallelIterator};
use rustc_hash::FxHashSet;

use crate::config::Config;
use crate::diag::{SourceDiagnostic, SourceResult};

/// Holds all data needed during layout.
pub struct Engine<'a> {
    /// The configuration the layout runs with.
    pub config: &'a Config,
    /// A pure sink for warnings and delayed errors.
    pub sink: &'a mut Sink,
}

impl<'a> Engine<'a> {
    /// Create a new engine writing into the given sink.
    pub fn new(config: &'a Config, sink: &'a mut Sink) -> Self {
        Self { config, sink }
    }

    /// Handles a result without immediately terminating execution. Instead, it
    /// produces a delayed error that is only promoted to a fatal one once the
    /// whole layout has finished.
    pub fn delay<T: Default>(&mut self, result: SourceResult<T>) -> T {
        match result {
            Ok(value) => value,
            Err(errors) => {
                self.sink.delay(errors);
                T::default()
            }
        }
    }

    /// Runs tasks on the engine in parallel.
    ///
    /// Every task gets its own sink, the sinks are merged back in task order
    /// afterwards so that warnings stay deterministic.
    pub fn parallelize<P, I, T, U, F>(
        &mut self,
        iter: P,
        f: F,
    ) -> impl Iterator<Item = U> + use<P, I, T, U, F>
    where
        P: IntoIterator<IntoIter = I>,
        I: Iterator<Item = T>,
        T: Send,
        U: Send,
        F: Fn(&mut Engine, T) -> U + Send + Sync,
    {
        let config = self.config;

        // We collect into a vector and then call `into_par_iter` instead of
        // using `par_bridge` because it does not retain the ordering.
        let work: Vec<T> = iter.into_iter().collect();

        // Work in parallel.
        let mut pairs: Vec<(U, Sink)> = Vec::with_capacity(work.len());
        work.into_par_iter()
            .map(|value| {
                let mut sink = Sink::new();
                let mut engine = Engine { config, sink: &mut sink };
                let output = f(&mut engine, value);
                (output, sink)
            })
            .collect_into_vec(&mut pairs);

        // Apply the subsinks to the outer sink.
        for (_, sink) in &mut pairs {
            let sink = std::mem::take(sink);
            self.sink.extend_from_sink(sink);
        }

        pairs.into_iter().map(|(output, _)| output)
    }
}

/// A push-only sink for delayed errors and warnings.
#[derive(Default, Clone)]
pub struct Sink {
    /// Delayed errors: Those are errors that only affect a single property
    /// evaluation. Layout continues with a default value and the error is
    /// promoted at the very end.
    delayed: EcoVec<SourceDiagnostic>,
    /// Warnings emitted during layout.
    warnings: EcoVec<SourceDiagnostic>,
    /// Hashes of all warning's spans and messages for warning deduplication.
    warnings_set: FxHashSet<u128>,
}

impl Sink {
    /// Create a new empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the stored delayed errors.
    pub fn delayed(&mut self) -> EcoVec<SourceDiagnostic> {
        std::mem::take(&mut self.delayed)
    }

    /// Get the stored warnings.
    pub fn warnings(self) -> EcoVec<SourceDiagnostic> {
        self.warnings
    }

    /// Push delayed errors.
    pub fn delay(&mut self, errors: EcoVec<SourceDiagnostic>) {
        self.delayed.extend(errors);
    }

    /// Add a warning.
    pub fn warn(&mut self, warning: SourceDiagnostic) {
        // Check if warning is a duplicate.
        let hash = folio_utils::hash128(&(&warning.span, &warning.message));
        if self.warnings_set.insert(hash) {
            tracing::debug!(message = %warning.message, "layout warning");
            self.warnings.push(warning);
        }
    }

    /// Extend from another sink.
    pub fn extend_from_sink(&mut self, other: Sink) {
        self.delayed.extend(other.delayed);
        for warning in other.warnings {
            self.warn(warning);
        }
    }
}
