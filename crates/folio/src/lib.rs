//! A paginated layout engine.
//!
//! # Steps
//! - **Content:**
//!   The input is a [content tree] of page sequences, flows, blocks,
//!   paragraphs and tables, each with its resolved [properties]. Producing
//!   the tree from markup and computing the properties happens elsewhere.
//! - **Layout:**
//!   Layout managers turn the content into boxes, glues and penalties. The
//!   [breaking algorithm] chooses where lines and pages end and the managers
//!   materialize the chosen ranges into an [area tree].
//! - **Rendering:**
//!   Every finished page is handed to an [`AreaTreeHandler`], which
//!   serializes it into the output format.
//!
//! [content tree]: crate::model::ContentTree
//! [properties]: crate::foundations::PropertyList
//! [breaking algorithm]: folio_layout::breaking
//! [area tree]: crate::area

pub extern crate ecow;

pub use folio_library::*;
pub use folio_layout::{Document, InitialPageNumber};
#[doc(inline)]
pub use folio_layout as layout_engine;
#[doc(inline)]
pub use folio_utils as utils;

use folio_library::area::AreaTreeHandler;
use folio_library::config::Config;
use folio_library::diag::{SourceResult, Warned, deduplicate};
use folio_library::engine::{Engine, Sink};
use folio_library::model::{ContentTree, TextMeasure};

/// Lay out a content tree and hand the pages to `handler`.
///
/// - Returns `Ok(document)` if there were no fatal errors.
/// - Returns `Err(errors)` if there were fatal errors. Property values that
///   failed to resolve don't stop layout, but are reported here once it has
///   finished.
///
/// Warnings are returned in either case.
pub fn typeset(
    config: &Config,
    tree: &ContentTree,
    measure: &dyn TextMeasure,
    handler: &mut dyn AreaTreeHandler,
) -> Warned<SourceResult<Document>> {
    let mut sink = Sink::new();
    let output = typeset_impl(config, tree, measure, handler, &mut sink).map_err(deduplicate);
    Warned { output, warnings: sink.warnings() }
}

/// The internal implementation of `typeset`.
fn typeset_impl(
    config: &Config,
    tree: &ContentTree,
    measure: &dyn TextMeasure,
    handler: &mut dyn AreaTreeHandler,
    sink: &mut Sink,
) -> SourceResult<Document> {
    let mut engine = Engine::new(config, sink);
    let document = folio_layout::layout_document(&mut engine, tree, measure, handler)?;

    // Promote delayed errors.
    let delayed = sink.delayed();
    if !delayed.is_empty() {
        return Err(delayed);
    }

    tracing::info!(pages = document.pages, "typeset document");
    Ok(document)
}
