//! Layout of page sequences into pages.

mod finalize;
mod run;

use folio_library::area::AreaTreeHandler;
use folio_library::diag::{At, SourceResult, StrResult, bail, warning};
use folio_library::engine::Engine;
use folio_library::foundations::{ForcePageCount, PropertyId, Value};
use folio_library::introspection::IdRegistry;
use folio_library::model::{
    ContentTree, NodeId, NodeKind, PageMaster, RegionName, Styles, TextMeasure,
};

use self::finalize::Finalizer;
use self::run::layout_sequence;

/// The result of laying out a document. The pages themselves went to the
/// [`AreaTreeHandler`].
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Document {
    /// The number of pages handed to the renderer.
    pub pages: usize,
    /// On which page each identified node landed.
    pub ids: IdRegistry,
}

/// Lay out all page sequences of a content tree and stream the finished
/// pages to `handler`.
///
/// Sequences are independent of each other. With [`parallel`] layout, they
/// are laid out concurrently and numbered afterwards. Otherwise, each page
/// goes to the handler as soon as it is complete.
///
/// [`parallel`]: folio_library::config::Config::parallel
pub fn layout_document(
    engine: &mut Engine,
    tree: &ContentTree,
    measure: &dyn TextMeasure,
    handler: &mut dyn AreaTreeHandler,
) -> SourceResult<Document> {
    let sequences = collect(engine, tree);
    let mut finalizer = Finalizer::new(handler);

    if engine.config.parallel {
        let mut runs = engine.parallelize(sequences.iter(), |engine, sequence| {
            let mut pages = vec![];
            layout_sequence(engine, tree, measure, sequence, &mut |page| {
                pages.push(page);
                Ok(())
            })
            .map(|()| pages)
        });

        for (i, sequence) in sequences.iter().enumerate() {
            let Some(pages) = runs.next() else { break };
            finalizer.start_sequence(i, sequence);
            for page in pages? {
                finalizer.page(page)?;
            }
            finalizer.end_sequence(sequence.force, sequences.get(i + 1))?;
        }
    } else {
        for (i, sequence) in sequences.iter().enumerate() {
            finalizer.start_sequence(i, sequence);
            layout_sequence(engine, tree, measure, sequence, &mut |page| {
                finalizer.page(page)
            })?;
            finalizer.end_sequence(sequence.force, sequences.get(i + 1))?;
        }
    }

    let document = finalizer.finish();
    tracing::debug!(
        sequences = sequences.len(),
        pages = document.pages,
        ids = document.ids.len(),
        "laid out document"
    );
    Ok(document)
}

/// A page sequence and the content it lays out.
#[derive(Debug, Clone)]
pub(crate) struct Sequence {
    node: NodeId,
    master: PageMaster,
    flow: Option<NodeId>,
    statics: Vec<(RegionName, NodeId)>,
    initial: InitialPageNumber,
    force: ForcePageCount,
}

/// Find the page sequences below the root.
fn collect(engine: &mut Engine, tree: &ContentTree) -> Vec<Sequence> {
    let mut sequences = vec![];
    for &node in tree.node(tree.root()).children() {
        let NodeKind::PageSequence(master) = tree.node(node).kind() else {
            engine.sink.warn(warning!(
                node,
                "content outside of a page sequence is ignored";
                hint: "wrap it in a page sequence"
            ));
            continue;
        };

        let styles = tree.styles(node);
        let mut sequence = Sequence {
            node,
            master: master.clone(),
            flow: None,
            statics: vec![],
            initial: engine.delay(InitialPageNumber::from_styles(styles).at(node)),
            force: engine.delay(styles.keyword(PropertyId::ForcePageCount).at(node)),
        };

        for &child in tree.node(node).children() {
            match tree.node(child).kind() {
                NodeKind::Flow if sequence.flow.is_none() => sequence.flow = Some(child),
                NodeKind::Flow => engine.sink.warn(warning!(
                    child,
                    "page sequence has more than one flow";
                    hint: "only the first flow is laid out"
                )),
                NodeKind::StaticContent(name) => sequence.statics.push((*name, child)),
                _ => engine.sink.warn(warning!(
                    child,
                    "page sequences can only contain flows and static content"
                )),
            }
        }

        sequences.push(sequence);
    }
    sequences
}

/// How the first page of a sequence is numbered.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Hash)]
pub enum InitialPageNumber {
    /// Continue from the previous sequence.
    #[default]
    Auto,
    /// Continue from the previous sequence, skipping to the next odd number.
    AutoOdd,
    /// Continue from the previous sequence, skipping to the next even
    /// number.
    AutoEven,
    /// Start at the given number.
    Number(usize),
}

impl InitialPageNumber {
    /// Read the `initial-page-number` property.
    pub fn from_styles(styles: Styles) -> StrResult<Self> {
        Ok(match styles.get(PropertyId::InitialPageNumber) {
            None => Self::Auto,
            Some(Value::Int(n)) if *n >= 1 => Self::Number(*n as usize),
            Some(Value::Int(n)) => bail!("initial page number must be positive, found {}", n),
            Some(Value::Keyword(keyword)) => match keyword.as_str() {
                "auto" => Self::Auto,
                "auto-odd" => Self::AutoOdd,
                "auto-even" => Self::AutoEven,
                _ => bail!("unknown enum value `{}` for InitialPageNumber", keyword),
            },
            Some(other) => {
                bail!("expected integer or keyword for initial-page-number, found {:?}", other)
            }
        })
    }

    /// The number of the sequence's first page if the previous sequence
    /// left off before `next`.
    pub fn first_number(self, next: usize) -> usize {
        match self {
            Self::Auto => next,
            Self::AutoOdd if next % 2 == 0 => next + 1,
            Self::AutoEven if next % 2 == 1 => next + 1,
            Self::AutoOdd | Self::AutoEven => next,
            Self::Number(n) => n,
        }
    }
}

#[cfg(test)]
mod tests {
    use folio_library::foundations::PropertyList;

    use super::*;

    #[test]
    fn test_initial_page_number() {
        let mut tree = ContentTree::new();
        let node = tree.push(
            tree.root(),
            NodeKind::PageSequence(PageMaster::letter()),
            PropertyList::new().with(PropertyId::InitialPageNumber, "auto-even"),
        );
        let initial = InitialPageNumber::from_styles(tree.styles(node)).unwrap();
        assert_eq!(initial, InitialPageNumber::AutoEven);
        assert_eq!(initial.first_number(3), 4);
        assert_eq!(initial.first_number(4), 4);
        assert_eq!(InitialPageNumber::AutoOdd.first_number(4), 5);
        assert_eq!(InitialPageNumber::Number(10).first_number(4), 10);

        let zero = tree.push(
            tree.root(),
            NodeKind::PageSequence(PageMaster::letter()),
            PropertyList::new().with(PropertyId::InitialPageNumber, 0_i64),
        );
        assert!(InitialPageNumber::from_styles(tree.styles(zero)).is_err());
    }
}
