//! Where identified content ended up.

use ecow::EcoString;
use rustc_hash::FxHashMap;

/// Maps document-level identifiers to the page their first area is on.
///
/// Cross references are resolved by renderers against this registry.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct IdRegistry {
    pages: FxHashMap<EcoString, usize>,
}

impl IdRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `id` has an area on `page`. Only the first page an id is
    /// registered on is kept. Returns whether the id was new.
    pub fn register(&mut self, id: EcoString, page: usize) -> bool {
        if self.pages.contains_key(&id) {
            return false;
        }
        tracing::trace!(%id, page, "registered id");
        self.pages.insert(id, page);
        true
    }

    /// The page number an id was first placed on.
    pub fn page_of(&self, id: &str) -> Option<usize> {
        self.pages.get(id).copied()
    }

    /// The number of registered ids.
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Whether no id is registered.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Merge another registry into this one, keeping earlier registrations.
    pub fn extend(&mut self, other: IdRegistry) {
        for (id, page) in other.pages {
            self.register(id, page);
        }
    }
}
