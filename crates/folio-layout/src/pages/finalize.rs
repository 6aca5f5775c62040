use folio_library::area::{AreaTreeHandler, BlockArea, Page, RegionArea};
use folio_library::diag::SourceResult;
use folio_library::foundations::ForcePageCount;
use folio_library::introspection::IdRegistry;
use folio_library::layout::{Rect, Size};
use folio_library::model::RegionName;

use super::run::LayoutedPage;
use super::{Document, InitialPageNumber, Sequence};

/// Numbers pages, inserts blank pages where parity requires them and hands
/// everything to the renderer in document order.
pub struct Finalizer<'a> {
    handler: &'a mut dyn AreaTreeHandler,
    ids: IdRegistry,
    /// The number the next page gets.
    next: usize,
    /// The number of pages handed over so far.
    total: usize,
    /// The number of pages in the current sequence.
    in_sequence: usize,
    sequence: usize,
    size: Size,
    body: Rect,
}

impl<'a> Finalizer<'a> {
    pub fn new(handler: &'a mut dyn AreaTreeHandler) -> Self {
        Self {
            handler,
            ids: IdRegistry::new(),
            next: 1,
            total: 0,
            in_sequence: 0,
            sequence: 0,
            size: Size::zero(),
            body: Rect::default(),
        }
    }

    /// Start numbering the pages of a sequence.
    pub fn start_sequence(&mut self, index: usize, sequence: &Sequence) {
        self.next = sequence.initial.first_number(self.next);
        self.in_sequence = 0;
        self.sequence = index;
        self.size = sequence.master.size;
        self.body = sequence.master.region_rect(RegionName::Body).unwrap_or_default();
    }

    /// Hand over a laid out page, preceded by a blank page if it must land
    /// on the other parity.
    pub fn page(&mut self, page: LayoutedPage) -> SourceResult<()> {
        if !page.break_class.accepts_page(self.next) {
            self.blank()?;
        }

        for id in &page.ids {
            self.ids.register(id.clone(), self.next);
        }

        self.emit(Page {
            number: self.next,
            sequence: self.sequence,
            size: page.size,
            blank: false,
            regions: page.regions,
            ids: page.ids,
        })
    }

    /// Append a blank page if the sequence's page count or its last page
    /// number violates its `force-page-count`.
    pub fn end_sequence(
        &mut self,
        force: ForcePageCount,
        next: Option<&Sequence>,
    ) -> SourceResult<()> {
        let last = self.next.saturating_sub(1);
        let odd = |n: usize| n % 2 == 1;
        let blank = match force {
            // The sequence must end so that the next one starts on the
            // parity it asks for.
            ForcePageCount::Auto => match next.map(|sequence| sequence.initial) {
                Some(InitialPageNumber::Number(n)) => odd(last) == odd(n),
                Some(InitialPageNumber::AutoOdd) => odd(last),
                Some(InitialPageNumber::AutoEven) => !odd(last),
                Some(InitialPageNumber::Auto) | None => false,
            },
            ForcePageCount::Even => odd(self.in_sequence),
            ForcePageCount::Odd => !odd(self.in_sequence),
            ForcePageCount::EndOnEven => odd(last),
            ForcePageCount::EndOnOdd => !odd(last),
            ForcePageCount::NoForce => false,
        };

        if blank {
            tracing::debug!(?force, last, "forcing page count");
            self.blank()?;
        }
        Ok(())
    }

    /// The document summary once all pages are out.
    pub fn finish(self) -> Document {
        Document { pages: self.total, ids: self.ids }
    }

    fn blank(&mut self) -> SourceResult<()> {
        let content = BlockArea::new(self.body.size.width, None);
        self.emit(Page {
            number: self.next,
            sequence: self.sequence,
            size: self.size,
            blank: true,
            regions: vec![RegionArea { name: RegionName::Body, rect: self.body, content }],
            ids: vec![],
        })
    }

    fn emit(&mut self, page: Page) -> SourceResult<()> {
        tracing::trace!(number = page.number, blank = page.blank, "rendering page");
        self.handler.render_page(page)?;
        self.next += 1;
        self.total += 1;
        self.in_sequence += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use folio_library::foundations::BreakClass;
    use folio_library::model::{NodeId, PageMaster};

    use super::*;

    fn sequence(initial: InitialPageNumber) -> Sequence {
        Sequence {
            node: NodeId::from_raw(1),
            master: PageMaster::letter(),
            flow: None,
            statics: vec![],
            initial,
            force: ForcePageCount::Auto,
        }
    }

    fn page(break_class: BreakClass) -> LayoutedPage {
        LayoutedPage { size: Size::zero(), regions: vec![], ids: vec![], break_class }
    }

    #[test]
    fn test_parity_break_inserts_blank_page() {
        let mut pages: Vec<Page> = vec![];
        let mut finalizer = Finalizer::new(&mut pages);
        finalizer.start_sequence(0, &sequence(InitialPageNumber::Auto));
        finalizer.page(page(BreakClass::Auto)).unwrap();
        finalizer.page(page(BreakClass::OddPage)).unwrap();
        let document = finalizer.finish();
        assert_eq!(document.pages, 3);

        let numbers: Vec<(usize, bool)> = pages.iter().map(|p| (p.number, p.blank)).collect();
        assert_eq!(numbers, [(1, false), (2, true), (3, false)]);
    }

    #[test]
    fn test_force_page_count() {
        let cases = [
            (ForcePageCount::Even, 1, true),
            (ForcePageCount::Even, 2, false),
            (ForcePageCount::Odd, 2, true),
            (ForcePageCount::EndOnEven, 3, true),
            (ForcePageCount::EndOnOdd, 3, false),
            (ForcePageCount::NoForce, 1, false),
        ];
        for (force, count, blank) in cases {
            let mut pages: Vec<Page> = vec![];
            let mut finalizer = Finalizer::new(&mut pages);
            finalizer.start_sequence(0, &sequence(InitialPageNumber::Auto));
            for _ in 0..count {
                finalizer.page(page(BreakClass::Auto)).unwrap();
            }
            finalizer.end_sequence(force, None).unwrap();
            assert_eq!(finalizer.finish().pages, count + usize::from(blank), "{force:?}");
        }
    }

    #[test]
    fn test_auto_force_follows_next_sequence() {
        let mut pages: Vec<Page> = vec![];
        let mut finalizer = Finalizer::new(&mut pages);
        let first = sequence(InitialPageNumber::Auto);
        let second = sequence(InitialPageNumber::AutoOdd);
        finalizer.start_sequence(0, &first);
        finalizer.page(page(BreakClass::Auto)).unwrap();
        finalizer.end_sequence(ForcePageCount::Auto, Some(&second)).unwrap();
        finalizer.start_sequence(1, &second);
        finalizer.page(page(BreakClass::Auto)).unwrap();
        finalizer.end_sequence(ForcePageCount::Auto, None).unwrap();
        finalizer.finish();

        let numbers: Vec<(usize, usize, bool)> =
            pages.iter().map(|p| (p.sequence, p.number, p.blank)).collect();
        assert_eq!(numbers, [(0, 1, false), (0, 2, true), (1, 3, false)]);
    }

    #[test]
    fn test_ids_register_first_page() {
        let mut pages: Vec<Page> = vec![];
        let mut finalizer = Finalizer::new(&mut pages);
        finalizer.start_sequence(0, &sequence(InitialPageNumber::Number(5)));
        let mut first = page(BreakClass::Auto);
        first.ids.push("intro".into());
        finalizer.page(first).unwrap();
        let mut second = page(BreakClass::Auto);
        second.ids.push("intro".into());
        finalizer.page(second).unwrap();
        assert_eq!(finalizer.finish().ids.page_of("intro"), Some(5));
    }
}
