use ecow::EcoString;

use crate::layout::{Abs, Ratio};

/// A piece of inline content in a paragraph.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub enum InlineItem {
    /// A word that is never broken internally.
    Word(EcoString),
    /// An inter-word space, a legal line break opportunity.
    Space,
    /// A discretionary hyphenation point inside a word.
    SoftHyphen,
    /// A forced line break.
    LineBreak,
}

impl InlineItem {
    /// Split text into words and spaces. Hyphenation points can be marked
    /// with U+00AD.
    pub fn parse(text: &str) -> Vec<Self> {
        let mut items = vec![];
        for (i, word) in text.split_whitespace().enumerate() {
            if i > 0 {
                items.push(Self::Space);
            }
            for (j, part) in word.split('\u{ad}').enumerate() {
                if j > 0 {
                    items.push(Self::SoftHyphen);
                }
                if !part.is_empty() {
                    items.push(Self::Word(part.into()));
                }
            }
        }
        items
    }
}

/// Measures text.
///
/// Font handling lives outside of the layout engine, so paragraphs are
/// measured through this interface.
pub trait TextMeasure: Send + Sync {
    /// The advance width of a word.
    fn word_width(&self, word: &str, font_size: Abs) -> Abs;

    /// The natural width of an inter-word space.
    fn space_width(&self, font_size: Abs) -> Abs;

    /// The width of the hyphen added at a discretionary break.
    fn hyphen_width(&self, font_size: Abs) -> Abs {
        self.word_width("-", font_size)
    }
}

/// A text measure in which every character has the same advance.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Monospace {
    /// The advance of one character, relative to the font size.
    pub advance: Ratio,
}

impl Monospace {
    /// A measure where a character is `advance` times the font size wide.
    pub fn new(advance: Ratio) -> Self {
        Self { advance }
    }
}

impl Default for Monospace {
    fn default() -> Self {
        Self::new(Ratio::new(0.5))
    }
}

impl TextMeasure for Monospace {
    fn word_width(&self, word: &str, font_size: Abs) -> Abs {
        self.advance.of(font_size) * word.chars().count() as f64
    }

    fn space_width(&self, font_size: Abs) -> Abs {
        self.advance.of(font_size)
    }
}
