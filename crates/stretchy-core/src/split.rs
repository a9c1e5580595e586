#![forbid(unsafe_code)]

//! Character splitter: text → ordered cells.
//!
//! Splits on extended grapheme clusters so combined sequences (accents,
//! emoji with modifiers) animate as one unit. A literal space becomes a
//! non-breaking space so the host does not collapse it.

use unicode_segmentation::UnicodeSegmentation;

use crate::cell::{Cell, CellStyle};

/// Replacement for `' '` so whitespace stays visible as its own cell.
pub const NBSP: &str = "\u{00A0}";

/// Split `text` into cells, all starting at `rest`.
///
/// Empty text yields an empty vector.
#[must_use]
pub fn split_text(text: &str, rest: CellStyle) -> Vec<Cell> {
    text.graphemes(true)
        .enumerate()
        .map(|(index, grapheme)| {
            let glyph = if grapheme == " " { NBSP } else { grapheme };
            Cell::new(index, glyph, rest)
        })
        .collect()
}
