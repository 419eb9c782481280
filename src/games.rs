//! Deterministic grid engines driven by the game machines
//!
//! Each engine owns its own seedable random generator so tests can fix
//! shape, food and tile choices.

mod falling_blocks;
mod merge_tiles;
mod snake;

#[cfg(test)]
mod proptests;

pub use falling_blocks::{FallingBlocks, Tick, COLORFUL, TWO_TONE};
pub use merge_tiles::{MergeTiles, Slide, GLYPHS as TILE_GLYPHS};
pub use snake::{Move, Snake, GLYPHS as SNAKE_GLYPHS};

use thiserror::Error;

/// Invariant violations inside an engine. These are logic bugs, never user
/// facing conditions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("falling shape overlaps locked cell at row {row}, column {col}")]
    Overlap { row: usize, col: usize },
    #[error("falling shape leaves the table at row {row}, column {col}")]
    OutOfBounds { row: isize, col: isize },
}

/// Replaceable mapping from cell kind to the string drawn for it.
///
/// Kinds past the end of the table reuse the last glyph, which is what
/// lets a two-symbol table draw every non-empty kind alike.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlyphTable {
    glyphs: &'static [&'static str],
}

impl GlyphTable {
    pub const fn new(glyphs: &'static [&'static str]) -> Self {
        Self { glyphs }
    }

    pub fn glyph(&self, kind: u8) -> &'static str {
        let index = usize::from(kind).min(self.glyphs.len().saturating_sub(1));
        self.glyphs.get(index).copied().unwrap_or("?")
    }

    /// Draw a grid of kinds, one line per row
    pub fn render<R: AsRef<[u8]>>(&self, rows: &[R]) -> String {
        rows.iter()
            .map(|row| row.as_ref().iter().map(|&kind| self.glyph(kind)).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }
}
