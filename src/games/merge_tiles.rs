//! Sliding merge-tile engine ("2048")
//!
//! Tiles are stored as exponents: 0 is empty, `n` is the tile 2^n.

use super::GlyphTable;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;

pub const SIZE: usize = 4;

/// Exponent of the winning tile, 2^11 = 2048
pub const WINNING_EXPONENT: u8 = 11;

pub const GLYPHS: GlyphTable = GlyphTable::new(&[
    "*️⃣", "1️⃣", "2️⃣", "3️⃣", "4️⃣", "5️⃣", "6️⃣", "7️⃣", "8️⃣", "9️⃣", "🔟", "#️⃣",
]);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slide {
    Up,
    Down,
    Left,
    Right,
}

/// Slide one line toward index 0, merging each equal pair once
pub fn collapse(line: [u8; SIZE]) -> [u8; SIZE] {
    let mut out = [0; SIZE];
    let mut len = 0;
    let mut pending: Option<u8> = None;
    for tile in line.into_iter().filter(|&tile| tile != 0) {
        match pending {
            Some(prev) if prev == tile => {
                out[len] = tile + 1;
                len += 1;
                pending = None;
            }
            Some(prev) => {
                out[len] = prev;
                len += 1;
                pending = Some(tile);
            }
            None => pending = Some(tile),
        }
    }
    if let Some(prev) = pending {
        out[len] = prev;
    }
    out
}

pub struct MergeTiles {
    grid: [[u8; SIZE]; SIZE],
    rng: StdRng,
}

impl MergeTiles {
    pub fn new(rng: StdRng) -> Self {
        let mut tiles = Self {
            grid: [[0; SIZE]; SIZE],
            rng,
        };
        tiles.spawn();
        tiles
    }

    #[cfg(test)]
    pub fn from_grid(grid: [[u8; SIZE]; SIZE], rng: StdRng) -> Self {
        Self { grid, rng }
    }

    fn free_cells(&self) -> Vec<(usize, usize)> {
        (0..SIZE)
            .flat_map(|r| (0..SIZE).map(move |c| (r, c)))
            .filter(|&(r, c)| self.grid[r][c] == 0)
            .collect()
    }

    /// Put a 2 or a 4 on a random free cell, if there is one
    fn spawn(&mut self) {
        let free = self.free_cells();
        if let Some(&(r, c)) = free.choose(&mut self.rng) {
            self.grid[r][c] = self.rng.gen_range(1..=2);
        }
    }

    fn slid(grid: &[[u8; SIZE]; SIZE], slide: Slide) -> [[u8; SIZE]; SIZE] {
        let mut out = [[0; SIZE]; SIZE];
        for k in 0..SIZE {
            // Read line k so that index 0 is the edge tiles slide toward
            let mut line = [0; SIZE];
            for (i, tile) in line.iter_mut().enumerate() {
                *tile = match slide {
                    Slide::Left => grid[k][i],
                    Slide::Right => grid[k][SIZE - 1 - i],
                    Slide::Up => grid[i][k],
                    Slide::Down => grid[SIZE - 1 - i][k],
                };
            }
            for (i, tile) in collapse(line).into_iter().enumerate() {
                match slide {
                    Slide::Left => out[k][i] = tile,
                    Slide::Right => out[k][SIZE - 1 - i] = tile,
                    Slide::Up => out[i][k] = tile,
                    Slide::Down => out[SIZE - 1 - i][k] = tile,
                }
            }
        }
        out
    }

    /// Slide every line, then spawn a new tile
    pub fn slide(&mut self, slide: Slide) {
        self.grid = Self::slid(&self.grid, slide);
        self.spawn();
    }

    pub fn win(&self) -> bool {
        self.grid
            .iter()
            .flatten()
            .any(|&tile| tile >= WINNING_EXPONENT)
    }

    /// No free cell and no slide would change anything
    pub fn loss(&self) -> bool {
        self.free_cells().is_empty()
            && [Slide::Up, Slide::Down, Slide::Left, Slide::Right]
                .into_iter()
                .all(|slide| Self::slid(&self.grid, slide) == self.grid)
    }

    /// Largest tile value on the board
    pub fn best(&self) -> u32 {
        let exponent = self.grid.iter().flatten().copied().max().unwrap_or(0);
        if exponent == 0 {
            0
        } else {
            1u32 << exponent
        }
    }

    pub fn render(&self, glyphs: &GlyphTable) -> String {
        glyphs.render(&self.grid)
    }
}
