//! Falling-block engine
//!
//! A 22×10 table of locked cell kinds and one falling shape. The top two
//! rows are the spawn buffer; a locked cell in either of the next two rows
//! ends the game.

use super::{GlyphTable, GridError};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

pub const ROWS: usize = 22;
pub const COLS: usize = 10;
pub const SPAWN_ROW: isize = 0;
pub const SPAWN_COL: isize = 3;

/// Rows checked by `loss()`: the two topmost playable rows
const LOSS_ROWS: [usize; 2] = [2, 3];

/// Kind drawn around the board
const BORDER: u8 = 1;

/// Shape matrix; 0 means empty, anything else is a cell kind
pub type Shape = Vec<Vec<u8>>;

const SHAPES: &[&[&[u8]]] = &[
    &[&[0, 0, 2, 0], &[0, 0, 2, 0], &[0, 0, 2, 0], &[0, 0, 2, 0]],
    &[&[0, 3, 0], &[3, 3, 3], &[0, 0, 0]],
    &[&[4, 0, 0], &[4, 4, 4], &[0, 0, 0]],
    &[&[0, 0, 0], &[5, 5, 5], &[5, 0, 0]],
    &[&[0, 0, 0], &[0, 6, 6], &[6, 6, 0]],
    &[&[0, 0, 0], &[7, 7, 0], &[0, 7, 7]],
    &[&[8, 8], &[8, 8]],
];

pub const COLORFUL: GlyphTable =
    GlyphTable::new(&["⬜", "⬛", "🟥", "🟧", "🟨", "🟩", "🟦", "🟪", "🟫"]);
pub const TWO_TONE: GlyphTable = GlyphTable::new(&["⬜", "⬛"]);

/// Braille cells, indexed by `(upper, lower)` occupancy
const BRAILLE_FULL: char = '⠿';
const BRAILLE_EVEN: [char; 4] = ['⠀', '⠤', '⠛', BRAILLE_FULL];
const BRAILLE_ODD: [char; 4] = ['⠀', '⠶', '⠉', BRAILLE_FULL];

/// What a single `step` did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// The shape moved down one row
    Fell,
    /// The shape locked, `cleared` rows were removed and a new shape spawned
    Locked { cleared: usize },
}

/// Table cell covered by shape cell `(i, j)` when the shape sits at `(row, col)`
fn cell_at(row: isize, col: isize, i: usize, j: usize) -> Option<(usize, usize)> {
    let r = usize::try_from(row.checked_add_unsigned(i)?).ok()?;
    let c = usize::try_from(col.checked_add_unsigned(j)?).ok()?;
    (r < ROWS && c < COLS).then_some((r, c))
}

/// Occupied cells of a shape as `(i, j, kind)`
fn occupied(shape: &Shape) -> impl Iterator<Item = (usize, usize, u8)> + '_ {
    shape.iter().enumerate().flat_map(|(i, line)| {
        line.iter()
            .enumerate()
            .filter(|&(_, &kind)| kind != 0)
            .map(move |(j, &kind)| (i, j, kind))
    })
}

/// Quarter turn: transpose, then reverse the row order
pub fn rotated(shape: &Shape) -> Shape {
    let width = shape.first().map_or(0, Vec::len);
    (0..width)
        .rev()
        .map(|j| shape.iter().map(|line| line[j]).collect())
        .collect()
}

pub struct FallingBlocks {
    table: Vec<[u8; COLS]>,
    shape: Shape,
    row: isize,
    col: isize,
    /// Set when a freshly spawned shape had no room; no shape is in play
    topped_out: bool,
    lines_cleared: usize,
    rng: StdRng,
}

impl FallingBlocks {
    pub fn new(mut rng: StdRng) -> Self {
        let shape = random_shape(&mut rng);
        Self {
            table: vec![[0; COLS]; ROWS],
            shape,
            row: SPAWN_ROW,
            col: SPAWN_COL,
            topped_out: false,
            lines_cleared: 0,
            rng,
        }
    }

    /// True iff every occupied cell of `shape` at `(row, col)` is inside the
    /// table and on an empty cell
    pub fn fits(&self, shape: &Shape, row: isize, col: isize) -> bool {
        occupied(shape).all(|(i, j, _)| {
            cell_at(row, col, i, j).is_some_and(|(r, c)| self.table[r][c] == 0)
        })
    }

    /// Move down one row, or lock, clear full rows and spawn
    pub fn step(&mut self) -> Result<Tick, GridError> {
        if self.topped_out {
            return Ok(Tick::Fell);
        }
        if self.fits(&self.shape, self.row + 1, self.col) {
            self.row += 1;
            return Ok(Tick::Fell);
        }

        self.lock()?;
        let cleared = self.clear_full_rows();
        self.spawn();
        Ok(Tick::Locked { cleared })
    }

    /// Hard drop: fall until the shape locks. Returns cleared rows.
    pub fn multistep(&mut self) -> Result<usize, GridError> {
        if self.topped_out {
            return Ok(0);
        }
        loop {
            if let Tick::Locked { cleared } = self.step()? {
                return Ok(cleared);
            }
        }
    }

    /// Rotate in place if the rotated shape fits; no wall kicks
    pub fn rotate(&mut self) {
        let candidate = rotated(&self.shape);
        if !self.topped_out && self.fits(&candidate, self.row, self.col) {
            self.shape = candidate;
        }
    }

    pub fn left(&mut self) {
        self.shift(-1);
    }

    pub fn right(&mut self) {
        self.shift(1);
    }

    fn shift(&mut self, delta: isize) {
        if !self.topped_out && self.fits(&self.shape, self.row, self.col + delta) {
            self.col += delta;
        }
    }

    /// True once anything is locked in the top playable rows
    pub fn loss(&self) -> bool {
        self.topped_out
            || LOSS_ROWS
                .iter()
                .any(|&r| self.table[r].iter().any(|&kind| kind != 0))
    }

    pub fn lines_cleared(&self) -> usize {
        self.lines_cleared
    }

    #[allow(dead_code)] // Used by tests
    pub fn table(&self) -> &[[u8; COLS]] {
        &self.table
    }

    #[allow(dead_code)] // Used by tests
    pub fn position(&self) -> (isize, isize) {
        (self.row, self.col)
    }

    /// Table overlaid with the falling shape
    pub fn board(&self) -> Result<Vec<[u8; COLS]>, GridError> {
        let mut board = self.table.clone();
        if self.topped_out {
            return Ok(board);
        }
        for (i, j, kind) in occupied(&self.shape) {
            let (r, c) = cell_at(self.row, self.col, i, j).ok_or(GridError::OutOfBounds {
                row: self.row,
                col: self.col,
            })?;
            if board[r][c] != 0 {
                return Err(GridError::Overlap { row: r, col: c });
            }
            board[r][c] = kind;
        }
        Ok(board)
    }

    /// Board with a one-cell border, drawn through `glyphs`
    pub fn render(&self, glyphs: &GlyphTable) -> Result<String, GridError> {
        let edge = vec![BORDER; COLS + 2];
        let mut rows = Vec::with_capacity(ROWS + 2);
        rows.push(edge.clone());
        for line in self.board()? {
            let mut row = Vec::with_capacity(COLS + 2);
            row.push(BORDER);
            row.extend_from_slice(&line);
            row.push(BORDER);
            rows.push(row);
        }
        rows.push(edge);
        Ok(glyphs.render(&rows))
    }

    /// Compact rendering: three board rows per pair of text lines.
    ///
    /// The board is framed by a full row above and below, giving eight
    /// groups of three rows. The first line of a group draws rows one and
    /// two, the second draws rows two and three.
    pub fn braille(&self) -> Result<String, GridError> {
        let full = [true; COLS];
        let mut rows = Vec::with_capacity(ROWS + 2);
        rows.push(full);
        for line in self.board()? {
            rows.push(line.map(|kind| kind != 0));
        }
        rows.push(full);

        let draw = |upper: &[bool; COLS], lower: &[bool; COLS], glyphs: &[char; 4]| {
            let mut line = String::with_capacity((COLS + 2) * 3);
            line.push(BRAILLE_FULL);
            for (&u, &l) in upper.iter().zip(lower) {
                line.push(glyphs[usize::from(u) * 2 + usize::from(l)]);
            }
            line.push(BRAILLE_FULL);
            line
        };

        let mut lines = Vec::with_capacity(rows.len() / 3 * 2);
        for group in rows.chunks_exact(3) {
            lines.push(draw(&group[0], &group[1], &BRAILLE_EVEN));
            lines.push(draw(&group[1], &group[2], &BRAILLE_ODD));
        }
        Ok(lines.join("\n"))
    }

    /// Commit the falling shape into the table.
    ///
    /// Every cell is validated before any is written.
    fn lock(&mut self) -> Result<(), GridError> {
        let mut cells = Vec::new();
        for (i, j, kind) in occupied(&self.shape) {
            let (r, c) = cell_at(self.row, self.col, i, j).ok_or(GridError::OutOfBounds {
                row: self.row,
                col: self.col,
            })?;
            if self.table[r][c] != 0 {
                return Err(GridError::Overlap { row: r, col: c });
            }
            cells.push((r, c, kind));
        }
        for (r, c, kind) in cells {
            self.table[r][c] = kind;
        }
        Ok(())
    }

    /// Remove rows that are full right after locking; each removed row is
    /// replaced by an empty row at the top
    fn clear_full_rows(&mut self) -> usize {
        self.table.retain(|line| line.iter().any(|&kind| kind == 0));
        let cleared = ROWS - self.table.len();
        for _ in 0..cleared {
            self.table.insert(0, [0; COLS]);
        }
        self.lines_cleared += cleared;
        cleared
    }

    fn spawn(&mut self) {
        self.shape = random_shape(&mut self.rng);
        self.row = SPAWN_ROW;
        self.col = SPAWN_COL;
        if !self.fits(&self.shape, self.row, self.col) {
            tracing::debug!("Spawned shape has no room, board topped out");
            self.topped_out = true;
        }
    }
}

fn random_shape(rng: &mut StdRng) -> Shape {
    let template = SHAPES.choose(rng).copied().unwrap_or(SHAPES[0]);
    template.iter().map(|line| line.to_vec()).collect()
}
