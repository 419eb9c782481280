//! Growing-snake engine
//!
//! A 10×10 field walled on every side. The body is stored head first.

use super::GlyphTable;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::collections::{HashSet, VecDeque};

pub const SIZE: i32 = 10;

pub const GLYPHS: GlyphTable = GlyphTable::new(&["⬜", "⬛", "🟩", "🟨", "🟥"]);

const EMPTY: u8 = 0;
const WALL: u8 = 1;
const BODY: u8 = 2;
const FOOD: u8 = 3;
const CRASH: u8 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    pub row: i32,
    pub col: i32,
}

impl Cell {
    /// Returned when no free cell is left
    pub const NOWHERE: Cell = Cell { row: -5, col: -5 };

    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    fn neighbour(self, direction: Direction) -> Self {
        match direction {
            Direction::Up => Cell::new(self.row - 1, self.col),
            Direction::Down => Cell::new(self.row + 1, self.col),
            Direction::Left => Cell::new(self.row, self.col - 1),
            Direction::Right => Cell::new(self.row, self.col + 1),
        }
    }

    fn index(self) -> Option<(usize, usize)> {
        let row = usize::try_from(self.row).ok()?;
        let col = usize::try_from(self.col).ok()?;
        let size = usize::try_from(SIZE).ok()?;
        (row < size && col < size).then_some((row, col))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// What a move did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Move {
    /// Head advanced, tail followed
    Slid,
    /// Head advanced onto food; the body grew
    Ate,
    /// Head hit a wall or the body
    Crashed,
    /// The game was already lost; nothing changed
    Ignored,
}

pub struct Snake {
    walls: HashSet<Cell>,
    body: VecDeque<Cell>,
    food: Cell,
    crashed: Option<Cell>,
    rng: StdRng,
}

impl Snake {
    pub fn new(rng: StdRng) -> Self {
        let walls = (0..SIZE)
            .flat_map(|i| {
                [
                    Cell::new(0, i),
                    Cell::new(SIZE - 1, i),
                    Cell::new(i, 0),
                    Cell::new(i, SIZE - 1),
                ]
            })
            .collect();
        let mut snake = Self {
            walls,
            body: VecDeque::new(),
            food: Cell::NOWHERE,
            crashed: None,
            rng,
        };
        let head = snake.random_free_cell();
        snake.body.push_back(head);
        snake.food = snake.random_free_cell();
        snake
    }

    /// A cell chosen uniformly among those that are neither wall nor body,
    /// or `Cell::NOWHERE` if there is none
    pub fn random_free_cell(&mut self) -> Cell {
        let free: Vec<Cell> = (0..SIZE)
            .flat_map(|row| (0..SIZE).map(move |col| Cell::new(row, col)))
            .filter(|cell| self.is_free(*cell))
            .collect();
        free.choose(&mut self.rng).copied().unwrap_or(Cell::NOWHERE)
    }

    fn is_free(&self, cell: Cell) -> bool {
        !self.walls.contains(&cell) && !self.body.contains(&cell)
    }

    pub fn step(&mut self, direction: Direction) -> Move {
        if self.crashed.is_some() {
            return Move::Ignored;
        }
        let Some(&head) = self.body.front() else {
            return Move::Ignored;
        };

        let candidate = head.neighbour(direction);
        if !self.is_free(candidate) {
            self.crashed = Some(candidate);
            return Move::Crashed;
        }

        self.body.push_front(candidate);
        if candidate == self.food {
            self.food = self.random_free_cell();
            Move::Ate
        } else {
            self.body.pop_back();
            Move::Slid
        }
    }

    pub fn up(&mut self) -> Move {
        self.step(Direction::Up)
    }

    pub fn down(&mut self) -> Move {
        self.step(Direction::Down)
    }

    pub fn left(&mut self) -> Move {
        self.step(Direction::Left)
    }

    pub fn right(&mut self) -> Move {
        self.step(Direction::Right)
    }

    pub fn loss(&self) -> bool {
        self.crashed.is_some()
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    #[allow(dead_code)] // Used by tests
    pub fn head(&self) -> Option<Cell> {
        self.body.front().copied()
    }

    #[allow(dead_code)] // Used by tests
    pub fn food(&self) -> Cell {
        self.food
    }

    /// Body cells, head first
    #[cfg(test)]
    pub fn body(&self) -> &VecDeque<Cell> {
        &self.body
    }

    /// Cell kinds: empty, wall, body, food, crash
    pub fn kinds(&self) -> Vec<Vec<u8>> {
        let size = usize::try_from(SIZE).unwrap_or(0);
        let mut grid = vec![vec![EMPTY; size]; size];
        let mut paint = |cell: Cell, kind: u8| {
            if let Some((r, c)) = cell.index() {
                grid[r][c] = kind;
            }
        };
        for &cell in &self.walls {
            paint(cell, WALL);
        }
        for &cell in &self.body {
            paint(cell, BODY);
        }
        paint(self.food, FOOD);
        if let Some(cell) = self.crashed {
            paint(cell, CRASH);
        }
        grid
    }

    pub fn render(&self, glyphs: &GlyphTable) -> String {
        glyphs.render(&self.kinds())
    }
}
