//! Property-based tests for the grid engines under random play

use super::falling_blocks::{COLS, ROWS};
use super::snake::{Cell, Direction, SIZE};
use super::*;
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashSet;

// ============================================================================
// Test Helpers
// ============================================================================

#[derive(Debug, Clone, Copy)]
enum BlockOp {
    Left,
    Right,
    Rotate,
    Step,
    Drop,
}

fn arb_block_op() -> impl Strategy<Value = BlockOp> {
    prop_oneof![
        3 => Just(BlockOp::Left),
        3 => Just(BlockOp::Right),
        3 => Just(BlockOp::Rotate),
        4 => Just(BlockOp::Step),
        1 => Just(BlockOp::Drop),
    ]
}

fn arb_direction() -> impl Strategy<Value = Direction> {
    prop_oneof![
        Just(Direction::Up),
        Just(Direction::Down),
        Just(Direction::Left),
        Just(Direction::Right),
    ]
}

fn in_field(cell: Cell) -> bool {
    (1..SIZE - 1).contains(&cell.row) && (1..SIZE - 1).contains(&cell.col)
}

// ============================================================================
// Falling blocks
// ============================================================================

proptest! {
    #[test]
    fn prop_falling_blocks_board_stays_consistent(
        seed in any::<u64>(),
        ops in proptest::collection::vec(arb_block_op(), 0..300),
    ) {
        let mut engine = FallingBlocks::new(StdRng::seed_from_u64(seed));
        let mut lines = 0;

        for op in ops {
            match op {
                BlockOp::Left => engine.left(),
                BlockOp::Right => engine.right(),
                BlockOp::Rotate => engine.rotate(),
                BlockOp::Step => {
                    prop_assert!(engine.step().is_ok(), "step after {:?}", op);
                }
                BlockOp::Drop => {
                    prop_assert!(engine.multistep().is_ok(), "drop after {:?}", op);
                }
            }

            let board = engine.board();
            prop_assert!(board.is_ok(), "{:?}", board);
            prop_assert_eq!(board.map(|rows| rows.len()), Ok(ROWS));
            prop_assert_eq!(engine.table().len(), ROWS);
            // Full rows never survive a lock
            prop_assert!(engine
                .table()
                .iter()
                .all(|row| row.iter().any(|&kind| kind == 0)));
            prop_assert!(engine.lines_cleared() >= lines);
            lines = engine.lines_cleared();
        }

        let text = engine.render(&TWO_TONE);
        prop_assert!(text.is_ok());
        let braille = engine.braille();
        prop_assert!(braille.is_ok());
        let width = COLS + 2;
        prop_assert!(braille
            .iter()
            .flat_map(|text| text.lines())
            .all(|line| line.chars().count() == width));
    }
}

// ============================================================================
// Snake
// ============================================================================

proptest! {
    #[test]
    fn prop_snake_body_is_inside_and_distinct(
        seed in any::<u64>(),
        directions in proptest::collection::vec(arb_direction(), 0..200),
    ) {
        let mut snake = Snake::new(StdRng::seed_from_u64(seed));

        for direction in directions {
            let before = snake.len();
            let was_lost = snake.loss();
            let head = snake.head();

            let result = snake.step(direction);

            match result {
                Move::Ate => prop_assert_eq!(snake.len(), before + 1),
                Move::Slid | Move::Crashed | Move::Ignored => prop_assert_eq!(snake.len(), before),
            }
            prop_assert_eq!(result == Move::Ignored, was_lost);
            if matches!(result, Move::Crashed | Move::Ignored) {
                prop_assert_eq!(snake.head(), head);
                prop_assert!(snake.loss());
            }

            let body = snake.body();
            prop_assert!(body.iter().all(|&cell| in_field(cell)), "{:?}", body);
            let distinct: HashSet<Cell> = body.iter().copied().collect();
            prop_assert_eq!(distinct.len(), body.len());
            prop_assert_eq!(snake.head(), body.front().copied());

            let food = snake.food();
            prop_assert!(food == Cell::NOWHERE || (in_field(food) && !distinct.contains(&food)));
        }
    }
}
