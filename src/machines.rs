//! Concrete machines: the lobby every session starts in, and one machine
//! per grid game

#![allow(clippy::unnecessary_wraps)] // Handler actions share one signature

mod blocks_game;
mod lobby;
mod snake_game;
mod tiles_game;

pub use blocks_game::BlocksGame;
use lobby::Lobby;
pub use snake_game::SnakeGame;
pub use tiles_game::TilesGame;

use crate::dialog::{Dispatch, Machine};
use rand::rngs::StdRng;

/// Suggested replies offered whenever the lobby is active
pub const LOBBY_REPLIES: [&str; 4] = ["Тетрис", "Змейка", "2048", "Помощь"];

/// Words that end any game
pub const QUIT_ALIASES: &[&str] = &[
    "выход", "пока", "стоп", "закончить", "выйти", "выйди", "exit", "quit",
];

/// Session root factory for the directory
pub fn root(rng: StdRng) -> Box<dyn Dispatch> {
    Box::new(Machine::new(Lobby::new(rng)))
}

/// A phrase that is both shown and spoken, followed by a board that is only
/// shown
fn with_board(phrase: &str, board: &str) -> String {
    format!("{phrase}{{\n{board}}}{{}}")
}
