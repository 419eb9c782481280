//! Merge-tile ("2048") game machine

use super::{with_board, LOBBY_REPLIES, QUIT_ALIASES};
use crate::dialog::{
    Behavior, Collation, DialogError, Handler, HandlerTable, Machine, MatchSpec, Outcome,
    Response, Utterance,
};
use crate::games::{MergeTiles, Slide, TILE_GLYPHS};
use rand::rngs::StdRng;
use std::sync::OnceLock;

const REPLIES: [&str; 5] = ["Вверх", "Вниз", "Влево", "Вправо", "Хватит"];

const HINT: &str = "Скажите, куда сдвинуть плитки: «вверх», «вниз», «влево» или «вправо».";

pub struct TilesGame {
    engine: MergeTiles,
}

impl TilesGame {
    pub fn new(rng: StdRng) -> Self {
        Self {
            engine: MergeTiles::new(rng),
        }
    }

    pub fn intro(&self) -> Response {
        self.reply(&format!("Игра 2048! Соединяйте одинаковые плитки. {HINT}"))
    }

    fn reply(&self, phrase: &str) -> Response {
        let board = self.engine.render(&TILE_GLYPHS);
        Response::new(with_board(phrase, &board)).with_replies(REPLIES)
    }

    fn game_over(&self, phrase: &str) -> Outcome {
        let board = self.engine.render(&TILE_GLYPHS);
        let phrase = format!("{phrase} Лучшая плитка: {}.", self.engine.best());
        Outcome::Finished(Response::new(with_board(&phrase, &board)).with_replies(LOBBY_REPLIES))
    }

    /// Final outcome if the board is already decided
    fn verdict(&self) -> Option<Outcome> {
        if self.engine.win() {
            Some(self.game_over("Победа! Вы собрали 2048."))
        } else if self.engine.loss() {
            Some(self.game_over("Ходов больше нет."))
        } else {
            None
        }
    }
}

fn play(m: &mut Machine<TilesGame>, slide: Slide) -> Result<Outcome, DialogError> {
    if let Some(outcome) = m.body.verdict() {
        return Ok(outcome);
    }
    m.body.engine.slide(slide);
    if let Some(outcome) = m.body.verdict() {
        tracing::debug!(best = m.body.engine.best(), "Tiles game decided");
        return Ok(outcome);
    }
    Ok(Outcome::Continue(m.body.reply(&format!(
        "Лучшая плитка: {}.",
        m.body.engine.best()
    ))))
}

fn quit(m: &mut Machine<TilesGame>, _u: &Utterance) -> Result<Outcome, DialogError> {
    Ok(m.body.game_over("Выходим из игры 2048."))
}

fn up(m: &mut Machine<TilesGame>, _u: &Utterance) -> Result<Outcome, DialogError> {
    play(m, Slide::Up)
}

fn down(m: &mut Machine<TilesGame>, _u: &Utterance) -> Result<Outcome, DialogError> {
    play(m, Slide::Down)
}

fn left(m: &mut Machine<TilesGame>, _u: &Utterance) -> Result<Outcome, DialogError> {
    play(m, Slide::Left)
}

fn right(m: &mut Machine<TilesGame>, _u: &Utterance) -> Result<Outcome, DialogError> {
    play(m, Slide::Right)
}

fn hint(m: &mut Machine<TilesGame>, _u: &Utterance) -> Result<Outcome, DialogError> {
    Ok(Outcome::Continue(m.body.reply(HINT)))
}

impl Behavior for TilesGame {
    type State = ();
    const KIND: &'static str = "tiles_game";

    fn table() -> &'static HandlerTable<Self> {
        static TABLE: OnceLock<HandlerTable<TilesGame>> = OnceLock::new();
        TABLE.get_or_init(|| {
            HandlerTable::new(
                Collation::new(&[
                    ("хватит", QUIT_ALIASES),
                    ("вверх", &["верх", "наверх", "up"]),
                    ("вниз", &["низ", "ниже", "down"]),
                    ("влево", &["лево", "налево", "left"]),
                    ("вправо", &["право", "направо", "right"]),
                ]),
                vec![
                    Handler::new("quit", vec![MatchSpec::tokens(&["хватит"])], quit),
                    Handler::new("up", vec![MatchSpec::tokens(&["вверх"])], up),
                    Handler::new("down", vec![MatchSpec::tokens(&["вниз"])], down),
                    Handler::new("left", vec![MatchSpec::tokens(&["влево"])], left),
                    Handler::new("right", vec![MatchSpec::tokens(&["вправо"])], right),
                    Handler::new("hint", vec![MatchSpec::Any], hint),
                ],
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialog::Dispatch;
    use rand::SeedableRng;

    fn game_with(grid: [[u8; 4]; 4]) -> Machine<TilesGame> {
        Machine::new(TilesGame {
            engine: MergeTiles::from_grid(grid, StdRng::seed_from_u64(3)),
        })
    }

    fn say(machine: &mut Machine<TilesGame>, text: &str) -> Outcome {
        machine.parse(&Utterance::from_text(text)).unwrap()
    }

    #[test]
    fn test_intro_shows_grid() {
        let game = TilesGame::new(StdRng::seed_from_u64(1));
        let intro = game.intro();
        assert_eq!(intro.display_text().lines().count(), 1 + 4);
        assert!(intro.spoken().starts_with("Игра 2048!"));
    }

    #[test]
    fn test_slide_reports_best_tile() {
        let mut game = game_with([[1, 1, 0, 0], [0; 4], [0; 4], [0; 4]]);
        let outcome = say(&mut game, "влево");
        assert!(!outcome.is_finished());
        assert!(outcome.response().spoken().starts_with("Лучшая плитка: 4."));
    }

    #[test]
    fn test_reaching_2048_wins() {
        let mut game = game_with([[0; 4], [0, 0, 10, 10], [0; 4], [0; 4]]);
        let outcome = say(&mut game, "направо");
        assert!(outcome.is_finished());
        let spoken = outcome.response().spoken();
        assert!(spoken.starts_with("Победа!"));
        assert!(spoken.contains("Лучшая плитка: 2048."));
        assert_eq!(outcome.response().suggested_replies, LOBBY_REPLIES);
    }

    #[test]
    fn test_stuck_board_loses() {
        let stuck = [[1, 2, 1, 2], [2, 1, 2, 1], [1, 2, 1, 2], [2, 1, 2, 1]];
        let mut game = game_with(stuck);
        let outcome = say(&mut game, "вверх");
        assert!(outcome.is_finished());
        assert!(outcome.response().spoken().starts_with("Ходов больше нет."));
    }

    #[test]
    fn test_hint_and_quit() {
        let mut game = game_with([[1, 0, 0, 0], [0; 4], [0; 4], [0; 4]]);
        let outcome = say(&mut game, "что делать");
        assert!(!outcome.is_finished());
        assert!(outcome.response().spoken().starts_with(HINT));

        let outcome = say(&mut game, "хватит");
        assert!(outcome.is_finished());
        assert!(outcome.response().spoken().contains("Лучшая плитка: 2."));
    }
}
