//! Snake game machine

use super::{with_board, LOBBY_REPLIES, QUIT_ALIASES};
use crate::dialog::{
    Behavior, Collation, DialogError, Handler, HandlerTable, Machine, MatchSpec, Outcome,
    Response, Utterance,
};
use crate::games::{Move, Snake, SNAKE_GLYPHS};
use rand::rngs::StdRng;
use std::sync::OnceLock;

const REPLIES: [&str; 5] = ["Вверх", "Вниз", "Влево", "Вправо", "Хватит"];

const HINT: &str = "Скажите «вверх», «вниз», «влево» или «вправо».";

pub struct SnakeGame {
    engine: Snake,
}

impl SnakeGame {
    pub fn new(rng: StdRng) -> Self {
        Self {
            engine: Snake::new(rng),
        }
    }

    pub fn intro(&self) -> Response {
        self.reply(&format!("Змейка! Собирайте жёлтую еду и не врезайтесь в стены. {HINT}"))
    }

    fn reply(&self, phrase: &str) -> Response {
        let board = self.engine.render(&SNAKE_GLYPHS);
        Response::new(with_board(phrase, &board)).with_replies(REPLIES)
    }

    fn game_over(&self, phrase: &str) -> Outcome {
        let board = self.engine.render(&SNAKE_GLYPHS);
        let phrase = format!("{phrase} Длина змейки: {}.", self.engine.len());
        Outcome::Finished(Response::new(with_board(&phrase, &board)).with_replies(LOBBY_REPLIES))
    }
}

fn play(m: &mut Machine<SnakeGame>, step: fn(&mut Snake) -> Move) -> Result<Outcome, DialogError> {
    if m.body.engine.loss() {
        return Ok(m.body.game_over("Игра уже окончена."));
    }
    let outcome = match step(&mut m.body.engine) {
        Move::Crashed => {
            tracing::debug!(length = m.body.engine.len(), "Snake crashed");
            m.body.game_over("Бам! Змейка врезалась.")
        }
        Move::Ate => Outcome::Continue(
            m.body
                .reply(&format!("Ням! Длина змейки: {}.", m.body.engine.len())),
        ),
        Move::Slid | Move::Ignored => Outcome::Continue(m.body.reply("Ползём.")),
    };
    Ok(outcome)
}

fn quit(m: &mut Machine<SnakeGame>, _u: &Utterance) -> Result<Outcome, DialogError> {
    Ok(m.body.game_over("Выходим из змейки."))
}

fn up(m: &mut Machine<SnakeGame>, _u: &Utterance) -> Result<Outcome, DialogError> {
    play(m, Snake::up)
}

fn down(m: &mut Machine<SnakeGame>, _u: &Utterance) -> Result<Outcome, DialogError> {
    play(m, Snake::down)
}

fn left(m: &mut Machine<SnakeGame>, _u: &Utterance) -> Result<Outcome, DialogError> {
    play(m, Snake::left)
}

fn right(m: &mut Machine<SnakeGame>, _u: &Utterance) -> Result<Outcome, DialogError> {
    play(m, Snake::right)
}

fn hint(m: &mut Machine<SnakeGame>, _u: &Utterance) -> Result<Outcome, DialogError> {
    Ok(Outcome::Continue(m.body.reply(HINT)))
}

impl Behavior for SnakeGame {
    type State = ();
    const KIND: &'static str = "snake_game";

    fn table() -> &'static HandlerTable<Self> {
        static TABLE: OnceLock<HandlerTable<SnakeGame>> = OnceLock::new();
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
