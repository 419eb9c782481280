//! Falling-block game machine

use super::{with_board, LOBBY_REPLIES, QUIT_ALIASES};
use crate::dialog::{
    Behavior, Collation, DialogError, Handler, HandlerTable, Machine, MatchSpec, Outcome,
    Response, Utterance,
};
use crate::games::{FallingBlocks, GridError, Tick, COLORFUL, TWO_TONE};
use rand::rngs::StdRng;
use std::sync::OnceLock;

const REPLIES: [&str; 5] = ["Влево", "Вправо", "Поворот", "Сброс", "Хватит"];

type Move = fn(&mut FallingBlocks) -> Result<usize, GridError>;

/// How the board is drawn; cycles on request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Look {
    Colorful,
    TwoTone,
    Braille,
}

impl Look {
    fn next(self) -> Self {
        match self {
            Look::Colorful => Look::TwoTone,
            Look::TwoTone => Look::Braille,
            Look::Braille => Look::Colorful,
        }
    }
}

pub struct BlocksGame {
    engine: FallingBlocks,
    look: Look,
}

impl BlocksGame {
    pub fn new(rng: StdRng) -> Self {
        Self {
            engine: FallingBlocks::new(rng),
            look: Look::Colorful,
        }
    }

    fn board(&self) -> Result<String, GridError> {
        match self.look {
            Look::Colorful => self.engine.render(&COLORFUL),
            Look::TwoTone => self.engine.render(&TWO_TONE),
            Look::Braille => self.engine.braille(),
        }
    }

    pub fn intro(&self) -> Result<Response, DialogError> {
        self.reply(
            "Тетрис! Говорите «влево», «вправо», «поворот», «вниз» или «сброс». \
             Любая другая фраза просто опускает фигуру.",
        )
    }

    fn reply(&self, phrase: &str) -> Result<Response, DialogError> {
        let board = self.board()?;
        Ok(Response::new(with_board(phrase, &board)).with_replies(REPLIES))
    }

    fn game_over(&self, phrase: &str) -> Result<Outcome, DialogError> {
        let board = self.board()?;
        let phrase = format!("{phrase} Собрано линий: {}.", self.engine.lines_cleared());
        Ok(Outcome::Finished(
            Response::new(with_board(&phrase, &board)).with_replies(LOBBY_REPLIES),
        ))
    }
}

/// One gravity step; returns rows cleared if the shape locked
fn gravity(engine: &mut FallingBlocks) -> Result<usize, GridError> {
    Ok(match engine.step()? {
        Tick::Fell => 0,
        Tick::Locked { cleared } => cleared,
    })
}

fn play(m: &mut Machine<BlocksGame>, phrase: &str, apply: Move) -> Result<Outcome, DialogError> {
    if m.body.engine.loss() {
        return m.body.game_over("Игра уже окончена.");
    }
    let cleared = apply(&mut m.body.engine)?;
    if m.body.engine.loss() {
        tracing::debug!(lines = m.body.engine.lines_cleared(), "Blocks game lost");
        return m.body.game_over("Игра окончена!");
    }
    let phrase = match cleared {
        0 => phrase.to_string(),
        n => format!("{phrase} Убрано линий: {n}!"),
    };
    Ok(Outcome::Continue(m.body.reply(&phrase)?))
}

fn quit(m: &mut Machine<BlocksGame>, _u: &Utterance) -> Result<Outcome, DialogError> {
    m.body.game_over("Выходим из тетриса.")
}

fn toggle_glyphs(m: &mut Machine<BlocksGame>, _u: &Utterance) -> Result<Outcome, DialogError> {
    m.body.look = m.body.look.next();
    Ok(Outcome::Continue(m.body.reply("Сменила символы.")?))
}

fn left(m: &mut Machine<BlocksGame>, _u: &Utterance) -> Result<Outcome, DialogError> {
    play(m, "Влево.", |engine| {
        engine.left();
        gravity(engine)
    })
}

fn right(m: &mut Machine<BlocksGame>, _u: &Utterance) -> Result<Outcome, DialogError> {
    play(m, "Вправо.", |engine| {
        engine.right();
        gravity(engine)
    })
}

fn rotate(m: &mut Machine<BlocksGame>, _u: &Utterance) -> Result<Outcome, DialogError> {
    play(m, "Поворот.", |engine| {
        engine.rotate();
        gravity(engine)
    })
}

fn hard_drop(m: &mut Machine<BlocksGame>, _u: &Utterance) -> Result<Outcome, DialogError> {
    play(m, "Сброс.", FallingBlocks::multistep)
}

fn down(m: &mut Machine<BlocksGame>, _u: &Utterance) -> Result<Outcome, DialogError> {
    play(m, "Вниз.", gravity)
}

fn tick(m: &mut Machine<BlocksGame>, _u: &Utterance) -> Result<Outcome, DialogError> {
    play(m, "Фигура опустилась.", gravity)
}

impl Behavior for BlocksGame {
    type State = ();
    const KIND: &'static str = "blocks_game";

    fn table() -> &'static HandlerTable<Self> {
        static TABLE: OnceLock<HandlerTable<BlocksGame>> = OnceLock::new();
        TABLE.get_or_init(|| {
            HandlerTable::new(
                Collation::new(&[
                    ("хватит", QUIT_ALIASES),
                    ("влево", &["лево", "налево", "left"]),
                    ("вправо", &["право", "направо", "right"]),
                    ("поворот", &["повернуть", "поверни", "крути", "вращай", "rotate"]),
                    ("сброс", &["сбрось", "бросай", "урони", "drop"]),
                    ("вниз", &["ниже", "down"]),
                    ("символы", &["цвет", "цвета", "режим"]),
                ]),
                vec![
                    Handler::new("quit", vec![MatchSpec::tokens(&["хватит"])], quit),
                    Handler::new("glyphs", vec![MatchSpec::tokens(&["символы"])], toggle_glyphs),
                    Handler::new("left", vec![MatchSpec::tokens(&["влево"])], left),
                    Handler::new("right", vec![MatchSpec::tokens(&["вправо"])], right),
                    Handler::new("rotate", vec![MatchSpec::tokens(&["поворот"])], rotate),
                    Handler::new("drop", vec![MatchSpec::tokens(&["сброс"])], hard_drop),
                    Handler::new("down", vec![MatchSpec::tokens(&["вниз"])], down),
                    Handler::new("tick", vec![MatchSpec::Any], tick),
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

    fn game(seed: u64) -> Machine<BlocksGame> {
        Machine::new(BlocksGame::new(StdRng::seed_from_u64(seed)))
    }

    fn say(machine: &mut Machine<BlocksGame>, text: &str) -> Outcome {
        machine.parse(&Utterance::from_text(text)).unwrap()
    }

    #[test]
    fn test_intro_shows_bordered_board() {
        let game = game(1);
        let intro = game.body.intro().unwrap();
        let display = intro.display_text();
        // Phrase line plus 22 rows and two border rows
        assert_eq!(display.lines().count(), 1 + 24);
        assert!(intro.spoken().starts_with("Тетрис!"));
        assert!(!intro.spoken().contains('⬛'));
        assert_eq!(intro.suggested_replies, REPLIES);
    }

    #[test]
    fn test_unknown_phrase_ticks() {
        let mut game = game(2);
        assert_eq!(game.body.engine.position().0, 0);
        let outcome = say(&mut game, "что это");
        assert!(!outcome.is_finished());
        assert_eq!(game.body.engine.position().0, 1);
    }

    #[test]
    fn test_lateral_move_also_falls() {
        let mut game = game(3);
        let (row, col) = game.body.engine.position();
        say(&mut game, "налево");
        assert_eq!(game.body.engine.position(), (row + 1, col - 1));
    }

    #[test]
    fn test_drop_locks_shape() {
        let mut game = game(4);
        say(&mut game, "сбрось");
        assert!(game.body.engine.table().iter().flatten().any(|&kind| kind != 0));
        assert_eq!(game.body.engine.position().0, 0);
    }

    #[test]
    fn test_glyph_toggle_cycles_looks() {
        let mut game = game(5);
        say(&mut game, "сброс");
        let outcome = say(&mut game, "сменить цвет");
        let display = outcome.response().display_text();
        assert!(display.contains('⬛'));
        for colored in ['🟥', '🟧', '🟨', '🟩', '🟦', '🟪', '🟫'] {
            assert!(!display.contains(colored));
        }
        assert_eq!(game.body.look, Look::TwoTone);

        let outcome = say(&mut game, "режим");
        assert_eq!(game.body.look, Look::Braille);
        let display = outcome.response().display_text();
        // Phrase line plus 16 braille lines
        assert_eq!(display.lines().count(), 1 + 16);
        assert!(display.contains('⠿'));
        assert!(!display.contains('⬛'));
        assert!(!outcome.response().spoken().contains('⠿'));

        say(&mut game, "символы");
        assert_eq!(game.body.look, Look::Colorful);
    }

    #[test]
    fn test_any_quit_alias_ends_game() {
        for alias in ["выход", "пока", "стоп"] {
            let mut game = game(8);
            let outcome = say(&mut game, alias);
            assert!(outcome.is_finished(), "{alias}");
            assert!(outcome.response().spoken().starts_with("Выходим из тетриса."));
        }
    }

    #[test]
    fn test_quit_reports_score() {
        let mut game = game(6);
        let outcome = say(&mut game, "хватит");
        assert!(outcome.is_finished());
        assert!(outcome.response().spoken().contains("Собрано линий: 0."));
        assert_eq!(outcome.response().suggested_replies, LOBBY_REPLIES);
    }

    #[test]
    fn test_stacking_ends_in_loss_then_refuses_moves() {
        let mut game = game(7);
        let mut drops = 0;
        let outcome = loop {
            let outcome = say(&mut game, "сброс");
            drops += 1;
            if outcome.is_finished() || drops > 100 {
                break outcome;
            }
        };
        assert!(outcome.is_finished());
        assert!(outcome.response().spoken().contains("Игра окончена!"));

        let table = game.body.engine.table().to_vec();
        let again = say(&mut game, "влево");
        assert!(again.is_finished());
        assert!(again.response().spoken().contains("уже окончена"));
        assert_eq!(game.body.engine.table(), &table[..]);
    }
}
