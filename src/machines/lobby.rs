//! Session root: greets, lists the games and launches them

use super::{BlocksGame, SnakeGame, TilesGame, LOBBY_REPLIES};
use crate::dialog::{
    Behavior, Collation, DialogError, Handler, HandlerTable, Machine, MatchSpec, Outcome,
    Response, Utterance,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::OnceLock;

const WELCOME: &str = "Привет! Это игровой автомат. Во что сыграем: тетрис, змейка или 2048?";

const HELP: &str = "Я умею играть в тетрис, змейку и 2048. Назовите игру, чтобы начать. \
                    Во время игры скажите «хватит», чтобы вернуться сюда.";

const EASTER_EGG: &str = "{Soft Squad}{Софт Сквад} передаёт привет! Вездеход выехал на разведку.";

const GOODBYE: &str = "До встречи! Возвращайтесь поиграть.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LobbyState {
    /// Nothing said yet
    #[default]
    Fresh,
    Menu,
}

pub struct Lobby {
    rng: StdRng,
}

impl Lobby {
    pub fn new(rng: StdRng) -> Self {
        Self { rng }
    }

    /// Seed for a game, drawn from the session's own generator
    fn child_rng(&mut self) -> StdRng {
        StdRng::seed_from_u64(self.rng.gen())
    }
}

fn launch<G: Behavior>(
    m: &mut Machine<Lobby>,
    game: G,
    intro: Response,
) -> Result<Outcome, DialogError> {
    m.inhabit(Machine::new(game))?;
    m.state = LobbyState::Menu;
    tracing::info!(game = G::KIND, "Game started");
    Ok(Outcome::Continue(intro))
}

fn greet(m: &mut Machine<Lobby>, _u: &Utterance) -> Result<Outcome, DialogError> {
    m.state = LobbyState::Menu;
    Ok(Outcome::Continue(Response::new(WELCOME).with_replies(LOBBY_REPLIES)))
}

fn start_blocks(m: &mut Machine<Lobby>, _u: &Utterance) -> Result<Outcome, DialogError> {
    let game = BlocksGame::new(m.body.child_rng());
    let intro = game.intro()?;
    launch(m, game, intro)
}

fn start_snake(m: &mut Machine<Lobby>, _u: &Utterance) -> Result<Outcome, DialogError> {
    let game = SnakeGame::new(m.body.child_rng());
    let intro = game.intro();
    launch(m, game, intro)
}

fn start_tiles(m: &mut Machine<Lobby>, _u: &Utterance) -> Result<Outcome, DialogError> {
    let game = TilesGame::new(m.body.child_rng());
    let intro = game.intro();
    launch(m, game, intro)
}

fn help(m: &mut Machine<Lobby>, _u: &Utterance) -> Result<Outcome, DialogError> {
    m.state = LobbyState::Menu;
    Ok(Outcome::Continue(Response::new(HELP).with_replies(LOBBY_REPLIES)))
}

fn easter_egg(_m: &mut Machine<Lobby>, _u: &Utterance) -> Result<Outcome, DialogError> {
    Ok(Outcome::Continue(Response::new(EASTER_EGG).with_replies(LOBBY_REPLIES)))
}

fn goodbye(_m: &mut Machine<Lobby>, _u: &Utterance) -> Result<Outcome, DialogError> {
    Ok(Outcome::Finished(Response::new(GOODBYE)))
}

impl Behavior for Lobby {
    type State = LobbyState;
    const KIND: &'static str = "lobby";

    fn table() -> &'static HandlerTable<Self> {
        static TABLE: OnceLock<HandlerTable<Lobby>> = OnceLock::new();
        TABLE.get_or_init(|| {
            HandlerTable::new(
                Collation::new(&[
                    ("тетрис", &["tetris", "блоки", "кубики"]),
                    ("змейка", &["змейку", "змея", "змею", "snake"]),
                    ("2048", &["плитки", "плиточки"]),
                    ("помощь", &["помоги", "справка", "умеешь", "help"]),
                    ("soft", &["софт"]),
                    ("squad", &["сквад"]),
                    ("хватит", &["выход", "выйти", "пока", "стоп", "закончить"]),
                ]),
                vec![
                    Handler::new("greet", vec![MatchSpec::Any], greet).when(&[LobbyState::Fresh]),
                    Handler::new("blocks", vec![MatchSpec::tokens(&["тетрис"])], start_blocks),
                    Handler::new("snake", vec![MatchSpec::tokens(&["змейка"])], start_snake),
                    Handler::new("tiles", vec![MatchSpec::tokens(&["2048"])], start_tiles),
                    Handler::new("help", vec![MatchSpec::tokens(&["помощь"])], help),
                    Handler::new(
                        "easter_egg",
                        vec![MatchSpec::sequence(&["soft", "squad", "вездеход"])],
                        easter_egg,
                    ),
                    Handler::new("goodbye", vec![MatchSpec::tokens(&["хватит"])], goodbye)
                        .when(&[LobbyState::Menu]),
                ],
            )
        })
    }
}
