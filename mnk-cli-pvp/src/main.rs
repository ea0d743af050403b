mod console;

use console::{ConsoleHumanAgent, ConsoleView};
use mnk_agent::{
    agent::Agent,
    agents::linear_q::{initial_theta, LinearQProvider},
    config::{figment, AgentOptions, CONFIG_FILE},
    engine::Engine,
    turn_log::TurnLog,
};
use mnk_core::{config::GameConfig, game::GameResult};
use serde::Deserialize;
use std::{
    cell::RefCell,
    error::Error,
    io::{stdin, stdout},
    path::PathBuf,
    rc::Rc,
};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
enum Opponent {
    #[default]
    Human,
    Agent,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct PlayOptions {
    opponent: Opponent,
    /// The agent plays X when set.
    agent_first: bool,
    games: usize,
    log_file: Option<PathBuf>,
}

impl Default for PlayOptions {
    fn default() -> Self {
        Self {
            opponent: Opponent::default(),
            agent_first: true,
            games: 1,
            log_file: None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Settings {
    game: GameConfig,
    agent: AgentOptions,
    play: PlayOptions,
}

fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let settings: Settings = figment(CONFIG_FILE).extract()?;
    let mut turn_log = match &settings.play.log_file {
        Some(path) => Some(TurnLog::create(path)?),
        None => None,
    };

    let win_length = settings.game.win_length;
    let theta = initial_theta(&settings.agent, win_length)?;
    let provider = LinearQProvider::new(
        win_length,
        settings.agent.clone(),
        Rc::new(RefCell::new(theta)),
    );

    let input = Rc::new(RefCell::new(stdin().lock()));

    for game_no in 0..settings.play.games {
        let mut human = ConsoleHumanAgent::new(input.clone(), stdout());
        let mut second_human = ConsoleHumanAgent::new(input.clone(), stdout());
        let mut view = ConsoleView::new(stdout());
        let mut agent = match settings.play.opponent {
            Opponent::Agent => Some(provider.create(None)?),
            Opponent::Human => None,
        };

        let (first, second): (&mut dyn Agent, &mut dyn Agent) = match agent.as_mut() {
            Some(agent) if settings.play.agent_first => (agent, &mut human),
            Some(agent) => (&mut human, agent),
            None => (&mut human, &mut second_human),
        };

        let engine = Engine::new(settings.game.clone(), first, second)?.with_view(&mut view);
        let mut engine = match turn_log.as_mut() {
            Some(turn_log) => engine.with_turn_log(turn_log, game_no),
            None => engine,
        };

        let result = engine.start()?;
        println!(
            "game result: {}",
            match result {
                GameResult::Draw => "draw".to_owned(),
                GameResult::Win(winner) => format!("{} wins", winner.name()),
            }
        );
    }

    Ok(())
}
