use figment::providers::Serialized;
use mnk_agent::{
    config::{figment, CONFIG_FILE},
    trainer::{TrainOptions, Trainer},
};
use std::error::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_GAMES: usize = 1000;

fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = figment(CONFIG_FILE).join(Serialized::default("games", DEFAULT_GAMES));
    let games: usize = config.extract_inner("games")?;
    let options: TrainOptions = config.extract()?;

    info!(games, opponent = ?options.opponent, game = ?options.game, "training");

    let mut trainer = Trainer::new(options)?;
    let results = trainer.train(games)?;
    let evaluation = trainer.evaluate_many(trainer.options().eval_games)?;

    info!(
        wins = results.wins,
        losses = results.losses,
        draws = results.draws,
        td_error = trainer.recent_td_error(),
        "training finished"
    );
    info!(
        wins = evaluation.wins,
        losses = evaluation.losses,
        draws = evaluation.draws,
        "final evaluation against random agent"
    );

    let theta = trainer.theta();
    let theta = theta.borrow();
    for (name, weight) in trainer.weight_names()?.iter().zip(theta.iter()) {
        info!(name = name.as_str(), weight, "weight");
    }

    // ready to paste back into the `agent` table
    let weights = theta.iter().map(f64::to_string).collect::<Vec<_>>();
    println!("theta = [{}]", weights.join(", "));

    Ok(())
}
