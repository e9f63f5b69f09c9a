use rogue_battle::{
    Battle, BattleConfig, BattleEngineError, BattleOutcome, BattleRunner, Encounter, ScoringAI, SideId,
    TracingPresenter,
};
use std::env;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const DEFAULT_ENCOUNTER: &str = "data/encounters/gauntlet.ron";
const DEFAULT_CONFIG: &str = "data/battle_config.ron";

fn run(encounter_path: &str, config_path: &str) -> Result<BattleOutcome, BattleEngineError> {
    let config = BattleConfig::load(config_path)?;
    let encounter = Encounter::load(encounter_path)?;
    info!(encounter = %encounter.name, seed = config.seed, "starting battle");

    let battle = Battle::new(config, &encounter)?;
    let mut runner = BattleRunner::new(battle, ScoringAI::new(), ScoringAI::new(), TracingPresenter);
    let outcome = runner.run_to_completion()?;

    let battle = runner.battle();
    info!(turns = battle.turn(), draws = battle.rng_draws(), "battle finished");
    Ok(outcome)
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let encounter_path = args.first().map(String::as_str).unwrap_or(DEFAULT_ENCOUNTER);
    let config_path = args.get(1).map(String::as_str).unwrap_or(DEFAULT_CONFIG);

    match run(encounter_path, config_path) {
        Ok(outcome) => {
            let summary = match outcome {
                BattleOutcome::Victory(SideId::Player) => "The player won.".to_string(),
                BattleOutcome::Victory(SideId::Enemy) => "The player lost.".to_string(),
                BattleOutcome::Draw => "The battle ended in a draw.".to_string(),
                BattleOutcome::Fled(side) => format!("The {} side ran away.", side),
            };
            println!("{}", summary);
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(%err, "battle aborted");
            eprintln!("Error: {}", err);
            ExitCode::FAILURE
        }
    }
}
