mod commands;
mod render;

use std::error::Error;
use std::str::FromStr;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use commands::{ConsoleCommand, parse_command};
use tictactoe_engine::config::{ConfigManager, EngineConfig, FileContentConfigProvider, Validate};
use tictactoe_engine::logger;
use tictactoe_engine::tictactoe::{Difficulty, GameHandle, GameMode, MoveOutcome, TicTacToeSession};
use tictactoe_engine::{SessionRng, log};

const CONFIG_FILE_NAME: &str = "tictactoe_config.yaml";

#[derive(Parser)]
#[command(name = "tictactoe_console")]
struct Args {
    /// human or computer
    #[arg(long)]
    mode: Option<String>,
    /// easy, medium or hard
    #[arg(long)]
    difficulty: Option<String>,
    #[arg(long, default_value = CONFIG_FILE_NAME)]
    config: String,
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long)]
    delay_ms: Option<u64>,
    #[arg(long)]
    use_log_prefix: bool,
    /// Write the resolved settings back to the config file
    #[arg(long)]
    save_config: bool,
}

fn resolve_config(args: &Args) -> Result<EngineConfig, Box<dyn Error>> {
    let manager: ConfigManager<FileContentConfigProvider, EngineConfig> =
        ConfigManager::from_yaml_file(&args.config);
    let config = apply_overrides(manager.get_config()?, args)?;

    if args.save_config {
        manager.set_config(&config)?;
    }
    Ok(config)
}

fn apply_overrides(mut config: EngineConfig, args: &Args) -> Result<EngineConfig, Box<dyn Error>> {
    if let Some(ref mode) = args.mode {
        config.mode = GameMode::from_str(mode)?;
    }
    if let Some(ref difficulty) = args.difficulty {
        config.difficulty = Difficulty::from_str(difficulty)?;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    if let Some(delay_ms) = args.delay_ms {
        config.computer_move_delay_ms = delay_ms;
    }

    config.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let config = resolve_config(&args)?;

    let prefix = if args.use_log_prefix {
        Some("Console".to_string())
    } else {
        None
    };
    logger::init_logger(prefix, config.log_level);

    let rng = SessionRng::from_optional_seed(config.seed);
    log!(
        "Starting {:?} game, difficulty {}, seed {}",
        config.mode, config.difficulty, rng.seed()
    );

    let (outcome_tx, mut outcome_rx) = mpsc::unbounded_channel();
    let session = TicTacToeSession::new(
        GameHandle::new(config.mode, Some(config.difficulty)),
        rng,
        config.computer_move_delay(),
        outcome_tx,
    );

    println!("{}", render::render_intro(config.mode, config.difficulty));
    println!("{}", render::render_outcome(&session.snapshot().await, config.mode));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut latest_generation = 0;

    loop {
        tokio::select! {
            Some(outcome) = outcome_rx.recv() => {
                if is_current(&outcome, &mut latest_generation) {
                    println!("{}", render::render_outcome(&outcome, config.mode));
                }
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };

                match parse_command(&line) {
                    ConsoleCommand::Place(index) => {
                        if let Err(e) = session.submit_move(index).await {
                            println!("{}", e);
                        }
                    }
                    ConsoleCommand::Reset => {
                        session.reset().await;
                    }
                    ConsoleCommand::Hint => {
                        println!("{}", render::render_evaluations(&session.move_evaluations().await));
                    }
                    ConsoleCommand::Quit => break,
                    ConsoleCommand::Unknown(text) => {
                        println!("Unknown command {:?}. {}", text, render::HELP);
                    }
                }
            }
        }
    }

    log!("Bye");
    Ok(())
}

/// Outcomes from a game that was already reset are not shown.
fn is_current(outcome: &MoveOutcome, latest_generation: &mut u64) -> bool {
    if outcome.generation < *latest_generation {
        return false;
    }
    *latest_generation = outcome.generation;
    true
}
