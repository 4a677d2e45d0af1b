mod config;
mod input;
mod renderer;

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use common::games::SessionRng;
use common::logger::{self, LogLevel};
use common::{
    FileHighScoreStore, GameMode, GameSession, HighScoreStore, SessionCommand, SnakeSession, log,
    log_warn,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::LinesStream;

use config::get_config_manager;
use renderer::TerminalBroadcaster;

const RUNTIME_SHUTDOWN_TIMEOUT: Duration = Duration::from_millis(200);

#[derive(Parser)]
#[command(name = "snake_arcade", about = "Grid snake arcade with a pathfinding AI opponent")]
struct Args {
    /// YAML config file. Defaults to snake_arcade_config.yaml next to the executable.
    #[arg(long)]
    config: Option<String>,

    /// human, ai or vs. Overrides the configured default.
    #[arg(long)]
    mode: Option<GameMode>,

    /// Seed for food and power-up placement.
    #[arg(long)]
    seed: Option<u64>,

    /// Start a round immediately instead of waiting for input.
    #[arg(long)]
    autostart: bool,

    #[arg(long)]
    no_render: bool,

    #[arg(long)]
    use_log_prefix: bool,

    #[arg(long)]
    debug: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let prefix = if args.use_log_prefix {
        Some("SnakeArcade".to_string())
    } else {
        None
    };
    let min_level = if args.debug {
        LogLevel::Debug
    } else {
        LogLevel::Info
    };
    logger::init_logger(prefix, min_level);

    let runtime = tokio::runtime::Runtime::new()?;
    let result = runtime.block_on(run(args));
    // Stdin is read on a blocking thread that never returns on its own.
    runtime.shutdown_timeout(RUNTIME_SHUTDOWN_TIMEOUT);
    result
}

async fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = get_config_manager(args.config.as_deref()).get_config()?;
    let mode = args.mode.unwrap_or(config.default_mode);

    let store = Arc::new(FileHighScoreStore::new(&config.high_score_file));
    let high_score = match store.load() {
        Ok(value) => value,
        Err(e) => {
            log_warn!("Could not load high score, starting from 0: {}", e);
            0
        }
    };

    let rng = args.seed.map(SessionRng::new).unwrap_or_else(SessionRng::from_random);
    let seed = rng.seed();
    let game = GameSession::new(config.game, mode, rng, high_score)?;
    log!(
        "Snake arcade ready: {}x{} tiles, mode {}, high score {}, seed {}",
        game.grid().tile_count(),
        game.grid().tile_count(),
        mode,
        high_score,
        seed
    );

    let mut display = config.display.clone();
    if args.no_render {
        display.render = false;
    }
    let broadcaster = TerminalBroadcaster::new(display);

    let (command_tx, command_rx) = mpsc::unbounded_channel();
    let session = tokio::spawn(SnakeSession::run(game, command_rx, broadcaster, store));

    if args.autostart {
        command_tx.send(SessionCommand::Start)?;
    }

    eprintln!("{}", input::HELP);
    tokio::spawn(read_commands(command_tx.clone()));

    let ctrl_c_tx = command_tx.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log!("Shutdown signal received");
            let _ = ctrl_c_tx.send(SessionCommand::Shutdown);
        }
    });
    drop(command_tx);

    let game = session.await?;
    log!("Session closed, high score {}", game.high_score());
    Ok(())
}

/// Forwards parsed stdin lines to the session. End of input quits.
async fn read_commands(commands: mpsc::UnboundedSender<SessionCommand>) {
    let mut lines = LinesStream::new(BufReader::new(tokio::io::stdin()).lines());

    while let Some(line) = lines.next().await {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                log_warn!("Failed to read input: {}", e);
                break;
            }
        };

        match input::parse_command(&line) {
            Ok(command) => {
                if commands.send(command).is_err() || command == SessionCommand::Shutdown {
                    return;
                }
            }
            Err(e) => eprintln!("{}. {}", e, input::HELP),
        }
    }

    let _ = commands.send(SessionCommand::Shutdown);
}
