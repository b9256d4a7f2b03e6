use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::{error, info};

use position_editor::cli::command_loop::run_stdio_loop;
use position_editor::editor::board_widget::{Orientation, TextBoard};
use position_editor::editor::editor_config::EditorConfig;
use position_editor::editor::session::SessionState;
use position_editor::rules_engine::bitboard_rules::BitboardRules;

#[derive(Parser, Debug)]
#[command(author, version, about = "Chess position editor", long_about = None)]
struct Args {
    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Starting position instead of the standard one
    #[arg(long)]
    fen: Option<String>,

    /// Show the board from black's side
    #[arg(long)]
    flipped: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let log_level = if args.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(
        env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, log_level),
    )
    .format(|buf, record| writeln!(buf, "[{}] {}: {}", record.level(), record.target(), record.args()))
    .write_style(env_logger::WriteStyle::Never)
    .init();

    let mut config = match &args.config {
        Some(path) => match EditorConfig::load(path) {
            Ok(config) => config,
            Err(err) => {
                error!("{}: {err}", path.display());
                return ExitCode::FAILURE;
            }
        },
        None => EditorConfig::default(),
    };
    if args.flipped {
        config.board.orientation = Orientation::Black;
    }

    let widget = TextBoard::new(config.board.clone());
    let mut session = SessionState::new(BitboardRules::new(), widget, config);

    if let Some(fen) = &args.fen {
        if let Err(err) = session.load_fen(fen) {
            error!("{err}");
            return ExitCode::FAILURE;
        }
    }

    info!("position editor ready; type 'help' for commands");
    match run_stdio_loop(&mut session) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("terminal I/O failed: {err}");
            ExitCode::FAILURE
        }
    }
}
