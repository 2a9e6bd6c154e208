//! Grid Duel
//!
//! Play fruit duel or tic-tac-toe against the computer, in the terminal or
//! in a window.

use std::io;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use grid_duel::config::Frontend;
use grid_duel::console::{ConsoleInput, ConsoleRenderer};
use grid_duel::ui::{GameState, GridDuelApp};
use grid_duel::{Cli, GameConfig, GameSession};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&cli.log_level)),
        )
        .with_writer(io::stderr)
        .init();

    let config = GameConfig::from_cli(&cli).context("invalid game configuration")?;
    info!(?config, frontend = ?cli.frontend, "starting");

    match cli.frontend {
        Frontend::Console => run_console(config),
        Frontend::Gui => run_gui(config),
    }
}

fn run_console(config: GameConfig) -> Result<()> {
    let mut session = GameSession::new(config)?;
    let stdin = io::stdin();
    let mut input = ConsoleInput::new(stdin.lock(), io::stdout());
    let mut renderer = ConsoleRenderer::new(io::stdout());
    session.run(&mut input, &mut renderer)?;
    Ok(())
}

fn run_gui(config: GameConfig) -> Result<()> {
    let state = GameState::new(config)?;
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1000.0, 750.0])
            .with_min_inner_size([800.0, 600.0])
            .with_title("Grid Duel"),
        ..Default::default()
    };

    eframe::run_native(
        "Grid Duel",
        options,
        Box::new(move |cc| Ok(Box::new(GridDuelApp::new(cc, state)))),
    )
    .map_err(|err| anyhow!("window closed with an error: {err}"))
}
