mod food;
mod game;
mod position;
mod scheduler;
mod scoreboard;
mod snake;
mod surface;
mod term;

use std::fs::File;
use std::process::exit;

use anyhow::{anyhow, Context, Result};
use log::{error, info, LevelFilter};
use rand::{rngs::StdRng, SeedableRng};
use simplelog::{Config, WriteLogger};

use crate::game::SnakeGame;
use crate::term::TermManager;

// The terminal belongs to the game, so logs go to a file
const LOG_FILE: &str = "snake.log";

fn main() {
    if let Err(e) = init_logging() {
        eprintln!("{:#}", e);
        exit(1);
    }

    info!("Starting snake");

    if let Err(e) = run() {
        error!("{:#}", e);
        eprintln!("{:#}", e);
        exit(1);
    }

    info!("Bye");
}

fn init_logging() -> Result<()> {
    let file = File::create(LOG_FILE).with_context(|| format!("Error creating {}", LOG_FILE))?;
    WriteLogger::init(LevelFilter::Info, Config::default(), file)
        .map_err(|e| anyhow!("Error setting up logger: {}", e))
}

fn run() -> Result<()> {
    let mut term = TermManager::new()?;
    if let Err(e) = term.setup() {
        let _ = term.restore();
        return Err(e);
    }

    let mut game = SnakeGame::new(term, StdRng::from_entropy());
    let result = game.play();

    // Restore the terminal even when the game failed
    game.into_surface().restore()?;
    result
}
