//! Abalone hot-seat terminal game.

use std::io::{self, BufRead, Write};
use std::time::{SystemTime, UNIX_EPOCH};

use abalone_core::GameConfig;
use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod command;
mod session;

use command::{Command, HELP};
use session::Session;

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let config = load_config(
        std::env::var("ABALONE_BOARD_RADIUS").ok(),
        std::env::var("ABALONE_CAPTURES_TO_WIN").ok(),
    )?;

    info!(
        radius = config.board_radius,
        captures_to_win = config.captures_to_win,
        "Starting Abalone..."
    );

    let mut session = Session::new(config)?;
    println!("{}\n\n{}", HELP, session.render());

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    prompt(&mut stdout)?;

    for line in stdin.lock().lines() {
        let line = line.context("reading stdin")?;
        if line.trim().is_empty() {
            prompt(&mut stdout)?;
            continue;
        }

        match line.parse::<Command>() {
            Ok(Command::Quit) => break,
            Ok(command) => match session.handle(&command, now_millis()) {
                Ok(text) => println!("{}", text),
                Err(e) => {
                    warn!(%e, "command failed");
                    println!("error: {}", e);
                }
            },
            Err(e) => println!("error: {}", e),
        }
        prompt(&mut stdout)?;
    }

    info!("bye");
    Ok(())
}

/// Rule parameters with optional overrides from the environment
fn load_config(radius: Option<String>, captures: Option<String>) -> anyhow::Result<GameConfig> {
    let mut config = GameConfig::standard();
    if let Some(radius) = radius {
        config.board_radius = radius
            .trim()
            .parse()
            .with_context(|| format!("ABALONE_BOARD_RADIUS is not a number: {radius}"))?;
    }
    if let Some(captures) = captures {
        config.captures_to_win = captures
            .trim()
            .parse()
            .with_context(|| format!("ABALONE_CAPTURES_TO_WIN is not a number: {captures}"))?;
    }
    config.validate()?;
    Ok(config)
}

fn prompt(out: &mut impl Write) -> io::Result<()> {
    write!(out, "> ")?;
    out.flush()
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
