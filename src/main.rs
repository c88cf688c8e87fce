use anyhow::{Context, Result};
use async_std::{io, task};
use config::Config;
use console::Console;
use deck::Deck;
use game::{Game, HANDOFF_CAPACITY};
use player::Player;
use rand::{rngs::StdRng, SeedableRng};
use std::{env, path::PathBuf};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

mod config;
mod console;
mod customer;
mod deck;
mod design;
mod dish;
mod event;
mod game;
mod handoff;
mod ingredient;
mod player;
mod service;
mod turn;

fn init_tracing(level: &str) -> Result<()> {
    let level: Level = level
        .parse()
        .with_context(|| format!("invalid log level `{}`", level))?;
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn main() -> Result<()> {
    let config_path = env::args_os().nth(1).map(PathBuf::from);
    let config = Config::load(config_path.as_deref()).context("loading configuration")?;
    init_tracing(&config.log_level)?;

    let catalog = ingredient::load_catalog(&config.catalog)
        .with_context(|| format!("loading ingredients from {}", config.catalog.display()))?;
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let ingredients = Deck::sample(&mut rng, &catalog, config.deck_size);
    let customers = customer::deck(&mut rng, &catalog, config.customer_deck_size);
    if ingredients.is_empty() {
        warn!("ingredient deck is empty, nothing can be drafted");
    }
    info!(
        ingredients = ingredients.len(),
        customers = customers.len(),
        "decks ready"
    );

    let (event_sender, events) = handoff::bounded(HANDOFF_CAPACITY);
    let (actions, action_receiver) = handoff::bounded(HANDOFF_CAPACITY);
    let mut game = Game::new(
        ingredients,
        customers,
        Player::new(),
        config.rules.clone(),
        event_sender,
        action_receiver,
    );

    task::block_on(async move {
        let engine = task::spawn(async move {
            let stopped = game.play().await;
            (game, stopped)
        });
        let console = Console::new(config.rules, io::BufReader::new(io::stdin()), io::stdout());
        console.run(events, actions).await?;

        let (game, stopped) = engine.await;
        if let Err(reason) = stopped {
            info!("game stopped: {}", reason);
        }
        println!();
        println!(
            "You played {} turns and earned ${}.",
            game.turns_played(),
            game.player.money
        );
        println!("Your Dishes:");
        for dish in &game.player.dishes {
            println!("- {}", dish);
        }
        Ok(())
    })
}
