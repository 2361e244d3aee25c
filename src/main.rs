//! lfg-bot - A looking-for-group bot for gaming communities.
//!
//! # Overview
//!
//! Users subscribe to the games they play with a personal ntfy topic, and the
//! bot announces in a text channel whenever someone joins the LFG voice
//! channel.
//!
//! # Features
//!
//! - **Slash Commands**: `ping`, `help`, `roll`, `subscribe`, `unsubscribe`, `mygames`, `games`
//! - **Durable Subscriptions**: Stored as a JSON document, atomically rewritten on every change
//! - **LFG Announcements**: `@everyone` announcement when a user joins the LFG voice channel
//! - **YAML Configuration**: Simple configuration file format with environment variable support
//!
//! # Configuration
//!
//! ```yaml
//! bot:
//!   user_id: "1000"
//! lfg:
//!   channel_id: "C1"
//! ```
//!
//! Any value can be overridden with an `LFGBOT_` environment variable, see
//! [`config`].
//!
//! # Usage
//!
//! ```bash
//! lfg-bot --config config.yaml --data ./lfg-data
//! ```
//!
//! Events are then read from stdin, one per line:
//!
//! ```text
//! /subscribe valorant alice_topic
//! {"type":"voice","user_id":"1001","before":null,"after":"C1","guild_id":"42"}
//! ```
//!
//! # Architecture
//!
//! - [`bot`] - Event loop wiring the gateway to the command and LFG layers
//! - [`commands`] - Command registry, dispatcher and handlers
//! - [`config`] - YAML configuration with environment variable overrides
//! - [`gateway`] - Chat platform boundary and the console gateway
//! - [`lfg`] - Voice-presence trigger and announcements
//! - [`subscriptions`] - Subscription store and persistence
//! - [`utils`] - Path and game name helpers
//!
//! # Environment Variables
//!
//! - `RUST_LOG` - Controls logging level (default: `info`)

use clap::Parser;
use env_logger::Env;
use log::{error, info};

use crate::{bot::Bot, config::Config};

mod bot;
mod commands;
mod config;
mod gateway;
mod lfg;
mod subscriptions;
mod utils;

/// Command-line arguments for the LFG bot.
///
/// # Examples
///
/// ```bash
/// lfg-bot --config config.yaml --data ./lfg-data
/// ```
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the YAML configuration file.
    ///
    /// A missing file is allowed, every setting has a default.
    #[arg(short, long)]
    config: String,

    /// Path to the directory for storing persistent data.
    ///
    /// Holds `subscriptions.json`. The directory is created if needed.
    #[arg(short, long)]
    data: String,
}

#[tokio::main]
async fn main() {
    // Put logger at info level by default
    let env = Env::default().filter_or("RUST_LOG", "info");
    env_logger::init_from_env(env);

    info!("Starting lfg-bot {}...", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();

    let config = match Config::load(&args.config) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Failed to load config file: {}", e);
            return;
        }
    };

    let bot = match Bot::new(config, args).await {
        Ok(b) => b,
        Err(e) => {
            error!("Failed to initialize bot: {}", e);
            return;
        }
    };
    bot.start().await;

    // The blocking stdin reader would keep the runtime alive until the next line
    std::process::exit(0);
}
