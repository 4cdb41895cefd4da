//! skillrank CLI: headless mini-game sessions and rank lookup.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "skillrank", version, about = "Three-game skill session with rank scoring")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play full sessions with a simulated player
    Play {
        /// Player profile name (default: from config)
        #[arg(long)]
        player: Option<String>,

        /// Seed for every random source
        #[arg(long)]
        seed: Option<u64>,

        /// Sessions to play back to back
        #[arg(long, default_value = "1")]
        rounds: u32,

        /// JSON score file to persist scores in
        #[arg(long)]
        scores: Option<PathBuf>,

        /// Directory to write one JSON report per round into
        #[arg(long)]
        output: Option<PathBuf>,

        /// Run on a paused clock that skips ahead instead of sleeping
        #[arg(long)]
        virtual_time: bool,

        /// Play only this game: draw, mash or recall
        #[arg(long)]
        game: Option<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Aggregate three explicit game scores
    Rank {
        #[arg(long)]
        game1: i32,

        #[arg(long)]
        game2: i32,

        #[arg(long)]
        game3: i32,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Aggregate the scores in a JSON score file
    Results {
        /// JSON score file
        #[arg(long)]
        scores: PathBuf,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Check a config file for problems
    Validate {
        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// List simulated player profiles
    ListPlayers {
        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create a starter config
    Init,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("skillrank=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Play {
            player,
            seed,
            rounds,
            scores,
            output,
            virtual_time,
            game,
            config,
        } => runtime(virtual_time).and_then(|rt| {
            rt.block_on(commands::play::execute(
                player, seed, rounds, scores, output, game, config,
            ))
        }),
        Commands::Rank {
            game1,
            game2,
            game3,
            format,
        } => commands::rank::execute(game1, game2, game3, format),
        Commands::Results { scores, format } => commands::results::execute(scores, format),
        Commands::Validate { config } => commands::validate::execute(config),
        Commands::ListPlayers { config } => commands::list_players::execute(config),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

/// Single-threaded runtime; a paused one auto-advances through every sleep.
fn runtime(virtual_time: bool) -> anyhow::Result<tokio::runtime::Runtime> {
    let mut builder = tokio::runtime::Builder::new_current_thread();
    builder.enable_all();
    if virtual_time {
        builder.start_paused(true);
    }
    Ok(builder.build()?)
}
