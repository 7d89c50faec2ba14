//! Minicasino driver
//!
//! Loads configuration, seeds the game catalog and runs local betting
//! sessions against the in-process engine.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use futures::future::join_all;
use minicasino::{
    telemetry, BetSummary, CasinoError, CasinoResult, ConfigLoader, ErrorKind, Game, GameId,
    NewUser, ServiceBuilder, ServiceContainer,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "minicasino")]
#[command(about = "Minicasino betting core driver", long_about = None)]
struct Args {
    /// TOML configuration file
    #[arg(long)]
    config: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the game catalog as JSON
    Games,

    /// Print the effective configuration as TOML
    Config,

    /// Register players and place bets concurrently, then print summaries
    Simulate {
        /// Number of players, each betting in its own session
        #[arg(long, default_value = "4")]
        players: usize,

        /// Bets per player
        #[arg(long, default_value = "10")]
        bets: usize,

        /// Stake per bet
        #[arg(long, default_value = "10.0")]
        stake: f64,

        /// Deposit credited to each player before betting
        #[arg(long, default_value = "100.0")]
        deposit: f64,

        /// Game to bet on
        #[arg(long, default_value = "3")]
        game: u64,
    },
}

/// Per-player outcome of a simulated session
#[derive(Debug, Serialize)]
struct SessionReport {
    username: String,
    balance: f64,
    rejected_bets: usize,
    summary: BetSummary,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let loader = match args.config {
        Some(ref path) => ConfigLoader::new().with_path(path),
        None => ConfigLoader::new(),
    };
    let config = loader.load()?;

    // Before the catalog is seeded, so fallback warnings are visible
    telemetry::init_tracing(&config.monitoring);

    let services = ServiceBuilder::new().with_config(config).build()?;

    match args.command {
        Command::Games => {
            let games = services.catalog().list();
            let games: Vec<&Game> = games.iter().map(|game| game.as_ref()).collect();
            println!("{}", serde_json::to_string_pretty(&games)?);
        }
        Command::Config => {
            println!("{}", ConfigLoader::render(services.config())?);
        }
        Command::Simulate {
            players,
            bets,
            stake,
            deposit,
            game,
        } => {
            let services = Arc::new(services);
            let reports = simulate(services, players, bets, stake, deposit, GameId(game)).await?;
            println!("{}", serde_json::to_string_pretty(&reports)?);
        }
    }

    Ok(())
}

async fn simulate(
    services: Arc<ServiceContainer>,
    players: usize,
    bets: usize,
    stake: f64,
    deposit: f64,
    game_id: GameId,
) -> CasinoResult<Vec<SessionReport>> {
    let birthdate = NaiveDate::from_ymd_opt(1990, 1, 1)
        .ok_or_else(|| CasinoError::InvalidArgument("invalid player birthdate".to_string()))?;

    let mut usernames = Vec::with_capacity(players);
    for n in 1..=players {
        let username = format!("player-{}", n);
        services
            .users()
            .register(NewUser::new(format!("Player {}", n), username.clone(), birthdate))?;
        services.users().deposit(&username, deposit).await?;
        usernames.push(username);
    }

    info!(players, bets, stake, %game_id, "Starting simulated sessions");

    let sessions = usernames.into_iter().map(|username| {
        let services = Arc::clone(&services);
        tokio::spawn(async move { run_session(services, username, bets, stake, game_id).await })
    });

    let mut reports = Vec::with_capacity(players);
    for joined in join_all(sessions).await {
        match joined {
            Ok(report) => reports.push(report?),
            Err(e) => warn!(error = %e, "Session task failed"),
        }
    }
    Ok(reports)
}

async fn run_session(
    services: Arc<ServiceContainer>,
    username: String,
    bets: usize,
    stake: f64,
    game_id: GameId,
) -> CasinoResult<SessionReport> {
    let mut rejected_bets = 0;
    for _ in 0..bets {
        match services.place_bet(&username, game_id, stake).await {
            Ok(_) => {}
            Err(e) if e.kind() == ErrorKind::InsufficientFunds => {
                rejected_bets += 1;
            }
            Err(e) => return Err(e),
        }
    }

    Ok(SessionReport {
        balance: services.users().balance(&username).await?,
        summary: services.bet_summary(&username).await?,
        rejected_bets,
        username,
    })
}
