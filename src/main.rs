use std::net::IpAddr;
use std::time::Duration;

use clap::{Parser, Subcommand};
use naval_duel::{
    describe_response, init_logging, render_fleet, ConsoleReporter, MatchConfig,
    MatchCoordinator, PlayerClient, Reporter, TcpConnector, TurnRequest,
};
use rand::rngs::SmallRng;
use rand::SeedableRng;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Host a match and wait for two players to connect.
    Host {
        #[arg(long)]
        port: String,
        #[arg(long, default_value = "", help = "Board dimension D; the grid is 2D x 2D (default 1)")]
        dimension: String,
        #[arg(long, default_value = "0.0.0.0")]
        bind: IpAddr,
        #[arg(long, default_value_t = 30, help = "Per-connection I/O timeout, 0 to wait forever")]
        timeout_secs: u64,
        #[arg(long, help = "Fix RNG seed for reproducible fleets (e.g., --seed 12345)")]
        seed: Option<u64>,
    },
    /// Join a hosted match and print both fleets.
    Join {
        #[arg(long, default_value = "127.0.0.1:8080")]
        connect: String,
    },
    /// Fire one shot at the given player's board.
    Fire {
        #[arg(long, default_value = "127.0.0.1:8080")]
        connect: String,
        #[arg(long, help = "Id of the player being fired upon (1 or 2)")]
        target: i32,
        #[arg(long, help = "Target cell, e.g. C5")]
        at: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Host {
            port,
            dimension,
            bind,
            timeout_secs,
            seed,
        } => {
            let mut reporter = ConsoleReporter;
            let config = match MatchConfig::from_raw(&dimension, &port) {
                Ok(config) => config,
                Err(e) => {
                    reporter.error(&e);
                    return Err(e.into());
                }
            };
            let mut config = config
                .with_io_timeout((timeout_secs > 0).then(|| Duration::from_secs(timeout_secs)))
                .with_seed(seed);
            config.bind.set_ip(bind);

            if let Some(s) = seed {
                println!("Using fixed seed: {} (fleets will be reproducible)", s);
            }
            let mut rng = match config.seed {
                Some(s) => SmallRng::seed_from_u64(s),
                None => {
                    let mut seed_rng = rand::rng();
                    SmallRng::from_rng(&mut seed_rng)
                }
            };

            println!(
                "Hosting a {size}x{size} match on {}...",
                config.bind,
                size = config.grid_size()
            );
            let coordinator = MatchCoordinator::bind(config, Box::new(reporter)).await?;
            println!("Waiting for two players to connect...");
            let summary = coordinator.run(&mut rng).await?;
            println!(
                "Match finished after {} exchanges ({} rejected).",
                summary.exchanges, summary.rejected
            );
        }
        Commands::Join { connect } => {
            let client = PlayerClient::new(TcpConnector::new(connect));
            let handshake = client.join().await?;
            println!(
                "You are player {} on a {size}x{size} board.",
                handshake.player,
                size = handshake.dimension * 2
            );
            println!("\nYour fleet:");
            print!("{}", render_fleet(&handshake.own_fleet, handshake.dimension));
            println!("\nOpponent fleet:");
            print!("{}", render_fleet(&handshake.opponent_fleet, handshake.dimension));
        }
        Commands::Fire {
            connect,
            target,
            at,
        } => {
            let client = PlayerClient::new(TcpConnector::new(connect));
            let response = client
                .send(&TurnRequest {
                    target,
                    coordinate: at,
                })
                .await?;
            println!("{}", describe_response(&response));
        }
    }
    Ok(())
}
