//! Bingo Server - Entry Point
//!
//! Starts the TCP listener and session Coordinator, accepts connections and
//! serves operator commands from stdin.

use std::env;
use std::io::BufRead;

use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use bingo_server::console::{format_balls, format_status, HELP};
use bingo_server::{BingoServer, OperatorCommand, ServerConfig};

/// Environment variable naming an optional JSON config file
const CONFIG_ENV: &str = "BINGO_CONFIG";

/// Read stdin on a plain thread so a pending read never holds up exit
fn spawn_console_reader() -> mpsc::UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else {
                break;
            };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging with environment filter
    // Use RUST_LOG env var to control log level
    // e.g., RUST_LOG=debug or RUST_LOG=bingo_server=trace
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("bingo_server=info")),
        )
        .init();

    let mut config = match env::var(CONFIG_ENV) {
        Ok(path) => ServerConfig::from_file(&path)?,
        Err(_) => ServerConfig::default(),
    };

    // Bind address from command line overrides the config
    if let Some(addr) = env::args().nth(1) {
        config.addr = addr;
    }
    config.validate()?;

    // Start TCP listener
    let listener = TcpListener::bind(&config.addr).await?;
    info!("Bingo server listening on {}", config.addr);

    let server = BingoServer::start(&config);
    let acceptor = server.spawn_acceptor(listener);

    println!("{}", HELP);

    // Operator console
    let mut console = spawn_console_reader();
    loop {
        let line = tokio::select! {
            line = console.recv() => line,
            _ = tokio::signal::ctrl_c() => None,
        };
        let Some(line) = line else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        match line.parse::<OperatorCommand>() {
            Ok(OperatorCommand::Status) => {
                println!("{}", format_status(&server.registry().names()));
            }
            Ok(OperatorCommand::Balls) => match server.session().snapshot().await {
                Ok(snapshot) => println!("{}", format_balls(&snapshot.drawn)),
                Err(e) => warn!("Session unavailable: {}", e),
            },
            Ok(OperatorCommand::Exit) => break,
            Err(other) => println!("Unknown command '{}'. {}", other, HELP),
        }
    }

    info!("Shutting down server...");
    server.shutdown().await;
    acceptor.await?;

    Ok(())
}
