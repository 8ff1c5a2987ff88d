//! Bingo Player Client - Entry Point
//!
//! Connects to the server, shows the card, marks called balls and claims
//! bingo when a row or column fills up.
//!
//! Usage: `bingo_client [addr] [name]`
//! Commands on stdin: `card`, `bingo`, `exit`.

use std::env;
use std::io::BufRead;

use futures_util::{SinkExt, StreamExt};
use rand::Rng;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_util::codec::{FramedRead, FramedWrite};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use bingo_server::config::DEFAULT_ADDR;
use bingo_server::{ClientCodec, ClientMessage, MarkedCard, ServerMessage};

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

fn print_card(card: Option<&MarkedCard>) {
    match card {
        Some(card) => println!("{}", card.render()),
        None => println!("(No card yet)"),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let mut args = env::args().skip(1);
    let addr = args.next().unwrap_or_else(|| DEFAULT_ADDR.to_string());
    let name = args
        .next()
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| format!("Player{}", rand::thread_rng().gen_range(1000..10000)));

    let stream = TcpStream::connect(&addr).await?;
    let (read_half, write_half) = stream.into_split();
    let mut lines = FramedRead::new(read_half, ClientCodec::new());
    let mut sink = FramedWrite::new(write_half, ClientCodec::new());

    sink.send(ClientMessage::Hello { name: name.clone() }).await?;

    let mut card: Option<MarkedCard> = None;
    let mut claimed = false;
    let mut console = spawn_console_reader();

    loop {
        tokio::select! {
            frame = lines.next() => {
                let msg = match frame {
                    None => {
                        println!("Server closed the connection");
                        break;
                    }
                    Some(Err(e)) => {
                        warn!("Connection error: {}", e);
                        break;
                    }
                    Some(Ok(Err(e))) => {
                        debug!("Ignoring line: {}", e);
                        continue;
                    }
                    Some(Ok(Ok(msg))) => msg,
                };

                match msg {
                    ServerMessage::Card(received) => {
                        println!("Card received for {}:", name);
                        card = Some(MarkedCard::new(received));
                        print_card(card.as_ref());
                        println!("Waiting for balls...");
                    }
                    ServerMessage::Ball(ball) => {
                        println!("\nBall: {}", ball);
                        let Some(marked) = card.as_mut() else {
                            continue;
                        };
                        if marked.mark(ball.number()) {
                            println!("Hit! Marked on your card.");
                        }
                        print_card(Some(&*marked));
                        if marked.has_line() && !claimed {
                            println!("Looks like BINGO. Sending claim to the server...");
                            sink.send(ClientMessage::BingoClaim { name: name.clone() }).await?;
                            claimed = true;
                        }
                    }
                    ServerMessage::BingoValid { name: winner } => {
                        println!("\n*** Valid BINGO by {} ***", winner);
                    }
                    ServerMessage::BingoInvalid { name: who } => {
                        println!("\nInvalid BINGO: {}", who);
                        claimed = false;
                    }
                    ServerMessage::GameOver { reason } => {
                        println!("\n--- GAME OVER. Winner: {} ---", reason);
                        break;
                    }
                }
            }
            line = console.recv() => {
                let Some(line) = line else {
                    break;
                };
                match line.trim().to_ascii_lowercase().as_str() {
                    "card" => print_card(card.as_ref()),
                    "bingo" => {
                        sink.send(ClientMessage::BingoClaim { name: name.clone() }).await?;
                    }
                    "exit" => break,
                    "" => {}
                    other => println!("Unknown command '{}' (card, bingo, exit)", other),
                }
            }
        }
    }

    println!("Client closing...");
    Ok(())
}
