//! TCP connection handler
//!
//! Handles individual player connections: join handshake, card issue,
//! claim relay, and bidirectional communication with the Coordinator.

use std::sync::Arc;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use rand::Rng;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_util::codec::{FramedRead, FramedWrite};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::card::Card;
use crate::codec::ServerCodec;
use crate::error::AppError;
use crate::message::{ClientMessage, ServerMessage};
use crate::player::{Player, OUTBOUND_BUFFER};
use crate::registry::Registry;
use crate::session::{Claim, ClaimOutcome, SessionHandle};

/// Longest wait for queued messages to reach the socket after the read side ends
pub const WRITER_FLUSH_TIMEOUT: Duration = Duration::from_secs(2);

/// Name given to players whose first line is not a usable `HELLO`
fn default_name() -> String {
    format!("Player{}", rand::thread_rng().gen_range(1000..10000))
}

/// Handle a new TCP connection
///
/// Performs the join handshake, sets up bidirectional communication,
/// and manages the connection lifecycle. `closing` fires once the session
/// has made its final broadcast; the connection then flushes and ends.
pub async fn handle_connection(
    stream: TcpStream,
    registry: Arc<Registry>,
    session: SessionHandle,
    closing: CancellationToken,
) -> Result<(), AppError> {
    let peer_addr = stream
        .peer_addr()
        .map(|a| a.to_string())
        .unwrap_or_else(|_| "unknown".to_string());

    debug!("New TCP connection from {}", peer_addr);

    let (read_half, write_half) = stream.into_split();
    let mut lines = FramedRead::new(read_half, ServerCodec::new());
    let mut sink = FramedWrite::new(write_half, ServerCodec::new());

    // Handshake: the first line is the only chance to pick a name
    let first = tokio::select! {
        first = lines.next() => first,
        _ = closing.cancelled() => {
            debug!("{} still in handshake at shutdown", peer_addr);
            return Ok(());
        }
    };
    let name = match first {
        None => {
            debug!("{} closed before handshake", peer_addr);
            return Ok(());
        }
        Some(Err(e)) => return Err(e.into()),
        Some(Ok(Ok(ClientMessage::Hello { name }))) if !name.is_empty() => name,
        Some(Ok(first)) => {
            debug!("{} sent no usable HELLO: {:?}", peer_addr, first);
            default_name()
        }
    };

    let card = Card::generate(&mut rand::thread_rng());

    // Queue the card before joining the roster so it precedes any BALL
    let (msg_tx, mut msg_rx) = mpsc::channel::<ServerMessage>(OUTBOUND_BUFFER);
    msg_tx
        .try_send(ServerMessage::Card(card))
        .map_err(|_| AppError::SessionClosed)?;

    let player = Player::new(name.clone(), card, msg_tx.clone());
    let player_id = player.id;
    let registration = registry.register(player);
    info!(
        "Player {} ({}) joined from {}, total players: {}",
        name,
        player_id,
        peer_addr,
        registry.len()
    );

    // Spawn write task (ServerMessage -> socket)
    let mut write_task = tokio::spawn(async move {
        while let Some(msg) = msg_rx.recv().await {
            if let Err(e) = sink.send(msg).await {
                debug!("Socket send failed, ending write task: {}", e);
                break;
            }
        }
        let _ = sink.close().await;
        debug!("Write task ended for client");
    });

    // Read loop (socket -> Coordinator)
    let read_loop = async {
        while let Some(frame) = lines.next().await {
            match frame {
                Ok(Ok(ClientMessage::BingoClaim { name: claimed })) => {
                    let claim = Claim {
                        player_id,
                        name: claimed,
                        card,
                        reply: msg_tx.clone(),
                    };
                    match session.claim(claim).await {
                        Ok(ClaimOutcome::Accepted) => info!("{} won the session", name),
                        Ok(outcome) => debug!("Claim by {} resolved as {:?}", name, outcome),
                        Err(e) => {
                            debug!("Session closed, ending read loop for {}: {}", name, e);
                            break;
                        }
                    }
                }
                Ok(Ok(ClientMessage::Hello { .. })) => {
                    debug!("Repeated HELLO from {} ignored", name);
                }
                Ok(Err(e)) => {
                    warn!("Malformed line from {}: {}", name, e);
                }
                Err(e) => {
                    warn!("Read error for {}: {}", name, e);
                    break;
                }
            }
        }
        debug!("Read loop ended for {}", player_id);
    };

    // Wait for either side to finish, or for the session to close
    let writer_done = tokio::select! {
        _ = read_loop => false,
        _ = closing.cancelled() => false,
        _ = &mut write_task => {
            debug!("Write task completed for {}", player_id);
            true
        }
    };

    // Once the roster and this handler drop their senders, the writer drains
    // what is queued and closes the socket.
    drop(registration);
    drop(msg_tx);
    if !writer_done
        && tokio::time::timeout(WRITER_FLUSH_TIMEOUT, &mut write_task)
            .await
            .is_err()
    {
        warn!("Write task for {} did not flush in time", player_id);
        write_task.abort();
    }

    info!(
        "Player {} ({}) disconnected, remaining players: {}",
        name,
        player_id,
        registry.len()
    );

    Ok(())
}
