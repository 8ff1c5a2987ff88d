//! Session coordinator
//!
//! `SessionState` holds the drawn balls, the remaining pool, the ended flag
//! and the winner. The `Coordinator` actor owns it outright: claims,
//! snapshots, draws and shutdown are all handled one at a time by the
//! coordinator task, so claim arbitration is atomic without a lock and a
//! `BALL` can never be broadcast after `GAME_OVER`.

use std::sync::Arc;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::Rng;
use tokio::sync::{mpsc, oneshot};
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::card::Card;
use crate::error::AppError;
use crate::message::{ServerMessage, SERVER_SHUTDOWN};
use crate::registry::Registry;
use crate::types::{Ball, PlayerId};
use crate::validator::is_winning;

/// Channel buffer size for session commands
pub const COMMAND_BUFFER: usize = 256;

/// Result of arbitrating one claim
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimOutcome {
    /// The claimant won; the session is now over
    Accepted,
    /// The claimant's card has no complete line
    Rejected,
    /// The session had already ended
    Ignored,
}

/// Point-in-time copy of the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    /// Balls in draw order
    pub drawn: Vec<Ball>,
    pub remaining: usize,
    pub ended: bool,
    pub winner: Option<String>,
}

/// Game state for one session
#[derive(Debug, Clone)]
pub struct SessionState {
    pool: Vec<Ball>,
    drawn: Vec<Ball>,
    ended: bool,
    winner: Option<String>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionState {
    /// Fresh session with all 75 balls in the pool
    pub fn new() -> Self {
        Self {
            pool: Ball::all().collect(),
            drawn: Vec::new(),
            ended: false,
            winner: None,
        }
    }

    /// Draw one ball uniformly from the pool
    ///
    /// Returns None once the session has ended or the pool is empty.
    pub fn draw<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<Ball> {
        if self.ended || self.pool.is_empty() {
            return None;
        }
        let index = rng.gen_range(0..self.pool.len());
        let ball = self.pool.swap_remove(index);
        self.drawn.push(ball);
        Some(ball)
    }

    /// Arbitrate a claim against the claimant's own card
    ///
    /// The first accepted claim ends the session and records the winner;
    /// every later claim is ignored.
    pub fn claim(&mut self, claimant: &str, card: &Card) -> ClaimOutcome {
        if self.ended {
            return ClaimOutcome::Ignored;
        }
        if !is_winning(card, &self.drawn) {
            return ClaimOutcome::Rejected;
        }
        self.ended = true;
        self.winner = Some(claimant.to_string());
        ClaimOutcome::Accepted
    }

    /// End the session without a winner
    ///
    /// Returns true only if this call ended it.
    pub fn end_for_shutdown(&mut self) -> bool {
        if self.ended {
            return false;
        }
        self.ended = true;
        true
    }

    pub fn drawn(&self) -> &[Ball] {
        &self.drawn
    }

    pub fn remaining(&self) -> usize {
        self.pool.len()
    }

    pub fn is_exhausted(&self) -> bool {
        self.pool.is_empty()
    }

    pub fn is_ended(&self) -> bool {
        self.ended
    }

    pub fn winner(&self) -> Option<&str> {
        self.winner.as_deref()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            drawn: self.drawn.clone(),
            remaining: self.pool.len(),
            ended: self.ended,
            winner: self.winner.clone(),
        }
    }

    /// Session with the given balls already drawn
    #[cfg(test)]
    pub(crate) fn with_drawn(balls: &[Ball]) -> Self {
        let mut state = Self::new();
        state.pool.retain(|b| !balls.contains(b));
        state.drawn.extend_from_slice(balls);
        state
    }
}

/// A claim relayed from a connection
#[derive(Debug)]
pub struct Claim {
    pub player_id: PlayerId,
    /// Name from the claim payload, used verbatim in the verdict
    pub name: String,
    /// Card issued to the claiming connection
    pub card: Card,
    /// Claimant's own queue, for the private `BINGO_INVALID`
    pub reply: mpsc::Sender<ServerMessage>,
}

/// Commands sent from handlers and the console to the Coordinator actor
#[derive(Debug)]
pub enum SessionCommand {
    /// Arbitrate a bingo claim
    Claim {
        claim: Claim,
        outcome: oneshot::Sender<ClaimOutcome>,
    },
    /// Read the current state
    Snapshot {
        reply: oneshot::Sender<SessionSnapshot>,
    },
}

/// Cloneable front end to the Coordinator
#[derive(Debug, Clone)]
pub struct SessionHandle {
    sender: mpsc::Sender<SessionCommand>,
}

impl SessionHandle {
    /// Submit a claim and wait for the verdict
    pub async fn claim(&self, claim: Claim) -> Result<ClaimOutcome, AppError> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(SessionCommand::Claim { claim, outcome: tx })
            .await
            .map_err(|_| AppError::SessionClosed)?;
        rx.await.map_err(|_| AppError::SessionClosed)
    }

    /// Fetch a snapshot of the session
    pub async fn snapshot(&self) -> Result<SessionSnapshot, AppError> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(SessionCommand::Snapshot { reply: tx })
            .await
            .map_err(|_| AppError::SessionClosed)?;
        rx.await.map_err(|_| AppError::SessionClosed)
    }
}

/// The session Coordinator actor
///
/// Owns the session state, runs the draw cadence and arbitrates claims.
pub struct Coordinator {
    state: SessionState,
    registry: Arc<Registry>,
    receiver: mpsc::Receiver<SessionCommand>,
    draw_interval: Duration,
    rng: StdRng,
    shutdown: CancellationToken,
}

impl Coordinator {
    /// Create a Coordinator and the handle used to reach it
    pub fn new(
        state: SessionState,
        registry: Arc<Registry>,
        draw_interval: Duration,
        rng: StdRng,
        shutdown: CancellationToken,
    ) -> (Self, SessionHandle) {
        let (tx, rx) = mpsc::channel(COMMAND_BUFFER);
        let coordinator = Self {
            state,
            registry,
            receiver: rx,
            draw_interval,
            rng,
            shutdown,
        };
        (coordinator, SessionHandle { sender: tx })
    }

    /// Run the Coordinator event loop
    ///
    /// The first ball is drawn one interval after start. Returns when the
    /// shutdown token fires or every handle has been dropped.
    pub async fn run(mut self) -> SessionState {
        info!("Session started, drawing every {:?}", self.draw_interval);

        let mut ticker = interval_at(Instant::now() + self.draw_interval, self.draw_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut drawing = true;

        loop {
            tokio::select! {
                biased;

                _ = self.shutdown.cancelled() => {
                    self.handle_shutdown();
                    break;
                }
                cmd = self.receiver.recv() => match cmd {
                    Some(cmd) => self.handle_command(cmd),
                    None => {
                        debug!("All session handles dropped");
                        break;
                    }
                },
                _ = ticker.tick(), if drawing => {
                    drawing = self.draw_next();
                }
            }
        }

        info!("Session coordinator stopped");
        self.state
    }

    /// Process a single command
    fn handle_command(&mut self, cmd: SessionCommand) {
        match cmd {
            SessionCommand::Claim { claim, outcome } => {
                let result = self.handle_claim(claim);
                let _ = outcome.send(result);
            }
            SessionCommand::Snapshot { reply } => {
                let _ = reply.send(self.state.snapshot());
            }
        }
    }

    /// Draw the next ball and announce it
    ///
    /// Returns false once no more draws should be scheduled.
    fn draw_next(&mut self) -> bool {
        match self.state.draw(&mut self.rng) {
            Some(ball) => {
                info!(
                    "Ball {} drawn ({} drawn, {} left)",
                    ball,
                    self.state.drawn().len(),
                    self.state.remaining()
                );
                self.registry.broadcast(&ServerMessage::Ball(ball));
                true
            }
            None => {
                if self.state.is_exhausted() {
                    info!("No balls left, drawing stopped without a winner");
                }
                false
            }
        }
    }

    /// Arbitrate a claim and announce the verdict
    fn handle_claim(&mut self, claim: Claim) -> ClaimOutcome {
        info!("Bingo claim from {} ({})", claim.name, claim.player_id);

        let outcome = self.state.claim(&claim.name, &claim.card);
        match outcome {
            ClaimOutcome::Accepted => {
                info!("Valid bingo: {}", claim.name);
                self.registry.broadcast(&ServerMessage::BingoValid {
                    name: claim.name.clone(),
                });
                self.registry.broadcast(&ServerMessage::GameOver { reason: claim.name });
            }
            ClaimOutcome::Rejected => {
                info!("Invalid bingo: {}", claim.name);
                let msg = ServerMessage::BingoInvalid { name: claim.name };
                if claim.reply.try_send(msg).is_err() {
                    warn!("Could not deliver invalid-claim verdict to {}", claim.player_id);
                }
            }
            ClaimOutcome::Ignored => {
                debug!("Claim from {} after game end ignored", claim.name);
            }
        }
        outcome
    }

    /// End the session for an operator shutdown
    fn handle_shutdown(&mut self) {
        if self.state.end_for_shutdown() {
            let delivered = self.registry.broadcast(&ServerMessage::GameOver {
                reason: SERVER_SHUTDOWN.to_string(),
            });
            info!("Shutdown announced to {} players", delivered);
        } else {
            info!("Shutdown after game end, nothing to announce");
        }
    }
}
