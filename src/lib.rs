//! Multiplayer Bingo Server Library
//!
//! A line-protocol bingo server built on tokio, using the Actor pattern for
//! session state.
//!
//! # Features
//! - TCP connection handling with a `HELLO` handshake
//! - Random 5x5 cards with a free center, one per player
//! - Timed ball draws broadcast to every player
//! - Atomic claim arbitration (exactly one winner)
//! - Operator shutdown announced to every player
//!
//! # Architecture
//! - `Coordinator` is the actor owning drawn balls, pool, ended flag and
//!   winner; it runs the draw cadence and arbitrates claims
//! - `Registry` is the mutex-guarded roster used for broadcasts
//! - Each connection has a `handler` task relaying claims to the Coordinator
//!   and a writer task draining the player's outbound queue
//!
//! # Example
//! ```ignore
//! use tokio::net::TcpListener;
//! use bingo_server::{BingoServer, ServerConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ServerConfig::default();
//!     let listener = TcpListener::bind(&config.addr).await.unwrap();
//!     let server = BingoServer::start(&config);
//!     let acceptor = server.spawn_acceptor(listener);
//!
//!     tokio::signal::ctrl_c().await.unwrap();
//!     server.shutdown().await;
//!     acceptor.await.unwrap();
//! }
//! ```

pub mod card;
pub mod codec;
pub mod config;
pub mod console;
pub mod error;
pub mod handler;
pub mod message;
pub mod player;
pub mod registry;
pub mod scorecard;
pub mod server;
pub mod session;
pub mod types;
pub mod validator;

// Re-export main types for convenience
pub use card::Card;
pub use codec::{ClientCodec, LineCodec, ServerCodec};
pub use config::ServerConfig;
pub use console::OperatorCommand;
pub use error::{AppError, CardError, CodecError, ConfigError, ProtocolError, SendError};
pub use handler::handle_connection;
pub use message::{ClientMessage, ServerMessage};
pub use player::Player;
pub use registry::{Registration, Registry};
pub use scorecard::MarkedCard;
pub use server::{accept_loop, BingoServer, Connections, Listener};
pub use session::{ClaimOutcome, Coordinator, SessionHandle, SessionSnapshot, SessionState};
pub use types::{Ball, PlayerId};
pub use validator::is_winning;
