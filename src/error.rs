//! Error types for the bingo server
//!
//! Defines application-level errors, protocol decode errors, codec errors
//! and message send errors. Uses thiserror for ergonomic error definitions.

use thiserror::Error;

/// Application-level errors
///
/// Any of these terminates the connection they occur on; none of them
/// reach the drawing loop or other connections.
#[derive(Debug, Error)]
pub enum AppError {
    /// IO error (fatal)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Framing error on the line stream (fatal)
    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),

    /// Session coordinator is gone (fatal - internal channel broken)
    #[error("Session closed")]
    SessionClosed,
}

/// Errors decoding a single protocol line
///
/// Never fatal: the receiver logs and skips the line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    /// Line has no `|` separator
    #[error("Missing separator in line: {0}")]
    MissingSeparator(String),

    /// Line is not valid UTF-8
    #[error("Line is not valid UTF-8")]
    InvalidUtf8,

    /// Message type is not known to this side of the connection
    #[error("Unknown message type: {0}")]
    UnknownType(String),

    /// Ball identifier could not be parsed
    #[error("Invalid ball: {0}")]
    InvalidBall(String),

    /// Card payload could not be parsed
    #[error("Invalid card: {0}")]
    InvalidCard(#[from] CardError),
}

/// Card construction and parsing errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CardError {
    /// Serialized card does not have 5 rows of 5 cells
    #[error("Expected 5x5 cells, got {0}")]
    Shape(String),

    /// A cell is not an integer
    #[error("Non-numeric cell: {0}")]
    Cell(String),

    /// A cell lies outside its column range or repeats within the column
    #[error("Cell {value} not valid at row {row}, column {col}")]
    OutOfPlace { row: usize, col: usize, value: u8 },
}

/// Line framing errors
#[derive(Debug, Error)]
pub enum CodecError {
    /// Underlying stream failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Peer sent a line longer than the codec accepts
    #[error("Line exceeds maximum length")]
    LineTooLong,
}

impl From<tokio_util::codec::LinesCodecError> for CodecError {
    fn from(err: tokio_util::codec::LinesCodecError) -> Self {
        match err {
            tokio_util::codec::LinesCodecError::MaxLineLengthExceeded => CodecError::LineTooLong,
            tokio_util::codec::LinesCodecError::Io(e) => CodecError::Io(e),
        }
    }
}

/// Message send errors
///
/// Occurs when a player's outbound queue cannot take another message.
#[derive(Debug, Error)]
pub enum SendError {
    /// The writer side of the connection has gone away
    #[error("Channel closed")]
    ChannelClosed,

    /// The player is not draining their queue
    #[error("Channel full")]
    ChannelFull,
}

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed config file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}
