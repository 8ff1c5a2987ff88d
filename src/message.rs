//! Message protocol definitions
//!
//! Text protocol, one `TYPE|payload` message per line. Each direction is a
//! tagged enum: `Display` encodes it, `FromStr` decodes it.

use std::str::FromStr;

use crate::card::Card;
use crate::error::ProtocolError;
use crate::types::Ball;

/// `GAME_OVER` reason sent when the operator stops the server
pub const SERVER_SHUTDOWN: &str = "server_shutdown";

/// Client → Server message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientMessage {
    /// Join handshake carrying the requested display name (may be empty)
    Hello { name: String },
    /// Claim a completed row or column
    BingoClaim { name: String },
}

/// Server → Client message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerMessage {
    /// The player's card, sent once after the handshake
    Card(Card),
    /// A newly drawn ball
    Ball(Ball),
    /// Broadcast: the named player won
    BingoValid { name: String },
    /// To the claimant only: the claim did not check out
    BingoInvalid { name: String },
    /// Broadcast: the session is over (winner name or a reason)
    GameOver { reason: String },
}

/// Split a line into its type tag and payload
fn split_line(line: &str) -> Result<(&str, &str), ProtocolError> {
    line.split_once('|')
        .ok_or_else(|| ProtocolError::MissingSeparator(line.to_string()))
}

impl std::fmt::Display for ClientMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClientMessage::Hello { name } => write!(f, "HELLO|{}", name),
            ClientMessage::BingoClaim { name } => write!(f, "BINGO_CLAIM|{}", name),
        }
    }
}

impl FromStr for ClientMessage {
    type Err = ProtocolError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let (kind, payload) = split_line(line)?;
        match kind {
            "HELLO" => Ok(ClientMessage::Hello {
                name: payload.trim().to_string(),
            }),
            "BINGO_CLAIM" => Ok(ClientMessage::BingoClaim {
                name: payload.to_string(),
            }),
            other => Err(ProtocolError::UnknownType(other.to_string())),
        }
    }
}

impl std::fmt::Display for ServerMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServerMessage::Card(card) => write!(f, "CARD|{}", card),
            ServerMessage::Ball(ball) => write!(f, "BALL|{}", ball),
            ServerMessage::BingoValid { name } => write!(f, "BINGO_VALID|{}", name),
            ServerMessage::BingoInvalid { name } => write!(f, "BINGO_INVALID|{}", name),
            ServerMessage::GameOver { reason } => write!(f, "GAME_OVER|{}", reason),
        }
    }
}

impl FromStr for ServerMessage {
    type Err = ProtocolError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let (kind, payload) = split_line(line)?;
        match kind {
            "CARD" => Ok(ServerMessage::Card(payload.parse()?)),
            "BALL" => Ok(ServerMessage::Ball(payload.parse()?)),
            "BINGO_VALID" => Ok(ServerMessage::BingoValid {
                name: payload.to_string(),
            }),
            "BINGO_INVALID" => Ok(ServerMessage::BingoInvalid {
                name: payload.to_string(),
            }),
            "GAME_OVER" => Ok(ServerMessage::GameOver {
                reason: payload.to_string(),
            }),
            other => Err(ProtocolError::UnknownType(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_message_decode() {
        let msg: ClientMessage = "HELLO| Ana ".parse().unwrap();
        assert_eq!(
            msg,
            ClientMessage::Hello {
                name: "Ana".to_string()
            }
        );

        let msg: ClientMessage = "BINGO_CLAIM|Ana".parse().unwrap();
        assert_eq!(
            msg,
            ClientMessage::BingoClaim {
                name: "Ana".to_string()
            }
        );
    }

    #[test]
    fn test_client_message_empty_hello() {
        let msg: ClientMessage = "HELLO|".parse().unwrap();
        assert_eq!(msg, ClientMessage::Hello { name: String::new() });
    }

    #[test]
    fn test_client_message_rejects_server_kinds() {
        assert_eq!(
            "BALL|B1".parse::<ClientMessage>(),
            Err(ProtocolError::UnknownType("BALL".to_string()))
        );
        assert!(matches!(
            "garbage".parse::<ClientMessage>(),
            Err(ProtocolError::MissingSeparator(_))
        ));
    }

    #[test]
    fn test_server_message_encode() {
        let ball = Ball::new(12).unwrap();
        assert_eq!(ServerMessage::Ball(ball).to_string(), "BALL|B12");
        assert_eq!(
            ServerMessage::GameOver {
                reason: SERVER_SHUTDOWN.to_string()
            }
            .to_string(),
            "GAME_OVER|server_shutdown"
        );
        assert_eq!(
            ServerMessage::BingoInvalid {
                name: "Ana".to_string()
            }
            .to_string(),
            "BINGO_INVALID|Ana"
        );
    }

    #[test]
    fn test_server_message_card_line() {
        let line = "CARD|3,20,35,50,65;7,16,31,46,61;1,30,0,60,75;15,22,40,55,70;9,25,44,49,68";
        let msg: ServerMessage = line.parse().unwrap();
        match &msg {
            ServerMessage::Card(card) => assert_eq!(card.cell(0, 1), 20),
            _ => panic!("Wrong variant"),
        }
        assert_eq!(msg.to_string(), line);
    }

    #[test]
    fn test_server_message_bad_payloads() {
        assert!(matches!(
            "BALL|Z9".parse::<ServerMessage>(),
            Err(ProtocolError::InvalidBall(_))
        ));
        assert!(matches!(
            "CARD|1,2,3".parse::<ServerMessage>(),
            Err(ProtocolError::InvalidCard(_))
        ));
    }
}
