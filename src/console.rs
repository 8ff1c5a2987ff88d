//! Operator console commands
//!
//! The server reads these from stdin. They only read roster and session
//! snapshots; `exit` triggers the shutdown path.

use std::str::FromStr;

use crate::types::Ball;

/// Operator command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorCommand {
    /// List connected player names
    Status,
    /// List drawn balls
    Balls,
    /// Stop accepting and end the session
    Exit,
}

impl FromStr for OperatorCommand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "status" => Ok(OperatorCommand::Status),
            "balls" => Ok(OperatorCommand::Balls),
            "exit" => Ok(OperatorCommand::Exit),
            other => Err(other.to_string()),
        }
    }
}

/// One-line help shown at startup
pub const HELP: &str = "Commands: 'status' (list players), 'balls' (list drawn balls), 'exit'";

pub fn format_status(names: &[String]) -> String {
    let mut out = format!("Connected players: {}", names.len());
    for name in names {
        out.push_str("\n - ");
        out.push_str(name);
    }
    out
}

pub fn format_balls(drawn: &[Ball]) -> String {
    let list: Vec<String> = drawn.iter().map(Ball::to_string).collect();
    format!("Balls drawn: {} => {}", drawn.len(), list.join(","))
}
