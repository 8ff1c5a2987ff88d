//! Basic type definitions for the bingo server
//!
//! Provides newtype wrappers for type safety:
//! - `PlayerId`: UUID-based unique player identifier
//! - `Ball`: one of the 75 numbered balls, lettered by range

use std::str::FromStr;

use uuid::Uuid;

use crate::error::ProtocolError;

/// Highest ball number
pub const MAX_BALL: u8 = 75;

/// Numbers per letter (and per card column)
pub const COLUMN_SPAN: u8 = 15;

/// Column letters, in column order
pub const LETTERS: [char; 5] = ['B', 'I', 'N', 'G', 'O'];

/// Unique player identifier (newtype pattern)
///
/// Display names are not unique within a session, so the roster is keyed
/// by this instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlayerId(pub Uuid);

impl PlayerId {
    /// Create a new random player ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PlayerId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A bingo ball
///
/// The letter is implied by the number: B 1-15, I 16-30, N 31-45,
/// G 46-60, O 61-75.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ball(u8);

impl Ball {
    /// Create a ball, returning None outside 1..=75
    pub fn new(number: u8) -> Option<Self> {
        (1..=MAX_BALL).contains(&number).then_some(Self(number))
    }

    /// The full 75-ball universe in ascending order
    pub fn all() -> impl Iterator<Item = Ball> {
        (1..=MAX_BALL).map(Ball)
    }

    pub fn number(self) -> u8 {
        self.0
    }

    /// Card column this ball belongs to (0 = B ... 4 = O)
    pub fn column(self) -> usize {
        ((self.0 - 1) / COLUMN_SPAN) as usize
    }

    pub fn letter(self) -> char {
        LETTERS[self.column()]
    }
}

impl std::fmt::Display for Ball {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.letter(), self.0)
    }
}

impl FromStr for Ball {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let mut chars = s.chars();
        let letter = chars
            .next()
            .ok_or_else(|| ProtocolError::InvalidBall(s.to_string()))?
            .to_ascii_uppercase();
        let ball = chars
            .as_str()
            .parse::<u8>()
            .ok()
            .and_then(Ball::new)
            .ok_or_else(|| ProtocolError::InvalidBall(s.to_string()))?;

        if ball.letter() != letter {
            return Err(ProtocolError::InvalidBall(s.to_string()));
        }
        Ok(ball)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_id_unique() {
        let id1 = PlayerId::new();
        let id2 = PlayerId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_ball_letters() {
        assert_eq!(Ball::new(1).unwrap().to_string(), "B1");
        assert_eq!(Ball::new(15).unwrap().to_string(), "B15");
        assert_eq!(Ball::new(16).unwrap().to_string(), "I16");
        assert_eq!(Ball::new(45).unwrap().to_string(), "N45");
        assert_eq!(Ball::new(46).unwrap().to_string(), "G46");
        assert_eq!(Ball::new(75).unwrap().to_string(), "O75");
    }

    #[test]
    fn test_ball_out_of_range() {
        assert!(Ball::new(0).is_none());
        assert!(Ball::new(76).is_none());
    }

    #[test]
    fn test_ball_universe() {
        let all: Vec<Ball> = Ball::all().collect();
        assert_eq!(all.len(), 75);
        assert_eq!(all[0].number(), 1);
        assert_eq!(all[74].number(), 75);
    }

    #[test]
    fn test_ball_parse() {
        assert_eq!("G52".parse::<Ball>().unwrap().number(), 52);
        assert_eq!("o70".parse::<Ball>().unwrap().number(), 70);
        assert!("B20".parse::<Ball>().is_err());
        assert!("X5".parse::<Ball>().is_err());
        assert!("B".parse::<Ball>().is_err());
        assert!("".parse::<Ball>().is_err());
        assert!("O99".parse::<Ball>().is_err());
    }
}
