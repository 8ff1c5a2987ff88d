//! Player-side card with marks
//!
//! Mirrors the card received from the server and tracks which cells the
//! announced balls have hit. Used by the player client to decide when to
//! claim and to draw the card on the terminal.

use crate::card::{Card, CARD_SIZE, FREE, FREE_CELL};
use crate::types::LETTERS;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkedCard {
    card: Card,
    marked: [[bool; CARD_SIZE]; CARD_SIZE],
}

impl MarkedCard {
    /// Wrap a card with only the free cell marked
    pub fn new(card: Card) -> Self {
        let mut marked = [[false; CARD_SIZE]; CARD_SIZE];
        marked[FREE_CELL.0][FREE_CELL.1] = true;
        Self { card, marked }
    }

    pub fn card(&self) -> &Card {
        &self.card
    }

    pub fn is_marked(&self, row: usize, col: usize) -> bool {
        self.marked[row][col]
    }

    /// Mark a called number; returns true if it was on the card
    pub fn mark(&mut self, number: u8) -> bool {
        let mut hit = false;
        for row in 0..CARD_SIZE {
            for col in 0..CARD_SIZE {
                if number != FREE && self.card.cell(row, col) == number {
                    self.marked[row][col] = true;
                    hit = true;
                }
            }
        }
        hit
    }

    /// True when any row or column is fully marked
    pub fn has_line(&self) -> bool {
        let row = (0..CARD_SIZE).any(|r| self.marked[r].iter().all(|&m| m));
        let col = (0..CARD_SIZE).any(|c| (0..CARD_SIZE).all(|r| self.marked[r][c]));
        row || col
    }

    /// Text grid: `FREE` in the center, marked cells in brackets
    pub fn render(&self) -> String {
        let header: Vec<String> = LETTERS.iter().map(|l| format!(" {}  ", l)).collect();
        let mut out = header.concat().trim_end().to_string();

        for row in 0..CARD_SIZE {
            out.push('\n');
            let mut line = String::new();
            for col in 0..CARD_SIZE {
                let value = self.card.cell(row, col);
                let cell = if value == FREE {
                    "FREE".to_string()
                } else {
                    format!("{:>2}", value)
                };
                if self.marked[row][col] {
                    line.push_str(&format!("[{}] ", cell));
                } else {
                    line.push_str(&format!(" {}  ", cell));
                }
            }
            out.push_str(line.trim_end());
        }
        out
    }
}
