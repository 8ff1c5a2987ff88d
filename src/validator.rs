//! Bingo claim validation
//!
//! A card wins when any full row or any full column has every non-free
//! number drawn. Diagonals and blackout do not count.

use std::collections::HashSet;

use crate::card::{Card, CARD_SIZE, FREE};
use crate::types::Ball;

/// Check a card against the balls drawn so far
pub fn is_winning<'a, I>(card: &Card, drawn: I) -> bool
where
    I: IntoIterator<Item = &'a Ball>,
{
    let drawn: HashSet<u8> = drawn.into_iter().map(|b| b.number()).collect();
    let satisfied = |row: usize, col: usize| {
        let value = card.cell(row, col);
        value == FREE || drawn.contains(&value)
    };

    let any_row = (0..CARD_SIZE).any(|r| (0..CARD_SIZE).all(|c| satisfied(r, c)));
    let any_col = (0..CARD_SIZE).any(|c| (0..CARD_SIZE).all(|r| satisfied(r, c)));

    any_row || any_col
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card() -> Card {
        Card::from_rows([
            [3, 20, 35, 50, 65],
            [7, 16, 31, 46, 61],
            [1, 30, 0, 60, 75],
            [15, 22, 40, 55, 70],
            [9, 25, 44, 49, 68],
        ])
        .unwrap()
    }

    fn balls(numbers: &[u8]) -> Vec<Ball> {
        numbers.iter().map(|&n| Ball::new(n).unwrap()).collect()
    }

    #[test]
    fn test_no_balls_never_wins() {
        assert!(!is_winning(&card(), &balls(&[])));
    }

    #[test]
    fn test_full_row_wins() {
        assert!(is_winning(&card(), &balls(&[3, 20, 35, 50, 65])));
    }

    #[test]
    fn test_row_through_free_cell_wins() {
        assert!(is_winning(&card(), &balls(&[1, 30, 60, 75])));
    }

    #[test]
    fn test_full_column_wins() {
        assert!(is_winning(&card(), &balls(&[20, 16, 30, 22, 25])));
    }

    #[test]
    fn test_column_through_free_cell_wins() {
        assert!(is_winning(&card(), &balls(&[35, 31, 40, 44])));
    }

    #[test]
    fn test_diagonal_does_not_win() {
        assert!(!is_winning(&card(), &balls(&[3, 16, 55, 68])));
    }

    #[test]
    fn test_all_b_column_balls_without_rest_of_row() {
        // Every B ball is out, so column 0 is complete.
        let b_column: Vec<u8> = (1..=15).collect();
        assert!(is_winning(&card(), &balls(&b_column)));

        // Row 0 alone: only 3 drawn among its cells is not enough.
        let row_card = Card::from_rows([
            [3, 20, 35, 50, 65],
            [7, 16, 31, 46, 61],
            [2, 30, 0, 60, 75],
            [15, 22, 40, 55, 70],
            [9, 25, 44, 49, 68],
        ])
        .unwrap();
        assert!(!is_winning(&row_card, &balls(&[3])));
        assert!(!is_winning(&row_card, &balls(&[3, 20, 35, 50])));
        assert!(is_winning(&row_card, &balls(&[3, 20, 35, 50, 65])));
    }

    #[test]
    fn test_one_missing_per_line_does_not_win() {
        // Hole at (r, r+1 mod 5): every row and every column misses exactly
        // one non-free number.
        let c = card();
        let mut drawn = Vec::new();
        for r in 0..CARD_SIZE {
            for col in 0..CARD_SIZE {
                let value = c.cell(r, col);
                if col != (r + 1) % CARD_SIZE && value != FREE {
                    drawn.push(Ball::new(value).unwrap());
                }
            }
        }
        assert!(!is_winning(&c, &drawn));
    }
}
