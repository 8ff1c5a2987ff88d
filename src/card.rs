//! Bingo card definition
//!
//! A 5x5 grid where column `c` holds five distinct numbers from
//! `15c+1 ..= 15c+15` and the center cell is the free space.

use std::str::FromStr;

use rand::seq::index;
use rand::Rng;

use crate::error::CardError;
use crate::types::COLUMN_SPAN;

/// Rows and columns per card
pub const CARD_SIZE: usize = 5;

/// Value stored in the free cell
pub const FREE: u8 = 0;

/// Position of the free cell (row, column)
pub const FREE_CELL: (usize, usize) = (2, 2);

/// Inclusive number range for a card column
pub fn column_range(col: usize) -> std::ops::RangeInclusive<u8> {
    let start = col as u8 * COLUMN_SPAN + 1;
    start..=start + COLUMN_SPAN - 1
}

/// A player's card
///
/// Immutable once issued. Cells are indexed `[row][col]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Card {
    cells: [[u8; CARD_SIZE]; CARD_SIZE],
}

impl Card {
    /// Generate a random card
    ///
    /// Each column samples 5 of its 15 numbers without replacement and fills
    /// them top to bottom; the center is then overwritten with `FREE`.
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut cells = [[FREE; CARD_SIZE]; CARD_SIZE];

        for col in 0..CARD_SIZE {
            let base = *column_range(col).start();
            let picks = index::sample(rng, COLUMN_SPAN as usize, CARD_SIZE);
            for (row, offset) in picks.into_iter().enumerate() {
                cells[row][col] = base + offset as u8;
            }
        }

        cells[FREE_CELL.0][FREE_CELL.1] = FREE;
        Self { cells }
    }

    /// Build a card from explicit rows, checking the card invariant
    pub fn from_rows(cells: [[u8; CARD_SIZE]; CARD_SIZE]) -> Result<Self, CardError> {
        for col in 0..CARD_SIZE {
            let range = column_range(col);
            let mut seen = Vec::with_capacity(CARD_SIZE);
            for (row, line) in cells.iter().enumerate() {
                let value = line[col];
                let is_free_cell = (row, col) == FREE_CELL;
                let valid = if is_free_cell {
                    value == FREE
                } else {
                    range.contains(&value) && !seen.contains(&value)
                };
                if !valid {
                    return Err(CardError::OutOfPlace { row, col, value });
                }
                seen.push(value);
            }
        }
        Ok(Self { cells })
    }

    pub fn cell(&self, row: usize, col: usize) -> u8 {
        self.cells[row][col]
    }

    pub fn rows(&self) -> &[[u8; CARD_SIZE]; CARD_SIZE] {
        &self.cells
    }

    /// Check whether a number appears anywhere on the card
    pub fn contains(&self, number: u8) -> bool {
        number != FREE && self.cells.iter().flatten().any(|&v| v == number)
    }
}

/// Wire serialization: row-major, cells joined by `,`, rows by `;`
impl std::fmt::Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (r, row) in self.cells.iter().enumerate() {
            if r > 0 {
                f.write_str(";")?;
            }
            for (c, value) in row.iter().enumerate() {
                if c > 0 {
                    f.write_str(",")?;
                }
                write!(f, "{}", value)?;
            }
        }
        Ok(())
    }
}

impl FromStr for Card {
    type Err = CardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rows: Vec<&str> = s.trim().split(';').collect();
        if rows.len() != CARD_SIZE {
            return Err(CardError::Shape(s.to_string()));
        }

        let mut cells = [[FREE; CARD_SIZE]; CARD_SIZE];
        for (r, row) in rows.iter().enumerate() {
            let values: Vec<&str> = row.split(',').collect();
            if values.len() != CARD_SIZE {
                return Err(CardError::Shape(s.to_string()));
            }
            for (c, value) in values.iter().enumerate() {
                cells[r][c] = value
                    .trim()
                    .parse()
                    .map_err(|_| CardError::Cell(value.to_string()))?;
            }
        }

        Card::from_rows(cells)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn sample_rows() -> [[u8; 5]; 5] {
        [
            [3, 20, 35, 50, 65],
            [7, 16, 31, 46, 61],
            [1, 30, 0, 60, 75],
            [15, 22, 40, 55, 70],
            [9, 25, 44, 49, 68],
        ]
    }

    #[test]
    fn test_generated_card_invariant() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let card = Card::generate(&mut rng);
            assert_eq!(card.cell(2, 2), FREE);
            // from_rows re-checks ranges and distinctness
            assert_eq!(Card::from_rows(*card.rows()).unwrap(), card);
        }
    }

    #[test]
    fn test_generated_columns_in_range() {
        let card = Card::generate(&mut rand::thread_rng());
        for col in 0..CARD_SIZE {
            let range = column_range(col);
            for row in 0..CARD_SIZE {
                if (row, col) != FREE_CELL {
                    assert!(range.contains(&card.cell(row, col)));
                }
            }
        }
    }

    #[test]
    fn test_column_ranges() {
        assert_eq!(column_range(0), 1..=15);
        assert_eq!(column_range(2), 31..=45);
        assert_eq!(column_range(4), 61..=75);
    }

    #[test]
    fn test_serialize_format() {
        let card = Card::from_rows(sample_rows()).unwrap();
        assert_eq!(
            card.to_string(),
            "3,20,35,50,65;7,16,31,46,61;1,30,0,60,75;15,22,40,55,70;9,25,44,49,68"
        );
    }

    #[test]
    fn test_serialize_parse_preserves_cells() {
        let mut rng = StdRng::seed_from_u64(42);
        let card = Card::generate(&mut rng);
        let parsed: Card = card.to_string().parse().unwrap();
        assert_eq!(parsed, card);
    }

    #[test]
    fn test_parse_rejects_bad_shape() {
        assert!(matches!("1,2,3".parse::<Card>(), Err(CardError::Shape(_))));
        assert!(matches!(
            "1,2;3;4;5;6".parse::<Card>(),
            Err(CardError::Shape(_))
        ));
    }

    #[test]
    fn test_parse_rejects_non_numeric() {
        let text = "x,20,35,50,65;7,16,31,46,61;1,30,0,60,75;15,22,40,55,70;9,25,44,49,68";
        assert!(matches!(text.parse::<Card>(), Err(CardError::Cell(_))));
    }

    #[test]
    fn test_from_rows_rejects_duplicates_and_misplaced_free() {
        let mut rows = sample_rows();
        rows[1][0] = 3;
        assert!(Card::from_rows(rows).is_err());

        let mut rows = sample_rows();
        rows[2][2] = 33;
        assert!(Card::from_rows(rows).is_err());

        let mut rows = sample_rows();
        rows[0][0] = FREE;
        assert!(Card::from_rows(rows).is_err());
    }

    #[test]
    fn test_contains() {
        let card = Card::from_rows(sample_rows()).unwrap();
        assert!(card.contains(35));
        assert!(!card.contains(2));
        assert!(!card.contains(FREE));
    }
}
