use crate::engine::{Board, BLANK};
use crate::error::{Error, Result};
use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;

/// Parses an array of row strings into a `Board`.
///
/// Each string is one row, top to bottom, holding whitespace- or comma-separated tile
/// values. The blank may be written as `0`, `_` or `.`.
///
/// # Arguments
/// * `s`: The rows of the board.
///
/// # Returns
/// * `Ok(Board)` if every token parses and the grid is a valid board (see [`Board::new`]).
/// * `Err(Error::Parse)` if a token is not a tile value.
/// * Any error of [`Board::new`] if the grid is not square or not a permutation.
///
/// # Examples
/// ```
/// use npuzzle_solver::utils::board_from_str_array;
///
/// let board = board_from_str_array(&["1 2 3", "4 _ 6", "7 5 8"]).unwrap();
/// assert_eq!(board.blank_position(), (1, 1));
/// assert!(board_from_str_array(&["1 2", "3 x"]).is_err());
/// ```
pub fn board_from_str_array(s: &[&str]) -> Result<Board> {
    let mut rows = Vec::with_capacity(s.len());
    for (r, row_str) in s.iter().enumerate() {
        let row = row_str
            .split(|ch: char| ch.is_whitespace() || ch == ',')
            .filter(|token| !token.is_empty())
            .map(|token| match token {
                "_" | "." => Ok(BLANK),
                _ => token.parse::<u16>().map_err(|_| Error::Parse {
                    row: r,
                    token: token.to_string(),
                }),
            })
            .collect::<Result<Vec<u16>>>()?;
        rows.push(row);
    }
    Board::new(rows)
}

/// Parses a whole board file. Blank lines and lines starting with `#` are skipped.
pub fn board_from_text(content: &str) -> Result<Board> {
    let lines: Vec<&str> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .collect();
    board_from_str_array(&lines)
}

/// Counts pairs `(i, j)` with `i < j`, both tiles non-blank and `tiles[i] > tiles[j]`.
pub fn count_inversions(tiles: &[u16]) -> usize {
    tiles
        .iter()
        .enumerate()
        .filter(|&(_, &value)| value != BLANK)
        .map(|(i, &value)| {
            tiles[i + 1..]
                .iter()
                .filter(|&&next| next != BLANK && next < value)
                .count()
        })
        .sum()
}

/// Decides whether the flattened board `tiles` of width `size` can reach the canonical
/// goal (blank in the bottom-right corner).
///
/// For odd widths the board is solvable iff the inversion count is even. For even
/// widths a vertical move also changes the blank's row, so the board is solvable iff
/// `inversions + blank_row` is odd, `blank_row` counted from the top starting at 0.
///
/// # Examples
/// ```
/// use npuzzle_solver::utils::is_solvable;
/// assert!(is_solvable(&[1, 2, 3, 4, 0, 6, 7, 5, 8], 3));
/// assert!(!is_solvable(&[8, 1, 2, 0, 4, 3, 7, 6, 5], 3));
/// ```
pub fn is_solvable(tiles: &[u16], size: usize) -> bool {
    let inversions = count_inversions(tiles);
    if size % 2 == 1 {
        inversions % 2 == 0
    } else {
        let blank_row = tiles.iter().position(|&v| v == BLANK).unwrap_or_default() / size;
        (inversions + blank_row) % 2 == 1
    }
}

/// Convenience wrapper of [`is_solvable`] for a `Board`.
pub fn is_board_solvable(board: &Board) -> bool {
    is_solvable(board.tiles(), board.size())
}

/// Draws a uniformly shuffled board of width `size`. The result may be unsolvable.
///
/// # Returns
/// * `Err(Error::InvalidSize)` if `size` is zero or above [`crate::engine::MAX_SIZE`].
pub fn random_board(size: usize, rng: &mut impl Rng) -> Result<Board> {
    let mut tiles = Board::try_goal(size)?.tiles().to_vec();
    tiles.shuffle(rng);
    Board::from_tiles(size, tiles)
}

/// Draws shuffled boards until one is solvable, discarding the others.
///
/// The same `rng` state always produces the same board, so seeded generators give
/// reproducible experiments.
///
/// # Returns
/// * `Err(Error::InvalidSize)` if `size` is zero or above [`crate::engine::MAX_SIZE`].
pub fn random_solvable_board(size: usize, rng: &mut impl Rng) -> Result<Board> {
    let mut rejected = 0usize;
    loop {
        let board = random_board(size, rng)?;
        if is_board_solvable(&board) {
            if rejected > 0 {
                debug!("Rejected {} unsolvable draws before a solvable board", rejected);
            }
            return Ok(board);
        }
        rejected += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{Direction, MAX_SIZE};
    use proptest::prelude::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn test_board_from_str_array_valid() {
        let board = board_from_str_array(&["1 2 3", "4,0,6", "7  5 8"]).unwrap();
        assert_eq!(board.to_rows(), vec![vec![1, 2, 3], vec![4, 0, 6], vec![7, 5, 8]]);
    }

    #[test]
    fn test_board_from_str_array_invalid_token() {
        let result = board_from_str_array(&["1 2 3", "4 X 6", "7 5 8"]);
        assert!(matches!(result, Err(Error::Parse { row: 1, ref token }) if token == "X"));
    }

    #[test]
    fn test_board_from_str_array_rejects_bad_grids() {
        assert!(matches!(
            board_from_str_array(&["1 2 3", "4 0 6"]),
            Err(Error::InvalidBoardShape { .. })
        ));
        assert!(matches!(
            board_from_str_array(&["1 2", "2 0"]),
            Err(Error::InvalidTileSet { .. })
        ));
        assert!(board_from_str_array(&[]).is_err());
    }

    #[test]
    fn test_board_from_text_skips_comments_and_blank_lines() {
        let text = "# sample\n\n 1 2 3\n4 0 6\n\n7 5 8\n";
        let board = board_from_text(text).unwrap();
        assert_eq!(board.blank_position(), (1, 1));
    }

    #[test]
    fn test_count_inversions() {
        assert_eq!(count_inversions(&[1, 2, 3, 4, 5, 6, 7, 8, 0]), 0);
        assert_eq!(count_inversions(&[1, 2, 3, 4, 0, 6, 7, 5, 8]), 2);
        // 8 precedes seven smaller tiles, 4 precedes 3, 7 precedes 6 and 5, 6 precedes 5.
        assert_eq!(count_inversions(&[8, 1, 2, 0, 4, 3, 7, 6, 5]), 7 + 1 + 2 + 1);
    }

    #[test]
    fn test_known_solvable_and_unsolvable_instances() {
        assert!(is_solvable(&[1, 2, 3, 4, 0, 6, 7, 5, 8], 3));
        assert!(!is_solvable(&[8, 1, 2, 0, 4, 3, 7, 6, 5], 3));
        assert!(is_board_solvable(&Board::goal(3)));
    }

    #[test]
    fn test_even_width_solvability() {
        assert!(is_board_solvable(&Board::goal(4)));
        assert!(is_board_solvable(&Board::goal(2)));
        // Swapping two tiles of the goal flips the parity.
        let swapped = Board::goal(4).swap((0, 0), (0, 1));
        assert!(!is_board_solvable(&swapped));
        // Moving the blank up one row keeps the board solvable.
        let up = Board::goal(4).slide_blank(Direction::Up).unwrap();
        assert!(is_board_solvable(&up));
    }

    #[test]
    fn test_random_solvable_board_is_seeded() {
        let a = random_solvable_board(3, &mut SmallRng::seed_from_u64(7)).unwrap();
        let b = random_solvable_board(3, &mut SmallRng::seed_from_u64(7)).unwrap();
        assert_eq!(a, b);
        assert!(is_board_solvable(&a));
    }

    #[test]
    fn test_random_board_rejects_unsupported_sizes() {
        let mut rng = SmallRng::seed_from_u64(1);
        assert!(matches!(
            random_board(MAX_SIZE + 1, &mut rng),
            Err(Error::InvalidSize { size: 257, .. })
        ));
        assert!(matches!(
            random_solvable_board(0, &mut rng),
            Err(Error::InvalidSize { size: 0, .. })
        ));
    }

    proptest! {
        #[test]
        fn prop_legal_moves_preserve_solvability(
            size in 2usize..=5,
            seed in any::<u64>(),
            moves in proptest::collection::vec(0usize..4, 0..40),
        ) {
            let mut rng = SmallRng::seed_from_u64(seed);
            let mut board = random_solvable_board(size, &mut rng).unwrap();
            for m in moves {
                if let Some(next) = board.slide_blank(Direction::ALL[m]) {
                    board = next;
                }
                prop_assert!(is_board_solvable(&board));
            }
        }

        #[test]
        fn prop_random_board_is_a_permutation(size in 1usize..=6, seed in any::<u64>()) {
            let mut rng = SmallRng::seed_from_u64(seed);
            let board = random_board(size, &mut rng).unwrap();
            let mut tiles = board.tiles().to_vec();
            tiles.sort_unstable();
            prop_assert_eq!(tiles, (0..(size * size) as u16).collect::<Vec<_>>());
        }
    }
}
