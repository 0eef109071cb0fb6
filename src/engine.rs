//! Core board model for the sliding tile puzzle.
//!
//! This module defines the puzzle's fundamental components:
//! - `Board`: An immutable snapshot of tile positions. Equality and hashing are by
//!   full grid content, so boards are used directly as visited-set keys.
//! - `Direction`: The four orthogonal directions the blank can move in.
//! - `Game`: An interactive play session with a step counter and an undo history.
use crate::error::{Error, Result};
use std::fmt;

/// The value that denotes the blank cell.
pub const BLANK: u16 = 0;

/// Largest supported board width. Tile values are `u16`, so a board holds at most
/// `u16::MAX + 1` cells.
pub const MAX_SIZE: usize = 256;

/// Fails with `Error::InvalidSize` unless `1 <= size <= MAX_SIZE`.
pub fn check_size(size: usize) -> Result<()> {
    if size == 0 || size > MAX_SIZE {
        return Err(Error::InvalidSize {
            size,
            max: MAX_SIZE,
        });
    }
    Ok(())
}

/// One of the four orthogonal directions the blank cell can slide towards.
///
/// The direction always describes the movement of the blank, not of the tile
/// that ends up being displaced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// All directions in successor generation order.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Returns the `(row, column)` delta of moving the blank in this direction.
    pub fn offset(&self) -> (isize, isize) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }

    /// Returns the direction that undoes this one.
    pub fn opposite(&self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Direction::Up => "Up",
            Direction::Down => "Down",
            Direction::Left => "Left",
            Direction::Right => "Right",
        };
        write!(f, "{}", s)
    }
}

/// Represents a square puzzle grid of the values `0..size*size`, `0` being the blank.
///
/// A `Board` is never mutated after construction. Moves produce new boards
/// (see [`Board::swap`] and [`Board::slide_blank`]). Tiles are stored flattened in
/// row-major order.
///
/// # Examples
/// ```
/// use npuzzle_solver::engine::Board;
///
/// let board = Board::new(vec![vec![1, 2, 3], vec![4, 0, 6], vec![7, 5, 8]]).unwrap();
/// assert_eq!(board.size(), 3);
/// assert_eq!(board.blank_position(), (1, 1));
/// assert_ne!(board, Board::goal(3));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Board {
    size: usize,
    tiles: Vec<u16>,
    blank: usize,
}

impl Board {
    /// Creates a board from a grid given as rows.
    ///
    /// # Arguments
    /// * `rows`: The rows of the grid, top to bottom.
    ///
    /// # Returns
    /// * `Ok(Board)` if the grid is square and holds every value of `0..size*size` exactly once.
    /// * `Err(Error::InvalidBoardShape)` if the grid is empty or not square.
    /// * `Err(Error::InvalidTileSet)` if a value is out of range or duplicated.
    pub fn new(rows: Vec<Vec<u16>>) -> Result<Self> {
        let size = rows.len();
        if size == 0 {
            return Err(Error::InvalidBoardShape {
                row: 0,
                expected: 1,
                got: 0,
            });
        }
        for (r, row) in rows.iter().enumerate() {
            if row.len() != size {
                return Err(Error::InvalidBoardShape {
                    row: r,
                    expected: size,
                    got: row.len(),
                });
            }
        }
        Self::from_tiles(size, rows.into_iter().flatten().collect())
    }

    /// Creates a board of the given `size` from tiles flattened in row-major order.
    ///
    /// # Returns
    /// * `Err(Error::InvalidSize)` if `size` is zero or above [`MAX_SIZE`].
    /// * `Err(Error::InvalidTileCount)` if `tiles` does not hold `size*size` values.
    /// * `Err(Error::InvalidTileSet)` if a value is out of range or duplicated.
    pub fn from_tiles(size: usize, tiles: Vec<u16>) -> Result<Self> {
        check_size(size)?;
        let cell_count = size * size;
        if tiles.len() != cell_count {
            return Err(Error::InvalidTileCount {
                size,
                expected: cell_count,
                got: tiles.len(),
            });
        }

        let mut seen = vec![false; cell_count];
        for &value in &tiles {
            let slot = seen.get_mut(value as usize);
            match slot {
                Some(flag) if !*flag => *flag = true,
                _ => {
                    return Err(Error::InvalidTileSet {
                        size,
                        max: cell_count,
                        value,
                    })
                }
            }
        }

        // Every value is present exactly once, so the blank exists.
        let blank = tiles.iter().position(|&v| v == BLANK).unwrap_or_default();
        Ok(Board { size, tiles, blank })
    }

    /// Creates the canonical goal board: `1..size*size-1` left-to-right, top-to-bottom,
    /// with the blank in the bottom-right corner.
    ///
    /// # Returns
    /// * `Err(Error::InvalidSize)` if `size` is zero or above [`MAX_SIZE`].
    ///
    /// # Examples
    /// ```
    /// use npuzzle_solver::engine::{Board, MAX_SIZE};
    /// let goal = Board::try_goal(3).unwrap();
    /// assert_eq!(goal.tiles(), &[1, 2, 3, 4, 5, 6, 7, 8, 0]);
    /// assert!(Board::try_goal(MAX_SIZE + 1).is_err());
    /// ```
    pub fn try_goal(size: usize) -> Result<Self> {
        check_size(size)?;
        let cell_count = size * size;
        let last = u16::try_from(cell_count - 1).map_err(|_| Error::InvalidSize {
            size,
            max: MAX_SIZE,
        })?;
        let mut tiles: Vec<u16> = (1..=last).collect();
        tiles.push(BLANK);
        Ok(Board {
            size,
            tiles,
            blank: cell_count - 1,
        })
    }

    /// Same as [`Board::try_goal`] for a width already known to be valid.
    ///
    /// # Panics
    /// Panics if `size` is zero or above [`MAX_SIZE`].
    ///
    /// # Examples
    /// ```
    /// use npuzzle_solver::engine::Board;
    /// assert_eq!(Board::goal(2).tiles(), &[1, 2, 3, 0]);
    /// ```
    pub fn goal(size: usize) -> Self {
        match Self::try_goal(size) {
            Ok(board) => board,
            Err(e) => panic!("{}", e),
        }
    }

    /// Returns the width (and height) of the board.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns the tiles flattened in row-major order.
    pub fn tiles(&self) -> &[u16] {
        &self.tiles
    }

    /// Returns the grid as a vector of rows.
    pub fn to_rows(&self) -> Vec<Vec<u16>> {
        self.tiles.chunks(self.size).map(<[u16]>::to_vec).collect()
    }

    /// Returns the tile at row `r` and column `c`.
    ///
    /// # Panics
    /// Panics if `r` or `c` are outside the board.
    pub fn get_tile(&self, r: usize, c: usize) -> u16 {
        assert!(r < self.size && c < self.size, "({}, {}) is off the board", r, c);
        self.tiles[r * self.size + c]
    }

    /// Returns the `(row, column)` coordinates of the blank cell.
    pub fn blank_position(&self) -> (usize, usize) {
        (self.blank / self.size, self.blank % self.size)
    }

    /// Returns the `(row, column)` coordinates of `value`, or `None` if the value
    /// is not on this board.
    pub fn position_of(&self, value: u16) -> Option<(usize, usize)> {
        self.tiles
            .iter()
            .position(|&v| v == value)
            .map(|idx| (idx / self.size, idx % self.size))
    }

    /// Returns a new board with the cells at `a` and `b` exchanged. `self` is left untouched.
    ///
    /// Swapping two arbitrary cells can produce a board outside the blank's reachable set;
    /// successor generation only ever swaps the blank with an orthogonal neighbour.
    ///
    /// # Panics
    /// Panics if either coordinate is outside the board.
    pub fn swap(&self, a: (usize, usize), b: (usize, usize)) -> Board {
        let ia = a.0 * self.size + a.1;
        let ib = b.0 * self.size + b.1;
        let mut tiles = self.tiles.clone();
        tiles.swap(ia, ib);
        let blank = if self.blank == ia {
            ib
        } else if self.blank == ib {
            ia
        } else {
            self.blank
        };
        Board {
            size: self.size,
            tiles,
            blank,
        }
    }

    /// Returns the cell the blank would move into when sliding in `direction`,
    /// or `None` if that cell is off the board.
    pub fn blank_neighbor(&self, direction: Direction) -> Option<(usize, usize)> {
        let (r, c) = self.blank_position();
        let (dr, dc) = direction.offset();
        let nr = r.checked_add_signed(dr)?;
        let nc = c.checked_add_signed(dc)?;
        if nr < self.size && nc < self.size {
            Some((nr, nc))
        } else {
            None
        }
    }

    /// Returns the board obtained by sliding the blank one cell in `direction`,
    /// or `None` if the move would leave the grid.
    pub fn slide_blank(&self, direction: Direction) -> Option<Board> {
        let target = self.blank_neighbor(direction)?;
        Some(self.swap(self.blank_position(), target))
    }

    /// Returns `true` if `other` can be reached from `self` with exactly one legal move.
    pub fn is_one_move_from(&self, other: &Board) -> bool {
        self.size == other.size
            && Direction::ALL
                .iter()
                .filter_map(|&dir| self.slide_blank(dir))
                .any(|next| &next == other)
    }
}

impl fmt::Display for Board {
    /// Renders the board as a bordered grid with the blank shown as an empty cell.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cell_width = (self.tiles.len().saturating_sub(1)).to_string().len().max(2);
        let border = "-".repeat(self.size * (cell_width + 2) + 1);
        writeln!(f, "{}", border)?;
        for row in self.tiles.chunks(self.size) {
            for &value in row {
                if value == BLANK {
                    write!(f, "|{:>w$} ", "", w = cell_width)?;
                } else {
                    write!(f, "|{:>w$} ", value, w = cell_width)?;
                }
            }
            writeln!(f, "|")?;
        }
        write!(f, "{}", border)
    }
}

/// Manages an interactive play session on a single board.
///
/// The session keeps every board it has been in, so moves can be undone back to
/// the starting position.
///
/// # Examples
/// ```
/// use npuzzle_solver::engine::{Board, Direction, Game};
///
/// let start = Board::new(vec![vec![1, 2, 3], vec![4, 5, 6], vec![7, 0, 8]]).unwrap();
/// let mut game = Game::new_with_board(start);
/// assert!(!game.is_solved());
/// assert!(game.process_move(Direction::Right));
/// assert!(game.is_solved());
/// assert_eq!(game.steps(), 1);
/// ```
#[derive(Clone, Debug)]
pub struct Game {
    board: Board,
    goal: Board,
    steps: u32,
    history: Vec<Board>,
}

impl Game {
    /// Creates a session on `initial_board` targeting the canonical goal of the same size.
    pub fn new_with_board(initial_board: Board) -> Self {
        let goal = Board::goal(initial_board.size());
        Game {
            board: initial_board,
            goal,
            steps: 0,
            history: Vec::new(),
        }
    }

    /// Returns the current board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the goal this session is played towards.
    pub fn goal(&self) -> &Board {
        &self.goal
    }

    /// Returns the number of moves currently applied (undone moves are not counted).
    pub fn steps(&self) -> u32 {
        self.steps
    }

    /// Slides the blank in `direction`.
    ///
    /// # Returns
    /// * `true` if the move was legal and has been applied.
    /// * `false` if the blank is on the edge in that direction. The board is unchanged.
    pub fn process_move(&mut self, direction: Direction) -> bool {
        match self.board.slide_blank(direction) {
            Some(next) => {
                let previous = std::mem::replace(&mut self.board, next);
                self.history.push(previous);
                self.steps += 1;
                true
            }
            None => false,
        }
    }

    /// Reverts the last applied move.
    ///
    /// # Returns
    /// `false` if no move has been made yet.
    pub fn undo_last_move(&mut self) -> bool {
        match self.history.pop() {
            Some(previous) => {
                self.board = previous;
                self.steps -= 1;
                true
            }
            None => false,
        }
    }

    /// Returns `true` once the board matches the goal.
    pub fn is_solved(&self) -> bool {
        self.board == self.goal
    }
}
