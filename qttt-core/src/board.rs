//! Grid model: symbols, positions, and the copy-on-write board

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{GameError, IllegalReason, ParseError};
use crate::rules::Rules;

/// Number of rows (fixed)
pub const ROWS: usize = 3;

/// Columns without the extra column
pub const BASE_COLS: usize = 3;

// ============================================================================
// CORE TYPES
// ============================================================================

/// Player symbol
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Symbol {
    X,
    O,
}

impl Symbol {
    pub fn opponent(self) -> Self {
        match self {
            Symbol::X => Symbol::O,
            Symbol::O => Symbol::X,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Symbol::X => 'X',
            Symbol::O => 'O',
        }
    }

    /// Symbol code used by the board hash (empty cells count as 0)
    pub(crate) fn code(self) -> u64 {
        match self {
            Symbol::X => 1,
            Symbol::O => 2,
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

impl FromStr for Symbol {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "x" | "X" => Ok(Symbol::X),
            "o" | "O" => Ok(Symbol::O),
            other => Err(ParseError::UnknownSymbol(other.to_string())),
        }
    }
}

/// Cell contents: empty or one symbol
pub type Cell = Option<Symbol>;

/// Grid coordinates, ordered row-major
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Game status derived from a board
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    Playing,
    Won(Symbol),
    Draw,
}

impl Status {
    pub fn is_terminal(self) -> bool {
        self != Status::Playing
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Playing => write!(f, "playing"),
            Status::Won(symbol) => write!(f, "{} won", symbol),
            Status::Draw => write!(f, "draw"),
        }
    }
}

// ============================================================================
// BOARD
// ============================================================================

/// Board state (each move produces a new board)
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "BoardRepr")]
pub struct Board {
    /// Row-major cells, `ROWS * cols` long
    cells: Vec<Cell>,
    cols: usize,
}

/// Unchecked wire form of `Board`
#[derive(Deserialize)]
struct BoardRepr {
    cells: Vec<Cell>,
    cols: usize,
}

impl TryFrom<BoardRepr> for Board {
    type Error = ParseError;

    fn try_from(repr: BoardRepr) -> Result<Self, Self::Error> {
        if !(BASE_COLS..=BASE_COLS + 1).contains(&repr.cols) {
            return Err(ParseError::RowLength {
                row: 0,
                found: repr.cols,
            });
        }
        let expected = ROWS * repr.cols;
        if repr.cells.len() != expected {
            return Err(ParseError::CellCount {
                expected,
                found: repr.cells.len(),
            });
        }
        Ok(Self {
            cells: repr.cells,
            cols: repr.cols,
        })
    }
}

impl Board {
    /// Empty grid sized for the rules
    pub fn empty(rules: &Rules) -> Self {
        let cols = rules.cols();
        Self {
            cells: vec![None; ROWS * cols],
            cols,
        }
    }

    /// Build from row-major rows; all rows must share one length
    pub fn from_rows(rows: &[Vec<Cell>]) -> Result<Self, ParseError> {
        if rows.len() != ROWS {
            return Err(ParseError::RowCount {
                expected: ROWS,
                found: rows.len(),
            });
        }
        let cols = rows[0].len();
        for (row, cells) in rows.iter().enumerate() {
            if cells.len() != cols || !(BASE_COLS..=BASE_COLS + 1).contains(&cells.len()) {
                return Err(ParseError::RowLength {
                    row,
                    found: cells.len(),
                });
            }
        }
        Ok(Self {
            cells: rows.iter().flatten().copied().collect(),
            cols,
        })
    }

    pub fn rows(&self) -> usize {
        ROWS
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Row-major cell slice
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.row < ROWS && pos.col < self.cols
    }

    fn index(&self, pos: Position) -> Option<usize> {
        self.in_bounds(pos).then(|| pos.row * self.cols + pos.col)
    }

    /// Cell at `pos` (None when empty or off the board)
    pub fn get(&self, pos: Position) -> Cell {
        self.index(pos).and_then(|i| self.cells[i])
    }

    pub fn is_empty_at(&self, pos: Position) -> bool {
        self.index(pos).is_some_and(|i| self.cells[i].is_none())
    }

    /// True when no symbol has been placed yet
    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(Option::is_none)
    }

    /// Iterate all positions in row-major order
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..ROWS).flat_map(move |row| (0..self.cols).map(move |col| Position::new(row, col)))
    }

    /// Positions holding `symbol`, row-major
    pub fn positions_of(&self, symbol: Symbol) -> Vec<Position> {
        self.positions()
            .filter(|&pos| self.get(pos) == Some(symbol))
            .collect()
    }

    /// Fails when the board was built for a different column count
    pub fn check_shape(&self, rules: &Rules) -> Result<(), GameError> {
        if self.cols == rules.cols() {
            Ok(())
        } else {
            Err(GameError::BoardShape {
                expected: rules.cols(),
                found: self.cols,
            })
        }
    }

    // ========================================================================
    // RULE QUERIES
    // ========================================================================

    /// Validate a placement, returning the cell index
    fn check_legal(&self, rules: &Rules, pos: Position) -> Result<usize, GameError> {
        let illegal = |reason| GameError::IllegalMove {
            position: pos,
            reason,
        };
        let index = self.index(pos).ok_or(illegal(IllegalReason::OutOfRange))?;
        if !rules.is_playable(pos) {
            return Err(illegal(IllegalReason::CenterDisabled));
        }
        if self.cells[index].is_some() {
            return Err(illegal(IllegalReason::Occupied));
        }
        Ok(index)
    }

    pub fn is_legal_move(&self, rules: &Rules, pos: Position) -> bool {
        self.check_legal(rules, pos).is_ok()
    }

    /// Every empty, rule-legal cell in row-major order
    pub fn available_moves(&self, rules: &Rules) -> Vec<Position> {
        self.positions()
            .filter(|&pos| self.is_legal_move(rules, pos))
            .collect()
    }

    /// Return a new board with `player` placed at `pos`
    pub fn apply_move(
        &self,
        rules: &Rules,
        player: Symbol,
        pos: Position,
    ) -> Result<Board, GameError> {
        let status = self.status(rules);
        if status.is_terminal() {
            return Err(GameError::GameOver(status));
        }
        let index = self.check_legal(rules, pos)?;

        let mut next = self.clone();
        next.cells[index] = Some(player);
        Ok(next)
    }

    /// Same as `apply_move` without the terminal check; used for lookahead
    pub(crate) fn with_placed(&self, player: Symbol, pos: Position) -> Board {
        let mut next = self.clone();
        if let Some(index) = self.index(pos) {
            next.cells[index] = Some(player);
        }
        next
    }

    /// First window filled by one symbol, if any
    pub fn winning_line(&self, rules: &Rules) -> Option<(Symbol, Vec<Position>)> {
        rules.windows().into_iter().find_map(|window| {
            let first = self.get(window[0])?;
            window
                .iter()
                .all(|&pos| self.get(pos) == Some(first))
                .then_some((first, window))
        })
    }

    /// Evaluate win/draw/playing
    pub fn status(&self, rules: &Rules) -> Status {
        if let Some((winner, _)) = self.winning_line(rules) {
            Status::Won(winner)
        } else if self.available_moves(rules).is_empty() {
            Status::Draw
        } else {
            Status::Playing
        }
    }

    /// Text rendering that marks a disabled center with `#`
    pub fn render(&self, rules: &Rules) -> String {
        let mut out = String::new();
        for row in 0..ROWS {
            for col in 0..self.cols {
                let pos = Position::new(row, col);
                let ch = match self.get(pos) {
                    Some(symbol) => symbol.as_char(),
                    None if !rules.is_playable(pos) => '#',
                    None => '.',
                };
                out.push(ch);
            }
            if row + 1 < ROWS {
                out.push('\n');
            }
        }
        out
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (row, cells) in self.cells.chunks(self.cols).enumerate() {
            if row > 0 {
                writeln!(f)?;
            }
            for cell in cells {
                write!(f, "{}", cell.map_or('.', Symbol::as_char))?;
            }
        }
        Ok(())
    }
}

/// Parses rows separated by `/` or newlines, e.g. `"XX./.O./..O"`
impl FromStr for Board {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rows = s
            .split(|c| c == '/' || c == '\n')
            .map(str::trim)
            .filter(|row| !row.is_empty())
            .map(|row| {
                row.chars()
                    .filter(|c| !c.is_whitespace())
                    .map(|c| match c {
                        'x' | 'X' => Ok(Some(Symbol::X)),
                        'o' | 'O' => Ok(Some(Symbol::O)),
                        '.' | '_' | '-' | '#' => Ok(None),
                        other => Err(ParseError::UnknownCell(other)),
                    })
                    .collect::<Result<Vec<Cell>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;
        Board::from_rows(&rows)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn board(s: &str) -> Board {
        s.parse().unwrap()
    }

    #[test]
    fn test_deserialize_checks_cell_count() {
        let short = serde_json::from_str::<Board>(r#"{"cells":[null,null],"cols":3}"#);
        assert!(short.is_err());

        let five_cols = serde_json::from_str::<Board>(&format!(
            r#"{{"cells":{},"cols":5}}"#,
            serde_json::to_string(&vec![None::<Symbol>; 15]).unwrap()
        ));
        assert!(five_cols.is_err());

        let wide = board("X..O/.O../....");
        let json = serde_json::to_string(&wide).unwrap();
        assert_eq!(serde_json::from_str::<Board>(&json).unwrap(), wide);
    }

    #[test]
    fn test_empty_board_dimensions() {
        let classic = Board::empty(&Rules::classic());
        assert_eq!(classic.cells().len(), 9);
        assert!(classic.is_blank());

        let wide = Board::empty(&Rules::wide());
        assert_eq!(wide.cols(), 4);
        assert_eq!(wide.cells().len(), 12);
    }

    #[test]
    fn test_available_moves_row_major() {
        let rules = Rules::classic();
        let b = board("X.O/.X./O..");
        let moves = b.available_moves(&rules);
        assert_eq!(
            moves,
            vec![
                Position::new(0, 1),
                Position::new(1, 0),
                Position::new(1, 2),
                Position::new(2, 1),
                Position::new(2, 2),
            ]
        );
    }

    #[test]
    fn test_available_moves_skip_disabled_center() {
        let rules = Rules::hollow();
        let moves = Board::empty(&rules).available_moves(&rules);
        assert_eq!(moves.len(), 8);
        assert!(!moves.contains(&Position::new(1, 1)));
    }

    #[test]
    fn test_apply_move_is_copy_on_write() {
        let rules = Rules::classic();
        let before = Board::empty(&rules);
        let after = before.apply_move(&rules, Symbol::X, Position::new(0, 0)).unwrap();
        assert!(before.is_blank());
        assert_eq!(after.get(Position::new(0, 0)), Some(Symbol::X));
    }

    #[test]
    fn test_apply_move_rejections() {
        let rules = Rules::hollow();
        let b = board("X../.../...");

        let occupied = b.apply_move(&rules, Symbol::O, Position::new(0, 0));
        assert!(matches!(
            occupied,
            Err(GameError::IllegalMove { reason: IllegalReason::Occupied, .. })
        ));

        let off_board = b.apply_move(&rules, Symbol::O, Position::new(0, 3));
        assert!(matches!(
            off_board,
            Err(GameError::IllegalMove { reason: IllegalReason::OutOfRange, .. })
        ));

        let center = b.apply_move(&rules, Symbol::O, Position::new(1, 1));
        assert!(matches!(
            center,
            Err(GameError::IllegalMove { reason: IllegalReason::CenterDisabled, .. })
        ));
    }

    #[test]
    fn test_apply_move_after_win_fails() {
        let rules = Rules::classic();
        let b = board("XXX/OO./...");
        let result = b.apply_move(&rules, Symbol::O, Position::new(1, 2));
        assert_eq!(result, Err(GameError::GameOver(Status::Won(Symbol::X))));
    }

    #[test]
    fn test_win_detection_round_trip() {
        let rules = Rules::classic();
        for (text, winner) in [
            ("XXX/O.O/...", Symbol::X),
            ("O.X/O.X/O..", Symbol::O),
            ("X.O/.XO/..X", Symbol::X),
            ("X.O/.OX/O..", Symbol::O),
        ] {
            let b = board(text);
            assert_eq!(b.status(&rules), Status::Won(winner), "{}", text);
        }

        // Breaking the run returns the board to playing
        assert_eq!(board("XX./O.O/...").status(&rules), Status::Playing);
    }

    #[test]
    fn test_draw_detection() {
        let rules = Rules::classic();
        assert_eq!(board("XOX/XOO/OXX").status(&rules), Status::Draw);
    }

    #[test]
    fn test_draw_respects_disabled_center() {
        let rules = Rules::hollow();
        assert_eq!(board("XOX/X.O/OXO").status(&rules), Status::Draw);
        assert_eq!(board("XOX/X.O/OXO").status(&Rules::classic()), Status::Playing);
    }

    #[test]
    fn test_wide_board_extra_diagonal() {
        let rules = Rules::wide();
        let b = board(".X../..X./...X");
        assert_eq!(b.status(&rules), Status::Won(Symbol::X));
        let (_, line) = b.winning_line(&rules).unwrap();
        assert_eq!(line, vec![Position::new(0, 1), Position::new(1, 2), Position::new(2, 3)]);
    }

    #[test]
    fn test_short_lines_cannot_win() {
        let rules = Rules {
            win_condition: 4,
            ..Rules::wide()
        };
        // Columns have only 3 cells
        assert_eq!(board("X.../X.../X...").status(&rules), Status::Playing);
        assert_eq!(board("XXXX/O.../O...").status(&rules), Status::Won(Symbol::X));
    }

    #[test]
    fn test_parse_and_display() {
        let b = board("XX./.O./..O");
        assert_eq!(b.to_string(), "XX.\n.O.\n..O");
        assert_eq!(b.render(&Rules::hollow()), "XX.\n.O.\n..O");
        assert_eq!(Board::empty(&Rules::hollow()).render(&Rules::hollow()), "...\n.#.\n...");
        assert!("XX/..".parse::<Board>().is_err());
        assert!("XZ./.../...".parse::<Board>().is_err());
    }
}
