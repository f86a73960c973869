//! Rules - board layout and win configuration

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::board::{Position, BASE_COLS, ROWS};
use crate::error::RulesError;

/// Rule configuration (immutable for a game)
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Rules {
    pub name: String,
    /// Run length needed to win
    pub win_condition: usize,
    /// Whether the center cell may be played
    pub center_enabled: bool,
    /// Adds a fourth column on the right
    pub extra_column: bool,
    /// Reserved, no-op: lines never wrap around edges
    pub wrap_edges: bool,
    /// Reserved, no-op: occupied cells are never replayable
    pub allow_move_reuse: bool,
}

impl Default for Rules {
    fn default() -> Self {
        Self::classic()
    }
}

impl Rules {
    // ========================================================================
    // PRESETS
    // ========================================================================

    /// Standard 3x3, three in a row
    pub fn classic() -> Self {
        Self {
            name: "classic".to_string(),
            win_condition: 3,
            center_enabled: true,
            extra_column: false,
            wrap_edges: false,
            allow_move_reuse: false,
        }
    }

    /// 3x4 board with the extra column on the right
    pub fn wide() -> Self {
        Self {
            name: "wide".to_string(),
            extra_column: true,
            ..Self::classic()
        }
    }

    /// 3x3 with the center cell removed
    pub fn hollow() -> Self {
        Self {
            name: "hollow".to_string(),
            center_enabled: false,
            ..Self::classic()
        }
    }

    pub fn presets() -> Vec<Rules> {
        vec![Self::classic(), Self::wide(), Self::hollow()]
    }

    pub fn by_name(name: &str) -> Result<Self, RulesError> {
        Self::presets()
            .into_iter()
            .find(|rules| rules.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| RulesError::UnknownPreset(name.to_string()))
    }

    // ========================================================================
    // GEOMETRY
    // ========================================================================

    pub fn rows(&self) -> usize {
        ROWS
    }

    pub fn cols(&self) -> usize {
        if self.extra_column {
            BASE_COLS + 1
        } else {
            BASE_COLS
        }
    }

    /// Center of the base 3x3 grid; the extra column does not shift it
    pub fn center(&self) -> Position {
        Position::new(ROWS / 2, BASE_COLS / 2)
    }

    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.row < ROWS && pos.col < self.cols()
    }

    /// In bounds and not a disabled center
    pub fn is_playable(&self, pos: Position) -> bool {
        self.in_bounds(pos) && (self.center_enabled || pos != self.center())
    }

    /// Corners in row-major order
    pub fn corners(&self) -> [Position; 4] {
        let last_row = ROWS - 1;
        let last_col = self.cols() - 1;
        [
            Position::new(0, 0),
            Position::new(0, last_col),
            Position::new(last_row, 0),
            Position::new(last_row, last_col),
        ]
    }

    /// Border cells that are not corners, row-major
    pub fn edges(&self) -> Vec<Position> {
        let corners = self.corners();
        let last_row = ROWS - 1;
        let last_col = self.cols() - 1;
        (0..ROWS)
            .flat_map(|row| (0..self.cols()).map(move |col| Position::new(row, col)))
            .filter(|pos| {
                let border =
                    pos.row == 0 || pos.row == last_row || pos.col == 0 || pos.col == last_col;
                border && !corners.contains(pos)
            })
            .collect()
    }

    pub fn is_corner(&self, pos: Position) -> bool {
        self.corners().contains(&pos)
    }

    pub fn is_edge(&self, pos: Position) -> bool {
        self.in_bounds(pos) && self.edges().contains(&pos)
    }

    /// Point reflection through the board center
    pub fn mirror(&self, pos: Position) -> Option<Position> {
        self.in_bounds(pos)
            .then(|| Position::new(ROWS - 1 - pos.row, self.cols() - 1 - pos.col))
    }

    /// All rows, columns and diagonals long enough to hold a win
    pub fn lines(&self) -> Vec<Vec<Position>> {
        let rows = ROWS as isize;
        let cols = self.cols() as isize;
        let mut lines = Vec::new();

        for r in 0..rows {
            lines.push(walk(r, 0, 0, 1, rows, cols));
        }
        for c in 0..cols {
            lines.push(walk(0, c, 1, 0, rows, cols));
        }
        // Down-right diagonals: start on the top row, then down the left column
        for c in 0..cols {
            lines.push(walk(0, c, 1, 1, rows, cols));
        }
        for r in 1..rows {
            lines.push(walk(r, 0, 1, 1, rows, cols));
        }
        // Down-left diagonals: top row, then down the right column
        for c in 0..cols {
            lines.push(walk(0, c, 1, -1, rows, cols));
        }
        for r in 1..rows {
            lines.push(walk(r, cols - 1, 1, -1, rows, cols));
        }

        lines.retain(|line| line.len() >= self.win_condition.max(1));
        lines
    }

    /// Every `win_condition`-long slice of every line
    pub fn windows(&self) -> Vec<Vec<Position>> {
        let size = self.win_condition.max(1);
        self.lines()
            .iter()
            .flat_map(|line| line.windows(size).map(<[Position]>::to_vec))
            .collect()
    }

    // ========================================================================
    // VALIDATION & PERSISTENCE
    // ========================================================================

    pub fn validate(&self) -> Result<(), RulesError> {
        let max = ROWS.max(self.cols());
        if self.win_condition == 0 || self.win_condition > max {
            return Err(RulesError::WinCondition {
                win_condition: self.win_condition,
                max,
            });
        }
        if self.wrap_edges {
            tracing::warn!("rules '{}': wrap_edges is reserved and has no effect", self.name);
        }
        if self.allow_move_reuse {
            tracing::warn!("rules '{}': allow_move_reuse is reserved and has no effect", self.name);
        }
        Ok(())
    }

    /// Load from JSON file and validate
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read rules file: {}", path.display()))?;
        let rules: Rules = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse rules file: {}", path.display()))?;
        rules.validate()?;
        Ok(rules)
    }

    /// Save to JSON file
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

/// Collect positions from a start cell along a direction until off the grid
fn walk(
    mut r: isize,
    mut c: isize,
    dr: isize,
    dc: isize,
    rows: isize,
    cols: isize,
) -> Vec<Position> {
    let mut line = Vec::new();
    while r >= 0 && r < rows && c >= 0 && c < cols {
        line.push(Position::new(r as usize, c as usize));
        r += dr;
        c += dc;
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classic_lines() {
        let rules = Rules::classic();
        // 3 rows, 3 cols, 2 full diagonals
        assert_eq!(rules.lines().len(), 8);
        assert_eq!(rules.windows().len(), 8);
    }

    #[test]
    fn test_wide_windows() {
        let rules = Rules::wide();
        // rows give 2 windows each, 4 columns, 2 diagonals per direction
        assert_eq!(rules.windows().len(), 3 * 2 + 4 + 2 + 2);
    }

    #[test]
    fn test_geometry_helpers() {
        let rules = Rules::wide();
        assert_eq!(rules.center(), Position::new(1, 1));
        assert!(rules.is_corner(Position::new(2, 3)));
        assert!(rules.is_edge(Position::new(1, 3)));
        assert!(!rules.is_edge(Position::new(1, 2)));
        assert!(!rules.is_corner(Position::new(1, 2)));
        assert_eq!(rules.mirror(Position::new(0, 0)), Some(Position::new(2, 3)));
        assert_eq!(Rules::classic().mirror(Position::new(0, 1)), Some(Position::new(2, 1)));
    }

    #[test]
    fn test_hollow_center_not_playable() {
        let rules = Rules::hollow();
        assert!(!rules.is_playable(rules.center()));
        assert!(rules.is_playable(Position::new(0, 0)));
    }

    #[test]
    fn test_validate() {
        assert!(Rules::classic().validate().is_ok());
        let bad = Rules {
            win_condition: 5,
            ..Rules::wide()
        };
        assert_eq!(
            bad.validate(),
            Err(RulesError::WinCondition { win_condition: 5, max: 4 })
        );
    }

    #[test]
    fn test_by_name() {
        assert_eq!(Rules::by_name("WIDE").unwrap(), Rules::wide());
        assert!(Rules::by_name("spiral").is_err());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rules.json");
        Rules::hollow().save(&path).unwrap();
        assert_eq!(Rules::load(&path).unwrap(), Rules::hollow());
    }

    #[test]
    fn test_load_rejects_unknown_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rules.json");
        std::fs::write(&path, r#"{"win_condition": 3, "gravity": true}"#).unwrap();
        assert!(Rules::load(&path).is_err());
    }
}
