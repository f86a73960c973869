//! Line patterns shared by the strategies
//!
//! All results are in row-major order so "first" is reproducible.

use crate::board::{Board, Position, Symbol};
use crate::rules::Rules;

/// True if placing `player` at `pos` fills a whole window
pub fn completes_window(board: &Board, rules: &Rules, player: Symbol, pos: Position) -> bool {
    let placed = board.with_placed(player, pos);
    rules
        .windows()
        .iter()
        .filter(|window| window.contains(&pos))
        .any(|window| window.iter().all(|&p| placed.get(p) == Some(player)))
}

/// Available cells that win immediately for `player`
pub fn winning_moves(board: &Board, rules: &Rules, player: Symbol) -> Vec<Position> {
    board
        .available_moves(rules)
        .into_iter()
        .filter(|&pos| completes_window(board, rules, player, pos))
        .collect()
}

/// Distinct completion cells created by placing `player` at `pos`
///
/// A window through `pos` counts when, after the placement, it holds
/// `win_condition - 1` of `player` and one empty playable cell.
pub fn threat_count(board: &Board, rules: &Rules, player: Symbol, pos: Position) -> usize {
    let placed = board.with_placed(player, pos);
    let needed = rules.win_condition.saturating_sub(1);
    let mut completions: Vec<Position> = Vec::new();

    for window in rules.windows().iter().filter(|w| w.contains(&pos)) {
        let mut own = 0;
        let mut empty = None;
        let mut blocked = false;
        for &p in window {
            match placed.get(p) {
                Some(s) if s == player => own += 1,
                Some(_) => blocked = true,
                None if empty.is_none() && rules.is_playable(p) => empty = Some(p),
                None => blocked = true,
            }
        }
        if let (false, Some(completion)) = (blocked, empty) {
            if own == needed && !completions.contains(&completion) {
                completions.push(completion);
            }
        }
    }

    completions.len()
}

/// Available cells that create two or more threats at once
pub fn fork_moves(board: &Board, rules: &Rules, player: Symbol) -> Vec<Position> {
    board
        .available_moves(rules)
        .into_iter()
        .filter(|&pos| threat_count(board, rules, player, pos) >= 2)
        .collect()
}

/// First available cell that sets up at least one threat
pub fn first_opportunity(board: &Board, rules: &Rules, player: Symbol) -> Option<Position> {
    board
        .available_moves(rules)
        .into_iter()
        .find(|&pos| threat_count(board, rules, player, pos) >= 1)
}

/// Center, when it is free and legal
pub fn free_center(board: &Board, rules: &Rules) -> Option<Position> {
    let center = rules.center();
    board.is_legal_move(rules, center).then_some(center)
}

pub fn first_free_corner(board: &Board, rules: &Rules) -> Option<Position> {
    rules
        .corners()
        .into_iter()
        .find(|&pos| board.is_legal_move(rules, pos))
}

pub fn first_free_edge(board: &Board, rules: &Rules) -> Option<Position> {
    rules
        .edges()
        .into_iter()
        .find(|&pos| board.is_legal_move(rules, pos))
}

/// Reflection of the opponent's latest piece, if that cell is free
///
/// Boards carry no history, so the latest piece is taken to be the
/// opponent's last one in row-major order.
pub fn mirror_reply(board: &Board, rules: &Rules, player: Symbol) -> Option<Position> {
    let latest = board.positions_of(player.opponent()).pop()?;
    rules
        .mirror(latest)
        .filter(|&pos| board.is_legal_move(rules, pos))
}
