//! Adapters over the shakmaty rules engine.
//!
//! The repertoire tree never checks legality; these helpers do it before
//! tokens reach the tree.

use shakmaty::{fen::Fen, uci::UciMove, Chess, EnPassantMode, Move, Position};

use crate::move_token::MoveToken;

pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RulesError {
    #[error("Illegal move '{token}' at position {index}")]
    Illegal { index: usize, token: MoveToken },
}

/// Result of replaying a line from the starting position.
#[derive(Debug, Clone)]
pub struct Replay {
    pub position: Chess,
    /// The line as the engine accepted it (promotions filled in).
    pub line: Vec<MoveToken>,
}

/// Resolve a token against a position.
///
/// A bare from/to pawn move onto the last rank is read as a queen
/// promotion, matching what board widgets send when no piece is picked.
pub fn resolve(pos: &Chess, token: &MoveToken) -> Option<(Move, MoveToken)> {
    if let Some(mv) = to_legal(pos, token.as_str()) {
        return Some((mv, token.clone()));
    }
    if token.promotion().is_none() {
        let promoted = token.with_promotion('q').ok()?;
        if let Some(mv) = to_legal(pos, promoted.as_str()) {
            return Some((mv, promoted));
        }
    }
    None
}

fn to_legal(pos: &Chess, uci: &str) -> Option<Move> {
    let uci: UciMove = uci.parse().ok()?;
    uci.to_move(pos).ok()
}

/// Play one token, returning the normalized token that was played.
pub fn apply(pos: &mut Chess, token: &MoveToken, index: usize) -> Result<MoveToken, RulesError> {
    let (mv, normalized) = resolve(pos, token).ok_or_else(|| RulesError::Illegal {
        index,
        token: token.clone(),
    })?;
    pos.play_unchecked(mv);
    Ok(normalized)
}

/// Replay a line from the standard start, stopping at the first illegal move.
pub fn replay(moves: &[MoveToken]) -> Result<Replay, RulesError> {
    let mut position = Chess::default();
    let mut line = Vec::with_capacity(moves.len());

    for (index, token) in moves.iter().enumerate() {
        line.push(apply(&mut position, token, index)?);
    }

    Ok(Replay { position, line })
}

pub fn fen(pos: &Chess) -> String {
    Fen::from_position(pos, EnPassantMode::Legal).to_string()
}
