//! Core types for recording and drilling chess opening repertoires.

pub mod drill;
pub mod move_token;
pub mod repertoire_tree;
pub mod rules;
pub mod sequence;

pub use drill::{DrillOutcome, DrillState, LineDrill};
pub use move_token::{format_line, parse_line, MoveToken, TokenError};
pub use repertoire_tree::{RepertoireTree, TreeError};
pub use sequence::{RequestSequencer, RequestTicket};
