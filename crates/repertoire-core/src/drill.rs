//! Quiz mode over a single repertoire line.
//!
//! The user plays the moves at even indices of the line; the drill answers
//! with the scripted reply at the following odd index.

use crate::move_token::MoveToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrillState {
    /// Expecting the user to play `line[index]`.
    AwaitingUserMove(usize),
    /// The user's move was accepted; `line[index]` is the reply still to be shown.
    AutoReplyPending(usize),
    Solved,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrillOutcome {
    /// The move does not match the line. Nothing was committed.
    Rejected { expected: MoveToken, got: MoveToken },
    /// The move matched. `reply` is the opponent's scripted answer, if any.
    Accepted { reply: Option<MoveToken> },
    /// A reply is still pending; call [`LineDrill::apply_reply`] first.
    ReplyPending { reply: MoveToken },
    AlreadySolved,
}

#[derive(Debug, Clone)]
pub struct LineDrill {
    line: Vec<MoveToken>,
    state: DrillState,
}

impl LineDrill {
    pub fn new(line: Vec<MoveToken>) -> Self {
        let state = Self::initial_state(&line);
        Self { line, state }
    }

    fn initial_state(line: &[MoveToken]) -> DrillState {
        if line.is_empty() {
            DrillState::Solved
        } else {
            DrillState::AwaitingUserMove(0)
        }
    }

    /// Switch to another line and start over.
    pub fn reset(&mut self, line: Vec<MoveToken>) {
        self.state = Self::initial_state(&line);
        self.line = line;
    }

    /// Start the current line over.
    pub fn restart(&mut self) {
        self.state = Self::initial_state(&self.line);
    }

    pub fn state(&self) -> DrillState {
        self.state
    }

    pub fn line(&self) -> &[MoveToken] {
        &self.line
    }

    pub fn is_solved(&self) -> bool {
        self.state == DrillState::Solved
    }

    /// The move the user is expected to play next.
    pub fn expected(&self) -> Option<&MoveToken> {
        match self.state {
            DrillState::AwaitingUserMove(index) => self.line.get(index),
            _ => None,
        }
    }

    /// Half-moves already on the board.
    pub fn played(&self) -> &[MoveToken] {
        &self.line[..self.played_count()]
    }

    fn played_count(&self) -> usize {
        match self.state {
            DrillState::AwaitingUserMove(index) | DrillState::AutoReplyPending(index) => index,
            DrillState::Solved => self.line.len(),
        }
    }

    /// Check the user's move without applying the reply.
    ///
    /// On a match with a reply available the drill moves to
    /// [`DrillState::AutoReplyPending`]; the caller shows the reply and then
    /// calls [`LineDrill::apply_reply`].
    pub fn submit(&mut self, mv: &MoveToken) -> DrillOutcome {
        let index = match self.state {
            DrillState::AwaitingUserMove(index) => index,
            DrillState::AutoReplyPending(index) => {
                return DrillOutcome::ReplyPending {
                    reply: self.line[index].clone(),
                }
            }
            DrillState::Solved => return DrillOutcome::AlreadySolved,
        };

        let expected = &self.line[index];
        if mv != expected {
            return DrillOutcome::Rejected {
                expected: expected.clone(),
                got: mv.clone(),
            };
        }

        let next = index + 1;
        match self.line.get(next) {
            Some(reply) => {
                self.state = DrillState::AutoReplyPending(next);
                DrillOutcome::Accepted {
                    reply: Some(reply.clone()),
                }
            }
            None => {
                self.state = DrillState::Solved;
                DrillOutcome::Accepted { reply: None }
            }
        }
    }

    /// Commit the pending reply. Returns false when no reply was pending.
    pub fn apply_reply(&mut self) -> bool {
        let DrillState::AutoReplyPending(index) = self.state else {
            return false;
        };
        let next = index + 1;
        self.state = if next < self.line.len() {
            DrillState::AwaitingUserMove(next)
        } else {
            DrillState::Solved
        };
        true
    }

    /// Check the user's move and play the reply in one step.
    pub fn play(&mut self, mv: &MoveToken) -> DrillOutcome {
        let outcome = self.submit(mv);
        if let DrillOutcome::Accepted { reply: Some(_) } = outcome {
            self.apply_reply();
        }
        outcome
    }

    /// Take back the last user move together with the reply that followed it.
    /// No-op (returns false) when fewer than two half-moves have been played.
    pub fn undo(&mut self) -> bool {
        let played = self.played_count();
        if played < 2 {
            return false;
        }
        // Land on the user's turn before their last move. When that move had
        // no reply (odd count) only one half-move comes off.
        let target = if played % 2 == 0 { played - 2 } else { played - 1 };
        self.state = DrillState::AwaitingUserMove(target);
        true
    }
}
