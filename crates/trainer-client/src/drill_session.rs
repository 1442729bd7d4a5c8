//! Drill a repertoire line by line against a real board position.

use repertoire_core::rules;
use repertoire_core::{DrillOutcome, LineDrill, MoveToken, RepertoireTree};
use shakmaty::Chess;

use crate::error::SessionError;

pub struct DrillSession {
    lines: Vec<Vec<MoveToken>>,
    selected: usize,
    drill: LineDrill,
    position: Chess,
}

impl DrillSession {
    /// Start on the first line of the tree.
    pub fn from_tree(tree: &RepertoireTree) -> Result<Self, SessionError> {
        let lines = tree.extract_lines();
        if lines.is_empty() {
            return Err(SessionError::NoLines);
        }
        let mut session = Self {
            lines,
            selected: 0,
            drill: LineDrill::new(Vec::new()),
            position: Chess::default(),
        };
        session.select(0)?;
        Ok(session)
    }

    pub fn lines(&self) -> &[Vec<MoveToken>] {
        &self.lines
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn drill(&self) -> &LineDrill {
        &self.drill
    }

    pub fn position(&self) -> &Chess {
        &self.position
    }

    /// Switch to line `index` and start it from the initial position.
    /// Lines that do not replay legally are refused.
    pub fn select(&mut self, index: usize) -> Result<(), SessionError> {
        let line = self.lines.get(index).ok_or(SessionError::NoSuchLine(index))?;
        let replay = rules::replay(line)?;
        self.drill.reset(replay.line);
        self.selected = index;
        self.position = Chess::default();
        Ok(())
    }

    /// Try a user move.
    ///
    /// Illegal moves are an error. A legal move that differs from the line is
    /// rejected before it touches the board. A correct move is played along
    /// with the scripted reply.
    pub fn attempt(&mut self, token: &MoveToken) -> Result<DrillOutcome, SessionError> {
        let Some((_, normalized)) = rules::resolve(&self.position, token) else {
            return Err(SessionError::Rules(rules::RulesError::Illegal {
                index: self.drill.played().len(),
                token: token.clone(),
            }));
        };

        let outcome = self.drill.submit(&normalized);
        if let DrillOutcome::Accepted { reply } = &outcome {
            let index = self.drill.played().len();
            rules::apply(&mut self.position, &normalized, index - 1)?;
            if let Some(reply) = reply {
                rules::apply(&mut self.position, reply, index)?;
                self.drill.apply_reply();
            }
        }
        Ok(outcome)
    }

    /// Take back the last user move and its reply.
    pub fn undo(&mut self) -> bool {
        if !self.drill.undo() {
            return false;
        }
        // Every prefix of the selected line replayed cleanly in `select`.
        self.position = rules::replay(self.drill.played())
            .map(|r| r.position)
            .unwrap_or_default();
        true
    }

    pub fn restart(&mut self) {
        self.drill.restart();
        self.position = Chess::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use repertoire_core::{parse_line, DrillState};

    fn tok(s: &str) -> MoveToken {
        MoveToken::parse(s).unwrap()
    }

    fn tree() -> RepertoireTree {
        let mut tree = RepertoireTree::new();
        tree.insert_line(&parse_line("e2e4 e7e5 g1f3").unwrap());
        tree.insert_line(&parse_line("d2d4 d7d5").unwrap());
        tree
    }

    #[test]
    fn test_drill_first_line() {
        let mut session = DrillSession::from_tree(&tree()).unwrap();
        assert_eq!(session.lines().len(), 2);

        let outcome = session.attempt(&tok("e2e4")).unwrap();
        assert_eq!(outcome, DrillOutcome::Accepted { reply: Some(tok("e7e5")) });
        assert_eq!(session.drill().state(), DrillState::AwaitingUserMove(2));
        assert_eq!(
            rules::fen(session.position()),
            "rnbqkbnr/pppp1ppp/8/4p3/4P3/8/PPPP1PPP/RNBQKBNR w KQkq - 0 2"
        );

        session.attempt(&tok("g1f3")).unwrap();
        assert!(session.drill().is_solved());
    }

    #[test]
    fn test_wrong_legal_move_leaves_board() {
        let mut session = DrillSession::from_tree(&tree()).unwrap();
        let outcome = session.attempt(&tok("d2d4")).unwrap();
        assert!(matches!(outcome, DrillOutcome::Rejected { .. }));
        assert_eq!(rules::fen(session.position()), rules::STARTING_FEN);
    }

    #[test]
    fn test_illegal_move_is_an_error() {
        let mut session = DrillSession::from_tree(&tree()).unwrap();
        assert!(matches!(
            session.attempt(&tok("e2e5")),
            Err(SessionError::Rules(_))
        ));
    }

    #[test]
    fn test_select_and_undo() {
        let mut session = DrillSession::from_tree(&tree()).unwrap();
        session.select(1).unwrap();
        session.attempt(&tok("d2d4")).unwrap();
        assert!(session.drill().is_solved());
        assert!(session.undo());
        assert_eq!(rules::fen(session.position()), rules::STARTING_FEN);
        assert!(matches!(session.select(7), Err(SessionError::NoSuchLine(7))));
    }

    #[test]
    fn test_empty_tree_has_nothing_to_drill() {
        assert!(matches!(
            DrillSession::from_tree(&RepertoireTree::new()),
            Err(SessionError::NoLines)
        ));
    }
}
