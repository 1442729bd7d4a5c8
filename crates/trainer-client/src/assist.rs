//! Play assist: track the moves on the board and show what the repertoire
//! has saved from the current position.
//!
//! Every lookup carries a [`RequestTicket`]. Starting a new lookup aborts
//! the previous one, and any response whose ticket is no longer current is
//! dropped, so a slow answer for an old position never overwrites a newer one.

use std::sync::Arc;

use repertoire_core::rules::{self, RulesError};
use repertoire_core::{MoveToken, RequestSequencer, RequestTicket};
use shakmaty::Chess;
use tokio::task::JoinHandle;

use crate::api::SuggestionSource;
use crate::error::ApiError;

type Lookup = JoinHandle<Result<Vec<MoveToken>, ApiError>>;

pub struct PlayAssist<S> {
    source: Arc<S>,
    name: String,
    moves: Vec<MoveToken>,
    /// Number of moves from `moves` shown on the board.
    cursor: usize,
    position: Chess,
    suggestions: Vec<MoveToken>,
    sequencer: RequestSequencer,
    in_flight: Option<(RequestTicket, Lookup)>,
}

impl<S: SuggestionSource> PlayAssist<S> {
    pub fn new(source: Arc<S>, name: &str) -> Self {
        Self {
            source,
            name: name.trim().to_string(),
            moves: Vec::new(),
            cursor: 0,
            position: Chess::default(),
            suggestions: Vec::new(),
            sequencer: RequestSequencer::new(),
            in_flight: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The whole line entered so far, including moves past the cursor.
    pub fn moves(&self) -> &[MoveToken] {
        &self.moves
    }

    /// Moves up to the position on the board.
    pub fn shown(&self) -> &[MoveToken] {
        &self.moves[..self.cursor]
    }

    pub fn position(&self) -> &Chess {
        &self.position
    }

    /// Suggestions for the current position, as of the last accepted response.
    pub fn suggestions(&self) -> &[MoveToken] {
        &self.suggestions
    }

    pub fn set_name(&mut self, name: &str) {
        self.name = name.trim().to_string();
        self.invalidate();
    }

    /// Play a move on the board. Moves past the cursor are discarded.
    /// Illegal moves leave everything unchanged.
    pub fn play(&mut self, token: &MoveToken) -> Result<MoveToken, RulesError> {
        let played = rules::apply(&mut self.position, token, self.cursor)?;
        self.moves.truncate(self.cursor);
        self.moves.push(played.clone());
        self.cursor = self.moves.len();
        self.invalidate();
        Ok(played)
    }

    /// Take back the move before the cursor, dropping anything after it.
    pub fn undo(&mut self) -> Option<MoveToken> {
        if self.cursor == 0 {
            return None;
        }
        self.moves.truncate(self.cursor);
        let undone = self.moves.pop();
        self.seek(self.moves.len());
        undone
    }

    /// Step one move back through the history. Returns false at the start.
    pub fn back(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.seek(self.cursor - 1);
        true
    }

    /// Step one move forward through the history. Returns false at the end.
    pub fn forward(&mut self) -> bool {
        if self.cursor == self.moves.len() {
            return false;
        }
        self.seek(self.cursor + 1);
        true
    }

    /// Start over from the initial position, keeping the repertoire name.
    pub fn reset(&mut self) {
        self.moves.clear();
        self.seek(0);
    }

    fn seek(&mut self, cursor: usize) {
        self.cursor = cursor;
        // Every stored move was legal when it was played.
        self.position = rules::replay(&self.moves[..cursor])
            .map(|r| r.position)
            .unwrap_or_default();
        self.invalidate();
    }

    fn invalidate(&mut self) {
        self.sequencer.invalidate();
        self.suggestions.clear();
        if let Some((_, handle)) = self.in_flight.take() {
            handle.abort();
        }
    }

    /// Ask for suggestions for the position on the board, superseding any
    /// lookup still in flight. Returns `None` when no repertoire name is set.
    pub fn request_suggestions(&mut self) -> Option<RequestTicket> {
        if self.name.is_empty() {
            return None;
        }
        if let Some((_, handle)) = self.in_flight.take() {
            handle.abort();
        }

        let ticket = self.sequencer.issue();
        let lookup = self.source.suggestions(self.name.clone(), self.shown().to_vec());
        self.in_flight = Some((ticket, tokio::spawn(lookup)));
        Some(ticket)
    }

    /// Wait for the response to the current lookup.
    ///
    /// Returns `None` when no lookup is outstanding or its response is
    /// stale. A failed lookup, including one whose task died, is returned as
    /// an error and leaves the previous suggestions untouched.
    pub async fn next_response(&mut self) -> Option<Result<&[MoveToken], ApiError>> {
        let (ticket, handle) = self.in_flight.take()?;
        let result = match handle.await {
            Ok(result) => result,
            Err(e) => Err(ApiError::from(e)),
        };

        if !self.sequencer.accept(ticket) {
            tracing::debug!("Dropping stale suggestion response #{}", ticket.id());
            return None;
        }
        Some(match result {
            Ok(moves) => {
                self.suggestions = moves;
                Ok(&self.suggestions)
            }
            Err(e) => Err(e),
        })
    }

    /// Request and wait in one step.
    pub async fn refresh(&mut self) -> Option<Result<&[MoveToken], ApiError>> {
        self.request_suggestions()?;
        self.next_response().await
    }
}
