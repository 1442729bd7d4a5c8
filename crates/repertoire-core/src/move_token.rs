//! Move tokens in long algebraic form (`e2e4`, `e7e8q`).

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

static TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-h][1-8][a-h][1-8][qrbn]?$").unwrap());

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("Malformed move token '{0}'")]
    Malformed(String),

    #[error("Malformed move token '{token}' at position {index}")]
    MalformedInLine { index: usize, token: String },
}

/// A single half-move: from-square, to-square and an optional promotion letter.
///
/// The repertoire tree treats tokens as opaque strings; only the rules
/// engine adapters look at the squares.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MoveToken(String);

impl MoveToken {
    /// Parse a token, ignoring surrounding whitespace and letter case.
    pub fn parse(raw: &str) -> Result<Self, TokenError> {
        let normalized = raw.trim().to_ascii_lowercase();
        if TOKEN_RE.is_match(&normalized) {
            Ok(Self(normalized))
        } else {
            Err(TokenError::Malformed(raw.trim().to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn from_square(&self) -> &str {
        &self.0[..2]
    }

    pub fn to_square(&self) -> &str {
        &self.0[2..4]
    }

    pub fn promotion(&self) -> Option<char> {
        self.0[4..].chars().next()
    }

    /// The same move with a promotion piece attached.
    pub fn with_promotion(&self, piece: char) -> Result<Self, TokenError> {
        Self::parse(&format!("{}{}{}", self.from_square(), self.to_square(), piece))
    }
}

impl fmt::Display for MoveToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for MoveToken {
    type Err = TokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for MoveToken {
    type Error = TokenError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<MoveToken> for String {
    fn from(token: MoveToken) -> Self {
        token.0
    }
}

impl AsRef<str> for MoveToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Parse a space-separated line (`"e2e4 e7e5 g1f3"`).
/// Blank input gives an empty line; rejecting it is up to the caller.
pub fn parse_line(line: &str) -> Result<Vec<MoveToken>, TokenError> {
    line.split_whitespace()
        .enumerate()
        .map(|(index, raw)| {
            MoveToken::parse(raw).map_err(|_| TokenError::MalformedInLine {
                index,
                token: raw.to_string(),
            })
        })
        .collect()
}

/// Join tokens back into the wire form.
pub fn format_line(moves: &[MoveToken]) -> String {
    moves
        .iter()
        .map(MoveToken::as_str)
        .collect::<Vec<_>>()
        .join(" ")
}
