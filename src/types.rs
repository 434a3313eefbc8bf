//! This module defines the core data structures and types used throughout the tracer,
//! including the parsed machine description, transitions, step results, and error types.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

use crate::report::Outcome;
use crate::table::{StateId, TransitionTable};
use crate::Rule;

/// The blank symbol substituted whenever the head reads past either end of the tape.
pub const BLANK_SYMBOL: char = '_';
/// The maximum allowed size for a machine description in bytes.
pub const MAX_PROGRAM_SIZE: usize = 65536; // 64KB
/// The step limit applied by the command line when none is given.
pub const DEFAULT_MAX_STEPS: usize = 1000;

/// A machine description as read from its textual form.
///
/// The header fields are kept verbatim. Transition rows are kept as raw fields so that
/// malformed rows can be reported with their line number when the table is built.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Program {
    /// The name of the machine.
    pub name: String,
    /// The declared states. Informational only.
    pub states: Vec<String>,
    /// The declared input alphabet. Informational only.
    pub input_alphabet: Vec<String>,
    /// The declared tape alphabet. Informational only.
    pub tape_alphabet: Vec<String>,
    /// The state the root configuration starts in.
    pub start_state: String,
    /// Reaching this state accepts the input.
    pub accept_state: String,
    /// Reaching this state ends the branch silently.
    pub reject_state: String,
    /// Transition rows in source order.
    pub rows: Vec<TransitionRow>,
}

impl Program {
    /// Builds the transition table for this description.
    pub fn table(&self) -> Result<TransitionTable, NtmError> {
        TransitionTable::from_program(self)
    }

    /// Returns the number of transition rows.
    pub fn transition_count(&self) -> usize {
        self.rows.len()
    }
}

/// One row of the transition section: `current_state, symbol, next_state, write_symbol, move`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionRow {
    /// The 1-based line the row was read from.
    pub line: usize,
    /// The trimmed fields of the row.
    pub fields: Vec<String>,
}

impl TransitionRow {
    pub fn new<I, S>(line: usize, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            line,
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }
}

/// A single legal move out of a `(state, symbol)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    /// The state the child configuration is in.
    pub next_state: StateId,
    /// The symbol written over the head cell.
    pub write: char,
    /// Where the head moves after writing.
    pub direction: Direction,
}

/// Represents the possible directions the head can move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Move the head one position to the left.
    Left,
    /// Move the head one position to the right.
    Right,
}

impl Direction {
    /// Parses a move symbol. `L` or `<` is Left, `R` or `>` is Right.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "L" | "<" => Some(Direction::Left),
            "R" | ">" => Some(Direction::Right),
            _ => None,
        }
    }
}

/// Represents the outcome of expanding one frontier level.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// The level produced a non-empty next level.
    Continue,
    /// The run reached a terminal state.
    Halt(Outcome),
}

/// Represents the errors that prevent a machine from being built or loaded.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NtmError {
    /// Indicates a syntax error in the machine description.
    #[error("Program parsing error: {0}")]
    ParseError(#[from] Box<pest::error::Error<Rule>>),
    /// Indicates that one of the seven header lines is absent.
    #[error("Missing {0} line")]
    MissingHeader(&'static str),
    /// Indicates a transition row with the wrong shape.
    #[error("Malformed transition on line {line}: {message}")]
    MalformedRow { line: usize, message: String },
    /// Indicates a move symbol other than `L`, `R`, `<` or `>`.
    #[error("Unsupported move '{value}' on line {line}")]
    InvalidMove { line: usize, value: String },
    /// Indicates a tape symbol that is not exactly one character.
    #[error("Invalid {field} '{value}' on line {line}: symbols must be a single character")]
    InvalidSymbol {
        line: usize,
        field: &'static str,
        value: String,
    },
    /// Indicates a description larger than `MAX_PROGRAM_SIZE`.
    #[error("Program too large: {0} bytes (limit is {1} bytes)")]
    ProgramTooLarge(usize, usize),
    /// Indicates an error related to file system operations.
    #[error("File error: {0}")]
    FileError(String),
    /// Wraps the error that stopped one file of a directory from loading.
    #[error("Failed to load {}: {source}", .path.display())]
    InvalidFile {
        path: PathBuf,
        source: Box<NtmError>,
    },
    /// Indicates a lookup for a built-in machine that does not exist.
    #[error("Unknown machine: {0}")]
    UnknownMachine(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_serialization() {
        let left = Direction::Left;
        let right = Direction::Right;

        let left_json = serde_json::to_string(&left).unwrap();
        let right_json = serde_json::to_string(&right).unwrap();

        assert_eq!(left_json, "\"Left\"");
        assert_eq!(right_json, "\"Right\"");

        let left_deserialized: Direction = serde_json::from_str(&left_json).unwrap();
        assert_eq!(left, left_deserialized);
    }

    #[test]
    fn test_direction_from_symbol() {
        assert_eq!(Direction::from_symbol("L"), Some(Direction::Left));
        assert_eq!(Direction::from_symbol("<"), Some(Direction::Left));
        assert_eq!(Direction::from_symbol("R"), Some(Direction::Right));
        assert_eq!(Direction::from_symbol(">"), Some(Direction::Right));
        assert_eq!(Direction::from_symbol("S"), None);
        assert_eq!(Direction::from_symbol("l"), None);
    }

    #[test]
    fn test_transition_row_new() {
        let row = TransitionRow::new(8, ["q0", "0", "q1", "x", "R"]);

        assert_eq!(row.line, 8);
        assert_eq!(row.fields, vec!["q0", "0", "q1", "x", "R"]);
    }

    #[test]
    fn test_error_display() {
        let error = NtmError::InvalidMove {
            line: 9,
            value: "S".to_string(),
        };

        let error_msg = format!("{}", error);
        assert!(error_msg.contains("Unsupported move"));
        assert!(error_msg.contains("line 9"));
    }
}
