//! This module defines the result of a simulation run and how it is rendered for people.
//! The engine only produces these values; printing them is left to the caller.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How a run ended. Every variant is a normal result, not an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    /// A configuration in the accept state was found.
    Accepted {
        steps: usize,
        /// Configurations from the root to the accepting one.
        path: Vec<PathEntry>,
        depth: usize,
        average_nondeterminism: f64,
    },
    /// Every branch reached the reject state or a dead end.
    Rejected {
        steps: usize,
        average_nondeterminism: f64,
    },
    /// The step budget ran out before the run was decided.
    StepLimitReached {
        limit: usize,
        average_nondeterminism: f64,
    },
}

impl Outcome {
    pub fn average_nondeterminism(&self) -> f64 {
        match self {
            Outcome::Accepted {
                average_nondeterminism,
                ..
            }
            | Outcome::Rejected {
                average_nondeterminism,
                ..
            }
            | Outcome::StepLimitReached {
                average_nondeterminism,
                ..
            } => *average_nondeterminism,
        }
    }

    /// Returns the step count for decided runs.
    pub fn steps(&self) -> Option<usize> {
        match self {
            Outcome::Accepted { steps, .. } | Outcome::Rejected { steps, .. } => Some(*steps),
            Outcome::StepLimitReached { .. } => None,
        }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, Outcome::Accepted { .. })
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, Outcome::Rejected { .. })
    }
}

/// One configuration on the accepting path, already resolved to printable parts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathEntry {
    /// Tape content left of the head.
    pub left: String,
    pub state: String,
    /// The symbol under the head, blank when the right side is exhausted.
    pub head: char,
    /// Tape content right of the head.
    pub rest: String,
}

impl fmt::Display for PathEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}{}", self.left, self.state, self.head, self.rest)
    }
}

/// The full result of simulating one input string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    pub input: String,
    pub outcome: Outcome,
}

impl fmt::Display for Trace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Initial String: {}", self.input)?;

        match &self.outcome {
            Outcome::Accepted {
                steps, path, depth, ..
            } => {
                writeln!(f, "String accepted in {steps} steps")?;
                for entry in path {
                    writeln!(f, "{entry}")?;
                }
                writeln!(f, "Depth of tree: {depth}")?;
            }
            Outcome::Rejected { steps, .. } => {
                writeln!(f, "String rejected in {steps} steps")?;
            }
            Outcome::StepLimitReached { limit, .. } => {
                writeln!(f, "Execution stopped after {limit} steps")?;
            }
        }

        write!(
            f,
            "Average nondeterminism: {:.2}",
            self.outcome.average_nondeterminism()
        )
    }
}
