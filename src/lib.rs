//! This crate provides the core logic for a non-deterministic Turing machine tracer.
//! It includes modules for parsing machine descriptions, building transition tables,
//! exploring every branch of computation breadth-first, and reporting the outcome.

pub mod loader;
pub mod machine;
pub mod machines;
pub mod parser;
pub mod report;
pub mod table;
pub mod types;

/// Re-exports the `Rule` enum from the parser module, used by the `pest` grammar.
pub use crate::parser::Rule;
/// Re-exports the `MachineLoader` struct from the loader module.
pub use loader::MachineLoader;
/// Re-exports the simulation engine and its statistics from the machine module.
pub use machine::{simulate, NonDeterministicMachine, Statistics};
/// Re-exports `MachineInfo`, `MachineCatalog`, and `MACHINES` from the machines module.
pub use machines::{MachineCatalog, MachineInfo, MACHINES};
/// Re-exports the `parse` function from the parser module.
pub use parser::parse;
/// Re-exports the report types from the report module.
pub use report::{Outcome, PathEntry, Trace};
/// Re-exports the transition table and its identifiers from the table module.
pub use table::{StateId, TransitionTable};
/// Re-exports various types related to machine definition and execution from the types module.
pub use types::{
    Direction, NtmError, Program, Step, Transition, TransitionRow, BLANK_SYMBOL,
    DEFAULT_MAX_STEPS, MAX_PROGRAM_SIZE,
};
