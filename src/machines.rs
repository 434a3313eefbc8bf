//! Built-in machine descriptions, embedded at compile time and parsed on first use.

use crate::types::{NtmError, Program};

use std::sync::RwLock;

// Default embedded machines
const MACHINE_TEXTS: [&str; 2] = [
    include_str!("../machines/equal-01s.csv"),
    include_str!("../machines/contains-11.csv"),
];

lazy_static::lazy_static! {
    pub static ref MACHINES: RwLock<Vec<Program>> = RwLock::new(Vec::new());
}

pub struct MachineCatalog;

impl MachineCatalog {
    /// Parses the embedded descriptions into `MACHINES`, unless that already happened.
    pub fn load() -> Result<(), NtmError> {
        let mut write_guard = MACHINES
            .write()
            .map_err(|_| NtmError::FileError("Failed to acquire write lock".to_string()))?;

        if !write_guard.is_empty() {
            return Ok(());
        }

        for text in MACHINE_TEXTS {
            match crate::parser::parse(text) {
                Ok(program) => write_guard.push(program),
                Err(e) => tracing::error!(error = %e, "failed to parse built-in machine"),
            }
        }

        Ok(())
    }

    /// Get the number of available machines
    pub fn count() -> usize {
        let _ = Self::load();

        MACHINES.read().map(|machines| machines.len()).unwrap_or(0)
    }

    /// Get a machine by its index
    pub fn get_by_index(index: usize) -> Result<Program, NtmError> {
        Self::load()?;

        MACHINES
            .read()
            .map_err(|_| NtmError::FileError("Failed to acquire read lock".to_string()))?
            .get(index)
            .cloned()
            .ok_or_else(|| NtmError::UnknownMachine(format!("index {index}")))
    }

    /// Get a machine by its name, ignoring case
    pub fn get_by_name(name: &str) -> Result<Program, NtmError> {
        Self::load()?;

        MACHINES
            .read()
            .map_err(|_| NtmError::FileError("Failed to acquire read lock".to_string()))?
            .iter()
            .find(|program| program.name.eq_ignore_ascii_case(name))
            .cloned()
            .ok_or_else(|| NtmError::UnknownMachine(name.to_string()))
    }

    /// List all machine names
    pub fn names() -> Vec<String> {
        let _ = Self::load();

        MACHINES
            .read()
            .map(|machines| machines.iter().map(|program| program.name.clone()).collect())
            .unwrap_or_default()
    }

    /// Get information about a machine by its index
    pub fn info(index: usize) -> Result<MachineInfo, NtmError> {
        let program = Self::get_by_index(index)?;

        Ok(MachineInfo {
            index,
            name: program.name.clone(),
            start_state: program.start_state.clone(),
            state_count: program.table()?.state_count(),
            transition_count: program.transition_count(),
        })
    }

    /// Get the original text of a machine by its index
    pub fn text(index: usize) -> Result<&'static str, NtmError> {
        MACHINE_TEXTS
            .get(index)
            .copied()
            .ok_or_else(|| NtmError::UnknownMachine(format!("index {index}")))
    }
}

#[derive(Debug, Clone)]
pub struct MachineInfo {
    pub index: usize,
    pub name: String,
    pub start_state: String,
    pub state_count: usize,
    pub transition_count: usize,
}
