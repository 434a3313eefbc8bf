//! This module provides the `MachineLoader` struct, responsible for loading machine
//! descriptions from various sources, including files and strings.

use crate::parser::parse;
use crate::types::{NtmError, Program, MAX_PROGRAM_SIZE};
use std::fs;
use std::path::{Path, PathBuf};

/// File extension of machine description files.
const DESCRIPTION_EXTENSION: &str = "csv";

/// `MachineLoader` is a utility struct for loading machine descriptions.
/// It provides methods to load descriptions from individual files, from string content,
/// and to discover and load all `.csv` files within a specified directory.
pub struct MachineLoader;

impl MachineLoader {
    /// Loads a single machine description from the specified file path.
    ///
    /// # Arguments
    ///
    /// * `path` - A reference to the `Path` of the `.csv` file to load.
    ///
    /// # Returns
    ///
    /// * `Ok(Program)` if the file is successfully read and parsed into a `Program`.
    /// * `Err(NtmError::FileError)` if the file cannot be read.
    /// * `Err(NtmError::ProgramTooLarge)` if the file exceeds `MAX_PROGRAM_SIZE`.
    /// * Any parse error if the file content is not a valid description.
    pub fn load_program(path: &Path) -> Result<Program, NtmError> {
        let content = fs::read_to_string(path).map_err(|e| {
            NtmError::FileError(format!("Failed to read file {}: {}", path.display(), e))
        })?;

        let program = Self::load_program_from_string(&content)?;
        tracing::debug!(
            path = %path.display(),
            name = %program.name,
            rows = program.rows.len(),
            "loaded machine description"
        );

        Ok(program)
    }

    /// Loads a single machine description from the provided string content.
    ///
    /// This is useful for descriptions that are not stored in files, e.g., from standard input.
    pub fn load_program_from_string(content: &str) -> Result<Program, NtmError> {
        if content.len() > MAX_PROGRAM_SIZE {
            return Err(NtmError::ProgramTooLarge(content.len(), MAX_PROGRAM_SIZE));
        }

        parse(content)
    }

    /// Loads every machine description file (`.csv` extension) in `directory`, in path order.
    ///
    /// Subdirectories and other files are skipped. A file that fails to load yields an
    /// `NtmError::InvalidFile` carrying its path and the underlying error, so one bad
    /// description never hides the others.
    pub fn load_programs(directory: &Path) -> Vec<Result<(PathBuf, Program), NtmError>> {
        let entries = match fs::read_dir(directory) {
            Ok(entries) => entries,
            Err(e) => {
                return vec![Err(NtmError::FileError(format!(
                    "Cannot read directory {}: {e}",
                    directory.display()
                )))]
            }
        };

        let mut results = Vec::new();
        let mut paths = Vec::new();
        for entry in entries {
            match entry {
                Ok(entry) => paths.push(entry.path()),
                Err(e) => results.push(Err(NtmError::FileError(format!(
                    "Cannot read an entry of {}: {e}",
                    directory.display()
                )))),
            }
        }

        paths.retain(|path| {
            let keep = is_description(path);
            if !keep {
                tracing::trace!(path = %path.display(), "skipping non-description entry");
            }
            keep
        });
        // Directory order is platform dependent.
        paths.sort();

        for path in paths {
            match Self::load_program(&path) {
                Ok(program) => results.push(Ok((path, program))),
                Err(source) => {
                    tracing::warn!(path = %path.display(), error = %source, "failed to load machine");
                    results.push(Err(NtmError::InvalidFile {
                        path,
                        source: Box::new(source),
                    }));
                }
            }
        }

        results
    }
}

fn is_description(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .is_some_and(|ext| ext == DESCRIPTION_EXTENSION)
}
