//! This module provides the `ProgramLoader` struct, responsible for loading machine
//! descriptions from files, directories, and strings.

use crate::parser::parse;
use crate::types::{Machine, TuringMachineError};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// File extension of machine description files.
pub const DESCRIPTION_EXTENSION: &str = "tm";

/// `ProgramLoader` is a utility struct for loading machine descriptions.
/// It provides methods to load a description from a file or from string content,
/// and to discover and load all `.tm` files within a directory.
pub struct ProgramLoader;

impl ProgramLoader {
    /// Loads a single machine description from the specified file path.
    ///
    /// # Arguments
    ///
    /// * `path` - A reference to the `Path` of the description file to load.
    ///
    /// # Returns
    ///
    /// * `Ok(Machine)` if the file is successfully read and parsed.
    /// * `Err(TuringMachineError::FileError)` if the file cannot be read.
    /// * `Err(TuringMachineError::Syntax)` or `Err(TuringMachineError::MissingDeclaration)`
    ///   if the content is not a valid description.
    pub fn load_program(path: &Path) -> Result<Machine, TuringMachineError> {
        let content = fs::read_to_string(path).map_err(|e| {
            TuringMachineError::FileError(format!("Failed to read file {}: {}", path.display(), e))
        })?;

        let machine = parse(&content)?;
        info!(
            path = %path.display(),
            states = machine.states().len(),
            tracks = machine.tracks(),
            "loaded machine description"
        );

        Ok(machine)
    }

    /// Loads a single machine description from the provided string content.
    pub fn load_program_from_string(content: &str) -> Result<Machine, TuringMachineError> {
        parse(content)
    }

    /// Loads all description files (`.tm` extension) from a given directory.
    ///
    /// Directories and files with other extensions are skipped. Each loaded file yields
    /// one result, so a single malformed description does not hide the others.
    pub fn load_programs(directory: &Path) -> Vec<Result<(PathBuf, Machine), TuringMachineError>> {
        let entries = match fs::read_dir(directory) {
            Ok(entries) => entries,
            Err(e) => {
                return vec![Err(TuringMachineError::FileError(format!(
                    "Failed to read directory {}: {}",
                    directory.display(),
                    e
                )))]
            }
        };

        entries
            .filter_map(|entry| {
                let path = match entry {
                    Ok(entry) => entry.path(),
                    Err(e) => {
                        return Some(Err(TuringMachineError::FileError(format!(
                            "Failed to read directory entry: {}",
                            e
                        ))))
                    }
                };

                if path.is_dir()
                    || path
                        .extension()
                        .map_or(true, |ext| ext != DESCRIPTION_EXTENSION)
                {
                    return None;
                }

                Some(Self::load_program(&path).map(|machine| (path, machine)))
            })
            .collect()
    }
}
