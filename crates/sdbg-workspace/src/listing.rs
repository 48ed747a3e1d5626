//! Source-context listing around the current halt position.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::WorkspaceError;

/// Lines shown on each side of the current line by default.
pub const DEFAULT_RADIUS: u32 = 5;

/// One line of a source listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextLine {
    /// 1-based line number.
    pub number: u32,
    pub text: String,
    /// True for the line execution is halted on.
    pub current: bool,
}

/// A window of source lines around the halt position.
#[derive(Debug, Clone)]
pub struct SourceContext {
    pub path: PathBuf,
    pub lines: Vec<ContextLine>,
}

/// Read `radius` lines of context on each side of `current_line` from the
/// file at `path`. The window is clamped to the file, so a halt near the
/// top or bottom simply yields a shorter listing.
pub fn source_context(
    path: &Path,
    current_line: u32,
    radius: u32,
) -> Result<SourceContext, WorkspaceError> {
    if !path.is_file() {
        return Err(WorkspaceError::FileNotFound(path.to_path_buf()));
    }
    let content = fs::read_to_string(path)?;
    let first = current_line.saturating_sub(radius).max(1);
    let last = current_line.saturating_add(radius);
    let lines = content
        .lines()
        .enumerate()
        .map(|(i, text)| (i as u32 + 1, text))
        .filter(|(number, _)| (first..=last).contains(number))
        .map(|(number, text)| ContextLine {
            number,
            text: text.to_string(),
            current: number == current_line,
        })
        .collect();
    Ok(SourceContext {
        path: path.to_path_buf(),
        lines,
    })
}
