//! Saving and restoring breakpoint sets as JSON files.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use sdbg_client::BreakpointRequest;

/// Default file for `save`/`restore` without an explicit path.
pub const DEFAULT_STATE_FILE: &str = "sdbg-breakpoints.json";

/// Write breakpoints as a JSON array of `{script_path, line_number}`.
pub fn save_breakpoints(path: &Path, breakpoints: &[BreakpointRequest]) -> Result<()> {
    let json = serde_json::to_string_pretty(breakpoints).context("serialize breakpoints")?;
    fs::write(path, json).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

/// Read breakpoints back from a file written by [`save_breakpoints`].
pub fn load_breakpoints(path: &Path) -> Result<Vec<BreakpointRequest>> {
    let json =
        fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_str(&json).with_context(|| format!("parse {}", path.display()))
}
