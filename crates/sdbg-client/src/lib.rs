//! sdbg-client — session client for the remote Script Debugger API.
//!
//! This crate implements the debugger session client: it tracks connection
//! and halt state across independent, stateless HTTP calls, resolves the
//! currently halted execution context on demand, and exposes breakpoint,
//! inspection, and execution-control operations.

pub mod breakpoint;
pub mod control;
pub mod error;
pub mod inspect;
pub mod protocol;
pub mod session;
pub mod thread;
pub mod transport;

// Re-export key types for convenience.
pub use control::{StepOperation, StepOutcome};
pub use error::ClientError;
pub use protocol::{BreakpointRecord, BreakpointRequest, VariableEntry};
pub use session::{DebuggerClient, SessionState};
pub use thread::{select_halted_thread, ThreadLocation};
pub use transport::ClientSettings;
