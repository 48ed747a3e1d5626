//! sdbg-workspace — local workspace support for the debugger shell.
//!
//! Maps between server-side script paths and files on the local disk, and
//! produces source listings around the current halt position.

pub mod error;
pub mod index;
pub mod listing;

pub use error::WorkspaceError;
pub use index::{to_server_path, WorkspaceIndex};
pub use listing::{source_context, ContextLine, SourceContext, DEFAULT_RADIUS};
