//! Interactive command shell for remote script debugging.

pub mod command;
pub mod shell;
pub mod state;
