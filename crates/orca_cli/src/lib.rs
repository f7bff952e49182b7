//! Terminal front end for the ORCA client: command parsing, text rendering and
//! the session loop tying them to the polling engine.
pub mod commands;
pub mod render;
pub mod session;

pub use commands::{parse_command, Command, CommandError};
pub use render::{render, Output, Region};
pub use session::{run, Flow, Session};
