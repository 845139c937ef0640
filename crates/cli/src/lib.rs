//! Library half of the `expsel` binary, split out so integration tests can
//! drive commands without spawning a process.

pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;
pub mod output;
pub mod source;
pub mod styles;
