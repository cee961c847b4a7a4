//! Library side of the `propmatrix` CLI: logging setup, command
//! implementations, preference storage and table rendering.

pub mod commands;
pub mod logging;
pub mod preferences;
pub mod summary;
