//! Configuration sources, one module per layer.

pub mod env;
pub mod global_file;
pub mod workspace_file;
