//! Tetrys (workspace facade crate).
//!
//! Re-exports the member crates under one roof so the binary, integration
//! tests and benchmarks can use `tetrys::{core,input,term,types}`.

pub use tetrys_core as core;
pub use tetrys_input as input;
pub use tetrys_term as term;
pub use tetrys_types as types;
