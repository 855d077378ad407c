//! Script rendering for the target synthesis tool.

pub mod tcl;

pub use tcl::{render, write_script};
