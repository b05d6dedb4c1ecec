//! Small helpers shared by the flow workspace crates.

pub mod env;
