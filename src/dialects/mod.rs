//! Dialects provided by this crate.

pub mod arc;
pub mod builtin;
pub mod hw;
