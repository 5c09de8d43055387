//! Utilities for building IR.

pub mod inserter;
