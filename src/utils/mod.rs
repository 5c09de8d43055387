//! Independent support tools / utilities

pub mod trait_cast;
