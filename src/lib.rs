//! Registration of the Arc hardware dialect, and the constant materializer
//! that lowers its constant values to the `hw` dialect,
//! over a small, self contained, SSA based IR framework.
#[forbid(unsafe_code)]
pub mod attribute;
pub mod basic_block;
pub mod common_traits;
pub mod context;
pub mod dialect;
pub mod dialects;
pub mod identifier;
pub mod irbuild;
pub mod linked_list;
pub mod location;
pub mod op;
pub mod operation;
pub mod printable;
pub mod region;
pub mod result;
pub mod storage_uniquer;
pub mod r#type;
pub mod utils;
pub mod value;
