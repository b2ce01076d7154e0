//! Category Indexes and Wide Bitsets
//!
//! # Components
//!
//! - **bitset**: fixed multi-word bitsets and the layouts that map global
//!   positions onto them
//! - **category**: label to bit position mapping for one attribute

pub mod bitset;
pub mod category;

// Re-export main types
pub use bitset::{WideBitset, WideLayout};
pub use category::CategoryIndex;
