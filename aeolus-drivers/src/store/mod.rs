//! Attribute store implementations

pub mod memory;

pub use memory::{FanAttributes, MemoryAttributeStore};
