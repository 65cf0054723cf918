// # Host State Implementations
//
// This module provides a `ResourceData` implementation for hosts that do
// not bring their own, plus file persistence for its snapshots.

pub mod file;
pub mod memory;

pub use file::FileStateStore;
pub use memory::{MemoryResourceData, ResourceSnapshot};
