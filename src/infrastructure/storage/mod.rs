//! Object store adapters
//!
//! Each live `ObjectUrl` pins one copy of a recording until it is revoked.

mod file;
mod memory;

pub use file::FileObjectStore;
pub use memory::MemoryObjectStore;
