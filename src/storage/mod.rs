// Storage module - PERSISTENCE
// The AccountStore seam plus in-memory and sled-backed implementations

mod memory;
mod store;
mod traits;

pub use memory::MemoryStore;
pub use store::{SledStore, StorageStats};
pub use traits::{AccountStore, StoreError};
