mod entity;
mod memory;
mod rocks;


pub use entity::*;
pub use memory::MemoryStore;
pub use rocks::{RocksStore, StoreSettings};
