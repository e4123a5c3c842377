// src/core/mod.rs

pub mod types;

pub use types::{Address, AddressError, Checkpoint, Hash, Timestamp};
