// src/utils/mod.rs

pub mod clock;
pub mod error;
pub mod logger;
