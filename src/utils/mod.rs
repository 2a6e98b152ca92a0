// src/utils/mod.rs

pub mod error;
pub mod locale;
pub mod logger;
