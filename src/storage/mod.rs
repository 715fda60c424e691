// src/storage/mod.rs
pub mod settings;
