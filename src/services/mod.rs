// src/services/mod.rs
pub mod directory;
pub mod feed;
pub mod prpc;
pub mod selection;
pub mod simulation;
pub mod stats;
