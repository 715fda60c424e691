// src/utils/mod.rs
pub mod csv_export;
pub mod format;
pub mod validation;
