// Cozy Hub shared type definitions
// Each submodule defines types used across the crate.

pub mod bit;
pub mod bookmark;
pub mod errors;
pub mod settings;
