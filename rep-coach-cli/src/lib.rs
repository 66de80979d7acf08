// Library exports for the rep-coach CLI
// This allows testing of internal modules

pub mod commands;
pub mod config;
