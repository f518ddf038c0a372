//! Command implementations.
pub mod bootstrap;
