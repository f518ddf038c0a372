//! Sequential bootstrap steps wired to resources.
pub mod fonts;
pub mod overlay;
pub mod shell;
pub mod tools;
