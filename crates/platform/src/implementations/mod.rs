//! Concrete platform implementations

pub mod shell;
pub mod unavailable;
