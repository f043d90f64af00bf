//! Reusable view pieces shared by pages.

pub mod guarded;
pub mod loader;
