//! Client-side auth core.
//!
//! DESIGN
//! ======
//! Plain Rust with no reactive framework types, so every transition is unit
//! testable. `util::auth` bridges the store into Leptos context.

pub mod auth;
pub mod guard;
pub mod login;
pub mod session;
pub mod store;
