//! Service boundary: wire types, the function-call client, and the identity
//! query.
//!
//! DESIGN
//! ======
//! Nothing here knows about auth state; `state` consumes these types.

pub mod api;
pub mod identity;
pub mod types;
