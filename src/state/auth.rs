//! Auth-session state for the current browser user.
//!
//! SYSTEM CONTEXT
//! ==============
//! Used by route guards and user-aware components to coordinate login redirects
//! and identity-dependent rendering.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use crate::net::identity::Resolution;
use crate::net::types::RemoteIdentity;

/// Identity of the signed-in caller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IdentityRecord {
    pub id: String,
    pub name: String,
    pub email: String,
}

impl IdentityRecord {
    /// Map a remote identity, defaulting missing fields to `""`.
    ///
    /// Returns `None` when the identity has no usable id.
    pub fn from_remote(remote: &RemoteIdentity) -> Option<Self> {
        let id = remote.id.as_deref().unwrap_or_default();
        if id.is_empty() {
            return None;
        }
        Some(Self {
            id: id.to_owned(),
            name: remote.name.clone().unwrap_or_default(),
            email: remote.email.clone().unwrap_or_default(),
        })
    }
}

/// Tri-state authentication status.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum AuthState {
    /// No identity decision yet.
    #[default]
    Loading,
    Unauthenticated,
    Authenticated(IdentityRecord),
}

impl AuthState {
    /// Derive auth state from one identity query resolution.
    ///
    /// Errors and identities without an id fail closed to `Unauthenticated`.
    pub fn from_resolution(resolution: &Resolution) -> Self {
        match resolution {
            Resolution::Pending => Self::Loading,
            Resolution::Present(remote) => {
                IdentityRecord::from_remote(remote).map_or(Self::Unauthenticated, Self::Authenticated)
            }
            Resolution::Absent | Resolution::Failed(_) => Self::Unauthenticated,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    pub fn user(&self) -> Option<&IdentityRecord> {
        match self {
            Self::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    /// Short label for logs; never includes identity fields.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Loading => "loading",
            Self::Unauthenticated => "unauthenticated",
            Self::Authenticated(_) => "authenticated",
        }
    }
}
