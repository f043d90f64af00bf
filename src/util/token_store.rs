//! Browser `localStorage` persistence for backend session tokens.
//!
//! SYSTEM CONTEXT
//! ==============
//! The service client reads the bearer token on every call, so the session
//! survives reloads. Auth state itself is never stored; it is re-derived from
//! the identity query each time.

use crate::net::types::SessionTokens;

const TOKEN_KEY: &str = "homenuvo.auth.token";
const REFRESH_TOKEN_KEY: &str = "homenuvo.auth.refreshToken";

/// Current bearer token, if a session was established in this browser.
pub fn load_token() -> Option<String> {
    #[cfg(feature = "hydrate")]
    {
        let storage = web_sys::window().and_then(|w| w.local_storage().ok().flatten())?;
        storage.get_item(TOKEN_KEY).ok().flatten().filter(|t| !t.is_empty())
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = TOKEN_KEY;
        None
    }
}

pub fn save_tokens(tokens: &SessionTokens) {
    #[cfg(feature = "hydrate")]
    {
        let Some(storage) = web_sys::window().and_then(|w| w.local_storage().ok().flatten()) else {
            return;
        };
        let _ = storage.set_item(TOKEN_KEY, &tokens.token);
        match tokens.refresh_token.as_deref() {
            Some(refresh) => {
                let _ = storage.set_item(REFRESH_TOKEN_KEY, refresh);
            }
            None => {
                let _ = storage.remove_item(REFRESH_TOKEN_KEY);
            }
        }
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (tokens, REFRESH_TOKEN_KEY);
    }
}

pub fn clear_tokens() {
    #[cfg(feature = "hydrate")]
    {
        let Some(storage) = web_sys::window().and_then(|w| w.local_storage().ok().flatten()) else {
            return;
        };
        let _ = storage.remove_item(TOKEN_KEY);
        let _ = storage.remove_item(REFRESH_TOKEN_KEY);
    }
}
