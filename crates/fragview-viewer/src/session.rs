//! Session token bridge
//!
//! The auth backend hands out a bearer token which the page keeps in
//! browser localStorage under the key `token`. This module reads and
//! writes that slot on WASM; native builds have no session storage.

/// localStorage key for the session token
pub const TOKEN_KEY: &str = "token";

#[cfg(target_arch = "wasm32")]
mod wasm_session {
    use super::TOKEN_KEY;

    fn get_storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok()?
    }

    pub fn load_token() -> Option<String> {
        let storage = get_storage()?;
        storage.get_item(TOKEN_KEY).ok()?
    }

    pub fn save_token(token: &str) {
        if let Some(storage) = get_storage() {
            let _ = storage.set_item(TOKEN_KEY, token);
        }
    }

    pub fn clear_token() {
        if let Some(storage) = get_storage() {
            let _ = storage.remove_item(TOKEN_KEY);
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use wasm_session::*;

#[cfg(not(target_arch = "wasm32"))]
mod native_session {
    pub fn load_token() -> Option<String> {
        None
    }

    pub fn save_token(_token: &str) {}

    pub fn clear_token() {}
}

#[cfg(not(target_arch = "wasm32"))]
pub use native_session::*;

/// Whether a session token is present
pub fn is_logged_in() -> bool {
    load_token().is_some()
}

/// `Authorization` header value for API calls, if logged in
pub fn authorization_header() -> Option<String> {
    load_token().map(|token| format!("Bearer {}", token))
}

/// Drop the stored token
pub fn logout() {
    clear_token();
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;

    #[test]
    fn native_has_no_session() {
        assert!(!is_logged_in());
        assert!(authorization_header().is_none());
    }
}
