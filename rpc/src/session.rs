//! In-memory session tokens.
//!
//! Login mints a random token held in a process-local table and handed
//! to the browser as an HttpOnly cookie. Sessions do not survive a
//! restart; clients simply log in again.

use rand::RngCore;
use std::collections::HashMap;
use std::sync::RwLock;
use veridoc_types::UserId;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "veridoc_session";

/// Token length in random bytes (hex-encoded on the wire).
const TOKEN_BYTES: usize = 32;

#[derive(Default)]
pub struct SessionManager {
    sessions: RwLock<HashMap<String, UserId>>,
}

impl SessionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint a fresh session token for a user.
    pub fn create(&self, user_id: UserId) -> String {
        let mut bytes = [0u8; TOKEN_BYTES];
        rand::thread_rng().fill_bytes(&mut bytes);
        let token = hex::encode(bytes);
        self.sessions
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(token.clone(), user_id);
        token
    }

    /// Resolve a token to its user, if the session is live.
    pub fn resolve(&self, token: &str) -> Option<UserId> {
        self.sessions
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(token)
            .cloned()
    }

    /// Drop a session. Unknown tokens are a no-op.
    pub fn revoke(&self, token: &str) {
        self.sessions
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .remove(token);
    }
}

/// `Set-Cookie` value establishing a session.
pub fn session_cookie(token: &str) -> String {
    format!("{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax")
}

/// `Set-Cookie` value clearing the session.
pub fn clear_cookie() -> String {
    format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

/// Pull the session token out of a `Cookie` request header.
pub fn token_from_cookie_header(header: &str) -> Option<&str> {
    header.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == SESSION_COOKIE).then_some(value)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_resolve_revoke() {
        let sessions = SessionManager::new();
        let user = UserId::generate();

        let token = sessions.create(user.clone());
        assert_eq!(token.len(), TOKEN_BYTES * 2);
        assert_eq!(sessions.resolve(&token), Some(user));

        sessions.revoke(&token);
        assert_eq!(sessions.resolve(&token), None);
    }

    #[test]
    fn tokens_are_unique_per_login() {
        let sessions = SessionManager::new();
        let user = UserId::generate();
        assert_ne!(sessions.create(user.clone()), sessions.create(user));
    }

    #[test]
    fn cookie_header_parsing() {
        let token = "abc123";
        let header = format!("theme=dark; {}; other=1", session_cookie(token).split(';').next().unwrap());
        assert_eq!(token_from_cookie_header(&header), Some(token));
        assert_eq!(token_from_cookie_header("theme=dark"), None);
        assert_eq!(token_from_cookie_header(""), None);
    }
}
