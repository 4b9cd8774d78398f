use tracing::warn;

use super::store::TokenStore;
use super::token;

/// The logged-in user as described by the token payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub username: String,
    pub full_name: String,
}

/// Answers "who is logged in" from the store's current contents.
///
/// Holds no token state of its own: every call re-reads the store, so the
/// answer always reflects what is persisted right now.
pub struct Session {
    store: TokenStore,
}

impl Session {
    pub fn new(store: TokenStore) -> Self {
        Self { store }
    }

    /// True if a token is stored.
    ///
    /// Presence is the only check made here. A stored token that fails to
    /// decode still counts as authenticated, even though `current_identity`
    /// on the same token returns `None`.
    pub fn is_authenticated(&self) -> bool {
        self.store.read().is_some()
    }

    /// The identity carried in the stored token, if it decodes.
    ///
    /// Claims missing from an otherwise decodable payload map to empty
    /// strings.
    pub fn current_identity(&self) -> Option<Identity> {
        let token = self.store.read()?;
        let claims = token::decode(&token)?;
        Some(Identity {
            username: claims.sub.unwrap_or_default(),
            full_name: claims.full_name.unwrap_or_default(),
        })
    }

    /// End the session by clearing the store.
    ///
    /// Always reports success; a storage failure is logged, not surfaced.
    pub fn logout(&self) -> bool {
        if let Err(e) = self.store.clear() {
            warn!(error = %e, "Failed to clear session storage");
        }
        true
    }
}
