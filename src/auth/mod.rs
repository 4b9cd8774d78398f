//! Session and credential state handling.
//!
//! This module owns the client side of authentication:
//! - `TokenStore`: persistent storage for the bearer token
//! - `token`: payload decoding for stored tokens
//! - `Session`: authentication status and current identity
//!
//! Tokens are stored exactly as issued and decoded on demand. No signature
//! verification happens on this side of the wire: this module provides
//! session bookkeeping, not cryptographic authentication. The server is the
//! only party that can actually vouch for a token.

pub mod session;
pub mod store;
pub mod token;

pub use session::{Identity, Session};
pub use store::TokenStore;
