//! HTTP client module for the account API.
//!
//! Provides the `AuthClient` for credential exchange (login, registration)
//! and for dispatching bearer-authenticated requests to the rest of the API.

pub mod client;
pub mod error;

pub use client::{AuthClient, CredentialOutcome, Registration};
pub use error::ApiError;
