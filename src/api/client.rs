//! HTTP client for the account API.
//!
//! Login and registration are credential exchanges: they return a
//! [`CredentialOutcome`] rather than an error, and the rejected branch
//! carries text ready to show to the user. Anything else goes through
//! [`AuthClient::auth_fetch`], which refuses to touch the network without
//! a stored token.

use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{Client, Method, Response};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::auth::TokenStore;

use super::ApiError;

/// HTTP request timeout in seconds.
/// 30s allows for slow responses while still failing fast enough for a CLI.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Login endpoint path, relative to the server base URL.
const LOGIN_PATH: &str = "/api/auth/login";

/// Registration endpoint path.
const REGISTER_PATH: &str = "/api/auth/register";

/// Shown when the server rejects a login without saying why.
const LOGIN_FAILED_MSG: &str = "Login failed. Please try again.";

/// Shown when the login request itself fails (network down, server gone).
const LOGIN_UNAVAILABLE_MSG: &str = "An error occurred during login. Please try again later.";

/// Shown when the server rejects a registration without saying why.
const REGISTER_FAILED_MSG: &str = "Registration failed. Please try again.";

/// Shown when the registration request itself fails.
const REGISTER_UNAVAILABLE_MSG: &str =
    "An error occurred during registration. Please try again later.";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LoginRequest<'a> {
    username_or_email: &'a str,
    password: &'a str,
}

/// The server also returns `username` and `fullName` here; only the token
/// is consumed.
#[derive(Debug, Deserialize)]
struct LoginResponse {
    token: String,
}

/// Registration form data, serialized the way the API expects it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub username: String,
    pub user_full_name: String,
    pub user_email: String,
    pub user_password: String,
}

/// Result of a login or registration attempt.
///
/// `Rejected` carries the server's explanation, or a canned fallback when
/// none was provided, ready to show to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialOutcome {
    Accepted,
    Rejected { message: String },
}

impl CredentialOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, CredentialOutcome::Accepted)
    }

    fn rejected(message: impl Into<String>) -> Self {
        CredentialOutcome::Rejected {
            message: message.into(),
        }
    }
}

/// Client for the account API.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct AuthClient {
    http: Client,
    base_url: String,
    store: TokenStore,
}

impl AuthClient {
    pub fn new(base_url: impl Into<String>, store: TokenStore) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into(),
            store,
        })
    }

    /// Exchange a username (or email) and password for a bearer token.
    ///
    /// On acceptance the token is persisted in the store before returning.
    /// Never fails with an error: transport problems, unparseable success
    /// bodies, and storage failures all collapse to a `Rejected` outcome
    /// with a generic message, with the underlying cause logged.
    pub async fn login(&self, username_or_email: &str, password: &str) -> CredentialOutcome {
        let url = format!("{}{}", self.base_url, LOGIN_PATH);
        let body = LoginRequest {
            username_or_email,
            password,
        };

        let response = match self.http.post(&url).json(&body).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "Login request failed");
                return CredentialOutcome::rejected(LOGIN_UNAVAILABLE_MSG);
            }
        };

        if response.status().is_success() {
            let parsed: LoginResponse = match response.json().await {
                Ok(parsed) => parsed,
                Err(e) => {
                    warn!(error = %e, "Failed to parse login response");
                    return CredentialOutcome::rejected(LOGIN_UNAVAILABLE_MSG);
                }
            };
            if let Err(e) = self.store.save(&parsed.token) {
                warn!(error = %e, "Failed to persist token");
                return CredentialOutcome::rejected(LOGIN_UNAVAILABLE_MSG);
            }
            debug!(user = username_or_email, "Login accepted, token stored");
            CredentialOutcome::Accepted
        } else {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            debug!(%status, "Login rejected");
            if text.is_empty() {
                CredentialOutcome::rejected(LOGIN_FAILED_MSG)
            } else {
                CredentialOutcome::rejected(text)
            }
        }
    }

    /// Create a new account.
    ///
    /// Acceptance does not store anything; registering is not logging in.
    /// Same outcome handling as [`AuthClient::login`].
    pub async fn register(&self, registration: &Registration) -> CredentialOutcome {
        let url = format!("{}{}", self.base_url, REGISTER_PATH);

        let response = match self.http.post(&url).json(registration).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "Registration request failed");
                return CredentialOutcome::rejected(REGISTER_UNAVAILABLE_MSG);
            }
        };

        if response.status().is_success() {
            debug!(user = %registration.username, "Registration accepted");
            CredentialOutcome::Accepted
        } else {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            debug!(%status, "Registration rejected");
            if text.is_empty() {
                CredentialOutcome::rejected(REGISTER_FAILED_MSG)
            } else {
                CredentialOutcome::rejected(text)
            }
        }
    }

    /// Issue an authenticated request.
    ///
    /// Fails with [`ApiError::MissingToken`] before any network activity
    /// when no token is stored. `Authorization` and `Content-Type` are set
    /// from the session and overwrite any caller-supplied values for those
    /// two names in `headers`. The raw response is returned untouched,
    /// non-2xx statuses included; interpreting them is the caller's job.
    pub async fn auth_fetch(
        &self,
        method: Method,
        path: &str,
        headers: HeaderMap,
        body: Option<&Value>,
    ) -> Result<Response, ApiError> {
        let token = self.store.read().ok_or(ApiError::MissingToken)?;

        let mut headers = headers;
        let bearer = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|_| ApiError::InvalidToken)?;
        headers.insert(header::AUTHORIZATION, bearer);
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );

        let url = format!("{}{}", self.base_url, path);
        let mut request = self.http.request(method, &url).headers(headers);
        if let Some(body) = body {
            request = request.body(body.to_string());
        }

        Ok(request.send().await?)
    }
}
