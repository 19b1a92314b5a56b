//! Authenticated session and identity-provider access.
//!
//! Accounts live in an external identity service reached over its REST
//! API. This module holds the resulting session and turns provider
//! failures into messages fit for the user.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;

/// Minimum password length accepted at signup
pub const MIN_PASSWORD_LEN: usize = 6;

/// Default identity service REST endpoint
pub const DEFAULT_IDENTITY_URL: &str = "https://identitytoolkit.googleapis.com/v1";

/// Identity service configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AuthConfig {
    /// Web API key of the identity project
    pub api_key: Option<String>,
    pub base_url: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_IDENTITY_URL.to_string(),
        }
    }
}

/// An authenticated user session
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Session {
    /// Stable user identifier from the identity provider
    pub uid: String,
    /// Bearer token sent with remote document writes
    pub id_token: String,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Error, Debug, PartialEq)]
pub enum AuthError {
    #[error("missing required fields")]
    MissingFields,
    #[error("passwords do not match")]
    PasswordMismatch,
    #[error("password too short")]
    PasswordTooShort,
    #[error("invalid email address")]
    InvalidEmail,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("email already in use")]
    EmailInUse,
    #[error("identity service not configured")]
    NotConfigured,
    #[error("identity service unreachable: {0}")]
    Network(String),
    #[error("identity provider error: {0}")]
    Other(String),
}

impl AuthError {
    /// Classify an identity provider error code
    pub fn from_provider_code(code: &str) -> Self {
        match code {
            "auth/email-already-in-use" | "EMAIL_EXISTS" => AuthError::EmailInUse,
            "auth/invalid-email" | "INVALID_EMAIL" => AuthError::InvalidEmail,
            "auth/weak-password" | "WEAK_PASSWORD" => AuthError::PasswordTooShort,
            "auth/wrong-password"
            | "auth/user-not-found"
            | "auth/invalid-credential"
            | "INVALID_PASSWORD"
            | "EMAIL_NOT_FOUND"
            | "INVALID_LOGIN_CREDENTIALS" => AuthError::InvalidCredentials,
            other => AuthError::Other(other.to_string()),
        }
    }

    /// Message shown to the user
    pub fn user_message(&self) -> &'static str {
        match self {
            AuthError::MissingFields => "Please fill in all fields",
            AuthError::PasswordMismatch => "Passwords do not match",
            AuthError::PasswordTooShort => "Password must be at least 6 characters",
            AuthError::InvalidEmail => "Invalid email address",
            AuthError::InvalidCredentials => "Failed to login. Please check your credentials.",
            AuthError::EmailInUse => "Email already in use",
            AuthError::NotConfigured => "Set auth.api_key in the config file first",
            AuthError::Network(_) | AuthError::Other(_) => "Something went wrong. Please try again.",
        }
    }
}

/// Check a signup form before contacting the identity provider
pub fn validate_signup(
    name: &str,
    email: &str,
    password: &str,
    confirm_password: &str,
) -> Result<(), AuthError> {
    if [name, email, password, confirm_password]
        .iter()
        .any(|field| field.trim().is_empty())
    {
        return Err(AuthError::MissingFields);
    }
    if password != confirm_password {
        return Err(AuthError::PasswordMismatch);
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AuthError::PasswordTooShort);
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountResponse {
    local_id: String,
    id_token: String,
    email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Email/password accounts on the identity service
pub struct IdentityClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl IdentityClient {
    pub fn new(config: &AuthConfig) -> Result<Self, AuthError> {
        let api_key = config.api_key.clone().ok_or(AuthError::NotConfigured)?;
        let client = Client::builder()
            .build()
            .map_err(|e| AuthError::Network(e.to_string()))?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    /// Create an account and return its session
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        self.account_request("accounts:signUp", email, password).await
    }

    /// Sign in to an existing account
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        self.account_request("accounts:signInWithPassword", email, password)
            .await
    }

    async fn account_request(
        &self,
        action: &str,
        email: &str,
        password: &str,
    ) -> Result<Session, AuthError> {
        let url = format!("{}/{}", self.base_url, action);
        log::debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&json!({
                "email": email,
                "password": password,
                "returnSecureToken": true,
            }))
            .send()
            .await
            .map_err(|e| AuthError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(match serde_json::from_str::<ErrorResponse>(&body) {
                Ok(parsed) => AuthError::from_provider_code(provider_code(&parsed.error.message)),
                Err(_) => AuthError::Other(format!("HTTP {}", status.as_u16())),
            });
        }

        let account: AccountResponse = response
            .json()
            .await
            .map_err(|e| AuthError::Other(e.to_string()))?;

        Ok(Session {
            uid: account.local_id,
            id_token: account.id_token,
            email: account.email.or_else(|| Some(email.to_string())),
        })
    }
}

/// Error messages may carry detail after the code ("WEAK_PASSWORD : ...")
fn provider_code(message: &str) -> &str {
    message.split(" : ").next().unwrap_or(message).trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(server: &MockServer) -> AuthConfig {
        AuthConfig {
            api_key: Some("key-1".to_string()),
            base_url: server.uri(),
        }
    }

    #[test]
    fn test_validate_signup() {
        assert_eq!(
            validate_signup("", "a@b.c", "secret1", "secret1"),
            Err(AuthError::MissingFields)
        );
        assert_eq!(
            validate_signup("Yusuf", "a@b.c", "secret1", "secret2"),
            Err(AuthError::PasswordMismatch)
        );
        assert_eq!(
            validate_signup("Yusuf", "a@b.c", "abc", "abc"),
            Err(AuthError::PasswordTooShort)
        );
        assert!(validate_signup("Yusuf", "a@b.c", "secret1", "secret1").is_ok());
    }

    #[test]
    fn test_provider_codes() {
        assert_eq!(
            AuthError::from_provider_code("auth/email-already-in-use"),
            AuthError::EmailInUse
        );
        assert_eq!(
            AuthError::from_provider_code("INVALID_LOGIN_CREDENTIALS"),
            AuthError::InvalidCredentials
        );
        let other = AuthError::from_provider_code("auth/network-request-failed");
        assert_eq!(other.user_message(), "Something went wrong. Please try again.");
        assert_eq!(AuthError::EmailInUse.user_message(), "Email already in use");
    }

    #[tokio::test]
    async fn test_sign_up_returns_session() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/accounts:signUp"))
            .and(query_param("key", "key-1"))
            .and(body_partial_json(json!({"email": "a@b.c", "returnSecureToken": true})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "localId": "uid-9",
                "idToken": "tok",
                "email": "a@b.c"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = IdentityClient::new(&config(&server)).unwrap();
        let session = client.sign_up("a@b.c", "secret1").await.unwrap();
        assert_eq!(session.uid, "uid-9");
        assert_eq!(session.id_token, "tok");
        assert_eq!(session.email.as_deref(), Some("a@b.c"));
    }

    #[tokio::test]
    async fn test_provider_errors_are_classified() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/accounts:signUp"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": {"code": 400, "message": "EMAIL_EXISTS"}
            })))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/accounts:signInWithPassword"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": {"code": 400, "message": "INVALID_LOGIN_CREDENTIALS"}
            })))
            .mount(&server)
            .await;

        let client = IdentityClient::new(&config(&server)).unwrap();
        assert_eq!(
            client.sign_up("a@b.c", "secret1").await,
            Err(AuthError::EmailInUse)
        );
        assert_eq!(
            client.sign_in("a@b.c", "wrong-pw").await,
            Err(AuthError::InvalidCredentials)
        );
    }

    #[test]
    fn test_provider_code_strips_detail() {
        assert_eq!(
            provider_code("WEAK_PASSWORD : Password should be at least 6 characters"),
            "WEAK_PASSWORD"
        );
        assert_eq!(provider_code("EMAIL_EXISTS"), "EMAIL_EXISTS");
    }

    #[test]
    fn test_client_requires_api_key() {
        assert!(matches!(
            IdentityClient::new(&AuthConfig::default()),
            Err(AuthError::NotConfigured)
        ));
    }
}
