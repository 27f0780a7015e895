//! REST clients for the Firebase identity provider and realtime database.
//!
//! The identity provider is the Identity Toolkit API (`accounts:signUp`,
//! `accounts:signInWithPassword`); the database is the Realtime Database
//! REST API, which maps a storage path to a URL ending in `.json` and
//! returns collections as JSON objects keyed by generated id.

use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;

use crate::{
    backend::{AuthSession, BackendError, IdentityProvider, TransactionDatabase, UserProfile},
    transaction::{TransactionKind, TransactionRecord},
};

const IDENTITY_TOOLKIT_URL: &str = "https://identitytoolkit.googleapis.com/v1/";

/// A client for the Identity Toolkit REST API.
#[derive(Debug, Clone)]
pub struct FirebaseAuth {
    base_url: Url,
    api_key: String,
    http: reqwest::Client,
}

#[derive(Deserialize)]
struct SignInResponse {
    #[serde(rename = "localId")]
    local_id: String,
    email: String,
    #[serde(rename = "idToken")]
    id_token: String,
}

#[derive(Deserialize)]
struct ApiErrorResponse {
    error: ApiError,
}

#[derive(Deserialize)]
struct ApiError {
    message: String,
}

impl FirebaseAuth {
    /// Create a client that authenticates against the given web API key.
    pub fn new(api_key: &str) -> Self {
        Self {
            base_url: Url::parse(IDENTITY_TOOLKIT_URL)
                .expect("the Identity Toolkit base URL should parse"),
            api_key: api_key.to_owned(),
            http: reqwest::Client::new(),
        }
    }

    async fn post_credentials(
        &self,
        operation: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthSession, BackendError> {
        let mut endpoint = self
            .base_url
            .join(operation)
            .map_err(|error| BackendError::InvalidResponse(error.to_string()))?;
        endpoint.query_pairs_mut().append_pair("key", &self.api_key);

        let payload = serde_json::json!({
            "email": email,
            "password": password,
            "returnSecureToken": true,
        });

        let response = self
            .http
            .post(endpoint)
            .json(&payload)
            .send()
            .await
            .map_err(|error| BackendError::Transport(error.to_string()))?;

        if response.status().is_success() {
            let body: SignInResponse = response
                .json()
                .await
                .map_err(|error| BackendError::InvalidResponse(error.to_string()))?;

            return Ok(AuthSession {
                user_id: body.local_id,
                email: body.email,
                id_token: body.id_token,
            });
        }

        let message = response
            .json::<ApiErrorResponse>()
            .await
            .map(|body| body.error.message)
            .unwrap_or_else(|_| "unknown error".to_owned());

        Err(BackendError::Rejected(message))
    }
}

#[async_trait]
impl IdentityProvider for FirebaseAuth {
    async fn create_account(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthSession, BackendError> {
        self.post_credentials("accounts:signUp", email, password)
            .await
    }

    async fn verify_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthSession, BackendError> {
        self.post_credentials("accounts:signInWithPassword", email, password)
            .await
    }

    async fn sign_out(&self, _session: &AuthSession) -> Result<(), BackendError> {
        // Id tokens are stateless and expire on their own; signing out only
        // discards the local copy.
        Ok(())
    }
}

/// A client for the Realtime Database REST API.
#[derive(Debug, Clone)]
pub struct FirebaseDatabase {
    base_url: Url,
    http: reqwest::Client,
}

#[derive(Deserialize)]
struct PushResponse {
    name: String,
}

impl FirebaseDatabase {
    /// Create a client for the database at `database_url`, e.g.
    /// `https://cointrack-default-rtdb.firebaseio.com/`.
    ///
    /// # Errors
    ///
    /// Returns an error if `database_url` is not a valid URL.
    pub fn new(database_url: &str) -> Result<Self, BackendError> {
        let base_url = Url::parse(database_url)
            .map_err(|error| BackendError::InvalidResponse(format!("invalid database URL: {error}")))?;

        Ok(Self {
            base_url,
            http: reqwest::Client::new(),
        })
    }

    /// Build the REST URL for a storage path, authorised by the session's
    /// id token.
    fn path_url(&self, session: &AuthSession, path: &str) -> Result<Url, BackendError> {
        let mut url = self
            .base_url
            .join(&format!("{path}.json"))
            .map_err(|error| BackendError::InvalidResponse(error.to_string()))?;
        url.query_pairs_mut().append_pair("auth", &session.id_token);

        Ok(url)
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, BackendError> {
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        Err(BackendError::Rejected(format!("{status}: {body}")))
    }
}

#[async_trait]
impl TransactionDatabase for FirebaseDatabase {
    async fn write_profile(
        &self,
        session: &AuthSession,
        profile: &UserProfile,
    ) -> Result<(), BackendError> {
        let url = self.path_url(session, &format!("users/{}", session.user_id))?;

        let response = self
            .http
            .put(url)
            .json(profile)
            .send()
            .await
            .map_err(|error| BackendError::Transport(error.to_string()))?;

        Self::check_status(response).await.map(|_| ())
    }

    async fn read_partition(
        &self,
        session: &AuthSession,
        kind: TransactionKind,
    ) -> Result<Vec<(String, TransactionRecord)>, BackendError> {
        let url = self.path_url(
            session,
            &format!("users/{}/{}", session.user_id, kind.partition()),
        )?;

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|error| BackendError::Transport(error.to_string()))?;
        let response = Self::check_status(response).await?;

        // An empty partition is returned as JSON `null`.
        let records: Option<HashMap<String, TransactionRecord>> = response
            .json()
            .await
            .map_err(|error| BackendError::InvalidResponse(error.to_string()))?;

        Ok(records.unwrap_or_default().into_iter().collect())
    }

    async fn push(
        &self,
        session: &AuthSession,
        kind: TransactionKind,
        record: &TransactionRecord,
    ) -> Result<String, BackendError> {
        let url = self.path_url(
            session,
            &format!("users/{}/{}", session.user_id, kind.partition()),
        )?;

        let response = self
            .http
            .post(url)
            .json(record)
            .send()
            .await
            .map_err(|error| BackendError::Transport(error.to_string()))?;
        let response = Self::check_status(response).await?;

        let body: PushResponse = response
            .json()
            .await
            .map_err(|error| BackendError::InvalidResponse(error.to_string()))?;

        Ok(body.name)
    }

    async fn delete(
        &self,
        session: &AuthSession,
        kind: TransactionKind,
        id: &str,
    ) -> Result<(), BackendError> {
        let url = self.path_url(
            session,
            &format!("users/{}/{}/{}", session.user_id, kind.partition(), id),
        )?;

        let response = self
            .http
            .delete(url)
            .send()
            .await
            .map_err(|error| BackendError::Transport(error.to_string()))?;

        Self::check_status(response).await.map(|_| ())
    }
}

#[cfg(test)]
mod firebase_tests {
    use super::{FirebaseAuth, FirebaseDatabase};
    use crate::backend::AuthSession;

    fn test_session() -> AuthSession {
        AuthSession {
            user_id: "abc123".to_owned(),
            email: "test@example.com".to_owned(),
            id_token: "token".to_owned(),
        }
    }

    #[test]
    fn database_rejects_invalid_url() {
        assert!(FirebaseDatabase::new("not a url").is_err());
    }

    #[test]
    fn path_url_appends_json_suffix_and_auth() {
        let database = FirebaseDatabase::new("https://cointrack-default-rtdb.firebaseio.com/")
            .expect("URL should parse");

        let url = database
            .path_url(&test_session(), "users/abc123/incomes")
            .expect("path should produce a URL");

        assert_eq!(
            url.as_str(),
            "https://cointrack-default-rtdb.firebaseio.com/users/abc123/incomes.json?auth=token"
        );
    }

    #[test]
    fn auth_client_builds_with_api_key() {
        let auth = FirebaseAuth::new("test-key");
        assert_eq!(auth.api_key, "test-key");
    }
}
