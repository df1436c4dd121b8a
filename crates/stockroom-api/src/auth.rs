// Auth resource
//
// Bearer-token login, verification, and logout. Unlike the equipment
// endpoints these calls never use the stored token slot: login has no
// token yet, and verify/logout act on the token they are handed.

use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use tracing::debug;

use crate::client::{ApiClient, handle_empty, handle_response, server_message};
use crate::error::Error;
use crate::models::AuthResponse;

/// Fallback message when the backend rejects a login without a reason.
pub const LOGIN_FAILED_MESSAGE: &str = "Login failed";

/// Login credentials: an account identifier plus its secret.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub identifier: String,
    pub secret: SecretString,
}

impl Credentials {
    pub fn new(identifier: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            secret: SecretString::from(secret.into()),
        }
    }
}

impl ApiClient {
    /// Exchange credentials for a user + bearer token.
    ///
    /// `POST /auth/login`. Any non-success status becomes
    /// [`Error::Authentication`] carrying the server's `message` when one
    /// was sent, or [`LOGIN_FAILED_MESSAGE`].
    pub async fn login(&self, credentials: &Credentials) -> Result<AuthResponse, Error> {
        let url = self.auth_endpoint("auth/login")?;
        debug!(identifier = %credentials.identifier, "logging in at {url}");

        let body = json!({
            "identifier": credentials.identifier,
            "secret": credentials.secret.expose_secret(),
        });

        let resp = self.http().post(url).json(&body).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let raw = resp.text().await.unwrap_or_default();
            debug!(%status, "login rejected");
            return Err(Error::Authentication {
                message: server_message(&raw).unwrap_or_else(|| LOGIN_FAILED_MESSAGE.to_owned()),
            });
        }

        let auth = handle_response::<AuthResponse>(resp).await?;
        debug!(user = %auth.user.id, "login successful");
        Ok(auth)
    }

    /// Check a previously issued token.
    ///
    /// `GET /auth/verify` with the token as bearer. Returns the current
    /// user on success.
    pub async fn verify_token(&self, token: &SecretString) -> Result<AuthResponse, Error> {
        let url = self.auth_endpoint("auth/verify")?;
        debug!("verifying token at {url}");

        let resp = self
            .http()
            .get(url)
            .bearer_auth(token.expose_secret())
            .send()
            .await?;

        handle_response(resp).await
    }

    /// Tell the backend the token is no longer in use.
    ///
    /// `POST /auth/logout` with the token as bearer and an empty JSON body.
    pub async fn logout(&self, token: &SecretString) -> Result<(), Error> {
        let url = self.auth_endpoint("auth/logout")?;
        debug!("logging out at {url}");

        let resp = self
            .http()
            .post(url)
            .bearer_auth(token.expose_secret())
            .json(&json!({}))
            .send()
            .await?;

        handle_empty(resp).await?;
        debug!("logout complete");
        Ok(())
    }
}
