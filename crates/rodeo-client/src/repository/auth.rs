//! # Auth Repository
//!
//! Session bootstrap: trades credentials for a bearer token.

use reqwest::Method;
use tracing::{info, warn};

use rodeo_core::validation::validate_credentials;

use crate::client::{decode, server_message, ApiClient};
use crate::error::{ClientError, ClientResult};
use crate::session::AuthToken;
use crate::wire::{LoginBody, LoginResponse};

const LOGIN_FAILED: &str = "로그인에 실패했습니다. 서버 연결을 확인해주세요.";

#[derive(Debug, Clone)]
pub struct AuthRepository {
    client: ApiClient,
}

impl AuthRepository {
    pub fn new(client: ApiClient) -> Self {
        AuthRepository { client }
    }

    /// Logs in and stores the returned token in the session.
    ///
    /// ## Errors
    /// - `Core(Validation)` when a field is empty (no request sent)
    /// - `InvalidCredentials` with the server's `{error}` message on rejection
    /// - `FetchFailed` when the server cannot be reached
    pub async fn login(&self, username: &str, password: &str) -> ClientResult<()> {
        validate_credentials(username, password)?;

        let response = self
            .client
            .request(Method::POST, "api/auth/login")?
            .json(&LoginBody { username, password })
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Login request failed");
                ClientError::FetchFailed(LOGIN_FAILED.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = server_message(response)
                .await
                .unwrap_or_else(|| LOGIN_FAILED.to_string());
            warn!(username, status = status.as_u16(), "Login rejected");
            return Err(ClientError::InvalidCredentials(message));
        }

        let body: LoginResponse = decode(response).await?;
        let token = body.token.trim();
        if token.is_empty() {
            return Err(ClientError::malformed("login response has an empty token"));
        }

        self.client.session().sign_in(AuthToken::new(token))?;
        info!(username, "Logged in");
        Ok(())
    }

    /// Forgets the stored token. No request is made.
    pub fn logout(&self) -> ClientResult<()> {
        self.client.session().sign_out()?;
        info!("Logged out");
        Ok(())
    }
}
