use base64::{Engine, engine::general_purpose::STANDARD};
use chrono::Utc;
use reqwest::Client;

use crate::{
    config::Credentials,
    error::{EtlError, Result},
    types::{Token, TokenResponse},
};

const DEFAULT_EXPIRES_IN: u64 = 3600;

impl Token {
    /// Whether the token has outlived the lifetime the exchange reported.
    ///
    /// Tokens are fetched once per run and never refreshed; this is only used
    /// to explain a later 401.
    pub fn is_expired(&self) -> bool {
        let now = Utc::now().timestamp() as u64;
        now >= self.obtained_at.saturating_add(self.expires_in)
    }
}

/// Exchanges client credentials for a bearer token.
///
/// Performs the OAuth 2.0 client-credentials grant against `token_url`,
/// sending the credentials as HTTP Basic authentication.
///
/// # Errors
///
/// Returns [`EtlError::Auth`] when either credential is empty, the request
/// cannot be sent, the endpoint rejects the credentials, or the response has
/// no access token.
///
/// # Example
///
/// ```
/// let credentials = Credentials::new("client-id", "client-secret");
/// let token = request_token(&credentials, DEFAULT_TOKEN_URL).await?;
/// ```
pub async fn request_token(credentials: &Credentials, token_url: &str) -> Result<Token> {
    credentials.validate()?;

    let basic = STANDARD.encode(format!(
        "{}:{}",
        credentials.client_id, credentials.client_secret
    ));

    let client = Client::new();
    let res = client
        .post(token_url)
        .header("Authorization", format!("Basic {basic}"))
        .form(&[("grant_type", "client_credentials")])
        .send()
        .await
        .map_err(|e| EtlError::Auth(format!("token request failed: {e}")))?;

    let status = res.status();
    if !status.is_success() {
        let body = res.text().await.unwrap_or_default();
        return Err(EtlError::Auth(format!(
            "token request rejected with {status}: {body}"
        )));
    }

    let body: TokenResponse = res
        .json()
        .await
        .map_err(|e| EtlError::Auth(format!("token response could not be parsed: {e}")))?;

    token_from_response(body)
}

pub fn token_from_response(body: TokenResponse) -> Result<Token> {
    if body.access_token.is_empty() {
        return Err(EtlError::Auth(
            "token response did not contain an access token".to_string(),
        ));
    }

    Ok(Token {
        access_token: body.access_token,
        token_type: body.token_type.unwrap_or_else(|| "Bearer".to_string()),
        expires_in: body.expires_in.unwrap_or(DEFAULT_EXPIRES_IN),
        obtained_at: Utc::now().timestamp() as u64,
    })
}
