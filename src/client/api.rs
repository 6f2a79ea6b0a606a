//! HTTP calls against the ubchat backend.
//!
//! Thin reqwest wrapper: it holds the base URL and the bearer token
//! from the last login, and decodes the server's `{code, message}`
//! error body into [`ClientError::Api`].

use reqwest::StatusCode;
use thiserror::Error;

use crate::shared::wire::{
    AuthResponse, ErrorBody, LoginRequest, MessageView, SendMessageRequest, SendMessageResponse,
    SignupRequest,
};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with an error body.
    #[error("{code}: {message} ({status})")]
    Api {
        status: StatusCode,
        code: String,
        message: String,
    },

    #[error("not logged in")]
    NotAuthenticated,
}

pub struct ChatApi {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ChatApi {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        }
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Drop the stored token. Client-side only; the server session is
    /// untouched and expires by TTL.
    pub fn clear_token(&mut self) {
        self.token = None;
    }

    pub async fn login(
        &mut self,
        username: &str,
        password: &str,
    ) -> Result<AuthResponse, ClientError> {
        let response = self
            .http
            .post(format!("{}/login", self.base_url))
            .json(&LoginRequest {
                username: username.to_string(),
                password: password.to_string(),
            })
            .send()
            .await?;
        let auth: AuthResponse = decode(response).await?;
        self.token = Some(auth.token.clone());
        Ok(auth)
    }

    pub async fn signup(
        &mut self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthResponse, ClientError> {
        let response = self
            .http
            .post(format!("{}/signup", self.base_url))
            .json(&SignupRequest {
                username: username.to_string(),
                email: email.to_string(),
                password: password.to_string(),
            })
            .send()
            .await?;
        let auth: AuthResponse = decode(response).await?;
        self.token = Some(auth.token.clone());
        Ok(auth)
    }

    pub async fn send_message(
        &self,
        request: &SendMessageRequest,
    ) -> Result<SendMessageResponse, ClientError> {
        let response = self
            .authorized(self.http.post(format!("{}/message", self.base_url)))?
            .json(request)
            .send()
            .await?;
        decode(response).await
    }

    pub async fn room_messages(&self, room_id: i64) -> Result<Vec<MessageView>, ClientError> {
        let response = self
            .authorized(self.http.get(format!("{}/messages", self.base_url)))?
            .query(&[("roomId", room_id.to_string())])
            .send()
            .await?;
        decode(response).await
    }

    pub async fn private_messages(
        &self,
        recipient_id: i64,
    ) -> Result<Vec<MessageView>, ClientError> {
        let response = self
            .authorized(self.http.get(format!("{}/private-messages", self.base_url)))?
            .query(&[("recipientId", recipient_id.to_string())])
            .send()
            .await?;
        decode(response).await
    }

    fn authorized(
        &self,
        builder: reqwest::RequestBuilder,
    ) -> Result<reqwest::RequestBuilder, ClientError> {
        let token = self.token.as_ref().ok_or(ClientError::NotAuthenticated)?;
        Ok(builder.bearer_auth(token))
    }
}

/// Decode a success body, or turn an error status plus `{code, message}`
/// body into `ClientError::Api`.
async fn decode<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json().await?);
    }
    let body = response.json::<ErrorBody>().await.unwrap_or(ErrorBody {
        code: "UNKNOWN".to_string(),
        message: format!("server returned {status}"),
    });
    Err(ClientError::Api {
        status,
        code: body.code,
        message: body.message,
    })
}
