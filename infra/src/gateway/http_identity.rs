//! reqwest-backed identity gateway

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use tracing::debug;

use th_core::domain::entities::user::UserRecord;
use th_core::domain::value_objects::auth_payload::AuthPayload;
use th_core::domain::value_objects::registration::NewRegistration;
use th_core::errors::GatewayError;
use th_core::gateway::IdentityGateway;
use th_shared::config::IdentityConfig;

use super::dto::{
    AuthResponse, ErrorResponse, LoginRequest, RefreshRequest, RefreshResponse, RegisterRequest,
};

/// Identity gateway speaking HTTP to the external session service
///
/// Status classification is the load-bearing part: 401/403 is the only
/// family allowed to start the refresh-or-expire path, everything
/// transport-shaped maps to a transient variant.
pub struct HttpIdentityGateway {
    client: Client,
    base_url: String,
}

impl HttpIdentityGateway {
    pub fn new(config: &IdentityConfig) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| GatewayError::Network {
                message: e.to_string(),
            })?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Turn a non-success response into the matching gateway error
    async fn error_for(response: Response) -> GatewayError {
        let status = response.status();
        let message = response
            .json::<ErrorResponse>()
            .await
            .ok()
            .and_then(|body| body.message)
            .unwrap_or_else(|| status.to_string());
        classify(status, message)
    }

    /// Decode a success body, treating a garbled one as a network fault
    async fn decode<T: serde::de::DeserializeOwned>(response: Response) -> Result<T, GatewayError> {
        response.json::<T>().await.map_err(|e| GatewayError::Network {
            message: format!("response body: {}", e),
        })
    }
}

/// Map an HTTP status to the gateway error family
fn classify(status: StatusCode, message: String) -> GatewayError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => GatewayError::AuthInvalid,
        StatusCode::CONFLICT => GatewayError::Conflict { message },
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            GatewayError::Validation { message }
        }
        status => GatewayError::Unavailable {
            status: status.as_u16(),
        },
    }
}

/// Map a reqwest transport failure to the transient family
fn transport(error: reqwest::Error) -> GatewayError {
    if error.is_timeout() {
        GatewayError::Timeout
    } else {
        GatewayError::Network {
            message: error.to_string(),
        }
    }
}

#[async_trait]
impl IdentityGateway for HttpIdentityGateway {
    async fn login(&self, email: &str, password: &str) -> Result<AuthPayload, GatewayError> {
        let response = self
            .client
            .post(self.url("/auth/login"))
            .json(&LoginRequest { email, password })
            .send()
            .await
            .map_err(transport)?;

        if !response.status().is_success() {
            return Err(Self::error_for(response).await);
        }
        let body: AuthResponse = Self::decode(response).await?;
        debug!("login round-trip succeeded");
        Ok(body.into())
    }

    async fn register(&self, registration: &NewRegistration) -> Result<AuthPayload, GatewayError> {
        let response = self
            .client
            .post(self.url("/auth/register"))
            .json(&RegisterRequest::from(registration))
            .send()
            .await
            .map_err(transport)?;

        if !response.status().is_success() {
            return Err(Self::error_for(response).await);
        }
        let body: AuthResponse = Self::decode(response).await?;
        Ok(body.into())
    }

    async fn verify_token(&self, access_token: &str) -> Result<(), GatewayError> {
        let response = self
            .client
            .get(self.url("/auth/verify"))
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(transport)?;

        if !response.status().is_success() {
            return Err(Self::error_for(response).await);
        }
        Ok(())
    }

    async fn refresh_token(&self, refresh_token: &str) -> Result<String, GatewayError> {
        let response = self
            .client
            .post(self.url("/auth/refresh"))
            .json(&RefreshRequest { refresh_token })
            .send()
            .await
            .map_err(transport)?;

        if !response.status().is_success() {
            return Err(Self::error_for(response).await);
        }
        let body: RefreshResponse = Self::decode(response).await?;
        Ok(body.access_token)
    }

    async fn fetch_current_user(&self, access_token: &str) -> Result<UserRecord, GatewayError> {
        let response = self
            .client
            .get(self.url("/users/me"))
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(transport)?;

        if !response.status().is_success() {
            return Err(Self::error_for(response).await);
        }
        Self::decode(response).await
    }

    async fn delete_account(&self, access_token: &str) -> Result<(), GatewayError> {
        let response = self
            .client
            .delete(self.url("/users/me"))
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(transport)?;

        if !response.status().is_success() {
            return Err(Self::error_for(response).await);
        }
        Ok(())
    }
}
