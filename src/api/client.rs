use reqwest::Client;
use thiserror::Error;
use url::Url;

use crate::{config::ApiConfig, domain::ClassificationResult};

use super::{
    payload::ClassificationPayload,
    response::{error_message, parse_success},
};

pub const CONNECTION_ERROR_MESSAGE: &str =
    "Connection error. Check that the classification server is running.";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("{message}")]
    Connection {
        message: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{message}")]
    Request { status: u16, message: String },
}

impl ClientError {
    fn connection(source: reqwest::Error) -> Self {
        Self::Connection {
            message: CONNECTION_ERROR_MESSAGE.to_string(),
            source,
        }
    }

    pub fn is_connection(&self) -> bool {
        matches!(self, Self::Connection { .. })
    }
}

#[derive(Clone)]
pub struct ClassifierClient {
    http: Client,
    endpoint: Url,
}

impl ClassifierClient {
    pub fn new(http: Client, endpoint: Url) -> Self {
        Self { http, endpoint }
    }

    pub fn from_config(http: Client, config: &ApiConfig) -> anyhow::Result<Self> {
        Ok(Self::new(http, config.endpoint()?))
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    // One POST, no retries.
    pub async fn submit(
        &self,
        payload: ClassificationPayload,
    ) -> Result<ClassificationResult, ClientError> {
        tracing::debug!(
            target: "api",
            endpoint = %self.endpoint,
            fields = payload.parts().len(),
            "submitting classification request"
        );

        let response = self
            .http
            .post(self.endpoint.clone())
            .multipart(payload.into_form())
            .send()
            .await
            .map_err(|err| {
                tracing::error!(target: "api", error = %err, endpoint = %self.endpoint, "classification request failed");
                ClientError::connection(err)
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|err| {
            tracing::error!(target: "api", error = %err, %status, "failed to read response body");
            ClientError::connection(err)
        })?;

        if !status.is_success() {
            let message = error_message(status, body);
            tracing::warn!(target: "api", %status, message = %message, "classification service returned an error");
            return Err(ClientError::Request {
                status: status.as_u16(),
                message,
            });
        }

        let result = parse_success(body);
        tracing::info!(
            target: "api",
            %status,
            category = result.category.as_deref().unwrap_or("-"),
            priority = result.priority.as_deref().unwrap_or("-"),
            "classification received"
        );
        Ok(result)
    }
}
