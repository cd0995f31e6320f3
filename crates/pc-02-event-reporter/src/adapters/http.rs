//! `reqwest` transport for `POST {base_url}/activity`.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use shared_types::{ActivityAck, ActivityReport};

use crate::domain::{TransportConfig, TransportError};
use crate::ports::ReportTransport;

/// Error body returned by the gateway.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    code: Option<String>,
}

pub struct HttpTransport {
    client: Client,
    activity_url: String,
}

impl HttpTransport {
    pub fn new(config: &TransportConfig) -> Result<Self, TransportError> {
        config.validate()?;
        let client = Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| TransportError::Config(e.to_string()))?;

        Ok(Self {
            client,
            activity_url: config.endpoint("activity"),
        })
    }

    pub fn activity_url(&self) -> &str {
        &self.activity_url
    }
}

fn network(error: reqwest::Error) -> TransportError {
    TransportError::Network(error.to_string())
}

#[async_trait]
impl ReportTransport for HttpTransport {
    async fn send(&self, report: &ActivityReport) -> Result<ActivityAck, TransportError> {
        let response = self
            .client
            .post(&self.activity_url)
            .json(report)
            .send()
            .await
            .map_err(network)?;

        let status = response.status();
        if !status.is_success() {
            let code = response
                .json::<ErrorBody>()
                .await
                .ok()
                .and_then(|body| body.code)
                .unwrap_or_else(|| status.as_str().to_string());
            return Err(TransportError::Rejected {
                status: status.as_u16(),
                code,
            });
        }

        response
            .json::<ActivityAck>()
            .await
            .map_err(|e| TransportError::Parse(e.to_string()))
    }
}
