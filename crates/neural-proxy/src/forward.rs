//! Request forwarding to llama-server.
//!
//! This module turns one gateway chat request into exactly one downstream
//! HTTP call and classifies the outcome. There is no retry and no backoff.

use async_trait::async_trait;
use reqwest::{Client, StatusCode, header};
use tracing::{debug, info};

use neural_core::{
    ChatCompletionRequest, ChatCompletionResponse, CompletionDefaults, CompletionPort,
    ForwardError, GatewayConfig,
};

use crate::health::{PROBE_TIMEOUT, probe_endpoint};

/// Forwards chat completions to the configured downstream endpoint.
#[derive(Debug, Clone)]
pub struct ChatForwarder {
    /// Client for completion calls, bounded by the request timeout.
    client: Client,
    /// Client for reachability probes, bounded by [`PROBE_TIMEOUT`].
    probe_client: Client,
    /// Downstream base URL, used by the probe.
    endpoint: String,
    /// `{endpoint}/v1/chat/completions`.
    completions_url: String,
    defaults: CompletionDefaults,
}

impl ChatForwarder {
    /// Build a forwarder from configuration.
    ///
    /// Connection pooling is disabled so every forward uses its own
    /// short-lived connection.
    pub fn new(config: &GatewayConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .pool_max_idle_per_host(0)
            .build()?;
        let probe_client = Client::builder()
            .timeout(PROBE_TIMEOUT)
            .pool_max_idle_per_host(0)
            .build()?;

        Ok(Self {
            client,
            probe_client,
            endpoint: config.llm_endpoint.clone(),
            completions_url: config.completions_url(),
            defaults: config.completion_defaults(),
        })
    }

    /// Downstream completion URL.
    pub fn completions_url(&self) -> &str {
        &self.completions_url
    }

    /// Forward one chat completion request.
    ///
    /// Failures are returned classified and are not logged here; the
    /// caller logs them with its own request context.
    pub async fn forward(
        &self,
        request: ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, ForwardError> {
        let mut request = request.with_defaults(&self.defaults);
        if request.stream {
            debug!(model = %request.model, "Streaming not supported, requesting full completion");
            request.stream = false;
        }

        info!(
            model = %request.model,
            endpoint = %self.completions_url,
            messages = request.messages.len(),
            "Forwarding request to LLM"
        );

        let response = self
            .client
            .post(&self.completions_url)
            .header(header::CONTENT_TYPE, "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| ForwardError::Unreachable(e.to_string()))?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(ForwardError::UpstreamStatus {
                status: status.as_u16(),
                body,
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| ForwardError::Unreachable(format!("failed to read response: {e}")))?;

        let completion: ChatCompletionResponse = serde_json::from_slice(&body)
            .map_err(|e| ForwardError::MalformedResponse(e.to_string()))?;

        info!(
            model = %request.model,
            endpoint = %self.completions_url,
            response_id = %completion.id,
            total_tokens = completion.usage.total_tokens,
            "Received response from LLM"
        );

        Ok(completion)
    }
}

#[async_trait]
impl CompletionPort for ChatForwarder {
    async fn complete(
        &self,
        request: ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, ForwardError> {
        self.forward(request).await
    }

    async fn is_reachable(&self) -> bool {
        probe_endpoint(&self.probe_client, &self.endpoint).await
    }
}
