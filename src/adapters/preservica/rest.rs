//! REST implementation of the entity client
//!
//! Talks to the upstream preservation API over HTTPS with basic
//! authentication, retrying transient failures with exponential backoff.
//! Bitstream payloads are streamed chunk by chunk into the caller's sink.

use super::client::EntityClient;
use super::models::{
    BitstreamListDto, ContentObjectListDto, EntityDto, MetadataDto, RepresentationListDto,
};
use crate::config::PreservicaConfig;
use crate::domain::entity::{BitstreamInfo, Entity, EntityKind, EntityMetadata, RepresentationGroup};
use crate::domain::errors::{ArcaError, UpstreamError};
use crate::domain::ids::EntityRef;
use crate::domain::Result;
use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use futures::TryStreamExt;
use reqwest::{Client, ClientBuilder, Response};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tokio::io::{AsyncWrite, AsyncWriteExt};

/// REST entity client
pub struct RestEntityClient {
    base_url: String,
    client: Client,
    config: PreservicaConfig,
}

impl RestEntityClient {
    /// Create a new REST client from configuration
    pub fn new(config: PreservicaConfig) -> Result<Self> {
        let base_url = config.base_url.trim_end_matches('/').to_string();

        let mut builder = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(30));

        if !config.tls_verify {
            builder = builder.danger_accept_invalid_certs(true);
        }

        let client = builder.build().map_err(|e| {
            ArcaError::Configuration(format!("Failed to build HTTP client: {e}"))
        })?;

        Ok(Self {
            base_url,
            client,
            config,
        })
    }

    /// Base URL of the upstream API
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Lightweight reachability probe used before entering the run loop
    pub async fn health_check(&self) -> Result<()> {
        let url = format!("{}/api/entity/ping", self.base_url);
        let response = self.send_get(&url).await?;
        if response.status().is_success() {
            tracing::info!(base_url = %self.base_url, "Preservation API health check passed");
            Ok(())
        } else {
            let status = response.status().as_u16();
            tracing::error!(base_url = %self.base_url, status, "Preservation API health check failed");
            Err(UpstreamError::ServerError {
                status,
                message: "health check failed".to_string(),
            }
            .into())
        }
    }

    fn auth_header_value(&self) -> Option<String> {
        if let (Some(username), Some(password)) =
            (&self.config.username, &self.config.password)
        {
            let credentials = format!("{username}:{}", password.expose_secret().as_ref());
            let encoded = general_purpose::STANDARD.encode(credentials.as_bytes());
            Some(format!("Basic {encoded}"))
        } else {
            None
        }
    }

    async fn send_get(&self, url: &str) -> Result<Response> {
        let mut request = self.client.get(url);
        if let Some(auth) = self.auth_header_value() {
            request = request.header("Authorization", auth);
        }
        request.send().await.map_err(|e| {
            if e.is_timeout() {
                UpstreamError::Timeout(e.to_string()).into()
            } else {
                UpstreamError::ConnectionFailed(e.to_string()).into()
            }
        })
    }

    /// Retry a request with exponential backoff
    async fn retry_request<F, T, Fut>(&self, operation: F) -> Result<T>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = Result<T>>,
    {
        let max_retries = self.config.retry.max_retries;
        let mut attempt = 0;

        loop {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(e) => {
                    attempt += 1;
                    if attempt >= max_retries || !is_retryable(&e) {
                        return Err(e);
                    }

                    let delay_ms = self.config.retry.initial_delay_ms
                        * (self
                            .config
                            .retry
                            .backoff_multiplier
                            .powf((attempt - 1) as f64) as u64);
                    let delay_ms = delay_ms.min(self.config.retry.max_delay_ms);

                    tracing::warn!(
                        attempt,
                        max_retries,
                        delay_ms,
                        error = %e,
                        "Retrying upstream request after error"
                    );

                    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                }
            }
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        self.retry_request(|| async {
            let response = self.send_get(url).await?;
            let status = response.status();

            if status.is_success() {
                response
                    .json::<T>()
                    .await
                    .map_err(|e| UpstreamError::InvalidResponse(e.to_string()).into())
            } else {
                let status = status.as_u16();
                let message = response.text().await.unwrap_or_default();
                let err = match status {
                    404 => UpstreamError::EntityNotFound(url.to_string()),
                    401 | 403 => UpstreamError::AuthenticationFailed(message),
                    400..=499 => UpstreamError::ClientError { status, message },
                    _ => UpstreamError::ServerError { status, message },
                };
                Err(err.into())
            }
        })
        .await
    }

    fn kind_path(kind: EntityKind) -> &'static str {
        match kind {
            EntityKind::InformationObject => "information-objects",
            EntityKind::ContentObject => "content-objects",
        }
    }
}

/// Transient failures worth retrying; invariant and client errors are not
fn is_retryable(err: &ArcaError) -> bool {
    matches!(
        err,
        ArcaError::Upstream(
            UpstreamError::ConnectionFailed(_)
                | UpstreamError::Timeout(_)
                | UpstreamError::ServerError { .. }
        )
    )
}

#[async_trait]
impl EntityClient for RestEntityClient {
    async fn entity_by_type_and_ref(
        &self,
        kind: EntityKind,
        entity_ref: &EntityRef,
        parent_hint: Option<&EntityRef>,
    ) -> Result<Entity> {
        let mut url = format!(
            "{}/api/entity/{}/{entity_ref}",
            self.base_url,
            Self::kind_path(kind)
        );
        if let Some(parent) = parent_hint {
            url.push_str(&format!("?parent={parent}"));
        }

        let dto: EntityDto = self.get_json(&url).await?;
        dto.into_domain().map_err(Into::into)
    }

    async fn bitstream_info(&self, co_ref: &EntityRef) -> Result<Vec<BitstreamInfo>> {
        let url = format!(
            "{}/api/entity/content-objects/{co_ref}/bitstreams",
            self.base_url
        );
        let dto: BitstreamListDto = self.get_json(&url).await?;
        dto.bitstreams
            .into_iter()
            .map(|bs| bs.into_domain().map_err(Into::into))
            .collect()
    }

    async fn metadata_for_entity(&self, entity: &Entity) -> Result<EntityMetadata> {
        let url = format!(
            "{}/api/entity/{}/{}/metadata",
            self.base_url,
            Self::kind_path(entity.kind),
            entity.entity_ref
        );
        let dto: MetadataDto = self.get_json(&url).await?;
        dto.into_domain(entity.kind).map_err(Into::into)
    }

    async fn representation_urls_for_io(&self, io_ref: &EntityRef) -> Result<Vec<String>> {
        let url = format!(
            "{}/api/entity/information-objects/{io_ref}/representations",
            self.base_url
        );
        let dto: RepresentationListDto = self.get_json(&url).await?;
        Ok(dto.representations)
    }

    async fn content_objects_from_representation(
        &self,
        io_ref: &EntityRef,
        group: &RepresentationGroup,
    ) -> Result<Vec<EntityRef>> {
        let url = format!(
            "{}/api/entity/information-objects/{io_ref}/representations/{}/{}",
            self.base_url,
            group.rep_type.to_string().to_lowercase(),
            group.index
        );
        let dto: ContentObjectListDto = self.get_json(&url).await?;
        Ok(dto.content_objects)
    }

    async fn stream_bitstream(
        &self,
        url: &str,
        sink: &mut (dyn AsyncWrite + Send + Unpin),
    ) -> Result<()> {
        // No retry here: a mid-stream failure would leave partial bytes in
        // the sink, so the whole batch aborts and redelivery starts fresh.
        let response = self.send_get(url).await?;
        let status = response.status();
        if !status.is_success() {
            let status = status.as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(UpstreamError::TransferFailed(format!(
                "GET {url} returned {status}: {message}"
            ))
            .into());
        }

        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream
            .try_next()
            .await
            .map_err(|e| UpstreamError::TransferFailed(e.to_string()))?
        {
            sink.write_all(&chunk)
                .await
                .map_err(|e| UpstreamError::TransferFailed(e.to_string()))?;
        }
        sink.flush()
            .await
            .map_err(|e| UpstreamError::TransferFailed(e.to_string()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{secret_string, RetryConfig};

    fn sample_config() -> PreservicaConfig {
        PreservicaConfig {
            base_url: "https://preservica.example.com/".to_string(),
            secret_name: None,
            username: Some("arca".to_string()),
            password: Some(secret_string("pw".to_string())),
            timeout_seconds: 30,
            tls_verify: true,
            retry: RetryConfig::default(),
        }
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = RestEntityClient::new(sample_config()).unwrap();
        assert_eq!(client.base_url(), "https://preservica.example.com");
    }

    #[test]
    fn test_auth_header_is_basic() {
        let client = RestEntityClient::new(sample_config()).unwrap();
        let header = client.auth_header_value().unwrap();
        assert!(header.starts_with("Basic "));
    }

    #[test]
    fn test_auth_header_absent_without_credentials() {
        let mut config = sample_config();
        config.username = None;
        config.password = None;
        config.secret_name = Some("arca/preservica".to_string());
        let client = RestEntityClient::new(config).unwrap();
        assert!(client.auth_header_value().is_none());
    }

    #[test]
    fn test_retryable_classification() {
        assert!(is_retryable(
            &UpstreamError::Timeout("deadline".to_string()).into()
        ));
        assert!(is_retryable(
            &UpstreamError::ServerError {
                status: 503,
                message: String::new()
            }
            .into()
        ));
        assert!(!is_retryable(
            &UpstreamError::EntityNotFound("x".to_string()).into()
        ));
        assert!(!is_retryable(&ArcaError::Schema("bad".to_string())));
    }
}
