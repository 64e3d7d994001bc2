//! The reqwest-backed gateway implementation.

use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use console_core::{
    async_trait, ChannelInfo, ConfigDocument, DirectoryKind, Gateway, GatewayError, IdentityLink,
    IdentityRecord, LibraryInfo, SaveOutcome,
};

use crate::config::GatewayConfig;
use crate::wire::{
    AckResponse, ChannelsResponse, ConfigResponse, LibrariesResponse, MappingsResponse,
    RecordsResponse,
};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP implementation of the [`Gateway`] trait.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    http: Client,
    config: GatewayConfig,
}

impl HttpGateway {
    /// Build a client for the given configuration.
    pub fn new(config: GatewayConfig) -> Result<Self, GatewayError> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|err| GatewayError::Http(err.to_string()))?;
        Ok(Self { http, config })
    }

    /// Build a client from environment variables.
    pub fn from_env() -> Result<Self, GatewayError> {
        Self::new(GatewayConfig::from_env())
    }

    /// The client's configuration.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.config.api_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, GatewayError> {
        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(|err| GatewayError::Http(err.to_string()))?;
        Self::decode(response).await
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, GatewayError> {
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "Bot API answered with an error status");
            return Err(GatewayError::Api {
                status: status.as_u16(),
                message: message.trim().to_string(),
            });
        }
        response
            .json::<T>()
            .await
            .map_err(|err| GatewayError::Json(err.to_string()))
    }

    fn rejected(message: Option<String>) -> GatewayError {
        GatewayError::Rejected(message.unwrap_or_else(|| "request rejected".to_string()))
    }
}

#[async_trait]
impl Gateway for HttpGateway {
    async fn fetch_directory_records(
        &self,
        kind: DirectoryKind,
    ) -> Result<Vec<IdentityRecord>, GatewayError> {
        debug!(directory = %kind, "Fetching directory records");
        let response: RecordsResponse = self
            .send(self.http.get(self.config.directory_url(kind)))
            .await?;
        if !response.success {
            return Err(Self::rejected(response.message));
        }
        Ok(response.records)
    }

    async fn fetch_channels_for_guild(
        &self,
        guild_id: &str,
    ) -> Result<Vec<ChannelInfo>, GatewayError> {
        let response: ChannelsResponse = self
            .send(self.http.get(self.config.channels_url(guild_id)))
            .await?;
        if !response.success {
            return Err(Self::rejected(response.message));
        }
        Ok(response.channels)
    }

    async fn load_mappings(&self) -> Result<Vec<IdentityLink>, GatewayError> {
        let response: MappingsResponse =
            self.send(self.http.get(self.config.mappings_url())).await?;
        if !response.success {
            return Err(Self::rejected(response.message));
        }
        Ok(response.mappings)
    }

    async fn upsert_mapping(&self, link: &IdentityLink) -> Result<(), GatewayError> {
        debug!(primary_id = %link.primary_id, "Upserting mapping");
        let response: AckResponse = self
            .send(self.http.post(self.config.mappings_url()).json(link))
            .await?;
        if !response.success {
            return Err(Self::rejected(response.message));
        }
        Ok(())
    }

    async fn delete_mapping(&self, primary_id: &str) -> Result<(), GatewayError> {
        debug!(primary_id = %primary_id, "Deleting mapping");
        let response: AckResponse = self
            .send(self.http.delete(self.config.mapping_url(primary_id)))
            .await?;
        if !response.success {
            return Err(Self::rejected(response.message));
        }
        Ok(())
    }

    async fn load_libraries(&self) -> Result<Vec<LibraryInfo>, GatewayError> {
        let response: LibrariesResponse =
            self.send(self.http.get(self.config.libraries_url())).await?;
        if !response.success {
            return Err(Self::rejected(response.message));
        }
        Ok(response.libraries)
    }

    async fn load_config(&self) -> Result<ConfigDocument, GatewayError> {
        let response: ConfigResponse = self.send(self.http.get(self.config.config_url())).await?;
        if !response.success {
            return Err(Self::rejected(response.message));
        }
        Ok(response.config)
    }

    async fn save_config(&self, doc: &ConfigDocument) -> Result<SaveOutcome, GatewayError> {
        let response: AckResponse = self
            .send(self.http.post(self.config.config_url()).json(doc))
            .await?;
        if response.success {
            return Ok(SaveOutcome::Saved);
        }
        if !response.errors.is_empty() {
            // Per-field rejections go back to the operator verbatim.
            return Ok(SaveOutcome::Invalid(response.errors));
        }
        Err(Self::rejected(response.message))
    }
}
