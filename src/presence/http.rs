// src/presence/http.rs — REST client for the chat backend
//
// Endpoints (JSON):
//   GET {base}/specialists/{id}          -> SpecialistProfile, 404 when unknown
//   PUT {base}/specialists/{id}/status   <- {"status": "online"}
//   GET {base}/specialists/{id}/chats    -> [LiveChatSession]

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use super::{
    ActiveChatsSource, LiveChatSession, PresenceClient, PresenceError, SpecialistProfile,
    SpecialistStatus,
};
use crate::infra::config::BackendConfig;
use crate::infra::errors::DeskError;

pub struct HttpPresenceClient {
    client: Client,
    base_url: Url,
    api_key: Option<String>,
}

#[derive(Serialize)]
struct StatusBody {
    status: SpecialistStatus,
}

impl HttpPresenceClient {
    pub fn new(base_url: &str, api_key: Option<String>) -> Result<Self, DeskError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| DeskError::Config(format!("invalid backend.base_url '{base_url}': {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(DeskError::Config(format!(
                "backend.base_url '{base_url}' cannot carry a path"
            )));
        }
        Ok(Self {
            client: Client::new(),
            base_url,
            api_key,
        })
    }

    pub fn from_config(backend: &BackendConfig) -> Result<Self, DeskError> {
        Self::new(&backend.base_url, backend.api_key())
    }

    /// Append percent-encoded path segments to the base URL.
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn authed(&self, req: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => req.bearer_auth(key),
            None => req,
        }
    }

    /// GET a JSON body. `Ok(None)` on 404.
    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<Option<T>, PresenceError> {
        let resp = self.authed(self.client.get(url.clone())).send().await?;

        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !resp.status().is_success() {
            return Err(PresenceError::Status {
                endpoint: url.path().to_string(),
                code: resp.status().as_u16(),
            });
        }

        let bytes = resp.bytes().await?;
        Ok(Some(serde_json::from_slice(&bytes)?))
    }
}

#[async_trait]
impl PresenceClient for HttpPresenceClient {
    async fn get_specialist(&self, id: &str) -> Result<Option<SpecialistProfile>, PresenceError> {
        self.get_json(self.url(&["specialists", id])).await
    }

    async fn update_specialist_status(
        &self,
        id: &str,
        status: SpecialistStatus,
    ) -> Result<(), PresenceError> {
        let url = self.url(&["specialists", id, "status"]);
        let resp = self
            .authed(self.client.put(url.clone()))
            .json(&StatusBody { status })
            .send()
            .await?;

        if resp.status() == StatusCode::NOT_FOUND {
            return Err(PresenceError::UnknownSpecialist(id.to_string()));
        }
        if !resp.status().is_success() {
            return Err(PresenceError::Status {
                endpoint: url.path().to_string(),
                code: resp.status().as_u16(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl ActiveChatsSource for HttpPresenceClient {
    async fn active_chats(
        &self,
        specialist_id: &str,
    ) -> Result<Vec<LiveChatSession>, PresenceError> {
        let url = self.url(&["specialists", specialist_id, "chats"]);
        match self.get_json(url).await? {
            Some(chats) => Ok(chats),
            None => Err(PresenceError::UnknownSpecialist(specialist_id.to_string())),
        }
    }
}
