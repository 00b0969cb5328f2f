use crate::errors::ClientError;
use crate::models::{GameDraft, GamePatch, GameRecord, StatsSummary};
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tracing::warn;

/// The games backend: owner of the authoritative catalog and counters.
#[async_trait]
pub trait GameBackend: Send + Sync {
    async fn list_games(&self) -> Result<Vec<GameRecord>, ClientError>;
    async fn create_game(&self, draft: &GameDraft) -> Result<GameRecord, ClientError>;
    async fn update_game(&self, id: &str, patch: &GamePatch) -> Result<GameRecord, ClientError>;
    async fn delete_game(&self, id: &str) -> Result<(), ClientError>;
    async fn increment_download(&self, id: &str) -> Result<(), ClientError>;
    async fn stats(&self) -> Result<StatsSummary, ClientError>;
}

/// REST client for a backend serving `/api/games` and `/api/stats`.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    api: String,
    client: Client,
}

impl HttpBackend {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, ClientError> {
        let mut builder = Client::builder().user_agent(concat!("gamehub/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self {
            api: format!("{}/api", base_url.trim_end_matches('/')),
            client,
        })
    }

    fn game_url(&self, id: &str) -> String {
        format!("{}/games/{}", self.api, encode_segment(id))
    }
}

#[async_trait]
impl GameBackend for HttpBackend {
    async fn list_games(&self) -> Result<Vec<GameRecord>, ClientError> {
        let response = self.client.get(format!("{}/games", self.api)).send().await?;
        let raw: Vec<Value> = check_status(response, None)?.json().await?;
        Ok(decode_games(raw))
    }

    async fn create_game(&self, draft: &GameDraft) -> Result<GameRecord, ClientError> {
        let response = self
            .client
            .post(format!("{}/games", self.api))
            .json(draft)
            .send()
            .await?;
        Ok(check_status(response, None)?.json().await?)
    }

    async fn update_game(&self, id: &str, patch: &GamePatch) -> Result<GameRecord, ClientError> {
        let response = self.client.put(self.game_url(id)).json(patch).send().await?;
        Ok(check_status(response, Some(id))?.json().await?)
    }

    async fn delete_game(&self, id: &str) -> Result<(), ClientError> {
        let response = self.client.delete(self.game_url(id)).send().await?;
        check_status(response, Some(id))?;
        Ok(())
    }

    async fn increment_download(&self, id: &str) -> Result<(), ClientError> {
        let response = self
            .client
            .post(format!("{}/download", self.game_url(id)))
            .send()
            .await?;
        check_status(response, Some(id))?;
        Ok(())
    }

    async fn stats(&self) -> Result<StatsSummary, ClientError> {
        let response = self.client.get(format!("{}/stats", self.api)).send().await?;
        Ok(check_status(response, None)?.json().await?)
    }
}

fn check_status(response: Response, id: Option<&str>) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    match (status, id) {
        (StatusCode::NOT_FOUND, Some(id)) => Err(ClientError::NotFound(id.to_string())),
        _ => Err(ClientError::Network(format!(
            "{} returned {status}",
            response.url().path()
        ))),
    }
}

/// Decodes a catalog listing record by record, skipping any that do not
/// decode, such as a category outside the known set.
fn decode_games(raw: Vec<Value>) -> Vec<GameRecord> {
    raw.into_iter()
        .filter_map(|value| {
            let id = value.get("id").and_then(Value::as_str).unwrap_or("?").to_string();
            serde_json::from_value(value)
                .map_err(|err| warn!("skipping game {id} from backend: {err}"))
                .ok()
        })
        .collect()
}

fn encode_segment(id: &str) -> String {
    urlencoding::encode(id).into_owned()
}
