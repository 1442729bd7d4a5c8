use futures::future::BoxFuture;
use repertoire_core::{format_line, MoveToken, RepertoireTree};
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::ClientConfig;
use crate::error::ApiError;

/// Anything that can answer "which moves follow this prefix".
///
/// The play assist only needs this one call; keeping it behind a trait lets
/// it run against a canned source in tests.
pub trait SuggestionSource: Send + Sync + 'static {
    fn suggestions(
        &self,
        name: String,
        line: Vec<MoveToken>,
    ) -> BoxFuture<'static, Result<Vec<MoveToken>, ApiError>>;
}

#[derive(Debug, Clone, Deserialize)]
pub struct SaveResponse {
    pub added: bool,
    pub lines: i32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepertoireSummary {
    pub name: String,
    pub lines: i32,
    pub updated_at: String,
}

#[derive(Deserialize)]
struct RepertoireResponse {
    repertoire: RepertoireTree,
}

#[derive(Serialize)]
struct LineBody<'a> {
    name: &'a str,
    line: String,
}

/// HTTP client for the repertoire storage service.
#[derive(Clone)]
pub struct RepertoireApi {
    client: Client,
    base_url: String,
}

impl RepertoireApi {
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let client = Client::builder()
            .user_agent("RepertoireTrainer/1.0")
            .timeout(config.timeout)
            .build()?;
        Ok(Self {
            client,
            base_url: config.api_url.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Append a line to the named repertoire.
    pub async fn save(&self, name: &str, line: &[MoveToken]) -> Result<SaveResponse, ApiError> {
        let resp = self
            .client
            .post(self.url("/api/submit"))
            .json(&LineBody {
                name,
                line: format_line(line),
            })
            .send()
            .await?;

        let resp = check_status(resp).await?;
        Ok(resp.json().await?)
    }

    /// Moves saved after `line`. Unknown names and prefixes give an empty list.
    pub async fn get_suggestions(
        &self,
        name: &str,
        line: &[MoveToken],
    ) -> Result<Vec<MoveToken>, ApiError> {
        let resp = self
            .client
            .post(self.url("/api/get_moves"))
            .json(&LineBody {
                name,
                line: format_line(line),
            })
            .send()
            .await?;

        let resp = check_status(resp).await?;
        let body: Value = resp.json().await?;
        let Value::Array(items) = body else {
            return Err(ApiError::Decode("expected an array of moves".into()));
        };

        // Skip anything that is not a move token rather than failing the whole lookup.
        Ok(items
            .iter()
            .filter_map(|item| item.as_str())
            .filter_map(|raw| match MoveToken::parse(raw) {
                Ok(token) => Some(token),
                Err(e) => {
                    tracing::warn!("Ignoring suggestion from server: {e}");
                    None
                }
            })
            .collect())
    }

    /// The whole tree for a name, or `None` if nothing was saved under it.
    pub async fn get_repertoire(&self, name: &str) -> Result<Option<RepertoireTree>, ApiError> {
        let resp = self
            .client
            .post(self.url("/api/get_repertoire"))
            .json(&serde_json::json!({ "name": name }))
            .send()
            .await?;

        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let resp = check_status(resp).await?;
        let body: RepertoireResponse = resp
            .json()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))?;
        Ok(Some(body.repertoire))
    }

    pub async fn list(&self) -> Result<Vec<RepertoireSummary>, ApiError> {
        let resp = self.client.get(self.url("/api/repertoires")).send().await?;
        let resp = check_status(resp).await?;
        Ok(resp.json().await?)
    }
}

impl SuggestionSource for RepertoireApi {
    fn suggestions(
        &self,
        name: String,
        line: Vec<MoveToken>,
    ) -> BoxFuture<'static, Result<Vec<MoveToken>, ApiError>> {
        let api = self.clone();
        Box::pin(async move { api.get_suggestions(&name, &line).await })
    }
}

/// Turn a non-2xx response into `ApiError::Server` using the `detail` field.
async fn check_status(resp: Response) -> Result<Response, ApiError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let detail = resp
        .json::<Value>()
        .await
        .ok()
        .and_then(|body| body.get("detail").and_then(|d| d.as_str()).map(String::from))
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("Unknown server error").to_string());

    Err(ApiError::Server {
        status: status.as_u16(),
        detail,
    })
}
