use std::time::Duration;

use reqwest::Client;

use anisko_core::config::CatalogConfig;
use anisko_core::models::{sort_episode_labels, AnimeSummary, AudioMode};

use super::error::CatalogError;
use super::types::{GraphQLResponse, ShowResponse, ShowsResponse};
use crate::traits::CatalogService;

const SEARCH_QUERY: &str = r#"
query ($search: SearchInput, $limit: Int, $page: Int,
       $translationType: VaildTranslationTypeEnumType, $countryOrigin: VaildCountryOriginEnumType) {
    shows(search: $search, limit: $limit, page: $page,
          translationType: $translationType, countryOrigin: $countryOrigin) {
        edges { _id name availableEpisodes thumbnail type __typename }
    }
}
"#;

const EPISODES_QUERY: &str = r#"
query ($showId: String!) {
    show(_id: $showId) { _id availableEpisodesDetail }
}
"#;

/// AllAnime GraphQL client.
///
/// Queries are sent as GET requests with `variables` and `query` in the
/// query string, which is what the public endpoint accepts.
#[derive(Clone)]
pub struct AllAnimeClient {
    http: Client,
    api_url: String,
    referer: String,
    search_limit: u32,
}

impl AllAnimeClient {
    pub fn new(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.as_str())
            .build()?;
        Ok(Self {
            http,
            api_url: config.api_url.clone(),
            referer: config.referer.clone(),
            search_limit: config.search_limit,
        })
    }

    /// Execute a GraphQL query and return its `data` payload.
    async fn graphql_request<T: serde::de::DeserializeOwned>(
        &self,
        operation: &str,
        query: &str,
        variables: serde_json::Value,
    ) -> Result<Option<T>, CatalogError> {
        tracing::debug!(operation, "AllAnime GraphQL request");

        let resp = self
            .http
            .get(&self.api_url)
            .header("Referer", &self.referer)
            .header("Accept", "application/json")
            .query(&[
                ("variables", variables.to_string()),
                ("query", query.to_string()),
            ])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let status_code = status.as_u16();
            let body = resp.text().await.unwrap_or_default();
            tracing::warn!(operation, status = status_code, "AllAnime API error");
            return Err(CatalogError::Api {
                status: status_code,
                message: body,
            });
        }

        tracing::debug!(operation, status = %status, "AllAnime response received");
        let body: GraphQLResponse<T> = resp
            .json()
            .await
            .map_err(|e| CatalogError::Parse(e.to_string()))?;

        if body.data.is_none() && !body.errors.is_empty() {
            let message = body.error_message();
            tracing::warn!(operation, %message, "AllAnime GraphQL error");
            return Err(CatalogError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(body.data)
    }
}

/// Variables for the `shows` search query.
pub(crate) fn search_variables(query: &str, mode: AudioMode, limit: u32) -> serde_json::Value {
    serde_json::json!({
        "search": {
            "allowAdult": false,
            "allowUnknown": false,
            "query": query,
        },
        "limit": limit,
        "page": 1,
        "translationType": mode.as_str(),
        "countryOrigin": "ALL",
    })
}

impl CatalogService for AllAnimeClient {
    type Error = CatalogError;

    async fn search(
        &self,
        query: &str,
        mode: AudioMode,
    ) -> Result<Vec<AnimeSummary>, CatalogError> {
        let data: Option<ShowsResponse> = self
            .graphql_request(
                "Search",
                SEARCH_QUERY,
                search_variables(query, mode, self.search_limit),
            )
            .await?;

        let edges = data
            .and_then(|d| d.shows)
            .map(|s| s.edges)
            .unwrap_or_default();
        tracing::debug!(query, count = edges.len(), "Search results");
        Ok(edges.into_iter().map(|e| e.into_summary(mode)).collect())
    }

    async fn list_episodes(
        &self,
        show_id: &str,
        mode: AudioMode,
    ) -> Result<Vec<String>, CatalogError> {
        let data: Option<ShowResponse> = self
            .graphql_request(
                "Episodes",
                EPISODES_QUERY,
                serde_json::json!({ "showId": show_id }),
            )
            .await?;

        let raw = data
            .and_then(|d| d.show)
            .map(|s| s.into_labels(mode))
            .unwrap_or_default();
        Ok(sort_episode_labels(raw))
    }
}
