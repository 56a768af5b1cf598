use crate::config::Config;
use crate::domain::models::card::{Card, Suggestion};
use crate::outbound::store::{DeckStore, auth::AuthClient};
use anyhow::Context;
use reqwest::Client as ReqwestClient;
use serde::Deserialize;
use serde_json::{Value, json};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{error, info, warn};
use url::Url;

const CARDS_COLLECTION: &str = "cards";
const SUGGESTIONS_COLLECTION: &str = "suggestions";
const TABOO_LIST_FIELD: &str = "tabooList";
const REVIEWED_FIELD: &str = "reviewed";
const PAGE_SIZE: usize = 300;

#[derive(Debug, Deserialize)]
struct ListDocumentsResponse {
    #[serde(default)]
    documents: Vec<DocumentName>,
    #[serde(rename = "nextPageToken")]
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DocumentName {
    name: String,
}

#[derive(Debug, Deserialize)]
struct QueryResult {
    document: Option<Document>,
}

#[derive(Debug, Deserialize)]
struct Document {
    name: String,
    #[serde(default)]
    fields: Value,
}

/// Firestore REST client for the deck project. Reads page through the cards
/// collection; writes go through `documents:commit`, which applies the whole
/// batch atomically on the server.
#[derive(Clone)]
pub struct FirestoreClient {
    config: Config,
    http_client: ReqwestClient,
    auth_client: Arc<AuthClient>,
}

impl FirestoreClient {
    pub fn new(config: Config, auth_client: Arc<AuthClient>) -> Self {
        Self {
            config,
            http_client: ReqwestClient::new(),
            auth_client,
        }
    }

    fn documents_path(&self) -> String {
        format!(
            "projects/{}/databases/(default)/documents",
            self.config.project_id
        )
    }

    fn endpoint(&self, suffix: &str) -> Url {
        let mut url = self.config.firestore_base_url.clone();
        url.set_path(&format!("v1/{}{}", self.documents_path(), suffix));
        url
    }

    fn card_write(&self, card: &Card) -> Value {
        json!({
            "update": {
                "name": format!(
                    "{}/{}/{}",
                    self.documents_path(),
                    CARDS_COLLECTION,
                    card.taboo_word()
                ),
                "fields": {
                    TABOO_LIST_FIELD: {
                        "arrayValue": {
                            "values": card
                                .taboo_list()
                                .iter()
                                .map(|word| json!({ "stringValue": word }))
                                .collect::<Vec<_>>()
                        }
                    }
                }
            }
        })
    }

    async fn list_cards_page(
        &self,
        page_token: Option<&str>,
    ) -> anyhow::Result<ListDocumentsResponse> {
        let mut endpoint = self.endpoint(&format!("/{}", CARDS_COLLECTION));
        endpoint
            .query_pairs_mut()
            .append_pair("pageSize", &PAGE_SIZE.to_string())
            .append_pair("mask.fieldPaths", "__name__");
        if let Some(token) = page_token {
            endpoint.query_pairs_mut().append_pair("pageToken", token);
        }
        let mut auth_token = self
            .auth_client
            .get_valid_token()
            .await
            .context("failed to get a valid store token")?;
        for attempt in 0..2 {
            let response = self
                .http_client
                .get(endpoint.clone())
                .header("Authorization", &auth_token)
                .send()
                .await
                .context("failed to send deck read request")?;

            let status = response.status();
            if status == reqwest::StatusCode::UNAUTHORIZED && attempt == 0 {
                warn!("Deck read returned 401, refreshing token and retrying");
                auth_token = self
                    .auth_client
                    .get_valid_token()
                    .await
                    .context("failed to refresh store token after 401")?;
                continue;
            }

            if !status.is_success() {
                let error_text = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "failed to read error response".to_string());
                error!("Deck read failed: status {}, error: {}", status, error_text);
                anyhow::bail!("Deck read failed: status {}, error: {}", status, error_text);
            }

            return response
                .json::<ListDocumentsResponse>()
                .await
                .context("failed to parse deck read response");
        }
        anyhow::bail!("Deck read failed after token refresh")
    }
}

impl DeckStore for FirestoreClient {
    async fn fetch_card_words(&self) -> anyhow::Result<HashSet<String>> {
        let mut words = HashSet::new();
        let mut page_token: Option<String> = None;
        loop {
            let page = self.list_cards_page(page_token.as_deref()).await?;
            for document in page.documents {
                words.insert(document_id(&document.name).to_string());
            }
            match page.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }
        info!("Found {} existing card(s)", words.len());
        Ok(words)
    }

    async fn commit_cards(&self, cards: &[Card]) -> anyhow::Result<()> {
        let endpoint = self.endpoint(":commit");
        let writes: Vec<Value> = cards.iter().map(|card| self.card_write(card)).collect();
        let body = json!({ "writes": writes });
        let mut auth_token = self
            .auth_client
            .get_valid_token()
            .await
            .context("failed to get a valid store token")?;
        for attempt in 0..2 {
            let response = self
                .http_client
                .post(endpoint.clone())
                .header("Authorization", &auth_token)
                .json(&body)
                .send()
                .await
                .with_context(|| format!("failed to send batch write of {} card(s)", cards.len()))?;

            let status = response.status();
            if status == reqwest::StatusCode::UNAUTHORIZED && attempt == 0 {
                warn!("Batch write returned 401, refreshing token and retrying");
                auth_token = self
                    .auth_client
                    .get_valid_token()
                    .await
                    .context("failed to refresh store token after 401")?;
                continue;
            }

            if !status.is_success() {
                let error_text = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "failed to read error response".to_string());
                error!(
                    "Batch write of {} card(s) failed: status {}, error: {}",
                    cards.len(),
                    status,
                    error_text
                );
                anyhow::bail!(
                    "Batch write of {} card(s) failed: status {}, error: {}",
                    cards.len(),
                    status,
                    error_text
                );
            }

            return Ok(());
        }
        anyhow::bail!("Batch write failed after token refresh")
    }

    async fn fetch_suggestions(&self, reviewed: bool) -> anyhow::Result<Vec<Suggestion>> {
        let endpoint = self.endpoint(":runQuery");
        let body = json!({
            "structuredQuery": {
                "from": [{ "collectionId": SUGGESTIONS_COLLECTION }],
                "where": {
                    "fieldFilter": {
                        "field": { "fieldPath": REVIEWED_FIELD },
                        "op": "EQUAL",
                        "value": { "booleanValue": reviewed }
                    }
                }
            }
        });
        let mut auth_token = self
            .auth_client
            .get_valid_token()
            .await
            .context("failed to get a valid store token")?;
        for attempt in 0..2 {
            let response = self
                .http_client
                .post(endpoint.clone())
                .header("Authorization", &auth_token)
                .json(&body)
                .send()
                .await
                .context("failed to send suggestions query")?;

            let status = response.status();
            if status == reqwest::StatusCode::UNAUTHORIZED && attempt == 0 {
                warn!("Suggestions query returned 401, refreshing token and retrying");
                auth_token = self
                    .auth_client
                    .get_valid_token()
                    .await
                    .context("failed to refresh store token after 401")?;
                continue;
            }

            if !status.is_success() {
                let error_text = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "failed to read error response".to_string());
                error!(
                    "Suggestions query failed: status {}, error: {}",
                    status, error_text
                );
                anyhow::bail!(
                    "Suggestions query failed: status {}, error: {}",
                    status,
                    error_text
                );
            }

            let results: Vec<QueryResult> = response
                .json()
                .await
                .context("failed to parse suggestions query response")?;
            let suggestions = results
                .into_iter()
                .filter_map(|result| result.document)
                .map(|document| suggestion_from_document(&document))
                .collect();
            return Ok(suggestions);
        }
        anyhow::bail!("Suggestions query failed after token refresh")
    }
}

fn suggestion_from_document(document: &Document) -> Suggestion {
    Suggestion {
        taboo_word: document_id(&document.name).to_string(),
        taboo_list: string_array(&document.fields, TABOO_LIST_FIELD),
        reviewed: bool_field(&document.fields, REVIEWED_FIELD).unwrap_or(false),
    }
}

/// Firestore document names are full resource paths; the document id is the
/// last path segment.
fn document_id(name: &str) -> &str {
    name.rsplit('/').next().unwrap_or(name)
}

fn string_array(fields: &Value, field: &str) -> Vec<String> {
    fields
        .get(field)
        .and_then(|value| value.get("arrayValue"))
        .and_then(|value| value.get("values"))
        .and_then(Value::as_array)
        .map(|values| {
            values
                .iter()
                .filter_map(|value| value.get("stringValue").and_then(Value::as_str))
                .map(str::to_owned)
                .collect()
        })
        .unwrap_or_default()
}

fn bool_field(fields: &Value, field: &str) -> Option<bool> {
    fields
        .get(field)
        .and_then(|value| value.get("booleanValue"))
        .and_then(Value::as_bool)
}
