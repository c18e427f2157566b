//! HTTP client for the list sharing service
//!
//! The service itself is external; this module only speaks its JSON
//! contract. Requests go through a [`Transport`] so the client can run
//! against [`HttpTransport`] or an in-process stand-in.

use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use super::payload::ShareRequest;
use crate::domain::Document;
use crate::storage::{import_state_data, StoreError};

/// Default sort order for list search
pub const DEFAULT_SEARCH_SORT: &str = "imports_desc";

#[derive(Debug, Error)]
pub enum ShareApiError {
    /// Non-2xx response
    #[error("{message}")]
    Status { status: u16, message: String },

    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Failed to decode response: {0}")]
    Decode(#[source] serde_json::Error),
}

impl ShareApiError {
    /// HTTP status for [`ShareApiError::Status`]
    pub fn status(&self) -> Option<u16> {
        match self {
            ShareApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// One outgoing request
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    /// JSON body
    pub body: Option<String>,
}

/// One raw response
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: String,
}

/// Performs a single request/response exchange
pub trait Transport {
    fn send(&self, request: HttpRequest) -> Result<HttpResponse, ShareApiError>;
}

/// Blocking `reqwest` transport without retries
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Transport for HttpTransport {
    fn send(&self, request: HttpRequest) -> Result<HttpResponse, ShareApiError> {
        let builder = match request.method {
            Method::Get => self.client.get(&request.url),
            Method::Post => self.client.post(&request.url),
        };
        let builder = match request.body {
            Some(body) => builder.header(CONTENT_TYPE, "application/json").body(body),
            None => builder,
        };

        let response = builder.send()?;
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body = response.text()?;

        Ok(HttpResponse {
            status,
            content_type,
            body,
        })
    }
}

/// Entry of `GET /catalog/games`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Game {
    pub game_key: String,
    pub game_name: String,
}

/// Entry of `GET /catalog/characters`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub character_key: String,
    pub character_name: String,
}

/// Entry of `GET /search`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListSummary {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub imports_count: u64,
    #[serde(default)]
    pub created_at: Value,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Response of `POST /lists`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatedList {
    pub id: String,
    pub share_url: String,
}

/// Response of `GET /lists/:id`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SharedList {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub payload_json: String,
    #[serde(default)]
    pub imports_count: u64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SharedList {
    /// Parses the embedded backup strictly, ready for merging
    pub fn document(&self) -> Result<Document, StoreError> {
        import_state_data(&self.payload_json)
    }
}

/// Response of `POST /lists/:id/imported`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportAck {
    pub id: String,
    pub imports_count: u64,
}

/// Filters for `GET /search`
#[derive(Debug, Clone, Default)]
pub struct SearchQuery {
    pub game_key: String,
    pub character_key: String,
    /// Defaults to [`DEFAULT_SEARCH_SORT`]
    pub sort: Option<String>,
    pub parent_id: Option<String>,
}

/// Client for the sharing service API
pub struct ShareApiClient<T: Transport> {
    transport: T,
    base_url: String,
}

impl ShareApiClient<HttpTransport> {
    /// Client over HTTP
    pub fn http(base_url: &str) -> Self {
        Self::new(HttpTransport::new(), base_url)
    }
}

impl<T: Transport> ShareApiClient<T> {
    pub fn new(transport: T, base_url: &str) -> Self {
        let base_url = base_url.strip_suffix('/').unwrap_or(base_url).to_string();
        Self {
            transport,
            base_url,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn request<R: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<String>,
    ) -> Result<R, ShareApiError> {
        let url = format!("{}{}", self.base_url, path);
        log::debug!("{:?} {}", method, url);

        let response = self.transport.send(HttpRequest { method, url, body })?;
        let data = read_response_body(&response)?;

        if !(200..300).contains(&response.status) {
            let message = data
                .as_ref()
                .and_then(|data| data.get("error"))
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| format!("Request failed ({})", response.status));
            return Err(ShareApiError::Status {
                status: response.status,
                message,
            });
        }

        serde_json::from_value(data.unwrap_or(Value::Null)).map_err(ShareApiError::Decode)
    }

    pub fn list_games(&self) -> Result<Vec<Game>, ShareApiError> {
        self.request(Method::Get, "/catalog/games", None)
    }

    pub fn list_characters(&self, game_key: &str) -> Result<Vec<Character>, ShareApiError> {
        let query = encode_query(&[("game_key", game_key)]);
        self.request(Method::Get, &format!("/catalog/characters?{}", query), None)
    }

    pub fn search_lists(&self, search: &SearchQuery) -> Result<Vec<ListSummary>, ShareApiError> {
        let mut pairs = vec![
            ("game_key", search.game_key.as_str()),
            ("character_key", search.character_key.as_str()),
            ("sort", search.sort.as_deref().unwrap_or(DEFAULT_SEARCH_SORT)),
        ];
        if let Some(parent_id) = search.parent_id.as_deref().filter(|p| !p.is_empty()) {
            pairs.push(("parent_id", parent_id));
        }
        self.request(Method::Get, &format!("/search?{}", encode_query(&pairs)), None)
    }

    pub fn create_list(&self, payload: &ShareRequest) -> Result<CreatedList, ShareApiError> {
        let body = serde_json::to_string(payload).map_err(ShareApiError::Decode)?;
        self.request(Method::Post, "/lists", Some(body))
    }

    pub fn get_list(&self, id: &str) -> Result<SharedList, ShareApiError> {
        self.request(
            Method::Get,
            &format!("/lists/{}", urlencoding::encode(id)),
            None,
        )
    }

    pub fn mark_imported(&self, id: &str) -> Result<ImportAck, ShareApiError> {
        self.request(
            Method::Post,
            &format!("/lists/{}/imported", urlencoding::encode(id)),
            None,
        )
    }
}

fn encode_query(pairs: &[(&str, &str)]) -> String {
    url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish()
}

/// JSON bodies are parsed; any other non-empty body becomes `{"error": text}`
fn read_response_body(response: &HttpResponse) -> Result<Option<Value>, ShareApiError> {
    let is_json = response
        .content_type
        .as_deref()
        .is_some_and(|ct| ct.contains("application/json"));

    if is_json {
        return serde_json::from_str(&response.body)
            .map(Some)
            .map_err(ShareApiError::Decode);
    }

    if response.body.is_empty() {
        Ok(None)
    } else {
        Ok(Some(serde_json::json!({ "error": response.body })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    /// Replies with canned responses and records every request
    struct StubTransport {
        calls: RefCell<Vec<HttpRequest>>,
        replies: RefCell<Vec<HttpResponse>>,
    }

    impl StubTransport {
        fn replying(replies: Vec<HttpResponse>) -> Self {
            Self {
                calls: RefCell::new(Vec::new()),
                replies: RefCell::new(replies.into_iter().rev().collect()),
            }
        }

        fn urls(&self) -> Vec<String> {
            self.calls.borrow().iter().map(|c| c.url.clone()).collect()
        }
    }

    impl Transport for StubTransport {
        fn send(&self, request: HttpRequest) -> Result<HttpResponse, ShareApiError> {
            self.calls.borrow_mut().push(request);
            Ok(self.replies.borrow_mut().pop().unwrap_or_else(|| json(200, "{}")))
        }
    }

    fn json(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            content_type: Some("application/json; charset=utf-8".to_string()),
            body: body.to_string(),
        }
    }

    fn text(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            content_type: Some("text/plain".to_string()),
            body: body.to_string(),
        }
    }

    fn sample_request() -> ShareRequest {
        ShareRequest {
            title: "list1".to_string(),
            game_key: "sf6".to_string(),
            character_key: "ryu".to_string(),
            payload_json: "{}".to_string(),
            turnstile_token: "token".to_string(),
            version_text: None,
            description: None,
            parent_id: None,
        }
    }

    #[test]
    fn uses_base_url_for_every_endpoint() {
        let transport = StubTransport::replying(vec![
            json(200, "[]"),
            json(200, "[]"),
            json(200, "[]"),
            json(200, r#"{"id":"abc","share_url":"https://x/abc"}"#),
            json(200, r#"{"id":"abc","title":"T","payload_json":"{}"}"#),
            json(200, r#"{"id":"abc","imports_count":1}"#),
        ]);
        let client = ShareApiClient::new(transport, "https://fgc-todo-sharing.nextround.workers.dev/");

        client.list_games().unwrap();
        client.list_characters("sf6").unwrap();
        client
            .search_lists(&SearchQuery {
                game_key: "sf6".to_string(),
                character_key: "ryu".to_string(),
                ..SearchQuery::default()
            })
            .unwrap();
        client.create_list(&sample_request()).unwrap();
        client.get_list("abc").unwrap();
        client.mark_imported("abc").unwrap();

        assert_eq!(
            client.transport().urls(),
            vec![
                "https://fgc-todo-sharing.nextround.workers.dev/catalog/games",
                "https://fgc-todo-sharing.nextround.workers.dev/catalog/characters?game_key=sf6",
                "https://fgc-todo-sharing.nextround.workers.dev/search?game_key=sf6&character_key=ryu&sort=imports_desc",
                "https://fgc-todo-sharing.nextround.workers.dev/lists",
                "https://fgc-todo-sharing.nextround.workers.dev/lists/abc",
                "https://fgc-todo-sharing.nextround.workers.dev/lists/abc/imported",
            ]
        );

        let calls = client.transport().calls.borrow();
        assert_eq!(calls[3].method, Method::Post);
        assert!(calls[3].body.as_deref().unwrap().contains("\"game_key\":\"sf6\""));
        assert_eq!(calls[5].method, Method::Post);
        assert_eq!(calls[5].body, None);
    }

    #[test]
    fn search_includes_parent_id() {
        let client = ShareApiClient::new(StubTransport::replying(vec![json(200, "[]")]), "https://api");
        client
            .search_lists(&SearchQuery {
                game_key: "sf6".to_string(),
                character_key: "ryu".to_string(),
                sort: Some("created_desc".to_string()),
                parent_id: Some("p 1".to_string()),
            })
            .unwrap();

        assert_eq!(
            client.transport().urls(),
            vec!["https://api/search?game_key=sf6&character_key=ryu&sort=created_desc&parent_id=p+1"]
        );
    }

    #[test]
    fn path_ids_are_percent_encoded() {
        let client = ShareApiClient::new(
            StubTransport::replying(vec![json(200, r#"{"id":"a/b","imports_count":2}"#)]),
            "https://api",
        );
        let ack = client.mark_imported("a/b").unwrap();

        assert_eq!(ack.imports_count, 2);
        assert_eq!(client.transport().urls(), vec!["https://api/lists/a%2Fb/imported"]);
    }

    #[test]
    fn error_message_comes_from_json_error_field() {
        let client = ShareApiClient::new(
            StubTransport::replying(vec![json(400, r#"{"error":"turnstile failed"}"#)]),
            "https://api",
        );
        let err = client.create_list(&sample_request()).unwrap_err();

        assert_eq!(err.status(), Some(400));
        assert_eq!(err.to_string(), "turnstile failed");
    }

    #[test]
    fn text_error_body_becomes_message() {
        let client = ShareApiClient::new(
            StubTransport::replying(vec![text(502, "bad gateway")]),
            "https://api",
        );
        let err = client.list_games().unwrap_err();

        assert_eq!(err.status(), Some(502));
        assert_eq!(err.to_string(), "bad gateway");
    }

    #[test]
    fn generic_message_without_body() {
        let client = ShareApiClient::new(StubTransport::replying(vec![text(404, "")]), "https://api");
        let err = client.get_list("x").unwrap_err();

        assert_eq!(err.to_string(), "Request failed (404)");
    }

    #[test]
    fn shared_list_payload_parses_as_document() {
        let payload = r#"{"schemaVersion":2,"currentListId":"s","lists":[{"id":"s","name":"Shared","createdAt":1}],"tasks":[{"id":"t","title":"A","status":"active","count":0,"listId":"s"}]}"#;
        let body = serde_json::json!({
            "id": "abc",
            "title": "Shared",
            "payload_json": payload,
            "imports_count": 4,
            "game_key": "sf6",
        })
        .to_string();
        let client = ShareApiClient::new(StubTransport::replying(vec![json(200, &body)]), "https://api");

        let shared = client.get_list("abc").unwrap();
        assert_eq!(shared.extra.get("game_key"), Some(&Value::from("sf6")));

        let doc = shared.document().unwrap();
        assert_eq!(doc.lists[0].name, "Shared");
        assert_eq!(doc.tasks.len(), 1);
    }
}
