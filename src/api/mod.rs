use crate::models::{
    Contract, ContractFilters, ContractStatus, ContractUpdate, NewContract, Witcher,
};
use crate::resource::CancelToken;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum ApiErrorKind {
    Network,
    Http { status: u16 },
    Parse,
    Cancelled,
}

#[derive(Clone, Debug, thiserror::Error)]
#[error("{message}")]
pub(crate) struct ApiError {
    pub kind: ApiErrorKind,
    pub message: String,
}

impl ApiError {
    fn network(e: reqwest::Error) -> Self {
        Self {
            kind: ApiErrorKind::Network,
            message: e.to_string(),
        }
    }

    fn parse(e: impl std::fmt::Display) -> Self {
        Self {
            kind: ApiErrorKind::Parse,
            message: e.to_string(),
        }
    }

    pub(crate) fn http(status: u16, message: String) -> Self {
        Self {
            kind: ApiErrorKind::Http { status },
            message,
        }
    }

    pub(crate) fn cancelled() -> Self {
        Self {
            kind: ApiErrorKind::Cancelled,
            message: "Request cancelled".to_string(),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.kind == ApiErrorKind::Cancelled
    }
}

pub(crate) type ApiResult<T> = Result<T, ApiError>;

pub(crate) const DEFAULT_API_URL: &str = "http://localhost:3000/api";

#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct EnvConfig {
    pub api_url: String,
}

impl EnvConfig {
    pub fn new() -> Self {
        // `window.ENV.API_URL` wins, `window.ENV.api_url` is accepted too.
        if let Some(env) = web_sys::window().and_then(|w| w.get("ENV")) {
            if !env.is_undefined() && env.is_object() {
                for key in ["API_URL", "api_url"] {
                    if let Ok(v) = js_sys::Reflect::get(&env, &key.into()) {
                        if let Some(url) = v.as_string().filter(|s| !s.trim().is_empty()) {
                            return Self::with_url(&url);
                        }
                    }
                }
            }
        }

        Self::with_url(DEFAULT_API_URL)
    }

    pub fn with_url(url: &str) -> Self {
        Self {
            api_url: url.trim().trim_end_matches('/').to_string(),
        }
    }
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Best-effort human message for a non-2xx response.
///
/// JSON bodies yield their `message` field, or the whole document when there
/// is none; other bodies yield their raw text. `HTTP {status}` is the last
/// resort.
pub(crate) fn error_message_from_body(status: u16, content_type: &str, body: &str) -> String {
    let fallback = || format!("HTTP {status}");

    if content_type.contains("application/json") {
        let Ok(data) = serde_json::from_str::<serde_json::Value>(body) else {
            return fallback();
        };
        if !is_truthy(&data) {
            return fallback();
        }
        return match data.get("message") {
            Some(serde_json::Value::String(m)) if !m.is_empty() => m.clone(),
            Some(m) if is_truthy(m) => m.to_string(),
            _ => data.to_string(),
        };
    }

    if body.is_empty() {
        fallback()
    } else {
        body.to_string()
    }
}

fn is_truthy(v: &serde_json::Value) -> bool {
    match v {
        serde_json::Value::Null => false,
        serde_json::Value::Bool(b) => *b,
        serde_json::Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        serde_json::Value::String(s) => !s.is_empty(),
        _ => true,
    }
}

/// Path (relative to the API base) of the filtered contracts list.
///
/// Only filters that are actually set end up in the query string.
pub(crate) fn contracts_query_path(filters: &ContractFilters) -> String {
    let mut params: Vec<String> = Vec::with_capacity(2);

    let title = filters.title.trim();
    if !title.is_empty() {
        params.push(format!("title={}", urlencoding::encode(title)));
    }
    if let Some(status) = filters.status {
        params.push(format!("status={}", urlencoding::encode(status.as_ref())));
    }

    if params.is_empty() {
        "/contracts/".to_string()
    } else {
        format!("/contracts/?{}", params.join("&"))
    }
}

/// Lenient list decoding: anything but an array is an empty list, and
/// entries that do not decode are skipped.
fn parse_list<T: DeserializeOwned>(data: serde_json::Value) -> Vec<T> {
    match data {
        serde_json::Value::Array(items) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => vec![],
    }
}

#[derive(Clone, Debug)]
pub(crate) struct ApiClient {
    pub(crate) base_url: String,
}

impl ApiClient {
    pub fn new(base_url: String) -> Self {
        Self { base_url }
    }

    pub fn from_env() -> Self {
        Self::new(EnvConfig::new().api_url)
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> ApiResult<reqwest::Response> {
        let url = self.url(path);
        log::debug!("{method} {url}");

        let client = reqwest::Client::new();
        let mut req = client.request(method.clone(), url);
        if let Some(b) = body {
            req = req.json(b);
        }

        let res = req.send().await.map_err(|e| {
            log::warn!("{method} {path} failed: {e}");
            ApiError::network(e)
        })?;

        if res.status().is_success() {
            return Ok(res);
        }

        let status = res.status().as_u16();
        let content_type = res
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let body = res.text().await.unwrap_or_default();
        let message = error_message_from_body(status, &content_type, &body);
        log::warn!("{method} {path} -> {status}: {message}");
        Err(ApiError::http(status, message))
    }

    /// Performs the request and decodes a JSON success body.
    pub(crate) async fn fetch_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> ApiResult<T> {
        let res = self.send(method, path, body).await?;
        res.json::<T>().await.map_err(ApiError::parse)
    }

    /// `GET` guarded by `token`; cancellation surfaces as
    /// [`ApiErrorKind::Cancelled`].
    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        token: &CancelToken,
    ) -> ApiResult<T> {
        token
            .run(self.fetch_json::<T, ()>(Method::GET, path, None))
            .await
            .unwrap_or_else(|_| Err(ApiError::cancelled()))
    }

    /// Like [`ApiClient::get_json`], but a cancelled request is `Ok(None)`.
    pub(crate) async fn fetch_json_or_none_on_cancel<T: DeserializeOwned>(
        &self,
        path: &str,
        token: &CancelToken,
    ) -> ApiResult<Option<T>> {
        match self.get_json(path, token).await {
            Ok(v) => Ok(Some(v)),
            Err(e) if e.is_cancelled() => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Write whose success body is ignored.
    pub(crate) async fn send_json<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> ApiResult<()> {
        self.send(method, path, Some(body)).await.map(|_| ())
    }

    pub async fn list_contracts(
        &self,
        filters: &ContractFilters,
        token: &CancelToken,
    ) -> ApiResult<Vec<Contract>> {
        let data: serde_json::Value = self.get_json(&contracts_query_path(filters), token).await?;
        Ok(parse_list(data))
    }

    pub async fn get_contract(&self, id: i64, token: &CancelToken) -> ApiResult<Contract> {
        self.get_json(&format!("/contracts/{id}"), token).await
    }

    pub async fn create_contract(&self, contract: &NewContract) -> ApiResult<()> {
        self.send_json(Method::POST, "/contracts/", contract).await
    }

    pub async fn update_contract(&self, id: i64, update: &ContractUpdate) -> ApiResult<()> {
        self.send_json(Method::PUT, &format!("/contracts/{id}"), update)
            .await
    }

    /// The endpoint takes the witcher id as a bare JSON number.
    pub async fn assign_contract(&self, id: i64, witcher_id: i64) -> ApiResult<()> {
        self.send_json(Method::PUT, &format!("/contracts/{id}/assignedTo"), &witcher_id)
            .await
    }

    /// The endpoint takes the status as a bare JSON string.
    pub async fn set_contract_status(&self, id: i64, status: ContractStatus) -> ApiResult<()> {
        self.send_json(Method::PUT, &format!("/contracts/{id}/status"), &status)
            .await
    }

    /// Full roster; `Ok(None)` when `token` was cancelled first.
    pub async fn list_witchers(&self, token: &CancelToken) -> ApiResult<Option<Vec<Witcher>>> {
        let data: Option<serde_json::Value> =
            self.fetch_json_or_none_on_cancel("/witchers/", token).await?;
        Ok(data.map(parse_list))
    }

    pub async fn get_witcher(&self, id: i64, token: &CancelToken) -> ApiResult<Witcher> {
        self.get_json(&format!("/witchers/{id}"), token).await
    }
}
