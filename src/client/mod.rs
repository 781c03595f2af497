// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! An HTTP client for the study manager API.
//!
//! [`ApiClient`] owns one connection pool with the configured timeout. The
//! resource accessors (`directions()`, `materials()`, ...) borrow it and
//! expose one method per endpoint.

mod directions;
mod exams;
mod materials;
mod mistakes;
mod parse;
mod questions;

use reqwest::Client;
use reqwest::RequestBuilder;
use reqwest::Response;
use reqwest::StatusCode;
use reqwest::Url;
use reqwest::header::CONTENT_TYPE;
use reqwest::header::HeaderMap;
use reqwest::header::HeaderValue;
use serde::Serialize;
use serde::de::DeserializeOwned;
use studydesk_core::Endpoint;
use studydesk_core::Method;
use studydesk_core::types::Health;
use studydesk_core::types::Message;

pub use crate::client::directions::DirectionsApi;
pub use crate::client::exams::ExamsApi;
pub use crate::client::materials::MaterialsApi;
pub use crate::client::mistakes::MistakesApi;
pub use crate::client::parse::ParseApi;
pub use crate::client::parse::ParseFile;
pub use crate::client::questions::QuestionsApi;
use crate::config::ClientConfig;
use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::error::transport_error;

#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    /// Always ends with a slash, so relative paths join below it.
    base_url: Url,
}

impl ApiClient {
    pub fn new(config: &ClientConfig) -> Fallible<Self> {
        let base_url: Url = Url::parse(&format!("{}/", config.base_url.trim_end_matches('/')))
            .map_err(|e| ErrorReport::new(format!("Invalid base URL '{}': {e}", config.base_url)))?;
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let http: Client = Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .user_agent(concat!("studydesk/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(transport_error)?;
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn directions(&self) -> DirectionsApi<'_> {
        DirectionsApi::new(self)
    }

    pub fn materials(&self) -> MaterialsApi<'_> {
        MaterialsApi::new(self)
    }

    pub fn questions(&self) -> QuestionsApi<'_> {
        QuestionsApi::new(self)
    }

    pub fn exams(&self) -> ExamsApi<'_> {
        ExamsApi::new(self)
    }

    pub fn mistakes(&self) -> MistakesApi<'_> {
        MistakesApi::new(self)
    }

    pub fn parse(&self) -> ParseApi<'_> {
        ParseApi::new(self)
    }

    /// Ask the backend whether it is up.
    pub async fn health(&self) -> Fallible<Health> {
        self.send(Endpoint::Health, self.request(Endpoint::Health)?)
            .await
    }

    /// The absolute URL of an endpoint.
    pub fn url(&self, endpoint: Endpoint) -> Fallible<Url> {
        let path: String = endpoint.path();
        let relative: &str = path.trim_start_matches('/');
        let joined = if endpoint.is_api() {
            self.base_url.join(relative)
        } else {
            // Outside the API prefix: resolve against the prefix's parent.
            self.base_url.join(&format!("../{relative}"))
        };
        joined.map_err(|e| ErrorReport::new(format!("Invalid URL for {endpoint}: {e}")))
    }

    /// Start a request to an endpoint.
    pub(crate) fn request(&self, endpoint: Endpoint) -> Fallible<RequestBuilder> {
        let url: Url = self.url(endpoint)?;
        let method: reqwest::Method = match endpoint.method() {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        };
        log::debug!("{} {url}", endpoint.method());
        Ok(self.http.request(method, url))
    }

    /// Send a request and check that it succeeded.
    pub(crate) async fn execute(
        &self,
        endpoint: Endpoint,
        request: RequestBuilder,
    ) -> Fallible<Response> {
        let response: Response = request.send().await.map_err(|e| {
            log::warn!("{endpoint} failed: {e}");
            transport_error(e)
        })?;
        check_status(endpoint, response).await
    }

    /// Send a request and decode its JSON response.
    pub(crate) async fn send<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        request: RequestBuilder,
    ) -> Fallible<T> {
        let response: Response = self.execute(endpoint, request).await?;
        let bytes = response.bytes().await.map_err(transport_error)?;
        serde_json::from_slice(&bytes).map_err(|e| {
            ErrorReport::new(format!("Unexpected response from {endpoint}: {e}"))
        })
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, endpoint: Endpoint) -> Fallible<T> {
        self.send(endpoint, self.request(endpoint)?).await
    }

    pub(crate) async fn get_with_query<T, Q>(&self, endpoint: Endpoint, query: &Q) -> Fallible<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        self.send(endpoint, self.request(endpoint)?.query(query))
            .await
    }

    pub(crate) async fn with_body<T, B>(&self, endpoint: Endpoint, body: &B) -> Fallible<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send(endpoint, self.request(endpoint)?.json(body))
            .await
    }

    pub(crate) async fn delete(&self, endpoint: Endpoint) -> Fallible<Message> {
        self.send(endpoint, self.request(endpoint)?).await
    }
}

/// Turn an error response into an [`ErrorReport`] carrying the status and the
/// backend's explanation.
async fn check_status(endpoint: Endpoint, response: Response) -> Fallible<Response> {
    let status: StatusCode = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body: String = response.text().await.unwrap_or_default();
    let detail: String = error_detail(status, &body);
    log::warn!("{endpoint} returned {status}: {detail}");
    Err(ErrorReport::http(status.as_u16(), detail))
}

/// The backend reports errors as `{"detail": ...}`, where the detail is a
/// string or, for validation errors, a list of objects with a `msg`.
fn error_detail(status: StatusCode, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        match value.get("detail") {
            Some(serde_json::Value::String(detail)) => return detail.clone(),
            Some(serde_json::Value::Array(items)) => {
                let messages: Vec<String> = items
                    .iter()
                    .map(|item| match item.get("msg").and_then(|m| m.as_str()) {
                        Some(msg) => msg.to_string(),
                        None => item.to_string(),
                    })
                    .collect();
                if !messages.is_empty() {
                    return messages.join("; ");
                }
            }
            Some(other) => return other.to_string(),
            None => {}
        }
    }
    let body: &str = body.trim();
    if body.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string()
    } else {
        body.to_string()
    }
}
