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

pub use studydesk_core::error::ErrorReport;
pub use studydesk_core::error::Fallible;
pub use studydesk_core::error::fail;

/// Describe a failure of the HTTP client itself, as opposed to an error
/// response from the backend.
pub fn transport_error(err: reqwest::Error) -> ErrorReport {
    let url: String = err
        .url()
        .map(|url| url.to_string())
        .unwrap_or_else(|| "<unknown url>".to_string());
    if err.is_timeout() {
        ErrorReport::new(format!("request to {url} timed out"))
    } else if err.is_connect() {
        ErrorReport::new(format!("could not connect to the backend at {url}"))
    } else if err.is_decode() {
        ErrorReport::new(format!("malformed response from {url}: {err}"))
    } else {
        ErrorReport::new(format!("HTTP client error: {err}"))
    }
}
