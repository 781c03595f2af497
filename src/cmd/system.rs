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

use studydesk_core::ROUTES;
use studydesk_core::RouteDef;
use studydesk_core::types::Health;
use studydesk_core::types::Message;

use crate::client::ApiClient;
use crate::cmd::output::Describe;
use crate::cmd::output::OutputFormat;
use crate::cmd::output::render_list;
use crate::cmd::output::render_one;
use crate::error::Fallible;
use crate::error::fail;

/// Check that the backend is up. Fails unless it reports `ok`.
pub async fn health(client: &ApiClient, format: OutputFormat) -> Fallible<String> {
    let health: Health = client.health().await?;
    if !health.is_ok() {
        return fail(format!(
            "The backend at {} reports status '{}'.",
            client.base_url(),
            health.status
        ));
    }
    render_one(format, &health)
}

/// The pages of the web console.
pub fn routes(format: OutputFormat) -> Fallible<String> {
    render_list(format, &ROUTES)
}

impl Describe for Health {
    fn summary(&self) -> String {
        format!("Backend status: {}", self.status)
    }
}

impl Describe for Message {
    fn summary(&self) -> String {
        self.message.clone()
    }
}

impl Describe for RouteDef {
    fn summary(&self) -> String {
        format!("{:<18} {:<12} {}", self.pattern, self.name, self.view)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helper::MockBackend;

    #[test]
    fn test_routes() -> Fallible<()> {
        let out: String = routes(OutputFormat::Text)?;
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 7);
        assert_eq!(lines[0], "/                  Home         HomeView");
        assert_eq!(lines[5], "/exam/:id/result   ExamResult   ExamResultView");
        let json: serde_json::Value = serde_json::from_str(&routes(OutputFormat::Json)?)?;
        assert_eq!(json[4]["pattern"], "/exam/:id");
        Ok(())
    }

    #[tokio::test]
    async fn test_health() -> Fallible<()> {
        let backend = MockBackend::builder()
            .respond("GET /health", 200, r#"{"status": "ok"}"#)
            .start()
            .await?;
        let out: String = health(&backend.client()?, OutputFormat::Text).await?;
        assert_eq!(out, "Backend status: ok");
        Ok(())
    }

    #[tokio::test]
    async fn test_unhealthy_backend() -> Fallible<()> {
        let backend = MockBackend::builder()
            .respond("GET /health", 200, r#"{"status": "degraded"}"#)
            .start()
            .await?;
        assert!(health(&backend.client()?, OutputFormat::Text).await.is_err());
        Ok(())
    }
}
