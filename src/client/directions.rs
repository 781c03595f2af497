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

use studydesk_core::Endpoint;
use studydesk_core::types::Id;
use studydesk_core::types::Message;
use studydesk_core::types::direction::Direction;
use studydesk_core::types::direction::NewDirection;

use crate::client::ApiClient;
use crate::error::Fallible;

/// Study directions: the top-level subjects everything else hangs off.
pub struct DirectionsApi<'a> {
    client: &'a ApiClient,
}

impl<'a> DirectionsApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Fallible<Vec<Direction>> {
        self.client.get(Endpoint::ListDirections).await
    }

    pub async fn create(&self, direction: &NewDirection) -> Fallible<Direction> {
        self.client
            .with_body(Endpoint::CreateDirection, direction)
            .await
    }

    pub async fn get(&self, id: Id) -> Fallible<Direction> {
        self.client.get(Endpoint::GetDirection(id)).await
    }

    pub async fn delete(&self, id: Id) -> Fallible<Message> {
        self.client.delete(Endpoint::DeleteDirection(id)).await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::helper::MockBackend;
    use crate::helper::fixtures;

    #[tokio::test]
    async fn test_list() -> Fallible<()> {
        let backend = MockBackend::builder()
            .respond(
                "GET /api/directions",
                200,
                fixtures::list(&[
                    fixtures::direction(1, "Rust"),
                    fixtures::direction(2, "Databases"),
                ]),
            )
            .start()
            .await?;
        let directions: Vec<Direction> = backend.client()?.directions().list().await?;
        assert_eq!(directions.len(), 2);
        assert_eq!(directions[1].name, "Databases");
        assert_eq!(backend.last_request().query, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_create_omits_missing_description() -> Fallible<()> {
        let backend = MockBackend::builder()
            .respond("POST /api/directions", 200, fixtures::direction(3, "Go"))
            .start()
            .await?;
        let created: Direction = backend
            .client()?
            .directions()
            .create(&NewDirection {
                name: "Go".to_string(),
                description: None,
            })
            .await?;
        assert_eq!(created.id, 3);
        assert_eq!(backend.last_request().json(), json!({"name": "Go"}));
        Ok(())
    }

    #[tokio::test]
    async fn test_get_and_delete() -> Fallible<()> {
        let backend = MockBackend::builder()
            .respond("GET /api/directions/7", 200, fixtures::direction(7, "Rust"))
            .respond("DELETE /api/directions/7", 200, fixtures::deleted())
            .start()
            .await?;
        let client: ApiClient = backend.client()?;
        assert_eq!(client.directions().get(7).await?.name, "Rust");
        let message: Message = client.directions().delete(7).await?;
        assert_eq!(message.message, "Deleted");
        assert_eq!(backend.last_request().route(), "DELETE /api/directions/7");
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_direction() -> Fallible<()> {
        let backend = MockBackend::builder()
            .respond(
                "GET /api/directions/9",
                404,
                r#"{"detail": "Direction not found"}"#,
            )
            .start()
            .await?;
        let err = backend.client()?.directions().get(9).await.unwrap_err();
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.message(), "HTTP 404: Direction not found");
        Ok(())
    }
}
