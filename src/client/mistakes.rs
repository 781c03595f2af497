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
use studydesk_core::types::mistake::Mistake;
use studydesk_core::types::mistake::MistakeFilter;
use studydesk_core::types::mistake::MistakeUpdate;

use crate::client::ApiClient;
use crate::error::Fallible;

/// The mistake book: every question answered wrongly in an exam.
pub struct MistakesApi<'a> {
    client: &'a ApiClient,
}

impl<'a> MistakesApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, filter: &MistakeFilter) -> Fallible<Vec<Mistake>> {
        self.client
            .get_with_query(Endpoint::ListMistakes, filter)
            .await
    }

    pub async fn get(&self, id: Id) -> Fallible<Mistake> {
        self.client.get(Endpoint::GetMistake(id)).await
    }

    pub async fn update(&self, id: Id, update: &MistakeUpdate) -> Fallible<Mistake> {
        self.client
            .with_body(Endpoint::UpdateMistake(id), update)
            .await
    }

    pub async fn delete(&self, id: Id) -> Fallible<Message> {
        self.client.delete(Endpoint::DeleteMistake(id)).await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::helper::MockBackend;
    use crate::helper::fixtures;

    #[tokio::test]
    async fn test_list_unmastered() -> Fallible<()> {
        let backend = MockBackend::builder()
            .respond(
                "GET /api/mistakes",
                200,
                fixtures::list(&[fixtures::mistake(1, fixtures::question(4, 2, "short_answer"))]),
            )
            .start()
            .await?;
        let filter = MistakeFilter {
            direction_id: Some(1),
            mastered: Some(false),
        };
        let mistakes: Vec<Mistake> = backend.client()?.mistakes().list(&filter).await?;
        assert_eq!(mistakes[0].question_id, 4);
        assert_eq!(mistakes[0].question.as_ref().map(|q| q.id), Some(4));
        assert_eq!(
            backend.last_request().query.as_deref(),
            Some("direction_id=1&mastered=false")
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_mark_mastered() -> Fallible<()> {
        let mut mastered = fixtures::mistake(1, fixtures::question(4, 2, "short_answer"));
        mastered["mastered"] = json!(true);
        let backend = MockBackend::builder()
            .respond("PATCH /api/mistakes/1", 200, mastered)
            .start()
            .await?;
        let update = MistakeUpdate {
            mastered: Some(true),
            review_count: None,
        };
        let mistake: Mistake = backend.client()?.mistakes().update(1, &update).await?;
        assert!(mistake.mastered);
        assert_eq!(backend.last_request().json(), json!({"mastered": true}));
        Ok(())
    }

    #[tokio::test]
    async fn test_get_and_delete() -> Fallible<()> {
        let backend = MockBackend::builder()
            .respond(
                "GET /api/mistakes/1",
                200,
                fixtures::mistake(1, fixtures::question(4, 2, "short_answer")),
            )
            .respond("DELETE /api/mistakes/1", 200, fixtures::deleted())
            .start()
            .await?;
        let client: ApiClient = backend.client()?;
        assert_eq!(client.mistakes().get(1).await?.review_count, 1);
        client.mistakes().delete(1).await?;
        assert_eq!(backend.last_request().route(), "DELETE /api/mistakes/1");
        Ok(())
    }
}
