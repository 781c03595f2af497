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
use studydesk_core::types::question::Question;
use studydesk_core::types::question::QuestionFilter;
use studydesk_core::types::question::QuestionRating;
use studydesk_core::types::question::QuestionUpdate;
use studydesk_core::types::question::RateQuestion;

use crate::client::ApiClient;
use crate::error::Fallible;
use crate::error::fail;

pub struct QuestionsApi<'a> {
    client: &'a ApiClient,
}

impl<'a> QuestionsApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, filter: &QuestionFilter) -> Fallible<Vec<Question>> {
        self.client
            .get_with_query(Endpoint::ListQuestions, filter)
            .await
    }

    pub async fn get(&self, id: Id) -> Fallible<Question> {
        self.client.get(Endpoint::GetQuestion(id)).await
    }

    /// Change some fields of a question. Fields left as `None` are kept.
    pub async fn update(&self, id: Id, update: &QuestionUpdate) -> Fallible<Question> {
        if update.is_empty() {
            return fail("Nothing to update.");
        }
        self.client
            .with_body(Endpoint::UpdateQuestion(id), update)
            .await
    }

    pub async fn delete(&self, id: Id) -> Fallible<Message> {
        self.client.delete(Endpoint::DeleteQuestion(id)).await
    }

    pub async fn rate(&self, id: Id, rating: QuestionRating) -> Fallible<Question> {
        self.client
            .with_body(Endpoint::RateQuestion(id), &RateQuestion { rating })
            .await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use studydesk_core::types::question::QuestionType;

    use super::*;
    use crate::helper::MockBackend;
    use crate::helper::fixtures;

    #[tokio::test]
    async fn test_list_with_filter() -> Fallible<()> {
        let backend = MockBackend::builder()
            .respond(
                "GET /api/questions",
                200,
                fixtures::list(&[
                    fixtures::question(1, 2, "single_choice"),
                    fixtures::question(2, 2, "short_answer"),
                ]),
            )
            .start()
            .await?;
        let filter = QuestionFilter {
            material_id: Some(2),
            direction_id: None,
            question_type: Some(QuestionType::SingleChoice),
        };
        let questions: Vec<Question> = backend.client()?.questions().list(&filter).await?;
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].options().len(), 3);
        assert!(questions[1].options().is_empty());
        assert_eq!(
            backend.last_request().query.as_deref(),
            Some("material_id=2&question_type=single_choice")
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_update_sends_only_set_fields() -> Fallible<()> {
        let backend = MockBackend::builder()
            .respond(
                "PATCH /api/questions/4",
                200,
                fixtures::question(4, 2, "true_false"),
            )
            .start()
            .await?;
        let update = QuestionUpdate {
            answer: Some("false".to_string()),
            difficulty: Some(4),
            ..QuestionUpdate::default()
        };
        backend.client()?.questions().update(4, &update).await?;
        assert_eq!(
            backend.last_request().json(),
            json!({"answer": "false", "difficulty": 4})
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_empty_update_is_rejected_locally() -> Fallible<()> {
        let backend = MockBackend::builder().start().await?;
        let err = backend
            .client()?
            .questions()
            .update(4, &QuestionUpdate::default())
            .await
            .unwrap_err();
        assert_eq!(err.message(), "Nothing to update.");
        assert!(backend.requests().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_rate() -> Fallible<()> {
        let mut rated = fixtures::question(4, 2, "multi_choice");
        rated["rating"] = json!("bad");
        let backend = MockBackend::builder()
            .respond("PATCH /api/questions/4/rate", 200, rated)
            .start()
            .await?;
        let question: Question = backend
            .client()?
            .questions()
            .rate(4, QuestionRating::Bad)
            .await?;
        assert_eq!(question.rating, Some(QuestionRating::Bad));
        assert_eq!(backend.last_request().json(), json!({"rating": "bad"}));
        Ok(())
    }

    #[tokio::test]
    async fn test_get_and_delete() -> Fallible<()> {
        let backend = MockBackend::builder()
            .respond("GET /api/questions/1", 200, fixtures::question(1, 2, "single_choice"))
            .respond("DELETE /api/questions/1", 200, fixtures::deleted())
            .start()
            .await?;
        let client: ApiClient = backend.client()?;
        let question: Question = client.questions().get(1).await?;
        assert_eq!(question.question_type, QuestionType::SingleChoice);
        assert_eq!(question.answer, "B");
        client.questions().delete(1).await?;
        assert_eq!(backend.requests().len(), 2);
        Ok(())
    }
}
