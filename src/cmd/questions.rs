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

use clap::Subcommand;
use studydesk_core::types::Id;
use studydesk_core::types::question::Question;
use studydesk_core::types::question::QuestionFilter;
use studydesk_core::types::question::QuestionRating;
use studydesk_core::types::question::QuestionType;
use studydesk_core::types::question::QuestionUpdate;

use crate::client::ApiClient;
use crate::cmd::output::Describe;
use crate::cmd::output::OutputFormat;
use crate::cmd::output::field;
use crate::cmd::output::render_list;
use crate::cmd::output::render_one;
use crate::error::Fallible;
use crate::utils::truncate;

#[derive(Subcommand)]
pub enum QuestionCommand {
    /// List questions, newest first.
    List {
        #[arg(long)]
        material: Option<Id>,
        #[arg(long)]
        direction: Option<Id>,
        #[arg(long = "type")]
        question_type: Option<QuestionType>,
    },
    /// Show a question with its answer.
    Show { id: Id },
    /// Edit a question. Only the given fields change.
    Update {
        id: Id,
        #[arg(long)]
        content: Option<String>,
        /// Replace the options. Repeat once per option.
        #[arg(long = "option")]
        options: Vec<String>,
        #[arg(long)]
        answer: Option<String>,
        #[arg(long)]
        explanation: Option<String>,
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=5))]
        difficulty: Option<u8>,
    },
    /// Delete a question.
    Delete { id: Id },
    /// Rate the quality of a generated question.
    Rate { id: Id, rating: QuestionRating },
}

pub async fn run(
    client: &ApiClient,
    command: QuestionCommand,
    format: OutputFormat,
) -> Fallible<String> {
    let api = client.questions();
    match command {
        QuestionCommand::List {
            material,
            direction,
            question_type,
        } => {
            let filter = QuestionFilter {
                material_id: material,
                direction_id: direction,
                question_type,
            };
            render_list(format, &api.list(&filter).await?)
        }
        QuestionCommand::Show { id } => render_one(format, &api.get(id).await?),
        QuestionCommand::Update {
            id,
            content,
            options,
            answer,
            explanation,
            difficulty,
        } => {
            let update = QuestionUpdate {
                content,
                options: if options.is_empty() {
                    None
                } else {
                    Some(options)
                },
                answer,
                explanation,
                difficulty,
            };
            render_one(format, &api.update(id, &update).await?)
        }
        QuestionCommand::Delete { id } => render_one(format, &api.delete(id).await?),
        QuestionCommand::Rate { id, rating } => render_one(format, &api.rate(id, rating).await?),
    }
}

impl Describe for Question {
    fn summary(&self) -> String {
        format!(
            "#{} [{}] {} (difficulty {})",
            self.id,
            self.question_type,
            truncate(&self.content, 60),
            self.difficulty
        )
    }

    fn describe(&self) -> String {
        let mut out: String = format!(
            "#{} [{}] material #{}, difficulty {}\n\n{}",
            self.id,
            self.question_type,
            self.material_id,
            self.difficulty,
            self.content.trim()
        );
        for (label, option) in self.labeled_options() {
            out.push_str(&format!("\n  {label}. {option}"));
        }
        out.push('\n');
        field(&mut out, "Answer", Some(&self.answer));
        field(&mut out, "Explanation", self.explanation.as_deref());
        field(&mut out, "Rating", self.rating);
        out
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::helper::MockBackend;
    use crate::helper::fixtures;

    #[tokio::test]
    async fn test_list_by_type() -> Fallible<()> {
        let backend = MockBackend::builder()
            .respond(
                "GET /api/questions",
                200,
                fixtures::list(&[fixtures::question(1, 2, "true_false")]),
            )
            .start()
            .await?;
        let command = QuestionCommand::List {
            material: None,
            direction: Some(1),
            question_type: Some(QuestionType::TrueFalse),
        };
        let out: String = run(&backend.client()?, command, OutputFormat::Text).await?;
        assert_eq!(
            out,
            "#1 [true_false] Question 1 about ownership? (difficulty 2)"
        );
        assert_eq!(
            backend.last_request().query.as_deref(),
            Some("direction_id=1&question_type=true_false")
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_show_lists_lettered_options() -> Fallible<()> {
        let backend = MockBackend::builder()
            .respond("GET /api/questions/1", 200, fixtures::question(1, 2, "single_choice"))
            .start()
            .await?;
        let out: String = run(
            &backend.client()?,
            QuestionCommand::Show { id: 1 },
            OutputFormat::Text,
        )
        .await?;
        assert!(out.contains("\n  A. Stack\n  B. Heap\n  C. Register\n"));
        assert!(out.contains("\nAnswer: B"));
        assert!(!out.contains("Rating"));
        Ok(())
    }

    #[tokio::test]
    async fn test_update_with_options() -> Fallible<()> {
        let backend = MockBackend::builder()
            .respond("PATCH /api/questions/1", 200, fixtures::question(1, 2, "single_choice"))
            .start()
            .await?;
        let command = QuestionCommand::Update {
            id: 1,
            content: None,
            options: vec!["Stack".to_string(), "Heap".to_string()],
            answer: Some("A".to_string()),
            explanation: None,
            difficulty: None,
        };
        run(&backend.client()?, command, OutputFormat::Json).await?;
        assert_eq!(
            backend.last_request().json(),
            json!({"options": ["Stack", "Heap"], "answer": "A"})
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_rate() -> Fallible<()> {
        let backend = MockBackend::builder()
            .respond("PATCH /api/questions/2/rate", 200, fixtures::question(2, 2, "short_answer"))
            .start()
            .await?;
        let command = QuestionCommand::Rate {
            id: 2,
            rating: QuestionRating::Good,
        };
        run(&backend.client()?, command, OutputFormat::Text).await?;
        let request = backend.last_request();
        assert_eq!(request.method, "PATCH");
        assert_eq!(request.path, "/api/questions/2/rate");
        assert_eq!(request.json(), json!({"rating": "good"}));
        Ok(())
    }
}
