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
use studydesk_core::types::mistake::Mistake;
use studydesk_core::types::mistake::MistakeFilter;
use studydesk_core::types::mistake::MistakeUpdate;

use crate::client::ApiClient;
use crate::cmd::output::Describe;
use crate::cmd::output::OutputFormat;
use crate::cmd::output::field;
use crate::cmd::output::render_list;
use crate::cmd::output::render_one;
use crate::error::Fallible;
use crate::error::fail;
use crate::utils::truncate;

#[derive(Subcommand)]
pub enum MistakeCommand {
    /// List the mistake book.
    List {
        #[arg(long)]
        direction: Option<Id>,
        #[arg(long)]
        mastered: Option<bool>,
    },
    /// Show a mistake with its question.
    Show { id: Id },
    /// Change the mastery or the review count of a mistake.
    Update {
        id: Id,
        #[arg(long)]
        mastered: Option<bool>,
        #[arg(long)]
        review_count: Option<u32>,
    },
    /// Count one more review of a mistake.
    Review { id: Id },
    /// Remove a mistake from the book.
    Delete { id: Id },
}

pub async fn run(
    client: &ApiClient,
    command: MistakeCommand,
    format: OutputFormat,
) -> Fallible<String> {
    let api = client.mistakes();
    match command {
        MistakeCommand::List {
            direction,
            mastered,
        } => {
            let filter = MistakeFilter {
                direction_id: direction,
                mastered,
            };
            render_list(format, &api.list(&filter).await?)
        }
        MistakeCommand::Show { id } => render_one(format, &api.get(id).await?),
        MistakeCommand::Update {
            id,
            mastered,
            review_count,
        } => {
            if mastered.is_none() && review_count.is_none() {
                return fail("Nothing to update.");
            }
            let update = MistakeUpdate {
                mastered,
                review_count,
            };
            render_one(format, &api.update(id, &update).await?)
        }
        MistakeCommand::Review { id } => {
            render_one(format, &review(client, id).await?)
        }
        MistakeCommand::Delete { id } => render_one(format, &api.delete(id).await?),
    }
}

/// Increment the review count of a mistake.
pub async fn review(client: &ApiClient, id: Id) -> Fallible<Mistake> {
    let mistake: Mistake = client.mistakes().get(id).await?;
    let update = MistakeUpdate {
        mastered: None,
        review_count: Some(mistake.review_count + 1),
    };
    client.mistakes().update(id, &update).await
}

impl Describe for Mistake {
    fn summary(&self) -> String {
        let state: &str = if self.mastered { "mastered" } else { "open" };
        let question: String = match &self.question {
            Some(question) => truncate(&question.content, 60),
            None => format!("question #{}", self.question_id),
        };
        format!(
            "#{} [{state}] {question} (reviewed {}x)",
            self.id, self.review_count
        )
    }

    fn describe(&self) -> String {
        let mut out: String = self.summary();
        field(&mut out, "Recorded", Some(self.created_at.short()));
        if let Some(question) = &self.question {
            out.push_str("\n\n");
            out.push_str(&question.describe());
        }
        out
    }
}
