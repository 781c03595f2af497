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

use std::path::PathBuf;

use clap::Subcommand;
use studydesk_core::ProgressEvent;
use studydesk_core::types::Id;
use studydesk_core::types::material::Material;
use studydesk_core::types::material::NewMaterial;

use crate::client::ApiClient;
use crate::cmd::output::Describe;
use crate::cmd::output::OutputFormat;
use crate::cmd::output::field;
use crate::cmd::output::render_list;
use crate::cmd::output::render_one;
use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::error::fail;

#[derive(Subcommand)]
pub enum MaterialCommand {
    /// List materials.
    List {
        /// Only materials of this direction.
        #[arg(long)]
        direction: Option<Id>,
    },
    /// Show a material with its key points.
    Show { id: Id },
    /// Add a material. The backend extracts key points and generates
    /// questions from it.
    Create {
        #[arg(long)]
        direction: Id,
        #[arg(long)]
        title: String,
        /// The material text.
        #[arg(long, conflicts_with = "file", required_unless_present = "file")]
        content: Option<String>,
        /// Read the material text from a file.
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Delete a material and its questions.
    Delete { id: Id },
    /// Move a material to another direction.
    Move {
        id: Id,
        #[arg(long)]
        direction: Id,
    },
    /// Follow the processing of a material until it finishes.
    Progress { id: Id },
}

pub async fn run(
    client: &ApiClient,
    command: MaterialCommand,
    format: OutputFormat,
) -> Fallible<String> {
    let api = client.materials();
    match command {
        MaterialCommand::List { direction } => render_list(format, &api.list(direction).await?),
        MaterialCommand::Show { id } => render_one(format, &api.get(id).await?),
        MaterialCommand::Create {
            direction,
            title,
            content,
            file,
        } => {
            let content: String = match (content, file) {
                (Some(content), _) => content,
                (None, Some(path)) => tokio::fs::read_to_string(&path).await.map_err(|e| {
                    ErrorReport::new(format!("Failed to read {}: {e}", path.display()))
                })?,
                (None, None) => return fail("Either --content or --file is required."),
            };
            if content.trim().is_empty() {
                return fail("The material is empty.");
            }
            let material = NewMaterial {
                title,
                content,
                direction_id: direction,
            };
            render_one(format, &api.create(&material).await?)
        }
        MaterialCommand::Delete { id } => render_one(format, &api.delete(id).await?),
        MaterialCommand::Move { id, direction } => {
            render_one(format, &api.set_direction(id, direction).await?)
        }
        MaterialCommand::Progress { id } => {
            let mut events: Vec<ProgressEvent> = Vec::new();
            api.progress(id, |event| {
                if format == OutputFormat::Text {
                    println!("{}", progress_line(event));
                }
                events.push(event.clone());
            })
            .await?;
            match format {
                OutputFormat::Json => Ok(serde_json::to_string_pretty(&events)?),
                OutputFormat::Text => match events.last() {
                    Some(last) => Ok(format!("Finished: {}", last.step)),
                    None => Ok("No progress reported.".to_string()),
                },
            }
        }
    }
}

fn progress_line(event: &ProgressEvent) -> String {
    format!("[{:>3}%] {}: {}", event.progress, event.step, event.message)
}

impl Describe for Material {
    fn summary(&self) -> String {
        format!(
            "#{} [{}] {} (direction #{})",
            self.id, self.status, self.title, self.direction_id
        )
    }

    fn describe(&self) -> String {
        let mut out: String = self.summary();
        field(&mut out, "Created", Some(self.created_at.short()));
        if !self.key_points().is_empty() {
            out.push_str("\nKey points:");
            for point in self.key_points() {
                out.push_str(&format!(
                    "\n  [{}] {}: {}",
                    point.importance, point.point, point.description
                ));
            }
        }
        out.push_str("\n\n");
        out.push_str(self.content.trim());
        out
    }
}
