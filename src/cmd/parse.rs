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

use std::path::Path;
use std::path::PathBuf;

use clap::Subcommand;
use studydesk_core::types::Id;
use studydesk_core::types::parse::ParseTask;
use studydesk_core::types::parse::ParseTaskSummary;
use studydesk_core::types::parse::ParseText;
use studydesk_core::types::parse::ParseUrl;
use studydesk_core::types::parse::SourceType;
use studydesk_core::types::parse::TaskFilter;
use studydesk_core::types::parse::TaskStatus;
use studydesk_core::types::parse::is_supported_file;
use walkdir::WalkDir;

use crate::client::ApiClient;
use crate::client::ParseFile;
use crate::cmd::output::Describe;
use crate::cmd::output::OutputFormat;
use crate::cmd::output::field;
use crate::cmd::output::render_list;
use crate::cmd::output::render_one;
use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::error::fail;

#[derive(Subcommand)]
pub enum ParseCommand {
    /// Parse a piece of text.
    Text {
        #[arg(long)]
        title: String,
        #[arg(long)]
        direction: Option<Id>,
        #[arg(long, conflicts_with = "file", required_unless_present = "file")]
        text: Option<String>,
        /// Read the text from a file.
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Upload documents (.pdf, .docx, .md, .txt). Directories are searched
    /// recursively for supported files.
    File {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        /// Task title. Defaults to the file name without its extension, and
        /// can only be given for a single file.
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        direction: Option<Id>,
    },
    /// Parse a web page.
    Url {
        url: String,
        #[arg(long)]
        title: String,
        #[arg(long)]
        direction: Option<Id>,
    },
    /// List parse tasks.
    Tasks {
        #[arg(long)]
        skip: Option<u32>,
        #[arg(long)]
        limit: Option<u32>,
        #[arg(long)]
        direction: Option<Id>,
    },
    /// Show a parse task with its knowledge points and best practices.
    Task { id: Id },
    /// Delete a parse task.
    Delete { id: Id },
    /// Assign a task to a direction. Without `--direction`, the task is
    /// detached from its direction.
    Assign {
        id: Id,
        #[arg(long)]
        direction: Option<Id>,
    },
    /// Turn a completed task into a material and generate its questions.
    Generate { id: Id },
}

pub async fn run(
    client: &ApiClient,
    command: ParseCommand,
    format: OutputFormat,
) -> Fallible<String> {
    let api = client.parse();
    match command {
        ParseCommand::Text {
            title,
            direction,
            text,
            file,
        } => {
            let text: String = match (text, file) {
                (Some(text), _) => text,
                (None, Some(path)) => tokio::fs::read_to_string(&path).await.map_err(|e| {
                    ErrorReport::new(format!("Failed to read {}: {e}", path.display()))
                })?,
                (None, None) => return fail("Either --text or --file is required."),
            };
            if text.trim().is_empty() {
                return fail("The text to parse is empty.");
            }
            let request = ParseText {
                title,
                text,
                direction_id: direction,
            };
            render_one(format, &api.text(&request).await?)
        }
        ParseCommand::File {
            paths,
            title,
            direction,
        } => {
            let files: Vec<PathBuf> = collect_documents(&paths)?;
            if files.is_empty() {
                return fail("No supported documents found.");
            }
            if title.is_some() && files.len() > 1 {
                return fail("--title can only be used when uploading a single file.");
            }
            let mut tasks: Vec<ParseTask> = Vec::new();
            for path in files {
                let title: String = match &title {
                    Some(title) => title.clone(),
                    None => default_title(&path),
                };
                log::info!("Uploading {}", path.display());
                let request = ParseFile {
                    title,
                    path,
                    direction_id: direction,
                };
                match api.file(&request).await {
                    Ok(task) => tasks.push(task),
                    Err(e) => return Err(partial_upload_error(&tasks, e)),
                }
            }
            render_list(format, &tasks)
        }
        ParseCommand::Url {
            url,
            title,
            direction,
        } => {
            let request = ParseUrl {
                title,
                url,
                direction_id: direction,
            };
            render_one(format, &api.url(&request).await?)
        }
        ParseCommand::Tasks {
            skip,
            limit,
            direction,
        } => {
            let filter = TaskFilter {
                skip,
                limit,
                direction_id: direction,
            };
            render_list(format, &api.tasks(&filter).await?)
        }
        ParseCommand::Task { id } => render_one(format, &api.task(id).await?),
        ParseCommand::Delete { id } => render_one(format, &api.delete_task(id).await?),
        ParseCommand::Assign { id, direction } => {
            render_one(format, &api.set_direction(id, direction).await?)
        }
        ParseCommand::Generate { id } => render_one(format, &api.generate_questions(id).await?),
    }
}

/// Expand directories into the supported documents below them, sorted by
/// path. Plain files are kept as given.
fn collect_documents(paths: &[PathBuf]) -> Fallible<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = Vec::new();
    for path in paths {
        if !path.exists() {
            return fail(format!("No such file or directory: {}", path.display()));
        }
        if path.is_dir() {
            let mut found: Vec<PathBuf> = Vec::new();
            for entry in WalkDir::new(path) {
                let entry = entry.map_err(|e| ErrorReport::new(e.to_string()))?;
                let is_document: bool = entry.file_type().is_file()
                    && entry.file_name().to_str().is_some_and(is_supported_file);
                if is_document {
                    found.push(entry.into_path());
                }
            }
            found.sort();
            files.extend(found);
        } else {
            files.push(path.clone());
        }
    }
    Ok(files)
}

/// An upload failed partway through. The tasks created before the failure
/// exist on the backend regardless, so name them.
fn partial_upload_error(created: &[ParseTask], error: ErrorReport) -> ErrorReport {
    if created.is_empty() {
        return error;
    }
    for task in created {
        log::warn!("Created parse task #{} before the upload failed", task.id);
    }
    let ids: Vec<String> = created.iter().map(|task| format!("#{}", task.id)).collect();
    ErrorReport::new(format!(
        "{} (parse tasks already created: {})",
        error.message(),
        ids.join(", ")
    ))
}

fn default_title(path: &Path) -> String {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("Untitled")
        .to_string()
}

fn task_line(
    id: Id,
    status: TaskStatus,
    title: &str,
    source_type: SourceType,
    direction_id: Option<Id>,
) -> String {
    let direction: String = match direction_id {
        Some(id) => format!("direction #{id}"),
        None => "no direction".to_string(),
    };
    format!("#{id} [{status}] {title} ({source_type}, {direction})")
}

impl Describe for ParseTaskSummary {
    fn summary(&self) -> String {
        task_line(
            self.id,
            self.status,
            &self.title,
            self.source_type,
            self.direction_id,
        )
    }
}

impl Describe for ParseTask {
    fn summary(&self) -> String {
        task_line(
            self.id,
            self.status,
            &self.title,
            self.source_type,
            self.direction_id,
        )
    }

    fn describe(&self) -> String {
        let mut out: String = self.summary();
        field(&mut out, "Error", self.error_message.as_deref());
        field(&mut out, "Summary", self.summary.as_deref());
        if !self.knowledge_points.is_empty() {
            out.push_str("\nKnowledge points:");
            for point in &self.knowledge_points {
                out.push_str(&format!(
                    "\n  [{}] {}: {}",
                    point.importance, point.name, point.description
                ));
            }
        }
        if !self.best_practices.is_empty() {
            out.push_str("\nBest practices:");
            for practice in &self.best_practices {
                out.push_str(&format!("\n  {}: {}", practice.title, practice.content));
            }
        }
        if self.can_generate_questions() {
            out.push_str(&format!(
                "\n\nReady: run `studydesk parse generate {}` to create questions.",
                self.id
            ));
        }
        out
    }
}
