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

use reqwest::multipart::Form;
use reqwest::multipart::Part;
use studydesk_core::Endpoint;
use studydesk_core::types::Id;
use studydesk_core::types::Message;
use studydesk_core::types::material::Material;
use studydesk_core::types::parse::ParseTask;
use studydesk_core::types::parse::ParseTaskSummary;
use studydesk_core::types::parse::ParseText;
use studydesk_core::types::parse::ParseUrl;
use studydesk_core::types::parse::SUPPORTED_EXTENSIONS;
use studydesk_core::types::parse::TaskDirection;
use studydesk_core::types::parse::TaskFilter;
use studydesk_core::types::parse::is_supported_file;

use crate::client::ApiClient;
use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::error::fail;
use crate::error::transport_error;

/// A local document to upload for parsing.
#[derive(Clone, Debug)]
pub struct ParseFile {
    pub title: String,
    pub path: PathBuf,
    pub direction_id: Option<Id>,
}

/// Guess the MIME type of a supported document from its extension.
fn mime_type(file_name: &str) -> &'static str {
    let ext: String = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "pdf" => "application/pdf",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "md" => "text/markdown",
        "txt" => "text/plain",
        _ => "application/octet-stream",
    }
}

fn file_name(path: &Path) -> Fallible<String> {
    match path.file_name().and_then(|name| name.to_str()) {
        Some(name) => Ok(name.to_string()),
        None => fail(format!("Not a file: {}", path.display())),
    }
}

/// Document parsing: raw text, uploaded files and web pages become parse
/// tasks, which can later be turned into materials with questions.
pub struct ParseApi<'a> {
    client: &'a ApiClient,
}

impl<'a> ParseApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn text(&self, request: &ParseText) -> Fallible<ParseTask> {
        self.client.with_body(Endpoint::ParseText, request).await
    }

    /// Upload a document. Only `.pdf`, `.docx`, `.md` and `.txt` files are
    /// accepted; anything else is rejected before a request is made.
    pub async fn file(&self, request: &ParseFile) -> Fallible<ParseTask> {
        let name: String = file_name(&request.path)?;
        if !is_supported_file(&name) {
            return fail(format!(
                "Unsupported file type: {name} (expected one of: {})",
                SUPPORTED_EXTENSIONS
                    .iter()
                    .map(|ext| format!(".{ext}"))
                    .collect::<Vec<_>>()
                    .join(", ")
            ));
        }
        let bytes: Vec<u8> = tokio::fs::read(&request.path).await.map_err(|e| {
            ErrorReport::new(format!("Failed to read {}: {e}", request.path.display()))
        })?;
        log::debug!("Uploading {name} ({} bytes)", bytes.len());
        let part: Part = Part::bytes(bytes)
            .file_name(name.clone())
            .mime_str(mime_type(&name))
            .map_err(transport_error)?;
        let mut form: Form = Form::new()
            .text("title", request.title.clone())
            .part("file", part);
        if let Some(direction_id) = request.direction_id {
            form = form.text("direction_id", direction_id.to_string());
        }
        let endpoint: Endpoint = Endpoint::ParseFile;
        self.client
            .send(endpoint, self.client.request(endpoint)?.multipart(form))
            .await
    }

    pub async fn url(&self, request: &ParseUrl) -> Fallible<ParseTask> {
        if request.url.trim().is_empty() {
            return fail("The URL must not be empty.");
        }
        self.client.with_body(Endpoint::ParseUrl, request).await
    }

    pub async fn tasks(&self, filter: &TaskFilter) -> Fallible<Vec<ParseTaskSummary>> {
        self.client.get_with_query(Endpoint::ListTasks, filter).await
    }

    pub async fn task(&self, id: Id) -> Fallible<ParseTask> {
        self.client.get(Endpoint::GetTask(id)).await
    }

    pub async fn delete_task(&self, id: Id) -> Fallible<Message> {
        self.client.delete(Endpoint::DeleteTask(id)).await
    }

    /// Assign a task to a direction, or detach it with `None`.
    pub async fn set_direction(&self, id: Id, direction_id: Option<Id>) -> Fallible<ParseTask> {
        self.client
            .with_body(Endpoint::UpdateTask(id), &TaskDirection { direction_id })
            .await
    }

    /// Turn a completed task into a material and generate its questions.
    pub async fn generate_questions(&self, id: Id) -> Fallible<Material> {
        self.client
            .send(
                Endpoint::GenerateQuestions(id),
                self.client.request(Endpoint::GenerateQuestions(id))?,
            )
            .await
    }
}
