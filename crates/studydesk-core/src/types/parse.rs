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

use serde::Deserialize;
use serde::Serialize;

use crate::types::Id;
use crate::types::timestamp::Timestamp;

wire_enum! {
    /// Where the text of a parse task came from.
    pub enum SourceType {
        Text => "text",
        File => "file",
        Url => "url",
    }
}

wire_enum! {
    pub enum TaskStatus {
        Pending => "pending",
        Processing => "processing",
        Completed => "completed",
        Failed => "failed",
    }
}

/// File extensions the backend can extract text from.
pub const SUPPORTED_EXTENSIONS: [&str; 4] = ["pdf", "docx", "md", "txt"];

/// Whether a file name has an extension the backend accepts for parsing.
pub fn is_supported_file(name: &str) -> bool {
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => {
            let ext: String = ext.to_lowercase();
            SUPPORTED_EXTENSIONS.contains(&ext.as_str())
        }
        _ => false,
    }
}

/// A parse task as it appears in listings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParseTaskSummary {
    pub id: Id,
    #[serde(default)]
    pub direction_id: Option<Id>,
    pub title: String,
    pub source_type: SourceType,
    #[serde(default)]
    pub summary: Option<String>,
    pub status: TaskStatus,
    pub created_at: Timestamp,
    #[serde(default)]
    pub updated_at: Option<Timestamp>,
}

/// A parse task with everything extracted from its source.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParseTask {
    pub id: Id,
    #[serde(default)]
    pub direction_id: Option<Id>,
    pub title: String,
    pub source_type: SourceType,
    /// The text itself, the uploaded file name, or the URL.
    pub source_content: String,
    #[serde(default)]
    pub raw_text: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    pub status: TaskStatus,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub knowledge_points: Vec<KnowledgePoint>,
    #[serde(default)]
    pub best_practices: Vec<BestPractice>,
    pub created_at: Timestamp,
    #[serde(default)]
    pub updated_at: Option<Timestamp>,
}

impl ParseTask {
    /// The backend only turns completed tasks with text and a direction into
    /// questions. This checks the same preconditions locally.
    pub fn can_generate_questions(&self) -> bool {
        self.status == TaskStatus::Completed
            && self.direction_id.is_some()
            && self
                .raw_text
                .as_deref()
                .is_some_and(|text| !text.trim().is_empty())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct KnowledgePoint {
    pub id: Id,
    pub task_id: Id,
    pub name: String,
    pub description: String,
    pub importance: u8,
    #[serde(default)]
    pub category: Option<String>,
    pub created_at: Timestamp,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BestPractice {
    pub id: Id,
    pub task_id: Id,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub scenario: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    pub created_at: Timestamp,
}

/// Request body to parse plain text.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParseText {
    pub title: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction_id: Option<Id>,
}

/// Request body to parse a web page.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParseUrl {
    pub title: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction_id: Option<Id>,
}

/// Query parameters for listing parse tasks.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction_id: Option<Id>,
}

/// Request body to reassign a parse task. Unlike the other bodies, `None` is
/// sent as an explicit `null`, which clears the task's direction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TaskDirection {
    pub direction_id: Option<Id>,
}
