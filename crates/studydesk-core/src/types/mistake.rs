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
use crate::types::question::Question;
use crate::types::timestamp::Timestamp;

/// A question the user answered incorrectly, kept for review.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Mistake {
    pub id: Id,
    pub question_id: Id,
    pub answer_id: Id,
    #[serde(default)]
    pub review_count: u32,
    #[serde(default)]
    pub mastered: bool,
    pub created_at: Timestamp,
    #[serde(default)]
    pub question: Option<Question>,
}

/// A partial update of a mistake.
///
/// When `review_count` is left unset the backend counts the update itself as
/// one more review.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MistakeUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mastered: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review_count: Option<u32>,
}

/// Query parameters for listing mistakes.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MistakeFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction_id: Option<Id>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mastered: Option<bool>,
}
