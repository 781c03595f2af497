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
    pub enum QuestionType {
        SingleChoice => "single_choice",
        MultiChoice => "multi_choice",
        TrueFalse => "true_false",
        ShortAnswer => "short_answer",
    }
}

/// How the backend spells the answers to a true/false question.
pub const TRUE_ANSWER: &str = "正确";
pub const FALSE_ANSWER: &str = "错误";

impl QuestionType {
    /// Whether answers to this question are picked from a fixed set rather
    /// than written out.
    pub fn is_choice(self) -> bool {
        !matches!(self, QuestionType::ShortAnswer)
    }
}

wire_enum! {
    /// A user's verdict on a generated question.
    pub enum QuestionRating {
        Good => "good",
        Bad => "bad",
    }
}

fn default_difficulty() -> u8 {
    3
}

/// A question generated from a material.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: Id,
    pub material_id: Id,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    /// From 1 (easy) to 5 (hard).
    #[serde(default = "default_difficulty")]
    pub difficulty: u8,
    pub content: String,
    #[serde(default)]
    pub options: Option<Vec<String>>,
    pub answer: String,
    #[serde(default)]
    pub explanation: Option<String>,
    #[serde(default)]
    pub rating: Option<QuestionRating>,
    pub created_at: Timestamp,
}

impl Question {
    pub fn options(&self) -> &[String] {
        self.options.as_deref().unwrap_or(&[])
    }

    /// The options paired with the letters answers refer to them by.
    pub fn labeled_options(&self) -> Vec<(char, &str)> {
        self.options()
            .iter()
            .enumerate()
            .map(|(i, option)| (option_label(i), option.as_str()))
            .collect()
    }
}

/// Choice answers name options by letter: `A` for the first, and so on.
pub fn option_label(index: usize) -> char {
    char::from(b'A' + (index % 26) as u8)
}

/// A partial update of a question. Only the fields that are set are sent, so
/// the backend leaves the others untouched.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct QuestionUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<u8>,
}

impl QuestionUpdate {
    pub fn is_empty(&self) -> bool {
        self == &QuestionUpdate::default()
    }
}

/// Request body to rate a question.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RateQuestion {
    pub rating: QuestionRating,
}

/// Query parameters for listing questions.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct QuestionFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub material_id: Option<Id>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction_id: Option<Id>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question_type: Option<QuestionType>,
}
