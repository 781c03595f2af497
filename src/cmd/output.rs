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

use std::fmt::Display;
use std::fmt::Formatter;

use clap::ValueEnum;
use serde::Serialize;

use crate::error::Fallible;

#[derive(ValueEnum, Clone, Copy, PartialEq, Debug)]
pub enum OutputFormat {
    /// Human-readable listings.
    Text,
    /// Pretty-printed JSON, as returned by the backend.
    Json,
}

impl Display for OutputFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// How an entity is printed in text mode.
pub trait Describe {
    /// One line, used in listings.
    fn summary(&self) -> String;

    /// The full record. Defaults to the summary.
    fn describe(&self) -> String {
        self.summary()
    }
}

pub fn render_one<T: Serialize + Describe>(format: OutputFormat, value: &T) -> Fallible<String> {
    match format {
        OutputFormat::Text => Ok(value.describe()),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
    }
}

pub fn render_list<T: Serialize + Describe>(format: OutputFormat, values: &[T]) -> Fallible<String> {
    match format {
        OutputFormat::Text if values.is_empty() => Ok("Nothing found.".to_string()),
        OutputFormat::Text => Ok(values
            .iter()
            .map(|value| value.summary())
            .collect::<Vec<_>>()
            .join("\n")),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(values)?),
    }
}

/// Append `label: value` to a description, skipping absent values.
pub fn field<T: Display>(out: &mut String, label: &str, value: Option<T>) {
    if let Some(value) = value {
        out.push_str(&format!("\n{label}: {value}"));
    }
}
