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
use serde::Deserializer;
use serde::Serialize;
use serde_json::Value;

use crate::types::Id;
use crate::types::timestamp::Timestamp;

wire_enum! {
    /// Where a material is in the backend's processing pipeline.
    pub enum MaterialStatus {
        Pending => "pending",
        Processed => "processed",
        Failed => "failed",
    }
}

/// A study material: a document attached to a direction, from which the
/// backend extracts key points and generates questions.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub id: Id,
    pub direction_id: Id,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub key_points: Option<Vec<KeyPoint>>,
    pub status: MaterialStatus,
    pub created_at: Timestamp,
}

impl Material {
    pub fn key_points(&self) -> &[KeyPoint] {
        self.key_points.as_deref().unwrap_or(&[])
    }
}

/// A key point distilled from a material.
///
/// Key points are written by a language model and stored untyped, so every
/// field is decoded leniently: a malformed point degrades instead of making
/// the whole material unreadable.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct KeyPoint {
    #[serde(default, deserialize_with = "loose_text")]
    pub point: String,
    #[serde(default, deserialize_with = "loose_text")]
    pub description: String,
    /// From 1 to 5.
    #[serde(default = "default_importance", deserialize_with = "loose_importance")]
    pub importance: u8,
}

const MAX_IMPORTANCE: u8 = 5;

fn default_importance() -> u8 {
    3
}

/// Strings pass through, null becomes empty and other scalars are printed.
fn loose_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let value: Value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Null => String::new(),
        Value::String(text) => text,
        other => other.to_string(),
    })
}

/// Accepts integers, floats and numeric strings, rounded and clamped to the
/// importance scale. Anything else is the default.
fn loose_importance<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u8, D::Error> {
    let value: Value = Value::deserialize(deserializer)?;
    let number: Option<f64> = match &value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    Ok(match number {
        Some(n) if n.is_finite() => n.round().clamp(1.0, f64::from(MAX_IMPORTANCE)) as u8,
        _ => default_importance(),
    })
}

/// Request body to upload a material.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewMaterial {
    pub title: String,
    pub content: String,
    pub direction_id: Id,
}

/// Request body to move a material to another direction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MaterialDirection {
    pub direction_id: Id,
}
