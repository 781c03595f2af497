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

pub mod direction;
pub mod exam;
pub mod material;
pub mod mistake;
pub mod parse;
pub mod question;
pub mod timestamp;

/// Entity identifiers are the backend's integer primary keys.
pub type Id = i64;

/// The body the backend returns after a successful deletion.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub message: String,
}

/// The liveness response from `/health`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Health {
    pub status: String,
}

impl Health {
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;
    use crate::error::Fallible;
    use crate::types::question::QuestionType;

    #[test]
    fn test_wire_enum_round_trip() -> Fallible<()> {
        for ty in QuestionType::ALL {
            assert_eq!(QuestionType::from_str(ty.as_str())?, *ty);
            assert_eq!(serde_json::to_string(ty)?, format!("\"{ty}\""));
        }
        Ok(())
    }

    #[test]
    fn test_wire_enum_rejects_unknown() {
        let err = QuestionType::from_str("essay").unwrap_err();
        assert_eq!(
            err.to_string(),
            "error: invalid QuestionType: 'essay' (expected one of: single_choice, multi_choice, true_false, short_answer)"
        );
    }

    #[test]
    fn test_health() -> Fallible<()> {
        let health: Health = serde_json::from_str(r#"{"status": "ok"}"#)?;
        assert!(health.is_ok());
        Ok(())
    }
}
