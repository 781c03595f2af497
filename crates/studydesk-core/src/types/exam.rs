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

use crate::error::Fallible;
use crate::error::fail;
use crate::types::Id;
use crate::types::question::Question;
use crate::types::timestamp::Timestamp;

wire_enum! {
    pub enum ExamMode {
        Timed => "timed",
        Untimed => "untimed",
    }
}

impl Default for ExamMode {
    fn default() -> Self {
        ExamMode::Untimed
    }
}

wire_enum! {
    /// How the final score is reported: a number out of a hundred, or a
    /// letter grade.
    pub enum ScoreType {
        Hundred => "hundred",
        Grade => "grade",
    }
}

impl Default for ScoreType {
    fn default() -> Self {
        ScoreType::Hundred
    }
}

wire_enum! {
    pub enum ExamStatus {
        InProgress => "in_progress",
        Completed => "completed",
    }
}

/// The default number of questions drawn for a new exam.
pub const DEFAULT_QUESTION_COUNT: u32 = 10;

fn default_question_count() -> u32 {
    DEFAULT_QUESTION_COUNT
}

/// An exam over the questions of one direction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Exam {
    pub id: Id,
    pub direction_id: Id,
    pub mode: ExamMode,
    /// Minutes allowed. Only set for timed exams.
    #[serde(default)]
    pub time_limit: Option<u32>,
    pub score_type: ScoreType,
    pub status: ExamStatus,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub grade: Option<String>,
    pub created_at: Timestamp,
    #[serde(default)]
    pub completed_at: Option<Timestamp>,
}

impl Exam {
    pub fn is_completed(&self) -> bool {
        self.status == ExamStatus::Completed
    }
}

/// An exam together with the questions drawn for it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExamDetail {
    #[serde(flatten)]
    pub exam: Exam,
    #[serde(default)]
    pub questions: Vec<Question>,
}

/// Request body to start an exam.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewExam {
    pub direction_id: Id,
    #[serde(default)]
    pub mode: ExamMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_limit: Option<u32>,
    #[serde(default)]
    pub score_type: ScoreType,
    #[serde(default = "default_question_count")]
    pub question_count: u32,
}

impl NewExam {
    /// An untimed exam scored out of a hundred with the default number of
    /// questions.
    pub fn new(direction_id: Id) -> Self {
        Self {
            direction_id,
            mode: ExamMode::default(),
            time_limit: None,
            score_type: ScoreType::default(),
            question_count: DEFAULT_QUESTION_COUNT,
        }
    }

    /// Check the request before it is sent. A timed exam needs a positive
    /// time limit; an untimed one never carries a limit.
    pub fn validated(mut self) -> Fallible<Self> {
        if self.question_count == 0 {
            return fail("An exam needs at least one question.");
        }
        match self.mode {
            ExamMode::Timed => match self.time_limit {
                Some(limit) if limit > 0 => {}
                _ => return fail("Timed exams need a time limit of at least one minute."),
            },
            ExamMode::Untimed => self.time_limit = None,
        }
        Ok(self)
    }
}

/// Query parameters for listing exams.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ExamFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction_id: Option<Id>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ExamStatus>,
}

/// One answer in an exam submission. Multiple choices are joined with `,`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnswerSubmission {
    pub exam_id: Id,
    pub question_id: Id,
    pub user_answer: String,
}

/// Request body to submit an exam.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExamSubmission {
    pub answers: Vec<AnswerSubmission>,
}

/// A recorded and graded answer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    pub id: Id,
    pub exam_id: Id,
    pub question_id: Id,
    pub user_answer: String,
    #[serde(default)]
    pub is_correct: Option<bool>,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub ai_feedback: Option<String>,
    pub answered_at: Timestamp,
}

/// The outcome of a submitted exam.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExamResult {
    pub exam_id: Id,
    pub total_questions: u32,
    pub correct_count: u32,
    pub score: f64,
    #[serde(default)]
    pub grade: Option<String>,
    #[serde(default)]
    pub answers: Vec<Answer>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_exam_defaults() -> Fallible<()> {
        let body = NewExam::new(4);
        assert_eq!(
            serde_json::to_string(&body)?,
            r#"{"direction_id":4,"mode":"untimed","score_type":"hundred","question_count":10}"#
        );
        Ok(())
    }

    #[test]
    fn test_validated() -> Fallible<()> {
        let untimed = NewExam {
            time_limit: Some(15),
            ..NewExam::new(4)
        };
        assert_eq!(untimed.validated()?.time_limit, None);
        let timed = NewExam {
            mode: ExamMode::Timed,
            time_limit: Some(15),
            ..NewExam::new(4)
        };
        assert_eq!(timed.validated()?.time_limit, Some(15));
        for limit in [None, Some(0)] {
            let timed = NewExam {
                mode: ExamMode::Timed,
                time_limit: limit,
                ..NewExam::new(4)
            };
            assert!(timed.validated().is_err());
        }
        let empty = NewExam {
            question_count: 0,
            ..NewExam::new(4)
        };
        assert!(empty.validated().is_err());
        Ok(())
    }

    #[test]
    fn test_new_exam_deserialize_defaults() -> Fallible<()> {
        let body: NewExam = serde_json::from_str(r#"{"direction_id": 4}"#)?;
        assert_eq!(body, NewExam::new(4));
        Ok(())
    }

    #[test]
    fn test_exam_detail_flattens_exam() -> Fallible<()> {
        let json = r#"{
            "id": 5,
            "direction_id": 4,
            "mode": "timed",
            "time_limit": 30,
            "score_type": "grade",
            "status": "in_progress",
            "score": null,
            "grade": null,
            "created_at": "2024-05-01T09:00:00",
            "completed_at": null,
            "questions": []
        }"#;
        let detail: ExamDetail = serde_json::from_str(json)?;
        assert_eq!(detail.exam.id, 5);
        assert_eq!(detail.exam.mode, ExamMode::Timed);
        assert_eq!(detail.exam.time_limit, Some(30));
        assert!(!detail.exam.is_completed());
        assert!(detail.questions.is_empty());
        Ok(())
    }

    #[test]
    fn test_exam_result() -> Fallible<()> {
        let json = r#"{
            "exam_id": 5,
            "total_questions": 2,
            "correct_count": 1,
            "score": 50.0,
            "grade": "D",
            "answers": [{
                "id": 1, "exam_id": 5, "question_id": 9, "user_answer": "A",
                "is_correct": false, "score": 0.0, "ai_feedback": null,
                "answered_at": "2024-05-01T09:10:00"
            }]
        }"#;
        let result: ExamResult = serde_json::from_str(json)?;
        assert_eq!(result.grade.as_deref(), Some("D"));
        assert_eq!(result.answers[0].is_correct, Some(false));
        Ok(())
    }
}
