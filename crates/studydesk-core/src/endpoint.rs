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

//! The REST contract of the study manager backend.
//!
//! Every operation the client performs is one variant of [`Endpoint`], which
//! knows its HTTP method and its path relative to the API base path.

use std::fmt::Display;
use std::fmt::Formatter;

use crate::types::Id;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Method {
    Get,
    Post,
    Patch,
    Delete,
}

impl Display for Method {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Method::Get => write!(f, "GET"),
            Method::Post => write!(f, "POST"),
            Method::Patch => write!(f, "PATCH"),
            Method::Delete => write!(f, "DELETE"),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Endpoint {
    ListDirections,
    CreateDirection,
    GetDirection(Id),
    DeleteDirection(Id),
    ListMaterials,
    CreateMaterial,
    GetMaterial(Id),
    DeleteMaterial(Id),
    MoveMaterial(Id),
    MaterialProgress(Id),
    ListQuestions,
    GetQuestion(Id),
    UpdateQuestion(Id),
    DeleteQuestion(Id),
    RateQuestion(Id),
    ListExams,
    CreateExam,
    GetExam(Id),
    SubmitExam(Id),
    ExamResult(Id),
    ListMistakes,
    GetMistake(Id),
    UpdateMistake(Id),
    DeleteMistake(Id),
    ParseText,
    ParseFile,
    ParseUrl,
    ListTasks,
    GetTask(Id),
    DeleteTask(Id),
    UpdateTask(Id),
    GenerateQuestions(Id),
    /// The liveness probe. Served at the backend root, not under the API
    /// base path.
    Health,
}

impl Endpoint {
    pub fn method(&self) -> Method {
        use Endpoint::*;
        match self {
            ListDirections | GetDirection(_) | ListMaterials | GetMaterial(_)
            | MaterialProgress(_) | ListQuestions | GetQuestion(_) | ListExams | GetExam(_)
            | ExamResult(_) | ListMistakes | GetMistake(_) | ListTasks | GetTask(_) | Health => {
                Method::Get
            }
            CreateDirection | CreateMaterial | CreateExam | SubmitExam(_) | ParseText
            | ParseFile | ParseUrl | GenerateQuestions(_) => Method::Post,
            MoveMaterial(_) | UpdateQuestion(_) | RateQuestion(_) | UpdateMistake(_)
            | UpdateTask(_) => Method::Patch,
            DeleteDirection(_) | DeleteMaterial(_) | DeleteQuestion(_) | DeleteMistake(_)
            | DeleteTask(_) => Method::Delete,
        }
    }

    /// The path of the endpoint, relative to the API base path (or to the
    /// backend root, for [`Endpoint::Health`]).
    pub fn path(&self) -> String {
        use Endpoint::*;
        match self {
            ListDirections | CreateDirection => "/directions".to_string(),
            GetDirection(id) | DeleteDirection(id) => format!("/directions/{id}"),
            ListMaterials | CreateMaterial => "/materials".to_string(),
            GetMaterial(id) | DeleteMaterial(id) | MoveMaterial(id) => format!("/materials/{id}"),
            MaterialProgress(id) => format!("/materials/{id}/progress"),
            ListQuestions => "/questions".to_string(),
            GetQuestion(id) | UpdateQuestion(id) | DeleteQuestion(id) => format!("/questions/{id}"),
            RateQuestion(id) => format!("/questions/{id}/rate"),
            ListExams | CreateExam => "/exams".to_string(),
            GetExam(id) => format!("/exams/{id}"),
            SubmitExam(id) => format!("/exams/{id}/submit"),
            ExamResult(id) => format!("/exams/{id}/result"),
            ListMistakes => "/mistakes".to_string(),
            GetMistake(id) | UpdateMistake(id) | DeleteMistake(id) => format!("/mistakes/{id}"),
            ParseText => "/parse/text".to_string(),
            ParseFile => "/parse/file".to_string(),
            ParseUrl => "/parse/url".to_string(),
            ListTasks => "/parse/tasks".to_string(),
            GetTask(id) | DeleteTask(id) | UpdateTask(id) => format!("/parse/tasks/{id}"),
            GenerateQuestions(id) => format!("/parse/tasks/{id}/generate-questions"),
            Health => "/health".to_string(),
        }
    }

    /// Whether the path is relative to the API base path.
    pub fn is_api(&self) -> bool {
        !matches!(self, Endpoint::Health)
    }
}

impl Display for Endpoint {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.method(), self.path())
    }
}
