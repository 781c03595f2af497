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

//! Form handlers for the console. Each one performs a single mutation on the
//! backend and redirects to the page that shows the result.

use axum::Form;
use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Redirect;
use axum::response::Response;
use serde::Deserialize;
use studydesk_core::Route;
use studydesk_core::types::Id;
use studydesk_core::types::direction::NewDirection;
use studydesk_core::types::exam::AnswerSubmission;
use studydesk_core::types::exam::ExamDetail;
use studydesk_core::types::exam::ExamMode;
use studydesk_core::types::exam::NewExam;
use studydesk_core::types::exam::ScoreType;
use studydesk_core::types::material::NewMaterial;
use studydesk_core::types::mistake::MistakeUpdate;
use studydesk_core::types::question::QuestionRating;

use crate::cmd::mistakes::review;
use crate::cmd::serve::server::ConsoleState;
use crate::cmd::serve::server::error_response;
use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::error::fail;
use crate::utils::non_empty;

/// Redirect to `location`, or show the error that prevented the mutation.
fn finish(result: Fallible<String>) -> Response {
    match result {
        Ok(location) => Redirect::to(&location).into_response(),
        Err(e) => error_response(StatusCode::BAD_GATEWAY, &e),
    }
}

fn bad_request(e: ErrorReport) -> Response {
    error_response(StatusCode::BAD_REQUEST, &e)
}

fn parse_field<T: std::str::FromStr>(name: &str, value: &str) -> Fallible<T> {
    value
        .trim()
        .parse()
        .map_err(|_| ErrorReport::new(format!("Invalid value for {name}: '{value}'")))
}

fn parse_optional<T: std::str::FromStr>(name: &str, value: &str) -> Fallible<Option<T>> {
    match non_empty(value) {
        Some(value) => parse_field(name, &value).map(Some),
        None => Ok(None),
    }
}

#[derive(Deserialize)]
pub struct DirectionForm {
    #[serde(default)]
    name: String,
    #[serde(default)]
    description: String,
}

pub async fn create_direction(
    State(state): State<ConsoleState>,
    Form(form): Form<DirectionForm>,
) -> Response {
    let Some(name) = non_empty(&form.name) else {
        return bad_request(ErrorReport::new("A direction needs a name."));
    };
    let direction = NewDirection {
        name,
        description: non_empty(&form.description),
    };
    finish(
        async {
            state.client.directions().create(&direction).await?;
            Ok(Route::Home.path())
        }
        .await,
    )
}

pub async fn delete_direction(State(state): State<ConsoleState>, Path(id): Path<Id>) -> Response {
    finish(
        async {
            state.client.directions().delete(id).await?;
            Ok(Route::Home.path())
        }
        .await,
    )
}

#[derive(Deserialize)]
pub struct MaterialForm {
    #[serde(default)]
    direction_id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    content: String,
}

impl MaterialForm {
    fn parse(self) -> Fallible<NewMaterial> {
        let direction_id: Id = parse_field("direction", &self.direction_id)?;
        let Some(title) = non_empty(&self.title) else {
            return fail("A material needs a title.");
        };
        if self.content.trim().is_empty() {
            return fail("A material needs some content.");
        }
        Ok(NewMaterial {
            title,
            content: self.content,
            direction_id,
        })
    }
}

fn materials_of(direction_id: Id) -> String {
    format!("{}?direction_id={direction_id}", Route::Materials)
}

pub async fn create_material(
    State(state): State<ConsoleState>,
    Form(form): Form<MaterialForm>,
) -> Response {
    let material: NewMaterial = match form.parse() {
        Ok(material) => material,
        Err(e) => return bad_request(e),
    };
    finish(
        async {
            let created = state.client.materials().create(&material).await?;
            Ok(materials_of(created.direction_id))
        }
        .await,
    )
}

pub async fn delete_material(State(state): State<ConsoleState>, Path(id): Path<Id>) -> Response {
    finish(
        async {
            state.client.materials().delete(id).await?;
            Ok(Route::Materials.path())
        }
        .await,
    )
}

#[derive(Deserialize)]
pub struct MoveForm {
    #[serde(default)]
    direction_id: String,
}

pub async fn move_material(
    State(state): State<ConsoleState>,
    Path(id): Path<Id>,
    Form(form): Form<MoveForm>,
) -> Response {
    let direction_id: Id = match parse_field("direction", &form.direction_id) {
        Ok(direction_id) => direction_id,
        Err(e) => return bad_request(e),
    };
    finish(
        async {
            state.client.materials().set_direction(id, direction_id).await?;
            Ok(materials_of(direction_id))
        }
        .await,
    )
}

#[derive(Deserialize)]
pub struct RateForm {
    #[serde(default)]
    rating: String,
}

pub async fn rate_question(
    State(state): State<ConsoleState>,
    Path(id): Path<Id>,
    Form(form): Form<RateForm>,
) -> Response {
    let rating: QuestionRating = match form.rating.parse() {
        Ok(rating) => rating,
        Err(e) => return bad_request(e),
    };
    finish(
        async {
            state.client.questions().rate(id, rating).await?;
            Ok(Route::Questions.path())
        }
        .await,
    )
}

pub async fn delete_question(State(state): State<ConsoleState>, Path(id): Path<Id>) -> Response {
    finish(
        async {
            state.client.questions().delete(id).await?;
            Ok(Route::Questions.path())
        }
        .await,
    )
}

#[derive(Deserialize)]
pub struct ExamForm {
    #[serde(default)]
    direction_id: String,
    #[serde(default)]
    mode: String,
    #[serde(default)]
    time_limit: String,
    #[serde(default)]
    score_type: String,
    #[serde(default)]
    question_count: String,
}

impl ExamForm {
    fn parse(self) -> Fallible<NewExam> {
        let direction_id: Id = parse_field("direction", &self.direction_id)?;
        let mut exam: NewExam = NewExam::new(direction_id);
        if let Some(mode) = parse_optional::<ExamMode>("mode", &self.mode)? {
            exam.mode = mode;
        }
        if let Some(score_type) = parse_optional::<ScoreType>("scoring", &self.score_type)? {
            exam.score_type = score_type;
        }
        if let Some(count) = parse_optional::<u32>("question count", &self.question_count)? {
            exam.question_count = count;
        }
        exam.time_limit = parse_optional::<u32>("time limit", &self.time_limit)?;
        exam.validated()
    }
}

pub async fn create_exam(State(state): State<ConsoleState>, Form(form): Form<ExamForm>) -> Response {
    let exam: NewExam = match form.parse() {
        Ok(exam) => exam,
        Err(e) => return bad_request(e),
    };
    finish(
        async {
            let detail: ExamDetail = state.client.exams().create(&exam).await?;
            Ok(Route::ExamTaking(detail.exam.id).path())
        }
        .await,
    )
}

/// Gather the submitted answers of every exam question. Fields are named
/// `answer-<question id>`; a multiple choice question sends one field per
/// ticked box, which are joined with commas.
fn collect_answers(detail: &ExamDetail, fields: &[(String, String)]) -> Vec<AnswerSubmission> {
    detail
        .questions
        .iter()
        .map(|question| {
            let name: String = format!("answer-{}", question.id);
            let values: Vec<&str> = fields
                .iter()
                .filter(|(key, _)| *key == name)
                .map(|(_, value)| value.trim())
                .filter(|value| !value.is_empty())
                .collect();
            AnswerSubmission {
                exam_id: detail.exam.id,
                question_id: question.id,
                user_answer: values.join(","),
            }
        })
        .collect()
}

pub async fn submit_exam(
    State(state): State<ConsoleState>,
    Path(id): Path<Id>,
    Form(fields): Form<Vec<(String, String)>>,
) -> Response {
    finish(
        async {
            let detail: ExamDetail = state.client.exams().get(id).await?;
            if detail.exam.is_completed() {
                return Ok(Route::ExamResult(id).path());
            }
            let answers: Vec<AnswerSubmission> = collect_answers(&detail, &fields);
            state.client.exams().submit(id, answers).await?;
            Ok(Route::ExamResult(id).path())
        }
        .await,
    )
}

pub async fn master_mistake(State(state): State<ConsoleState>, Path(id): Path<Id>) -> Response {
    let update = MistakeUpdate {
        mastered: Some(true),
        review_count: None,
    };
    finish(
        async {
            state.client.mistakes().update(id, &update).await?;
            Ok(Route::Mistakes.path())
        }
        .await,
    )
}

pub async fn review_mistake(State(state): State<ConsoleState>, Path(id): Path<Id>) -> Response {
    finish(
        async {
            review(&state.client, id).await?;
            Ok(Route::Mistakes.path())
        }
        .await,
    )
}

pub async fn delete_mistake(State(state): State<ConsoleState>, Path(id): Path<Id>) -> Response {
    finish(
        async {
            state.client.mistakes().delete(id).await?;
            Ok(Route::Mistakes.path())
        }
        .await,
    )
}
