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

//! The console pages, one per route. Each view fetches what it shows from
//! the backend when it is rendered.

use std::collections::HashMap;

use maud::Markup;
use maud::PreEscaped;
use maud::html;
use studydesk_core::Route;
use studydesk_core::types::Id;
use studydesk_core::types::direction::Direction;
use studydesk_core::types::exam::DEFAULT_QUESTION_COUNT;
use studydesk_core::types::exam::Exam;
use studydesk_core::types::exam::ExamDetail;
use studydesk_core::types::exam::ExamFilter;
use studydesk_core::types::exam::ExamMode;
use studydesk_core::types::exam::ExamResult;
use studydesk_core::types::exam::ScoreType;
use studydesk_core::types::material::Material;
use studydesk_core::types::mistake::Mistake;
use studydesk_core::types::mistake::MistakeFilter;
use studydesk_core::types::question::FALSE_ANSWER;
use studydesk_core::types::question::Question;
use studydesk_core::types::question::QuestionFilter;
use studydesk_core::types::question::QuestionRating;
use studydesk_core::types::question::QuestionType;
use studydesk_core::types::question::TRUE_ANSWER;

use crate::client::ApiClient;
use crate::cmd::serve::template::page_template;
use crate::error::Fallible;
use crate::markdown::markdown_to_html;
use crate::markdown::markdown_to_html_inline;

pub type Params = HashMap<String, String>;

/// Render the page of a route.
pub async fn render(client: &ApiClient, route: Route, params: &Params) -> Fallible<Markup> {
    log::debug!("Rendering {} for {route}", route.view());
    let (title, body): (String, Markup) = match route {
        Route::Home => home(client).await?,
        Route::Materials => materials(client, params).await?,
        Route::Questions => questions(client, params).await?,
        Route::ExamStart => exam_start(client).await?,
        Route::ExamTaking(id) => exam_taking(client, id).await?,
        Route::ExamResult(id) => exam_result(client, id).await?,
        Route::Mistakes => mistakes(client, params).await?,
    };
    Ok(page_template(Some(route), &title, body))
}

fn param_id(params: &Params, name: &str) -> Option<Id> {
    params.get(name).and_then(|value| value.trim().parse().ok())
}

fn param_bool(params: &Params, name: &str) -> Option<bool> {
    params.get(name).and_then(|value| value.trim().parse().ok())
}

fn direction_names(directions: &[Direction]) -> HashMap<Id, &str> {
    directions
        .iter()
        .map(|direction| (direction.id, direction.name.as_str()))
        .collect()
}

fn direction_options(directions: &[Direction], selected: Option<Id>) -> Markup {
    html! {
        @for direction in directions {
            option value=(direction.id) selected[selected == Some(direction.id)] {
                (direction.name)
            }
        }
    }
}

/// A form holding a single button, for actions that need no input.
fn action_button(action: &str, label: &str, class: &str) -> Markup {
    html! {
        form.inline method="post" action=(action) {
            button type="submit" class=(class) { (label) }
        }
    }
}

async fn home(client: &ApiClient) -> Fallible<(String, Markup)> {
    let online: bool = match client.health().await {
        Ok(health) => health.is_ok(),
        Err(e) => {
            log::warn!("Health check failed: {e}");
            false
        }
    };
    let directions: Vec<Direction> = client.directions().list().await?;
    let body = html! {
        p.status {
            "Backend: "
            @if online {
                span.online { "online" }
            } @else {
                span.offline { "offline" }
            }
        }
        section {
            h2 { "Directions" }
            @if directions.is_empty() {
                p.empty { "No directions yet. Create one to start adding materials." }
            } @else {
                table {
                    thead { tr { th { "Name" } th { "Description" } th { "Created" } th {} } }
                    tbody {
                        @for direction in &directions {
                            tr {
                                td {
                                    a href=(format!("{}?direction_id={}", Route::Materials, direction.id)) {
                                        (direction.name)
                                    }
                                }
                                td { (direction.description.as_deref().unwrap_or("")) }
                                td { (direction.created_at.short()) }
                                td {
                                    (action_button(&format!("/actions/directions/{}/delete", direction.id), "Delete", "danger"))
                                }
                            }
                        }
                    }
                }
            }
        }
        section {
            h2 { "New direction" }
            form method="post" action="/actions/directions" {
                label { "Name" input type="text" name="name" required; }
                label { "Description" textarea name="description" rows="2" {} }
                button type="submit" { "Create" }
            }
        }
    };
    Ok(("Study directions".to_string(), body))
}

async fn materials(client: &ApiClient, params: &Params) -> Fallible<(String, Markup)> {
    let selected: Option<Id> = param_id(params, "direction_id");
    let directions: Vec<Direction> = client.directions().list().await?;
    let materials: Vec<Material> = client.materials().list(selected).await?;
    let names: HashMap<Id, &str> = direction_names(&directions);
    let body = html! {
        form.filters method="get" action=(Route::Materials.path()) {
            label {
                "Direction "
                select name="direction_id" {
                    option value="" { "All" }
                    (direction_options(&directions, selected))
                }
            }
            button type="submit" { "Filter" }
        }
        @if materials.is_empty() {
            p.empty { "No materials." }
        }
        @for material in &materials {
            article.card {
                header {
                    h2 { (material.title) }
                    span class=(format!("badge {}", material.status)) { (material.status.as_str()) }
                    span.muted {
                        (names.get(&material.direction_id).copied().unwrap_or("Unknown direction"))
                        " · " (material.created_at.short())
                    }
                }
                @if !material.key_points().is_empty() {
                    h3 { "Key points" }
                    ul.key-points {
                        @for point in material.key_points() {
                            li {
                                strong { (point.point) }
                                " (" (point.importance) "/5) "
                                (point.description)
                            }
                        }
                    }
                }
                details {
                    summary { "Content" }
                    div.markdown { (PreEscaped(markdown_to_html(&material.content))) }
                }
                footer {
                    a href=(format!("{}?material_id={}", Route::Questions, material.id)) { "Questions" }
                    form.inline method="post" action=(format!("/actions/materials/{}/move", material.id)) {
                        select name="direction_id" {
                            (direction_options(&directions, Some(material.direction_id)))
                        }
                        button type="submit" { "Move" }
                    }
                    (action_button(&format!("/actions/materials/{}/delete", material.id), "Delete", "danger"))
                }
            }
        }
        section {
            h2 { "New material" }
            @if directions.is_empty() {
                p.empty { "Create a direction first." }
            } @else {
                form method="post" action="/actions/materials" {
                    label {
                        "Direction"
                        select name="direction_id" required {
                            (direction_options(&directions, selected))
                        }
                    }
                    label { "Title" input type="text" name="title" required; }
                    label { "Content (Markdown)" textarea name="content" rows="10" required {} }
                    button type="submit" { "Add material" }
                }
            }
        }
    };
    Ok(("Materials".to_string(), body))
}

fn question_text(question: &Question) -> Markup {
    html! {
        div.markdown { (PreEscaped(markdown_to_html(&question.content))) }
    }
}

/// The question with its lettered options.
fn question_body(question: &Question) -> Markup {
    html! {
        (question_text(question))
        @if !question.options().is_empty() {
            ol.options {
                @for (label, option) in question.labeled_options() {
                    li { span.letter { (label) "." } " " (PreEscaped(markdown_to_html_inline(option))) }
                }
            }
        }
    }
}

/// Spell out a choice answer with its option text: `A,C` becomes
/// `A. i32, C. bool`.
fn answer_text(question: &Question, answer: &str) -> String {
    if answer.trim().is_empty() {
        return "(no answer)".to_string();
    }
    if question.options().is_empty() {
        return answer.to_string();
    }
    let options: Vec<(char, &str)> = question.labeled_options();
    answer
        .split(',')
        .map(|part| {
            let part: &str = part.trim();
            let text: Option<&str> = options
                .iter()
                .find(|(label, _)| part.len() == 1 && part.starts_with(*label))
                .map(|(_, text)| *text);
            match text {
                Some(text) => format!("{part}. {text}"),
                None => part.to_string(),
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

async fn questions(client: &ApiClient, params: &Params) -> Fallible<(String, Markup)> {
    let question_type: Option<QuestionType> = params
        .get("question_type")
        .and_then(|value| value.parse().ok());
    let filter = QuestionFilter {
        material_id: param_id(params, "material_id"),
        direction_id: param_id(params, "direction_id"),
        question_type,
    };
    let directions: Vec<Direction> = client.directions().list().await?;
    let materials: Vec<Material> = client.materials().list(None).await?;
    let questions: Vec<Question> = client.questions().list(&filter).await?;
    let body = html! {
        form.filters method="get" action=(Route::Questions.path()) {
            label {
                "Direction "
                select name="direction_id" {
                    option value="" { "All" }
                    (direction_options(&directions, filter.direction_id))
                }
            }
            label {
                "Material "
                select name="material_id" {
                    option value="" { "All" }
                    @for material in &materials {
                        option value=(material.id) selected[filter.material_id == Some(material.id)] {
                            (material.title)
                        }
                    }
                }
            }
            label {
                "Type "
                select name="question_type" {
                    option value="" { "All" }
                    @for kind in QuestionType::ALL.iter().copied() {
                        option value=(kind.as_str()) selected[question_type == Some(kind)] { (kind.as_str()) }
                    }
                }
            }
            button type="submit" { "Filter" }
        }
        p.muted { (questions.len()) " questions" }
        @for question in &questions {
            article.card {
                header {
                    span.badge { (question.question_type.as_str()) }
                    span.muted { "Difficulty " (question.difficulty) "/5" }
                    @if let Some(rating) = question.rating {
                        span class=(format!("badge rating-{rating}")) { "Rated " (rating.as_str()) }
                    }
                }
                (question_body(question))
                details {
                    summary { "Answer" }
                    p { strong { "Answer: " } (answer_text(question, &question.answer)) }
                    @if let Some(explanation) = &question.explanation {
                        div.markdown { (PreEscaped(markdown_to_html(explanation))) }
                    }
                }
                footer {
                    @for rating in QuestionRating::ALL.iter().copied() {
                        form.inline method="post" action=(format!("/actions/questions/{}/rate", question.id)) {
                            input type="hidden" name="rating" value=(rating.as_str());
                            button type="submit" disabled[question.rating == Some(rating)] {
                                @match rating {
                                    QuestionRating::Good => "Good question",
                                    QuestionRating::Bad => "Bad question",
                                }
                            }
                        }
                    }
                    (action_button(&format!("/actions/questions/{}/delete", question.id), "Delete", "danger"))
                }
            }
        }
    };
    Ok(("Questions".to_string(), body))
}

async fn exam_start(client: &ApiClient) -> Fallible<(String, Markup)> {
    let directions: Vec<Direction> = client.directions().list().await?;
    let exams: Vec<Exam> = client.exams().list(&ExamFilter::default()).await?;
    let names: HashMap<Id, &str> = direction_names(&directions);
    let body = html! {
        section {
            h2 { "New exam" }
            @if directions.is_empty() {
                p.empty { "Create a direction and add materials first." }
            } @else {
                form method="post" action="/actions/exams" {
                    label {
                        "Direction"
                        select name="direction_id" required {
                            (direction_options(&directions, None))
                        }
                    }
                    fieldset {
                        legend { "Mode" }
                        @for mode in ExamMode::ALL.iter().copied() {
                            label.choice {
                                input type="radio" name="mode" value=(mode.as_str()) checked[mode == ExamMode::default()];
                                (mode.as_str())
                            }
                        }
                    }
                    label { "Time limit (minutes, timed mode)" input type="number" name="time_limit" min="1"; }
                    label {
                        "Scoring"
                        select name="score_type" {
                            @for score_type in ScoreType::ALL.iter().copied() {
                                option value=(score_type.as_str()) selected[score_type == ScoreType::default()] {
                                    @match score_type {
                                        ScoreType::Hundred => "Points out of 100",
                                        ScoreType::Grade => "Letter grade",
                                    }
                                }
                            }
                        }
                    }
                    label {
                        "Questions"
                        input type="number" name="question_count" min="1" value=(DEFAULT_QUESTION_COUNT);
                    }
                    button type="submit" { "Start exam" }
                }
            }
        }
        section {
            h2 { "Previous exams" }
            @if exams.is_empty() {
                p.empty { "No exams yet." }
            } @else {
                table {
                    thead { tr { th { "#" } th { "Direction" } th { "Mode" } th { "Status" } th { "Score" } th {} } }
                    tbody {
                        @for exam in &exams {
                            tr {
                                td { (exam.id) }
                                td { (names.get(&exam.direction_id).copied().unwrap_or("Unknown direction")) }
                                td {
                                    (exam.mode.as_str())
                                    @if let Some(limit) = exam.time_limit { " (" (limit) " min)" }
                                }
                                td { (exam.status.as_str()) }
                                td {
                                    @if let Some(score) = exam.score { (format!("{score:.1}")) }
                                    @if let Some(grade) = &exam.grade { " " (grade) }
                                }
                                td {
                                    @if exam.is_completed() {
                                        a href=(Route::ExamResult(exam.id).path()) { "Result" }
                                    } @else {
                                        a href=(Route::ExamTaking(exam.id).path()) { "Continue" }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    };
    Ok(("Exams".to_string(), body))
}

/// The answer input of one exam question.
fn answer_input(question: &Question) -> Markup {
    let name: String = format!("answer-{}", question.id);
    let options: Vec<(char, &str)> = question.labeled_options();
    html! {
        @if question.question_type.is_choice() && !options.is_empty() {
            @let kind: &str = if question.question_type == QuestionType::MultiChoice { "checkbox" } else { "radio" };
            @for (label, option) in options {
                label.choice {
                    input type=(kind) name=(name) value=(label);
                    span.letter { (label) "." } " " (PreEscaped(markdown_to_html_inline(option)))
                }
            }
        } @else if question.question_type == QuestionType::TrueFalse {
            // Without options the backend compares the raw text.
            label.choice { input type="radio" name=(name) value=(TRUE_ANSWER); "True" }
            label.choice { input type="radio" name=(name) value=(FALSE_ANSWER); "False" }
        } @else {
            textarea name=(name) rows="4" placeholder="Your answer" {}
        }
    }
}

async fn exam_taking(client: &ApiClient, id: Id) -> Fallible<(String, Markup)> {
    let detail: ExamDetail = client.exams().get(id).await?;
    let exam: &Exam = &detail.exam;
    let body = html! {
        @if exam.is_completed() {
            p { "This exam has been submitted. " a href=(Route::ExamResult(id).path()) { "See the result" } }
        } @else {
            p.muted {
                (detail.questions.len()) " questions · " (exam.mode.as_str())
                @if let Some(limit) = exam.time_limit { " · time limit " (limit) " minutes" }
            }
            form method="post" action=(format!("/actions/exams/{id}/submit")) {
                @for (i, question) in detail.questions.iter().enumerate() {
                    fieldset.question {
                        legend { (i + 1) ". " span.badge { (question.question_type.as_str()) } }
                        (question_text(question))
                        (answer_input(question))
                    }
                }
                button type="submit" { "Submit answers" }
            }
        }
    };
    Ok((format!("Exam #{id}"), body))
}

async fn exam_result(client: &ApiClient, id: Id) -> Fallible<(String, Markup)> {
    let result: ExamResult = client.exams().result(id).await?;
    let detail: ExamDetail = client.exams().get(id).await?;
    let questions: HashMap<Id, &Question> = detail
        .questions
        .iter()
        .map(|question| (question.id, question))
        .collect();
    let body = html! {
        section.score {
            p.big {
                (format!("{:.1}", result.score))
                @if let Some(grade) = &result.grade { " · " (grade) }
            }
            p { (result.correct_count) " of " (result.total_questions) " correct" }
        }
        @for answer in &result.answers {
            @let class: &str = match answer.is_correct {
                Some(true) => "card correct",
                Some(false) => "card wrong",
                None => "card",
            };
            article class=(class) {
                @if let Some(question) = questions.get(&answer.question_id) {
                    (question_body(question))
                    p { strong { "Your answer: " } (answer_text(question, &answer.user_answer)) }
                    p { strong { "Correct answer: " } (answer_text(question, &question.answer)) }
                    @if let Some(explanation) = &question.explanation {
                        div.markdown { (PreEscaped(markdown_to_html(explanation))) }
                    }
                } @else {
                    p { "Question #" (answer.question_id) }
                    p { strong { "Your answer: " } (answer.user_answer) }
                }
                @if let Some(score) = answer.score {
                    p.muted { "Score: " (format!("{score:.1}")) }
                }
                @if let Some(feedback) = &answer.ai_feedback {
                    blockquote.feedback { (feedback) }
                }
            }
        }
        p {
            a href=(Route::Mistakes.path()) { "Review mistakes" }
            " · "
            a href=(Route::ExamStart.path()) { "Start another exam" }
        }
    };
    Ok((format!("Result of exam #{id}"), body))
}

async fn mistakes(client: &ApiClient, params: &Params) -> Fallible<(String, Markup)> {
    let filter = MistakeFilter {
        direction_id: param_id(params, "direction_id"),
        mastered: param_bool(params, "mastered"),
    };
    let mistakes: Vec<Mistake> = client.mistakes().list(&filter).await?;
    let tabs: [(Option<bool>, &str); 3] = [(None, "All"), (Some(false), "To review"), (Some(true), "Mastered")];
    let body = html! {
        p.tabs {
            @for (mastered, label) in tabs {
                @let href: String = match mastered {
                    Some(mastered) => format!("{}?mastered={mastered}", Route::Mistakes),
                    None => Route::Mistakes.path(),
                };
                a href=(href) class=[(filter.mastered == mastered).then_some("active")] { (label) }
            }
        }
        @if mistakes.is_empty() {
            p.empty { "No mistakes here." }
        }
        @for mistake in &mistakes {
            article class=(if mistake.mastered { "card mastered" } else { "card" }) {
                header {
                    @if mistake.mastered { span.badge { "mastered" } }
                    span.muted { "Reviewed " (mistake.review_count) " times · " (mistake.created_at.short()) }
                }
                @if let Some(question) = &mistake.question {
                    (question_body(question))
                    details {
                        summary { "Answer" }
                        p { strong { "Answer: " } (answer_text(question, &question.answer)) }
                        @if let Some(explanation) = &question.explanation {
                            div.markdown { (PreEscaped(markdown_to_html(explanation))) }
                        }
                    }
                } @else {
                    p { "Question #" (mistake.question_id) }
                }
                footer {
                    @if !mistake.mastered {
                        (action_button(&format!("/actions/mistakes/{}/master", mistake.id), "Mark as mastered", ""))
                    }
                    (action_button(&format!("/actions/mistakes/{}/review", mistake.id), "Reviewed", ""))
                    (action_button(&format!("/actions/mistakes/{}/delete", mistake.id), "Delete", "danger"))
                }
            }
        }
    };
    Ok(("Mistakes".to_string(), body))
}
