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

use std::collections::HashMap;

use clap::Subcommand;
use studydesk_core::types::Id;
use studydesk_core::types::exam::AnswerSubmission;
use studydesk_core::types::exam::DEFAULT_QUESTION_COUNT;
use studydesk_core::types::exam::Exam;
use studydesk_core::types::exam::ExamDetail;
use studydesk_core::types::exam::ExamFilter;
use studydesk_core::types::exam::ExamMode;
use studydesk_core::types::exam::ExamResult;
use studydesk_core::types::exam::ExamStatus;
use studydesk_core::types::exam::NewExam;
use studydesk_core::types::exam::ScoreType;

use crate::client::ApiClient;
use crate::cmd::output::Describe;
use crate::cmd::output::OutputFormat;
use crate::cmd::output::field;
use crate::cmd::output::render_list;
use crate::cmd::output::render_one;
use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::error::fail;

#[derive(Subcommand)]
pub enum ExamCommand {
    /// List exams, newest first.
    List {
        #[arg(long)]
        direction: Option<Id>,
        #[arg(long)]
        status: Option<ExamStatus>,
    },
    /// Start a new exam on a direction.
    Create {
        #[arg(long)]
        direction: Id,
        #[arg(long, default_value_t = ExamMode::Untimed)]
        mode: ExamMode,
        /// Time limit in minutes. Required for timed exams.
        #[arg(long)]
        time_limit: Option<u32>,
        #[arg(long, default_value_t = ScoreType::Hundred)]
        score_type: ScoreType,
        /// How many questions to draw.
        #[arg(long, default_value_t = DEFAULT_QUESTION_COUNT)]
        count: u32,
    },
    /// Show an exam and its questions.
    Show { id: Id },
    /// Hand in an exam. Questions without an answer are submitted blank.
    Submit {
        id: Id,
        /// An answer, as `<question id>=<answer>`. Choice answers use option
        /// letters, e.g. `4=A,C`.
        #[arg(long = "answer")]
        answers: Vec<String>,
    },
    /// Show the graded result of a completed exam.
    Result { id: Id },
}

pub async fn run(client: &ApiClient, command: ExamCommand, format: OutputFormat) -> Fallible<String> {
    let api = client.exams();
    match command {
        ExamCommand::List { direction, status } => {
            let filter = ExamFilter {
                direction_id: direction,
                status,
            };
            render_list(format, &api.list(&filter).await?)
        }
        ExamCommand::Create {
            direction,
            mode,
            time_limit,
            score_type,
            count,
        } => {
            let exam: NewExam = NewExam {
                direction_id: direction,
                mode,
                time_limit,
                score_type,
                question_count: count,
            }
            .validated()?;
            render_one(format, &api.create(&exam).await?)
        }
        ExamCommand::Show { id } => render_one(format, &api.get(id).await?),
        ExamCommand::Submit { id, answers } => {
            let given: HashMap<Id, String> = parse_answers(&answers)?;
            let detail: ExamDetail = api.get(id).await?;
            if detail.exam.is_completed() {
                return fail(format!("Exam #{id} was already submitted."));
            }
            let answers: Vec<AnswerSubmission> = collect_answers(&detail, given)?;
            render_one(format, &api.submit(id, answers).await?)
        }
        ExamCommand::Result { id } => render_one(format, &api.result(id).await?),
    }
}

fn parse_answers(answers: &[String]) -> Fallible<HashMap<Id, String>> {
    let mut parsed: HashMap<Id, String> = HashMap::new();
    for answer in answers {
        let Some((id, text)) = answer.split_once('=') else {
            return fail(format!(
                "Invalid answer '{answer}': expected <question id>=<answer>."
            ));
        };
        let id: Id = id
            .trim()
            .parse()
            .map_err(|_| ErrorReport::new(format!("Invalid question id in '{answer}'.")))?;
        parsed.insert(id, text.trim().to_string());
    }
    Ok(parsed)
}

/// One submission per exam question, in exam order.
fn collect_answers(
    detail: &ExamDetail,
    mut given: HashMap<Id, String>,
) -> Fallible<Vec<AnswerSubmission>> {
    let answers: Vec<AnswerSubmission> = detail
        .questions
        .iter()
        .map(|question| AnswerSubmission {
            exam_id: detail.exam.id,
            question_id: question.id,
            user_answer: given.remove(&question.id).unwrap_or_default(),
        })
        .collect();
    if let Some(id) = given.keys().min() {
        return fail(format!(
            "Question #{id} is not part of exam #{}.",
            detail.exam.id
        ));
    }
    Ok(answers)
}

impl Describe for Exam {
    fn summary(&self) -> String {
        let mut out: String = format!(
            "#{} [{}] direction #{}, {}",
            self.id, self.status, self.direction_id, self.mode
        );
        if let Some(limit) = self.time_limit {
            out.push_str(&format!(" {limit} min"));
        }
        if let Some(score) = self.score {
            out.push_str(&format!(", score {score:.1}"));
        }
        if let Some(grade) = &self.grade {
            out.push_str(&format!(" ({grade})"));
        }
        out
    }

    fn describe(&self) -> String {
        let mut out: String = self.summary();
        field(&mut out, "Started", Some(self.created_at.short()));
        field(&mut out, "Completed", self.completed_at.map(|at| at.short()));
        out
    }
}

impl Describe for ExamDetail {
    fn summary(&self) -> String {
        self.exam.summary()
    }

    fn describe(&self) -> String {
        let mut out: String = self.exam.describe();
        for (i, question) in self.questions.iter().enumerate() {
            out.push_str(&format!(
                "\n\n{}. [{}] (#{}) {}",
                i + 1,
                question.question_type,
                question.id,
                question.content.trim()
            ));
            for (label, option) in question.labeled_options() {
                out.push_str(&format!("\n   {label}. {option}"));
            }
        }
        out
    }
}

impl Describe for ExamResult {
    fn summary(&self) -> String {
        let mut out: String = format!(
            "Exam #{}: {}/{} correct, score {:.1}",
            self.exam_id, self.correct_count, self.total_questions, self.score
        );
        if let Some(grade) = &self.grade {
            out.push_str(&format!(" ({grade})"));
        }
        out
    }

    fn describe(&self) -> String {
        let mut out: String = self.summary();
        for answer in &self.answers {
            let mark: &str = match answer.is_correct {
                Some(true) => "correct",
                Some(false) => "wrong",
                None => "ungraded",
            };
            let user_answer: &str = if answer.user_answer.is_empty() {
                "(blank)"
            } else {
                &answer.user_answer
            };
            out.push_str(&format!(
                "\n  #{} {mark}: {user_answer}",
                answer.question_id
            ));
            if let Some(feedback) = &answer.ai_feedback {
                out.push_str(&format!("\n      {feedback}"));
            }
        }
        out
    }
}
