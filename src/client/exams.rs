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

use studydesk_core::Endpoint;
use studydesk_core::types::Id;
use studydesk_core::types::exam::AnswerSubmission;
use studydesk_core::types::exam::Exam;
use studydesk_core::types::exam::ExamDetail;
use studydesk_core::types::exam::ExamFilter;
use studydesk_core::types::exam::ExamResult;
use studydesk_core::types::exam::ExamSubmission;
use studydesk_core::types::exam::NewExam;

use crate::client::ApiClient;
use crate::error::Fallible;

pub struct ExamsApi<'a> {
    client: &'a ApiClient,
}

impl<'a> ExamsApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, filter: &ExamFilter) -> Fallible<Vec<Exam>> {
        self.client.get_with_query(Endpoint::ListExams, filter).await
    }

    /// Start an exam. The backend draws the questions and returns them with
    /// the exam.
    pub async fn create(&self, exam: &NewExam) -> Fallible<ExamDetail> {
        self.client.with_body(Endpoint::CreateExam, exam).await
    }

    pub async fn get(&self, id: Id) -> Fallible<ExamDetail> {
        self.client.get(Endpoint::GetExam(id)).await
    }

    /// Hand in the answers. Grading short answers can take a while on the
    /// backend, which is why the default timeout is generous.
    pub async fn submit(&self, id: Id, answers: Vec<AnswerSubmission>) -> Fallible<ExamResult> {
        self.client
            .with_body(Endpoint::SubmitExam(id), &ExamSubmission { answers })
            .await
    }

    pub async fn result(&self, id: Id) -> Fallible<ExamResult> {
        self.client.get(Endpoint::ExamResult(id)).await
    }
}
