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

//! Test support: an in-process stand-in for the study manager backend.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::HeaderName;
use axum::http::Method;
use axum::http::StatusCode;
use axum::http::Uri;
use axum::http::header::CONTENT_TYPE;
use axum::http::header::USER_AGENT;
use portpicker::pick_unused_port;
use tokio::net::TcpListener;
use tokio::spawn;
use tokio::time::sleep;

use crate::client::ApiClient;
use crate::config::ClientConfig;
use crate::error::Fallible;

/// A request the mock backend received.
#[derive(Clone, Debug)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub content_type: Option<String>,
    pub user_agent: String,
    pub body: Vec<u8>,
}

impl RecordedRequest {
    /// `METHOD /path`, the key responses are registered under.
    pub fn route(&self) -> String {
        format!("{} {}", self.method, self.path)
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).unwrap_or(serde_json::Value::Null)
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

struct Canned {
    status: u16,
    content_type: &'static str,
    body: String,
}

#[derive(Clone)]
struct MockState {
    responses: Arc<HashMap<String, Canned>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    delay: Option<Duration>,
}

pub struct MockBackendBuilder {
    responses: HashMap<String, Canned>,
    delay: Option<Duration>,
}

impl MockBackendBuilder {
    /// Answer `route` (e.g. `"GET /api/directions"`) with a JSON body.
    pub fn respond(mut self, route: &str, status: u16, body: impl ToString) -> Self {
        self.responses.insert(
            route.to_string(),
            Canned {
                status,
                content_type: "application/json",
                body: body.to_string(),
            },
        );
        self
    }

    /// Answer `route` with a server-sent event stream.
    pub fn respond_stream(mut self, route: &str, body: &str) -> Self {
        self.responses.insert(
            route.to_string(),
            Canned {
                status: 200,
                content_type: "text/event-stream",
                body: body.to_string(),
            },
        );
        self
    }

    /// Wait this long before answering any request.
    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub async fn start(self) -> Fallible<MockBackend> {
        let port: u16 = pick_unused_port().unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = MockState {
            responses: Arc::new(self.responses),
            requests: requests.clone(),
            delay: self.delay,
        };
        let app = Router::new().fallback(mock_handler).with_state(state);
        let listener = TcpListener::bind(format!("127.0.0.1:{port}")).await?;
        spawn(async move { axum::serve(listener, app).await });
        Ok(MockBackend { port, requests })
    }
}

pub struct MockBackend {
    port: u16,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockBackend {
    pub fn builder() -> MockBackendBuilder {
        MockBackendBuilder {
            responses: HashMap::new(),
            delay: None,
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://127.0.0.1:{}/api", self.port)
    }

    pub fn client(&self) -> Fallible<ApiClient> {
        ApiClient::new(&ClientConfig {
            base_url: self.base_url(),
            timeout: Duration::from_secs(5),
        })
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> RecordedRequest {
        self.requests().pop().expect("no request was received")
    }
}

async fn mock_handler(
    State(state): State<MockState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, [(HeaderName, &'static str); 1], String) {
    let header = |name: HeaderName| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_string())
    };
    let request = RecordedRequest {
        method: method.to_string(),
        path: uri.path().to_string(),
        query: uri.query().map(|q| q.to_string()),
        content_type: header(CONTENT_TYPE),
        user_agent: header(USER_AGENT).unwrap_or_default(),
        body: body.to_vec(),
    };
    let route: String = request.route();
    state.requests.lock().unwrap().push(request);
    if let Some(delay) = state.delay {
        sleep(delay).await;
    }
    match state.responses.get(&route) {
        Some(canned) => (
            StatusCode::from_u16(canned.status).unwrap(),
            [(CONTENT_TYPE, canned.content_type)],
            canned.body.clone(),
        ),
        None => (
            StatusCode::NOT_FOUND,
            [(CONTENT_TYPE, "application/json")],
            r#"{"detail": "Not Found"}"#.to_string(),
        ),
    }
}

/// JSON bodies shaped like the backend's responses.
pub mod fixtures {
    use serde_json::Value;
    use serde_json::json;

    pub const CREATED_AT: &str = "2024-05-01T09:00:00.123456";

    pub fn list(items: &[Value]) -> String {
        Value::Array(items.to_vec()).to_string()
    }

    pub fn deleted() -> Value {
        json!({"message": "Deleted"})
    }

    pub fn direction(id: i64, name: &str) -> Value {
        json!({
            "id": id,
            "name": name,
            "description": format!("All about {name}"),
            "created_at": CREATED_AT,
        })
    }

    pub fn material(id: i64, direction_id: i64, title: &str) -> Value {
        json!({
            "id": id,
            "direction_id": direction_id,
            "title": title,
            "content": "# Ownership\n\nEach value has a single **owner**.",
            "key_points": [
                {"point": "Ownership", "description": "Each value has one owner", "importance": 5}
            ],
            "status": "processed",
            "created_at": CREATED_AT,
        })
    }

    pub fn question(id: i64, material_id: i64, question_type: &str) -> Value {
        let (options, answer) = match question_type {
            "single_choice" => (json!(["Stack", "Heap", "Register"]), "B"),
            "multi_choice" => (json!(["i32", "String", "bool"]), "A,C"),
            "true_false" => (Value::Null, "错误"),
            _ => (Value::Null, "A reference must not outlive its referent."),
        };
        json!({
            "id": id,
            "material_id": material_id,
            "type": question_type,
            "difficulty": 2,
            "content": format!("Question {id} about ownership?"),
            "options": options,
            "answer": answer,
            "explanation": "See the chapter on ownership.",
            "rating": null,
            "created_at": CREATED_AT,
        })
    }

    pub fn exam(id: i64, direction_id: i64, completed: bool) -> Value {
        json!({
            "id": id,
            "direction_id": direction_id,
            "mode": "timed",
            "time_limit": 20,
            "score_type": "grade",
            "status": if completed { "completed" } else { "in_progress" },
            "score": if completed { json!(50.0) } else { Value::Null },
            "grade": if completed { json!("D") } else { Value::Null },
            "created_at": CREATED_AT,
            "completed_at": if completed { json!("2024-05-01T09:15:00") } else { Value::Null },
        })
    }

    pub fn exam_detail(id: i64, direction_id: i64, completed: bool, questions: &[Value]) -> Value {
        let mut exam: Value = exam(id, direction_id, completed);
        exam["questions"] = Value::Array(questions.to_vec());
        exam
    }

    pub fn exam_result(exam_id: i64) -> Value {
        json!({
            "exam_id": exam_id,
            "total_questions": 2,
            "correct_count": 1,
            "score": 50.0,
            "grade": "D",
            "answers": [
                {
                    "id": 1, "exam_id": exam_id, "question_id": 1, "user_answer": "B",
                    "is_correct": true, "score": 100.0, "ai_feedback": null,
                    "answered_at": "2024-05-01T09:10:00"
                },
                {
                    "id": 2, "exam_id": exam_id, "question_id": 4, "user_answer": "It can.",
                    "is_correct": false, "score": 0.0,
                    "ai_feedback": "The answer misses the borrow rule.",
                    "answered_at": "2024-05-01T09:11:00"
                }
            ],
        })
    }

    pub fn mistake(id: i64, question: Value) -> Value {
        json!({
            "id": id,
            "question_id": question["id"],
            "answer_id": 2,
            "review_count": 1,
            "mastered": false,
            "created_at": CREATED_AT,
            "question": question,
        })
    }

    pub fn task(id: i64, status: &str) -> Value {
        json!({
            "id": id,
            "direction_id": 1,
            "title": "Lifetimes",
            "source_type": "text",
            "source_content": "Lifetimes are regions of code.",
            "raw_text": "Lifetimes are regions of code.",
            "summary": "An introduction to lifetimes.",
            "status": status,
            "error_message": null,
            "knowledge_points": [{
                "id": 1, "task_id": id, "name": "Lifetime", "description": "A region of code",
                "importance": 4, "category": "concept", "created_at": CREATED_AT
            }],
            "best_practices": [{
                "id": 1, "task_id": id, "title": "Elide", "content": "Let the compiler infer.",
                "scenario": null, "notes": null, "created_at": CREATED_AT
            }],
            "created_at": CREATED_AT,
            "updated_at": null,
        })
    }

    pub fn task_summary(id: i64) -> Value {
        json!({
            "id": id,
            "direction_id": null,
            "title": "Lifetimes",
            "source_type": "file",
            "summary": null,
            "status": "pending",
            "created_at": CREATED_AT,
            "updated_at": null,
        })
    }
}
