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

mod actions;
pub mod server;
mod template;
mod views;

#[cfg(test)]
mod tests {
    use portpicker::pick_unused_port;
    use reqwest::Client;
    use reqwest::Response;
    use reqwest::StatusCode;
    use reqwest::header::LOCATION;
    use reqwest::redirect::Policy;
    use serde_json::json;
    use tokio::spawn;

    use crate::cmd::serve::server::ServerConfig;
    use crate::cmd::serve::server::start_server;
    use crate::error::Fallible;
    use crate::error::transport_error;
    use crate::helper::MockBackend;
    use crate::helper::fixtures;
    use crate::utils::wait_for_server;

    const TEST_HOST: &str = "127.0.0.1";

    /// Start the console in front of a mock backend, returning its address.
    async fn start_console(backend: &MockBackend) -> Fallible<String> {
        let port = pick_unused_port().unwrap();
        let config = ServerConfig {
            client: backend.client()?,
            host: TEST_HOST.to_string(),
            port,
        };
        spawn(async move { start_server(config).await });
        wait_for_server(TEST_HOST, port).await?;
        Ok(format!("http://{TEST_HOST}:{port}"))
    }

    fn browser() -> Fallible<Client> {
        Client::builder()
            .redirect(Policy::none())
            .build()
            .map_err(transport_error)
    }

    async fn get(url: String) -> Fallible<Response> {
        browser()?.get(url).send().await.map_err(transport_error)
    }

    async fn post(url: String, form: &[(&str, &str)]) -> Fallible<Response> {
        browser()?
            .post(url)
            .form(form)
            .send()
            .await
            .map_err(transport_error)
    }

    async fn text(response: Response) -> Fallible<String> {
        response.text().await.map_err(transport_error)
    }

    fn location(response: &Response) -> Option<&str> {
        response
            .headers()
            .get(LOCATION)
            .and_then(|value| value.to_str().ok())
    }

    #[tokio::test]
    async fn test_static_and_unknown_paths() -> Fallible<()> {
        let backend = MockBackend::builder().start().await?;
        let console: String = start_console(&backend).await?;

        let response = get(format!("{console}/style.css")).await?;
        assert!(response.status().is_success());
        assert_eq!(response.headers().get("content-type").unwrap(), "text/css");

        let response = get(format!("{console}/herp-derp")).await?;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = get(format!("{console}/exam/abc")).await?;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = post(format!("{console}/herp-derp"), &[]).await?;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = post(format!("{console}/materials"), &[]).await?;
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);

        // Nothing reached the backend.
        assert!(backend.requests().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_home() -> Fallible<()> {
        let backend = MockBackend::builder()
            .respond("GET /health", 200, json!({"status": "ok"}))
            .respond(
                "GET /api/directions",
                200,
                fixtures::list(&[fixtures::direction(1, "Rust <2024>")]),
            )
            .start()
            .await?;
        let console: String = start_console(&backend).await?;
        let response = get(format!("{console}/")).await?;
        assert!(response.status().is_success());
        assert_eq!(
            response.headers().get("content-type").unwrap(),
            "text/html; charset=utf-8"
        );
        let html: String = text(response).await?;
        assert!(html.contains(r#"<span class="online">online</span>"#));
        assert!(html.contains(r#"<a href="/materials?direction_id=1">Rust &lt;2024&gt;</a>"#));
        assert!(html.contains(r#"action="/actions/directions/1/delete""#));
        Ok(())
    }

    #[tokio::test]
    async fn test_materials_filter_is_forwarded() -> Fallible<()> {
        let backend = MockBackend::builder()
            .respond(
                "GET /api/directions",
                200,
                fixtures::list(&[fixtures::direction(2, "Rust")]),
            )
            .respond(
                "GET /api/materials",
                200,
                fixtures::list(&[fixtures::material(7, 2, "Ownership")]),
            )
            .start()
            .await?;
        let console: String = start_console(&backend).await?;
        let response = get(format!("{console}/materials/?direction_id=2")).await?;
        assert!(response.status().is_success());
        let html: String = text(response).await?;
        assert!(html.contains("<h1>Ownership</h1>"));
        assert!(html.contains("<strong>owner</strong>"));
        let materials = backend
            .requests()
            .into_iter()
            .find(|r| r.path == "/api/materials")
            .unwrap();
        assert_eq!(materials.query.as_deref(), Some("direction_id=2"));
        Ok(())
    }

    #[tokio::test]
    async fn test_exam_taking() -> Fallible<()> {
        let questions = [
            fixtures::question(1, 2, "single_choice"),
            fixtures::question(2, 2, "multi_choice"),
            fixtures::question(4, 2, "short_answer"),
        ];
        let backend = MockBackend::builder()
            .respond(
                "GET /api/exams/3",
                200,
                fixtures::exam_detail(3, 1, false, &questions),
            )
            .start()
            .await?;
        let console: String = start_console(&backend).await?;
        let html: String = text(get(format!("{console}/exam/3")).await?).await?;
        assert!(html.contains(r#"action="/actions/exams/3/submit""#));
        assert!(html.contains(r#"<input type="radio" name="answer-1" value="A">"#));
        assert!(html.contains(r#"<input type="checkbox" name="answer-2" value="C">"#));
        assert!(html.contains(r#"<textarea name="answer-4""#));
        assert!(html.contains("time limit 20 minutes"));
        Ok(())
    }

    #[tokio::test]
    async fn test_backend_error_page() -> Fallible<()> {
        let backend = MockBackend::builder()
            .respond(
                "GET /api/exams/8/result",
                400,
                json!({"detail": "Exam not completed yet"}),
            )
            .start()
            .await?;
        let console: String = start_console(&backend).await?;
        let response = get(format!("{console}/exam/8/result")).await?;
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let html: String = text(response).await?;
        assert!(html.contains("HTTP 400: Exam not completed yet"));
        Ok(())
    }

    #[tokio::test]
    async fn test_create_direction() -> Fallible<()> {
        let backend = MockBackend::builder()
            .respond("POST /api/directions", 200, fixtures::direction(4, "Rust"))
            .start()
            .await?;
        let console: String = start_console(&backend).await?;
        let response = post(
            format!("{console}/actions/directions"),
            &[("name", " Rust "), ("description", "")],
        )
        .await?;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), Some("/"));
        assert_eq!(backend.last_request().json(), json!({"name": "Rust"}));

        let response = post(format!("{console}/actions/directions"), &[("name", "  ")]).await?;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(backend.requests().len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_form_fields_are_bad_requests() -> Fallible<()> {
        let backend = MockBackend::builder().start().await?;
        let console: String = start_console(&backend).await?;

        let response = post(
            format!("{console}/actions/directions"),
            &[("description", "x")],
        )
        .await?;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = post(format!("{console}/actions/exams"), &[("mode", "timed")]).await?;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = post(format!("{console}/actions/materials/4/move"), &[]).await?;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = post(format!("{console}/actions/questions/4/rate"), &[]).await?;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        assert!(backend.requests().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_submit_exam() -> Fallible<()> {
        let questions = [
            fixtures::question(1, 2, "multi_choice"),
            fixtures::question(4, 2, "short_answer"),
        ];
        let backend = MockBackend::builder()
            .respond(
                "GET /api/exams/3",
                200,
                fixtures::exam_detail(3, 1, false, &questions),
            )
            .respond("POST /api/exams/3/submit", 200, fixtures::exam_result(3))
            .start()
            .await?;
        let console: String = start_console(&backend).await?;
        let response = post(
            format!("{console}/actions/exams/3/submit"),
            &[
                ("answer-1", "A"),
                ("answer-1", "C"),
                ("answer-4", "It must not outlive the owner."),
            ],
        )
        .await?;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), Some("/exam/3/result"));
        assert_eq!(
            backend.last_request().json(),
            json!({"answers": [
                {"exam_id": 3, "question_id": 1, "user_answer": "A,C"},
                {"exam_id": 3, "question_id": 4, "user_answer": "It must not outlive the owner."}
            ]})
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_rate_question() -> Fallible<()> {
        let backend = MockBackend::builder()
            .respond(
                "PATCH /api/questions/5/rate",
                200,
                fixtures::question(5, 2, "true_false"),
            )
            .start()
            .await?;
        let console: String = start_console(&backend).await?;
        let response = post(
            format!("{console}/actions/questions/5/rate"),
            &[("rating", "bad")],
        )
        .await?;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), Some("/questions"));
        let request = backend.last_request();
        assert_eq!(request.route(), "PATCH /api/questions/5/rate");
        assert_eq!(request.json(), json!({"rating": "bad"}));

        let response = post(
            format!("{console}/actions/questions/5/rate"),
            &[("rating", "meh")],
        )
        .await?;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        Ok(())
    }

    #[tokio::test]
    async fn test_failed_mutation_is_bad_gateway() -> Fallible<()> {
        let backend = MockBackend::builder()
            .respond(
                "POST /api/exams",
                400,
                json!({"detail": "No questions available for this direction"}),
            )
            .start()
            .await?;
        let console: String = start_console(&backend).await?;
        let response = post(
            format!("{console}/actions/exams"),
            &[("direction_id", "1"), ("mode", "untimed")],
        )
        .await?;
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let html: String = text(response).await?;
        assert!(html.contains("No questions available for this direction"));
        Ok(())
    }
}
