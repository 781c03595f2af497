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

use axum::Router;
use axum::extract::Query;
use axum::extract::State;
use axum::http::HeaderName;
use axum::http::Method;
use axum::http::StatusCode;
use axum::http::Uri;
use axum::http::header::CACHE_CONTROL;
use axum::http::header::CONTENT_TYPE;
use axum::response::Html;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::routing::get;
use axum::routing::post;
use maud::Markup;
use studydesk_core::Route;
use tokio::net::TcpListener;
use tokio::signal;

use crate::client::ApiClient;
use crate::cmd::serve::actions;
use crate::cmd::serve::template::error_template;
use crate::cmd::serve::views::render;
use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::utils::CACHE_CONTROL_IMMUTABLE;

pub struct ServerConfig {
    pub client: ApiClient,
    pub host: String,
    pub port: u16,
}

#[derive(Clone)]
pub struct ConsoleState {
    pub client: ApiClient,
}

pub async fn start_server(config: ServerConfig) -> Fallible<()> {
    let state = ConsoleState {
        client: config.client,
    };
    let app = Router::new();
    let app = app.route("/style.css", get(style_handler));
    let app = app.route("/actions/directions", post(actions::create_direction));
    let app = app.route(
        "/actions/directions/{id}/delete",
        post(actions::delete_direction),
    );
    let app = app.route("/actions/materials", post(actions::create_material));
    let app = app.route(
        "/actions/materials/{id}/delete",
        post(actions::delete_material),
    );
    let app = app.route("/actions/materials/{id}/move", post(actions::move_material));
    let app = app.route("/actions/questions/{id}/rate", post(actions::rate_question));
    let app = app.route(
        "/actions/questions/{id}/delete",
        post(actions::delete_question),
    );
    let app = app.route("/actions/exams", post(actions::create_exam));
    let app = app.route("/actions/exams/{id}/submit", post(actions::submit_exam));
    let app = app.route("/actions/mistakes/{id}/master", post(actions::master_mistake));
    let app = app.route("/actions/mistakes/{id}/review", post(actions::review_mistake));
    let app = app.route("/actions/mistakes/{id}/delete", post(actions::delete_mistake));
    let app = app.fallback(view_handler);
    let app = app.with_state(state);
    let bind = format!("{}:{}", config.host, config.port);

    log::debug!("Starting server on {bind}");
    let listener = TcpListener::bind(&bind).await?;
    log::info!("Console running at http://{bind}/");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

/// Every page is resolved through the route table; paths outside it are not
/// found.
async fn view_handler(
    State(state): State<ConsoleState>,
    method: Method,
    uri: Uri,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let Some(route) = Route::resolve(uri.path()) else {
        return not_found();
    };
    if method != Method::GET && method != Method::HEAD {
        return (StatusCode::METHOD_NOT_ALLOWED, Html("Method Not Allowed".to_string()))
            .into_response();
    }
    let page: Fallible<Markup> = render(&state.client, route, &params).await;
    match page {
        Ok(markup) => Html(markup.into_string()).into_response(),
        Err(e) => error_response(StatusCode::BAD_GATEWAY, &e),
    }
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Html("Not Found".to_string())).into_response()
}

pub fn error_response(status: StatusCode, error: &ErrorReport) -> Response {
    log::warn!("Request failed: {error}");
    let page: Markup = error_template(error.message());
    (status, Html(page.into_string())).into_response()
}

async fn style_handler() -> (StatusCode, [(HeaderName, &'static str); 2], &'static [u8]) {
    let bytes = include_bytes!("style.css");
    (
        StatusCode::OK,
        [
            (CONTENT_TYPE, "text/css"),
            (CACHE_CONTROL, CACHE_CONTROL_IMMUTABLE),
        ],
        bytes,
    )
}

async fn shutdown_signal() {
    match signal::ctrl_c().await {
        Ok(()) => log::debug!("Received Ctrl+C, shutting down gracefully"),
        Err(e) => {
            log::warn!("Failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await
        }
    }
}
