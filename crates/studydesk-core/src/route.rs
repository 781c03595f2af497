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

//! The table of navigable console paths.
//!
//! Each route maps a URL path to the view that renders it. Views are looked
//! up only when a path is visited, so nothing is rendered ahead of time.

use std::fmt::Display;
use std::fmt::Formatter;

use serde::Serialize;

use crate::types::Id;

/// A row of the route table. Patterns use `:id` for an integer segment.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
pub struct RouteDef {
    pub name: &'static str,
    pub pattern: &'static str,
    pub view: &'static str,
}

pub const ROUTES: [RouteDef; 7] = [
    RouteDef {
        name: "Home",
        pattern: "/",
        view: "HomeView",
    },
    RouteDef {
        name: "Materials",
        pattern: "/materials",
        view: "MaterialsView",
    },
    RouteDef {
        name: "Questions",
        pattern: "/questions",
        view: "QuestionsView",
    },
    RouteDef {
        name: "ExamStart",
        pattern: "/exam",
        view: "ExamStartView",
    },
    RouteDef {
        name: "ExamTaking",
        pattern: "/exam/:id",
        view: "ExamTakingView",
    },
    RouteDef {
        name: "ExamResult",
        pattern: "/exam/:id/result",
        view: "ExamResultView",
    },
    RouteDef {
        name: "Mistakes",
        pattern: "/mistakes",
        view: "MistakesView",
    },
];

/// A resolved route, with its parameters.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Route {
    Home,
    Materials,
    Questions,
    ExamStart,
    ExamTaking(Id),
    ExamResult(Id),
    Mistakes,
}

impl Route {
    /// Look up a path in the route table.
    ///
    /// The query string is ignored, as is a single trailing slash.
    pub fn resolve(path: &str) -> Option<Route> {
        let path: &str = path.split(['?', '#']).next().unwrap_or("");
        let path: &str = if path.len() > 1 {
            path.strip_suffix('/').unwrap_or(path)
        } else {
            path
        };
        let segments: Vec<&str> = match path.strip_prefix('/') {
            Some("") => Vec::new(),
            Some(rest) => rest.split('/').collect(),
            None => return None,
        };
        ROUTES.iter().find_map(|def| match_pattern(def, &segments))
    }

    /// The row of the route table this route was resolved from.
    pub fn def(&self) -> &'static RouteDef {
        let index: usize = match self {
            Route::Home => 0,
            Route::Materials => 1,
            Route::Questions => 2,
            Route::ExamStart => 3,
            Route::ExamTaking(_) => 4,
            Route::ExamResult(_) => 5,
            Route::Mistakes => 6,
        };
        &ROUTES[index]
    }

    pub fn name(&self) -> &'static str {
        self.def().name
    }

    pub fn view(&self) -> &'static str {
        self.def().view
    }

    /// The concrete path of this route.
    pub fn path(&self) -> String {
        match self {
            Route::ExamTaking(id) => format!("/exam/{id}"),
            Route::ExamResult(id) => format!("/exam/{id}/result"),
            _ => self.def().pattern.to_string(),
        }
    }
}

impl Display for Route {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path())
    }
}

fn match_pattern(def: &RouteDef, segments: &[&str]) -> Option<Route> {
    let pattern: Vec<&str> = match def.pattern.strip_prefix('/') {
        Some("") | None => Vec::new(),
        Some(rest) => rest.split('/').collect(),
    };
    if pattern.len() != segments.len() {
        return None;
    }
    let mut id: Option<Id> = None;
    for (expected, actual) in pattern.iter().zip(segments) {
        if *expected == ":id" {
            id = Some(parse_id(actual)?);
        } else if expected != actual {
            return None;
        }
    }
    let route = match (def.name, id) {
        ("Home", None) => Route::Home,
        ("Materials", None) => Route::Materials,
        ("Questions", None) => Route::Questions,
        ("ExamStart", None) => Route::ExamStart,
        ("ExamTaking", Some(id)) => Route::ExamTaking(id),
        ("ExamResult", Some(id)) => Route::ExamResult(id),
        ("Mistakes", None) => Route::Mistakes,
        _ => return None,
    };
    Some(route)
}

/// Parses an `:id` segment. Only plain digits are accepted, so `+1` and `-1`
/// are not ids.
fn parse_id(segment: &str) -> Option<Id> {
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    segment.parse().ok()
}
