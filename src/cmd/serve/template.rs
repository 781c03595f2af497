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

use maud::DOCTYPE;
use maud::Markup;
use maud::html;
use studydesk_core::Route;

const NAV: [(Route, &str); 5] = [
    (Route::Home, "Directions"),
    (Route::Materials, "Materials"),
    (Route::Questions, "Questions"),
    (Route::ExamStart, "Exams"),
    (Route::Mistakes, "Mistakes"),
];

/// Which navigation entry a route belongs to.
fn section(route: Route) -> Route {
    match route {
        Route::ExamTaking(_) | Route::ExamResult(_) => Route::ExamStart,
        other => other,
    }
}

pub fn page_template(route: Option<Route>, title: &str, body: Markup) -> Markup {
    let current: Option<Route> = route.map(section);
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) " · studydesk" }
                link rel="stylesheet" href="/style.css";
            }
            body {
                nav {
                    span.brand { "studydesk" }
                    @for (target, label) in NAV {
                        a href=(target.path()) class=[(current == Some(target)).then_some("active")] {
                            (label)
                        }
                    }
                }
                main {
                    h1 { (title) }
                    (body)
                }
            }
        }
    }
}

/// The page shown when the backend could not serve a request.
pub fn error_template(message: &str) -> Markup {
    page_template(
        None,
        "Something went wrong",
        html! {
            p.error { (message) }
            p { a href="/" { "Back to the start page" } }
        },
    )
}
