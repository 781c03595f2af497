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

//! studydesk-core: Core library for the studydesk client.
//!
//! This library is free of I/O and provides:
//! - Typed shapes for the study manager's JSON payloads
//! - The REST contract (method and path of every endpoint)
//! - The table of navigable console routes
//! - A decoder for the material progress event stream

#[macro_use]
mod macros;

pub mod endpoint;
pub mod error;
pub mod progress;
pub mod route;
pub mod types;

// Re-exports for convenience
pub use endpoint::{Endpoint, Method};
pub use error::{ErrorReport, Fallible, fail};
pub use progress::{ProgressDecoder, ProgressEvent, ProgressStep};
pub use route::{ROUTES, Route, RouteDef};
pub use types::timestamp::Timestamp;
