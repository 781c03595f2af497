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

use clap::Subcommand;
use studydesk_core::types::Id;
use studydesk_core::types::direction::Direction;
use studydesk_core::types::direction::NewDirection;

use crate::client::ApiClient;
use crate::cmd::output::Describe;
use crate::cmd::output::OutputFormat;
use crate::cmd::output::field;
use crate::cmd::output::render_list;
use crate::cmd::output::render_one;
use crate::error::Fallible;
use crate::utils::non_empty;

#[derive(Subcommand)]
pub enum DirectionCommand {
    /// List all study directions.
    List,
    /// Show one direction.
    Show { id: Id },
    /// Create a direction.
    Create {
        name: String,
        #[arg(long)]
        description: Option<String>,
    },
    /// Delete a direction.
    Delete { id: Id },
}

pub async fn run(
    client: &ApiClient,
    command: DirectionCommand,
    format: OutputFormat,
) -> Fallible<String> {
    let api = client.directions();
    match command {
        DirectionCommand::List => render_list(format, &api.list().await?),
        DirectionCommand::Show { id } => render_one(format, &api.get(id).await?),
        DirectionCommand::Create { name, description } => {
            let direction = NewDirection {
                name,
                description: description.as_deref().and_then(non_empty),
            };
            render_one(format, &api.create(&direction).await?)
        }
        DirectionCommand::Delete { id } => render_one(format, &api.delete(id).await?),
    }
}

impl Describe for Direction {
    fn summary(&self) -> String {
        format!("#{} {}", self.id, self.name)
    }

    fn describe(&self) -> String {
        let mut out: String = self.summary();
        field(&mut out, "Description", self.description.as_deref());
        field(&mut out, "Created", Some(self.created_at.short()));
        out
    }
}
