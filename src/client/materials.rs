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

use reqwest::Response;
use serde::Serialize;
use studydesk_core::Endpoint;
use studydesk_core::ProgressDecoder;
use studydesk_core::ProgressEvent;
use studydesk_core::types::Id;
use studydesk_core::types::Message;
use studydesk_core::types::material::Material;
use studydesk_core::types::material::MaterialDirection;
use studydesk_core::types::material::NewMaterial;

use crate::client::ApiClient;
use crate::error::Fallible;
use crate::error::transport_error;

#[derive(Serialize)]
struct MaterialQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    direction_id: Option<Id>,
}

pub struct MaterialsApi<'a> {
    client: &'a ApiClient,
}

impl<'a> MaterialsApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// List materials, optionally only those of one direction.
    pub async fn list(&self, direction_id: Option<Id>) -> Fallible<Vec<Material>> {
        self.client
            .get_with_query(Endpoint::ListMaterials, &MaterialQuery { direction_id })
            .await
    }

    pub async fn create(&self, material: &NewMaterial) -> Fallible<Material> {
        self.client
            .with_body(Endpoint::CreateMaterial, material)
            .await
    }

    pub async fn get(&self, id: Id) -> Fallible<Material> {
        self.client.get(Endpoint::GetMaterial(id)).await
    }

    pub async fn delete(&self, id: Id) -> Fallible<Message> {
        self.client.delete(Endpoint::DeleteMaterial(id)).await
    }

    /// Move a material to another direction.
    pub async fn set_direction(&self, id: Id, direction_id: Id) -> Fallible<Material> {
        self.client
            .with_body(
                Endpoint::MoveMaterial(id),
                &MaterialDirection { direction_id },
            )
            .await
    }

    /// Follow the processing progress of a material. Calls `on_event` for
    /// every event and returns the last one, if any.
    pub async fn progress<F>(&self, id: Id, mut on_event: F) -> Fallible<Option<ProgressEvent>>
    where
        F: FnMut(&ProgressEvent),
    {
        let endpoint: Endpoint = Endpoint::MaterialProgress(id);
        let request = self
            .client
            .request(endpoint)?
            .header(reqwest::header::ACCEPT, "text/event-stream");
        let mut response: Response = self.client.execute(endpoint, request).await?;
        let mut decoder: ProgressDecoder = ProgressDecoder::new();
        let mut last: Option<ProgressEvent> = None;
        while let Some(chunk) = response.chunk().await.map_err(transport_error)? {
            for event in decoder.push(&chunk)? {
                on_event(&event);
                let terminal: bool = event.step.is_terminal();
                last = Some(event);
                if terminal {
                    return Ok(last);
                }
            }
        }
        if let Some(event) = decoder.finish()? {
            on_event(&event);
            last = Some(event);
        }
        Ok(last)
    }
}
