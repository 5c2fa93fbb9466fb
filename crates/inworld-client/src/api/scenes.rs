//! Scenes API.

use reqwest::Method;
use serde::de::IgnoredAny;

use super::{apply_list_query, apply_view, require, workspace_collection_url};
use crate::client::{ApiRequest, InworldClient};
use crate::error::Result;
use crate::operation::Operation;
use crate::types::{ListScenesRequest, ListScenesResponse, Scene, SceneItemView};

/// Scenes API client.
pub struct ScenesApi {
    client: InworldClient,
}

impl ScenesApi {
    pub(crate) fn new(client: InworldClient) -> Self {
        Self { client }
    }

    /// Create a scene. It must be deployed before it takes effect.
    pub async fn create(&self, workspace_id: &str, scene: &Scene) -> Result<Scene> {
        require("workspace id", workspace_id)?;
        let url = workspace_collection_url(&self.client, workspace_id, "scenes")?;
        let request = ApiRequest::studio(Method::POST, url).json(scene)?;
        self.client.dispatch(request).await
    }

    /// Get a scene by resource name (`workspaces/{w}/scenes/{s}`).
    pub async fn get(&self, scene: &str, view: Option<SceneItemView>) -> Result<Scene> {
        require("scene id", scene)?;
        let mut url = self.client.studio_url(scene)?;
        apply_view(&mut url, view.map(SceneItemView::as_str));
        self.client
            .dispatch(ApiRequest::studio(Method::GET, url))
            .await
    }

    /// List scenes in a workspace.
    pub async fn list(&self, request: &ListScenesRequest) -> Result<ListScenesResponse> {
        require("workspace id", &request.workspace_id)?;
        let mut url = workspace_collection_url(&self.client, &request.workspace_id, "scenes")?;
        apply_list_query(&mut url, &request.page, None);
        self.client
            .dispatch(ApiRequest::studio(Method::GET, url))
            .await
    }

    /// Update a scene. Changes apply after the next deploy.
    pub async fn update(&self, scene: &str, update: &Scene) -> Result<Scene> {
        require("scene id", scene)?;
        let url = self.client.studio_url(scene)?;
        let request = ApiRequest::studio(Method::PATCH, url).json(update)?;
        self.client.dispatch(request).await
    }

    /// Delete a scene.
    pub async fn delete(&self, scene: &str) -> Result<()> {
        require("scene id", scene)?;
        let url = self.client.studio_url(scene)?;
        let _: IgnoredAny = self
            .client
            .dispatch(ApiRequest::studio(Method::DELETE, url))
            .await?;
        Ok(())
    }

    /// Start deploying a scene. Poll the returned operation through
    /// [`DeploymentsApi`](crate::api::DeploymentsApi).
    pub async fn deploy(&self, scene: &str) -> Result<Operation> {
        require("scene id", scene)?;
        self.client.deployments().deploy(scene).await
    }
}
