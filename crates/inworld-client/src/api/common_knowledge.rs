//! Common knowledge API.

use reqwest::Method;
use serde::de::IgnoredAny;

use super::{apply_list_query, require, workspace_collection_url};
use crate::client::{ApiRequest, InworldClient};
use crate::error::Result;
use crate::operation::Operation;
use crate::types::{CommonKnowledge, ListCommonKnowledgeRequest, ListCommonKnowledgeResponse};

/// Common knowledge API client.
pub struct CommonKnowledgeApi {
    client: InworldClient,
}

impl CommonKnowledgeApi {
    pub(crate) fn new(client: InworldClient) -> Self {
        Self { client }
    }

    /// Create an entry in a workspace.
    pub async fn create(
        &self,
        workspace_id: &str,
        knowledge: &CommonKnowledge,
    ) -> Result<CommonKnowledge> {
        require("workspace id", workspace_id)?;
        let url = workspace_collection_url(&self.client, workspace_id, "common-knowledge")?;
        let request = ApiRequest::studio(Method::POST, url).json(knowledge)?;
        self.client.dispatch(request).await
    }

    /// Get an entry by resource name (`workspaces/{w}/common-knowledge/{k}`).
    pub async fn get(&self, knowledge: &str) -> Result<CommonKnowledge> {
        require("common knowledge id", knowledge)?;
        let url = self.client.studio_url(knowledge)?;
        self.client
            .dispatch(ApiRequest::studio(Method::GET, url))
            .await
    }

    /// List the entries of a workspace. One page per call.
    pub async fn list(
        &self,
        request: &ListCommonKnowledgeRequest,
    ) -> Result<ListCommonKnowledgeResponse> {
        require("workspace id", &request.workspace_id)?;
        let mut url =
            workspace_collection_url(&self.client, &request.workspace_id, "common-knowledge")?;
        apply_list_query(&mut url, &request.page, None);
        self.client
            .dispatch(ApiRequest::studio(Method::GET, url))
            .await
    }

    /// Update an entry with the fields set in `update`.
    pub async fn update(
        &self,
        knowledge: &str,
        update: &CommonKnowledge,
    ) -> Result<CommonKnowledge> {
        require("common knowledge id", knowledge)?;
        let url = self.client.studio_url(knowledge)?;
        let request = ApiRequest::studio(Method::PATCH, url).json(update)?;
        self.client.dispatch(request).await
    }

    /// Delete an entry.
    pub async fn delete(&self, knowledge: &str) -> Result<()> {
        require("common knowledge id", knowledge)?;
        let url = self.client.studio_url(knowledge)?;
        let _: IgnoredAny = self
            .client
            .dispatch(ApiRequest::studio(Method::DELETE, url))
            .await?;
        Ok(())
    }

    /// Start deploying an entry. See [`DeploymentsApi::deploy`](super::DeploymentsApi::deploy).
    pub async fn deploy(&self, knowledge: &str) -> Result<Operation> {
        require("common knowledge id", knowledge)?;
        self.client.deployments().deploy(knowledge).await
    }
}
