//! Characters API.

use reqwest::Method;
use serde::de::IgnoredAny;

use super::{apply_list_query, apply_view, require, workspace_collection_url};
use crate::client::{ApiRequest, InworldClient};
use crate::error::Result;
use crate::operation::Operation;
use crate::types::{
    Character, CharacterItemView, CharacterView, ListCharactersRequest, ListCharactersResponse,
};

/// Characters API client.
pub struct CharactersApi {
    client: InworldClient,
}

impl CharactersApi {
    pub(crate) fn new(client: InworldClient) -> Self {
        Self { client }
    }

    /// Create a character. It must be deployed before it can be talked to.
    pub async fn create(&self, workspace_id: &str, character: &Character) -> Result<Character> {
        require("workspace id", workspace_id)?;
        let url = workspace_collection_url(&self.client, workspace_id, "characters")?;
        let request = ApiRequest::studio(Method::POST, url).json(character)?;
        self.client.dispatch(request).await
    }

    /// Get a character by resource name (`workspaces/{w}/characters/{c}`).
    pub async fn get(&self, character: &str, view: Option<CharacterItemView>) -> Result<Character> {
        require("character name", character)?;
        let mut url = self.client.studio_url(character)?;
        apply_view(&mut url, view.map(CharacterItemView::as_str));
        self.client
            .dispatch(ApiRequest::studio(Method::GET, url))
            .await
    }

    /// List characters in a workspace.
    pub async fn list(&self, request: &ListCharactersRequest) -> Result<ListCharactersResponse> {
        require("workspace id", &request.workspace_id)?;
        let mut url =
            workspace_collection_url(&self.client, &request.workspace_id, "characters")?;
        apply_list_query(&mut url, &request.page, request.view.map(CharacterView::as_str));
        self.client
            .dispatch(ApiRequest::studio(Method::GET, url))
            .await
    }

    /// Update a character. Changes apply after the next deploy.
    pub async fn update(&self, character: &str, update: &Character) -> Result<Character> {
        require("character name", character)?;
        let url = self.client.studio_url(character)?;
        let request = ApiRequest::studio(Method::PATCH, url).json(update)?;
        self.client.dispatch(request).await
    }

    /// Delete a character.
    pub async fn delete(&self, character: &str) -> Result<()> {
        require("character name", character)?;
        let url = self.client.studio_url(character)?;
        let _: IgnoredAny = self
            .client
            .dispatch(ApiRequest::studio(Method::DELETE, url))
            .await?;
        Ok(())
    }

    /// Start deploying a character.
    pub async fn deploy(&self, character: &str) -> Result<Operation> {
        require("character name", character)?;
        self.client.deployments().deploy(character).await
    }
}
