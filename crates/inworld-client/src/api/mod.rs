//! API endpoint implementations.

mod characters;
mod common_knowledge;
mod deployments;
mod scenes;
mod sessions;

pub use characters::CharactersApi;
pub use common_knowledge::CommonKnowledgeApi;
pub use deployments::DeploymentsApi;
pub use scenes::ScenesApi;
pub use sessions::SessionsApi;

use url::Url;

use crate::client::InworldClient;
use crate::error::{Error, Result};
use crate::types::PageRequest;

/// Reject an empty required value before any network activity.
pub(crate) fn require(field: &'static str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(Error::MissingField { field });
    }
    Ok(())
}

/// Studio URL of a workspace-scoped collection, e.g. `workspaces/{w}/scenes`.
///
/// The workspace id is escaped as a single path segment.
pub(crate) fn workspace_collection_url(
    client: &InworldClient,
    workspace_id: &str,
    collection: &str,
) -> Result<Url> {
    let mut url = client.studio_url("workspaces")?;
    url.path_segments_mut()
        .map_err(|_| Error::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
        .push(workspace_id)
        .push(collection);
    Ok(url)
}

/// Append list parameters in key order. Nothing is appended when every
/// parameter is unset.
pub(crate) fn apply_list_query(url: &mut Url, page: &PageRequest, view: Option<&str>) {
    let mut pairs: Vec<(&str, String)> = Vec::new();

    if let Some(filter) = page.filter.as_deref().filter(|f| !f.is_empty()) {
        pairs.push(("filter", filter.to_string()));
    }
    if let Some(size) = page.page_size.filter(|size| *size > 0) {
        pairs.push(("pageSize", size.to_string()));
    }
    if let Some(token) = page.page_token.as_deref().filter(|t| !t.is_empty()) {
        pairs.push(("pageToken", token.to_string()));
    }
    if let Some(view) = view {
        pairs.push(("view", view.to_string()));
    }

    if !pairs.is_empty() {
        url.query_pairs_mut().extend_pairs(pairs);
    }
}

/// Append `view` to a single-resource URL.
pub(crate) fn apply_view(url: &mut Url, view: Option<&str>) {
    if let Some(view) = view {
        url.query_pairs_mut().append_pair("view", view);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> InworldClient {
        InworldClient::builder()
            .base_url("http://localhost:8080")
            .build()
            .unwrap()
    }

    #[test]
    fn test_require() {
        assert!(require("scene id", "workspaces/w/scenes/s").is_ok());
        let err = require("scene id", "").unwrap_err();
        assert_eq!(err.to_string(), "scene id is required");
    }

    #[test]
    fn test_workspace_collection_url_escapes_workspace() {
        let url = workspace_collection_url(&client(), "w 1", "common-knowledge").unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8080/studio/v1/workspaces/w%201/common-knowledge"
        );
    }

    #[test]
    fn test_list_query_sorted_and_sparse() {
        let mut url = workspace_collection_url(&client(), "w", "characters").unwrap();
        apply_list_query(
            &mut url,
            &PageRequest {
                page_size: Some(10),
                page_token: Some("tok".to_string()),
                filter: Some("character.name=workspaces/w/characters/c".to_string()),
            },
            Some("CHARACTER_VIEW_WITH_SCENES"),
        );
        assert_eq!(
            url.query(),
            Some("filter=character.name%3Dworkspaces%2Fw%2Fcharacters%2Fc&pageSize=10&pageToken=tok&view=CHARACTER_VIEW_WITH_SCENES")
        );

        let mut url = workspace_collection_url(&client(), "w", "scenes").unwrap();
        apply_list_query(
            &mut url,
            &PageRequest {
                page_size: Some(0),
                ..Default::default()
            },
            None,
        );
        assert_eq!(url.query(), None);
        assert!(!url.as_str().ends_with('?'));
    }
}
