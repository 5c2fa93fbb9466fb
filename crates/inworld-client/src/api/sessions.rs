//! Simple session API.
//!
//! These calls use the simple API credential. Calls made within a session
//! carry its id in a metadata header rather than in the body.

use reqwest::Method;

use super::require;
use crate::client::{ApiRequest, InworldClient};
use crate::error::Result;
use crate::types::{
    Interaction, OpenSessionRequest, SendTextRequest, SendTriggerRequest, Session,
    SimpleSendTextRequest,
};

/// Simple session API client.
pub struct SessionsApi {
    client: InworldClient,
}

impl SessionsApi {
    pub(crate) fn new(client: InworldClient) -> Self {
        Self { client }
    }

    /// Send text to a character without opening a session first.
    ///
    /// Pass `session_id` from a previous reply to continue that conversation.
    pub async fn simple_send_text(&self, request: &SimpleSendTextRequest) -> Result<Interaction> {
        require("character", &request.character)?;
        require("text", &request.text)?;

        let url = self
            .client
            .simple_url(&format!("{}:simpleSendText", request.character))?;
        let call = ApiRequest::simple(Method::POST, url)
            .session_id(Some(request.session_id.as_str()))
            .json(request)?;
        self.client.dispatch(call).await
    }

    /// Open a session for a scene or a character.
    pub async fn open_session(&self, request: &OpenSessionRequest) -> Result<Session> {
        require("name", &request.name)?;

        let url = self
            .client
            .simple_url(&format!("{}:openSession", request.name))?;
        let call = ApiRequest::simple(Method::POST, url).json(request)?;
        self.client.dispatch(call).await
    }

    /// Send text to a character within an open session.
    pub async fn send_text(&self, request: &SendTextRequest) -> Result<Interaction> {
        require("session id", &request.session_id)?;
        require("session character", &request.session_character)?;
        require("text", &request.text)?;

        let url = self
            .client
            .simple_url(&format!("{}:sendText", request.session_character))?;
        let call = ApiRequest::simple(Method::POST, url)
            .session_id(Some(request.session_id.as_str()))
            .json(request)?;
        self.client.dispatch(call).await
    }

    /// Send a trigger to a character within an open session.
    pub async fn send_trigger(&self, request: &SendTriggerRequest) -> Result<Interaction> {
        require("session id", &request.session_id)?;
        require("session character", &request.session_character)?;
        require("trigger", &request.trigger_event.trigger)?;
        for parameter in &request.trigger_event.parameters {
            require("parameter name", &parameter.name)?;
            require("parameter value", &parameter.value)?;
        }

        let url = self
            .client
            .simple_url(&format!("{}:sendTrigger", request.session_character))?;
        let call = ApiRequest::simple(Method::POST, url)
            .session_id(Some(request.session_id.as_str()))
            .json(request)?;
        self.client.dispatch(call).await
    }
}
