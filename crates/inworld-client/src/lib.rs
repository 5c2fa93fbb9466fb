//! HTTP client SDK for the Inworld conversational AI platform.
//!
//! The service exposes two API families with separate credentials:
//!
//! - **Studio**: workspace management of scenes, characters and common
//!   knowledge, including asynchronous deployment.
//! - **Simple**: sessions for talking to deployed characters.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//!
//! use inworld_client::{InworldClient, PollOptions, Result, SendTextRequest, OpenSessionRequest};
//!
//! # async fn example() -> Result<()> {
//! let client = InworldClient::builder()
//!     .studio_api_key("c3R1ZGlvOmtleQ==")
//!     .simple_api_key("c2ltcGxlOmtleQ==")
//!     .build()?;
//!
//! // Deploy a scene and wait for it to go live
//! let options = PollOptions::new(Duration::from_secs(2)).with_timeout(Duration::from_secs(120));
//! let done = client
//!     .deployments()
//!     .deploy_and_wait("workspaces/w/scenes/lobby", &options, None)
//!     .await?;
//! println!("deployed: {}", done.name);
//!
//! // Talk to the scene
//! let session = client
//!     .sessions()
//!     .open_session(&OpenSessionRequest {
//!         name: "workspaces/w/scenes/lobby".to_string(),
//!         ..Default::default()
//!     })
//!     .await?;
//! let reply = client
//!     .sessions()
//!     .send_text(&SendTextRequest {
//!         session_id: session.name.rsplit('/').next().unwrap_or_default().to_string(),
//!         session_character: session.session_characters[0].name.clone(),
//!         text: "Hello!".to_string(),
//!     })
//!     .await?;
//! println!("{}", reply.text_list.join(" "));
//! # Ok(())
//! # }
//! ```
//!
//! # Cancellation
//!
//! Attach a [`CallContext`] with [`InworldClient::with_context`] to abort
//! in-flight calls through a `CancellationToken` or to bound them by a
//! deadline.

pub mod api;
pub mod client;
pub mod config;
pub mod context;
pub mod error;
pub mod operation;
pub mod transport;
pub mod types;

pub use client::{ApiFamily, ApiRequest, ClientBuilder, InworldClient};
pub use config::{ClientConfig, ResolvedConfig, ResolvedSecret, SecretSource};
pub use context::CallContext;
pub use error::{ApiError, Code, Error, Result, TransportError, TransportErrorKind};
pub use operation::{
    DeploymentState, Operation, PollOptions, ProgressCallback, ProgressEvent, TypedAny,
};
pub use types::*;
