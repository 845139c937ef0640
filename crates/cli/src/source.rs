//! HTTP-backed collaborators for running the selector core from a terminal.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use expsel::protocol::{ListingPath, ListingResponse, WidgetConfig};
use expsel::{AuthProvider, Error, ExperimentSource};
use tracing::{debug, warn};
use url::Url;

use crate::error::CliError;

/// Listing service reached over HTTPS with a pre-issued bearer token.
#[derive(Debug, Clone)]
pub struct HttpExperimentSource {
	client: reqwest::Client,
	root: Url,
	token: String,
}

impl HttpExperimentSource {
	pub fn new(api_root: &str, token: impl Into<String>) -> Result<Self, CliError> {
		let root = Url::parse(api_root).map_err(|source| CliError::ApiRoot {
			root: api_root.to_string(),
			source,
		})?;
		Ok(Self {
			client: reqwest::Client::new(),
			root,
			token: token.into(),
		})
	}

	pub fn url_for(&self, path: &ListingPath) -> Result<Url, url::ParseError> {
		self.root.join(&path.to_string())
	}
}

#[async_trait(?Send)]
impl ExperimentSource for HttpExperimentSource {
	async fn list_experiments(&self, path: &ListingPath) -> expsel::Result<ListingResponse> {
		let url = self
			.url_for(path)
			.map_err(|err| Error::Transport(err.to_string()))?;
		debug!(%url, "requesting experiment listing");

		let response = self
			.client
			.get(url)
			.bearer_auth(&self.token)
			.send()
			.await
			.map_err(|err| Error::Transport(err.to_string()))?;
		let status = response.status();
		let body = response
			.text()
			.await
			.map_err(|err| Error::Transport(err.to_string()))?;
		debug!(status = status.as_u16(), bytes = body.len(), "listing response received");

		let parsed = serde_json::from_str::<ListingResponse>(&body);
		if status.is_success() {
			return Ok(parsed?);
		}

		// A failed status never yields a listing, even if the body parses as one.
		match parsed {
			Ok(failure @ ListingResponse::Failure { .. }) => Ok(failure),
			_ => Ok(ListingResponse::error(
				i64::from(status.as_u16()),
				status.canonical_reason().unwrap_or("request failed"),
			)),
		}
	}
}

/// Auth provider around a fixed bearer token.
///
/// A token is not an interactive session, so the provider never reports
/// itself signed in. An authorization failure therefore always reaches
/// `sign_in`, which records that the token was rejected.
#[derive(Debug, Default)]
pub struct StaticTokenAuth {
	rejected: AtomicBool,
}

impl StaticTokenAuth {
	pub fn was_rejected(&self) -> bool {
		self.rejected.load(Ordering::SeqCst)
	}
}

#[async_trait(?Send)]
impl AuthProvider for StaticTokenAuth {
	async fn initialize(&self, _config: &WidgetConfig) -> expsel::Result<()> {
		Ok(())
	}

	fn is_signed_in(&self) -> bool {
		false
	}

	fn sign_in(&self) {
		warn!("access token rejected; obtain a fresh token with the analytics.readonly scope");
		self.rejected.store(true, Ordering::SeqCst);
	}

	fn sign_out(&self) {
		debug!("static token has no session to end");
	}
}
