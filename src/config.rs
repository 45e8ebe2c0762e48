//! Client configuration and its validating builder.

// self
use crate::{_prelude::*, auth::ApiKey, client::WaitOptions};

/// Value prefix of the `X-Meilisearch-Client` header.
pub const CLIENT_NAME: &str = concat!("Meilisearch Rust (v", env!("CARGO_PKG_VERSION"), ")");

/// Errors raised while constructing or validating a [`ClientConfig`].
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum ClientConfigError {
	/// Only `http` and `https` hosts are reachable.
	#[error("The host URL must use http or https: {url}.")]
	UnsupportedScheme {
		/// Host URL that failed validation.
		url: String,
	},
	/// The host URL carried a query string or fragment.
	#[error("The host URL must not carry a query or fragment: {url}.")]
	UnexpectedQuery {
		/// Host URL that failed validation.
		url: String,
	},
	/// A client agent was blank.
	#[error("Client agents must not be blank.")]
	EmptyClientAgent,
	/// Polling every zero milliseconds would spin.
	#[error("The task poll interval must be greater than zero.")]
	ZeroPollInterval,
}

/// Immutable settings shared by every request a [`Client`](crate::client::Client) issues.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
	/// Base URL of the server; always ends with `/`.
	pub host: Url,
	/// API key sent as a bearer token and used to sign tenant tokens.
	pub api_key: Option<ApiKey>,
	/// Extra identifiers appended to the `X-Meilisearch-Client` header.
	pub client_agents: Vec<String>,
	/// Default timeout and interval for task waits.
	pub wait: WaitOptions,
}
impl ClientConfig {
	/// Creates a new builder for the provided host.
	pub fn builder(host: Url) -> ClientConfigBuilder {
		ClientConfigBuilder::new(host)
	}

	/// Renders the `X-Meilisearch-Client` header value.
	pub fn client_header(&self) -> String {
		let mut value = CLIENT_NAME.to_owned();

		for agent in &self.client_agents {
			value.push_str(" ; ");
			value.push_str(agent);
		}

		value
	}
}

/// Builder for [`ClientConfig`] values.
#[derive(Debug)]
pub struct ClientConfigBuilder {
	/// Server base URL.
	pub host: Url,
	/// Optional API key.
	pub api_key: Option<ApiKey>,
	/// Extra client identifiers.
	pub client_agents: Vec<String>,
	/// Default wait settings.
	pub wait: WaitOptions,
}
impl ClientConfigBuilder {
	/// Creates a new builder seeded with the provided host.
	pub fn new(host: Url) -> Self {
		Self { host, api_key: None, client_agents: Vec::new(), wait: WaitOptions::default() }
	}

	/// Sets the API key.
	pub fn api_key(mut self, key: impl Into<ApiKey>) -> Self {
		self.api_key = Some(key.into());

		self
	}

	/// Appends a client agent to the identification header.
	pub fn client_agent(mut self, agent: impl Into<String>) -> Self {
		self.client_agents.push(agent.into());

		self
	}

	/// Overrides the default wait settings.
	pub fn wait_options(mut self, wait: WaitOptions) -> Self {
		self.wait = wait;

		self
	}

	/// Consumes the builder and validates the resulting configuration.
	pub fn build(self) -> Result<ClientConfig, ClientConfigError> {
		let config = ClientConfig {
			host: normalize_host(self.host)?,
			api_key: self.api_key,
			client_agents: self.client_agents,
			wait: self.wait,
		};

		config.validate()?;

		Ok(config)
	}
}

impl ClientConfig {
	fn validate(&self) -> Result<(), ClientConfigError> {
		if self.client_agents.iter().any(|agent| agent.trim().is_empty()) {
			return Err(ClientConfigError::EmptyClientAgent);
		}
		if self.wait.interval.is_zero() {
			return Err(ClientConfigError::ZeroPollInterval);
		}

		Ok(())
	}
}

fn normalize_host(mut host: Url) -> Result<Url, ClientConfigError> {
	if !matches!(host.scheme(), "http" | "https") || host.cannot_be_a_base() {
		return Err(ClientConfigError::UnsupportedScheme { url: host.to_string() });
	}
	if host.query().is_some() || host.fragment().is_some() {
		return Err(ClientConfigError::UnexpectedQuery { url: host.to_string() });
	}
	if !host.path().ends_with('/') {
		let path = format!("{}/", host.path());

		host.set_path(&path);
	}

	Ok(host)
}
