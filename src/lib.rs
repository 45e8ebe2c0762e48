//! Async Meilisearch task client: wait on enqueued tasks with cancellable polling, manage the
//! task queue, and mint scoped tenant tokens locally.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod obs;
pub mod task;
#[cfg(any(test, feature = "test"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// std
	use std::collections::VecDeque;
	// crates.io
	pub use parking_lot::Mutex;
	// self
	use crate::{
		client::Client,
		config::ClientConfig,
		error::ApiError,
		http::{ApiRequest, Transport, TransportFuture},
	};

	/// In-memory [`Transport`] replaying canned replies in order.
	///
	/// Once the queue drains, the optional fallback body is returned for every further call;
	/// without one the transport answers `404 Not Found`. Every request is recorded.
	#[derive(Clone, Debug, Default)]
	pub struct ScriptedTransport {
		script: Arc<Mutex<Script>>,
	}
	impl ScriptedTransport {
		/// Creates a transport replaying `replies` in order.
		pub fn new<I>(replies: I) -> Self
		where
			I: IntoIterator<Item = Result<Vec<u8>>>,
		{
			let transport = Self::default();

			transport.script.lock().queue.extend(replies);

			transport
		}

		/// Creates a transport answering every call with `body`.
		pub fn repeating(body: impl Into<String>) -> Self {
			let transport = Self::default();

			transport.script.lock().fallback = Some(body.into());

			transport
		}

		/// Creates a transport replaying the given JSON bodies in order.
		pub fn bodies<I, S>(bodies: I) -> Self
		where
			I: IntoIterator<Item = S>,
			S: Into<String>,
		{
			Self::new(bodies.into_iter().map(|body| Ok(body.into().into_bytes())))
		}

		/// Queues one more reply.
		pub fn push(&self, reply: Result<Vec<u8>>) {
			self.script.lock().queue.push_back(reply);
		}

		/// Returns how many requests were executed.
		pub fn calls(&self) -> usize {
			self.script.lock().requests.len()
		}

		/// Returns a copy of every executed request.
		pub fn requests(&self) -> Vec<ApiRequest> {
			self.script.lock().requests.clone()
		}
	}
	impl Transport for ScriptedTransport {
		fn execute(&self, request: ApiRequest) -> TransportFuture<'_, Vec<u8>> {
			let reply = {
				let mut script = self.script.lock();

				script.requests.push(request);

				match (script.queue.pop_front(), script.fallback.as_ref()) {
					(Some(reply), _) => reply,
					(None, Some(body)) => Ok(body.clone().into_bytes()),
					(None, None) => Err(ApiError::from_status(404, Some("Not Found")).into()),
				}
			};

			Box::pin(async move { reply })
		}
	}

	#[derive(Debug, Default)]
	struct Script {
		queue: VecDeque<Result<Vec<u8>>>,
		fallback: Option<String>,
		requests: Vec<ApiRequest>,
	}

	/// Renders a minimal task body with the given uid and status.
	pub fn task_json(uid: u64, status: &str) -> String {
		serde_json::json!({
			"uid": uid,
			"indexUid": "movies",
			"status": status,
			"type": "documentAdditionOrUpdate",
			"enqueuedAt": "2024-05-01T10:00:00Z",
		})
		.to_string()
	}

	/// Configuration pointing at a local server with the API key `masterKey0123456`.
	pub fn test_config(host: &str) -> ClientConfig {
		let host = Url::parse(host).expect("Failed to parse test host URL.");

		ClientConfig::builder(host)
			.api_key("masterKey0123456")
			.build()
			.expect("Failed to build test client configuration.")
	}

	/// Builds a client over a [`ScriptedTransport`].
	pub fn scripted_client(transport: ScriptedTransport) -> Client<ScriptedTransport> {
		Client::with_transport(test_config("http://localhost:7700"), transport)
	}

	/// Builds a reqwest-backed client pointing at `host`, typically an `httpmock` server.
	#[cfg(feature = "reqwest")]
	pub fn reqwest_test_client(host: &str) -> crate::client::ReqwestSearchClient {
		Client::new(test_config(host)).expect("Failed to build reqwest test client.")
	}
}

mod _prelude {
	pub use std::{
		collections::BTreeMap,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
		time::Duration,
	};

	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::OffsetDateTime;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use tokio_util::sync::CancellationToken;
pub use url;
#[cfg(test)] use httpmock as _;
