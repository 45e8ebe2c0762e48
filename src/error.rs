//! Client-level error types shared across the transport, the task poller, and the token signer.

// self
use crate::{_prelude::*, auth::TenantTokenError, config::ClientConfigError, task::TaskUid};

/// Client-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical client error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// The server answered with a non-success status.
	#[error(transparent)]
	Api(#[from] ApiError),
	/// No usable response reached the client (DNS, TCP, TLS, gateway).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Local configuration or request-construction problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Tenant token inputs failed validation or signing.
	#[error(transparent)]
	TenantToken(#[from] TenantTokenError),
	/// Response body did not match the expected JSON shape.
	#[error("Server response could not be decoded at `{}`.", .source.path())]
	Decode {
		/// Structured parsing failure including the JSON path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},

	/// The task stayed enqueued or processing past the wait deadline.
	#[error("Task {task_uid} is still pending after {}ms.", .timeout.as_millis())]
	Timeout {
		/// Identifier of the task being awaited.
		task_uid: TaskUid,
		/// Timeout that elapsed.
		timeout: Duration,
	},
	/// The caller cancelled the wait before the task concluded.
	#[error("Waiting for task {task_uid} was cancelled.")]
	Canceled {
		/// Identifier of the task being awaited.
		task_uid: TaskUid,
	},
}

/// Structured error returned by the search server.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
#[error("Meilisearch API error ({status}): {message}")]
pub struct ApiError {
	/// HTTP status code of the response.
	pub status: u16,
	/// Human-readable message from the body, or the status reason when the body is empty.
	pub message: String,
	/// Machine-readable error code (e.g. `task_not_found`).
	pub code: Option<String>,
	/// Error category (e.g. `invalid_request`).
	pub error_type: Option<String>,
	/// Documentation link for the error code.
	pub link: Option<String>,
}
impl ApiError {
	/// Builds an error for a response that carried no body.
	pub fn from_status(status: u16, reason: Option<&str>) -> Self {
		Self {
			status,
			message: reason.unwrap_or("Unknown status").to_owned(),
			code: None,
			error_type: None,
			link: None,
		}
	}

	/// Builds an error from a raw error body, falling back to the raw text when the body is not
	/// the server's JSON error shape.
	pub fn from_body(status: u16, reason: Option<&str>, body: &[u8]) -> Self {
		#[derive(Deserialize)]
		struct Body {
			message: String,
			code: Option<String>,
			#[serde(rename = "type")]
			error_type: Option<String>,
			link: Option<String>,
		}

		if body.iter().all(u8::is_ascii_whitespace) {
			return Self::from_status(status, reason);
		}

		match serde_json::from_slice::<Body>(body) {
			Ok(Body { message, code, error_type, link }) =>
				Self { status, message, code, error_type, link },
			Err(_) => Self {
				status,
				message: String::from_utf8_lossy(body).trim().to_owned(),
				code: None,
				error_type: None,
				link: None,
			},
		}
	}
}

/// Configuration and request-construction failures raised by the client.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Client settings failed validation.
	#[error(transparent)]
	Client(#[from] ClientConfigError),
	/// Endpoint path could not be joined onto the base URL.
	#[error("Endpoint `{path}` cannot be joined onto the base URL.")]
	InvalidEndpoint {
		/// Relative endpoint path.
		path: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Header value contains characters HTTP does not allow.
	#[error("The {header} header value is invalid.")]
	InvalidHeader {
		/// Header name.
		header: &'static str,
	},
	/// Timestamp filter cannot be rendered as RFC 3339.
	#[error("The {field} filter cannot be formatted as RFC 3339.")]
	QueryDate {
		/// Query parameter name.
		field: &'static str,
		/// Underlying formatting failure.
		#[source]
		source: time::error::Format,
	},
	/// Request body could not be serialized.
	#[error("Request body could not be serialized.")]
	RequestBody(#[from] serde_json::Error),
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}
impl From<ClientConfigError> for Error {
	fn from(e: ClientConfigError) -> Self {
		Self::Config(e.into())
	}
}

/// Transport-level failures: no response, or an unavailable gateway.
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the search server.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Upstream gateway could not reach the search server.
	#[error("Search server is unavailable (HTTP {status}).")]
	Unavailable {
		/// HTTP status code returned by the gateway.
		status: u16,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}
