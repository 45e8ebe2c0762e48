//! Transport primitives for talking to the search server.
//!
//! The module exposes [`Transport`], the client's only dependency on an HTTP stack, alongside
//! the [`ApiRequest`] value every endpoint helper builds. Implementations return the body of a
//! successful response and classify everything else: a response with a non-success status
//! becomes an [`ApiError`], while a request that never produced a usable response becomes a
//! [`TransportError`]. [`error_for_status`] applies that classification so custom transports
//! map statuses the same way [`ReqwestTransport`] does.

// crates.io
#[cfg(feature = "reqwest")]
use reqwest::{
	Method,
	header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue},
};
// self
use crate::{
	_prelude::*,
	error::{ApiError, ConfigError, TransportError},
};
#[cfg(feature = "reqwest")] use crate::config::ClientConfig;

/// Boxed future returned by [`Transport`] implementations.
pub type TransportFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + 'a + Send>>;

/// Abstraction over HTTP stacks able to execute search-server requests.
///
/// Implementations own their base URL and default headers (API key, client identification)
/// and must be `Send + Sync + 'static` so a single transport can back many concurrent waits.
pub trait Transport
where
	Self: 'static + Send + Sync,
{
	/// Executes `request` and returns the raw body of a 2xx response.
	fn execute(&self, request: ApiRequest) -> TransportFuture<'_, Vec<u8>>;
}

/// HTTP methods used by the search-server API.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HttpMethod {
	/// `GET`.
	Get,
	/// `POST`.
	Post,
	/// `PUT`.
	Put,
	/// `PATCH`.
	Patch,
	/// `DELETE`.
	Delete,
}
impl HttpMethod {
	/// Returns the canonical method name.
	pub const fn as_str(self) -> &'static str {
		match self {
			HttpMethod::Get => "GET",
			HttpMethod::Post => "POST",
			HttpMethod::Put => "PUT",
			HttpMethod::Patch => "PATCH",
			HttpMethod::Delete => "DELETE",
		}
	}
}
impl Display for HttpMethod {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Transport-agnostic description of one API call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiRequest {
	/// HTTP method.
	pub method: HttpMethod,
	/// Endpoint path relative to the configured host, without a leading slash.
	pub path: String,
	/// Query pairs appended in order.
	pub query: Vec<(String, String)>,
	/// JSON body, already serialized.
	pub body: Option<Vec<u8>>,
}
impl ApiRequest {
	/// Creates a request without query or body.
	pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
		Self { method, path: path.into(), query: Vec::new(), body: None }
	}

	/// Shorthand for a `GET` request.
	pub fn get(path: impl Into<String>) -> Self {
		Self::new(HttpMethod::Get, path)
	}

	/// Appends query pairs.
	pub fn with_query<I>(mut self, pairs: I) -> Self
	where
		I: IntoIterator<Item = (String, String)>,
	{
		self.query.extend(pairs);

		self
	}

	/// Serializes `body` as the JSON payload.
	pub fn with_json<B>(mut self, body: &B) -> Result<Self, ConfigError>
	where
		B: ?Sized + Serialize,
	{
		self.body = Some(serde_json::to_vec(body)?);

		Ok(self)
	}

	/// Resolves the absolute URL of the request against `host`.
	pub fn url(&self, host: &Url) -> Result<Url, ConfigError> {
		let mut url = host
			.join(self.path.trim_start_matches('/'))
			.map_err(|source| ConfigError::InvalidEndpoint { path: self.path.clone(), source })?;

		if !self.query.is_empty() {
			url.query_pairs_mut().extend_pairs(self.query.iter());
		}

		Ok(url)
	}
}

/// Classifies a finished HTTP exchange.
///
/// 2xx passes the body through, 502 is a communication failure, and any other status becomes
/// an [`ApiError`] built from the body (or the reason phrase when the body is empty).
pub fn error_for_status(status: u16, reason: Option<&str>, body: Vec<u8>) -> Result<Vec<u8>> {
	match status {
		200..=299 => Ok(body),
		502 => Err(TransportError::Unavailable { status }.into()),
		_ => Err(ApiError::from_body(status, reason, &body).into()),
	}
}

/// [`Transport`] backed by a shared [`ReqwestClient`].
///
/// Redirects are followed according to the wrapped client's policy; default headers are fixed
/// at construction from the [`ClientConfig`].
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug)]
pub struct ReqwestTransport {
	client: ReqwestClient,
	host: Url,
	headers: HeaderMap,
}
#[cfg(feature = "reqwest")]
impl ReqwestTransport {
	/// Builds a transport with a fresh reqwest client.
	pub fn new(config: &ClientConfig) -> Result<Self, ConfigError> {
		let client = ReqwestClient::builder().build()?;

		Self::with_client(client, config)
	}

	/// Wraps an existing reqwest client.
	pub fn with_client(client: ReqwestClient, config: &ClientConfig) -> Result<Self, ConfigError> {
		let mut headers = HeaderMap::new();
		let client_header = HeaderValue::from_str(&config.client_header())
			.map_err(|_| ConfigError::InvalidHeader { header: "X-Meilisearch-Client" })?;

		headers.insert("X-Meilisearch-Client", client_header);

		if let Some(key) = config.api_key.as_ref() {
			let mut value = HeaderValue::from_str(&key.bearer())
				.map_err(|_| ConfigError::InvalidHeader { header: "Authorization" })?;

			value.set_sensitive(true);
			headers.insert(AUTHORIZATION, value);
		}

		Ok(Self { client, host: config.host.clone(), headers })
	}

	/// Returns the wrapped reqwest client.
	pub fn client(&self) -> &ReqwestClient {
		&self.client
	}
}
#[cfg(feature = "reqwest")]
impl Transport for ReqwestTransport {
	fn execute(&self, request: ApiRequest) -> TransportFuture<'_, Vec<u8>> {
		Box::pin(async move {
			let url = request.url(&self.host)?;
			let method = match request.method {
				HttpMethod::Get => Method::GET,
				HttpMethod::Post => Method::POST,
				HttpMethod::Put => Method::PUT,
				HttpMethod::Patch => Method::PATCH,
				HttpMethod::Delete => Method::DELETE,
			};
			let mut builder = self.client.request(method, url).headers(self.headers.clone());

			if let Some(body) = request.body {
				builder = builder.header(CONTENT_TYPE, "application/json").body(body);
			}

			let response = builder.send().await.map_err(TransportError::from)?;
			let status = response.status();
			let body = response.bytes().await.map_err(TransportError::from)?;

			error_for_status(status.as_u16(), status.canonical_reason(), body.to_vec())
		})
	}
}
