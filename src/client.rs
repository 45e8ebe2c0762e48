//! Search-server client binding a [`ClientConfig`] to a [`Transport`].

mod tasks;
mod wait;

pub use wait::*;

// crates.io
use serde::de::DeserializeOwned;
// self
use crate::{
	_prelude::*,
	auth::{self, TenantTokenRules},
	config::ClientConfig,
	http::{ApiRequest, Transport},
	obs::{self, OperationKind, OperationOutcome, OperationSpan},
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestTransport;

#[cfg(feature = "reqwest")]
/// Client specialized for the crate's default reqwest transport.
pub type ReqwestSearchClient = Client<ReqwestTransport>;

/// Entry point for task management, task waits, and tenant-token generation.
///
/// The client is cheap to clone; clones share the transport. It holds no mutable state, so
/// concurrent calls (including concurrent waits on the same task) are independent.
pub struct Client<T>
where
	T: ?Sized + Transport,
{
	/// Transport used for every outbound request.
	pub transport: Arc<T>,
	/// Settings shared by every request.
	pub config: ClientConfig,
}
impl<T> Client<T>
where
	T: ?Sized + Transport,
{
	/// Creates a client that reuses the caller-provided transport.
	pub fn with_transport(config: ClientConfig, transport: impl Into<Arc<T>>) -> Self {
		Self { transport: transport.into(), config }
	}

	/// Generates a tenant token signed with the configured API key.
	///
	/// See [`auth::generate_tenant_token`] for the validation order; a client without an API key
	/// fails with [`TenantTokenError::InvalidSigningSecret`](auth::TenantTokenError).
	pub fn generate_tenant_token(
		&self,
		api_key_uid: &str,
		rules: TenantTokenRules,
		expires_at: Option<OffsetDateTime>,
	) -> Result<String> {
		let api_key = self.config.api_key.as_ref().map(|key| key.expose()).unwrap_or_default();

		Self::sign(api_key_uid, rules, api_key, expires_at)
	}

	/// Generates a tenant token signed with an explicit API key instead of the configured one.
	pub fn generate_tenant_token_with_key(
		&self,
		api_key_uid: &str,
		rules: TenantTokenRules,
		api_key: &str,
		expires_at: Option<OffsetDateTime>,
	) -> Result<String> {
		Self::sign(api_key_uid, rules, api_key, expires_at)
	}

	fn sign(
		api_key_uid: &str,
		rules: TenantTokenRules,
		api_key: &str,
		expires_at: Option<OffsetDateTime>,
	) -> Result<String> {
		const KIND: OperationKind = OperationKind::GenerateTenantToken;

		let _span = OperationSpan::new(KIND, "generate_tenant_token").entered();

		obs::record_operation_outcome(KIND, OperationOutcome::Attempt);

		let result = auth::generate_tenant_token(api_key_uid, rules, api_key, expires_at)
			.map_err(Error::from);

		match &result {
			Ok(_) => obs::record_operation_outcome(KIND, OperationOutcome::Success),
			Err(_) => obs::record_operation_outcome(KIND, OperationOutcome::Failure),
		}

		result
	}

	/// Executes `request` and decodes the JSON response body.
	pub(crate) async fn send<R>(&self, request: ApiRequest) -> Result<R>
	where
		R: DeserializeOwned,
	{
		let body = self.transport.execute(request).await?;

		decode(&body)
	}
}
#[cfg(feature = "reqwest")]
impl Client<ReqwestTransport> {
	/// Creates a new client backed by its own reqwest transport.
	pub fn new(config: ClientConfig) -> Result<Self> {
		let transport = ReqwestTransport::new(&config)?;

		Ok(Self::with_transport(config, transport))
	}
}
impl<T> Clone for Client<T>
where
	T: ?Sized + Transport,
{
	fn clone(&self) -> Self {
		Self { transport: self.transport.clone(), config: self.config.clone() }
	}
}
impl<T> Debug for Client<T>
where
	T: ?Sized + Transport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Client")
			.field("host", &self.config.host.as_str())
			.field("api_key_set", &self.config.api_key.is_some())
			.finish()
	}
}

/// Decodes a JSON body, reporting the failing path on mismatch.
pub(crate) fn decode<R>(body: &[u8]) -> Result<R>
where
	R: DeserializeOwned,
{
	let mut deserializer = serde_json::Deserializer::from_slice(body);

	serde_path_to_error::deserialize(&mut deserializer).map_err(|source| Error::Decode { source })
}
