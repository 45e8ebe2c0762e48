//! Tenant tokens: HS256 JWTs that scope search to a rule-defined subset of indexes.
//!
//! Signing is local and deterministic. The token carries the parent key's uid
//! (`apiKeyUid`), the search rules as a JSON claim (`searchRules`), and an optional `exp`.
//! No `iat`/`nbf` claims are emitted, so identical inputs always produce identical tokens.
//! The server validates the signature with the parent key and enforces the rules; this module
//! performs no authorization check on them.

mod rules;

pub use rules::*;

// crates.io
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
// self
use crate::_prelude::*;

/// Minimum signing secret length in bytes (128 bits).
pub const MIN_SIGNING_SECRET_LEN: usize = 16;

/// Validation and signing failures raised while generating tenant tokens.
#[derive(Debug, ThisError)]
pub enum TenantTokenError {
	/// The parent key uid was empty.
	#[error("Cannot generate a tenant token without the uid of the signing API key.")]
	InvalidKeyIdentifier,
	/// The signing key is missing, too short, or not ASCII.
	#[error(
		"Cannot generate a tenant token without a valid API key; the key must be ASCII and at least 16 characters (128 bits)."
	)]
	InvalidSigningSecret,
	/// The requested expiry is not in the future.
	#[error("The tenant token expiry {expires_at} is not in the future.")]
	TokenAlreadyExpired {
		/// Rejected expiry instant.
		expires_at: OffsetDateTime,
	},
	/// The JWT library failed to encode the token.
	#[error("Tenant token could not be signed.")]
	Signing(#[source] jsonwebtoken::errors::Error),
	/// The token is not a three-part JWT with a JSON claims segment.
	#[error("Tenant token is malformed: {reason}.")]
	MalformedToken {
		/// Which part of the token failed to decode.
		reason: &'static str,
	},
}

/// Claims carried by a tenant token.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TenantTokenClaims {
	/// Uid of the API key whose secret signs the token.
	#[serde(rename = "apiKeyUid")]
	pub api_key_uid: String,
	/// Search rules, embedded as structured JSON.
	#[serde(rename = "searchRules")]
	pub search_rules: TenantTokenRules,
	/// Expiry as Unix seconds; absent for tokens that never expire.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub exp: Option<i64>,
}
impl TenantTokenClaims {
	/// Decodes the claims segment of `token` without verifying the signature.
	pub fn decode_unverified(token: &str) -> Result<Self, TenantTokenError> {
		let mut parts = token.split('.');
		let (Some(_header), Some(claims), Some(_signature), None) =
			(parts.next(), parts.next(), parts.next(), parts.next())
		else {
			return Err(TenantTokenError::MalformedToken { reason: "expected three segments" });
		};
		let raw = URL_SAFE_NO_PAD
			.decode(claims)
			.map_err(|_| TenantTokenError::MalformedToken { reason: "claims are not base64url" })?;

		serde_json::from_slice(&raw)
			.map_err(|_| TenantTokenError::MalformedToken { reason: "claims are not valid JSON" })
	}

	/// Returns the expiry instant, if any.
	pub fn expires_at(&self) -> Option<OffsetDateTime> {
		self.exp.and_then(|exp| OffsetDateTime::from_unix_timestamp(exp).ok())
	}
}

/// Generates a signed tenant token.
///
/// Checks, in order: `api_key_uid` is non-empty, `api_key` is ASCII and at least
/// [`MIN_SIGNING_SECRET_LEN`] bytes, and `expires_at` (when set) lies strictly in the future.
///
/// `exp` has second granularity; a sub-second `expires_at` is rounded up to the next whole
/// second so the token never expires before the requested instant.
pub fn generate_tenant_token(
	api_key_uid: &str,
	rules: TenantTokenRules,
	api_key: &str,
	expires_at: Option<OffsetDateTime>,
) -> Result<String, TenantTokenError> {
	generate_tenant_token_at(api_key_uid, rules, api_key, expires_at, OffsetDateTime::now_utc())
}

pub(crate) fn generate_tenant_token_at(
	api_key_uid: &str,
	rules: TenantTokenRules,
	api_key: &str,
	expires_at: Option<OffsetDateTime>,
	now: OffsetDateTime,
) -> Result<String, TenantTokenError> {
	if api_key_uid.is_empty() {
		return Err(TenantTokenError::InvalidKeyIdentifier);
	}
	if api_key.len() < MIN_SIGNING_SECRET_LEN || !api_key.is_ascii() {
		return Err(TenantTokenError::InvalidSigningSecret);
	}
	if let Some(expires_at) = expires_at.filter(|expires_at| *expires_at <= now) {
		return Err(TenantTokenError::TokenAlreadyExpired { expires_at });
	}

	let claims = TenantTokenClaims {
		api_key_uid: api_key_uid.to_owned(),
		search_rules: rules,
		exp: expires_at.map(expiry_seconds),
	};
	let key = EncodingKey::from_secret(api_key.as_bytes());

	jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &key)
		.map_err(TenantTokenError::Signing)
}

fn expiry_seconds(expires_at: OffsetDateTime) -> i64 {
	expires_at.unix_timestamp() + i64::from(expires_at.nanosecond() > 0)
}
