// crates.io
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use time::{Duration, OffsetDateTime};
// self
use meilisearch_tasks::{
	auth::{self, IndexRules, TenantTokenClaims, TenantTokenError, TenantTokenRules},
	client::Client,
	config::ClientConfig,
	error::Error,
	http::{ApiRequest, Transport, TransportFuture},
	url::Url,
};

const SECRET: &str = "0123456789ABCDEF";

/// Transport that must never be reached; signing is purely local.
struct Offline;
impl Transport for Offline {
	fn execute(&self, request: ApiRequest) -> TransportFuture<'_, Vec<u8>> {
		panic!("Tenant tokens must be generated without network access, got {request:?}.");
	}
}

fn client(api_key: Option<&str>) -> Client<Offline> {
	let mut builder = ClientConfig::builder(
		Url::parse("http://localhost:7700").expect("Test host should parse successfully."),
	);

	if let Some(api_key) = api_key {
		builder = builder.api_key(api_key);
	}

	Client::with_transport(builder.build().expect("Test configuration should build."), Offline)
}

fn verify(token: &str, secret: &str, validation: &Validation) -> serde_json::Value {
	jsonwebtoken::decode::<serde_json::Value>(
		token,
		&DecodingKey::from_secret(secret.as_bytes()),
		validation,
	)
	.expect("Token should verify with the signing key.")
	.claims
}

fn without_expiry() -> Validation {
	let mut validation = Validation::new(Algorithm::HS256);

	validation.required_spec_claims.clear();
	validation.validate_exp = false;

	validation
}

#[test]
fn non_expiring_token_verifies_with_parent_key() {
	let token = auth::generate_tenant_token("key-1", TenantTokenRules::indexes(["*"]), SECRET, None)
		.expect("Valid inputs should produce a token.");

	assert_eq!(token.split('.').count(), 3);
	assert_eq!(
		verify(&token, SECRET, &without_expiry()),
		serde_json::json!({"apiKeyUid": "key-1", "searchRules": ["*"]})
	);
	assert!(
		jsonwebtoken::decode::<serde_json::Value>(
			&token,
			&DecodingKey::from_secret(b"FEDCBA9876543210"),
			&without_expiry(),
		)
		.is_err()
	);
}

#[test]
fn generation_is_deterministic() {
	let rules = TenantTokenRules::restricted([
		("books", Some(IndexRules::filter("genre = fantasy"))),
		("movies", None),
	]);
	let first = auth::generate_tenant_token("key-1", rules.clone(), SECRET, None)
		.expect("First token should be generated.");
	let second = auth::generate_tenant_token("key-1", rules, SECRET, None)
		.expect("Second token should be generated.");

	assert_eq!(first, second);
}

#[test]
fn rules_and_expiry_are_structured_claims() {
	let expires_at = (OffsetDateTime::now_utc() + Duration::hours(1))
		.replace_nanosecond(0)
		.expect("Zero nanoseconds should be valid.");
	let rules = TenantTokenRules::restricted([
		("books", Some(IndexRules::filter(serde_json::json!([["genre = fantasy", "genre = horror"]])))),
		("*", None),
	]);
	let token = auth::generate_tenant_token("key-2", rules.clone(), SECRET, Some(expires_at))
		.expect("Future expiries should be accepted.");
	let claims =
		TenantTokenClaims::decode_unverified(&token).expect("Claims should decode without a key.");

	assert_eq!(claims.api_key_uid, "key-2");
	assert_eq!(claims.search_rules, rules);
	assert_eq!(claims.exp, Some(expires_at.unix_timestamp()));
	assert_eq!(
		claims.expires_at().map(OffsetDateTime::unix_timestamp),
		Some(expires_at.unix_timestamp())
	);

	let verified = verify(&token, SECRET, &Validation::new(Algorithm::HS256));

	assert_eq!(
		verified["searchRules"]["books"]["filter"],
		serde_json::json!([["genre = fantasy", "genre = horror"]])
	);
	assert_eq!(verified["searchRules"]["*"], serde_json::Value::Null);
}

#[test]
fn validation_failures_are_distinct() {
	let past = OffsetDateTime::now_utc() - Duration::minutes(1);

	assert!(matches!(
		auth::generate_tenant_token("", TenantTokenRules::indexes(["*"]), SECRET, None),
		Err(TenantTokenError::InvalidKeyIdentifier)
	));
	assert!(matches!(
		auth::generate_tenant_token("key-1", TenantTokenRules::indexes(["*"]), "", None),
		Err(TenantTokenError::InvalidSigningSecret)
	));
	assert!(matches!(
		auth::generate_tenant_token("key-1", TenantTokenRules::indexes(["*"]), "0123456789ABCDE", None),
		Err(TenantTokenError::InvalidSigningSecret)
	));
	assert!(matches!(
		auth::generate_tenant_token("key-1", TenantTokenRules::indexes(["*"]), SECRET, Some(past)),
		Err(TenantTokenError::TokenAlreadyExpired { expires_at }) if expires_at == past
	));
}

#[test]
fn client_signs_with_configured_key() {
	let token = client(Some(SECRET))
		.generate_tenant_token("key-3", TenantTokenRules::indexes(["books"]), None)
		.expect("Configured key should sign tokens.");

	assert_eq!(
		verify(&token, SECRET, &without_expiry()),
		serde_json::json!({"apiKeyUid": "key-3", "searchRules": ["books"]})
	);

	let explicit = client(None)
		.generate_tenant_token_with_key("key-3", TenantTokenRules::indexes(["books"]), SECRET, None)
		.expect("Explicit key should sign tokens.");

	assert_eq!(explicit, token);
}

#[test]
fn client_without_key_cannot_sign() {
	let err = client(None)
		.generate_tenant_token("key-3", TenantTokenRules::indexes(["*"]), None)
		.expect_err("A client without an API key has nothing to sign with.");

	assert!(matches!(err, Error::TenantToken(TenantTokenError::InvalidSigningSecret)));
}
