//! Search rules carried in the `searchRules` claim.

// self
use crate::_prelude::*;

/// Search rules embedded in a tenant token.
///
/// Serialized untagged: a JSON array of index patterns, or a JSON object mapping each pattern
/// to a restriction object (or `null` for no restriction).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TenantTokenRules {
	/// Index patterns searchable without restriction, e.g. `["*"]`.
	Indexes(Vec<String>),
	/// Index patterns mapped to their restriction, e.g. `{"books": {"filter": "tag = Tale"}}`.
	Restricted(BTreeMap<String, Option<IndexRules>>),
}
impl TenantTokenRules {
	/// Builds rules granting unrestricted search on the provided index patterns.
	pub fn indexes<I, S>(patterns: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self::Indexes(patterns.into_iter().map(Into::into).collect())
	}

	/// Builds rules mapping index patterns to restrictions.
	pub fn restricted<I, S>(entries: I) -> Self
	where
		I: IntoIterator<Item = (S, Option<IndexRules>)>,
		S: Into<String>,
	{
		Self::Restricted(entries.into_iter().map(|(pattern, rules)| (pattern.into(), rules)).collect())
	}

	/// Returns the index patterns covered by the rules.
	pub fn patterns(&self) -> Vec<&str> {
		match self {
			Self::Indexes(patterns) => patterns.iter().map(String::as_str).collect(),
			Self::Restricted(map) => map.keys().map(String::as_str).collect(),
		}
	}
}

/// Restriction applied to one index pattern.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct IndexRules {
	/// Filter expression forced onto every search (string or nested array form).
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub filter: Option<serde_json::Value>,
	/// Additional search parameters understood by the server.
	#[serde(flatten)]
	pub extra: serde_json::Map<String, serde_json::Value>,
}
impl IndexRules {
	/// Restriction forcing `filter` onto every search.
	pub fn filter(filter: impl Into<serde_json::Value>) -> Self {
		Self { filter: Some(filter.into()), extra: Default::default() }
	}
}
