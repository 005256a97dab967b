//! Verification policy configuration consumed by the authorizer.

// self
use crate::{_prelude::*, error::ConfigError};

/// Remote verification settings: where to ask and which headers to send.
///
/// The value is immutable once handed to an authorizer. Equality covers both fields and
/// is independent of header insertion order because headers live in a [`BTreeMap`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct VerificationPolicy {
	/// URL of the remote verification authority; empty means every check is denied.
	#[serde(skip_serializing_if = "String::is_empty")]
	pub endpoint: String,
	/// Extra request headers, iterated in ascending key order.
	///
	/// HTTP header names are case-insensitive; names that differ only by case make every
	/// verification fail with [`ConfigError::DuplicateHeader`] before anything is sent.
	#[serde(skip_serializing_if = "BTreeMap::is_empty")]
	pub headers: BTreeMap<String, String>,
}
impl VerificationPolicy {
	/// Creates a policy targeting `endpoint` with no extra headers.
	pub fn new(endpoint: impl Into<String>) -> Self {
		Self { endpoint: endpoint.into(), headers: BTreeMap::new() }
	}

	/// Adds or replaces a request header.
	pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.headers.insert(name.into(), value.into());

		self
	}

	/// Replaces every configured header.
	pub fn with_headers<I, K, V>(mut self, headers: I) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: Into<String>,
	{
		self.headers = headers.into_iter().map(|(k, v)| (k.into(), v.into())).collect();

		self
	}

	/// Parses a policy from a JSON document such as
	/// `{"endpoint":"https://auth.example.org/verify","headers":{"X-Api-Key":"k"}}`.
	pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
		let mut de = serde_json::Deserializer::from_str(raw);

		Ok(serde_path_to_error::deserialize(&mut de)?)
	}

	/// Resolves the endpoint into an absolute URL.
	pub fn endpoint_url(&self) -> Result<Url, ConfigError> {
		let endpoint = self.endpoint.trim();

		if endpoint.is_empty() {
			return Err(ConfigError::MissingEndpoint);
		}

		Url::parse(endpoint)
			.map_err(|source| ConfigError::InvalidEndpoint { endpoint: endpoint.to_owned(), source })
	}
}
