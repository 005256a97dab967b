//! Service descriptors and the serializer that packages them into verification requests.
//!
//! The authorizer never inspects a descriptor; it only asks a [`DescriptorSerializer`] for
//! a compact document. Descriptors are expected to omit fields that still hold their
//! default value, which [`RegisteredService`] does with one predicate per field.

// self
use crate::{_prelude::*, error::SerializeError};

/// Turns a service descriptor into the textual request body.
pub trait DescriptorSerializer
where
	Self: 'static + Send + Sync,
{
	/// Serializes `service` into a compact, deterministic document.
	fn serialize<S>(&self, service: &S) -> Result<String, SerializeError>
	where
		S: ?Sized + Serialize;
}

/// Single-line JSON without pretty-printing.
#[derive(Clone, Copy, Debug, Default)]
pub struct CompactJsonSerializer;
impl DescriptorSerializer for CompactJsonSerializer {
	fn serialize<S>(&self, service: &S) -> Result<String, SerializeError>
	where
		S: ?Sized + Serialize,
	{
		Ok(serde_json::to_string(service)?)
	}
}

/// Registered CAS service record describing the client application being proxied.
///
/// Only fields that differ from their default are serialized, so unset configuration
/// never reaches the verification authority.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RegisteredService {
	/// Numeric service identifier.
	#[serde(skip_serializing_if = "is_zero")]
	pub id: i64,
	/// Display name.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
	/// Pattern matched against the requesting service URL.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub service_id: Option<String>,
	/// Free-form description.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
	/// Ordering among registered services; lower runs first.
	#[serde(skip_serializing_if = "is_zero")]
	pub evaluation_order: i64,
	/// UI theme name.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub theme: Option<String>,
	/// Front-channel logout URL.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub logout_url: Option<Url>,
	/// Arbitrary service properties.
	#[serde(skip_serializing_if = "BTreeMap::is_empty")]
	pub properties: BTreeMap<String, String>,
}
impl RegisteredService {
	/// Creates a record with only the identifier set.
	pub fn new(id: i64) -> Self {
		Self { id, ..Default::default() }
	}

	/// Sets the display name.
	pub fn with_name(mut self, name: impl Into<String>) -> Self {
		self.name = Some(name.into());

		self
	}

	/// Sets the service URL pattern.
	pub fn with_service_id(mut self, service_id: impl Into<String>) -> Self {
		self.service_id = Some(service_id.into());

		self
	}

	/// Adds or replaces a property.
	pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.properties.insert(key.into(), value.into());

		self
	}
}

fn is_zero(value: &i64) -> bool {
	*value == 0
}
