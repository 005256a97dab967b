//! Policy-level error types shared by the serializer, transport, and authorizer.
//!
//! None of these escape [`ProxyPolicy::is_allowed_proxy_callback_url`]; they surface only
//! through [`ProxyCallbackAuthorizer::verify`] for callers that want the diagnostic.
//!
//! [`ProxyPolicy::is_allowed_proxy_callback_url`]: crate::authorizer::ProxyPolicy::is_allowed_proxy_callback_url
//! [`ProxyCallbackAuthorizer::verify`]: crate::authorizer::ProxyCallbackAuthorizer::verify

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Service descriptor could not be serialized.
	#[error(transparent)]
	Serialize(#[from] SerializeError),
	/// Transport failure (DNS, TCP, TLS, timeout, malformed response).
	#[error(transparent)]
	Transport(#[from] TransportError),
}

/// Configuration and request construction failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// Verification endpoint is empty or unset.
	#[error("Verification endpoint is not configured.")]
	MissingEndpoint,
	/// Verification endpoint is not an absolute URL.
	#[error("Verification endpoint `{endpoint}` is invalid.")]
	InvalidEndpoint {
		/// Configured endpoint string.
		endpoint: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// A configured header name or value cannot be sent.
	#[error("Header `{name}` cannot be sent.")]
	InvalidHeader {
		/// Offending header name.
		name: String,
		/// Transport-specific validation failure.
		#[source]
		source: BoxError,
	},
	/// Two configured header names differ only by case.
	#[error("Header `{name}` is configured more than once.")]
	DuplicateHeader {
		/// Second spelling of the header name.
		name: String,
	},
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Policy document could not be parsed.
	#[error("Verification policy document is malformed.")]
	PolicyParse(#[from] serde_path_to_error::Error<serde_json::Error>),
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}

	/// Wraps a header validation failure inside [`ConfigError`].
	pub fn invalid_header(
		name: impl Into<String>,
		src: impl 'static + Send + Sync + std::error::Error,
	) -> Self {
		Self::InvalidHeader { name: name.into(), source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Descriptor serialization failures.
#[derive(Debug, ThisError)]
pub enum SerializeError {
	/// The JSON engine rejected the descriptor.
	#[error("Service descriptor cannot be represented as JSON.")]
	Json(#[from] serde_json::Error),
	/// A custom serializer failed.
	#[error("Service descriptor serialization failed.")]
	Other {
		/// Serializer-specific failure.
		#[source]
		source: BoxError,
	},
}
impl SerializeError {
	/// Wraps a custom serializer failure.
	pub fn other(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Other { source: Box::new(src) }
	}
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the verification endpoint.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Verification endpoint did not answer in time.
	#[error("Verification endpoint timed out.")]
	Timeout {
		/// Transport-specific timeout error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the verification endpoint.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}

	/// Wraps a transport-specific timeout error.
	pub fn timeout(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Timeout { source: Box::new(src) }
	}

	/// Returns `true` when the failure was a timeout.
	pub fn is_timeout(&self) -> bool {
		matches!(self, Self::Timeout { .. })
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		if e.is_timeout() { Self::timeout(e) } else { Self::network(e) }
	}
}
