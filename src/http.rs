//! Transport primitives for verification calls.
//!
//! The module exposes [`VerificationHttpClient`] and [`VerificationResponse`] so downstream
//! crates can plug in their own HTTP stack. The authorizer builds a transport-neutral
//! [`VerificationRequest`], hands it to the client, and wraps whatever comes back in a
//! [`ResponseGuard`] that releases the response exactly once on every exit path.

// std
use std::ops::Deref;
#[cfg(feature = "reqwest")] use std::time::Duration;
// crates.io
#[cfg(feature = "reqwest")]
use reqwest::{
	blocking::Response as BlockingResponse,
	header::{HeaderMap, HeaderName, HeaderValue},
};
// self
use crate::{_prelude::*, error::ConfigError, policy::VerificationPolicy};
#[cfg(feature = "reqwest")] use crate::error::TransportError;

/// Query parameter carrying the candidate callback URL.
pub const PGT_URL_PARAM: &str = "pgtUrl";
/// Content type sent unless a configured header overrides it.
pub const DEFAULT_CONTENT_TYPE: (&str, &str) = ("Content-Type", "application/json");

/// Fully resolved verification request.
///
/// The method is always `GET`. The serialized descriptor still travels as the body; some
/// transports and intermediaries drop bodies on `GET`, which this crate does not police.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerificationRequest {
	/// Endpoint URL with the `pgtUrl` query parameter appended.
	pub url: Url,
	/// Request headers in ascending key order.
	pub headers: BTreeMap<String, String>,
	/// Serialized service descriptor.
	pub body: String,
}
impl VerificationRequest {
	/// HTTP method used for every verification call.
	pub const METHOD: &'static str = "GET";

	/// Builds the request for `callback` against the policy's endpoint.
	///
	/// Configured headers win over the default content type, compared case-insensitively.
	/// Configured names that differ only by case are rejected.
	pub fn new(
		policy: &VerificationPolicy,
		callback: &Url,
		body: impl Into<String>,
	) -> Result<Self, ConfigError> {
		let mut url = policy.endpoint_url()?;

		url.query_pairs_mut().append_pair(PGT_URL_PARAM, callback.as_str());

		let mut headers = policy.headers.clone();
		let (content_type, json) = DEFAULT_CONTENT_TYPE;
		{
			let names = headers.keys().collect::<Vec<_>>();

			for (idx, name) in names.iter().enumerate() {
				if let Some(twin) =
					names[idx + 1..].iter().find(|other| other.eq_ignore_ascii_case(name))
				{
					return Err(ConfigError::DuplicateHeader { name: (*twin).to_owned() });
				}
			}
		}

		if !headers.keys().any(|name| name.eq_ignore_ascii_case(content_type)) {
			headers.insert(content_type.into(), json.into());
		}

		Ok(Self { url, headers, body: body.into() })
	}
}

/// Response handle produced by a [`VerificationHttpClient`].
pub trait VerificationResponse
where
	Self: Send,
{
	/// HTTP status code returned by the verification endpoint.
	fn status(&self) -> u16;

	/// Releases the underlying connection or buffer.
	///
	/// [`ResponseGuard`] calls this exactly once; implementations need not be idempotent.
	fn close(&mut self);
}

/// Blocking HTTP transport used by the authorizer.
///
/// Implementations must be `Send + Sync + 'static` so one client can be shared by every
/// thread that evaluates the policy. Each call performs a single request/response exchange
/// and blocks the calling thread until it completes or the transport gives up.
pub trait VerificationHttpClient
where
	Self: 'static + Send + Sync,
{
	/// Response handle returned on a completed exchange, whatever its status.
	type Response: VerificationResponse;

	/// Sends `request` and returns the response handle.
	fn execute(&self, request: &VerificationRequest) -> Result<Self::Response>;
}

/// Owns a response and closes it when dropped.
pub struct ResponseGuard<R>
where
	R: VerificationResponse,
{
	response: R,
}
impl<R> ResponseGuard<R>
where
	R: VerificationResponse,
{
	/// Takes ownership of `response`.
	pub fn new(response: R) -> Self {
		Self { response }
	}
}
impl<R> Deref for ResponseGuard<R>
where
	R: VerificationResponse,
{
	type Target = R;

	fn deref(&self) -> &Self::Target {
		&self.response
	}
}
impl<R> Drop for ResponseGuard<R>
where
	R: VerificationResponse,
{
	fn drop(&mut self) {
		self.response.close();
	}
}
impl<R> Debug for ResponseGuard<R>
where
	R: VerificationResponse,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ResponseGuard").field("status", &self.response.status()).finish()
	}
}

/// Thin wrapper around reqwest's blocking client.
///
/// Do not construct or drop it inside an async runtime; reqwest's blocking client owns its
/// own runtime and panics when nested.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug)]
pub struct ReqwestHttpClient(pub BlockingClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Total request timeout applied by [`ReqwestHttpClient::new`]; matches reqwest's
	/// blocking default.
	pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

	/// Builds a client with [`Self::DEFAULT_TIMEOUT`].
	pub fn new() -> Result<Self, ConfigError> {
		Self::with_timeout(Self::DEFAULT_TIMEOUT)
	}

	/// Builds a client whose whole exchange is bounded by `timeout`.
	pub fn with_timeout(timeout: Duration) -> Result<Self, ConfigError> {
		let client = BlockingClient::builder().timeout(timeout).build()?;

		Ok(Self(client))
	}

	/// Wraps an existing blocking client.
	pub fn with_client(client: BlockingClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<BlockingClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &BlockingClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl VerificationHttpClient for ReqwestHttpClient {
	type Response = ReqwestResponse;

	fn execute(&self, request: &VerificationRequest) -> Result<Self::Response> {
		let headers = header_map(&request.headers)?;
		let response = self
			.0
			.get(request.url.clone())
			.headers(headers)
			.body(request.body.clone())
			.send()
			.map_err(TransportError::from)?;

		Ok(ReqwestResponse::new(response))
	}
}

/// Response handle for [`ReqwestHttpClient`]; closing drops the connection.
#[cfg(feature = "reqwest")]
#[derive(Debug)]
pub struct ReqwestResponse {
	status: u16,
	inner: Option<BlockingResponse>,
}
#[cfg(feature = "reqwest")]
impl ReqwestResponse {
	fn new(response: BlockingResponse) -> Self {
		Self { status: response.status().as_u16(), inner: Some(response) }
	}
}
#[cfg(feature = "reqwest")]
impl VerificationResponse for ReqwestResponse {
	fn status(&self) -> u16 {
		self.status
	}

	fn close(&mut self) {
		drop(self.inner.take());
	}
}

#[cfg(feature = "reqwest")]
fn header_map(headers: &BTreeMap<String, String>) -> Result<HeaderMap, ConfigError> {
	let mut map = HeaderMap::with_capacity(headers.len());

	for (name, value) in headers {
		let header_name = HeaderName::from_bytes(name.as_bytes())
			.map_err(|e| ConfigError::invalid_header(name, e))?;
		let header_value =
			HeaderValue::from_str(value).map_err(|e| ConfigError::invalid_header(name, e))?;

		map.insert(header_name, header_value);
	}

	Ok(map)
}
