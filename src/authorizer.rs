//! Remote-verified proxy policy.
//!
//! [`ProxyCallbackAuthorizer`] forwards every candidate proxy-granting callback to an
//! external verification authority. The service descriptor travels as a compact JSON
//! body, the callback as the `pgtUrl` query parameter, and only a `2xx` answer allows
//! the callback. Every failure along the way is logged and treated as a denial.

// self
use crate::{
	_prelude::*,
	http::{ResponseGuard, VerificationHttpClient, VerificationRequest, VerificationResponse},
	obs::{self, DecisionOutcome, VerifySpan},
	policy::VerificationPolicy,
	service::{CompactJsonSerializer, DescriptorSerializer},
};
#[cfg(feature = "reqwest")] use crate::{error::ConfigError, http::ReqwestHttpClient};

/// Proxy policy contract consulted by the ticket-issuance workflow.
///
/// The two predicates are independent: [`is_allowed_to_proxy`](Self::is_allowed_to_proxy)
/// says whether the service may proxy at all, and
/// [`is_allowed_proxy_callback_url`](Self::is_allowed_proxy_callback_url) gates each
/// individual callback URL.
pub trait ProxyPolicy<S>
where
	S: ?Sized + Serialize,
{
	/// Returns whether the policy permits proxying in principle.
	fn is_allowed_to_proxy(&self) -> bool;

	/// Returns whether `callback` may receive a proxy-granting ticket for `service`.
	fn is_allowed_proxy_callback_url(&self, service: &S, callback: &Url) -> bool;
}

/// Answer received from the verification authority.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decision {
	/// The authority answered with a `2xx` status.
	Allow {
		/// Returned status code.
		status: u16,
	},
	/// The authority answered with any other status.
	Deny {
		/// Returned status code.
		status: u16,
	},
}
impl Decision {
	/// Classifies a status code.
	pub fn from_status(status: u16) -> Self {
		if (200..300).contains(&status) { Self::Allow { status } } else { Self::Deny { status } }
	}

	/// Returns `true` for [`Decision::Allow`].
	pub fn is_allowed(self) -> bool {
		matches!(self, Self::Allow { .. })
	}

	/// Returns the status code behind the decision.
	pub fn status(self) -> u16 {
		match self {
			Self::Allow { status } | Self::Deny { status } => status,
		}
	}
}

/// Delegates proxy callback approval to a remote HTTP authority.
///
/// The authorizer holds only read-only state, so a single instance can be shared across
/// threads. Each verification is one blocking round trip with no retry and no caching.
#[derive(Clone)]
pub struct ProxyCallbackAuthorizer<C, Z = CompactJsonSerializer>
where
	C: ?Sized + VerificationHttpClient,
	Z: DescriptorSerializer,
{
	/// Endpoint and headers used for every call.
	pub policy: VerificationPolicy,
	/// Transport shared by every call.
	pub http_client: Arc<C>,
	/// Descriptor serializer producing the request body.
	pub serializer: Z,
}
impl<C> ProxyCallbackAuthorizer<C>
where
	C: ?Sized + VerificationHttpClient,
{
	/// Creates an authorizer that reuses the caller-provided transport.
	pub fn with_http_client(policy: VerificationPolicy, http_client: impl Into<Arc<C>>) -> Self {
		Self { policy, http_client: http_client.into(), serializer: CompactJsonSerializer }
	}
}
impl<C, Z> ProxyCallbackAuthorizer<C, Z>
where
	C: ?Sized + VerificationHttpClient,
	Z: DescriptorSerializer,
{
	/// Replaces the descriptor serializer.
	pub fn with_serializer<Z2>(self, serializer: Z2) -> ProxyCallbackAuthorizer<C, Z2>
	where
		Z2: DescriptorSerializer,
	{
		ProxyCallbackAuthorizer { policy: self.policy, http_client: self.http_client, serializer }
	}

	/// Always `true`: this policy permits proxying and gates each callback URL instead.
	pub fn is_allowed_to_proxy(&self) -> bool {
		true
	}

	/// Asks the verification authority about `callback`, denying on any failure.
	pub fn is_allowed_proxy_callback_url<S>(&self, service: &S, callback: &Url) -> bool
	where
		S: ?Sized + Serialize,
	{
		match self.verify(service, callback) {
			Ok(decision) => decision.is_allowed(),
			Err(_) => false,
		}
	}

	/// Performs the verification call and reports what happened.
	///
	/// Failures are logged and recorded before being returned, so callers that only need
	/// the boolean answer can discard them.
	pub fn verify<S>(&self, service: &S, callback: &Url) -> Result<Decision>
	where
		S: ?Sized + Serialize,
	{
		let _span = VerifySpan::new(&self.policy.endpoint, callback).entered();
		let result = self.exchange(service, callback);

		match &result {
			Ok(decision) => {
				obs::log_status(decision.status(), decision.is_allowed());
				obs::record_decision(if decision.is_allowed() {
					DecisionOutcome::Allow
				} else {
					DecisionOutcome::Deny
				});
			},
			Err(e) => {
				obs::log_failure(e);
				obs::record_decision(DecisionOutcome::Error);
			},
		}

		result
	}

	fn exchange<S>(&self, service: &S, callback: &Url) -> Result<Decision>
	where
		S: ?Sized + Serialize,
	{
		let body = self.serializer.serialize(service)?;
		let request = VerificationRequest::new(&self.policy, callback, body)?;
		let response = ResponseGuard::new(self.http_client.execute(&request)?);

		Ok(Decision::from_status(response.status()))
	}
}
#[cfg(feature = "reqwest")]
impl ProxyCallbackAuthorizer<ReqwestHttpClient> {
	/// Creates an authorizer backed by a blocking reqwest client with the default timeout.
	pub fn new(policy: VerificationPolicy) -> Result<Self, ConfigError> {
		Ok(Self::with_http_client(policy, ReqwestHttpClient::new()?))
	}
}
impl<C, Z, S> ProxyPolicy<S> for ProxyCallbackAuthorizer<C, Z>
where
	C: ?Sized + VerificationHttpClient,
	Z: DescriptorSerializer,
	S: ?Sized + Serialize,
{
	fn is_allowed_to_proxy(&self) -> bool {
		Self::is_allowed_to_proxy(self)
	}

	fn is_allowed_proxy_callback_url(&self, service: &S, callback: &Url) -> bool {
		Self::is_allowed_proxy_callback_url(self, service, callback)
	}
}
impl<C, Z> Debug for ProxyCallbackAuthorizer<C, Z>
where
	C: ?Sized + VerificationHttpClient,
	Z: DescriptorSerializer,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ProxyCallbackAuthorizer")
			.field("endpoint", &self.policy.endpoint)
			.field("headers", &self.policy.headers.keys().collect::<Vec<_>>())
			.finish()
	}
}
