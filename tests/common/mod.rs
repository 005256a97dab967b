//! Helpers shared by the reqwest-backed integration tests.

#![allow(dead_code)]

// std
use std::time::Duration;
// self
use cas_proxy_policy::{
	authorizer::ProxyCallbackAuthorizer, http::ReqwestHttpClient, policy::VerificationPolicy,
	reqwest::blocking::Client as BlockingClient,
};

/// Authorizer type alias used by reqwest-backed integration tests.
pub type ReqwestTestAuthorizer = ProxyCallbackAuthorizer<ReqwestHttpClient>;

/// Builds a blocking reqwest client that accepts the self-signed certificates produced by
/// `httpmock` during tests.
pub fn test_reqwest_http_client(timeout: Duration) -> ReqwestHttpClient {
	let client = BlockingClient::builder()
		.danger_accept_invalid_certs(true)
		.danger_accept_invalid_hostnames(true)
		.timeout(timeout)
		.build()
		.expect("Failed to build insecure Reqwest client for tests.");

	ReqwestHttpClient::with_client(client)
}

/// Constructs an authorizer for `policy` backed by the reqwest transport used across
/// integration tests.
pub fn build_reqwest_test_authorizer(policy: VerificationPolicy) -> ReqwestTestAuthorizer {
	ProxyCallbackAuthorizer::with_http_client(
		policy,
		test_reqwest_http_client(ReqwestHttpClient::DEFAULT_TIMEOUT),
	)
}
