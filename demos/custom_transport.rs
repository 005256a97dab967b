//! Demonstrates plugging a non-reqwest transport into the authorizer.
//!
//! 1. Implement [`VerificationResponse`] for the transport's response handle; `close` runs
//!    exactly once per exchange.
//! 2. Implement [`VerificationHttpClient`] and map transport failures into the crate's
//!    [`Error`] type.
//! 3. Pass the client to [`ProxyCallbackAuthorizer::with_http_client`].

// std
use std::{
	collections::BTreeSet,
	sync::{
		Arc,
		atomic::{AtomicUsize, Ordering},
	},
};
// crates.io
use color_eyre::Result;
// self
use cas_proxy_policy::{
	authorizer::ProxyCallbackAuthorizer,
	error::{Error, TransportError},
	http::{PGT_URL_PARAM, VerificationHttpClient, VerificationRequest, VerificationResponse},
	policy::VerificationPolicy,
	service::RegisteredService,
	url::Url,
};

fn main() -> Result<()> {
	color_eyre::install()?;

	let client = AllowlistHttpClient::new(["https://client.example.org/pgtCallback"]);
	let authorizer: ProxyCallbackAuthorizer<AllowlistHttpClient> =
		ProxyCallbackAuthorizer::with_http_client(
			VerificationPolicy::new("memory://verify").with_header("X-Api-Key", "demo"),
			client,
		);
	let service = RegisteredService::new(42).with_name("portal");

	for candidate in [
		"https://client.example.org/pgtCallback",
		"https://attacker.example.net/pgtCallback",
		"https://offline.example.org/pgtCallback",
	] {
		let callback = Url::parse(candidate)?;

		match authorizer.verify(&service, &callback) {
			Ok(decision) => println!("{candidate}: {decision:?}."),
			Err(e) => println!("{candidate}: denied after failure: {e}."),
		}
	}

	println!("Responses released: {}.", authorizer.http_client.released.load(Ordering::SeqCst));

	Ok(())
}

/// Answers from an in-process allowlist instead of the network.
struct AllowlistHttpClient {
	allowed: BTreeSet<String>,
	released: Arc<AtomicUsize>,
}
impl AllowlistHttpClient {
	fn new<'a>(allowed: impl IntoIterator<Item = &'a str>) -> Self {
		Self {
			allowed: allowed.into_iter().map(str::to_owned).collect(),
			released: Default::default(),
		}
	}
}
impl VerificationHttpClient for AllowlistHttpClient {
	type Response = AllowlistResponse;

	fn execute(&self, request: &VerificationRequest) -> std::result::Result<Self::Response, Error> {
		let callback = request
			.url
			.query_pairs()
			.find(|(key, _)| key == PGT_URL_PARAM)
			.map(|(_, value)| value.into_owned())
			.unwrap_or_default();

		if callback.contains("offline") {
			return Err(TransportError::from(std::io::Error::new(
				std::io::ErrorKind::ConnectionRefused,
				"allowlist backend offline",
			))
			.into());
		}

		let status = if self.allowed.contains(&callback) { 200 } else { 403 };

		Ok(AllowlistResponse { status, released: self.released.clone() })
	}
}

/// Response handle that counts releases against the owning client.
struct AllowlistResponse {
	status: u16,
	released: Arc<AtomicUsize>,
}
impl VerificationResponse for AllowlistResponse {
	fn status(&self) -> u16 {
		self.status
	}

	fn close(&mut self) {
		self.released.fetch_add(1, Ordering::SeqCst);
	}
}
