// std
use std::{
	collections::HashMap,
	sync::{
		Arc, Mutex,
		atomic::{AtomicUsize, Ordering},
	},
	thread,
};
// self
use cas_proxy_policy::{
	authorizer::{Decision, ProxyCallbackAuthorizer},
	error::{ConfigError, Error, Result, SerializeError, TransportError},
	http::{VerificationHttpClient, VerificationRequest, VerificationResponse},
	policy::VerificationPolicy,
	service::{DescriptorSerializer, RegisteredService},
	url::Url,
};

const ENDPOINT: &str = "https://auth.example.org/verify";

enum Reply {
	Status(u16),
	Refused,
}

struct FakeResponse {
	status: u16,
	closed: Arc<AtomicUsize>,
}
impl VerificationResponse for FakeResponse {
	fn status(&self) -> u16 {
		self.status
	}

	fn close(&mut self) {
		self.closed.fetch_add(1, Ordering::SeqCst);
	}
}

struct FakeHttpClient {
	reply: Reply,
	closed: Arc<AtomicUsize>,
	requests: Mutex<Vec<VerificationRequest>>,
}
impl FakeHttpClient {
	fn new(reply: Reply) -> Self {
		Self { reply, closed: Default::default(), requests: Default::default() }
	}

	fn closed(&self) -> usize {
		self.closed.load(Ordering::SeqCst)
	}

	fn requests(&self) -> Vec<VerificationRequest> {
		self.requests.lock().expect("Request log should not be poisoned.").clone()
	}
}
impl VerificationHttpClient for FakeHttpClient {
	type Response = FakeResponse;

	fn execute(&self, request: &VerificationRequest) -> Result<Self::Response> {
		self.requests.lock().expect("Request log should not be poisoned.").push(request.clone());

		match self.reply {
			Reply::Status(status) => Ok(FakeResponse { status, closed: self.closed.clone() }),
			Reply::Refused => Err(TransportError::from(std::io::Error::new(
				std::io::ErrorKind::ConnectionRefused,
				"connection refused",
			))
			.into()),
		}
	}
}

struct FailingSerializer;
impl DescriptorSerializer for FailingSerializer {
	fn serialize<S>(&self, _service: &S) -> Result<String, SerializeError>
	where
		S: ?Sized + serde::Serialize,
	{
		Err(SerializeError::other(std::fmt::Error))
	}
}

fn callback() -> Url {
	Url::parse("https://client.example.org/pgtCallback")
		.expect("Callback URL should parse successfully.")
}

fn fake_authorizer(
	policy: VerificationPolicy,
	reply: Reply,
) -> (ProxyCallbackAuthorizer<FakeHttpClient>, Arc<FakeHttpClient>) {
	let client = Arc::new(FakeHttpClient::new(reply));

	(ProxyCallbackAuthorizer::with_http_client(policy, client.clone()), client)
}

#[test]
fn request_carries_callback_descriptor_and_headers() {
	let policy = VerificationPolicy::new(ENDPOINT).with_headers([("Z", "1"), ("A", "2")]);
	let (authorizer, client) = fake_authorizer(policy, Reply::Status(200));

	assert!(authorizer.is_allowed_proxy_callback_url(&RegisteredService::new(42), &callback()));

	let requests = client.requests();

	assert_eq!(requests.len(), 1);
	assert_eq!(VerificationRequest::METHOD, "GET");
	assert_eq!(
		requests[0]
			.url
			.query_pairs()
			.map(|(key, value)| (key.into_owned(), value.into_owned()))
			.collect::<Vec<_>>(),
		[("pgtUrl".to_owned(), "https://client.example.org/pgtCallback".to_owned())]
	);
	assert_eq!(requests[0].body, "{\"id\":42}");
	assert_eq!(
		requests[0].headers.keys().map(String::as_str).collect::<Vec<_>>(),
		["A", "Content-Type", "Z"]
	);
}

#[test]
fn descriptor_body_omits_default_fields() {
	let (authorizer, client) =
		fake_authorizer(VerificationPolicy::new(ENDPOINT), Reply::Status(200));
	let service = RegisteredService::new(9).with_name("portal").with_property("tier", "gold");

	assert!(authorizer.is_allowed_proxy_callback_url(&service, &callback()));

	let requests = client.requests();

	assert_eq!(requests.len(), 1);
	assert_eq!(requests[0].body, "{\"id\":9,\"name\":\"portal\",\"properties\":{\"tier\":\"gold\"}}");
}

#[test]
fn response_is_released_once_on_allow_and_deny() {
	for (status, allowed) in [(200, true), (403, false), (500, false)] {
		let (authorizer, client) =
			fake_authorizer(VerificationPolicy::new(ENDPOINT), Reply::Status(status));

		assert_eq!(
			authorizer.is_allowed_proxy_callback_url(&RegisteredService::new(42), &callback()),
			allowed
		);
		assert_eq!(client.closed(), 1, "status {status} must release exactly once");
	}
}

#[test]
fn transport_failure_denies() {
	let (authorizer, client) = fake_authorizer(VerificationPolicy::new(ENDPOINT), Reply::Refused);

	assert!(!authorizer.is_allowed_proxy_callback_url(&RegisteredService::new(42), &callback()));
	assert!(matches!(
		authorizer.verify(&RegisteredService::new(42), &callback()),
		Err(Error::Transport(TransportError::Io(_)))
	));
	assert_eq!(client.closed(), 0);
}

#[test]
fn missing_endpoint_never_reaches_transport() {
	let (authorizer, client) = fake_authorizer(VerificationPolicy::default(), Reply::Status(200));

	assert!(!authorizer.is_allowed_proxy_callback_url(&RegisteredService::new(42), &callback()));
	assert!(matches!(
		authorizer.verify(&RegisteredService::new(42), &callback()),
		Err(Error::Config(ConfigError::MissingEndpoint))
	));
	assert!(client.requests().is_empty());
}

#[test]
fn case_only_duplicate_headers_deny_before_sending() {
	let policy = VerificationPolicy::new(ENDPOINT).with_header("X-Key", "1").with_header("x-key", "2");
	let (authorizer, client) = fake_authorizer(policy, Reply::Status(200));

	assert!(!authorizer.is_allowed_proxy_callback_url(&RegisteredService::new(42), &callback()));
	assert!(matches!(
		authorizer.verify(&RegisteredService::new(42), &callback()),
		Err(Error::Config(ConfigError::DuplicateHeader { .. }))
	));
	assert!(client.requests().is_empty());
}

#[test]
fn serialization_failure_denies() {
	let (authorizer, client) = fake_authorizer(VerificationPolicy::new(ENDPOINT), Reply::Status(200));
	let mut unrepresentable = HashMap::new();

	unrepresentable.insert((1, 2), "tuple keys are not JSON");

	assert!(!authorizer.is_allowed_proxy_callback_url(&unrepresentable, &callback()));

	let authorizer = authorizer.with_serializer(FailingSerializer);

	assert!(matches!(
		authorizer.verify(&RegisteredService::new(42), &callback()),
		Err(Error::Serialize(SerializeError::Other { .. }))
	));
	assert!(client.requests().is_empty());
}

#[test]
fn capability_flag_is_constant() {
	for policy in [
		VerificationPolicy::default(),
		VerificationPolicy::new(ENDPOINT).with_header("X-Api-Key", "k"),
	] {
		let (authorizer, client) = fake_authorizer(policy, Reply::Refused);

		assert!(authorizer.is_allowed_to_proxy());
		assert!(authorizer.is_allowed_to_proxy());
		assert!(client.requests().is_empty());
	}
}

#[test]
fn shared_authorizer_serves_concurrent_callers() {
	let (authorizer, client) = fake_authorizer(VerificationPolicy::new(ENDPOINT), Reply::Status(204));
	let authorizer = Arc::new(authorizer);
	let handles = (0..8)
		.map(|id| {
			let authorizer = authorizer.clone();

			thread::spawn(move || authorizer.verify(&RegisteredService::new(id), &callback()))
		})
		.collect::<Vec<_>>();

	for handle in handles {
		let decision = handle
			.join()
			.expect("Verification thread should not panic.")
			.expect("Verification should succeed.");

		assert_eq!(decision, Decision::Allow { status: 204 });
	}

	assert_eq!(client.requests().len(), 8);
	assert_eq!(client.closed(), 8);
}
