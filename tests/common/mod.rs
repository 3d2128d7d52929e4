//! Shared fixtures for integration tests: an in-process transport and document samples.

#![allow(dead_code)]

// std
use std::{
	io::{Error as IoError, ErrorKind},
	sync::{
		Arc,
		atomic::{AtomicUsize, Ordering},
	},
	time::Duration,
};
// crates.io
use crpt_throttle::{
	config::{ThrottleConfig, WindowUnit},
	document::{Document, Product},
	http::{Response, header::CONTENT_TYPE},
	submit::Submitter,
	transport::{DocumentTransport, SerializedRequest, TransportFuture},
	url::Url,
};
use parking_lot::Mutex;
use tokio::time::Instant;

pub const TEST_ENDPOINT: &str = "https://registry.test/api/v3/lk/documents/create";

/// Scripted behavior for [`FakeTransport`].
#[derive(Clone, Debug)]
pub enum FakeBehavior {
	Respond { status: u16, body: String },
	Fail(ErrorKind),
}

/// Snapshot of a request observed by [`FakeTransport`].
#[derive(Clone, Debug)]
pub struct RecordedRequest {
	pub method: String,
	pub uri: String,
	pub content_type: Option<String>,
	pub body: Vec<u8>,
	pub started_at: Instant,
}
impl RecordedRequest {
	fn capture(request: &SerializedRequest) -> Self {
		Self {
			method: request.method().to_string(),
			uri: request.uri().to_string(),
			content_type: request
				.headers()
				.get(CONTENT_TYPE)
				.and_then(|value| value.to_str().ok())
				.map(ToOwned::to_owned),
			body: request.body().clone(),
			started_at: Instant::now(),
		}
	}

	pub fn json(&self) -> serde_json::Value {
		serde_json::from_slice(&self.body).expect("Recorded request body should be JSON.")
	}
}

/// In-process transport that records every request and tracks in-flight sends.
#[derive(Debug)]
pub struct FakeTransport {
	behavior: FakeBehavior,
	delay: Duration,
	calls: AtomicUsize,
	in_flight: AtomicUsize,
	peak_in_flight: AtomicUsize,
	requests: Mutex<Vec<RecordedRequest>>,
}
impl FakeTransport {
	pub fn respond(status: u16, body: impl Into<String>) -> Self {
		Self::with_behavior(FakeBehavior::Respond { status, body: body.into() })
	}

	pub fn failing(kind: ErrorKind) -> Self {
		Self::with_behavior(FakeBehavior::Fail(kind))
	}

	fn with_behavior(behavior: FakeBehavior) -> Self {
		Self {
			behavior,
			delay: Duration::ZERO,
			calls: AtomicUsize::new(0),
			in_flight: AtomicUsize::new(0),
			peak_in_flight: AtomicUsize::new(0),
			requests: Mutex::new(Vec::new()),
		}
	}

	pub fn with_delay(mut self, delay: Duration) -> Self {
		self.delay = delay;

		self
	}

	pub fn calls(&self) -> usize {
		self.calls.load(Ordering::SeqCst)
	}

	pub fn peak_in_flight(&self) -> usize {
		self.peak_in_flight.load(Ordering::SeqCst)
	}

	pub fn requests(&self) -> Vec<RecordedRequest> {
		self.requests.lock().clone()
	}

	/// Number of sends that started in `[from, to)`.
	pub fn starts_between(&self, from: Instant, to: Instant) -> usize {
		self.requests
			.lock()
			.iter()
			.filter(|request| request.started_at >= from && request.started_at < to)
			.count()
	}
}
impl DocumentTransport for FakeTransport {
	type Error = IoError;

	fn send(&self, request: SerializedRequest) -> TransportFuture<'_, Self::Error> {
		Box::pin(async move {
			self.calls.fetch_add(1, Ordering::SeqCst);

			let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;

			self.peak_in_flight.fetch_max(now, Ordering::SeqCst);
			self.requests.lock().push(RecordedRequest::capture(&request));

			if !self.delay.is_zero() {
				tokio::time::sleep(self.delay).await;
			}

			self.in_flight.fetch_sub(1, Ordering::SeqCst);

			match &self.behavior {
				FakeBehavior::Respond { status, body } => Ok(Response::builder()
					.status(*status)
					.body(body.clone())
					.expect("Fake response should build.")),
				FakeBehavior::Fail(kind) =>
					Err(IoError::new(*kind, format!("fake transport failure: {kind}"))),
			}
		})
	}
}

/// Config with the given limit and a one second window, pointing at a test host.
pub fn test_config(request_limit: u32) -> ThrottleConfig {
	ThrottleConfig::builder(WindowUnit::Second, request_limit)
		.endpoint(Url::parse(TEST_ENDPOINT).expect("Test endpoint should parse."))
		.build()
		.expect("Test throttle config should be valid.")
}

/// Builds a submitter over `transport` with `request_limit` permits per second.
pub fn fake_submitter(
	request_limit: u32,
	transport: &Arc<FakeTransport>,
) -> Submitter<FakeTransport> {
	Submitter::with_transport(test_config(request_limit), Arc::clone(transport))
		.expect("Submitter over a fake transport should build.")
}

/// Minimal document fixture with a single product.
pub fn sample_document() -> Document {
	Document {
		participant_inn: "7700000000".into(),
		doc_id: "doc-1".into(),
		doc_status: "NEW".into(),
		doc_type: "LP_INTRODUCE_GOODS".into(),
		import_request: true,
		owner_inn: "7700000001".into(),
		producer_inn: "7700000002".into(),
		production_date: "2020-01-23".into(),
		production_type: "OWN_PRODUCTION".into(),
		products: vec![Product {
			certificate_document: "CONFORMITY_CERTIFICATE".into(),
			certificate_document_date: "2020-01-23".into(),
			certificate_document_number: "cert-1".into(),
			owner_inn: "7700000001".into(),
			producer_inn: "7700000002".into(),
			production_date: "2020-01-23".into(),
			tnved_code: "6401100000".into(),
			uit_code: "uit-1".into(),
			uitu_code: "uitu-1".into(),
		}],
		reg_date: "2020-01-23".into(),
		reg_number: "001".into(),
	}
}
