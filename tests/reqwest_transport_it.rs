#![cfg(feature = "reqwest")]

mod common;

// crates.io
use crpt_throttle::{
	config::{ThrottleConfig, WindowUnit},
	error::{Error, TransportError},
	outcome::Outcome,
	submit::ReqwestSubmitter,
	url::Url,
};
use httpmock::prelude::*;
use serde_json::json;
// self
use common::sample_document;

const CREATE_PATH: &str = "/api/v3/lk/documents/create";

fn build_config(endpoint: &str) -> ThrottleConfig {
	ThrottleConfig::builder(WindowUnit::Second, 2)
		.endpoint(Url::parse(endpoint).expect("Mock endpoint should parse."))
		.allow_insecure_endpoint()
		.build()
		.expect("Config for the mock server should be valid.")
}

#[tokio::test]
async fn reqwest_submitter_posts_json_envelope() {
	let server = MockServer::start_async().await;
	let document = sample_document();
	let expected = json!({
		"document": serde_json::to_value(&document).expect("Sample document should encode."),
		"signature": "detached-signature",
	});
	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path(CREATE_PATH)
				.header("content-type", "application/json")
				.json_body(expected);
			then.status(200).body("ok");
		})
		.await;
	let submitter = <ReqwestSubmitter>::new(build_config(&server.url(CREATE_PATH)))
		.expect("Reqwest submitter should build.");
	let response = submitter
		.try_submit(Some(&document), Some("detached-signature"))
		.await
		.expect("Submission to the mock server should succeed.");

	mock.assert_async().await;

	assert_eq!(response.status(), 200);
	assert_eq!(response.body(), "ok");
	assert_eq!(submitter.throttle().pool().available(), 2);
}

#[tokio::test]
async fn non_success_status_is_still_a_response() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path(CREATE_PATH);
			then.status(400).body("{\"error_message\":\"bad document\"}");
		})
		.await;
	let submitter = <ReqwestSubmitter>::new(build_config(&server.url(CREATE_PATH)))
		.expect("Reqwest submitter should build.");
	let outcome = submitter.submit(Some(&sample_document()), Some("sig")).await;

	mock.assert_async().await;

	match outcome {
		Outcome::Success(response) => {
			assert_eq!(response.status(), 400);
			assert!(response.body().contains("bad document"));
		},
		Outcome::Failure(e) => panic!("HTTP status codes should not become failures: {e}."),
	}
}

#[tokio::test]
async fn connection_failure_maps_to_transport_error() {
	let submitter = <ReqwestSubmitter>::new(build_config("http://127.0.0.1:1/unreachable"))
		.expect("Reqwest submitter should build.");
	let err = submitter
		.try_submit(Some(&sample_document()), Some("sig"))
		.await
		.expect_err("Connecting to a closed port should fail.");

	assert!(matches!(err, Error::Transport(TransportError::Network { .. })));
	assert!(err.to_string().starts_with("failed to create document: network error: "));
	assert_eq!(submitter.throttle().pool().available(), 2);
}
