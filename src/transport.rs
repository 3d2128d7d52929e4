//! Transport primitives for document submissions.
//!
//! [`DocumentTransport`] is the throttle's only dependency on an HTTP stack. The
//! submitter hands it a fully built [`SerializedRequest`] once a permit is held and
//! expects a [`DocumentResponse`] (or the transport's own error) back. The default
//! [`ReqwestTransport`] ships behind the `reqwest` feature; tests and hosts with
//! their own client implement the trait directly.

// crates.io
use ::http::{HeaderValue, Method, Request, Response, header::CONTENT_TYPE};
// self
use crate::_prelude::*;
#[cfg(feature = "reqwest")] use crate::error::{ConfigError, TransportError};

/// Request handed to a [`DocumentTransport`]: method, URI, headers, and JSON body.
pub type SerializedRequest = Request<Vec<u8>>;
/// Response returned by a [`DocumentTransport`] with the body decoded as text.
pub type DocumentResponse = Response<String>;
/// Boxed future returned by [`DocumentTransport::send`].
pub type TransportFuture<'a, E> =
	Pin<Box<dyn Future<Output = Result<DocumentResponse, E>> + 'a + Send>>;

/// Abstraction over HTTP transports capable of posting registration requests.
///
/// Implementations must be `Send + Sync + 'static` so a single transport can be shared
/// by every caller of a submitter. The returned future must be `Send` so submissions
/// can hop executors. Dropping the future cancels the send; the submitter still
/// returns its permit in that case.
pub trait DocumentTransport
where
	Self: 'static + Send + Sync,
{
	/// Concrete error emitted by the underlying transport.
	type Error: 'static + Send + Sync + StdError;

	/// Performs the network exchange for `request`.
	fn send(&self, request: SerializedRequest) -> TransportFuture<'_, Self::Error>;
}
impl<T> DocumentTransport for Arc<T>
where
	T: ?Sized + DocumentTransport,
{
	type Error = T::Error;

	fn send(&self, request: SerializedRequest) -> TransportFuture<'_, Self::Error> {
		T::send(self, request)
	}
}

/// Builds the `POST` request for an already encoded JSON body.
pub fn build_request(endpoint: &Url, body: Vec<u8>) -> Result<SerializedRequest, ::http::Error> {
	Request::builder()
		.method(Method::POST)
		.uri(endpoint.as_str())
		.header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
		.body(body)
}

/// Thin wrapper around [`reqwest::Client`] so shared HTTP behavior lives in one place.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransport(pub reqwest::Client);
#[cfg(feature = "reqwest")]
impl ReqwestTransport {
	/// Wraps an existing reqwest client.
	pub fn with_client(client: reqwest::Client) -> Self {
		Self(client)
	}

	/// Builds a transport from a fresh client with default settings.
	pub fn try_new() -> Result<Self, ConfigError> {
		Ok(Self(reqwest::Client::builder().build()?))
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<reqwest::Client> for ReqwestTransport {
	fn as_ref(&self) -> &reqwest::Client {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl DocumentTransport for ReqwestTransport {
	type Error = TransportError;

	fn send(&self, request: SerializedRequest) -> TransportFuture<'_, Self::Error> {
		let client = self.0.clone();

		Box::pin(async move {
			let request = reqwest::Request::try_from(request)?;
			let response = client.execute(request).await?;
			let status = response.status();
			let headers = response.headers().to_owned();
			let version = response.version();
			let body = response.text().await?;
			let mut response_new = Response::new(body);

			*response_new.status_mut() = status;
			*response_new.headers_mut() = headers;
			*response_new.version_mut() = version;

			Ok(response_new)
		})
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn build_request_posts_json() {
		let endpoint = Url::parse("https://registry.test/api/v3/lk/documents/create")
			.expect("Failed to parse test endpoint.");
		let request =
			build_request(&endpoint, b"{}".to_vec()).expect("Request should build for HTTPS URL.");

		assert_eq!(request.method(), Method::POST);
		assert_eq!(request.uri(), "https://registry.test/api/v3/lk/documents/create");
		assert_eq!(
			request.headers().get(CONTENT_TYPE).map(HeaderValue::as_bytes),
			Some(&b"application/json"[..])
		);
		assert_eq!(request.body(), b"{}");
	}
}
