//! Throttle-level error types shared across configuration, submission, and transports.

// std
use std::{io::ErrorKind, time::Duration};
// self
use crate::{_prelude::*, config::ThrottleConfigError};

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS, I/O) or interruption while sending.
	#[error("failed to create document: {0}")]
	Transport(#[from] TransportError),

	/// Document or signature was missing.
	#[error("payload and signature must not be empty")]
	InvalidInput,
	/// No permit became available before the acquire timeout elapsed.
	#[error("permit acquisition timed out")]
	ThrottleTimeout {
		/// Timeout that elapsed.
		timeout: Duration,
	},
	/// The payload could not be encoded as JSON.
	#[error("document could not be serialized at `{path}`")]
	Serialization {
		/// Path to the field that failed to serialize.
		path: String,
		/// Underlying encoder failure.
		#[source]
		source: serde_json::Error,
	},
}
impl Error {
	/// Returns true when a submit call failed before a permit was consumed or any network
	/// call was issued.
	///
	/// Request-building failures surface as [`Error::Config`] after the permit is held, so
	/// configuration errors are never reported as pre-send rejections.
	pub fn is_rejected_before_send(&self) -> bool {
		matches!(self, Self::InvalidInput | Self::ThrottleTimeout { .. })
	}
}
impl From<serde_path_to_error::Error<serde_json::Error>> for Error {
	fn from(e: serde_path_to_error::Error<serde_json::Error>) -> Self {
		let path = e.path().to_string();

		Self::Serialization { path, source: e.into_inner() }
	}
}

/// Configuration and construction failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// HTTP request construction failed.
	#[error(transparent)]
	HttpRequest(#[from] ::http::Error),
	/// Throttle settings failed validation.
	#[error(transparent)]
	Throttle(#[from] ThrottleConfigError),

	/// The window scheduler must be spawned from within a tokio runtime.
	#[error("No tokio runtime is available to drive the window scheduler.")]
	MissingRuntime,
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<reqwest::Error> for ConfigError {
	fn from(e: reqwest::Error) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures (network, IO, interruption).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("network error: {source}")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error: {0}")]
	Io(#[from] std::io::Error),
	/// The send was interrupted before a response arrived.
	#[error("send interrupted: {source}")]
	Interrupted {
		/// Interruption cause reported by the transport.
		#[source]
		source: BoxError,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}

	/// Classifies an arbitrary transport error.
	///
	/// Values that already are a [`TransportError`] pass through unchanged. An
	/// [`std::io::Error`] of kind [`ErrorKind::Interrupted`] anywhere in the source chain
	/// marks the send as interrupted; a bare [`std::io::Error`] maps to [`TransportError::Io`];
	/// everything else is a network failure.
	pub fn classify(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		let boxed: BoxError = Box::new(src);
		let boxed = match boxed.downcast::<TransportError>() {
			Ok(classified) => return *classified,
			Err(other) => other,
		};

		if is_interrupted(boxed.as_ref()) {
			return Self::Interrupted { source: boxed };
		}

		match boxed.downcast::<std::io::Error>() {
			Ok(io) => Self::Io(*io),
			Err(source) => Self::Network { source },
		}
	}

	/// Returns true when the send was interrupted.
	pub fn is_interrupted(&self) -> bool {
		matches!(self, Self::Interrupted { .. })
	}
}
#[cfg(feature = "reqwest")]
impl From<reqwest::Error> for TransportError {
	fn from(e: reqwest::Error) -> Self {
		Self::classify(e)
	}
}

fn is_interrupted(err: &(dyn std::error::Error + 'static)) -> bool {
	let mut current = Some(err);

	while let Some(e) = current {
		if e.downcast_ref::<std::io::Error>().is_some_and(|io| io.kind() == ErrorKind::Interrupted)
		{
			return true;
		}

		current = e.source();
	}

	false
}
