// std
use std::time::Duration;
// self
use crate::{
	_prelude::*,
	config::{DEFAULT_ACQUIRE_TIMEOUT, DEFAULT_ENDPOINT, ThrottleConfig, WindowUnit},
};

/// Errors raised while constructing or validating throttle configs.
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum ThrottleConfigError {
	/// At least one request must be allowed per window.
	#[error("The request limit must be positive.")]
	ZeroRequestLimit,
	/// Waiting zero time for a permit would reject every contended call.
	#[error("The acquire timeout must be greater than zero.")]
	ZeroAcquireTimeout,
	/// Endpoints must use HTTPS.
	#[error("The registration endpoint must use HTTPS: {url}.")]
	InsecureEndpoint {
		/// Endpoint URL that failed validation.
		url: String,
	},
	/// The endpoint could not be parsed.
	#[error("The registration endpoint is not a valid URL: {url}.")]
	InvalidEndpoint {
		/// Raw endpoint value.
		url: String,
	},
}

/// Builder for [`ThrottleConfig`] values.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ThrottleConfigBuilder {
	/// Length of one replenishment window.
	pub window_unit: WindowUnit,
	/// Maximum number of sends per window.
	pub request_limit: u32,
	/// Optional acquire timeout (defaults to one second).
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub acquire_timeout: Option<Duration>,
	/// Optional endpoint override (defaults to the CRPT registration API).
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub endpoint: Option<Url>,
	/// Accepts plain HTTP endpoints; intended for local mocks only.
	#[serde(default)]
	pub allow_insecure_endpoint: bool,
}
impl ThrottleConfigBuilder {
	/// Creates a new builder seeded with the window + limit pair.
	pub fn new(window_unit: WindowUnit, request_limit: u32) -> Self {
		Self {
			window_unit,
			request_limit,
			acquire_timeout: None,
			endpoint: None,
			allow_insecure_endpoint: false,
		}
	}

	/// Overrides the acquire timeout.
	pub fn acquire_timeout(mut self, timeout: Duration) -> Self {
		self.acquire_timeout = Some(timeout);

		self
	}

	/// Overrides the registration endpoint.
	pub fn endpoint(mut self, url: Url) -> Self {
		self.endpoint = Some(url);

		self
	}

	/// Allows a plain HTTP endpoint, e.g. a local mock server.
	pub fn allow_insecure_endpoint(mut self) -> Self {
		self.allow_insecure_endpoint = true;

		self
	}

	/// Consumes the builder and validates the resulting config.
	pub fn build(self) -> Result<ThrottleConfig, ThrottleConfigError> {
		let endpoint = match self.endpoint {
			Some(url) => url,
			None => Url::parse(DEFAULT_ENDPOINT).map_err(|_| {
				ThrottleConfigError::InvalidEndpoint { url: DEFAULT_ENDPOINT.into() }
			})?,
		};
		let config = ThrottleConfig {
			window_unit: self.window_unit,
			request_limit: self.request_limit,
			acquire_timeout: self.acquire_timeout.unwrap_or(DEFAULT_ACQUIRE_TIMEOUT),
			endpoint,
		};

		config.validate(self.allow_insecure_endpoint)?;

		Ok(config)
	}
}

impl ThrottleConfig {
	/// Validates invariants for the config.
	fn validate(&self, allow_insecure_endpoint: bool) -> Result<(), ThrottleConfigError> {
		if self.request_limit == 0 {
			return Err(ThrottleConfigError::ZeroRequestLimit);
		}
		if self.acquire_timeout.is_zero() {
			return Err(ThrottleConfigError::ZeroAcquireTimeout);
		}

		validate_endpoint(&self.endpoint, allow_insecure_endpoint)
	}
}

fn validate_endpoint(url: &Url, allow_insecure: bool) -> Result<(), ThrottleConfigError> {
	match url.scheme() {
		"https" => Ok(()),
		"http" if allow_insecure => Ok(()),
		_ => Err(ThrottleConfigError::InsecureEndpoint { url: url.to_string() }),
	}
}
