//! Throttle configuration: window cadence, permit capacity, acquire timeout, and endpoint.
//!
//! Values are validated once by [`ThrottleConfigBuilder::build`] (or on deserialization)
//! so the submitter and scheduler can rely on a positive capacity, a non-zero timeout,
//! and an HTTPS endpoint.

/// Builder API for assembling throttle configs.
pub mod builder;

pub use builder::*;

// std
use std::time::Duration;
// self
use crate::_prelude::*;

/// Registration endpoint used when no override is configured.
pub const DEFAULT_ENDPOINT: &str = "https://ismp.crpt.ru/api/v3/lk/documents/create";
/// Acquire timeout applied when no override is configured.
pub const DEFAULT_ACQUIRE_TIMEOUT: Duration = Duration::from_secs(1);

/// Time unit that defines one replenishment window.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowUnit {
	/// One millisecond.
	Millisecond,
	#[default]
	/// One second.
	Second,
	/// One minute.
	Minute,
	/// One hour.
	Hour,
	/// One day.
	Day,
}
impl WindowUnit {
	/// Returns the length of one window.
	pub const fn as_duration(self) -> Duration {
		match self {
			WindowUnit::Millisecond => Duration::from_millis(1),
			WindowUnit::Second => Duration::from_secs(1),
			WindowUnit::Minute => Duration::from_secs(60),
			WindowUnit::Hour => Duration::from_secs(60 * 60),
			WindowUnit::Day => Duration::from_secs(24 * 60 * 60),
		}
	}

	/// Returns a stable label suitable for span or log fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			WindowUnit::Millisecond => "millisecond",
			WindowUnit::Second => "second",
			WindowUnit::Minute => "minute",
			WindowUnit::Hour => "hour",
			WindowUnit::Day => "day",
		}
	}
}
impl Display for WindowUnit {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Immutable throttle settings consumed by the submitter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ThrottleConfigBuilder", into = "ThrottleConfigBuilder")]
pub struct ThrottleConfig {
	/// Length of one replenishment window.
	pub window_unit: WindowUnit,
	/// Maximum number of sends per window.
	pub request_limit: u32,
	/// Longest time a caller waits for a permit.
	pub acquire_timeout: Duration,
	/// Registration endpoint every submission is posted to.
	pub endpoint: Url,
}
impl ThrottleConfig {
	/// Creates a new builder for the provided window + limit pair.
	pub fn builder(window_unit: WindowUnit, request_limit: u32) -> ThrottleConfigBuilder {
		ThrottleConfigBuilder::new(window_unit, request_limit)
	}

	/// Validates `window_unit` + `request_limit` with every other setting left at its default.
	pub fn new(window_unit: WindowUnit, request_limit: u32) -> Result<Self, ThrottleConfigError> {
		Self::builder(window_unit, request_limit).build()
	}

	/// Returns the replenishment cadence.
	pub fn window(&self) -> Duration {
		self.window_unit.as_duration()
	}
}
impl From<ThrottleConfig> for ThrottleConfigBuilder {
	fn from(config: ThrottleConfig) -> Self {
		let allow_insecure_endpoint = config.endpoint.scheme() == "http";

		Self {
			window_unit: config.window_unit,
			request_limit: config.request_limit,
			acquire_timeout: Some(config.acquire_timeout),
			endpoint: Some(config.endpoint),
			allow_insecure_endpoint,
		}
	}
}
impl TryFrom<ThrottleConfigBuilder> for ThrottleConfig {
	type Error = ThrottleConfigError;

	fn try_from(builder: ThrottleConfigBuilder) -> Result<Self, Self::Error> {
		builder.build()
	}
}
