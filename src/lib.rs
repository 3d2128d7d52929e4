//! Windowed request throttle for the CRPT document registration API: bound outbound
//! submissions to N per window, serialize signed documents, and hand back typed outcomes.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod config;
pub mod document;
pub mod error;
pub mod obs;
pub mod outcome;
pub mod submit;
pub mod throttle;
pub mod transport;

mod _prelude {
	pub use std::{
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
	};

	pub use parking_lot::Mutex;
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use http;
#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};
