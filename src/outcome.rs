//! Tagged success/failure value returned by document submissions.

// self
use crate::_prelude::*;

/// Either the value produced by a call or the error that stopped it.
///
/// Exactly one side is populated and the value never changes after construction.
/// Convert to a [`Result`] with [`Outcome::into_result`] (or `?` through `From`) when
/// plain error propagation is more convenient.
#[derive(Debug)]
#[must_use]
pub enum Outcome<T> {
	/// The call completed.
	Success(T),
	/// The call failed; see [`Outcome::message`].
	Failure(Error),
}
impl<T> Outcome<T> {
	/// Wraps a successful value.
	pub fn success(value: T) -> Self {
		Self::Success(value)
	}

	/// Wraps a failure.
	pub fn failure(error: impl Into<Error>) -> Self {
		Self::Failure(error.into())
	}

	/// Returns true for [`Outcome::Success`].
	pub fn is_success(&self) -> bool {
		matches!(self, Self::Success(_))
	}

	/// Returns true for [`Outcome::Failure`].
	pub fn is_failure(&self) -> bool {
		!self.is_success()
	}

	/// Borrows the success value, if any.
	pub fn value(&self) -> Option<&T> {
		match self {
			Self::Success(value) => Some(value),
			Self::Failure(_) => None,
		}
	}

	/// Borrows the failure, if any.
	pub fn error(&self) -> Option<&Error> {
		match self {
			Self::Success(_) => None,
			Self::Failure(e) => Some(e),
		}
	}

	/// Human-readable failure message, if any.
	pub fn message(&self) -> Option<String> {
		self.error().map(ToString::to_string)
	}

	/// Maps the success value, leaving failures untouched.
	pub fn map<U, F>(self, f: F) -> Outcome<U>
	where
		F: FnOnce(T) -> U,
	{
		match self {
			Self::Success(value) => Outcome::Success(f(value)),
			Self::Failure(e) => Outcome::Failure(e),
		}
	}

	/// Converts into a [`Result`].
	pub fn into_result(self) -> Result<T> {
		self.into()
	}
}
impl<T> From<Result<T>> for Outcome<T> {
	fn from(result: Result<T>) -> Self {
		match result {
			Ok(value) => Self::Success(value),
			Err(e) => Self::Failure(e),
		}
	}
}
impl<T> From<Outcome<T>> for Result<T> {
	fn from(outcome: Outcome<T>) -> Self {
		match outcome {
			Outcome::Success(value) => Ok(value),
			Outcome::Failure(e) => Err(e),
		}
	}
}
