//! Throttled document submission.
//!
//! [`Submitter::submit`] validates its inputs, waits (bounded by the configured acquire
//! timeout) for a permit from the shared [`Throttle`], encodes `{document, signature}`
//! as JSON, posts it through the injected [`DocumentTransport`], and returns an
//! [`Outcome`]. The permit is held in a [`PermitGuard`](crate::throttle::PermitGuard)
//! for the duration of the send so it is returned exactly once on every exit path,
//! including cancellation of the submit future.

mod metrics;

pub use metrics::*;

// std
use std::marker::PhantomData;
// self
use crate::{
	_prelude::*,
	config::ThrottleConfig,
	document::{Document, DocumentRequest},
	error::{ConfigError, TransportError},
	obs::{self, SubmitOutcome, SubmitSpan},
	outcome::Outcome,
	throttle::{PermitPool, Throttle},
	transport::{self, DocumentResponse, DocumentTransport},
};
#[cfg(feature = "reqwest")] use crate::transport::ReqwestTransport;

#[cfg(feature = "reqwest")]
/// Submitter specialized for the crate's default reqwest transport.
pub type ReqwestSubmitter<D = Document> = Submitter<ReqwestTransport, D>;

/// Sends signed documents to the registration endpoint, at most `request_limit` per window.
///
/// A submitter owns its throttle; clone the surrounding `Arc` to share one budget across
/// tasks. Dropping the last handle stops replenishment.
pub struct Submitter<C, D = Document>
where
	C: ?Sized + DocumentTransport,
	D: ?Sized + Serialize,
{
	transport: Arc<C>,
	throttle: Throttle,
	config: ThrottleConfig,
	metrics: Arc<SubmitMetrics>,
	_document: PhantomData<fn(&D)>,
}
impl<C, D> Submitter<C, D>
where
	C: ?Sized + DocumentTransport,
	D: ?Sized + Serialize,
{
	/// Creates a submitter over `transport` with a fresh permit pool sized by the config.
	///
	/// Must be called from within a tokio runtime; the window scheduler is spawned on it.
	pub fn with_transport(config: ThrottleConfig, transport: impl Into<Arc<C>>) -> Result<Self> {
		let throttle = Throttle::from_config(&config)?;

		Ok(Self::assemble(config, transport.into(), throttle))
	}

	/// Creates a submitter over caller-provided transport and pool implementations.
	///
	/// The pool's own capacity is authoritative; `config.request_limit` is not consulted.
	pub fn with_parts(
		config: ThrottleConfig,
		transport: impl Into<Arc<C>>,
		pool: Arc<dyn PermitPool>,
	) -> Result<Self> {
		let throttle = Throttle::start(pool, config.window())?;

		Ok(Self::assemble(config, transport.into(), throttle))
	}

	fn assemble(config: ThrottleConfig, transport: Arc<C>, throttle: Throttle) -> Self {
		Self {
			transport,
			throttle,
			config,
			metrics: Default::default(),
			_document: PhantomData,
		}
	}

	/// Submits `document` with its detached `signature`.
	///
	/// Absent inputs (including an empty signature) fail fast without touching the
	/// throttle. A timed-out acquisition fails without any network call.
	pub async fn submit(
		&self,
		document: Option<&D>,
		signature: Option<&str>,
	) -> Outcome<DocumentResponse> {
		self.try_submit(document, signature).await.into()
	}

	/// Same as [`Submitter::submit`] but returns a plain [`Result`].
	pub async fn try_submit(
		&self,
		document: Option<&D>,
		signature: Option<&str>,
	) -> Result<DocumentResponse> {
		let span = SubmitSpan::new(&self.config.endpoint, "submit");

		self.record(SubmitOutcome::Attempt);

		let result = span.instrument(self.send_throttled(document, signature)).await;

		self.record(SubmitOutcome::of(&result));

		result
	}

	async fn send_throttled(
		&self,
		document: Option<&D>,
		signature: Option<&str>,
	) -> Result<DocumentResponse> {
		let (Some(document), Some(signature)) =
			(document, signature.filter(|value| !value.is_empty()))
		else {
			return Err(Error::InvalidInput);
		};
		let timeout = self.config.acquire_timeout;
		let Some(_permit) = self.throttle.acquire(timeout).await else {
			#[cfg(feature = "tracing")]
			tracing::warn!(
				timeout_ms = timeout.as_millis() as u64,
				"Timed out waiting for a submission permit."
			);

			return Err(Error::ThrottleTimeout { timeout });
		};
		let body = DocumentRequest::new(document, signature).to_json()?;
		let request =
			transport::build_request(&self.config.endpoint, body).map_err(ConfigError::from)?;
		let response = self.transport.send(request).await.map_err(|e| {
			let e = TransportError::classify(e);

			#[cfg(feature = "tracing")]
			tracing::error!(error = %e, interrupted = e.is_interrupted(), "Failed to create document.");

			Error::from(e)
		})?;

		#[cfg(feature = "tracing")]
		tracing::debug!(status = response.status().as_u16(), "Document submitted.");

		Ok(response)
	}

	fn record(&self, outcome: SubmitOutcome) {
		self.metrics.record(outcome);
		obs::record_submit_outcome(outcome);
	}

	/// Settings this submitter was built with.
	pub fn config(&self) -> &ThrottleConfig {
		&self.config
	}

	/// Shared throttle (pool + scheduler).
	pub fn throttle(&self) -> &Throttle {
		&self.throttle
	}

	/// Injected transport.
	pub fn transport(&self) -> &Arc<C> {
		&self.transport
	}

	/// Submission counters.
	pub fn metrics(&self) -> &Arc<SubmitMetrics> {
		&self.metrics
	}

	/// Stops permit replenishment. In-flight sends keep their permits.
	pub async fn shutdown(&self) {
		self.throttle.shutdown().await;
	}
}
#[cfg(feature = "reqwest")]
impl<D> Submitter<ReqwestTransport, D>
where
	D: ?Sized + Serialize,
{
	/// Creates a submitter backed by a default reqwest client.
	///
	/// Must be called from within a tokio runtime; the window scheduler is spawned on it.
	pub fn new(config: ThrottleConfig) -> Result<Self> {
		let transport = ReqwestTransport::try_new()?;

		Self::with_transport(config, transport)
	}
}
impl<C, D> Debug for Submitter<C, D>
where
	C: ?Sized + DocumentTransport,
	D: ?Sized + Serialize,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Submitter")
			.field("config", &self.config)
			.field("throttle", &self.throttle)
			.field("metrics", &self.metrics)
			.finish()
	}
}
