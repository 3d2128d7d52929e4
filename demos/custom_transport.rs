//! Demonstrates plugging an in-process transport into the throttled submitter.
//!
//! 1. Implement [`DocumentTransport`] for a type that answers requests locally.
//! 2. Build a [`ThrottleConfig`] that allows two sends per second.
//! 3. Fire five concurrent submissions and print each [`Outcome`] as it completes.

// std
use std::{
	sync::{
		Arc,
		atomic::{AtomicUsize, Ordering},
	},
	time::{Duration, Instant},
};
// crates.io
use color_eyre::Result;
// self
use crpt_throttle::{
	config::{ThrottleConfig, WindowUnit},
	document::{Document, Product},
	http::Response,
	outcome::Outcome,
	submit::Submitter,
	transport::{DocumentTransport, SerializedRequest, TransportFuture},
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let config = ThrottleConfig::builder(WindowUnit::Second, 2)
		.acquire_timeout(Duration::from_millis(1_500))
		.build()?;
	let submitter = Arc::new(Submitter::<EchoTransport>::with_transport(
		config,
		EchoTransport::default(),
	)?);
	let started = Instant::now();
	let tasks = (0..5)
		.map(|i| {
			let submitter = Arc::clone(&submitter);

			tokio::spawn(async move {
				let document = demo_document(i);
				let outcome = submitter.submit(Some(&document), Some("demo-signature")).await;

				(i, outcome)
			})
		})
		.collect::<Vec<_>>();

	for task in tasks {
		let (i, outcome) = task.await?;
		let elapsed = started.elapsed().as_millis();

		match outcome {
			Outcome::Success(response) => println!(
				"[{elapsed:>5} ms] document {i}: {} {}",
				response.status(),
				response.body()
			),
			Outcome::Failure(e) => println!("[{elapsed:>5} ms] document {i}: {e}"),
		}
	}

	println!("{:?}", submitter.metrics());
	submitter.shutdown().await;

	Ok(())
}

/// Answers every request locally after a short delay and numbers the replies.
#[derive(Debug, Default)]
struct EchoTransport {
	served: AtomicUsize,
}
impl DocumentTransport for EchoTransport {
	type Error = std::io::Error;

	fn send(&self, request: SerializedRequest) -> TransportFuture<'_, Self::Error> {
		Box::pin(async move {
			tokio::time::sleep(Duration::from_millis(200)).await;

			let n = self.served.fetch_add(1, Ordering::SeqCst) + 1;
			let body = format!("reply #{n} ({} bytes received)", request.body().len());

			Response::builder().status(200).body(body).map_err(std::io::Error::other)
		})
	}
}

fn demo_document(i: usize) -> Document {
	Document {
		participant_inn: "7700000000".into(),
		doc_id: format!("demo-{i}"),
		doc_type: "LP_INTRODUCE_GOODS".into(),
		products: vec![Product { uit_code: format!("uit-{i}"), ..Default::default() }],
		..Default::default()
	}
}
