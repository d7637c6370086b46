//! Run Loop — drives the tick orchestrator on a fixed-interval timer.

use std::sync::Arc;

use prometheus::Registry;
use tokio_util::sync::CancellationToken;

use crate::{
	config::WatcherConfig,
	error::{Error, Result},
	metrics::TelemetryMetrics,
	orchestrator,
	state::SharedState,
};

/// Periodic on-chain telemetry watcher.
///
/// Construct with [`Watcher::new`], then drive it with [`Watcher::run`] until the supplied
/// [`CancellationToken`] is cancelled. A single tick can also be driven directly with
/// [`Watcher::tick`], which is how individual scenarios are exercised without a timer.
pub struct Watcher {
	config: WatcherConfig,
	state: Arc<SharedState>,
	metrics: TelemetryMetrics,
}

impl Watcher {
	/// Stable identifier for this watcher, used in logs.
	pub const NAME: &'static str = "internet-telemetry";

	/// Build a watcher from a validated configuration.
	///
	/// Registers the watcher's counters against `config`'s registry; fails if a counter with a
	/// colliding name is already registered there.
	pub fn new(config: WatcherConfig) -> Result<Self> {
		config.validate()?;

		let metrics = TelemetryMetrics::register(&config.registry)?;

		Ok(Self { config, state: Arc::new(SharedState::new()), metrics })
	}

	/// The watcher's stable identifier.
	pub fn name(&self) -> &'static str {
		Self::NAME
	}

	/// The Prometheus registry the watcher's counters are registered against.
	pub fn registry(&self) -> &Registry {
		&self.config.registry
	}

	/// Run one observation cycle.
	#[tracing::instrument(skip_all, fields(watcher = Self::NAME))]
	pub async fn tick(&self, token: &CancellationToken) -> Result<()> {
		orchestrator::tick(&self.config, &self.state, &self.metrics, token).await
	}

	/// Drive the run loop until `token` is cancelled.
	///
	/// Starts by invoking a tick immediately, then on each subsequent firing of a fixed-interval
	/// timer. A tick error other than cancellation is logged and the loop continues; the loop
	/// returns as soon as cancellation is observed, whether that happens while waiting for the
	/// next timer firing or during an in-flight tick.
	#[tracing::instrument(skip_all, fields(watcher = Self::NAME))]
	pub async fn run(&self, token: CancellationToken) {
		tracing::info!("starting run loop");

		let mut interval = tokio::time::interval(self.config.interval);

		loop {
			tokio::select! {
				biased;
				_ = token.cancelled() => {
					tracing::info!("cancellation received; stopping run loop");
					break;
				},
				_ = interval.tick() => {
					match self.tick(&token).await {
						Ok(()) => {},
						Err(Error::Cancelled) => {
							tracing::info!("cancellation observed mid-tick; stopping run loop");
							break;
						},
						Err(err) => {
							tracing::warn!(error = %err, "tick failed; continuing on the next interval");
						},
					}
				},
			}
		}

		tracing::info!("run loop stopped");
	}
}
