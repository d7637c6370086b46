//! Watcher configuration and validation.

use std::{sync::Arc, time::Duration};

use prometheus::Registry;

use crate::{
	collaborators::{CircuitEnumerator, LedgerEpochSource, TelemetrySource},
	error::{Error, Result},
};

/// Default bound on in-flight telemetry fetches per tick.
pub const DEFAULT_MAX_CONCURRENCY: usize = 16;

/// Validated configuration for a [`crate::watcher::Watcher`].
///
/// Construct via [`WatcherConfigBuilder`]; `WatcherConfig::validate` rejects missing or
/// zero-valued required fields.
#[derive(Clone)]
pub struct WatcherConfig {
	pub(crate) collector_key: [u8; 32],
	pub(crate) interval: Duration,
	pub(crate) max_concurrency: usize,
	pub(crate) ledger_source: Arc<dyn LedgerEpochSource>,
	pub(crate) circuit_enumerator: Arc<dyn CircuitEnumerator>,
	pub(crate) telemetry_source: Arc<dyn TelemetrySource>,
	pub(crate) registry: Registry,
}

impl WatcherConfig {
	/// Start building a configuration with the required collaborators.
	pub fn builder(
		collector_key: [u8; 32],
		interval: Duration,
		ledger_source: Arc<dyn LedgerEpochSource>,
		circuit_enumerator: Arc<dyn CircuitEnumerator>,
		telemetry_source: Arc<dyn TelemetrySource>,
	) -> WatcherConfigBuilder {
		WatcherConfigBuilder {
			collector_key,
			interval,
			max_concurrency: DEFAULT_MAX_CONCURRENCY,
			ledger_source,
			circuit_enumerator,
			telemetry_source,
			registry: Registry::new(),
		}
	}

	/// Validate the required fields.
	pub fn validate(&self) -> Result<()> {
		if self.collector_key == [0u8; 32] {
			return Err(Error::Validation {
				field: "collector_key",
				reason: "Must be non-zero.".into(),
			});
		}
		if self.interval.is_zero() {
			return Err(Error::Validation {
				field: "interval",
				reason: "Must be greater than zero.".into(),
			});
		}
		if self.max_concurrency == 0 {
			return Err(Error::Validation {
				field: "max_concurrency",
				reason: "Must be greater than zero.".into(),
			});
		}

		Ok(())
	}
}

/// Fluent builder for [`WatcherConfig`], mirroring the finalize-into-validated-config shape
/// used by registry-style builders in the surrounding ecosystem.
pub struct WatcherConfigBuilder {
	collector_key: [u8; 32],
	interval: Duration,
	max_concurrency: usize,
	ledger_source: Arc<dyn LedgerEpochSource>,
	circuit_enumerator: Arc<dyn CircuitEnumerator>,
	telemetry_source: Arc<dyn TelemetrySource>,
	registry: Registry,
}

impl WatcherConfigBuilder {
	/// Override the bound on in-flight telemetry fetches per tick (default 16).
	pub fn max_concurrency(mut self, value: usize) -> Self {
		self.max_concurrency = value;

		self
	}

	/// Supply the Prometheus registry the watcher's counters are registered against.
	pub fn registry(mut self, registry: Registry) -> Self {
		self.registry = registry;

		self
	}

	/// Finalise and validate the configuration.
	pub fn build(self) -> Result<WatcherConfig> {
		let config = WatcherConfig {
			collector_key: self.collector_key,
			interval: self.interval,
			max_concurrency: self.max_concurrency,
			ledger_source: self.ledger_source,
			circuit_enumerator: self.circuit_enumerator,
			telemetry_source: self.telemetry_source,
			registry: self.registry,
		};

		config.validate()?;

		Ok(config)
	}
}
