//! Metrics Emitter — Prometheus counter vectors and series deletion.

use prometheus::{
	IntCounterVec, Opts, Registry, register_int_counter_vec_with_registry,
};

use crate::{error::Result, model::TelemetryDelta};

const NAMESPACE: &str = "internet_telemetry";

/// Error kinds counted by `errors_total{error_type}`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorType {
	/// `CircuitEnumerator::list` failed.
	GetCircuits,
	/// `LedgerEpochSource::get_epoch` failed.
	GetEpochInfo,
	/// `TelemetrySource::get_samples` failed for a job.
	GetLatencySamples,
}

impl ErrorType {
	fn label(self) -> &'static str {
		match self {
			ErrorType::GetCircuits => "get_circuits",
			ErrorType::GetEpochInfo => "get_epoch_info",
			ErrorType::GetLatencySamples => "get_latency_samples",
		}
	}
}

/// The five Prometheus counters this watcher exports, registered once against an injected
/// [`Registry`].
///
/// Exactly four counters are labeled by `(data_provider, circuit)`; `errors_total` is labeled
/// only by `error_type`. Zero deltas are never emitted, since they would still create label
/// series with no informational value.
#[derive(Clone, Debug)]
pub struct TelemetryMetrics {
	successes_total: IntCounterVec,
	losses_total: IntCounterVec,
	samples_total: IntCounterVec,
	account_not_found_total: IntCounterVec,
	errors_total: IntCounterVec,
}

impl TelemetryMetrics {
	/// Register the watcher's counters against `registry`.
	pub fn register(registry: &Registry) -> Result<Self> {
		let labels = ["data_provider", "circuit"];

		let successes_total = register_int_counter_vec_with_registry!(
			Opts::new(
				format!("{NAMESPACE}_successes_total"),
				"Count of successful latency samples observed since the previous tick."
			),
			&labels,
			registry
		)?;
		let losses_total = register_int_counter_vec_with_registry!(
			Opts::new(
				format!("{NAMESPACE}_losses_total"),
				"Count of lost latency samples observed since the previous tick."
			),
			&labels,
			registry
		)?;
		let samples_total = register_int_counter_vec_with_registry!(
			Opts::new(
				format!("{NAMESPACE}_samples_total"),
				"Count of latency samples observed since the previous tick."
			),
			&labels,
			registry
		)?;
		let account_not_found_total = register_int_counter_vec_with_registry!(
			Opts::new(
				format!("{NAMESPACE}_account_not_found_total"),
				"Count of telemetry account lookups that returned account-not-found."
			),
			&labels,
			registry
		)?;
		let errors_total = register_int_counter_vec_with_registry!(
			Opts::new(
				format!("{NAMESPACE}_errors_total"),
				"Count of collaborator failures encountered while ticking, by failure site."
			),
			&["error_type"],
			registry
		)?;

		Ok(Self {
			successes_total,
			losses_total,
			samples_total,
			account_not_found_total,
			errors_total,
		})
	}

	/// Apply a per-tick delta for `(provider, circuit)`.
	///
	/// Zero components are not emitted.
	pub fn emit_delta(&self, provider: &str, circuit: &str, delta: TelemetryDelta) {
		let labels = [provider, circuit];

		if delta.success_delta > 0 {
			self.successes_total.with_label_values(&labels).inc_by(delta.success_delta as u64);
		}
		if delta.loss_delta > 0 {
			self.losses_total.with_label_values(&labels).inc_by(delta.loss_delta as u64);
		}

		let samples_delta = delta.samples_delta();

		if samples_delta > 0 {
			self.samples_total.with_label_values(&labels).inc_by(samples_delta as u64);
		}
	}

	/// Record a well-known "account not found" outcome for `(provider, circuit)`.
	pub fn record_account_not_found(&self, provider: &str, circuit: &str) {
		self.account_not_found_total.with_label_values(&[provider, circuit]).inc();
	}

	/// Increment `errors_total{error_type}` for a collaborator failure site.
	pub fn record_error(&self, error_type: ErrorType) {
		self.errors_total.with_label_values(&[error_type.label()]).inc();
	}

	/// Delete all four labeled counters for `(provider, circuit)` when a circuit disappears.
	///
	/// Deletion is best-effort: a missing series (never emitted for this pair) is not an error.
	pub fn delete_circuit_series(&self, provider: &str, circuit: &str) {
		let labels = [provider, circuit];

		let _ = self.successes_total.remove_label_values(&labels);
		let _ = self.losses_total.remove_label_values(&labels);
		let _ = self.samples_total.remove_label_values(&labels);
		let _ = self.account_not_found_total.remove_label_values(&labels);
	}
}
