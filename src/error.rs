//! Crate-wide error types and `Result` alias.

/// Library-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for the telemetry watcher.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	/// `CircuitEnumerator::list` failed; the tick aborts before fan-out.
	#[error("failed to fetch circuits: {0}")]
	CircuitFetch(String),

	/// `LedgerEpochSource::get_epoch` failed; the tick aborts before fan-out.
	#[error("failed to fetch epoch info: {0}")]
	EpochFetch(String),

	/// `TelemetrySource::get_samples` failed for a single (provider, circuit) job.
	#[error("failed to fetch latency samples for provider={provider} circuit={circuit}: {source}")]
	SampleFetch {
		/// Data provider the failing job was scheduled against.
		provider: &'static str,
		/// Circuit code the failing job was scheduled against.
		circuit: String,
		/// Underlying collaborator error text.
		source: String,
	},

	/// Well-known sentinel signalling the telemetry account does not exist for this key.
	///
	/// Not a failure: callers convert this into `account_not_found_total` and continue.
	#[error("telemetry account not found for provider={provider} circuit={circuit}")]
	AccountNotFound {
		/// Data provider the lookup was made for.
		provider: &'static str,
		/// Circuit code the lookup was made for.
		circuit: String,
	},

	/// The execution token was cancelled mid-tick.
	#[error("tick cancelled")]
	Cancelled,

	/// Rejected configuration.
	#[error("invalid configuration for {field}: {reason}")]
	Validation {
		/// Name of the offending field.
		field: &'static str,
		/// Human-readable rejection reason.
		reason: String,
	},

	/// Prometheus registration/removal failure.
	#[error("metrics error: {0}")]
	Metrics(#[from] prometheus::Error),
}

impl Error {
	/// Whether this error represents cancellation rather than a genuine failure.
	pub fn is_cancelled(&self) -> bool {
		matches!(self, Error::Cancelled)
	}
}
