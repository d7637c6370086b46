//! Data-model types shared across the tick pipeline.

use std::fmt;

/// Data provider name strings, iterated in source order per tick.
///
/// Changing this set is a source-level change, not a configuration option.
pub const DATA_PROVIDERS: [&str; 2] = ["ripeatlas", "wheresitup"];

/// An unordered pair of exchange endpoints identified by a human-readable code.
///
/// Produced by the external circuit enumerator; the core treats it as immutable and opaque
/// beyond `{code, origin_key, target_key}`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Circuit {
	/// Human-readable circuit identifier, e.g. `"OR-A -> TG-A"`.
	pub code: String,
	/// Public key of the origin exchange endpoint.
	pub origin_key: [u8; 32],
	/// Public key of the target exchange endpoint.
	pub target_key: [u8; 32],
}

/// A finite ordered sequence of unsigned 32-bit latency samples.
///
/// A sample value of `0` is interpreted as a loss; any non-zero value is a success. The full
/// set is never stored; only its aggregates are.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SampleSet(pub Vec<u32>);

impl SampleSet {
	/// Wrap a vector of raw samples.
	pub fn new(samples: Vec<u32>) -> Self {
		Self(samples)
	}

	/// Number of samples in the set.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Whether the set is empty.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

/// Cumulative success/loss counts observed within a single epoch for a (provider, circuit).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CircuitTelemetryStats {
	/// Count of non-zero samples.
	pub success_count: u32,
	/// Count of zero-valued samples.
	pub loss_count: u32,
}

impl CircuitTelemetryStats {
	/// `{successCount, lossCount}` for an empty sample set.
	pub const ZERO: Self = Self { success_count: 0, loss_count: 0 };
}

/// Non-negative per-tick delta computed by the delta engine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TelemetryDelta {
	/// Increment to `successes_total`.
	pub success_delta: u32,
	/// Increment to `losses_total`.
	pub loss_delta: u32,
}

impl TelemetryDelta {
	/// `samplesDelta`, always derived as the sum of the two clamped deltas.
	pub fn samples_delta(&self) -> u32 {
		self.success_delta + self.loss_delta
	}

	/// Whether this delta carries no emission-worthy values.
	pub fn is_zero(&self) -> bool {
		self.success_delta == 0 && self.loss_delta == 0
	}
}

/// Key identifying an entry in the previous-sample table.
///
/// The textual representation is part of the contract: deletion on circuit disappearance
/// matches by the suffix `", circuit=<C>"`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PreviousSampleKey {
	/// Epoch the observation belongs to.
	pub epoch: u64,
	/// Data provider that produced the observation.
	pub provider: &'static str,
	/// Circuit code the observation was made against.
	pub circuit: String,
}

impl PreviousSampleKey {
	/// Build a key for `(epoch, provider, circuit)`.
	pub fn new(epoch: u64, provider: &'static str, circuit: impl Into<String>) -> Self {
		Self { epoch, provider, circuit: circuit.into() }
	}

	/// Suffix used to match keys against a disappearing circuit, regardless of epoch or
	/// provider.
	pub fn circuit_suffix(circuit: &str) -> String {
		format!(", circuit={circuit}")
	}
}

impl fmt::Display for PreviousSampleKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "epoch={}, data_provider={}, circuit={}", self.epoch, self.provider, self.circuit)
	}
}
