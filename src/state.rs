//! Shared State — the single logical state object guarded by a read/write mutex.

use std::collections::{HashMap, HashSet};

use tokio::sync::RwLock;

use crate::model::{CircuitTelemetryStats, PreviousSampleKey};

/// `{lastEpoch, epochKnown, previousSamples, previousCircuits}` guarded by one r/w mutex.
///
/// Read sites take a read lock; write sites (delta writeback, epoch cursor update,
/// reconciliation, disappearance scrub) take a write lock. No site holds the lock across a
/// collaborator call.
#[derive(Debug, Default)]
pub struct SharedState {
	inner: RwLock<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
	last_epoch: u64,
	epoch_known: bool,
	previous_samples: HashMap<PreviousSampleKey, CircuitTelemetryStats>,
	previous_circuits: HashSet<String>,
}

/// Epoch cursor as observed *before* the current tick mutates it.
///
/// Workers read these values once, at fan-out time, and use them for the whole tick: the cursor
/// only advances at end-of-tick reconciliation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PreTickCursor {
	/// Whether any tick has committed an epoch yet.
	pub epoch_known: bool,
	/// The epoch committed by the most recent successful reconciliation.
	pub last_epoch: u64,
}

impl SharedState {
	/// Construct an empty shared state (no tick has run yet).
	pub fn new() -> Self {
		Self::default()
	}

	/// Read the epoch cursor as of before this tick's mutations.
	pub async fn pre_tick_cursor(&self) -> PreTickCursor {
		let inner = self.inner.read().await;

		PreTickCursor { epoch_known: inner.epoch_known, last_epoch: inner.last_epoch }
	}

	/// Epoch-rollover prune.
	///
	/// Deletes every previous-sample entry whose key epoch is not `current_epoch`. A no-op
	/// unless the watcher already knows an epoch and that epoch differs from `current_epoch`.
	/// Returns the number of entries removed, for logging.
	pub async fn prune_rollover(&self, current_epoch: u64) -> usize {
		let mut inner = self.inner.write().await;

		if !(inner.epoch_known && inner.last_epoch != current_epoch) {
			return 0;
		}

		let before = inner.previous_samples.len();

		inner.previous_samples.retain(|key, _| key.epoch == current_epoch);

		before - inner.previous_samples.len()
	}

	/// Read-then-write of a single previous-sample entry, as one write-locked critical section
	/// covering both the read of the previous value and the write of `current`.
	///
	/// Returns the previous entry for `key`, if one existed for that exact (epoch, provider,
	/// circuit), then unconditionally overwrites it with `current`.
	pub async fn read_then_write(
		&self,
		key: PreviousSampleKey,
		current: CircuitTelemetryStats,
	) -> Option<CircuitTelemetryStats> {
		let mut inner = self.inner.write().await;

		inner.previous_samples.insert(key, current)
	}

	/// Remove every previous-sample entry whose key ends with the given circuit's suffix.
	pub async fn scrub_circuit(&self, circuit: &str) {
		let suffix = PreviousSampleKey::circuit_suffix(circuit);
		let mut inner = self.inner.write().await;

		inner.previous_samples.retain(|key, _| !key.to_string().ends_with(&suffix));
	}

	/// Snapshot the previous-circuit set and replace it with an empty one.
	pub async fn take_previous_circuits(&self) -> HashSet<String> {
		let mut inner = self.inner.write().await;

		std::mem::take(&mut inner.previous_circuits)
	}

	/// Snapshot the previous-circuit set without clearing it.
	pub async fn previous_circuits(&self) -> HashSet<String> {
		self.inner.read().await.previous_circuits.clone()
	}

	/// Commit end-of-tick reconciliation: replace the previous-circuit set and advance
	/// the epoch cursor, in one write-locked critical section.
	pub async fn commit_reconciliation(&self, circuits: HashSet<String>, epoch: u64) {
		let mut inner = self.inner.write().await;

		inner.previous_circuits = circuits;
		inner.epoch_known = true;
		inner.last_epoch = epoch;
	}

	/// Number of previous-sample entries currently retained (for tests/observability).
	#[cfg(test)]
	pub async fn previous_sample_count(&self) -> usize {
		self.inner.read().await.previous_samples.len()
	}
}
