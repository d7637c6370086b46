//! Delta Engine — per (epoch, provider, circuit) previous/current bookkeeping.

use crate::{
	model::{CircuitTelemetryStats, PreviousSampleKey, TelemetryDelta},
	state::{PreTickCursor, SharedState},
};

/// Compute the per-tick delta for `(epoch, provider, circuit)` against the previous-sample
/// table, and write `current` back into the table.
///
/// Follows this decision table:
/// - no previous entry, or the watcher did not yet know an epoch, or the pre-tick epoch cursor
///   disagrees with `epoch` (epoch rollover) => both deltas are `0`: the pair re-baselines.
/// - a previous entry exists for the same epoch and `current >= previous` on a counter =>
///   `current - previous` for that counter.
/// - a previous entry exists for the same epoch but `current < previous` on a counter (counter
///   regression) => `0` for that counter, and a warning is logged identifying the circuit,
///   epoch, previous, and current value. Each counter clamps independently.
pub async fn observe(
	state: &SharedState,
	cursor: PreTickCursor,
	epoch: u64,
	provider: &'static str,
	circuit: &str,
	current: CircuitTelemetryStats,
) -> TelemetryDelta {
	let key = PreviousSampleKey::new(epoch, provider, circuit);
	let previous = state.read_then_write(key, current).await;

	let baseline = cursor.epoch_known && cursor.last_epoch == epoch;

	let previous = match previous {
		Some(previous) if baseline => previous,
		_ => return TelemetryDelta::default(),
	};

	TelemetryDelta {
		success_delta: clamp_delta(
			"success",
			epoch,
			provider,
			circuit,
			previous.success_count,
			current.success_count,
		),
		loss_delta: clamp_delta(
			"loss",
			epoch,
			provider,
			circuit,
			previous.loss_count,
			current.loss_count,
		),
	}
}

fn clamp_delta(
	counter: &'static str,
	epoch: u64,
	provider: &'static str,
	circuit: &str,
	previous: u32,
	current: u32,
) -> u32 {
	if current >= previous {
		current - previous
	} else {
		tracing::warn!(
			counter,
			epoch,
			provider,
			circuit,
			previous,
			current,
			"counter regression detected; suppressing delta for this tick"
		);

		0
	}
}
