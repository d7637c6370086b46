//! Tick Orchestrator — one full observation cycle.

use std::{collections::HashSet, sync::Arc};

use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;

use crate::{
	classifier,
	collaborators::Commitment,
	config::WatcherConfig,
	delta,
	error::{Error, Result},
	metrics::{ErrorType, TelemetryMetrics},
	model::{Circuit, DATA_PROVIDERS},
	state::SharedState,
};

/// Run one complete observation cycle.
///
/// Returns success, or an aggregated error selected deterministically from job failures.
/// Reconciliation still commits even when a job error is returned; it is skipped only when
/// `token` was cancelled by the time the fan-out join barrier is reached.
pub async fn tick(
	config: &WatcherConfig,
	state: &Arc<SharedState>,
	metrics: &TelemetryMetrics,
	token: &CancellationToken,
) -> Result<()> {
	// (a) Fetch circuits. No shared state is mutated on failure.
	let circuits = config.circuit_enumerator.list().await.map_err(|err| {
		metrics.record_error(ErrorType::GetCircuits);
		Error::CircuitFetch(err.to_string())
	})?;

	// (b) Fetch epoch. No shared state is mutated on failure.
	let epoch = config.ledger_source.get_epoch(Commitment::Finalized).await.map_err(|err| {
		metrics.record_error(ErrorType::GetEpochInfo);
		tracing::warn!(error = %err, "failed to fetch epoch info");
		Error::EpochFetch(err.to_string())
	})?;

	// (c) Epoch rollover prune.
	let pruned = state.prune_rollover(epoch).await;

	if pruned > 0 {
		tracing::debug!(epoch, pruned, "epoch rollover detected; previous samples re-baselined");
	}

	// (d) Empty-circuit path: treated as a non-observation, epoch cursor is not advanced.
	if circuits.is_empty() {
		let vanished = state.take_previous_circuits().await;

		for circuit in &vanished {
			scrub_circuit(metrics, state, circuit).await;
		}

		tracing::debug!(removed = vanished.len(), "no circuits visible this tick");

		return Ok(());
	}

	// (e) Fan-out over the {data provider} x {circuit} cartesian product.
	let cursor = state.pre_tick_cursor().await;
	let semaphore = Arc::new(Semaphore::new(config.max_concurrency.max(1)));
	let mut handles = Vec::with_capacity(circuits.len() * DATA_PROVIDERS.len());

	for circuit in &circuits {
		for provider in DATA_PROVIDERS {
			handles.push(tokio::spawn(run_job(
				semaphore.clone(),
				config.telemetry_source.clone(),
				config.collector_key,
				provider,
				circuit.clone(),
				epoch,
				cursor,
				state.clone(),
				metrics.clone(),
				token.clone(),
			)));
		}
	}

	// (f) Join. Retain the first-scheduled job's error, for deterministic aggregation.
	let mut first_error: Option<Error> = None;

	for handle in handles {
		match handle.await {
			Ok(Ok(())) => {},
			Ok(Err(err)) => {
				if first_error.is_none() {
					first_error = Some(err);
				}
			},
			Err(join_err) => {
				if join_err.is_cancelled() && first_error.is_none() {
					first_error = Some(Error::Cancelled);
				}
			},
		}
	}

	if token.is_cancelled() {
		tracing::debug!("tick cancelled before reconciliation; skipping state commit");

		return Err(Error::Cancelled);
	}

	// (g) Reconciliation: always runs once the join barrier is reached uncancelled, even when a
	// job error is being returned from this tick.
	let current_codes: HashSet<String> = circuits.iter().map(|c| c.code.clone()).collect();
	let previous_codes = state.previous_circuits().await;

	for circuit in previous_codes.difference(&current_codes) {
		scrub_circuit(metrics, state, circuit).await;
	}

	state.commit_reconciliation(current_codes, epoch).await;

	// (h) Result.
	match first_error {
		Some(err) => Err(err),
		None => Ok(()),
	}
}

async fn scrub_circuit(metrics: &TelemetryMetrics, state: &SharedState, circuit: &str) {
	for provider in DATA_PROVIDERS {
		metrics.delete_circuit_series(provider, circuit);
	}

	state.scrub_circuit(circuit).await;
}

#[allow(clippy::too_many_arguments)]
async fn run_job(
	semaphore: Arc<Semaphore>,
	telemetry_source: Arc<dyn crate::collaborators::TelemetrySource>,
	collector_key: [u8; 32],
	provider: &'static str,
	circuit: Circuit,
	epoch: u64,
	cursor: crate::state::PreTickCursor,
	state: Arc<SharedState>,
	metrics: TelemetryMetrics,
	token: CancellationToken,
) -> Result<()> {
	let _permit = tokio::select! {
		biased;
		_ = token.cancelled() => return Err(Error::Cancelled),
		permit = semaphore.acquire_owned() => permit.map_err(|_| Error::Cancelled)?,
	};

	let fetch = telemetry_source.get_samples(
		collector_key,
		provider,
		circuit.origin_key,
		circuit.target_key,
		epoch,
	);

	let samples = tokio::select! {
		biased;
		_ = token.cancelled() => return Err(Error::Cancelled),
		result = fetch => result,
	};

	let samples = match samples {
		Ok(samples) => samples,
		Err(Error::AccountNotFound { .. }) => {
			metrics.record_account_not_found(provider, &circuit.code);

			return Ok(());
		},
		Err(err) => {
			metrics.record_error(ErrorType::GetLatencySamples);
			tracing::warn!(
				provider,
				circuit = %circuit.code,
				error = %err,
				"failed to fetch latency samples"
			);

			return Err(Error::SampleFetch {
				provider,
				circuit: circuit.code.clone(),
				source: err.to_string(),
			});
		},
	};

	let current = classifier::classify(&samples);
	let delta = delta::observe(&state, cursor, epoch, provider, &circuit.code, current).await;

	if !delta.is_zero() {
		metrics.emit_delta(provider, &circuit.code, delta);
	}

	Ok(())
}
