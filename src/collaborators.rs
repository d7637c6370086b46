//! External collaborators consumed by the watcher.
//!
//! Each collaborator is a narrow, single-method trait rather than a fat facade, so the watcher
//! stays test-fixtureable.

use async_trait::async_trait;

use crate::{
	error::Result,
	model::{Circuit, SampleSet},
};

/// Opaque commitment-level token passed through to the ledger collaborator.
///
/// Its meaning is external to the core; the finalized level is used by default.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Commitment {
	/// Finalized ledger state (the default).
	#[default]
	Finalized,
	/// Confirmed but not yet finalized.
	Confirmed,
	/// Optimistically processed, may still be rolled back.
	Processed,
}

/// Ledger epoch source.
#[async_trait]
pub trait LedgerEpochSource: Send + Sync {
	/// Fetch the current ledger epoch at the given commitment level.
	async fn get_epoch(&self, commitment: Commitment) -> Result<u64>;
}

/// Serviceability-program circuit enumerator.
#[async_trait]
pub trait CircuitEnumerator: Send + Sync {
	/// List the currently known circuits.
	async fn list(&self) -> Result<Vec<Circuit>>;
}

/// Telemetry-program sample source.
#[async_trait]
pub trait TelemetrySource: Send + Sync {
	/// Fetch the latency sample set for `(collector_key, provider, origin_key, target_key,
	/// epoch)`.
	///
	/// Returns `Err(Error::AccountNotFound { .. })` for the well-known "account not found"
	/// condition; callers MUST distinguish this from all other errors.
	async fn get_samples(
		&self,
		collector_key: [u8; 32],
		provider: &'static str,
		origin_key: [u8; 32],
		target_key: [u8; 32],
		epoch: u64,
	) -> Result<SampleSet>;
}
