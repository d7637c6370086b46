//! Minimal collaborator fakes shared by unit tests across modules.
//!
//! Richer, scenario-driving fakes for the end-to-end tick scenarios live alongside the
//! integration tests under `tests/support.rs`, which exercises the same public traits from
//! outside the crate.

use async_trait::async_trait;

use crate::{
	collaborators::{CircuitEnumerator, Commitment, LedgerEpochSource, TelemetrySource},
	error::Result,
	model::{Circuit, SampleSet},
};

/// Always reports the same fixed epoch.
pub struct FixedEpoch(pub u64);

#[async_trait]
impl LedgerEpochSource for FixedEpoch {
	async fn get_epoch(&self, _commitment: Commitment) -> Result<u64> {
		Ok(self.0)
	}
}

/// Always reports no circuits.
pub struct EmptyCircuits;

#[async_trait]
impl CircuitEnumerator for EmptyCircuits {
	async fn list(&self) -> Result<Vec<Circuit>> {
		Ok(Vec::new())
	}
}

/// Always reports an empty sample set.
pub struct NoSamples;

#[async_trait]
impl TelemetrySource for NoSamples {
	async fn get_samples(
		&self,
		_collector_key: [u8; 32],
		_provider: &'static str,
		_origin_key: [u8; 32],
		_target_key: [u8; 32],
		_epoch: u64,
	) -> Result<SampleSet> {
		Ok(SampleSet::default())
	}
}
