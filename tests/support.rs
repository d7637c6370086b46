//! Scripted collaborator fakes driving the end-to-end tick scenarios.

use std::{
	collections::{HashMap, VecDeque},
	sync::Mutex,
};

use async_trait::async_trait;
use internet_telemetry_watcher::Result;

// Re-export so scenario files can construct collaborators and build errors without reaching
// into the crate's private module tree.
pub use internet_telemetry_watcher::{
	Error,
	collaborators::{CircuitEnumerator, Commitment, LedgerEpochSource, TelemetrySource},
	config::WatcherConfig,
	model::{Circuit, SampleSet},
};

/// Derive a deterministic, distinct key pair for a human-readable circuit code.
///
/// Test fakes need stable pubkeys to hand out via [`CircuitEnumerator::list`] and to recognise
/// again inside [`TelemetrySource::get_samples`]; hashing the code into two salted byte patterns
/// keeps every circuit's keys unique without a real keypair.
pub fn circuit(code: &str) -> Circuit {
	Circuit { code: code.to_string(), origin_key: key_material(code, 0x00), target_key: key_material(code, 0xff) }
}

fn key_material(code: &str, salt: u8) -> [u8; 32] {
	let mut key = [0u8; 32];

	for (slot, byte) in key.iter_mut().zip(code.bytes().cycle()) {
		*slot = byte ^ salt;
	}

	key
}

/// Ledger epoch source that replays a fixed script of per-tick results, repeating the last
/// result once the script is exhausted.
pub struct ScriptedEpoch {
	ticks: Mutex<VecDeque<Result<u64>>>,
	last: Mutex<u64>,
}

impl ScriptedEpoch {
	/// Build a script from a list of per-tick epoch results.
	pub fn new(ticks: Vec<Result<u64>>) -> Self {
		Self { ticks: Mutex::new(ticks.into()), last: Mutex::new(0) }
	}

	/// Always report the same fixed epoch.
	pub fn fixed(epoch: u64) -> Self {
		Self::new(vec![Ok(epoch)])
	}
}

#[async_trait]
impl LedgerEpochSource for ScriptedEpoch {
	async fn get_epoch(&self, _commitment: Commitment) -> Result<u64> {
		let mut ticks = self.ticks.lock().expect("lock poisoned");

		match ticks.pop_front() {
			Some(Ok(epoch)) => {
				*self.last.lock().expect("lock poisoned") = epoch;

				Ok(epoch)
			},
			Some(Err(err)) => Err(err),
			None => Ok(*self.last.lock().expect("lock poisoned")),
		}
	}
}

/// Circuit enumerator that replays a fixed script of per-tick circuit sets, repeating the last
/// result once the script is exhausted.
pub struct ScriptedCircuits {
	ticks: Mutex<VecDeque<Result<Vec<Circuit>>>>,
	last: Mutex<Vec<Circuit>>,
}

impl ScriptedCircuits {
	/// Build a script from a list of per-tick circuit-set results.
	pub fn new(ticks: Vec<Result<Vec<Circuit>>>) -> Self {
		Self { ticks: Mutex::new(ticks.into()), last: Mutex::new(Vec::new()) }
	}
}

#[async_trait]
impl CircuitEnumerator for ScriptedCircuits {
	async fn list(&self) -> Result<Vec<Circuit>> {
		let mut ticks = self.ticks.lock().expect("lock poisoned");

		match ticks.pop_front() {
			Some(Ok(circuits)) => {
				*self.last.lock().expect("lock poisoned") = circuits.clone();

				Ok(circuits)
			},
			Some(Err(err)) => Err(err),
			None => Ok(self.last.lock().expect("lock poisoned").clone()),
		}
	}
}

/// Telemetry source that replays a fixed per-`(provider, circuit)` script of sample-set results,
/// repeating each pair's last result once its script is exhausted.
#[derive(Default)]
pub struct ScriptedTelemetry {
	scripts: Mutex<HashMap<(&'static str, String), VecDeque<Result<SampleSet>>>>,
	codes_by_origin: Mutex<HashMap<[u8; 32], String>>,
}

impl ScriptedTelemetry {
	/// Build an empty script; populate it with [`ScriptedTelemetry::push`] before use.
	pub fn new() -> Self {
		Self::default()
	}

	/// Queue one result for `(provider, circuit.code)`, registering the circuit's origin key so
	/// it can be recognised again in [`TelemetrySource::get_samples`].
	pub fn push(&self, provider: &'static str, circuit: &Circuit, result: Result<SampleSet>) {
		self.codes_by_origin
			.lock()
			.expect("lock poisoned")
			.insert(circuit.origin_key, circuit.code.clone());
		self.scripts
			.lock()
			.expect("lock poisoned")
			.entry((provider, circuit.code.clone()))
			.or_default()
			.push_back(result);
	}
}

#[async_trait]
impl TelemetrySource for ScriptedTelemetry {
	async fn get_samples(
		&self,
		_collector_key: [u8; 32],
		provider: &'static str,
		origin_key: [u8; 32],
		_target_key: [u8; 32],
		_epoch: u64,
	) -> Result<SampleSet> {
		let code = self
			.codes_by_origin
			.lock()
			.expect("lock poisoned")
			.get(&origin_key)
			.cloned()
			.unwrap_or_default();
		let mut scripts = self.scripts.lock().expect("lock poisoned");
		let queue = scripts.entry((provider, code)).or_default();

		match queue.pop_front() {
			Some(result) => {
				if queue.is_empty() {
					// Keep replaying the same outcome for ticks beyond the script's length.
					if let Ok(ref samples) = result {
						queue.push_back(Ok(samples.clone()));
					}
				}

				result
			},
			None => Ok(SampleSet::default()),
		}
	}
}

/// A distinguishable, non-sentinel failure for scripting generic collaborator errors.
pub fn generic_failure() -> Error {
	Error::CircuitFetch("simulated collaborator failure".into())
}
