//! Account-not-found is accounted for distinctly from both a generic failure and a real sample.

use std::{sync::Arc, time::Duration};

use internet_telemetry_watcher::{Error, Watcher};
use tokio_util::sync::CancellationToken;

use crate::support::{circuit, ScriptedCircuits, ScriptedEpoch, ScriptedTelemetry, WatcherConfig};

#[tokio::test]
async fn account_not_found_increments_its_own_counter_and_nothing_else() {
	let _ = tracing_subscriber::fmt::try_init();

	let a_b = circuit("A -> B");

	let epoch = Arc::new(ScriptedEpoch::fixed(5));
	let circuits = Arc::new(ScriptedCircuits::new(vec![Ok(vec![a_b.clone()])]));
	let telemetry = Arc::new(ScriptedTelemetry::new());

	for provider in ["ripeatlas", "wheresitup"] {
		telemetry.push(
			provider,
			&a_b,
			Err(Error::AccountNotFound { provider: "ripeatlas", circuit: a_b.code.clone() }),
		);
	}

	let config = WatcherConfig::builder([1u8; 32], Duration::from_secs(30), epoch, circuits, telemetry)
		.build()
		.expect("valid config");
	let watcher = Watcher::new(config).expect("metrics register cleanly");
	let token = CancellationToken::new();

	watcher.tick(&token).await.expect("tick returns success even on account-not-found");

	let families = watcher.registry().gather();
	let account_not_found = families
		.iter()
		.find(|f| f.name() == "internet_telemetry_account_not_found_total")
		.expect("family registered");

	for provider in ["ripeatlas", "wheresitup"] {
		let value = account_not_found
			.get_metric()
			.iter()
			.find(|m| m.get_label().iter().any(|l| l.value() == provider))
			.expect("series present for provider")
			.get_counter()
			.value();

		assert_eq!(value, 1.0);
	}

	for name in [
		"internet_telemetry_successes_total",
		"internet_telemetry_losses_total",
		"internet_telemetry_samples_total",
	] {
		let empty = families
			.iter()
			.find(|f| f.name() == name)
			.map(|f| f.get_metric().is_empty())
			.unwrap_or(true);

		assert!(empty, "{name} must carry no series when every job is account-not-found");
	}

	let errors = families
		.iter()
		.find(|f| f.name() == "internet_telemetry_errors_total")
		.map(|f| f.get_metric().iter().map(|m| m.get_counter().value()).sum::<f64>())
		.unwrap_or(0.0);

	assert_eq!(errors, 0.0, "account-not-found must not be counted as an error");
}
