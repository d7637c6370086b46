//! Sample Classifier — turn a sample array into (success, loss) counts.

use crate::model::{CircuitTelemetryStats, SampleSet};

/// Classify a sample set into cumulative success/loss counts.
///
/// A sample value of `0` is a loss; any non-zero value is a success. The empty set classifies
/// to `{0, 0}`. No error conditions.
pub fn classify(samples: &SampleSet) -> CircuitTelemetryStats {
	let (success_count, loss_count) =
		samples.0.iter().fold((0u32, 0u32), |(success, loss), &sample| {
			if sample == 0 { (success, loss + 1) } else { (success + 1, loss) }
		});

	CircuitTelemetryStats { success_count, loss_count }
}
