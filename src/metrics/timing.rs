//! Per-scenario elapsed-time collection
//!
//! The collector is an explicitly constructed instance passed by reference
//! (not a process-wide singleton): `configure` resets it for a batch,
//! `record_run` appends one sample, `report` prints the batch summary. It is
//! thread-safe against incidental concurrent `record_run` calls even though
//! the reference driver runs scenarios sequentially.

use hdrhistogram::Histogram;
use parking_lot::Mutex;

struct ScenarioSamples {
    /// Elapsed milliseconds, insertion order = run order.
    samples: Vec<u64>,
    /// Latency distribution across cycles, reported when there is more than
    /// one sample.
    histogram: Histogram<u64>,
}

impl ScenarioSamples {
    fn new() -> Self {
        Self {
            samples: Vec::new(),
            histogram: Histogram::new_with_bounds(1, 3_600_000_000, 3)
                .expect("Failed to create histogram"),
        }
    }

    fn record(&mut self, elapsed_ms: u64) {
        self.samples.push(elapsed_ms);
        self.histogram.record(elapsed_ms).ok();
    }

    /// Integer-truncated arithmetic mean; 0 when no samples were recorded.
    fn average_ms(&self) -> u64 {
        if self.samples.is_empty() {
            return 0;
        }
        self.samples.iter().sum::<u64>() / self.samples.len() as u64
    }
}

/// Aggregator of per-scenario elapsed-time samples across repeated runs.
pub struct TimingCollector {
    scenarios: Mutex<Vec<ScenarioSamples>>,
}

impl TimingCollector {
    pub fn new() -> Self {
        Self {
            scenarios: Mutex::new(Vec::new()),
        }
    }

    /// Reset all recorded samples for a batch of `num_scenarios` scenarios.
    /// Must be called before the first run of a batch.
    pub fn configure(&self, num_scenarios: usize) {
        let mut scenarios = self.scenarios.lock();
        scenarios.clear();
        scenarios.resize_with(num_scenarios, ScenarioSamples::new);
    }

    /// Append one elapsed sample to a scenario's sequence.
    pub fn record_run(&self, scenario_id: usize, elapsed_ms: u64) {
        let mut scenarios = self.scenarios.lock();
        match scenarios.get_mut(scenario_id) {
            Some(samples) => samples.record(elapsed_ms),
            None => tracing::warn!(
                "ignoring sample for unconfigured scenario {}",
                scenario_id
            ),
        }
    }

    pub fn average_ms(&self, scenario_id: usize) -> u64 {
        self.scenarios
            .lock()
            .get(scenario_id)
            .map(|s| s.average_ms())
            .unwrap_or(0)
    }

    pub fn samples(&self, scenario_id: usize) -> Vec<u64> {
        self.scenarios
            .lock()
            .get(scenario_id)
            .map(|s| s.samples.clone())
            .unwrap_or_default()
    }

    /// Print the per-scenario averages and, for scenarios with a non-zero
    /// average, the per-cycle breakdown (1-based cycle index).
    pub fn report(&self) {
        let scenarios = self.scenarios.lock();

        println!("=== total {} scenario results ===", scenarios.len());
        for (id, scenario) in scenarios.iter().enumerate() {
            let avg = scenario.average_ms();
            println!("scenario {} avg elapsed = {}ms", id, avg);

            if avg == 0 {
                continue;
            }
            for (cycle, elapsed) in scenario.samples.iter().enumerate() {
                println!(" - {} cycle = {}ms", cycle + 1, elapsed);
            }
            if scenario.samples.len() > 1 {
                println!(
                    "   min={}ms max={}ms p99={}ms",
                    scenario.histogram.min(),
                    scenario.histogram.max(),
                    scenario.histogram.value_at_percentile(99.0)
                );
            }
        }
        println!("===============================");
    }
}

impl Default for TimingCollector {
    fn default() -> Self {
        Self::new()
    }
}
