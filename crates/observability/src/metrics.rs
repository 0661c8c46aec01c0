//! Flow metrics collection
//!
//! Per-operator counters pushed into the global `metrics` recorder, plus an
//! in-memory aggregator for end-of-run summaries.

use metrics::counter;

/// Record a packet accepted by an operator's `receive`.
pub fn record_packet_received(operator: &str) {
    counter!(
        "tagflow_packets_received_total",
        "operator" => operator.to_string()
    )
    .increment(1);
}

/// Record one item routed downstream on a channel.
pub fn record_items_emitted(operator: &str, channel: &str) {
    counter!(
        "tagflow_items_emitted_total",
        "operator" => operator.to_string(),
        "channel" => channel.to_string()
    )
    .increment(1);
}

/// Record a fault propagated out of `receive`, labeled by processing phase.
pub fn record_fault(operator: &str, phase: &str) {
    counter!(
        "tagflow_faults_total",
        "operator" => operator.to_string(),
        "phase" => phase.to_string()
    )
    .increment(1);
}

/// Record an item dropped on a channel with no registered downstream.
pub fn record_routing_miss(operator: &str) {
    counter!(
        "tagflow_routing_misses_total",
        "operator" => operator.to_string()
    )
    .increment(1);
}

/// Flow metrics aggregator
///
/// Aggregates per-packet observations in memory for summary reporting at
/// the end of a run.
#[derive(Debug, Clone, Default)]
pub struct FlowMetricsAggregator {
    /// Total packets processed
    pub total_packets: u64,

    /// Total items emitted downstream
    pub total_items: u64,

    /// Total faults propagated
    pub total_faults: u64,

    /// Total routing misses (silent drops)
    pub total_misses: u64,

    /// Items-per-packet fan-out statistics
    pub fanout_stats: RunningStats,

    /// Fault counts per processing phase
    pub fault_phases: std::collections::HashMap<String, u64>,
}

impl FlowMetricsAggregator {
    /// Create a new aggregator
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one processed packet and how many items it produced.
    pub fn record_packet(&mut self, items_emitted: u64) {
        self.total_packets += 1;
        self.total_items += items_emitted;
        self.fanout_stats.push(items_emitted as f64);
    }

    /// Record a fault by processing phase.
    pub fn record_fault(&mut self, phase: &str) {
        self.total_faults += 1;
        *self.fault_phases.entry(phase.to_string()).or_insert(0) += 1;
    }

    /// Record a routing miss.
    pub fn record_miss(&mut self) {
        self.total_misses += 1;
    }

    /// Produce a summary report.
    pub fn summary(&self) -> FlowSummary {
        FlowSummary {
            total_packets: self.total_packets,
            total_items: self.total_items,
            total_faults: self.total_faults,
            total_misses: self.total_misses,
            fault_rate: if self.total_packets > 0 {
                self.total_faults as f64 / self.total_packets as f64 * 100.0
            } else {
                0.0
            },
            fanout: StatsSummary::from(&self.fanout_stats),
            fault_phases: self.fault_phases.clone(),
        }
    }

    /// Reset all aggregated state.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Summary of aggregated flow metrics
#[derive(Debug, Clone, Default)]
pub struct FlowSummary {
    pub total_packets: u64,
    pub total_items: u64,
    pub total_faults: u64,
    pub total_misses: u64,
    pub fault_rate: f64,
    pub fanout: StatsSummary,
    pub fault_phases: std::collections::HashMap<String, u64>,
}

impl std::fmt::Display for FlowSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Flow Metrics Summary ===")?;
        writeln!(f, "Total packets: {}", self.total_packets)?;
        writeln!(f, "Total items emitted: {}", self.total_items)?;
        writeln!(
            f,
            "Faults: {} ({:.2}%)",
            self.total_faults, self.fault_rate
        )?;
        writeln!(f, "Routing misses: {}", self.total_misses)?;
        writeln!(f, "Fan-out (items/packet): {}", self.fanout)?;

        if !self.fault_phases.is_empty() {
            writeln!(f, "Fault phases:")?;
            for (phase, count) in &self.fault_phases {
                writeln!(f, "  {}: {}", phase, count)?;
            }
        }

        Ok(())
    }
}

/// Statistics summary
#[derive(Debug, Clone, Default)]
pub struct StatsSummary {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl From<&RunningStats> for StatsSummary {
    fn from(stats: &RunningStats) -> Self {
        Self {
            count: stats.count(),
            min: stats.min(),
            max: stats.max(),
            mean: stats.mean(),
            std_dev: stats.std_dev(),
        }
    }
}

impl std::fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.count == 0 {
            write!(f, "N/A")
        } else {
            write!(
                f,
                "min={:.3}, max={:.3}, mean={:.3}, std={:.3} (n={})",
                self.min, self.max, self.mean, self.std_dev, self.count
            )
        }
    }
}

/// Online statistics calculator (Welford's algorithm)
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    /// Push a new value
    pub fn push(&mut self, value: f64) {
        self.count += 1;

        if self.count == 1 {
            self.min = value;
            self.max = value;
            self.mean = value;
            self.m2 = 0.0;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);

            let delta = value - self.mean;
            self.mean += delta / self.count as f64;
            let delta2 = value - self.mean;
            self.m2 += delta * delta2;
        }
    }

    /// Sample count
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Mean value
    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.mean
        }
    }

    /// Sample variance
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    /// Standard deviation
    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    /// Minimum value
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Maximum value
    pub fn max(&self) -> f64 {
        self.max
    }
}
