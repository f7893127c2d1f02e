//! Converter metric recording.
//!
//! Thin wrappers over the `metrics` facade plus an in-memory aggregator
//! used for the end-of-run summary.

use metrics::{counter, gauge, histogram};

/// Record one emitted motion-compensated cloud.
///
/// Called by the orchestrator every time the assembler produces a cloud.
pub fn record_cloud_emitted(frame_counter: u64, point_count: usize) {
    counter!("deskew_clouds_emitted_total").increment(1);
    counter!("deskew_points_written_total").increment(point_count as u64);
    gauge!("deskew_last_frame_counter").set(frame_counter as f64);
    histogram!("deskew_cloud_points").record(point_count as f64);
}

/// Record one scan dropped for lack of an anchor pose.
pub fn record_scan_dropped() {
    counter!("deskew_scans_dropped_total").increment(1);
}

/// Record one message forwarded verbatim.
pub fn record_passthrough(topic: &str) {
    counter!("deskew_passthrough_total", "topic" => topic.to_string()).increment(1);
}

/// Record one message pulled from the input log.
pub fn record_message_read() {
    counter!("deskew_messages_read_total").increment(1);
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

/// Online statistics (Welford's algorithm)
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    /// Add a new value
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

    /// Mean
    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.mean
        }
    }

    /// Variance
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

    /// Minimum
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Maximum
    pub fn max(&self) -> f64 {
        self.max
    }
}
