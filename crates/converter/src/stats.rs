//! Converter run statistics.

use std::time::Duration;

use observability::{RunningStats, StatsSummary};

/// Counters from one converter run
#[derive(Debug, Clone, Default)]
pub struct ConverterStats {
    /// Messages pulled from the input log
    pub messages_read: u64,

    /// Messages forwarded verbatim
    pub messages_passed_through: u64,

    /// Scan messages handed to the assembler
    pub scans_processed: u64,

    /// Clouds written to the output log
    pub clouds_emitted: u64,

    /// Scans dropped for lack of an anchor pose
    pub scans_dropped_no_anchor: u64,

    /// Packets whose points made it into a cloud
    pub packets_assembled: u64,

    /// Packets skipped for lack of a per-packet transform
    pub packets_skipped: u64,

    /// Points written across all clouds
    pub points_written: u64,

    /// Cloud size distribution
    pub cloud_sizes: RunningStats,

    /// Wall-clock duration of the run
    pub duration: Duration,
}

impl ConverterStats {
    /// Messages per second throughput
    pub fn throughput(&self) -> f64 {
        if self.duration.as_secs_f64() > 0.0 {
            self.messages_read as f64 / self.duration.as_secs_f64()
        } else {
            0.0
        }
    }

    /// Dropped scans as a percentage of attempted scans
    pub fn drop_rate(&self) -> f64 {
        let attempted = self.clouds_emitted + self.scans_dropped_no_anchor;
        if attempted > 0 {
            (self.scans_dropped_no_anchor as f64 / attempted as f64) * 100.0
        } else {
            0.0
        }
    }

    /// Print detailed summary
    pub fn print_summary(&self) {
        println!("\n╔══════════════════════════════════════════════════════════════╗");
        println!("║                    Conversion Statistics                     ║");
        println!("╚══════════════════════════════════════════════════════════════╝\n");

        println!("Overview");
        println!("   ├─ Duration: {:.2}s", self.duration.as_secs_f64());
        println!("   ├─ Messages read: {}", self.messages_read);
        println!("   ├─ Messages passed through: {}", self.messages_passed_through);
        println!("   ├─ Throughput: {:.2} msg/s", self.throughput());
        println!("   └─ Points written: {}", self.points_written);

        println!("\nScan Assembly");
        println!("   ├─ Scans processed: {}", self.scans_processed);
        println!("   ├─ Clouds emitted: {}", self.clouds_emitted);
        println!(
            "   ├─ Scans dropped (no anchor pose): {} ({:.2}%)",
            self.scans_dropped_no_anchor,
            self.drop_rate()
        );
        println!("   ├─ Packets assembled: {}", self.packets_assembled);
        println!("   ├─ Packets skipped (no transform): {}", self.packets_skipped);
        println!("   └─ Cloud size: {}", StatsSummary::from(&self.cloud_sizes));

        println!();
    }
}
