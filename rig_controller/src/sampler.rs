//! Periodic telemetry sampler.
//!
//! Reads the channel once per tick, normalises the record and publishes it to
//! the store. Short or malformed records skip the tick and keep the previous
//! sample. A missing channel stops the controller.

use crate::telemetry::{normalize, TelemetryError, TelemetrySource, TelemetryStore};
use rig_common::controller::config::TelemetryConfig;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

/// Skipped ticks between warnings.
const SKIP_WARN_INTERVAL: u64 = 100;

/// Sampler timing statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SamplerStats {
    /// Ticks executed
    pub cycle_count: u64,
    /// Samples published
    pub published: u64,
    /// Ticks skipped on a bad record
    pub skipped: u64,
    /// Ticks that ran longer than the period
    pub timing_violations: u64,
    /// Longest tick
    pub max_cycle_time_us: u64,
    /// Sum of tick durations
    pub total_cycle_time_us: u64,
}

impl SamplerStats {
    /// Mean tick duration.
    pub fn avg_cycle_time_us(&self) -> u64 {
        if self.cycle_count == 0 {
            0
        } else {
            self.total_cycle_time_us / self.cycle_count
        }
    }
}

/// Outcome of one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    Published,
    Skipped,
}

/// Timer-driven telemetry reader.
pub struct Sampler {
    source: Box<dyn TelemetrySource>,
    store: Arc<TelemetryStore>,
    running: Arc<AtomicBool>,
    period: Duration,
    velocity_scale: f64,
    stats: SamplerStats,
}

impl Sampler {
    pub fn new(
        source: Box<dyn TelemetrySource>,
        store: Arc<TelemetryStore>,
        running: Arc<AtomicBool>,
        config: &TelemetryConfig,
    ) -> Self {
        Self {
            source,
            store,
            running,
            period: config.period(),
            velocity_scale: config.velocity_scale,
            stats: SamplerStats::default(),
        }
    }

    pub const fn stats(&self) -> SamplerStats {
        self.stats
    }

    /// Read the channel once.
    ///
    /// # Errors
    /// Only fatal telemetry errors.
    pub fn tick(&mut self) -> Result<Tick, TelemetryError> {
        match self.source.read_latest() {
            Ok(raw) => {
                self.store.publish(normalize(&raw, self.velocity_scale));
                self.stats.published += 1;
                Ok(Tick::Published)
            }
            Err(e) if e.is_fatal() => Err(e),
            Err(e) => {
                self.stats.skipped += 1;
                if self.stats.skipped % SKIP_WARN_INTERVAL == 0 {
                    warn!("{} telemetry ticks skipped so far (last: {})", self.stats.skipped, e);
                } else {
                    debug!("Telemetry tick skipped: {}", e);
                }
                Ok(Tick::Skipped)
            }
        }
    }

    /// Tick every period until the running flag clears or the channel disappears.
    ///
    /// A fatal error clears the running flag and wakes the dispatcher before
    /// returning.
    ///
    /// # Errors
    /// The fatal `TelemetryError`.
    pub fn run(mut self) -> Result<SamplerStats, TelemetryError> {
        info!(
            "Sampler started on {} (period={}ms, rt={})",
            self.source.describe(),
            self.period.as_millis(),
            detect_rt_mode()
        );
        let period_us = self.period.as_micros() as u64;

        while self.running.load(Ordering::Acquire) {
            let cycle_start = Instant::now();

            if let Err(e) = self.tick() {
                error!("Telemetry channel lost: {}", e);
                self.running.store(false, Ordering::Release);
                self.store.wake_all();
                return Err(e);
            }

            let cycle_time_us = cycle_start.elapsed().as_micros() as u64;
            self.stats.cycle_count += 1;
            self.stats.total_cycle_time_us += cycle_time_us;
            self.stats.max_cycle_time_us = self.stats.max_cycle_time_us.max(cycle_time_us);

            if cycle_time_us > period_us {
                self.stats.timing_violations += 1;
                if self.stats.timing_violations <= 10 || self.stats.timing_violations % 1000 == 0 {
                    warn!(
                        "Timing violation #{}: tick took {}us (period {}us)",
                        self.stats.timing_violations, cycle_time_us, period_us
                    );
                }
            }

            let elapsed = cycle_start.elapsed();
            if elapsed < self.period {
                std::thread::sleep(self.period - elapsed);
            }
        }

        info!(
            "Sampler stopped after {} ticks ({} published, {} skipped, avg={}us, max={}us, violations={})",
            self.stats.cycle_count,
            self.stats.published,
            self.stats.skipped,
            self.stats.avg_cycle_time_us(),
            self.stats.max_cycle_time_us,
            self.stats.timing_violations
        );
        Ok(self.stats)
    }
}

/// Whether the calling thread runs under a real-time scheduling policy.
pub fn detect_rt_mode() -> bool {
    #[cfg(target_os = "linux")]
    {
        use libc::{sched_getscheduler, SCHED_FIFO, SCHED_RR};
        // SAFETY: sched_getscheduler(0) only queries the calling thread's policy.
        unsafe {
            let policy = sched_getscheduler(0);
            policy == SCHED_FIFO || policy == SCHED_RR
        }
    }
    #[cfg(not(target_os = "linux"))]
    {
        false
    }
}
