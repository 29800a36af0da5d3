//! Periodic process-statistics producer.
//!
//! An optional sampler task that reports process-level measurements
//! (thread count, resident/virtual memory, open file descriptors,
//! uptime) through the ordinary report path, under a caller-supplied
//! metric prefix. Samples come from `/proc/self` on Linux; on other
//! platforms unavailable statistics are skipped rather than reported as
//! zero.

use std::sync::atomic::Ordering;
use std::time::{Duration, Instant, SystemTime};

use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use pointcast_protocol::Dimensions;

use crate::reporter::ReporterHandle;

/// Sampler configuration.
#[derive(Debug, Clone)]
pub struct RuntimeStatsConfig {
    /// Metric name prefix, e.g. `myapp` yields `myapp.threads`
    pub prefix: String,

    /// Context attached to every sampled point
    pub context: String,

    /// Dimensions attached to every sampled point
    pub dimensions: Dimensions,

    /// Sampling period
    pub interval: Duration,
}

impl RuntimeStatsConfig {
    /// Create a config with an empty context and no dimensions.
    pub fn new(prefix: impl Into<String>, interval: Duration) -> Self {
        Self {
            prefix: prefix.into(),
            context: String::new(),
            dimensions: Dimensions::new(),
            interval,
        }
    }

    /// Set the context tag.
    #[must_use]
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = context.into();
        self
    }

    /// Set the dimension tags.
    #[must_use]
    pub fn with_dimensions(mut self, dimensions: Dimensions) -> Self {
        self.dimensions = dimensions;
        self
    }
}

/// Stops the sampler when asked.
///
/// The sampler also stops on its own when the pipeline shuts down.
pub struct RuntimeStatsHandle {
    token: CancellationToken,
}

impl RuntimeStatsHandle {
    /// Stop the sampler. Idempotent.
    pub fn stop(&self) {
        self.token.cancel();
    }
}

impl ReporterHandle {
    /// Start the runtime-stats sampler.
    ///
    /// At most one sampler runs per pipeline at a time; a second start
    /// while one is running is rejected with a warning and returns
    /// `None`.
    pub fn start_runtime_stats(&self, config: RuntimeStatsConfig) -> Option<RuntimeStatsHandle> {
        if self
            .stats_running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            warn!("runtime stats reporting is already running");
            return None;
        }

        let token = CancellationToken::new();
        tokio::spawn(run_sampler(self.clone(), config, token.clone()));
        Some(RuntimeStatsHandle { token })
    }
}

async fn run_sampler(reporter: ReporterHandle, config: RuntimeStatsConfig, token: CancellationToken) {
    debug!(
        prefix = %config.prefix,
        interval_ms = config.interval.as_millis() as u64,
        "runtime stats sampler started"
    );

    let started = Instant::now();
    let mut ticker = tokio::time::interval(config.interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = token.cancelled() => break,
            _ = ticker.tick() => {
                if let Err(e) = report_sample(&reporter, &config, started).await {
                    warn!(error = %e, "runtime stats report failed, stopping sampler");
                    break;
                }
            }
        }
    }

    reporter.stats_running.store(false, Ordering::SeqCst);
    debug!("runtime stats sampler stopped");
}

async fn report_sample(
    reporter: &ReporterHandle,
    config: &RuntimeStatsConfig,
    started: Instant,
) -> Result<(), crate::error::ReportError> {
    let now = SystemTime::now();
    let sample = sample_process();

    let mut measurements = vec![(
        format!("{}.uptime", config.prefix),
        started.elapsed().as_secs_f64(),
    )];
    if let Some(threads) = sample.threads {
        measurements.push((format!("{}.threads", config.prefix), threads));
    }
    if let Some(resident) = sample.resident_bytes {
        measurements.push((format!("{}.memory.resident", config.prefix), resident));
    }
    if let Some(virt) = sample.virtual_bytes {
        measurements.push((format!("{}.memory.virtual", config.prefix), virt));
    }
    if let Some(fds) = sample.open_fds {
        measurements.push((format!("{}.fds", config.prefix), fds));
    }

    for (metric, value) in measurements {
        reporter
            .report(
                &metric,
                value,
                Some(now),
                config.context.clone(),
                config.dimensions.clone(),
            )
            .await?;
    }
    Ok(())
}

/// One snapshot of process statistics. `None` means unavailable on this
/// platform.
#[derive(Debug, Default)]
struct ProcessSample {
    threads: Option<f64>,
    resident_bytes: Option<f64>,
    virtual_bytes: Option<f64>,
    open_fds: Option<f64>,
}

#[cfg(target_os = "linux")]
fn sample_process() -> ProcessSample {
    let mut sample = ProcessSample::default();

    if let Ok(status) = std::fs::read_to_string("/proc/self/status") {
        for line in status.lines() {
            if let Some(rest) = line.strip_prefix("Threads:") {
                sample.threads = rest.trim().parse().ok();
            } else if let Some(rest) = line.strip_prefix("VmRSS:") {
                sample.resident_bytes = parse_kb(rest);
            } else if let Some(rest) = line.strip_prefix("VmSize:") {
                sample.virtual_bytes = parse_kb(rest);
            }
        }
    }

    sample.open_fds = std::fs::read_dir("/proc/self/fd")
        .ok()
        .map(|entries| entries.count() as f64);

    sample
}

#[cfg(not(target_os = "linux"))]
fn sample_process() -> ProcessSample {
    ProcessSample::default()
}

/// Parse a `/proc/self/status` value of the form `  1234 kB`.
#[cfg(target_os = "linux")]
fn parse_kb(rest: &str) -> Option<f64> {
    rest.trim()
        .strip_suffix("kB")
        .and_then(|v| v.trim().parse::<f64>().ok())
        .map(|kb| kb * 1024.0)
}
