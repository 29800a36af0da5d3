//! The accumulation loop and its producer handle.
//!
//! A single consumer task owns the pending buffer. Producers hand
//! submissions over a capacity-1 channel, so a sender waits until the
//! consumer is ready - natural backpressure, no queueing beyond one
//! in-flight item. Each loop iteration waits on whichever comes first:
//!
//! 1. a command (submission or shutdown) arrives
//! 2. the idle window elapses
//!
//! A submission that brings the buffer to the size threshold flushes
//! immediately; an elapsed idle window flushes whatever is pending (a
//! no-op when empty); shutdown flushes, acknowledges, and ends the task.
//! Delivery runs inline, so the timer and intake are paused while a
//! request is on the wire and at most one request is in flight.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

use pointcast_protocol::{merge, validate_metric_name, Dimensions, Point, WriteBatch};

use crate::config::ReporterConfig;
use crate::delivery::DeliveryClient;
use crate::error::ReportError;

/// Commands sent to the consumer task.
///
/// Both ride the same FIFO channel, so every submission sent before a
/// shutdown is appended to the buffer before the shutdown is seen.
enum ReporterCommand {
    Submit(WriteBatch),
    Shutdown(oneshot::Sender<()>),
}

/// Handle for submitting measurements to the pipeline.
///
/// Cheap to clone and shareable across tasks. Sending blocks while the
/// consumer is busy (see module docs).
#[derive(Clone)]
pub struct ReporterHandle {
    tx: mpsc::Sender<ReporterCommand>,
    pub(crate) stats_running: Arc<AtomicBool>,
}

impl ReporterHandle {
    /// Validate and submit one measurement.
    ///
    /// The name is checked synchronously; a failing name never reaches
    /// the pipeline. On success the point is buffered for the next flush.
    /// Returns [`ReportError::PipelineClosed`] once the consumer has shut
    /// down.
    pub async fn report(
        &self,
        metric: &str,
        value: f64,
        timestamp: Option<SystemTime>,
        context: impl Into<String>,
        dimensions: Dimensions,
    ) -> Result<(), ReportError> {
        validate_metric_name(metric)?;

        let mut point = Point::new(value)
            .with_context(context)
            .with_dimensions(dimensions);
        if let Some(ts) = timestamp {
            point.timestamp = Some(epoch_secs(ts));
        }

        self.submit(WriteBatch::single(metric, point)).await
    }

    /// Submit a pre-built batch.
    ///
    /// Blocks until the consumer accepts it. Metric names inside the
    /// batch are not re-validated here.
    pub async fn submit(&self, batch: WriteBatch) -> Result<(), ReportError> {
        self.tx
            .send(ReporterCommand::Submit(batch))
            .await
            .map_err(|_| ReportError::PipelineClosed)
    }

    /// Flush pending measurements and stop the consumer task.
    ///
    /// Resolves only after the final delivery attempt has finished; once
    /// it returns, this pipeline instance issues no further requests.
    /// Submissions already accepted are included in the final flush.
    /// Must not be called twice: the second call observes the closed
    /// channel and returns [`ReportError::PipelineClosed`].
    pub async fn shutdown(&self) -> Result<(), ReportError> {
        let (ack_tx, ack_rx) = oneshot::channel();
        self.tx
            .send(ReporterCommand::Shutdown(ack_tx))
            .await
            .map_err(|_| ReportError::PipelineClosed)?;
        ack_rx.await.map_err(|_| ReportError::PipelineClosed)
    }
}

fn epoch_secs(ts: SystemTime) -> i64 {
    match ts.duration_since(UNIX_EPOCH) {
        Ok(elapsed) => elapsed.as_secs() as i64,
        // Pre-epoch timestamps collapse to "unset"
        Err(_) => 0,
    }
}

/// The consumer task: accumulates submissions and flushes windows.
pub struct Reporter {
    config: ReporterConfig,
    rx: mpsc::Receiver<ReporterCommand>,
    delivery: DeliveryClient,
    pending: Vec<WriteBatch>,
}

impl Reporter {
    /// Create a reporter and its handle.
    ///
    /// The reporter must be driven by [`run`](Self::run), usually via
    /// [`spawn`].
    pub fn new(delivery: DeliveryClient, config: ReporterConfig) -> (Self, ReporterHandle) {
        // Capacity 1: rendezvous-style handoff, producers serialize here.
        let (tx, rx) = mpsc::channel(1);

        let reporter = Self {
            config,
            rx,
            delivery,
            pending: Vec::new(),
        };
        let handle = ReporterHandle {
            tx,
            stats_running: Arc::new(AtomicBool::new(false)),
        };

        (reporter, handle)
    }

    /// Run the accumulation loop until shutdown.
    ///
    /// Ends when a shutdown command arrives or every handle has been
    /// dropped; both paths flush pending submissions first.
    pub async fn run(mut self) {
        debug!(
            url = %self.delivery.url(),
            flush_interval_ms = self.config.flush_interval.as_millis() as u64,
            max_pending = self.config.max_pending,
            "metrics reporter started"
        );

        loop {
            // The sleep is recreated every iteration: the window measures
            // idleness from the start of the iteration, not wall clock.
            tokio::select! {
                cmd = self.rx.recv() => match cmd {
                    Some(ReporterCommand::Submit(batch)) => {
                        self.pending.push(batch);
                        if self.pending.len() >= self.config.max_pending {
                            self.flush().await;
                        }
                    }
                    Some(ReporterCommand::Shutdown(ack)) => {
                        self.flush().await;
                        let _ = ack.send(());
                        debug!("metrics reporter shut down");
                        return;
                    }
                    None => {
                        self.flush().await;
                        debug!("all reporter handles dropped, stopping");
                        return;
                    }
                },
                _ = tokio::time::sleep(self.config.flush_interval) => {
                    self.flush().await;
                }
            }
        }
    }

    /// Merge and deliver the pending window.
    ///
    /// The buffer is reset regardless of the delivery outcome: a failed
    /// window is dropped, not re-queued.
    async fn flush(&mut self) {
        let pending = std::mem::take(&mut self.pending);
        let Some(series) = merge(pending) else {
            return;
        };

        let point_count: usize = series.iter().map(|s| s.points.len()).sum();
        match self.delivery.deliver(&series).await {
            Ok(()) => {
                debug!(series = series.len(), points = point_count, "flushed window");
            }
            Err(e) => {
                warn!(
                    error = %e,
                    series = series.len(),
                    points = point_count,
                    "delivery failed, dropping window"
                );
            }
        }
    }
}

/// Spawn the reporter as a background task and return its handle.
pub fn spawn(delivery: DeliveryClient, config: ReporterConfig) -> ReporterHandle {
    let (reporter, handle) = Reporter::new(delivery, config);
    tokio::spawn(reporter.run());
    handle
}

#[cfg(test)]
#[path = "reporter_test.rs"]
mod reporter_test;
