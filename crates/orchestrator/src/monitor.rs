// crates/orchestrator/src/monitor.rs
//! Background resource sampler for long batch runs.
//!
//! Purely advisory: warns when CPU or memory utilization crosses a threshold
//! and logs a utilization line every few minutes. Sampling failures back the
//! loop off; nothing here affects job execution.

use std::time::{Duration, Instant};

use sysinfo::System;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Sampler thresholds and intervals.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    pub sample_interval: Duration,
    pub error_backoff: Duration,
    pub report_interval: Duration,
    pub cpu_warn_pct: f32,
    pub mem_warn_pct: f32,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            sample_interval: Duration::from_secs(30),
            error_backoff: Duration::from_secs(60),
            report_interval: Duration::from_secs(300),
            cpu_warn_pct: 90.0,
            mem_warn_pct: 85.0,
        }
    }
}

/// One utilization snapshot, in percent.
#[derive(Debug, Clone, Copy)]
pub struct ResourceSample {
    pub cpu_pct: f32,
    pub mem_pct: f32,
}

/// Take one blocking sample. CPU usage needs two refreshes a short interval
/// apart, so this runs inside `spawn_blocking`.
fn sample_blocking() -> ResourceSample {
    let mut sys = System::new();
    sys.refresh_cpu_usage();
    std::thread::sleep(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL);
    sys.refresh_cpu_usage();
    sys.refresh_memory();

    let total = sys.total_memory();
    let mem_pct = if total > 0 {
        (sys.used_memory() as f64 / total as f64 * 100.0) as f32
    } else {
        0.0
    };

    ResourceSample {
        cpu_pct: sys.global_cpu_usage(),
        mem_pct,
    }
}

/// Handle to the running sampler task.
pub struct ResourceMonitor {
    token: CancellationToken,
    handle: JoinHandle<()>,
}

impl ResourceMonitor {
    /// Spawn the sampler loop.
    pub fn start(config: MonitorConfig) -> Self {
        let token = CancellationToken::new();
        let loop_token = token.clone();
        let handle = tokio::spawn(async move {
            tracing::info!("Resource monitoring started");
            let mut last_report = Instant::now();

            loop {
                let delay = match tokio::task::spawn_blocking(sample_blocking).await {
                    Ok(sample) => {
                        if sample.cpu_pct > config.cpu_warn_pct {
                            tracing::warn!(cpu_pct = sample.cpu_pct, "High CPU usage");
                        }
                        if sample.mem_pct > config.mem_warn_pct {
                            tracing::warn!(mem_pct = sample.mem_pct, "High memory usage");
                        }
                        if last_report.elapsed() >= config.report_interval {
                            tracing::info!(
                                cpu_pct = sample.cpu_pct,
                                mem_pct = sample.mem_pct,
                                "Resource utilization"
                            );
                            last_report = Instant::now();
                        }
                        config.sample_interval
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "Resource sampling failed, backing off");
                        config.error_backoff
                    }
                };

                tokio::select! {
                    _ = loop_token.cancelled() => break,
                    _ = tokio::time::sleep(delay) => {}
                }
            }
            tracing::info!("Resource monitoring stopped");
        });

        Self { token, handle }
    }

    /// Cancel the sampler and wait for it to wind down.
    pub async fn stop(self) {
        self.token.cancel();
        let _ = self.handle.await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_is_in_percent_range() {
        let sample = sample_blocking();
        assert!(sample.cpu_pct >= 0.0);
        assert!(sample.mem_pct >= 0.0 && sample.mem_pct <= 100.0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_monitor_stops_promptly() {
        let monitor = ResourceMonitor::start(MonitorConfig {
            sample_interval: Duration::from_millis(50),
            error_backoff: Duration::from_millis(50),
            report_interval: Duration::from_secs(300),
            ..MonitorConfig::default()
        });

        tokio::time::sleep(Duration::from_millis(150)).await;

        tokio::time::timeout(Duration::from_secs(5), monitor.stop())
            .await
            .expect("monitor should stop within the timeout");
    }
}
