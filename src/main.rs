//! Motion Detection CLI
//!
//! Runs the detector over a synthetic camera feed and reports motion
//! statistics while frames are processed on a worker thread.

use clap::Parser;
use motion_detection::{
    analysis::{FrameRateTracker, MotionAlarm},
    capture::{Camera, ChannelLayout, FileConfig, MockCamera},
    detection::{FrameOutcome, MotionDetector, MotionMonitor, StrategyKind},
    metrics::{MetricsRegistry, MetricsSnapshot},
};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{error, info, warn};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Detection strategy (two_frame or blob).
    #[arg(long)]
    strategy: Option<StrategyKind>,
    /// Per-pixel difference threshold (1-255).
    #[arg(long)]
    threshold: Option<u8>,
    /// Channel layout of the synthetic feed.
    #[arg(long)]
    layout: Option<ChannelLayout>,
    /// Number of frames to process before exiting.
    #[arg(long)]
    frames: Option<u32>,
    /// Run until interrupted.
    #[arg(long)]
    continuous: bool,
    /// Report connected regions of motion.
    #[arg(long)]
    regions: bool,
    /// Port for the Prometheus endpoint.
    #[arg(long)]
    metrics_port: Option<u16>,
}

impl Args {
    fn apply(&self, config: &mut FileConfig) {
        if let Some(strategy) = self.strategy {
            config.detector.strategy = strategy;
        }
        if let Some(threshold) = self.threshold {
            config.detector.threshold = threshold;
        }
        if let Some(layout) = self.layout {
            config.capture.layout = layout;
        }
        if let Some(frames) = self.frames {
            config.output.frame_count = frames;
        }
        if self.continuous {
            config.output.continuous = true;
        }
        if self.regions {
            config.detector.extract_regions = true;
        }
        if let Some(port) = self.metrics_port {
            config.output.metrics_port = port;
        }
    }
}

/// Totals handed back by the worker thread.
#[derive(Debug, Default)]
struct RunSummary {
    frames: u64,
    detected: u64,
    skipped: u64,
    failed: u64,
    alarms: u64,
    average_fps: f64,
}

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => match FileConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Failed to load {}: {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => FileConfig::default(),
    };
    args.apply(&mut config);

    if let Err(e) = config.validate() {
        eprintln!("Invalid configuration: {}", e);
        std::process::exit(1);
    }

    info!("Motion Detection v{}", motion_detection::VERSION);
    info!(
        strategy = %config.detector.strategy,
        threshold = config.detector.threshold,
        layout = %config.capture.layout,
        "Using mock camera input"
    );

    let mut camera = MockCamera::new();
    if let Err(e) = camera.open(&config.capture) {
        eprintln!("Failed to open camera: {}", e);
        std::process::exit(1);
    }

    let detector = match MotionDetector::new(config.detector.clone()) {
        Ok(detector) => detector,
        Err(e) => {
            eprintln!("Failed to create detector: {}", e);
            std::process::exit(1);
        }
    };
    let monitor = detector.monitor();

    let registry = match MetricsRegistry::new() {
        Ok(registry) => registry,
        Err(e) => {
            eprintln!("Failed to create metrics registry: {}", e);
            std::process::exit(1);
        }
    };

    let running = Arc::new(AtomicBool::new(true));
    {
        let running = Arc::clone(&running);
        if let Err(e) = ctrlc::set_handler(move || running.store(false, Ordering::SeqCst)) {
            warn!("Failed to install Ctrl-C handler: {}", e);
        }
    }

    let publisher = start_metrics(&config, registry, monitor.clone());

    let worker = {
        let running = Arc::clone(&running);
        let config = config.clone();
        let monitor = monitor.clone();
        thread::spawn(move || run_pipeline(camera, detector, monitor, &config, &running, publisher))
    };

    let interval = Duration::from_millis(config.output.report_interval_ms.max(1));
    while !worker.is_finished() {
        thread::sleep(interval);
        report(&monitor);
    }

    running.store(false, Ordering::SeqCst);
    match worker.join() {
        Ok(summary) => info!(
            frames = summary.frames,
            detected = summary.detected,
            skipped = summary.skipped,
            failed = summary.failed,
            alarms = summary.alarms,
            average_fps = format!("{:.1}", summary.average_fps),
            "Done"
        ),
        Err(_) => {
            error!("Detection thread panicked");
            std::process::exit(1);
        }
    }
}

/// Consecutive capture failures after which the run stops.
const MAX_CAPTURE_FAILURES: u32 = 10;

/// Receives metric snapshots from the worker thread.
type Publisher = Box<dyn FnMut(&MetricsSnapshot) + Send>;

fn run_pipeline(
    mut camera: impl Camera,
    mut detector: MotionDetector,
    monitor: MotionMonitor,
    config: &FileConfig,
    running: &AtomicBool,
    mut publish: Publisher,
) -> RunSummary {
    let mut alarm = MotionAlarm::new(config.alarm.clone());
    let mut rate = FrameRateTracker::new();
    let mut summary = RunSummary::default();
    let frame_interval = config.capture.frame_interval();
    let mut consecutive_failures = 0;

    while running.load(Ordering::SeqCst)
        && (config.output.continuous
            || summary.frames + summary.failed < config.output.frame_count as u64)
    {
        let started = Instant::now();
        let mut frame = match camera.capture() {
            Ok(frame) => {
                consecutive_failures = 0;
                frame
            }
            Err(e) => {
                summary.failed += 1;
                consecutive_failures += 1;
                warn!(consecutive_failures, "Frame capture failed: {}", e);
                if consecutive_failures >= MAX_CAPTURE_FAILURES {
                    error!("Giving up after {} consecutive capture failures", consecutive_failures);
                    break;
                }
                thread::sleep(frame_interval);
                continue;
            }
        };

        let current = rate.record(frame.timestamp());
        summary.frames = current.frames;
        summary.average_fps = current.average_fps;

        match detector.process_frame(&mut frame) {
            FrameOutcome::Detected(report) => {
                summary.detected += 1;
                if let Some(event) = alarm.observe(&report.statistics) {
                    info!(
                        sequence = event.sequence,
                        raised_at = %event.raised_at,
                        "Motion detected"
                    );
                }
                for region in &report.regions {
                    info!(
                        x = region.x,
                        y = region.y,
                        width = region.width,
                        height = region.height,
                        area = region.area,
                        "Motion region"
                    );
                }
            }
            FrameOutcome::Skipped(_) => summary.skipped += 1,
            FrameOutcome::ReferenceEstablished | FrameOutcome::Priming { .. } => {}
        }

        publish(&MetricsSnapshot::from_components(
            &monitor,
            &alarm,
            &current,
            summary.skipped,
        ));

        if let Some(remaining) = frame_interval.checked_sub(started.elapsed()) {
            thread::sleep(remaining);
        }
    }

    summary.alarms = alarm.events_raised();
    camera.close();
    summary
}

fn report(monitor: &MotionMonitor) {
    let stats = monitor.statistics();
    info!(
        sequence = stats.sequence,
        changed = stats.changed_pixels,
        level = format!("{:.4}", stats.motion_level()),
        "Motion status"
    );
}

#[cfg(feature = "metrics")]
fn start_metrics(config: &FileConfig, registry: MetricsRegistry, monitor: MotionMonitor) -> Publisher {
    use motion_detection::metrics::{MetricsServer, MetricsServerConfig};

    if config.output.metrics_port == 0 {
        return Box::new(move |snapshot| registry.update(snapshot));
    }

    let server = MetricsServer::new(
        MetricsServerConfig::with_port(config.output.metrics_port),
        registry,
        monitor,
    );
    let state = server.state();

    thread::spawn(move || {
        let runtime = match tokio::runtime::Runtime::new() {
            Ok(runtime) => runtime,
            Err(e) => {
                error!("Failed to start metrics runtime: {}", e);
                return;
            }
        };
        if let Err(e) = runtime.block_on(server.run()) {
            error!("Metrics server stopped: {}", e);
        }
    });

    Box::new(move |snapshot| state.blocking_read().update(snapshot))
}

#[cfg(not(feature = "metrics"))]
fn start_metrics(_config: &FileConfig, registry: MetricsRegistry, _monitor: MotionMonitor) -> Publisher {
    Box::new(move |snapshot| registry.update(snapshot))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quick_config() -> FileConfig {
        let mut config = FileConfig::default();
        config.capture.fps = 120;
        config.capture.width = 32;
        config.capture.height = 24;
        config
    }

    #[test]
    fn test_pipeline_stops_when_capture_keeps_failing() {
        let mut config = quick_config();
        config.output.continuous = true;
        let detector = MotionDetector::new(config.detector.clone()).unwrap();
        let monitor = detector.monitor();
        let running = AtomicBool::new(true);

        // Never opened, so every capture fails.
        let summary = run_pipeline(
            MockCamera::new(),
            detector,
            monitor,
            &config,
            &running,
            Box::new(|_| {}),
        );

        assert_eq!(summary.frames, 0);
        assert_eq!(summary.failed, MAX_CAPTURE_FAILURES as u64);
    }

    #[test]
    fn test_pipeline_processes_requested_frames() {
        let mut config = quick_config();
        config.output.frame_count = 12;
        let mut camera = MockCamera::with_motion(4, 2);
        camera.open(&config.capture).unwrap();
        let detector = MotionDetector::new(config.detector.clone()).unwrap();
        let monitor = detector.monitor();
        let running = AtomicBool::new(true);

        let summary = run_pipeline(camera, detector, monitor, &config, &running, Box::new(|_| {}));

        assert_eq!(summary.frames, 12);
        assert_eq!(summary.failed, 0);
        assert_eq!(summary.detected, 11);
    }
}
