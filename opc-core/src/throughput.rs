//! Frame-rate meter for the send path.
//!
//! Counts frames between reports and yields a [`ThroughputReport`]
//! once more than one window has elapsed since the previous one. The
//! client checks it on every `put_pixels` call, so reporting costs a
//! clock read and a comparison.

use std::fmt;
use std::time::{Duration, Instant};

/// Frames observed over one reporting window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThroughputReport {
    /// Frames recorded in the window.
    pub frames: u64,
    /// Wall-clock length of the window.
    pub elapsed: Duration,
}

impl ThroughputReport {
    /// Average time per frame in milliseconds.
    pub fn ms_per_frame(&self) -> f64 {
        if self.frames == 0 {
            return 0.0;
        }
        self.elapsed.as_secs_f64() * 1000.0 / self.frames as f64
    }

    /// Frames per second over the window.
    pub fn fps(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs <= 0.0 {
            return 0.0;
        }
        self.frames as f64 / secs
    }
}

impl fmt::Display for ThroughputReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.1} ms per frame ({:.1} fps)",
            self.ms_per_frame(),
            self.fps()
        )
    }
}

// ── ThroughputMeter ──────────────────────────────────────────────

/// Counts frames and reports the rate once per window.
///
/// The first recorded frame only arms the meter; it starts the first
/// window and is not counted.
#[derive(Debug, Clone)]
pub struct ThroughputMeter {
    /// Start of the current window, `None` until the first frame.
    last_report: Option<Instant>,
    /// Frames recorded since `last_report`.
    frames: u64,
    window: Duration,
}

impl ThroughputMeter {
    /// Create a meter that reports once per second.
    pub fn new() -> Self {
        Self::with_window(Duration::from_secs(1))
    }

    /// Create a meter with a custom reporting window.
    pub fn with_window(window: Duration) -> Self {
        Self {
            last_report: None,
            frames: 0,
            window,
        }
    }

    /// Record a frame at the current instant.
    pub fn record(&mut self) -> Option<ThroughputReport> {
        self.record_at(Instant::now())
    }

    /// Record with an explicit timestamp (useful for testing).
    pub fn record_at(&mut self, now: Instant) -> Option<ThroughputReport> {
        let Some(last) = self.last_report else {
            self.last_report = Some(now);
            self.frames = 0;
            return None;
        };

        self.frames += 1;
        let elapsed = now.saturating_duration_since(last);
        if elapsed <= self.window {
            return None;
        }

        let report = ThroughputReport {
            frames: self.frames,
            elapsed,
        };
        self.last_report = Some(now);
        self.frames = 0;
        Some(report)
    }

    /// Frames recorded in the current window.
    pub fn pending_frames(&self) -> u64 {
        self.frames
    }

    pub fn window(&self) -> Duration {
        self.window
    }
}

impl Default for ThroughputMeter {
    fn default() -> Self {
        Self::new()
    }
}

// ── Tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_frame_only_arms() {
        let mut meter = ThroughputMeter::new();
        let t0 = Instant::now();
        assert!(meter.record_at(t0).is_none());
        assert_eq!(meter.pending_frames(), 0);
    }

    #[test]
    fn no_report_within_window() {
        let mut meter = ThroughputMeter::new();
        let t0 = Instant::now();
        meter.record_at(t0);
        for i in 1..=10 {
            assert!(meter.record_at(t0 + Duration::from_millis(100 * i)).is_none());
        }
        assert_eq!(meter.pending_frames(), 10);
    }

    #[test]
    fn reports_after_window_and_resets() {
        let mut meter = ThroughputMeter::new();
        let t0 = Instant::now();
        meter.record_at(t0);
        for i in 1..40 {
            meter.record_at(t0 + Duration::from_millis(25 * i));
        }
        let report = meter
            .record_at(t0 + Duration::from_millis(1001))
            .expect("report after one second");
        assert_eq!(report.frames, 40);
        assert_eq!(report.elapsed, Duration::from_millis(1001));
        assert_eq!(meter.pending_frames(), 0);

        // Next window starts at the report time.
        assert!(meter.record_at(t0 + Duration::from_millis(1500)).is_none());
    }

    #[test]
    fn exactly_one_window_does_not_report() {
        let mut meter = ThroughputMeter::new();
        let t0 = Instant::now();
        meter.record_at(t0);
        assert!(meter.record_at(t0 + Duration::from_secs(1)).is_none());
    }

    #[test]
    fn report_math_and_display() {
        let report = ThroughputReport {
            frames: 50,
            elapsed: Duration::from_secs(2),
        };
        assert!((report.ms_per_frame() - 40.0).abs() < 1e-9);
        assert!((report.fps() - 25.0).abs() < 1e-9);
        assert_eq!(report.to_string(), "40.0 ms per frame (25.0 fps)");
    }

    #[test]
    fn custom_window() {
        let mut meter = ThroughputMeter::with_window(Duration::from_millis(100));
        let t0 = Instant::now();
        meter.record_at(t0);
        let report = meter.record_at(t0 + Duration::from_millis(150)).unwrap();
        assert_eq!(report.frames, 1);
    }
}
