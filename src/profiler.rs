//! Lightweight timing of render calls.
//!
//! A `Profiler` brackets a piece of work with `start` and `stop`. The first few cycles are
//! ignored so that caches, allocators and the host have settled; after that, every
//! `report_interval` cycles a summary is logged and the statistics window starts again.

use std::fmt;
use std::time::{Duration, Instant};

use log::info;

use crate::config::ProfilerConfig;

/// Summary of one window of measured cycles.
#[derive(Clone, Debug, PartialEq)]
pub struct ProfileReport {
    pub name: &'static str,
    pub cycles: u32,
    pub mean: Duration,
    pub min: Duration,
    pub max: Duration,
}

impl fmt::Display for ProfileReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} cycles, mean {:?}, min {:?}, max {:?}",
            self.name, self.cycles, self.mean, self.min, self.max
        )
    }
}

pub struct Profiler {
    name: &'static str,
    config: ProfilerConfig,
    warmup_remaining: u32,
    started: Option<Instant>,

    cycles: u32,
    total: Duration,
    min: Duration,
    max: Duration,
}

impl Profiler {
    pub fn new(name: &'static str, config: ProfilerConfig) -> Self {
        Self {
            name,
            warmup_remaining: config.warmup_cycles,
            config,
            started: None,
            cycles: 0,
            total: Duration::default(),
            min: Duration::default(),
            max: Duration::default(),
        }
    }

    /// Discards all measurements and restarts the warm-up period.
    pub fn reset(&mut self) {
        self.warmup_remaining = self.config.warmup_cycles;
        self.started = None;
        self.clear_window();
    }

    pub fn start(&mut self) {
        if self.config.enabled {
            self.started = Some(Instant::now());
        }
    }

    /// Ends the cycle begun by `start`. A `stop` without a matching `start` is ignored.
    pub fn stop(&mut self) {
        if let Some(started) = self.started.take() {
            if let Some(report) = self.record(started.elapsed()) {
                info!("{}", report);
            }
        }
    }

    /// Accounts for one cycle that took `elapsed`, returning a report if this cycle completed a
    /// window.
    pub fn record(&mut self, elapsed: Duration) -> Option<ProfileReport> {
        if self.warmup_remaining > 0 {
            self.warmup_remaining -= 1;
            return None;
        }

        if self.cycles == 0 || elapsed < self.min {
            self.min = elapsed;
        }
        if elapsed > self.max {
            self.max = elapsed;
        }
        self.total += elapsed;
        self.cycles += 1;

        if self.cycles < self.config.report_interval.max(1) {
            return None;
        }

        let report = ProfileReport {
            name: self.name,
            cycles: self.cycles,
            mean: self.total / self.cycles,
            min: self.min,
            max: self.max,
        };
        self.clear_window();
        Some(report)
    }

    fn clear_window(&mut self) {
        self.cycles = 0;
        self.total = Duration::default();
        self.min = Duration::default();
        self.max = Duration::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profiler(warmup_cycles: u32, report_interval: u32) -> Profiler {
        Profiler::new(
            "test",
            ProfilerConfig {
                enabled: true,
                warmup_cycles,
                report_interval,
            },
        )
    }

    #[test]
    fn warmup_cycles_are_discarded() {
        let mut p = profiler(2, 1);
        assert_eq!(p.record(Duration::from_millis(100)), None);
        assert_eq!(p.record(Duration::from_millis(100)), None);
        let report = p.record(Duration::from_micros(5)).unwrap();
        assert_eq!(report.max, Duration::from_micros(5));
    }

    #[test]
    fn reports_summarize_each_window() {
        let mut p = profiler(0, 3);
        assert!(p.record(Duration::from_micros(10)).is_none());
        assert!(p.record(Duration::from_micros(30)).is_none());
        let report = p.record(Duration::from_micros(20)).unwrap();
        assert_eq!(report.cycles, 3);
        assert_eq!(report.mean, Duration::from_micros(20));
        assert_eq!(report.min, Duration::from_micros(10));
        assert_eq!(report.max, Duration::from_micros(30));

        // The next window starts from scratch.
        assert!(p.record(Duration::from_micros(1)).is_none());
        assert!(p.record(Duration::from_micros(1)).is_none());
        let report = p.record(Duration::from_micros(4)).unwrap();
        assert_eq!(report.max, Duration::from_micros(4));
        assert_eq!(report.min, Duration::from_micros(1));
    }

    #[test]
    fn reset_restarts_warmup() {
        let mut p = profiler(1, 1);
        assert!(p.record(Duration::from_micros(1)).is_none());
        assert!(p.record(Duration::from_micros(1)).is_some());
        p.reset();
        assert!(p.record(Duration::from_micros(1)).is_none());
    }

    #[test]
    fn disabled_profiler_never_measures() {
        let mut p = Profiler::new(
            "off",
            ProfilerConfig {
                enabled: false,
                warmup_cycles: 0,
                report_interval: 1,
            },
        );
        p.start();
        assert!(p.started.is_none());
        p.stop();
    }

    #[test]
    fn report_display_names_the_profiler() {
        let mut p = profiler(0, 1);
        let report = p.record(Duration::from_micros(7)).unwrap();
        assert!(report.to_string().starts_with("test: 1 cycles"));
    }
}
