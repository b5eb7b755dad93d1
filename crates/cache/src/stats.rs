use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonic cache counters, shared by all resolution workers.
///
/// Increments are gated on the capture flag so the hot path pays nothing
/// when statistics are disabled.
#[derive(Debug, Default)]
pub struct CacheStatistics {
    capture: bool,

    /// Reads that returned at least one live answer.
    hits: AtomicU64,

    /// Reads that found nothing (including everything-expired reads).
    misses: AtomicU64,

    /// Writes into the cache (per-answer upserts and snapshot replaces).
    adds: AtomicU64,

    /// Entries the store dropped to make room under capacity pressure.
    evictions: AtomicU64,
}

impl CacheStatistics {
    pub fn new(capture: bool) -> Self {
        Self {
            capture,
            ..Default::default()
        }
    }

    pub fn increment_hits(&self) {
        if self.capture {
            self.hits.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn increment_misses(&self) {
        if self.capture {
            self.misses.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn increment_adds(&self) {
        if self.capture {
            self.adds.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn increment_evictions(&self) {
        if self.capture {
            self.evictions.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Snapshot the counters and derive rates.
    ///
    /// Hit and miss rates are `NaN` until at least one read has happened;
    /// the division is never performed against a zero total.
    pub fn report(&self) -> CacheStatsReport {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total = hits + misses;

        let (hit_rate, miss_rate) = if total == 0 {
            (f64::NAN, f64::NAN)
        } else {
            (hits as f64 / total as f64, misses as f64 / total as f64)
        };

        CacheStatsReport {
            hits,
            misses,
            adds: self.adds.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            hit_rate,
            miss_rate,
        }
    }
}

/// Point-in-time view of the counters.
#[derive(Debug, Clone, Copy)]
pub struct CacheStatsReport {
    pub hits: u64,
    pub misses: u64,
    pub adds: u64,
    pub evictions: u64,
    pub hit_rate: f64,
    pub miss_rate: f64,
}

impl fmt::Display for CacheStatsReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "cache statistics: hits={} misses={} adds={} evictions={} hit_rate={:.4} miss_rate={:.4}",
            self.hits, self.misses, self.adds, self.evictions, self.hit_rate, self.miss_rate
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_disabled_is_inert() {
        let stats = CacheStatistics::new(false);
        stats.increment_hits();
        stats.increment_misses();
        stats.increment_adds();
        stats.increment_evictions();

        let report = stats.report();
        assert_eq!(report.hits, 0);
        assert_eq!(report.misses, 0);
        assert_eq!(report.adds, 0);
        assert_eq!(report.evictions, 0);
    }

    #[test]
    fn test_rates() {
        let stats = CacheStatistics::new(true);
        for _ in 0..3 {
            stats.increment_hits();
        }
        stats.increment_misses();

        let report = stats.report();
        assert_eq!(report.hits, 3);
        assert_eq!(report.misses, 1);
        assert!((report.hit_rate - 0.75).abs() < f64::EPSILON);
        assert!((report.miss_rate - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn test_rates_undefined_before_any_read() {
        let stats = CacheStatistics::new(true);
        stats.increment_adds();

        let report = stats.report();
        assert!(report.hit_rate.is_nan());
        assert!(report.miss_rate.is_nan());
        // Display must not panic on NaN rates.
        let _ = report.to_string();
    }
}
