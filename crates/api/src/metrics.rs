use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

pub struct Metrics {
    // Counters
    total_requests: AtomicUsize,
    successful_requests: AtomicUsize,
    failed_requests: AtomicUsize,

    // Timing (in microseconds)
    total_generation_time_us: AtomicU64,
    total_analysis_time_us: AtomicU64,

    // Counts
    generations: AtomicUsize,
    generated_chars: AtomicUsize,
    analyses: AtomicUsize,
    similarity_checks: AtomicUsize,
    similarity_degradations: AtomicUsize,
}

impl Metrics {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            total_requests: AtomicUsize::new(0),
            successful_requests: AtomicUsize::new(0),
            failed_requests: AtomicUsize::new(0),
            total_generation_time_us: AtomicU64::new(0),
            total_analysis_time_us: AtomicU64::new(0),
            generations: AtomicUsize::new(0),
            generated_chars: AtomicUsize::new(0),
            analyses: AtomicUsize::new(0),
            similarity_checks: AtomicUsize::new(0),
            similarity_degradations: AtomicUsize::new(0),
        })
    }

    pub fn record_request(&self, success: bool) {
        self.total_requests.fetch_add(1, Ordering::Relaxed);
        if success {
            self.successful_requests.fetch_add(1, Ordering::Relaxed);
        } else {
            self.failed_requests.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_generation(&self, duration: Duration, chars: usize) {
        self.total_generation_time_us
            .fetch_add(duration.as_micros() as u64, Ordering::Relaxed);
        self.generations.fetch_add(1, Ordering::Relaxed);
        self.generated_chars.fetch_add(chars, Ordering::Relaxed);
    }

    pub fn record_analysis(&self, duration: Duration) {
        self.total_analysis_time_us
            .fetch_add(duration.as_micros() as u64, Ordering::Relaxed);
        self.analyses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_similarity(&self, checked: usize, failed: usize) {
        self.similarity_checks.fetch_add(checked, Ordering::Relaxed);
        self.similarity_degradations.fetch_add(failed, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            total_requests: self.total_requests.load(Ordering::Relaxed),
            successful_requests: self.successful_requests.load(Ordering::Relaxed),
            failed_requests: self.failed_requests.load(Ordering::Relaxed),
            generations: self.generations.load(Ordering::Relaxed),
            generated_chars: self.generated_chars.load(Ordering::Relaxed),
            avg_generation_time_ms: avg_time_ms(&self.total_generation_time_us, &self.generations),
            analyses: self.analyses.load(Ordering::Relaxed),
            avg_analysis_time_ms: avg_time_ms(&self.total_analysis_time_us, &self.analyses),
            similarity_checks: self.similarity_checks.load(Ordering::Relaxed),
            similarity_degradations: self.similarity_degradations.load(Ordering::Relaxed),
        }
    }
}

fn avg_time_ms(total_us: &AtomicU64, count: &AtomicUsize) -> f64 {
    let total = total_us.load(Ordering::Relaxed) as f64;
    let cnt = count.load(Ordering::Relaxed) as f64;
    if cnt > 0.0 {
        total / cnt / 1000.0
    } else {
        0.0
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    pub total_requests: usize,
    pub successful_requests: usize,
    pub failed_requests: usize,
    pub generations: usize,
    pub generated_chars: usize,
    pub avg_generation_time_ms: f64,
    pub analyses: usize,
    pub avg_analysis_time_ms: f64,
    pub similarity_checks: usize,
    pub similarity_degradations: usize,
}

pub struct TimedOperation {
    start: Instant,
}

impl TimedOperation {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_counts_and_averages() {
        let metrics = Metrics::new();
        metrics.record_request(true);
        metrics.record_request(false);
        metrics.record_generation(Duration::from_millis(100), 3000);
        metrics.record_generation(Duration::from_millis(300), 2000);
        metrics.record_similarity(5, 1);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.total_requests, 2);
        assert_eq!(snapshot.failed_requests, 1);
        assert_eq!(snapshot.generations, 2);
        assert_eq!(snapshot.generated_chars, 5000);
        assert!((snapshot.avg_generation_time_ms - 200.0).abs() < 1e-6);
        assert_eq!(snapshot.similarity_degradations, 1);
    }

    #[test]
    fn test_empty_averages_are_zero() {
        let snapshot = Metrics::new().snapshot();
        assert_eq!(snapshot.avg_analysis_time_ms, 0.0);
        assert_eq!(snapshot.avg_generation_time_ms, 0.0);
    }
}
