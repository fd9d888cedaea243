use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

const MAX_LATENCY_SAMPLES: usize = 1000;

/// Round-trip latency of page requests.
#[derive(Debug, Clone)]
pub struct PageLatency {
    pub page_count: u64,
    pub total_latency: Duration,
    pub min_latency: Duration,
    pub max_latency: Duration,
    pub latency_samples: Vec<Duration>,
}

impl Default for PageLatency {
    fn default() -> Self {
        Self::new()
    }
}

impl PageLatency {
    pub fn new() -> Self {
        Self {
            page_count: 0,
            total_latency: Duration::ZERO,
            min_latency: Duration::MAX,
            max_latency: Duration::ZERO,
            latency_samples: Vec::new(),
        }
    }

    pub fn record(&mut self, latency: Duration) {
        self.page_count += 1;
        self.total_latency += latency;
        self.min_latency = self.min_latency.min(latency);
        self.max_latency = self.max_latency.max(latency);

        self.latency_samples.push(latency);
        if self.latency_samples.len() > MAX_LATENCY_SAMPLES {
            self.latency_samples.remove(0);
        }
    }

    pub fn average_latency(&self) -> Duration {
        if self.page_count == 0 {
            return Duration::ZERO;
        }
        let nanos = self.total_latency.as_nanos() / u128::from(self.page_count);
        Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX))
    }

    pub fn percentile(&self, p: f64) -> Duration {
        if self.latency_samples.is_empty() {
            return Duration::ZERO;
        }

        let mut sorted = self.latency_samples.clone();
        sorted.sort();

        let index = ((sorted.len() - 1) as f64 * p / 100.0) as usize;
        sorted[index]
    }

    pub fn p50(&self) -> Duration {
        self.percentile(50.0)
    }

    pub fn p95(&self) -> Duration {
        self.percentile(95.0)
    }

    pub fn p99(&self) -> Duration {
        self.percentile(99.0)
    }
}

/// `pages_sent` and `rows_processed` only count pages the server accepted;
/// rejected, undecodable and failed exchanges land in `page_failures`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchCounters {
    pub executions: u64,
    pub pages_sent: u64,
    pub rows_processed: u64,
    pub page_failures: u64,
    pub timeouts: u64,
    pub row_warnings: u64,
}

/// Process-wide batch execution statistics. All recorders swallow lock
/// poisoning; metrics never fail a query.
pub struct Metrics {
    latency: Arc<Mutex<PageLatency>>,
    counters: Arc<Mutex<BatchCounters>>,
    start_time: Instant,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            latency: Arc::new(Mutex::new(PageLatency::new())),
            counters: Arc::new(Mutex::new(BatchCounters::default())),
            start_time: Instant::now(),
        }
    }

    pub fn record_execute(&self) {
        self.update(|c| c.executions += 1);
    }

    pub fn record_page(&self, rows: usize, latency: Duration) {
        if let Ok(mut l) = self.latency.lock() {
            l.record(latency);
        }
        self.update(|c| {
            c.pages_sent += 1;
            c.rows_processed += rows as u64;
        });
    }

    pub fn record_page_failure(&self, timed_out: bool) {
        self.update(|c| {
            c.page_failures += 1;
            if timed_out {
                c.timeouts += 1;
            }
        });
    }

    pub fn record_row_warning(&self) {
        self.update(|c| c.row_warnings += 1);
    }

    pub fn get_page_latency(&self) -> PageLatency {
        self.latency
            .lock()
            .map(|l| l.clone())
            .unwrap_or_else(|_| PageLatency::new())
    }

    pub fn get_counters(&self) -> BatchCounters {
        self.counters.lock().map(|c| *c).unwrap_or_default()
    }

    pub fn uptime(&self) -> Duration {
        self.start_time.elapsed()
    }

    fn update(&self, f: impl FnOnce(&mut BatchCounters)) {
        if let Ok(mut counters) = self.counters.lock() {
            f(&mut counters);
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

lazy_static::lazy_static! {
    static ref GLOBAL_METRICS: Arc<Metrics> = Arc::new(Metrics::new());
}

pub fn get_global_metrics() -> Arc<Metrics> {
    Arc::clone(&GLOBAL_METRICS)
}
