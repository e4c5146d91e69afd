//! Shared refresh health for the /health endpoint.
//! Updated by the Refresher, read by the API.

use std::sync::atomic::{AtomicBool, AtomicI64, AtomicU64, Ordering};

use serde::Serialize;

#[derive(Default)]
pub struct HealthState {
    /// False until the first successful run, and after any failed run.
    pub last_run_ok: AtomicBool,
    /// Unix seconds of the last successful run (0 = never).
    pub last_success_at: AtomicI64,
    pub attempts: AtomicU64,
    pub successes: AtomicU64,
    pub failures: AtomicU64,
}

#[derive(Debug, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    pub last_success_at: Option<i64>,
    pub attempts: u64,
    pub successes: u64,
    pub failures: u64,
}

impl HealthState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_attempt(&self) {
        self.attempts.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_success(&self, at_secs: i64) {
        self.successes.fetch_add(1, Ordering::Relaxed);
        self.last_success_at.store(at_secs, Ordering::Relaxed);
        self.last_run_ok.store(true, Ordering::Relaxed);
    }

    pub fn record_failure(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
        self.last_run_ok.store(false, Ordering::Relaxed);
    }

    pub fn last_run_ok(&self) -> bool {
        self.last_run_ok.load(Ordering::Relaxed)
    }

    pub fn attempts(&self) -> u64 {
        self.attempts.load(Ordering::Relaxed)
    }

    pub fn successes(&self) -> u64 {
        self.successes.load(Ordering::Relaxed)
    }

    pub fn failures(&self) -> u64 {
        self.failures.load(Ordering::Relaxed)
    }

    pub fn report(&self) -> HealthReport {
        let last = self.last_success_at.load(Ordering::Relaxed);
        let finished = self.successes() + self.failures();
        let status = match (self.last_run_ok(), finished) {
            (_, 0) => "starting",
            (true, _) => "ok",
            (false, _) => "degraded",
        };
        HealthReport {
            status,
            last_success_at: (last > 0).then_some(last),
            attempts: self.attempts(),
            successes: self.successes(),
            failures: self.failures(),
        }
    }
}
