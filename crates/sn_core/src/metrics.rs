//! Counters shared by the pipeline components.
//!
//! One instance is created at startup and handed to every component that
//! records something, so nothing reaches for a global.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use serde::Serialize;
use tracing::info;

#[derive(Debug, Default)]
pub struct PipelineMetrics {
    cycles_ok: AtomicU64,
    cycles_failed: AtomicU64,
    cycles_skipped: AtomicU64,
    articles_ingested: AtomicU64,
    translations_ok: AtomicU64,
    translations_failed: AtomicU64,
    dispatches_ok: AtomicU64,
    dispatches_failed: AtomicU64,
    fetch_failures: Mutex<HashMap<String, u64>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub cycles_ok: u64,
    pub cycles_failed: u64,
    pub cycles_skipped: u64,
    pub articles_ingested: u64,
    pub translations_ok: u64,
    pub translations_failed: u64,
    pub dispatches_ok: u64,
    pub dispatches_failed: u64,
    pub fetch_failures: HashMap<String, u64>,
}

impl PipelineMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cycle_succeeded(&self) {
        self.cycles_ok.fetch_add(1, Ordering::Relaxed);
    }

    pub fn cycle_failed(&self) {
        self.cycles_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn cycle_skipped(&self) {
        self.cycles_skipped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_ingested(&self, count: usize) {
        self.articles_ingested.fetch_add(count as u64, Ordering::Relaxed);
    }

    pub fn translation(&self, ok: bool) {
        let counter = if ok { &self.translations_ok } else { &self.translations_failed };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn dispatch(&self, ok: bool) {
        let counter = if ok { &self.dispatches_ok } else { &self.dispatches_failed };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn fetch_failed(&self, strategy: &str) {
        let mut failures = self.fetch_failures.lock().unwrap_or_else(|e| e.into_inner());
        *failures.entry(strategy.to_string()).or_insert(0) += 1;
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            cycles_ok: self.cycles_ok.load(Ordering::Relaxed),
            cycles_failed: self.cycles_failed.load(Ordering::Relaxed),
            cycles_skipped: self.cycles_skipped.load(Ordering::Relaxed),
            articles_ingested: self.articles_ingested.load(Ordering::Relaxed),
            translations_ok: self.translations_ok.load(Ordering::Relaxed),
            translations_failed: self.translations_failed.load(Ordering::Relaxed),
            dispatches_ok: self.dispatches_ok.load(Ordering::Relaxed),
            dispatches_failed: self.dispatches_failed.load(Ordering::Relaxed),
            fetch_failures: self
                .fetch_failures
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .clone(),
        }
    }

    pub fn report(&self) {
        let s = self.snapshot();
        info!(
            "📊 cycles ok={} failed={} skipped={}, ingested={}, translations ok={} failed={}, dispatches ok={} failed={}",
            s.cycles_ok,
            s.cycles_failed,
            s.cycles_skipped,
            s.articles_ingested,
            s.translations_ok,
            s.translations_failed,
            s.dispatches_ok,
            s.dispatches_failed
        );
    }
}
