//! Interval scheduling with a single-flight guard around the cycle.
//!
//! Timer ticks, the startup run and manual triggers all spawn the cycle while
//! holding the loop state lock, so none of them can start a cycle after `stop`
//! has begun. A trigger that arrives while a cycle is in flight is dropped,
//! never queued.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sn_core::{CycleError, PipelineMetrics, SchedulerFault, StorageError};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::cycle::{CycleReport, CycleRunner};

const CYCLE_JOB: &str = "parse_news";
const CLEANUP_JOB: &str = "cleanup";
const KEEP_ALIVE_JOB: &str = "keep_alive";

/// The unit of work the scheduler drives.
#[async_trait]
pub trait CycleJob: Send + Sync + 'static {
    async fn run(&self) -> Result<CycleReport, CycleError>;

    async fn cleanup(&self) -> Result<u64, StorageError>;

    /// Releases persistence resources once the scheduler stops for good
    async fn shutdown(&self);
}

#[async_trait]
impl CycleJob for CycleRunner {
    async fn run(&self) -> Result<CycleReport, CycleError> {
        self.run_cycle().await
    }

    async fn cleanup(&self) -> Result<u64, StorageError> {
        CycleRunner::cleanup(self).await
    }

    async fn shutdown(&self) {
        self.store().close().await;
    }
}

#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    pub interval: Duration,
    /// Ticks later than this are reported as misfires; they still run once
    pub misfire_grace: Duration,
    pub cleanup_interval: Duration,
    pub keep_alive_url: Option<String>,
    pub keep_alive_interval: Duration,
    /// How long `stop` waits for an in-flight cycle before aborting it
    pub shutdown_timeout: Duration,
    pub run_on_start: bool,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(120 * 60),
            misfire_grace: Duration::from_secs(5 * 60),
            cleanup_interval: Duration::from_secs(24 * 60 * 60),
            keep_alive_url: None,
            keep_alive_interval: Duration::from_secs(10 * 60),
            shutdown_timeout: Duration::from_secs(30),
            run_on_start: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerOutcome {
    Started,
    AlreadyRunning,
    Unavailable,
}

impl TriggerOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            TriggerOutcome::Started => "started",
            TriggerOutcome::AlreadyRunning => "already_running",
            TriggerOutcome::Unavailable => "unavailable",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct JobStatus {
    pub id: String,
    pub next_run: Option<DateTime<Utc>>,
    pub alive: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct LastCycle {
    pub finished_at: DateTime<Utc>,
    pub origin: String,
    pub report: Option<CycleReport>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SchedulerStatus {
    pub running: bool,
    pub cycle_in_progress: bool,
    pub jobs: Vec<JobStatus>,
    pub last_cycle: Option<LastCycle>,
}

#[derive(Default)]
struct LoopState {
    running: bool,
    cancel: Option<CancellationToken>,
    loops: Vec<(&'static str, JoinHandle<()>)>,
    /// Latest spawned cycle, awaited by `halt`
    current: Option<JoinHandle<()>>,
}

struct Inner {
    job: Arc<dyn CycleJob>,
    config: SchedulerConfig,
    metrics: Arc<PipelineMetrics>,
    http: reqwest::Client,
    in_progress: AtomicBool,
    state: tokio::sync::Mutex<LoopState>,
    next_runs: Mutex<HashMap<&'static str, DateTime<Utc>>>,
    last_cycle: Mutex<Option<LastCycle>>,
}

/// Clears the in-progress flag when the cycle task ends, even if it is aborted.
struct FlightGuard(Arc<Inner>);

impl FlightGuard {
    fn acquire(inner: &Arc<Inner>) -> Option<Self> {
        inner
            .in_progress
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(inner.clone()))
    }
}

impl Drop for FlightGuard {
    fn drop(&mut self) {
        self.0.in_progress.store(false, Ordering::Release);
    }
}

#[derive(Clone)]
pub struct CycleScheduler {
    inner: Arc<Inner>,
}

impl CycleScheduler {
    pub fn new(job: Arc<dyn CycleJob>, config: SchedulerConfig, metrics: Arc<PipelineMetrics>) -> Self {
        Self {
            inner: Arc::new(Inner {
                job,
                config,
                metrics,
                http: reqwest::Client::new(),
                in_progress: AtomicBool::new(false),
                state: tokio::sync::Mutex::new(LoopState::default()),
                next_runs: Mutex::new(HashMap::new()),
                last_cycle: Mutex::new(None),
            }),
        }
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.inner.config
    }

    pub async fn is_running(&self) -> bool {
        self.inner.state.lock().await.running
    }

    pub fn cycle_in_progress(&self) -> bool {
        self.inner.in_progress.load(Ordering::Acquire)
    }

    /// Schedules the cycle, cleanup and keep-alive loops. No-op if already running.
    pub async fn start(&self) {
        let mut state = self.inner.state.lock().await;
        if state.running {
            return;
        }

        let token = CancellationToken::new();
        let config = &self.inner.config;
        let first = self.first_tick(CYCLE_JOB, config.interval);
        state.loops.push((CYCLE_JOB, self.spawn_cycle_loop(first, token.clone())));
        let first = self.first_tick(CLEANUP_JOB, config.cleanup_interval);
        state.loops.push((CLEANUP_JOB, self.spawn_cleanup_loop(first, token.clone())));
        if let Some(url) = config.keep_alive_url.clone() {
            let first = self.first_tick(KEEP_ALIVE_JOB, config.keep_alive_interval);
            state.loops.push((KEEP_ALIVE_JOB, self.spawn_keep_alive(url, first, token.clone())));
        }
        state.cancel = Some(token);
        state.running = true;

        info!(
            "⏰ Scheduler started (every {} min, cleanup every {} h)",
            config.interval.as_secs() / 60,
            config.cleanup_interval.as_secs() / 3600
        );

        if config.run_on_start {
            self.spawn_cycle(&mut state, "startup");
        }
    }

    /// Stops every loop, waits for an in-flight cycle and releases the store.
    pub async fn stop(&self) {
        if self.halt().await {
            self.inner.job.shutdown().await;
            info!("Scheduler stopped");
        }
    }

    /// Stops and starts again without releasing the store. Used by the watchdog.
    pub async fn restart(&self) {
        warn!("Restarting scheduler");
        self.halt().await;
        self.start().await;
    }

    /// Manual trigger. Honors the single-flight guard.
    pub async fn trigger(&self) -> TriggerOutcome {
        let mut state = self.inner.state.lock().await;
        self.spawn_cycle(&mut state, "manual")
    }

    /// Reports a job loop that exited while the scheduler believes it is running.
    pub async fn health(&self) -> Result<(), SchedulerFault> {
        let state = self.inner.state.lock().await;
        if !state.running {
            return Ok(());
        }
        match state.loops.iter().find(|(_, handle)| handle.is_finished()) {
            Some((name, _)) => Err(SchedulerFault::LoopExited(name.to_string())),
            None => Ok(()),
        }
    }

    pub async fn status(&self) -> SchedulerStatus {
        let state = self.inner.state.lock().await;
        let next_runs = self.inner.next_runs.lock().unwrap_or_else(|e| e.into_inner()).clone();
        let jobs = state
            .loops
            .iter()
            .map(|(name, handle)| JobStatus {
                id: name.to_string(),
                next_run: next_runs.get(name).copied(),
                alive: !handle.is_finished(),
            })
            .collect();

        SchedulerStatus {
            running: state.running,
            cycle_in_progress: self.cycle_in_progress(),
            jobs,
            last_cycle: self.inner.last_cycle.lock().unwrap_or_else(|e| e.into_inner()).clone(),
        }
    }

    /// Returns false if the scheduler was not running.
    async fn halt(&self) -> bool {
        let mut state = self.inner.state.lock().await;
        if !state.running {
            return false;
        }
        state.running = false;
        if let Some(token) = state.cancel.take() {
            token.cancel();
        }
        for (_, handle) in state.loops.drain(..) {
            handle.abort();
        }
        let current = state.current.take();
        drop(state);
        self.inner.next_runs.lock().unwrap_or_else(|e| e.into_inner()).clear();

        if let Some(mut handle) = current {
            if !handle.is_finished() {
                let window = self.inner.config.shutdown_timeout;
                info!("Waiting up to {:?} for the running cycle", window);
                if time::timeout(window, &mut handle).await.is_err() {
                    warn!("Cycle did not finish within {:?}, aborting it", window);
                    handle.abort();
                    let _ = handle.await;
                }
            }
        }
        true
    }

    /// Takes the locked loop state so the running check and the spawn are one step.
    fn spawn_cycle(&self, state: &mut LoopState, origin: &'static str) -> TriggerOutcome {
        if !state.running {
            return TriggerOutcome::Unavailable;
        }
        let Some(guard) = FlightGuard::acquire(&self.inner) else {
            info!(origin, "⏭️ Cycle already in progress, trigger skipped");
            self.inner.metrics.cycle_skipped();
            return TriggerOutcome::AlreadyRunning;
        };

        let inner = self.inner.clone();
        let handle = tokio::spawn(async move {
            let _guard = guard;
            info!(origin, "Cycle triggered");
            let result = inner.job.run().await;
            let last = LastCycle {
                finished_at: Utc::now(),
                origin: origin.to_string(),
                error: result.as_ref().err().map(ToString::to_string),
                report: result.ok(),
            };
            *inner.last_cycle.lock().unwrap_or_else(|e| e.into_inner()) = Some(last);
        });
        state.current = Some(handle);
        TriggerOutcome::Started
    }

    /// Deadline of a loop's first tick, published before the loop task runs.
    fn first_tick(&self, job: &'static str, period: Duration) -> Instant {
        self.record_next_run(job, period);
        Instant::now() + period
    }

    fn record_next_run(&self, job: &'static str, after: Duration) {
        let next = chrono::Duration::from_std(after)
            .ok()
            .and_then(|d| Utc::now().checked_add_signed(d));
        if let Some(next) = next {
            self.inner.next_runs.lock().unwrap_or_else(|e| e.into_inner()).insert(job, next);
        }
    }

    /// Missed ticks collapse into one late run; the next tick stays on the
    /// original grid.
    fn spawn_cycle_loop(&self, first: Instant, token: CancellationToken) -> JoinHandle<()> {
        let scheduler = self.clone();
        let period = self.inner.config.interval;
        let grace = self.inner.config.misfire_grace;

        tokio::spawn(async move {
            let mut ticker = time::interval_at(first, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                let scheduled = tokio::select! {
                    _ = token.cancelled() => break,
                    scheduled = ticker.tick() => scheduled,
                };
                let lateness = Instant::now().saturating_duration_since(scheduled);
                if lateness > grace {
                    warn!("Cycle tick missed by {:?}, running once now", lateness);
                }
                scheduler.record_next_run(CYCLE_JOB, until_next_tick(lateness, period));
                let mut state = scheduler.inner.state.lock().await;
                scheduler.spawn_cycle(&mut state, "interval");
            }
        })
    }

    fn spawn_cleanup_loop(&self, first: Instant, token: CancellationToken) -> JoinHandle<()> {
        let scheduler = self.clone();
        let period = self.inner.config.cleanup_interval;

        tokio::spawn(async move {
            let mut ticker = time::interval_at(first, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {}
                }
                match scheduler.inner.job.cleanup().await {
                    Ok(deleted) => info!("Cleanup completed, {} articles deleted", deleted),
                    Err(e) => error!(error = %e, "Cleanup failed"),
                }
                scheduler.record_next_run(CLEANUP_JOB, period);
            }
        })
    }

    fn spawn_keep_alive(&self, url: String, first: Instant, token: CancellationToken) -> JoinHandle<()> {
        let scheduler = self.clone();
        let period = self.inner.config.keep_alive_interval;

        tokio::spawn(async move {
            let mut ticker = time::interval_at(first, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {}
                }
                match scheduler.inner.http.get(&url).send().await {
                    Ok(response) => info!(status = response.status().as_u16(), "Keep-alive ping"),
                    Err(e) => warn!(error = %e, "Keep-alive ping failed"),
                }
                scheduler.record_next_run(KEEP_ALIVE_JOB, period);
            }
        })
    }
}

/// Time left until the next grid point of a `Skip` interval, given how late
/// the current tick fired.
fn until_next_tick(lateness: Duration, period: Duration) -> Duration {
    let period_nanos = period.as_nanos();
    if period_nanos == 0 {
        return period;
    }
    let into_slot = (lateness.as_nanos() % period_nanos) as u64;
    period.saturating_sub(Duration::from_nanos(into_slot))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[derive(Default)]
    struct SlowJob {
        cycle_time: Duration,
        started: AtomicUsize,
        finished: AtomicUsize,
        cleanups: AtomicUsize,
        shutdowns: AtomicUsize,
        /// Cycle work observed after the store was released
        after_shutdown: AtomicUsize,
        panic_on_cleanup: bool,
    }

    impl SlowJob {
        fn taking(cycle_time: Duration) -> Arc<Self> {
            Arc::new(Self { cycle_time, ..Default::default() })
        }
    }

    #[async_trait]
    impl CycleJob for SlowJob {
        async fn run(&self) -> Result<CycleReport, CycleError> {
            self.started.fetch_add(1, Ordering::SeqCst);
            if self.shutdowns.load(Ordering::SeqCst) > 0 {
                self.after_shutdown.fetch_add(1, Ordering::SeqCst);
            }
            time::sleep(self.cycle_time).await;
            if self.shutdowns.load(Ordering::SeqCst) > 0 {
                self.after_shutdown.fetch_add(1, Ordering::SeqCst);
            }
            self.finished.fetch_add(1, Ordering::SeqCst);
            Ok(CycleReport::default())
        }

        async fn cleanup(&self) -> Result<u64, StorageError> {
            if self.panic_on_cleanup {
                panic!("cleanup exploded");
            }
            self.cleanups.fetch_add(1, Ordering::SeqCst);
            Ok(0)
        }

        async fn shutdown(&self) {
            self.shutdowns.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn quiet_config() -> SchedulerConfig {
        SchedulerConfig {
            interval: Duration::from_secs(600),
            run_on_start: false,
            ..Default::default()
        }
    }

    fn scheduler(job: Arc<SlowJob>, config: SchedulerConfig) -> CycleScheduler {
        CycleScheduler::new(job, config, Arc::new(PipelineMetrics::new()))
    }

    #[tokio::test(start_paused = true)]
    async fn test_trigger_is_single_flight() {
        let job = SlowJob::taking(Duration::from_secs(10));
        let scheduler = scheduler(job.clone(), quiet_config());
        scheduler.start().await;

        assert_eq!(scheduler.trigger().await, TriggerOutcome::Started);
        assert_eq!(scheduler.trigger().await, TriggerOutcome::AlreadyRunning);
        assert!(scheduler.cycle_in_progress());

        time::sleep(Duration::from_secs(11)).await;
        assert_eq!(job.started.load(Ordering::SeqCst), 1);
        assert_eq!(job.finished.load(Ordering::SeqCst), 1);
        assert!(!scheduler.cycle_in_progress());
        assert_eq!(scheduler.inner.metrics.snapshot().cycles_skipped, 1);

        // the guard is free again
        assert_eq!(scheduler.trigger().await, TriggerOutcome::Started);
        scheduler.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_trigger_unavailable_when_stopped() {
        let job = SlowJob::taking(Duration::from_secs(1));
        let scheduler = scheduler(job.clone(), quiet_config());
        assert_eq!(scheduler.trigger().await, TriggerOutcome::Unavailable);

        scheduler.start().await;
        scheduler.stop().await;
        assert_eq!(scheduler.trigger().await, TriggerOutcome::Unavailable);
        assert_eq!(job.started.load(Ordering::SeqCst), 0);
        assert_eq!(job.shutdowns.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_interval_and_startup_runs() {
        let job = SlowJob::taking(Duration::from_secs(1));
        let config = SchedulerConfig {
            interval: Duration::from_secs(60),
            run_on_start: true,
            ..Default::default()
        };
        let scheduler = scheduler(job.clone(), config);
        scheduler.start().await;

        time::sleep(Duration::from_secs(125)).await;
        // startup run plus ticks at 60s and 120s
        assert_eq!(job.finished.load(Ordering::SeqCst), 3);

        let status = scheduler.status().await;
        assert!(status.running);
        assert!(status.jobs.iter().any(|j| j.id == CYCLE_JOB && j.next_run.is_some() && j.alive));
        assert!(status.last_cycle.is_some());
        scheduler.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_next_run_known_right_after_start() {
        let job = SlowJob::taking(Duration::from_secs(1));
        let config = SchedulerConfig {
            keep_alive_url: Some("http://127.0.0.1:9/".to_string()),
            ..quiet_config()
        };
        let scheduler = scheduler(job, config);
        let before = Utc::now();
        scheduler.start().await;

        let status = scheduler.status().await;
        assert_eq!(status.jobs.len(), 3);
        for job in &status.jobs {
            let next_run = job.next_run.unwrap_or_else(|| panic!("{} has no next run", job.id));
            assert!(next_run > before, "{} next run is in the past", job.id);
        }
        let cycle = status.jobs.iter().find(|j| j.id == CYCLE_JOB).unwrap();
        assert!(cycle.next_run.unwrap() >= before + chrono::Duration::seconds(600));
        scheduler.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_missed_ticks_coalesce_into_one_run() {
        let job = SlowJob::taking(Duration::from_secs(1));
        let config = SchedulerConfig {
            interval: Duration::from_secs(60),
            misfire_grace: Duration::from_secs(30),
            run_on_start: false,
            ..Default::default()
        };
        let scheduler = scheduler(job.clone(), config);
        scheduler.start().await;

        // The process is frozen across four ticks (60, 120, 180, 240)
        time::advance(Duration::from_secs(250)).await;
        time::sleep(Duration::from_secs(5)).await;
        assert_eq!(job.started.load(Ordering::SeqCst), 1);
        assert_eq!(job.finished.load(Ordering::SeqCst), 1);

        // Back on the original grid: the next tick is at 300s, 50s after the late run
        let next_run = scheduler
            .status()
            .await
            .jobs
            .into_iter()
            .find(|j| j.id == CYCLE_JOB)
            .and_then(|j| j.next_run)
            .unwrap();
        let ahead = next_run - Utc::now();
        assert!(ahead > chrono::Duration::seconds(45), "next run only {} ahead", ahead);
        assert!(ahead <= chrono::Duration::seconds(50), "next run {} ahead", ahead);

        time::sleep(Duration::from_secs(50)).await;
        assert_eq!(job.started.load(Ordering::SeqCst), 2);
        assert_eq!(scheduler.inner.metrics.snapshot().cycles_skipped, 0);
        scheduler.stop().await;
    }

    #[test]
    fn test_until_next_tick() {
        let minute = Duration::from_secs(60);
        assert_eq!(until_next_tick(Duration::ZERO, minute), minute);
        assert_eq!(until_next_tick(Duration::from_secs(190), minute), Duration::from_secs(50));
        assert_eq!(until_next_tick(Duration::from_secs(120), minute), minute);
        assert_eq!(until_next_tick(Duration::from_secs(5), Duration::ZERO), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_trigger_racing_stop_never_outlives_shutdown() {
        for trigger_first in [true, false] {
            let job = SlowJob::taking(Duration::from_secs(5));
            let scheduler = scheduler(job.clone(), quiet_config());
            scheduler.start().await;

            let outcome = if trigger_first {
                let (outcome, ()) = tokio::join!(scheduler.trigger(), scheduler.stop());
                outcome
            } else {
                let ((), outcome) = tokio::join!(scheduler.stop(), scheduler.trigger());
                outcome
            };
            time::sleep(Duration::from_secs(10)).await;

            assert_eq!(job.shutdowns.load(Ordering::SeqCst), 1);
            assert_eq!(job.after_shutdown.load(Ordering::SeqCst), 0);
            match outcome {
                TriggerOutcome::Started => assert_eq!(job.finished.load(Ordering::SeqCst), 1),
                other => {
                    assert_eq!(other, TriggerOutcome::Unavailable);
                    assert_eq!(job.started.load(Ordering::SeqCst), 0);
                }
            }
            assert_eq!(scheduler.trigger().await, TriggerOutcome::Unavailable);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_waits_for_in_flight_cycle() {
        let job = SlowJob::taking(Duration::from_secs(5));
        let scheduler = scheduler(job.clone(), quiet_config());
        scheduler.start().await;
        scheduler.trigger().await;
        tokio::task::yield_now().await;

        scheduler.stop().await;
        assert_eq!(job.finished.load(Ordering::SeqCst), 1);
        assert_eq!(job.shutdowns.load(Ordering::SeqCst), 1);
        assert!(!scheduler.is_running().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_aborts_cycle_after_window() {
        let job = SlowJob::taking(Duration::from_secs(600));
        let config = SchedulerConfig {
            shutdown_timeout: Duration::from_secs(2),
            ..quiet_config()
        };
        let scheduler = scheduler(job.clone(), config);
        scheduler.start().await;
        scheduler.trigger().await;
        tokio::task::yield_now().await;

        scheduler.stop().await;
        assert_eq!(job.started.load(Ordering::SeqCst), 1);
        assert_eq!(job.finished.load(Ordering::SeqCst), 0);
        assert!(!scheduler.cycle_in_progress());
    }

    #[tokio::test(start_paused = true)]
    async fn test_daily_cleanup() {
        let job = SlowJob::taking(Duration::from_secs(1));
        let scheduler = scheduler(job.clone(), quiet_config());
        scheduler.start().await;

        time::sleep(Duration::from_secs(24 * 60 * 60 + 1)).await;
        assert_eq!(job.cleanups.load(Ordering::SeqCst), 1);
        scheduler.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_health_reports_dead_loop_and_restart_recovers() {
        let job = Arc::new(SlowJob {
            cycle_time: Duration::from_secs(1),
            panic_on_cleanup: true,
            ..Default::default()
        });
        let config = SchedulerConfig {
            cleanup_interval: Duration::from_secs(30),
            ..quiet_config()
        };
        let scheduler = scheduler(job.clone(), config);
        scheduler.start().await;
        assert!(scheduler.health().await.is_ok());

        time::sleep(Duration::from_secs(31)).await;
        assert_eq!(
            scheduler.health().await,
            Err(SchedulerFault::LoopExited(CLEANUP_JOB.to_string()))
        );

        scheduler.restart().await;
        assert!(scheduler.health().await.is_ok());
        assert_eq!(job.shutdowns.load(Ordering::SeqCst), 0);
    }
}
