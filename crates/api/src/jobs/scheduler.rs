//! Background job scheduling with graceful shutdown.

use chrono::{DateTime, Duration as ChronoDuration, NaiveTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// When a job fires.
#[derive(Debug, Clone, Copy)]
pub enum JobSchedule {
    /// Run on a fixed interval.
    Every(Duration),
    /// Run once per day at the given wall-clock time (UTC). Firing is
    /// calendar-based: the next run lands on the next occurrence of the
    /// time, regardless of how long the previous run took.
    DailyAt { hour: u32, minute: u32 },
}

impl JobSchedule {
    /// How long to sleep from `now` until the next firing.
    pub fn next_delay_from(&self, now: DateTime<Utc>) -> Duration {
        match self {
            JobSchedule::Every(duration) => *duration,
            JobSchedule::DailyAt { hour, minute } => {
                let time = NaiveTime::from_hms_opt(*hour % 24, *minute % 60, 0)
                    .unwrap_or(NaiveTime::MIN);
                let mut target = now.date_naive().and_time(time).and_utc();
                if target <= now {
                    target += ChronoDuration::days(1);
                }
                (target - now).to_std().unwrap_or(Duration::from_secs(60))
            }
        }
    }
}

/// A unit of background work. Failures are reported as strings because the
/// scheduler only logs them; jobs own their recovery.
#[async_trait::async_trait]
pub trait Job: Send + Sync {
    fn name(&self) -> &'static str;

    fn schedule(&self) -> JobSchedule;

    async fn execute(&self) -> Result<(), String>;
}

/// Drives registered jobs on their schedules, each on its own tokio task.
/// A watch channel fans the shutdown signal out to every task.
pub struct JobScheduler {
    jobs: Vec<Arc<dyn Job>>,
    stop_tx: watch::Sender<bool>,
    stop_rx: watch::Receiver<bool>,
    tasks: Vec<JoinHandle<()>>,
}

impl JobScheduler {
    pub fn new() -> Self {
        let (stop_tx, stop_rx) = watch::channel(false);
        Self {
            jobs: Vec::new(),
            stop_tx,
            stop_rx,
            tasks: Vec::new(),
        }
    }

    pub fn register<J: Job + 'static>(&mut self, job: J) {
        self.jobs.push(Arc::new(job));
    }

    /// Spawns one task per registered job.
    pub fn start(&mut self) {
        info!(jobs = self.jobs.len(), "Scheduler starting");

        for job in &self.jobs {
            let job = Arc::clone(job);
            let stop_rx = self.stop_rx.clone();
            self.tasks.push(tokio::spawn(run_job(job, stop_rx)));
        }
    }

    /// Signals every job task to stop after its current iteration.
    pub fn shutdown(&self) {
        info!("Scheduler stopping");
        let _ = self.stop_tx.send(true);
    }

    /// Waits for the job tasks to wind down, up to `timeout`.
    pub async fn wait_for_shutdown(self, timeout: Duration) {
        let drain = async {
            for task in self.tasks {
                if let Err(e) = task.await {
                    warn!(error = %e, "Job task panicked");
                }
            }
        };

        if tokio::time::timeout(timeout, drain).await.is_err() {
            warn!(?timeout, "Jobs still running at shutdown deadline");
        }
    }
}

impl Default for JobScheduler {
    fn default() -> Self {
        Self::new()
    }
}

async fn run_job(job: Arc<dyn Job>, mut stop_rx: watch::Receiver<bool>) {
    let schedule = job.schedule();
    info!(job = job.name(), ?schedule, "Job scheduled");

    loop {
        let delay = schedule.next_delay_from(Utc::now());

        tokio::select! {
            _ = tokio::time::sleep(delay) => {
                let started = std::time::Instant::now();
                match job.execute().await {
                    Ok(()) => info!(
                        job = job.name(),
                        elapsed_ms = started.elapsed().as_millis(),
                        "Job finished"
                    ),
                    Err(e) => error!(
                        job = job.name(),
                        elapsed_ms = started.elapsed().as_millis(),
                        error = %e,
                        "Job failed"
                    ),
                }
            }
            _ = stop_rx.changed() => {
                if *stop_rx.borrow() {
                    info!(job = job.name(), "Job stopping");
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct TestJob {
        run_count: Arc<AtomicUsize>,
    }

    #[async_trait::async_trait]
    impl Job for TestJob {
        fn name(&self) -> &'static str {
            "test_job"
        }

        fn schedule(&self) -> JobSchedule {
            JobSchedule::Every(Duration::from_secs(1))
        }

        async fn execute(&self) -> Result<(), String> {
            self.run_count.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[test]
    fn interval_schedule_returns_its_period() {
        let schedule = JobSchedule::Every(Duration::from_secs(30));
        assert_eq!(schedule.next_delay_from(Utc::now()), Duration::from_secs(30));
    }

    #[test]
    fn daily_schedule_fires_later_today() {
        // 10:00, job fires at 14:30 the same day.
        let now = Utc.with_ymd_and_hms(2024, 5, 10, 10, 0, 0).unwrap();
        let schedule = JobSchedule::DailyAt { hour: 14, minute: 30 };
        assert_eq!(
            schedule.next_delay_from(now),
            Duration::from_secs(4 * 3600 + 30 * 60)
        );
    }

    #[test]
    fn daily_schedule_rolls_to_tomorrow() {
        // 15:00, job fires at 14:30 so the next run is tomorrow.
        let now = Utc.with_ymd_and_hms(2024, 5, 10, 15, 0, 0).unwrap();
        let schedule = JobSchedule::DailyAt { hour: 14, minute: 30 };
        assert_eq!(
            schedule.next_delay_from(now),
            Duration::from_secs(23 * 3600 + 30 * 60)
        );
    }

    #[test]
    fn daily_schedule_on_the_boundary_waits_a_full_day() {
        let now = Utc.with_ymd_and_hms(2024, 5, 10, 0, 0, 0).unwrap();
        let schedule = JobSchedule::DailyAt { hour: 0, minute: 0 };
        assert_eq!(schedule.next_delay_from(now), Duration::from_secs(86400));
    }

    #[test]
    fn register_collects_jobs() {
        let mut scheduler = JobScheduler::new();
        scheduler.register(TestJob {
            run_count: Arc::new(AtomicUsize::new(0)),
        });
        assert_eq!(scheduler.jobs.len(), 1);
    }

    #[tokio::test]
    async fn shutdown_stops_running_tasks() {
        let run_count = Arc::new(AtomicUsize::new(0));
        let mut scheduler = JobScheduler::new();
        scheduler.register(TestJob {
            run_count: Arc::clone(&run_count),
        });
        scheduler.start();

        tokio::time::sleep(Duration::from_millis(50)).await;

        scheduler.shutdown();
        scheduler.wait_for_shutdown(Duration::from_secs(2)).await;
    }
}
