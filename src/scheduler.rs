// ⏰ Scheduler - daily and weekly summary reports
//
// Each trigger summarizes a date window over the shared store and hands the
// result to a SummarySink. Reports are observational only: no retries, no
// history kept.

use crate::config::{AppConfig, ConfigError};
use crate::store::SharedStore;
use crate::summary::{Summary, SummaryFilter};
use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Utc, Weekday};
use serde::Serialize;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::info;

// ============================================================================
// REPORT KINDS & SCHEDULES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ReportKind {
    Daily,
    Weekly,
}

impl ReportKind {
    pub fn label(&self) -> &'static str {
        match self {
            ReportKind::Daily => "Daily",
            ReportKind::Weekly => "Weekly",
        }
    }

    /// Inclusive date window covered by a report run on `today`
    pub fn window(&self, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        match self {
            ReportKind::Daily => (today, today),
            ReportKind::Weekly => (today - Duration::days(7), today),
        }
    }
}

/// When a report fires. Times are UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schedule {
    Daily { at: NaiveTime },
    Weekly { day: Weekday, at: NaiveTime },
}

impl Schedule {
    /// Daily and weekly schedules from configuration
    pub fn from_config(cfg: &AppConfig) -> Result<Vec<Schedule>, ConfigError> {
        Ok(vec![
            Schedule::Daily {
                at: cfg.daily_report_time()?,
            },
            Schedule::Weekly {
                day: cfg.weekly_report_day()?,
                at: cfg.weekly_report_time()?,
            },
        ])
    }

    pub fn kind(&self) -> ReportKind {
        match self {
            Schedule::Daily { .. } => ReportKind::Daily,
            Schedule::Weekly { .. } => ReportKind::Weekly,
        }
    }

    /// First firing strictly after `now`
    pub fn next_run_after(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let today = now.date_naive();
        let at_utc = |date: NaiveDate, at: NaiveTime| Utc.from_utc_datetime(&date.and_time(at));

        match *self {
            Schedule::Daily { at } => {
                let candidate = at_utc(today, at);
                if candidate > now {
                    candidate
                } else {
                    candidate + Duration::days(1)
                }
            }
            Schedule::Weekly { day, at } => {
                let days_ahead = (7 + day.num_days_from_monday()
                    - today.weekday().num_days_from_monday())
                    % 7;
                let candidate = at_utc(today + Duration::days(days_ahead as i64), at);
                if candidate > now {
                    candidate
                } else {
                    candidate + Duration::days(7)
                }
            }
        }
    }
}

// ============================================================================
// SINKS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryReport {
    pub kind: ReportKind,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub summary: Summary,
}

/// Where finished reports go
pub trait SummarySink: Send + Sync {
    fn emit(&self, report: &SummaryReport);
}

/// Writes reports to the operational log
#[derive(Debug, Default)]
pub struct LogSink;

impl SummarySink for LogSink {
    fn emit(&self, report: &SummaryReport) {
        let expenses = serde_json::to_string(&report.summary.expenses).unwrap_or_default();
        info!(
            kind = report.kind.label(),
            start = %report.start_date,
            end = %report.end_date,
            total = report.summary.total,
            count = report.summary.expenses.len(),
            expenses = %expenses,
            "{} Expense Summary",
            report.kind.label()
        );
    }
}

/// Keeps every report in memory
#[derive(Debug, Default)]
pub struct CollectingSink {
    reports: Mutex<Vec<SummaryReport>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reports(&self) -> Vec<SummaryReport> {
        self.reports
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl SummarySink for CollectingSink {
    fn emit(&self, report: &SummaryReport) {
        self.reports
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(report.clone());
    }
}

// ============================================================================
// SCHEDULER
// ============================================================================

pub struct Scheduler {
    store: SharedStore,
    sink: Arc<dyn SummarySink>,
    schedules: Vec<Schedule>,
}

impl Scheduler {
    pub fn new(store: SharedStore, sink: Arc<dyn SummarySink>, schedules: Vec<Schedule>) -> Self {
        Self {
            store,
            sink,
            schedules,
        }
    }

    pub fn schedules(&self) -> &[Schedule] {
        &self.schedules
    }

    /// Summarize the window for `kind` as of `today` and emit it
    pub fn run_once(&self, kind: ReportKind, today: NaiveDate) -> SummaryReport {
        let (start_date, end_date) = kind.window(today);
        let filter = SummaryFilter::between(start_date, end_date);
        // Read lock is released before the sink runs
        let summary = self.store.read().summarize(&filter);

        let report = SummaryReport {
            kind,
            start_date,
            end_date,
            summary,
        };
        self.sink.emit(&report);
        report
    }

    /// Start one background task per schedule. Tasks run until the runtime stops.
    #[cfg(feature = "server")]
    pub fn spawn(self) -> Vec<tokio::task::JoinHandle<()>> {
        let this = Arc::new(self);
        this.schedules
            .clone()
            .into_iter()
            .map(|schedule| {
                let scheduler = Arc::clone(&this);
                tokio::spawn(async move { scheduler.run_schedule(schedule).await })
            })
            .collect()
    }

    #[cfg(feature = "server")]
    async fn run_schedule(&self, schedule: Schedule) {
        loop {
            let now = Utc::now();
            let next = schedule.next_run_after(now);
            info!(
                kind = schedule.kind().label(),
                next_run = %next,
                "Next summary report scheduled"
            );

            let wait = (next - now).to_std().unwrap_or_default();
            tokio::time::sleep(wait).await;

            let report = self.run_once(schedule.kind(), next.date_naive());
            tracing::debug!(
                kind = report.kind.label(),
                start = %report.start_date,
                end = %report.end_date,
                "Summary report emitted"
            );
        }
    }
}
