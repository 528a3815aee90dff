//! Application configuration. Bind address and report schedule.
//!
//! Read from `EXPENSE_TRACKER_*` environment variables, a `.env` file and an
//! optional config file named by `EXPENSE_TRACKER_CONFIG`. Every field has a
//! default, so an empty environment gives the reference setup (port 3000,
//! daily report at midnight, weekly report Sunday midnight).

use chrono::{NaiveTime, Weekday};
use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_REPORT_TIME: &str = "00:00";
pub const DEFAULT_WEEKLY_REPORT_DAY: &str = "sun";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid {field}: {value:?}")]
    Invalid { field: &'static str, value: String },
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    /// Interface to bind. Read from EXPENSE_TRACKER_HOST.
    #[serde(default)]
    pub host: Option<String>,

    /// Listen port. Read from EXPENSE_TRACKER_PORT.
    #[serde(default)]
    pub port: Option<u16>,

    /// Turn the daily/weekly summary reports off. Read from EXPENSE_TRACKER_SCHEDULER_ENABLED.
    #[serde(default)]
    pub scheduler_enabled: Option<bool>,

    /// UTC time of day for the daily report, "HH:MM".
    #[serde(default)]
    pub daily_report_time: Option<String>,

    /// Day of the week for the weekly report ("sun", "monday", ...).
    #[serde(default)]
    pub weekly_report_day: Option<String>,

    /// UTC time of day for the weekly report, "HH:MM".
    #[serde(default)]
    pub weekly_report_time: Option<String>,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        let mut c = config::Config::builder();
        if let Ok(path) = std::env::var("EXPENSE_TRACKER_CONFIG") {
            c = c.add_source(config::File::with_name(&path));
        }
        // Environment wins over the file
        c = c.add_source(
            config::Environment::with_prefix("EXPENSE_TRACKER")
                .try_parsing(true)
                .ignore_empty(true),
        );
        let cfg: Self = c.build()?.try_deserialize()?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject schedule values that would only fail once the scheduler starts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.daily_report_time()?;
        self.weekly_report_day()?;
        self.weekly_report_time()?;
        Ok(())
    }

    pub fn host_or_default(&self) -> &str {
        self.host.as_deref().unwrap_or(DEFAULT_HOST)
    }

    pub fn port_or_default(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }

    /// "host:port" for the listener
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host_or_default(), self.port_or_default())
    }

    pub fn scheduler_enabled_or_default(&self) -> bool {
        self.scheduler_enabled.unwrap_or(true)
    }

    pub fn daily_report_time(&self) -> Result<NaiveTime, ConfigError> {
        parse_time(
            "daily_report_time",
            self.daily_report_time.as_deref().unwrap_or(DEFAULT_REPORT_TIME),
        )
    }

    pub fn weekly_report_time(&self) -> Result<NaiveTime, ConfigError> {
        parse_time(
            "weekly_report_time",
            self.weekly_report_time.as_deref().unwrap_or(DEFAULT_REPORT_TIME),
        )
    }

    pub fn weekly_report_day(&self) -> Result<Weekday, ConfigError> {
        let value = self
            .weekly_report_day
            .as_deref()
            .unwrap_or(DEFAULT_WEEKLY_REPORT_DAY);
        // chrono accepts "sun", "Sunday", "SUNDAY", ...
        value.trim().parse::<Weekday>().map_err(|_| ConfigError::Invalid {
            field: "weekly_report_day",
            value: value.to_string(),
        })
    }
}

fn parse_time(field: &'static str, value: &str) -> Result<NaiveTime, ConfigError> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M").map_err(|_| ConfigError::Invalid {
        field,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn midnight() -> NaiveTime {
        NaiveTime::from_hms_opt(0, 0, 0).unwrap()
    }

    #[test]
    fn test_defaults_match_reference_setup() {
        let cfg = AppConfig::default();

        assert_eq!(cfg.bind_addr(), "0.0.0.0:3000");
        assert!(cfg.scheduler_enabled_or_default());
        assert_eq!(cfg.daily_report_time().unwrap(), midnight());
        assert_eq!(cfg.weekly_report_day().unwrap(), Weekday::Sun);
        assert_eq!(cfg.weekly_report_time().unwrap(), midnight());
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_custom_schedule() {
        let cfg = AppConfig {
            port: Some(8080),
            daily_report_time: Some("23:45".to_string()),
            weekly_report_day: Some("Monday".to_string()),
            ..Default::default()
        };

        assert_eq!(cfg.port_or_default(), 8080);
        assert_eq!(
            cfg.daily_report_time().unwrap(),
            NaiveTime::from_hms_opt(23, 45, 0).unwrap()
        );
        assert_eq!(cfg.weekly_report_day().unwrap(), Weekday::Mon);
    }

    #[test]
    fn test_invalid_schedule_rejected() {
        let cfg = AppConfig {
            daily_report_time: Some("25:00".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::Invalid { field: "daily_report_time", .. })
        ));

        let cfg = AppConfig {
            weekly_report_day: Some("someday".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::Invalid { field: "weekly_report_day", .. })
        ));
    }
}
