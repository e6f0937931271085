//! Runtime configuration of the `grilla` binary.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::domain::week::DailySchedule;
use crate::services::scheduler::SchedulerOptions;

/// Prefix of the environment variables overriding file settings, e.g.
/// `GRILLA__DATABASE_URL` or `GRILLA__SCHEDULE__LAST_HOUR`.
pub const ENV_PREFIX: &str = "GRILLA";

/// Configuration options specific to the Grilla planner.
#[derive(Clone, Debug, Deserialize)]
pub struct GrillaConfig {
    /// Path of the SQLite database holding the content table.
    pub database_url: String,
    /// Operating hours shown by the grid.
    pub schedule: DailySchedule,
    /// Extra insert attempts when relocating content.
    pub relocation_retries: u32,
}

impl GrillaConfig {
    pub fn scheduler_options(&self) -> SchedulerOptions {
        SchedulerOptions {
            relocation_retries: self.relocation_retries,
            schedule: self.schedule,
        }
    }
}

/// Loads the configuration from defaults, the optional YAML file at `path`
/// and `GRILLA__*` environment variables, in increasing priority.
pub fn load_config(path: &str) -> Result<GrillaConfig, ConfigError> {
    let defaults = DailySchedule::default();
    let config: GrillaConfig = Config::builder()
        .set_default("database_url", "grilla.db")?
        .set_default("schedule.first_hour", defaults.first_hour)?
        .set_default("schedule.last_hour", defaults.last_hour)?
        .set_default(
            "relocation_retries",
            SchedulerOptions::default().relocation_retries,
        )?
        .add_source(File::with_name(path).required(false))
        .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"))
        .build()?
        .try_deserialize()?;

    DailySchedule::new(config.schedule.first_hour, config.schedule.last_hour)
        .map_err(|e| ConfigError::Message(e.to_string()))?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = load_config("/nonexistent/grilla-config").unwrap();
        assert_eq!(config.schedule, DailySchedule::default());
        assert_eq!(config.relocation_retries, 2);
    }

    #[test]
    fn yaml_file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(
            file,
            "database_url: planner.db\nschedule:\n  first_hour: 9\n  last_hour: 18\nrelocation_retries: 4"
        )
        .unwrap();

        let config = load_config(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.database_url, "planner.db");
        assert_eq!(config.schedule, DailySchedule::new(9, 18).unwrap());
        assert_eq!(config.scheduler_options().relocation_retries, 4);
        assert_eq!(config.scheduler_options().schedule, config.schedule);
    }

    #[test]
    fn inverted_schedule_is_rejected() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "schedule:\n  first_hour: 20\n  last_hour: 8").unwrap();

        assert!(load_config(file.path().to_str().unwrap()).is_err());
    }
}
