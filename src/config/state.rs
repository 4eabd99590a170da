// Application state module
// Shared, read-only after startup: configuration, chart settings and fonts

use std::sync::Arc;

use usvg::fontdb;

use super::types::Config;
use crate::logger::LogFormat;
use crate::stakeholder::ChartOptions;

/// Application state
pub struct AppState {
    pub config: Config,
    pub chart: ChartOptions,
    pub fonts: Arc<fontdb::Database>,
    /// Parsed access log layout, `None` when access logging is off
    pub access_log: Option<LogFormat>,
}

impl AppState {
    pub fn new(config: Config, fonts: Arc<fontdb::Database>) -> Self {
        let access_log = config
            .logging
            .access_log
            .then(|| LogFormat::parse(&config.logging.access_log_format));

        Self {
            chart: config.chart_options(),
            config,
            fonts,
            access_log,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_with(access_log: bool, format: &str) -> AppState {
        let mut config = Config::defaults().unwrap();
        config.logging.access_log = access_log;
        config.logging.access_log_format = format.to_string();
        AppState::new(config, Arc::new(fontdb::Database::new()))
    }

    #[test]
    fn test_access_log_format_is_parsed_once() {
        assert_eq!(state_with(true, "json").access_log, Some(LogFormat::Json));
        assert_eq!(
            state_with(true, "$method $status").access_log,
            Some(LogFormat::Custom("$method $status".to_string()))
        );
    }

    #[test]
    fn test_access_log_disabled() {
        assert_eq!(state_with(false, "combined").access_log, None);
    }
}
