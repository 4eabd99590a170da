// Configuration module entry point
// Loads layered configuration and holds the shared runtime state

mod state;
mod types;

use std::net::SocketAddr;

use config::builder::DefaultState;
use config::ConfigBuilder;

use crate::diagram::RasterOptions;
use crate::stakeholder::ChartOptions;

// Re-export public types
pub use state::AppState;
pub use types::{
    Config, HttpConfig, LoggingConfig, PerformanceConfig, RenderConfig, ServerConfig,
};

const MAX_DPI: u32 = 1200;
const DEFAULT_MAX_PIXELS: i64 = 64 * 1024 * 1024;

impl Config {
    /// Load configuration from specified file path (without extension)
    /// Default config file is "config.toml" when no path specified.
    /// Environment variables such as `VENN_SERVER__PORT` override the file.
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = Self::with_defaults(config::Config::builder())?
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("VENN")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }

    /// Built-in defaults only, with no file or environment layer
    pub fn defaults() -> Result<Self, config::ConfigError> {
        Self::with_defaults(config::Config::builder())?
            .build()?
            .try_deserialize()
    }

    fn with_defaults(
        builder: ConfigBuilder<DefaultState>,
    ) -> Result<ConfigBuilder<DefaultState>, config::ConfigError> {
        builder
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 5000)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "combined")?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("http.server_name", "stakeholder-venn")?
            .set_default("http.enable_cors", false)?
            .set_default("render.dpi", 300)?
            .set_default("render.figure_width", 14.0)?
            .set_default("render.figure_height", 10.0)?
            .set_default("render.pad_inches", 0.1)?
            .set_default("render.font_family", "DejaVu Sans")?
            .set_default("render.max_pixels", DEFAULT_MAX_PIXELS)
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }

    /// Reject settings that would make every render fail
    pub fn validate(&self) -> Result<(), String> {
        let render = &self.render;
        if render.dpi == 0 || render.dpi > MAX_DPI {
            return Err(format!(
                "Invalid render.dpi {}: must be between 1 and {MAX_DPI}",
                render.dpi
            ));
        }
        for (name, value) in [
            ("render.figure_width", render.figure_width),
            ("render.figure_height", render.figure_height),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(format!("Invalid {name} {value}: must be a positive number"));
            }
        }
        if !render.pad_inches.is_finite() || render.pad_inches < 0.0 {
            return Err(format!(
                "Invalid render.pad_inches {}: must not be negative",
                render.pad_inches
            ));
        }
        if render.max_pixels == 0 {
            return Err("Invalid render.max_pixels 0: must be at least 1".to_string());
        }
        if self.server.workers == Some(0) {
            return Err("Invalid server.workers 0: must be at least 1".to_string());
        }
        self.get_socket_addr().map(|_| ())
    }

    pub fn chart_options(&self) -> ChartOptions {
        ChartOptions {
            width_in: self.render.figure_width,
            height_in: self.render.figure_height,
            raster: RasterOptions {
                dpi: self.render.dpi,
                pad_inches: self.render.pad_inches,
                font_family: self.render.font_family.clone(),
                max_pixels: self.render.max_pixels,
                ..RasterOptions::default()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::defaults().unwrap();
        assert_eq!(config.get_socket_addr().unwrap().to_string(), "0.0.0.0:5000");
        assert_eq!(config.server.workers, None);
        assert_eq!(config.logging.level, "info");
        assert!(config.logging.access_log);
        assert_eq!(config.logging.access_log_format, "combined");
        assert_eq!(config.performance.max_connections, None);
        assert_eq!(config.http.max_body_size, None);
        assert!(!config.http.enable_cors);
        assert_eq!(config.render.dpi, 300);
        assert!(config.render.font_dirs.is_empty());
        assert_eq!(config.render.max_pixels, 64 * 1024 * 1024);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_chart_options_follow_render_section() {
        let mut config = Config::defaults().unwrap();
        config.render.dpi = 150;
        config.render.figure_width = 7.0;
        config.render.max_pixels = 1_000_000;
        let options = config.chart_options();
        assert_eq!(options.raster.dpi, 150);
        assert_eq!(options.raster.max_pixels, 1_000_000);
        assert!((options.width_in - 7.0).abs() < f64::EPSILON);
        assert!((options.height_in - 10.0).abs() < f64::EPSILON);
        assert_eq!(options.raster.background, [255, 255, 255]);
    }

    #[test]
    fn test_validate_rejects_bad_render_settings() {
        let mut config = Config::defaults().unwrap();
        config.render.dpi = 0;
        assert!(config.validate().unwrap_err().contains("render.dpi"));

        let mut config = Config::defaults().unwrap();
        config.render.figure_height = -1.0;
        assert!(config.validate().unwrap_err().contains("figure_height"));

        let mut config = Config::defaults().unwrap();
        config.render.pad_inches = f64::NAN;
        assert!(config.validate().is_err());

        let mut config = Config::defaults().unwrap();
        config.render.max_pixels = 0;
        assert!(config.validate().unwrap_err().contains("render.max_pixels"));
    }

    #[test]
    fn test_validate_rejects_bad_address() {
        let mut config = Config::defaults().unwrap();
        config.server.host = "not an address".to_string();
        assert!(config.validate().unwrap_err().starts_with("Invalid address"));
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let config = Config::load_from("/nonexistent/venn-config").unwrap();
        assert_eq!(config.render.font_family, "DejaVu Sans");
    }
}
