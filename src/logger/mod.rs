//! Logger module
//!
//! Provides logging utilities for the service including:
//! - Server lifecycle logging
//! - Access logging with multiple formats
//! - Error and warning logging
//! - File-based logging support

mod format;
pub mod writer;

pub use format::{AccessLogEntry, LogFormat};
pub use writer::LogLevel;

use crate::config::Config;
use std::net::SocketAddr;

/// Initialize the logger with configuration
///
/// Should be called once at application startup.
pub fn init(config: &Config) -> std::io::Result<()> {
    writer::init(
        LogLevel::parse(&config.logging.level),
        config.logging.access_log_file.as_deref(),
        config.logging.error_log_file.as_deref(),
    )
}

/// Write at `level`, falling back to stdout/stderr before `init()`
fn write(level: LogLevel, message: &str) {
    match writer::get() {
        Some(writer) => writer.write(level, message),
        None if level <= LogLevel::Warn => eprintln!("{message}"),
        None => println!("{message}"),
    }
}

fn write_access(message: &str) {
    match writer::get() {
        Some(writer) => writer.write_access(message),
        None => println!("{message}"),
    }
}

pub fn log_server_start(addr: &SocketAddr, config: &Config, font_faces: usize) {
    let info = |message: &str| write(LogLevel::Info, message);
    info("======================================");
    info("Stakeholder Venn service started");
    info(&format!("Listening on: http://{addr}"));
    info(&format!("Log level: {}", config.logging.level));
    if let Some(workers) = config.server.workers {
        info(&format!("Worker threads: {workers}"));
    }
    if let Some(ref path) = config.logging.access_log_file {
        info(&format!("Access log: {path}"));
    }
    if let Some(ref path) = config.logging.error_log_file {
        info(&format!("Error log: {path}"));
    }
    info(&format!(
        "Render: {} DPI, {}x{} in, font '{}' ({font_faces} faces loaded)",
        config.render.dpi,
        config.render.figure_width,
        config.render.figure_height,
        config.render.font_family,
    ));
    info("======================================\n");
}

pub fn log_connection_accepted(peer_addr: &SocketAddr) {
    write(
        LogLevel::Info,
        &format!("[Connection] Accepted from: {peer_addr}"),
    );
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    write(
        LogLevel::Error,
        &format!("[ERROR] Failed to serve connection: {err:?}"),
    );
}

pub fn log_error(message: &str) {
    write(LogLevel::Error, &format!("[ERROR] {message}"));
}

pub fn log_warning(message: &str) {
    write(LogLevel::Warn, &format!("[WARN] {message}"));
}

pub fn log_info(message: &str) {
    write(LogLevel::Info, &format!("[INFO] {message}"));
}

/// Log a failed diagram request with its internal category
pub fn log_generation_failed(category: &str, err: &dyn std::error::Error) {
    write(
        LogLevel::Error,
        &format!("[ERROR] Diagram generation failed ({category}): {err}"),
    );
}

pub fn log_build_error(context: &str, err: &impl std::fmt::Display) {
    write(
        LogLevel::Error,
        &format!("[ERROR] Failed to build {context} response: {err}"),
    );
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &LogFormat) {
    write_access(&entry.format(format));
}

pub fn log_shutdown() {
    write(LogLevel::Info, "[Shutdown] Stopped accepting connections");
}
