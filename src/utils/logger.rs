// src/utils/logger.rs

use log::{LevelFilter, SetLoggerError};
use log4rs::{
    append::console::ConsoleAppender,
    append::file::FileAppender,
    config::{Appender, Config, Root},
    encode::json::JsonEncoder,
    encode::pattern::PatternEncoder,
    Handle,
};
use std::sync::OnceLock;

static LOG_HANDLE: OnceLock<Handle> = OnceLock::new();

fn build_config(level: LevelFilter) -> Config {
    let stdout = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{d(%Y-%m-%d %H:%M:%S)} {h({l})} [{T}] {M} - {m}{n}",
        )))
        .build();

    let logfile = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{d(%Y-%m-%d %H:%M:%S%.3f)} {l} [{T}] {M}:{L} - {m}{n}",
        )))
        .build("logs/omnigov.log")
        .expect("Failed to create log file");

    // JSON appender so indexers can consume the event stream directly
    let json_logfile = FileAppender::builder()
        .encoder(Box::new(JsonEncoder::new()))
        .build("logs/omnigov.json")
        .expect("Failed to create JSON log file");

    Config::builder()
        .appender(Appender::builder().build("stdout", Box::new(stdout)))
        .appender(Appender::builder().build("logfile", Box::new(logfile)))
        .appender(Appender::builder().build("json_logfile", Box::new(json_logfile)))
        .build(
            Root::builder()
                .appender("stdout")
                .appender("logfile")
                .appender("json_logfile")
                .build(level),
        )
        .expect("Failed to create log configuration")
}

pub fn setup_logger() -> Result<(), SetLoggerError> {
    let _ = std::fs::create_dir_all("logs");

    let handle = log4rs::init_config(build_config(LevelFilter::Info))?;
    let _ = LOG_HANDLE.set(handle);

    log::info!("Logger initialized with structured logging");
    Ok(())
}

pub fn set_log_level(level: LevelFilter) {
    if let Some(handle) = LOG_HANDLE.get() {
        handle.set_config(build_config(level));
        log::info!("Log level changed to: {:?}", level);
    }
}
