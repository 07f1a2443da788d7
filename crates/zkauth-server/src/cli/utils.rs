use super::commands::Cli;
use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use zkauth_server::LoggingConfig;
use zkauth_types::{ZkAuthError, ZkAuthResult};

/// `RUST_LOG` wins over the verbosity flags, which win over the config level.
pub fn log_directive(cli: &Cli, logging: &LoggingConfig) -> String {
    if cli.quiet {
        return "warn".to_string();
    }
    match cli.verbose {
        0 => logging.level.to_string(),
        1 => "info,zkauth_server=debug".to_string(),
        2 => "debug".to_string(),
        _ => "trace".to_string(),
    }
}

pub fn init_logging(cli: &Cli, logging: &LoggingConfig) -> ZkAuthResult<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_directive(cli, logging)));

    let log_file = cli.log_file.as_ref().or(logging.file.as_ref());
    let writer = match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| ZkAuthError::Config(format!("Failed to open log file: {}", e)))?;
            BoxMakeWriter::new(Mutex::new(file))
        }
        None => BoxMakeWriter::new(std::io::stdout),
    };

    let registry = tracing_subscriber::registry().with(env_filter);
    let result = if logging.json {
        registry.with(fmt::layer().json().with_writer(writer)).try_init()
    } else {
        registry
            .with(
                fmt::layer()
                    .with_writer(writer)
                    .with_ansi(log_file.is_none())
                    .with_target(cli.verbose >= 2),
            )
            .try_init()
    };

    result.map_err(|e| ZkAuthError::Config(format!("Failed to initialize logging: {}", e)))
}
