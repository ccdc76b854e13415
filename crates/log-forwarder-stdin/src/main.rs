// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

#![cfg_attr(not(test), deny(clippy::panic))]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::todo))]
#![cfg_attr(not(test), deny(clippy::unimplemented))]

use std::env;
use std::process::ExitCode;

use tokio::io::{stdin, AsyncBufReadExt, BufReader};
use tokio::time::Duration;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use log_forwarder::{
    AppenderConfig, DeliverySettings, JsonMessageLayout, Layout, LogAppender, PassthroughLayout,
};

const DEFAULT_APPENDER_NAME: &str = "stdin";
const DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

/// How a stdin line becomes an event body.
#[derive(Debug, Clone, Copy)]
enum LineLayout {
    Raw,
    Json,
}

impl Layout<str> for LineLayout {
    fn format(&self, line: &str) -> String {
        match self {
            LineLayout::Raw => Layout::<str>::format(&PassthroughLayout, line),
            LineLayout::Json => Layout::<str>::format(&JsonMessageLayout, line),
        }
    }
}

#[tokio::main]
pub async fn main() -> ExitCode {
    let log_level = env::var("LOG_FORWARDER_LOG_LEVEL")
        .map(|val| val.to_lowercase())
        .unwrap_or("info".to_string());
    let appender_name = env::var("LOG_FORWARDER_APPENDER_NAME")
        .unwrap_or_else(|_| DEFAULT_APPENDER_NAME.to_string());
    let raw_json = env::var("LOG_FORWARDER_RAW_JSON")
        .map(|val| val.to_lowercase() == "true")
        .unwrap_or(false);

    let env_filter = format!("h2=off,hyper=off,rustls=off,{}", log_level);

    #[allow(clippy::expect_used)]
    let subscriber = tracing_subscriber::fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_new(env_filter).expect("could not parse log level in configuration"),
        )
        .with_level(true)
        .with_thread_names(false)
        .with_thread_ids(false)
        .with_line_number(false)
        .with_file(false)
        .with_target(true)
        .without_time()
        .with_writer(std::io::stderr)
        .finish();

    #[allow(clippy::expect_used)]
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    debug!("Logging subsystem enabled");

    let layout = if raw_json {
        LineLayout::Raw
    } else {
        LineLayout::Json
    };
    let settings = DeliverySettings::from_env();
    debug!("Forwarding stdin with {:?}", settings);

    let mut appender = LogAppender::new(AppenderConfig {
        name: appender_name,
        layout: Some(layout),
        settings,
    });
    if !appender.start() {
        error!("Appender could not be started, check the LOG_FORWARDER_* variables");
        return ExitCode::FAILURE;
    }

    let mut lines = BufReader::new(stdin()).lines();
    let mut forwarded: u64 = 0;
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);
    loop {
        tokio::select! {
            line = lines.next_line() => match line {
                Ok(Some(line)) if line.trim().is_empty() => {}
                Ok(Some(line)) => {
                    appender.append(line.as_str());
                    forwarded += 1;
                }
                Ok(None) => break,
                Err(e) => {
                    error!("Failed to read stdin: {}", e);
                    break;
                }
            },
            _ = &mut shutdown => {
                debug!("Interrupted, shutting down");
                break;
            }
        }
    }

    appender.stop();
    if !appender.drain(DRAIN_TIMEOUT).await {
        error!(
            "Deliveries still in flight after {:?}, exiting anyway",
            DRAIN_TIMEOUT
        );
    }
    info!("Forwarded {} event(s)", forwarded);
    ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_lines_are_forwarded_verbatim() {
        let line = "{\"message\":\"already json\"}";
        assert_eq!(LineLayout::Raw.format(line), line);
    }

    #[test]
    fn test_plain_lines_are_wrapped() {
        let body = LineLayout::Json.format("plain text");
        assert!(body.starts_with("{\"message\":\"plain text\""));
        assert!(body.contains("\"timestamp\":"));
    }
}
