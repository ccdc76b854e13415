// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::time::Duration;

use crate::transport::TransportError;

/// Errors produced while validating an appender or forwarding one event.
///
/// None of these ever reach the host logging framework as a fault: the
/// appender turns each one into a status message.
#[derive(Debug, thiserror::Error)]
pub enum AppenderError {
    #[error("'{attribute}' attribute is not set for the appender named [{appender}]!")]
    MissingSetting {
        attribute: &'static str,
        appender: String,
    },

    #[error("Total log message size should be less than [{limit}] bytes. Message: {message}")]
    Oversize { limit: usize, message: String },

    #[error("Could not compress message: {0}")]
    Compression(#[source] std::io::Error),

    #[error("Invalid value for header '{header}': {source}")]
    InvalidHeader {
        header: &'static str,
        #[source]
        source: reqwest::header::InvalidHeaderValue,
    },

    #[error("An exception happened while logging: {0}")]
    Transport(#[from] TransportError),

    #[error("Could not post message: no delivery outcome within {0:?}")]
    ReportTimeout(Duration),

    #[error("Could not post message: delivery task did not complete: {0}")]
    DeliveryAborted(String),

    #[error("Failed to start delivery worker: {0}")]
    WorkerStart(String),

    #[error("Invalid settings: {0}")]
    Settings(String),
}
