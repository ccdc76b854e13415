// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Wire-level names and size/retry limits for the log intake API.
//!
//! The intake accepts one JSON log line per POST request. Lines that are larger
//! than the uncompressed threshold are gzip-compressed before sending, and no
//! request body may exceed [`MAX_PAYLOAD_SIZE`].

use std::time::Duration;

pub const CONTENT_TYPE_HEADER: &str = "Content-Type";
pub const ACCEPT_HEADER: &str = "Accept";
pub const CONTENT_ENCODING_HEADER: &str = "Content-Encoding";
pub const API_KEY_HEADER: &str = "Api-Key";

pub const CONTENT_TYPE_JSON: &str = "application/json";
pub const CONTENT_ENCODING_GZIP: &str = "gzip";

/// Lower bound for the compression threshold, in characters.
///
/// Compressing anything shorter costs more than it saves: the gzip header and
/// trailer alone are 18 bytes.
pub const MIN_UNCOMPRESSED_SIZE: usize = 256;

/// Default compression threshold, in characters.
pub const DEFAULT_MAX_UNCOMPRESSED_SIZE: usize = 1_024;

/// Largest request body the intake accepts, in bytes.
///
/// # Value: 1,024,000 bytes
///
/// A configured `max_payload_size` is clamped to this value.
pub const MAX_PAYLOAD_SIZE: usize = DEFAULT_MAX_UNCOMPRESSED_SIZE * 1_000;

pub const DEFAULT_RETRY_INTERVAL: Duration = Duration::from_millis(2_000);
pub const DEFAULT_RETRY_NUMBER: u32 = 3;

/// Connect timeout of the shared HTTP client.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(2);

/// Upper bound for a single request/response exchange.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// How long the outcome reporter waits for a delivery to finish.
///
/// Measured from the moment reporting starts, not from the first attempt.
pub const REPORT_TIMEOUT: Duration = Duration::from_millis(500);

/// Number of "appender not started" warnings emitted before going quiet.
pub const NOT_STARTED_WARNINGS: u32 = 3;

pub const WORKER_THREAD_NAME: &str = "log-forwarder-worker";
