// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! # Log Forwarder
//!
//! An appender that forwards formatted log events, one HTTPS request per
//! event, to a log intake API.
//!
//! ## Pipeline
//!
//! For every event handed to a started [`LogAppender`]:
//! 1. The [`Layout`] renders the event as a string
//! 2. The size guard drops it if it is larger than the payload limit
//! 3. Events longer than the compression threshold are gzip-compressed
//! 4. The request gets JSON content headers, the `Api-Key` header and,
//!    when compressed, `Content-Encoding: gzip`
//! 5. The delivery worker sends it, retrying responses with status >= 300
//! 6. The outcome reporter waits up to 500 ms and writes exactly one status
//!
//! Appending never blocks on the network and never returns an error to the
//! caller; outcomes are reported through a [`StatusSink`].

#![deny(clippy::all)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::panic))]
#![deny(unused_extern_crates)]
#![allow(clippy::module_name_repetitions)]

pub mod appender;
pub mod constants;

/// Retry state machine and the delivery loop
pub mod delivery;

pub mod error;

/// Formatting seam for host log events
pub mod layout;

/// Size guard and gzip encoding
pub mod payload;

pub mod reporter;
pub mod request;

/// Destination, size and retry configuration
pub mod settings;

pub mod status;
pub mod transport;
pub mod worker;

pub use appender::{AppenderConfig, LogAppender};
pub use error::AppenderError;
pub use layout::{JsonMessageLayout, Layout, PassthroughLayout};
pub use settings::DeliverySettings;
pub use status::{Status, StatusBuffer, StatusLevel, StatusSink, TracingStatusSink};
