// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Status channel back to the host logging framework.
//!
//! The appender never returns errors to its caller. Everything worth telling
//! the host (delivery confirmations, dropped events, configuration problems)
//! is pushed through a [`StatusSink`] instead.

use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum StatusLevel {
    Info,
    Warn,
    Error,
}

impl fmt::Display for StatusLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusLevel::Info => write!(f, "INFO"),
            StatusLevel::Warn => write!(f, "WARN"),
            StatusLevel::Error => write!(f, "ERROR"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub level: StatusLevel,
    pub message: String,
}

/// Receives status messages. Called from the delivery worker as well as from
/// the threads that append events.
pub trait StatusSink: Send + Sync {
    fn add_status(&self, level: StatusLevel, message: &str);

    fn add_info(&self, message: &str) {
        self.add_status(StatusLevel::Info, message);
    }

    fn add_warn(&self, message: &str) {
        self.add_status(StatusLevel::Warn, message);
    }

    fn add_error(&self, message: &str) {
        self.add_status(StatusLevel::Error, message);
    }
}

/// Forwards statuses to `tracing` under the `log_forwarder::status` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingStatusSink;

impl StatusSink for TracingStatusSink {
    fn add_status(&self, level: StatusLevel, message: &str) {
        match level {
            StatusLevel::Info => info!(target: "log_forwarder::status", "{}", message),
            StatusLevel::Warn => warn!(target: "log_forwarder::status", "{}", message),
            StatusLevel::Error => error!(target: "log_forwarder::status", "{}", message),
        }
    }
}

/// Keeps every status in memory, in arrival order.
#[derive(Debug, Default)]
pub struct StatusBuffer {
    statuses: Mutex<Vec<Status>>,
}

impl StatusBuffer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn statuses(&self) -> Vec<Status> {
        self.lock().clone()
    }

    #[must_use]
    pub fn count(&self, level: StatusLevel) -> usize {
        self.lock().iter().filter(|s| s.level == level).count()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    // A panic while holding the lock cannot leave the Vec half-written
    fn lock(&self) -> MutexGuard<'_, Vec<Status>> {
        self.statuses.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl StatusSink for StatusBuffer {
    fn add_status(&self, level: StatusLevel, message: &str) {
        self.lock().push(Status {
            level,
            message: message.to_string(),
        });
    }
}
