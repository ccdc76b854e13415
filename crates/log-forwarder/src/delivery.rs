// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Delivery of one request, with retries on unsatisfactory status codes.
//!
//! # Retry state machine
//!
//! ```text
//!   Attempt(1) ──send──> response ──status < 300──────────> Delivered
//!        ^                   │
//!        │                   ├──retries used up────────────> Delivered (last response)
//!        │                   │
//!        └──sleep(interval)──┘
//!
//!   any attempt ──transport error──> Failed (no retry)
//! ```
//!
//! Network-level failures end the delivery immediately, only responses with
//! a status of 300 or more are retried. Each delivery's attempts are strictly
//! sequential. The pause between attempts is an async sleep, so it never holds
//! up other deliveries running on the same worker.

use std::time::Duration;

use tokio::time::sleep;
use tracing::debug;

use crate::request::RequestDescriptor;
use crate::transport::{Response, Transport, TransportError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries allowed after the first attempt
    pub retries: u32,
    pub interval: Duration,
}

/// What to do after an attempt that produced a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Done,
    RetryAfter(Duration),
}

impl RetryPolicy {
    #[must_use]
    pub fn new(retries: u32, interval: Duration) -> Self {
        RetryPolicy { retries, interval }
    }

    /// Transition for the `attempt`-th attempt (1-based) answering with `status`.
    #[must_use]
    pub fn next_step(&self, attempt: u32, status: u16) -> Step {
        if status < 300 || attempt > self.retries {
            Step::Done
        } else {
            Step::RetryAfter(self.interval)
        }
    }
}

/// Sends `request` until it is accepted or the retry budget is spent.
///
/// Resolves to the last response received, or to the first transport error.
pub async fn deliver(
    transport: &dyn Transport,
    request: &RequestDescriptor,
    policy: RetryPolicy,
) -> Result<Response, TransportError> {
    let mut attempt: u32 = 1;
    loop {
        let response = match transport.send(request).await {
            Ok(response) => response,
            Err(e) => {
                debug!(
                    "LOG FORWARDER | Attempt {} to {} failed, not retrying: {}",
                    attempt, request.uri, e
                );
                return Err(e);
            }
        };

        match policy.next_step(attempt, response.status) {
            Step::Done => {
                debug!(
                    "LOG FORWARDER | Delivery to {} finished after {} attempt(s) with status {}",
                    request.uri, attempt, response.status
                );
                return Ok(response);
            }
            Step::RetryAfter(interval) => {
                debug!(
                    "LOG FORWARDER | Attempt {} to {} returned {}, retrying in {} ms",
                    attempt,
                    request.uri,
                    response.status,
                    interval.as_millis()
                );
                sleep(interval).await;
                attempt += 1;
            }
        }
    }
}
