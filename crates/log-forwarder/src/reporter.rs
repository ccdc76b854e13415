// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Bounded wait on a delivery outcome.
//!
//! The deadline only limits how long the report waits. When it expires the
//! delivery task is detached, not cancelled, and may still finish or retry in
//! the background.

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinError;
use tokio::time::timeout;

use crate::error::AppenderError;
use crate::status::StatusSink;
use crate::transport::{Response, TransportError};

/// Waits up to `deadline` for `outcome` and renders it as a one-line message.
pub async fn report<F>(outcome: F, deadline: Duration) -> Result<String, AppenderError>
where
    F: Future<Output = Result<Result<Response, TransportError>, JoinError>>,
{
    match timeout(deadline, outcome).await {
        Ok(Ok(Ok(response))) => Ok(format!(
            "Successfully logged [{}]: {}",
            response.status, response.body
        )),
        Ok(Ok(Err(e))) => Err(AppenderError::Transport(e)),
        Ok(Err(join_error)) => Err(AppenderError::DeliveryAborted(join_error.to_string())),
        Err(_) => Err(AppenderError::ReportTimeout(deadline)),
    }
}

/// Writes exactly one status for a report.
pub fn publish(status: &dyn StatusSink, report: Result<String, AppenderError>) {
    match report {
        Ok(message) => status.add_info(&message),
        Err(e) => status.add_error(&e.to_string()),
    }
}
