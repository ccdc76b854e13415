// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! The background context that runs every delivery and report.
//!
//! Appending an event never waits on the network: the appender hands the
//! built request to this worker and returns. The worker is a tokio runtime
//! with a single worker thread, created once per process and kept until
//! process exit.

use once_cell::sync::OnceCell;
use tokio::runtime::{Builder, Handle, Runtime};
use tracing::debug;

use crate::constants::WORKER_THREAD_NAME;
use crate::error::AppenderError;

static SHARED_WORKER: OnceCell<DeliveryWorker> = OnceCell::new();

#[derive(Debug)]
pub struct DeliveryWorker {
    runtime: Runtime,
}

impl DeliveryWorker {
    pub fn new() -> Result<Self, AppenderError> {
        let runtime = Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name(WORKER_THREAD_NAME)
            .enable_all()
            .build()
            .map_err(|e| AppenderError::WorkerStart(e.to_string()))?;
        debug!("LOG FORWARDER | Delivery worker started");
        Ok(DeliveryWorker { runtime })
    }

    /// The process-wide worker, started on first use.
    pub fn shared() -> Result<&'static DeliveryWorker, AppenderError> {
        SHARED_WORKER.get_or_try_init(DeliveryWorker::new)
    }

    #[must_use]
    pub fn handle(&self) -> Handle {
        self.runtime.handle().clone()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_worker_is_a_singleton() {
        let first = DeliveryWorker::shared().unwrap();
        let second = DeliveryWorker::shared().unwrap();
        assert!(std::ptr::eq(first, second));
    }

    #[test]
    fn test_tasks_run_on_worker_thread() {
        let worker = DeliveryWorker::shared().unwrap();
        let (tx, rx) = std::sync::mpsc::channel();
        worker.handle().spawn(async move {
            let name = std::thread::current().name().map(str::to_string);
            tx.send(name).unwrap();
        });
        let name = rx.recv_timeout(std::time::Duration::from_secs(5)).unwrap();
        assert_eq!(name.as_deref(), Some(WORKER_THREAD_NAME));
    }
}
