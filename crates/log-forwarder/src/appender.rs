// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! The appender a host logging framework drives.
//!
//! `start` runs the one-time validation and activates the appender; every
//! `append` afterwards formats the event, checks its size, encodes and builds
//! the request on the calling thread, then hands delivery and reporting to the
//! delivery worker. Nothing here returns an error to the host: every outcome
//! becomes one status message.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio_util::task::TaskTracker;
use tracing::debug;

use crate::constants::{NOT_STARTED_WARNINGS, REPORT_TIMEOUT};
use crate::delivery::deliver;
use crate::error::AppenderError;
use crate::layout::Layout;
use crate::payload::{check_payload_size, encode};
use crate::reporter::{publish, report};
use crate::request::{build, RequestDescriptor};
use crate::settings::DeliverySettings;
use crate::status::{StatusSink, TracingStatusSink};
use crate::transport::{HttpTransport, Transport};
use crate::worker::DeliveryWorker;

#[derive(Debug, Clone, Default)]
pub struct AppenderConfig<L> {
    /// Name used in status messages
    pub name: String,
    pub layout: Option<L>,
    pub settings: DeliverySettings,
}

pub struct LogAppender<L> {
    name: String,
    layout: Option<L>,
    settings: DeliverySettings,
    status: Arc<dyn StatusSink>,
    transport: Option<Arc<dyn Transport>>,
    worker: Option<Handle>,
    started: AtomicBool,
    not_started_warnings: AtomicU32,
    tracker: TaskTracker,
}

impl<L> LogAppender<L> {
    #[must_use]
    pub fn new(config: AppenderConfig<L>) -> Self {
        LogAppender {
            name: config.name,
            layout: config.layout,
            settings: config.settings,
            status: Arc::new(TracingStatusSink),
            transport: None,
            worker: None,
            started: AtomicBool::new(false),
            not_started_warnings: AtomicU32::new(0),
            tracker: TaskTracker::new(),
        }
    }

    #[must_use]
    pub fn with_status_sink(mut self, status: Arc<dyn StatusSink>) -> Self {
        self.status = status;
        self
    }

    /// Replaces the HTTP transport that `start` would otherwise build.
    #[must_use]
    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Runs deliveries on `worker` instead of the process-wide delivery worker.
    #[must_use]
    pub fn with_worker(mut self, worker: Handle) -> Self {
        self.worker = Some(worker);
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn settings(&self) -> &DeliverySettings {
        &self.settings
    }

    /// One error per required attribute that is not set, in the order
    /// layout, host, url, apiKey.
    #[must_use]
    pub fn validate(&self) -> Vec<AppenderError> {
        let layout_missing = self.layout.is_none().then_some("layout");
        layout_missing
            .into_iter()
            .chain(self.settings.missing_required())
            .map(|attribute| AppenderError::MissingSetting {
                attribute,
                appender: self.name.clone(),
            })
            .collect()
    }

    /// Validates the configuration and activates the appender.
    ///
    /// Every validation error is reported as its own status. Returns whether
    /// the appender is active.
    pub fn start(&mut self) -> bool {
        if self.is_started() {
            return true;
        }

        let errors = self.validate();
        if !errors.is_empty() {
            for error in &errors {
                self.status.add_error(&error.to_string());
            }
            return false;
        }

        if self.worker.is_none() {
            match DeliveryWorker::shared() {
                Ok(worker) => self.worker = Some(worker.handle()),
                Err(e) => {
                    self.status.add_error(&e.to_string());
                    return false;
                }
            }
        }
        if self.transport.is_none() {
            self.transport = Some(Arc::new(HttpTransport::for_settings(&self.settings)));
        }

        self.not_started_warnings.store(0, Ordering::Relaxed);
        self.started.store(true, Ordering::Release);
        debug!(
            "LOG FORWARDER | Appender [{}] started, sending to {}",
            self.name,
            self.settings.endpoint_uri()
        );
        true
    }

    /// Deactivates the appender. Deliveries already handed to the worker
    /// keep running.
    pub fn stop(&self) {
        if self.started.swap(false, Ordering::AcqRel) {
            debug!("LOG FORWARDER | Appender [{}] stopped", self.name);
        }
    }

    #[must_use]
    pub fn is_started(&self) -> bool {
        self.started.load(Ordering::Acquire)
    }

    /// Formats `event` with the layout and forwards it.
    pub fn append<E>(&self, event: &E)
    where
        E: ?Sized,
        L: Layout<E>,
    {
        if !self.is_started() {
            self.warn_not_started();
            return;
        }
        let Some(layout) = &self.layout else {
            return;
        };
        let formatted = layout.format(event);
        self.handle_event(&formatted);
    }

    /// Forwards an already formatted event.
    ///
    /// Size check, encoding and request building run on the calling thread.
    /// Delivery and reporting run on the worker, so this never waits on the
    /// network.
    pub fn handle_event(&self, event: &str) {
        let (Some(worker), Some(transport)) = (&self.worker, &self.transport) else {
            self.warn_not_started();
            return;
        };
        if !self.is_started() {
            self.warn_not_started();
            return;
        }

        let request = match self.prepare(event) {
            Ok(request) => request,
            Err(e) => {
                self.status.add_error(&e.to_string());
                return;
            }
        };

        let transport = Arc::clone(transport);
        let status = Arc::clone(&self.status);
        let policy = self.settings.retry_policy();
        let tracker = self.tracker.clone();
        self.tracker.spawn_on(
            async move {
                let delivery =
                    tracker.spawn(async move { deliver(transport.as_ref(), &request, policy).await });
                publish(status.as_ref(), report(delivery, REPORT_TIMEOUT).await);
            },
            worker,
        );
    }

    /// Waits up to `timeout` for every delivery handed to the worker so far.
    /// Returns whether they all finished in time.
    pub async fn drain(&self, timeout: Duration) -> bool {
        self.tracker.close();
        let drained = tokio::time::timeout(timeout, self.tracker.wait())
            .await
            .is_ok();
        self.tracker.reopen();
        if !drained {
            debug!(
                "LOG FORWARDER | Appender [{}] still has {} delivery task(s) in flight",
                self.name,
                self.tracker.len()
            );
        }
        drained
    }

    fn prepare(&self, event: &str) -> Result<RequestDescriptor, AppenderError> {
        check_payload_size(event, &self.settings)?;
        let payload = encode(event, &self.settings)?;
        build(payload, &self.settings)
    }

    fn warn_not_started(&self) {
        let previous = self.not_started_warnings.fetch_add(1, Ordering::Relaxed);
        if previous < NOT_STARTED_WARNINGS {
            self.status.add_warn(&format!(
                "Attempted to append to non started appender [{}].",
                self.name
            ));
        }
    }
}
