// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Destination, size and retry configuration of an appender.
//!
//! Every field is optional. Unset or out-of-range values are resolved by the
//! accessor methods, so the raw fields always hold exactly what the host
//! configured:
//!
//! | Field | Default | Clamp |
//! |---|---|---|
//! | `max_payload_size` | 1,024,000 | `<= 1,024,000`, `0` means default |
//! | `max_uncompressed_size` | 1,024 | `>= 256` |
//! | `retry_interval` (ms) | 2,000 | |
//! | `retry_number` | 3 | |
//! | `connect_timeout` (ms) | 2,000 | |

use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;
use tracing::error;

use crate::constants::{
    DEFAULT_CONNECT_TIMEOUT, DEFAULT_MAX_UNCOMPRESSED_SIZE, DEFAULT_RETRY_INTERVAL,
    DEFAULT_RETRY_NUMBER, MAX_PAYLOAD_SIZE, MIN_UNCOMPRESSED_SIZE,
};
use crate::delivery::RetryPolicy;

const ENV_HOST: &str = "LOG_FORWARDER_HOST";
const ENV_URL: &str = "LOG_FORWARDER_URL";
const ENV_API_KEY: &str = "LOG_FORWARDER_API_KEY";
const ENV_MAX_PAYLOAD_SIZE: &str = "LOG_FORWARDER_MAX_PAYLOAD_SIZE";
const ENV_MAX_UNCOMPRESSED_SIZE: &str = "LOG_FORWARDER_MAX_UNCOMPRESSED_SIZE";
const ENV_RETRY_INTERVAL: &str = "LOG_FORWARDER_RETRY_INTERVAL";
const ENV_RETRY_NUMBER: &str = "LOG_FORWARDER_RETRY_NUMBER";
const ENV_CONNECT_TIMEOUT: &str = "LOG_FORWARDER_CONNECT_TIMEOUT";
const ENV_PROXY_HTTPS: &str = "LOG_FORWARDER_PROXY_HTTPS";
const ENV_HTTPS_PROXY: &str = "HTTPS_PROXY";

#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DeliverySettings {
    /// Scheme and authority of the intake, e.g. `https://log-api.example.com`
    pub host: Option<String>,
    /// Request path appended verbatim to `host`, e.g. `/log/v1`
    pub url: Option<String>,
    pub api_key: Option<String>,
    pub max_payload_size: Option<usize>,
    pub max_uncompressed_size: Option<usize>,
    /// Pause between attempts, in milliseconds
    pub retry_interval: Option<u64>,
    /// Retries after the first attempt
    pub retry_number: Option<u32>,
    /// Connect timeout, in milliseconds
    pub connect_timeout: Option<u64>,
    pub https_proxy: Option<String>,
}

impl DeliverySettings {
    /// Reads settings from `LOG_FORWARDER_*` environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds settings from an arbitrary variable source.
    ///
    /// Numeric values that do not parse are logged and left unset, so the
    /// default applies.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            host: lookup(ENV_HOST),
            url: lookup(ENV_URL),
            api_key: lookup(ENV_API_KEY),
            max_payload_size: parse_var(&lookup, ENV_MAX_PAYLOAD_SIZE),
            max_uncompressed_size: parse_var(&lookup, ENV_MAX_UNCOMPRESSED_SIZE),
            retry_interval: parse_var(&lookup, ENV_RETRY_INTERVAL),
            retry_number: parse_var(&lookup, ENV_RETRY_NUMBER),
            connect_timeout: parse_var(&lookup, ENV_CONNECT_TIMEOUT),
            https_proxy: lookup(ENV_PROXY_HTTPS).or_else(|| lookup(ENV_HTTPS_PROXY)),
        }
    }

    #[must_use]
    pub fn max_payload_size(&self) -> usize {
        match self.max_payload_size {
            Some(size) if size > 0 => size.min(MAX_PAYLOAD_SIZE),
            _ => MAX_PAYLOAD_SIZE,
        }
    }

    #[must_use]
    pub fn max_uncompressed_size(&self) -> usize {
        self.max_uncompressed_size
            .map_or(DEFAULT_MAX_UNCOMPRESSED_SIZE, |size| {
                size.max(MIN_UNCOMPRESSED_SIZE)
            })
    }

    #[must_use]
    pub fn retry_interval(&self) -> Duration {
        self.retry_interval
            .map_or(DEFAULT_RETRY_INTERVAL, Duration::from_millis)
    }

    #[must_use]
    pub fn retry_number(&self) -> u32 {
        self.retry_number.unwrap_or(DEFAULT_RETRY_NUMBER)
    }

    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        self.connect_timeout
            .map_or(DEFAULT_CONNECT_TIMEOUT, Duration::from_millis)
    }

    #[must_use]
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.retry_number(), self.retry_interval())
    }

    /// `host` followed by `url`, without escaping or validation.
    #[must_use]
    pub fn endpoint_uri(&self) -> String {
        format!(
            "{}{}",
            self.host.as_deref().unwrap_or_default(),
            self.url.as_deref().unwrap_or_default()
        )
    }

    /// Names of the required destination attributes that are not set.
    #[must_use]
    pub fn missing_required(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.host.is_none() {
            missing.push("host");
        }
        if self.url.is_none() {
            missing.push("url");
        }
        if self.api_key.is_none() {
            missing.push("apiKey");
        }
        missing
    }

    /// Whether the process-wide HTTP client satisfies these settings.
    #[must_use]
    pub fn uses_shared_client(&self) -> bool {
        self.connect_timeout.is_none() && self.https_proxy.is_none()
    }
}

impl fmt::Debug for DeliverySettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeliverySettings")
            .field("host", &self.host)
            .field("url", &self.url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("max_payload_size", &self.max_payload_size)
            .field("max_uncompressed_size", &self.max_uncompressed_size)
            .field("retry_interval", &self.retry_interval)
            .field("retry_number", &self.retry_number)
            .field("connect_timeout", &self.connect_timeout)
            .field("https_proxy", &self.https_proxy)
            .finish()
    }
}

fn parse_var<T, F>(lookup: &F, name: &str) -> Option<T>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(name)?;
    match raw.trim().parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            error!("{name} has invalid value '{raw}', using the default");
            None
        }
    }
}
