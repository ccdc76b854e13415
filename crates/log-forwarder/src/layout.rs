// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Formatting seam between the host's log events and the appender.
//!
//! The appender never looks inside an event: a [`Layout`] turns it into the
//! string that becomes the request body. Any `Fn(&E) -> String` closure is a
//! layout.

use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::json;

pub trait Layout<E: ?Sized>: Send + Sync {
    fn format(&self, event: &E) -> String;
}

impl<E, F> Layout<E> for F
where
    E: ?Sized,
    F: Fn(&E) -> String + Send + Sync,
{
    fn format(&self, event: &E) -> String {
        self(event)
    }
}

/// For events that already are formatted JSON lines.
#[derive(Debug, Default, Clone, Copy)]
pub struct PassthroughLayout;

impl Layout<str> for PassthroughLayout {
    fn format(&self, event: &str) -> String {
        event.to_string()
    }
}

impl Layout<String> for PassthroughLayout {
    fn format(&self, event: &String) -> String {
        event.clone()
    }
}

/// Wraps a plain text line as `{"message": ..., "timestamp": <epoch ms>}`.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonMessageLayout;

impl JsonMessageLayout {
    fn format_at(message: &str, timestamp_ms: u64) -> String {
        json!({
            "message": message,
            "timestamp": timestamp_ms,
        })
        .to_string()
    }
}

impl Layout<str> for JsonMessageLayout {
    fn format(&self, event: &str) -> String {
        let timestamp_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
            .unwrap_or_default();
        Self::format_at(event, timestamp_ms)
    }
}

impl Layout<String> for JsonMessageLayout {
    fn format(&self, event: &String) -> String {
        Layout::<str>::format(self, event.as_str())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_is_a_layout() {
        let layout = |event: &u32| format!("{{\"count\":{event}}}");
        assert_eq!(layout.format(&7), "{\"count\":7}");
    }

    #[test]
    fn test_passthrough() {
        let line = "{\"message\":\"hello\"}".to_string();
        assert_eq!(Layout::<String>::format(&PassthroughLayout, &line), line);
        assert_eq!(Layout::<str>::format(&PassthroughLayout, "abc"), "abc");
    }

    #[test]
    fn test_json_message_escapes() {
        let rendered = JsonMessageLayout::format_at("say \"hi\"\n", 1_681_821_996_969);
        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(value["message"], "say \"hi\"\n");
        assert_eq!(value["timestamp"], 1_681_821_996_969_u64);
    }

    #[test]
    fn test_json_message_has_current_timestamp() {
        let rendered = Layout::<str>::format(&JsonMessageLayout, "hello");
        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(value["message"], "hello");
        assert!(value["timestamp"].as_u64().unwrap() > 1_600_000_000_000);
    }
}
