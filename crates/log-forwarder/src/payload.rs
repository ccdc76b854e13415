// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Size guard and compression policy for a single formatted event.
//!
//! Two different lengths are involved:
//!
//! - the guard compares the UTF-8 **byte** length against `max_payload_size`,
//!   before any compression, and never guesses the compressed size;
//! - the compression decision compares the **character** count against
//!   `max_uncompressed_size`.

use std::io::Write;

use flate2::write::GzEncoder;
use flate2::Compression;

use crate::error::AppenderError;
use crate::settings::DeliverySettings;

/// Body of one intake request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload {
    /// Raw UTF-8 bytes of the event, or their gzip encoding
    pub bytes: Vec<u8>,
    pub compressed: bool,
}

/// Rejects events that are too large to send.
pub fn check_payload_size(event: &str, settings: &DeliverySettings) -> Result<(), AppenderError> {
    let limit = settings.max_payload_size();
    if event.len() > limit {
        return Err(AppenderError::Oversize {
            limit,
            message: event.to_string(),
        });
    }
    Ok(())
}

/// Turns an event into a payload, compressing it when it is long.
pub fn encode(event: &str, settings: &DeliverySettings) -> Result<Payload, AppenderError> {
    let compressed = event.chars().count() > settings.max_uncompressed_size();
    let bytes = if compressed {
        compress(event.as_bytes()).map_err(AppenderError::Compression)?
    } else {
        event.as_bytes().to_vec()
    };
    Ok(Payload { bytes, compressed })
}

fn compress(data: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::with_capacity(data.len() / 2), Compression::default());
    encoder.write_all(data)?;
    encoder.finish()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use flate2::read::GzDecoder;
    use proptest::prelude::*;
    use std::io::Read;

    const EVENT: &str = "{\"@timestamp\": \"2023-04-18T15:46:36.969577+03:00\",\
        \"@version\": \"1\",\"level\": \"DEBUG\",\"logger\": \"app.Main\",\
        \"message\": \"Received a new message from userId={*********}.\",\
        \"source\": \"api.logs\",\"thread\": \"main\",\"timestamp\": 1681821996969,\
        \"uuid\": \"95c3f63d-0ff3-43ff-83f6-3d0ff393ff5c\"}";

    fn gunzip(bytes: &[u8]) -> Vec<u8> {
        let mut decoder = GzDecoder::new(bytes);
        let mut out = Vec::new();
        decoder.read_to_end(&mut out).unwrap();
        out
    }

    fn with_threshold(max_uncompressed_size: usize) -> DeliverySettings {
        DeliverySettings {
            max_uncompressed_size: Some(max_uncompressed_size),
            ..Default::default()
        }
    }

    #[test]
    fn test_not_compressed_under_default_threshold() {
        let payload = encode(EVENT, &DeliverySettings::default()).unwrap();
        assert!(!payload.compressed);
        assert_eq!(payload.bytes, EVENT.as_bytes());
    }

    #[test]
    fn test_compressed_over_threshold() {
        assert!(EVENT.len() > 256);
        let payload = encode(EVENT, &with_threshold(256)).unwrap();
        assert!(payload.compressed);
        assert_eq!(gunzip(&payload.bytes), EVENT.as_bytes());
    }

    #[test]
    fn test_long_event_round_trips() {
        let event = "x".repeat(2_000);
        let payload = encode(&event, &DeliverySettings::default()).unwrap();
        assert!(payload.compressed);
        assert_eq!(String::from_utf8(gunzip(&payload.bytes)).unwrap(), event);
    }

    #[test]
    fn test_threshold_counts_characters_not_bytes() {
        // 300 characters, 600 bytes
        let event = "é".repeat(300);
        assert_eq!(event.len(), 600);

        let payload = encode(&event, &with_threshold(300)).unwrap();
        assert!(!payload.compressed);

        let payload = encode(&event, &with_threshold(299)).unwrap();
        assert!(payload.compressed);
    }

    #[test]
    fn test_size_guard() {
        let settings = DeliverySettings {
            max_payload_size: Some(10),
            ..Default::default()
        };
        assert!(check_payload_size("0123456789", &settings).is_ok());

        let err = check_payload_size("0123456789a", &settings).unwrap_err();
        assert!(matches!(err, AppenderError::Oversize { limit: 10, .. }));
    }

    #[test]
    fn test_size_guard_counts_bytes() {
        let settings = DeliverySettings {
            max_payload_size: Some(10),
            ..Default::default()
        };
        // 6 characters, 12 bytes
        assert!(check_payload_size("éééééé", &settings).is_err());
    }

    proptest! {
        #[test]
        fn short_events_pass_through(event in ".{0,256}") {
            let payload = encode(&event, &with_threshold(256)).unwrap();
            prop_assert!(!payload.compressed);
            prop_assert_eq!(payload.bytes, event.as_bytes().to_vec());
        }

        #[test]
        fn long_events_round_trip(event in ".{257,600}") {
            let payload = encode(&event, &with_threshold(256)).unwrap();
            prop_assert!(payload.compressed);
            prop_assert_eq!(gunzip(&payload.bytes), event.as_bytes().to_vec());
        }
    }
}
