// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderValue};

use crate::constants::{
    ACCEPT_HEADER, API_KEY_HEADER, CONTENT_ENCODING_GZIP, CONTENT_ENCODING_HEADER,
    CONTENT_TYPE_HEADER, CONTENT_TYPE_JSON,
};
use crate::error::AppenderError;
use crate::payload::Payload;
use crate::settings::DeliverySettings;

/// A POST request to the intake, resent verbatim on every retry.
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    pub uri: String,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// Builds the intake request for a payload. Performs no I/O.
///
/// The URI is not validated here: a malformed `host` + `url` combination
/// surfaces later as a transport error.
pub fn build(payload: Payload, settings: &DeliverySettings) -> Result<RequestDescriptor, AppenderError> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE_HEADER, HeaderValue::from_static(CONTENT_TYPE_JSON));
    headers.insert(ACCEPT_HEADER, HeaderValue::from_static(CONTENT_TYPE_JSON));

    let mut api_key = HeaderValue::from_str(settings.api_key.as_deref().unwrap_or_default())
        .map_err(|source| AppenderError::InvalidHeader {
            header: API_KEY_HEADER,
            source,
        })?;
    api_key.set_sensitive(true);
    headers.insert(API_KEY_HEADER, api_key);

    if payload.compressed {
        headers.insert(
            CONTENT_ENCODING_HEADER,
            HeaderValue::from_static(CONTENT_ENCODING_GZIP),
        );
    }

    Ok(RequestDescriptor {
        uri: settings.endpoint_uri(),
        headers,
        body: Bytes::from(payload.bytes),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn settings() -> DeliverySettings {
        DeliverySettings {
            host: Some("https://log-api.example.com".to_string()),
            url: Some("/log/v1".to_string()),
            api_key: Some("test-api-key".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_build_uncompressed() {
        let payload = Payload {
            bytes: b"{\"message\":\"hello\"}".to_vec(),
            compressed: false,
        };
        let request = build(payload, &settings()).unwrap();

        assert_eq!(request.uri, "https://log-api.example.com/log/v1");
        assert_eq!(request.headers.get("Content-Type").unwrap(), "application/json");
        assert_eq!(request.headers.get("Accept").unwrap(), "application/json");
        assert_eq!(request.headers.get("Api-Key").unwrap(), "test-api-key");
        assert!(!request.headers.contains_key("Content-Encoding"));
        assert_eq!(request.body.as_ref(), b"{\"message\":\"hello\"}");
    }

    #[test]
    fn test_build_compressed_sets_content_encoding() {
        let payload = Payload {
            bytes: vec![0x1f, 0x8b, 0x08],
            compressed: true,
        };
        let request = build(payload, &settings()).unwrap();

        assert_eq!(request.headers.get("Content-Encoding").unwrap(), "gzip");
        assert_eq!(request.body.as_ref(), &[0x1f, 0x8b, 0x08]);
    }

    #[test]
    fn test_api_key_is_sensitive() {
        let payload = Payload {
            bytes: Vec::new(),
            compressed: false,
        };
        let request = build(payload, &settings()).unwrap();
        assert!(request.headers.get("Api-Key").unwrap().is_sensitive());
    }

    #[test]
    fn test_invalid_api_key() {
        let mut settings = settings();
        settings.api_key = Some("bad\nkey".to_string());
        let payload = Payload {
            bytes: Vec::new(),
            compressed: false,
        };
        let err = build(payload, &settings).unwrap_err();
        assert!(matches!(
            err,
            AppenderError::InvalidHeader {
                header: "Api-Key",
                ..
            }
        ));
    }
}
