// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Operation Request
//!
//! Transport-neutral view of an inbound gateway request. The presentation
//! layer buffers the body (or stages multipart files) and hands the core a
//! fully materialised request; handlers never touch the raw connection.

use axum::http::Method;
use bytes::Bytes;
use std::collections::HashMap;
use std::path::PathBuf;

/// Uploaded file already written to the staging area, awaiting commit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedFile {
    /// Path the client wants the file stored at, relative to the root
    pub relative_path: String,
    /// Where the form decoder left the bytes
    pub temp_path: PathBuf,
}

impl StagedFile {
    pub fn new(relative_path: impl Into<String>, temp_path: impl Into<PathBuf>) -> Self {
        Self {
            relative_path: relative_path.into(),
            temp_path: temp_path.into(),
        }
    }
}

/// Request body as produced by the transport layer
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RequestPayload {
    #[default]
    Empty,
    /// Buffered body bytes
    Raw(Bytes),
    /// Multipart file parts staged on disk
    Staged(Vec<StagedFile>),
    /// The body could not be read or decoded
    Undecodable(String),
}

impl RequestPayload {
    /// Raw bytes for body-carrying operations; `Empty` reads as no bytes
    pub fn bytes(&self) -> Option<&[u8]> {
        match self {
            RequestPayload::Empty => Some(&[][..]),
            RequestPayload::Raw(bytes) => Some(bytes.as_ref()),
            RequestPayload::Staged(_) | RequestPayload::Undecodable(_) => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OperationRequest {
    pub method: Method,
    /// Path component of the request target, e.g. `/client-dev-interface/create`
    pub target: String,
    pub query: HashMap<String, String>,
    pub content_type: Option<String>,
    pub payload: RequestPayload,
}

impl OperationRequest {
    pub fn new(method: Method, target: impl Into<String>) -> Self {
        Self {
            method,
            target: target.into(),
            query: HashMap::new(),
            content_type: None,
            payload: RequestPayload::Empty,
        }
    }

    /// Parse a raw (still percent-encoded) query string into parameters.
    /// Later duplicates win.
    pub fn with_query_string(mut self, query: Option<&str>) -> Self {
        self.query = parse_query(query.unwrap_or_default());
        self
    }

    pub fn with_query_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    pub fn with_content_type(mut self, content_type: Option<String>) -> Self {
        self.content_type = content_type;
        self
    }

    pub fn with_payload(mut self, payload: RequestPayload) -> Self {
        self.payload = payload;
        self
    }

    /// Convenience for tests and clients building JSON bodies
    pub fn with_json(self, value: &serde_json::Value) -> Self {
        self.with_content_type(Some("application/json".to_string()))
            .with_payload(RequestPayload::Raw(Bytes::from(value.to_string())))
    }

    pub fn query_param(&self, key: &str) -> Option<&str> {
        self.query.get(key).map(String::as_str)
    }
}

pub fn parse_query(query: &str) -> HashMap<String, String> {
    url::form_urlencoded::parse(query.as_bytes())
        .into_owned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_is_percent_decoded() {
        let request = OperationRequest::new(Method::GET, "/client-dev-interface/edit")
            .with_query_string(Some("Filepath=%2Fdocs%2Fa%20b.txt&x=1"));
        assert_eq!(request.query_param("Filepath"), Some("/docs/a b.txt"));
        assert_eq!(request.query_param("x"), Some("1"));
        assert_eq!(request.query_param("missing"), None);
    }

    #[test]
    fn test_missing_query_is_empty() {
        let request = OperationRequest::new(Method::GET, "/").with_query_string(None);
        assert!(request.query.is_empty());
    }

    #[test]
    fn test_payload_bytes() {
        assert_eq!(RequestPayload::Empty.bytes(), Some(&[][..]));
        assert_eq!(
            RequestPayload::Raw(Bytes::from_static(b"hi")).bytes(),
            Some(&b"hi"[..])
        );
        assert_eq!(RequestPayload::Undecodable("x".into()).bytes(), None);
    }
}
