// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Outcome Result Model
//!
//! Every action handler answers with exactly one [`Outcome`]: a [`Success`]
//! or a [`Failure`]. Both carry the recommended HTTP status, response headers
//! and the tag of the operation that produced them, so the transport layer can
//! render a response without knowing anything about the operation itself.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Uniform success/error reporting for the gateway

use axum::http::{header, HeaderMap, HeaderName, HeaderValue, StatusCode};
use bytes::Bytes;
use serde::Serialize;
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Closed error taxonomy shared by every handler
///
/// Callers decide how to react from the code alone; the message is for humans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorCode {
    /// HTTP request method not allowed
    #[serde(rename = "EMET")]
    Emet,
    /// Request body has incorrect format
    #[serde(rename = "EBODY")]
    Ebody,
    /// Query string has incorrect format
    #[serde(rename = "EQUERY")]
    Equery,
    /// Path escapes the configured root
    #[serde(rename = "EPATH")]
    Epath,
    /// Filesystem entry does not exist
    #[serde(rename = "ENOENT")]
    Enoent,
    /// Filesystem entry already exists
    #[serde(rename = "EENTEX")]
    Eentex,
    /// Non-empty directory conflict
    #[serde(rename = "ENOTEMPTY")]
    Enotempty,
    /// Entry could not be removed
    #[serde(rename = "ERMENT")]
    Erment,
    /// Entry could not be created
    #[serde(rename = "ECRENT")]
    Ecrent,
    /// Created file could not be closed
    #[serde(rename = "ECLOSE")]
    Eclose,
    /// Entry could not be moved
    #[serde(rename = "EMOVE")]
    Emove,
    /// Entry could not be read
    #[serde(rename = "EREAD")]
    Eread,
    /// File could not be written
    #[serde(rename = "EWRITE")]
    Ewrite,
    /// Entry is a directory where a file was expected
    #[serde(rename = "EISDIR")]
    Eisdir,
    /// Entry is not a directory where one was expected
    #[serde(rename = "ENOTDIR")]
    Enotdir,
    /// Requested operation does not exist
    #[serde(rename = "ENORES")]
    Enores,
}

impl ErrorCode {
    /// Symbolic wire form, e.g. `"ENOENT"`
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::Emet => "EMET",
            ErrorCode::Ebody => "EBODY",
            ErrorCode::Equery => "EQUERY",
            ErrorCode::Epath => "EPATH",
            ErrorCode::Enoent => "ENOENT",
            ErrorCode::Eentex => "EENTEX",
            ErrorCode::Enotempty => "ENOTEMPTY",
            ErrorCode::Erment => "ERMENT",
            ErrorCode::Ecrent => "ECRENT",
            ErrorCode::Eclose => "ECLOSE",
            ErrorCode::Emove => "EMOVE",
            ErrorCode::Eread => "EREAD",
            ErrorCode::Ewrite => "EWRITE",
            ErrorCode::Eisdir => "EISDIR",
            ErrorCode::Enotdir => "ENOTDIR",
            ErrorCode::Enores => "ENORES",
        }
    }

    /// Long-form name, e.g. `"ENTRY_NONEXISTENT"`
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::Emet => "INCORRECT_METHOD",
            ErrorCode::Ebody => "INCORRECT_BODY",
            ErrorCode::Equery => "INCORRECT_QUERY",
            ErrorCode::Epath => "INVALID_PATH",
            ErrorCode::Enoent => "ENTRY_NONEXISTENT",
            ErrorCode::Eentex => "ENTRY_EXISTS",
            ErrorCode::Enotempty => "DIRECTORY_NOT_EMPTY",
            ErrorCode::Erment => "ENTRY_NOT_REMOVED",
            ErrorCode::Ecrent => "ENTRY_NOT_CREATED",
            ErrorCode::Eclose => "ENTRY_NOT_CLOSED",
            ErrorCode::Emove => "ENTRY_NOT_MOVED",
            ErrorCode::Eread => "ENTRY_NOT_READ",
            ErrorCode::Ewrite => "ENTRY_NOT_WRITTEN",
            ErrorCode::Eisdir => "ENTRY_IS_DIRECTORY",
            ErrorCode::Enotdir => "ENTRY_NOT_DIRECTORY",
            ErrorCode::Enores => "RESOURCE_NONEXISTENT",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-upload mapping from intended relative path to current absolute location
pub type LocationsMap = BTreeMap<String, String>;

/// Success response body
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SuccessBody {
    Text(String),
    Binary(Bytes),
}

impl SuccessBody {
    pub fn into_bytes(self) -> Bytes {
        match self {
            SuccessBody::Text(text) => Bytes::from(text),
            SuccessBody::Binary(bytes) => bytes,
        }
    }
}

/// Successful operation result
#[derive(Debug, Clone, PartialEq)]
pub struct Success {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub operation: Cow<'static, str>,
    pub body: SuccessBody,
}

impl Success {
    /// Plain-text success message
    pub fn new(
        status: StatusCode,
        operation: impl Into<Cow<'static, str>>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            status,
            headers: content_type("text/plain"),
            operation: operation.into(),
            body: SuccessBody::Text(message.into()),
        }
    }

    /// Binary payload with an explicit content type
    pub fn binary(
        status: StatusCode,
        operation: impl Into<Cow<'static, str>>,
        mime: &str,
        data: impl Into<Bytes>,
    ) -> Self {
        Self {
            status,
            headers: content_type(mime),
            operation: operation.into(),
            body: SuccessBody::Binary(data.into()),
        }
    }

    /// JSON text payload
    pub fn json(status: StatusCode, operation: impl Into<Cow<'static, str>>, json: String) -> Self {
        Self {
            status,
            headers: content_type("application/json"),
            operation: operation.into(),
            body: SuccessBody::Text(json),
        }
    }

    /// Add or replace a response header. Values that are not valid header
    /// text are dropped.
    pub fn with_header(mut self, name: HeaderName, value: &str) -> Self {
        if let Ok(value) = HeaderValue::from_str(value) {
            self.headers.insert(name, value);
        }
        self
    }
}

/// Failure payload: either a message or the upload Locations Map
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailurePayload {
    Message(String),
    Locations(LocationsMap),
}

impl FailurePayload {
    /// Text rendered in the response body; the Locations Map is serialized as
    /// a JSON object.
    pub fn render(&self) -> String {
        match self {
            FailurePayload::Message(message) => message.clone(),
            FailurePayload::Locations(locations) => {
                serde_json::to_string(locations).unwrap_or_else(|_| "{}".to_string())
            }
        }
    }
}

impl fmt::Display for FailurePayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Failed operation result
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{operation}: {code}: {payload}")]
pub struct Failure {
    pub code: ErrorCode,
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub operation: Cow<'static, str>,
    pub payload: FailurePayload,
}

impl Failure {
    pub fn new(
        code: ErrorCode,
        status: StatusCode,
        operation: impl Into<Cow<'static, str>>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            code,
            status,
            headers: content_type("text/plain"),
            operation: operation.into(),
            payload: FailurePayload::Message(message.into()),
        }
    }

    /// Upload failure carrying a snapshot of where every file currently is
    pub fn locations(
        code: ErrorCode,
        status: StatusCode,
        operation: impl Into<Cow<'static, str>>,
        locations: LocationsMap,
    ) -> Self {
        Self {
            code,
            status,
            headers: content_type("application/json"),
            operation: operation.into(),
            payload: FailurePayload::Locations(locations),
        }
    }

    /// `EMET` with an `Allow` header naming the accepted verb
    pub fn method_not_allowed(
        operation: impl Into<Cow<'static, str>>,
        allow: &axum::http::Method,
    ) -> Self {
        Self::new(
            ErrorCode::Emet,
            StatusCode::METHOD_NOT_ALLOWED,
            operation,
            "method not allowed",
        )
        .with_header(header::ALLOW, allow.as_str())
    }

    pub fn with_header(mut self, name: HeaderName, value: &str) -> Self {
        if let Ok(value) = HeaderValue::from_str(value) {
            self.headers.insert(name, value);
        }
        self
    }

    pub fn message(&self) -> String {
        self.payload.render()
    }
}

/// Result of a single dispatched operation
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Success(Success),
    Failure(Failure),
}

impl Outcome {
    pub fn status(&self) -> StatusCode {
        match self {
            Outcome::Success(success) => success.status,
            Outcome::Failure(failure) => failure.status,
        }
    }

    pub fn headers(&self) -> &HeaderMap {
        match self {
            Outcome::Success(success) => &success.headers,
            Outcome::Failure(failure) => &failure.headers,
        }
    }

    pub fn operation(&self) -> &str {
        match self {
            Outcome::Success(success) => &success.operation,
            Outcome::Failure(failure) => &failure.operation,
        }
    }

    /// Error code for failures, `None` on success
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            Outcome::Success(_) => None,
            Outcome::Failure(failure) => Some(failure.code),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }
}

impl From<Result<Success, Failure>> for Outcome {
    fn from(result: Result<Success, Failure>) -> Self {
        match result {
            Ok(success) => Outcome::Success(success),
            Err(failure) => Outcome::Failure(failure),
        }
    }
}

fn content_type(mime: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    let value = HeaderValue::from_str(mime)
        .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream"));
    headers.insert(header::CONTENT_TYPE, value);
    headers
}
