/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 imgw Project Authors
 */

use http::StatusCode;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FormDataError {
    #[error("unsupported content type")]
    UnsupportedContentType,
    #[error("malformed multipart body: {0}")]
    MalformedBody(&'static str),
    #[error("field not found")]
    FieldNotFound,
}

impl FormDataError {
    /// All extraction failures are faults in the client supplied input.
    pub fn status_code(&self) -> StatusCode {
        match self {
            FormDataError::UnsupportedContentType
            | FormDataError::MalformedBody(_)
            | FormDataError::FieldNotFound => StatusCode::BAD_REQUEST,
        }
    }
}
