/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 imgw Project Authors
 */

use std::path::{Path, PathBuf};
use std::sync::Arc;

use http::{Method, StatusCode};
use log::{error, warn};
use thiserror::Error;

use imgw_formdata::{FormDataError, MimeExtMap};

use crate::backend::{ArcCaptionBackend, ArcClassifyBackend};
use crate::frontend::{HttpRequest, HttpResponse};

mod classify;
mod caption;

pub(crate) const FIELD_IMAGE: &str = "image";

#[derive(Debug, Error)]
pub(crate) enum HandlerError {
    #[error(transparent)]
    FormData(#[from] FormDataError),
    #[error("{0}")]
    BadRequest(&'static str),
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

impl HandlerError {
    pub(crate) fn status_code(&self) -> StatusCode {
        match self {
            HandlerError::FormData(e) => e.status_code(),
            HandlerError::BadRequest(_) => StatusCode::BAD_REQUEST,
            HandlerError::Backend(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// The route handlers with their injected collaborators.
pub(crate) struct HandlerSet {
    classify: ArcClassifyBackend,
    caption: ArcCaptionBackend,
    mime_map: Arc<MimeExtMap>,
    spool_dir: PathBuf,
}

impl HandlerSet {
    pub(crate) fn new(
        classify: ArcClassifyBackend,
        caption: ArcCaptionBackend,
        mime_map: Arc<MimeExtMap>,
        spool_dir: PathBuf,
    ) -> Self {
        HandlerSet {
            classify,
            caption,
            mime_map,
            spool_dir,
        }
    }

    #[inline]
    pub(crate) fn mime_map(&self) -> &MimeExtMap {
        &self.mime_map
    }

    #[inline]
    pub(crate) fn spool_dir(&self) -> &Path {
        &self.spool_dir
    }

    pub(crate) async fn dispatch(&self, req: &HttpRequest) -> HttpResponse {
        match req.path.as_str() {
            "/classify" => {
                if req.method != Method::POST {
                    return HttpResponse::error(StatusCode::METHOD_NOT_ALLOWED, "use POST")
                        .set_allow_origin();
                }
                let rsp = render(classify::handle(self, req).await);
                rsp.set_allow_origin()
            }
            "/caption" => {
                if req.method != Method::POST {
                    return HttpResponse::error(StatusCode::METHOD_NOT_ALLOWED, "use POST");
                }
                render(caption::handle(self, req).await)
            }
            _ => HttpResponse::error(StatusCode::NOT_FOUND, "no such route"),
        }
    }
}

fn render(result: Result<serde_json::Value, HandlerError>) -> HttpResponse {
    match result {
        Ok(value) => HttpResponse::json(StatusCode::OK, &value),
        Err(e) => {
            let status = e.status_code();
            if status.is_server_error() {
                error!("request processing failed: {e:?}");
            } else {
                warn!("rejected client request: {e}");
            }
            HttpResponse::error(status, &e.to_string())
        }
    }
}
