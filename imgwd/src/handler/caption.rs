/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 imgw Project Authors
 */

use anyhow::anyhow;
use serde_json::json;

use imgw_formdata::FormDataError;

use super::{FIELD_IMAGE, HandlerError, HandlerSet};
use crate::frontend::HttpRequest;
use crate::tmpfile::ScopedTempFile;

pub(super) async fn handle(
    set: &HandlerSet,
    req: &HttpRequest,
) -> Result<serde_json::Value, HandlerError> {
    let content_type = req
        .content_type()
        .ok_or(FormDataError::UnsupportedContentType)?;

    let field = imgw_formdata::extract(&req.body, content_type, FIELD_IMAGE, set.mime_map())?;

    // the upload is spooled to disk for the backend and removed again on
    // every exit path below
    let payload = field.into_payload();
    let spool = ScopedTempFile::create(set.spool_dir(), &payload)
        .await
        .map_err(|e| HandlerError::Backend(anyhow!("failed to spool upload: {e}")))?;

    let caption = set.caption.caption(spool.path()).await?;
    Ok(json!({"caption": caption}))
}
