/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 imgw Project Authors
 */

use std::path::Path;
use std::sync::Arc;

use anyhow::anyhow;
use async_trait::async_trait;
use mime::Mime;

use crate::config::{CaptionBackendConfig, ClassifyBackendConfig};

use super::h1;
use super::{CaptionBackend, ClassifyBackend};

const DEFAULT_LABEL: &str = "Unknown";

pub(crate) struct HttpClassifyBackend {
    config: Arc<ClassifyBackendConfig>,
}

impl HttpClassifyBackend {
    pub(crate) fn new(config: Arc<ClassifyBackendConfig>) -> Self {
        HttpClassifyBackend { config }
    }
}

#[async_trait]
impl ClassifyBackend for HttpClassifyBackend {
    async fn classify(&self, media_type: &Mime, body: &[u8]) -> anyhow::Result<String> {
        let rsp = h1::invoke(
            self.config.peer,
            &self.config.host,
            &self.config.path,
            media_type.as_ref(),
            body,
            self.config.timeout,
        )
        .await?;
        if !(200..300).contains(&rsp.status) {
            return Err(anyhow!(
                "classify endpoint returned status {}",
                rsp.status
            ));
        }

        let v: serde_json::Value = serde_json::from_slice(&rsp.body)
            .map_err(|e| anyhow!("invalid json from classify endpoint: {e}"))?;
        let label = v
            .get("predicted_label")
            .and_then(|l| l.as_str())
            .unwrap_or(DEFAULT_LABEL);
        Ok(label.to_string())
    }
}

pub(crate) struct HttpCaptionBackend {
    config: Arc<CaptionBackendConfig>,
}

impl HttpCaptionBackend {
    pub(crate) fn new(config: Arc<CaptionBackendConfig>) -> Self {
        HttpCaptionBackend { config }
    }
}

#[async_trait]
impl CaptionBackend for HttpCaptionBackend {
    async fn caption(&self, image: &Path) -> anyhow::Result<String> {
        let body = tokio::fs::read(image)
            .await
            .map_err(|e| anyhow!("failed to read spooled image {}: {e}", image.display()))?;

        let rsp = h1::invoke(
            self.config.peer,
            &self.config.host,
            &self.config.path,
            mime::APPLICATION_OCTET_STREAM.as_ref(),
            &body,
            self.config.timeout,
        )
        .await?;
        if !(200..300).contains(&rsp.status) {
            return Err(anyhow!("caption endpoint returned status {}", rsp.status));
        }

        let caption = std::str::from_utf8(&rsp.body)
            .map_err(|_| anyhow!("caption endpoint answered with non-text content"))?;
        Ok(caption.trim().to_string())
    }
}
