/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 imgw Project Authors
 */

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use mime::Mime;

mod h1;

mod endpoint;
pub(crate) use endpoint::{HttpCaptionBackend, HttpClassifyBackend};

/// A pretrained classification model service: takes the upload bytes with
/// their resolved media type, answers with a label.
#[async_trait]
pub(crate) trait ClassifyBackend {
    async fn classify(&self, media_type: &Mime, body: &[u8]) -> anyhow::Result<String>;
}

pub(crate) type ArcClassifyBackend = Arc<dyn ClassifyBackend + Send + Sync>;

/// A captioning model service fed from a spooled upload on disk.
#[async_trait]
pub(crate) trait CaptionBackend {
    async fn caption(&self, image: &Path) -> anyhow::Result<String>;
}

pub(crate) type ArcCaptionBackend = Arc<dyn CaptionBackend + Send + Sync>;
