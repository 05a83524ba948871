/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 imgw Project Authors
 */

use std::sync::Arc;

use ::log::info;
use anyhow::anyhow;

pub mod config;

mod build;

pub mod opts;

pub mod log;

mod ioext;

mod backend;
use backend::{HttpCaptionBackend, HttpClassifyBackend};

mod handler;
use handler::HandlerSet;

mod frontend;
use frontend::HttpFrontend;

mod tmpfile;

pub async fn run() -> anyhow::Result<()> {
    let frontend_config = config::get_frontend_config();
    let classify_config = config::get_classify_backend_config()
        .ok_or_else(|| anyhow!("no classify backend config available"))?;
    let caption_config = config::get_caption_backend_config()
        .ok_or_else(|| anyhow!("no caption backend config available"))?;

    let handlers = Arc::new(HandlerSet::new(
        Arc::new(HttpClassifyBackend::new(classify_config)),
        Arc::new(HttpCaptionBackend::new(caption_config.clone())),
        config::get_mime_map(),
        caption_config.spool_dir.clone(),
    ));

    let frontend = HttpFrontend::new(&frontend_config, handlers).await?;

    tokio::select! {
        r = frontend.into_running() => r,
        r = tokio::signal::ctrl_c() => {
            r.map_err(|e| anyhow!("failed to wait for ctrl-c: {e}"))?;
            info!("got ctrl-c, exiting");
            Ok(())
        }
    }
}
