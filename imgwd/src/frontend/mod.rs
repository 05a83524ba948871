/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 imgw Project Authors
 */

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::anyhow;
use log::{debug, info, warn};
use tokio::io::BufReader;
use tokio::net::{TcpListener, TcpStream};

use crate::config::FrontendConfig;
use crate::handler::HandlerSet;

mod request;
pub(crate) use request::{HttpRequest, RequestError};

mod response;
pub(crate) use response::HttpResponse;

pub(crate) struct HttpFrontend {
    listener: TcpListener,
    handlers: Arc<HandlerSet>,
    max_header_size: usize,
    max_body_size: usize,
}

impl HttpFrontend {
    pub(crate) async fn new(
        config: &FrontendConfig,
        handlers: Arc<HandlerSet>,
    ) -> anyhow::Result<Self> {
        let listener = TcpListener::bind(config.listen_addr)
            .await
            .map_err(|e| anyhow!("failed to listen on {}: {e}", config.listen_addr))?;
        info!("listening on {}", config.listen_addr);
        Ok(HttpFrontend {
            listener,
            handlers,
            max_header_size: config.max_header_size,
            max_body_size: config.max_body_size,
        })
    }

    pub(crate) async fn into_running(self) -> anyhow::Result<()> {
        loop {
            match self.listener.accept().await {
                Ok((stream, peer)) => {
                    debug!("new connection from {peer}");
                    let handlers = self.handlers.clone();
                    let max_header_size = self.max_header_size;
                    let max_body_size = self.max_body_size;
                    tokio::spawn(async move {
                        serve_connection(stream, peer, handlers, max_header_size, max_body_size)
                            .await;
                    });
                }
                Err(e) => return Err(anyhow!("accept failed: {e}")),
            }
        }
    }
}

async fn serve_connection(
    stream: TcpStream,
    peer: SocketAddr,
    handlers: Arc<HandlerSet>,
    max_header_size: usize,
    max_body_size: usize,
) {
    let (r, mut writer) = stream.into_split();
    let mut reader = BufReader::new(r);

    loop {
        let req = match HttpRequest::parse(&mut reader, max_header_size, max_body_size).await {
            Ok(req) => req,
            Err(RequestError::ClientClosed) => break,
            Err(e) => {
                if let Some(status) = e.status_code() {
                    warn!("invalid request from {peer}: {e}");
                    let _ = HttpResponse::error(status, &e.to_string())
                        .send(&mut writer, true)
                        .await;
                }
                break;
            }
        };

        let close = !req.keep_alive();
        let rsp = handlers.dispatch(&req).await;
        debug!(
            "{peer} {} {} -> {}",
            req.method,
            req.path,
            rsp.status().as_u16()
        );
        if rsp.send(&mut writer, close).await.is_err() {
            break;
        }
        if close {
            break;
        }
    }
}
