/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 imgw Project Authors
 */

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::anyhow;
use atoi::FromRadix10;
use tokio::io::{AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;

use crate::ioext;

const MAX_LINE_SIZE: usize = 4096;

#[derive(Debug)]
pub(super) struct H1Response {
    pub(super) status: u16,
    pub(super) body: Vec<u8>,
}

/// POST `body` to the peer and read back the full response body. One
/// connection per call, `Connection: close` on the wire.
pub(super) async fn invoke(
    peer: SocketAddr,
    host: &str,
    path: &str,
    content_type: &str,
    body: &[u8],
    timeout: Duration,
) -> anyhow::Result<H1Response> {
    tokio::time::timeout(timeout, invoke_inner(peer, host, path, content_type, body))
        .await
        .map_err(|_| anyhow!("request to {peer} timed out after {timeout:?}"))?
}

async fn invoke_inner(
    peer: SocketAddr,
    host: &str,
    path: &str,
    content_type: &str,
    body: &[u8],
) -> anyhow::Result<H1Response> {
    let stream = TcpStream::connect(peer)
        .await
        .map_err(|e| anyhow!("failed to connect to {peer}: {e}"))?;
    let (r, mut w) = stream.into_split();

    let head = format!(
        "POST {path} HTTP/1.1\r\n\
         Host: {host}\r\n\
         Content-Type: {content_type}\r\n\
         Content-Length: {}\r\n\
         Accept: application/json\r\n\
         Connection: close\r\n\r\n",
        body.len()
    );
    w.write_all(head.as_bytes())
        .await
        .map_err(|e| anyhow!("failed to send request to {peer}: {e}"))?;
    w.write_all(body)
        .await
        .map_err(|e| anyhow!("failed to send request body to {peer}: {e}"))?;
    w.flush()
        .await
        .map_err(|e| anyhow!("failed to send request to {peer}: {e}"))?;

    let mut reader = BufReader::new(r);
    let mut line = Vec::<u8>::with_capacity(128);

    let (found, nr) =
        ioext::limited_read_until(&mut reader, b'\n', MAX_LINE_SIZE, &mut line).await?;
    if !found {
        return Err(if nr >= MAX_LINE_SIZE {
            anyhow!("too long status line from {peer}")
        } else {
            anyhow!("connection closed by {peer} before status line")
        });
    }
    let status = parse_status_line(&line)?;

    let mut content_length: Option<usize> = None;
    loop {
        line.clear();
        let (found, nr) =
            ioext::limited_read_until(&mut reader, b'\n', MAX_LINE_SIZE, &mut line).await?;
        if !found {
            return Err(if nr >= MAX_LINE_SIZE {
                anyhow!("too long response header line from {peer}")
            } else {
                anyhow!("connection closed by {peer} in response headers")
            });
        }
        if line == b"\r\n" || line == b"\n" {
            break;
        }
        let Some(p) = memchr::memchr(b':', &line) else {
            return Err(anyhow!("invalid response header line from {peer}"));
        };
        let name = std::str::from_utf8(&line[0..p])
            .map_err(|_| anyhow!("invalid response header name from {peer}"))?
            .trim();
        if name.eq_ignore_ascii_case("content-length") {
            let value = &line[p + 1..];
            let value = value
                .iter()
                .position(|&c| !c.is_ascii_whitespace())
                .map(|s| &value[s..])
                .unwrap_or(b"");
            let (len, used) = usize::from_radix_10(value);
            if used == 0 {
                return Err(anyhow!("invalid content-length from {peer}"));
            }
            content_length = Some(len);
        }
    }

    let body = match content_length {
        Some(len) => {
            let mut buf = vec![0u8; len];
            reader
                .read_exact(&mut buf)
                .await
                .map_err(|e| anyhow!("short response body from {peer}: {e}"))?;
            buf
        }
        None => {
            let mut buf = Vec::new();
            reader
                .read_to_end(&mut buf)
                .await
                .map_err(|e| anyhow!("failed to read response body from {peer}: {e}"))?;
            buf
        }
    };

    Ok(H1Response { status, body })
}

fn parse_status_line(buf: &[u8]) -> anyhow::Result<u16> {
    if !buf.starts_with(b"HTTP/") {
        return Err(anyhow!("invalid status line"));
    }
    let Some(p) = memchr::memchr(b' ', buf) else {
        return Err(anyhow!("invalid status line"));
    };
    let (code, len) = u16::from_radix_10(&buf[p + 1..]);
    if len != 3 {
        return Err(anyhow!("invalid status code"));
    }
    Ok(code)
}
