/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 imgw Project Authors
 */

use std::io;

use http::StatusCode;
use tokio::io::{AsyncWrite, AsyncWriteExt};

pub(crate) struct HttpResponse {
    status: StatusCode,
    body: Vec<u8>,
    allow_origin: bool,
}

impl HttpResponse {
    pub(crate) fn json(status: StatusCode, value: &serde_json::Value) -> Self {
        HttpResponse {
            status,
            body: value.to_string().into_bytes(),
            allow_origin: false,
        }
    }

    pub(crate) fn error(status: StatusCode, message: &str) -> Self {
        Self::json(status, &serde_json::json!({"error": message}))
    }

    pub(crate) fn set_allow_origin(mut self) -> Self {
        self.allow_origin = true;
        self
    }

    #[inline]
    pub(crate) fn status(&self) -> StatusCode {
        self.status
    }

    #[cfg(test)]
    pub(crate) fn body(&self) -> &[u8] {
        &self.body
    }

    pub(crate) async fn send<W>(&self, writer: &mut W, close: bool) -> io::Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        let mut head = String::with_capacity(192);
        head.push_str(&format!(
            "HTTP/1.1 {} {}\r\n",
            self.status.as_u16(),
            self.status.canonical_reason().unwrap_or("Unknown")
        ));
        head.push_str("Content-Type: application/json\r\n");
        head.push_str(&format!("Content-Length: {}\r\n", self.body.len()));
        if self.allow_origin {
            head.push_str("Access-Control-Allow-Origin: *\r\n");
        }
        if close {
            head.push_str("Connection: close\r\n");
        } else {
            head.push_str("Connection: keep-alive\r\n");
        }
        head.push_str("\r\n");

        writer.write_all(head.as_bytes()).await?;
        writer.write_all(&self.body).await?;
        writer.flush().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn ok_with_cors() {
        let rsp = HttpResponse::json(
            StatusCode::OK,
            &serde_json::json!({"classification": "tabby"}),
        )
        .set_allow_origin();
        let mut buf = Vec::new();
        rsp.send(&mut buf, true).await.unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(text.contains("Content-Type: application/json\r\n"));
        assert!(text.contains("Access-Control-Allow-Origin: *\r\n"));
        assert!(text.contains("Connection: close\r\n"));
        assert!(text.ends_with("\r\n\r\n{\"classification\":\"tabby\"}"));
    }

    #[tokio::test]
    async fn error_no_cors() {
        let rsp = HttpResponse::error(StatusCode::BAD_REQUEST, "field not found");
        let mut buf = Vec::new();
        rsp.send(&mut buf, false).await.unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.starts_with("HTTP/1.1 400 Bad Request\r\n"));
        assert!(!text.contains("Access-Control-Allow-Origin"));
        assert!(text.contains("Connection: keep-alive\r\n"));
        assert!(text.ends_with("{\"error\":\"field not found\"}"));
    }
}
