/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 imgw Project Authors
 */

use std::io;

use bytes::Bytes;
use http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode, header};
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncReadExt};

use crate::ioext;

#[derive(Debug, Error)]
pub(crate) enum RequestError {
    #[error("client closed")]
    ClientClosed,
    #[error("too large header, should be less than {0}")]
    TooLargeHeader(usize),
    #[error("invalid request line")]
    InvalidRequestLine,
    #[error("unsupported method: {0}")]
    UnsupportedMethod(String),
    #[error("unsupported version: {0}")]
    UnsupportedVersion(String),
    #[error("invalid header line")]
    InvalidHeaderLine,
    #[error("invalid content length")]
    InvalidContentLength,
    #[error("too large body, should be less than {0}")]
    TooLargeBody(usize),
    #[error("unsupported transfer encoding")]
    UnsupportedTransferEncoding,
    #[error("io failed: {0:?}")]
    IoFailed(#[from] io::Error),
}

impl RequestError {
    /// None means the connection is not worth a response any more.
    pub(crate) fn status_code(&self) -> Option<StatusCode> {
        match self {
            RequestError::ClientClosed | RequestError::IoFailed(_) => None,
            RequestError::TooLargeHeader(_) => Some(StatusCode::REQUEST_HEADER_FIELDS_TOO_LARGE),
            RequestError::TooLargeBody(_) => Some(StatusCode::PAYLOAD_TOO_LARGE),
            RequestError::UnsupportedMethod(_)
            | RequestError::UnsupportedVersion(_)
            | RequestError::UnsupportedTransferEncoding => Some(StatusCode::NOT_IMPLEMENTED),
            _ => Some(StatusCode::BAD_REQUEST),
        }
    }
}

#[derive(Debug)]
pub(crate) struct HttpRequest {
    pub(crate) method: Method,
    pub(crate) path: String,
    pub(crate) headers: HeaderMap,
    pub(crate) body: Bytes,
    keep_alive: bool,
}

impl HttpRequest {
    pub(crate) async fn parse<R>(
        reader: &mut R,
        max_header_size: usize,
        max_body_size: usize,
    ) -> Result<Self, RequestError>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut line = Vec::<u8>::with_capacity(256);

        let (found, nr) =
            ioext::limited_read_until(reader, b'\n', max_header_size, &mut line).await?;
        if nr == 0 {
            return Err(RequestError::ClientClosed);
        }
        if !found {
            return Err(if nr >= max_header_size {
                RequestError::TooLargeHeader(max_header_size)
            } else {
                RequestError::ClientClosed
            });
        }
        let mut header_size = nr;
        let (method, path, version) = parse_request_line(&line)?;

        let mut keep_alive = version != 0;
        let mut headers = HeaderMap::new();
        loop {
            line.clear();
            let (found, nr) =
                ioext::limited_read_until(reader, b'\n', max_header_size - header_size, &mut line)
                    .await?;
            if !found {
                return Err(if header_size + nr >= max_header_size {
                    RequestError::TooLargeHeader(max_header_size)
                } else {
                    RequestError::ClientClosed
                });
            }
            header_size += nr;
            let trimmed = trim_line(&line);
            if trimmed.is_empty() {
                break;
            }

            let Some(p) = memchr::memchr(b':', trimmed) else {
                return Err(RequestError::InvalidHeaderLine);
            };
            let name = std::str::from_utf8(&trimmed[0..p])
                .map_err(|_| RequestError::InvalidHeaderLine)?
                .trim();
            let value = std::str::from_utf8(&trimmed[p + 1..])
                .map_err(|_| RequestError::InvalidHeaderLine)?
                .trim();
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| RequestError::InvalidHeaderLine)?;
            let value =
                HeaderValue::from_str(value).map_err(|_| RequestError::InvalidHeaderLine)?;

            if name == header::CONNECTION {
                if value
                    .to_str()
                    .map(|s| s.eq_ignore_ascii_case("close"))
                    .unwrap_or(false)
                {
                    keep_alive = false;
                } else if value
                    .to_str()
                    .map(|s| s.eq_ignore_ascii_case("keep-alive"))
                    .unwrap_or(false)
                {
                    keep_alive = true;
                }
            }
            headers.append(name, value);
        }

        if headers.contains_key(header::TRANSFER_ENCODING) {
            return Err(RequestError::UnsupportedTransferEncoding);
        }

        let content_length = match headers.get(header::CONTENT_LENGTH) {
            Some(v) => v
                .to_str()
                .ok()
                .and_then(|s| s.trim().parse::<usize>().ok())
                .ok_or(RequestError::InvalidContentLength)?,
            None => 0,
        };
        if content_length > max_body_size {
            return Err(RequestError::TooLargeBody(max_body_size));
        }

        let mut body = vec![0u8; content_length];
        if content_length > 0 {
            reader.read_exact(&mut body).await.map_err(|e| {
                if e.kind() == io::ErrorKind::UnexpectedEof {
                    RequestError::ClientClosed
                } else {
                    RequestError::IoFailed(e)
                }
            })?;
        }

        Ok(HttpRequest {
            method,
            path,
            headers,
            body: Bytes::from(body),
            keep_alive,
        })
    }

    #[cfg(test)]
    pub(crate) fn for_tests(
        method: Method,
        path: String,
        headers: HeaderMap,
        body: Bytes,
    ) -> Self {
        HttpRequest {
            method,
            path,
            headers,
            body,
            keep_alive: true,
        }
    }

    #[inline]
    pub(crate) fn keep_alive(&self) -> bool {
        self.keep_alive
    }

    pub(crate) fn content_type(&self) -> Option<&str> {
        self.headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
    }

    /// The body was transport encoded and needs a base64 decode before any
    /// multipart parsing.
    pub(crate) fn base64_encoded(&self) -> bool {
        self.headers
            .get("content-transfer-encoding")
            .and_then(|v| v.to_str().ok())
            .map(|s| s.trim().eq_ignore_ascii_case("base64"))
            .unwrap_or(false)
    }
}

fn trim_line(line: &[u8]) -> &[u8] {
    let line = match line.last() {
        Some(b'\n') => &line[0..line.len() - 1],
        _ => line,
    };
    match line.last() {
        Some(b'\r') => &line[0..line.len() - 1],
        _ => line,
    }
}

/// Parse `METHOD SP request-target SP HTTP/1.x`, returning the minor
/// version as 0 or 1.
fn parse_request_line(line: &[u8]) -> Result<(Method, String, u8), RequestError> {
    let line = std::str::from_utf8(trim_line(line)).map_err(|_| RequestError::InvalidRequestLine)?;
    let mut tokens = line.split_ascii_whitespace();

    let Some(method_str) = tokens.next() else {
        return Err(RequestError::InvalidRequestLine);
    };
    let Some(target) = tokens.next() else {
        return Err(RequestError::InvalidRequestLine);
    };
    let Some(version_str) = tokens.next() else {
        return Err(RequestError::InvalidRequestLine);
    };
    if tokens.next().is_some() {
        return Err(RequestError::InvalidRequestLine);
    }

    let method = Method::from_bytes(method_str.as_bytes())
        .map_err(|_| RequestError::UnsupportedMethod(method_str.to_string()))?;
    let version = match version_str {
        "HTTP/1.0" => 0,
        "HTTP/1.1" => 1,
        _ => return Err(RequestError::UnsupportedVersion(version_str.to_string())),
    };

    // ignore any query string, the routes take no parameters
    let path = match memchr::memchr(b'?', target.as_bytes()) {
        Some(p) => target[0..p].to_string(),
        None => target.to_string(),
    };

    Ok((method, path, version))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn post_with_body() {
        let buf = b"POST /classify HTTP/1.1\r\n\
            Host: localhost\r\n\
            Content-Type: multipart/form-data; boundary=XYZ\r\n\
            Content-Length: 4\r\n\
            \r\n\
            data";
        let mut reader = &buf[..];
        let req = HttpRequest::parse(&mut reader, 8192, 1 << 20).await.unwrap();
        assert_eq!(req.method, Method::POST);
        assert_eq!(req.path, "/classify");
        assert_eq!(
            req.content_type(),
            Some("multipart/form-data; boundary=XYZ")
        );
        assert_eq!(req.body.as_ref(), b"data");
        assert!(req.keep_alive());
        assert!(!req.base64_encoded());
    }

    #[tokio::test]
    async fn base64_flag() {
        let buf = b"POST /classify HTTP/1.1\r\n\
            Content-Transfer-Encoding: base64\r\n\
            Content-Length: 0\r\n\
            \r\n";
        let mut reader = &buf[..];
        let req = HttpRequest::parse(&mut reader, 8192, 1 << 20).await.unwrap();
        assert!(req.base64_encoded());
    }

    #[tokio::test]
    async fn connection_close() {
        let buf = b"POST /caption HTTP/1.1\r\nConnection: close\r\n\r\n";
        let mut reader = &buf[..];
        let req = HttpRequest::parse(&mut reader, 8192, 1 << 20).await.unwrap();
        assert!(!req.keep_alive());
    }

    #[tokio::test]
    async fn http10_defaults_to_close() {
        let buf = b"GET / HTTP/1.0\r\n\r\n";
        let mut reader = &buf[..];
        let req = HttpRequest::parse(&mut reader, 8192, 1 << 20).await.unwrap();
        assert!(!req.keep_alive());
    }

    #[tokio::test]
    async fn empty_input() {
        let mut reader = &b""[..];
        let e = HttpRequest::parse(&mut reader, 8192, 1 << 20)
            .await
            .unwrap_err();
        assert!(matches!(e, RequestError::ClientClosed));
        assert!(e.status_code().is_none());
    }

    #[tokio::test]
    async fn header_cap_bounds_reading() {
        let buf = vec![b'a'; 1 << 20];
        let mut reader = &buf[..];
        let e = HttpRequest::parse(&mut reader, 1024, 1 << 20)
            .await
            .unwrap_err();
        assert!(matches!(e, RequestError::TooLargeHeader(1024)));
        // a newline-free stream must be rejected without buffering past the cap
        assert!(buf.len() - reader.len() <= 1024);
    }

    #[tokio::test]
    async fn oversized_headers_rejected() {
        let mut buf = b"POST / HTTP/1.1\r\n".to_vec();
        for _ in 0..32 {
            buf.extend_from_slice(b"X-Pad: aaaaaaaaaaaaaaaaaaaaaaaa\r\n");
        }
        buf.extend_from_slice(b"\r\n");
        let mut reader = &buf[..];
        let e = HttpRequest::parse(&mut reader, 256, 1 << 20).await.unwrap_err();
        assert!(matches!(e, RequestError::TooLargeHeader(256)));
        assert_eq!(
            e.status_code(),
            Some(StatusCode::REQUEST_HEADER_FIELDS_TOO_LARGE)
        );
    }

    #[tokio::test]
    async fn body_over_limit() {
        let buf = b"POST / HTTP/1.1\r\nContent-Length: 100\r\n\r\n";
        let mut reader = &buf[..];
        let e = HttpRequest::parse(&mut reader, 8192, 10).await.unwrap_err();
        assert!(matches!(e, RequestError::TooLargeBody(10)));
        assert_eq!(e.status_code(), Some(StatusCode::PAYLOAD_TOO_LARGE));
    }

    #[tokio::test]
    async fn truncated_body() {
        let buf = b"POST / HTTP/1.1\r\nContent-Length: 10\r\n\r\nabc";
        let mut reader = &buf[..];
        let e = HttpRequest::parse(&mut reader, 8192, 1 << 20)
            .await
            .unwrap_err();
        assert!(matches!(e, RequestError::ClientClosed));
    }

    #[tokio::test]
    async fn chunked_not_supported() {
        let buf = b"POST / HTTP/1.1\r\nTransfer-Encoding: chunked\r\n\r\n";
        let mut reader = &buf[..];
        let e = HttpRequest::parse(&mut reader, 8192, 1 << 20)
            .await
            .unwrap_err();
        assert!(matches!(e, RequestError::UnsupportedTransferEncoding));
        assert_eq!(e.status_code(), Some(StatusCode::NOT_IMPLEMENTED));
    }

    #[tokio::test]
    async fn bad_request_line() {
        let buf = b"NOT-HTTP\r\n\r\n";
        let mut reader = &buf[..];
        let e = HttpRequest::parse(&mut reader, 8192, 1 << 20)
            .await
            .unwrap_err();
        assert_eq!(e.status_code(), Some(StatusCode::BAD_REQUEST));
    }

    #[tokio::test]
    async fn query_string_stripped() {
        let buf = b"POST /classify?debug=1 HTTP/1.1\r\n\r\n";
        let mut reader = &buf[..];
        let req = HttpRequest::parse(&mut reader, 8192, 1 << 20).await.unwrap();
        assert_eq!(req.path, "/classify");
    }
}
