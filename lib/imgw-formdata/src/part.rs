/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 imgw Project Authors
 */

use bytes::Bytes;
use http::{HeaderMap, HeaderName, HeaderValue, header};
use memchr::memmem;

use super::{Boundary, ContentDisposition, FormDataError, PartHeaderLine};

/// One segment of a multipart body: a case-insensitive header map and the
/// raw payload bytes that follow the blank line.
#[derive(Debug)]
pub struct FormDataPart {
    headers: HeaderMap,
    payload: Bytes,
}

impl FormDataPart {
    #[inline]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    #[inline]
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    #[inline]
    pub fn into_payload(self) -> Bytes {
        self.payload
    }

    pub fn content_disposition(&self) -> Option<ContentDisposition<'_>> {
        self.headers
            .get(header::CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .map(ContentDisposition::parse)
    }

    fn parse(buf: &[u8]) -> Result<Self, FormDataError> {
        let (header_block, payload) = split_header_block(buf)?;

        let mut headers = HeaderMap::new();
        for line in header_block.split(|&c| c == b'\n') {
            let line = trim_cr(line);
            if line.is_empty() {
                continue;
            }
            let h = PartHeaderLine::parse(line)?;
            let name = HeaderName::from_bytes(h.name.as_bytes())
                .map_err(|_| FormDataError::MalformedBody("invalid part header name"))?;
            let value = HeaderValue::from_str(h.value)
                .map_err(|_| FormDataError::MalformedBody("invalid part header value"))?;
            headers.append(name, value);
        }

        Ok(FormDataPart {
            headers,
            payload: Bytes::copy_from_slice(payload),
        })
    }
}

fn trim_cr(line: &[u8]) -> &[u8] {
    match line.last() {
        Some(b'\r') => &line[0..line.len() - 1],
        _ => line,
    }
}

/// Split a raw part into its header block and payload at the first blank
/// line. A part with no headers starts with the blank line directly.
fn split_header_block(buf: &[u8]) -> Result<(&[u8], &[u8]), FormDataError> {
    if let Some(rest) = buf.strip_prefix(b"\r\n") {
        return Ok((b"", rest));
    }
    if let Some(rest) = buf.strip_prefix(b"\n") {
        return Ok((b"", rest));
    }
    if let Some(p) = memmem::find(buf, b"\r\n\r\n") {
        return Ok((&buf[0..p], &buf[p + 4..]));
    }
    if let Some(p) = memmem::find(buf, b"\n\n") {
        return Ok((&buf[0..p], &buf[p + 2..]));
    }
    Err(FormDataError::MalformedBody("no blank line after part headers"))
}

/// Split a full multipart body into its parts, in body order.
///
/// Parts are separated by `--<boundary>` delimiter lines and the body must
/// end with the `--<boundary>--` terminator. Content before the first
/// delimiter and after the terminator is ignored.
pub(crate) fn split_parts(
    body: &[u8],
    boundary: &Boundary,
) -> Result<Vec<FormDataPart>, FormDataError> {
    let delimiter = boundary.delimiter();
    let finder = memmem::Finder::new(&delimiter);

    let Some(mut offset) = next_delimiter(body, &finder, 0) else {
        return Err(FormDataError::MalformedBody("no boundary delimiter found"));
    };
    offset += delimiter.len();

    let mut parts = Vec::new();
    loop {
        let left = &body[offset..];
        if left.starts_with(b"--") {
            // closing terminator, everything after is epilogue
            return Ok(parts);
        }
        if left.starts_with(b"\r\n") {
            offset += 2;
        } else if left.starts_with(b"\n") {
            offset += 1;
        } else {
            return Err(FormDataError::MalformedBody("invalid boundary delimiter"));
        }

        let Some(end) = next_delimiter(body, &finder, offset) else {
            return Err(FormDataError::MalformedBody("unterminated multipart body"));
        };
        // the line break before the delimiter belongs to the delimiter line
        let raw = trim_cr(trim_lf(&body[offset..end]));
        parts.push(FormDataPart::parse(raw)?);
        offset = end + delimiter.len();
    }
}

fn trim_lf(buf: &[u8]) -> &[u8] {
    match buf.last() {
        Some(b'\n') => &buf[0..buf.len() - 1],
        _ => buf,
    }
}

/// Find the next delimiter occurrence that starts a line, so that payload
/// bytes merely containing the delimiter sequence mid-line do not split
/// the part.
fn next_delimiter(body: &[u8], finder: &memmem::Finder, from: usize) -> Option<usize> {
    let mut from = from;
    while let Some(p) = finder.find(&body[from..]) {
        let at = from + p;
        if at == 0 || body[at - 1] == b'\n' {
            return Some(at);
        }
        from = at + 1;
    }
    None
}
