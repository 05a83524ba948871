/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 imgw Project Authors
 */

use super::FormDataError;

/// The boundary token taken from a `multipart/*` content type header value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Boundary {
    value: String,
}

impl Boundary {
    /// Parse the boundary parameter out of a declared content type value,
    /// which should be of the form `multipart/form-data; boundary=<token>`.
    pub fn from_content_type(content_type: &str) -> Result<Boundary, FormDataError> {
        let mut parts = content_type.split(';');

        let Some(media_type) = parts.next() else {
            return Err(FormDataError::UnsupportedContentType);
        };
        let media_type = media_type.trim().as_bytes();
        if media_type.len() < 10 || !media_type[0..10].eq_ignore_ascii_case(b"multipart/") {
            return Err(FormDataError::UnsupportedContentType);
        }

        for param in parts {
            let param = param.trim();
            let Some(p) = memchr::memchr(b'=', param.as_bytes()) else {
                continue;
            };
            if !param[0..p].trim().eq_ignore_ascii_case("boundary") {
                continue;
            }
            let token = param[p + 1..].trim().trim_matches('"');
            if token.is_empty() {
                return Err(FormDataError::UnsupportedContentType);
            }
            return Ok(Boundary {
                value: token.to_string(),
            });
        }

        Err(FormDataError::UnsupportedContentType)
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// The delimiter line prefix, `--<boundary>`.
    pub fn delimiter(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.value.len() + 2);
        buf.extend_from_slice(b"--");
        buf.extend_from_slice(self.value.as_bytes());
        buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple() {
        let b = Boundary::from_content_type("multipart/form-data; boundary=XYZ").unwrap();
        assert_eq!(b.as_str(), "XYZ");
        assert_eq!(b.delimiter(), b"--XYZ");
    }

    #[test]
    fn quoted_and_spaced() {
        let b = Boundary::from_content_type("multipart/form-data;  boundary = \"a b\" ").unwrap();
        assert_eq!(b.as_str(), "a b");

        let b = Boundary::from_content_type("Multipart/Mixed; charset=utf-8; boundary=x").unwrap();
        assert_eq!(b.as_str(), "x");
    }

    #[test]
    fn not_multipart() {
        assert_eq!(
            Boundary::from_content_type("application/json"),
            Err(FormDataError::UnsupportedContentType)
        );
        assert_eq!(
            Boundary::from_content_type(""),
            Err(FormDataError::UnsupportedContentType)
        );
    }

    #[test]
    fn no_boundary() {
        assert_eq!(
            Boundary::from_content_type("multipart/form-data"),
            Err(FormDataError::UnsupportedContentType)
        );
        assert_eq!(
            Boundary::from_content_type("multipart/form-data; charset=utf-8"),
            Err(FormDataError::UnsupportedContentType)
        );
        assert_eq!(
            Boundary::from_content_type("multipart/form-data; boundary="),
            Err(FormDataError::UnsupportedContentType)
        );
    }
}
