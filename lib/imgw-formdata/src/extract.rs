/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 imgw Project Authors
 */

use bytes::Bytes;
use mime::Mime;

use super::{Boundary, FormDataError, MimeExtMap, part};

/// The payload of a matched form field together with its resolved media
/// type.
#[derive(Debug)]
pub struct ExtractedField {
    payload: Bytes,
    media_type: Mime,
}

impl ExtractedField {
    #[inline]
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    #[inline]
    pub fn into_payload(self) -> Bytes {
        self.payload
    }

    #[inline]
    pub fn media_type(&self) -> &Mime {
        &self.media_type
    }
}

/// Locate the first part of `body` whose `Content-Disposition` names the
/// form field `field_name` and return its payload bytes.
///
/// The media type is inferred from the part's `filename` attribute through
/// `mime_map`, falling back to `application/octet-stream` when the
/// attribute is absent or the extension is unknown. The field name match
/// is case sensitive and exact.
///
/// This is a pure function: identical inputs always yield the identical
/// result or the identical error classification.
pub fn extract(
    body: &[u8],
    content_type: &str,
    field_name: &str,
    mime_map: &MimeExtMap,
) -> Result<ExtractedField, FormDataError> {
    let boundary = Boundary::from_content_type(content_type)?;
    let parts = part::split_parts(body, &boundary)?;

    for part in parts {
        let Some(cd) = part.content_disposition() else {
            continue;
        };
        if cd.name != Some(field_name) {
            continue;
        }
        let media_type = cd
            .filename
            .and_then(|f| mime_map.guess(f))
            .cloned()
            .unwrap_or(mime::APPLICATION_OCTET_STREAM);
        return Ok(ExtractedField {
            payload: part.into_payload(),
            media_type,
        });
    }

    Err(FormDataError::FieldNotFound)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONTENT_TYPE: &str = "multipart/form-data; boundary=XYZ";

    fn image_body(disposition: &str, payload: &[u8]) -> Vec<u8> {
        let mut body = Vec::new();
        body.extend_from_slice(b"--XYZ\r\nContent-Disposition: ");
        body.extend_from_slice(disposition.as_bytes());
        body.extend_from_slice(b"\r\n\r\n");
        body.extend_from_slice(payload);
        body.extend_from_slice(b"\r\n--XYZ--\r\n");
        body
    }

    #[test]
    fn png_filename() {
        let body = image_body("form-data; name=\"image\"; filename=\"photo.png\"", b"pngdata");
        let field = extract(&body, CONTENT_TYPE, "image", &MimeExtMap::default()).unwrap();
        assert_eq!(field.media_type(), &mime::IMAGE_PNG);
        assert_eq!(field.payload(), b"pngdata");
    }

    #[test]
    fn no_filename_falls_back_to_octet_stream() {
        let body = image_body("form-data; name=\"image\"", b"data");
        let field = extract(&body, CONTENT_TYPE, "image", &MimeExtMap::default()).unwrap();
        assert_eq!(field.media_type(), &mime::APPLICATION_OCTET_STREAM);
    }

    #[test]
    fn unknown_extension_falls_back_to_octet_stream() {
        let body = image_body("form-data; name=\"image\"; filename=\"a.xyzzy\"", b"data");
        let field = extract(&body, CONTENT_TYPE, "image", &MimeExtMap::default()).unwrap();
        assert_eq!(field.media_type(), &mime::APPLICATION_OCTET_STREAM);
    }

    #[test]
    fn field_not_found() {
        let body = image_body("form-data; name=\"file\"", b"data");
        assert_eq!(
            extract(&body, CONTENT_TYPE, "image", &MimeExtMap::default()).unwrap_err(),
            FormDataError::FieldNotFound
        );
    }

    #[test]
    fn field_name_is_case_sensitive() {
        let body = image_body("form-data; name=\"Image\"", b"data");
        assert_eq!(
            extract(&body, CONTENT_TYPE, "image", &MimeExtMap::default()).unwrap_err(),
            FormDataError::FieldNotFound
        );
    }

    #[test]
    fn content_type_without_boundary() {
        let body = image_body("form-data; name=\"image\"", b"data");
        assert_eq!(
            extract(&body, "multipart/form-data", "image", &MimeExtMap::default()).unwrap_err(),
            FormDataError::UnsupportedContentType
        );
    }

    #[test]
    fn first_match_wins() {
        let body = b"--XYZ\r\n\
            Content-Disposition: form-data; name=\"note\"\r\n\
            \r\n\
            hello\r\n\
            --XYZ\r\n\
            Content-Disposition: form-data; name=\"image\"; filename=\"cat.jpg\"\r\n\
            \r\n\
            \xFF\xD8\xFF\xE0\x00\x10\r\n\
            --XYZ\r\n\
            Content-Disposition: form-data; name=\"image\"; filename=\"dog.png\"\r\n\
            \r\n\
            second\r\n\
            --XYZ--\r\n";
        let field = extract(body, CONTENT_TYPE, "image", &MimeExtMap::default()).unwrap();
        assert_eq!(field.media_type(), &mime::IMAGE_JPEG);
        assert_eq!(field.payload(), b"\xFF\xD8\xFF\xE0\x00\x10");
    }

    #[test]
    fn idempotent() {
        let body = image_body("form-data; name=\"image\"; filename=\"photo.png\"", b"pngdata");
        let map = MimeExtMap::default();
        let a = extract(&body, CONTENT_TYPE, "image", &map).unwrap();
        let b = extract(&body, CONTENT_TYPE, "image", &map).unwrap();
        assert_eq!(a.payload(), b.payload());
        assert_eq!(a.media_type(), b.media_type());
    }

    #[test]
    fn truncated_body() {
        let mut body = image_body("form-data; name=\"image\"", b"data");
        body.truncate(body.len() - 9);
        assert!(matches!(
            extract(&body, CONTENT_TYPE, "image", &MimeExtMap::default()).unwrap_err(),
            FormDataError::MalformedBody(_)
        ));
    }
}
