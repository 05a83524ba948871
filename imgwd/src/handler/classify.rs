/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 imgw Project Authors
 */

use base64::prelude::*;
use bytes::Bytes;
use serde_json::json;

use imgw_formdata::FormDataError;

use super::{FIELD_IMAGE, HandlerError, HandlerSet};
use crate::frontend::HttpRequest;

/// The request as handed over by the transport: the payload bytes, the
/// declared content type, and whether the payload still carries a
/// transport level base64 encoding.
#[derive(Debug)]
pub(crate) struct RawRequest {
    pub(crate) body: Bytes,
    pub(crate) content_type: String,
    pub(crate) base64_encoded: bool,
}

impl RawRequest {
    pub(crate) fn from_http(req: &HttpRequest) -> Result<Self, HandlerError> {
        let content_type = req
            .content_type()
            .ok_or(FormDataError::UnsupportedContentType)?
            .to_string();
        Ok(RawRequest {
            body: req.body.clone(),
            content_type,
            base64_encoded: req.base64_encoded(),
        })
    }

    fn into_decoded_body(self) -> Result<(Bytes, String), HandlerError> {
        if self.base64_encoded {
            let decoded = BASE64_STANDARD
                .decode(self.body.as_ref())
                .map_err(|_| HandlerError::BadRequest("invalid base64 encoded body"))?;
            Ok((Bytes::from(decoded), self.content_type))
        } else {
            Ok((self.body, self.content_type))
        }
    }
}

pub(super) async fn handle(
    set: &HandlerSet,
    req: &HttpRequest,
) -> Result<serde_json::Value, HandlerError> {
    let raw = RawRequest::from_http(req)?;
    let (body, content_type) = raw.into_decoded_body()?;

    let field = imgw_formdata::extract(&body, &content_type, FIELD_IMAGE, set.mime_map())?;

    let label = set
        .classify
        .classify(field.media_type(), field.payload())
        .await?;
    Ok(json!({"classification": label}))
}

#[cfg(test)]
mod tests {
    use super::*;

    use http::{HeaderMap, Method};

    fn base64_request(body: &[u8]) -> HttpRequest {
        let mut headers = HeaderMap::new();
        headers.insert(
            http::header::CONTENT_TYPE,
            "multipart/form-data; boundary=b".parse().unwrap(),
        );
        headers.insert("content-transfer-encoding", "base64".parse().unwrap());
        HttpRequest::for_tests(
            Method::POST,
            "/classify".to_string(),
            headers,
            Bytes::copy_from_slice(body),
        )
    }

    #[test]
    fn raw_request_requires_content_type() {
        let req = HttpRequest::for_tests(
            Method::POST,
            "/classify".to_string(),
            HeaderMap::new(),
            Bytes::new(),
        );
        let e = RawRequest::from_http(&req).unwrap_err();
        assert!(matches!(
            e,
            HandlerError::FormData(FormDataError::UnsupportedContentType)
        ));
    }

    #[test]
    fn base64_body_is_decoded() {
        let plain = b"--b\r\n\
            Content-Disposition: form-data; name=\"image\"\r\n\
            \r\n\
            data\r\n\
            --b--\r\n";
        let encoded = BASE64_STANDARD.encode(plain);
        let raw = RawRequest::from_http(&base64_request(encoded.as_bytes())).unwrap();
        assert!(raw.base64_encoded);
        let (body, _) = raw.into_decoded_body().unwrap();
        assert_eq!(body.as_ref(), plain);
    }

    #[test]
    fn invalid_base64_is_rejected() {
        let raw = RawRequest::from_http(&base64_request(b"not base64 !!!")).unwrap();
        let e = raw.into_decoded_body().unwrap_err();
        assert!(matches!(e, HandlerError::BadRequest(_)));
    }
}
