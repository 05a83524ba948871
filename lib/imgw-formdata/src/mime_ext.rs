/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 imgw Project Authors
 */

use std::collections::HashMap;
use std::str::FromStr;

use foldhash::fast::FixedState;
use mime::Mime;

/// Explicit filename extension to media type table, used instead of any
/// system-wide registry. Lookup keys are ascii lowercased extensions
/// without the leading dot.
pub struct MimeExtMap {
    inner: HashMap<String, Mime, FixedState>,
}

impl Default for MimeExtMap {
    fn default() -> Self {
        let mut map = MimeExtMap {
            inner: HashMap::with_hasher(FixedState::with_seed(0)),
        };
        map.set("jpg", mime::IMAGE_JPEG);
        map.set("jpeg", mime::IMAGE_JPEG);
        map.set("png", mime::IMAGE_PNG);
        map.set("gif", mime::IMAGE_GIF);
        map.set("bmp", mime::IMAGE_BMP);
        map.set("svg", mime::IMAGE_SVG);
        map.set("webp", Mime::from_str("image/webp").unwrap());
        map.set("tif", Mime::from_str("image/tiff").unwrap());
        map.set("tiff", Mime::from_str("image/tiff").unwrap());
        map.set("ico", Mime::from_str("image/x-icon").unwrap());
        map.set("avif", Mime::from_str("image/avif").unwrap());
        map
    }
}

impl MimeExtMap {
    pub fn set(&mut self, ext: &str, mime: Mime) {
        self.inner.insert(ext.to_ascii_lowercase(), mime);
    }

    pub fn get(&self, ext: &str) -> Option<&Mime> {
        self.inner.get(&ext.to_ascii_lowercase())
    }

    /// Infer a media type from the extension of `filename`.
    pub fn guess(&self, filename: &str) -> Option<&Mime> {
        let p = memchr::memrchr(b'.', filename.as_bytes())?;
        let ext = &filename[p + 1..];
        if ext.is_empty() {
            return None;
        }
        self.get(ext)
    }
}
