/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 imgw Project Authors
 */

use std::str::FromStr;
use std::sync::{Arc, OnceLock};

use ::mime::Mime;
use anyhow::anyhow;
use yaml_rust::Yaml;

use imgw_formdata::MimeExtMap;

static MIME_MAP_LOCK: OnceLock<Arc<MimeExtMap>> = OnceLock::new();

/// The extension lookup table for uploaded filenames: the built-in default
/// table plus any entries set in the `mime` config section.
pub(crate) fn get_map() -> Arc<MimeExtMap> {
    MIME_MAP_LOCK
        .get()
        .cloned()
        .unwrap_or_else(|| Arc::new(MimeExtMap::default()))
}

pub(super) fn load_config(value: &Yaml) -> anyhow::Result<()> {
    let Yaml::Hash(map) = value else {
        return Err(anyhow!("yaml value type for the mime config should be 'map'"));
    };

    let mut mime_map = MimeExtMap::default();
    super::foreach_kv(map, |k, v| {
        let s = super::as_str(v)?;
        let mime = Mime::from_str(s).map_err(|e| anyhow!("invalid media type {s}: {e}"))?;
        mime_map.set(k, mime);
        Ok(())
    })?;

    MIME_MAP_LOCK
        .set(Arc::new(mime_map))
        .map_err(|_| anyhow!("duplicate mime config"))?;
    Ok(())
}
