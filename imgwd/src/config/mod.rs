/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 imgw Project Authors
 */

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::OnceLock;
use std::time::Duration;

use anyhow::{Context, anyhow};
use yaml_rust::{Yaml, YamlLoader, yaml};

use crate::opts::ProcArgs;

mod frontend;
pub(crate) use frontend::{FrontendConfig, get_config as get_frontend_config};

mod backend;
pub(crate) use backend::{
    CaptionBackendConfig, ClassifyBackendConfig, get_caption_config as get_caption_backend_config,
    get_classify_config as get_classify_backend_config,
};

mod media;
pub(crate) use media::get_map as get_mime_map;

static CONFIG_FILE: OnceLock<PathBuf> = OnceLock::new();

pub fn load(proc_args: &ProcArgs) -> anyhow::Result<&'static Path> {
    let config_file = CONFIG_FILE.get_or_init(|| proc_args.config_file.clone());

    let contents = std::fs::read_to_string(config_file)
        .map_err(|e| anyhow!("failed to read config file {}: {e}", config_file.display()))?;
    let docs = YamlLoader::load_from_str(&contents)
        .map_err(|e| anyhow!("invalid yaml in config file {}: {e}", config_file.display()))?;

    // allow multiple docs, and treat them as the same
    for (i, doc) in docs.iter().enumerate() {
        match doc {
            Yaml::Hash(map) => load_doc(map).context(format!("failed to load doc {i}"))?,
            _ => return Err(anyhow!("yaml doc {i} root should be hash")),
        }
    }

    Ok(config_file)
}

fn load_doc(map: &yaml::Hash) -> anyhow::Result<()> {
    foreach_kv(map, |k, v| match normalize_key(k).as_str() {
        "frontend" => frontend::load_config(v),
        "classify_backend" => backend::load_classify_config(v),
        "caption_backend" => backend::load_caption_config(v),
        "mime" => media::load_config(v),
        _ => Err(anyhow!("invalid key {k} in main conf")),
    })
}

pub(crate) fn normalize_key(k: &str) -> String {
    k.to_lowercase().replace('-', "_")
}

pub(crate) fn foreach_kv<F>(map: &yaml::Hash, mut f: F) -> anyhow::Result<()>
where
    F: FnMut(&str, &Yaml) -> anyhow::Result<()>,
{
    for (k, v) in map.iter() {
        let Yaml::String(key) = k else {
            return Err(anyhow!("the yaml map key type should be string"));
        };
        f(key, v).context(format!("invalid value for key {key}"))?;
    }
    Ok(())
}

pub(crate) fn as_str(v: &Yaml) -> anyhow::Result<&str> {
    match v {
        Yaml::String(s) => Ok(s),
        _ => Err(anyhow!("the yaml value type should be string")),
    }
}

pub(crate) fn as_usize(v: &Yaml) -> anyhow::Result<usize> {
    match v {
        Yaml::Integer(i) => {
            usize::try_from(*i).map_err(|_| anyhow!("out of range integer value {i}"))
        }
        Yaml::String(s) => usize::from_str(s).map_err(|e| anyhow!("invalid usize string: {e}")),
        _ => Err(anyhow!("the yaml value type should be integer")),
    }
}

pub(crate) fn as_sockaddr(v: &Yaml) -> anyhow::Result<SocketAddr> {
    let s = as_str(v)?;
    SocketAddr::from_str(s).map_err(|e| anyhow!("invalid socket address {s}: {e}"))
}

pub(crate) fn as_duration_secs(v: &Yaml) -> anyhow::Result<Duration> {
    let secs = as_usize(v)?;
    Ok(Duration::from_secs(secs as u64))
}

pub(crate) fn as_dir_path(v: &Yaml) -> anyhow::Result<PathBuf> {
    let s = as_str(v)?;
    if s.is_empty() {
        return Err(anyhow!("empty path value"));
    }
    Ok(PathBuf::from(s))
}
