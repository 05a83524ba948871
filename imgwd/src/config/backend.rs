/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 imgw Project Authors
 */

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use anyhow::anyhow;
use yaml_rust::{Yaml, yaml};

const DEFAULT_CLASSIFY_PATH: &str = "/invocations";
const DEFAULT_CAPTION_PATH: &str = "/caption";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

static CLASSIFY_CONFIG_LOCK: OnceLock<Arc<ClassifyBackendConfig>> = OnceLock::new();
static CAPTION_CONFIG_LOCK: OnceLock<Arc<CaptionBackendConfig>> = OnceLock::new();

pub(crate) fn get_classify_config() -> Option<Arc<ClassifyBackendConfig>> {
    CLASSIFY_CONFIG_LOCK.get().cloned()
}

pub(crate) fn get_caption_config() -> Option<Arc<CaptionBackendConfig>> {
    CAPTION_CONFIG_LOCK.get().cloned()
}

pub(crate) struct ClassifyBackendConfig {
    pub(crate) peer: SocketAddr,
    pub(crate) host: String,
    pub(crate) path: String,
    pub(crate) timeout: Duration,
}

pub(crate) struct CaptionBackendConfig {
    pub(crate) peer: SocketAddr,
    pub(crate) host: String,
    pub(crate) path: String,
    pub(crate) timeout: Duration,
    pub(crate) spool_dir: PathBuf,
}

struct PeerConfig {
    peer: Option<SocketAddr>,
    host: Option<String>,
    path: Option<String>,
    timeout: Duration,
}

impl PeerConfig {
    fn parse(map: &yaml::Hash, extra: &mut dyn FnMut(&str, &Yaml) -> anyhow::Result<bool>) -> anyhow::Result<Self> {
        let mut config = PeerConfig {
            peer: None,
            host: None,
            path: None,
            timeout: DEFAULT_TIMEOUT,
        };

        super::foreach_kv(map, |k, v| match super::normalize_key(k).as_str() {
            "peer" | "address" => {
                config.peer = Some(super::as_sockaddr(v)?);
                Ok(())
            }
            "host" => {
                config.host = Some(super::as_str(v)?.to_string());
                Ok(())
            }
            "path" => {
                config.path = Some(super::as_str(v)?.to_string());
                Ok(())
            }
            "timeout" => {
                config.timeout = super::as_duration_secs(v)?;
                Ok(())
            }
            _ => {
                if extra(k, v)? {
                    Ok(())
                } else {
                    Err(anyhow!("invalid key {k}"))
                }
            }
        })?;

        Ok(config)
    }

    fn require_peer(&self) -> anyhow::Result<SocketAddr> {
        self.peer.ok_or_else(|| anyhow!("no peer address set"))
    }

    fn host_value(&self, peer: SocketAddr) -> String {
        self.host.clone().unwrap_or_else(|| peer.to_string())
    }
}

pub(super) fn load_classify_config(value: &Yaml) -> anyhow::Result<()> {
    let Yaml::Hash(map) = value else {
        return Err(anyhow!(
            "yaml value type for the classify backend config should be 'map'"
        ));
    };
    let parsed = PeerConfig::parse(map, &mut |_, _| Ok(false))?;
    let peer = parsed.require_peer()?;
    let config = ClassifyBackendConfig {
        peer,
        host: parsed.host_value(peer),
        path: parsed
            .path
            .clone()
            .unwrap_or_else(|| DEFAULT_CLASSIFY_PATH.to_string()),
        timeout: parsed.timeout,
    };
    CLASSIFY_CONFIG_LOCK
        .set(Arc::new(config))
        .map_err(|_| anyhow!("duplicate classify backend config"))?;
    Ok(())
}

pub(super) fn load_caption_config(value: &Yaml) -> anyhow::Result<()> {
    let Yaml::Hash(map) = value else {
        return Err(anyhow!(
            "yaml value type for the caption backend config should be 'map'"
        ));
    };
    let mut spool_dir: Option<PathBuf> = None;
    let parsed = PeerConfig::parse(map, &mut |k, v| match super::normalize_key(k).as_str() {
        "spool_dir" => {
            spool_dir = Some(super::as_dir_path(v)?);
            Ok(true)
        }
        _ => Ok(false),
    })?;
    let peer = parsed.require_peer()?;
    let config = CaptionBackendConfig {
        peer,
        host: parsed.host_value(peer),
        path: parsed
            .path
            .clone()
            .unwrap_or_else(|| DEFAULT_CAPTION_PATH.to_string()),
        timeout: parsed.timeout,
        spool_dir: spool_dir.unwrap_or_else(std::env::temp_dir),
    };
    std::fs::create_dir_all(&config.spool_dir).map_err(|e| {
        anyhow!(
            "failed to create spool dir {}: {e}",
            config.spool_dir.display()
        )
    })?;
    CAPTION_CONFIG_LOCK
        .set(Arc::new(config))
        .map_err(|_| anyhow!("duplicate caption backend config"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use yaml_rust::YamlLoader;

    fn hash(s: &str) -> yaml::Hash {
        let docs = YamlLoader::load_from_str(s).unwrap();
        let Yaml::Hash(map) = &docs[0] else {
            panic!("not a hash")
        };
        map.clone()
    }

    #[test]
    fn peer_defaults() {
        let map = hash("peer: 127.0.0.1:8501");
        let parsed = PeerConfig::parse(&map, &mut |_, _| Ok(false)).unwrap();
        let peer = parsed.require_peer().unwrap();
        assert_eq!(peer, "127.0.0.1:8501".parse().unwrap());
        assert_eq!(parsed.host_value(peer), "127.0.0.1:8501");
        assert_eq!(parsed.timeout, DEFAULT_TIMEOUT);
        assert!(parsed.path.is_none());
    }

    #[test]
    fn peer_full() {
        let map = hash("address: 10.0.0.1:80\nhost: model.internal\npath: /v1/cls\ntimeout: 5");
        let parsed = PeerConfig::parse(&map, &mut |_, _| Ok(false)).unwrap();
        let peer = parsed.require_peer().unwrap();
        assert_eq!(parsed.host_value(peer), "model.internal");
        assert_eq!(parsed.path.as_deref(), Some("/v1/cls"));
        assert_eq!(parsed.timeout, Duration::from_secs(5));
    }

    #[test]
    fn missing_peer() {
        let map = hash("host: model.internal");
        let parsed = PeerConfig::parse(&map, &mut |_, _| Ok(false)).unwrap();
        assert!(parsed.require_peer().is_err());
    }
}
